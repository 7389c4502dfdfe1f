use std::fs::File;
use std::io;
use std::path::Path;

use csv_stream_core::{Config, ConfigBuilder, Serializer};
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::encoding::Encoding;
use crate::error::Result;
use crate::options::Options;
#[cfg(feature = "serde")]
use crate::serializer::to_fields;

/// Builds a CSV writer with various configuration knobs.
///
/// This builder can be used to tweak the separator, quote and escape
/// characters and the encoding of the output. Once a CSV `Writer` is built,
/// its configuration cannot be changed.
#[derive(Clone, Debug, Default)]
pub struct WriterBuilder {
    config: ConfigBuilder,
    encoding: Encoding,
}

impl WriterBuilder {
    /// Create a new builder for configuring CSV writing.
    ///
    /// To convert a builder into a writer, call one of the methods starting
    /// with `from_`.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Create a builder from user supplied options. The comment character
    /// has no effect on writing.
    pub fn from_options(opts: &Options) -> WriterBuilder {
        WriterBuilder {
            config: ConfigBuilder::from_overrides(opts.overrides()),
            encoding: opts.encoding(),
        }
    }

    /// Build a CSV writer from this configuration that writes data to the
    /// given file path. The file is truncated if it already exists.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Writer<File>> {
        let path = path.as_ref();
        debug!("opening {} for writing", path.display());
        Ok(self.from_writer(File::create(path)?))
    }

    /// Build a CSV writer from this configuration that writes data to `wtr`.
    ///
    /// Every record is handed to `wtr` as one `write_all` call. The writer
    /// does no buffering of its own, so wrap slow sinks in an
    /// `io::BufWriter` if needed.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Writer<W> {
        Writer::new(self, wtr)
    }

    /// The field separator to use when writing CSV.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut WriterBuilder {
        self.config.separator(separator);
        self
    }

    /// The quote character to use when writing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.config.quote(quote);
        self
    }

    /// The escape character to use when writing CSV.
    ///
    /// It is written before every quote and escape character inside a
    /// field. The default is `"`.
    pub fn escape(&mut self, escape: char) -> &mut WriterBuilder {
        self.config.escape(escape);
        self
    }

    /// The encoding of the output bytes.
    ///
    /// The default is UTF-8.
    pub fn encoding(&mut self, encoding: Encoding) -> &mut WriterBuilder {
        self.encoding = encoding;
        self
    }
}

/// A CSV writer.
///
/// Every field is quoted and every record ends with `\r\n`. A record is
/// fully serialized and encoded before any of it reaches the underlying
/// writer, so an encoding or serialization failure writes nothing.
///
/// # Example
///
/// ```
/// use csv_stream::Writer;
///
/// # fn main() -> csv_stream::Result<()> {
/// let mut wtr = Writer::from_writer(vec![]);
/// wtr.write_record(&["a", "b,c"])?;
/// wtr.write_record(&["say \"hi\"", ""])?;
///
/// let data = String::from_utf8(wtr.into_inner()?).unwrap();
/// assert_eq!(data, "\"a\",\"b,c\"\r\n\"say \"\"hi\"\"\",\"\"\r\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    wtr: W,
    ser: Serializer,
    encoding: Encoding,
    line: String,
    bytes: Vec<u8>,
}

impl Writer<File> {
    /// Build a CSV writer with a default configuration that writes data to
    /// the given file path. The file is truncated if it already exists.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<File>> {
        WriterBuilder::new().from_path(path)
    }
}

impl<W: io::Write> Writer<W> {
    fn new(builder: &WriterBuilder, wtr: W) -> Writer<W> {
        let config = builder.config.build();
        debug!(
            "opened writer: encoding={}, separator={:?}",
            builder.encoding,
            config.separator()
        );
        Writer {
            wtr,
            ser: Serializer::new(config),
            encoding: builder.encoding,
            line: String::new(),
            bytes: vec![],
        }
    }

    /// Build a CSV writer with a default configuration that writes data to
    /// `wtr`.
    pub fn from_writer(wtr: W) -> Writer<W> {
        WriterBuilder::new().from_writer(wtr)
    }

    /// Write a single record.
    ///
    /// A record without any fields writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an encode error if a character cannot be represented in the
    /// output encoding, in which case nothing is written. Errors from the
    /// underlying writer are returned unchanged.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.line.clear();
        let fields = self.ser.write_record(record, &mut self.line);
        if fields == 0 {
            return Ok(());
        }
        let out = match self.encoding {
            Encoding::Utf8 => self.line.as_bytes(),
            encoding => {
                self.bytes.clear();
                encoding.encode(&self.line, &mut self.bytes)?;
                &self.bytes
            }
        };
        self.wtr.write_all(out)?;
        trace!("wrote record of {} fields ({} bytes)", fields, out.len());
        Ok(())
    }

    /// Serialize a single record using Serde.
    ///
    /// The value must be a sequence, tuple or tuple struct of scalars.
    /// `None`, `()` and empty sequences write nothing.
    ///
    /// # Errors
    ///
    /// Maps, structs, nested containers and top level scalars cannot be
    /// written and return a serialize error. Nothing is written when any
    /// error occurs before the record reaches the underlying writer.
    ///
    /// # Example
    ///
    /// ```
    /// use csv_stream::Writer;
    ///
    /// # fn main() -> csv_stream::Result<()> {
    /// let mut wtr = Writer::from_writer(vec![]);
    /// wtr.serialize(("Boston", 4628910, Some(42.5)))?;
    /// wtr.serialize(("Concord", 42695, None::<f64>))?;
    ///
    /// let data = String::from_utf8(wtr.into_inner()?).unwrap();
    /// assert_eq!(
    ///     data,
    ///     "\"Boston\",\"4628910\",\"42.5\"\r\n\"Concord\",\"42695\",\"\"\r\n"
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "serde")]
    pub fn serialize<S: Serialize>(&mut self, record: S) -> Result<()> {
        match to_fields(&record)? {
            None => Ok(()),
            Some(fields) => self.write_record(&fields),
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }

    /// The dialect this writer produces.
    pub fn config(&self) -> &Config {
        self.ser.config()
    }

    /// The encoding of the output.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Return a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Return a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.wtr
    }

    /// Flush this writer and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.wtr)
    }
}
