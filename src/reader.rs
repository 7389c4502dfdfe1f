use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::Path;

use csv_stream_core::{Config, ConfigBuilder, Parser, Position, Record};
use log::{debug, trace};

use crate::encoding::{Decoder, Encoding};
use crate::error::{Error, Result};
use crate::options::Options;

const DEFAULT_CAPACITY: usize = 8 * (1 << 10);

/// Builds a CSV reader with various configuration knobs.
///
/// This builder can be used to tweak the separator, quote, escape and
/// comment characters as well as the encoding of the input. Once a
/// `Reader` is built, its configuration cannot be changed.
#[derive(Clone, Debug)]
pub struct ReaderBuilder {
    config: ConfigBuilder,
    encoding: Encoding,
    capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder {
            config: ConfigBuilder::new(),
            encoding: Encoding::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring CSV parsing.
    ///
    /// To convert a builder into a reader, call one of the methods starting
    /// with `from_`.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Create a builder from user supplied options. Absent options keep
    /// their defaults.
    pub fn from_options(opts: &Options) -> ReaderBuilder {
        ReaderBuilder {
            config: ConfigBuilder::from_overrides(opts.overrides()),
            encoding: opts.encoding(),
            ..ReaderBuilder::default()
        }
    }

    /// Build a CSV parser from this configuration that reads data from the
    /// given file path.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Reader<File>> {
        let path = path.as_ref();
        debug!("opening {} for reading", path.display());
        Ok(self.from_reader(File::open(path)?))
    }

    /// Build a CSV parser from this configuration that reads data from
    /// `rdr`.
    ///
    /// Note that the CSV reader is buffered automatically, so you should not
    /// wrap `rdr` in a buffered reader like `io::BufReader`.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<R> {
        Reader::new(self, rdr)
    }

    /// The field separator to use when parsing CSV.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut ReaderBuilder {
        self.config.separator(separator);
        self
    }

    /// The quote character to use when parsing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.config.quote(quote);
        self
    }

    /// The escape character to use when parsing CSV.
    ///
    /// The default is `"`, which means quotes inside quoted fields are
    /// doubled.
    pub fn escape(&mut self, escape: char) -> &mut ReaderBuilder {
        self.config.escape(escape);
        self
    }

    /// The comment character to use when parsing CSV.
    ///
    /// If the start of a line begins with this character, then the whole
    /// line is ignored. By default, no line is treated as a comment.
    pub fn comment(&mut self, comment: Option<char>) -> &mut ReaderBuilder {
        self.config.comment(comment);
        self
    }

    /// The encoding of the input bytes.
    ///
    /// The default is UTF-8.
    pub fn encoding(&mut self, encoding: Encoding) -> &mut ReaderBuilder {
        self.encoding = encoding;
        self
    }

    /// Set the capacity (in bytes) of the buffer used in the CSV reader.
    /// This is also the largest chunk handed to the parser at once.
    ///
    /// The default is 8 KiB.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut ReaderBuilder {
        self.capacity = capacity.max(1);
        self
    }
}

/// A streaming CSV reader.
///
/// The reader pulls chunks from the underlying `io::Read`, decodes them
/// and feeds the text to a [`Parser`](csv_stream_core::Parser). Records are
/// handed out in input order no matter how the input is split into reads.
///
/// Reading stops at the first error. Records completed before the error
/// are still returned first.
///
/// # Example
///
/// ```
/// use csv_stream::Reader;
///
/// let data = "\"city\",\"pop\"\r\n\"Boston\",\"4628910\"\r\n";
/// let mut rdr = Reader::from_reader(data.as_bytes());
/// let mut count = 0;
/// for result in rdr.records() {
///     let record = result.unwrap();
///     assert_eq!(record.len(), 2);
///     count += 1;
/// }
/// assert_eq!(count, 2);
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    rdr: R,
    parser: Parser,
    decoder: Decoder,
    encoding: Encoding,
    buf: Vec<u8>,
    text: String,
    queue: VecDeque<Record>,
    state: ReaderState,
}

#[derive(Debug, Default)]
struct ReaderState {
    /// An error found while reading ahead, reported after the queue drains.
    pending: Option<Error>,
    /// Whether the underlying reader reported end of input.
    eof: bool,
    /// Whether every record has been handed out (or an error returned).
    done: bool,
}

impl Reader<File> {
    /// Create a new CSV reader with a default configuration for the given
    /// file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<File>> {
        ReaderBuilder::new().from_path(path)
    }
}

impl<R: io::Read> Reader<R> {
    fn new(builder: &ReaderBuilder, rdr: R) -> Reader<R> {
        let config = builder.config.build();
        debug!(
            "opened reader: encoding={}, separator={:?}, comment={:?}",
            builder.encoding,
            config.separator(),
            config.comment()
        );
        Reader {
            rdr,
            parser: Parser::new(config),
            decoder: Decoder::new(builder.encoding),
            encoding: builder.encoding,
            buf: vec![0; builder.capacity],
            text: String::with_capacity(builder.capacity),
            queue: VecDeque::new(),
            state: ReaderState::default(),
        }
    }

    /// Create a new CSV reader with a default configuration for the given
    /// reader.
    pub fn from_reader(rdr: R) -> Reader<R> {
        ReaderBuilder::new().from_reader(rdr)
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at the end of input. After an error has been
    /// returned, every further call returns `Ok(None)`.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(rec) = self.queue.pop_front() {
                return Ok(Some(rec));
            }
            if let Some(err) = self.state.pending.take() {
                self.state.done = true;
                return Err(err);
            }
            if self.state.done {
                return Ok(None);
            }
            self.fill();
        }
    }

    /// Returns a borrowed iterator over all records.
    ///
    /// The iterator yields at most one error, after which it is exhausted.
    pub fn records(&mut self) -> RecordsIter<R> {
        RecordsIter { rdr: self }
    }

    /// Returns an owned iterator over all records.
    pub fn into_records(self) -> RecordsIntoIter<R> {
        RecordsIntoIter { rdr: self }
    }

    /// Call `f` with every record, in order.
    ///
    /// Records completed before an error are passed to `f` before the error
    /// is returned.
    pub fn for_each_record<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Record),
    {
        while let Some(rec) = self.read_record()? {
            f(rec);
        }
        Ok(())
    }

    /// Read the next chunk and parse it into the queue. Errors are stored
    /// as pending so that records parsed before them come out first.
    fn fill(&mut self) {
        if self.state.eof {
            self.finish();
            return;
        }
        let n = match read_retry(&mut self.rdr, &mut self.buf) {
            Ok(n) => n,
            Err(err) => {
                self.state.pending = Some(Error::from(err));
                return;
            }
        };
        trace!("read chunk of {} bytes", n);
        if n == 0 {
            self.state.eof = true;
            return;
        }

        self.text.clear();
        let decoded = self.decoder.decode(&self.buf[..n], &mut self.text);
        let queue = &mut self.queue;
        if let Err(err) = self.parser.feed(&self.text, |rec| queue.push_back(rec))
        {
            debug!("{}", err);
            self.state.pending = Some(Error::from(err));
        } else if let Err(err) = decoded {
            debug!("{}", err);
            self.state.pending = Some(err);
        }
    }

    fn finish(&mut self) {
        self.state.done = true;
        if let Err(err) = self.decoder.finish() {
            debug!("{}", err);
            self.state.pending = Some(err);
            return;
        }
        let queue = &mut self.queue;
        if let Err(err) = self.parser.finish(|rec| queue.push_back(rec)) {
            debug!("{}", err);
            self.state.pending = Some(Error::from(err));
            return;
        }
        debug!(
            "end of input: {} records, {} bytes",
            self.parser.position().record(),
            self.parser.position().byte()
        );
    }
}

impl<R> Reader<R> {
    /// The position of the parser in the decoded text.
    pub fn position(&self) -> &Position {
        self.parser.position()
    }

    /// The dialect this reader parses.
    pub fn config(&self) -> &Config {
        self.parser.config()
    }

    /// The encoding of the input.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns true if and only if every record has been read or an error
    /// has been returned.
    pub fn is_done(&self) -> bool {
        self.state.done && self.queue.is_empty() && self.state.pending.is_none()
    }

    /// Return a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Return a mutable reference to the underlying reader.
    ///
    /// Reading from it directly corrupts the state of this CSV reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rdr
    }

    /// Unwraps this CSV reader, returning the underlying reader.
    ///
    /// Note that any leftover data inside this reader's internal buffer is
    /// lost.
    pub fn into_inner(self) -> R {
        self.rdr
    }
}

fn read_retry<R: io::Read>(rdr: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match rdr.read(buf) {
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
            res => return res,
        }
    }
}

/// A borrowed iterator over the records of a CSV reader.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying CSV
/// `Reader`.
pub struct RecordsIter<'r, R: 'r> {
    rdr: &'r mut Reader<R>,
}

impl<'r, R: io::Read> RecordsIter<'r, R> {
    /// Return a reference to the underlying CSV reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.rdr
    }
}

impl<'r, R: io::Read> Iterator for RecordsIter<'r, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        self.rdr.read_record().transpose()
    }
}

/// An owned iterator over the records of a CSV reader.
pub struct RecordsIntoIter<R> {
    rdr: Reader<R>,
}

impl<R: io::Read> RecordsIntoIter<R> {
    /// Drop this iterator and return the underlying CSV reader.
    pub fn into_reader(self) -> Reader<R> {
        self.rdr
    }
}

impl<R: io::Read> Iterator for RecordsIntoIter<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        self.rdr.read_record().transpose()
    }
}
