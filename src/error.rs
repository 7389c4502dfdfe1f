use std::error;
use std::fmt;
use std::io;
use std::result;

use bstr::ByteSlice;
use csv_stream_core::{ParseError, Position};

use crate::encoding::Encoding;

/// A type alias for `Result<T, csv_stream::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading or writing CSV data.
///
/// The kind of the error is boxed, which keeps `Result<Record>` small.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwrap this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns true if this is an I/O error reported by the underlying
    /// source or sink.
    pub fn is_io_error(&self) -> bool {
        match *self.0 {
            ErrorKind::Io(_) => true,
            _ => false,
        }
    }

    /// The position in the parsed text at which this error occurred, if
    /// it is a parse error.
    pub fn position(&self) -> Option<&Position> {
        match *self.0 {
            ErrorKind::Parse(ref err) => Some(err.position()),
            _ => None,
        }
    }
}

/// The specific type of an error.
#[derive(Debug)]
pub enum ErrorKind {
    /// An I/O error from the underlying source or sink, passed through
    /// unchanged.
    Io(io::Error),
    /// The CSV data was malformed.
    Parse(ParseError),
    /// The input bytes were not valid in the configured encoding.
    Decode {
        /// The encoding used to decode the input.
        encoding: Encoding,
        /// The byte offset of the invalid sequence in the raw input.
        offset: u64,
        /// The invalid bytes.
        bytes: Vec<u8>,
    },
    /// A character could not be represented in the configured output
    /// encoding.
    Encode {
        /// The encoding used to encode the output.
        encoding: Encoding,
        /// The character that could not be encoded.
        ch: char,
    },
    /// A value given to the writer could not be serialized as a record.
    ///
    /// Nothing is written when this occurs.
    Serialize(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Io(err))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::new(ErrorKind::Parse(err))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err.into_kind() {
            ErrorKind::Io(err) => err,
            kind => io::Error::new(io::ErrorKind::Other, Error::new(kind)),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            ErrorKind::Parse(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Io(ref err) => err.fmt(f),
            ErrorKind::Parse(ref err) => err.fmt(f),
            ErrorKind::Decode { encoding, offset, ref bytes } => write!(
                f,
                "CSV decode error: byte {}: invalid {} sequence {:?}",
                offset,
                encoding,
                bytes.as_bstr()
            ),
            ErrorKind::Encode { encoding, ch } => write!(
                f,
                "CSV encode error: {:?} cannot be represented in {}",
                ch, encoding
            ),
            ErrorKind::Serialize(ref msg) => {
                write!(f, "CSV write error: {}", msg)
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Error {
        Error::new(ErrorKind::Serialize(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use csv_stream_core::{Config, Parser};

    use super::{Error, ErrorKind};
    use crate::encoding::Encoding;

    #[test]
    fn io_passthrough() {
        let err = Error::from(io::Error::new(io::ErrorKind::WouldBlock, "full"));
        assert!(err.is_io_error());
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn parse_error_position() {
        let mut parser = Parser::new(Config::default());
        let err = Error::from(parser.feed("\"a\"x", |_| {}).unwrap_err());
        assert!(!err.is_io_error());
        assert_eq!(err.position().map(|p| p.byte()), Some(3));
        assert!(err.to_string().starts_with("CSV parse error: record 0"));
    }

    #[test]
    fn decode_display() {
        let err = Error::new(ErrorKind::Decode {
            encoding: Encoding::Utf8,
            offset: 7,
            bytes: vec![b'\xFF'],
        });
        let msg = err.to_string();
        assert!(msg.starts_with("CSV decode error: byte 7: invalid utf-8"));
        assert!(msg.ends_with(r#"sequence "\xFF""#), "{}", msg);
    }
}
