use std::fmt;
use std::str::{self, FromStr};

use crate::error::{Error, ErrorKind, Result};

/// A text encoding for CSV input and output.
///
/// UTF-8 is the default.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// ISO-8859-1, where every byte is the code point of the same value.
    Latin1,
    /// 7-bit ASCII. Bytes above `0x7F` are rejected.
    Ascii,
}

impl Default for Encoding {
    fn default() -> Encoding {
        Encoding::Utf8
    }
}

impl Encoding {
    /// The canonical name of this encoding.
    pub fn name(&self) -> &'static str {
        match *self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
        }
    }

    /// Append the encoded form of `text` to `out`.
    pub(crate) fn encode(&self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        match *self {
            Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            Encoding::Latin1 | Encoding::Ascii => {
                let max = if *self == Encoding::Ascii { 0x7F } else { 0xFF };
                out.reserve(text.len());
                for ch in text.chars() {
                    if ch as u32 > max {
                        return Err(Error::new(ErrorKind::Encode {
                            encoding: *self,
                            ch,
                        }));
                    }
                    out.push(ch as u8);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error returned when parsing an unknown encoding label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownEncoding(String);

impl fmt::Display for UnknownEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown encoding: {:?}", self.0)
    }
}

impl std::error::Error for UnknownEncoding {}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    /// Parse an encoding label. Labels are case insensitive; `utf8`,
    /// `utf-8`, `latin1`, `binary`, `iso-8859-1` and `ascii` are recognized.
    fn from_str(label: &str) -> std::result::Result<Encoding, UnknownEncoding> {
        match &*label.trim().to_ascii_lowercase() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "latin1" | "latin-1" | "binary" | "iso-8859-1" | "iso8859-1" => {
                Ok(Encoding::Latin1)
            }
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            _ => Err(UnknownEncoding(label.to_string())),
        }
    }
}

/// An incremental decoder from raw bytes to text.
///
/// A UTF-8 sequence split across two calls to `decode` is held back until
/// it is complete, so text chunks handed to the parser always end on a
/// character boundary.
#[derive(Clone, Debug)]
pub(crate) struct Decoder {
    encoding: Encoding,
    partial: Vec<u8>,
    offset: u64,
}

impl Decoder {
    pub(crate) fn new(encoding: Encoding) -> Decoder {
        Decoder { encoding, partial: Vec::with_capacity(4), offset: 0 }
    }

    /// Decode `input` and append the text to `out`.
    pub(crate) fn decode(&mut self, input: &[u8], out: &mut String) -> Result<()> {
        match self.encoding {
            Encoding::Utf8 => self.decode_utf8(input, out),
            Encoding::Latin1 => {
                out.extend(input.iter().map(|&b| char::from(b)));
                self.offset += input.len() as u64;
                Ok(())
            }
            Encoding::Ascii => {
                if let Some(i) = input.iter().position(|&b| b > 0x7F) {
                    self.offset += i as u64;
                    return Err(self.invalid(&input[i..i + 1]));
                }
                out.extend(input.iter().map(|&b| char::from(b)));
                self.offset += input.len() as u64;
                Ok(())
            }
        }
    }

    /// Signal the end of input. An incomplete trailing sequence is an error.
    pub(crate) fn finish(&mut self) -> Result<()> {
        if self.partial.is_empty() {
            return Ok(());
        }
        let partial = std::mem::replace(&mut self.partial, vec![]);
        Err(self.invalid(&partial))
    }

    fn decode_utf8(&mut self, mut input: &[u8], out: &mut String) -> Result<()> {
        while !self.partial.is_empty() && !input.is_empty() {
            self.partial.push(input[0]);
            input = &input[1..];
            match str::from_utf8(&self.partial) {
                Ok(s) => {
                    out.push_str(s);
                    self.offset += self.partial.len() as u64;
                    self.partial.clear();
                }
                Err(err) if err.error_len().is_none() => {}
                Err(_) => {
                    let partial = std::mem::replace(&mut self.partial, vec![]);
                    return Err(self.invalid(&partial));
                }
            }
        }
        match str::from_utf8(input) {
            Ok(s) => {
                out.push_str(s);
                self.offset += input.len() as u64;
                Ok(())
            }
            Err(err) => {
                let (valid, rest) = input.split_at(err.valid_up_to());
                if let Ok(s) = str::from_utf8(valid) {
                    out.push_str(s);
                }
                self.offset += valid.len() as u64;
                match err.error_len() {
                    None => {
                        self.partial.extend_from_slice(rest);
                        Ok(())
                    }
                    Some(len) => Err(self.invalid(&rest[..len])),
                }
            }
        }
    }

    fn invalid(&self, bytes: &[u8]) -> Error {
        Error::new(ErrorKind::Decode {
            encoding: self.encoding,
            offset: self.offset,
            bytes: bytes.to_vec(),
        })
    }
}
