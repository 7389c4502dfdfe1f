use memchr::memchr2;

use crate::config::Config;

/// Serializes records into CSV lines.
///
/// Every field is quoted. Inside a field, the escape character is inserted
/// before every occurrence of the quote or escape character. Fields are
/// joined by the separator and each record ends with `\r\n`.
///
/// The serializer has no state of its own beyond its configuration, so a
/// failure in the caller between two records never leaves a partial line
/// behind.
///
/// # Example
///
/// ```
/// use csv_stream_core::{Config, Serializer};
///
/// let ser = Serializer::new(Config::default());
/// let mut line = String::new();
/// ser.write_record(&["a", "say \"hi\""], &mut line);
/// assert_eq!(line, "\"a\",\"say \"\"hi\"\"\"\r\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Serializer {
    config: Config,
}

impl Serializer {
    /// Create a new serializer for the given configuration.
    pub fn new(config: Config) -> Serializer {
        Serializer { config }
    }

    /// The configuration of this serializer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Append one record, including its terminator, to `out`.
    ///
    /// Returns the number of fields written. A record without fields writes
    /// nothing at all, not even a terminator.
    pub fn write_record<I, T>(&self, record: I, out: &mut String) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut count = 0;
        for field in record {
            if count > 0 {
                out.push(self.config.separator());
            }
            self.write_field(field.as_ref(), out);
            count += 1;
        }
        if count > 0 {
            out.push_str("\r\n");
        }
        count
    }

    /// Append a single quoted and escaped field to `out`.
    pub fn write_field(&self, field: &str, out: &mut String) {
        let (quote, escape) = (self.config.quote(), self.config.escape());
        out.reserve(field.len() + 2);
        out.push(quote);
        if !self.needs_escape(field) {
            out.push_str(field);
        } else {
            for c in field.chars() {
                if c == quote || c == escape {
                    out.push(escape);
                }
                out.push(c);
            }
        }
        out.push(quote);
    }

    fn needs_escape(&self, field: &str) -> bool {
        let (quote, escape) = (self.config.quote(), self.config.escape());
        if quote.is_ascii() && escape.is_ascii() {
            memchr2(quote as u8, escape as u8, field.as_bytes()).is_some()
        } else {
            field.contains(|c| self.config.is_escapable(c))
        }
    }
}
