use csv_stream_core::Overrides;

use crate::encoding::Encoding;

/// User supplied reader and writer options.
///
/// Every field is optional. An absent field falls back to the default:
/// `,` as separator, `"` as quote and escape, no comment character and
/// UTF-8.
///
/// With the `serde` feature, `Options` can be deserialized from any
/// self-describing format. Characters are given as one-character strings
/// and an empty string counts as absent:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # fn main() {
/// use csv_stream::{Encoding, Options};
///
/// let opts: Options = serde_json::from_str(
///     r#"{"separator": ";", "escape": "", "encoding": "latin1"}"#,
/// ).unwrap();
/// assert_eq!(opts.separator, Some(';'));
/// assert_eq!(opts.escape, None);
/// assert_eq!(opts.encoding, Some(Encoding::Latin1));
/// # }
/// # #[cfg(not(feature = "serde"))]
/// # fn main() {}
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Options {
    /// The field separator.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::opt_char"))]
    pub separator: Option<char>,
    /// The quote character.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::opt_char"))]
    pub quote: Option<char>,
    /// The escape character.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::opt_char"))]
    pub escape: Option<char>,
    /// The comment character.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::opt_char"))]
    pub comment: Option<char>,
    /// The text encoding of the byte stream.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "de::opt_encoding")
    )]
    pub encoding: Option<Encoding>,
}

impl Options {
    /// The dialect part of these options.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            separator: self.separator,
            quote: self.quote,
            escape: self.escape,
            comment: self.comment,
        }
    }

    /// The configured encoding, or UTF-8.
    pub fn encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }
}

#[cfg(feature = "serde")]
mod de {
    use serde::de::{Deserialize, Deserializer, Error, Unexpected};

    use crate::encoding::Encoding;

    fn opt_str<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        let s: Option<String> = Option::deserialize(d)?;
        Ok(s.filter(|s| !s.is_empty()))
    }

    pub fn opt_char<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<char>, D::Error> {
        let s = match opt_str(d)? {
            None => return Ok(None),
            Some(s) => s,
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(D::Error::invalid_value(
                Unexpected::Str(&s),
                &"a single character",
            )),
        }
    }

    pub fn opt_encoding<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Encoding>, D::Error> {
        match opt_str(d)? {
            None => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| {
                D::Error::invalid_value(
                    Unexpected::Str(&s),
                    &"one of utf-8, latin1, binary, iso-8859-1 or ascii",
                )
            }),
        }
    }
}
