/// Optional overrides for the four control characters of a CSV dialect.
///
/// Every field that is `None` resolves to its documented default when
/// passed to `Config::resolve`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    /// The field separator. Defaults to `,`.
    pub separator: Option<char>,
    /// The quote character. Defaults to `"`.
    pub quote: Option<char>,
    /// The escape character. Defaults to `"`.
    pub escape: Option<char>,
    /// The comment character. There is no default, so comment handling is
    /// disabled unless this is set.
    pub comment: Option<char>,
}

/// The resolved control characters shared by the parser and the
/// serializer.
///
/// A `Config` is fixed for the lifetime of the parser or serializer that
/// owns it. No validation is done on the characters chosen: a separator
/// equal to the quote character, for example, is accepted and tokenizes in
/// an unspecified (but never panicking) way.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    separator: char,
    quote: char,
    escape: char,
    comment: Option<char>,
}

impl Default for Config {
    fn default() -> Config {
        Config { separator: ',', quote: '"', escape: '"', comment: None }
    }
}

impl Config {
    /// Resolve a configuration from a set of overrides, falling back to the
    /// defaults for anything that is absent.
    pub fn resolve(overrides: &Overrides) -> Config {
        let def = Config::default();
        Config {
            separator: overrides.separator.unwrap_or(def.separator),
            quote: overrides.quote.unwrap_or(def.quote),
            escape: overrides.escape.unwrap_or(def.escape),
            comment: overrides.comment,
        }
    }

    /// The field separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The quote character.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// The escape character.
    pub fn escape(&self) -> char {
        self.escape
    }

    /// The comment character, if comment handling is enabled.
    pub fn comment(&self) -> Option<char> {
        self.comment
    }

    /// Returns true if `c` must be written with a preceding escape, or
    /// is read literally when it follows an escape.
    #[inline]
    pub fn is_escapable(&self, c: char) -> bool {
        c == self.escape || c == self.quote
    }

    #[inline]
    pub(crate) fn is_comment(&self, c: char) -> bool {
        self.comment == Some(c)
    }
}

/// Builds a `Config` with chained setters.
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    overrides: Overrides,
}

impl ConfigBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Create a builder seeded with the given overrides.
    pub fn from_overrides(overrides: Overrides) -> ConfigBuilder {
        ConfigBuilder { overrides }
    }

    /// Build the configuration.
    pub fn build(&self) -> Config {
        Config::resolve(&self.overrides)
    }

    /// The field separator to use.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut ConfigBuilder {
        self.overrides.separator = Some(separator);
        self
    }

    /// The quote character to use.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ConfigBuilder {
        self.overrides.quote = Some(quote);
        self
    }

    /// The escape character to use.
    ///
    /// The default is `"`, so that a quote inside a quoted field is written
    /// as two quotes.
    pub fn escape(&mut self, escape: char) -> &mut ConfigBuilder {
        self.overrides.escape = Some(escape);
        self
    }

    /// The comment character to use, or `None` to disable comment lines.
    ///
    /// Comment lines are disabled by default.
    pub fn comment(&mut self, comment: Option<char>) -> &mut ConfigBuilder {
        self.overrides.comment = comment;
        self
    }
}
