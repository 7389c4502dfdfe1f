use core::fmt;
use core::mem;
use std::error;

use memchr::memchr2;

use crate::config::Config;
use crate::record::Record;

/// A position in the CSV input consumed by a parser.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    record: u64,
}

impl Position {
    /// Returns a position at the very start of the input.
    pub fn new() -> Position {
        Position { byte: 0, line: 1, record: 0 }
    }

    /// The byte offset, starting at `0`, of the UTF-8 encoded text
    /// consumed so far.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`. Every `\r`, `\n` or `\r\n`
    /// starts a new line, inside quoted fields too.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The number of records emitted before this position.
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// The kind of a fatal parse error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// The input ended while a quoted field was still open.
    UnterminatedQuote,
    /// A closing quote was followed by something other than a separator or
    /// a line terminator.
    SeparatorExpected {
        /// The character found directly after the closing quote.
        found: char,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseErrorKind::UnterminatedQuote => {
                write!(f, "input ended but a closing quote was expected")
            }
            ParseErrorKind::SeparatorExpected { found } => write!(
                f,
                "separator expected after a closing quote, found {:?}",
                found
            ),
        }
    }
}

/// A fatal error found while parsing CSV data.
///
/// CSV corruption is not self-healing: once a parser has reported an error,
/// every subsequent call reports the same error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    pos: Position,
}

impl ParseError {
    /// The kind of this error.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The position of the character that triggered this error.
    pub fn position(&self) -> &Position {
        &self.pos
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CSV parse error: record {} (line {}, byte {}): {}",
            self.pos.record, self.pos.line, self.pos.byte, self.kind
        )
    }
}

impl error::Error for ParseError {}

/// Where the parser stands with respect to quoting and comments.
///
/// Quoted fields and comment lines are mutually exclusive, which is why this
/// is an enum instead of a pair of flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    /// Outside of any quoted field or comment.
    Field,
    /// Inside an opened quoted field.
    Quoted,
    /// Directly after the quote that closed a quoted field.
    QuoteClosed,
    /// Inside a comment line.
    Comment,
}

/// The mutable state of an incremental parse.
///
/// This is everything that must survive a chunk boundary. The transition
/// function, `advance`, consumes exactly one character and never looks
/// ahead: an escape character whose meaning depends on the next character
/// is remembered as a pending escape instead.
#[derive(Clone, Debug)]
pub struct ParseState {
    open_record: Vec<String>,
    open_field: String,
    field_quoted: bool,
    last_char: Option<char>,
    mode: Mode,
    pending_escape: bool,
}

impl Default for ParseState {
    fn default() -> ParseState {
        ParseState {
            open_record: Vec::new(),
            open_field: String::new(),
            field_quoted: false,
            last_char: None,
            mode: Mode::Field,
            pending_escape: false,
        }
    }
}

impl ParseState {
    /// Create a state positioned at the start of the input.
    pub fn new() -> ParseState {
        ParseState::default()
    }

    /// The fields completed so far in the record being assembled.
    pub fn open_record(&self) -> &[String] {
        &self.open_record
    }

    /// The contents of the field being assembled.
    pub fn open_field(&self) -> &str {
        &self.open_field
    }

    /// The most recently consumed character.
    pub fn last_char(&self) -> Option<char> {
        self.last_char
    }

    /// Returns true while inside an opened quoted field.
    pub fn is_quoted(&self) -> bool {
        self.mode == Mode::Quoted
    }

    /// Returns true while inside a comment line.
    pub fn is_commented_line(&self) -> bool {
        self.mode == Mode::Comment
    }

    /// Returns true if the last character consumed was an escape character
    /// whose meaning is not yet known.
    pub fn has_pending_escape(&self) -> bool {
        self.pending_escape
    }

    /// Consume one character.
    ///
    /// If the character completes a record, the record is moved out of the
    /// state and returned.
    pub fn advance(
        &mut self,
        config: &Config,
        c: char,
    ) -> Result<Option<Record>, ParseErrorKind> {
        if self.pending_escape {
            self.pending_escape = false;
            if config.is_escapable(c) {
                self.open_field.push(c);
                self.last_char = Some(c);
                return Ok(None);
            }
            self.lone_escape(config);
        }
        let out = self.classify(config, c);
        self.last_char = Some(c);
        out
    }

    /// Signal the end of input.
    ///
    /// Returns the trailing record, if the input did not end with a line
    /// terminator.
    pub fn finish(
        &mut self,
        config: &Config,
    ) -> Result<Option<Record>, ParseErrorKind> {
        if self.pending_escape {
            self.pending_escape = false;
            self.lone_escape(config);
        }
        match self.mode {
            Mode::Quoted => Err(ParseErrorKind::UnterminatedQuote),
            Mode::Comment => {
                self.mode = Mode::Field;
                Ok(None)
            }
            Mode::Field | Mode::QuoteClosed if self.at_line_start() => Ok(None),
            Mode::Field | Mode::QuoteClosed => Ok(Some(self.end_record())),
        }
    }

    fn classify(
        &mut self,
        config: &Config,
        c: char,
    ) -> Result<Option<Record>, ParseErrorKind> {
        if c == config.escape() || c == config.quote() {
            match self.mode {
                Mode::Comment => return Ok(None),
                Mode::QuoteClosed => {
                    return Err(ParseErrorKind::SeparatorExpected { found: c })
                }
                Mode::Field | Mode::Quoted => {}
            }
            if c == config.quote()
                && self.mode == Mode::Field
                && self.at_field_start()
            {
                self.mode = Mode::Quoted;
                self.field_quoted = true;
            } else if c == config.escape() {
                self.pending_escape = true;
            } else {
                self.quote();
            }
            return Ok(None);
        }
        if c == config.separator() {
            match self.mode {
                Mode::Comment => {}
                Mode::Quoted => self.open_field.push(c),
                Mode::Field | Mode::QuoteClosed => self.end_field(),
            }
            return Ok(None);
        }
        if c == '\n' && self.mode != Mode::Quoted && self.last_char == Some('\r')
        {
            return Ok(None);
        }
        if c == '\r' || c == '\n' {
            return Ok(match self.mode {
                Mode::Comment => {
                    self.mode = Mode::Field;
                    None
                }
                Mode::Quoted => {
                    self.open_field.push(c);
                    None
                }
                Mode::Field | Mode::QuoteClosed => Some(self.end_record()),
            });
        }
        match self.mode {
            Mode::Comment => {}
            Mode::QuoteClosed => {
                return Err(ParseErrorKind::SeparatorExpected { found: c })
            }
            Mode::Field if config.is_comment(c) && self.at_line_start() => {
                self.mode = Mode::Comment;
            }
            Mode::Field | Mode::Quoted => self.open_field.push(c),
        }
        Ok(None)
    }

    /// Resolve an escape character that turned out not to be followed by
    /// an escapable character. If it doubles as the quote character, it
    /// acts as one. Otherwise it is dropped.
    fn lone_escape(&mut self, config: &Config) {
        if config.escape() == config.quote() {
            self.quote();
        }
    }

    /// Handle a quote character that does not open a quoted field.
    ///
    /// Inside a quoted field it closes the field. A stray quote in the
    /// middle of an unquoted field is dropped.
    fn quote(&mut self) {
        if self.mode == Mode::Quoted {
            self.mode = Mode::QuoteClosed;
        }
    }

    fn at_field_start(&self) -> bool {
        self.open_field.is_empty() && !self.field_quoted
    }

    fn at_line_start(&self) -> bool {
        self.open_record.is_empty() && self.at_field_start()
    }

    fn end_field(&mut self) {
        let field = mem::replace(&mut self.open_field, String::new());
        self.open_record.push(field);
        self.field_quoted = false;
        self.mode = Mode::Field;
    }

    /// Complete the open record. A blank line yields an empty record.
    fn end_record(&mut self) -> Record {
        self.mode = Mode::Field;
        if !self.at_line_start() {
            self.end_field();
        }
        Record::from(mem::replace(&mut self.open_record, Vec::new()))
    }

    /// Skip over the body of a comment line. `text` must not contain a
    /// line terminator.
    fn skip_comment(&mut self, text: &str) {
        debug_assert!(self.mode == Mode::Comment);
        if let Some(c) = text.chars().next_back() {
            self.last_char = Some(c);
        }
    }
}

/// An incremental CSV parser.
///
/// The parser consumes chunks of text in arrival order and emits every
/// record as soon as its terminator has been seen. Chunks may be split at
/// any character: a quoted field, an escape sequence or a CRLF pair that
/// straddles two chunks parses exactly as if the chunks had been joined.
///
/// # Example
///
/// ```
/// use csv_stream_core::{Config, Parser};
///
/// let mut parser = Parser::new(Config::default());
/// let mut records = parser.records("\"a,b\nc\",d\r").unwrap();
/// records.extend(parser.records("\nx,y").unwrap());
/// parser.finish(|rec| records.push(rec)).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0], vec!["a,b\nc", "d"]);
/// assert_eq!(records[1], vec!["x", "y"]);
/// ```
#[derive(Clone, Debug)]
pub struct Parser {
    config: Config,
    state: ParseState,
    pos: Position,
    failed: Option<ParseError>,
}

impl Parser {
    /// Create a new parser for the given configuration.
    pub fn new(config: Config) -> Parser {
        Parser {
            config,
            state: ParseState::new(),
            pos: Position::new(),
            failed: None,
        }
    }

    /// The configuration of this parser.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current parse state.
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// The position of the next character to be consumed.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Reset the parser such that it behaves as if it had never been used.
    pub fn reset(&mut self) {
        self.state = ParseState::new();
        self.pos = Position::new();
        self.failed = None;
    }

    /// Parse `chunk`, calling `emit` with every record completed by it, in
    /// order.
    ///
    /// # Errors
    ///
    /// A closing quote followed by anything other than a separator or a
    /// line terminator is a fatal error. Records completed earlier in the
    /// same chunk have already been emitted when the error is returned.
    pub fn feed<F>(&mut self, chunk: &str, mut emit: F) -> Result<(), ParseError>
    where
        F: FnMut(Record),
    {
        if let Some(ref err) = self.failed {
            return Err(err.clone());
        }
        let mut rest = chunk;
        while !rest.is_empty() {
            if self.state.is_commented_line() {
                let n = memchr2(b'\r', b'\n', rest.as_bytes())
                    .unwrap_or(rest.len());
                if n > 0 {
                    self.state.skip_comment(&rest[..n]);
                    self.pos.byte += n as u64;
                    rest = &rest[n..];
                    continue;
                }
            }
            let c = match rest.chars().next() {
                Some(c) => c,
                None => break,
            };
            rest = &rest[c.len_utf8()..];
            self.step(c, &mut emit)?;
        }
        Ok(())
    }

    /// Parse `chunk` and collect the records completed by it.
    pub fn records(&mut self, chunk: &str) -> Result<Vec<Record>, ParseError> {
        let mut records = vec![];
        self.feed(chunk, |rec| records.push(rec))?;
        Ok(records)
    }

    /// Signal that there is no more input.
    ///
    /// If the input did not end with a line terminator, the trailing record
    /// is passed to `emit`. Afterwards the parser is back at the start of a
    /// line and may be fed again.
    ///
    /// # Errors
    ///
    /// If a quoted field is still open, this returns an unterminated quote
    /// error and nothing is emitted.
    pub fn finish<F>(&mut self, mut emit: F) -> Result<(), ParseError>
    where
        F: FnMut(Record),
    {
        if let Some(ref err) = self.failed {
            return Err(err.clone());
        }
        match self.state.finish(&self.config) {
            Ok(Some(rec)) => {
                self.pos.record += 1;
                emit(rec);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(kind) => Err(self.fail(kind, self.pos.clone())),
        }
    }

    #[inline]
    fn step<F>(&mut self, c: char, emit: &mut F) -> Result<(), ParseError>
    where
        F: FnMut(Record),
    {
        let at = self.pos.clone();
        self.pos.byte += c.len_utf8() as u64;
        if c == '\r' || (c == '\n' && self.state.last_char() != Some('\r')) {
            self.pos.line += 1;
        }
        match self.state.advance(&self.config, c) {
            Ok(Some(rec)) => {
                self.pos.record += 1;
                emit(rec);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(kind) => Err(self.fail(kind, at)),
        }
    }

    fn fail(&mut self, kind: ParseErrorKind, pos: Position) -> ParseError {
        let err = ParseError { kind, pos };
        self.failed = Some(err.clone());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseErrorKind, ParseState, Parser};
    use crate::config::{Config, ConfigBuilder};
    use crate::record::Record;

    type Csv = Vec<Vec<String>>;

    macro_rules! csv {
        ($([$($field:expr),*]),*) => {{
            #[allow(unused_mut)]
            fn x() -> Csv { vec![$(vec![$($field.to_string()),*]),*] }
            x()
        }}
    }

    fn parse_chunks(config: Config, chunks: &[&str]) -> Csv {
        let mut parser = Parser::new(config);
        let mut got = vec![];
        for chunk in chunks {
            parser.feed(chunk, |rec| got.push(rec.into_fields())).unwrap();
        }
        parser.finish(|rec| got.push(rec.into_fields())).unwrap();
        got
    }

    fn parse(config: Config, data: &str) -> Csv {
        parse_chunks(config, &[data])
    }

    fn parse_error(config: Config, data: &str) -> (ParseErrorKind, Csv) {
        let mut parser = Parser::new(config);
        let mut got = vec![];
        let res = parser
            .feed(data, |rec| got.push(rec.into_fields()))
            .and_then(|()| parser.finish(|rec| got.push(rec.into_fields())));
        (res.unwrap_err().kind().clone(), got)
    }

    macro_rules! parses_to {
        ($name:ident, $data:expr, $expected:expr) => {
            parses_to!($name, $data, $expected, |_: &mut ConfigBuilder| {});
        };
        ($name:ident, $data:expr, $expected:expr, $config:expr) => {
            #[test]
            fn $name() {
                let mut builder = ConfigBuilder::new();
                $config(&mut builder);
                let config = builder.build();
                let expected = $expected;
                assert_eq!(parse(config, $data), expected, "whole input");
                // Feeding one character at a time must not change anything.
                let chars: Vec<String> =
                    $data.chars().map(|c| c.to_string()).collect();
                let chunks: Vec<&str> =
                    chars.iter().map(|s| s.as_str()).collect();
                assert_eq!(
                    parse_chunks(config, &chunks),
                    expected,
                    "char by char"
                );
            }
        };
    }

    parses_to!(one_row_one_field, "a", csv![["a"]]);
    parses_to!(one_row_many_fields, "a,b,c", csv![["a", "b", "c"]]);
    parses_to!(one_row_trailing_comma, "a,b,", csv![["a", "b", ""]]);
    parses_to!(one_row_one_field_lf, "a\n", csv![["a"]]);
    parses_to!(one_row_many_fields_lf, "a,b,c\n", csv![["a", "b", "c"]]);
    parses_to!(one_row_trailing_comma_lf, "a,b,\n", csv![["a", "b", ""]]);
    parses_to!(one_row_one_field_crlf, "a\r\n", csv![["a"]]);
    parses_to!(one_row_many_fields_crlf, "a,b,c\r\n", csv![["a", "b", "c"]]);
    parses_to!(one_row_one_field_cr, "a\r", csv![["a"]]);
    parses_to!(one_row_many_fields_cr, "a,b,c\r", csv![["a", "b", "c"]]);

    parses_to!(many_rows_one_field, "a\nb", csv![["a"], ["b"]]);
    parses_to!(
        many_rows_many_fields_crlf,
        "a,b,c\r\nx,y,z\r\n",
        csv![["a", "b", "c"], ["x", "y", "z"]]
    );
    parses_to!(
        many_rows_many_fields_cr,
        "a,b,c\rx,y,z\r",
        csv![["a", "b", "c"], ["x", "y", "z"]]
    );
    parses_to!(
        many_rows_mixed_terminators,
        "a,b\nc,d\r\ne,f\rg,h",
        csv![["a", "b"], ["c", "d"], ["e", "f"], ["g", "h"]]
    );

    parses_to!(empty, "", csv![]);
    parses_to!(empty_lines, "\n\n\n\n", csv![[], [], [], []]);
    parses_to!(empty_lines_crlf, "\r\n\r\n\r\n", csv![[], [], []]);
    parses_to!(empty_lines_cr, "\r\r\r", csv![[], [], []]);
    parses_to!(
        empty_lines_interspersed,
        "\n\na,b\n\n\nx,y\n\n",
        csv![[], [], ["a", "b"], [], [], ["x", "y"], []]
    );
    parses_to!(
        empty_line_between_records_crlf,
        "a\r\n\r\nb\r\n",
        csv![["a"], [], ["b"]]
    );
    parses_to!(
        empty_line_after_comment,
        "#c\r\n\r\na",
        csv![[], ["a"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(lone_comma, ",", csv![["", ""]]);
    parses_to!(lone_comma_crlf, ",\r\n", csv![["", ""]]);

    parses_to!(
        quoted_separator_and_newline,
        "\"a,b\nc\",d\r\n",
        csv![["a,b\nc", "d"]]
    );
    parses_to!(
        quoted_crlf,
        "\"a\r\nb\",c\r\n",
        csv![["a\r\nb", "c"]]
    );
    parses_to!(
        escaped_quotes,
        "\"he said \"\"hi\"\"\",x\r\n",
        csv![["he said \"hi\"", "x"]]
    );
    parses_to!(quote_empty, "\"\"", csv![[""]]);
    parses_to!(quote_empty_lf, "\"\"\n", csv![[""]]);
    parses_to!(quote_empty_fields, "\"\",\"\"\r\n", csv![["", ""]]);
    parses_to!(quote_only_quote, "\"\"\"\"", csv![["\""]]);
    parses_to!(quote_space, "\" a \"", csv![[" a "]]);
    parses_to!(
        quote_every_field,
        "\"a\",\"b\",\"c\"\r\n\"x\",y,\"z\"\r\n",
        csv![["a", "b", "c"], ["x", "y", "z"]]
    );
    parses_to!(quote_last_field_at_eof, "a,\"b\"", csv![["a", "b"]]);

    // A quote in the middle of an unquoted field is dropped.
    parses_to!(stray_quote, "ab\"c,d", csv![["abc", "d"]], |b: &mut ConfigBuilder| {
        b.escape('\\');
    });
    // With the default dialect, a doubled quote is an escape anywhere.
    parses_to!(doubled_quote_unquoted, "a\"\"b", csv![["a\"b"]]);

    parses_to!(
        backslash_escape,
        r#""a\"b\\c",d"#,
        csv![[r#"a"b\c"#, "d"]],
        |b: &mut ConfigBuilder| {
            b.escape('\\');
        }
    );
    // An escape not followed by an escapable character is dropped.
    parses_to!(
        backslash_lone,
        r#""a\b""#,
        csv![["ab"]],
        |b: &mut ConfigBuilder| {
            b.escape('\\');
        }
    );

    parses_to!(
        comment_skipped,
        "#comment\r\na,b\r\n",
        csv![["a", "b"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(
        comment_with_specials,
        "#x,\"y\r\na\n#\"\"\nb",
        csv![["a"], ["b"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(
        comment_char_inside_field,
        "a#b,#c\r\n",
        csv![["a#b", "#c"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(
        comment_char_in_quotes,
        "\"#a\"\r\n",
        csv![["#a"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(
        comment_at_eof,
        "a\n#tail",
        csv![["a"]],
        |b: &mut ConfigBuilder| {
            b.comment(Some('#'));
        }
    );
    parses_to!(comment_disabled, "#a,b\n", csv![["#a", "b"]]);

    parses_to!(
        separator_tab,
        "a\tb\t\"c\td\"",
        csv![["a", "b", "c\td"]],
        |b: &mut ConfigBuilder| {
            b.separator('\t');
        }
    );
    parses_to!(
        quote_change,
        "'a,b','it''s'\n",
        csv![["a,b", "it's"]],
        |b: &mut ConfigBuilder| {
            b.quote('\'').escape('\'');
        }
    );
    parses_to!(
        unicode,
        "\"žluť\",ασδ;é\r\n",
        csv![["žluť", "ασδ;é"]]
    );
    parses_to!(
        unicode_separator,
        "a→b→\"c→d\"",
        csv![["a", "b", "c→d"]],
        |b: &mut ConfigBuilder| {
            b.separator('→');
        }
    );

    #[test]
    fn unterminated_quote() {
        let (kind, got) = parse_error(Config::default(), "\"abc");
        assert_eq!(kind, ParseErrorKind::UnterminatedQuote);
        assert!(got.is_empty());
    }

    #[test]
    fn unterminated_quote_after_records() {
        let (kind, got) = parse_error(Config::default(), "a,b\n\"c,d\n");
        assert_eq!(kind, ParseErrorKind::UnterminatedQuote);
        assert_eq!(got, csv![["a", "b"]]);
    }

    #[test]
    fn separator_expected() {
        let mut parser = Parser::new(Config::default());
        let mut got = vec![];
        let err = parser
            .feed("x\n\"a\"b,c\n", |rec| got.push(rec))
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::SeparatorExpected { found: 'b' }
        );
        assert_eq!(err.position().byte(), 5);
        assert_eq!(err.position().line(), 2);
        assert_eq!(err.position().record(), 1);
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn separator_expected_across_chunks() {
        let mut parser = Parser::new(ConfigBuilder::new().escape('\\').build());
        parser.feed("\"a\"", |_| panic!("no record expected")).unwrap();
        let err = parser.feed("b", |_| {}).unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::SeparatorExpected { found: 'b' }
        );
    }

    #[test]
    fn poisoned_after_error() {
        let mut parser = Parser::new(Config::default());
        let err = parser.feed("\"a\"b", |_| {}).unwrap_err();
        let mut emitted = 0;
        assert_eq!(parser.feed("c,d\n", |_| emitted += 1), Err(err.clone()));
        assert_eq!(parser.finish(|_| emitted += 1), Err(err));
        assert_eq!(emitted, 0);

        parser.reset();
        assert_eq!(parser.records("c,d\n").unwrap(), vec![vec!["c", "d"]]);
    }

    // The escape lookahead is carried over the chunk boundary.
    #[test]
    fn escape_across_chunks() {
        let config = Config::default();
        let got = parse_chunks(config, &["\"a\"", "\"b\"", "\r", "\n"]);
        assert_eq!(got, csv![["a\"b"]]);

        let config = ConfigBuilder::new().escape('\\').build();
        let got = parse_chunks(config, &["\"a\\", "\"b\\", "\\\",c"]);
        assert_eq!(got, csv![["a\"b\\", "c"]]);
    }

    // A closing quote is only known to be one after seeing the next chunk.
    #[test]
    fn closing_quote_at_chunk_end() {
        let mut parser = Parser::new(Config::default());
        assert!(parser.records("\"abc\"").unwrap().is_empty());
        assert!(parser.state().has_pending_escape());
        assert!(parser.state().is_quoted());
        let mut got = vec![];
        parser.finish(|rec| got.push(rec)).unwrap();
        assert_eq!(got, vec![Record::from(vec!["abc".to_string()])]);
    }

    #[test]
    fn crlf_across_chunks() {
        let got = parse_chunks(Config::default(), &["a,b\r", "\nc,d\r", "\n"]);
        assert_eq!(got, csv![["a", "b"], ["c", "d"]]);
    }

    // Records are emitted as soon as their terminator is seen, not when
    // the next chunk arrives.
    #[test]
    fn push_order() {
        let mut parser = Parser::new(Config::default());
        assert_eq!(parser.records("a\nb\nc").unwrap(), vec![
            vec!["a"],
            vec!["b"]
        ]);
        assert_eq!(parser.state().open_field(), "c");
        assert_eq!(parser.records("\n").unwrap(), vec![vec!["c"]]);
    }

    #[test]
    fn every_split_point() {
        let data = "h1,\"h,2\"\r\n\"x\"\"y\",\"line\r\nbreak\"\r\n\
                    #note\r\nplain,é\r\n";
        let config = ConfigBuilder::new().comment(Some('#')).build();
        let whole = parse(config, data);
        assert_eq!(whole.len(), 3);
        let bounds: Vec<usize> =
            data.char_indices().map(|(i, _)| i).skip(1).collect();
        for &i in &bounds {
            assert_eq!(
                parse_chunks(config, &[&data[..i], &data[i..]]),
                whole,
                "split at {}",
                i
            );
            for &j in bounds.iter().filter(|&&j| j > i) {
                let chunks = [&data[..i], &data[i..j], &data[j..]];
                assert_eq!(parse_chunks(config, &chunks), whole);
            }
        }
    }

    #[test]
    fn state_transitions() {
        let config = ConfigBuilder::new().comment(Some('#')).build();
        let mut state = ParseState::new();
        assert_eq!(state.advance(&config, '#'), Ok(None));
        assert!(state.is_commented_line());
        assert!(!state.is_quoted());
        assert_eq!(state.advance(&config, '\n'), Ok(None));
        assert!(!state.is_commented_line());

        assert_eq!(state.advance(&config, '"'), Ok(None));
        assert!(state.is_quoted());
        assert_eq!(state.advance(&config, ','), Ok(None));
        assert_eq!(state.open_field(), ",");
        assert_eq!(state.advance(&config, '"'), Ok(None));
        assert!(state.has_pending_escape());
        assert_eq!(state.advance(&config, ','), Ok(None));
        assert!(!state.is_quoted());
        assert_eq!(state.open_record(), &[",".to_string()]);
        assert_eq!(state.last_char(), Some(','));
        let rec = state.advance(&config, '\r').unwrap().unwrap();
        assert_eq!(rec, vec![",", ""]);
        assert_eq!(state.advance(&config, '\n'), Ok(None));
        assert_eq!(state.finish(&config), Ok(None));
    }

    #[test]
    fn line_numbers() {
        let mut parser = Parser::new(Config::default());
        assert_eq!(parser.position().line(), 1);
        parser.feed("\n\n\n\n", |_| {}).unwrap();
        assert_eq!(parser.position().line(), 5);
        parser.feed("foo,\"bar\nbaz\"\n", |_| {}).unwrap();
        assert_eq!(parser.position().line(), 7);
        assert_eq!(parser.position().record(), 5);
        assert_eq!(parser.position().byte(), 18);
    }

    #[test]
    fn line_numbers_cr_and_crlf() {
        let mut parser = Parser::new(Config::default());
        parser.feed("a\rb\r", |_| {}).unwrap();
        assert_eq!(parser.position().line(), 3);
        parser.feed("c\r\nd\r", |_| {}).unwrap();
        assert_eq!(parser.position().line(), 5);
        // A CRLF pair split over two chunks is still one line break.
        parser.feed("e\r", |_| {}).unwrap();
        parser.feed("\n\"f\rg\"", |_| {}).unwrap();
        assert_eq!(parser.position().line(), 7);

        let err = Parser::new(Config::default())
            .feed("x\ry\r\"z\"!", |_| {})
            .unwrap_err();
        assert_eq!(err.position().line(), 3);
        assert_eq!(err.position().byte(), 7);
    }
}
