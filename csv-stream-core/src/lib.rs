/*!
`csv-stream-core` provides an incremental CSV parser and a record serializer
that do no I/O of their own.

The parser is a character level state machine. It accepts input in chunks
of any size, split at any character, and emits each record as soon as its
terminator has been seen. Everything needed to resume parsing in the middle
of a quoted field, an escape sequence or a CRLF pair is kept in a
`ParseState`.

Both the parser and the serializer are configured by a `Config`: a field
separator, a quote character, an escape character and an optional comment
character. The defaults are `,`, `"`, `"` and no comments, which is the
common dialect where a quote inside a quoted field is written twice.

# Example

```
use csv_stream_core::{ConfigBuilder, Parser};

let config = ConfigBuilder::new().comment(Some('#')).build();
let mut parser = Parser::new(config);
let mut records = vec![];
for chunk in &["#header\r\nci", "ty,pop\r\n\"Bos", "ton, MA\",4628910\r\n"] {
    parser.feed(chunk, |rec| records.push(rec)).unwrap();
}
parser.finish(|rec| records.push(rec)).unwrap();

assert_eq!(records, vec![
    vec!["city", "pop"],
    vec!["Boston, MA", "4628910"],
]);
```

A `csv_stream_core::Serializer` writes records in a form the parser reads
back unchanged:

```
use csv_stream_core::{Config, Parser, Serializer};

let config = Config::default();
let mut line = String::new();
Serializer::new(config).write_record(&["a,\"b\"", "c\r\nd"], &mut line);

let mut parser = Parser::new(config);
assert_eq!(parser.records(&line).unwrap(), vec![vec!["a,\"b\"", "c\r\nd"]]);
```
*/

#![deny(missing_docs)]

pub use crate::config::{Config, ConfigBuilder, Overrides};
pub use crate::parser::{
    ParseError, ParseErrorKind, ParseState, Parser, Position,
};
pub use crate::record::{Record, RecordIter};
pub use crate::writer::Serializer;

mod config;
mod parser;
mod record;
mod writer;
