/*!
The `csv-stream` crate provides a streaming CSV reader and writer.

Input is consumed in chunks of any size and records are produced as soon as
their line terminator has been read. The result never depends on where the
input happens to be split, whether inside a quoted field, between an escape
character and the character it escapes, between `\r` and `\n` or in the
middle of a multi-byte UTF-8 sequence.

The dialect is described by four characters: a separator (default `,`), a
quote (default `"`), an escape (default `"`, so embedded quotes are doubled)
and an optional comment character. Lines starting with the comment
character are skipped. The writer quotes every field and ends every record
with `\r\n`.

# Reading

```
use csv_stream::ReaderBuilder;

# fn main() -> csv_stream::Result<()> {
let data = "\
#city,population
\"Boston, MA\",4628910
Concord,42695
";
let mut rdr = ReaderBuilder::new()
    .comment(Some('#'))
    .from_reader(data.as_bytes());
let mut cities = vec![];
for result in rdr.records() {
    let record = result?;
    cities.push(record[0].to_string());
}
assert_eq!(cities, vec!["Boston, MA", "Concord"]);
# Ok(())
# }
```

# Writing

```
use csv_stream::WriterBuilder;

# fn main() -> csv_stream::Result<()> {
let mut wtr = WriterBuilder::new().separator(';').from_writer(vec![]);
wtr.write_record(&["a;b", "c"])?;
let data = String::from_utf8(wtr.into_inner()?).unwrap();
assert_eq!(data, "\"a;b\";\"c\"\r\n");
# Ok(())
# }
```

# Options

Readers and writers may also be configured from an [`Options`] value,
which with the `serde` feature can be deserialized from a configuration
file. See its documentation for details.

# Crate features

* `serde` (default) enables [`Writer::serialize`] and deserialization of
  [`Options`].

The parser and serializer themselves live in the `csv-stream-core` crate,
which does no I/O and is re-exported here.
*/

#![deny(missing_docs)]

pub use csv_stream_core::{
    Config, ConfigBuilder, Overrides, ParseError, ParseErrorKind, ParseState,
    Parser, Position, Record, RecordIter, Serializer,
};

pub use crate::encoding::{Encoding, UnknownEncoding};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::options::Options;
pub use crate::reader::{Reader, ReaderBuilder, RecordsIntoIter, RecordsIter};
pub use crate::writer::{Writer, WriterBuilder};

mod encoding;
mod error;
mod options;
mod reader;
#[cfg(feature = "serde")]
mod serializer;
mod writer;
