#![no_main]
use libfuzzer_sys::fuzz_target;

use csv_stream::{Config, Parser, Record, Serializer};

fn parse(chunks: &[&str]) -> Result<Vec<Record>, csv_stream::ParseError> {
    let mut parser = Parser::new(Config::default());
    let mut records = vec![];
    for chunk in chunks {
        parser.feed(chunk, |rec| records.push(rec))?;
    }
    parser.finish(|rec| records.push(rec))?;
    Ok(records)
}

fuzz_target!(|data: &[u8]| {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return,
    };

    // Splitting the input anywhere must not change the outcome.
    let whole = parse(&[text]);
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let split = parse(&[&text[..mid], &text[mid..]]);
    assert_eq!(whole.is_ok(), split.is_ok());

    // Whatever parses must survive a write and read back, except blank
    // lines: an empty record writes nothing at all.
    if let (Ok(whole), Ok(split)) = (whole, split) {
        assert_eq!(whole, split);
        let ser = Serializer::default();
        let mut out = String::new();
        for rec in &whole {
            let before = out.len();
            assert_eq!(ser.write_record(rec, &mut out), rec.len());
            assert_eq!(out.len() == before, rec.is_empty());
        }
        let again = parse(&[out.as_str()]).unwrap();
        let expected: Vec<&Record> =
            whole.iter().filter(|rec| !rec.is_empty()).collect();
        assert_eq!(again.iter().collect::<Vec<_>>(), expected);
    }
});
