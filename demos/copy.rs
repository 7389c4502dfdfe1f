// To run this example:
//
//   $ cargo run --example copy ';' < input.csv > output.csv
//
// Reads CSV from stdin and writes it to stdout with every field quoted,
// using the separator given as the first argument.
use std::env;
use std::error::Error;
use std::io;
use std::process;

use csv_stream::{Reader, WriterBuilder};

fn example() -> Result<(), Box<dyn Error>> {
    let separator = get_first_arg()?;
    let mut rdr = Reader::from_reader(io::stdin());
    let mut wtr = WriterBuilder::new()
        .separator(separator)
        .from_writer(io::BufWriter::new(io::stdout()));
    for result in rdr.records() {
        let record = result?;
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn get_first_arg() -> Result<char, Box<dyn Error>> {
    let arg = match env::args().nth(1) {
        Some(arg) => arg,
        None => return Err(From::from("expected 1 argument, but got none")),
    };
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(From::from(format!("not a single character: {:?}", arg))),
    }
}

fn main() {
    if let Err(err) = example() {
        println!("error running example: {}", err);
        process::exit(1);
    }
}
