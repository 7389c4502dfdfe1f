// To run this example:
//
//   $ cargo run --example count path/to/data.csv
//
// Counts the records in a CSV file, skipping lines that start with `#`.
use std::env;
use std::error::Error;
use std::ffi::OsString;
use std::process;

use csv_stream::ReaderBuilder;

fn example() -> Result<(), Box<dyn Error>> {
    let file_path = get_first_arg()?;
    let mut rdr = ReaderBuilder::new()
        .comment(Some('#'))
        .buffer_capacity(64 * (1 << 10))
        .from_path(&file_path)?;
    let (mut records, mut fields) = (0u64, 0u64);
    rdr.for_each_record(|record| {
        records += 1;
        fields += record.len() as u64;
    })?;
    println!("{} records, {} fields", records, fields);
    Ok(())
}

fn get_first_arg() -> Result<OsString, Box<dyn Error>> {
    match env::args_os().nth(1) {
        Some(file_path) => Ok(file_path),
        None => Err(From::from("expected 1 argument, but got none")),
    }
}

fn main() {
    if let Err(err) = example() {
        println!("error running example: {}", err);
        process::exit(1);
    }
}
