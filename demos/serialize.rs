use std::error::Error;
use std::io;
use std::process;

use csv_stream::Writer;

fn example() -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(io::stdout());

    // Records are sequences. Tuples of mixed types work, and `None` becomes
    // an empty field.
    wtr.serialize(("City", "State", "Population", "Latitude", "Longitude"))?;
    wtr.serialize((
        "Davidsons Landing",
        "AK",
        None::<u64>,
        65.2419444,
        -165.2716667,
    ))?;
    wtr.serialize(("Kenai", "AK", Some(7610u64), 60.5544444, -151.2583333))?;
    wtr.serialize(("Oakman", "AL", None::<u64>, 33.7133333, -87.3886111))?;

    wtr.flush()?;
    Ok(())
}

fn main() {
    if let Err(err) = example() {
        println!("{}", err);
        process::exit(1);
    }
}
