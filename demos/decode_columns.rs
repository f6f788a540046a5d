use std::fmt;

use csv_columns::{
    BoolDecodingStrategy, ColumnCursor, ColumnKey, CsvDecoder, CsvError, NilDecodingStrategy,
};
use log::info;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy)]
enum Fuel {
    Petrol,
    Diesel,
    Electric,
}

#[derive(Deserialize, Debug)]
struct Cars<'a> {
    year: Vec<u16>,
    #[serde(borrow)]
    make: Vec<&'a str>,
    model: Vec<String>,
    fuel: Vec<Fuel>,
    #[serde(rename = "in stock")]
    in_stock: Vec<bool>,
    price: Vec<Option<f64>>,
}

impl fmt::Display for Cars<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.year.len() {
            writeln!(
                f,
                "(year={}, make={}, model={}, fuel={:?}, in_stock={}, price={:?})",
                self.year[row],
                self.make[row],
                self.model[row],
                self.fuel[row],
                self.in_stock[row],
                self.price[row]
            )?;
        }
        Ok(())
    }
}

fn main() -> Result<(), CsvError> {
    env_logger::init();

    let csv = "year;make;model;fuel;in stock;price
    1948;Porsche;356;Petrol;Y;-
    1967;Ford;\"Mustang \\\"fastback\\\"\";Petrol;N;31000
    2012;Tesla;Model S;Electric;Y;-";

    let decoder = CsvDecoder::builder()
        .column_separator(';')
        .nil_decoding_strategy(NilDecodingStrategy::Custom("-".to_string()))
        .bool_decoding_strategy(BoolDecodingStrategy::Custom {
            true_literal: "Y".to_string(),
            false_literal: "N".to_string(),
        })
        .build();

    let cars: Cars = decoder.decode(csv)?;
    info!("Decoded {} cars", cars.year.len());
    print!("{}", cars);

    // The same table can also be walked one column at a time
    let table = decoder.parser().parse(csv)?;
    let mut years = ColumnCursor::new(&table, ColumnKey::Name("year"), decoder.options())?;
    while !years.is_at_end() {
        let year: u16 = years.decode_numeric()?;
        info!("year {} at row {}", year, years.position() - 1);
    }

    Ok(())
}
