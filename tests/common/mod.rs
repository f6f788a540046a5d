#![allow(dead_code)]

use std::error::Error;

use csv::ReaderBuilder;
use csv_columns::ParsedCsv;

/// Routes the crate's `log` output through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every row of `table`, header included, as owned strings.
pub fn rows(table: &ParsedCsv<'_>) -> Vec<Vec<String>> {
    (0..table.row_count())
        .map(|row| {
            (0..table.column_count())
                .map(|column| table.cell(row, column).unwrap_or_default().to_string())
                .collect()
        })
        .collect()
}

/// Reads `input` with the `csv` crate, treating every line as a record.
pub fn reference_rows(input: &str, delimiter: u8) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(String::from).collect());
    }
    Ok(rows)
}
