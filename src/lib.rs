#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 <div align="center">
   <h1>csv-columns</h1>
   <h3>Column-oriented CSV decoding for serde</h3>

   ![license](https://shields.io/badge/license-MIT%2FApache--2.0-blue)

  </div>

 # csv-columns

 Most CSV readers hand you one record per row. **csv-columns** turns the table
 on its side: every struct field is a whole column, decoded as a `Vec` with one
 entry per data row. This fits analysis code, charting and anything else that
 works on series rather than records.

 Decoding happens in two passes:

- **Parse:** a single-pass tokenizer splits the text into an immutable
  [`ParsedCsv`](parse::table::ParsedCsv). Quoting, escaping, trimming and all
  separators are configurable through
  [`ParserBuilder`](parse::tokenizer::ParserBuilder). Cells borrow from the
  input unless escapes had to be resolved.
- **Decode:** a [`CsvDecoder`](decode::decoder::CsvDecoder) walks the table
  through serde. Fields pick columns by header name (or by position when there
  is no header), and each cell is read strictly: `" 12"` is not an integer.

 ## Getting Started

```toml
[dependencies]
csv-columns = "<version>"
serde = { version = "1.0", features = ["derive"] }
```

Then:

```rust
use csv_columns::{BoolDecodingStrategy, CsvDecoder, CsvError, NilDecodingStrategy};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Deserialize)]
struct Trades<'a> {
    #[serde(borrow)]
    symbol: Vec<&'a str>,
    side: Vec<Side>,
    price: Vec<f64>,
    #[serde(rename = "filled")]
    is_filled: Vec<bool>,
    note: Vec<Option<String>>,
}

fn main() -> Result<(), CsvError> {
    let csv = "symbol;side;price;filled;note\n\
               ACME;Buy;12.5;1;\n\
               INIT;Sell;7;0;\"partial, retry\"";

    let decoder = CsvDecoder::builder()
        .column_separator(';')
        .nil_decoding_strategy(NilDecodingStrategy::Empty)
        .bool_decoding_strategy(BoolDecodingStrategy::ZeroOrOne)
        .build();

    let trades: Trades = decoder.decode(csv)?;

    assert_eq!(trades.symbol, vec!["ACME", "INIT"]);
    assert!(matches!(trades.side[1], Side::Sell));
    assert_eq!(trades.price, vec![12.5, 7.0]);
    assert_eq!(trades.is_filled, vec![true, false]);
    assert_eq!(trades.note, vec![None, Some("partial, retry".to_string())]);

    Ok(())
}
```

 ## Logging

 The crate logs through the [`log`](https://docs.rs/log) facade: a `debug!`
 line per parsed table and per decode, and `trace!` lines for field to column
 binding. Install any logger (for example `env_logger`) to see them.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

*/

/// Error types for parsing and decoding
pub mod error;

#[doc(inline)]
pub use error::*;

/// Tokenizer and the parsed table it produces
pub mod parse;

#[doc(inline)]
pub use parse::{
    table::{Cell, ColumnKey, ParsedCsv},
    tokenizer::ParserBuilder,
};

/// Serde decoding of parsed tables into column-oriented types
pub mod decode;

#[doc(inline)]
pub use decode::{
    cursor::ColumnCursor,
    decoder::{CsvDecoder, CsvDecoderBuilder, from_str},
    options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy},
};
