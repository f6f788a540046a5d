//! Decoding a parsed table into caller types through serde.
//!
//! The traversal has three levels:
//!
//! 1. **Field selection**: the root is a keyed container. Struct fields
//!    resolve to columns by header name, or by declaration order when the
//!    table has no header row.
//! 2. **Column sequence**: each field is a sequence with one entry per data
//!    row, read through a [`ColumnCursor`](cursor::ColumnCursor).
//! 3. **Scalar**: each entry decodes from one cell's text, using the nil and
//!    boolean literals of [`DecodeOptions`](options::DecodeOptions).
//!
//! Any other shape (a bare scalar at the root, a nested sequence inside a
//! cell, a struct in place of a column) fails with
//! [`CsvError::UnsupportedOperation`](crate::error::CsvError::UnsupportedOperation).
//!
//! A field whose column does not exist is never handed to serde, so an
//! `Option` field is left as `None` and `#[serde(default)]` applies.
//!
//! # Examples
//!
//! ```
//! use csv_columns::decode::decoder::CsvDecoder;
//! use csv_columns::decode::options::NilDecodingStrategy;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Readings {
//!     sensor: Vec<String>,
//!     celsius: Vec<Option<f32>>,
//!     calibrated: Option<Vec<bool>>,
//! }
//!
//! let csv = "sensor,celsius\nkitchen,21.5\ngarage,null";
//!
//! let decoder = CsvDecoder::builder()
//!     .nil_decoding_strategy(NilDecodingStrategy::Null)
//!     .build();
//! let readings: Readings = decoder.decode(csv).unwrap();
//!
//! assert_eq!(readings.sensor, vec!["kitchen", "garage"]);
//! assert_eq!(readings.celsius, vec![Some(21.5), None]);
//! assert!(readings.calibrated.is_none());
//! ```

/// Generates `deserialize_*` methods that reject their shape at this level.
macro_rules! reject_shapes {
    ($($method:ident($($arg:ident: $ty:ty),*) => $shape:literal;)*) => {
        $(
            fn $method<V: serde::de::Visitor<'de>>(
                self,
                $($arg: $ty,)*
                _visitor: V,
            ) -> crate::error::Result<V::Value> {
                Err(self.unsupported($shape))
            }
        )*
    };
}

/// Single-cell decoding and the strict scalar parser.
mod cell;

/// Column-level decoding into sequences.
mod column;

/// The per-field cursor over a column's cells.
pub mod cursor;

/// The public decoder and its builder.
pub mod decoder;

/// Nil and boolean literal strategies.
pub mod options;

mod path;

/// The table-level entry point of the traversal.
mod root;
