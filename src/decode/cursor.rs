use std::{any::type_name, marker::PhantomData, str::FromStr};

use serde::de::{Deserialize, DeserializeSeed, SeqAccess};

use crate::{
    decode::{
        cell::{CellDeserializer, mismatch, parse_cell},
        options::DecodeOptions,
        path::Path,
    },
    error::{CsvError, Result},
    parse::table::{Cell, ColumnKey, ParsedCsv},
};

/// A position within one column's cells, used while decoding one field.
///
/// Every `decode_*` call reads the current cell and moves to the next one.
/// Reading past the last cell is a [`CsvError::ValueNotFound`] rather than a
/// default value.
///
/// # Examples
///
/// ```
/// use csv_columns::decode::cursor::ColumnCursor;
/// use csv_columns::decode::options::DecodeOptions;
/// use csv_columns::parse::table::{ColumnKey, ParsedCsv};
///
/// let table = ParsedCsv::parse("id,active\n1,true\n2,false").unwrap();
/// let options = DecodeOptions::default();
///
/// let mut active = ColumnCursor::new(&table, ColumnKey::Name("active"), &options).unwrap();
/// assert_eq!(active.decode_bool().unwrap(), true);
/// assert_eq!(active.decode_bool().unwrap(), false);
/// assert!(active.is_at_end());
/// assert!(active.decode_bool().is_err());
///
/// let mut ids = ColumnCursor::new(&table, ColumnKey::Index(0), &options).unwrap();
/// assert_eq!(ids.decode_numeric::<u32>().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct ColumnCursor<'t, 'de> {
    key: ColumnKey<'t>,
    column: Vec<&'t Cell<'de>>,
    position: usize,
    options: &'t DecodeOptions,
}

impl<'t, 'de> ColumnCursor<'t, 'de> {
    /// Opens a cursor on the column addressed by `key`.
    pub fn new(
        table: &'t ParsedCsv<'de>,
        key: ColumnKey<'t>,
        options: &'t DecodeOptions,
    ) -> Result<Self> {
        let column = table.column_by_key(key)?;
        Ok(Self::from_column(key, column, options))
    }

    pub(crate) fn from_column(
        key: ColumnKey<'t>,
        column: Vec<&'t Cell<'de>>,
        options: &'t DecodeOptions,
    ) -> Self {
        Self {
            key,
            column,
            position: 0,
            options,
        }
    }

    /// The key the cursor was opened with, used to label error paths.
    pub fn key(&self) -> ColumnKey<'t> {
        self.key
    }

    /// Number of data cells in the column, whatever the position.
    pub fn len(&self) -> usize {
        self.column.len()
    }

    /// Whether the column has no data cells, as in a header-only table.
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    /// Zero-based data row of the next cell to decode.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{ColumnCursor, ColumnKey, DecodeOptions, ParsedCsv};
    ///
    /// let table = ParsedCsv::parse("a\nx\ny").unwrap();
    /// let options = DecodeOptions::default();
    /// let mut cursor = ColumnCursor::new(&table, ColumnKey::Index(0), &options).unwrap();
    ///
    /// assert_eq!(cursor.position(), 0);
    /// cursor.decode_str().unwrap();
    /// assert_eq!(cursor.position(), 1);
    /// ```
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every cell has been decoded.
    ///
    /// Failed decodes do not advance, so a cursor stuck on a bad cell is
    /// never at its end.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.column.len()
    }

    fn path(&self) -> Path<'t> {
        Path::Cell {
            column: self.key,
            row: self.position,
        }
    }

    fn current(&self, target_type: &'static str) -> Result<&'t Cell<'de>> {
        self.column
            .get(self.position)
            .copied()
            .ok_or_else(|| CsvError::ValueNotFound {
                path: self.path().to_string(),
                target_type,
            })
    }

    /// Whether the current cell is the nil literal.
    pub fn decode_nil(&mut self) -> Result<bool> {
        let cell = self.current("nil")?;
        let is_nil = self.options.is_nil(cell);
        self.position += 1;
        Ok(is_nil)
    }

    /// Decodes the current cell with the configured boolean literals.
    ///
    /// # Errors
    ///
    /// [`CsvError::TypeMismatch`] when the text is neither literal, and
    /// [`CsvError::ValueNotFound`] past the last cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{BoolDecodingStrategy, ColumnCursor, ColumnKey, CsvError};
    /// use csv_columns::{DecodeOptions, NilDecodingStrategy, ParsedCsv};
    ///
    /// let table = ParsedCsv::parse("flag\n1\nyes").unwrap();
    /// let options = DecodeOptions::new(&NilDecodingStrategy::Empty, &BoolDecodingStrategy::ZeroOrOne);
    /// let mut flags = ColumnCursor::new(&table, ColumnKey::Name("flag"), &options).unwrap();
    ///
    /// assert_eq!(flags.decode_bool(), Ok(true));
    /// assert!(matches!(flags.decode_bool(), Err(CsvError::TypeMismatch { .. })));
    /// ```
    pub fn decode_bool(&mut self) -> Result<bool> {
        let cell = self.current("bool")?;
        let value = self
            .options
            .parse_bool(cell)
            .ok_or_else(|| mismatch(cell, self.path(), "bool"))?;
        self.position += 1;
        Ok(value)
    }

    /// The current cell's text, verbatim.
    pub fn decode_str(&mut self) -> Result<&'t str> {
        let cell = self.current("str")?;
        self.position += 1;
        Ok(cell.as_ref())
    }

    /// Parses the current cell as `T` using its whole text.
    pub fn decode_numeric<T: FromStr>(&mut self) -> Result<T> {
        let cell = self.current(type_name::<T>())?;
        let value = parse_cell(cell, self.path())?;
        self.position += 1;
        Ok(value)
    }

    /// Decodes the current cell as any `Deserialize` type, with the cursor's
    /// literal options.
    pub fn decode<T: Deserialize<'de>>(&mut self) -> Result<T> {
        self.decode_seed(PhantomData)
    }

    /// Decodes the current cell through a [`DeserializeSeed`].
    ///
    /// The cell is handed to the same per-cell deserializer that backs
    /// `Vec<T>` fields, so strictness and literals match struct decoding.
    pub fn decode_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<S::Value> {
        let cell = self.current(type_name::<S::Value>())?;
        let value = seed.deserialize(CellDeserializer::new(cell, self.path(), self.options))?;
        self.position += 1;
        Ok(value)
    }
}

impl<'de> SeqAccess<'de> for ColumnCursor<'_, 'de> {
    type Error = CsvError;

    fn next_element_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<Option<S::Value>> {
        if self.is_at_end() {
            return Ok(None);
        }
        self.decode_seed(seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.column.len() - self.position)
    }
}

/// Reads exactly `remaining` cells, for fixed-size targets such as arrays.
///
/// Unlike the plain cursor, a column that runs out early is an error.
pub(crate) struct FixedLength<'c, 't, 'de> {
    cursor: &'c mut ColumnCursor<'t, 'de>,
    remaining: usize,
}

impl<'c, 't, 'de> FixedLength<'c, 't, 'de> {
    pub(crate) fn new(cursor: &'c mut ColumnCursor<'t, 'de>, len: usize) -> Self {
        Self {
            cursor,
            remaining: len,
        }
    }
}

impl<'de> SeqAccess<'de> for FixedLength<'_, '_, 'de> {
    type Error = CsvError;

    fn next_element_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<Option<S::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.cursor.decode_seed(seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnCursor;
    use crate::{
        decode::options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy},
        error::CsvError,
        parse::table::{ColumnKey, ParsedCsv},
    };

    #[test]
    fn decode_nil_advances_and_compares() {
        let table = ParsedCsv::parse("a\n1\n\n3").unwrap();
        let options = DecodeOptions::default();
        let mut cursor = ColumnCursor::new(&table, ColumnKey::Name("a"), &options).unwrap();

        assert_eq!(cursor.len(), 3);
        assert!(!cursor.decode_nil().unwrap());
        assert!(cursor.decode_nil().unwrap());
        assert!(!cursor.decode_nil().unwrap());
        assert!(cursor.is_at_end());
    }

    #[test]
    fn never_strategy_has_no_nil() {
        let table = ParsedCsv::parse("a\n1\n\n3").unwrap();
        let options = DecodeOptions::new(&NilDecodingStrategy::Never, &BoolDecodingStrategy::default());
        let mut cursor = ColumnCursor::new(&table, ColumnKey::Index(0), &options).unwrap();

        cursor.decode_str().unwrap();
        assert!(!cursor.decode_nil().unwrap());
    }

    #[test]
    fn decode_past_end_is_value_not_found() {
        let table = ParsedCsv::parse("count\n1").unwrap();
        let options = DecodeOptions::default();
        let mut cursor = ColumnCursor::new(&table, ColumnKey::Name("count"), &options).unwrap();

        assert_eq!(cursor.decode_numeric::<u64>(), Ok(1));
        assert_eq!(
            cursor.decode_numeric::<u64>(),
            Err(CsvError::ValueNotFound {
                path: "count[1]".to_string(),
                target_type: "u64",
            })
        );
        assert!(matches!(
            cursor.decode_nil(),
            Err(CsvError::ValueNotFound { target_type: "nil", .. })
        ));
    }

    #[test]
    fn decode_bool_reports_raw_text() {
        let table = ParsedCsv::parse("flag\nyes").unwrap();
        let options = DecodeOptions::default();
        let mut cursor = ColumnCursor::new(&table, ColumnKey::Name("flag"), &options).unwrap();

        assert_eq!(
            cursor.decode_bool(),
            Err(CsvError::TypeMismatch {
                path: "flag[0]".to_string(),
                raw_text: "yes".to_string(),
                target_type: "bool",
            })
        );
    }

    #[test]
    fn decode_compound_uses_inherited_options() {
        let table = ParsedCsv::parse("score\nnull\n12").unwrap();
        let options = DecodeOptions::new(&NilDecodingStrategy::Null, &BoolDecodingStrategy::default());
        let mut cursor = ColumnCursor::new(&table, ColumnKey::Name("score"), &options).unwrap();

        assert_eq!(cursor.decode::<Option<i16>>(), Ok(None));
        assert_eq!(cursor.decode::<Option<i16>>(), Ok(Some(12)));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn unknown_column_is_key_not_found() {
        let table = ParsedCsv::parse("a\n1").unwrap();
        let options = DecodeOptions::default();

        assert_eq!(
            ColumnCursor::new(&table, ColumnKey::Name("b"), &options).unwrap_err(),
            CsvError::KeyNotFound {
                key: "b".to_string()
            }
        );
    }
}
