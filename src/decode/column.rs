use serde::de::{Error as _, Visitor};

use crate::{
    decode::{
        cursor::{ColumnCursor, FixedLength},
        options::DecodeOptions,
        path::Path,
    },
    error::{CsvError, Result},
    parse::table::{ColumnKey, ParsedCsv},
};

/// Decodes one column as a sequence with one entry per data row.
pub(crate) struct ColumnDeserializer<'t, 'de> {
    table: &'t ParsedCsv<'de>,
    index: usize,
    label: ColumnKey<'t>,
    options: &'t DecodeOptions,
}

impl<'t, 'de> ColumnDeserializer<'t, 'de> {
    /// `index` must already be resolved; `label` names the column in errors.
    pub(crate) fn new(
        table: &'t ParsedCsv<'de>,
        index: usize,
        label: ColumnKey<'t>,
        options: &'t DecodeOptions,
    ) -> Self {
        Self {
            table,
            index,
            label,
            options,
        }
    }

    fn cursor(&self) -> ColumnCursor<'t, 'de> {
        ColumnCursor::from_column(self.label, self.table.column(self.index), self.options)
    }

    fn unsupported(&self, attempted_shape: &'static str) -> CsvError {
        CsvError::UnsupportedOperation {
            path: Path::Column(self.label).to_string(),
            attempted_shape,
        }
    }
}

impl<'de> serde::Deserializer<'de> for ColumnDeserializer<'_, 'de> {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(self.cursor())
    }

    /// Fixed-size targets must match the column exactly; leftover rows are an
    /// error rather than being dropped.
    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let mut cursor = self.cursor();
        let value = visitor.visit_seq(FixedLength::new(&mut cursor, len))?;
        if !cursor.is_at_end() {
            let expected = format!("{} data rows in column {}", len, Path::Column(self.label));
            return Err(CsvError::invalid_length(cursor.len(), &expected.as_str()));
        }
        Ok(value)
    }

    /// The column exists, otherwise this field would not have been visited.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    reject_shapes! {
        deserialize_bool() => "bool";
        deserialize_i8() => "i8";
        deserialize_i16() => "i16";
        deserialize_i32() => "i32";
        deserialize_i64() => "i64";
        deserialize_i128() => "i128";
        deserialize_u8() => "u8";
        deserialize_u16() => "u16";
        deserialize_u32() => "u32";
        deserialize_u64() => "u64";
        deserialize_u128() => "u128";
        deserialize_f32() => "f32";
        deserialize_f64() => "f64";
        deserialize_char() => "char";
        deserialize_str() => "str";
        deserialize_string() => "string";
        deserialize_bytes() => "bytes";
        deserialize_byte_buf() => "bytes";
        deserialize_unit() => "unit";
        deserialize_unit_struct(_name: &'static str) => "unit struct";
        deserialize_tuple_struct(_name: &'static str, _len: usize) => "tuple struct";
        deserialize_map() => "map";
        deserialize_struct(_name: &'static str, _fields: &'static [&'static str]) => "struct";
        deserialize_enum(_name: &'static str, _variants: &'static [&'static str]) => "enum";
        deserialize_identifier() => "identifier";
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::ColumnDeserializer;
    use crate::{
        decode::options::DecodeOptions,
        error::CsvError,
        parse::table::{ColumnKey, ParsedCsv},
    };

    fn decode<'de, T: Deserialize<'de>>(
        table: &ParsedCsv<'de>,
        index: usize,
    ) -> Result<T, CsvError> {
        let options = DecodeOptions::default();
        let label = ColumnKey::Index(index);
        T::deserialize(ColumnDeserializer::new(table, index, label, &options))
    }

    #[test]
    fn column_decodes_as_vec() {
        let table = ParsedCsv::parse("a,b\n1,x\n2,y").unwrap();

        assert_eq!(decode::<Vec<u8>>(&table, 0), Ok(vec![1, 2]));
        assert_eq!(decode::<Vec<&str>>(&table, 1), Ok(vec!["x", "y"]));
    }

    #[test]
    fn fixed_size_array_needs_enough_rows() {
        let table = ParsedCsv::parse("a\n1\n2").unwrap();

        assert_eq!(decode::<[u8; 2]>(&table, 0), Ok([1, 2]));
        assert_eq!(
            decode::<[u8; 3]>(&table, 0),
            Err(CsvError::ValueNotFound {
                path: "0[2]".to_string(),
                target_type: "u8",
            })
        );
    }

    #[test]
    fn fixed_size_array_rejects_extra_rows() {
        let table = ParsedCsv::parse("a\n1\n2").unwrap();

        assert_eq!(
            decode::<[u8; 1]>(&table, 0),
            Err(CsvError::Message(
                "invalid length 2, expected 1 data rows in column 0".to_string()
            ))
        );
        assert!(decode::<(u8, u8)>(&table, 0).is_ok());
    }

    #[test]
    fn scalar_in_place_of_column_is_unsupported() {
        let table = ParsedCsv::parse("a\n1").unwrap();

        assert_eq!(
            decode::<u8>(&table, 0),
            Err(CsvError::UnsupportedOperation {
                path: "0".to_string(),
                attempted_shape: "u8",
            })
        );
    }

    #[test]
    fn nested_sequences_are_unsupported() {
        let table = ParsedCsv::parse("a\n1").unwrap();

        assert!(matches!(
            decode::<Vec<Vec<u8>>>(&table, 0),
            Err(CsvError::UnsupportedOperation {
                attempted_shape: "sequence",
                ..
            })
        ));
    }
}
