use std::{iter::Enumerate, slice::Iter};

use log::trace;
use serde::{
    de::{DeserializeSeed, MapAccess, SeqAccess, Visitor, value::BorrowedStrDeserializer},
    forward_to_deserialize_any,
};

use crate::{
    decode::{
        cell::CellDeserializer, column::ColumnDeserializer, options::DecodeOptions, path::Path,
    },
    error::{CsvError, Result},
    parse::table::{ColumnKey, ParsedCsv},
};

/// Entry point of a decode: the whole table seen as a keyed container of
/// columns.
pub(crate) struct TableDeserializer<'t, 'de> {
    table: &'t ParsedCsv<'de>,
    options: &'t DecodeOptions,
}

impl<'t, 'de> TableDeserializer<'t, 'de> {
    pub(crate) fn new(table: &'t ParsedCsv<'de>, options: &'t DecodeOptions) -> Self {
        Self { table, options }
    }

    fn unsupported(&self, attempted_shape: &'static str) -> CsvError {
        CsvError::UnsupportedOperation {
            path: Path::Root.to_string(),
            attempted_shape,
        }
    }

    fn columns(self) -> ColumnAccess<'t, 'de> {
        ColumnAccess {
            table: self.table,
            options: self.options,
            next: 0,
            pending: None,
        }
    }
}

impl<'de> serde::Deserializer<'de> for TableDeserializer<'_, 'de> {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_map(self.columns())
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_map(self.columns())
    }

    /// Binds declared fields to columns: by header name, or by declaration
    /// order when the table has no header row.
    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_map(FieldAccess {
            table: self.table,
            options: self.options,
            fields: fields.iter().enumerate(),
            pending: None,
        })
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(PositionalAccess {
            table: self.table,
            options: self.options,
            next: 0,
            len,
        })
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
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
        deserialize_option() => "option";
        deserialize_unit() => "unit";
        deserialize_unit_struct(_name: &'static str) => "unit struct";
        deserialize_seq() => "sequence";
        deserialize_enum(_name: &'static str, _variants: &'static [&'static str]) => "enum";
        deserialize_identifier() => "identifier";
    }
}

/// Walks a struct's declared fields, handing only present columns to the
/// visitor so that serde's missing-field handling applies to the rest.
struct FieldAccess<'t, 'de> {
    table: &'t ParsedCsv<'de>,
    options: &'t DecodeOptions,
    fields: Enumerate<Iter<'static, &'static str>>,
    pending: Option<(usize, ColumnKey<'t>)>,
}

impl<'de> MapAccess<'de> for FieldAccess<'_, 'de> {
    type Error = CsvError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        for (position, &field) in self.fields.by_ref() {
            let key = if self.table.has_header_row() {
                ColumnKey::Name(field)
            } else {
                ColumnKey::Index(position)
            };
            if !self.table.contains(key) {
                trace!("No column for field '{}', leaving it unset", field);
                continue;
            }
            let index = self.table.resolve(key)?;
            trace!("Field '{}' reads column {}", field, index);
            self.pending = Some((index, key));
            return seed
                .deserialize(BorrowedStrDeserializer::<CsvError>::new(field))
                .map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (index, label) = self
            .pending
            .take()
            .ok_or_else(|| CsvError::Message("field value requested before its key".to_string()))?;
        seed.deserialize(ColumnDeserializer::new(self.table, index, label, self.options))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.table.column_count())
    }
}

/// Yields every column as a map entry, keyed by header name or, without a
/// header row, by position.
struct ColumnAccess<'t, 'de> {
    table: &'t ParsedCsv<'de>,
    options: &'t DecodeOptions,
    next: usize,
    pending: Option<(usize, ColumnKey<'t>)>,
}

impl<'de> MapAccess<'de> for ColumnAccess<'_, 'de> {
    type Error = CsvError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let index = self.next;
        if index >= self.table.column_count() {
            return Ok(None);
        }
        self.next += 1;

        match self.table.header_cell(index) {
            Some(name) => {
                self.pending = Some((index, ColumnKey::Name(name.as_ref())));
                let path = Path::Column(ColumnKey::Index(index));
                seed.deserialize(CellDeserializer::new(name, path, self.options))
                    .map(Some)
            }
            None => {
                self.pending = Some((index, ColumnKey::Index(index)));
                seed.deserialize(IndexKey(index)).map(Some)
            }
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (index, label) = self
            .pending
            .take()
            .ok_or_else(|| CsvError::Message("column value requested before its key".to_string()))?;
        seed.deserialize(ColumnDeserializer::new(self.table, index, label, self.options))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.table.column_count() - self.next)
    }
}

/// Binds tuple elements to columns by position.
struct PositionalAccess<'t, 'de> {
    table: &'t ParsedCsv<'de>,
    options: &'t DecodeOptions,
    next: usize,
    len: usize,
}

impl<'de> SeqAccess<'de> for PositionalAccess<'_, 'de> {
    type Error = CsvError;

    fn next_element_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<Option<S::Value>> {
        if self.next >= self.len {
            return Ok(None);
        }
        let index = self.table.resolve(ColumnKey::Index(self.next))?;
        self.next += 1;
        let label = match self.table.header_cell(index) {
            Some(name) => ColumnKey::Name(name.as_ref()),
            None => ColumnKey::Index(index),
        };
        seed.deserialize(ColumnDeserializer::new(self.table, index, label, self.options))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.next)
    }
}

/// A column position used as a map key: an integer, or its decimal text when
/// the key type wants a string.
struct IndexKey(usize);

impl<'de> serde::Deserializer<'de> for IndexKey {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.0 as u64)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.0.to_string())
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char bytes byte_buf
        option unit unit_struct newtype_struct seq tuple tuple_struct map struct
        enum ignored_any
    }
}
