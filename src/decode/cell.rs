use std::{any::type_name, borrow::Cow, str::FromStr};

use serde::de::{
    IntoDeserializer, Visitor,
    value::{BorrowedStrDeserializer, StrDeserializer},
};

use crate::{
    decode::{options::DecodeOptions, path::Path},
    error::{CsvError, Result},
    parse::table::Cell,
};

/// Parses the whole of `text` as `T`, reporting the raw text and target type
/// on failure.
pub(crate) fn parse_cell<T: FromStr>(text: &str, path: Path<'_>) -> Result<T> {
    text.parse::<T>().map_err(|_| mismatch(text, path, type_name::<T>()))
}

pub(crate) fn mismatch(text: &str, path: Path<'_>, target_type: &'static str) -> CsvError {
    CsvError::TypeMismatch {
        path: path.to_string(),
        raw_text: text.to_owned(),
        target_type,
    }
}

/// Decodes exactly one cell.
///
/// This is the terminal level of the traversal: scalars, `Option`, newtypes
/// and unit-variant enums read from the cell text. Anything keyed or
/// sequential is rejected.
pub(crate) struct CellDeserializer<'t, 'de> {
    cell: &'t Cell<'de>,
    path: Path<'t>,
    options: &'t DecodeOptions,
}

impl<'t, 'de> CellDeserializer<'t, 'de> {
    pub(crate) fn new(cell: &'t Cell<'de>, path: Path<'t>, options: &'t DecodeOptions) -> Self {
        Self {
            cell,
            path,
            options,
        }
    }

    fn text(&self) -> &'t str {
        self.cell.as_ref()
    }

    fn visit_text<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.cell {
            Cow::Borrowed(text) => visitor.visit_borrowed_str(*text),
            Cow::Owned(text) => visitor.visit_str(text),
        }
    }

    fn is_nil(&self) -> bool {
        self.options.is_nil(self.text())
    }

    fn unsupported(&self, attempted_shape: &'static str) -> CsvError {
        CsvError::UnsupportedOperation {
            path: self.path.to_string(),
            attempted_shape,
        }
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(parse_cell(self.text(), self.path)?)
            }
        )*
    };
}

impl<'de> serde::Deserializer<'de> for CellDeserializer<'_, 'de> {
    type Error = CsvError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_text(visitor)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.options.parse_bool(self.text()) {
            Some(value) => visitor.visit_bool(value),
            None => Err(mismatch(self.text(), self.path, "bool")),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let mut chars = self.text().chars();
        match (chars.next(), chars.next()) {
            (Some(character), None) => visitor.visit_char(character),
            _ => Err(mismatch(self.text(), self.path, "char")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_text(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_text(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.cell {
            Cow::Borrowed(text) => visitor.visit_borrowed_bytes((*text).as_bytes()),
            Cow::Owned(text) => visitor.visit_bytes(text.as_bytes()),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.is_nil() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.text().is_empty() || self.is_nil() {
            visitor.visit_unit()
        } else {
            Err(mismatch(self.text(), self.path, "()"))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(self.unsupported("sequence"))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(self.unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported("tuple struct"))
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(self.unsupported("map"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported("struct"))
    }

    /// Unit variants only, matched on the cell text.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.cell {
            Cow::Borrowed(text) => visitor.visit_enum(BorrowedStrDeserializer::<CsvError>::new(*text)),
            Cow::Owned(text) => {
                let variant: StrDeserializer<'_, CsvError> = text.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_text(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use serde::Deserialize;

    use super::{CellDeserializer, parse_cell};
    use crate::{
        decode::{
            options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy},
            path::Path,
        },
        error::CsvError,
        parse::table::{Cell, ColumnKey},
    };

    const PATH: Path<'static> = Path::Cell {
        column: ColumnKey::Name("value"),
        row: 0,
    };

    fn decode<'de, T: Deserialize<'de>>(
        cell: &Cell<'de>,
        options: &DecodeOptions,
    ) -> Result<T, CsvError> {
        T::deserialize(CellDeserializer::new(cell, PATH, options))
    }

    #[test]
    fn parse_cell_is_strict() {
        assert_eq!(parse_cell::<i32>("42", PATH), Ok(42));
        assert_eq!(
            parse_cell::<i32>("42abc", PATH),
            Err(CsvError::TypeMismatch {
                path: "value[0]".to_string(),
                raw_text: "42abc".to_string(),
                target_type: "i32",
            })
        );
        assert!(parse_cell::<u8>(" 1", PATH).is_err());
        assert!(parse_cell::<u8>("256", PATH).is_err());
    }

    #[test]
    fn numbers_of_every_width() {
        let options = DecodeOptions::default();

        assert_eq!(decode::<i8>(&Cow::Borrowed("-8"), &options), Ok(-8));
        assert_eq!(decode::<u16>(&Cow::Borrowed("65535"), &options), Ok(65535));
        assert_eq!(
            decode::<i128>(&Cow::Borrowed("-170141183460469231731687303715884105728"), &options),
            Ok(i128::MIN)
        );
        assert_eq!(decode::<f32>(&Cow::Borrowed("4"), &options), Ok(4.0));
        assert_eq!(decode::<f64>(&Cow::Borrowed("2.5e3"), &options), Ok(2500.0));
    }

    #[test]
    fn bool_uses_configured_literals() {
        let options = DecodeOptions::new(
            &NilDecodingStrategy::default(),
            &BoolDecodingStrategy::ZeroOrOne,
        );

        assert_eq!(decode::<bool>(&Cow::Borrowed("1"), &options), Ok(true));
        assert_eq!(decode::<bool>(&Cow::Borrowed("0"), &options), Ok(false));
        assert_eq!(
            decode::<bool>(&Cow::Borrowed("true"), &options),
            Err(CsvError::TypeMismatch {
                path: "value[0]".to_string(),
                raw_text: "true".to_string(),
                target_type: "bool",
            })
        );
    }

    #[test]
    fn option_checks_nil_literal() {
        let options = DecodeOptions::new(&NilDecodingStrategy::Null, &BoolDecodingStrategy::default());

        assert_eq!(decode::<Option<u8>>(&Cow::Borrowed("null"), &options), Ok(None));
        assert_eq!(decode::<Option<u8>>(&Cow::Borrowed("7"), &options), Ok(Some(7)));
        assert_eq!(
            decode::<Option<String>>(&Cow::Borrowed(""), &options),
            Ok(Some(String::new()))
        );
    }

    #[test]
    fn borrowed_cells_decode_to_borrowed_str() {
        let options = DecodeOptions::default();
        let cell: Cell<'_> = Cow::Borrowed("zero-copy");

        let text: &str = decode(&cell, &options).unwrap();

        assert_eq!(text, "zero-copy");
    }

    #[test]
    fn char_needs_exactly_one_character() {
        let options = DecodeOptions::default();

        assert_eq!(decode::<char>(&Cow::Borrowed("é"), &options), Ok('é'));
        assert!(decode::<char>(&Cow::Borrowed("ab"), &options).is_err());
        assert!(decode::<char>(&Cow::Borrowed(""), &options).is_err());
    }

    #[test]
    fn unit_variant_enums_read_cell_text() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Level {
            Low,
            High,
        }
        let options = DecodeOptions::default();
        let owned: Cell<'_> = Cow::Owned("high".to_string());

        assert_eq!(decode::<Level>(&Cow::Borrowed("low"), &options), Ok(Level::Low));
        assert_eq!(decode::<Level>(&owned, &options), Ok(Level::High));
        assert!(decode::<Level>(&Cow::Borrowed("medium"), &options).is_err());
    }

    #[test]
    fn newtypes_wrap_scalars() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Celsius(f64);
        let options = DecodeOptions::default();

        assert_eq!(
            decode::<Celsius>(&Cow::Borrowed("21.5"), &options),
            Ok(Celsius(21.5))
        );
    }

    #[test]
    fn containers_inside_a_cell_are_unsupported() {
        let options = DecodeOptions::default();

        assert_eq!(
            decode::<Vec<u8>>(&Cow::Borrowed("1"), &options),
            Err(CsvError::UnsupportedOperation {
                path: "value[0]".to_string(),
                attempted_shape: "sequence",
            })
        );
        assert!(matches!(
            decode::<std::collections::HashMap<String, String>>(&Cow::Borrowed("1"), &options),
            Err(CsvError::UnsupportedOperation { .. })
        ));
    }
}
