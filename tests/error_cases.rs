mod common;

use std::error::Error;

use common::init_logger;
use csv_columns::{CsvDecoder, CsvDecoderBuilder, CsvError, ParsedCsv, ParserBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Single {
    value: Vec<i32>,
}

#[test]
fn character_after_quoted_cell() {
    init_logger();

    let error = ParsedCsv::parse("value\n\"1\"2").unwrap_err();

    assert_eq!(
        error,
        CsvError::CharacterAfterQuotedCell {
            character: '2',
            offset: 9
        }
    );
    assert_eq!(
        error.to_string(),
        "unexpected character '2' after quoted cell at byte 9"
    );
}

#[test]
fn unterminated_quote() {
    let error = CsvDecoder::new()
        .decode::<Single>("value\n\"1,2")
        .unwrap_err();

    assert_eq!(error, CsvError::UnexpectedEndOfInput);
}

#[test]
fn empty_input() {
    assert_eq!(ParsedCsv::parse("").unwrap_err(), CsvError::EmptyInput);
    assert_eq!(
        CsvDecoder::new().decode::<Single>("\n").unwrap_err(),
        CsvError::EmptyInput
    );
}

#[test]
fn corrupted_escape_sequence() {
    let error = ParsedCsv::parse("value\n\"a\\b\"").unwrap_err();

    assert_eq!(error, CsvError::CorruptedInput { offset: 9 });
}

#[test]
fn column_count_mismatch_reports_the_row() {
    let error = ParsedCsv::parse("a,b\n1,2\n3").unwrap_err();

    assert_eq!(
        error,
        CsvError::ColumnCountMismatch {
            expected: 2,
            actual: 1,
            row: 2
        }
    );
    assert_eq!(error.to_string(), "row 2 has 1 columns, expected 2");
}

#[test]
fn key_not_found_for_name_and_position() -> Result<(), Box<dyn Error>> {
    let table = ParsedCsv::parse("value\n1")?;

    assert_eq!(
        table.resolve("missing".into()).unwrap_err(),
        CsvError::KeyNotFound {
            key: "missing".to_string()
        }
    );
    assert_eq!(
        CsvDecoder::new()
            .decode::<(Vec<i32>, Vec<i32>)>("value\n1")
            .unwrap_err(),
        CsvError::KeyNotFound {
            key: "1".to_string()
        }
    );

    Ok(())
}

#[test]
fn no_header_available() -> Result<(), Box<dyn Error>> {
    let table = ParserBuilder::new().has_header_row(false).parse("1,2")?;

    let error = table.column_by_key("value".into()).unwrap_err();

    assert_eq!(error, CsvError::NoHeaderAvailable);

    Ok(())
}

#[test]
fn type_mismatch_names_path_text_and_type() {
    let error = CsvDecoder::new()
        .decode::<Single>("value\n1\n2.5")
        .unwrap_err();

    assert_eq!(
        error,
        CsvError::TypeMismatch {
            path: "value[1]".to_string(),
            raw_text: "2.5".to_string(),
            target_type: "i32",
        }
    );
    assert_eq!(error.to_string(), "could not decode '2.5' at value[1] as i32");
}

#[test]
fn numbers_are_parsed_strictly() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Padded {
        value: Vec<u8>,
    }

    for input in ["value\n\" 1\"", "value\n1x", "value\n-1", "value\n300", "value\n\"\""] {
        let error = CsvDecoder::new().decode::<Padded>(input);
        assert!(
            matches!(error, Err(CsvError::TypeMismatch { .. })),
            "input: {:?}, got: {:?}",
            input,
            error
        );
    }
}

#[test]
fn value_not_found_for_fixed_size_columns() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Triple {
        value: [i32; 3],
    }

    let error = CsvDecoder::new()
        .decode::<Triple>("value\n1\n2")
        .unwrap_err();

    assert_eq!(
        error,
        CsvError::ValueNotFound {
            path: "value[2]".to_string(),
            target_type: "i32",
        }
    );
}

#[test]
fn fixed_size_columns_reject_extra_rows() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Pair {
        value: [i32; 2],
    }

    let error = CsvDecoder::new()
        .decode::<Pair>("value\n1\n2\n3")
        .unwrap_err();

    assert_eq!(
        error,
        CsvError::Message("invalid length 3, expected 2 data rows in column value".to_string())
    );
}

#[test]
fn unsupported_shapes_at_each_level() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Nested {
        value: Vec<Vec<i32>>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Scalar {
        value: i32,
    }

    assert_eq!(
        CsvDecoder::new().decode::<String>("value\n1").unwrap_err(),
        CsvError::UnsupportedOperation {
            path: "<root>".to_string(),
            attempted_shape: "string",
        }
    );
    assert_eq!(
        CsvDecoder::new().decode::<Scalar>("value\n1").unwrap_err(),
        CsvError::UnsupportedOperation {
            path: "value".to_string(),
            attempted_shape: "i32",
        }
    );
    assert_eq!(
        CsvDecoder::new().decode::<Nested>("value\n1").unwrap_err(),
        CsvError::UnsupportedOperation {
            path: "value[0]".to_string(),
            attempted_shape: "sequence",
        }
    );
}

#[test]
fn invalid_configuration() {
    let decoder = CsvDecoderBuilder::new()
        .column_separator('\n')
        .build();

    let error = decoder.decode::<Single>("value\n1").unwrap_err();

    assert!(matches!(error, CsvError::InvalidConfiguration(_)));
    assert!(error.to_string().starts_with("invalid parser configuration"));
}

#[test]
fn missing_required_column_is_a_message() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Pair {
        value: Vec<i32>,
        other: Vec<i32>,
    }

    let error = CsvDecoder::new().decode::<Pair>("value\n1").unwrap_err();

    assert_eq!(
        error,
        CsvError::Message("missing field `other`".to_string())
    );
}
