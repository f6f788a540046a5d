/// Tokenizing delimited text into a column store.
///
/// Parsing is a single left-to-right pass over the input driven by an explicit
/// state machine. The result is a [`ParsedCsv`](table::ParsedCsv): a flat,
/// row-major sequence of cells whose rows were all validated to have the same
/// width as the first one.
///
/// # Module Architecture
///
/// 1. **ParserBuilder**: holds the separator, quote, escape and trim characters
///    plus the header flag, and runs the tokenizer over an input string.
///
/// 2. **Tokenizer**: the state machine. It never backtracks and never copies a
///    cell unless an escape sequence inside quotes forces it to.
///
/// 3. **ParsedCsv**: the immutable column store. Cells borrow the input, so a
///    table cannot outlive the text it was parsed from.
///
/// # Examples
///
/// ```
/// use csv_columns::parse::tokenizer::ParserBuilder;
/// use csv_columns::parse::table::ColumnKey;
///
/// let csv = "city,pop\nBoston,4628910\n\"Concord, MA\",42695";
///
/// let table = ParserBuilder::new().parse(csv).unwrap();
///
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.column_count(), 2);
///
/// let cities = table.column_by_key(ColumnKey::Name("city")).unwrap();
/// assert_eq!(cities.len(), 2);
/// assert_eq!(cities[1].as_ref(), "Concord, MA");
/// ```
///
/// ## Custom dialects
///
/// ```
/// use csv_columns::parse::tokenizer::ParserBuilder;
///
/// // Semicolon separated, RFC 4180 style doubled quotes, no header row
/// let table = ParserBuilder::new()
///     .column_separator(';')
///     .escape('"')
///     .has_header_row(false)
///     .parse("\"say \"\"hi\"\"\";2\nplain;3")
///     .unwrap();
///
/// assert_eq!(table.cell(0, 0).unwrap(), "say \"hi\"");
/// assert_eq!(table.cell(1, 1).unwrap(), "3");
/// ```

/// The column store and key resolution.
pub mod table;

/// The tokenizer state machine and its configuration.
pub mod tokenizer;
