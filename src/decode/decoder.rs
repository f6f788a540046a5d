use std::any::type_name;

use log::debug;
use serde::Deserialize;

use crate::{
    decode::{
        options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy},
        root::TableDeserializer,
    },
    error::Result,
    parse::{table::ParsedCsv, tokenizer::ParserBuilder},
};

/// Parses CSV text and decodes it into a caller type.
///
/// A decoder carries both the tokenizer dialect and the literal conventions
/// for nil and boolean cells. It is immutable and can be reused for any
/// number of inputs.
///
/// # Examples
///
/// ```
/// use csv_columns::decode::decoder::CsvDecoder;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Columns {
///     row1: Vec<i32>,
///     row2: Vec<i32>,
///     row3: Vec<i32>,
/// }
///
/// let csv = "row1,row2,row3\n1,4,7\n2,5,8\n3,6,9";
/// let columns: Columns = CsvDecoder::new().decode(csv).unwrap();
///
/// assert_eq!(columns.row1, vec![1, 2, 3]);
/// assert_eq!(columns.row2, vec![4, 5, 6]);
/// assert_eq!(columns.row3, vec![7, 8, 9]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDecoder {
    parser: ParserBuilder,
    options: DecodeOptions,
}

impl CsvDecoder {
    /// A decoder with the default dialect, empty cells as nil and
    /// `true`/`false` booleans.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`CsvDecoderBuilder`] with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoder;
    ///
    /// let decoder = CsvDecoder::builder().column_separator('\t').build();
    /// let columns: (Vec<u8>, Vec<u8>) = decoder.decode("a\tb\n1\t2").unwrap();
    ///
    /// assert_eq!(columns, (vec![1], vec![2]));
    /// ```
    pub fn builder() -> CsvDecoderBuilder {
        CsvDecoderBuilder::new()
    }

    /// The tokenizer dialect used by [`decode`](Self::decode).
    ///
    /// Useful for parsing once and decoding the table several times with
    /// [`decode_parsed`](Self::decode_parsed).
    pub fn parser(&self) -> &ParserBuilder {
        &self.parser
    }

    /// The nil and boolean conventions applied to every cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{CsvDecoder, NilDecodingStrategy};
    ///
    /// let decoder = CsvDecoder::builder()
    ///     .nil_decoding_strategy(NilDecodingStrategy::Null)
    ///     .build();
    ///
    /// assert!(decoder.options().is_nil("null"));
    /// assert!(!decoder.options().is_nil(""));
    /// ```
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Parses `input` and decodes it as `T`.
    ///
    /// Strings that need no escape resolution can be borrowed from `input`.
    pub fn decode<'de, T: Deserialize<'de>>(&self, input: &'de str) -> Result<T> {
        let table = self.parser.parse(input)?;
        self.decode_parsed(&table)
    }

    /// Decodes an already parsed table as `T`.
    ///
    /// The table is only read, so it can be decoded any number of times, from
    /// any number of threads.
    pub fn decode_parsed<'de, T: Deserialize<'de>>(&self, table: &ParsedCsv<'de>) -> Result<T> {
        debug!(
            "Decoding {} from {} data rows x {} columns",
            type_name::<T>(),
            table.data_row_count(),
            table.column_count()
        );
        T::deserialize(TableDeserializer::new(table, &self.options))
    }
}

/// A builder for configuring a [`CsvDecoder`].
///
/// # Default Configuration
///
/// - Parser dialect: see [`ParserBuilder::new`]
/// - Nil: [`NilDecodingStrategy::Empty`]
/// - Booleans: [`BoolDecodingStrategy::TrueOrFalse`]
///
/// # Examples
///
/// ```
/// use csv_columns::decode::decoder::CsvDecoderBuilder;
/// use csv_columns::decode::options::{BoolDecodingStrategy, NilDecodingStrategy};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Flags {
///     enabled: Vec<Option<bool>>,
/// }
///
/// let decoder = CsvDecoderBuilder::new()
///     .column_separator(';')
///     .nil_decoding_strategy(NilDecodingStrategy::Custom("-".to_string()))
///     .bool_decoding_strategy(BoolDecodingStrategy::ZeroOrOne)
///     .build();
///
/// let flags: Flags = decoder.decode("enabled\n1\n-\n0").unwrap();
/// assert_eq!(flags.enabled, vec![Some(true), None, Some(false)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvDecoderBuilder {
    parser: ParserBuilder,
    nil: NilDecodingStrategy,
    boolean: BoolDecodingStrategy,
}

impl CsvDecoderBuilder {
    /// Creates a new `CsvDecoderBuilder` with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{CsvDecoder, CsvDecoderBuilder};
    ///
    /// assert_eq!(CsvDecoderBuilder::new().build(), CsvDecoder::new());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole parser dialect.
    ///
    /// Dialect setters called afterwards adjust the given parser.
    ///
    /// # Parameters
    /// - `parser`: The tokenizer configuration to use
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{CsvDecoderBuilder, ParserBuilder};
    ///
    /// let parser = ParserBuilder::new().column_separator(';').trim('_');
    /// let decoder = CsvDecoderBuilder::new().parser(parser).build();
    ///
    /// let (a,): (Vec<u8>,) = decoder.decode("a;b\n__1_;2").unwrap();
    /// assert_eq!(a, vec![1]);
    /// ```
    pub fn parser(mut self, parser: ParserBuilder) -> Self {
        self.parser = parser;
        self
    }

    /// Sets whether the first row names the columns.
    ///
    /// Without a header row, struct fields bind to columns by declaration
    /// order and map keys are column positions.
    ///
    /// # Parameters
    /// - `yes`: Whether a header row is present
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Point {
    ///     x: Vec<i32>,
    ///     y: Vec<i32>,
    /// }
    ///
    /// let decoder = CsvDecoderBuilder::new().has_header_row(false).build();
    /// let point: Point = decoder.decode("1,2\n3,4").unwrap();
    ///
    /// assert_eq!(point.x, vec![1, 3]);
    /// assert_eq!(point.y, vec![2, 4]);
    /// ```
    pub fn has_header_row(mut self, yes: bool) -> Self {
        self.parser = self.parser.has_header_row(yes);
        self
    }

    /// Sets the character that ends a row.
    ///
    /// # Parameters
    /// - `separator`: The character to use as a row separator
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    ///
    /// let decoder = CsvDecoderBuilder::new().row_separator('|').build();
    /// let (a,): (Vec<u8>,) = decoder.decode("a|1|2").unwrap();
    ///
    /// assert_eq!(a, vec![1, 2]);
    /// ```
    pub fn row_separator(mut self, separator: char) -> Self {
        self.parser = self.parser.row_separator(separator);
        self
    }

    /// Sets the character that ends a cell within a row.
    ///
    /// # Parameters
    /// - `separator`: The character to use as a column separator
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    ///
    /// // Use semicolon so that commas can stay in numbers
    /// let decoder = CsvDecoderBuilder::new().column_separator(';').build();
    /// let (a, b): (Vec<String>, Vec<u8>) = decoder.decode("a;b\n1,5;2").unwrap();
    ///
    /// assert_eq!(a, vec!["1,5"]);
    /// assert_eq!(b, vec![2]);
    /// ```
    pub fn column_separator(mut self, separator: char) -> Self {
        self.parser = self.parser.column_separator(separator);
        self
    }

    /// Sets both the opening and the closing quote character.
    ///
    /// # Parameters
    /// - `quote`: The quote character
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    ///
    /// let decoder = CsvDecoderBuilder::new().quote('\'').build();
    /// let (a,): (Vec<String>,) = decoder.decode("a\n'x, y'").unwrap();
    ///
    /// assert_eq!(a, vec!["x, y"]);
    /// ```
    pub fn quote(mut self, quote: char) -> Self {
        self.parser = self.parser.quote(quote);
        self
    }

    /// Sets the escape character used inside quoted cells.
    ///
    /// Setting it to the closing quote reads RFC 4180 doubled quotes.
    ///
    /// # Parameters
    /// - `escape`: The escape character
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    ///
    /// let decoder = CsvDecoderBuilder::new().escape('"').build();
    /// let (a,): (Vec<String>,) = decoder.decode("a\n\"say \"\"hi\"\"\"").unwrap();
    ///
    /// assert_eq!(a, vec!["say \"hi\""]);
    /// ```
    pub fn escape(mut self, escape: char) -> Self {
        self.parser = self.parser.escape(escape);
        self
    }

    /// Sets the padding character stripped around cells.
    ///
    /// # Parameters
    /// - `trim`: The padding character
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::CsvDecoderBuilder;
    ///
    /// let decoder = CsvDecoderBuilder::new().trim('.').build();
    /// let (a,): (Vec<u8>,) = decoder.decode("a\n..7..").unwrap();
    ///
    /// assert_eq!(a, vec![7]);
    /// ```
    pub fn trim(mut self, trim: char) -> Self {
        self.parser = self.parser.trim(trim);
        self
    }

    /// Sets which cell text decodes as `None`.
    ///
    /// # Parameters
    /// - `strategy`: The nil literal convention
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{CsvDecoderBuilder, NilDecodingStrategy};
    ///
    /// let decoder = CsvDecoderBuilder::new()
    ///     .nil_decoding_strategy(NilDecodingStrategy::Custom("n/a".to_string()))
    ///     .build();
    /// let (a,): (Vec<Option<u8>>,) = decoder.decode("a\n1\nn/a").unwrap();
    ///
    /// assert_eq!(a, vec![Some(1), None]);
    /// ```
    pub fn nil_decoding_strategy(mut self, strategy: NilDecodingStrategy) -> Self {
        self.nil = strategy;
        self
    }

    /// Sets which cell texts decode as `true` and `false`.
    ///
    /// # Parameters
    /// - `strategy`: The boolean literal convention
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::{BoolDecodingStrategy, CsvDecoderBuilder};
    ///
    /// let decoder = CsvDecoderBuilder::new()
    ///     .bool_decoding_strategy(BoolDecodingStrategy::ZeroOrOne)
    ///     .build();
    /// let (a,): (Vec<bool>,) = decoder.decode("a\n1\n0").unwrap();
    ///
    /// assert_eq!(a, vec![true, false]);
    /// ```
    pub fn bool_decoding_strategy(mut self, strategy: BoolDecodingStrategy) -> Self {
        self.boolean = strategy;
        self
    }

    /// Builds the [`CsvDecoder`].
    ///
    /// The dialect is only validated when the decoder first parses, so a
    /// conflicting configuration surfaces as
    /// [`CsvError::InvalidConfiguration`](crate::CsvError::InvalidConfiguration)
    /// from [`CsvDecoder::decode`].
    pub fn build(self) -> CsvDecoder {
        CsvDecoder {
            parser: self.parser,
            options: DecodeOptions::new(&self.nil, &self.boolean),
        }
    }
}

/// Decodes `input` as `T` with every default.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Names {
///     name: Vec<String>,
/// }
///
/// let names: Names = csv_columns::from_str("name\nAda\nGrace").unwrap();
/// assert_eq!(names.name, vec!["Ada", "Grace"]);
/// ```
pub fn from_str<'de, T: Deserialize<'de>>(input: &'de str) -> Result<T> {
    CsvDecoder::new().decode(input)
}
