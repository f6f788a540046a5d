use std::borrow::Cow;

use log::debug;

use crate::{
    error::{CsvError, Result},
    parse::table::{Cell, ParsedCsv, TableBuilder},
};

/// A builder for configuring how CSV text is split into cells.
///
/// # Default Configuration
///
/// - Row separator: line feed (`\n`)
/// - Column separator: comma (`,`)
/// - Quote open and quote close: double quote (`"`)
/// - Escape: backslash (`\`)
/// - Trim: space (` `)
/// - Header row: enabled
///
/// The escape character may be set equal to the closing quote to read RFC 4180
/// style doubled quotes (`"say ""hi"""`).
///
/// # Examples
///
/// ```
/// use csv_columns::parse::tokenizer::ParserBuilder;
///
/// let table = ParserBuilder::new()
///     .column_separator('\t')
///     .has_header_row(true)
///     .parse("name\tage\nAlice\t30")
///     .unwrap();
///
/// assert_eq!(table.cell(1, 0), Some("Alice"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserBuilder {
    row_separator: char,
    column_separator: char,
    quote_open: char,
    escape: char,
    quote_close: char,
    trim: char,
    has_header_row: bool,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    /// Creates a new `ParserBuilder` with the default dialect.
    ///
    /// Default settings:
    /// - Row separator: line feed (`\n`)
    /// - Column separator: comma (`,`)
    /// - Quotes: double quote (`"`)
    /// - Escape: backslash (`\`)
    /// - Trim: space
    /// - Header row: enabled
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::tokenizer::ParserBuilder;
    ///
    /// let table = ParserBuilder::new().parse("a,b\n1,2").unwrap();
    ///
    /// assert_eq!(table.column_count(), 2);
    /// ```
    pub fn new() -> Self {
        Self {
            row_separator: '\n',
            column_separator: ',',
            quote_open: '"',
            escape: '\\',
            quote_close: '"',
            trim: ' ',
            has_header_row: true,
        }
    }

    /// Sets the character that ends a row.
    ///
    /// A trailing row separator at the end of the input does not start a new
    /// row.
    ///
    /// # Parameters
    /// - `separator`: The character to use as a row separator
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::tokenizer::ParserBuilder;
    ///
    /// let table = ParserBuilder::new()
    ///     .row_separator('|')
    ///     .parse("a|1|2|")
    ///     .unwrap();
    ///
    /// assert_eq!(table.data_row_count(), 2);
    /// ```
    pub fn row_separator(mut self, separator: char) -> Self {
        self.row_separator = separator;
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
    /// use csv_columns::parse::tokenizer::ParserBuilder;
    ///
    /// // Use semicolon as column separator
    /// let table = ParserBuilder::new()
    ///     .column_separator(';')
    ///     .parse("a;b\n1,5;2")
    ///     .unwrap();
    ///
    /// assert_eq!(table.cell(1, 0), Some("1,5"));
    /// ```
    pub fn column_separator(mut self, separator: char) -> Self {
        self.column_separator = separator;
        self
    }

    /// Sets both the opening and the closing quote character.
    pub fn quote(mut self, quote: char) -> Self {
        self.quote_open = quote;
        self.quote_close = quote;
        self
    }

    /// Sets the character that opens a quoted cell.
    ///
    /// Only recognised as the first character of a cell, after padding.
    ///
    /// # Parameters
    /// - `quote`: The opening quote character
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::tokenizer::ParserBuilder;
    ///
    /// let table = ParserBuilder::new()
    ///     .quote_open('[')
    ///     .quote_close(']')
    ///     .parse("a,b\n[1,5],2")
    ///     .unwrap();
    ///
    /// assert_eq!(table.cell(1, 0), Some("1,5"));
    /// ```
    pub fn quote_open(mut self, quote: char) -> Self {
        self.quote_open = quote;
        self
    }

    /// Sets the character that closes a quoted cell.
    ///
    /// # Parameters
    /// - `quote`: The closing quote character
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::tokenizer::ParserBuilder;
    ///
    /// let table = ParserBuilder::new()
    ///     .quote_open('<')
    ///     .quote_close('>')
    ///     .parse("a\n<x, y>")
    ///     .unwrap();
    ///
    /// assert_eq!(table.cell(1, 0), Some("x, y"));
    /// ```
    pub fn quote_close(mut self, quote: char) -> Self {
        self.quote_close = quote;
        self
    }

    /// Sets the escape character used inside quoted cells.
    ///
    /// Inside quotes, the escape must be followed by either another escape or
    /// the closing quote; anything else is rejected as corrupted input.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Sets the padding character stripped around cells.
    pub fn trim(mut self, trim: char) -> Self {
        self.trim = trim;
        self
    }

    /// Sets whether the first row names the columns.
    pub fn has_header_row(mut self, yes: bool) -> Self {
        self.has_header_row = yes;
        self
    }

    /// Checks that no two roles share a character, except the escape and the
    /// closing quote, and the two quotes.
    fn validate(&self) -> Result<()> {
        let roles = [
            ("row separator", self.row_separator),
            ("column separator", self.column_separator),
            ("quote open", self.quote_open),
            ("trim", self.trim),
        ];
        for (i, (left_name, left)) in roles.iter().enumerate() {
            for (right_name, right) in &roles[i + 1..] {
                if left == right {
                    return Err(CsvError::InvalidConfiguration(format!(
                        "{} and {} are both {:?}",
                        left_name, right_name, left
                    )));
                }
            }
        }

        let delimiters = [
            ("row separator", self.row_separator),
            ("column separator", self.column_separator),
            ("trim", self.trim),
        ];
        for (role, character) in [("quote close", self.quote_close), ("escape", self.escape)] {
            if let Some((name, _)) = delimiters.iter().find(|(_, c)| *c == character) {
                return Err(CsvError::InvalidConfiguration(format!(
                    "{} and {} are both {:?}",
                    role, name, character
                )));
            }
        }

        Ok(())
    }

    /// Tokenizes `input` into a validated column store.
    ///
    /// # Errors
    ///
    /// - [`CsvError::InvalidConfiguration`] before reading when two roles
    ///   share a character
    /// - [`CsvError::ColumnCountMismatch`] when a row's width differs from
    ///   the first row's
    /// - [`CsvError::CharacterAfterQuotedCell`], [`CsvError::CorruptedInput`]
    ///   and [`CsvError::UnexpectedEndOfInput`] for malformed quoting
    /// - [`CsvError::EmptyInput`] when the input holds no rows
    pub fn parse<'a>(&self, input: &'a str) -> Result<ParsedCsv<'a>> {
        self.validate()?;

        let table = Tokenizer::new(input, self).run()?.finish(self.has_header_row)?;

        debug!(
            "Parsed {} rows x {} columns (header row: {})",
            table.row_count(),
            table.column_count(),
            table.has_header_row()
        );

        Ok(table)
    }
}

/// Tokenizer states. Byte offsets index into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Skipping trim characters before a cell.
    PreValuePadding,
    /// Inside an unquoted cell that began at `start`.
    ReadingValue { start: usize },
    /// Trim characters after an unquoted cell whose text ended at `end`.
    TrailingTrimPending { start: usize, end: usize },
    /// Right after the opening quote.
    QuoteOpened,
    /// Inside quotes; `escaped` is set once an escape sequence was seen.
    ReadingQuotedValue { start: usize, escaped: bool },
    /// Right after an escape character found at `escape_at`.
    PendingEscapeResolution { start: usize, escape_at: usize },
    /// After the closing quote, before the next separator.
    PostQuotePadding,
}

struct Tokenizer<'a> {
    input: &'a str,
    row_separator: char,
    column_separator: char,
    quote_open: char,
    escape: char,
    quote_close: char,
    trim: char,
    table: TableBuilder<'a>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, config: &ParserBuilder) -> Self {
        Self {
            input,
            row_separator: config.row_separator,
            column_separator: config.column_separator,
            quote_open: config.quote_open,
            escape: config.escape,
            quote_close: config.quote_close,
            trim: config.trim,
            // Rough guess of one cell per five bytes
            table: TableBuilder::with_capacity(input.len() / 5),
        }
    }

    fn run(mut self) -> Result<TableBuilder<'a>> {
        let mut state = State::PreValuePadding;
        for (offset, character) in self.input.char_indices() {
            state = self.step(state, offset, character)?;
        }
        self.finish(state)?;
        Ok(self.table)
    }

    fn step(&mut self, state: State, offset: usize, character: char) -> Result<State> {
        match state {
            State::PreValuePadding => self.pre_value_padding(offset, character),
            State::ReadingValue { start } => self.reading_value(start, offset, character),
            State::TrailingTrimPending { start, end } => {
                self.trailing_trim_pending(start, end, offset, character)
            }
            State::QuoteOpened => self.quote_opened(offset, character),
            State::ReadingQuotedValue { start, escaped } => {
                self.reading_quoted_value(start, escaped, offset, character)
            }
            State::PendingEscapeResolution { start, escape_at } => {
                self.pending_escape_resolution(start, escape_at, offset, character)
            }
            State::PostQuotePadding => self.post_quote_padding(offset, character),
        }
    }

    fn pre_value_padding(&mut self, offset: usize, character: char) -> Result<State> {
        if character == self.row_separator {
            if self.table.open_columns() == 0 {
                self.table.add_blank_row()?;
            } else {
                self.table.add_row(Cow::Borrowed(""))?;
            }
        } else if character == self.column_separator {
            self.table.add_column(Cow::Borrowed(""))?;
        } else if character == self.quote_open {
            return Ok(State::QuoteOpened);
        } else if character != self.trim {
            return Ok(State::ReadingValue { start: offset });
        }
        Ok(State::PreValuePadding)
    }

    fn reading_value(&mut self, start: usize, offset: usize, character: char) -> Result<State> {
        if character == self.row_separator {
            self.table.add_row(self.slice(start, offset))?;
            Ok(State::PreValuePadding)
        } else if character == self.column_separator {
            self.table.add_column(self.slice(start, offset))?;
            Ok(State::PreValuePadding)
        } else if character == self.trim {
            Ok(State::TrailingTrimPending { start, end: offset })
        } else {
            Ok(State::ReadingValue { start })
        }
    }

    fn trailing_trim_pending(
        &mut self,
        start: usize,
        end: usize,
        offset: usize,
        character: char,
    ) -> Result<State> {
        if character == self.row_separator {
            self.table.add_row(self.slice(start, end))?;
            Ok(State::PreValuePadding)
        } else if character == self.column_separator {
            self.table.add_column(self.slice(start, end))?;
            Ok(State::PreValuePadding)
        } else if character == self.trim {
            Ok(State::TrailingTrimPending { start, end })
        } else {
            // The trim run was inside the value
            self.reading_value(start, offset, character)
        }
    }

    fn quote_opened(&mut self, offset: usize, character: char) -> Result<State> {
        if character == self.escape {
            Ok(State::PendingEscapeResolution {
                start: offset,
                escape_at: offset,
            })
        } else if character == self.quote_close {
            self.table.add_value(Cow::Borrowed(""))?;
            Ok(State::PostQuotePadding)
        } else {
            Ok(State::ReadingQuotedValue {
                start: offset,
                escaped: false,
            })
        }
    }

    fn reading_quoted_value(
        &mut self,
        start: usize,
        escaped: bool,
        offset: usize,
        character: char,
    ) -> Result<State> {
        if character == self.escape {
            Ok(State::PendingEscapeResolution {
                start,
                escape_at: offset,
            })
        } else if character == self.quote_close {
            self.close_quoted(start, offset, escaped)?;
            Ok(State::PostQuotePadding)
        } else {
            Ok(State::ReadingQuotedValue { start, escaped })
        }
    }

    fn pending_escape_resolution(
        &mut self,
        start: usize,
        escape_at: usize,
        offset: usize,
        character: char,
    ) -> Result<State> {
        if character == self.quote_close || character == self.escape {
            return Ok(State::ReadingQuotedValue {
                start,
                escaped: true,
            });
        }
        if self.escape == self.quote_close {
            // A lone doubled-quote escape is the closing quote
            self.close_quoted(start, escape_at, true)?;
            return self.post_quote_padding(offset, character);
        }
        Err(CsvError::CorruptedInput { offset })
    }

    fn post_quote_padding(&mut self, offset: usize, character: char) -> Result<State> {
        if character == self.row_separator {
            self.table.finish_column();
            self.table.finish_row()?;
            Ok(State::PreValuePadding)
        } else if character == self.column_separator {
            self.table.finish_column();
            Ok(State::PreValuePadding)
        } else if character == self.trim {
            Ok(State::PostQuotePadding)
        } else {
            Err(CsvError::CharacterAfterQuotedCell { character, offset })
        }
    }

    fn finish(&mut self, state: State) -> Result<()> {
        match state {
            State::PreValuePadding => {
                if self.table.open_columns() > 0 {
                    // Trailing column separator
                    self.table.add_row(Cow::Borrowed(""))?;
                }
                Ok(())
            }
            State::ReadingValue { start } => {
                self.table.add_row(self.slice(start, self.input.len()))
            }
            State::TrailingTrimPending { start, end } => self.table.add_row(self.slice(start, end)),
            State::PostQuotePadding => {
                self.table.finish_column();
                self.table.finish_row()
            }
            State::PendingEscapeResolution { start, escape_at }
                if self.escape == self.quote_close =>
            {
                self.close_quoted(start, escape_at, true)?;
                self.table.finish_column();
                self.table.finish_row()
            }
            State::QuoteOpened
            | State::ReadingQuotedValue { .. }
            | State::PendingEscapeResolution { .. } => Err(CsvError::UnexpectedEndOfInput),
        }
    }

    fn slice(&self, start: usize, end: usize) -> Cell<'a> {
        Cow::Borrowed(&self.input[start..end])
    }

    fn close_quoted(&mut self, start: usize, end: usize, escaped: bool) -> Result<()> {
        let raw = &self.input[start..end];
        let value = if escaped {
            Cow::Owned(resolve_escapes(raw, self.escape))
        } else {
            Cow::Borrowed(raw)
        };
        self.table.add_value(value)
    }
}

/// Replaces every escape sequence with the character it protects.
///
/// `raw` was already validated: each escape is followed by another escape or
/// by the closing quote.
fn resolve_escapes(raw: &str, escape: char) -> String {
    let mut resolved = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(character) = chars.next() {
        if character == escape {
            if let Some(next) = chars.next() {
                resolved.push(next);
            }
        } else {
            resolved.push(character);
        }
    }
    resolved
}
