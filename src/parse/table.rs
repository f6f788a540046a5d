use std::{borrow::Cow, fmt};

use crate::error::{CsvError, Result};

/// A single cell's text.
///
/// Borrowed from the input unless escape resolution had to rewrite it.
pub type Cell<'a> = Cow<'a, str>;

/// Identifies a column either by zero-based position or by header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey<'k> {
    Index(usize),
    Name(&'k str),
}

impl fmt::Display for ColumnKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Index(index) => write!(f, "{}", index),
            ColumnKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ColumnKey<'_> {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

impl<'k> From<&'k str> for ColumnKey<'k> {
    fn from(name: &'k str) -> Self {
        ColumnKey::Name(name)
    }
}

/// An immutable, column-addressable view over parsed CSV text.
///
/// Values are stored flat in row-major order. Every row holds exactly
/// `column_count` cells; the tokenizer rejects ragged input before a
/// `ParsedCsv` is ever built. When `has_header_row` is set, the first row
/// names the columns and is skipped by [`column`](Self::column).
///
/// # Examples
///
/// ```
/// use csv_columns::parse::table::{ColumnKey, ParsedCsv};
///
/// let table = ParsedCsv::parse("a,b\n1,2\n3,4").unwrap();
///
/// assert_eq!(table.header().unwrap(), vec!["a", "b"]);
/// assert!(table.contains(ColumnKey::Name("b")));
/// assert!(!table.contains(ColumnKey::Index(2)));
///
/// let b: Vec<&str> = table.column(1).into_iter().map(|cell| cell.as_ref()).collect();
/// assert_eq!(b, vec!["2", "4"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv<'a> {
    values: Vec<Cell<'a>>,
    column_count: usize,
    has_header_row: bool,
}

impl<'a> ParsedCsv<'a> {
    /// Parses `input` with the default dialect: `\n` rows, `,` columns,
    /// `"` quotes, `\` escapes, space trimming and a header row.
    pub fn parse(input: &'a str) -> Result<Self> {
        crate::parse::tokenizer::ParserBuilder::new().parse(input)
    }

    /// Number of rows, header row included.
    pub fn row_count(&self) -> usize {
        self.values.len() / self.column_count
    }

    /// Number of rows holding data, header row excluded.
    pub fn data_row_count(&self) -> usize {
        if self.has_header_row {
            self.row_count() - 1
        } else {
            self.row_count()
        }
    }

    /// Number of columns in every row.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::table::ParsedCsv;
    ///
    /// let table = ParsedCsv::parse("a,b,c\n1,2,3").unwrap();
    ///
    /// assert_eq!(table.column_count(), 3);
    /// ```
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Total number of cells, header included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no cells at all, header included.
    ///
    /// The tokenizer never returns such a table. To ask whether there is any
    /// data below the header, compare [`data_row_count`](Self::data_row_count)
    /// with zero.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the first row names the columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::{table::ParsedCsv, tokenizer::ParserBuilder};
    ///
    /// assert!(ParsedCsv::parse("a\n1").unwrap().has_header_row());
    ///
    /// let table = ParserBuilder::new().has_header_row(false).parse("1\n2").unwrap();
    /// assert!(!table.has_header_row());
    /// assert_eq!(table.data_row_count(), 2);
    /// ```
    pub fn has_header_row(&self) -> bool {
        self.has_header_row
    }

    /// The header cells, or `None` when the table has no header row.
    pub fn header(&self) -> Option<Vec<&str>> {
        if !self.has_header_row {
            return None;
        }
        Some(
            self.values[..self.column_count]
                .iter()
                .map(|cell| cell.as_ref())
                .collect(),
        )
    }

    pub(crate) fn header_cell(&self, index: usize) -> Option<&Cell<'a>> {
        if self.has_header_row && index < self.column_count {
            self.values.get(index)
        } else {
            None
        }
    }

    /// Column labels: the header names, or the stringified positions when
    /// there is no header row.
    pub fn column_names(&self) -> Vec<String> {
        match self.header() {
            Some(header) => header.into_iter().map(str::to_owned).collect(),
            None => (0..self.column_count).map(|index| index.to_string()).collect(),
        }
    }

    /// Keys addressing every column, in column order.
    pub fn keys(&self) -> Vec<ColumnKey<'_>> {
        match self.header() {
            Some(header) => header.into_iter().map(ColumnKey::Name).collect(),
            None => (0..self.column_count).map(ColumnKey::Index).collect(),
        }
    }

    /// The cell at raw `row` (the header, when present, is row 0) and `column`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.column_count {
            return None;
        }
        self.values
            .get(row * self.column_count + column)
            .map(|cell| cell.as_ref())
    }

    /// The data cells of column `index`, one per data row.
    ///
    /// Walks the store at stride `column_count` on every call. An index
    /// outside the table yields an empty column.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::parse::table::ParsedCsv;
    ///
    /// let table = ParsedCsv::parse("a,b\n1,2\n3,4").unwrap();
    ///
    /// let a: Vec<&str> = table.column(0).into_iter().map(|cell| cell.as_ref()).collect();
    /// assert_eq!(a, vec!["1", "3"]);
    /// assert!(table.column(2).is_empty());
    /// ```
    pub fn column(&self, index: usize) -> Vec<&Cell<'a>> {
        if index >= self.column_count {
            return Vec::new();
        }
        let start = if self.has_header_row {
            index + self.column_count
        } else {
            index
        };
        self.values
            .iter()
            .skip(start)
            .step_by(self.column_count)
            .collect()
    }

    /// Whether `key` addresses an existing column.
    ///
    /// A textual key never matches when there is no header row.
    pub fn contains(&self, key: ColumnKey<'_>) -> bool {
        match key {
            ColumnKey::Index(index) => index < self.column_count,
            ColumnKey::Name(name) => self
                .header()
                .is_some_and(|header| header.contains(&name)),
        }
    }

    /// Resolves `key` to a column position. Duplicate header names resolve to
    /// the first match.
    pub fn resolve(&self, key: ColumnKey<'_>) -> Result<usize> {
        match key {
            ColumnKey::Index(index) if index < self.column_count => Ok(index),
            ColumnKey::Index(index) => Err(CsvError::KeyNotFound {
                key: index.to_string(),
            }),
            ColumnKey::Name(name) => {
                let header = self.header().ok_or(CsvError::NoHeaderAvailable)?;
                header
                    .iter()
                    .position(|cell| *cell == name)
                    .ok_or_else(|| CsvError::KeyNotFound {
                        key: name.to_owned(),
                    })
            }
        }
    }

    /// The data cells of the column addressed by `key`.
    pub fn column_by_key(&self, key: ColumnKey<'_>) -> Result<Vec<&Cell<'a>>> {
        let index = self.resolve(key)?;
        Ok(self.column(index))
    }
}

/// Accumulates cells while the tokenizer runs and checks row widths.
///
/// A row made of nothing but a row separator is held back until the next
/// value arrives. If the input ends first, that row came from a trailing
/// separator and is dropped.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder<'a> {
    values: Vec<Cell<'a>>,
    expected_column_count: Option<usize>,
    column_count: usize,
    row_count: usize,
    pending_blank_row: bool,
    has_content: bool,
}

impl<'a> TableBuilder<'a> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Cells closed so far in the row being read.
    pub(crate) fn open_columns(&self) -> usize {
        self.column_count
    }

    pub(crate) fn add_value(&mut self, value: Cell<'a>) -> Result<()> {
        self.flush_blank_row()?;
        self.has_content = true;
        self.values.push(value);
        Ok(())
    }

    pub(crate) fn finish_column(&mut self) {
        self.column_count += 1;
    }

    pub(crate) fn finish_row(&mut self) -> Result<()> {
        match self.expected_column_count {
            Some(expected) if expected != self.column_count => {
                return Err(CsvError::ColumnCountMismatch {
                    expected,
                    actual: self.column_count,
                    row: self.row_count,
                });
            }
            Some(_) => {}
            None => {
                if self.column_count == 0 {
                    return Err(CsvError::EmptyInput);
                }
                self.expected_column_count = Some(self.column_count);
            }
        }
        self.column_count = 0;
        self.row_count += 1;
        Ok(())
    }

    pub(crate) fn add_column(&mut self, value: Cell<'a>) -> Result<()> {
        self.add_value(value)?;
        self.finish_column();
        Ok(())
    }

    pub(crate) fn add_row(&mut self, value: Cell<'a>) -> Result<()> {
        self.add_value(value)?;
        self.finish_column();
        self.finish_row()
    }

    /// Records a row consisting only of a row separator.
    pub(crate) fn add_blank_row(&mut self) -> Result<()> {
        self.flush_blank_row()?;
        self.pending_blank_row = true;
        Ok(())
    }

    fn flush_blank_row(&mut self) -> Result<()> {
        if std::mem::take(&mut self.pending_blank_row) {
            self.values.push(Cow::Borrowed(""));
            self.finish_column();
            self.finish_row()?;
        }
        Ok(())
    }

    pub(crate) fn finish(self, has_header_row: bool) -> Result<ParsedCsv<'a>> {
        let column_count = match self.expected_column_count {
            Some(count) if count > 0 && self.has_content => count,
            _ => return Err(CsvError::EmptyInput),
        };
        if self.column_count != 0 || self.values.len() % column_count != 0 {
            return Err(CsvError::ColumnCountMismatch {
                expected: column_count,
                actual: self.column_count,
                row: self.row_count,
            });
        }

        Ok(ParsedCsv {
            values: self.values,
            column_count,
            has_header_row,
        })
    }
}
