use std::fmt;

use crate::parse::table::ColumnKey;

/// Where in the traversal a value is being decoded, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Path<'k> {
    Root,
    Column(ColumnKey<'k>),
    /// `row` counts data rows from zero.
    Cell { column: ColumnKey<'k>, row: usize },
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => f.write_str("<root>"),
            Path::Column(column) => write!(f, "{}", column),
            Path::Cell { column, row } => write!(f, "{}[{}]", column, row),
        }
    }
}
