/// How cells are recognized as nil when decoding `Option<T>` values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NilDecodingStrategy {
    /// No cell is ever nil.
    Never,
    /// The empty cell is nil.
    #[default]
    Empty,
    /// The literal text `null` is nil.
    Null,
    /// A caller-supplied literal is nil.
    Custom(String),
}

impl NilDecodingStrategy {
    fn literal(&self) -> Option<String> {
        match self {
            NilDecodingStrategy::Never => None,
            NilDecodingStrategy::Empty => Some(String::new()),
            NilDecodingStrategy::Null => Some("null".to_string()),
            NilDecodingStrategy::Custom(literal) => Some(literal.clone()),
        }
    }
}

/// Which literals decode to `true` and `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoolDecodingStrategy {
    /// `true` and `false`.
    #[default]
    TrueOrFalse,
    /// `1` and `0`.
    ZeroOrOne,
    /// Caller-supplied literals.
    Custom {
        true_literal: String,
        false_literal: String,
    },
}

impl BoolDecodingStrategy {
    fn literals(&self) -> (String, String) {
        match self {
            BoolDecodingStrategy::TrueOrFalse => ("true".to_string(), "false".to_string()),
            BoolDecodingStrategy::ZeroOrOne => ("1".to_string(), "0".to_string()),
            BoolDecodingStrategy::Custom {
                true_literal,
                false_literal,
            } => (true_literal.clone(), false_literal.clone()),
        }
    }
}

/// Literal conventions shared read-only by a whole decode traversal.
///
/// Matching is exact: no case folding and no trimming beyond what the
/// tokenizer already did.
///
/// # Examples
///
/// ```
/// use csv_columns::decode::options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy};
///
/// let options = DecodeOptions::new(
///     &NilDecodingStrategy::Custom("N/A".to_string()),
///     &BoolDecodingStrategy::ZeroOrOne,
/// );
///
/// assert!(options.is_nil("N/A"));
/// assert!(!options.is_nil(""));
/// assert_eq!(options.parse_bool("1"), Some(true));
/// assert_eq!(options.parse_bool("true"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    nil_literal: Option<String>,
    true_literal: String,
    false_literal: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new(&NilDecodingStrategy::default(), &BoolDecodingStrategy::default())
    }
}

impl DecodeOptions {
    /// Resolves both strategies into the literals they stand for.
    ///
    /// # Parameters
    /// - `nil`: Which cell text decodes as `None`
    /// - `boolean`: Which cell texts decode as `true` and `false`
    pub fn new(nil: &NilDecodingStrategy, boolean: &BoolDecodingStrategy) -> Self {
        let (true_literal, false_literal) = boolean.literals();
        Self {
            nil_literal: nil.literal(),
            true_literal,
            false_literal,
        }
    }

    /// The text decoded as `None`, or `None` under
    /// [`NilDecodingStrategy::Never`].
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::decode::options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy};
    ///
    /// let boolean = BoolDecodingStrategy::default();
    ///
    /// assert_eq!(DecodeOptions::default().nil_literal(), Some(""));
    /// assert_eq!(
    ///     DecodeOptions::new(&NilDecodingStrategy::Null, &boolean).nil_literal(),
    ///     Some("null")
    /// );
    /// assert_eq!(
    ///     DecodeOptions::new(&NilDecodingStrategy::Never, &boolean).nil_literal(),
    ///     None
    /// );
    /// ```
    pub fn nil_literal(&self) -> Option<&str> {
        self.nil_literal.as_deref()
    }

    /// The text decoded as `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_columns::decode::options::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy};
    ///
    /// let options = DecodeOptions::new(
    ///     &NilDecodingStrategy::Empty,
    ///     &BoolDecodingStrategy::Custom {
    ///         true_literal: "yes".to_string(),
    ///         false_literal: "no".to_string(),
    ///     },
    /// );
    ///
    /// assert_eq!(options.true_literal(), "yes");
    /// assert_eq!(options.false_literal(), "no");
    /// ```
    pub fn true_literal(&self) -> &str {
        &self.true_literal
    }

    /// The text decoded as `false`.
    pub fn false_literal(&self) -> &str {
        &self.false_literal
    }

    /// Whether `text` is the configured nil literal. Always false under
    /// [`NilDecodingStrategy::Never`].
    pub fn is_nil(&self, text: &str) -> bool {
        self.nil_literal.as_deref() == Some(text)
    }

    /// `Some(true)` or `Some(false)` for the configured literals, `None` for
    /// anything else.
    pub fn parse_bool(&self, text: &str) -> Option<bool> {
        if text == self.true_literal {
            Some(true)
        } else if text == self.false_literal {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoolDecodingStrategy, DecodeOptions, NilDecodingStrategy};

    #[test]
    fn default_treats_empty_as_nil() {
        let options = DecodeOptions::default();

        assert!(options.is_nil(""));
        assert!(!options.is_nil("null"));
        assert_eq!(options.parse_bool("true"), Some(true));
        assert_eq!(options.parse_bool("false"), Some(false));
        assert_eq!(options.parse_bool("TRUE"), None);
    }

    #[test]
    fn never_strategy_recognizes_nothing() {
        let options =
            DecodeOptions::new(&NilDecodingStrategy::Never, &BoolDecodingStrategy::default());

        assert_eq!(options.nil_literal(), None);
        assert!(!options.is_nil(""));
        assert!(!options.is_nil("null"));
    }

    #[test]
    fn null_strategy_matches_exact_literal() {
        let options =
            DecodeOptions::new(&NilDecodingStrategy::Null, &BoolDecodingStrategy::default());

        assert!(options.is_nil("null"));
        assert!(!options.is_nil("NULL"));
        assert!(!options.is_nil(""));
    }

    #[test]
    fn custom_bool_literals() {
        let options = DecodeOptions::new(
            &NilDecodingStrategy::default(),
            &BoolDecodingStrategy::Custom {
                true_literal: "yes".to_string(),
                false_literal: "no".to_string(),
            },
        );

        assert_eq!(options.parse_bool("yes"), Some(true));
        assert_eq!(options.parse_bool("no"), Some(false));
        assert_eq!(options.parse_bool("true"), None);
    }
}
