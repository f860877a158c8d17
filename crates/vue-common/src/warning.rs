//! Non-fatal merge outcomes.

use thiserror::Error;

/// Something a merge could not combine cleanly. The merge still finishes
/// and keeps both sides' code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum MergeWarning {
    /// Both sides declare the option with different values. The fragment
    /// entry was placed right after the host entry.
    #[error("option `{key}` exists in both components with different values; kept both")]
    UnmergeableOption {
        /// The option key.
        key: String,
    },

    /// Two function bodies do not both return object literals.
    #[error("returns of `{key}` cannot be merged; fragment statements were appended")]
    UnmergeableReturns {
        /// The option key of the function.
        key: String,
    },

    /// One default export is not an object literal.
    #[error("default export is not an object literal; fragment export kept as a statement")]
    NonObjectDefaultExport,

    /// A fragment import binds a local name the host already binds.
    #[error("import of `{name}` duplicates a host binding; rename one of them")]
    DuplicateImport {
        /// The local binding name.
        name: String,
    },

    /// A template expression could not be parsed and was left unchanged.
    #[error("cannot parse template expression `{expression}`: {message}")]
    UnparsableExpression {
        /// The expression text.
        expression: String,
        /// The parser's message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = MergeWarning::UnmergeableOption {
            key: "name".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "option `name` exists in both components with different values; kept both"
        );
    }
}
