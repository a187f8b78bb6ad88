//! Compiler error types

use thiserror::Error;

/// Everything that can go wrong while compiling a template document.
///
/// The messages are operator-facing surface text: callers display them
/// verbatim next to the template editor.
#[derive(Error, Debug)]
pub enum CompilerError {
    /// The document is not valid YAML. `line`/`column` carry the parser's
    /// locator when it supplies one; `reason` already embeds it for
    /// display.
    #[error("template syntax error: {reason}")]
    Syntax {
        reason: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The document parsed but does not have the shape of a template.
    #[error("invalid template structure: {0}")]
    InvalidStructure(String),

    #[error("a rule is missing a name")]
    MissingRuleName,

    #[error("rule '{rule}' is missing a network protocol")]
    MissingProtocol { rule: String },

    #[error("rule '{rule}' has unknown network protocol '{value}'")]
    UnknownProtocol { rule: String, value: String },
}

impl From<serde_yaml::Error> for CompilerError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        CompilerError::Syntax {
            reason: err.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }
}
