use smol_str::SmolStr;
use syntax::SyntaxKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Node was forgotten: {kind:?} {text:?}")]
    NodeForgotten { kind: SyntaxKind, text: SmolStr },
    #[error("{operation} is not supported on {kind:?}")]
    Unsupported { operation: &'static str, kind: SyntaxKind },
}

impl EditError {
    pub(crate) fn invalid(message: impl Into<String>) -> EditError {
        EditError::InvalidArgument(message.into())
    }
}
