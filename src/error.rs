use purist_ast::{Node, Token};

/// Fatal analysis failures.
///
/// These indicate a bug in the caller or in pass wiring, never a property of
/// the analyzed program. Unanalyzable program constructs are not errors;
/// they pessimize the affected summary instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The pass was driven twice.
    #[error("purity analysis may only be run once per instance")]
    AlreadyProcessed,
    /// A name key in the reference map was empty.
    #[error("empty name key in reference map")]
    EmptyName,
    /// A reference node has no derivable short name.
    #[error("cannot derive a name for reference node {0:?}")]
    UnexpectedReference(Node),
    /// A side-effecting token reached the body analyzer without a handler.
    #[error("unhandled side-effecting token {0:?} in function body")]
    UnhandledToken(Token),
}
