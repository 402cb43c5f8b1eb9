use std::io;
use thiserror::Error;

/// Failures raised while evaluating a syntax tree.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A node of the wrong kind where a command or pipeline was expected.
    #[error("cannot evaluate a {kind} node here")]
    Structural { kind: &'static str },

    /// Process or channel creation failed because of OS limits.
    #[error("{command}: cannot create process: {source}")]
    Resource {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot create pipe: {0}")]
    Channel(#[source] io::Error),

    /// The named program could not be executed.
    #[error("{command}: {source}")]
    Exec {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command}: argument count mismatch (counted {expected}, filled {actual})")]
    ArgumentCountMismatch {
        command: String,
        expected: usize,
        actual: usize,
    },

    #[error("{command}: wait failed: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}
