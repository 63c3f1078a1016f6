use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(transparent)]
#[error(transparent)]
pub enum Error {
    Type(#[from] elaborator::TypeError),
    Proof(#[from] prover::ProofError),
    Driver(#[from] DriverError),
}

impl Error {
    /// Whether the module failed only because of an unfinished proof.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::Proof(proof) if proof.is_incomplete())
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    #[error("assertion failed:\n\t{lhs} ≠ {rhs}")]
    AssertionFailed {
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("assertion expected a boolean result, not {result}")]
    AssertionNotBoolean {
        result: String,
        #[label]
        span: Option<SourceSpan>,
    },
}
