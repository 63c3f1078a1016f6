pub mod advice;
pub mod check;
pub mod entail;
pub mod mark;
pub mod result;
pub mod rewrite;

pub use check::{check_proof, check_proof_of};
pub use result::ProofError;
