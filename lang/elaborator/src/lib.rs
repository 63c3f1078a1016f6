pub mod ctx;
pub mod normalizer;
pub mod result;
pub mod typechecker;
pub mod unifier;

pub use ctx::*;
pub use result::TypeError;
