pub mod unify;

pub use unify::*;
