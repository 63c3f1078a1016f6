pub mod reduce;

pub use reduce::Reduce;
