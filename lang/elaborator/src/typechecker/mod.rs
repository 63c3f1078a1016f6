mod call;
mod check;
mod pattern;
mod types;

pub use call::*;
pub use check::*;
pub use pattern::*;
pub use types::*;
