mod database;
mod result;

pub use database::Database;
pub use elaborator::ctx::Verbosity;
pub use result::*;
