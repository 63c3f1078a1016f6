pub mod has_span;
pub mod has_type;
pub mod shift;
pub mod subst;

pub use has_span::*;
pub use has_type::*;
pub use shift::*;
pub use subst::*;
