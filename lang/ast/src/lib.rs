pub mod ctx;
pub mod decls;
pub mod diff;
pub mod exp;
pub mod ident;
pub mod print;
pub mod proofs;
pub mod traits;

pub use decls::*;
pub use diff::*;
pub use exp::*;
pub use ident::*;
pub use proofs::*;
pub use traits::*;

pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
pub type HashSet<V> = fxhash::FxHashSet<V>;
