use crate::exp::Exp;

/// Expressions and formulas are decorated with their type during
/// type checking. `typ` returns that annotation, if present.
pub trait HasType {
    fn typ(&self) -> Option<Box<Exp>>;
}
