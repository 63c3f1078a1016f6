use std::fmt;

use codespan::Span;
use derivative::Derivative;

use crate::traits::HasSpan;

/// The separator between the base name of an overloaded definition and the
/// numeric disambiguator that makes its canonical name unique.
pub const DISAMBIGUATOR: char = '.';

fn base_of(id: &str) -> &str {
    match id.find(DISAMBIGUATOR) {
        Some(pos) => &id[..pos],
        None => id,
    }
}

// Local variables (binding site)
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct VarBind {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl VarBind {
    pub fn from_string(id: &str) -> Self {
        VarBind { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for VarBind {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// Local variables (bound occurrence)
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct VarBound {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl VarBound {
    pub fn from_string(id: &str) -> Self {
        VarBound { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for VarBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for VarBound {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<VarBind> for VarBound {
    fn from(var: VarBind) -> Self {
        VarBound { span: var.span, id: var.id }
    }
}

// Global identifiers (binding site)
//
//

/// The name under which a module-level entity is bound in the environment.
/// For overloaded definitions this is the canonical, disambiguated name
/// (e.g. `+.2`); `base_name` recovers the name the user wrote.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IdBind {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl IdBind {
    pub fn from_string(id: &str) -> Self {
        IdBind { span: None, id: id.to_owned() }
    }

    pub fn base_name(&self) -> &str {
        base_of(&self.id)
    }
}

impl fmt::Display for IdBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_name())
    }
}

impl HasSpan for IdBind {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<IdBound> for IdBind {
    fn from(id: IdBound) -> Self {
        IdBind { span: id.span, id: id.id }
    }
}

impl From<VarBind> for IdBind {
    fn from(var: VarBind) -> Self {
        IdBind { span: var.span, id: var.id }
    }
}

impl PartialEq<IdBound> for IdBind {
    fn eq(&self, other: &IdBound) -> bool {
        self.id == other.id
    }
}

// Global identifiers (bound occurrence)
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IdBound {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl IdBound {
    pub fn from_string(id: &str) -> Self {
        IdBound { span: None, id: id.to_owned() }
    }

    pub fn base_name(&self) -> &str {
        base_of(&self.id)
    }
}

impl fmt::Display for IdBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_name())
    }
}

impl HasSpan for IdBound {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<IdBind> for IdBound {
    fn from(id: IdBind) -> Self {
        IdBound { span: id.span, id: id.id }
    }
}

impl PartialEq<IdBind> for IdBound {
    fn eq(&self, other: &IdBind) -> bool {
        self.id == other.id
    }
}

// De Bruijn indices and levels
//
//

/// A De Bruijn index, counting binding sites of one flavor (term, type or
/// proof) from the innermost binder outwards. Which flavor an index counts is
/// determined by the node that carries it: `Variable` and proof variables
/// count term and proof binders, `TypeVariable` counts type binders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Idx(pub usize);

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A De Bruijn level, counting binding sites of one flavor from the root of
/// the environment inwards. Levels are stable under pushing further binders,
/// which makes them the right currency for remembering a binding across
/// nested scopes (e.g. the pattern variables a recursive call may consume).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lvl(pub usize);

impl Lvl {
    /// Convert to an index, given the current number of binders of the
    /// relevant flavor.
    pub fn to_idx(self, depth: usize) -> Idx {
        Idx(depth - 1 - self.0)
    }
}

impl Idx {
    pub fn to_lvl(self, depth: usize) -> Lvl {
        Lvl(depth - 1 - self.0)
    }
}

impl fmt::Display for Lvl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lvl:{}", self.0)
    }
}
