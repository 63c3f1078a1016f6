//! The checking environment: one ordered, persistent list of bindings.
//!
//! Type, term and proof bindings share a single cons list but occupy three
//! independent De Bruijn index spaces: an index only ever counts bindings of
//! its own flavor. Every payload stored in a cell is interpreted relative to
//! the environment *strictly below* that cell, so a lookup shifts the
//! returned type/formula/value by the number of term and type cells between
//! the head of the list and the payload's own scope.

use std::rc::Rc;

use codespan::Span;

use crate::decls::Union;
use crate::exp::Exp;
use crate::ident::*;
use crate::traits::{Shift, shift_and_clone};

// Bindings
//
//

#[derive(Debug, Clone)]
pub enum Binding {
    Typ(TypeBinding),
    Term(TermBinding),
    Proof(ProofBinding),
}

/// An abstract type variable if `defn` is absent, otherwise a union type.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    pub span: Option<Span>,
    pub defn: Option<Union>,
}

/// A function, constructor or defined constant.
#[derive(Debug, Clone)]
pub struct TermBinding {
    pub span: Option<Span>,
    pub typ: Box<Exp>,
    pub defn: Option<Box<Exp>>,
}

/// A hypothesis. Local hypotheses are the ones introduced inside a proof;
/// they are the facts listed as "Givens" in diagnostics.
#[derive(Debug, Clone)]
pub struct ProofBinding {
    pub span: Option<Span>,
    pub formula: Box<Exp>,
    pub local: bool,
}

#[derive(Debug)]
struct Cell {
    name: IdBind,
    binding: Binding,
    next: Option<Rc<Cell>>,
}

// Env
//
//

#[derive(Debug, Clone, Default)]
pub struct Env {
    head: Option<Rc<Cell>>,
    terms: usize,
    types: usize,
    proofs: usize,
}

impl Env {
    pub fn empty() -> Env {
        Env::default()
    }

    fn push(&self, name: IdBind, binding: Binding) -> Env {
        let (terms, types, proofs) = match binding {
            Binding::Typ(_) => (self.terms, self.types + 1, self.proofs),
            Binding::Term(_) => (self.terms + 1, self.types, self.proofs),
            Binding::Proof(_) => (self.terms, self.types, self.proofs + 1),
        };
        Env {
            head: Some(Rc::new(Cell { name, binding, next: self.head.clone() })),
            terms,
            types,
            proofs,
        }
    }

    // Extending the environment
    //
    //

    pub fn declare_type(&self, span: Option<Span>, name: impl Into<IdBind>) -> Env {
        self.push(name.into(), Binding::Typ(TypeBinding { span, defn: None }))
    }

    pub fn declare_type_vars(&self, span: Option<Span>, vars: &[VarBind]) -> Env {
        let mut env = self.clone();
        for var in vars {
            env = env.declare_type(span, var.clone());
        }
        env
    }

    pub fn define_type(&self, span: Option<Span>, name: impl Into<IdBind>, defn: Union) -> Env {
        self.push(name.into(), Binding::Typ(TypeBinding { span, defn: Some(defn) }))
    }

    pub fn declare_term_var(
        &self,
        span: Option<Span>,
        name: impl Into<IdBind>,
        typ: Box<Exp>,
    ) -> Env {
        self.push(name.into(), Binding::Term(TermBinding { span, typ, defn: None }))
    }

    pub fn declare_term_vars<N: Into<IdBind>>(
        &self,
        span: Option<Span>,
        vars: impl IntoIterator<Item = (N, Box<Exp>)>,
    ) -> Env {
        let mut env = self.clone();
        for (name, typ) in vars {
            env = env.declare_term_var(span, name, typ);
        }
        env
    }

    pub fn define_term_var(
        &self,
        span: Option<Span>,
        name: impl Into<IdBind>,
        typ: Box<Exp>,
        defn: Box<Exp>,
    ) -> Env {
        self.push(name.into(), Binding::Term(TermBinding { span, typ, defn: Some(defn) }))
    }

    pub fn declare_proof_var(
        &self,
        span: Option<Span>,
        name: impl Into<IdBind>,
        formula: Box<Exp>,
    ) -> Env {
        self.push(name.into(), Binding::Proof(ProofBinding { span, formula, local: false }))
    }

    pub fn declare_local_proof_var(
        &self,
        span: Option<Span>,
        name: impl Into<IdBind>,
        formula: Box<Exp>,
    ) -> Env {
        self.push(name.into(), Binding::Proof(ProofBinding { span, formula, local: true }))
    }

    // Depths and levels
    //
    //

    pub fn term_depth(&self) -> usize {
        self.terms
    }

    pub fn type_depth(&self) -> usize {
        self.types
    }

    pub fn proof_depth(&self) -> usize {
        self.proofs
    }

    /// The level the *next* term binding will receive.
    pub fn term_level(&self) -> Lvl {
        Lvl(self.terms)
    }

    // Indexed lookups
    //
    //

    /// Walk to the `idx`-th cell of the given flavor. Returns the cell plus
    /// the number of term and type cells from the head through the landing
    /// cell (inclusive of the landing cell's own flavor contribution);
    /// payloads must be shifted by exactly these amounts.
    fn walk_flavor(&self, flavor: Flavor, idx: Idx) -> Option<(&Cell, usize, usize)> {
        let mut remaining = idx.0;
        let mut terms = 0;
        let mut types = 0;
        let mut curr = self.head.as_deref();
        while let Some(cell) = curr {
            let cell_flavor = match cell.binding {
                Binding::Typ(_) => Flavor::Typ,
                Binding::Term(_) => Flavor::Term,
                Binding::Proof(_) => Flavor::Proof,
            };
            match cell_flavor {
                Flavor::Term => terms += 1,
                Flavor::Typ => types += 1,
                Flavor::Proof => {}
            }
            if cell_flavor == flavor {
                if remaining == 0 {
                    return Some((cell, terms, types));
                }
                remaining -= 1;
            }
            curr = cell.next.as_deref();
        }
        None
    }

    fn lift<T: Shift + Clone>(payload: &T, terms: usize, types: usize) -> T {
        shift_and_clone(payload, (terms as isize, types as isize))
    }

    pub fn type_of_term_idx(&self, idx: Idx) -> Option<Box<Exp>> {
        let (cell, terms, types) = self.walk_flavor(Flavor::Term, idx)?;
        match &cell.binding {
            Binding::Term(binding) => Some(Env::lift(&binding.typ, terms, types)),
            _ => None,
        }
    }

    pub fn value_of_term_idx(&self, idx: Idx) -> Option<Box<Exp>> {
        let (cell, terms, types) = self.walk_flavor(Flavor::Term, idx)?;
        match &cell.binding {
            Binding::Term(binding) => {
                binding.defn.as_ref().map(|defn| Env::lift(defn, terms, types))
            }
            _ => None,
        }
    }

    pub fn name_of_term_idx(&self, idx: Idx) -> Option<IdBind> {
        let (cell, _, _) = self.walk_flavor(Flavor::Term, idx)?;
        Some(cell.name.clone())
    }

    pub fn formula_of_proof_idx(&self, idx: Idx) -> Option<Box<Exp>> {
        let (cell, terms, types) = self.walk_flavor(Flavor::Proof, idx)?;
        match &cell.binding {
            Binding::Proof(binding) => {
                Some(Env::lift(&binding.formula, terms, types))
            }
            _ => None,
        }
    }

    // Name-based lookups (module-level entities)
    //
    //

    fn cells(&self) -> CellIter<'_> {
        CellIter { curr: self.head.as_deref(), terms: 0, types: 0 }
    }

    /// Collect every term binding whose base name matches, innermost first.
    /// Used for overload candidate collection.
    pub fn term_candidates(&self, base: &str) -> Vec<(IdBound, Box<Exp>)> {
        let mut result = Vec::new();
        for (cell, terms, types) in self.cells() {
            if let Binding::Term(binding) = &cell.binding {
                if cell.name.base_name() == base {
                    result.push((
                        IdBound::from(cell.name.clone()),
                        Env::lift(&binding.typ, terms, types),
                    ));
                }
            }
        }
        result
    }

    pub fn type_of_term(&self, canonical: &str) -> Option<Box<Exp>> {
        for (cell, terms, types) in self.cells() {
            if let Binding::Term(binding) = &cell.binding {
                if cell.name.id == canonical {
                    return Some(Env::lift(&binding.typ, terms, types));
                }
            }
        }
        None
    }

    pub fn value_of_term(&self, canonical: &str) -> Option<Box<Exp>> {
        for (cell, terms, types) in self.cells() {
            if let Binding::Term(binding) = &cell.binding {
                if cell.name.id == canonical {
                    return binding
                        .defn
                        .as_ref()
                        .map(|defn| Env::lift(defn, terms, types));
                }
            }
        }
        None
    }

    pub fn term_exists(&self, canonical: &str) -> bool {
        self.cells().any(|(cell, _, _)| {
            matches!(cell.binding, Binding::Term(_)) && cell.name.id == canonical
        })
    }

    /// Look up the union definition of a type name. `None` means the name
    /// is unbound or an abstract type variable.
    pub fn def_of_type(&self, name: &str) -> Option<Union> {
        for (cell, _, _) in self.cells() {
            if let Binding::Typ(binding) = &cell.binding {
                if cell.name.id == name {
                    return binding.defn.clone();
                }
            }
        }
        None
    }

    pub fn type_exists(&self, name: &str) -> bool {
        self.cells()
            .any(|(cell, _, _)| matches!(cell.binding, Binding::Typ(_)) && cell.name.id == name)
    }

    /// Whether `name` is a constructor of some union in scope.
    pub fn is_constructor(&self, name: &str) -> bool {
        self.cells().any(|(cell, _, _)| match &cell.binding {
            Binding::Typ(TypeBinding { defn: Some(union), .. }) => {
                union.ctors.iter().any(|ctor| ctor.name.base_name() == name)
            }
            _ => false,
        })
    }

    /// Find the union that declares the given constructor.
    pub fn union_of_constructor(&self, name: &str) -> Option<Union> {
        for (cell, _, _) in self.cells() {
            if let Binding::Typ(TypeBinding { defn: Some(union), .. }) = &cell.binding {
                if union.ctors.iter().any(|ctor| ctor.name.base_name() == name) {
                    return Some(union.clone());
                }
            }
        }
        None
    }

    pub fn formula_of_proof_var(&self, name: &str) -> Option<Box<Exp>> {
        for (cell, terms, types) in self.cells() {
            if let Binding::Proof(binding) = &cell.binding {
                if cell.name.id == name || cell.name.base_name() == name {
                    return Some(Env::lift(&binding.formula, terms, types));
                }
            }
        }
        None
    }

    /// All local hypotheses in scope, innermost first, with their formulas
    /// lifted into the current scope. These are the "Givens" shown in
    /// diagnostics.
    pub fn local_proofs(&self) -> Vec<(IdBind, Box<Exp>)> {
        let mut result = Vec::new();
        for (cell, terms, types) in self.cells() {
            if let Binding::Proof(binding) = &cell.binding {
                if binding.local {
                    result.push((
                        cell.name.clone(),
                        Env::lift(&binding.formula, terms, types),
                    ));
                }
            }
        }
        result
    }

    /// Every proved formula in scope (local hypotheses and theorems),
    /// lifted into the current scope.
    pub fn proved_formulas(&self) -> Vec<Box<Exp>> {
        let mut result = Vec::new();
        for (cell, terms, types) in self.cells() {
            if let Binding::Proof(binding) = &cell.binding {
                result.push(Env::lift(&binding.formula, terms, types));
            }
        }
        result
    }

    /// The index the given base name currently resolves to, if any.
    pub fn index_of_term_var(&self, base: &str) -> Option<Idx> {
        let mut idx = 0;
        for (cell, _, _) in self.cells() {
            if let Binding::Term(_) = cell.binding {
                if cell.name.base_name() == base {
                    return Some(Idx(idx));
                }
                idx += 1;
            }
        }
        None
    }

    /// Whether the given base name is already bound to a term. Used to pick
    /// fresh display names.
    pub fn term_base_name_taken(&self, base: &str) -> bool {
        self.cells().any(|(cell, _, _)| {
            matches!(cell.binding, Binding::Term(_)) && cell.name.base_name() == base
        })
    }

    /// The binding site of the most recent term binding with the given
    /// base name. Used to point duplicate-definition errors at the
    /// original definition.
    pub fn span_of_term_base(&self, base: &str) -> Option<Span> {
        for (cell, _, _) in self.cells() {
            if let Binding::Term(binding) = &cell.binding {
                if cell.name.base_name() == base {
                    return binding.span;
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Typ,
    Term,
    Proof,
}

/// Iterator over the cells of an environment, tracking how many term and
/// type cells have been passed *through* (inclusive of the yielded cell).
struct CellIter<'a> {
    curr: Option<&'a Cell>,
    terms: usize,
    types: usize,
}

impl<'a> Iterator for CellIter<'a> {
    type Item = (&'a Cell, usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.curr?;
        match cell.binding {
            Binding::Typ(_) => self.types += 1,
            Binding::Term(_) => self.terms += 1,
            Binding::Proof(_) => {}
        }
        self.curr = cell.next.as_deref();
        Some((cell, self.terms, self.types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp::*;

    #[test]
    fn term_lookup_shifts_values() {
        // a : int, z := a, w : int — the value of z mentions a and must be
        // lifted past both z itself and w.
        let env = Env::empty()
            .declare_term_var(None, IdBind::from_string("a"), Box::new(IntType::mk()))
            .define_term_var(
                None,
                IdBind::from_string("z"),
                Box::new(IntType::mk()),
                Box::new(Variable::mk(0, "a")),
            )
            .declare_term_var(None, IdBind::from_string("w"), Box::new(IntType::mk()));
        let value = env.value_of_term_idx(Idx(1)).unwrap();
        assert_eq!(*value, Variable::mk(2, "a"));
    }

    #[test]
    fn proof_lookup_shifts_past_term_binders() {
        // x : int, H : x = x, y : int — retrieving H from under y must
        // bump the term index of x by one.
        let env = Env::empty()
            .declare_term_var(None, IdBind::from_string("x"), Box::new(IntType::mk()))
            .declare_local_proof_var(
                None,
                IdBind::from_string("H"),
                Box::new(mk_equal(None, Variable::mk(0, "x"), Variable::mk(0, "x"))),
            )
            .declare_term_var(None, IdBind::from_string("y"), Box::new(IntType::mk()));
        let formula = env.formula_of_proof_idx(Idx(0)).unwrap();
        assert_eq!(*formula, mk_equal(None, Variable::mk(1, "x"), Variable::mk(1, "x")));
    }

    #[test]
    fn candidates_collects_overloads() {
        let plus_nat = FunType::mk(
            vec![TypApp::mk("Nat", vec![]), TypApp::mk("Nat", vec![])],
            TypApp::mk("Nat", vec![]),
        );
        let plus_int = FunType::mk(vec![IntType::mk(), IntType::mk()], IntType::mk());
        let env = Env::empty()
            .declare_term_var(None, IdBind::from_string("+"), Box::new(plus_nat))
            .declare_term_var(None, IdBind::from_string("+.1"), Box::new(plus_int));
        let candidates = env.term_candidates("+");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].0.id, "+.1");
        assert_eq!(candidates[1].0.id, "+");
    }

    #[test]
    fn flavors_have_independent_index_spaces() {
        let env = Env::empty()
            .declare_type(None, IdBind::from_string("T"))
            .declare_term_var(None, IdBind::from_string("x"), Box::new(TypeVariable::mk(0, "T")))
            .declare_type(None, IdBind::from_string("U"));
        // x is still the innermost *term* binding, but its type must now
        // point one type binder further out.
        let typ = env.type_of_term_idx(Idx(0)).unwrap();
        assert_eq!(*typ, TypeVariable::mk(1, "T"));
    }
}
