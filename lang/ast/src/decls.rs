use codespan::Span;
use derivative::Derivative;

use crate::exp::{Exp, RecFun, TypApp, UnknownInst};
use crate::ident::*;
use crate::proofs::Proof;
use crate::traits::HasSpan;

// Module
//
//

/// A fully parsed module: a list of declarations plus an identity used for
/// import memoization.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Def(Def),
    Fun(RecFun),
    Union(Union),
    Theorem(Theorem),
    Import(Import),
    Assert(Assert),
    Print(PrintStmt),
}

impl HasSpan for Decl {
    fn span(&self) -> Option<Span> {
        match self {
            Decl::Def(d) => d.span,
            Decl::Fun(d) => d.span,
            Decl::Union(d) => d.span,
            Decl::Theorem(d) => d.span,
            Decl::Import(d) => d.span,
            Decl::Assert(d) => d.span,
            Decl::Print(d) => d.span,
        }
    }
}

/// A `define` of a constant or (possibly overloaded) function.
/// The declared type is optional; without it the type is synthesized.
#[derive(Debug, Clone)]
pub struct Def {
    pub span: Option<Span>,
    pub name: IdBind,
    pub typ: Option<Box<Exp>>,
    pub body: Box<Exp>,
}

/// A union (algebraic data type) declaration. Constructor parameter types
/// are under the type binders introduced by `type_params`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Union {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    pub type_params: Vec<VarBind>,
    pub ctors: Vec<Ctor>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Ctor {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    pub params: Vec<Exp>,
}

#[derive(Debug, Clone)]
pub struct Theorem {
    pub span: Option<Span>,
    pub name: IdBind,
    pub formula: Box<Exp>,
    pub proof: Proof,
    pub is_lemma: bool,
}

/// An import carries the already-parsed AST of the imported module.
/// Resolving module names to files is the concern of the surrounding
/// tooling, not of the checker.
#[derive(Debug, Clone)]
pub struct Import {
    pub span: Option<Span>,
    pub module: Module,
}

#[derive(Debug, Clone)]
pub struct Assert {
    pub span: Option<Span>,
    pub formula: Box<Exp>,
}

#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub span: Option<Span>,
    pub term: Box<Exp>,
}

// Helpers
//
//

impl Union {
    /// Whether a constructor parameter type is a recursive occurrence of
    /// this union (and therefore gives rise to an induction hypothesis).
    pub fn is_recursive_param(&self, typ: &Exp) -> bool {
        match typ {
            Exp::TypApp(TypApp { name, .. }) => name.id == self.name.id,
            Exp::UnknownInst(UnknownInst { name, .. }) => name.id == self.name.id,
            _ => false,
        }
    }

    pub fn ctor(&self, name: &str) -> Option<&Ctor> {
        self.ctors
            .iter()
            .find(|ctor| ctor.name.id == name || ctor.name.base_name() == name)
    }
}

impl Ctor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
