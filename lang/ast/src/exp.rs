use codespan::Span;
use derivative::Derivative;
use num_bigint::BigInt;

use crate::ident::*;
use crate::traits::{HasSpan, HasType};

/// Binder names are display hints; two binder lists are interchangeable
/// whenever they bind the same number of variables.
fn binder_names_eq(lhs: &Vec<VarBind>, rhs: &Vec<VarBind>) -> bool {
    lhs.len() == rhs.len()
}

#[allow(clippy::ptr_arg)]
fn binder_names_hash<H: std::hash::Hasher>(binders: &Vec<VarBind>, state: &mut H) {
    std::hash::Hash::hash(&binders.len(), state)
}

// Exp
//
//

/// One tagged sum for terms, types and formulas. Types can appear wherever
/// terms appear (e.g. as arguments of a type application) and formulas are
/// boolean-typed terms, so a single syntax tree covers all three.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Exp {
    // Terms
    Variable(Variable),
    TypeVariable(TypeVariable),
    Global(Global),
    IntLit(IntLit),
    BoolLit(BoolLit),
    Lambda(Lambda),
    Generic(Generic),
    Call(Call),
    TermInst(TermInst),
    Conditional(Conditional),
    LocalLet(LocalLet),
    Match(Match),
    MakeArray(MakeArray),
    ArrayGet(ArrayGet),
    Hole(Hole),
    Omitted(Omitted),
    Mark(Mark),
    RecFun(RecFun),
    // Types
    IntType(IntType),
    BoolType(BoolType),
    TypeType(TypeType),
    FunType(FunType),
    TypApp(TypApp),
    UnknownInst(UnknownInst),
    ArrayType(ArrayType),
    OverloadType(OverloadType),
    // Formulas
    And(And),
    Or(Or),
    IfThen(IfThen),
    All(All),
    Exists(Exists),
}

impl Exp {
    /// Whether this expression is one of the type variants.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Exp::IntType(_)
                | Exp::BoolType(_)
                | Exp::TypeType(_)
                | Exp::FunType(_)
                | Exp::TypApp(_)
                | Exp::UnknownInst(_)
                | Exp::ArrayType(_)
                | Exp::OverloadType(_)
        )
    }

    /// Strip `Mark` annotations at the root.
    pub fn unmarked(&self) -> &Exp {
        match self {
            Exp::Mark(Mark { subject, .. }) => subject.unmarked(),
            other => other,
        }
    }
}

// Variable
//
//

/// A bound term variable occurrence. The variable is represented using a
/// De Bruijn index counting term binders; the name is kept for
/// prettyprinting only.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub idx: Idx,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl Variable {
    pub fn mk(idx: usize, name: &str) -> Exp {
        Exp::Variable(Variable {
            span: None,
            idx: Idx(idx),
            name: VarBound::from_string(name),
            inferred_type: None,
        })
    }
}

// TypeVariable
//
//

/// A bound type variable occurrence, counting type binders
/// (generic parameters, `all T:type` binders).
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TypeVariable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub idx: Idx,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
}

impl TypeVariable {
    pub fn mk(idx: usize, name: &str) -> Exp {
        Exp::TypeVariable(TypeVariable {
            span: None,
            idx: Idx(idx),
            name: VarBound::from_string(name),
        })
    }
}

// Global
//
//

/// A reference to a module-level term binding: a function, a constructor,
/// a defined constant, or the builtin operators `=` and `≠`.
///
/// An unqualified name may resolve to several overloaded definitions. The
/// candidate list holds every canonical name the reference may stand for;
/// the type checker selects exactly one and rewrites `name` to it. A
/// reference with an empty candidate list has not been resolved at all and
/// the type checker will consult the environment by base name.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Global {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub candidates: Vec<IdBound>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl Global {
    pub fn mk(name: &str) -> Exp {
        Exp::Global(Global {
            span: None,
            name: IdBound::from_string(name),
            candidates: Vec::new(),
            inferred_type: None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.candidates.len() == 1 && self.candidates[0] == self.name
    }

    pub fn resolved(&self, name: IdBound, typ: Box<Exp>) -> Global {
        Global {
            span: self.span,
            candidates: vec![name.clone()],
            name,
            inferred_type: Some(typ),
        }
    }
}

// Literals
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IntLit {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub value: BigInt,
}

impl IntLit {
    pub fn mk(value: i64) -> Exp {
        Exp::IntLit(IntLit { span: None, value: BigInt::from(value) })
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct BoolLit {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub value: bool,
}

impl BoolLit {
    pub fn mk(value: bool) -> Exp {
        Exp::BoolLit(BoolLit { span: None, value })
    }
}

// Lambda
//
//

/// A lambda parameter. The type annotation is optional in synthesis
/// position but required for a type to be synthesized.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Param {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBind,
    pub typ: Option<Box<Exp>>,
}

/// An anonymous function `λ(x: T, y) { body }`. The body is under one term
/// binder per parameter, in order: the last parameter has index 0.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lambda {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub params: Vec<Param>,
    pub body: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

// Generic
//
//

/// A term abstracted over type parameters, `generic T { body }`.
/// The body is under one type binder per parameter.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Generic {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq(compare_with = "binder_names_eq"), Hash(hash_with = "binder_names_hash"))]
    pub params: Vec<VarBind>,
    pub body: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

// Call
//
//

/// Application of a function, constructor or operator to arguments.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Call {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub rator: Box<Exp>,
    pub args: Vec<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl Call {
    pub fn mk(rator: Exp, args: Vec<Exp>) -> Exp {
        Exp::Call(Call { span: None, rator: Box::new(rator), args, inferred_type: None })
    }
}

// TermInst
//
//

/// Instantiation of a generic term with type arguments, `f<Nat>`.
/// `inferred` records whether the instantiation was written by the user or
/// deduced by the type checker; only the latter is hidden when printing.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TermInst {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub subject: Box<Exp>,
    pub type_args: Vec<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred: bool,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl TermInst {
    pub fn mk(subject: Exp, type_args: Vec<Exp>) -> Exp {
        Exp::TermInst(TermInst {
            span: None,
            subject: Box::new(subject),
            type_args,
            inferred: false,
            inferred_type: None,
        })
    }
}

// Conditional
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Conditional {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub cond: Box<Exp>,
    pub then_branch: Box<Exp>,
    pub else_branch: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

// LocalLet
//
//

/// A term-level let binding. The body is under one term binder.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct LocalLet {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBind,
    pub bound: Box<Exp>,
    pub body: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

// Match
//
//

/// A switch over the constructors of a union (or over `true`/`false`).
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Match {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub on_exp: Box<Exp>,
    pub cases: Vec<Case>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

/// One case of a switch. The body is under one term binder per pattern
/// variable.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Case {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub pattern: Pattern,
    pub body: Box<Exp>,
}

// Pattern
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Pattern {
    Ctor(PatternCtor),
    Bool(PatternBool),
}

impl Pattern {
    /// The number of term binders this pattern introduces.
    pub fn arity(&self) -> usize {
        match self {
            Pattern::Ctor(ctor) => ctor.params.len(),
            Pattern::Bool(_) => 0,
        }
    }

    pub fn ctor(name: &str, params: &[&str]) -> Pattern {
        Pattern::Ctor(PatternCtor {
            span: None,
            name: IdBound::from_string(name),
            candidates: Vec::new(),
            params: params.iter().map(|p| VarBind::from_string(p)).collect(),
        })
    }

    pub fn bool(value: bool) -> Pattern {
        Pattern::Bool(PatternBool { span: None, value })
    }
}

impl HasSpan for Pattern {
    fn span(&self) -> Option<Span> {
        match self {
            Pattern::Ctor(p) => p.span,
            Pattern::Bool(p) => p.span,
        }
    }
}

/// A constructor pattern `node(x, xs)`. Like `Global` references, the
/// constructor name carries resolution candidates until pattern checking
/// pins down the constructor of the scrutinee's union.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct PatternCtor {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub candidates: Vec<IdBound>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub params: Vec<VarBind>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct PatternBool {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub value: bool,
}

// Arrays
//
//

/// Conversion of a `List` value into an array for constant-time indexing.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct MakeArray {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub list: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct ArrayGet {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub array: Box<Exp>,
    pub index: Box<Exp>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

// Hole, Omitted
//
//

/// A placeholder `?` for a formula or term the user has not written yet.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Hole {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl Hole {
    pub fn mk() -> Exp {
        Exp::Hole(Hole { span: None, inferred_type: None })
    }
}

/// An elided term `...`, accepted wherever the checker can fill in the
/// remainder itself.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Omitted {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub inferred_type: Option<Box<Exp>>,
}

impl Omitted {
    pub fn mk() -> Exp {
        Exp::Omitted(Omitted { span: None, inferred_type: None })
    }
}

// Mark
//
//

/// A focus annotation `#subterm#`. Rewriting and definition application
/// restrict their effect to the marked subterm when one is present.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Mark {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub subject: Box<Exp>,
}

impl Mark {
    pub fn mk(subject: Exp) -> Exp {
        Exp::Mark(Mark { span: None, subject: Box::new(subject) })
    }
}

// RecFun
//
//

/// A recursive function value. The function dispatches on the first
/// parameter, which must have a union type; each case may recurse only on
/// the pattern variables of that case.
///
/// `param_types` and `ret_type` are under the type binders introduced by
/// `type_params`. A case body is under those type binders plus one term
/// binder per pattern variable and per remaining parameter (pattern
/// variables bind first).
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct RecFun {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    #[derivative(PartialEq(compare_with = "binder_names_eq"), Hash(hash_with = "binder_names_hash"))]
    pub type_params: Vec<VarBind>,
    pub param_types: Vec<Exp>,
    pub ret_type: Box<Exp>,
    pub cases: Vec<FunCase>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct FunCase {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub pattern: Pattern,
    pub params: Vec<VarBind>,
    pub body: Box<Exp>,
}

impl RecFun {
    /// The function type declared by this recursive function.
    pub fn fun_type(&self) -> Exp {
        Exp::FunType(FunType {
            span: self.span,
            type_params: self.type_params.clone(),
            param_types: self.param_types.clone(),
            ret_type: self.ret_type.clone(),
        })
    }
}

// Types
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IntType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
}

impl IntType {
    pub fn mk() -> Exp {
        Exp::IntType(IntType { span: None })
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct BoolType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
}

impl BoolType {
    pub fn mk() -> Exp {
        Exp::BoolType(BoolType { span: None })
    }
}

/// The kind of types; `all T:type` quantifies over it.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TypeType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
}

impl TypeType {
    pub fn mk() -> Exp {
        Exp::TypeType(TypeType { span: None })
    }
}

/// A (possibly generic) function type `<T> fn(T, Nat) -> T`.
/// Parameter and return types are under the type binders.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct FunType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq(compare_with = "binder_names_eq"), Hash(hash_with = "binder_names_hash"))]
    pub type_params: Vec<VarBind>,
    pub param_types: Vec<Exp>,
    pub ret_type: Box<Exp>,
}

impl FunType {
    pub fn mk(param_types: Vec<Exp>, ret_type: Exp) -> Exp {
        Exp::FunType(FunType {
            span: None,
            type_params: Vec::new(),
            param_types,
            ret_type: Box::new(ret_type),
        })
    }

    pub fn mk_generic(type_params: &[&str], param_types: Vec<Exp>, ret_type: Exp) -> Exp {
        Exp::FunType(FunType {
            span: None,
            type_params: type_params.iter().map(|p| VarBind::from_string(p)).collect(),
            param_types,
            ret_type: Box::new(ret_type),
        })
    }
}

/// A union type, fully applied to its type arguments: `Nat`, `List<Nat>`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TypApp {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
    pub args: Vec<Exp>,
}

impl TypApp {
    pub fn mk(name: &str, args: Vec<Exp>) -> Exp {
        Exp::TypApp(TypApp { span: None, name: IdBound::from_string(name), args })
    }
}

/// The type of a nullary constructor of a generic union whose type
/// arguments have not been determined yet (e.g. a bare `empty`).
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct UnknownInst {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct ArrayType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub elem: Box<Exp>,
}

/// The type of an overloaded name before resolution: the candidate
/// definitions together with their types. Never written by users.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct OverloadType {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub overloads: Vec<Overload>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Overload {
    pub name: IdBound,
    pub typ: Box<Exp>,
}

// Formulas
//
//

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct And {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub args: Vec<Exp>,
}

impl And {
    pub fn mk(args: Vec<Exp>) -> Exp {
        Exp::And(And { span: None, args })
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Or {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub args: Vec<Exp>,
}

impl Or {
    pub fn mk(args: Vec<Exp>) -> Exp {
        Exp::Or(Or { span: None, args })
    }
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IfThen {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub premise: Box<Exp>,
    pub conclusion: Box<Exp>,
}

impl IfThen {
    pub fn mk(premise: Exp, conclusion: Exp) -> Exp {
        Exp::IfThen(IfThen {
            span: None,
            premise: Box::new(premise),
            conclusion: Box::new(conclusion),
        })
    }
}

/// A universally quantified formula `all x:T. body`. The body is under one
/// term binder, or one type binder if `var_type` is `type`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct All {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub var: VarBind,
    pub var_type: Box<Exp>,
    pub body: Box<Exp>,
}

impl All {
    pub fn mk(var: &str, var_type: Exp, body: Exp) -> Exp {
        Exp::All(All {
            span: None,
            var: VarBind::from_string(var),
            var_type: Box::new(var_type),
            body: Box::new(body),
        })
    }

    /// Whether this quantifier binds a type variable rather than a term
    /// variable.
    pub fn binds_type(&self) -> bool {
        matches!(*self.var_type, Exp::TypeType(_))
    }
}

/// An existentially quantified formula `some x:T, y:U. body`. All bound
/// variables are term variables; the body is under one term binder per
/// variable, in order.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Exists {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub vars: Vec<TypedParam>,
    pub body: Box<Exp>,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct TypedParam {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBind,
    pub typ: Box<Exp>,
}

impl TypedParam {
    pub fn mk(name: &str, typ: Exp) -> TypedParam {
        TypedParam { name: VarBind::from_string(name), typ: Box::new(typ) }
    }
}

// From impls
//
//

macro_rules! exp_from {
    ($($variant:ident),* $(,)?) => {
        $(impl From<$variant> for Exp {
            fn from(val: $variant) -> Self {
                Exp::$variant(val)
            }
        })*
    };
}

exp_from!(
    Variable,
    TypeVariable,
    Global,
    IntLit,
    BoolLit,
    Lambda,
    Generic,
    Call,
    TermInst,
    Conditional,
    LocalLet,
    Match,
    MakeArray,
    ArrayGet,
    Hole,
    Omitted,
    Mark,
    RecFun,
    IntType,
    BoolType,
    TypeType,
    FunType,
    TypApp,
    UnknownInst,
    ArrayType,
    OverloadType,
    And,
    Or,
    IfThen,
    All,
    Exists,
);

// HasSpan
//
//

impl HasSpan for Exp {
    fn span(&self) -> Option<Span> {
        match self {
            Exp::Variable(e) => e.span,
            Exp::TypeVariable(e) => e.span,
            Exp::Global(e) => e.span,
            Exp::IntLit(e) => e.span,
            Exp::BoolLit(e) => e.span,
            Exp::Lambda(e) => e.span,
            Exp::Generic(e) => e.span,
            Exp::Call(e) => e.span,
            Exp::TermInst(e) => e.span,
            Exp::Conditional(e) => e.span,
            Exp::LocalLet(e) => e.span,
            Exp::Match(e) => e.span,
            Exp::MakeArray(e) => e.span,
            Exp::ArrayGet(e) => e.span,
            Exp::Hole(e) => e.span,
            Exp::Omitted(e) => e.span,
            Exp::Mark(e) => e.span,
            Exp::RecFun(e) => e.span,
            Exp::IntType(e) => e.span,
            Exp::BoolType(e) => e.span,
            Exp::TypeType(e) => e.span,
            Exp::FunType(e) => e.span,
            Exp::TypApp(e) => e.span,
            Exp::UnknownInst(e) => e.span,
            Exp::ArrayType(e) => e.span,
            Exp::OverloadType(e) => e.span,
            Exp::And(e) => e.span,
            Exp::Or(e) => e.span,
            Exp::IfThen(e) => e.span,
            Exp::All(e) => e.span,
            Exp::Exists(e) => e.span,
        }
    }
}

// HasType
//
//

impl HasType for Exp {
    fn typ(&self) -> Option<Box<Exp>> {
        match self {
            Exp::Variable(e) => e.inferred_type.clone(),
            Exp::TypeVariable(_) => Some(Box::new(TypeType::mk())),
            Exp::Global(e) => e.inferred_type.clone(),
            Exp::IntLit(_) => Some(Box::new(IntType::mk())),
            Exp::BoolLit(_) => Some(Box::new(BoolType::mk())),
            Exp::Lambda(e) => e.inferred_type.clone(),
            Exp::Generic(e) => e.inferred_type.clone(),
            Exp::Call(e) => e.inferred_type.clone(),
            Exp::TermInst(e) => e.inferred_type.clone(),
            Exp::Conditional(e) => e.inferred_type.clone(),
            Exp::LocalLet(e) => e.inferred_type.clone(),
            Exp::Match(e) => e.inferred_type.clone(),
            Exp::MakeArray(e) => e.inferred_type.clone(),
            Exp::ArrayGet(e) => e.inferred_type.clone(),
            Exp::Hole(e) => e.inferred_type.clone(),
            Exp::Omitted(e) => e.inferred_type.clone(),
            Exp::Mark(e) => e.subject.typ(),
            Exp::RecFun(e) => Some(Box::new(e.fun_type())),
            Exp::IntType(_)
            | Exp::BoolType(_)
            | Exp::TypeType(_)
            | Exp::FunType(_)
            | Exp::TypApp(_)
            | Exp::UnknownInst(_)
            | Exp::ArrayType(_)
            | Exp::OverloadType(_) => Some(Box::new(TypeType::mk())),
            Exp::And(e) => Some(Box::new(Exp::BoolType(BoolType { span: e.span }))),
            Exp::Or(e) => Some(Box::new(Exp::BoolType(BoolType { span: e.span }))),
            Exp::IfThen(e) => Some(Box::new(Exp::BoolType(BoolType { span: e.span }))),
            Exp::All(e) => Some(Box::new(Exp::BoolType(BoolType { span: e.span }))),
            Exp::Exists(e) => Some(Box::new(Exp::BoolType(BoolType { span: e.span }))),
        }
    }
}

// Equations
//
//

/// The canonical name of the builtin equality operator.
pub const EQUALS: &str = "=";
/// The canonical name of the builtin inequality operator.
pub const NOT_EQUALS: &str = "≠";

/// Construct the equation `lhs = rhs`.
pub fn mk_equal(span: Option<Span>, lhs: Exp, rhs: Exp) -> Exp {
    Exp::Call(Call {
        span,
        rator: Box::new(Exp::Global(Global {
            span,
            name: IdBound::from_string(EQUALS),
            candidates: vec![IdBound::from_string(EQUALS)],
            inferred_type: None,
        })),
        args: vec![lhs, rhs],
        inferred_type: Some(Box::new(BoolType::mk())),
    })
}

/// Split an equation into its two sides.
pub fn split_equation(formula: &Exp) -> Option<(&Exp, &Exp)> {
    match formula.unmarked() {
        Exp::Call(Call { rator, args, .. }) if args.len() == 2 => match rator.unmarked() {
            Exp::Global(Global { name, .. }) if name.base_name() == EQUALS => {
                Some((&args[0], &args[1]))
            }
            _ => None,
        },
        _ => None,
    }
}

pub fn is_equation(formula: &Exp) -> bool {
    split_equation(formula).is_some()
}
