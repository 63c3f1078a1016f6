use codespan::Span;

use crate::exp::{Exp, Pattern};
use crate::ident::*;
use crate::traits::HasSpan;

// Proof
//
//

/// The language of proofs. Each variant is one inference rule; the proof
/// checker either synthesizes the proved formula from a proof
/// (`check_proof`) or checks a proof against a goal (`check_proof_of`).
#[derive(Debug, Clone)]
pub enum Proof {
    /// A reference to a local hypothesis, by De Bruijn index into the
    /// proof flavor of the environment.
    Variable(PVariable),
    /// A reference to a theorem or lemma, by name.
    Global(PGlobal),
    /// Proves the formula `true`.
    True(PTrue),
    /// An unfinished proof. Reported with advice for the current goal.
    Hole(PHole),
    /// An admitted goal; accepted with a warning.
    Sorry(PSorry),
    /// And-introduction: a comma-separated tuple of proofs.
    Tuple(Tuple),
    /// And-elimination: project one conjunct of a proved conjunction.
    AndElim(AndElim),
    /// Implication introduction (`assume`).
    ImpIntro(ImpIntro),
    /// Universal introduction (`arbitrary`).
    AllIntro(AllIntro),
    /// Universal elimination with a term argument.
    AllElim(AllElim),
    /// Universal elimination with a type argument (angle brackets).
    AllElimTypes(AllElimTypes),
    /// Modus ponens (`apply ... to ...`).
    ModusPonens(ModusPonens),
    /// Proves `a = b` by joint reduction of the two sides.
    Reflexive(Reflexive),
    Symmetric(Symmetric),
    Transitive(Transitive),
    /// From `C(a) = C(b)` for a constructor `C`, conclude `a = b`.
    Injective(Injective),
    /// Proves `f = g` for functions via pointwise equality.
    Extensionality(Extensionality),
    /// Existential introduction (`choose`).
    SomeIntro(SomeIntro),
    /// Existential elimination (`obtain ... from ...`).
    SomeElim(SomeElim),
    /// Case analysis on a proved disjunction.
    Cases(Cases),
    /// Induction over the constructors of a union.
    Induction(Induction),
    /// Case analysis on the value of a term (`switch`).
    SwitchProof(SwitchProof),
    /// Rewrite the goal with proved equations; must close it.
    Rewrite(PRewrite),
    /// Rewrite the goal with proved equations, then continue.
    RewriteGoal(RewriteGoal),
    /// Rewrite a proved fact with proved equations.
    RewriteFact(RewriteFact),
    /// Unfold definitions in the goal; must close it.
    ApplyDefs(ApplyDefs),
    /// Unfold definitions in the goal, then continue.
    ApplyDefsGoal(ApplyDefsGoal),
    /// Unfold definitions in a proved fact.
    ApplyDefsFact(ApplyDefsFact),
    /// Enable definitions for reduction within a subproof.
    EnableDefs(EnableDefs),
    /// Reduce the goal with all definitions enabled; must yield `true`.
    EvaluateGoal(EvaluateGoal),
    /// Reduce a proved fact with all definitions enabled.
    EvaluateFact(EvaluateFact),
    /// Replace the goal by a sufficient claim.
    Suffices(Suffices),
    /// `have label: formula by proof` — a local lemma.
    Have(Have),
    /// `define x = t` — a local definition inside a proof.
    PDefine(PDefine),
    /// `conclude formula by proof` — an annotated final step.
    Conclude(Conclude),
    /// A checked boolean term justified by a proof, then continue.
    Term(PTerm),
    /// Close the goal by recalling facts already in scope.
    Recall(Recall),
    /// Ask for advice on how to use a proved fact.
    HelpUse(HelpUse),
}

#[derive(Debug, Clone)]
pub struct PVariable {
    pub span: Option<Span>,
    pub idx: Idx,
    pub name: VarBound,
}

#[derive(Debug, Clone)]
pub struct PGlobal {
    pub span: Option<Span>,
    pub name: IdBound,
}

#[derive(Debug, Clone)]
pub struct PTrue {
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct PHole {
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct PSorry {
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct Tuple {
    pub span: Option<Span>,
    pub proofs: Vec<Proof>,
}

#[derive(Debug, Clone)]
pub struct AndElim {
    pub span: Option<Span>,
    pub which: usize,
    pub subject: Box<Proof>,
}

/// `assume label: premise { body }`. The premise annotation is optional in
/// checking mode; when present it must match the goal's premise.
#[derive(Debug, Clone)]
pub struct ImpIntro {
    pub span: Option<Span>,
    pub label: VarBind,
    pub premise: Option<Box<Exp>>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct AllIntro {
    pub span: Option<Span>,
    pub var: VarBind,
    pub var_type: Box<Exp>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct AllElim {
    pub span: Option<Span>,
    pub univ: Box<Proof>,
    pub arg: Box<Exp>,
}

#[derive(Debug, Clone)]
pub struct AllElimTypes {
    pub span: Option<Span>,
    pub univ: Box<Proof>,
    pub arg: Box<Exp>,
}

#[derive(Debug, Clone)]
pub struct ModusPonens {
    pub span: Option<Span>,
    pub implication: Box<Proof>,
    pub arg: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Reflexive {
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct Symmetric {
    pub span: Option<Span>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Transitive {
    pub span: Option<Span>,
    pub first: Box<Proof>,
    pub second: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Injective {
    pub span: Option<Span>,
    pub ctor: IdBound,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Extensionality {
    pub span: Option<Span>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct SomeIntro {
    pub span: Option<Span>,
    pub witnesses: Vec<Exp>,
    pub body: Box<Proof>,
}

/// `obtain x, y where label: prop from some_proof { body }`.
#[derive(Debug, Clone)]
pub struct SomeElim {
    pub span: Option<Span>,
    pub witnesses: Vec<VarBind>,
    pub label: VarBind,
    pub prop: Option<Box<Exp>>,
    pub some: Box<Proof>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Cases {
    pub span: Option<Span>,
    pub subject: Box<Proof>,
    pub cases: Vec<ProofCase>,
}

/// One case of a disjunction elimination: `case label: formula { body }`.
/// The formula annotation is optional.
#[derive(Debug, Clone)]
pub struct ProofCase {
    pub span: Option<Span>,
    pub label: VarBind,
    pub formula: Option<Box<Exp>>,
    pub body: Proof,
}

#[derive(Debug, Clone)]
pub struct Induction {
    pub span: Option<Span>,
    pub typ: Box<Exp>,
    pub cases: Vec<IndCase>,
}

/// One induction case. `ihs` carries the user-chosen labels for the
/// induction hypotheses of the recursive pattern parameters, optionally
/// with the formula the user expects each hypothesis to state.
#[derive(Debug, Clone)]
pub struct IndCase {
    pub span: Option<Span>,
    pub pattern: Pattern,
    pub ihs: Vec<(VarBind, Option<Box<Exp>>)>,
    pub body: Proof,
}

#[derive(Debug, Clone)]
pub struct SwitchProof {
    pub span: Option<Span>,
    pub subject: Box<Exp>,
    pub cases: Vec<SwitchProofCase>,
}

/// One switch case. At most one labelled assumption is allowed; it states
/// the equation between the subject and the case's pattern.
#[derive(Debug, Clone)]
pub struct SwitchProofCase {
    pub span: Option<Span>,
    pub pattern: Pattern,
    pub assumptions: Vec<(VarBind, Option<Box<Exp>>)>,
    pub body: Proof,
}

#[derive(Debug, Clone)]
pub struct PRewrite {
    pub span: Option<Span>,
    pub equations: Vec<Proof>,
}

#[derive(Debug, Clone)]
pub struct RewriteGoal {
    pub span: Option<Span>,
    pub equations: Vec<Proof>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct RewriteFact {
    pub span: Option<Span>,
    pub subject: Box<Proof>,
    pub equations: Vec<Proof>,
}

#[derive(Debug, Clone)]
pub struct ApplyDefs {
    pub span: Option<Span>,
    pub definitions: Vec<Exp>,
}

#[derive(Debug, Clone)]
pub struct ApplyDefsGoal {
    pub span: Option<Span>,
    pub definitions: Vec<Exp>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct ApplyDefsFact {
    pub span: Option<Span>,
    pub definitions: Vec<Exp>,
    pub subject: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct EnableDefs {
    pub span: Option<Span>,
    pub definitions: Vec<Exp>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct EvaluateGoal {
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub struct EvaluateFact {
    pub span: Option<Span>,
    pub subject: Box<Proof>,
}

/// `suffices claim by reason { rest }`. The reason is either a set of
/// definition/rewrite witnesses or an explicit proof of `claim ⇒ goal`.
#[derive(Debug, Clone)]
pub struct Suffices {
    pub span: Option<Span>,
    pub claim: Box<Exp>,
    pub reason: Box<Proof>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Have {
    pub span: Option<Span>,
    pub label: VarBind,
    pub claim: Box<Exp>,
    pub because: Box<Proof>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct PDefine {
    pub span: Option<Span>,
    pub name: VarBind,
    pub rhs: Box<Exp>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Conclude {
    pub span: Option<Span>,
    pub claim: Box<Exp>,
    pub because: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct PTerm {
    pub span: Option<Span>,
    pub term: Box<Exp>,
    pub because: Box<Proof>,
    pub body: Box<Proof>,
}

#[derive(Debug, Clone)]
pub struct Recall {
    pub span: Option<Span>,
    pub facts: Vec<Exp>,
}

#[derive(Debug, Clone)]
pub struct HelpUse {
    pub span: Option<Span>,
    pub subject: Box<Proof>,
}

// From impls
//
//

macro_rules! proof_from {
    ($($struct:ident => $variant:ident),* $(,)?) => {
        $(impl From<$struct> for Proof {
            fn from(val: $struct) -> Self {
                Proof::$variant(val)
            }
        })*
    };
}

proof_from!(
    PVariable => Variable,
    PGlobal => Global,
    PTrue => True,
    PHole => Hole,
    PSorry => Sorry,
    Tuple => Tuple,
    AndElim => AndElim,
    ImpIntro => ImpIntro,
    AllIntro => AllIntro,
    AllElim => AllElim,
    AllElimTypes => AllElimTypes,
    ModusPonens => ModusPonens,
    Reflexive => Reflexive,
    Symmetric => Symmetric,
    Transitive => Transitive,
    Injective => Injective,
    Extensionality => Extensionality,
    SomeIntro => SomeIntro,
    SomeElim => SomeElim,
    Cases => Cases,
    Induction => Induction,
    SwitchProof => SwitchProof,
    PRewrite => Rewrite,
    RewriteGoal => RewriteGoal,
    RewriteFact => RewriteFact,
    ApplyDefs => ApplyDefs,
    ApplyDefsGoal => ApplyDefsGoal,
    ApplyDefsFact => ApplyDefsFact,
    EnableDefs => EnableDefs,
    EvaluateGoal => EvaluateGoal,
    EvaluateFact => EvaluateFact,
    Suffices => Suffices,
    Have => Have,
    PDefine => PDefine,
    Conclude => Conclude,
    PTerm => Term,
    Recall => Recall,
    HelpUse => HelpUse,
);

impl Proof {
    pub fn hyp(idx: usize, name: &str) -> Proof {
        Proof::Variable(PVariable {
            span: None,
            idx: Idx(idx),
            name: VarBound::from_string(name),
        })
    }

    pub fn thm(name: &str) -> Proof {
        Proof::Global(PGlobal { span: None, name: IdBound::from_string(name) })
    }
}

impl HasSpan for Proof {
    fn span(&self) -> Option<Span> {
        match self {
            Proof::Variable(p) => p.span,
            Proof::Global(p) => p.span,
            Proof::True(p) => p.span,
            Proof::Hole(p) => p.span,
            Proof::Sorry(p) => p.span,
            Proof::Tuple(p) => p.span,
            Proof::AndElim(p) => p.span,
            Proof::ImpIntro(p) => p.span,
            Proof::AllIntro(p) => p.span,
            Proof::AllElim(p) => p.span,
            Proof::AllElimTypes(p) => p.span,
            Proof::ModusPonens(p) => p.span,
            Proof::Reflexive(p) => p.span,
            Proof::Symmetric(p) => p.span,
            Proof::Transitive(p) => p.span,
            Proof::Injective(p) => p.span,
            Proof::Extensionality(p) => p.span,
            Proof::SomeIntro(p) => p.span,
            Proof::SomeElim(p) => p.span,
            Proof::Cases(p) => p.span,
            Proof::Induction(p) => p.span,
            Proof::SwitchProof(p) => p.span,
            Proof::Rewrite(p) => p.span,
            Proof::RewriteGoal(p) => p.span,
            Proof::RewriteFact(p) => p.span,
            Proof::ApplyDefs(p) => p.span,
            Proof::ApplyDefsGoal(p) => p.span,
            Proof::ApplyDefsFact(p) => p.span,
            Proof::EnableDefs(p) => p.span,
            Proof::EvaluateGoal(p) => p.span,
            Proof::EvaluateFact(p) => p.span,
            Proof::Suffices(p) => p.span,
            Proof::Have(p) => p.span,
            Proof::PDefine(p) => p.span,
            Proof::Conclude(p) => p.span,
            Proof::Term(p) => p.span,
            Proof::Recall(p) => p.span,
            Proof::HelpUse(p) => p.span,
        }
    }
}
