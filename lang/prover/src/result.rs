use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use elaborator::TypeError;

pub type ProofResult<T> = Result<T, ProofError>;

#[derive(Error, Diagnostic, Debug)]
pub enum ProofError {
    /// An unfinished proof (a hole). Distinguishable from hard errors so
    /// tooling can report unfinished goals without marking the file
    /// invalid.
    #[error("{message}")]
    #[diagnostic(code("P-001"))]
    IncompleteProof {
        message: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("can't use sorry in context with unknown goal")]
    #[diagnostic(code("P-002"))]
    SorryNoGoal {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not find given: {name}")]
    #[diagnostic(code("P-003"))]
    UndefinedProofVar {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected an equation, not:\n\t{formula}")]
    #[diagnostic(code("P-004"))]
    NotAnEquation {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("error in proof by reflexive:\n{diff_lhs} ≠ {diff_rhs}\ntherefore\n{lhs} ≠ {rhs}\n\nGivens:\n{givens}")]
    #[diagnostic(code("P-005"))]
    ReflexiveMismatch {
        lhs: String,
        rhs: String,
        diff_lhs: String,
        diff_rhs: String,
        givens: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("for transitive, the middle formulas do not match:\n\t{first}\n≠\n\t{second}")]
    #[diagnostic(code("P-006"))]
    TransitiveMismatch {
        first: String,
        second: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in injective, {name} is not a constructor")]
    #[diagnostic(code("P-007"))]
    NotAConstructor {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in injective, non-applicable formula: {formula}")]
    #[diagnostic(code("P-008"))]
    InjectiveMismatch {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("extensionality expects a function, not {typ}")]
    #[diagnostic(code("P-009"))]
    ExtensionalityNeedsFunction {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("extensionality expects a function without type parameters, not {count}")]
    #[diagnostic(code("P-010"))]
    ExtensionalityTypeParams {
        count: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected an all formula, not {formula}")]
    #[diagnostic(code("P-011"))]
    NotAnAllFormula {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("arbitrary introduces a variable of type {expected}, not {actual}")]
    #[diagnostic(code("P-012"))]
    WrongArbitraryType {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected the goal to start with 'some', not {formula}")]
    #[diagnostic(code("P-013"))]
    NotASomeFormula {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("the assume statement is for if-then formulas, not {formula}")]
    #[diagnostic(code("P-014"))]
    NotAnIfThen {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("mismatch in premise:\n{expected} ≠ {actual}\nbecause\n{diff_expected} ≠ {diff_actual}")]
    #[diagnostic(code("P-015"))]
    WrongPremise {
        expected: String,
        actual: String,
        diff_expected: String,
        diff_actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in 'apply', expected an if-then formula, not {formula}")]
    #[diagnostic(code("P-016"))]
    ApplyNotImplication {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not deduce an instantiation for the application of\n\t{implication}\nto\n\t{arg}")]
    #[diagnostic(code("P-017"))]
    CannotDeduceInstantiation {
        implication: String,
        arg: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not prove that {arg} implies at least one of the premises of\n\t{implication}")]
    #[diagnostic(code("P-018"))]
    NoPremiseMatches {
        implication: String,
        arg: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a conjunction, not {formula}")]
    #[diagnostic(code("P-019"))]
    NotAConjunction {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("out of bounds, access to conjunct {which} but there are only {len} conjuncts in formula\n\t{formula}")]
    #[diagnostic(code("P-020"))]
    ConjunctOutOfBounds {
        which: usize,
        len: usize,
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected {expected} proofs but only got {actual}")]
    #[diagnostic(code("P-021"))]
    TupleArity {
        expected: usize,
        actual: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected 'or', not {formula}")]
    #[diagnostic(code("P-022"))]
    NotADisjunction {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a case for {expected}, not {actual}")]
    #[diagnostic(code("P-023"))]
    CaseMismatch {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected {expected} cases, but have {actual}")]
    #[diagnostic(code("P-024"))]
    WrongCaseCount {
        expected: usize,
        actual: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("incorrect induction hypothesis, expected\n{expected}\nbut got\n{actual}\nin particular\n{diff_expected}\n≠\n{diff_actual}")]
    #[diagnostic(code("P-025"))]
    WrongIhFormula {
        expected: String,
        actual: String,
        diff_expected: String,
        diff_actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in case, expected suppose of\n{expected}\nnot\n{actual}")]
    #[diagnostic(code("P-026"))]
    WrongAssumption {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("only one assumption is allowed in a switch case")]
    #[diagnostic(code("P-027"))]
    TooManyAssumptions {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("the type of induction {typ}\ndoes not match the all-formula's type {var_type}")]
    #[diagnostic(code("P-028"))]
    InductionTypeMismatch {
        typ: String,
        var_type: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("to instantiate {univ} with type arguments, instead write: {univ}<{arg}>")]
    #[diagnostic(code("P-029"))]
    InstantiateWithTypeSyntax {
        univ: String,
        arg: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("unexpected term parameter {var} in type instantiation")]
    #[diagnostic(code("P-030"))]
    TypeInstantiationOnTerm {
        var: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("no matches found for rewrite with\n\t{equation}\nin\n\t{formula}")]
    #[diagnostic(code("P-031"))]
    RewriteNoMatch {
        equation: String,
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("formula contains more than one mark:\n\t{formula}")]
    #[diagnostic(code("P-032"))]
    TooManyMarks {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not find a definition of {name}")]
    #[diagnostic(code("P-033"))]
    NoDefinition {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not find a place to apply the definition of {name} in:\n\t{formula}")]
    #[diagnostic(code("P-034"))]
    DefinitionNoMatch {
        name: String,
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("the goal did not evaluate to `true`, but instead:\n\t{result}")]
    #[diagnostic(code("P-035"))]
    EvaluateNotTrue {
        result: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("remains to prove:\n\t{formula}")]
    #[diagnostic(code("P-036"))]
    RemainsToProve {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not prove that\n\t{proved}\nimplies\n\t{goal}\n{because}")]
    #[diagnostic(code("P-037"))]
    EntailmentFailure {
        proved: String,
        goal: String,
        because: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("conclude {formula}")]
    #[diagnostic(code("P-038"))]
    ConcludeAdvice {
        formula: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("{advice}")]
    #[diagnostic(code("P-039"))]
    UseAdvice {
        advice: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("need to be in goal-directed mode for\n\t{proof}")]
    #[diagnostic(code("P-040"))]
    NeedGoalDirected {
        proof: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("failed to prove: {goal}\n\tfirst tried each subproof in goal-directed mode, but:\n{first}\n\tthen tried synthesis mode, but:\n{second}")]
    #[diagnostic(code("P-041"))]
    TupleFailure {
        goal: String,
        first: String,
        second: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("case {actual}\ndoes not match alternative in goal:\n{expected}")]
    #[diagnostic(code("P-042"))]
    WrongCaseFormula {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected some facts after `recall`")]
    #[diagnostic(code("P-043"))]
    RecallNeedsFacts {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not find a proof of\n\t{formula}\nin the current scope\nGivens:\n{givens}")]
    #[diagnostic(code("P-044"))]
    RecallNotProved {
        formula: String,
        givens: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Type(#[from] TypeError),
}

impl ProofError {
    /// Whether this error reports an unfinished (rather than wrong) proof.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProofError::IncompleteProof { .. })
    }
}
