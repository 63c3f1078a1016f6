use miette::{Diagnostic, SourceSpan};
use miette_util::ToMiette;
use thiserror::Error;

use ast::*;
use printer::Print;

pub type TcResult<T> = Result<T, TypeError>;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum TypeError {
    #[error("undefined variable {name}")]
    #[diagnostic(code("T-001"))]
    UndefinedVariable {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("undefined type variable {name}")]
    #[diagnostic(code("T-002"))]
    UndefinedTypeVariable {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a term of type {expected} but got a term of type {actual}\nin particular\n\t{diff_expected}\n\t≠ {diff_actual}")]
    #[diagnostic(code("T-003"))]
    TypeMismatch {
        expected: String,
        actual: String,
        diff_expected: String,
        diff_actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("incorrect number of arguments in call to {name}: expected {expected}, not {actual}")]
    #[diagnostic(code("T-004"))]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("could not find a match for call to {name}\noverloads:\n{overloads}")]
    #[diagnostic(code("T-005"))]
    OverloadNoMatch {
        name: String,
        overloads: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in call to {name}, ambiguous overloads:\n{matches}")]
    #[diagnostic(code("T-006"))]
    OverloadAmbiguous {
        name: String,
        matches: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("in call {call}, could not deduce a type argument for {param}")]
    #[diagnostic(code("T-007"))]
    CannotInferTypeArgument {
        call: String,
        param: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("cannot infer type arguments for {name}; please make them explicit")]
    #[diagnostic(code("T-008"))]
    TypeArgsNotInferable {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("this match is missing a case for: {missing}")]
    #[diagnostic(code("T-009"))]
    PatternNonExhaustive {
        missing: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("{name} is not a constructor of union {union}")]
    #[diagnostic(code("T-010"))]
    PatternBadConstructor {
        name: String,
        union: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected operator to have a function type, not {typ}")]
    #[diagnostic(code("T-011"))]
    NotAFunction {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("cannot synthesize a type for {term}")]
    #[diagnostic(code("T-012"))]
    CannotSynthesize {
        term: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("bodies of cases must have the same type, but {first} ≠ {second}")]
    #[diagnostic(code("T-013"))]
    BranchTypeMismatch {
        first: String,
        second: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a union type, not {typ}")]
    #[diagnostic(code("T-014"))]
    NotAUnion {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("ill-formed recursive call: expected the first argument to be {expected}, not {actual}")]
    #[diagnostic(code("T-015"))]
    RecursionNotStructural {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("the name {name} is already defined; only functions may have multiple definitions with the same name")]
    #[diagnostic(code("T-016"))]
    AlreadyDefined {
        name: String,
        #[label]
        span: Option<SourceSpan>,
        #[label("previously defined here")]
        previous: Option<SourceSpan>,
    },
    #[error("cannot synthesize a type for {term}; add type annotations to the parameters")]
    #[diagnostic(code("T-017"))]
    TypeAnnotationRequired {
        term: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected type parameters {params}, but got a lambda; add generic {params} {{ ... }} around the function body")]
    #[diagnostic(code("T-018"))]
    ExpectedGenericTerm {
        params: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("{actual} does not match {expected}")]
    #[diagnostic(code("T-019"))]
    TypeUnificationFailure {
        expected: String,
        actual: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a pattern of type {typ}, but got {pattern}")]
    #[diagnostic(code("T-020"))]
    PatternTypeMismatch {
        typ: String,
        pattern: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("cannot instantiate a term of type {typ}")]
    #[diagnostic(code("T-021"))]
    CannotInstantiate {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("cannot mix type and term variables in an all formula")]
    #[diagnostic(code("T-022"))]
    MixedQuantifier {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected List, not {typ}")]
    #[diagnostic(code("T-023"))]
    ExpectedList {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected an array, not {typ}")]
    #[diagnostic(code("T-024"))]
    ExpectedArray {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a type, not {got}")]
    #[diagnostic(code("T-025"))]
    ExpectedAType {
        got: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("expected a term of type {expected}, but got a lambda")]
    #[diagnostic(code("T-026"))]
    LambdaNotExpected {
        expected: String,
        #[label]
        span: Option<SourceSpan>,
    },
}

impl TypeError {
    /// A type mismatch, with the smallest disagreeing subterm pair.
    pub fn mismatch(expected: &Exp, actual: &Exp, span: Option<codespan::Span>) -> TypeError {
        let (diff_expected, diff_actual) = match isolate_difference(expected, actual) {
            Some((lhs, rhs)) => (lhs.print_to_string(None), rhs.print_to_string(None)),
            None => (expected.print_to_string(None), actual.print_to_string(None)),
        };
        TypeError::TypeMismatch {
            expected: expected.print_to_string(None),
            actual: actual.print_to_string(None),
            diff_expected,
            diff_actual,
            span: span.to_miette(),
        }
    }

    pub fn undefined_variable(name: &str, span: Option<codespan::Span>) -> TypeError {
        TypeError::UndefinedVariable { name: name.to_owned(), span: span.to_miette() }
    }
}
