//! End-to-end tests: whole modules through the three passes.

use ast::*;
use sequent_lang_driver::{Database, Error, Verbosity};

fn nat_ty() -> Exp {
    TypApp::mk("Nat", vec![])
}

fn nat_union() -> Decl {
    Decl::Union(Union {
        span: None,
        name: IdBind::from_string("Nat"),
        type_params: vec![],
        ctors: vec![
            Ctor { span: None, name: IdBind::from_string("zero"), params: vec![] },
            Ctor { span: None, name: IdBind::from_string("suc"), params: vec![nat_ty()] },
        ],
    })
}

fn list_union() -> Decl {
    Decl::Union(Union {
        span: None,
        name: IdBind::from_string("List"),
        type_params: vec![VarBind::from_string("T")],
        ctors: vec![
            Ctor { span: None, name: IdBind::from_string("empty"), params: vec![] },
            Ctor {
                span: None,
                name: IdBind::from_string("node"),
                params: vec![
                    TypeVariable::mk(0, "T"),
                    TypApp::mk("List", vec![TypeVariable::mk(0, "T")]),
                ],
            },
        ],
    })
}

fn nat(n: usize) -> Exp {
    let mut result = Global::mk("zero");
    for _ in 0..n {
        result = Call::mk(Global::mk("suc"), vec![result]);
    }
    result
}

/// recursive + : fun(Nat, Nat) -> Nat, dispatching on the first argument.
fn plus_fun() -> Decl {
    Decl::Fun(RecFun {
        span: None,
        name: IdBind::from_string("+"),
        type_params: vec![],
        param_types: vec![nat_ty(), nat_ty()],
        ret_type: Box::new(nat_ty()),
        cases: vec![
            FunCase {
                span: None,
                pattern: Pattern::ctor("zero", &[]),
                params: vec![VarBind::from_string("m")],
                body: Box::new(Variable::mk(0, "m")),
            },
            FunCase {
                span: None,
                pattern: Pattern::ctor("suc", &["n'"]),
                params: vec![VarBind::from_string("m")],
                body: Box::new(Call::mk(
                    Global::mk("suc"),
                    vec![Call::mk(
                        Global::mk("+"),
                        vec![Variable::mk(1, "n'"), Variable::mk(0, "m")],
                    )],
                )),
            },
        ],
    })
}

/// recursive length<T> : fun(List<T>) -> Nat.
fn length_fun() -> Decl {
    Decl::Fun(RecFun {
        span: None,
        name: IdBind::from_string("length"),
        type_params: vec![VarBind::from_string("T")],
        param_types: vec![TypApp::mk("List", vec![TypeVariable::mk(0, "T")])],
        ret_type: Box::new(nat_ty()),
        cases: vec![
            FunCase {
                span: None,
                pattern: Pattern::ctor("empty", &[]),
                params: vec![],
                body: Box::new(Global::mk("zero")),
            },
            FunCase {
                span: None,
                pattern: Pattern::ctor("node", &["h", "t"]),
                params: vec![],
                body: Box::new(Call::mk(
                    Global::mk("suc"),
                    vec![Call::mk(Global::mk("length"), vec![Variable::mk(0, "t")])],
                )),
            },
        ],
    })
}

fn plus(lhs: Exp, rhs: Exp) -> Exp {
    Call::mk(Global::mk("+"), vec![lhs, rhs])
}

fn module(name: &str, decls: Vec<Decl>) -> Module {
    Module { name: name.to_owned(), decls }
}

// S1: the identity theorem is accepted.
#[test]
fn identity_theorem() {
    let theorem = Decl::Theorem(Theorem {
        span: None,
        name: IdBind::from_string("id"),
        formula: Box::new(All::mk(
            "x",
            nat_ty(),
            mk_equal(None, Variable::mk(0, "x"), Variable::mk(0, "x")),
        )),
        proof: Proof::AllIntro(AllIntro {
            span: None,
            var: VarBind::from_string("x"),
            var_type: Box::new(nat_ty()),
            body: Box::new(Proof::Reflexive(Reflexive { span: None })),
        }),
        is_lemma: false,
    });
    let mut db = Database::new(Verbosity::None);
    db.check_module(&module("id", vec![nat_union(), theorem])).unwrap();
    assert_eq!(db.proofs_checked, 1);
}

fn add_zero_theorem(zero_case: Proof, suc_case: Proof) -> Decl {
    Decl::Theorem(Theorem {
        span: None,
        name: IdBind::from_string("add_zero"),
        formula: Box::new(All::mk(
            "x",
            nat_ty(),
            mk_equal(None, plus(Variable::mk(0, "x"), Global::mk("zero")), Variable::mk(0, "x")),
        )),
        proof: Proof::Induction(Induction {
            span: None,
            typ: Box::new(nat_ty()),
            cases: vec![
                IndCase {
                    span: None,
                    pattern: Pattern::ctor("zero", &[]),
                    ihs: vec![],
                    body: zero_case,
                },
                IndCase {
                    span: None,
                    pattern: Pattern::ctor("suc", &["n'"]),
                    ihs: vec![(VarBind::from_string("IH"), None)],
                    body: suc_case,
                },
            ],
        }),
        is_lemma: false,
    })
}

// S2: induction with a rewrite by the induction hypothesis.
#[test]
fn add_zero_by_induction() {
    let theorem = add_zero_theorem(
        Proof::Reflexive(Reflexive { span: None }),
        Proof::Rewrite(PRewrite { span: None, equations: vec![Proof::hyp(0, "IH")] }),
    );
    let mut db = Database::new(Verbosity::None);
    db.check_module(&module("add_zero", vec![nat_union(), plus_fun(), theorem])).unwrap();
}

// S2 mutation: a period (true-intro) also closes the zero case, because
// the goal reduces to `true`.
#[test]
fn add_zero_zero_case_by_period() {
    let theorem = add_zero_theorem(
        Proof::True(PTrue { span: None }),
        Proof::Rewrite(PRewrite { span: None, equations: vec![Proof::hyp(0, "IH")] }),
    );
    let mut db = Database::new(Verbosity::None);
    db.check_module(&module("add_zero", vec![nat_union(), plus_fun(), theorem])).unwrap();
}

// S2 mutation: `reflexive` in the suc case is rejected with a diff that
// isolates the disagreement.
#[test]
fn add_zero_suc_case_needs_rewrite() {
    let theorem = add_zero_theorem(
        Proof::Reflexive(Reflexive { span: None }),
        Proof::Reflexive(Reflexive { span: None }),
    );
    let mut db = Database::new(Verbosity::None);
    let err = db
        .check_module(&module("add_zero", vec![nat_union(), plus_fun(), theorem]))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("n' + zero ≠ n'"), "unexpected diff: {message}");
    assert!(message.contains("suc(n' + zero) ≠ suc(n')"), "unexpected message: {message}");
    assert!(!err.is_incomplete());
}

// S3: a function missing a case is rejected, naming the missing
// constructor.
#[test]
fn non_exhaustive_function() {
    let partial = Decl::Fun(RecFun {
        span: None,
        name: IdBind::from_string("f"),
        type_params: vec![],
        param_types: vec![TypApp::mk("List", vec![nat_ty()])],
        ret_type: Box::new(nat_ty()),
        cases: vec![FunCase {
            span: None,
            pattern: Pattern::ctor("empty", &[]),
            params: vec![],
            body: Box::new(Global::mk("zero")),
        }],
    });
    let mut db = Database::new(Verbosity::None);
    let err = db
        .check_module(&module("partial", vec![nat_union(), list_union(), partial]))
        .unwrap_err();
    match err {
        Error::Type(elaborator::TypeError::PatternNonExhaustive { missing, .. }) => {
            assert!(missing.contains("node"), "missing case should name node: {missing}");
        }
        other => panic!("expected a non-exhaustive error, got {other}"),
    }
}

// S4: a call that fits two overloads is ambiguous.
#[test]
fn ambiguous_overload() {
    let plus_nat = Decl::Def(Def {
        span: None,
        name: IdBind::from_string("+"),
        typ: Some(Box::new(FunType::mk(vec![nat_ty(), nat_ty()], nat_ty()))),
        body: Box::new(Exp::Lambda(Lambda {
            span: None,
            params: vec![
                Param { name: VarBind::from_string("x"), typ: None },
                Param { name: VarBind::from_string("y"), typ: None },
            ],
            body: Box::new(Variable::mk(1, "x")),
            inferred_type: None,
        })),
    });
    let plus_int = Decl::Def(Def {
        span: None,
        name: IdBind::from_string("+"),
        typ: Some(Box::new(FunType::mk(vec![IntType::mk(), IntType::mk()], IntType::mk()))),
        body: Box::new(Exp::Lambda(Lambda {
            span: None,
            params: vec![
                Param { name: VarBind::from_string("x"), typ: None },
                Param { name: VarBind::from_string("y"), typ: None },
            ],
            body: Box::new(Variable::mk(1, "x")),
            inferred_type: None,
        })),
    });
    let call = Decl::Print(PrintStmt {
        span: None,
        term: Box::new(Call::mk(Global::mk("+"), vec![Hole::mk(), Hole::mk()])),
    });
    let mut db = Database::new(Verbosity::None);
    let err = db
        .check_module(&module("overloads", vec![nat_union(), plus_nat, plus_int, call]))
        .unwrap_err();
    assert!(
        matches!(err, Error::Type(elaborator::TypeError::OverloadAmbiguous { .. })),
        "expected ambiguity, got {err}"
    );
}

// Only functions may share a base name: a second non-function definition
// is rejected, and the diagnostic points back at the original binding
// site.
#[test]
fn duplicate_definition_names_original_site() {
    use miette::Diagnostic;

    let first_span = codespan::Span::new(0u32, 12u32);
    let first = Decl::Def(Def {
        span: Some(first_span),
        name: IdBind::from_string("two"),
        typ: Some(Box::new(nat_ty())),
        body: Box::new(nat(2)),
    });
    let second = Decl::Def(Def {
        span: Some(codespan::Span::new(20u32, 32u32)),
        name: IdBind::from_string("two"),
        typ: Some(Box::new(nat_ty())),
        body: Box::new(nat(2)),
    });
    let mut db = Database::new(Verbosity::None);
    let err = db
        .check_module(&module("duplicates", vec![nat_union(), first, second]))
        .unwrap_err();
    let Error::Type(elaborator::TypeError::AlreadyDefined { ref name, .. }) = err else {
        panic!("expected a duplicate-definition error, got {err}");
    };
    assert_eq!(name, "two");
    let labels: Vec<_> = err.labels().expect("the diagnostic carries labels").collect();
    let previous = labels
        .iter()
        .find(|label| label.label() == Some("previously defined here"))
        .expect("the diagnostic names the original binding site");
    assert_eq!(previous.offset(), 0);
    assert_eq!(previous.len(), 12);
}

// S5: a hole reports an incomplete proof whose advice includes both the
// arbitrary skeleton and an induction skeleton with named cases.
#[test]
fn hole_advice_lists_skeletons() {
    let theorem = Decl::Theorem(Theorem {
        span: None,
        name: IdBind::from_string("len_self"),
        formula: Box::new(All::mk(
            "x",
            TypApp::mk("List", vec![nat_ty()]),
            mk_equal(
                None,
                Call::mk(Global::mk("length"), vec![Variable::mk(0, "x")]),
                Call::mk(Global::mk("length"), vec![Variable::mk(0, "x")]),
            ),
        )),
        proof: Proof::Hole(PHole { span: None }),
        is_lemma: false,
    });
    let mut db = Database::new(Verbosity::None);
    let err = db
        .check_module(&module("advice", vec![nat_union(), list_union(), length_fun(), theorem]))
        .unwrap_err();
    assert!(err.is_incomplete());
    let message = err.to_string();
    assert!(message.contains("arbitrary x:List<Nat>"), "missing arbitrary: {message}");
    assert!(message.contains("case empty"), "missing empty case: {message}");
    assert!(message.contains("node(n1, l1)"), "missing node case: {message}");
    assert!(message.contains("IH1"), "missing IH: {message}");
}

// Asserts and prints execute with all definitions enabled.
#[test]
fn assert_and_print_execute() {
    let decls = vec![
        nat_union(),
        plus_fun(),
        Decl::Assert(Assert {
            span: None,
            formula: Box::new(mk_equal(None, plus(nat(2), nat(3)), nat(5))),
        }),
        Decl::Print(PrintStmt { span: None, term: Box::new(plus(nat(1), nat(1))) }),
    ];
    let mut db = Database::new(Verbosity::None);
    db.check_module(&module("exec", decls)).unwrap();
    assert_eq!(db.output, vec!["suc(suc(zero))".to_owned()]);
}

#[test]
fn assert_detects_failure() {
    let decls = vec![
        nat_union(),
        plus_fun(),
        Decl::Assert(Assert {
            span: None,
            formula: Box::new(mk_equal(None, plus(nat(2), nat(2)), nat(5))),
        }),
    ];
    let mut db = Database::new(Verbosity::None);
    let err = db.check_module(&module("exec", decls)).unwrap_err();
    assert!(err.to_string().contains("assertion failed"), "got: {err}");
}

// Property 6: re-importing an already-checked module must not re-run its
// proof checks.
#[test]
fn imports_are_memoized() {
    let base = module(
        "base",
        vec![
            nat_union(),
            Decl::Theorem(Theorem {
                span: None,
                name: IdBind::from_string("zero_self"),
                formula: Box::new(mk_equal(None, Global::mk("zero"), Global::mk("zero"))),
                proof: Proof::Reflexive(Reflexive { span: None }),
                is_lemma: true,
            }),
        ],
    );
    let main = module(
        "main",
        vec![
            Decl::Import(Import { span: None, module: base.clone() }),
            Decl::Import(Import { span: None, module: base }),
        ],
    );
    let mut db = Database::new(Verbosity::None);
    db.check_module(&main).unwrap();
    assert_eq!(db.proofs_checked, 1);
}

// Property 2: for a fixed input, the outcome and the rendered error are
// deterministic.
#[test]
fn errors_are_deterministic() {
    let check = || {
        let theorem = add_zero_theorem(
            Proof::Reflexive(Reflexive { span: None }),
            Proof::Reflexive(Reflexive { span: None }),
        );
        let mut db = Database::new(Verbosity::None);
        db.check_module(&module("add_zero", vec![nat_union(), plus_fun(), theorem]))
            .unwrap_err()
            .to_string()
    };
    assert_eq!(check(), check());
}
