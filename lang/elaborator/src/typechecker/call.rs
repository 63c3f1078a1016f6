//! Checking of function calls: arity, overload resolution, and inference
//! of type arguments for calls to generic functions.

use ast::ctx::Env;
use ast::*;
use miette_util::ToMiette;
use printer::Print;

use crate::ctx::Ctx;
use crate::result::{TcResult, TypeError};
use crate::typechecker::check::{RecCtx, check_term, resolve_global, synth_term};
use crate::unifier::{TypeUnifier, free_type_vars_below, type_match};

/// Check a call, optionally against an expected return type.
///
/// The operator is synthesized first. An overloaded operator is resolved
/// by attempting the call at every candidate's function type: exactly one
/// candidate must succeed.
pub(crate) fn check_call(
    call: &Call,
    expected: Option<&Exp>,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    let rator = match call.rator.unmarked() {
        Exp::Global(global) => Box::new(Exp::Global(resolve_global(global, env)?)),
        _ => synth_term(&call.rator, env, ctx, rec)?,
    };
    let rator_typ = rator.typ().ok_or_else(|| TypeError::CannotSynthesize {
        term: call.rator.print_to_string(None),
        span: call.span.to_miette(),
    })?;
    match &*rator_typ {
        Exp::OverloadType(overloads) => {
            let mut matches = Vec::new();
            for entry in &overloads.overloads {
                let Exp::FunType(funty) = &*entry.typ else { continue };
                let candidate = Exp::Global(Global {
                    span: call.rator.span(),
                    name: entry.name.clone(),
                    candidates: vec![entry.name.clone()],
                    inferred_type: Some(entry.typ.clone()),
                });
                if let Ok(checked) =
                    check_call_funty(call, candidate, funty, expected, env, ctx, rec)
                {
                    matches.push((entry, checked));
                }
            }
            match matches.len() {
                0 => Err(TypeError::OverloadNoMatch {
                    name: rator.print_to_string(None),
                    overloads: overloads
                        .overloads
                        .iter()
                        .map(|entry| format!("\t{}", entry.typ.print_to_string(None)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    span: call.span.to_miette(),
                }),
                1 => Ok(matches.pop().expect("one match").1),
                _ => Err(TypeError::OverloadAmbiguous {
                    name: rator.print_to_string(None),
                    matches: matches
                        .iter()
                        .map(|(entry, _)| format!("\t{}", entry.typ.print_to_string(None)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    span: call.span.to_miette(),
                }),
            }
        }
        Exp::FunType(funty) => check_call_funty(call, *rator.clone(), funty, expected, env, ctx, rec),
        other => Err(TypeError::NotAFunction {
            typ: other.print_to_string(None),
            span: call.span.to_miette(),
        }),
    }
}

fn check_call_funty(
    call: &Call,
    rator: Exp,
    funty: &FunType,
    expected: Option<&Exp>,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    if call.args.len() != funty.param_types.len() {
        return Err(TypeError::ArityMismatch {
            name: rator.print_to_string(None),
            expected: funty.param_types.len(),
            actual: call.args.len(),
            span: call.span.to_miette(),
        });
    }

    let k = funty.type_params.len();
    if k == 0 {
        let mut new_args = Vec::new();
        for (arg, param_typ) in call.args.iter().zip(funty.param_types.iter()) {
            new_args.push(*check_term(arg, param_typ, env, ctx, rec)?);
        }
        if let Some(expected) = expected {
            if *expected != *funty.ret_type {
                return Err(TypeError::mismatch(expected, &funty.ret_type, call.span));
            }
        }
        return Ok(Box::new(Exp::Call(Call {
            span: call.span,
            rator: Box::new(rator),
            args: new_args,
            inferred_type: Some(funty.ret_type.clone()),
        })));
    }

    // Generic function: infer the type arguments. The unifier works at the
    // scope under the function's type binders, so call-site types are
    // shifted up by `k` for matching, and solutions down by `k` on exit.
    let mut uni = TypeUnifier::new(k);
    if let Some(expected) = expected {
        let lifted = shift_and_clone(expected, (0, k as isize));
        type_match(&funty.ret_type, &lifted, &mut uni, call.span)?;
    }

    let mut new_args = Vec::new();
    for (arg, param_typ) in call.args.iter().zip(funty.param_types.iter()) {
        let param_inst = uni.apply(param_typ);
        if free_type_vars_below(&param_inst, k).is_empty() {
            // The substitution closes this parameter type: check the
            // argument against it.
            let grounded = shift_and_clone(&*param_inst, (0, -(k as isize)));
            new_args.push(*check_term(arg, &grounded, env, ctx, rec)?);
        } else {
            // Synthesize the argument and match its type against the
            // parameter type, extending the substitution.
            let new_arg = synth_term(arg, env, ctx, rec)?;
            let arg_typ = new_arg.typ().ok_or_else(|| TypeError::CannotSynthesize {
                term: arg.print_to_string(None),
                span: arg.span().to_miette(),
            })?;
            let lifted = shift_and_clone(&*arg_typ, (0, k as isize));
            type_match(&param_inst, &lifted, &mut uni, call.span)?;
            new_args.push(*new_arg);
        }
    }

    let type_args = uni.type_args().map_err(|pos| TypeError::CannotInferTypeArgument {
        call: Exp::Call(call.clone()).print_to_string(None),
        param: funty.type_params[pos].id.clone(),
        span: call.span.to_miette(),
    })?;

    let inst_params: Vec<Exp> = funty
        .param_types
        .iter()
        .map(|param| *open_type_binders(param, &type_args))
        .collect();
    let inst_ret = open_type_binders(&funty.ret_type, &type_args);
    let inst_funty = FunType {
        span: funty.span,
        type_params: Vec::new(),
        param_types: inst_params,
        ret_type: inst_ret.clone(),
    };
    let inst_rator = Exp::TermInst(TermInst {
        span: call.span,
        subject: Box::new(rator),
        type_args,
        inferred: true,
        inferred_type: Some(Box::new(Exp::FunType(inst_funty))),
    });
    Ok(Box::new(Exp::Call(Call {
        span: call.span,
        rator: Box::new(inst_rator),
        args: new_args,
        inferred_type: Some(inst_ret),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_env() -> Env {
        // union List<T> { empty; node(T, List<T>) }
        let list = Union {
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
        };
        let nat = Union {
            span: None,
            name: IdBind::from_string("Nat"),
            type_params: vec![],
            ctors: vec![
                Ctor { span: None, name: IdBind::from_string("zero"), params: vec![] },
                Ctor {
                    span: None,
                    name: IdBind::from_string("suc"),
                    params: vec![TypApp::mk("Nat", vec![])],
                },
            ],
        };
        Env::empty()
            .define_type(None, IdBind::from_string("Nat"), nat)
            .define_type(None, IdBind::from_string("List"), list)
            .declare_term_var(
                None,
                IdBind::from_string("empty"),
                Box::new(Exp::UnknownInst(UnknownInst {
                    span: None,
                    name: IdBound::from_string("List"),
                })),
            )
            .declare_term_var(
                None,
                IdBind::from_string("node"),
                Box::new(FunType::mk_generic(
                    &["T"],
                    vec![
                        TypeVariable::mk(0, "T"),
                        TypApp::mk("List", vec![TypeVariable::mk(0, "T")]),
                    ],
                    TypApp::mk("List", vec![TypeVariable::mk(0, "T")]),
                )),
            )
            .declare_term_var(None, IdBind::from_string("zero"), Box::new(TypApp::mk("Nat", vec![])))
            .declare_term_var(
                None,
                IdBind::from_string("suc"),
                Box::new(FunType::mk(vec![TypApp::mk("Nat", vec![])], TypApp::mk("Nat", vec![]))),
            )
            // length : <T> fun(List<T>) -> Nat
            .declare_term_var(
                None,
                IdBind::from_string("length"),
                Box::new(FunType::mk_generic(
                    &["T"],
                    vec![TypApp::mk("List", vec![TypeVariable::mk(0, "T")])],
                    TypApp::mk("Nat", vec![]),
                )),
            )
    }

    #[test]
    fn infers_type_argument_from_argument_type() {
        let env = list_env();
        let mut ctx = Ctx::new();
        // length(node(zero, empty)) : Nat, with T inferred to be Nat.
        let arg = Call::mk(Global::mk("node"), vec![Global::mk("zero"), Global::mk("empty")]);
        let call = Call::mk(Global::mk("length"), vec![arg]);
        let checked = synth_term(&call, &env, &mut ctx, None).unwrap();
        let typ = checked.typ().unwrap();
        assert_eq!(*typ, TypApp::mk("Nat", vec![]));
        let Exp::Call(call) = &*checked else { panic!("expected a call") };
        let Exp::TermInst(inst) = &*call.rator else { panic!("expected an instantiation") };
        assert!(inst.inferred);
        assert_eq!(inst.type_args, vec![TypApp::mk("Nat", vec![])]);
    }

    #[test]
    fn reports_ambiguous_overload() {
        let env = list_env()
            .declare_term_var(
                None,
                IdBind::from_string("+"),
                Box::new(FunType::mk(
                    vec![TypApp::mk("Nat", vec![]), TypApp::mk("Nat", vec![])],
                    TypApp::mk("Nat", vec![]),
                )),
            )
            .declare_term_var(
                None,
                IdBind::from_string("+.1"),
                Box::new(FunType::mk(vec![IntType::mk(), IntType::mk()], IntType::mk())),
            );
        let mut ctx = Ctx::new();
        // Both overloads accept holes, so the call is ambiguous.
        let call = Call::mk(Global::mk("+"), vec![Hole::mk(), Hole::mk()]);
        let result = synth_term(&call, &env, &mut ctx, None);
        assert!(matches!(result, Err(TypeError::OverloadAmbiguous { .. })));
    }

    #[test]
    fn overload_resolved_by_argument_types() {
        let env = list_env()
            .declare_term_var(
                None,
                IdBind::from_string("+"),
                Box::new(FunType::mk(
                    vec![TypApp::mk("Nat", vec![]), TypApp::mk("Nat", vec![])],
                    TypApp::mk("Nat", vec![]),
                )),
            )
            .declare_term_var(
                None,
                IdBind::from_string("+.1"),
                Box::new(FunType::mk(vec![IntType::mk(), IntType::mk()], IntType::mk())),
            );
        let mut ctx = Ctx::new();
        let call = Call::mk(Global::mk("+"), vec![IntLit::mk(1), IntLit::mk(2)]);
        let checked = synth_term(&call, &env, &mut ctx, None).unwrap();
        assert_eq!(*checked.typ().unwrap(), IntType::mk());
        let Exp::Call(call) = &*checked else { panic!("expected a call") };
        let Exp::Global(global) = &*call.rator else { panic!("expected a global") };
        assert_eq!(global.name.id, "+.1");
    }

    #[test]
    fn missing_case_is_rejected() {
        let env = list_env();
        let mut ctx = Ctx::new();
        // fun f(xs : List<Nat>) { switch xs { case empty { zero } } }
        let switch = Exp::Match(Match {
            span: None,
            on_exp: Box::new(Variable::mk(0, "xs")),
            cases: vec![Case {
                span: None,
                pattern: Pattern::ctor("empty", &[]),
                body: Box::new(Global::mk("zero")),
            }],
            inferred_type: None,
        });
        let env = env.declare_term_var(
            None,
            IdBind::from_string("xs"),
            Box::new(TypApp::mk("List", vec![TypApp::mk("Nat", vec![])])),
        );
        let result = synth_term(&switch, &env, &mut ctx, None);
        match result {
            Err(TypeError::PatternNonExhaustive { missing, .. }) => {
                assert!(missing.contains("node"));
            }
            other => panic!("expected a non-exhaustive error, got {other:?}"),
        }
    }
}
