//! The bidirectional type checker.
//!
//! `synth_term` infers a type and returns the term with every node
//! decorated; `check_term` pushes an expected type inwards. Overload
//! resolution happens when a `Global` reference is checked or called:
//! the unique matching candidate is selected and the reference rewritten
//! to its canonical name.

use ast::ctx::Env;
use ast::*;
use miette_util::ToMiette;
use printer::Print;

use crate::ctx::Ctx;
use crate::result::{TcResult, TypeError};
use crate::typechecker::call::check_call;
use crate::typechecker::pattern::{check_exhaustive, check_pattern};
use crate::typechecker::types::check_type;
use crate::unifier::{TypeUnifier, type_match};

/// The context of the recursive function currently being checked: its
/// canonical name and the levels of the pattern variables of the current
/// case, the only terms a recursive call may scrutinize.
#[derive(Debug, Clone)]
pub struct RecCtx {
    pub name: String,
    pub subterms: Vec<Lvl>,
    pub subterm_names: Vec<String>,
}

pub fn check_formula(formula: &Exp, env: &Env, ctx: &mut Ctx) -> TcResult<Box<Exp>> {
    check_term(formula, &BoolType::mk(), env, ctx, None)
}

pub fn synth_term(
    term: &Exp,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    ctx.trace(|| format!("synth_term: {}", term.print_to_string(None)));
    match term {
        Exp::Mark(mark) => {
            let subject = synth_term(&mark.subject, env, ctx, rec)?;
            Ok(Box::new(Exp::Mark(Mark { span: mark.span, subject })))
        }
        Exp::Variable(var) => {
            let Some(typ) = env.type_of_term_idx(var.idx) else {
                return Err(TypeError::undefined_variable(&var.name.id, var.span));
            };
            if let Exp::UnknownInst(inst) = &*typ {
                return Err(TypeError::TypeArgsNotInferable {
                    name: inst.name.base_name().to_owned(),
                    span: var.span.to_miette(),
                });
            }
            Ok(Box::new(Exp::Variable(Variable { inferred_type: Some(typ), ..var.clone() })))
        }
        Exp::Global(global) => {
            let resolved = resolve_global(global, env)?;
            if let Some(typ) = &resolved.inferred_type {
                if let Exp::UnknownInst(_) = &**typ {
                    return Err(TypeError::TypeArgsNotInferable {
                        name: global.name.base_name().to_owned(),
                        span: global.span.to_miette(),
                    });
                }
            }
            Ok(Box::new(Exp::Global(resolved)))
        }
        Exp::IntLit(_) | Exp::BoolLit(_) => Ok(Box::new(term.clone())),
        Exp::Generic(generic) => {
            let body_env = env.declare_type_vars(generic.span, &generic.params);
            let body = synth_term(&generic.body, &body_env, ctx, rec)?;
            let body_typ = body.typ().ok_or_else(|| cannot_synth(term))?;
            match *body_typ {
                Exp::FunType(funty) if funty.type_params.is_empty() => {
                    let typ = Exp::FunType(FunType {
                        span: generic.span,
                        type_params: generic.params.clone(),
                        param_types: funty.param_types,
                        ret_type: funty.ret_type,
                    });
                    Ok(Box::new(Exp::Generic(Generic {
                        span: generic.span,
                        params: generic.params.clone(),
                        body,
                        inferred_type: Some(Box::new(typ)),
                    })))
                }
                other => Err(TypeError::NotAFunction {
                    typ: other.print_to_string(None),
                    span: generic.span.to_miette(),
                }),
            }
        }
        Exp::Lambda(lambda) => {
            let mut param_types = Vec::new();
            for param in &lambda.params {
                match &param.typ {
                    Some(typ) => {
                        check_type(typ, env)?;
                        param_types.push((*typ.clone(), param.name.clone()));
                    }
                    None => {
                        return Err(TypeError::TypeAnnotationRequired {
                            term: term.print_to_string(None),
                            span: lambda.span.to_miette(),
                        });
                    }
                }
            }
            let body_env = env.declare_term_vars(
                lambda.span,
                param_types.iter().map(|(typ, name)| (name.clone(), Box::new(typ.clone()))),
            );
            let body = synth_term(&lambda.body, &body_env, ctx, rec)?;
            let body_typ = body.typ().ok_or_else(|| cannot_synth(term))?;
            let typ = FunType::mk(
                param_types.into_iter().map(|(typ, _)| typ).collect(),
                *body_typ,
            );
            Ok(Box::new(Exp::Lambda(Lambda {
                span: lambda.span,
                params: lambda.params.clone(),
                body,
                inferred_type: Some(Box::new(typ)),
            })))
        }
        Exp::LocalLet(local) => {
            let bound = synth_term(&local.bound, env, ctx, rec)?;
            let bound_typ = bound.typ().ok_or_else(|| cannot_synth(term))?;
            let body_env = env.declare_term_var(local.span, local.name.clone(), bound_typ);
            let body = synth_term(&local.body, &body_env, ctx, rec)?;
            let typ = body.typ();
            Ok(Box::new(Exp::LocalLet(LocalLet {
                span: local.span,
                name: local.name.clone(),
                bound,
                body,
                inferred_type: typ,
            })))
        }
        Exp::Conditional(cond) => {
            let new_cond = check_term(&cond.cond, &BoolType::mk(), env, ctx, rec)?;
            let then_branch = synth_term(&cond.then_branch, env, ctx, rec)?;
            let else_branch = synth_term(&cond.else_branch, env, ctx, rec)?;
            let then_typ = then_branch.typ().ok_or_else(|| cannot_synth(term))?;
            let else_typ = else_branch.typ().ok_or_else(|| cannot_synth(term))?;
            if then_typ != else_typ {
                return Err(TypeError::BranchTypeMismatch {
                    first: then_typ.print_to_string(None),
                    second: else_typ.print_to_string(None),
                    span: cond.span.to_miette(),
                });
            }
            Ok(Box::new(Exp::Conditional(Conditional {
                span: cond.span,
                cond: new_cond,
                then_branch,
                else_branch,
                inferred_type: Some(then_typ),
            })))
        }
        Exp::And(and) => {
            let args = and
                .args
                .iter()
                .map(|arg| check_formula(arg, env, ctx).map(|arg| *arg))
                .collect::<TcResult<Vec<_>>>()?;
            Ok(Box::new(Exp::And(And { span: and.span, args })))
        }
        Exp::Or(or) => {
            let args = or
                .args
                .iter()
                .map(|arg| check_formula(arg, env, ctx).map(|arg| *arg))
                .collect::<TcResult<Vec<_>>>()?;
            Ok(Box::new(Exp::Or(Or { span: or.span, args })))
        }
        Exp::IfThen(ifthen) => {
            let premise = check_formula(&ifthen.premise, env, ctx)?;
            let conclusion = check_formula(&ifthen.conclusion, env, ctx)?;
            Ok(Box::new(Exp::IfThen(IfThen { span: ifthen.span, premise, conclusion })))
        }
        Exp::All(all) => {
            check_type(&all.var_type, env)?;
            let body_env = if all.binds_type() {
                env.declare_type(all.span, IdBind::from(all.var.clone()))
            } else {
                env.declare_term_var(all.span, all.var.clone(), all.var_type.clone())
            };
            let body = check_formula(&all.body, &body_env, ctx)?;
            Ok(Box::new(Exp::All(All {
                span: all.span,
                var: all.var.clone(),
                var_type: all.var_type.clone(),
                body,
            })))
        }
        Exp::Exists(exists) => {
            for var in &exists.vars {
                check_type(&var.typ, env)?;
            }
            let body_env = env.declare_term_vars(
                exists.span,
                exists.vars.iter().map(|v| (v.name.clone(), v.typ.clone())),
            );
            let body = check_formula(&exists.body, &body_env, ctx)?;
            Ok(Box::new(Exp::Exists(Exists {
                span: exists.span,
                vars: exists.vars.clone(),
                body,
            })))
        }
        Exp::MakeArray(make) => {
            let list = synth_term(&make.list, env, ctx, rec)?;
            let list_typ = list.typ().ok_or_else(|| cannot_synth(term))?;
            match &*list_typ {
                Exp::TypApp(app) if app.args.len() == 1 => {
                    match env.def_of_type(&app.name.id) {
                        Some(union) if union.name.base_name() == "List" => {
                            let elem = app.args[0].clone();
                            Ok(Box::new(Exp::MakeArray(MakeArray {
                                span: make.span,
                                list,
                                inferred_type: Some(Box::new(Exp::ArrayType(ArrayType {
                                    span: make.span,
                                    elem: Box::new(elem),
                                }))),
                            })))
                        }
                        _ => Err(TypeError::ExpectedList {
                            typ: list_typ.print_to_string(None),
                            span: make.span.to_miette(),
                        }),
                    }
                }
                _ => Err(TypeError::ExpectedList {
                    typ: list_typ.print_to_string(None),
                    span: make.span.to_miette(),
                }),
            }
        }
        Exp::ArrayGet(get) => {
            let array = synth_term(&get.array, env, ctx, rec)?;
            let index = synth_term(&get.index, env, ctx, rec)?;
            let array_typ = array.typ().ok_or_else(|| cannot_synth(term))?;
            match *array_typ {
                Exp::ArrayType(arr) => Ok(Box::new(Exp::ArrayGet(ArrayGet {
                    span: get.span,
                    array,
                    index,
                    inferred_type: Some(arr.elem),
                }))),
                other => Err(TypeError::ExpectedArray {
                    typ: other.print_to_string(None),
                    span: get.span.to_miette(),
                }),
            }
        }
        Exp::Call(call) => synth_call(call, env, ctx, rec),
        Exp::Match(mat) => check_match(mat, None, env, ctx, rec),
        Exp::TermInst(inst) => check_term_inst(inst, env, ctx, rec),
        Exp::RecFun(_) => Ok(Box::new(term.clone())),
        _ => Err(cannot_synth(term)),
    }
}

pub fn check_term(
    term: &Exp,
    expected: &Exp,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    ctx.trace(|| {
        format!(
            "check_term: {} : {}",
            term.print_to_string(None),
            expected.print_to_string(None)
        )
    });
    match term {
        Exp::Mark(mark) => {
            let subject = check_term(&mark.subject, expected, env, ctx, rec)?;
            Ok(Box::new(Exp::Mark(Mark { span: mark.span, subject })))
        }
        Exp::Hole(hole) => Ok(Box::new(Exp::Hole(Hole {
            span: hole.span,
            inferred_type: Some(Box::new(expected.clone())),
        }))),
        Exp::Omitted(omitted) => Ok(Box::new(Exp::Omitted(Omitted {
            span: omitted.span,
            inferred_type: Some(Box::new(expected.clone())),
        }))),
        Exp::Generic(generic) => match expected {
            Exp::FunType(funty) if funty.type_params.len() == generic.params.len() => {
                let body_env = env.declare_type_vars(generic.span, &generic.params);
                let body_expected = Exp::FunType(FunType {
                    span: funty.span,
                    type_params: Vec::new(),
                    param_types: funty.param_types.clone(),
                    ret_type: funty.ret_type.clone(),
                });
                let body = check_term(&generic.body, &body_expected, &body_env, ctx, rec)?;
                Ok(Box::new(Exp::Generic(Generic {
                    span: generic.span,
                    params: generic.params.clone(),
                    body,
                    inferred_type: Some(Box::new(expected.clone())),
                })))
            }
            _ => Err(TypeError::mismatch(expected, term, generic.span)),
        },
        Exp::Global(global) => check_global(global, expected, env),
        Exp::Lambda(lambda) => match expected {
            Exp::FunType(funty) if funty.type_params.is_empty() => {
                if funty.param_types.len() != lambda.params.len() {
                    return Err(TypeError::ArityMismatch {
                        name: "this function".to_owned(),
                        expected: funty.param_types.len(),
                        actual: lambda.params.len(),
                        span: lambda.span.to_miette(),
                    });
                }
                let body_env = env.declare_term_vars(
                    lambda.span,
                    lambda
                        .params
                        .iter()
                        .zip(funty.param_types.iter())
                        .map(|(param, typ)| (param.name.clone(), Box::new(typ.clone()))),
                );
                let body = check_term(&lambda.body, &funty.ret_type, &body_env, ctx, rec)?;
                Ok(Box::new(Exp::Lambda(Lambda {
                    span: lambda.span,
                    params: lambda.params.clone(),
                    body,
                    inferred_type: Some(Box::new(expected.clone())),
                })))
            }
            Exp::FunType(funty) => {
                let params = funty
                    .type_params
                    .iter()
                    .map(|param| param.id.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(TypeError::ExpectedGenericTerm { params, span: lambda.span.to_miette() })
            }
            _ => Err(TypeError::LambdaNotExpected {
                expected: expected.print_to_string(None),
                span: lambda.span.to_miette(),
            }),
        },
        Exp::LocalLet(local) => {
            let bound = synth_term(&local.bound, env, ctx, rec)?;
            let bound_typ = bound.typ().ok_or_else(|| cannot_synth(term))?;
            let body_env = env.declare_term_var(local.span, local.name.clone(), bound_typ);
            let body = check_term(&local.body, expected, &body_env, ctx, rec)?;
            Ok(Box::new(Exp::LocalLet(LocalLet {
                span: local.span,
                name: local.name.clone(),
                bound,
                body,
                inferred_type: Some(Box::new(expected.clone())),
            })))
        }
        Exp::Call(call) => {
            if let Exp::Global(global) = call.rator.unmarked() {
                let base = global.name.base_name();
                if base == EQUALS || base == NOT_EQUALS {
                    let synthed = synth_term(term, env, ctx, rec)?;
                    let typ = synthed.typ().ok_or_else(|| cannot_synth(term))?;
                    if *typ != *expected {
                        return Err(TypeError::mismatch(expected, &typ, call.span));
                    }
                    return Ok(synthed);
                }
                if let Some(rec_ctx) = rec {
                    if is_rec_call(global, rec_ctx) {
                        check_rec_call_scrutinee(call, rec_ctx, env)?;
                    }
                }
            }
            check_call(call, Some(expected), env, ctx, rec)
        }
        Exp::Match(mat) => check_match(mat, Some(expected), env, ctx, rec),
        Exp::Conditional(cond) => {
            let new_cond = check_term(&cond.cond, &BoolType::mk(), env, ctx, rec)?;
            let then_branch = check_term(&cond.then_branch, expected, env, ctx, rec)?;
            let else_branch = check_term(&cond.else_branch, expected, env, ctx, rec)?;
            Ok(Box::new(Exp::Conditional(Conditional {
                span: cond.span,
                cond: new_cond,
                then_branch,
                else_branch,
                inferred_type: Some(Box::new(expected.clone())),
            })))
        }
        Exp::TermInst(inst) => {
            let result = check_term_inst(inst, env, ctx, rec)?;
            let typ = result.typ().ok_or_else(|| cannot_synth(term))?;
            if *typ != *expected {
                return Err(TypeError::mismatch(expected, &typ, inst.span));
            }
            Ok(result)
        }
        _ => {
            let synthed = synth_term(term, env, ctx, rec)?;
            let typ = synthed.typ().ok_or_else(|| cannot_synth(term))?;
            if *typ != *expected {
                return Err(TypeError::mismatch(expected, &typ, term.span()));
            }
            Ok(synthed)
        }
    }
}

fn cannot_synth(term: &Exp) -> TypeError {
    TypeError::CannotSynthesize {
        term: term.print_to_string(None),
        span: term.span().to_miette(),
    }
}

/// Resolve a global reference to its overload candidates. A unique
/// candidate is selected immediately; several candidates produce an
/// `OverloadType` which the surrounding call or checking context narrows
/// down.
pub(crate) fn resolve_global(global: &Global, env: &Env) -> TcResult<Global> {
    let candidates: Vec<(IdBound, Box<Exp>)> = if global.candidates.is_empty() {
        env.term_candidates(global.name.base_name())
    } else {
        let mut result = Vec::new();
        for candidate in &global.candidates {
            match env.type_of_term(&candidate.id) {
                Some(typ) => result.push((candidate.clone(), typ)),
                None => {
                    return Err(TypeError::undefined_variable(
                        candidate.base_name(),
                        global.span,
                    ));
                }
            }
        }
        result
    };
    match candidates.len() {
        0 => Err(TypeError::undefined_variable(global.name.base_name(), global.span)),
        1 => {
            let (name, typ) = candidates.into_iter().next().unwrap();
            Ok(Global {
                span: global.span,
                name: name.clone(),
                candidates: vec![name],
                inferred_type: Some(typ),
            })
        }
        _ => Ok(Global {
            span: global.span,
            name: global.name.clone(),
            candidates: candidates.iter().map(|(name, _)| name.clone()).collect(),
            inferred_type: Some(Box::new(Exp::OverloadType(OverloadType {
                span: global.span,
                overloads: candidates
                    .into_iter()
                    .map(|(name, typ)| Overload { name, typ })
                    .collect(),
            }))),
        }),
    }
}

/// Check a global reference against an expected type, selecting among
/// overloads and inserting type arguments where they can be deduced.
fn check_global(global: &Global, expected: &Exp, env: &Env) -> TcResult<Box<Exp>> {
    let resolved = resolve_global(global, env)?;
    let typ = resolved.inferred_type.clone().expect("resolved global carries a type");
    match (&*typ, expected) {
        (Exp::OverloadType(overloads), _) => {
            for entry in &overloads.overloads {
                if *entry.typ == *expected {
                    return Ok(Box::new(Exp::Global(
                        resolved.resolved(entry.name.clone(), entry.typ.clone()),
                    )));
                }
            }
            Err(TypeError::OverloadNoMatch {
                name: global.name.base_name().to_owned(),
                overloads: overloads
                    .overloads
                    .iter()
                    .map(|entry| format!("\t{}", entry.typ.print_to_string(None)))
                    .collect::<Vec<_>>()
                    .join("\n"),
                span: global.span.to_miette(),
            })
        }
        (Exp::UnknownInst(inst), Exp::TypApp(app)) if inst.name.id == app.name.id => {
            Ok(Box::new(Exp::TermInst(TermInst {
                span: global.span,
                subject: Box::new(Exp::Global(Global {
                    inferred_type: Some(Box::new(expected.clone())),
                    ..resolved.clone()
                })),
                type_args: app.args.clone(),
                inferred: true,
                inferred_type: Some(Box::new(expected.clone())),
            })))
        }
        (Exp::FunType(actual), Exp::FunType(wanted))
            if !actual.type_params.is_empty() && wanted.type_params.is_empty() =>
        {
            let k = actual.type_params.len();
            let mut uni = TypeUnifier::new(k);
            let lifted = shift_and_clone(expected, (0, k as isize));
            let Exp::FunType(lifted) = lifted else { unreachable!() };
            let matched = type_match(&actual.ret_type, &lifted.ret_type, &mut uni, global.span)
                .and_then(|()| {
                    for (p1, p2) in actual.param_types.iter().zip(lifted.param_types.iter()) {
                        type_match(p1, p2, &mut uni, global.span)?;
                    }
                    Ok(())
                });
            if matched.is_ok() {
                if let Ok(type_args) = uni.type_args() {
                    return Ok(Box::new(Exp::TermInst(TermInst {
                        span: global.span,
                        subject: Box::new(Exp::Global(resolved)),
                        type_args,
                        inferred: true,
                        inferred_type: Some(Box::new(expected.clone())),
                    })));
                }
            }
            Err(TypeError::mismatch(expected, &typ, global.span))
        }
        _ => {
            if *typ == *expected {
                Ok(Box::new(Exp::Global(resolved)))
            } else {
                Err(TypeError::mismatch(expected, &typ, global.span))
            }
        }
    }
}

fn is_rec_call(global: &Global, rec: &RecCtx) -> bool {
    let base = global.name.base_name();
    let rec_base = match rec.name.find(DISAMBIGUATOR) {
        Some(pos) => &rec.name[..pos],
        None => rec.name.as_str(),
    };
    base == rec_base
}

/// A recursive call must scrutinize one of the pattern variables of the
/// enclosing case (spec'd by level, so shadowing cannot defeat the check).
fn check_rec_call_scrutinee(call: &Call, rec: &RecCtx, env: &Env) -> TcResult<()> {
    let expected = rec.subterm_names.join(" or ");
    match call.args.first() {
        Some(Exp::Variable(var)) => {
            let lvl = var.idx.to_lvl(env.term_depth());
            if rec.subterms.contains(&lvl) {
                Ok(())
            } else {
                Err(TypeError::RecursionNotStructural {
                    expected,
                    actual: var.name.id.clone(),
                    span: call.span.to_miette(),
                })
            }
        }
        Some(other) => Err(TypeError::RecursionNotStructural {
            expected,
            actual: other.print_to_string(None),
            span: call.span.to_miette(),
        }),
        None => Err(TypeError::RecursionNotStructural {
            expected,
            actual: "a call without arguments".to_owned(),
            span: call.span.to_miette(),
        }),
    }
}

fn synth_call(call: &Call, env: &Env, ctx: &mut Ctx, rec: Option<&RecCtx>) -> TcResult<Box<Exp>> {
    if let Exp::Global(global) = call.rator.unmarked() {
        let base = global.name.base_name();
        // The builtin equality operators: synthesize the left side, check
        // the right side at its type.
        if base == EQUALS || base == NOT_EQUALS {
            if call.args.len() != 2 {
                return Err(TypeError::ArityMismatch {
                    name: base.to_owned(),
                    expected: 2,
                    actual: call.args.len(),
                    span: call.span.to_miette(),
                });
            }
            let lhs = synth_term(&call.args[0], env, ctx, rec)?;
            let lhs_typ = lhs.typ().ok_or_else(|| cannot_synth(&call.args[0]))?;
            let rhs = check_term(&call.args[1], &lhs_typ, env, ctx, rec)?;
            let rator = Exp::Global(Global {
                span: global.span,
                name: global.name.clone(),
                candidates: vec![global.name.clone()],
                inferred_type: None,
            });
            return Ok(Box::new(Exp::Call(Call {
                span: call.span,
                rator: Box::new(rator),
                args: vec![*lhs, *rhs],
                inferred_type: Some(Box::new(BoolType::mk())),
            })));
        }
        if let Some(rec_ctx) = rec {
            if is_rec_call(global, rec_ctx) {
                check_rec_call_scrutinee(call, rec_ctx, env)?;
            }
        }
    }
    check_call(call, None, env, ctx, rec)
}

fn check_match(
    mat: &Match,
    expected: Option<&Exp>,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    let on_exp = synth_term(&mat.on_exp, env, ctx, rec)?;
    let scrutinee_typ = on_exp.typ().ok_or_else(|| cannot_synth(&mat.on_exp))?;
    let mut cases_present = HashSet::default();
    let mut result_type: Option<Box<Exp>> = None;
    let mut new_cases = Vec::new();
    for case in &mat.cases {
        let (pattern, body_env, _) =
            check_pattern(&case.pattern, &scrutinee_typ, env, &mut cases_present)?;
        let body = match expected {
            Some(expected) => check_term(&case.body, expected, &body_env, ctx, rec)?,
            None => synth_term(&case.body, &body_env, ctx, rec)?,
        };
        let body_typ = body.typ().ok_or_else(|| cannot_synth(&case.body))?;
        match &result_type {
            None => result_type = Some(body_typ),
            Some(previous) => {
                if *previous != body_typ {
                    return Err(TypeError::BranchTypeMismatch {
                        first: previous.print_to_string(None),
                        second: body_typ.print_to_string(None),
                        span: case.span.to_miette(),
                    });
                }
            }
        }
        new_cases.push(Case { span: case.span, pattern, body });
    }
    check_exhaustive(&scrutinee_typ, &cases_present, env)?;
    Ok(Box::new(Exp::Match(Match {
        span: mat.span,
        on_exp,
        cases: new_cases,
        inferred_type: result_type,
    })))
}

fn check_term_inst(
    inst: &TermInst,
    env: &Env,
    ctx: &mut Ctx,
    rec: Option<&RecCtx>,
) -> TcResult<Box<Exp>> {
    for arg in &inst.type_args {
        check_type(arg, env)?;
    }
    // Resolve the subject without rejecting not-yet-instantiated generics.
    let subject = match inst.subject.unmarked() {
        Exp::Global(global) => Box::new(Exp::Global(resolve_global(global, env)?)),
        _ => synth_term(&inst.subject, env, ctx, rec)?,
    };
    let subject_typ = subject.typ().ok_or_else(|| cannot_synth(&inst.subject))?;
    let result_typ = match &*subject_typ {
        Exp::FunType(funty) if !funty.type_params.is_empty() => {
            if funty.type_params.len() != inst.type_args.len() {
                return Err(TypeError::ArityMismatch {
                    name: inst.subject.print_to_string(None),
                    expected: funty.type_params.len(),
                    actual: inst.type_args.len(),
                    span: inst.span.to_miette(),
                });
            }
            let param_types = funty
                .param_types
                .iter()
                .map(|param| *open_type_binders(param, &inst.type_args))
                .collect();
            let ret_type = open_type_binders(&funty.ret_type, &inst.type_args);
            Exp::FunType(FunType {
                span: funty.span,
                type_params: Vec::new(),
                param_types,
                ret_type,
            })
        }
        Exp::UnknownInst(unknown) => Exp::TypApp(TypApp {
            span: inst.span,
            name: unknown.name.clone(),
            args: inst.type_args.clone(),
        }),
        other => {
            return Err(TypeError::CannotInstantiate {
                typ: other.print_to_string(None),
                span: inst.span.to_miette(),
            });
        }
    };
    Ok(Box::new(Exp::TermInst(TermInst {
        span: inst.span,
        subject,
        type_args: inst.type_args.clone(),
        inferred: inst.inferred,
        inferred_type: Some(Box::new(result_typ)),
    })))
}
