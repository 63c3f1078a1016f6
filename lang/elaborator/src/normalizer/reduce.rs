//! The reducer: a small-step normalizer for terms and formulas.
//!
//! Reduction performs β-reduction, ι-reduction of switches whose scrutinee
//! is constructor-headed, dispatch of recursive function calls, and
//! definitional (δ) unfolding. Unfolding is gated: a definition is only
//! unfolded when `reduce_all` is set or the definition's name is in the
//! enabled set of the checker context. Every unfolding is recorded so
//! callers can detect whether a targeted unfolding fired.

use ast::ctx::Env;
use ast::*;
use num_bigint::BigInt;

use crate::ctx::Ctx;

pub trait Reduce {
    fn reduce(&self, env: &Env, ctx: &mut Ctx) -> Box<Exp>;
}

impl Reduce for Exp {
    fn reduce(&self, env: &Env, ctx: &mut Ctx) -> Box<Exp> {
        match self {
            Exp::Variable(e) => {
                if ctx.defs_enabled(&e.name.id) {
                    if let Some(value) = env.value_of_term_idx(e.idx) {
                        ctx.record_reduced(&e.name.id);
                        return value.reduce(env, ctx);
                    }
                }
                Box::new(self.clone())
            }
            Exp::Global(e) => {
                if ctx.defs_enabled(&e.name.id) {
                    if let Some(value) = env.value_of_term(&e.name.id) {
                        ctx.record_reduced(&e.name.id);
                        // Recursive function values only step at call
                        // position, where their dispatch is handled.
                        if !matches!(&*value, Exp::RecFun(_)) {
                            return value.reduce(env, ctx);
                        }
                    }
                }
                Box::new(self.clone())
            }
            Exp::TypeVariable(_)
            | Exp::IntLit(_)
            | Exp::BoolLit(_)
            | Exp::Hole(_)
            | Exp::Omitted(_)
            | Exp::RecFun(_)
            | Exp::IntType(_)
            | Exp::BoolType(_)
            | Exp::TypeType(_)
            | Exp::FunType(_)
            | Exp::TypApp(_)
            | Exp::UnknownInst(_)
            | Exp::ArrayType(_)
            | Exp::OverloadType(_) => Box::new(self.clone()),
            Exp::Lambda(e) => {
                let body_env = env.declare_term_vars(
                    e.span,
                    e.params.iter().map(|p| {
                        (p.name.clone(), p.typ.clone().unwrap_or_else(|| Box::new(Omitted::mk())))
                    }),
                );
                Box::new(Exp::Lambda(Lambda {
                    span: e.span,
                    params: e.params.clone(),
                    body: e.body.reduce(&body_env, ctx),
                    inferred_type: e.inferred_type.clone(),
                }))
            }
            Exp::Generic(e) => {
                let body_env = env.declare_type_vars(e.span, &e.params);
                Box::new(Exp::Generic(Generic {
                    span: e.span,
                    params: e.params.clone(),
                    body: e.body.reduce(&body_env, ctx),
                    inferred_type: e.inferred_type.clone(),
                }))
            }
            Exp::Call(e) => reduce_call(e, env, ctx),
            Exp::TermInst(e) => {
                let subject = e.subject.reduce(env, ctx);
                let type_args: Vec<Exp> =
                    e.type_args.iter().map(|arg| *arg.reduce(env, ctx)).collect();
                match *subject {
                    Exp::Generic(generic) => {
                        open_type_binders(&generic.body, &type_args).reduce(env, ctx)
                    }
                    subject => Box::new(Exp::TermInst(TermInst {
                        span: e.span,
                        subject: Box::new(subject),
                        type_args,
                        inferred: e.inferred,
                        inferred_type: e.inferred_type.clone(),
                    })),
                }
            }
            Exp::Conditional(e) => {
                let cond = e.cond.reduce(env, ctx);
                match *cond {
                    Exp::BoolLit(BoolLit { value: true, .. }) => e.then_branch.reduce(env, ctx),
                    Exp::BoolLit(BoolLit { value: false, .. }) => e.else_branch.reduce(env, ctx),
                    cond => Box::new(Exp::Conditional(Conditional {
                        span: e.span,
                        cond: Box::new(cond),
                        then_branch: e.then_branch.reduce(env, ctx),
                        else_branch: e.else_branch.reduce(env, ctx),
                        inferred_type: e.inferred_type.clone(),
                    })),
                }
            }
            Exp::LocalLet(e) => {
                let bound = e.bound.reduce(env, ctx);
                open_term_binders(&e.body, &[*bound]).reduce(env, ctx)
            }
            Exp::Match(e) => reduce_match(e, env, ctx),
            Exp::MakeArray(e) => Box::new(Exp::MakeArray(MakeArray {
                span: e.span,
                list: e.list.reduce(env, ctx),
                inferred_type: e.inferred_type.clone(),
            })),
            Exp::ArrayGet(e) => reduce_array_get(e, env, ctx),
            Exp::Mark(e) => {
                Box::new(Exp::Mark(Mark { span: e.span, subject: e.subject.reduce(env, ctx) }))
            }
            Exp::And(e) => {
                let args: Vec<Exp> = e.args.iter().map(|arg| *arg.reduce(env, ctx)).collect();
                if args.iter().any(|arg| is_bool_lit(arg, false)) {
                    return Box::new(BoolLit::mk(false));
                }
                if args.iter().all(|arg| is_bool_lit(arg, true)) {
                    return Box::new(BoolLit::mk(true));
                }
                Box::new(Exp::And(And { span: e.span, args }))
            }
            Exp::Or(e) => {
                let args: Vec<Exp> = e.args.iter().map(|arg| *arg.reduce(env, ctx)).collect();
                if args.iter().any(|arg| is_bool_lit(arg, true)) {
                    return Box::new(BoolLit::mk(true));
                }
                if args.iter().all(|arg| is_bool_lit(arg, false)) {
                    return Box::new(BoolLit::mk(false));
                }
                Box::new(Exp::Or(Or { span: e.span, args }))
            }
            Exp::IfThen(e) => {
                let premise = e.premise.reduce(env, ctx);
                let conclusion = e.conclusion.reduce(env, ctx);
                if is_bool_lit(&premise, false) || is_bool_lit(&conclusion, true) {
                    return Box::new(BoolLit::mk(true));
                }
                if is_bool_lit(&premise, true) {
                    return Box::new(*conclusion);
                }
                Box::new(Exp::IfThen(IfThen { span: e.span, premise, conclusion }))
            }
            Exp::All(e) => {
                let body_env = if e.binds_type() {
                    env.declare_type(e.span, IdBind::from(e.var.clone()))
                } else {
                    env.declare_term_var(e.span, e.var.clone(), e.var_type.clone())
                };
                Box::new(Exp::All(All {
                    span: e.span,
                    var: e.var.clone(),
                    var_type: e.var_type.clone(),
                    body: e.body.reduce(&body_env, ctx),
                }))
            }
            Exp::Exists(e) => {
                let body_env = env.declare_term_vars(
                    e.span,
                    e.vars.iter().map(|v| (v.name.clone(), v.typ.clone())),
                );
                Box::new(Exp::Exists(Exists {
                    span: e.span,
                    vars: e.vars.clone(),
                    body: e.body.reduce(&body_env, ctx),
                }))
            }
        }
    }
}

fn is_bool_lit(exp: &Exp, value: bool) -> bool {
    matches!(exp, Exp::BoolLit(BoolLit { value: v, .. }) if *v == value)
}

/// Decompose a constructor-headed value into the constructor's base name
/// and its arguments.
fn head_ctor(exp: &Exp, env: &Env) -> Option<(String, Vec<Exp>)> {
    match exp {
        Exp::Global(global) if env.is_constructor(global.name.base_name()) => {
            Some((global.name.base_name().to_owned(), Vec::new()))
        }
        Exp::TermInst(inst) => head_ctor(&inst.subject, env),
        Exp::Call(call) => {
            let (name, head_args) = head_ctor(&call.rator, env)?;
            if head_args.is_empty() { Some((name, call.args.clone())) } else { None }
        }
        _ => None,
    }
}

/// Decide a closed equation. `None` means the equation does not reduce.
fn decide_equal(lhs: &Exp, rhs: &Exp, env: &Env) -> Option<bool> {
    if lhs == rhs {
        return Some(true);
    }
    match (lhs, rhs) {
        (Exp::IntLit(_), Exp::IntLit(_)) => Some(false),
        (Exp::BoolLit(_), Exp::BoolLit(_)) => Some(false),
        _ => {
            let (name1, args1) = head_ctor(lhs, env)?;
            let (name2, args2) = head_ctor(rhs, env)?;
            if name1 != name2 || args1.len() != args2.len() {
                return Some(false);
            }
            let mut undecided = false;
            for (arg1, arg2) in args1.iter().zip(args2.iter()) {
                match decide_equal(arg1, arg2, env) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => undecided = true,
                }
            }
            if undecided { None } else { Some(true) }
        }
    }
}

fn reduce_call(call: &Call, env: &Env, ctx: &mut Ctx) -> Box<Exp> {
    let rator = call.rator.reduce(env, ctx);
    let args: Vec<Exp> = call.args.iter().map(|arg| *arg.reduce(env, ctx)).collect();

    // A closed equation evaluates to a boolean.
    if let Exp::Global(global) = rator.unmarked() {
        if global.name.base_name() == EQUALS && args.len() == 2 {
            if let Some(value) = decide_equal(&args[0], &args[1], env) {
                return Box::new(BoolLit::mk(value));
            }
        }
    }

    // Recursive function calls dispatch on the head constructor of their
    // first argument. The dispatch is not gated: a call whose scrutinee is
    // constructor-headed always steps, while a stuck call stays symbolic.
    if let Some(recfun) = recfun_of_rator(&rator, env) {
        if let Some(body) = dispatch_recfun(&recfun, &args, env) {
            return body.reduce(env, ctx);
        }
        return Box::new(Exp::Call(Call {
            span: call.span,
            rator,
            args,
            inferred_type: call.inferred_type.clone(),
        }));
    }

    match *rator {
        Exp::Lambda(lambda) if lambda.params.len() == args.len() => {
            open_term_binders(&lambda.body, &args).reduce(env, ctx)
        }
        rator => Box::new(Exp::Call(Call {
            span: call.span,
            rator: Box::new(rator),
            args,
            inferred_type: call.inferred_type.clone(),
        })),
    }
}

/// The recursive function a call operator stands for, if any. Looks
/// through explicit and inferred type instantiations.
fn recfun_of_rator(rator: &Exp, env: &Env) -> Option<RecFun> {
    match rator.unmarked() {
        Exp::RecFun(recfun) => Some(recfun.clone()),
        Exp::Global(global) => match env.value_of_term(&global.name.id) {
            Some(value) => match *value {
                Exp::RecFun(recfun) => Some(recfun),
                _ => None,
            },
            None => None,
        },
        Exp::TermInst(inst) => recfun_of_rator(&inst.subject, env)
            .map(|recfun| instantiate_recfun(&recfun, &inst.type_args)),
        _ => None,
    }
}

/// Select the case for the first argument's constructor and instantiate
/// its body. `None` if the scrutinee is not (yet) a value.
fn dispatch_recfun(recfun: &RecFun, args: &[Exp], env: &Env) -> Option<Box<Exp>> {
    let scrutinee = args.first()?;

    if let Exp::BoolLit(BoolLit { value, .. }) = scrutinee {
        for case in &recfun.cases {
            if let Pattern::Bool(PatternBool { value: pat_value, .. }) = &case.pattern {
                if pat_value == value {
                    return Some(open_term_binders(&case.body, &args[1..].to_vec()));
                }
            }
        }
        return None;
    }

    let (ctor_name, ctor_args) = head_ctor(scrutinee, env)?;
    for case in &recfun.cases {
        let Pattern::Ctor(pattern) = &case.pattern else { continue };
        if pattern.name.base_name() != ctor_name || pattern.params.len() != ctor_args.len() {
            continue;
        }
        let mut bindings = ctor_args.clone();
        bindings.extend(args[1..].iter().cloned());
        return Some(open_term_binders(&case.body, &bindings));
    }
    None
}

/// Instantiate the type parameters of a recursive function value.
fn instantiate_recfun(recfun: &RecFun, type_args: &[Exp]) -> RecFun {
    RecFun {
        span: recfun.span,
        name: recfun.name.clone(),
        type_params: Vec::new(),
        param_types: recfun
            .param_types
            .iter()
            .map(|typ| *open_type_binders(typ, type_args))
            .collect(),
        ret_type: open_type_binders(&recfun.ret_type, type_args),
        cases: recfun
            .cases
            .iter()
            .map(|case| FunCase {
                span: case.span,
                pattern: case.pattern.clone(),
                params: case.params.clone(),
                body: open_type_binders(&case.body, type_args),
            })
            .collect(),
    }
}

fn reduce_match(mat: &Match, env: &Env, ctx: &mut Ctx) -> Box<Exp> {
    let on_exp = mat.on_exp.reduce(env, ctx);

    if let Exp::BoolLit(BoolLit { value, .. }) = &*on_exp {
        for case in &mat.cases {
            if let Pattern::Bool(PatternBool { value: pat_value, .. }) = &case.pattern {
                if pat_value == value {
                    return case.body.reduce(env, ctx);
                }
            }
        }
    }

    if let Some((ctor_name, ctor_args)) = head_ctor(&on_exp, env) {
        for case in &mat.cases {
            let Pattern::Ctor(pattern) = &case.pattern else { continue };
            if pattern.name.base_name() == ctor_name && pattern.params.len() == ctor_args.len() {
                return open_term_binders(&case.body, &ctor_args).reduce(env, ctx);
            }
        }
    }

    // Stuck: normalize the case bodies under their pattern binders.
    let cases = mat
        .cases
        .iter()
        .map(|case| {
            let body_env = match &case.pattern {
                Pattern::Ctor(pattern) => env.declare_term_vars(
                    case.span,
                    pattern.params.iter().map(|p| (p.clone(), Box::new(Omitted::mk()))),
                ),
                Pattern::Bool(_) => env.clone(),
            };
            Case {
                span: case.span,
                pattern: case.pattern.clone(),
                body: case.body.reduce(&body_env, ctx),
            }
        })
        .collect();
    Box::new(Exp::Match(Match {
        span: mat.span,
        on_exp,
        cases,
        inferred_type: mat.inferred_type.clone(),
    }))
}

fn reduce_array_get(get: &ArrayGet, env: &Env, ctx: &mut Ctx) -> Box<Exp> {
    let array = get.array.reduce(env, ctx);
    let index = get.index.reduce(env, ctx);
    if let (Exp::MakeArray(make), Exp::IntLit(int)) = (&*array, &*index) {
        let mut remaining = int.value.clone();
        let mut list = (*make.list).clone();
        loop {
            match head_ctor(&list, env) {
                Some((name, args)) if name == "node" && args.len() == 2 => {
                    if remaining == BigInt::from(0) {
                        return Box::new(args[0].clone());
                    }
                    remaining -= 1;
                    list = args[1].clone();
                }
                _ => break,
            }
        }
    }
    Box::new(Exp::ArrayGet(ArrayGet {
        span: get.span,
        array,
        index,
        inferred_type: get.inferred_type.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::ctx::Env;

    fn nat_env() -> Env {
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
            .declare_term_var(None, IdBind::from_string("zero"), Box::new(TypApp::mk("Nat", vec![])))
            .declare_term_var(
                None,
                IdBind::from_string("suc"),
                Box::new(FunType::mk(vec![TypApp::mk("Nat", vec![])], TypApp::mk("Nat", vec![]))),
            )
    }

    fn nat(n: usize) -> Exp {
        let mut result = Global::mk("zero");
        for _ in 0..n {
            result = Call::mk(Global::mk("suc"), vec![result]);
        }
        result
    }

    /// Addition on Nat, recursive in the first argument.
    fn plus() -> RecFun {
        let nat_ty = || TypApp::mk("Nat", vec![]);
        RecFun {
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
        }
    }

    fn plus_env() -> Env {
        let recfun = plus();
        let typ = Box::new(recfun.fun_type());
        nat_env().define_term_var(None, IdBind::from_string("+"), typ, Box::new(Exp::RecFun(recfun)))
    }

    #[test]
    fn beta_reduction() {
        let mut ctx = Ctx::new();
        let lambda = Exp::Lambda(Lambda {
            span: None,
            params: vec![Param { name: VarBind::from_string("x"), typ: None }],
            body: Box::new(Variable::mk(0, "x")),
            inferred_type: None,
        });
        let call = Call::mk(lambda, vec![IntLit::mk(7)]);
        assert_eq!(*call.reduce(&Env::empty(), &mut ctx), IntLit::mk(7));
    }

    #[test]
    fn iota_reduction_of_switch() {
        let mut ctx = Ctx::new();
        let env = nat_env();
        // switch suc(zero) { case zero { 0 } case suc(p) { 1 } }
        let switch = Exp::Match(Match {
            span: None,
            on_exp: Box::new(nat(1)),
            cases: vec![
                Case { span: None, pattern: Pattern::ctor("zero", &[]), body: Box::new(IntLit::mk(0)) },
                Case {
                    span: None,
                    pattern: Pattern::ctor("suc", &["p"]),
                    body: Box::new(IntLit::mk(1)),
                },
            ],
            inferred_type: None,
        });
        assert_eq!(*switch.reduce(&env, &mut ctx), IntLit::mk(1));
    }

    #[test]
    fn recfun_computes_addition() {
        let mut ctx = Ctx::new();
        let env = plus_env();
        let call = Call::mk(Exp::RecFun(plus()), vec![nat(2), nat(3)]);
        assert_eq!(*call.reduce(&env, &mut ctx), nat(5));
    }

    #[test]
    fn recfun_dispatch_is_not_gated() {
        // A call to a recursive function with a constructor-headed first
        // argument steps even when no definitions are enabled.
        let mut ctx = Ctx::new();
        let env = plus_env();
        let call = Call::mk(Global::mk("+"), vec![nat(2), nat(3)]);
        assert_eq!(*call.reduce(&env, &mut ctx), nat(5));
    }

    #[test]
    fn recfun_call_on_variable_stays_symbolic() {
        let mut ctx = Ctx::new();
        let env = plus_env().declare_term_var(
            None,
            IdBind::from_string("x"),
            Box::new(TypApp::mk("Nat", vec![])),
        );
        let call = Call::mk(Global::mk("+"), vec![Variable::mk(0, "x"), nat(0)]);
        let result = call.reduce(&env, &mut ctx);
        assert!(matches!(&*result, Exp::Call(_)));
    }

    #[test]
    fn delta_reduction_is_gated() {
        // Unfolding a `define` is controlled by the enabled-definitions
        // set of the context.
        let mut ctx = Ctx::new();
        let env = nat_env().define_term_var(
            None,
            IdBind::from_string("two"),
            Box::new(TypApp::mk("Nat", vec![])),
            Box::new(nat(2)),
        );
        let term = Global::mk("two");
        let stuck = term.reduce(&env, &mut ctx);
        assert_eq!(*stuck, Global::mk("two"));
        assert!(ctx.reduced_defs.is_empty());
        let result =
            ctx.with_defs_enabled(vec!["two".to_owned()], |ctx| term.reduce(&env, ctx));
        assert_eq!(*result, nat(2));
        assert!(ctx.reduced_defs.contains("two"));
    }

    #[test]
    fn closed_equation_evaluates() {
        let mut ctx = Ctx::new();
        let env = nat_env();
        let eq = mk_equal(None, nat(2), nat(2));
        assert_eq!(*eq.reduce(&env, &mut ctx), BoolLit::mk(true));
        let neq = mk_equal(None, nat(2), nat(3));
        assert_eq!(*neq.reduce(&env, &mut ctx), BoolLit::mk(false));
    }

    #[test]
    fn open_equation_is_stuck() {
        let mut ctx = Ctx::new();
        let env = nat_env().declare_term_var(
            None,
            IdBind::from_string("x"),
            Box::new(TypApp::mk("Nat", vec![])),
        );
        let eq = mk_equal(None, Variable::mk(0, "x"), nat(0));
        assert!(matches!(&*eq.reduce(&env, &mut ctx), Exp::Call(_)));
    }

    #[test]
    fn reduction_preserves_type_of_conditional() {
        let mut ctx = Ctx::new();
        let cond = Exp::Conditional(Conditional {
            span: None,
            cond: Box::new(BoolLit::mk(true)),
            then_branch: Box::new(IntLit::mk(1)),
            else_branch: Box::new(IntLit::mk(2)),
            inferred_type: Some(Box::new(IntType::mk())),
        });
        let reduced = cond.reduce(&Env::empty(), &mut ctx);
        assert_eq!(*reduced, IntLit::mk(1));
    }
}
