//! The checking driver.
//!
//! A module is checked in three passes:
//!
//! 1. `process_declaration` populates the environment with type
//!    declarations, union constructors, function signatures and `define`
//!    bindings.
//! 2. `type_check_decl` checks function bodies, definitions, theorem
//!    formulas and `assert`/`print` arguments, resolving overloads.
//! 3. `collect_env` extends the environment with theorem formulas and
//!    function values, after which `check_proofs` verifies every theorem
//!    and executes `assert` and `print`.
//!
//! Imports run the same passes on the imported AST under a shared set of
//! already-imported and already-checked module identities, so each module
//! is processed at most once per database.

use ast::ctx::Env;
use ast::*;
use elaborator::ctx::{Ctx, Verbosity};
use elaborator::normalizer::Reduce;
use elaborator::typechecker::{
    RecCtx, check_exhaustive, check_formula, check_pattern, check_term, check_type, synth_term,
};
use miette_util::ToMiette;
use printer::Print;
use prover::check_proof_of;

use crate::result::{DriverError, Error};

/// A database tracking the modules that have been checked. Holds the
/// checker context and the memoization state shared between a module and
/// its imports.
pub struct Database {
    pub ctx: Ctx,
    /// Modules whose declarations have been processed.
    imported: HashSet<String>,
    /// Modules whose proofs have been checked.
    checked: HashSet<String>,
    /// The number of theorem proofs verified by this database. Observable
    /// by tests to ensure import memoization skips re-checking.
    pub proofs_checked: u64,
    /// Output produced by `print` statements, in order.
    pub output: Vec<String>,
}

impl Database {
    pub fn new(verbosity: Verbosity) -> Database {
        let mut ctx = Ctx::new();
        ctx.verbosity = verbosity;
        Database {
            ctx,
            imported: HashSet::default(),
            checked: HashSet::default(),
            proofs_checked: 0,
            output: Vec::new(),
        }
    }

    /// Run the three passes on a module, returning the resulting
    /// environment.
    pub fn check_module(&mut self, module: &Module) -> Result<Env, Error> {
        self.check_module_in(module, Env::empty())
    }

    fn check_module_in(&mut self, module: &Module, env: Env) -> Result<Env, Error> {
        log::debug!("processing declarations of module {}", module.name);
        let mut env = env;
        let mut declared = Vec::new();
        for decl in &module.decls {
            let (decl, new_env) = self.process_declaration(decl, env)?;
            env = new_env;
            declared.push(decl);
        }

        log::debug!("type checking module {}", module.name);
        let mut typed = Vec::new();
        for decl in &declared {
            typed.push(self.type_check_decl(decl, &env)?);
        }

        log::debug!("checking proofs of module {}", module.name);
        for decl in &typed {
            env = collect_env(decl, env);
        }
        if !self.checked.contains(&module.name) {
            for decl in &typed {
                self.check_proofs(decl, &env)?;
            }
            self.checked.insert(module.name.clone());
        }
        Ok(env)
    }

    // Pass 1: declarations
    //
    //

    fn process_declaration(&mut self, decl: &Decl, env: Env) -> Result<(Decl, Env), Error> {
        match decl {
            Decl::Def(def) => {
                let (typ, body) = match &def.typ {
                    None => {
                        let body = synth_term(&def.body, &env, &mut self.ctx, None)?;
                        let typ = body.typ().expect("synthesized terms carry their type");
                        (typ, body)
                    }
                    Some(typ) => {
                        check_type(typ, &env)?;
                        (typ.clone(), def.body.clone())
                    }
                };
                let name = self.disambiguate(&def.name, &typ, &env, def.span)?;
                let new_env = env.declare_term_var(def.span, name.clone(), typ.clone());
                let new_def =
                    Def { span: def.span, name, typ: Some(typ), body };
                Ok((Decl::Def(new_def), new_env))
            }
            Decl::Theorem(_) => Ok((decl.clone(), env)),
            Decl::Fun(recfun) => {
                let body_env = env.declare_type_vars(recfun.span, &recfun.type_params);
                for param in &recfun.param_types {
                    check_type(param, &body_env)?;
                }
                check_type(&recfun.ret_type, &body_env)?;
                let fun_type = Box::new(recfun.fun_type());
                let name =
                    self.disambiguate(&recfun.name, &fun_type, &env, recfun.span)?;
                let new_env = env.declare_term_var(recfun.span, name.clone(), fun_type);
                let new_fun = RecFun { name, ..recfun.clone() };
                Ok((Decl::Fun(new_fun), new_env))
            }
            Decl::Union(union) => {
                let mut env = env.define_type(union.span, union.name.clone(), union.clone());
                let body_env = env.declare_type_vars(union.span, &union.type_params);
                let k = union.type_params.len();
                for ctor in &union.ctors {
                    for param in &ctor.params {
                        check_type(param, &body_env)?;
                    }
                    let ctor_type = if !ctor.params.is_empty() {
                        let ret_args: Vec<Exp> = union
                            .type_params
                            .iter()
                            .enumerate()
                            .map(|(position, param)| {
                                TypeVariable::mk(k - 1 - position, &param.id)
                            })
                            .collect();
                        Exp::FunType(FunType {
                            span: ctor.span,
                            type_params: union.type_params.clone(),
                            param_types: ctor.params.clone(),
                            ret_type: Box::new(TypApp {
                                span: union.span,
                                name: IdBound::from(union.name.clone()),
                                args: ret_args,
                            }
                            .into()),
                        })
                    } else if k > 0 {
                        Exp::UnknownInst(UnknownInst {
                            span: ctor.span,
                            name: IdBound::from(union.name.clone()),
                        })
                    } else {
                        Exp::TypApp(TypApp {
                            span: ctor.span,
                            name: IdBound::from(union.name.clone()),
                            args: Vec::new(),
                        })
                    };
                    env = env.declare_term_var(ctor.span, ctor.name.clone(), Box::new(ctor_type));
                }
                Ok((decl.clone(), env))
            }
            Decl::Import(import) => {
                if self.imported.contains(&import.module.name) {
                    return Ok((decl.clone(), env));
                }
                self.imported.insert(import.module.name.clone());
                let old_verbosity = self.ctx.verbosity;
                if old_verbosity == Verbosity::CurrOnly {
                    self.ctx.verbosity = Verbosity::None;
                }
                let result = self.check_module_in(&import.module, env);
                self.ctx.verbosity = old_verbosity;
                Ok((decl.clone(), result?))
            }
            Decl::Assert(_) | Decl::Print(_) => Ok((decl.clone(), env)),
        }
    }

    /// Only functions may share a base name; a second function-typed
    /// definition receives a fresh canonical name so both remain
    /// addressable.
    fn disambiguate(
        &mut self,
        name: &IdBind,
        typ: &Exp,
        env: &Env,
        span: Option<codespan::Span>,
    ) -> Result<IdBind, Error> {
        if !env.term_base_name_taken(name.base_name()) {
            return Ok(name.clone());
        }
        if !matches!(typ, Exp::FunType(_)) {
            return Err(elaborator::TypeError::AlreadyDefined {
                name: name.base_name().to_owned(),
                span: span.to_miette(),
                previous: env.span_of_term_base(name.base_name()).to_miette(),
            }
            .into());
        }
        Ok(IdBind { span: name.span, id: self.ctx.fresh_name(name.base_name()) })
    }

    // Pass 2: type checking
    //
    //

    fn type_check_decl(&mut self, decl: &Decl, env: &Env) -> Result<Decl, Error> {
        match decl {
            Decl::Def(def) => {
                let typ = def.typ.clone().expect("pass 1 records the type");
                let body = check_term(&def.body, &typ, env, &mut self.ctx, None)?;
                Ok(Decl::Def(Def {
                    span: def.span,
                    name: def.name.clone(),
                    typ: Some(typ),
                    body,
                }))
            }
            Decl::Theorem(theorem) => {
                let formula = check_formula(&theorem.formula, env, &mut self.ctx)?;
                Ok(Decl::Theorem(Theorem { formula, ..theorem.clone() }))
            }
            Decl::Fun(recfun) => {
                let fun_env = env.define_term_var(
                    recfun.span,
                    recfun.name.clone(),
                    Box::new(recfun.fun_type()),
                    Box::new(Exp::RecFun(recfun.clone())),
                );
                let body_env = fun_env.declare_type_vars(recfun.span, &recfun.type_params);
                let mut cases_present = HashSet::default();
                let mut cases = Vec::new();
                for case in &recfun.cases {
                    cases.push(self.type_check_fun_case(
                        case,
                        recfun,
                        &body_env,
                        &mut cases_present,
                    )?);
                }
                check_exhaustive(&recfun.param_types[0], &cases_present, &body_env)?;
                Ok(Decl::Fun(RecFun { cases, ..recfun.clone() }))
            }
            Decl::Union(_) | Decl::Import(_) => Ok(decl.clone()),
            Decl::Assert(assert) => {
                let formula = check_formula(&assert.formula, env, &mut self.ctx)?;
                Ok(Decl::Assert(Assert { span: assert.span, formula }))
            }
            Decl::Print(print) => {
                let term = synth_term(&print.term, env, &mut self.ctx, None)?;
                Ok(Decl::Print(PrintStmt { span: print.span, term }))
            }
        }
    }

    fn type_check_fun_case(
        &mut self,
        case: &FunCase,
        recfun: &RecFun,
        body_env: &Env,
        cases_present: &mut HashSet<String>,
    ) -> Result<FunCase, Error> {
        let scrutinee_typ = &recfun.param_types[0];
        let (pattern, case_env, bound) =
            check_pattern(&case.pattern, scrutinee_typ, body_env, cases_present)?;

        // The pattern variables are the only subterms a recursive call may
        // scrutinize. Remember them as levels: levels stay valid under the
        // binders the case body introduces.
        let first_level = case_env.term_depth() - bound.len();
        let subterms: Vec<Lvl> = (0..bound.len()).map(|i| Lvl(first_level + i)).collect();
        let subterm_names: Vec<String> =
            bound.iter().map(|(name, _)| name.id.clone()).collect();

        if case.params.len() != recfun.param_types.len() - 1 {
            return Err(elaborator::TypeError::ArityMismatch {
                name: recfun.name.base_name().to_owned(),
                expected: recfun.param_types.len() - 1,
                actual: case.params.len(),
                span: case.span.to_miette(),
            }
            .into());
        }
        let case_env = case_env.declare_term_vars(
            case.span,
            case.params
                .iter()
                .zip(recfun.param_types[1..].iter())
                .map(|(param, typ)| (param.clone(), Box::new(typ.clone()))),
        );

        let rec = RecCtx { name: recfun.name.id.clone(), subterms, subterm_names };
        let body =
            check_term(&case.body, &recfun.ret_type, &case_env, &mut self.ctx, Some(&rec))?;
        Ok(FunCase { span: case.span, pattern, params: case.params.clone(), body })
    }

    // Pass 3: proof checking and execution
    //
    //

    fn check_proofs(&mut self, decl: &Decl, env: &Env) -> Result<(), Error> {
        match decl {
            Decl::Def(_) | Decl::Fun(_) | Decl::Union(_) | Decl::Import(_) => Ok(()),
            Decl::Theorem(theorem) => {
                log::debug!("checking proof of theorem {}", theorem.name.base_name());
                check_proof_of(&theorem.proof, &theorem.formula, env, &mut self.ctx)?;
                self.proofs_checked += 1;
                Ok(())
            }
            Decl::Print(print) => {
                let result =
                    self.ctx.with_reduce_all(|ctx| print.term.reduce(env, ctx));
                let rendered = result.print_to_string(None);
                println!("{rendered}");
                self.output.push(rendered);
                Ok(())
            }
            Decl::Assert(assert) => self.check_assert(assert, env),
        }
    }

    fn check_assert(&mut self, assert: &Assert, env: &Env) -> Result<(), Error> {
        if let Some((lhs, rhs)) = split_equation(&assert.formula) {
            let (lhs, rhs) = self.ctx.with_reduce_all(|ctx| {
                (lhs.reduce(env, ctx), rhs.reduce(env, ctx))
            });
            if lhs == rhs {
                return Ok(());
            }
            return Err(DriverError::AssertionFailed {
                lhs: lhs.print_to_string(None),
                rhs: rhs.print_to_string(None),
                span: assert.span.to_miette(),
            }
            .into());
        }
        let result = self.ctx.with_reduce_all(|ctx| assert.formula.reduce(env, ctx));
        match &*result {
            Exp::BoolLit(BoolLit { value: true, .. }) => Ok(()),
            Exp::BoolLit(BoolLit { value: false, .. }) => Err(DriverError::AssertionFailed {
                lhs: assert.formula.print_to_string(None),
                rhs: "false".to_owned(),
                span: assert.span.to_miette(),
            }
            .into()),
            other => Err(DriverError::AssertionNotBoolean {
                result: other.print_to_string(None),
                span: assert.span.to_miette(),
            }
            .into()),
        }
    }
}

fn collect_env(decl: &Decl, env: Env) -> Env {
    match decl {
        Decl::Def(def) => env.define_term_var(
            def.span,
            def.name.clone(),
            def.typ.clone().expect("pass 1 records the type"),
            def.body.clone(),
        ),
        Decl::Theorem(theorem) => {
            env.declare_proof_var(theorem.span, theorem.name.clone(), theorem.formula.clone())
        }
        Decl::Fun(recfun) => env.define_term_var(
            recfun.span,
            recfun.name.clone(),
            Box::new(recfun.fun_type()),
            Box::new(Exp::RecFun(recfun.clone())),
        ),
        Decl::Union(_) | Decl::Import(_) | Decl::Assert(_) | Decl::Print(_) => env,
    }
}
