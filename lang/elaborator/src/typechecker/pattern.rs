//! Pattern checking and exhaustiveness.

use ast::ctx::Env;
use ast::*;
use miette_util::ToMiette;
use printer::Print;

use crate::result::{TcResult, TypeError};

/// Resolve the scrutinee's type to its union definition and type
/// arguments.
pub fn scrutinee_union(typ: &Exp, env: &Env) -> TcResult<(Union, Vec<Exp>)> {
    match typ.unmarked() {
        Exp::TypApp(app) => match env.def_of_type(&app.name.id) {
            Some(union) => Ok((union, app.args.clone())),
            None => Err(TypeError::NotAUnion {
                typ: typ.print_to_string(None),
                span: typ.span().to_miette(),
            }),
        },
        _ => Err(TypeError::NotAUnion {
            typ: typ.print_to_string(None),
            span: typ.span().to_miette(),
        }),
    }
}

/// Check a pattern against the scrutinee's type. Returns the resolved
/// pattern, the environment extended with the pattern's variables at their
/// instantiated types, and those types (in binding order).
pub fn check_pattern(
    pattern: &Pattern,
    typ: &Exp,
    env: &Env,
    cases_present: &mut HashSet<String>,
) -> TcResult<(Pattern, Env, Vec<(VarBind, Box<Exp>)>)> {
    match pattern {
        Pattern::Bool(pat) => match typ.unmarked() {
            Exp::BoolType(_) => {
                cases_present.insert(pat.value.to_string());
                Ok((pattern.clone(), env.clone(), Vec::new()))
            }
            _ => Err(TypeError::PatternTypeMismatch {
                typ: typ.print_to_string(None),
                pattern: pattern.print_to_string(None),
                span: pat.span.to_miette(),
            }),
        },
        Pattern::Ctor(pat) => {
            let (union, type_args) = scrutinee_union(typ, env)?;
            let Some(ctor) = union.ctor(pat.name.base_name()) else {
                return Err(TypeError::PatternBadConstructor {
                    name: pat.name.base_name().to_owned(),
                    union: union.name.base_name().to_owned(),
                    span: pat.span.to_miette(),
                });
            };
            if ctor.arity() != pat.params.len() {
                return Err(TypeError::ArityMismatch {
                    name: ctor.name.base_name().to_owned(),
                    expected: ctor.arity(),
                    actual: pat.params.len(),
                    span: pat.span.to_miette(),
                });
            }
            let param_types: Vec<Box<Exp>> = ctor
                .params
                .iter()
                .map(|param| open_type_binders(param, &type_args))
                .collect();
            let bound: Vec<(VarBind, Box<Exp>)> =
                pat.params.iter().cloned().zip(param_types).collect();
            let body_env = env.declare_term_vars(pat.span, bound.iter().cloned());
            cases_present.insert(ctor.name.base_name().to_owned());
            let resolved = Pattern::Ctor(PatternCtor {
                span: pat.span,
                name: IdBound::from(ctor.name.clone()),
                candidates: vec![IdBound::from(ctor.name.clone())],
                params: pat.params.clone(),
            });
            Ok((resolved, body_env, bound))
        }
    }
}

/// After all cases have been checked: booleans require both `true` and
/// `false`, unions require every constructor.
pub fn check_exhaustive(
    typ: &Exp,
    cases_present: &HashSet<String>,
    env: &Env,
) -> TcResult<()> {
    match typ.unmarked() {
        Exp::BoolType(_) => {
            for value in ["true", "false"] {
                if !cases_present.contains(value) {
                    return Err(TypeError::PatternNonExhaustive {
                        missing: value.to_owned(),
                        span: typ.span().to_miette(),
                    });
                }
            }
            Ok(())
        }
        _ => {
            let (union, _) = scrutinee_union(typ, env)?;
            for ctor in &union.ctors {
                if !cases_present.contains(ctor.name.base_name()) {
                    return Err(TypeError::PatternNonExhaustive {
                        missing: ctor.print_to_string(None),
                        span: typ.span().to_miette(),
                    });
                }
            }
            Ok(())
        }
    }
}
