//! Rewriting with proved equations and application of definitions.

use ast::ctx::Env;
use ast::*;
use elaborator::ctx::Ctx;
use elaborator::normalizer::Reduce;
use miette_util::ToMiette;
use printer::Print;

use crate::mark::{count_marks, find_mark, replace_mark};
use crate::result::{ProofError, ProofResult};

/// Rewrite a formula with one equation: replace every subterm that is
/// structurally equal to the left-hand side by the right-hand side. When
/// the formula carries a mark, rewriting is confined to the marked
/// subterm. The number of replacements is accumulated in the context.
pub fn rewrite(formula: &Exp, equation: &Exp, ctx: &mut Ctx) -> ProofResult<Box<Exp>> {
    let Some((lhs, rhs)) = split_equation(equation) else {
        return Err(ProofError::NotAnEquation {
            formula: equation.print_to_string(None),
            span: equation.span().to_miette(),
        });
    };
    match count_marks(formula) {
        0 => Ok(rewrite_aux(formula, lhs, rhs, (0, 0), ctx)),
        1 => {
            let subject = find_mark(formula).expect("a mark was counted");
            let new_subject = rewrite_aux(&subject, lhs, rhs, (0, 0), ctx);
            Ok(replace_mark(formula, &new_subject))
        }
        _ => Err(ProofError::TooManyMarks {
            formula: formula.print_to_string(None),
            span: formula.span().to_miette(),
        }),
    }
}

/// The structural traversal behind `rewrite`. `depth` counts the term and
/// type binders crossed so far: the equation's sides are shifted by it
/// before comparison so that rewriting under binders lines up indices.
fn rewrite_aux(formula: &Exp, lhs: &Exp, rhs: &Exp, depth: (isize, isize), ctx: &mut Ctx) -> Box<Exp> {
    if *formula == shift_and_clone(lhs, depth) {
        ctx.num_rewrites += 1;
        return Box::new(shift_and_clone(rhs, depth));
    }
    let under_terms = |n: usize, depth: (isize, isize)| (depth.0 + n as isize, depth.1);
    let under_types = |n: usize, depth: (isize, isize)| (depth.0, depth.1 + n as isize);
    let result = match formula {
        Exp::Variable(_)
        | Exp::TypeVariable(_)
        | Exp::Global(_)
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
        | Exp::OverloadType(_) => formula.clone(),
        Exp::Lambda(e) => Exp::Lambda(Lambda {
            span: e.span,
            params: e.params.clone(),
            body: rewrite_aux(&e.body, lhs, rhs, under_terms(e.params.len(), depth), ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::Generic(e) => Exp::Generic(Generic {
            span: e.span,
            params: e.params.clone(),
            body: rewrite_aux(&e.body, lhs, rhs, under_types(e.params.len(), depth), ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::Call(e) => Exp::Call(Call {
            span: e.span,
            rator: rewrite_aux(&e.rator, lhs, rhs, depth, ctx),
            args: e.args.iter().map(|arg| *rewrite_aux(arg, lhs, rhs, depth, ctx)).collect(),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::TermInst(e) => Exp::TermInst(TermInst {
            span: e.span,
            subject: rewrite_aux(&e.subject, lhs, rhs, depth, ctx),
            type_args: e.type_args.clone(),
            inferred: e.inferred,
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::Conditional(e) => Exp::Conditional(Conditional {
            span: e.span,
            cond: rewrite_aux(&e.cond, lhs, rhs, depth, ctx),
            then_branch: rewrite_aux(&e.then_branch, lhs, rhs, depth, ctx),
            else_branch: rewrite_aux(&e.else_branch, lhs, rhs, depth, ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::LocalLet(e) => Exp::LocalLet(LocalLet {
            span: e.span,
            name: e.name.clone(),
            bound: rewrite_aux(&e.bound, lhs, rhs, depth, ctx),
            body: rewrite_aux(&e.body, lhs, rhs, under_terms(1, depth), ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::Match(e) => Exp::Match(Match {
            span: e.span,
            on_exp: rewrite_aux(&e.on_exp, lhs, rhs, depth, ctx),
            cases: e
                .cases
                .iter()
                .map(|case| Case {
                    span: case.span,
                    pattern: case.pattern.clone(),
                    body: rewrite_aux(
                        &case.body,
                        lhs,
                        rhs,
                        under_terms(case.pattern.arity(), depth),
                        ctx,
                    ),
                })
                .collect(),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::MakeArray(e) => Exp::MakeArray(MakeArray {
            span: e.span,
            list: rewrite_aux(&e.list, lhs, rhs, depth, ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::ArrayGet(e) => Exp::ArrayGet(ArrayGet {
            span: e.span,
            array: rewrite_aux(&e.array, lhs, rhs, depth, ctx),
            index: rewrite_aux(&e.index, lhs, rhs, depth, ctx),
            inferred_type: e.inferred_type.clone(),
        }),
        Exp::Mark(e) => Exp::Mark(Mark {
            span: e.span,
            subject: rewrite_aux(&e.subject, lhs, rhs, depth, ctx),
        }),
        Exp::And(e) => Exp::And(And {
            span: e.span,
            args: e.args.iter().map(|arg| *rewrite_aux(arg, lhs, rhs, depth, ctx)).collect(),
        }),
        Exp::Or(e) => Exp::Or(Or {
            span: e.span,
            args: e.args.iter().map(|arg| *rewrite_aux(arg, lhs, rhs, depth, ctx)).collect(),
        }),
        Exp::IfThen(e) => Exp::IfThen(IfThen {
            span: e.span,
            premise: rewrite_aux(&e.premise, lhs, rhs, depth, ctx),
            conclusion: rewrite_aux(&e.conclusion, lhs, rhs, depth, ctx),
        }),
        Exp::All(e) => {
            let inner = if e.binds_type() { under_types(1, depth) } else { under_terms(1, depth) };
            Exp::All(All {
                span: e.span,
                var: e.var.clone(),
                var_type: e.var_type.clone(),
                body: rewrite_aux(&e.body, lhs, rhs, inner, ctx),
            })
        }
        Exp::Exists(e) => Exp::Exists(Exists {
            span: e.span,
            vars: e.vars.clone(),
            body: rewrite_aux(&e.body, lhs, rhs, under_terms(e.vars.len(), depth), ctx),
        }),
    };
    Box::new(result)
}

/// Rewrite a formula with a sequence of proved equations, renormalizing
/// after each. An equation that fires nowhere is an error.
pub fn apply_rewrites(
    formula: &Exp,
    equations: &[Exp],
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<Box<Exp>> {
    let marks = count_marks(formula);
    if marks > 1 {
        return Err(ProofError::TooManyMarks {
            formula: formula.print_to_string(None),
            span: formula.span().to_miette(),
        });
    }
    let mut subject = match marks {
        0 => Box::new(formula.clone()),
        _ => find_mark(formula).expect("a mark was counted"),
    };
    for equation in equations {
        if !is_equation(equation) {
            return Err(ProofError::NotAnEquation {
                formula: equation.print_to_string(None),
                span: equation.span().to_miette(),
            });
        }
        ctx.reset_rewrites();
        subject = rewrite(&subject, equation, ctx)?;
        if ctx.num_rewrites == 0 {
            return Err(ProofError::RewriteNoMatch {
                equation: equation.print_to_string(None),
                formula: subject.print_to_string(None),
                span: equation.span().to_miette(),
            });
        }
        subject = subject.reduce(env, ctx);
    }
    if marks == 0 {
        Ok(subject)
    } else {
        Ok(replace_mark(formula, &subject).reduce(env, ctx))
    }
}

/// A definition a proof step refers to: a module-level name or a local
/// `define`d variable.
enum DefRef {
    Global(IdBound),
    Local(Idx, String),
}

fn def_ref(definition: &Exp) -> ProofResult<DefRef> {
    match definition.unmarked() {
        Exp::Global(global) => Ok(DefRef::Global(global.name.clone())),
        Exp::Variable(var) => Ok(DefRef::Local(var.idx, var.name.id.clone())),
        Exp::TermInst(inst) => def_ref(&inst.subject),
        other => Err(ProofError::NoDefinition {
            name: other.print_to_string(None),
            span: other.span().to_miette(),
        }),
    }
}

/// Unfold each named definition everywhere in the formula (or its marked
/// subterm) and renormalize. A definition that fires nowhere is an error.
pub fn apply_definitions(
    formula: &Exp,
    definitions: &[Exp],
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<Box<Exp>> {
    let marks = count_marks(formula);
    if marks > 1 {
        return Err(ProofError::TooManyMarks {
            formula: formula.print_to_string(None),
            span: formula.span().to_miette(),
        });
    }
    let mut subject = match marks {
        0 => Box::new(formula.clone()),
        _ => find_mark(formula).expect("a mark was counted"),
    };
    for definition in definitions {
        let (new_subject, fired, display) = match def_ref(definition)? {
            DefRef::Global(name) => {
                let Some(value) = env.value_of_term(&name.id) else {
                    return Err(ProofError::NoDefinition {
                        name: name.base_name().to_owned(),
                        span: definition.span().to_miette(),
                    });
                };
                ctx.trace(|| {
                    format!("definition subst {} => {}", name, value.print_to_string(None))
                });
                let (new_subject, fired) = substitute_global(&subject, &name.id, &value);
                ctx.record_reduced(&name.id);
                (new_subject, fired, name.base_name().to_owned())
            }
            DefRef::Local(idx, name) => {
                let Some(value) = env.value_of_term_idx(idx) else {
                    return Err(ProofError::NoDefinition {
                        name: name.clone(),
                        span: definition.span().to_miette(),
                    });
                };
                let (new_subject, fired) = replace_var(&subject, idx, &value);
                (new_subject, fired, name)
            }
        };
        if fired == 0 {
            return Err(ProofError::DefinitionNoMatch {
                name: display,
                formula: subject.print_to_string(None),
                span: definition.span().to_miette(),
            });
        }
        subject = new_subject.reduce(env, ctx);
    }
    if marks == 0 {
        Ok(subject)
    } else {
        Ok(replace_mark(formula, &subject).reduce(env, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_replaces_all_occurrences() {
        let mut ctx = Ctx::new();
        // Rewrite f(a, a) with a = b to f(b, b).
        let formula = Call::mk(Global::mk("f"), vec![Global::mk("a"), Global::mk("a")]);
        let equation = mk_equal(None, Global::mk("a"), Global::mk("b"));
        let result = rewrite(&formula, &equation, &mut ctx).unwrap();
        assert_eq!(*result, Call::mk(Global::mk("f"), vec![Global::mk("b"), Global::mk("b")]));
        assert_eq!(ctx.num_rewrites, 2);
    }

    #[test]
    fn rewrite_shifts_under_binders() {
        let mut ctx = Ctx::new();
        // Rewriting with x = c where x is free must still fire under a
        // binder, where x's index has moved.
        let formula = All::mk(
            "y",
            IntType::mk(),
            mk_equal(None, Variable::mk(1, "x"), Variable::mk(0, "y")),
        );
        let equation = mk_equal(None, Variable::mk(0, "x"), Global::mk("c"));
        let result = rewrite(&formula, &equation, &mut ctx).unwrap();
        let expected = All::mk(
            "y",
            IntType::mk(),
            mk_equal(None, Global::mk("c"), Variable::mk(0, "y")),
        );
        assert_eq!(*result, expected);
        assert_eq!(ctx.num_rewrites, 1);
    }

    #[test]
    fn rewrite_is_idempotent_once_fixed() {
        // Rewriting by an equation whose left side no longer appears is a
        // no-op.
        let mut ctx = Ctx::new();
        let formula = Call::mk(Global::mk("f"), vec![Global::mk("a")]);
        let equation = mk_equal(None, Global::mk("a"), Global::mk("b"));
        let once = rewrite(&formula, &equation, &mut ctx).unwrap();
        ctx.reset_rewrites();
        let twice = rewrite(&once, &equation, &mut ctx).unwrap();
        assert_eq!(once, twice);
        assert_eq!(ctx.num_rewrites, 0);
    }

    #[test]
    fn rewrite_confined_to_mark() {
        let mut ctx = Ctx::new();
        // f(#a#, a) with a = b only rewrites inside the mark.
        let formula = Call::mk(
            Global::mk("f"),
            vec![Mark::mk(Global::mk("a")), Global::mk("a")],
        );
        let equation = mk_equal(None, Global::mk("a"), Global::mk("b"));
        let result = rewrite(&formula, &equation, &mut ctx).unwrap();
        let expected =
            Call::mk(Global::mk("f"), vec![Mark::mk(Global::mk("b")), Global::mk("a")]);
        assert_eq!(result.print_to_string(None), expected.print_to_string(None));
        assert_eq!(ctx.num_rewrites, 1);
    }
}
