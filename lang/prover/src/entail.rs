//! The implicit entailment relation `check_implies` and the structural
//! matcher used to instantiate universally quantified facts.

use std::cell::RefCell;
use std::rc::Rc;

use ast::ctx::Env;
use ast::*;
use elaborator::ctx::Ctx;
use elaborator::normalizer::Reduce;
use miette_util::ToMiette;
use printer::Print;

use crate::result::{ProofError, ProofResult};

/// Does `frm1` entail `frm2`?
///
/// Conjunctions split on the right and weaken on the left (with implicit
/// modus ponens through if-then conjuncts), disjunctions split on the left
/// and select on the right, implications check contravariantly, universal
/// facts on the left are instantiated by structural matching against the
/// goal. The base case is structural equality.
pub fn check_implies(frm1: &Exp, frm2: &Exp, env: &Env, ctx: &mut Ctx) -> ProofResult<()> {
    ctx.trace(|| {
        format!(
            "check_implies? {} => {}",
            frm1.print_to_string(None),
            frm2.print_to_string(None)
        )
    });
    match (frm1.unmarked(), frm2.unmarked()) {
        (_, Exp::BoolLit(BoolLit { value: true, .. })) => Ok(()),
        (_, Exp::And(and)) => {
            for arg in &and.args {
                check_implies(frm1, arg, env, ctx).map_err(|e| wrap(frm1, frm2, e))?;
            }
            Ok(())
        }
        (Exp::Or(or), _) => {
            for arg in &or.args {
                check_implies(arg, frm2, env, ctx).map_err(|e| wrap(frm1, frm2, e))?;
            }
            Ok(())
        }
        (Exp::BoolLit(BoolLit { value: false, .. }), _) => Ok(()),
        (Exp::And(and), _) => {
            for arg in &and.args {
                if check_implies(arg, frm2, env, ctx).is_ok() {
                    return Ok(());
                }
                // Implicit modus ponens: an if-then conjunct whose premise
                // is discharged by the remaining conjuncts yields its
                // conclusion.
                if let Exp::IfThen(ifthen) = arg.unmarked() {
                    let rest: Vec<Exp> =
                        and.args.iter().filter(|other| *other != arg).cloned().collect();
                    let rest = Exp::And(And { span: and.span, args: rest });
                    if check_implies(&ifthen.conclusion, frm2, env, ctx).is_ok()
                        && check_implies(&rest, &ifthen.premise, env, ctx).is_ok()
                    {
                        return Ok(());
                    }
                }
            }
            let because = and
                .args
                .iter()
                .map(|arg| {
                    format!(
                        "\t{}   implies   {}",
                        arg.print_to_string(None),
                        frm2.print_to_string(None)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            Err(ProofError::EntailmentFailure {
                proved: frm1.print_to_string(None),
                goal: frm2.print_to_string(None),
                because: format!("because we could not prove at least one of\n{because}"),
                span: frm2.span().to_miette(),
            })
        }
        (_, Exp::Or(or)) => {
            for arg in &or.args {
                if check_implies(frm1, arg, env, ctx).is_ok() {
                    return Ok(());
                }
            }
            let because = or
                .args
                .iter()
                .map(|arg| {
                    format!(
                        "\t{}   implies   {}",
                        frm1.print_to_string(None),
                        arg.print_to_string(None)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            Err(ProofError::EntailmentFailure {
                proved: frm1.print_to_string(None),
                goal: frm2.print_to_string(None),
                because: format!("because we could not prove at least one of\n{because}"),
                span: frm2.span().to_miette(),
            })
        }
        (Exp::IfThen(imp1), Exp::IfThen(imp2)) => {
            check_implies(&imp2.premise, &imp1.premise, env, ctx)
                .and_then(|()| check_implies(&imp1.conclusion, &imp2.conclusion, env, ctx))
                .map_err(|e| wrap(frm1, frm2, e))
        }
        (Exp::All(all1), Exp::All(all2)) => {
            let body_env = if all2.binds_type() {
                env.declare_type(all2.span, IdBind::from(all2.var.clone()))
            } else {
                env.declare_term_var(all2.span, all2.var.clone(), all2.var_type.clone())
            };
            check_implies(&all1.body, &all2.body, &body_env, ctx)
                .map_err(|e| wrap(frm1, frm2, e))
        }
        (Exp::All(all1), _) if !all1.binds_type() => {
            let (vars, body) = collect_all(frm1);
            let n = vars.len();
            let lifted = shift_and_clone(frm2, (n as isize, 0));
            let mut matching = HashMap::default();
            formula_match(n, body, &lifted, &mut matching, env, ctx).map_err(|e| {
                ProofError::EntailmentFailure {
                    proved: frm1.print_to_string(None),
                    goal: frm2.print_to_string(None),
                    because: format!("because {e}"),
                    span: frm2.span().to_miette(),
                }
            })
        }
        _ => {
            if frm1.unmarked() == frm2.unmarked() {
                Ok(())
            } else {
                let because = match isolate_difference(frm1.unmarked(), frm2.unmarked()) {
                    Some((small1, small2)) => format!(
                        "because\n\t{}\n\t≠ {}",
                        small1.print_to_string(None),
                        small2.print_to_string(None)
                    ),
                    None => String::new(),
                };
                Err(ProofError::EntailmentFailure {
                    proved: frm1.print_to_string(None),
                    goal: frm2.print_to_string(None),
                    because,
                    span: frm2.span().to_miette(),
                })
            }
        }
    }
}

fn wrap(frm1: &Exp, frm2: &Exp, inner: ProofError) -> ProofError {
    ProofError::EntailmentFailure {
        proved: frm1.print_to_string(None),
        goal: frm2.print_to_string(None),
        because: inner.to_string(),
        span: frm2.span().to_miette(),
    }
}

/// Strip the leading term-quantifiers of a formula. Returns the binders
/// (outermost first) and the body, which has one free index per binder.
pub fn collect_all(formula: &Exp) -> (Vec<(VarBind, Box<Exp>)>, &Exp) {
    let mut vars = Vec::new();
    let mut body = formula.unmarked();
    while let Exp::All(all) = body {
        if all.binds_type() {
            break;
        }
        vars.push((all.var.clone(), all.var_type.clone()));
        body = &all.body;
    }
    (vars, body)
}

/// Collect the premises and conclusions an `apply` can use: the formula
/// may be an if-then, a universally quantified if-then, or a conjunction
/// of if-thens. Returns the number of stripped binders and the
/// premise/conclusion pairs, expressed under those binders.
pub fn collect_all_if_then(formula: &Exp) -> ProofResult<(usize, Vec<(Exp, Exp)>)> {
    match formula.unmarked() {
        Exp::All(all) if !all.binds_type() => {
            let (n, pairs) = collect_all_if_then(&all.body)?;
            Ok((n + 1, pairs))
        }
        Exp::IfThen(ifthen) => {
            Ok((0, vec![((*ifthen.premise).clone(), (*ifthen.conclusion).clone())]))
        }
        Exp::And(and) => {
            let mut pairs = Vec::new();
            for arg in &and.args {
                // Quantifiers nested inside a conjunction are not
                // instantiated.
                if let Ok((0, mut inner)) = collect_all_if_then(arg) {
                    pairs.append(&mut inner);
                }
            }
            if pairs.is_empty() {
                Err(ProofError::ApplyNotImplication {
                    formula: formula.print_to_string(None),
                    span: formula.span().to_miette(),
                })
            } else {
                Ok((0, pairs))
            }
        }
        other => Err(ProofError::ApplyNotImplication {
            formula: other.print_to_string(None),
            span: other.span().to_miette(),
        }),
    }
}

/// Match a formula with `n` free variables (stemming from stripped `all`
/// binders) against a concrete formula, accumulating an assignment.
/// The concrete formula must already be lifted into the under-binder
/// scope.
pub fn formula_match(
    n: usize,
    goal: &Exp,
    frm: &Exp,
    matching: &mut HashMap<usize, Exp>,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<()> {
    ctx.trace(|| {
        format!(
            "formula_match({}, {})",
            goal.print_to_string(None),
            frm.print_to_string(None)
        )
    });
    match (goal.unmarked(), frm.unmarked()) {
        (Exp::Variable(v1), Exp::Variable(v2)) if v1.idx == v2.idx => Ok(()),
        (Exp::Variable(var), _) if var.idx.0 < n => {
            if let Some(bound) = matching.get(&var.idx.0) {
                let bound = bound.clone();
                formula_match(n, &bound, frm, matching, env, ctx)
            } else {
                matching.insert(var.idx.0, frm.unmarked().clone());
                Ok(())
            }
        }
        (Exp::Call(c1), Exp::Call(c2)) if c1.args.len() == c2.args.len() => {
            formula_match(n, &c1.rator, &c2.rator, matching, env, ctx)?;
            for (goal_arg, arg) in c1.args.iter().zip(c2.args.iter()) {
                let goal_arg = goal_arg.subst(&SubstTermVars::from_map(matching.clone()));
                formula_match(n, &goal_arg, arg, matching, env, ctx)?;
            }
            Ok(())
        }
        (Exp::And(a1), Exp::And(a2)) if a1.args.len() == a2.args.len() => {
            for (goal_arg, arg) in a1.args.iter().zip(a2.args.iter()) {
                let goal_arg = goal_arg.subst(&SubstTermVars::from_map(matching.clone()));
                formula_match(n, &goal_arg, arg, matching, env, ctx)?;
            }
            Ok(())
        }
        (Exp::Or(o1), Exp::Or(o2)) if o1.args.len() == o2.args.len() => {
            for (goal_arg, arg) in o1.args.iter().zip(o2.args.iter()) {
                let goal_arg = goal_arg.subst(&SubstTermVars::from_map(matching.clone()));
                formula_match(n, &goal_arg, arg, matching, env, ctx)?;
            }
            Ok(())
        }
        (Exp::IfThen(i1), Exp::IfThen(i2)) => {
            formula_match(n, &i1.premise, &i2.premise, matching, env, ctx)?;
            let goal_conc = i1.conclusion.subst(&SubstTermVars::from_map(matching.clone()));
            formula_match(n, &goal_conc, &i2.conclusion, matching, env, ctx)
        }
        _ => {
            let substituted = goal.subst(&SubstTermVars::from_map(matching.clone()));
            // Only compare up to reduction once no unification variables
            // remain; reducing a term with dangling indices would consult
            // the wrong environment cells.
            if free_term_vars_below(&substituted, n).is_empty() {
                let grounded = shift_and_clone(&substituted, (-(n as isize), 0));
                let concrete = shift_and_clone(frm, (-(n as isize), 0));
                let red_goal = grounded.reduce(env, ctx);
                let red_frm = concrete.reduce(env, ctx);
                if red_goal == red_frm {
                    return Ok(());
                }
                return Err(ProofError::EntailmentFailure {
                    proved: red_frm.print_to_string(None),
                    goal: red_goal.print_to_string(None),
                    because: "the formulas do not match".to_owned(),
                    span: frm.span().to_miette(),
                });
            }
            if substituted == *frm {
                Ok(())
            } else {
                Err(ProofError::EntailmentFailure {
                    proved: frm.print_to_string(None),
                    goal: substituted.print_to_string(None),
                    because: "the formulas do not match".to_owned(),
                    span: frm.span().to_miette(),
                })
            }
        }
    }
}

/// Instantiate a formula with `n` free variables by a complete assignment
/// and shift it back into the surrounding scope.
pub fn instantiate_by_matching(n: usize, body: &Exp, matching: &HashMap<usize, Exp>) -> Box<Exp> {
    let substituted = body.subst(&SubstTermVars::from_map(matching.clone()));
    Box::new(shift_and_clone(&substituted, (-(n as isize), 0)))
}

/// The set of free term variables of `exp` with index below `n`.
pub fn free_term_vars_below(exp: &Exp, n: usize) -> HashSet<usize> {
    #[derive(Clone)]
    struct Collect {
        n: usize,
        depth: usize,
        found: Rc<RefCell<HashSet<usize>>>,
    }

    impl Substitution for Collect {
        fn get_term(&self, var: &Variable) -> Option<Box<Exp>> {
            if var.idx.0 >= self.depth && var.idx.0 - self.depth < self.n {
                self.found.borrow_mut().insert(var.idx.0 - self.depth);
            }
            None
        }

        fn bind(&mut self, terms: usize, _types: usize) {
            self.depth += terms;
        }
    }

    let found = Rc::new(RefCell::new(HashSet::default()));
    let collect = Collect { n, depth: 0, found: found.clone() };
    let _ = exp.subst(&collect);
    let result = found.borrow().clone();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_splits_on_the_right() {
        let mut ctx = Ctx::new();
        let env = Env::empty();
        let p = mk_equal(None, Global::mk("a"), Global::mk("a"));
        let q = mk_equal(None, Global::mk("b"), Global::mk("b"));
        let both = And::mk(vec![p.clone(), q.clone()]);
        check_implies(&both, &p, &env, &mut ctx).unwrap();
        check_implies(&both, &q, &env, &mut ctx).unwrap();
        check_implies(&p, &both, &env, &mut ctx).unwrap_err();
    }

    #[test]
    fn or_selects_on_the_right() {
        let mut ctx = Ctx::new();
        let env = Env::empty();
        let p = mk_equal(None, Global::mk("a"), Global::mk("a"));
        let q = mk_equal(None, Global::mk("b"), Global::mk("b"));
        let either = Or::mk(vec![p.clone(), q.clone()]);
        check_implies(&p, &either, &env, &mut ctx).unwrap();
        check_implies(&either, &p, &env, &mut ctx).unwrap_err();
    }

    #[test]
    fn universal_fact_instantiates_to_goal() {
        let mut ctx = Ctx::new();
        let env = Env::empty().declare_term_var(
            None,
            IdBind::from_string("c"),
            Box::new(IntType::mk()),
        );
        // all x:int. x = x  entails  c = c
        let fact = All::mk(
            "x",
            IntType::mk(),
            mk_equal(None, Variable::mk(0, "x"), Variable::mk(0, "x")),
        );
        let goal = mk_equal(None, Variable::mk(0, "c"), Variable::mk(0, "c"));
        check_implies(&fact, &goal, &env, &mut ctx).unwrap();
    }

    #[test]
    fn implicit_modus_ponens_through_conjunction() {
        let mut ctx = Ctx::new();
        let env = Env::empty();
        let p = mk_equal(None, Global::mk("a"), Global::mk("a"));
        let q = mk_equal(None, Global::mk("b"), Global::mk("b"));
        // (P ⇒ Q) and P  entails  Q.
        let fact = And::mk(vec![IfThen::mk(p.clone(), q.clone()), p.clone()]);
        check_implies(&fact, &q, &env, &mut ctx).unwrap();
    }
}
