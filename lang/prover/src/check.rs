//! The proof checker.
//!
//! Two mutually recursive entry points drive everything: `check_proof`
//! synthesizes the formula a proof establishes, `check_proof_of` checks a
//! proof against a goal. When no structural rule matches the goal,
//! `check_proof_of` falls back to synthesis followed by entailment.

use ast::ctx::Env;
use ast::*;
use elaborator::ctx::Ctx;
use elaborator::normalizer::Reduce;
use elaborator::typechecker::{check_formula, check_term, check_type, synth_term};
use miette_util::ToMiette;
use printer::Print;

use crate::advice::{givens, proof_advice, proof_use_advice};
use crate::entail::{check_implies, collect_all_if_then, formula_match, instantiate_by_matching};
use crate::mark::remove_marks;
use crate::result::{ProofError, ProofResult};
use crate::rewrite::{apply_definitions, apply_rewrites, rewrite};

/// Synthesize the formula proved by a proof.
pub fn check_proof(proof: &Proof, env: &Env, ctx: &mut Ctx) -> ProofResult<Box<Exp>> {
    ctx.trace(|| format!("check_proof: {}", proof.print_to_string(None)));
    match proof {
        Proof::Variable(var) => env
            .formula_of_proof_idx(var.idx)
            .ok_or_else(|| ProofError::UndefinedProofVar {
                name: var.name.id.clone(),
                span: var.span.to_miette(),
            }),
        Proof::Global(global) => env
            .formula_of_proof_var(&global.name.id)
            .ok_or_else(|| ProofError::UndefinedProofVar {
                name: global.name.base_name().to_owned(),
                span: global.span.to_miette(),
            }),
        Proof::True(t) => Ok(Box::new(Exp::BoolLit(BoolLit { span: t.span, value: true }))),
        Proof::Hole(hole) => Err(ProofError::IncompleteProof {
            message: "unfinished proof".to_owned(),
            span: hole.span.to_miette(),
        }),
        Proof::Sorry(sorry) => Err(ProofError::SorryNoGoal { span: sorry.span.to_miette() }),
        Proof::Recall(recall) => {
            let mut results = Vec::new();
            let proved = env.proved_formulas();
            for fact in &recall.facts {
                let new_fact = check_formula(fact, env, ctx)?;
                if proved.iter().any(|known| **known == *new_fact) {
                    results.push(*new_fact);
                } else {
                    return Err(ProofError::RecallNotProved {
                        formula: new_fact.print_to_string(None),
                        givens: givens(env),
                        span: recall.span.to_miette(),
                    });
                }
            }
            match results.len() {
                0 => Err(ProofError::RecallNeedsFacts { span: recall.span.to_miette() }),
                1 => Ok(Box::new(results.pop().expect("one fact"))),
                _ => Ok(Box::new(Exp::And(And { span: recall.span, args: results }))),
            }
        }
        Proof::EvaluateFact(fact) => {
            let formula = check_proof(&fact.subject, env, ctx)?;
            Ok(ctx.with_reduce_all(|ctx| formula.reduce(env, ctx)))
        }
        Proof::ApplyDefsFact(fact) => {
            let definitions = resolve_definitions(&fact.definitions, env, ctx)?;
            let formula = check_proof(&fact.subject, env, ctx)?;
            apply_definitions(&formula, &definitions, env, ctx)
        }
        Proof::EnableDefs(enable) => {
            let definitions = resolve_definitions(&enable.definitions, env, ctx)?;
            let names = definition_names(&definitions);
            ctx.with_defs_enabled(names, |ctx| check_proof(&enable.body, env, ctx))
        }
        Proof::RewriteFact(fact) => {
            let formula = check_proof(&fact.subject, env, ctx)?;
            let equations = check_equations(&fact.equations, env, ctx)?;
            apply_rewrites(&formula.reduce(env, ctx), &equations, env, ctx)
        }
        Proof::HelpUse(help) => {
            let formula = check_proof(&help.subject, env, ctx)?;
            Err(ProofError::UseAdvice {
                advice: proof_use_advice(&help.subject, &formula, env, ctx),
                span: help.span.to_miette(),
            })
        }
        Proof::PDefine(define) => {
            let rhs = synth_term(&define.rhs, env, ctx, None)?;
            let rhs_typ = rhs.typ().expect("synthesized terms carry their type");
            let body_env =
                env.define_term_var(define.span, define.name.clone(), rhs_typ, rhs.clone());
            let result = check_proof(&define.body, &body_env, ctx)?;
            // The local definition must not escape its scope.
            Ok(open_term_binders(&result, std::slice::from_ref(&*rhs)))
        }
        Proof::Have(have) => {
            let claim = check_formula(&have.claim, env, ctx)?;
            if let Exp::Hole(_) = claim.unmarked() {
                let proved = check_proof(&have.because, env, ctx)?;
                return Err(ProofError::UseAdvice {
                    advice: format!(
                        "\nhave {}:\n\t{}",
                        have.label,
                        proved.print_to_string(None)
                    ),
                    span: have.span.to_miette(),
                });
            }
            check_proof_of(&have.because, &claim, env, ctx)?;
            let body_env =
                env.declare_local_proof_var(have.span, have.label.clone(), remove_marks(&claim));
            check_proof(&have.body, &body_env, ctx)
        }
        Proof::Conclude(conclude) => {
            let claim = check_formula(&conclude.claim, env, ctx)?;
            if let Exp::Hole(_) = claim.unmarked() {
                let proved = check_proof(&conclude.because, env, ctx)?;
                return Err(ProofError::ConcludeAdvice {
                    formula: proved.print_to_string(None),
                    span: conclude.span.to_miette(),
                });
            }
            check_proof_of(&conclude.because, &claim, env, ctx)?;
            Ok(remove_marks(&claim))
        }
        Proof::Term(term) => {
            let new_term = synth_term(&term.term, env, ctx, None)?;
            check_proof_of(&term.because, &new_term, env, ctx)?;
            check_proof(&term.body, env, ctx)
        }
        Proof::Tuple(tuple) => {
            let mut formulas = Vec::new();
            for proof in &tuple.proofs {
                formulas.push(*check_proof(proof, env, ctx)?);
            }
            Ok(Box::new(Exp::And(And { span: tuple.span, args: formulas })))
        }
        Proof::AndElim(elim) => {
            let formula = check_proof(&elim.subject, env, ctx)?;
            match formula.unmarked() {
                Exp::And(and) => {
                    if elim.which >= and.args.len() {
                        return Err(ProofError::ConjunctOutOfBounds {
                            which: elim.which,
                            len: and.args.len(),
                            formula: formula.print_to_string(None),
                            span: elim.span.to_miette(),
                        });
                    }
                    Ok(Box::new(and.args[elim.which].clone()))
                }
                other => Err(ProofError::NotAConjunction {
                    formula: other.print_to_string(None),
                    span: elim.span.to_miette(),
                }),
            }
        }
        Proof::ImpIntro(intro) => {
            let Some(premise) = &intro.premise else {
                return Err(ProofError::NeedGoalDirected {
                    proof: proof.print_to_string(None),
                    span: intro.span.to_miette(),
                });
            };
            let premise = check_formula(premise, env, ctx)?;
            let body_env =
                env.declare_local_proof_var(intro.span, intro.label.clone(), premise.clone());
            let conclusion = check_proof(&intro.body, &body_env, ctx)?;
            Ok(Box::new(Exp::IfThen(IfThen { span: intro.span, premise, conclusion })))
        }
        Proof::AllIntro(intro) => {
            check_type(&intro.var_type, env)?;
            let binds_type = matches!(*intro.var_type, Exp::TypeType(_));
            let body_env = if binds_type {
                env.declare_type(intro.span, IdBind::from(intro.var.clone()))
            } else {
                env.declare_term_var(intro.span, intro.var.clone(), intro.var_type.clone())
            };
            let body = check_proof(&intro.body, &body_env, ctx)?;
            Ok(Box::new(Exp::All(All {
                span: intro.span,
                var: intro.var.clone(),
                var_type: intro.var_type.clone(),
                body,
            })))
        }
        Proof::AllElim(elim) => {
            let all_formula = check_proof(&elim.univ, env, ctx)?;
            match all_formula.unmarked() {
                Exp::All(all) => {
                    if all.binds_type() {
                        return Err(ProofError::InstantiateWithTypeSyntax {
                            univ: elim.univ.print_to_string(None),
                            arg: elim.arg.print_to_string(None),
                            span: elim.span.to_miette(),
                        });
                    }
                    let mut new_arg = check_term(&elim.arg, &all.var_type, env, ctx, None)?;
                    if let Exp::TermInst(inst) = &mut *new_arg {
                        inst.inferred = false;
                    }
                    Ok(open_term_binders(&all.body, std::slice::from_ref(&*new_arg)))
                }
                other => Err(ProofError::NotAnAllFormula {
                    formula: other.print_to_string(None),
                    span: elim.span.to_miette(),
                }),
            }
        }
        Proof::AllElimTypes(elim) => {
            let all_formula = check_proof(&elim.univ, env, ctx)?;
            match all_formula.unmarked() {
                Exp::All(all) => {
                    if !all.binds_type() {
                        return Err(ProofError::TypeInstantiationOnTerm {
                            var: all.var.id.clone(),
                            span: elim.span.to_miette(),
                        });
                    }
                    check_type(&elim.arg, env)?;
                    Ok(open_type_binders(&all.body, std::slice::from_ref(&*elim.arg)))
                }
                other => Err(ProofError::NotAnAllFormula {
                    formula: other.print_to_string(None),
                    span: elim.span.to_miette(),
                }),
            }
        }
        Proof::ModusPonens(mp) => check_modus_ponens(mp, env, ctx),
        Proof::Symmetric(sym) => {
            let formula = check_proof(&sym.body, env, ctx)?;
            let (lhs, rhs) = split_eq(&formula, sym.span)?;
            Ok(Box::new(mk_equal(sym.span, rhs.clone(), lhs.clone())))
        }
        Proof::Transitive(trans) => {
            let eq1 = check_proof(&trans.first, env, ctx)?;
            let eq2 = check_proof(&trans.second, env, ctx)?;
            let (a, b1) = split_eq(&eq1, trans.span)?;
            let (b2, c) = split_eq(&eq2, trans.span)?;
            let b1_red = b1.reduce(env, ctx);
            let b2_red = b2.reduce(env, ctx);
            if remove_marks(&b1_red) != remove_marks(&b2_red) {
                return Err(ProofError::TransitiveMismatch {
                    first: b1_red.print_to_string(None),
                    second: b2_red.print_to_string(None),
                    span: trans.span.to_miette(),
                });
            }
            Ok(Box::new(mk_equal(trans.span, a.clone(), c.clone())))
        }
        Proof::Injective(inj) => {
            if !env.is_constructor(inj.ctor.base_name()) {
                return Err(ProofError::NotAConstructor {
                    name: inj.ctor.base_name().to_owned(),
                    span: inj.span.to_miette(),
                });
            }
            let formula = check_proof(&inj.body, env, ctx)?;
            let (lhs, rhs) = split_eq(&formula, inj.span)?;
            match (lhs.unmarked(), rhs.unmarked()) {
                (Exp::Call(c1), Exp::Call(c2)) if c1.args.len() == 1 && c2.args.len() == 1 => {
                    match (c1.rator.unmarked(), c2.rator.unmarked()) {
                        (Exp::Global(g1), Exp::Global(g2))
                            if g1.name.base_name() == g2.name.base_name()
                                && g1.name.base_name() == inj.ctor.base_name() =>
                        {
                            Ok(Box::new(mk_equal(
                                inj.span,
                                c1.args[0].clone(),
                                c2.args[0].clone(),
                            )))
                        }
                        _ => Err(ProofError::InjectiveMismatch {
                            formula: formula.print_to_string(None),
                            span: inj.span.to_miette(),
                        }),
                    }
                }
                _ => Err(ProofError::InjectiveMismatch {
                    formula: formula.print_to_string(None),
                    span: inj.span.to_miette(),
                }),
            }
        }
        _ => Err(ProofError::NeedGoalDirected {
            proof: proof.print_to_string(None),
            span: proof.span().to_miette(),
        }),
    }
}

/// Check a proof against a goal formula.
pub fn check_proof_of(proof: &Proof, formula: &Exp, env: &Env, ctx: &mut Ctx) -> ProofResult<()> {
    ctx.trace(|| {
        format!(
            "check_proof_of: {}?\n\t{}",
            formula.print_to_string(None),
            proof.print_to_string(None)
        )
    });
    match proof {
        Proof::Hole(hole) => {
            let goal = check_formula(&remove_marks(formula), env, ctx)?;
            let advice = proof_advice(&goal, env, ctx);
            let givens_str = givens(env);
            let givens_block = if givens_str.is_empty() {
                String::new()
            } else {
                format!("\nGivens:\n{givens_str}")
            };
            Err(ProofError::IncompleteProof {
                message: format!(
                    "incomplete proof\nGoal:\n\t{}\n{}{}",
                    goal.print_to_string(None),
                    advice,
                    givens_block
                ),
                span: hole.span.to_miette(),
            })
        }
        Proof::Sorry(_) => {
            log::warn!("unfinished proof: {}", formula.print_to_string(None));
            Ok(())
        }
        Proof::EnableDefs(enable) => {
            let definitions = resolve_definitions(&enable.definitions, env, ctx)?;
            let names = definition_names(&definitions);
            ctx.with_defs_enabled(names, |ctx| check_proof_of(&enable.body, formula, env, ctx))
        }
        Proof::Reflexive(refl) => {
            let (lhs, rhs) = split_eq(formula, refl.span)?;
            let lhs_nf = remove_marks(&lhs.reduce(env, ctx));
            let rhs_nf = remove_marks(&rhs.reduce(env, ctx));
            if lhs_nf != rhs_nf {
                let (small_lhs, small_rhs) = isolate_difference(&lhs_nf, &rhs_nf)
                    .unwrap_or((*lhs_nf.clone(), *rhs_nf.clone()));
                return Err(ProofError::ReflexiveMismatch {
                    lhs: lhs_nf.print_to_string(None),
                    rhs: rhs_nf.print_to_string(None),
                    diff_lhs: small_lhs.print_to_string(None),
                    diff_rhs: small_rhs.print_to_string(None),
                    givens: givens(env),
                    span: refl.span.to_miette(),
                });
            }
            Ok(())
        }
        Proof::Symmetric(sym) => {
            let (lhs, rhs) = split_eq(formula, sym.span)?;
            let flipped = mk_equal(sym.span, rhs.clone(), lhs.clone());
            check_proof_of(&sym.body, &flipped, env, ctx)
        }
        Proof::Transitive(trans) => {
            let (a1, c) = split_eq(formula, trans.span)?;
            let eq1 = check_proof(&trans.first, env, ctx)?;
            let (a2, b) = split_eq(&eq1, trans.span)?;
            check_proof_of(&trans.second, &mk_equal(trans.span, b.clone(), c.clone()), env, ctx)?;
            let a1_red = a1.reduce(env, ctx);
            let a2_red = a2.reduce(env, ctx);
            if remove_marks(&a1_red) != remove_marks(&a2_red) {
                return Err(ProofError::TransitiveMismatch {
                    first: a1_red.print_to_string(None),
                    second: a2_red.print_to_string(None),
                    span: trans.span.to_miette(),
                });
            }
            Ok(())
        }
        Proof::Injective(inj) => {
            if !env.is_constructor(inj.ctor.base_name()) {
                return Err(ProofError::NotAConstructor {
                    name: inj.ctor.base_name().to_owned(),
                    span: inj.span.to_miette(),
                });
            }
            let (a, b) = split_eq(formula, inj.span)?;
            let lhs = Call::mk(Exp::Global(ctor_ref(&inj.ctor)), vec![a.clone()]);
            let rhs = Call::mk(Exp::Global(ctor_ref(&inj.ctor)), vec![b.clone()]);
            check_proof_of(&inj.body, &mk_equal(inj.span, lhs, rhs), env, ctx)
        }
        Proof::Extensionality(ext) => {
            let (lhs, rhs) = split_eq(formula, ext.span)?;
            let Some(lhs_typ) = lhs.typ() else {
                return Err(ProofError::ExtensionalityNeedsFunction {
                    typ: "an untyped term".to_owned(),
                    span: ext.span.to_miette(),
                });
            };
            match &*lhs_typ {
                Exp::FunType(funty) if funty.type_params.is_empty() => {
                    let n = funty.param_types.len();
                    let args: Vec<Exp> = (0..n)
                        .map(|i| Variable::mk(n - 1 - i, &format!("x{}", i + 1)))
                        .collect();
                    let call_lhs =
                        Call::mk(shift_and_clone(lhs, (n as isize, 0)), args.clone());
                    let call_rhs = Call::mk(shift_and_clone(rhs, (n as isize, 0)), args);
                    let mut pointwise = mk_equal(ext.span, call_lhs, call_rhs);
                    for (i, param_typ) in funty.param_types.iter().enumerate().rev() {
                        pointwise = All::mk(&format!("x{}", i + 1), param_typ.clone(), pointwise);
                    }
                    check_proof_of(&ext.body, &pointwise, env, ctx)
                }
                Exp::FunType(funty) => Err(ProofError::ExtensionalityTypeParams {
                    count: funty.type_params.len(),
                    span: ext.span.to_miette(),
                }),
                other => Err(ProofError::ExtensionalityNeedsFunction {
                    typ: other.print_to_string(None),
                    span: ext.span.to_miette(),
                }),
            }
        }
        Proof::AllIntro(intro) => {
            check_type(&intro.var_type, env)?;
            let Exp::All(all) = formula.unmarked() else {
                return Err(ProofError::NotAnAllFormula {
                    formula: formula.print_to_string(None),
                    span: intro.span.to_miette(),
                });
            };
            if *intro.var_type != *all.var_type {
                return Err(ProofError::WrongArbitraryType {
                    expected: all.var_type.print_to_string(None),
                    actual: intro.var_type.print_to_string(None),
                    span: intro.span.to_miette(),
                });
            }
            let body_env = if all.binds_type() {
                env.declare_type(intro.span, IdBind::from(intro.var.clone()))
            } else {
                env.declare_term_var(intro.span, intro.var.clone(), all.var_type.clone())
            };
            check_proof_of(&intro.body, &all.body, &body_env, ctx)
        }
        Proof::SomeIntro(intro) => {
            let Exp::Exists(exists) = formula.unmarked() else {
                return Err(ProofError::NotASomeFormula {
                    formula: formula.print_to_string(None),
                    span: intro.span.to_miette(),
                });
            };
            if intro.witnesses.len() != exists.vars.len() {
                return Err(ProofError::TupleArity {
                    expected: exists.vars.len(),
                    actual: intro.witnesses.len(),
                    span: intro.span.to_miette(),
                });
            }
            let mut witnesses = Vec::new();
            for witness in &intro.witnesses {
                witnesses.push(*synth_term(witness, env, ctx, None)?);
            }
            let body_formula = open_term_binders(&exists.body, &witnesses);
            check_proof_of(&intro.body, &body_formula, env, ctx)
        }
        Proof::SomeElim(elim) => {
            let some_formula = check_proof(&elim.some, env, ctx)?;
            let Exp::Exists(exists) = some_formula.unmarked() else {
                return Err(ProofError::NotASomeFormula {
                    formula: some_formula.print_to_string(None),
                    span: elim.span.to_miette(),
                });
            };
            if elim.witnesses.len() != exists.vars.len() {
                return Err(ProofError::TupleArity {
                    expected: exists.vars.len(),
                    actual: elim.witnesses.len(),
                    span: elim.span.to_miette(),
                });
            }
            let n = exists.vars.len();
            let body_env = env.declare_term_vars(
                elim.span,
                elim.witnesses
                    .iter()
                    .zip(exists.vars.iter())
                    .map(|(witness, var)| (witness.clone(), var.typ.clone())),
            );
            let witness_formula = exists.body.clone();
            let hypothesis = match &elim.prop {
                Some(prop) => {
                    let prop = check_formula(prop, &body_env, ctx)?;
                    let witness_red = witness_formula.reduce(&body_env, ctx);
                    let prop_red = prop.reduce(&body_env, ctx);
                    check_implies(&witness_red, &prop_red, &body_env, ctx)?;
                    prop
                }
                None => witness_formula,
            };
            let body_env =
                body_env.declare_local_proof_var(elim.span, elim.label.clone(), hypothesis);
            let lifted_goal = shift_and_clone(formula, (n as isize, 0));
            check_proof_of(&elim.body, &lifted_goal, &body_env, ctx)
        }
        Proof::ImpIntro(intro) => {
            let Exp::IfThen(ifthen) = formula.unmarked() else {
                return Err(ProofError::NotAnIfThen {
                    formula: formula.print_to_string(None),
                    span: intro.span.to_miette(),
                });
            };
            let hypothesis = match &intro.premise {
                Some(premise) => {
                    let premise = check_formula(premise, env, ctx)?;
                    let premise_red = premise.reduce(env, ctx);
                    let goal_red = ifthen.premise.reduce(env, ctx);
                    if premise_red != goal_red {
                        let (small1, small2) = isolate_difference(&premise_red, &goal_red)
                            .unwrap_or((*premise_red.clone(), *goal_red.clone()));
                        return Err(ProofError::WrongPremise {
                            expected: goal_red.print_to_string(None),
                            actual: premise_red.print_to_string(None),
                            diff_expected: small2.print_to_string(None),
                            diff_actual: small1.print_to_string(None),
                            span: intro.span.to_miette(),
                        });
                    }
                    premise
                }
                None => ifthen.premise.clone(),
            };
            let body_env =
                env.declare_local_proof_var(intro.span, intro.label.clone(), hypothesis);
            check_proof_of(&intro.body, &ifthen.conclusion, &body_env, ctx)
        }
        Proof::PDefine(define) => {
            let rhs = synth_term(&define.rhs, env, ctx, None)?;
            let rhs_typ = rhs.typ().expect("synthesized terms carry their type");
            let body_env =
                env.define_term_var(define.span, define.name.clone(), rhs_typ, rhs.clone());
            let lifted_rhs = shift_and_clone(&*rhs, (1, 0));
            let equation = mk_equal(
                define.span,
                lifted_rhs,
                Variable::mk(0, &define.name.id),
            );
            let equation = equation.reduce(&body_env, ctx);
            let lifted_goal = shift_and_clone(formula, (1, 0)).reduce(&body_env, ctx);
            let new_goal = rewrite(&lifted_goal, &equation, ctx)?;
            check_proof_of(&define.body, &new_goal, &body_env, ctx)
        }
        Proof::Have(have) => {
            let claim = check_formula(&have.claim, env, ctx)?;
            let body_env = if let Exp::Hole(_) = claim.unmarked() {
                let proved = check_proof(&have.because, env, ctx)?;
                log::warn!("have {}:\n\t{}", have.label, proved.print_to_string(None));
                env.declare_local_proof_var(have.span, have.label.clone(), proved)
            } else {
                check_proof_of(&have.because, &claim, env, ctx)?;
                env.declare_local_proof_var(have.span, have.label.clone(), remove_marks(&claim))
            };
            check_proof_of(&have.body, formula, &body_env, ctx)
        }
        Proof::Conclude(conclude) => {
            let claim = check_formula(&conclude.claim, env, ctx)?;
            if let Exp::Hole(_) = claim.unmarked() {
                check_proof_of(&conclude.because, formula, env, ctx)?;
                return Err(ProofError::ConcludeAdvice {
                    formula: formula.print_to_string(None),
                    span: conclude.span.to_miette(),
                });
            }
            let claim_red = claim.reduce(env, ctx);
            let formula_red = formula.reduce(env, ctx);
            check_implies(&claim_red, &remove_marks(&formula_red), env, ctx)?;
            check_proof_of(&conclude.because, &claim_red, env, ctx)
        }
        Proof::EvaluateGoal(eval) => {
            let reduced = ctx.with_reduce_all(|ctx| formula.reduce(env, ctx));
            if matches!(&*reduced, Exp::BoolLit(BoolLit { value: true, .. })) {
                Ok(())
            } else {
                Err(ProofError::EvaluateNotTrue {
                    result: reduced.print_to_string(None),
                    span: eval.span.to_miette(),
                })
            }
        }
        Proof::ApplyDefs(apply) => {
            let definitions = resolve_definitions(&apply.definitions, env, ctx)?;
            let new_formula = apply_definitions(formula, &definitions, env, ctx)?;
            if matches!(&*new_formula, Exp::BoolLit(BoolLit { value: true, .. })) {
                Ok(())
            } else {
                Err(ProofError::RemainsToProve {
                    formula: new_formula.print_to_string(None),
                    span: apply.span.to_miette(),
                })
            }
        }
        Proof::ApplyDefsGoal(apply) => {
            let definitions = resolve_definitions(&apply.definitions, env, ctx)?;
            let new_formula = apply_definitions(formula, &definitions, env, ctx)?;
            check_proof_of(&apply.body, &new_formula, env, ctx)
        }
        Proof::Rewrite(rw) => {
            let equations = check_equations(&rw.equations, env, ctx)?;
            let new_formula =
                apply_rewrites(&formula.reduce(env, ctx), &equations, env, ctx)?;
            if matches!(&*new_formula, Exp::BoolLit(BoolLit { value: true, .. })) {
                Ok(())
            } else {
                Err(ProofError::RemainsToProve {
                    formula: new_formula.print_to_string(None),
                    span: rw.span.to_miette(),
                })
            }
        }
        Proof::RewriteGoal(rw) => {
            let equations = check_equations(&rw.equations, env, ctx)?;
            let new_formula =
                apply_rewrites(&formula.reduce(env, ctx), &equations, env, ctx)?;
            check_proof_of(&rw.body, &new_formula.reduce(env, ctx), env, ctx)
        }
        Proof::Suffices(suffices) => check_suffices(suffices, formula, env, ctx),
        Proof::Tuple(tuple) => {
            let direct = check_tuple_direct(tuple, formula, env, ctx);
            match direct {
                Ok(()) => Ok(()),
                Err(first) if !first.is_incomplete() => {
                    // Fall back to synthesis mode.
                    let fallback = check_proof(proof, env, ctx).and_then(|form| {
                        let form_red = form.reduce(env, ctx);
                        let formula_red = formula.reduce(env, ctx);
                        check_implies(&form_red, &remove_marks(&formula_red), env, ctx)
                    });
                    match fallback {
                        Ok(()) => Ok(()),
                        Err(second) => Err(ProofError::TupleFailure {
                            goal: formula.print_to_string(None),
                            first: first.to_string(),
                            second: second.to_string(),
                            span: tuple.span.to_miette(),
                        }),
                    }
                }
                Err(incomplete) => Err(incomplete),
            }
        }
        Proof::Cases(cases) => {
            let subject_formula = check_proof(&cases.subject, env, ctx)?;
            let Exp::Or(or) = subject_formula.unmarked() else {
                return Err(ProofError::NotADisjunction {
                    formula: subject_formula.print_to_string(None),
                    span: cases.span.to_miette(),
                });
            };
            if or.args.len() != cases.cases.len() {
                return Err(ProofError::WrongCaseCount {
                    expected: or.args.len(),
                    actual: cases.cases.len(),
                    span: cases.span.to_miette(),
                });
            }
            for (alternative, case) in or.args.iter().zip(cases.cases.iter()) {
                if let Some(annotated) = &case.formula {
                    let annotated = check_formula(annotated, env, ctx)?;
                    if *annotated != *alternative {
                        return Err(ProofError::WrongCaseFormula {
                            expected: alternative.print_to_string(None),
                            actual: annotated.print_to_string(None),
                            span: case.span.to_miette(),
                        });
                    }
                }
                let body_env = env.declare_local_proof_var(
                    case.span,
                    case.label.clone(),
                    Box::new(alternative.clone()),
                );
                check_proof_of(&case.body, formula, &body_env, ctx)?;
            }
            Ok(())
        }
        Proof::Induction(induction) => check_induction(induction, formula, env, ctx),
        Proof::SwitchProof(switch) => check_switch_proof(switch, formula, env, ctx),
        _ => {
            let form = check_proof(proof, env, ctx)?;
            let form_red = form.reduce(env, ctx);
            let formula_red = formula.reduce(env, ctx);
            check_implies(&form_red, &remove_marks(&formula_red), env, ctx)
        }
    }
}

// Helpers
//
//

fn split_eq(formula: &Exp, span: Option<codespan::Span>) -> ProofResult<(&Exp, &Exp)> {
    split_equation(formula).ok_or_else(|| ProofError::NotAnEquation {
        formula: formula.print_to_string(None),
        span: span.to_miette(),
    })
}

fn ctor_ref(name: &IdBound) -> Global {
    Global {
        span: name.span,
        name: name.clone(),
        candidates: vec![name.clone()],
        inferred_type: None,
    }
}

/// Resolve the definition references of a `definition`/`enable` step.
fn resolve_definitions(
    definitions: &[Exp],
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<Vec<Exp>> {
    definitions
        .iter()
        .map(|definition| synth_term(definition, env, ctx, None).map(|d| *d).map_err(Into::into))
        .collect()
}

fn definition_names(definitions: &[Exp]) -> Vec<String> {
    definitions
        .iter()
        .filter_map(|definition| match definition.unmarked() {
            Exp::Global(global) => Some(global.name.id.clone()),
            Exp::Variable(var) => Some(var.name.id.clone()),
            Exp::TermInst(inst) => match inst.subject.unmarked() {
                Exp::Global(global) => Some(global.name.id.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn check_equations(equations: &[Proof], env: &Env, ctx: &mut Ctx) -> ProofResult<Vec<Exp>> {
    equations
        .iter()
        .map(|proof| {
            let equation = check_proof(proof, env, ctx)?;
            Ok(*equation.reduce(env, ctx))
        })
        .collect()
}

/// Specialize the body of `all x. φ(x)` — which has one free index — to a
/// term expressed under `k` additional term binders.
fn specialize_goal(body: &Exp, arg: &Exp, k: usize) -> Box<Exp> {
    let mut shifted = body.clone();
    shifted.shift_in_range(ShiftCutoff::default().bind_terms(1), (k as isize, 0));
    open_term_binders(&shifted, std::slice::from_ref(arg))
}

fn check_modus_ponens(mp: &ast::ModusPonens, env: &Env, ctx: &mut Ctx) -> ProofResult<Box<Exp>> {
    let implication = check_proof(&mp.implication, env, ctx)?;
    let implication = match implication.unmarked() {
        Exp::IfThen(_) | Exp::All(_) | Exp::And(_) => implication,
        _ => implication.reduce(env, ctx),
    };
    match implication.unmarked() {
        Exp::IfThen(ifthen) => {
            check_proof_of(&mp.arg, &ifthen.premise, env, ctx)?;
            Ok(ifthen.conclusion.clone())
        }
        Exp::And(_) => {
            let (_, pairs) = collect_all_if_then(&implication)?;
            let mut conclusions = Vec::new();
            for (premise, conclusion) in &pairs {
                if check_proof_of(&mp.arg, premise, env, ctx).is_ok() {
                    conclusions.push(conclusion.clone());
                }
            }
            match conclusions.len() {
                0 => Err(ProofError::NoPremiseMatches {
                    implication: implication.print_to_string(None),
                    arg: mp.arg.print_to_string(None),
                    span: mp.span.to_miette(),
                }),
                1 => Ok(Box::new(conclusions.pop().expect("one conclusion"))),
                _ => Ok(Box::new(Exp::And(And { span: mp.span, args: conclusions }))),
            }
        }
        Exp::All(_) => {
            let (n, pairs) = collect_all_if_then(&implication)?;
            let arg_formula = check_proof(&mp.arg, env, ctx)?;
            let lifted = shift_and_clone(&*arg_formula, (n as isize, 0));
            let mut conclusions = Vec::new();
            for (premise, conclusion) in &pairs {
                let mut matching = HashMap::default();
                if formula_match(n, premise, &lifted, &mut matching, env, ctx).is_ok()
                    && (0..n).all(|idx| matching.contains_key(&idx))
                {
                    conclusions.push(*instantiate_by_matching(n, conclusion, &matching));
                }
            }
            match conclusions.len() {
                0 => Err(ProofError::CannotDeduceInstantiation {
                    implication: implication.print_to_string(None),
                    arg: arg_formula.print_to_string(None),
                    span: mp.span.to_miette(),
                }),
                1 => Ok(Box::new(conclusions.pop().expect("one conclusion"))),
                _ => Ok(Box::new(Exp::And(And { span: mp.span, args: conclusions }))),
            }
        }
        other => Err(ProofError::ApplyNotImplication {
            formula: other.print_to_string(None),
            span: mp.span.to_miette(),
        }),
    }
}

fn check_tuple_direct(
    tuple: &ast::Tuple,
    formula: &Exp,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<()> {
    let Exp::And(and) = formula.unmarked() else {
        return Err(ProofError::NotAConjunction {
            formula: formula.print_to_string(None),
            span: tuple.span.to_miette(),
        });
    };
    if and.args.len() != tuple.proofs.len() {
        return Err(ProofError::TupleArity {
            expected: and.args.len(),
            actual: tuple.proofs.len(),
            span: tuple.span.to_miette(),
        });
    }
    for (conjunct, proof) in and.args.iter().zip(tuple.proofs.iter()) {
        check_proof_of(proof, conjunct, env, ctx)?;
    }
    Ok(())
}

fn check_suffices(
    suffices: &ast::Suffices,
    formula: &Exp,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<()> {
    // A `suffices ... by definition/rewrite` reason transforms the goal
    // mechanically; anything else must prove `claim ⇒ goal` explicitly.
    let witnesses = match &*suffices.reason {
        Proof::ApplyDefs(apply) => Some((apply.definitions.clone(), Vec::new())),
        Proof::Rewrite(rw) => Some((Vec::new(), rw.equations.clone())),
        Proof::ApplyDefsGoal(apply) => match &*apply.body {
            Proof::Rewrite(rw) => Some((apply.definitions.clone(), rw.equations.clone())),
            _ => None,
        },
        _ => None,
    };
    match witnesses {
        Some((definitions, equation_proofs)) => {
            let claim = check_formula(&suffices.claim, env, ctx)?;
            let definitions = resolve_definitions(&definitions, env, ctx)?;
            let equations = check_equations(&equation_proofs, env, ctx)?;
            let claim_red = claim.reduce(env, ctx);

            let mut new_formula = if definitions.is_empty() {
                Box::new(formula.clone())
            } else {
                apply_definitions(formula, &definitions, env, ctx)?
            };
            new_formula = new_formula.reduce(env, ctx);
            if !equations.is_empty() {
                new_formula = apply_rewrites(&new_formula, &equations, env, ctx)?;
            }

            match claim_red.unmarked() {
                Exp::Omitted(_) => check_proof_of(&suffices.body, &new_formula, env, ctx),
                Exp::Hole(_) => {
                    log::warn!(
                        "suffices to prove:\n\t{}",
                        new_formula.print_to_string(None)
                    );
                    check_proof_of(&suffices.body, &new_formula, env, ctx)
                }
                _ => {
                    check_implies(&claim_red, &new_formula, env, ctx)?;
                    check_proof_of(&suffices.body, &claim_red, env, ctx)
                }
            }
        }
        None => {
            let claim = check_formula(&suffices.claim, env, ctx)?;
            let claim_red = claim.reduce(env, ctx);
            let implication = Exp::IfThen(IfThen {
                span: suffices.span,
                premise: claim_red.clone(),
                conclusion: Box::new(formula.clone()),
            });
            let implication = implication.reduce(env, ctx);
            check_proof_of(&suffices.reason, &implication, env, ctx)?;
            check_proof_of(&suffices.body, &claim_red, env, ctx)
        }
    }
}

fn check_induction(
    induction: &ast::Induction,
    formula: &Exp,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<()> {
    check_type(&induction.typ, env)?;
    let Exp::All(all) = formula.unmarked() else {
        return Err(ProofError::NotAnAllFormula {
            formula: formula.print_to_string(None),
            span: induction.span.to_miette(),
        });
    };
    if *all.var_type != *induction.typ {
        return Err(ProofError::InductionTypeMismatch {
            typ: induction.typ.print_to_string(None),
            var_type: all.var_type.print_to_string(None),
            span: induction.span.to_miette(),
        });
    }
    let (union, _) = elaborator::typechecker::scrutinee_union(&induction.typ, env)?;
    if union.ctors.len() != induction.cases.len() {
        return Err(ProofError::WrongCaseCount {
            expected: union.ctors.len(),
            actual: induction.cases.len(),
            span: induction.span.to_miette(),
        });
    }
    for (ctor, case) in union.ctors.iter().zip(induction.cases.iter()) {
        let mut cases_present = HashSet::default();
        let (_, body_env, bound) =
            elaborator::typechecker::check_pattern(&case.pattern, &induction.typ, env, &mut cases_present)?;
        let Pattern::Ctor(pattern) = &case.pattern else {
            return Err(ProofError::CaseMismatch {
                expected: ctor.name.base_name().to_owned(),
                actual: case.pattern.print_to_string(None),
                span: case.span.to_miette(),
            });
        };
        if pattern.name.base_name() != ctor.name.base_name() {
            return Err(ProofError::CaseMismatch {
                expected: ctor.name.base_name().to_owned(),
                actual: pattern.name.base_name().to_owned(),
                span: case.span.to_miette(),
            });
        }
        let k = bound.len();
        ctx.trace(|| format!("case {}", case.pattern.print_to_string(None)));

        // The expected induction hypotheses: the goal specialized to each
        // recursive pattern parameter.
        let mut expected_ihs = Vec::new();
        for (position, param_typ) in ctor.params.iter().enumerate() {
            if union.is_recursive_param(param_typ) {
                let var = Variable::mk(k - 1 - position, &pattern.params[position].id);
                let hypothesis =
                    specialize_goal(&all.body, &var, k).reduce(&body_env, ctx);
                expected_ihs.push(hypothesis);
            }
        }

        // The goal for this case: the formula specialized to the
        // constructor applied to the pattern parameters.
        let ctor_term = if pattern.params.is_empty() {
            Exp::Global(ctor_ref(&pattern.name))
        } else {
            Call::mk(
                Exp::Global(ctor_ref(&pattern.name)),
                pattern
                    .params
                    .iter()
                    .enumerate()
                    .map(|(position, param)| Variable::mk(k - 1 - position, &param.id))
                    .collect(),
            )
        };
        let ctor_term = check_term(&ctor_term, &induction.typ, &body_env, ctx, None)?;
        let goal = specialize_goal(&all.body, &ctor_term, k);
        let goal = check_formula(&goal, &body_env, ctx)?;

        let mut case_env = body_env;
        for ((label, annotated), expected) in case.ihs.iter().zip(expected_ihs.iter()) {
            if let Some(annotated) = annotated {
                let annotated = check_formula(annotated, &case_env, ctx)?;
                if *annotated != **expected {
                    let (small1, small2) = isolate_difference(&annotated, expected)
                        .unwrap_or_else(|| ((*annotated).clone(), (**expected).clone()));
                    return Err(ProofError::WrongIhFormula {
                        expected: expected.print_to_string(None),
                        actual: annotated.print_to_string(None),
                        diff_expected: small2.print_to_string(None),
                        diff_actual: small1.print_to_string(None),
                        span: case.span.to_miette(),
                    });
                }
            }
            case_env = case_env.declare_local_proof_var(case.span, label.clone(), expected.clone());
        }
        check_proof_of(&case.body, &goal, &case_env, ctx)?;
    }
    Ok(())
}

fn check_switch_proof(
    switch: &ast::SwitchProof,
    formula: &Exp,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<()> {
    let subject = synth_term(&switch.subject, env, ctx, None)?;
    let subject_typ = subject.typ().expect("synthesized terms carry their type");
    match subject_typ.unmarked() {
        Exp::BoolType(_) => {
            let mut has_true = false;
            let mut has_false = false;
            for case in &switch.cases {
                match &case.pattern {
                    Pattern::Bool(PatternBool { value: true, .. }) => has_true = true,
                    Pattern::Bool(PatternBool { value: false, .. }) => has_false = true,
                    Pattern::Ctor(pattern) => {
                        return Err(ProofError::CaseMismatch {
                            expected: "true or false".to_owned(),
                            actual: pattern.name.base_name().to_owned(),
                            span: case.span.to_miette(),
                        });
                    }
                }
            }
            if !has_true {
                return Err(ProofError::Type(elaborator::TypeError::PatternNonExhaustive {
                    missing: "true".to_owned(),
                    span: switch.span.to_miette(),
                }));
            }
            if !has_false {
                return Err(ProofError::Type(elaborator::TypeError::PatternNonExhaustive {
                    missing: "false".to_owned(),
                    span: switch.span.to_miette(),
                }));
            }
            for case in &switch.cases {
                let Pattern::Bool(pattern) = &case.pattern else { unreachable!() };
                let equation = mk_equal(
                    case.span,
                    (*subject).clone(),
                    Exp::BoolLit(BoolLit { span: case.span, value: pattern.value }),
                );
                let body_env = bind_switch_assumption(case, &equation, env, ctx)?;
                let new_goal = rewrite(
                    &formula.reduce(env, ctx),
                    &equation.reduce(env, ctx),
                    ctx,
                )?;
                check_proof_of(&case.body, &new_goal.reduce(env, ctx), &body_env, ctx)?;
            }
            Ok(())
        }
        _ => {
            let (union, _) = elaborator::typechecker::scrutinee_union(&subject_typ, env)?;
            if union.ctors.len() != switch.cases.len() {
                return Err(ProofError::WrongCaseCount {
                    expected: union.ctors.len(),
                    actual: switch.cases.len(),
                    span: switch.span.to_miette(),
                });
            }
            for (ctor, case) in union.ctors.iter().zip(switch.cases.iter()) {
                let mut cases_present = HashSet::default();
                let (_, body_env, bound) = elaborator::typechecker::check_pattern(
                    &case.pattern,
                    &subject_typ,
                    env,
                    &mut cases_present,
                )?;
                let Pattern::Ctor(pattern) = &case.pattern else {
                    return Err(ProofError::CaseMismatch {
                        expected: ctor.name.base_name().to_owned(),
                        actual: case.pattern.print_to_string(None),
                        span: case.span.to_miette(),
                    });
                };
                if pattern.name.base_name() != ctor.name.base_name() {
                    return Err(ProofError::CaseMismatch {
                        expected: ctor.name.base_name().to_owned(),
                        actual: pattern.name.base_name().to_owned(),
                        span: case.span.to_miette(),
                    });
                }
                let k = bound.len();
                let ctor_term = if pattern.params.is_empty() {
                    Exp::Global(ctor_ref(&pattern.name))
                } else {
                    Call::mk(
                        Exp::Global(ctor_ref(&pattern.name)),
                        pattern
                            .params
                            .iter()
                            .enumerate()
                            .map(|(position, param)| Variable::mk(k - 1 - position, &param.id))
                            .collect(),
                    )
                };
                let ctor_term = check_term(&ctor_term, &subject_typ, &body_env, ctx, None)?;
                let lifted_subject = shift_and_clone(&*subject, (k as isize, 0));
                let equation = mk_equal(case.span, lifted_subject, (*ctor_term).clone());
                let case_env = bind_switch_assumption(case, &equation, &body_env, ctx)?;

                let lifted_goal = shift_and_clone(formula, (k as isize, 0));
                let new_goal = match subject.unmarked() {
                    Exp::Variable(var) => {
                        replace_var(&lifted_goal, Idx(var.idx.0 + k), &ctor_term).0
                    }
                    _ => Box::new(lifted_goal),
                };
                check_proof_of(&case.body, &new_goal.reduce(&case_env, ctx), &case_env, ctx)?;
            }
            Ok(())
        }
    }
}

/// Bind the (at most one) labelled assumption of a switch case: it must
/// state the equation between the subject and the case's pattern.
fn bind_switch_assumption(
    case: &ast::SwitchProofCase,
    equation: &Exp,
    env: &Env,
    ctx: &mut Ctx,
) -> ProofResult<Env> {
    match case.assumptions.len() {
        0 => Ok(env.clone()),
        1 => {
            let (label, annotated) = &case.assumptions[0];
            if let Some(annotated) = annotated {
                let annotated = check_formula(annotated, env, ctx)?;
                if *annotated != *equation {
                    return Err(ProofError::WrongAssumption {
                        expected: equation.print_to_string(None),
                        actual: annotated.print_to_string(None),
                        span: case.span.to_miette(),
                    });
                }
            }
            Ok(env.declare_local_proof_var(case.span, label.clone(), Box::new(equation.clone())))
        }
        _ => Err(ProofError::TooManyAssumptions { span: case.span.to_miette() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nat_ty() -> Exp {
        TypApp::mk("Nat", vec![])
    }

    fn nat_env() -> Env {
        let nat = Union {
            span: None,
            name: IdBind::from_string("Nat"),
            type_params: vec![],
            ctors: vec![
                Ctor { span: None, name: IdBind::from_string("zero"), params: vec![] },
                Ctor { span: None, name: IdBind::from_string("suc"), params: vec![nat_ty()] },
            ],
        };
        Env::empty()
            .define_type(None, IdBind::from_string("Nat"), nat)
            .declare_term_var(None, IdBind::from_string("zero"), Box::new(nat_ty()))
            .declare_term_var(
                None,
                IdBind::from_string("suc"),
                Box::new(FunType::mk(vec![nat_ty()], nat_ty())),
            )
    }

    fn nat(n: usize) -> Exp {
        let mut result = Global::mk("zero");
        for _ in 0..n {
            result = Call::mk(Global::mk("suc"), vec![result]);
        }
        result
    }

    #[test]
    fn identity_theorem_accepts() {
        // theorem id: all x:Nat. x = x  proof  arbitrary x:Nat; reflexive
        let mut ctx = Ctx::new();
        let env = nat_env();
        let goal = All::mk("x", nat_ty(), mk_equal(None, Variable::mk(0, "x"), Variable::mk(0, "x")));
        let goal = check_formula(&goal, &env, &mut ctx).unwrap();
        let proof = Proof::AllIntro(AllIntro {
            span: None,
            var: VarBind::from_string("x"),
            var_type: Box::new(nat_ty()),
            body: Box::new(Proof::Reflexive(Reflexive { span: None })),
        });
        check_proof_of(&proof, &goal, &env, &mut ctx).unwrap();
    }

    #[test]
    fn reflexive_rejects_distinct_sides() {
        let mut ctx = Ctx::new();
        let env = nat_env();
        let goal = mk_equal(None, nat(1), nat(2));
        let proof = Proof::Reflexive(Reflexive { span: None });
        let err = check_proof_of(&proof, &goal, &env, &mut ctx).unwrap_err();
        assert!(matches!(err, ProofError::ReflexiveMismatch { .. }));
        assert!(!err.is_incomplete());
    }

    #[test]
    fn hole_reports_incomplete_with_advice() {
        let mut ctx = Ctx::new();
        let env = nat_env();
        let goal = All::mk("x", nat_ty(), mk_equal(None, Variable::mk(0, "x"), Variable::mk(0, "x")));
        let goal = check_formula(&goal, &env, &mut ctx).unwrap();
        let proof = Proof::Hole(PHole { span: None });
        let err = check_proof_of(&proof, &goal, &env, &mut ctx).unwrap_err();
        assert!(err.is_incomplete());
        let message = err.to_string();
        assert!(message.contains("arbitrary x:Nat"), "missing arbitrary advice: {message}");
        assert!(message.contains("induction Nat"), "missing induction advice: {message}");
        assert!(message.contains("case suc(n1)"), "missing case skeleton: {message}");
        assert!(message.contains("IH1"), "missing IH label: {message}");
    }

    #[test]
    fn apply_with_quantified_implication() {
        // Given H: all n:Nat. n = n ⇒ suc(n) = suc(n), applying H to a
        // proof of 3 = 3 synthesizes suc(3) = suc(3).
        let mut ctx = Ctx::new();
        let hypothesis = All::mk(
            "n",
            nat_ty(),
            IfThen::mk(
                mk_equal(None, Variable::mk(0, "n"), Variable::mk(0, "n")),
                mk_equal(
                    None,
                    Call::mk(Global::mk("suc"), vec![Variable::mk(0, "n")]),
                    Call::mk(Global::mk("suc"), vec![Variable::mk(0, "n")]),
                ),
            ),
        );
        let env = nat_env().declare_local_proof_var(
            None,
            IdBind::from_string("H"),
            Box::new(hypothesis),
        );
        let argument = Proof::Conclude(Conclude {
            span: None,
            claim: Box::new(mk_equal(None, nat(3), nat(3))),
            because: Box::new(Proof::Reflexive(Reflexive { span: None })),
        });
        let apply = Proof::ModusPonens(ModusPonens {
            span: None,
            implication: Box::new(Proof::hyp(0, "H")),
            arg: Box::new(argument),
        });
        let result = check_proof(&apply, &env, &mut ctx).unwrap();
        let expected = mk_equal(
            None,
            Call::mk(Global::mk("suc"), vec![nat(3)]),
            Call::mk(Global::mk("suc"), vec![nat(3)]),
        );
        assert_eq!(remove_marks(&result), remove_marks(&expected));
    }

    #[test]
    fn assume_discharges_implication() {
        let mut ctx = Ctx::new();
        let env = nat_env();
        let premise = mk_equal(None, nat(0), nat(0));
        let goal = IfThen::mk(premise.clone(), premise.clone());
        let goal = check_formula(&goal, &env, &mut ctx).unwrap();
        let proof = Proof::ImpIntro(ImpIntro {
            span: None,
            label: VarBind::from_string("H"),
            premise: None,
            body: Box::new(Proof::hyp(0, "H")),
        });
        check_proof_of(&proof, &goal, &env, &mut ctx).unwrap();
    }
    #[test]
    fn choose_proves_existential() {
        // some n:Nat. n = suc(zero)  by  choose suc(zero)
        let mut ctx = Ctx::new();
        let env = nat_env();
        let goal = Exp::Exists(Exists {
            span: None,
            vars: vec![TypedParam::mk("n", nat_ty())],
            body: Box::new(mk_equal(None, Variable::mk(0, "n"), nat(1))),
        });
        let goal = check_formula(&goal, &env, &mut ctx).unwrap();
        let proof = Proof::SomeIntro(SomeIntro {
            span: None,
            witnesses: vec![nat(1)],
            body: Box::new(Proof::Reflexive(Reflexive { span: None })),
        });
        check_proof_of(&proof, &goal, &env, &mut ctx).unwrap();
    }

    #[test]
    fn cases_splits_a_disjunction() {
        let mut ctx = Ctx::new();
        let p = mk_equal(None, nat(0), nat(0));
        let env = nat_env().declare_local_proof_var(
            None,
            IdBind::from_string("H"),
            Box::new(Or::mk(vec![p.clone(), p.clone()])),
        );
        let goal = check_formula(&p, &env, &mut ctx).unwrap();
        let case = |label: &str| ProofCase {
            span: None,
            label: VarBind::from_string(label),
            formula: None,
            body: Proof::hyp(0, label),
        };
        let proof = Proof::Cases(Cases {
            span: None,
            subject: Box::new(Proof::hyp(0, "H")),
            cases: vec![case("A"), case("B")],
        });
        check_proof_of(&proof, &goal, &env, &mut ctx).unwrap();
    }
}
