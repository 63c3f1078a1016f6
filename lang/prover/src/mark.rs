//! Utilities for the `Mark` focus annotation. A formula may carry at most
//! one mark; rewriting and definition application confine their effect to
//! the marked subterm.

use ast::*;

pub fn count_marks(exp: &Exp) -> usize {
    // A plain recursive walk; marks cannot occur in patterns or idents.
    fn go(exp: &Exp, count: &mut usize) {
        match exp {
            Exp::Mark(mark) => {
                *count += 1;
                go(&mark.subject, count);
            }
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
            | Exp::OverloadType(_) => {}
            Exp::Lambda(e) => go(&e.body, count),
            Exp::Generic(e) => go(&e.body, count),
            Exp::Call(e) => {
                go(&e.rator, count);
                e.args.iter().for_each(|arg| go(arg, count));
            }
            Exp::TermInst(e) => go(&e.subject, count),
            Exp::Conditional(e) => {
                go(&e.cond, count);
                go(&e.then_branch, count);
                go(&e.else_branch, count);
            }
            Exp::LocalLet(e) => {
                go(&e.bound, count);
                go(&e.body, count);
            }
            Exp::Match(e) => {
                go(&e.on_exp, count);
                e.cases.iter().for_each(|case| go(&case.body, count));
            }
            Exp::MakeArray(e) => go(&e.list, count),
            Exp::ArrayGet(e) => {
                go(&e.array, count);
                go(&e.index, count);
            }
            Exp::And(e) => e.args.iter().for_each(|arg| go(arg, count)),
            Exp::Or(e) => e.args.iter().for_each(|arg| go(arg, count)),
            Exp::IfThen(e) => {
                go(&e.premise, count);
                go(&e.conclusion, count);
            }
            Exp::All(e) => go(&e.body, count),
            Exp::Exists(e) => go(&e.body, count),
        }
    }
    let mut count = 0;
    go(exp, &mut count);
    count
}

/// The subject of the (unique) mark in the formula, if any.
pub fn find_mark(exp: &Exp) -> Option<Box<Exp>> {
    match exp {
        Exp::Mark(mark) => Some(mark.subject.clone()),
        Exp::Lambda(e) => find_mark(&e.body),
        Exp::Generic(e) => find_mark(&e.body),
        Exp::Call(e) => {
            find_mark(&e.rator).or_else(|| e.args.iter().find_map(find_mark))
        }
        Exp::TermInst(e) => find_mark(&e.subject),
        Exp::Conditional(e) => find_mark(&e.cond)
            .or_else(|| find_mark(&e.then_branch))
            .or_else(|| find_mark(&e.else_branch)),
        Exp::LocalLet(e) => find_mark(&e.bound).or_else(|| find_mark(&e.body)),
        Exp::Match(e) => {
            find_mark(&e.on_exp).or_else(|| e.cases.iter().find_map(|case| find_mark(&case.body)))
        }
        Exp::MakeArray(e) => find_mark(&e.list),
        Exp::ArrayGet(e) => find_mark(&e.array).or_else(|| find_mark(&e.index)),
        Exp::And(e) => e.args.iter().find_map(find_mark),
        Exp::Or(e) => e.args.iter().find_map(find_mark),
        Exp::IfThen(e) => find_mark(&e.premise).or_else(|| find_mark(&e.conclusion)),
        Exp::All(e) => find_mark(&e.body),
        Exp::Exists(e) => find_mark(&e.body),
        _ => None,
    }
}

/// Replace the subject of the (unique) mark, keeping the mark in place.
pub fn replace_mark(exp: &Exp, new_subject: &Exp) -> Box<Exp> {
    fn go(exp: &Exp, new_subject: &Exp, replaced: &mut bool) -> Exp {
        if *replaced {
            return exp.clone();
        }
        match exp {
            Exp::Mark(mark) => {
                *replaced = true;
                Exp::Mark(Mark { span: mark.span, subject: Box::new(new_subject.clone()) })
            }
            Exp::Lambda(e) => Exp::Lambda(Lambda {
                body: Box::new(go(&e.body, new_subject, replaced)),
                ..e.clone()
            }),
            Exp::Generic(e) => Exp::Generic(Generic {
                body: Box::new(go(&e.body, new_subject, replaced)),
                ..e.clone()
            }),
            Exp::Call(e) => Exp::Call(Call {
                span: e.span,
                rator: Box::new(go(&e.rator, new_subject, replaced)),
                args: e.args.iter().map(|arg| go(arg, new_subject, replaced)).collect(),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::TermInst(e) => Exp::TermInst(TermInst {
                subject: Box::new(go(&e.subject, new_subject, replaced)),
                ..e.clone()
            }),
            Exp::Conditional(e) => Exp::Conditional(Conditional {
                span: e.span,
                cond: Box::new(go(&e.cond, new_subject, replaced)),
                then_branch: Box::new(go(&e.then_branch, new_subject, replaced)),
                else_branch: Box::new(go(&e.else_branch, new_subject, replaced)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::LocalLet(e) => Exp::LocalLet(LocalLet {
                span: e.span,
                name: e.name.clone(),
                bound: Box::new(go(&e.bound, new_subject, replaced)),
                body: Box::new(go(&e.body, new_subject, replaced)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::Match(e) => Exp::Match(Match {
                span: e.span,
                on_exp: Box::new(go(&e.on_exp, new_subject, replaced)),
                cases: e
                    .cases
                    .iter()
                    .map(|case| Case {
                        span: case.span,
                        pattern: case.pattern.clone(),
                        body: Box::new(go(&case.body, new_subject, replaced)),
                    })
                    .collect(),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::MakeArray(e) => Exp::MakeArray(MakeArray {
                span: e.span,
                list: Box::new(go(&e.list, new_subject, replaced)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::ArrayGet(e) => Exp::ArrayGet(ArrayGet {
                span: e.span,
                array: Box::new(go(&e.array, new_subject, replaced)),
                index: Box::new(go(&e.index, new_subject, replaced)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::And(e) => Exp::And(And {
                span: e.span,
                args: e.args.iter().map(|arg| go(arg, new_subject, replaced)).collect(),
            }),
            Exp::Or(e) => Exp::Or(Or {
                span: e.span,
                args: e.args.iter().map(|arg| go(arg, new_subject, replaced)).collect(),
            }),
            Exp::IfThen(e) => Exp::IfThen(IfThen {
                span: e.span,
                premise: Box::new(go(&e.premise, new_subject, replaced)),
                conclusion: Box::new(go(&e.conclusion, new_subject, replaced)),
            }),
            Exp::All(e) => Exp::All(All {
                span: e.span,
                var: e.var.clone(),
                var_type: e.var_type.clone(),
                body: Box::new(go(&e.body, new_subject, replaced)),
            }),
            Exp::Exists(e) => Exp::Exists(Exists {
                span: e.span,
                vars: e.vars.clone(),
                body: Box::new(go(&e.body, new_subject, replaced)),
            }),
            other => other.clone(),
        }
    }
    let mut replaced = false;
    Box::new(go(exp, new_subject, &mut replaced))
}

/// Remove every mark from the formula.
pub fn remove_marks(exp: &Exp) -> Box<Exp> {
    fn go(exp: &Exp) -> Exp {
        match exp {
            Exp::Mark(mark) => go(&mark.subject),
            Exp::Lambda(e) => {
                Exp::Lambda(Lambda { body: Box::new(go(&e.body)), ..e.clone() })
            }
            Exp::Generic(e) => {
                Exp::Generic(Generic { body: Box::new(go(&e.body)), ..e.clone() })
            }
            Exp::Call(e) => Exp::Call(Call {
                span: e.span,
                rator: Box::new(go(&e.rator)),
                args: e.args.iter().map(go).collect(),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::TermInst(e) => {
                Exp::TermInst(TermInst { subject: Box::new(go(&e.subject)), ..e.clone() })
            }
            Exp::Conditional(e) => Exp::Conditional(Conditional {
                span: e.span,
                cond: Box::new(go(&e.cond)),
                then_branch: Box::new(go(&e.then_branch)),
                else_branch: Box::new(go(&e.else_branch)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::LocalLet(e) => Exp::LocalLet(LocalLet {
                span: e.span,
                name: e.name.clone(),
                bound: Box::new(go(&e.bound)),
                body: Box::new(go(&e.body)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::Match(e) => Exp::Match(Match {
                span: e.span,
                on_exp: Box::new(go(&e.on_exp)),
                cases: e
                    .cases
                    .iter()
                    .map(|case| Case {
                        span: case.span,
                        pattern: case.pattern.clone(),
                        body: Box::new(go(&case.body)),
                    })
                    .collect(),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::MakeArray(e) => {
                Exp::MakeArray(MakeArray { list: Box::new(go(&e.list)), ..e.clone() })
            }
            Exp::ArrayGet(e) => Exp::ArrayGet(ArrayGet {
                span: e.span,
                array: Box::new(go(&e.array)),
                index: Box::new(go(&e.index)),
                inferred_type: e.inferred_type.clone(),
            }),
            Exp::And(e) => {
                Exp::And(And { span: e.span, args: e.args.iter().map(go).collect() })
            }
            Exp::Or(e) => Exp::Or(Or { span: e.span, args: e.args.iter().map(go).collect() }),
            Exp::IfThen(e) => Exp::IfThen(IfThen {
                span: e.span,
                premise: Box::new(go(&e.premise)),
                conclusion: Box::new(go(&e.conclusion)),
            }),
            Exp::All(e) => Exp::All(All {
                span: e.span,
                var: e.var.clone(),
                var_type: e.var_type.clone(),
                body: Box::new(go(&e.body)),
            }),
            Exp::Exists(e) => Exp::Exists(Exists {
                span: e.span,
                vars: e.vars.clone(),
                body: Box::new(go(&e.body)),
            }),
            other => other.clone(),
        }
    }
    Box::new(go(exp))
}
