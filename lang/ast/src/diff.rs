use crate::exp::*;

/// Compute the smallest disagreeing pair of subterms of two expressions.
/// Returns `None` when the expressions are equal. Diagnostics report both
/// the isolated pair and the whole terms, so the user sees exactly where
/// two large formulas part ways.
pub fn isolate_difference(lhs: &Exp, rhs: &Exp) -> Option<(Exp, Exp)> {
    if lhs == rhs {
        return None;
    }
    match (lhs, rhs) {
        (Exp::Lambda(l1), Exp::Lambda(l2)) if l1.params.len() == l2.params.len() => {
            isolate_difference(&l1.body, &l2.body)
        }
        (Exp::Call(c1), Exp::Call(c2)) => {
            if c1.rator == c2.rator {
                isolate_difference_list(&c1.args, &c2.args)
            } else {
                isolate_difference(&c1.rator, &c2.rator)
            }
        }
        (Exp::Match(m1), Exp::Match(m2)) => {
            if m1.on_exp == m2.on_exp {
                let cases = m1.cases.iter().zip(m2.cases.iter());
                for (case1, case2) in cases {
                    if case1.pattern != case2.pattern {
                        continue;
                    }
                    if let Some(diff) = isolate_difference(&case1.body, &case2.body) {
                        return Some(diff);
                    }
                }
                Some((lhs.clone(), rhs.clone()))
            } else {
                isolate_difference(&m1.on_exp, &m2.on_exp)
            }
        }
        (Exp::And(a1), Exp::And(a2)) => isolate_difference_list(&a1.args, &a2.args),
        (Exp::TermInst(t1), Exp::TermInst(t2)) if t1.type_args == t2.type_args => {
            isolate_difference(&t1.subject, &t2.subject)
        }
        _ => Some((lhs.clone(), rhs.clone())),
    }
}

fn isolate_difference_list(list1: &[Exp], list2: &[Exp]) -> Option<(Exp, Exp)> {
    for (e1, e2) in list1.iter().zip(list2.iter()) {
        if let Some(diff) = isolate_difference(e1, e2) {
            return Some(diff);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_disagreeing_argument() {
        let lhs = Call::mk(Global::mk("suc"), vec![Variable::mk(0, "n")]);
        let rhs = Call::mk(Global::mk("suc"), vec![Variable::mk(1, "m")]);
        let (small_lhs, small_rhs) = isolate_difference(&lhs, &rhs).unwrap();
        assert_eq!(small_lhs, Variable::mk(0, "n"));
        assert_eq!(small_rhs, Variable::mk(1, "m"));
    }

    #[test]
    fn equal_terms_have_no_difference() {
        let exp = Call::mk(Global::mk("f"), vec![IntLit::mk(1)]);
        assert!(isolate_difference(&exp, &exp.clone()).is_none());
    }
}
