use crate::exp::*;

/// De Bruijn shifting
///
/// Term and type variables are represented with De Bruijn indices, counted
/// in two independent spaces. Whenever a term is moved into a scope with
/// more (or fewer) binders, the indices of its free variables have to be
/// adjusted. `shift_in_range` adjusts every free variable whose index lies
/// at or above the cutoff by the amounts in `by`; the first component of
/// `by` applies to term variables, the second to type variables.
///
/// In order to implement `shift_in_range` correctly you have to bump the
/// corresponding component of the cutoff whenever you go recursively under
/// a binder.
pub trait Shift: Sized {
    /// Shift all free variables in `self` by `by = (terms, types)`.
    fn shift(&mut self, by: (isize, isize)) {
        self.shift_in_range(ShiftCutoff::default(), by)
    }

    /// Shift the free variables in `self` whose index is at or above the
    /// cutoff for their flavor.
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize));
}

/// The cutoff below which variables are bound (and therefore not shifted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftCutoff {
    pub terms: usize,
    pub types: usize,
}

impl ShiftCutoff {
    pub fn bind_terms(self, n: usize) -> ShiftCutoff {
        ShiftCutoff { terms: self.terms + n, types: self.types }
    }

    pub fn bind_types(self, n: usize) -> ShiftCutoff {
        ShiftCutoff { terms: self.terms, types: self.types + n }
    }
}

pub fn shift_and_clone<T: Shift + Clone>(arg: &T, by: (isize, isize)) -> T {
    let mut cloned = arg.clone();
    cloned.shift(by);
    cloned
}

impl Shift for () {
    fn shift_in_range(&mut self, _cutoff: ShiftCutoff, _by: (isize, isize)) {}
}

impl<T: Shift> Shift for Box<T> {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        (**self).shift_in_range(cutoff, by)
    }
}

impl<T: Shift> Shift for Option<T> {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        if let Some(inner) = self.as_mut() {
            inner.shift_in_range(cutoff, by)
        }
    }
}

impl<T: Shift> Shift for Vec<T> {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        self.iter_mut().for_each(|x| x.shift_in_range(cutoff, by))
    }
}

impl Shift for Exp {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        match self {
            Exp::Variable(e) => {
                if e.idx.0 >= cutoff.terms {
                    e.idx.0 = (e.idx.0 as isize + by.0) as usize;
                }
                e.inferred_type = None;
            }
            Exp::TypeVariable(e) => {
                if e.idx.0 >= cutoff.types {
                    e.idx.0 = (e.idx.0 as isize + by.1) as usize;
                }
            }
            Exp::Global(e) => {
                e.inferred_type = None;
            }
            Exp::IntLit(_) | Exp::BoolLit(_) => {}
            Exp::Lambda(e) => {
                e.params.shift_in_range(cutoff, by);
                e.body.shift_in_range(cutoff.bind_terms(e.params.len()), by);
                e.inferred_type = None;
            }
            Exp::Generic(e) => {
                e.body.shift_in_range(cutoff.bind_types(e.params.len()), by);
                e.inferred_type = None;
            }
            Exp::Call(e) => {
                e.rator.shift_in_range(cutoff, by);
                e.args.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::TermInst(e) => {
                e.subject.shift_in_range(cutoff, by);
                e.type_args.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::Conditional(e) => {
                e.cond.shift_in_range(cutoff, by);
                e.then_branch.shift_in_range(cutoff, by);
                e.else_branch.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::LocalLet(e) => {
                e.bound.shift_in_range(cutoff, by);
                e.body.shift_in_range(cutoff.bind_terms(1), by);
                e.inferred_type = None;
            }
            Exp::Match(e) => {
                e.on_exp.shift_in_range(cutoff, by);
                e.cases.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::MakeArray(e) => {
                e.list.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::ArrayGet(e) => {
                e.array.shift_in_range(cutoff, by);
                e.index.shift_in_range(cutoff, by);
                e.inferred_type = None;
            }
            Exp::Hole(_) | Exp::Omitted(_) => {}
            Exp::Mark(e) => e.subject.shift_in_range(cutoff, by),
            Exp::RecFun(e) => {
                let cutoff = cutoff.bind_types(e.type_params.len());
                e.param_types.shift_in_range(cutoff, by);
                e.ret_type.shift_in_range(cutoff, by);
                e.cases.shift_in_range(cutoff, by);
            }
            Exp::IntType(_) | Exp::BoolType(_) | Exp::TypeType(_) => {}
            Exp::FunType(e) => {
                let cutoff = cutoff.bind_types(e.type_params.len());
                e.param_types.shift_in_range(cutoff, by);
                e.ret_type.shift_in_range(cutoff, by);
            }
            Exp::TypApp(e) => e.args.shift_in_range(cutoff, by),
            Exp::UnknownInst(_) => {}
            Exp::ArrayType(e) => e.elem.shift_in_range(cutoff, by),
            Exp::OverloadType(e) => {
                for overload in &mut e.overloads {
                    overload.typ.shift_in_range(cutoff, by);
                }
            }
            Exp::And(e) => e.args.shift_in_range(cutoff, by),
            Exp::Or(e) => e.args.shift_in_range(cutoff, by),
            Exp::IfThen(e) => {
                e.premise.shift_in_range(cutoff, by);
                e.conclusion.shift_in_range(cutoff, by);
            }
            Exp::All(e) => {
                e.var_type.shift_in_range(cutoff, by);
                let inner = if e.binds_type() {
                    cutoff.bind_types(1)
                } else {
                    cutoff.bind_terms(1)
                };
                e.body.shift_in_range(inner, by);
            }
            Exp::Exists(e) => {
                for var in &mut e.vars {
                    var.typ.shift_in_range(cutoff, by);
                }
                e.body.shift_in_range(cutoff.bind_terms(e.vars.len()), by);
            }
        }
    }
}

impl Shift for Param {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        self.typ.shift_in_range(cutoff, by);
    }
}

impl Shift for Case {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        self.body.shift_in_range(cutoff.bind_terms(self.pattern.arity()), by);
    }
}

impl Shift for FunCase {
    fn shift_in_range(&mut self, cutoff: ShiftCutoff, by: (isize, isize)) {
        let bound = self.pattern.arity() + self.params.len();
        self.body.shift_in_range(cutoff.bind_terms(bound), by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_term_var() {
        let mut exp = Variable::mk(0, "x");
        exp.shift((1, 0));
        assert_eq!(exp, Variable::mk(1, "x"));
    }

    #[test]
    fn shift_type_var() {
        let mut exp = TypeVariable::mk(0, "T");
        exp.shift((0, 2));
        assert_eq!(exp, TypeVariable::mk(2, "T"));
    }

    #[test]
    fn shift_below_cutoff() {
        let mut exp = Variable::mk(0, "x");
        exp.shift_in_range(ShiftCutoff::default().bind_terms(1), (1, 0));
        assert_eq!(exp, Variable::mk(0, "x"));
    }

    #[test]
    fn shift_under_binder() {
        // all x:Nat. x = y   with y free at index 0 outside the binder
        let body = mk_equal(None, Variable::mk(0, "x"), Variable::mk(1, "y"));
        let mut frm = All::mk("x", TypApp::mk("Nat", vec![]), body);
        frm.shift((1, 0));
        let expected = All::mk(
            "x",
            TypApp::mk("Nat", vec![]),
            mk_equal(None, Variable::mk(0, "x"), Variable::mk(2, "y")),
        );
        assert_eq!(frm, expected);
    }

    #[test]
    fn shift_round_trip() {
        // Shifting up and back down is the identity on terms whose free
        // indices lie in the shifted range.
        let original = Call::mk(
            Global::mk("f"),
            vec![Variable::mk(3, "a"), All::mk("x", IntType::mk(), Variable::mk(0, "x"))],
        );
        let mut exp = original.clone();
        exp.shift((5, 2));
        exp.shift((-5, -2));
        assert_eq!(exp, original);
    }

    #[test]
    fn shift_type_flavor_independent() {
        // Term shifts leave type variables alone and vice versa.
        let original = Call::mk(Global::mk("f"), vec![Variable::mk(1, "x"), TypeVariable::mk(1, "T")]);
        let mut exp = original.clone();
        exp.shift((4, 0));
        let Exp::Call(Call { args, .. }) = &exp else { unreachable!() };
        assert_eq!(args[0], Variable::mk(5, "x"));
        assert_eq!(args[1], TypeVariable::mk(1, "T"));
    }
}
