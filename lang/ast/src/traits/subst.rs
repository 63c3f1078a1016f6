use std::cell::Cell;
use std::rc::Rc;

use crate::HashMap;
use crate::exp::*;
use crate::ident::Idx;
use crate::traits::shift::*;

/// Trait for entities which can be used as a substitution.
///
/// A substitution is queried with the variable occurrence it may replace and
/// answers `None` to leave the occurrence untouched. The `bind` method is
/// invoked whenever the traversal goes under binders, so a substitution
/// knows how many term and type binders separate it from its point of
/// introduction and can shift its payloads accordingly.
pub trait Substitution: Clone {
    fn get_term(&self, var: &Variable) -> Option<Box<Exp>> {
        let _ = var;
        None
    }

    fn get_type(&self, var: &TypeVariable) -> Option<Box<Exp>> {
        let _ = var;
        None
    }

    fn get_global(&self, var: &Global) -> Option<Box<Exp>> {
        let _ = var;
        None
    }

    fn bind(&mut self, terms: usize, types: usize);
}

/// A trait for all entities to which a substitution can be applied.
pub trait Substitutable: Sized {
    fn subst<S: Substitution>(&self, by: &S) -> Self;
}

impl<T: Substitutable> Substitutable for Box<T> {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        Box::new((**self).subst(by))
    }
}

impl<T: Substitutable> Substitutable for Option<T> {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        self.as_ref().map(|inner| inner.subst(by))
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        self.iter().map(|inner| inner.subst(by)).collect()
    }
}

fn under<S: Substitution>(by: &S, terms: usize, types: usize) -> S {
    let mut inner = by.clone();
    inner.bind(terms, types);
    inner
}

impl Substitutable for Exp {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        match self {
            Exp::Variable(e) => match by.get_term(e) {
                Some(exp) => *exp,
                None => Exp::Variable(e.clone()),
            },
            Exp::TypeVariable(e) => match by.get_type(e) {
                Some(exp) => *exp,
                None => Exp::TypeVariable(e.clone()),
            },
            Exp::Global(e) => match by.get_global(e) {
                Some(exp) => *exp,
                None => Exp::Global(e.clone()),
            },
            Exp::IntLit(_) | Exp::BoolLit(_) => self.clone(),
            Exp::Lambda(e) => Exp::Lambda(Lambda {
                span: e.span,
                params: e.params.subst(by),
                body: e.body.subst(&under(by, e.params.len(), 0)),
                inferred_type: None,
            }),
            Exp::Generic(e) => Exp::Generic(Generic {
                span: e.span,
                params: e.params.clone(),
                body: e.body.subst(&under(by, 0, e.params.len())),
                inferred_type: None,
            }),
            Exp::Call(e) => Exp::Call(Call {
                span: e.span,
                rator: e.rator.subst(by),
                args: e.args.subst(by),
                inferred_type: None,
            }),
            Exp::TermInst(e) => Exp::TermInst(TermInst {
                span: e.span,
                subject: e.subject.subst(by),
                type_args: e.type_args.subst(by),
                inferred: e.inferred,
                inferred_type: None,
            }),
            Exp::Conditional(e) => Exp::Conditional(Conditional {
                span: e.span,
                cond: e.cond.subst(by),
                then_branch: e.then_branch.subst(by),
                else_branch: e.else_branch.subst(by),
                inferred_type: None,
            }),
            Exp::LocalLet(e) => Exp::LocalLet(LocalLet {
                span: e.span,
                name: e.name.clone(),
                bound: e.bound.subst(by),
                body: e.body.subst(&under(by, 1, 0)),
                inferred_type: None,
            }),
            Exp::Match(e) => Exp::Match(Match {
                span: e.span,
                on_exp: e.on_exp.subst(by),
                cases: e.cases.subst(by),
                inferred_type: None,
            }),
            Exp::MakeArray(e) => Exp::MakeArray(MakeArray {
                span: e.span,
                list: e.list.subst(by),
                inferred_type: None,
            }),
            Exp::ArrayGet(e) => Exp::ArrayGet(ArrayGet {
                span: e.span,
                array: e.array.subst(by),
                index: e.index.subst(by),
                inferred_type: None,
            }),
            Exp::Hole(_) | Exp::Omitted(_) => self.clone(),
            Exp::Mark(e) => Exp::Mark(Mark { span: e.span, subject: e.subject.subst(by) }),
            Exp::RecFun(e) => {
                let inner = under(by, 0, e.type_params.len());
                Exp::RecFun(RecFun {
                    span: e.span,
                    name: e.name.clone(),
                    type_params: e.type_params.clone(),
                    param_types: e.param_types.subst(&inner),
                    ret_type: e.ret_type.subst(&inner),
                    cases: e.cases.subst(&inner),
                })
            }
            Exp::IntType(_) | Exp::BoolType(_) | Exp::TypeType(_) => self.clone(),
            Exp::FunType(e) => {
                let inner = under(by, 0, e.type_params.len());
                Exp::FunType(FunType {
                    span: e.span,
                    type_params: e.type_params.clone(),
                    param_types: e.param_types.subst(&inner),
                    ret_type: e.ret_type.subst(&inner),
                })
            }
            Exp::TypApp(e) => Exp::TypApp(TypApp {
                span: e.span,
                name: e.name.clone(),
                args: e.args.subst(by),
            }),
            Exp::UnknownInst(_) => self.clone(),
            Exp::ArrayType(e) => {
                Exp::ArrayType(ArrayType { span: e.span, elem: e.elem.subst(by) })
            }
            Exp::OverloadType(e) => Exp::OverloadType(OverloadType {
                span: e.span,
                overloads: e
                    .overloads
                    .iter()
                    .map(|o| Overload { name: o.name.clone(), typ: o.typ.subst(by) })
                    .collect(),
            }),
            Exp::And(e) => Exp::And(And { span: e.span, args: e.args.subst(by) }),
            Exp::Or(e) => Exp::Or(Or { span: e.span, args: e.args.subst(by) }),
            Exp::IfThen(e) => Exp::IfThen(IfThen {
                span: e.span,
                premise: e.premise.subst(by),
                conclusion: e.conclusion.subst(by),
            }),
            Exp::All(e) => {
                let inner = if e.binds_type() { under(by, 0, 1) } else { under(by, 1, 0) };
                Exp::All(All {
                    span: e.span,
                    var: e.var.clone(),
                    var_type: e.var_type.subst(by),
                    body: e.body.subst(&inner),
                })
            }
            Exp::Exists(e) => Exp::Exists(Exists {
                span: e.span,
                vars: e
                    .vars
                    .iter()
                    .map(|v| TypedParam { name: v.name.clone(), typ: v.typ.subst(by) })
                    .collect(),
                body: e.body.subst(&under(by, e.vars.len(), 0)),
            }),
        }
    }
}

impl Substitutable for Param {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        Param { name: self.name.clone(), typ: self.typ.subst(by) }
    }
}

impl Substitutable for Case {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        Case {
            span: self.span,
            pattern: self.pattern.clone(),
            body: self.body.subst(&under(by, self.pattern.arity(), 0)),
        }
    }
}

impl Substitutable for FunCase {
    fn subst<S: Substitution>(&self, by: &S) -> Self {
        let bound = self.pattern.arity() + self.params.len();
        FunCase {
            span: self.span,
            pattern: self.pattern.clone(),
            params: self.params.clone(),
            body: self.body.subst(&under(by, bound, 0)),
        }
    }
}

// OpenTerms
//
//

/// Instantiate the `n` innermost term binders with `n` arguments and close
/// the gap: variables bound by the opened binders are replaced, variables
/// pointing past them are renumbered down by `n`.
#[derive(Debug, Clone)]
struct OpenTerms {
    /// Arguments in binding order: the first argument replaces the
    /// outermost of the opened binders.
    args: Vec<Box<Exp>>,
    depth: (usize, usize),
}

impl Substitution for OpenTerms {
    fn get_term(&self, var: &Variable) -> Option<Box<Exp>> {
        let (d_terms, d_types) = self.depth;
        let n = self.args.len();
        let i = var.idx.0;
        if i < d_terms {
            None
        } else if i < d_terms + n {
            // Index 0 is the innermost binder, i.e. the *last* argument.
            let arg = &self.args[n - 1 - (i - d_terms)];
            Some(Box::new(shift_and_clone(&**arg, (d_terms as isize, d_types as isize))))
        } else {
            Some(Box::new(Exp::Variable(Variable {
                span: var.span,
                idx: Idx(i - n),
                name: var.name.clone(),
                inferred_type: None,
            })))
        }
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

/// Replace the `n` innermost term binders of `body` with `args` (given in
/// binding order) and renumber the remaining free variables.
pub fn open_term_binders(body: &Exp, args: &[Exp]) -> Box<Exp> {
    let by = OpenTerms {
        args: args.iter().map(|arg| Box::new(arg.clone())).collect(),
        depth: (0, 0),
    };
    Box::new(body.subst(&by))
}

// OpenTypes
//
//

#[derive(Debug, Clone)]
struct OpenTypes {
    args: Vec<Box<Exp>>,
    depth: (usize, usize),
}

impl Substitution for OpenTypes {
    fn get_type(&self, var: &TypeVariable) -> Option<Box<Exp>> {
        let (d_terms, d_types) = self.depth;
        let n = self.args.len();
        let i = var.idx.0;
        if i < d_types {
            None
        } else if i < d_types + n {
            let arg = &self.args[n - 1 - (i - d_types)];
            Some(Box::new(shift_and_clone(&**arg, (d_terms as isize, d_types as isize))))
        } else {
            Some(Box::new(Exp::TypeVariable(TypeVariable {
                span: var.span,
                idx: Idx(i - n),
                name: var.name.clone(),
            })))
        }
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

/// Replace the `n` innermost type binders of `body` with type arguments
/// (given in binding order) and renumber the remaining free type variables.
pub fn open_type_binders(body: &Exp, args: &[Exp]) -> Box<Exp> {
    let by = OpenTypes {
        args: args.iter().map(|arg| Box::new(arg.clone())).collect(),
        depth: (0, 0),
    };
    Box::new(body.subst(&by))
}

// Keyed substitutions (no renumbering)
//
//

/// Substitute for a subset of the free term variables of an expression,
/// leaving all other variables untouched. Used to apply the assignment
/// computed by `formula_match`, where the expression's free variables stem
/// from stripped `all` binders.
#[derive(Debug, Clone)]
pub struct SubstTermVars {
    pub map: HashMap<usize, Exp>,
    depth: (usize, usize),
}

impl SubstTermVars {
    pub fn from_map(map: HashMap<usize, Exp>) -> Self {
        SubstTermVars { map, depth: (0, 0) }
    }
}

impl Substitution for SubstTermVars {
    fn get_term(&self, var: &Variable) -> Option<Box<Exp>> {
        let (d_terms, d_types) = self.depth;
        if var.idx.0 < d_terms {
            return None;
        }
        self.map.get(&(var.idx.0 - d_terms)).map(|exp| {
            Box::new(shift_and_clone(exp, (d_terms as isize, d_types as isize)))
        })
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

/// The type-variable analogue of [SubstTermVars]; applies the unifier
/// computed during generic-function instantiation.
#[derive(Debug, Clone)]
pub struct SubstTypeVars {
    pub map: HashMap<usize, Exp>,
    depth: (usize, usize),
}

impl SubstTypeVars {
    pub fn from_map(map: HashMap<usize, Exp>) -> Self {
        SubstTypeVars { map, depth: (0, 0) }
    }
}

impl Substitution for SubstTypeVars {
    fn get_type(&self, var: &TypeVariable) -> Option<Box<Exp>> {
        let (d_terms, d_types) = self.depth;
        if var.idx.0 < d_types {
            return None;
        }
        self.map.get(&(var.idx.0 - d_types)).map(|exp| {
            Box::new(shift_and_clone(exp, (d_terms as isize, d_types as isize)))
        })
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

// SubstGlobal
//
//

/// Unfold a module-level definition: replace every reference to the given
/// canonical name with the definition's body. The shared counter records
/// how often the substitution fired, which definition application uses to
/// reject unfoldings that did not apply anywhere.
#[derive(Debug, Clone)]
struct SubstGlobal {
    name: String,
    rhs: Box<Exp>,
    depth: (usize, usize),
    fired: Rc<Cell<usize>>,
}

impl Substitution for SubstGlobal {
    fn get_global(&self, var: &Global) -> Option<Box<Exp>> {
        if var.name.id != self.name {
            return None;
        }
        self.fired.set(self.fired.get() + 1);
        let (d_terms, d_types) = self.depth;
        Some(Box::new(shift_and_clone(&*self.rhs, (d_terms as isize, d_types as isize))))
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

pub fn substitute_global(body: &Exp, name: &str, rhs: &Exp) -> (Box<Exp>, usize) {
    let fired = Rc::new(Cell::new(0));
    let by = SubstGlobal {
        name: name.to_owned(),
        rhs: Box::new(rhs.clone()),
        depth: (0, 0),
        fired: fired.clone(),
    };
    let result = Box::new(body.subst(&by));
    (result, fired.get())
}

// ReplaceVar
//
//

/// Replace occurrences of one specific free term variable with an
/// expression, without renumbering anything. Used to unfold local
/// definitions introduced by a `define` proof step.
#[derive(Debug, Clone)]
struct ReplaceVar {
    idx: usize,
    exp: Box<Exp>,
    depth: (usize, usize),
    fired: Rc<Cell<usize>>,
}

impl Substitution for ReplaceVar {
    fn get_term(&self, var: &Variable) -> Option<Box<Exp>> {
        let (d_terms, d_types) = self.depth;
        if var.idx.0 != self.idx + d_terms {
            return None;
        }
        self.fired.set(self.fired.get() + 1);
        Some(Box::new(shift_and_clone(&*self.exp, (d_terms as isize, d_types as isize))))
    }

    fn bind(&mut self, terms: usize, types: usize) {
        self.depth.0 += terms;
        self.depth.1 += types;
    }
}

pub fn replace_var(body: &Exp, idx: Idx, exp: &Exp) -> (Box<Exp>, usize) {
    let fired = Rc::new(Cell::new(0));
    let by = ReplaceVar {
        idx: idx.0,
        exp: Box::new(exp.clone()),
        depth: (0, 0),
        fired: fired.clone(),
    };
    let result = Box::new(body.subst(&by));
    (result, fired.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_single_term_binder() {
        // (all x. x = y)  instantiated with 3  gives  3 = y  and closes
        // the gap for y.
        let body = mk_equal(None, Variable::mk(0, "x"), Variable::mk(1, "y"));
        let opened = open_term_binders(&body, &[IntLit::mk(3)]);
        assert_eq!(*opened, mk_equal(None, IntLit::mk(3), Variable::mk(0, "y")));
    }

    #[test]
    fn open_two_term_binders_in_binding_order() {
        // body of λ(x, y). f(x, y): x has index 1, y has index 0.
        let body = Call::mk(Global::mk("f"), vec![Variable::mk(1, "x"), Variable::mk(0, "y")]);
        let opened = open_term_binders(&body, &[IntLit::mk(1), IntLit::mk(2)]);
        assert_eq!(*opened, Call::mk(Global::mk("f"), vec![IntLit::mk(1), IntLit::mk(2)]));
    }

    #[test]
    fn open_shifts_argument_under_binder() {
        // Instantiating under a nested binder must shift the payload.
        let body = All::mk(
            "z",
            IntType::mk(),
            mk_equal(None, Variable::mk(1, "x"), Variable::mk(0, "z")),
        );
        let opened = open_term_binders(&body, &[Variable::mk(4, "w")]);
        let expected = All::mk(
            "z",
            IntType::mk(),
            mk_equal(None, Variable::mk(5, "w"), Variable::mk(0, "z")),
        );
        assert_eq!(*opened, expected);
    }

    #[test]
    fn substitute_global_counts() {
        let body = Call::mk(Global::mk("one"), vec![Global::mk("one")]);
        let (result, fired) = substitute_global(&body, "one", &IntLit::mk(1));
        assert_eq!(fired, 2);
        assert_eq!(*result, Call::mk(IntLit::mk(1), vec![IntLit::mk(1)]));
    }

    #[test]
    fn open_type_binders_leaves_terms_alone() {
        let body = Call::mk(
            Global::mk("f"),
            vec![Variable::mk(0, "x"), TypeVariable::mk(0, "T")],
        );
        let opened = open_type_binders(&body, &[IntType::mk()]);
        assert_eq!(
            *opened,
            Call::mk(Global::mk("f"), vec![Variable::mk(0, "x"), IntType::mk()])
        );
    }
}
