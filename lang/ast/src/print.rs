//! Prettyprinting of the AST, used by diagnostics and the advice
//! generator. The printed syntax mirrors the surface language.

use printer::theme::ThemeExt;
use printer::tokens::*;
use printer::util::BracesExt;
use printer::{Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg};

use crate::decls::*;
use crate::exp::*;
use crate::proofs::Proof;

// Precedence levels, loosest to tightest.
const PREC_FORMULA: Precedence = 0;
const PREC_OR: Precedence = 1;
const PREC_AND: Precedence = 2;
const PREC_OP: Precedence = 3;
const PREC_ATOM: Precedence = 4;

fn parens_if<'a>(cond: bool, doc: Builder<'a>) -> Builder<'a> {
    if cond { doc.parens() } else { doc }
}

/// Operator names are printed infix.
fn is_operator(name: &str) -> bool {
    name.chars().next().is_some_and(|c| !c.is_alphanumeric() && c != '_')
}

impl Print for Exp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Exp::Variable(e) => {
                if cfg.de_bruijn {
                    alloc.text(format!("{}{}", e.name, e.idx))
                } else {
                    alloc.text(&e.name.id)
                }
            }
            Exp::TypeVariable(e) => {
                if cfg.de_bruijn {
                    alloc.typ(&format!("{}{}", e.name, e.idx))
                } else {
                    alloc.typ(&e.name.id)
                }
            }
            Exp::Global(e) => alloc.text(e.name.base_name().to_owned()),
            Exp::IntLit(e) => alloc.text(e.value.to_string()),
            Exp::BoolLit(e) => alloc.keyword(if e.value { TRUE } else { FALSE }),
            Exp::Lambda(e) => alloc
                .keyword(FUN)
                .append(e.params.print(cfg, alloc).parens())
                .append(alloc.space())
                .append(
                    alloc
                        .space()
                        .append(e.body.print(cfg, alloc))
                        .append(alloc.space())
                        .braces_anno(),
                ),
            Exp::Generic(e) => alloc
                .keyword(GENERIC)
                .append(alloc.space())
                .append(printer::print_comma_separated(&e.params, cfg, alloc))
                .append(alloc.space())
                .append(alloc.space().append(e.body.print(cfg, alloc)).append(alloc.space()).braces_anno()),
            Exp::Call(e) => print_call(e, cfg, alloc, prec),
            Exp::TermInst(e) => {
                if e.inferred {
                    e.subject.print_prec(cfg, alloc, prec)
                } else {
                    e.subject
                        .print_prec(cfg, alloc, PREC_ATOM)
                        .append(printer::print_comma_separated(&e.type_args, cfg, alloc).angles())
                }
            }
            Exp::Conditional(e) => parens_if(
                prec > PREC_FORMULA,
                alloc
                    .keyword(IF)
                    .append(alloc.space())
                    .append(e.cond.print(cfg, alloc))
                    .append(alloc.space())
                    .append(alloc.keyword(THEN))
                    .append(alloc.space())
                    .append(e.then_branch.print(cfg, alloc))
                    .append(alloc.space())
                    .append(alloc.keyword(ELSE))
                    .append(alloc.space())
                    .append(e.else_branch.print(cfg, alloc)),
            ),
            Exp::LocalLet(e) => parens_if(
                prec > PREC_FORMULA,
                alloc
                    .keyword(DEFINE)
                    .append(alloc.space())
                    .append(alloc.text(&e.name.id))
                    .append(alloc.space())
                    .append(EQ)
                    .append(alloc.space())
                    .append(e.bound.print(cfg, alloc))
                    .append(alloc.text(";"))
                    .append(alloc.space())
                    .append(e.body.print(cfg, alloc)),
            ),
            Exp::Match(e) => alloc
                .keyword(SWITCH)
                .append(alloc.space())
                .append(e.on_exp.print(cfg, alloc))
                .append(alloc.space())
                .append(print_cases(&e.cases, cfg, alloc)),
            Exp::MakeArray(e) => {
                alloc.text("array").append(e.list.print(cfg, alloc).parens())
            }
            Exp::ArrayGet(e) => e
                .array
                .print_prec(cfg, alloc, PREC_ATOM)
                .append(e.index.print(cfg, alloc).brackets()),
            Exp::Hole(_) => alloc.text(QUESTION_MARK),
            Exp::Omitted(_) => alloc.text("..."),
            Exp::Mark(e) => alloc
                .text(HASH)
                .append(e.subject.print_prec(cfg, alloc, prec))
                .append(alloc.text(HASH)),
            Exp::RecFun(e) => alloc
                .keyword(RECURSIVE)
                .append(alloc.space())
                .append(alloc.text(e.name.base_name().to_owned())),
            Exp::IntType(_) => alloc.typ(INT),
            Exp::BoolType(_) => alloc.typ(BOOL),
            Exp::TypeType(_) => alloc.typ(TYPE),
            Exp::FunType(e) => {
                let params = if e.type_params.is_empty() {
                    alloc.nil()
                } else {
                    printer::print_comma_separated(&e.type_params, cfg, alloc).angles()
                };
                parens_if(
                    prec > PREC_FORMULA,
                    params
                        .append(alloc.keyword(FUN))
                        .append(printer::print_comma_separated(&e.param_types, cfg, alloc).parens())
                        .append(alloc.space())
                        .append(ARROW)
                        .append(alloc.space())
                        .append(e.ret_type.print(cfg, alloc)),
                )
            }
            Exp::TypApp(e) => {
                let head = alloc.typ(e.name.base_name());
                if e.args.is_empty() {
                    head
                } else {
                    head.append(printer::print_comma_separated(&e.args, cfg, alloc).angles())
                }
            }
            Exp::UnknownInst(e) => alloc
                .typ(e.name.base_name())
                .append(alloc.text("<").append(QUESTION_MARK).append(alloc.text(">"))),
            Exp::ArrayType(e) => {
                alloc.typ("array").append(e.elem.print(cfg, alloc).angles())
            }
            Exp::OverloadType(e) => {
                let types = e.overloads.iter().map(|o| o.typ.print(cfg, alloc));
                let sep = alloc.text(COMMA).append(alloc.space());
                alloc.text("overloaded").append(alloc.intersperse(types, sep).braces_anno())
            }
            Exp::And(e) => {
                let sep =
                    alloc.space().append(alloc.keyword(AND)).append(alloc.space());
                let args = e.args.iter().map(|arg| arg.print_prec(cfg, alloc, PREC_AND));
                parens_if(prec > PREC_OR, alloc.intersperse(args, sep))
            }
            Exp::Or(e) => {
                let sep = alloc.space().append(alloc.keyword(OR)).append(alloc.space());
                let args = e.args.iter().map(|arg| arg.print_prec(cfg, alloc, PREC_OR));
                parens_if(prec > PREC_FORMULA, alloc.intersperse(args, sep))
            }
            Exp::IfThen(e) => parens_if(
                prec > PREC_FORMULA,
                alloc
                    .keyword(IF)
                    .append(alloc.space())
                    .append(e.premise.print_prec(cfg, alloc, PREC_OR))
                    .append(alloc.space())
                    .append(alloc.keyword(THEN))
                    .append(alloc.space())
                    .append(e.conclusion.print_prec(cfg, alloc, PREC_FORMULA)),
            ),
            Exp::All(e) => parens_if(
                prec > PREC_FORMULA,
                alloc
                    .keyword(ALL)
                    .append(alloc.space())
                    .append(alloc.text(&e.var.id))
                    .append(COLON)
                    .append(e.var_type.print(cfg, alloc))
                    .append(alloc.text("."))
                    .append(alloc.space())
                    .append(e.body.print_prec(cfg, alloc, PREC_FORMULA)),
            ),
            Exp::Exists(e) => parens_if(
                prec > PREC_FORMULA,
                alloc
                    .keyword(SOME)
                    .append(alloc.space())
                    .append(e.vars.print(cfg, alloc))
                    .append(alloc.text("."))
                    .append(alloc.space())
                    .append(e.body.print_prec(cfg, alloc, PREC_FORMULA)),
            ),
        }
    }
}

fn print_call<'a>(
    call: &'a Call,
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
    prec: Precedence,
) -> Builder<'a> {
    // Binary operators are printed infix.
    if let Exp::Global(global) = call.rator.unmarked() {
        let base = global.name.base_name();
        if is_operator(base) && call.args.len() == 2 {
            let doc = call.args[0]
                .print_prec(cfg, alloc, PREC_OP + 1)
                .append(alloc.space())
                .append(alloc.text(base.to_owned()))
                .append(alloc.space())
                .append(call.args[1].print_prec(cfg, alloc, PREC_OP + 1));
            return parens_if(prec > PREC_OP, doc);
        }
    }
    call.rator
        .print_prec(cfg, alloc, PREC_ATOM)
        .append(printer::print_comma_separated(&call.args, cfg, alloc).parens())
}

fn print_cases<'a>(cases: &'a [Case], cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
    let inner = alloc.intersperse(
        cases.iter().map(|case| {
            alloc
                .keyword(CASE)
                .append(alloc.space())
                .append(case.pattern.print(cfg, alloc))
                .append(alloc.space())
                .append(
                    alloc
                        .space()
                        .append(case.body.print(cfg, alloc))
                        .append(alloc.space())
                        .braces_anno(),
                )
        }),
        alloc.space(),
    );
    alloc.space().append(inner).append(alloc.space()).braces_anno()
}

impl Print for Param {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let name = alloc.text(&self.name.id);
        match &self.typ {
            Some(typ) => name
                .append(alloc.space())
                .append(COLON)
                .append(alloc.space())
                .append(typ.print(cfg, alloc)),
            None => name,
        }
    }
}

impl Print for TypedParam {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc
            .text(&self.name.id)
            .append(COLON)
            .append(self.typ.print(cfg, alloc))
    }
}

impl Print for crate::ident::VarBind {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.text(&self.id)
    }
}

impl Print for Pattern {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Pattern::Ctor(p) => {
                let head = alloc.ctor(p.name.base_name());
                if p.params.is_empty() {
                    head
                } else {
                    head.append(printer::print_comma_separated(&p.params, cfg, alloc).parens())
                }
            }
            Pattern::Bool(p) => alloc.keyword(if p.value { TRUE } else { FALSE }),
        }
    }
}

impl Print for Ctor {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let head = alloc.ctor(self.name.base_name());
        if self.params.is_empty() {
            head
        } else {
            head.append(printer::print_comma_separated(&self.params, cfg, alloc).parens())
        }
    }
}

impl Print for Union {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let params = if self.type_params.is_empty() {
            alloc.nil()
        } else {
            printer::print_comma_separated(&self.type_params, cfg, alloc).angles()
        };
        let sep = alloc.text(";").append(alloc.space());
        alloc
            .keyword(UNION)
            .append(alloc.space())
            .append(alloc.typ(self.name.base_name()))
            .append(params)
            .append(alloc.space())
            .append(
                alloc
                    .space()
                    .append(alloc.intersperse(self.ctors.iter().map(|c| c.print(cfg, alloc)), sep))
                    .append(alloc.space())
                    .braces_anno(),
            )
    }
}

impl Print for Proof {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Proof::Variable(p) => alloc.text(&p.name.id),
            Proof::Global(p) => alloc.text(p.name.base_name().to_owned()),
            Proof::True(_) => alloc.text("."),
            Proof::Hole(_) => alloc.text(QUESTION_MARK),
            Proof::Sorry(_) => alloc.keyword("sorry"),
            Proof::Tuple(p) => printer::print_comma_separated(&p.proofs, cfg, alloc),
            Proof::AndElim(p) => p
                .subject
                .print(cfg, alloc)
                .append(alloc.text("["))
                .append(alloc.text(p.which.to_string()))
                .append(alloc.text("]")),
            Proof::ImpIntro(_) => alloc.keyword("assume"),
            Proof::AllIntro(p) => alloc
                .keyword("arbitrary")
                .append(alloc.space())
                .append(alloc.text(&p.var.id)),
            Proof::AllElim(p) => p
                .univ
                .print(cfg, alloc)
                .append(p.arg.print(cfg, alloc).brackets()),
            Proof::AllElimTypes(p) => p
                .univ
                .print(cfg, alloc)
                .append(p.arg.print(cfg, alloc).angles()),
            Proof::ModusPonens(p) => alloc
                .keyword("apply")
                .append(alloc.space())
                .append(p.implication.print(cfg, alloc))
                .append(alloc.space())
                .append(alloc.keyword("to"))
                .append(alloc.space())
                .append(p.arg.print(cfg, alloc)),
            Proof::Reflexive(_) => alloc.keyword("reflexive"),
            Proof::Symmetric(_) => alloc.keyword("symmetric"),
            Proof::Transitive(_) => alloc.keyword("transitive"),
            Proof::Injective(p) => alloc
                .keyword("injective")
                .append(alloc.space())
                .append(alloc.ctor(p.ctor.base_name())),
            Proof::Extensionality(_) => alloc.keyword("extensionality"),
            Proof::SomeIntro(_) => alloc.keyword("choose"),
            Proof::SomeElim(_) => alloc.keyword("obtain"),
            Proof::Cases(_) => alloc.keyword("cases"),
            Proof::Induction(p) => alloc
                .keyword("induction")
                .append(alloc.space())
                .append(p.typ.print(cfg, alloc)),
            Proof::SwitchProof(p) => alloc
                .keyword(SWITCH)
                .append(alloc.space())
                .append(p.subject.print(cfg, alloc)),
            Proof::Rewrite(p) => alloc
                .keyword("rewrite")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.equations, cfg, alloc)),
            Proof::RewriteGoal(p) => alloc
                .keyword("rewrite")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.equations, cfg, alloc)),
            Proof::RewriteFact(p) => alloc
                .keyword("rewrite")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.equations, cfg, alloc))
                .append(alloc.space())
                .append(alloc.keyword(IN))
                .append(alloc.space())
                .append(p.subject.print(cfg, alloc)),
            Proof::ApplyDefs(p) => alloc
                .keyword("definition")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.definitions, cfg, alloc).braces_anno()),
            Proof::ApplyDefsGoal(p) => alloc
                .keyword("definition")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.definitions, cfg, alloc).braces_anno()),
            Proof::ApplyDefsFact(p) => alloc
                .keyword("definition")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.definitions, cfg, alloc).braces_anno())
                .append(alloc.space())
                .append(alloc.keyword(IN))
                .append(alloc.space())
                .append(p.subject.print(cfg, alloc)),
            Proof::EnableDefs(p) => alloc
                .keyword("enable")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.definitions, cfg, alloc).braces_anno()),
            Proof::EvaluateGoal(_) => alloc.keyword("evaluate"),
            Proof::EvaluateFact(p) => alloc
                .keyword("evaluate")
                .append(alloc.space())
                .append(alloc.keyword(IN))
                .append(alloc.space())
                .append(p.subject.print(cfg, alloc)),
            Proof::Suffices(p) => alloc
                .keyword("suffices")
                .append(alloc.space())
                .append(p.claim.print(cfg, alloc)),
            Proof::Have(p) => alloc
                .keyword("have")
                .append(alloc.space())
                .append(alloc.text(&p.label.id)),
            Proof::PDefine(p) => alloc
                .keyword(DEFINE)
                .append(alloc.space())
                .append(alloc.text(&p.name.id)),
            Proof::Conclude(p) => alloc
                .keyword("conclude")
                .append(alloc.space())
                .append(p.claim.print(cfg, alloc)),
            Proof::Term(p) => p.term.print(cfg, alloc),
            Proof::Recall(p) => alloc
                .keyword("recall")
                .append(alloc.space())
                .append(printer::print_comma_separated(&p.facts, cfg, alloc)),
            Proof::HelpUse(p) => alloc
                .keyword("help")
                .append(alloc.space())
                .append(p.subject.print(cfg, alloc)),
        }
    }
}
