//! Advice messages: for an unfinished goal, describe the proof skeleton
//! that would discharge it; for a proved fact, describe how to use it.

use ast::ctx::Env;
use ast::*;
use elaborator::ctx::Ctx;
use printer::Print;

/// The local hypotheses in scope, rendered for diagnostics.
pub fn givens(env: &Env) -> String {
    env.local_proofs()
        .iter()
        .map(|(name, formula)| format!("\t{}: {}\n", name, formula.print_to_string(None)))
        .collect()
}

fn first_letter(typ: &Exp) -> String {
    let letter = match typ {
        Exp::TypeVariable(var) => var.name.id.chars().next(),
        Exp::TypApp(app) => app.name.base_name().chars().next(),
        Exp::UnknownInst(inst) => inst.name.base_name().chars().next(),
        Exp::IntType(_) => Some('i'),
        Exp::BoolType(_) => Some('b'),
        Exp::TypeType(_) => Some('t'),
        Exp::FunType(_) => Some('f'),
        Exp::ArrayType(_) => Some('a'),
        _ => Some('x'),
    };
    letter.unwrap_or('x').to_lowercase().to_string()
}

fn make_unique(name: String, env: &Env) -> String {
    if env.term_base_name_taken(&name) { make_unique(format!("{name}'"), env) } else { name }
}

/// Advice for proving a goal of the given shape.
pub fn proof_advice(formula: &Exp, env: &Env, ctx: &mut Ctx) -> String {
    let prefix = "Advice:\n";
    match formula.unmarked() {
        Exp::BoolLit(BoolLit { value: true, .. }) => {
            format!("{prefix}\tYou can prove \"true\" with a period.\n")
        }
        Exp::BoolLit(BoolLit { value: false, .. }) => format!(
            "{prefix}\tProve \"false\" by proving a contradiction:\n\
             \tif you prove both \"P\" and \"not P\",\n\
             \tthen \"apply (recall not P) to (recall P)\" proves \"false\".\n"
        ),
        Exp::And(and) => {
            let parts: Vec<String> =
                and.args.iter().map(|arg| format!("\t\t{}", arg.print_to_string(None))).collect();
            format!(
                "{prefix}\tProve this logical-and formula by proving each of its parts,\n\
                 \tshown below, then combine the proofs with commas.\n{}",
                parts.join("\n")
            )
        }
        Exp::Or(or) => {
            let parts: Vec<String> =
                or.args.iter().map(|arg| format!("\t\t{}", arg.print_to_string(None))).collect();
            format!(
                "{prefix}\tProve this logical-or formula by proving one of its parts:\n{}",
                parts.join("\n")
            )
        }
        Exp::IfThen(ifthen) => format!(
            "{prefix}\tProve this if-then formula with:\n\
             \t\tassume label: {}\n\
             \tfollowed by a proof of:\n\
             \t\t{}",
            ifthen.premise.print_to_string(None),
            ifthen.conclusion.print_to_string(None)
        ),
        Exp::All(all) => all_advice(all, env, ctx, prefix),
        Exp::Exists(exists) => {
            let letters: Vec<String> = (0..exists.vars.len())
                .map(|i| char::from(b'A' + i as u8).to_string())
                .collect();
            let witnesses: Vec<Exp> = letters.iter().map(|l| Global::mk(l)).collect();
            let body = open_term_binders(&exists.body, &witnesses);
            format!(
                "{prefix}\tProve this \"some\" formula with:\n\
                 \t\tchoose {}\n\
                 \twhere you replace {} with your choice(s),\n\
                 \tthen prove:\n\
                 \t\t{}",
                letters.join(", "),
                letters.join(", "),
                body.print_to_string(None)
            )
        }
        Exp::LocalLet(local) => proof_advice(&local.body, env, ctx),
        _ if is_equation(formula) => format!(
            "{prefix}\tTo prove this equality, one of these statements might help:\n\
             \t\tdefinition\n\t\trewrite\n\t\tequations\n"
        ),
        other => {
            for (name, proved) in env.local_proofs() {
                if *proved == *other {
                    if name.base_name() == "_" {
                        return format!(
                            "\nYou can conclude the proof with:\n\trecall {}",
                            other.print_to_string(None)
                        );
                    }
                    return format!(
                        "\nYou can conclude the proof with:\n\tconclude {} by {}",
                        other.print_to_string(None),
                        name.base_name()
                    );
                }
            }
            "\n".to_owned()
        }
    }
}

fn all_advice(all: &All, env: &Env, _ctx: &mut Ctx, prefix: &str) -> String {
    let arb_advice = format!(
        "{prefix}\tProve this \"all\" formula with:\n\
         \t\tarbitrary {}:{}\n\
         \tfollowed by a proof of:\n\
         \t\t{}",
        all.var,
        all.var_type.print_to_string(None),
        all.body.print_to_string(None)
    );

    // Induction is only on offer for unions with at least two
    // alternatives.
    let Exp::TypApp(app) = &*all.var_type else { return arb_advice };
    let Some(union) = env.def_of_type(&app.name.id) else { return arb_advice };
    if union.ctors.len() < 2 {
        return arb_advice;
    }

    let mut ind_advice = format!(
        "\n\n\tAlternatively, you can try induction with:\n\t\tinduction {}\n",
        all.var_type.print_to_string(None)
    );
    for ctor in &union.ctors {
        let param_types: Vec<Box<Exp>> =
            ctor.params.iter().map(|param| open_type_binders(param, &app.args)).collect();
        // Parameter names count per letter: node(Nat, List<Nat>) becomes
        // node(n1, l1).
        let mut letter_counts: HashMap<String, usize> = HashMap::default();
        let params: Vec<String> = param_types
            .iter()
            .map(|typ| {
                let letter = first_letter(typ);
                let count = letter_counts.entry(letter.clone()).or_insert(0);
                *count += 1;
                make_unique(format!("{letter}{count}"), env)
            })
            .collect();
        ind_advice.push_str(&format!("\t\tcase {}", ctor.name.base_name()));
        if !params.is_empty() {
            ind_advice.push_str(&format!("({})", params.join(", ")));
        }
        let recursive: Vec<&String> = params
            .iter()
            .zip(ctor.params.iter())
            .filter(|(_, typ)| union.is_recursive_param(typ))
            .map(|(param, _)| param)
            .collect();
        if !recursive.is_empty() {
            ind_advice.push_str(" suppose ");
            let hyps: Vec<String> = recursive
                .iter()
                .enumerate()
                .map(|(i, param)| {
                    let instance = open_term_binders(&all.body, &[Global::mk(param)]);
                    format!("IH{}: {}", i + 1, instance.print_to_string(None))
                })
                .collect();
            ind_advice.push_str(&hyps.join(",\n\t\t\t"));
        }
        ind_advice.push_str(" {\n\t\t  ?\n\t\t}\n");
    }
    format!("{arb_advice}{ind_advice}")
}

/// Advice for using an already proved fact.
pub fn proof_use_advice(proof: &Proof, formula: &Exp, _env: &Env, ctx: &mut Ctx) -> String {
    let prefix = format!("Advice about using fact:\n\t{}\n\n", formula.print_to_string(None));
    match formula.unmarked() {
        Exp::BoolLit(BoolLit { value: true, .. }) => {
            format!("{prefix}\tThe \"true\" fact is useless.\n")
        }
        Exp::BoolLit(BoolLit { value: false, .. }) => {
            format!("{prefix}\tUse this \"false\" fact to implicitly prove anything!\n")
        }
        Exp::And(and) => {
            let parts: Vec<String> =
                and.args.iter().map(|arg| format!("\t\t{}", arg.print_to_string(None))).collect();
            format!(
                "{prefix}\tUse this logical-and to implicitly prove any of its parts:\n{}",
                parts.join("\n")
            )
        }
        Exp::Or(or) => {
            ctx.reset_labels();
            let cases: Vec<String> = or
                .args
                .iter()
                .map(|arg| {
                    format!(
                        "\t\tcase {} : {} {{ ? }}",
                        ctx.fresh_label(),
                        arg.print_to_string(None)
                    )
                })
                .collect();
            format!(
                "{prefix}\tUse this logical-or by proceeding with a \"cases\" statement:\n\
                 \t\tcases {}\n{}",
                proof.print_to_string(None),
                cases.join("\n")
            )
        }
        Exp::IfThen(ifthen) => format!(
            "{prefix}\tApply this if-then formula to a proof of its premise:\n\
             \t\t{}\n\
             \tto obtain a proof of its conclusion:\n\
             \t\t{}\n\
             \tby using an apply-to statement:\n\
             \t\tapply {} to ?",
            ifthen.premise.print_to_string(None),
            ifthen.conclusion.print_to_string(None),
            proof.print_to_string(None)
        ),
        Exp::All(all) => {
            let type_param = all.binds_type();
            let letter = "A";
            let how = if type_param {
                format!("between `<` and `>` like so:\n\t\t {}<{}>\n", proof.print_to_string(None), letter)
            } else {
                format!("in square-brackets like so:\n\t\t {}[{}]\n", proof.print_to_string(None), letter)
            };
            let shown = if type_param {
                open_type_binders(&all.body, &[TypApp::mk(letter, vec![])])
            } else {
                open_term_binders(&all.body, &[Global::mk(letter)])
            };
            format!(
                "{prefix}\tInstantiate this all formula with your choice for {}\n\
                 \tby writing it {}\
                 \tto obtain a proof of:\n\
                 \t\t{}",
                all.var,
                how,
                shown.print_to_string(None)
            )
        }
        Exp::Exists(exists) => {
            let letters: Vec<String> = (0..exists.vars.len())
                .map(|i| char::from(b'A' + i as u8).to_string())
                .collect();
            let witnesses: Vec<Exp> = letters.iter().map(|l| Global::mk(l)).collect();
            let body = open_term_binders(&exists.body, &witnesses);
            format!(
                "{prefix}To use this \"some\" formula, proceed with:\n\
                 \tobtain {} where label: {} from {}\n\
                 where {} {} of your choice,\n\
                 followed by a proof of the goal.",
                letters.join(", "),
                body.print_to_string(None),
                proof.print_to_string(None),
                letters.join(", "),
                if letters.len() > 1 { "are new names" } else { "is a new name" }
            )
        }
        _ if is_equation(formula) => format!(
            "{prefix}\tYou can use this equality in a rewrite statement:\n\
             \t\trewrite {}\n",
            proof.print_to_string(None)
        ),
        _ => "Sorry, I have no advice for this kind of formula.".to_owned(),
    }
}
