//! Well-formedness of types.

use ast::ctx::Env;
use ast::*;
use miette_util::ToMiette;
use printer::Print;

use crate::result::{TcResult, TypeError};

/// Check that a type is well formed: every type variable is bound, every
/// named type exists, and type applications have the right arity.
pub fn check_type(typ: &Exp, env: &Env) -> TcResult<()> {
    match typ {
        Exp::TypeVariable(var) => {
            if var.idx.0 < env.type_depth() {
                Ok(())
            } else {
                Err(TypeError::UndefinedTypeVariable {
                    name: var.name.id.clone(),
                    span: var.span.to_miette(),
                })
            }
        }
        Exp::IntType(_) | Exp::BoolType(_) | Exp::TypeType(_) => Ok(()),
        Exp::FunType(funty) => {
            let env = env.declare_type_vars(funty.span, &funty.type_params);
            for param in &funty.param_types {
                check_type(param, &env)?;
            }
            check_type(&funty.ret_type, &env)
        }
        Exp::TypApp(app) => {
            if !env.type_exists(&app.name.id) {
                return Err(TypeError::UndefinedTypeVariable {
                    name: app.name.base_name().to_owned(),
                    span: app.span.to_miette(),
                });
            }
            if let Some(union) = env.def_of_type(&app.name.id) {
                if union.type_params.len() != app.args.len() {
                    return Err(TypeError::ArityMismatch {
                        name: app.name.base_name().to_owned(),
                        expected: union.type_params.len(),
                        actual: app.args.len(),
                        span: app.span.to_miette(),
                    });
                }
            }
            for arg in &app.args {
                check_type(arg, env)?;
            }
            Ok(())
        }
        Exp::UnknownInst(inst) => {
            if env.type_exists(&inst.name.id) {
                Ok(())
            } else {
                Err(TypeError::UndefinedTypeVariable {
                    name: inst.name.base_name().to_owned(),
                    span: inst.span.to_miette(),
                })
            }
        }
        Exp::ArrayType(array) => check_type(&array.elem, env),
        Exp::OverloadType(overload) => {
            for entry in &overload.overloads {
                check_type(&entry.typ, env)?;
            }
            Ok(())
        }
        other => Err(TypeError::ExpectedAType {
            got: other.print_to_string(None),
            span: other.span().to_miette(),
        }),
    }
}
