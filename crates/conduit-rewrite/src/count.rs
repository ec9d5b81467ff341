//! Counting references to a lambda's parameter.

use conduit_ast::{Expr, Spanned};

/// Count how many times `param` is referenced inside a lambda body.
///
/// The count is textual: every `Name` node equal to the parameter is
/// counted, including occurrences inside nested lambdas that shadow the
/// name. Known limitation: scope-aware counting would diverge from the
/// reference behavior in pathological nested-lambda cases.
pub fn count_param_uses(param: &str, body: &Spanned<Expr>) -> usize {
    let mut counter = ParamUseCounter { param, uses: 0 };
    counter.visit(body);
    counter.uses
}

struct ParamUseCounter<'a> {
    param: &'a str,
    uses: usize,
}

impl ParamUseCounter<'_> {
    fn visit(&mut self, (expr, _): &Spanned<Expr>) {
        match expr {
            Expr::Name(name) => {
                if name == self.param {
                    self.uses += 1;
                }
            }
            Expr::Number(_) | Expr::Bool(_) | Expr::String(_) => {}
            Expr::List(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Expr::Binary(binary) => {
                self.visit(&binary.left);
                self.visit(&binary.right);
            }
            Expr::Call(call) => {
                self.visit(&call.callee);
                for arg in &call.arguments {
                    self.visit(arg);
                }
            }
            Expr::Lambda(lambda) => self.visit(&lambda.body),
            Expr::Spread(inner) => self.visit(inner),
            Expr::Bind(bind) => self.visit(&bind.value),
        }
    }
}
