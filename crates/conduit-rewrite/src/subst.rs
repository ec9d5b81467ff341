//! Inlining a lambda body by substituting its parameter references.

use crate::error::RewriteError;
use conduit_ast::{
    BinaryExpression, BindExpression, CallExpression, Expr, LambdaExpression, Spanned,
};

/// Replaces references to a lambda's parameter with caller-supplied
/// expressions.
///
/// The first reference encountered receives `primary`; every later
/// reference receives `secondary`. The ordering matters: when the pipe
/// rewriter introduces a temporary, the assignment expression itself is the
/// primary replacement, so the prior value is computed exactly once, at the
/// point of first use.
pub struct LambdaInliner<'a> {
    param: &'a str,
    primary: Spanned<Expr>,
    secondary: Option<Spanned<Expr>>,
    seen: usize,
}

impl<'a> LambdaInliner<'a> {
    pub fn new(
        param: &'a str,
        primary: Spanned<Expr>,
        secondary: Option<Spanned<Expr>>,
    ) -> Self {
        Self {
            param,
            primary,
            secondary,
            seen: 0,
        }
    }

    /// Return the lambda body with all parameter references replaced.
    ///
    /// Fails with [`RewriteError::MissingSecondary`] if a second reference
    /// is found and no secondary replacement was supplied.
    pub fn inline(mut self, body: Spanned<Expr>) -> Result<Spanned<Expr>, RewriteError> {
        self.rewrite(body)
    }

    fn rewrite(&mut self, (expr, span): Spanned<Expr>) -> Result<Spanned<Expr>, RewriteError> {
        let expr = match expr {
            Expr::Name(name) if name == self.param => {
                if self.seen == 0 {
                    self.seen += 1;
                    return Ok(self.primary.clone());
                }
                return match &self.secondary {
                    Some(secondary) => Ok(secondary.clone()),
                    None => Err(RewriteError::MissingSecondary { span }),
                };
            }
            Expr::Binary(binary) => Expr::Binary(BinaryExpression {
                left: Box::new(self.rewrite(*binary.left)?),
                operator: binary.operator,
                right: Box::new(self.rewrite(*binary.right)?),
            }),
            Expr::Call(call) => Expr::Call(CallExpression {
                callee: Box::new(self.rewrite(*call.callee)?),
                arguments: call
                    .arguments
                    .into_iter()
                    .map(|arg| self.rewrite(arg))
                    .collect::<Result<Vec<_>, _>>()?,
            }),
            Expr::List(items) => Expr::List(
                items
                    .into_iter()
                    .map(|item| self.rewrite(item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Expr::Lambda(lambda) => Expr::Lambda(LambdaExpression {
                parameters: lambda.parameters,
                body: Box::new(self.rewrite(*lambda.body)?),
            }),
            Expr::Spread(inner) => Expr::Spread(Box::new(self.rewrite(*inner)?)),
            Expr::Bind(bind) => Expr::Bind(BindExpression {
                name: bind.name,
                value: Box::new(self.rewrite(*bind.value)?),
            }),
            other @ (Expr::Number(_) | Expr::Bool(_) | Expr::String(_) | Expr::Name(_)) => other,
        };
        Ok((expr, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_ast::{parse_source, Statement};
    use conduit_core::Span;

    fn lambda_from(source: &str) -> (String, Spanned<Expr>) {
        let functions = parse_source(source).expect("parse failed");
        let Statement::Expression((Expr::Lambda(lambda), _)) =
            functions[0].body.statements[0].clone()
        else {
            panic!("expected lambda statement");
        };
        (lambda.parameters[0].clone(), *lambda.body)
    }

    fn number(n: i64) -> Spanned<Expr> {
        (Expr::Number(n), Span::new(0, 0))
    }

    #[test]
    fn single_reference_gets_primary() {
        let (param, body) = lambda_from("fn f() { fn(x) x + 1 }");
        let inlined = LambdaInliner::new(&param, number(5), None)
            .inline(body)
            .unwrap();
        let Expr::Binary(binary) = inlined.0 else {
            panic!("expected binary");
        };
        assert_eq!(binary.left.0, Expr::Number(5));
        assert_eq!(binary.right.0, Expr::Number(1));
    }

    #[test]
    fn later_references_get_secondary() {
        let (param, body) = lambda_from("fn f() { fn(x) x + x + x }");
        let inlined = LambdaInliner::new(&param, number(5), Some(number(9)))
            .inline(body)
            .unwrap();
        // ((5 + 9) + 9): only the first occurrence receives the primary.
        let Expr::Binary(outer) = inlined.0 else {
            panic!("expected binary");
        };
        assert_eq!(outer.right.0, Expr::Number(9));
        let Expr::Binary(inner) = outer.left.0.clone() else {
            panic!("expected binary");
        };
        assert_eq!(inner.left.0, Expr::Number(5));
        assert_eq!(inner.right.0, Expr::Number(9));
    }

    #[test]
    fn second_reference_without_secondary_fails() {
        let (param, body) = lambda_from("fn f() { fn(x) x + x }");
        let err = LambdaInliner::new(&param, number(5), None)
            .inline(body)
            .unwrap_err();
        assert!(matches!(err, RewriteError::MissingSecondary { .. }));
    }

    #[test]
    fn unrelated_names_are_preserved() {
        let (param, body) = lambda_from("fn f() { fn(x) g(x, y) }");
        let inlined = LambdaInliner::new(&param, number(5), None)
            .inline(body)
            .unwrap();
        let Expr::Call(call) = inlined.0 else {
            panic!("expected call");
        };
        assert_eq!(call.arguments[0].0, Expr::Number(5));
        assert_eq!(call.arguments[1].0, Expr::Name("y".into()));
    }
}
