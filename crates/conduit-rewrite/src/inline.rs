//! The pipe call rewriter.
//!
//! Walks a function body bottom-up and replaces every `pipe(...)` call with
//! a single composed expression:
//!
//! ```text
//! pipe(a, b, c, d)            =>  d(c(b(a)))
//! pipe(a, b, fn(x) x + 1)     =>  b(a) + 1
//! pipe(a, b, fn(x) x + x + 1) =>  (t := b(a)) + t + 1
//! ```
//!
//! Anonymous stages are inlined; when a stage references its parameter more
//! than once, a single-evaluation temporary is introduced via an assignment
//! expression so the prior value is computed exactly once. Because the walk
//! is bottom-up, pipes nested inside the arguments of an outer pipe are
//! rewritten first.

use crate::count::count_param_uses;
use crate::error::RewriteError;
use crate::subst::LambdaInliner;
use conduit_ast::{
    is_pipe_callee, BinaryExpression, BindExpression, Block, CallExpression, Expr,
    LambdaExpression, LetStatement, Spanned, Statement, MAX_PIPE_STAGES,
};
use conduit_core::Span;

pub struct PipeRewriter {
    temp_counter: usize,
}

impl Default for PipeRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeRewriter {
    pub fn new() -> Self {
        Self { temp_counter: 0 }
    }

    pub fn rewrite_block(&mut self, block: Block) -> Result<Block, RewriteError> {
        let statements = block
            .statements
            .into_iter()
            .map(|statement| self.rewrite_statement(statement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block { statements })
    }

    fn rewrite_statement(&mut self, statement: Statement) -> Result<Statement, RewriteError> {
        Ok(match statement {
            Statement::Let(let_stmt) => Statement::Let(LetStatement {
                name: let_stmt.name,
                value: self.rewrite_expr(let_stmt.value)?,
            }),
            Statement::Expression(expr) => Statement::Expression(self.rewrite_expr(expr)?),
        })
    }

    pub fn rewrite_expr(&mut self, (expr, span): Spanned<Expr>) -> Result<Spanned<Expr>, RewriteError> {
        let expr = match expr {
            Expr::Binary(binary) => Expr::Binary(BinaryExpression {
                left: Box::new(self.rewrite_expr(*binary.left)?),
                operator: binary.operator,
                right: Box::new(self.rewrite_expr(*binary.right)?),
            }),
            Expr::Call(call) => {
                let callee = self.rewrite_expr(*call.callee)?;
                let arguments = call
                    .arguments
                    .into_iter()
                    .map(|arg| self.rewrite_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let is_pipe = is_pipe_callee(&callee);
                let call = CallExpression {
                    callee: Box::new(callee),
                    arguments,
                };
                if is_pipe {
                    return self.fold_pipe(call, span);
                }
                Expr::Call(call)
            }
            Expr::List(items) => Expr::List(
                items
                    .into_iter()
                    .map(|item| self.rewrite_expr(item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Expr::Lambda(lambda) => Expr::Lambda(LambdaExpression {
                parameters: lambda.parameters,
                body: Box::new(self.rewrite_expr(*lambda.body)?),
            }),
            Expr::Spread(inner) => Expr::Spread(Box::new(self.rewrite_expr(*inner)?)),
            Expr::Bind(bind) => Expr::Bind(BindExpression {
                name: bind.name,
                value: Box::new(self.rewrite_expr(*bind.value)?),
            }),
            other @ (Expr::Number(_) | Expr::Bool(_) | Expr::String(_) | Expr::Name(_)) => other,
        };
        Ok((expr, span))
    }

    /// Collapse one pipe invocation into a composed expression.
    fn fold_pipe(
        &mut self,
        call: CallExpression,
        span: Span,
    ) -> Result<Spanned<Expr>, RewriteError> {
        // Stage lists built with a spread cannot be statically enumerated.
        if let Some(spread) = call
            .arguments
            .iter()
            .find(|arg| matches!(arg.0, Expr::Spread(_)))
        {
            return Err(RewriteError::SpreadInPipe { span: spread.1 });
        }

        if call.arguments.len() > MAX_PIPE_STAGES + 1 {
            return Err(RewriteError::TooManyStages {
                found: call.arguments.len() - 1,
                max: MAX_PIPE_STAGES,
                span,
            });
        }

        let mut arguments = call.arguments.into_iter();
        let Some(mut value) = arguments.next() else {
            // `pipe()` with no seed: leave it alone, the evaluator raises
            // the arity error at the call.
            return Ok((
                Expr::Call(CallExpression {
                    callee: call.callee,
                    arguments: Vec::new(),
                }),
                span,
            ));
        };

        for (stage, stage_span) in arguments {
            value = match stage {
                Expr::Lambda(lambda) => self.inline_stage(lambda, stage_span, value)?,
                other => (
                    Expr::Call(CallExpression {
                        callee: Box::new((other, stage_span)),
                        arguments: vec![value],
                    }),
                    stage_span,
                ),
            };
            // Position metadata comes from the originating stage node.
            value.1 = stage_span;
        }

        Ok(value)
    }

    fn inline_stage(
        &mut self,
        lambda: LambdaExpression,
        stage_span: Span,
        value: Spanned<Expr>,
    ) -> Result<Spanned<Expr>, RewriteError> {
        if lambda.parameters.len() != 1 {
            return Err(RewriteError::NotAUnaryLambda {
                count: lambda.parameters.len(),
                span: stage_span,
            });
        }
        let param = &lambda.parameters[0];

        match count_param_uses(param, &lambda.body) {
            0 => Err(RewriteError::UnreferencedParameter { span: stage_span }),
            1 => LambdaInliner::new(param, value, None).inline(*lambda.body),
            _ => {
                // The assignment expression is the primary replacement, so
                // the prior value is evaluated exactly once, at the point of
                // first reference; later references read the temporary.
                let temp = self.fresh_temp();
                let bind = (
                    Expr::Bind(BindExpression {
                        name: temp.clone(),
                        value: Box::new(value),
                    }),
                    stage_span,
                );
                let read = (Expr::Name(temp), stage_span);
                LambdaInliner::new(param, bind, Some(read)).inline(*lambda.body)
            }
        }
    }

    /// Temporaries are unique per rewritten pipe call, so nested pipes can
    /// never observe each other's bindings.
    fn fresh_temp(&mut self) -> String {
        let name = format!("__pipe_tmp{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }
}
