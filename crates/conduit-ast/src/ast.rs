use conduit_core::{Span, Spanned};
use serde::{Deserialize, Serialize};

pub type Identifier = String;

/// Name of the pipe entry point recognized by both the evaluator and the
/// optimizer.
pub const PIPE_FUNCTION: &str = "pipe";

/// Upper bound on the number of stages a single pipe invocation may carry.
pub const MAX_PIPE_STAGES: usize = 20;

/// Suffix appended to a function definition when the optimizer rewrites it,
/// so the rewritten definition never collides with the original.
pub const OPTIMIZED_SUFFIX: &str = "_fast_pipes";

/// Name a function is bound under at load time. Rewritten definitions keep
/// their `_fast_pipes` suffix internally but replace the original at its
/// call name.
pub fn binding_name(name: &str) -> &str {
    name.strip_suffix(OPTIMIZED_SUFFIX).unwrap_or(name)
}

#[salsa::tracked(debug)]
pub struct Program<'db> {
    #[tracked]
    #[returns(ref)]
    pub items: Vec<Item<'db>>,
}

#[salsa::tracked(debug)]
pub struct Item<'db> {
    #[tracked]
    #[returns(ref)]
    pub kind: ItemKind<'db>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, salsa::Update)]
#[non_exhaustive]
pub enum ItemKind<'db> {
    Function(FunctionDefinition<'db>),
}

#[salsa::tracked(debug)]
pub struct FunctionDefinition<'db> {
    #[returns(ref)]
    pub name: Identifier,
    #[returns(ref)]
    pub decorators: Vec<Identifier>,
    #[returns(ref)]
    pub parameters: Vec<Identifier>,
    #[returns(ref)]
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    Let(LetStatement),
    Expression(Spanned<Expr>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Spanned<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Number(i64),
    Bool(bool),
    String(String),
    Name(Identifier),
    List(Vec<Spanned<Expr>>),
    Binary(BinaryExpression),
    Call(CallExpression),
    Lambda(LambdaExpression),
    /// Spread of a list value into a call's argument positions: `...expr`.
    /// Only valid inside call argument lists.
    Spread(Box<Spanned<Expr>>),
    /// Assignment expression: binds `name` in the current frame and yields
    /// the bound value. Synthesized by the optimizer for single-evaluation
    /// temporaries; the parser never produces it.
    Bind(BindExpression),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Box<Spanned<Expr>>,
    pub operator: BinaryOperator,
    pub right: Box<Spanned<Expr>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Spanned<Expr>>,
    pub arguments: Vec<Spanned<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaExpression {
    pub parameters: Vec<Identifier>,
    pub body: Box<Spanned<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindExpression {
    pub name: Identifier,
    pub value: Box<Spanned<Expr>>,
}

/// Whether a call with this callee is a pipe invocation.
pub fn is_pipe_callee(callee: &Spanned<Expr>) -> bool {
    matches!(&callee.0, Expr::Name(name) if name == PIPE_FUNCTION)
}

/// Shift every span in a block forward by `delta` bytes.
pub fn shift_block_spans(block: &mut Block, delta: usize) {
    for statement in &mut block.statements {
        match statement {
            Statement::Let(let_stmt) => shift_expr_spans(&mut let_stmt.value, delta),
            Statement::Expression(expr) => shift_expr_spans(expr, delta),
        }
    }
}

/// Shift every span in an expression tree forward by `delta` bytes.
pub fn shift_expr_spans(expr: &mut Spanned<Expr>, delta: usize) {
    expr.1 = expr.1.shift(delta);
    match &mut expr.0 {
        Expr::Number(_) | Expr::Bool(_) | Expr::String(_) | Expr::Name(_) => {}
        Expr::List(items) => {
            for item in items {
                shift_expr_spans(item, delta);
            }
        }
        Expr::Binary(binary) => {
            shift_expr_spans(&mut binary.left, delta);
            shift_expr_spans(&mut binary.right, delta);
        }
        Expr::Call(call) => {
            shift_expr_spans(&mut call.callee, delta);
            for arg in &mut call.arguments {
                shift_expr_spans(arg, delta);
            }
        }
        Expr::Lambda(lambda) => shift_expr_spans(&mut lambda.body, delta),
        Expr::Spread(inner) => shift_expr_spans(inner, delta),
        Expr::Bind(bind) => shift_expr_spans(&mut bind.value, delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_name_strips_optimizer_suffix() {
        assert_eq!(binding_name("main_fast_pipes"), "main");
        assert_eq!(binding_name("main"), "main");
    }

    #[test]
    fn shift_moves_nested_spans() {
        let mut expr = (
            Expr::Call(CallExpression {
                callee: Box::new((Expr::Name("f".into()), Span::new(0, 1))),
                arguments: vec![(Expr::Number(1), Span::new(2, 3))],
            }),
            Span::new(0, 4),
        );
        shift_expr_spans(&mut expr, 10);
        assert_eq!(expr.1, Span::new(10, 14));
        let Expr::Call(call) = &expr.0 else {
            panic!("expected call");
        };
        assert_eq!(call.callee.1, Span::new(10, 11));
        assert_eq!(call.arguments[0].1, Span::new(12, 13));
    }
}
