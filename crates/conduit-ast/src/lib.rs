pub mod ast;
pub mod database;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    BinaryExpression, BinaryOperator, BindExpression, Block, CallExpression, Expr,
    FunctionDefinition, Identifier, Item, ItemKind, LambdaExpression, LetStatement, Program,
    Statement, binding_name, is_pipe_callee, shift_block_spans, shift_expr_spans,
    MAX_PIPE_STAGES, OPTIMIZED_SUFFIX, PIPE_FUNCTION,
};
pub use conduit_core::{Span, Spanned};
pub use database::parse_program;
pub use parser::{ParseError, RawFunction, parse_source};
