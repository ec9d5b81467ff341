//! Tree-walking evaluator for conduit programs.
//!
//! Programs are loaded into a top-level environment that already carries the
//! built-in pipe combinators, then driven through their `main` function.

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod value;

pub use env::{EnvRef, Environment};
pub use error::EvalError;
pub use evaluator::{call_value, eval_block, eval_expr, eval_program, load_program};
pub use value::{BuiltinFn, Closure, ClosureBody, Value};
