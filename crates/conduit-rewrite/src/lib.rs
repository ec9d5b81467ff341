//! Load-time optimizer for pipe invocations.
//!
//! Rewrites `pipe(value, s0, s1, ..)` calls inside `@fast_pipes` functions
//! into direct nested expressions, inlining anonymous stages so the rewritten
//! function carries no pipe-dispatch overhead. The unoptimized evaluator in
//! `conduit-eval` is the reference semantics; for every valid program the
//! rewritten form is observably equivalent.

pub mod count;
pub mod driver;
pub mod error;
pub mod inline;
pub mod subst;

pub use count::count_param_uses;
pub use driver::{optimize_function, optimize_program, DriverError, FAST_PIPES_DECORATOR};
pub use error::RewriteError;
pub use inline::PipeRewriter;
pub use subst::LambdaInliner;
