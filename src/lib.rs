//! Conduit: a small pipe-expression language.
//!
//! Programs thread values through stages with `pipe(seed, stage, ...)`.
//! Functions marked `@fast_pipes` have every pipe invocation inlined into a
//! single composed expression at load time, so no stage list is built and no
//! calls into the pipe machinery remain.

pub mod pipeline;
pub mod pretty;

pub use conduit_ast::parse_program;
pub use conduit_core::{
    CompilationPhase, ConduitDatabaseImpl, Diagnostic, DiagnosticSeverity, SourceFile, Span,
};
pub use conduit_eval::{eval_program, EvalError, Value};
pub use conduit_rewrite::optimize_program;
pub use pipeline::{compile_with_diagnostics, stage_optimize, stage_parse, CompileResult};
