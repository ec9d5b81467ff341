//! Compilation pipeline for conduit.
//!
//! Each stage is a Salsa tracked function, so re-running a later stage on an
//! unchanged source is free.
//!
//! ```text
//! SourceFile
//!     │
//!     ▼
//! stage_parse ─► Program
//!     │
//!     ▼
//! stage_optimize ─► Program (@fast_pipes functions rewritten)
//!     │
//!     ▼
//! eval_program ─► Value
//! ```
//!
//! Diagnostics are collected through the Salsa accumulator: parsing and
//! rewriting failures accumulate a [`Diagnostic`] instead of aborting, and
//! [`compile_with_diagnostics`] gathers everything that accumulated.

use conduit_ast::{parse_program, Program};
use conduit_core::{Diagnostic, DiagnosticSeverity, SourceFile};
use conduit_eval::{eval_program, EvalError, Value};
use conduit_rewrite::optimize_program;

/// Stage 1: Parse the source text into a program.
///
/// A file that fails to parse yields an empty program plus a parsing
/// diagnostic.
#[salsa::tracked]
pub fn stage_parse<'db>(db: &'db dyn salsa::Database, source: SourceFile) -> Program<'db> {
    parse_program(db, source)
}

/// Stage 2: Rewrite every `@fast_pipes` function.
///
/// Functions that fail to rewrite stay in their original form and the
/// failure accumulates as a rewriting diagnostic, so the program still runs.
#[salsa::tracked]
pub fn stage_optimize<'db>(db: &'db dyn salsa::Database, source: SourceFile) -> Program<'db> {
    optimize_program(db, source)
}

/// A compiled program together with everything that accumulated along the
/// way.
pub struct CompileResult<'db> {
    pub program: Program<'db>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult<'_> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }
}

/// Compile a source file and collect its diagnostics.
///
/// With `optimize` off, the optimizer never runs and the result carries only
/// parsing diagnostics.
pub fn compile_with_diagnostics<'db>(
    db: &'db dyn salsa::Database,
    source: SourceFile,
    optimize: bool,
) -> CompileResult<'db> {
    let (program, diagnostics) = if optimize {
        (
            stage_optimize(db, source),
            stage_optimize::accumulated::<Diagnostic>(db, source),
        )
    } else {
        (
            stage_parse(db, source),
            stage_parse::accumulated::<Diagnostic>(db, source),
        )
    };
    CompileResult {
        program,
        diagnostics: diagnostics.into_iter().cloned().collect(),
    }
}

/// Compile and run a source file's `main` function.
///
/// Diagnostics are left in the accumulator; callers that want them use
/// [`compile_with_diagnostics`].
pub fn run<'db>(
    db: &'db dyn salsa::Database,
    source: SourceFile,
    optimize: bool,
) -> Result<Value, EvalError> {
    let program = if optimize {
        stage_optimize(db, source)
    } else {
        stage_parse(db, source)
    };
    eval_program(db, program)
}
