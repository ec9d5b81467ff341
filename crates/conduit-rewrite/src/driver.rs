//! The optimizing transform driver.
//!
//! Takes a function carrying the `@fast_pipes` decorator and produces a
//! drop-in replacement definition with every pipe invocation statically
//! inlined. The original definition is never invoked again.

use crate::error::RewriteError;
use crate::inline::PipeRewriter;
use conduit_ast::{
    parse_program, parse_source, FunctionDefinition, Item, ItemKind, Program, OPTIMIZED_SUFFIX,
};
use conduit_core::{CompilationPhase, Diagnostic, DiagnosticSeverity, SourceFile, Span};
use salsa::Accumulator;

/// Decorator marking a function for pipe inlining.
pub const FAST_PIPES_DECORATOR: &str = "fast_pipes";

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DriverError {
    #[display("{_0}")]
    Rewrite(RewriteError),

    /// The function's span does not address its source file. Tracked
    /// definitions always originate from a parse of the same file, so this
    /// indicates a stale or foreign definition.
    #[display("function source is unavailable at {span}")]
    #[from(skip)]
    SourceUnavailable { span: Span },

    /// The re-parsed source slice did not yield the expected single
    /// function definition.
    #[display("function source at {span} did not re-parse: {message}")]
    #[from(skip)]
    MalformedSource { message: String, span: Span },
}

impl DriverError {
    pub fn span(&self) -> Span {
        match self {
            DriverError::Rewrite(e) => e.span(),
            DriverError::SourceUnavailable { span }
            | DriverError::MalformedSource { span, .. } => *span,
        }
    }
}

/// Produce the optimized replacement for one function definition.
///
/// The definition's source is sliced back out of the file and re-parsed
/// standalone, and the fresh tree's spans are shifted by the slice offset so
/// every position still points into the original file. The definition is
/// renamed with a suffix so it cannot collide with the original, its
/// `fast_pipes` decorator is stripped so re-optimization cannot recurse, and
/// the pipe rewriter is applied to the body.
pub fn optimize_function<'db>(
    db: &'db dyn salsa::Database,
    source: SourceFile,
    def: FunctionDefinition<'db>,
) -> Result<FunctionDefinition<'db>, DriverError> {
    let span = def.span(db);
    let text = source.text(db);
    let slice = text
        .get(span.start..span.end)
        .ok_or(DriverError::SourceUnavailable { span })?;

    let mut functions = parse_source(slice).map_err(|e| DriverError::MalformedSource {
        message: e.message,
        span: e.span.shift(span.start),
    })?;
    if functions.len() != 1 {
        return Err(DriverError::MalformedSource {
            message: format!("expected one definition, found {}", functions.len()),
            span,
        });
    }
    let mut func = functions.remove(0);
    func.shift_spans(span.start);

    func.name.push_str(OPTIMIZED_SUFFIX);
    func.decorators
        .retain(|decorator| decorator != FAST_PIPES_DECORATOR);

    let body = PipeRewriter::new().rewrite_block(func.body)?;

    Ok(FunctionDefinition::new(
        db,
        func.name,
        func.decorators,
        func.parameters,
        body,
        func.span,
    ))
}

/// Optimize every `@fast_pipes` function in a source file.
///
/// Rewritten definitions replace the originals in the returned program, so
/// loading it binds them under the original call names. Functions that fail
/// to optimize are kept unrewritten and the failure is reported through the
/// [`Diagnostic`] accumulator, at load time rather than first call.
#[salsa::tracked]
pub fn optimize_program<'db>(db: &'db dyn salsa::Database, source: SourceFile) -> Program<'db> {
    let program = parse_program(db, source);
    let items = program
        .items(db)
        .iter()
        .map(|item| {
            let def = match item.kind(db) {
                ItemKind::Function(def) => *def,
                _ => return *item,
            };
            if !def
                .decorators(db)
                .iter()
                .any(|decorator| decorator == FAST_PIPES_DECORATOR)
            {
                return *item;
            }
            match optimize_function(db, source, def) {
                Ok(optimized) => Item::new(db, ItemKind::Function(optimized), item.span(db)),
                Err(e) => {
                    Diagnostic {
                        message: e.to_string(),
                        span: e.span(),
                        severity: DiagnosticSeverity::Error,
                        phase: CompilationPhase::Rewriting,
                    }
                    .accumulate(db);
                    *item
                }
            }
        })
        .collect();
    Program::new(db, items)
}
