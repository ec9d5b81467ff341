use crate::ast::{FunctionDefinition, Item, ItemKind, Program};
use crate::parser::parse_source;
use conduit_core::{CompilationPhase, Diagnostic, DiagnosticSeverity, SourceFile};
use salsa::Accumulator;

/// Parse a source file into a tracked [`Program`].
///
/// Parse failures are reported through the [`Diagnostic`] accumulator and
/// yield an empty program, so downstream queries always have something to
/// work with.
#[salsa::tracked]
pub fn parse_program<'db>(db: &'db dyn salsa::Database, source: SourceFile) -> Program<'db> {
    let text = source.text(db);
    let items = match parse_source(text) {
        Ok(functions) => functions
            .into_iter()
            .map(|func| {
                let span = func.span;
                let def = FunctionDefinition::new(
                    db,
                    func.name,
                    func.decorators,
                    func.parameters,
                    func.body,
                    span,
                );
                Item::new(db, ItemKind::Function(def), span)
            })
            .collect(),
        Err(e) => {
            Diagnostic {
                message: e.message,
                span: e.span,
                severity: DiagnosticSeverity::Error,
                phase: CompilationPhase::Parsing,
            }
            .accumulate(db);
            Vec::new()
        }
    };
    Program::new(db, items)
}
