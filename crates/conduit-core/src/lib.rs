pub mod database;
pub mod diagnostic;
pub mod span;

pub use database::{ConduitDatabaseImpl, SourceFile};
pub use diagnostic::{CompilationPhase, Diagnostic, DiagnosticSeverity};
pub use span::{Span, Spanned};
