#![allow(dead_code)]

use conduit::pipeline::{compile_with_diagnostics, run};
use conduit::{ConduitDatabaseImpl, Diagnostic, EvalError, SourceFile, Value};
use salsa::Database;

/// Compile and run a program's `main`, optionally through the optimizer.
pub fn eval_source(text: &str, optimize: bool) -> Result<Value, EvalError> {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = SourceFile::new(db, "test.cdt".into(), text.to_owned());
        run(db, source, optimize)
    })
}

/// Diagnostics accumulated while compiling with the optimizer on.
pub fn diagnostics_for(text: &str) -> Vec<Diagnostic> {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = SourceFile::new(db, "test.cdt".into(), text.to_owned());
        compile_with_diagnostics(db, source, true).diagnostics
    })
}

/// Run `main` both optimized and unoptimized, assert the results agree, and
/// return the shared value.
pub fn assert_same_result(text: &str) -> Value {
    let optimized = eval_source(text, true).expect("optimized run failed");
    let plain = eval_source(text, false).expect("unoptimized run failed");
    assert_eq!(
        optimized, plain,
        "optimized and unoptimized runs disagree for:\n{text}"
    );
    optimized
}
