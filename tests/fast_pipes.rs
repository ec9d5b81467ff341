//! End-to-end behavior of the `@fast_pipes` optimizer: rewritten programs
//! compute the same values as unoptimized ones, and multiply-referenced
//! stage parameters evaluate their input exactly once.

mod common;

use common::{assert_same_result, eval_source};
use conduit::pipeline::compile_with_diagnostics;
use conduit::{ConduitDatabaseImpl, EvalError, SourceFile, Value};
use conduit_eval::{call_value, load_program, Environment};
use salsa::Database;
use std::cell::Cell;

#[test]
fn named_stages_agree() {
    let result = assert_same_result(
        "fn double(x) { x * 2 }\nfn inc(x) { x + 1 }\n\
         @fast_pipes\nfn main() { pipe(3, double, inc, double) }",
    );
    assert_eq!(result, Value::Number(14));
}

#[test]
fn single_use_lambda_agrees() {
    let result = assert_same_result("@fast_pipes\nfn main() { pipe(5, fn(x) x + 1) }");
    assert_eq!(result, Value::Number(6));
}

#[test]
fn multi_use_lambda_agrees() {
    let result = assert_same_result("@fast_pipes\nfn main() { pipe(5, fn(x) x + x + 1) }");
    assert_eq!(result, Value::Number(11));
}

#[test]
fn nested_pipes_agree() {
    let result = assert_same_result(
        "fn double(x) { x * 2 }\n\
         @fast_pipes\nfn main() { pipe(1, fn(x) x + pipe(2, double), double) }",
    );
    assert_eq!(result, Value::Number(10));
}

#[test]
fn lambdas_still_see_enclosing_bindings() {
    let result = assert_same_result(
        "@fast_pipes\nfn main() { let n = 100; pipe(5, fn(x) x + n) }",
    );
    assert_eq!(result, Value::Number(105));
}

#[test]
fn undecorated_functions_are_left_alone() {
    let result = assert_same_result(
        "fn helper() { pipe(1, fn(x) x + 1) }\n\
         @fast_pipes\nfn main() { pipe(helper(), fn(x) x * 10) }",
    );
    assert_eq!(result, Value::Number(20));
}

#[test]
fn optimized_call_sites_resolve_to_the_rewritten_definition() {
    // `main` calls `step` by name; the optimizer's renamed replacement must
    // be what that name resolves to.
    let result = assert_same_result(
        "@fast_pipes\nfn step(x) { pipe(x, fn(y) y + y) }\n\
         fn main() { step(4) }",
    );
    assert_eq!(result, Value::Number(8));
}

thread_local! {
    static TICKS: Cell<i64> = const { Cell::new(0) };
}

fn tick(args: &[Value]) -> Result<Value, EvalError> {
    assert!(args.is_empty(), "tick takes no arguments");
    TICKS.with(|t| t.set(t.get() + 1));
    Ok(Value::Number(5))
}

fn run_with_tick(text: &str, optimize: bool) -> Result<Value, EvalError> {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = SourceFile::new(db, "test.cdt".into(), text.to_owned());
        let result = compile_with_diagnostics(db, source, optimize);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let env = Environment::toplevel();
        env.borrow_mut().bind("tick".into(), Value::Builtin("tick", tick));
        load_program(db, result.program, &env);
        let main = env.borrow().lookup("main").expect("main is bound");
        call_value(&main, &[])
    })
}

#[test]
fn multi_use_temporary_evaluates_its_input_once() {
    let text = "@fast_pipes\nfn main() { pipe(tick(), fn(x) x + x + x) }";
    let before = TICKS.with(Cell::get);
    let result = run_with_tick(text, true).unwrap();
    assert_eq!(result, Value::Number(15));
    assert_eq!(TICKS.with(Cell::get) - before, 1, "seed effect ran more than once");
}
