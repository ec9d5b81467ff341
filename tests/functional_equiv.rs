//! The pipe builtin is a left fold: `pipe(x, f, g)` is `g(f(x))` for every
//! stage count up to the fixed maximum.

mod common;

use common::eval_source;
use conduit::{EvalError, Value};

const MAX_STAGES: usize = 20;

fn program_with_stages(count: usize) -> String {
    let stages = vec!["inc"; count].join(", ");
    let comma = if count == 0 { "" } else { ", " };
    format!("fn inc(x) {{ x + 1 }}\nfn main() {{ pipe(0{comma}{stages}) }}")
}

#[test]
fn pipe_is_a_left_fold_for_every_stage_count() {
    for count in 0..=MAX_STAGES {
        let result = eval_source(&program_with_stages(count), false).unwrap();
        assert_eq!(result, Value::Number(count as i64), "at {count} stages");
    }
}

#[test]
fn one_stage_past_the_maximum_fails() {
    let err = eval_source(&program_with_stages(MAX_STAGES + 1), false).unwrap_err();
    assert_eq!(
        err,
        EvalError::TooManyStages {
            given: MAX_STAGES + 1,
            max: MAX_STAGES,
        }
    );
}

#[test]
fn pipe_without_a_seed_is_an_arity_error() {
    let err = eval_source("fn main() { pipe() }", false).unwrap_err();
    assert!(matches!(err, EvalError::ArityMismatch { .. }));
}

#[test]
fn stage_order_is_left_to_right() {
    let result = eval_source(
        "fn double(x) { x * 2 }\nfn inc(x) { x + 1 }\nfn main() { pipe(3, double, inc) }",
        false,
    )
    .unwrap();
    // inc(double(3)), not double(inc(3))
    assert_eq!(result, Value::Number(7));
}

#[test]
fn pipeline_matches_pipe_over_the_same_stages() {
    let result = eval_source(
        "fn double(x) { x * 2 }\nfn inc(x) { x + 1 }\n\
         fn main() { let p = pipeline(double, inc); p(3) == pipe(3, double, inc) }",
        false,
    )
    .unwrap();
    assert_eq!(result, Value::Bool(true));
}
