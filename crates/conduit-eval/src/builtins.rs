//! Built-in functions available in every top-level environment.

use crate::env::EnvRef;
use crate::error::EvalError;
use crate::evaluator::call_value;
use crate::value::{BuiltinFn, Value};
use conduit_ast::{MAX_PIPE_STAGES, PIPE_FUNCTION};
use std::rc::Rc;

/// Name/function table, in binding order.
const BUILTINS: &[(&str, BuiltinFn)] = &[
    (PIPE_FUNCTION, pipe),
    ("pipeline", pipeline),
    ("bridge", bridge),
    ("print_line", print_line),
];

pub fn install(env: &EnvRef) {
    let mut env = env.borrow_mut();
    for &(name, function) in BUILTINS {
        env.bind(name.to_owned(), Value::Builtin(name, function));
    }
}

/// `pipe(seed, stage, ...)`: thread `seed` through each stage left to right
/// and return the final value.
fn pipe(args: &[Value]) -> Result<Value, EvalError> {
    let Some((seed, stages)) = args.split_first() else {
        return Err(EvalError::ArityMismatch {
            name: PIPE_FUNCTION.to_owned(),
            expected: 1,
            given: 0,
        });
    };
    check_stage_count(stages.len())?;
    let mut value = seed.clone();
    for stage in stages {
        value = call_value(stage, &[value])?;
    }
    Ok(value)
}

/// `pipeline(stage, ...)`: package the stages into a callable that pipes its
/// single argument through them.
fn pipeline(args: &[Value]) -> Result<Value, EvalError> {
    check_stage_count(args.len())?;
    Ok(Value::Pipeline(Rc::new(args.to_vec())))
}

/// `bridge(f)`: wrap `f` so calling the wrapper runs `f` for its effect and
/// returns the wrapper's argument unchanged.
fn bridge(args: &[Value]) -> Result<Value, EvalError> {
    let [function] = args else {
        return Err(EvalError::ArityMismatch {
            name: "bridge".to_owned(),
            expected: 1,
            given: args.len(),
        });
    };
    Ok(Value::Bridge(Rc::new(function.clone())))
}

fn print_line(args: &[Value]) -> Result<Value, EvalError> {
    let [value] = args else {
        return Err(EvalError::ArityMismatch {
            name: "print_line".to_owned(),
            expected: 1,
            given: args.len(),
        });
    };
    println!("{value}");
    Ok(Value::Unit)
}

fn check_stage_count(given: usize) -> Result<(), EvalError> {
    if given > MAX_PIPE_STAGES {
        return Err(EvalError::TooManyStages {
            given,
            max: MAX_PIPE_STAGES,
        });
    }
    Ok(())
}
