//! Tree-walking evaluation of parsed programs.

use crate::env::{EnvRef, Environment};
use crate::error::EvalError;
use crate::value::{Closure, ClosureBody, Value};
use conduit_ast::{
    binding_name, BinaryOperator, Block, Expr, ItemKind, Program, Spanned, Statement,
};
use std::rc::Rc;

/// Bind every function definition in `program` into `env`.
///
/// Definitions are bound under [`binding_name`], so a rewritten definition
/// carrying the optimizer suffix replaces the original at its call name.
pub fn load_program<'db>(db: &'db dyn salsa::Database, program: Program<'db>, env: &EnvRef) {
    for item in program.items(db) {
        let def = match item.kind(db) {
            ItemKind::Function(def) => *def,
            _ => continue,
        };
        let name = def.name(db);
        let closure = Value::Closure(Rc::new(Closure {
            name: Some(name.clone()),
            parameters: def.parameters(db).clone(),
            body: ClosureBody::Block(def.body(db).clone()),
            env: env.clone(),
        }));
        env.borrow_mut().bind(binding_name(name).to_owned(), closure);
    }
}

/// Load `program` into a fresh top-level environment and run its `main`.
pub fn eval_program<'db>(
    db: &'db dyn salsa::Database,
    program: Program<'db>,
) -> Result<Value, EvalError> {
    let env = Environment::toplevel();
    load_program(db, program, &env);
    let main = env
        .borrow()
        .lookup("main")
        .ok_or_else(|| EvalError::UnknownIdentifier {
            name: "main".to_owned(),
        })?;
    call_value(&main, &[])
}

/// Evaluate a block and return the value of its final expression statement,
/// or unit when the block ends in a binding.
pub fn eval_block(block: &Block, env: &EnvRef) -> Result<Value, EvalError> {
    let mut result = Value::Unit;
    for statement in &block.statements {
        result = match statement {
            Statement::Let(let_stmt) => {
                let value = eval_expr(&let_stmt.value, env)?;
                env.borrow_mut().bind(let_stmt.name.clone(), value);
                Value::Unit
            }
            Statement::Expression(expr) => eval_expr(expr, env)?,
        };
    }
    Ok(result)
}

pub fn eval_expr((expr, _): &Spanned<Expr>, env: &EnvRef) -> Result<Value, EvalError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::Name(name) => {
            env.borrow()
                .lookup(name)
                .ok_or_else(|| EvalError::UnknownIdentifier { name: name.clone() })
        }
        Expr::List(items) => {
            let items = items
                .iter()
                .map(|item| eval_expr(item, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        Expr::Binary(binary) => {
            let left = eval_expr(&binary.left, env)?;
            let right = eval_expr(&binary.right, env)?;
            apply_binary(binary.operator, left, right)
        }
        Expr::Call(call) => {
            let callee = eval_expr(&call.callee, env)?;
            let arguments = eval_arguments(&call.arguments, env)?;
            call_value(&callee, &arguments)
        }
        Expr::Lambda(lambda) => Ok(Value::Closure(Rc::new(Closure {
            name: None,
            parameters: lambda.parameters.clone(),
            body: ClosureBody::Expr((*lambda.body).clone()),
            env: env.clone(),
        }))),
        Expr::Spread(_) => Err(EvalError::SpreadOutsideCall),
        Expr::Bind(bind) => {
            let value = eval_expr(&bind.value, env)?;
            env.borrow_mut().bind(bind.name.clone(), value.clone());
            Ok(value)
        }
    }
}

/// Evaluate call arguments, splicing spread lists into position.
fn eval_arguments(
    arguments: &[Spanned<Expr>],
    env: &EnvRef,
) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        match &argument.0 {
            Expr::Spread(inner) => match eval_expr(inner, env)? {
                Value::List(items) => values.extend(items),
                other => {
                    return Err(EvalError::SpreadNotAList {
                        found: other.type_name(),
                    });
                }
            },
            _ => values.push(eval_expr(argument, env)?),
        }
    }
    Ok(values)
}

/// Apply a callable value to already-evaluated arguments.
pub fn call_value(callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match callee {
        Value::Closure(closure) => {
            if closure.parameters.len() != args.len() {
                return Err(EvalError::ArityMismatch {
                    name: closure.name.clone().unwrap_or_else(|| "<lambda>".to_owned()),
                    expected: closure.parameters.len(),
                    given: args.len(),
                });
            }
            let frame = Environment::child(&closure.env);
            for (parameter, value) in closure.parameters.iter().zip(args) {
                frame.borrow_mut().bind(parameter.clone(), value.clone());
            }
            match &closure.body {
                ClosureBody::Block(block) => eval_block(block, &frame),
                ClosureBody::Expr(expr) => eval_expr(expr, &frame),
            }
        }
        Value::Builtin(_, function) => function(args),
        Value::Pipeline(stages) => {
            let [seed] = args else {
                return Err(EvalError::ArityMismatch {
                    name: "<pipeline>".to_owned(),
                    expected: 1,
                    given: args.len(),
                });
            };
            let mut value = seed.clone();
            for stage in stages.iter() {
                value = call_value(stage, &[value])?;
            }
            Ok(value)
        }
        Value::Bridge(function) => {
            let [value] = args else {
                return Err(EvalError::ArityMismatch {
                    name: "<bridge>".to_owned(),
                    expected: 1,
                    given: args.len(),
                });
            };
            call_value(function, args)?;
            Ok(value.clone())
        }
        other => Err(EvalError::NotCallable {
            found: other.type_name(),
        }),
    }
}

fn apply_binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, EvalError> {
    use BinaryOperator::*;
    match operator {
        Equal => return Ok(Value::Bool(left == right)),
        NotEqual => return Ok(Value::Bool(left != right)),
        _ => {}
    }
    if let (Value::String(l), Value::String(r), Add) = (&left, &right, operator) {
        return Ok(Value::String(format!("{l}{r}")));
    }
    let (Value::Number(l), Value::Number(r)) = (&left, &right) else {
        let found = match &left {
            Value::Number(_) => right.type_name(),
            other => other.type_name(),
        };
        return Err(EvalError::TypeMismatch {
            operation: operation_name(operator),
            found,
        });
    };
    Ok(match operator {
        Add => Value::Number(l + r),
        Subtract => Value::Number(l - r),
        Multiply => Value::Number(l * r),
        Divide => {
            if *r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Value::Number(l / r)
        }
        LessThan => Value::Bool(l < r),
        GreaterThan => Value::Bool(l > r),
        LessEqual => Value::Bool(l <= r),
        GreaterEqual => Value::Bool(l >= r),
        Equal | NotEqual => unreachable!("handled above"),
    })
}

fn operation_name(operator: BinaryOperator) -> &'static str {
    use BinaryOperator::*;
    match operator {
        Add => "add",
        Subtract => "subtract",
        Multiply => "multiply",
        Divide => "divide",
        Equal | NotEqual => "compare",
        LessThan | GreaterThan | LessEqual | GreaterEqual => "order",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_ast::parse_program;
    use conduit_core::{ConduitDatabaseImpl, SourceFile, Span};
    use salsa::Database;

    fn run(text: &str) -> Result<Value, EvalError> {
        ConduitDatabaseImpl::default().attach(|db| {
            let source = SourceFile::new(db, "test.cdt".into(), text.to_owned());
            eval_program(db, parse_program(db, source))
        })
    }

    #[test]
    fn arithmetic_respects_precedence() {
        assert_eq!(run("fn main() { 1 + 2 * 3 }").unwrap(), Value::Number(7));
        assert_eq!(run("fn main() { 10 - 4 / 2 }").unwrap(), Value::Number(8));
    }

    #[test]
    fn block_value_is_the_final_expression() {
        assert_eq!(
            run("fn main() { let x = 5; x * x }").unwrap(),
            Value::Number(25)
        );
        assert_eq!(run("fn main() { let x = 5; }").unwrap(), Value::Unit);
    }

    #[test]
    fn functions_call_each_other() {
        let result = run("fn double(x) { x * 2 }\nfn main() { double(21) }").unwrap();
        assert_eq!(result, Value::Number(42));
    }

    #[test]
    fn lambdas_capture_their_defining_frame() {
        let result = run(
            "fn main() { let n = 10; let add_n = fn(x) x + n; add_n(5) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(15));
    }

    #[test]
    fn suffixed_definitions_bind_under_the_call_name() {
        // The optimizer emits definitions with a reserved suffix; loading
        // binds them at the original name.
        let result = run("fn main_fast_pipes() { 3 }").unwrap();
        assert_eq!(result, Value::Number(3));
    }

    #[test]
    fn pipe_runs_named_and_anonymous_stages() {
        let result = run(
            "fn double(x) { x * 2 }\nfn main() { pipe(2, double, fn(x) x + 1) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(5));
    }

    #[test]
    fn pipeline_value_is_reusable() {
        let result = run(
            "fn double(x) { x * 2 }\nfn main() { let quad = pipeline(double, double); quad(2) + quad(3) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(20));
    }

    #[test]
    fn bridge_returns_its_argument_unchanged() {
        let result = run(
            "fn double(x) { x * 2 }\nfn main() { pipe(5, bridge(double), fn(x) x + 2) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(7));
    }

    #[test]
    fn spread_splices_a_list_into_call_arguments() {
        let result = run(
            "fn add3(a, b, c) { a + b + c }\nfn main() { add3(...[1, 2, 3]) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(6));

        let result = run(
            "fn add3(a, b, c) { a + b + c }\nfn main() { add3(1, ...[2, 3]) }",
        )
        .unwrap();
        assert_eq!(result, Value::Number(6));
    }

    #[test]
    fn spread_of_a_non_list_fails() {
        let err = run("fn f(a) { a }\nfn main() { f(...5) }").unwrap_err();
        assert_eq!(err, EvalError::SpreadNotAList { found: "number" });
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(run("fn main() { 1 / 0 }").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn calling_a_number_fails() {
        let err = run("fn main() { 5(1) }").unwrap_err();
        assert_eq!(err, EvalError::NotCallable { found: "number" });
    }

    #[test]
    fn arity_mismatch_names_the_function() {
        let err = run("fn double(x) { x * 2 }\nfn main() { double(1, 2) }").unwrap_err();
        assert_eq!(
            err,
            EvalError::ArityMismatch {
                name: "double".to_owned(),
                expected: 1,
                given: 2,
            }
        );
    }

    #[test]
    fn unknown_identifier_fails() {
        let err = run("fn main() { missing }").unwrap_err();
        assert_eq!(
            err,
            EvalError::UnknownIdentifier {
                name: "missing".to_owned()
            }
        );
    }

    #[test]
    fn comparisons_yield_booleans() {
        assert_eq!(run("fn main() { 2 < 3 }").unwrap(), Value::Bool(true));
        assert_eq!(run("fn main() { 2 == 3 }").unwrap(), Value::Bool(false));
        assert_eq!(
            run("fn main() { \"a\" + \"b\" == \"ab\" }").unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn bind_expression_binds_in_the_current_frame() {
        let env = Environment::toplevel();
        let span = Span::new(0, 0);
        let bind = (
            Expr::Bind(conduit_ast::BindExpression {
                name: "t".into(),
                value: Box::new((Expr::Number(9), span)),
            }),
            span,
        );
        assert_eq!(eval_expr(&bind, &env).unwrap(), Value::Number(9));
        assert_eq!(env.borrow().lookup("t"), Some(Value::Number(9)));
    }
}
