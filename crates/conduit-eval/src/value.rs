//! Runtime values.

use crate::env::EnvRef;
use crate::error::EvalError;
use conduit_ast::{Block, Expr, Identifier, Spanned};
use std::fmt;
use std::rc::Rc;

/// Native function installed in the top-level environment.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

#[derive(Clone)]
pub enum Value {
    Unit,
    Number(i64),
    Bool(bool),
    String(String),
    List(Vec<Value>),
    Closure(Rc<Closure>),
    Builtin(&'static str, BuiltinFn),
    /// Composed stage sequence produced by `pipeline(...)`. Calling it with
    /// one argument threads the argument through every stage in order.
    Pipeline(Rc<Vec<Value>>),
    /// Side-effect wrapper produced by `bridge(f)`. Calling it invokes `f`,
    /// discards the result, and returns the argument unchanged.
    Bridge(Rc<Value>),
}

/// A user function or lambda together with its captured environment.
pub struct Closure {
    pub name: Option<Identifier>,
    pub parameters: Vec<Identifier>,
    pub body: ClosureBody,
    pub env: EnvRef,
}

pub enum ClosureBody {
    Block(Block),
    Expr(Spanned<Expr>),
}

impl Value {
    /// Short noun used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Closure(_) => "function",
            Value::Builtin(..) => "builtin",
            Value::Pipeline(_) => "pipeline",
            Value::Bridge(_) => "bridge",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Closure(closure) => match &closure.name {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<lambda>"),
            },
            Value::Builtin(name, _) => write!(f, "<builtin {name}>"),
            Value::Pipeline(stages) => write!(f, "<pipeline of {} stages>", stages.len()),
            Value::Bridge(_) => write!(f, "<bridge>"),
        }
    }
}

// Closure environments form reference cycles with their enclosing frames, so
// the derived Debug would recurse without bound.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Closure(closure) => write!(
                f,
                "Closure({})",
                closure.name.as_deref().unwrap_or("<lambda>")
            ),
            Value::Builtin(name, _) => write!(f, "Builtin({name})"),
            Value::Pipeline(stages) => write!(f, "Pipeline({} stages)", stages.len()),
            Value::Bridge(inner) => write!(f, "Bridge({inner:?})"),
        }
    }
}

// Data values compare structurally; function-like values compare by
// identity, never by contents.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(_, a), Value::Builtin(_, b)) => std::ptr::fn_addr_eq(*a, *b),
            (Value::Pipeline(a), Value::Pipeline(b)) => Rc::ptr_eq(a, b),
            (Value::Bridge(a), Value::Bridge(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
