//! Lexically scoped environments.
//!
//! Frames are shared through `Rc<RefCell<..>>` so closures can capture their
//! defining frame and later calls can observe bindings made after capture.

use crate::builtins;
use crate::value::Value;
use conduit_ast::Identifier;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    bindings: HashMap<Identifier, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Fresh top-level frame with every builtin installed.
    pub fn toplevel() -> EnvRef {
        let env = Rc::new(RefCell::new(Environment::default()));
        builtins::install(&env);
        env
    }

    /// New frame whose lookups fall through to `parent`.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn bind(&mut self, name: Identifier, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.borrow().lookup(name))
    }
}
