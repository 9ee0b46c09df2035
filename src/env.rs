// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Inserts into this frame only. Fails if `name` is already defined in
    /// this frame (spec §4.3 — shadowing a parent binding is fine, but
    /// redefining within the same frame is a runtime error).
    pub fn define(&self, name: String, value: Value) -> Result<(), RuntimeError> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(&name) {
            return Err(RuntimeError::Redefinition(name));
        }
        bindings.insert(name, value);
        Ok(())
    }

    /// Looks up a symbol in this frame and parent frames recursively.
    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone());
        }
        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }
        Err(RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Like `get`, but returns `nil` instead of failing when unbound. Used
    /// only by natives that want to probe optional bindings.
    pub fn get_or_nil(&self, name: &str) -> Value {
        self.get(name).unwrap_or(Value::Nil)
    }

    /// Finds the nearest frame (starting at this one) that defines `name`
    /// and overwrites its binding; fails if no frame defines it.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        if let Some(ref parent) = self.parent {
            return parent.assign(name, value);
        }
        Err(RuntimeError::AssignBeforeDefine(name.to_string()))
    }
}
