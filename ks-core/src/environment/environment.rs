use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::eval::prelude::RuntimeErrorType;

use super::prelude::Value;

/// One lexical scope. Scopes are shared through `Rc<RefCell<_>>` handles:
/// a child keeps its parent alive, and so does every closure created in it.
#[derive(Default)]
pub struct Environment {
    store: FxHashMap<String, Value>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(parent: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    pub fn into_shared(self) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(self))
    }

    pub fn child_of(parent: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Self::new_enclosed(parent.clone()).into_shared()
    }

    /// Binds `name` in this scope. Shadowing an outer binding is fine, a
    /// second binding in the same scope is not.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorType> {
        if self.store.contains_key(name) {
            return Err(RuntimeErrorType::Redeclaration { name: name.to_string() });
        }

        self.store.insert(name.to_string(), value);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref()
                .and_then(|parent| parent.borrow().get(name))
        }
    }

    /// Rebinds the innermost existing `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorType> {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(RuntimeErrorType::UndefinedVariable { name: name.to_string() })
        }
    }

    /// Unbinds the innermost `name`, if any scope binds it.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        match self.store.remove(name) {
            Some(value) => Some(value),
            None => self.parent.as_ref()
                .and_then(|parent| parent.borrow_mut().remove(name))
        }
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.store.keys().cloned().collect::<Vec<String>>();
        names.sort();
        names
    }
}
