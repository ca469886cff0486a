// ABOUTME: Symbol tables mapping names to values, chained for lexical scope

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct SymbolTable {
    symbols: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<SymbolTable>>,
}

impl SymbolTable {
    /// Creates a new root table with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(SymbolTable {
            symbols: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child table chained to a parent scope.
    pub fn with_parent(parent: Rc<SymbolTable>) -> Rc<Self> {
        Rc::new(SymbolTable {
            symbols: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds a name in THIS scope (never walks the parent chain).
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.symbols.borrow_mut().insert(name.into(), value);
    }

    /// Looks up a name in this scope and parent scopes recursively.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.symbols.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }

        None
    }
}
