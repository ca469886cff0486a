//! List operations: append, pop, extend
//!
//! All three mutate the list in place through its shared element handle, so
//! every variable bound to the same list observes the change.
//!
//! - `append`: Push a value onto the end of a list, returns `none`
//! - `pop`: Remove and return the element at an index
//! - `extend`: Push every element of one list onto another, returns `none`

use crate::env::SymbolTable;
use crate::error::RuntimeError;
use crate::value::{resolve_index, Builtin, CallSite, Value};
use std::rc::Rc;

fn builtin_append(args: &[Value], site: &CallSite) -> Result<Value, RuntimeError> {
    let Some(elements) = args[0].as_list() else {
        return Err(site.error("First arg must be list"));
    };
    elements.borrow_mut().push(args[1].clone());
    Ok(Value::none())
}

fn builtin_pop(args: &[Value], site: &CallSite) -> Result<Value, RuntimeError> {
    let Some(elements) = args[0].as_list() else {
        return Err(site.error("First arg must be list"));
    };
    let Some(index) = args[1].as_number() else {
        return Err(site.error("Second arg must be number"));
    };

    let mut elements = elements.borrow_mut();
    match resolve_index(index, elements.len()) {
        Some(idx) => Ok(elements.remove(idx)),
        None => Err(site.error("Element could not be removed because list index out of range")),
    }
}

fn builtin_extend(args: &[Value], site: &CallSite) -> Result<Value, RuntimeError> {
    let Some(target) = args[0].as_list() else {
        return Err(site.error("First arg must be list"));
    };
    let Some(source) = args[1].as_list() else {
        return Err(site.error("Second arg must be list"));
    };

    if Rc::ptr_eq(target, source) {
        let copy = source.borrow().clone();
        target.borrow_mut().extend(copy);
    } else {
        target.borrow_mut().extend(source.borrow().iter().cloned());
    }
    Ok(Value::none())
}

pub static APPEND: Builtin = Builtin {
    name: "append",
    params: &["list", "value"],
    run: builtin_append,
};

pub static POP: Builtin = Builtin {
    name: "pop",
    params: &["list", "index"],
    run: builtin_pop,
};

pub static EXTEND: Builtin = Builtin {
    name: "extend",
    params: &["listA", "listB"],
    run: builtin_extend,
};

/// Register all list builtins in the symbol table.
pub fn register(env: &Rc<SymbolTable>) {
    for builtin in [&APPEND, &POP, &EXTEND] {
        env.set(builtin.name, Value::builtin(builtin));
    }
}
