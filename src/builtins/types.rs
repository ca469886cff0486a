//! Type predicates: is_num, is_str, is_list, is_func
//!
//! Each returns Number 1 or Number 0. `is_func` is true for both
//! user-defined functions and built-ins.

use crate::env::SymbolTable;
use crate::error::RuntimeError;
use crate::value::{Builtin, CallSite, Value, ValueKind};
use std::rc::Rc;

fn builtin_is_num(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    Ok(Value::truth(matches!(args[0].kind, ValueKind::Number(_))))
}

fn builtin_is_str(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    Ok(Value::truth(matches!(args[0].kind, ValueKind::Str(_))))
}

fn builtin_is_list(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    Ok(Value::truth(matches!(args[0].kind, ValueKind::List(_))))
}

fn builtin_is_func(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    Ok(Value::truth(matches!(
        args[0].kind,
        ValueKind::Function(_) | ValueKind::Builtin(_)
    )))
}

pub static IS_NUM: Builtin = Builtin {
    name: "is_num",
    params: &["value"],
    run: builtin_is_num,
};

pub static IS_STR: Builtin = Builtin {
    name: "is_str",
    params: &["value"],
    run: builtin_is_str,
};

pub static IS_LIST: Builtin = Builtin {
    name: "is_list",
    params: &["value"],
    run: builtin_is_list,
};

pub static IS_FUNC: Builtin = Builtin {
    name: "is_func",
    params: &["value"],
    run: builtin_is_func,
};

/// Register all type predicates in the symbol table.
pub fn register(env: &Rc<SymbolTable>) {
    for builtin in [&IS_NUM, &IS_STR, &IS_LIST, &IS_FUNC] {
        env.set(builtin.name, Value::builtin(builtin));
    }
}
