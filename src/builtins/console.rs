//! Console I/O operations: print, print_return, input, input_int, clear
//!
//! - `print`: Output value with trailing newline, returns `none`
//! - `print_return`: Stringify a value instead of printing it
//! - `input`: Read one line from stdin as a string
//! - `input_int`: Read lines until one parses as an integer
//! - `clear` / `cls`: Clear the terminal

use crate::env::SymbolTable;
use crate::error::RuntimeError;
use crate::value::{Builtin, CallSite, Value, ValueKind};
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Prints a value to stdout with a newline. Returns `none`.
fn builtin_print(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    println!("{}", args[0]);
    Ok(Value::none())
}

/// The printable form of a value, as a string. Strings come back unchanged.
fn builtin_print_return(args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    match &args[0].kind {
        ValueKind::Str(_) => Ok(args[0].clone()),
        _ => Ok(Value::string(args[0].to_string())),
    }
}

/// Reads one line from stdin. Returns a string without the line ending.
fn builtin_input(_args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    Ok(Value::string(read_line().unwrap_or_default()))
}

/// Reads lines from stdin until one parses as a decimal integer.
fn builtin_input_int(_args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    loop {
        let Some(text) = read_line() else {
            // Stdin is closed; there is no integer coming.
            return Ok(Value::none());
        };
        match text.trim().parse::<i64>() {
            Ok(n) => return Ok(Value::number(n as f64)),
            Err(_) => println!("'{text}' must be an integer."),
        }
    }
}

/// Clears the terminal with the ANSI clear-screen sequence. Returns `none`.
fn builtin_clear(_args: &[Value], _site: &CallSite) -> Result<Value, RuntimeError> {
    print!("\x1B[2J\x1B[H");
    let _ = io::stdout().flush();
    Ok(Value::none())
}

/// One line from stdin without its ending, or None once stdin is closed.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
    }
}

pub static PRINT: Builtin = Builtin {
    name: "print",
    params: &["value"],
    run: builtin_print,
};

pub static PRINT_RETURN: Builtin = Builtin {
    name: "print_return",
    params: &["value"],
    run: builtin_print_return,
};

pub static INPUT: Builtin = Builtin {
    name: "input",
    params: &[],
    run: builtin_input,
};

pub static INPUT_INT: Builtin = Builtin {
    name: "input_int",
    params: &[],
    run: builtin_input_int,
};

pub static CLEAR: Builtin = Builtin {
    name: "clear",
    params: &[],
    run: builtin_clear,
};

/// Register all console I/O builtins in the symbol table.
pub fn register(env: &Rc<SymbolTable>) {
    for builtin in [&PRINT, &PRINT_RETURN, &INPUT, &INPUT_INT, &CLEAR] {
        env.set(builtin.name, Value::builtin(builtin));
    }
    // Alias kept for habit's sake.
    env.set("cls", Value::builtin(&CLEAR));
}
