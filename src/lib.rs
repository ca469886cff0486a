// ABOUTME: Library module exposing the interpreter pipeline and entry point

pub mod ast;
pub mod builtins;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;
pub mod value;

use context::Context;
use env::SymbolTable;
use error::Error;
use interpreter::Flow;
use lexer::Lexer;
use parser::Parser;
use position::Source;
use std::rc::Rc;
use token::TokenKind;
use value::Value;

/// Create the shared global scope for a session: constants plus built-ins.
///
/// Hand the same table to every `run` call of one session; assignments made
/// by one program are then visible to the next.
pub fn default_globals() -> Rc<SymbolTable> {
    let globals = SymbolTable::new();
    builtins::register_builtins(&globals);
    globals
}

/// Lex, parse, and evaluate `source`, returning the final statement's value
/// or the first diagnostic.
pub fn run(file_name: &str, source: &str, globals: &Rc<SymbolTable>) -> Result<Value, Error> {
    let src = Source::new(file_name, source);
    let tokens = Lexer::new(&src).tokenize()?;

    // A blank program has nothing to evaluate.
    if tokens
        .iter()
        .all(|t| matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
    {
        return Ok(Value::none());
    }

    let root = Parser::new(tokens).parse()?;

    let ctx = Context::program(Rc::clone(globals));
    let result = match interpreter::eval(&root, &ctx)? {
        // The root node is the statement list; a program evaluates to its
        // last statement's value.
        Flow::Value(value) => match value.as_list() {
            Some(elements) => elements.borrow().last().cloned().unwrap_or_else(Value::none),
            None => value,
        },
        Flow::Return(value) => value,
        // A continue/break that escaped every loop is a no-op at top level.
        Flow::Continue | Flow::Break => Value::none(),
    };
    Ok(result)
}
