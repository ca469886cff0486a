use crate::env::SymbolTable;
use crate::position::Span;
use std::rc::Rc;

/// One frame of the dynamic call stack. The `parent` chain leads back to the
/// program root and drives traceback rendering; lexical scoping lives in the
/// symbol-table chain, which is threaded separately.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry_pos: Option<Span>,
    pub symbols: Rc<SymbolTable>,
}

impl Context {
    /// The root frame of a program run.
    pub fn program(symbols: Rc<SymbolTable>) -> Rc<Self> {
        Rc::new(Context {
            display_name: "<program>".into(),
            parent: None,
            parent_entry_pos: None,
            symbols,
        })
    }

    /// A frame entered by calling `name` from `caller` at `call_site`.
    pub fn frame(
        name: &str,
        caller: &Rc<Context>,
        call_site: Span,
        symbols: Rc<SymbolTable>,
    ) -> Rc<Self> {
        Rc::new(Context {
            display_name: name.into(),
            parent: Some(Rc::clone(caller)),
            parent_entry_pos: Some(call_site),
            symbols,
        })
    }
}
