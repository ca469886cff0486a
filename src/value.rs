// ABOUTME: Runtime value types and the operations defined between them

use crate::ast::{BinaryOp, Node, UnaryOp};
use crate::context::Context;
use crate::env::SymbolTable;
use crate::error::RuntimeError;
use crate::position::Span;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    /// Where this value was produced or last accessed; stamped by the
    /// evaluator so diagnostics point at the use site.
    pub span: Option<Span>,
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Number(f64),
    Str(String),
    /// The element sequence is shared by handle: cloning a list value
    /// aliases it, and the mutating built-ins depend on that.
    List(Rc<RefCell<Vec<Value>>>),
    Function(Rc<FuncData>),
    Builtin(&'static Builtin),
}

/// A user-defined function: its body plus the scope it closed over.
#[derive(Debug)]
pub struct FuncData {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Node,
    /// True for `func(x) -> expr` forms, whose body value is the return
    /// value without an explicit `return`.
    pub auto_return: bool,
    pub env: Rc<SymbolTable>,
}

impl FuncData {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// A host-implemented function with a declared parameter list.
pub struct Builtin {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub run: fn(&[Value], &CallSite) -> Result<Value, RuntimeError>,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// Where and under which frame a built-in was invoked. Built-ins use this to
/// anchor their own runtime errors.
pub struct CallSite {
    pub span: Span,
    pub context: Rc<Context>,
}

impl CallSite {
    pub fn error(&self, details: impl Into<String>) -> RuntimeError {
        RuntimeError::new(self.span.clone(), details, Rc::clone(&self.context))
    }
}

/// Failure of a value operation. The evaluator attaches the span and frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OpError {
    #[error("Illegal operation")]
    Illegal,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Element at this index could not be removed from list because list index out of range")]
    RemoveIndex,

    #[error("Element at this index could not be accessed because list index out of range")]
    AccessIndex,
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value {
            kind: ValueKind::Number(n),
            span: None,
        }
    }

    /// The `none` sentinel is Number 0.
    pub fn none() -> Self {
        Value::number(0.0)
    }

    pub fn truth(b: bool) -> Self {
        Value::number(if b { 1.0 } else { 0.0 })
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value {
            kind: ValueKind::Str(s.into()),
            span: None,
        }
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value {
            kind: ValueKind::List(Rc::new(RefCell::new(elements))),
            span: None,
        }
    }

    pub fn builtin(builtin: &'static Builtin) -> Self {
        Value {
            kind: ValueKind::Builtin(builtin),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<RefCell<Vec<Value>>>> {
        match &self.kind {
            ValueKind::List(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::Str(s) => !s.is_empty(),
            ValueKind::List(elements) => !elements.borrow().is_empty(),
            ValueKind::Function(_) | ValueKind::Builtin(_) => true,
        }
    }

    /// Like Display, except strings come out quoted. List elements render
    /// with this form.
    pub fn repr(&self) -> String {
        match &self.kind {
            ValueKind::Str(s) => format!("\"{s}\""),
            _ => self.to_string(),
        }
    }

    pub fn binary_op(&self, op: BinaryOp, rhs: &Value) -> Result<Value, OpError> {
        use BinaryOp::*;

        match (&self.kind, &rhs.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                let n = match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div => {
                        if *b == 0.0 {
                            return Err(OpError::DivisionByZero);
                        }
                        a / b
                    }
                    // Powers truncate to an integer result.
                    Pow => a.powf(*b).trunc(),
                    Eq => ((a == b) as i64) as f64,
                    Ne => ((a != b) as i64) as f64,
                    Lt => ((a < b) as i64) as f64,
                    Gt => ((a > b) as i64) as f64,
                    Lte => ((a <= b) as i64) as f64,
                    Gte => ((a >= b) as i64) as f64,
                    // Short-circuit semantics: the surviving operand comes
                    // through unchanged.
                    And => {
                        if *a == 0.0 {
                            *a
                        } else {
                            *b
                        }
                    }
                    Or => {
                        if *a != 0.0 {
                            *a
                        } else {
                            *b
                        }
                    }
                };
                Ok(Value::number(n))
            }

            (ValueKind::Str(a), ValueKind::Str(b)) if op == Add => {
                Ok(Value::string(format!("{a}{b}")))
            }

            (ValueKind::Str(a), ValueKind::Number(n)) if op == Mul => {
                let count = if *n < 0.0 { 0 } else { n.trunc() as usize };
                Ok(Value::string(a.repeat(count)))
            }

            // List arithmetic mutates the shared element sequence; the
            // "new" value is another handle to the same list.
            (ValueKind::List(elements), _) if op == Add => {
                elements.borrow_mut().push(rhs.clone());
                Ok(Value {
                    kind: ValueKind::List(Rc::clone(elements)),
                    span: None,
                })
            }

            (ValueKind::List(a), ValueKind::List(b)) if op == Mul => {
                if Rc::ptr_eq(a, b) {
                    let copy = b.borrow().clone();
                    a.borrow_mut().extend(copy);
                } else {
                    a.borrow_mut().extend(b.borrow().iter().cloned());
                }
                Ok(Value {
                    kind: ValueKind::List(Rc::clone(a)),
                    span: None,
                })
            }

            (ValueKind::List(elements), ValueKind::Number(n)) if op == Sub => {
                let mut elements_mut = elements.borrow_mut();
                let idx = resolve_index(*n, elements_mut.len()).ok_or(OpError::RemoveIndex)?;
                elements_mut.remove(idx);
                drop(elements_mut);
                Ok(Value {
                    kind: ValueKind::List(Rc::clone(elements)),
                    span: None,
                })
            }

            (ValueKind::List(elements), ValueKind::Number(n)) if op == Div => {
                let elements = elements.borrow();
                let idx = resolve_index(*n, elements.len()).ok_or(OpError::AccessIndex)?;
                Ok(elements[idx].clone())
            }

            _ => Err(OpError::Illegal),
        }
    }

    pub fn unary_op(&self, op: UnaryOp) -> Result<Value, OpError> {
        match (op, &self.kind) {
            (UnaryOp::Pos, _) => Ok(self.clone()),
            (UnaryOp::Neg, ValueKind::Number(n)) => Ok(Value::number(-n)),
            (UnaryOp::Not, ValueKind::Number(n)) => Ok(Value::truth(*n == 0.0)),
            _ => Err(OpError::Illegal),
        }
    }
}

/// Resolve a (possibly negative) numeric index into `0..len`. Fractional
/// indices never resolve.
pub(crate) fn resolve_index(n: f64, len: usize) -> Option<usize> {
    if n.fract() != 0.0 {
        return None;
    }
    let mut i = n as i64;
    if i < 0 {
        i += len as i64;
    }
    if i < 0 || i as usize >= len {
        None
    } else {
        Some(i as usize)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => {
                // Fractionless values display integrally.
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            ValueKind::Str(s) => write!(f, "{s}"),
            ValueKind::List(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element.repr())?;
                }
                write!(f, "]")
            }
            ValueKind::Function(func) => write!(f, "<function {}>", func.display_name()),
            ValueKind::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name),
        }
    }
}
