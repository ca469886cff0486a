// ABOUTME: Tree-walking evaluator dispatching on AST node variants

use crate::ast::{ElseCase, IfCase, Node, NodeKind};
use crate::context::Context;
use crate::env::SymbolTable;
use crate::error::RuntimeError;
use crate::position::Span;
use crate::value::{CallSite, FuncData, Value, ValueKind};
use std::rc::Rc;

/// Outcome of evaluating one node. Errors travel in the surrounding
/// `Result`; everything else that unwinds (return/continue/break) is a
/// `Flow` variant that callers either consume or pass upward.
#[derive(Debug)]
pub enum Flow {
    Value(Value),
    Return(Value),
    Continue,
    Break,
}

pub type EvalResult = Result<Flow, RuntimeError>;

/// Unwrap a plain value; re-raise any propagating outcome to the caller.
macro_rules! propagate {
    ($outcome:expr) => {
        match $outcome? {
            Flow::Value(value) => value,
            flow => return Ok(flow),
        }
    };
}

pub fn eval(node: &Node, ctx: &Rc<Context>) -> EvalResult {
    match &node.kind {
        NodeKind::Number(n) => Ok(Flow::Value(
            Value::number(*n).with_span(node.span.clone()),
        )),

        NodeKind::Str(s) => Ok(Flow::Value(
            Value::string(s.clone()).with_span(node.span.clone()),
        )),

        NodeKind::List(elements) => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                values.push(propagate!(eval(element, ctx)));
            }
            Ok(Flow::Value(
                Value::list(values).with_span(node.span.clone()),
            ))
        }

        NodeKind::VarAccess(name) => match ctx.symbols.get(name) {
            // The clone is shallow; re-stamping the span here makes later
            // diagnostics point at this access site.
            Some(value) => Ok(Flow::Value(value.with_span(node.span.clone()))),
            None => Err(RuntimeError::new(
                node.span.clone(),
                format!("'{name}' is not defined"),
                Rc::clone(ctx),
            )),
        },

        NodeKind::VarAssign { name, value } => {
            let value = propagate!(eval(value, ctx));
            ctx.symbols.set(name.clone(), value.clone());
            Ok(Flow::Value(value))
        }

        NodeKind::BinOp { op, left, right } => {
            let lhs = propagate!(eval(left, ctx));
            let rhs = propagate!(eval(right, ctx));
            let result = lhs
                .binary_op(*op, &rhs)
                .map_err(|e| RuntimeError::new(node.span.clone(), e.to_string(), Rc::clone(ctx)))?;
            Ok(Flow::Value(result.with_span(node.span.clone())))
        }

        NodeKind::UnaryOp { op, operand } => {
            let value = propagate!(eval(operand, ctx));
            let result = value
                .unary_op(*op)
                .map_err(|e| RuntimeError::new(node.span.clone(), e.to_string(), Rc::clone(ctx)))?;
            Ok(Flow::Value(result.with_span(node.span.clone())))
        }

        NodeKind::If { cases, else_case } => eval_if(cases, else_case, ctx),

        NodeKind::For {
            var,
            start,
            end,
            step,
            body,
            block,
        } => eval_for(node, var, start, end, step.as_deref(), body, *block, ctx),

        NodeKind::While {
            condition,
            body,
            block,
        } => eval_while(node, condition, body, *block, ctx),

        NodeKind::FuncDef {
            name,
            params,
            body,
            auto_return,
        } => {
            let func = Value {
                kind: ValueKind::Function(Rc::new(FuncData {
                    name: name.clone(),
                    params: params.clone(),
                    body: (**body).clone(),
                    auto_return: *auto_return,
                    env: Rc::clone(&ctx.symbols),
                })),
                span: Some(node.span.clone()),
            };
            if let Some(name) = name {
                ctx.symbols.set(name.clone(), func.clone());
            }
            Ok(Flow::Value(func))
        }

        NodeKind::Call { callee, args } => {
            let target = propagate!(eval(callee, ctx));
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                arg_values.push(propagate!(eval(arg, ctx)));
            }
            let result = propagate!(call_value(&target, arg_values, &node.span, ctx));
            Ok(Flow::Value(result.with_span(node.span.clone())))
        }

        NodeKind::Return(value) => {
            let value = match value {
                Some(node) => propagate!(eval(node, ctx)),
                None => Value::none(),
            };
            Ok(Flow::Return(value))
        }

        NodeKind::Continue => Ok(Flow::Continue),

        NodeKind::Break => Ok(Flow::Break),
    }
}

fn eval_if(cases: &[IfCase], else_case: &Option<Box<ElseCase>>, ctx: &Rc<Context>) -> EvalResult {
    for case in cases {
        let condition = propagate!(eval(&case.condition, ctx));
        if condition.is_true() {
            let value = propagate!(eval(&case.body, ctx));
            return Ok(Flow::Value(if case.block { Value::none() } else { value }));
        }
    }

    if let Some(else_case) = else_case {
        let value = propagate!(eval(&else_case.body, ctx));
        return Ok(Flow::Value(if else_case.block {
            Value::none()
        } else {
            value
        }));
    }

    Ok(Flow::Value(Value::none()))
}

#[allow(clippy::too_many_arguments)]
fn eval_for(
    node: &Node,
    var: &str,
    start: &Node,
    end: &Node,
    step: Option<&Node>,
    body: &Node,
    block: bool,
    ctx: &Rc<Context>,
) -> EvalResult {
    let start_value = number_operand(propagate!(eval(start, ctx)), start, ctx)?;
    let end_value = number_operand(propagate!(eval(end, ctx)), end, ctx)?;
    let step_value = match step {
        Some(step) => number_operand(propagate!(eval(step, ctx)), step, ctx)?,
        None => 1.0,
    };

    let mut values = Vec::new();
    let mut i = start_value;

    loop {
        // The end bound is exclusive in both directions.
        let keep_going = if step_value >= 0.0 {
            i < end_value
        } else {
            i > end_value
        };
        if !keep_going {
            break;
        }

        ctx.symbols.set(var.to_string(), Value::number(i));
        i += step_value;

        match eval(body, ctx)? {
            Flow::Value(value) => values.push(value),
            Flow::Continue => continue,
            Flow::Break => break,
            flow @ Flow::Return(_) => return Ok(flow),
        }
    }

    Ok(Flow::Value(if block {
        Value::none()
    } else {
        Value::list(values).with_span(node.span.clone())
    }))
}

fn eval_while(
    node: &Node,
    condition: &Node,
    body: &Node,
    block: bool,
    ctx: &Rc<Context>,
) -> EvalResult {
    let mut values = Vec::new();

    loop {
        let condition_value = propagate!(eval(condition, ctx));
        if !condition_value.is_true() {
            break;
        }

        match eval(body, ctx)? {
            Flow::Value(value) => values.push(value),
            Flow::Continue => {}
            Flow::Break => break,
            flow @ Flow::Return(_) => return Ok(flow),
        }
    }

    Ok(Flow::Value(if block {
        Value::none()
    } else {
        Value::list(values).with_span(node.span.clone())
    }))
}

fn number_operand(value: Value, node: &Node, ctx: &Rc<Context>) -> Result<f64, RuntimeError> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::new(node.span.clone(), "Illegal operation", Rc::clone(ctx)))
}

/// Invoke a callable value: arity check, fresh frame, body dispatch.
///
/// The new frame's symbol table chains to the function's *defining* scope
/// (lexical), while its context chains to the *caller* (dynamic, for the
/// traceback). A continue/break escaping the body is re-raised, not
/// consumed; only an enclosing loop consumes those.
pub fn call_value(
    target: &Value,
    args: Vec<Value>,
    call_span: &Span,
    caller: &Rc<Context>,
) -> EvalResult {
    match &target.kind {
        ValueKind::Function(func) => {
            check_arity(
                func.display_name(),
                func.params.len(),
                args.len(),
                call_span,
                caller,
            )?;

            let exec_env = SymbolTable::with_parent(Rc::clone(&func.env));
            let exec_ctx = Context::frame(
                func.display_name(),
                caller,
                call_span.clone(),
                Rc::clone(&exec_env),
            );
            for (param, arg) in func.params.iter().zip(args) {
                exec_env.set(param.clone(), arg);
            }

            match eval(&func.body, &exec_ctx)? {
                Flow::Value(value) if func.auto_return => Ok(Flow::Value(value)),
                Flow::Return(value) => Ok(Flow::Value(value)),
                Flow::Value(_) => Ok(Flow::Value(Value::none())),
                flow => Ok(flow),
            }
        }

        ValueKind::Builtin(builtin) => {
            check_arity(builtin.name, builtin.params.len(), args.len(), call_span, caller)?;

            let exec_env = SymbolTable::with_parent(Rc::clone(&caller.symbols));
            let exec_ctx = Context::frame(
                builtin.name,
                caller,
                call_span.clone(),
                Rc::clone(&exec_env),
            );
            for (param, arg) in builtin.params.iter().zip(args.iter()) {
                exec_env.set((*param).to_string(), arg.clone());
            }

            let site = CallSite {
                span: call_span.clone(),
                context: exec_ctx,
            };
            Ok(Flow::Value((builtin.run)(&args, &site)?))
        }

        _ => Err(RuntimeError::new(
            call_span.clone(),
            "Illegal operation",
            Rc::clone(caller),
        )),
    }
}

fn check_arity(
    name: &str,
    expected: usize,
    got: usize,
    span: &Span,
    ctx: &Rc<Context>,
) -> Result<(), RuntimeError> {
    if got > expected {
        return Err(RuntimeError::new(
            span.clone(),
            format!("{} too many args passed into '{name}'", got - expected),
            Rc::clone(ctx),
        ));
    }
    if got < expected {
        return Err(RuntimeError::new(
            span.clone(),
            format!("{} too few args passed into '{name}'", expected - got),
            Rc::clone(ctx),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::position::Source;

    fn program_ctx() -> Rc<Context> {
        let globals = SymbolTable::new();
        register_builtins(&globals);
        Context::program(globals)
    }

    fn eval_src(source: &str, ctx: &Rc<Context>) -> EvalResult {
        let src = Source::new("<test>", source);
        let tokens = Lexer::new(&src).tokenize().expect("lexing should succeed");
        let root = Parser::new(tokens).parse().expect("parsing should succeed");
        eval(&root, ctx)
    }

    /// Evaluate a program and take its final statement's value.
    fn last_value(source: &str, ctx: &Rc<Context>) -> Value {
        match eval_src(source, ctx).expect("evaluation should succeed") {
            Flow::Value(value) => {
                let list = value.as_list().expect("the root evaluates to a statement list");
                let elements = list.borrow();
                elements.last().cloned().expect("at least one statement")
            }
            other => panic!("expected a value, got {other:?}"),
        }
    }

    #[test]
    fn test_literal_nodes() {
        let ctx = program_ctx();
        assert_eq!(last_value("42", &ctx).as_number(), Some(42.0));
        assert_eq!(last_value("\"hi\"", &ctx).as_str(), Some("hi"));
        assert_eq!(
            last_value("[1, 2]", &ctx).as_list().map(|l| l.borrow().len()),
            Some(2)
        );
    }

    #[test]
    fn test_assignment_yields_the_assigned_value() {
        let ctx = program_ctx();
        assert_eq!(last_value("var x = 9", &ctx).as_number(), Some(9.0));
        assert_eq!(last_value("x", &ctx).as_number(), Some(9.0));
    }

    #[test]
    fn test_undefined_variable_is_a_runtime_error() {
        let err = eval_src("missing", &program_ctx()).expect_err("lookup should fail");
        assert_eq!(err.details, "'missing' is not defined");
    }

    #[test]
    fn test_values_carry_the_access_site_span() {
        let ctx = program_ctx();
        let value = last_value("var x = 5\nx", &ctx);
        let span = value.span.expect("accessed values carry a span");
        assert_eq!(span.start.line, 1);
    }

    #[test]
    fn test_stray_flow_reaches_the_root() {
        let ctx = program_ctx();
        assert!(matches!(eval_src("continue", &ctx), Ok(Flow::Continue)));
        assert!(matches!(eval_src("break", &ctx), Ok(Flow::Break)));
        assert!(matches!(eval_src("return 5", &ctx), Ok(Flow::Return(_))));
    }

    #[test]
    fn test_continue_from_a_call_skips_the_iteration() {
        let ctx = program_ctx();
        eval_src("var log = []", &ctx).expect("setup should evaluate");
        eval_src("func f()\nappend(log, i)\ncontinue\nend", &ctx).expect("definition");

        let collected = last_value("for i = 0 to 3 then f()", &ctx);
        // Every iteration ran, but continue kept its value out of the list.
        assert_eq!(collected.as_list().map(|l| l.borrow().len()), Some(0));
        let log = last_value("log", &ctx);
        assert_eq!(log.as_list().map(|l| l.borrow().len()), Some(3));
    }

    #[test]
    fn test_break_from_a_call_ends_the_loop() {
        let ctx = program_ctx();
        eval_src("var log = []", &ctx).expect("setup should evaluate");
        eval_src("func f()\nappend(log, i)\nbreak\nend", &ctx).expect("definition");

        eval_src("for i = 0 to 9 then f()", &ctx).expect("loop should evaluate");
        let log = last_value("log", &ctx);
        assert_eq!(log.as_list().map(|l| l.borrow().len()), Some(1));
    }

    #[test]
    fn test_scoping_is_lexical_not_dynamic() {
        let ctx = program_ctx();
        eval_src("func g() -> hidden", &ctx).expect("definition");
        let err = eval_src("func h()\nvar hidden = 5\nreturn g()\nend\nh()", &ctx)
            .expect_err("g must not see h's locals");
        assert_eq!(err.details, "'hidden' is not defined");
    }

    #[test]
    fn test_loop_variable_lands_in_the_current_frame() {
        let ctx = program_ctx();
        eval_src("for i = 0 to 3 then i", &ctx).expect("loop should evaluate");
        assert_eq!(last_value("i", &ctx).as_number(), Some(2.0));
    }

    #[test]
    fn test_calling_a_number_is_illegal() {
        let err = eval_src("3(4)", &program_ctx()).expect_err("numbers are not callable");
        assert_eq!(err.details, "Illegal operation");
    }
}
