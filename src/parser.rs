// ABOUTME: Recursive-descent parser building an AST from the token stream

use crate::ast::{BinaryOp, ElseCase, IfCase, Node, NodeKind, UnaryOp};
use crate::error::Error;
use crate::position::Span;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    /// `tokens` must be lexer output, i.e. terminated by an Eof token.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, idx: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.idx]
    }

    fn advance(&mut self) {
        if self.idx + 1 < self.tokens.len() {
            self.idx += 1;
        }
    }

    /// Span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        self.tokens[self.idx.saturating_sub(1)].span.clone()
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn syntax_error(&self, details: impl Into<String>) -> Error {
        Error::invalid_syntax(self.current().span.clone(), details)
    }

    pub fn parse(mut self) -> Result<Node, Error> {
        let root = self.statements()?;
        if !self.at(&TokenKind::Eof) {
            return Err(self.syntax_error("Expected '+', '-', '*', or '/'"));
        }
        Ok(root)
    }

    /// NEWLINE* statement (NEWLINE+ statement)* NEWLINE*
    ///
    /// The trailing statements are parsed speculatively: a failure after a
    /// newline run rewinds the cursor and ends the block, which is what lets
    /// a block close with trailing newlines before `end`.
    fn statements(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        let mut statements = Vec::new();

        while self.at(&TokenKind::Newline) {
            self.advance();
        }

        statements.push(self.statement()?);

        loop {
            let mut newlines = 0;
            while self.at(&TokenKind::Newline) {
                self.advance();
                newlines += 1;
            }
            if newlines == 0 {
                break;
            }

            let snapshot = self.idx;
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(_) => {
                    self.idx = snapshot;
                    break;
                }
            }
        }

        let span = start_span.to(&self.current().span);
        Ok(Node {
            kind: NodeKind::List(statements),
            span,
        })
    }

    fn statement(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();

        if self.current().is_keyword("return") {
            self.advance();

            // The return value is optional; rewind if no expression follows.
            let snapshot = self.idx;
            let value = match self.expr() {
                Ok(node) => Some(Box::new(node)),
                Err(_) => {
                    self.idx = snapshot;
                    None
                }
            };
            let span = start_span.to(&self.prev_span());
            return Ok(Node {
                kind: NodeKind::Return(value),
                span,
            });
        }

        if self.current().is_keyword("continue") {
            self.advance();
            return Ok(Node {
                kind: NodeKind::Continue,
                span: start_span.to(&self.prev_span()),
            });
        }

        if self.current().is_keyword("break") {
            self.advance();
            return Ok(Node {
                kind: NodeKind::Break,
                span: start_span.to(&self.prev_span()),
            });
        }

        let before = self.idx;
        match self.expr() {
            Ok(node) => Ok(node),
            // A sub-parse that consumed nothing gets the generic expected-set
            // message; one that got partway keeps its deeper error.
            Err(_) if self.idx == before => Err(self.syntax_error(
                "Expected 'return', 'continue', 'break', 'var', 'if', 'for', 'while', 'func', \
                 int, float, identifier, '+', '-' or '(', '[' or 'not'",
            )),
            Err(err) => Err(err),
        }
    }

    fn expr(&mut self) -> Result<Node, Error> {
        if self.current().is_keyword("var") {
            let start_span = self.current().span.clone();
            self.advance();

            let name = match &self.current().kind {
                TokenKind::Identifier(name) => name.clone(),
                _ => return Err(self.syntax_error("Expected identifier")),
            };
            self.advance();

            if !self.at(&TokenKind::Eq) {
                return Err(self.syntax_error("Expected '='"));
            }
            self.advance();

            let value = self.expr()?;
            let span = start_span.to(&value.span);
            return Ok(Node {
                kind: NodeKind::VarAssign {
                    name,
                    value: Box::new(value),
                },
                span,
            });
        }

        let before = self.idx;
        let result = self.bin_op(Self::comp_expr, |token| match &token.kind {
            TokenKind::Keyword(k) if k == "and" => Some(BinaryOp::And),
            TokenKind::Keyword(k) if k == "or" => Some(BinaryOp::Or),
            _ => None,
        });
        match result {
            Ok(node) => Ok(node),
            Err(_) if self.idx == before => Err(self.syntax_error(
                "Expected 'var', 'if', 'for', 'while', 'func', int, float, identifier, \
                 '+', '-' or '(', '[' or 'not'",
            )),
            Err(err) => Err(err),
        }
    }

    fn comp_expr(&mut self) -> Result<Node, Error> {
        if self.current().is_keyword("not") {
            let op_span = self.current().span.clone();
            self.advance();

            let operand = self.comp_expr()?;
            let span = op_span.to(&operand.span);
            return Ok(Node {
                kind: NodeKind::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            });
        }

        let before = self.idx;
        let result = self.bin_op(Self::arith_expr, |token| match token.kind {
            TokenKind::Ee => Some(BinaryOp::Eq),
            TokenKind::Ne => Some(BinaryOp::Ne),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Lte => Some(BinaryOp::Lte),
            TokenKind::Gte => Some(BinaryOp::Gte),
            _ => None,
        });
        match result {
            Ok(node) => Ok(node),
            Err(_) if self.idx == before => Err(
                self.syntax_error("Expected int, float, identifier, '+', '-', '(', '[' or 'not'")
            ),
            Err(err) => Err(err),
        }
    }

    fn arith_expr(&mut self) -> Result<Node, Error> {
        self.bin_op(Self::term, |token| match token.kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<Node, Error> {
        self.bin_op(Self::factor, |token| match token.kind {
            TokenKind::Mul => Some(BinaryOp::Mul),
            TokenKind::Div => Some(BinaryOp::Div),
            _ => None,
        })
    }

    fn factor(&mut self) -> Result<Node, Error> {
        let op = match self.current().kind {
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let op_span = self.current().span.clone();
            self.advance();
            let operand = self.factor()?;
            let span = op_span.to(&operand.span);
            return Ok(Node {
                kind: NodeKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.power()
    }

    /// The right side of `^` parses at factor precedence, so `-2 ^ 3` binds
    /// as `-(2 ^ 3)` and `2 ^ -3` is accepted.
    fn power(&mut self) -> Result<Node, Error> {
        let mut left = self.call()?;
        while self.at(&TokenKind::Pow) {
            self.advance();
            let right = self.factor()?;
            let span = left.span.to(&right.span);
            left = Node {
                kind: NodeKind::BinOp {
                    op: BinaryOp::Pow,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    fn call(&mut self) -> Result<Node, Error> {
        let atom = self.atom()?;

        if !self.at(&TokenKind::LParen) {
            return Ok(atom);
        }
        self.advance();

        let mut args = Vec::new();
        if self.at(&TokenKind::RParen) {
            self.advance();
        } else {
            let before = self.idx;
            match self.expr() {
                Ok(arg) => args.push(arg),
                Err(_) if self.idx == before => {
                    return Err(self.syntax_error(
                        "Expected ')', 'var', 'if', 'for', 'while', 'func', int, float, \
                         identifier, '+', '-', '(', '[' or 'not'",
                    ));
                }
                Err(err) => return Err(err),
            }

            while self.at(&TokenKind::Comma) {
                self.advance();
                args.push(self.expr()?);
            }

            if !self.at(&TokenKind::RParen) {
                return Err(self.syntax_error("Expected ',' or ')'"));
            }
            self.advance();
        }

        let span = atom.span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::Call {
                callee: Box::new(atom),
                args,
            },
            span,
        })
    }

    fn atom(&mut self) -> Result<Node, Error> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node {
                    kind: NodeKind::Number(*n as f64),
                    span: token.span.clone(),
                })
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Node {
                    kind: NodeKind::Number(*x),
                    span: token.span.clone(),
                })
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Node {
                    kind: NodeKind::Str(s.clone()),
                    span: token.span.clone(),
                })
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node {
                    kind: NodeKind::VarAccess(name.clone()),
                    span: token.span.clone(),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expr()?;
                if !self.at(&TokenKind::RParen) {
                    return Err(self.syntax_error("Expected ')'"));
                }
                self.advance();
                Ok(expr)
            }
            TokenKind::LSquare => self.list_expr(),
            TokenKind::Keyword(k) if k == "if" => self.if_expr(),
            TokenKind::Keyword(k) if k == "for" => self.for_expr(),
            TokenKind::Keyword(k) if k == "while" => self.while_expr(),
            TokenKind::Keyword(k) if k == "func" => self.func_def(),
            _ => Err(Error::invalid_syntax(
                token.span.clone(),
                "Expected int, float, identifier, '+', '-' or '(', '[', 'if', 'for', \
                 'while', 'func'",
            )),
        }
    }

    fn list_expr(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        self.advance(); // '['

        let mut elements = Vec::new();
        if self.at(&TokenKind::RSquare) {
            self.advance();
        } else {
            let before = self.idx;
            match self.expr() {
                Ok(element) => elements.push(element),
                Err(_) if self.idx == before => {
                    return Err(self.syntax_error(
                        "Expected ']', 'var', 'if', 'for', 'while', 'func', int, float, \
                         identifier, '+', '-' or '(', '[' or 'not'",
                    ));
                }
                Err(err) => return Err(err),
            }

            while self.at(&TokenKind::Comma) {
                self.advance();
                elements.push(self.expr()?);
            }

            if !self.at(&TokenKind::RSquare) {
                return Err(self.syntax_error("Expected ',' or ']'"));
            }
            self.advance();
        }

        let span = start_span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::List(elements),
            span,
        })
    }

    fn if_expr(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        let (cases, else_case) = self.if_cases("if")?;
        let span = start_span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::If { cases, else_case },
            span,
        })
    }

    fn if_cases(&mut self, keyword: &str) -> Result<(Vec<IfCase>, Option<Box<ElseCase>>), Error> {
        if !self.current().is_keyword(keyword) {
            return Err(self.syntax_error(format!("Expected '{keyword}'")));
        }
        self.advance();

        let condition = self.expr()?;

        if !self.current().is_keyword("then") {
            return Err(self.syntax_error("Expected 'then'"));
        }
        self.advance();

        let mut cases = Vec::new();
        let mut else_case = None;

        if self.at(&TokenKind::Newline) {
            self.advance();

            let body = self.statements()?;
            cases.push(IfCase {
                condition,
                body,
                block: true,
            });

            if self.current().is_keyword("end") {
                self.advance();
            } else {
                let (more_cases, els) = self.elif_or_else()?;
                cases.extend(more_cases);
                else_case = els;
            }
        } else {
            let body = self.statement()?;
            cases.push(IfCase {
                condition,
                body,
                block: false,
            });

            let (more_cases, els) = self.elif_or_else()?;
            cases.extend(more_cases);
            else_case = els;
        }

        Ok((cases, else_case))
    }

    fn elif_or_else(&mut self) -> Result<(Vec<IfCase>, Option<Box<ElseCase>>), Error> {
        if self.current().is_keyword("elif") {
            self.if_cases("elif")
        } else {
            Ok((Vec::new(), self.else_case()?))
        }
    }

    fn else_case(&mut self) -> Result<Option<Box<ElseCase>>, Error> {
        if !self.current().is_keyword("else") {
            return Ok(None);
        }
        self.advance();

        if self.at(&TokenKind::Newline) {
            self.advance();

            let body = self.statements()?;
            if !self.current().is_keyword("end") {
                return Err(self.syntax_error("Expected 'end'"));
            }
            self.advance();
            Ok(Some(Box::new(ElseCase { body, block: true })))
        } else {
            let body = self.statement()?;
            Ok(Some(Box::new(ElseCase { body, block: false })))
        }
    }

    fn for_expr(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        self.advance(); // 'for'

        let var = match &self.current().kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => return Err(self.syntax_error("Expected identifier")),
        };
        self.advance();

        if !self.at(&TokenKind::Eq) {
            return Err(self.syntax_error("Expected '='"));
        }
        self.advance();

        let start = self.expr()?;

        if !self.current().is_keyword("to") {
            return Err(self.syntax_error("Expected 'to'"));
        }
        self.advance();

        let end = self.expr()?;

        let step = if self.current().is_keyword("step") {
            self.advance();
            Some(Box::new(self.expr()?))
        } else {
            None
        };

        if !self.current().is_keyword("then") {
            return Err(self.syntax_error("Expected 'then'"));
        }
        self.advance();

        let (body, block) = self.loop_body()?;
        let span = start_span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::For {
                var,
                start: Box::new(start),
                end: Box::new(end),
                step,
                body: Box::new(body),
                block,
            },
            span,
        })
    }

    fn while_expr(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        self.advance(); // 'while'

        let condition = self.expr()?;

        if !self.current().is_keyword("then") {
            return Err(self.syntax_error("Expected 'then'"));
        }
        self.advance();

        let (body, block) = self.loop_body()?;
        let span = start_span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
                block,
            },
            span,
        })
    }

    /// Body of a loop, after `then`: a NEWLINE opens a statement block
    /// closed by `end`, anything else is one inline statement.
    fn loop_body(&mut self) -> Result<(Node, bool), Error> {
        if self.at(&TokenKind::Newline) {
            self.advance();

            let body = self.statements()?;
            if !self.current().is_keyword("end") {
                return Err(self.syntax_error("Expected 'end'"));
            }
            self.advance();
            Ok((body, true))
        } else {
            Ok((self.statement()?, false))
        }
    }

    fn func_def(&mut self) -> Result<Node, Error> {
        let start_span = self.current().span.clone();
        self.advance(); // 'func'

        let name = match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if !self.at(&TokenKind::LParen) {
            return Err(self.syntax_error(if name.is_some() {
                "Expected '('"
            } else {
                "Expected identifier or '('"
            }));
        }
        self.advance();

        let mut params = Vec::new();
        if let TokenKind::Identifier(param) = &self.current().kind {
            params.push(param.clone());
            self.advance();

            while self.at(&TokenKind::Comma) {
                self.advance();
                match &self.current().kind {
                    TokenKind::Identifier(param) => {
                        params.push(param.clone());
                        self.advance();
                    }
                    _ => return Err(self.syntax_error("Expected identifier")),
                }
            }
        }

        if !self.at(&TokenKind::RParen) {
            return Err(self.syntax_error("Expected ',' or ')'"));
        }
        self.advance();

        if self.at(&TokenKind::Arrow) {
            self.advance();
            let body = self.expr()?;
            let span = start_span.to(&self.prev_span());
            return Ok(Node {
                kind: NodeKind::FuncDef {
                    name,
                    params,
                    body: Box::new(body),
                    auto_return: true,
                },
                span,
            });
        }

        if !self.at(&TokenKind::Newline) {
            return Err(self.syntax_error("Expected '->' or NEWLINE"));
        }
        self.advance();

        let body = self.statements()?;
        if !self.current().is_keyword("end") {
            return Err(self.syntax_error("Expected 'end'"));
        }
        self.advance();

        let span = start_span.to(&self.prev_span());
        Ok(Node {
            kind: NodeKind::FuncDef {
                name,
                params,
                body: Box::new(body),
                auto_return: false,
            },
            span,
        })
    }

    fn bin_op(
        &mut self,
        operand: fn(&mut Self) -> Result<Node, Error>,
        op_for: impl Fn(&Token) -> Option<BinaryOp>,
    ) -> Result<Node, Error> {
        let mut left = operand(self)?;
        while let Some(op) = op_for(self.current()) {
            self.advance();
            let right = operand(self)?;
            let span = left.span.to(&right.span);
            left = Node {
                kind: NodeKind::BinOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::position::Source;

    fn parse(text: &str) -> Node {
        let src = Source::new("<test>", text);
        let tokens = Lexer::new(&src).tokenize().expect("lexing should succeed");
        Parser::new(tokens).parse().expect("parsing should succeed")
    }

    fn parse_err(text: &str) -> Error {
        let src = Source::new("<test>", text);
        let tokens = Lexer::new(&src).tokenize().expect("lexing should succeed");
        Parser::new(tokens)
            .parse()
            .expect_err("parsing should fail")
    }

    /// The single statement of a one-statement program.
    fn first_statement(text: &str) -> Node {
        match parse(text).kind {
            NodeKind::List(mut statements) => {
                assert_eq!(statements.len(), 1);
                statements.remove(0)
            }
            other => panic!("root should be a statement list, got {other:?}"),
        }
    }

    #[test]
    fn test_number() {
        let node = first_statement("123");
        assert!(matches!(node.kind, NodeKind::Number(n) if n == 123.0));
    }

    #[test]
    fn test_binary_operation() {
        let node = first_statement("1 + 2");
        assert!(matches!(
            node.kind,
            NodeKind::BinOp {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_power_precedence_over_multiplication() {
        let node = first_statement("2 * 3 ^ 2");
        let NodeKind::BinOp {
            op: BinaryOp::Mul,
            right,
            ..
        } = node.kind
        else {
            panic!("expected Mul at the root");
        };
        assert!(matches!(
            right.kind,
            NodeKind::BinOp {
                op: BinaryOp::Pow,
                ..
            }
        ));
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let node = first_statement("-2 ^ 3");
        let NodeKind::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } = node.kind
        else {
            panic!("expected unary minus at the root");
        };
        assert!(matches!(
            operand.kind,
            NodeKind::BinOp {
                op: BinaryOp::Pow,
                ..
            }
        ));
    }

    #[test]
    fn test_child_spans_lie_within_parent_span() {
        let node = first_statement("(1 + 2) * [3, 4]");
        fn check(node: &Node) {
            let children: Vec<&Node> = match &node.kind {
                NodeKind::BinOp { left, right, .. } => vec![left, right],
                NodeKind::List(elements) => elements.iter().collect(),
                NodeKind::UnaryOp { operand, .. } => vec![operand],
                _ => vec![],
            };
            for child in children {
                assert!(node.span.start.idx <= child.span.start.idx);
                assert!(child.span.end.idx <= node.span.end.idx);
                check(child);
            }
        }
        check(&node);
    }

    #[test]
    fn test_var_assignment() {
        let node = first_statement("var answer = 42");
        assert!(matches!(
            node.kind,
            NodeKind::VarAssign { ref name, .. } if name == "answer"
        ));
    }

    #[test]
    fn test_statements_split_on_newlines_and_semicolons() {
        let root = parse("var x = 1; var y = 2\nx + y");
        assert!(matches!(root.kind, NodeKind::List(ref s) if s.len() == 3));
    }

    #[test]
    fn test_trailing_newlines_are_allowed() {
        let root = parse("1 + 1\n\n\n");
        assert!(matches!(root.kind, NodeKind::List(ref s) if s.len() == 1));
    }

    #[test]
    fn test_inline_if_with_else() {
        let node = first_statement("if 1 then 2 else 3");
        let NodeKind::If { cases, else_case } = node.kind else {
            panic!("expected an if node");
        };
        assert_eq!(cases.len(), 1);
        assert!(!cases[0].block);
        assert!(matches!(else_case, Some(ref e) if !e.block));
    }

    #[test]
    fn test_block_if_with_elif_chain() {
        let node = first_statement("if a then\n1\nelif b then\n2\nelse\n3\nend");
        let NodeKind::If { cases, else_case } = node.kind else {
            panic!("expected an if node");
        };
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.block));
        assert!(matches!(else_case, Some(ref e) if e.block));
    }

    #[test]
    fn test_for_with_step() {
        let node = first_statement("for i = 5 to 0 step -1 then i");
        let NodeKind::For { var, step, block, .. } = node.kind else {
            panic!("expected a for node");
        };
        assert_eq!(var, "i");
        assert!(step.is_some());
        assert!(!block);
    }

    #[test]
    fn test_while_inline_body_keeps_its_first_token() {
        // The body must be the whole assignment, not a remnant with its
        // leading token dropped.
        let node = first_statement("while i > 0 then var i = i - 1");
        let NodeKind::While { body, block, .. } = node.kind else {
            panic!("expected a while node");
        };
        assert!(!block);
        assert!(matches!(
            body.kind,
            NodeKind::VarAssign { ref name, .. } if name == "i"
        ));
    }

    #[test]
    fn test_func_def_inline_and_block() {
        let inline = first_statement("func add(a, b) -> a + b");
        assert!(matches!(
            inline.kind,
            NodeKind::FuncDef {
                auto_return: true,
                ref params,
                ..
            } if params == &["a", "b"]
        ));

        let block = first_statement("func f()\nreturn 1\nend");
        assert!(matches!(
            block.kind,
            NodeKind::FuncDef {
                auto_return: false,
                ..
            }
        ));
    }

    #[test]
    fn test_anonymous_func() {
        let node = first_statement("func (x) -> x");
        assert!(matches!(
            node.kind,
            NodeKind::FuncDef { name: None, .. }
        ));
    }

    #[test]
    fn test_call_with_args() {
        let node = first_statement("f(1, 2, 3)");
        assert!(matches!(
            node.kind,
            NodeKind::Call { ref args, .. } if args.len() == 3
        ));
    }

    #[test]
    fn test_return_without_value() {
        let root = parse("func f()\nreturn\nend");
        let NodeKind::List(statements) = root.kind else {
            panic!();
        };
        let NodeKind::FuncDef { body, .. } = &statements[0].kind else {
            panic!("expected a func def");
        };
        let NodeKind::List(body_statements) = &body.kind else {
            panic!("expected a statement block body");
        };
        assert!(matches!(body_statements[0].kind, NodeKind::Return(None)));
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_err("1 +");
        assert!(matches!(err, Error::InvalidSyntax(_)));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse_err("(1 + 2");
        assert_eq!(err.details(), "Expected ')'");
    }

    #[test]
    fn test_missing_end() {
        let err = parse_err("for i = 1 to 3 then\ni\n");
        assert_eq!(err.details(), "Expected 'end'");
    }
}
