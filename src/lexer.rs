// ABOUTME: Hand-written single-pass lexer turning source text into tokens

use crate::error::Error;
use crate::position::{Position, Source, Span};
use crate::token::{Token, TokenKind, KEYWORDS};
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;

pub struct Lexer<'a> {
    src: Rc<Source>,
    chars: Peekable<Chars<'a>>,
    pos: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a Rc<Source>) -> Self {
        Lexer {
            src: Rc::clone(src),
            chars: src.text.chars().peekable(),
            pos: Position::default(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if let Some(ch) = ch {
            self.pos.advance(ch);
        }
        ch
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos, Rc::clone(&self.src))
    }

    /// A single-character token at the current position.
    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.bump();
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    /// `first` alone, or `second_kind` if the next character is `second`.
    fn one_or_two(&mut self, first: TokenKind, second: char, second_kind: TokenKind) -> Token {
        let start = self.pos;
        self.bump();
        let kind = if self.peek() == Some(second) {
            self.bump();
            second_kind
        } else {
            first
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' => {
                    self.bump();
                }
                '\n' | ';' => tokens.push(self.single(TokenKind::Newline)),
                '0'..='9' => tokens.push(self.number()),
                'a'..='z' | 'A'..='Z' => tokens.push(self.identifier()),
                '"' => tokens.push(self.string()?),
                '+' => tokens.push(self.single(TokenKind::Plus)),
                '-' => tokens.push(self.one_or_two(TokenKind::Minus, '>', TokenKind::Arrow)),
                '*' => tokens.push(self.single(TokenKind::Mul)),
                '/' => tokens.push(self.single(TokenKind::Div)),
                '^' => tokens.push(self.single(TokenKind::Pow)),
                '(' => tokens.push(self.single(TokenKind::LParen)),
                ')' => tokens.push(self.single(TokenKind::RParen)),
                '[' => tokens.push(self.single(TokenKind::LSquare)),
                ']' => tokens.push(self.single(TokenKind::RSquare)),
                ',' => tokens.push(self.single(TokenKind::Comma)),
                '=' => tokens.push(self.one_or_two(TokenKind::Eq, '=', TokenKind::Ee)),
                '<' => tokens.push(self.one_or_two(TokenKind::Lt, '=', TokenKind::Lte)),
                '>' => tokens.push(self.one_or_two(TokenKind::Gt, '=', TokenKind::Gte)),
                '!' => tokens.push(self.not_equals()?),
                other => {
                    let start = self.pos;
                    self.bump();
                    return Err(Error::illegal_char(
                        self.span_from(start),
                        format!("'{other}'"),
                    ));
                }
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.pos, self.pos, Rc::clone(&self.src)),
        });
        Ok(tokens)
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        let mut text = String::new();
        let mut dots = 0;

        while let Some(ch) = self.peek() {
            if ch == '.' {
                if dots == 1 {
                    break;
                }
                dots += 1;
                text.push('.');
            } else if ch.is_ascii_digit() {
                text.push(ch);
            } else {
                break;
            }
            self.bump();
        }

        let kind = if dots == 0 {
            match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                // Literal too large for i64; fall back to the float payload.
                Err(_) => TokenKind::Float(text.parse().unwrap_or(f64::INFINITY)),
            }
        } else {
            TokenKind::Float(text.parse().unwrap_or(f64::INFINITY))
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn identifier(&mut self) -> Token {
        let start = self.pos;
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword(text)
        } else {
            TokenKind::Identifier(text)
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn string(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        self.bump(); // opening quote
        let mut text = String::new();

        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    // Unknown escapes pass the character through literally;
                    // this also covers \\ and \".
                    Some(ch) => text.push(ch),
                    None => return Err(Error::expected_char(self.span_from(start), "'\"'")),
                },
                Some(ch) => text.push(ch),
                None => return Err(Error::expected_char(self.span_from(start), "'\"'")),
            }
        }

        Ok(Token {
            kind: TokenKind::Str(text),
            span: self.span_from(start),
        })
    }

    fn not_equals(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        self.bump();
        if self.peek() == Some('=') {
            self.bump();
            return Ok(Token {
                kind: TokenKind::Ne,
                span: self.span_from(start),
            });
        }
        self.bump();
        Err(Error::expected_char(
            self.span_from(start),
            "'=' (after '!')",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        let src = Source::new("<test>", text);
        Lexer::new(&src).tokenize().expect("lexing should succeed")
    }

    fn lex_err(text: &str) -> Error {
        let src = Source::new("<test>", text);
        Lexer::new(&src)
            .tokenize()
            .expect_err("lexing should fail")
    }

    #[test]
    fn test_empty_input_is_just_eof() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("123 12.34");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Int(123));
        assert_eq!(tokens[1].kind, TokenKind::Float(12.34));
    }

    #[test]
    fn test_operators() {
        let tokens = lex("+ - * / ^");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Mul,
                TokenKind::Div,
                TokenKind::Pow,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = lex("== != <= >= -> = < >");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ee,
                TokenKind::Ne,
                TokenKind::Lte,
                TokenKind::Gte,
                TokenKind::Arrow,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = lex("var x1 while whiles");
        assert_eq!(tokens[0].kind, TokenKind::Keyword("var".into()));
        assert_eq!(tokens[1].kind, TokenKind::Identifier("x1".into()));
        assert_eq!(tokens[2].kind, TokenKind::Keyword("while".into()));
        assert_eq!(tokens[3].kind, TokenKind::Identifier("whiles".into()));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb\tc\\d\"e\qf""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb\tc\\d\"eqf".into()));
    }

    #[test]
    fn test_newline_and_semicolon_separate_statements() {
        let tokens = lex("1;2\n3");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Int(3),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_every_token_has_a_nonempty_span() {
        let tokens = lex("var total = [1, 2.5] / 0\nfunc f() -> \"s\"");
        for token in &tokens {
            if token.kind == TokenKind::Eof {
                assert_eq!(token.span.start, token.span.end);
            } else {
                assert!(token.span.start.idx < token.span.end.idx, "{:?}", token);
            }
        }
    }

    #[test]
    fn test_illegal_character() {
        let err = lex_err("@");
        assert!(err.to_string().starts_with("Illegal Character: '@'"));
    }

    #[test]
    fn test_bare_bang_expects_equals() {
        let err = lex_err("!");
        assert!(err.to_string().starts_with("Expected Character: '=' (after '!')"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_err("\"oops");
        assert!(err.to_string().starts_with("Expected Character: '\"'"));
    }
}
