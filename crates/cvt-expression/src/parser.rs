//! Recursive-descent pipeline parser.
//!
//! ```text
//! expr        := simple_expr ( '|' simple_expr )*
//! simple_expr := '!' call | call
//! call        := IDENT '(' arg (',' arg)* ')' | IDENT
//! arg         := expr | IDENT
//! ```
//!
//! Operators are built directly while parsing; there is no separate syntax
//! tree.

use crate::error::ParseError;
use crate::operators::flow::Sequence;
use crate::operators::logical::Not;
use crate::registry::Registry;
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::types::{Arg, BoxedOperator};
use std::sync::Arc;

/// Pipeline expression parser.
pub struct PipelineParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    registry: &'a Registry,
}

impl<'a> PipelineParser<'a> {
    /// Parse a pipeline expression into an operator, resolving names against
    /// `registry`.
    pub fn parse(input: &'a str, registry: &'a Registry) -> Result<BoxedOperator, ParseError> {
        let mut parser = Self {
            tokens: tokenize(input),
            pos: 0,
            registry,
        };
        let op = match parser.parse_expr()? {
            Some(op) => op,
            None => return Err(parser.expected_operator("")),
        };
        let next = parser.peek();
        if next.kind != TokenKind::Eof {
            return Err(ParseError::syntax(
                next.pos,
                format!("unexpected {} after expression", next.describe()),
            ));
        }
        Ok(op)
    }

    fn peek(&self) -> Token<'a> {
        self.tokens[self.pos]
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// `None` when the cursor sits on something that is not an operator; the
    /// cursor is left where it was.
    fn parse_expr(&mut self) -> Result<Option<BoxedOperator>, ParseError> {
        let Some(first) = self.parse_simple_expr()? else {
            return Ok(None);
        };
        let mut stages = vec![first];
        while self.peek().kind == TokenKind::Pipe {
            self.advance();
            match self.parse_simple_expr()? {
                Some(stage) => stages.push(stage),
                None => return Err(self.expected_operator(" after '|'")),
            }
        }
        if stages.len() == 1 {
            return Ok(stages.pop());
        }
        Ok(Some(Arc::new(Sequence::new(stages))))
    }

    fn parse_simple_expr(&mut self) -> Result<Option<BoxedOperator>, ParseError> {
        if self.peek().kind != TokenKind::Bang {
            return self.parse_call();
        }
        self.advance();
        match self.parse_call()? {
            Some(inner) => Ok(Some(Arc::new(Not::new(inner)))),
            None => Err(self.expected_operator(" after '!'")),
        }
    }

    fn parse_call(&mut self) -> Result<Option<BoxedOperator>, ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Word {
            return Ok(None);
        }
        if self.peek_kind_at(1) == TokenKind::LParen {
            let open = self.tokens[self.pos + 1];
            self.advance();
            self.advance();
            let mut literals = Vec::new();
            let args = self.parse_args(open, &mut literals)?;
            return self
                .registry
                .construct(token.text, token.pos, args)
                .map(Some)
                .map_err(|err| self.unknown_literal_operator(err, &literals));
        }
        // A bare word is an operator only if it builds with no arguments;
        // otherwise it is left for the caller to take as a literal.
        match self.registry.construct(token.text, token.pos, Vec::new()) {
            Ok(op) => {
                self.advance();
                Ok(Some(op))
            }
            Err(_) => Ok(None),
        }
    }

    /// Collects the arguments of a call; the words taken as literals are
    /// recorded in `literals`.
    fn parse_args(
        &mut self,
        open: Token<'a>,
        literals: &mut Vec<Token<'a>>,
    ) -> Result<Vec<Arg>, ParseError> {
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_arg(open, literals)?);
            let token = self.peek();
            match token.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                TokenKind::Eof => return Err(unclosed(open)),
                _ => {
                    return Err(ParseError::syntax(
                        token.pos,
                        format!("expected ',' or ')', found {}", token.describe()),
                    ))
                }
            }
        }
    }

    fn parse_arg(
        &mut self,
        open: Token<'a>,
        literals: &mut Vec<Token<'a>>,
    ) -> Result<Arg, ParseError> {
        if let Some(op) = self.parse_expr()? {
            return Ok(Arg::Operator(op));
        }
        let token = self.peek();
        match token.kind {
            // A comma in argument position is itself the literal, as in `split(,)`.
            TokenKind::Word | TokenKind::Comma => {
                if token.kind == TokenKind::Word {
                    literals.push(token);
                }
                self.advance();
                Ok(Arg::Literal(token.text.to_string()))
            }
            TokenKind::Eof => Err(unclosed(open)),
            _ => Err(ParseError::syntax(
                token.pos,
                format!("unexpected {} in argument list", token.describe()),
            )),
        }
    }

    /// Error for a position that requires an operator. A word there is
    /// reported as the registry sees it: unknown, or rejecting zero arguments.
    fn expected_operator(&self, context: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Word {
            if let Err(err) = self.registry.construct(token.text, token.pos, Vec::new()) {
                return err;
            }
        }
        ParseError::syntax(
            token.pos,
            format!("expected an operator{context}, found {}", token.describe()),
        )
    }

    /// A word rejected from an operator slot that the registry does not know
    /// is reported as an unknown operator at the word's offset.
    fn unknown_literal_operator(&self, err: ParseError, literals: &[Token<'a>]) -> ParseError {
        if let ParseError::ExpectedOperator { literal, .. } = &err {
            let unknown = literals
                .iter()
                .rev()
                .find(|t| t.text == literal.as_str())
                .filter(|t| !self.registry.contains(t.text));
            if let Some(token) = unknown {
                return ParseError::UnknownOperator {
                    name: token.text.to_string(),
                    pos: token.pos,
                };
            }
        }
        err
    }
}

fn unclosed(open: Token<'_>) -> ParseError {
    ParseError::syntax(open.pos, "unmatched '('")
}
