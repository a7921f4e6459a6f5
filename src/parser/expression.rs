//! Expression grammar: the Pratt loop plus its prefix and infix
//! parselets, dispatched through per-kind function tables.

use crate::ast::expression::{
    ArrayLiteral, AwaitExpression, BooleanLiteral, CallExpression, Expression, FunctionLiteral,
    HashLiteral, Ident, IfExpression, IndexExpression, InfixExpression, IntegerLiteral,
    PrefixExpression, StringLiteral, YieldExpression,
};
use crate::lexer::{Token, TokenKind};

use super::{ParseError, Parser, Precedence};

type PrefixFn = fn(&mut Parser<'_>) -> Option<Expression>;
type InfixFn = fn(&mut Parser<'_>, Expression) -> Option<Expression>;

fn prefix_fn(kind: TokenKind) -> Option<PrefixFn> {
    let parselet: PrefixFn = match kind {
        TokenKind::Ident => |p| p.parse_ident(),
        TokenKind::Int => |p| p.parse_integer_literal(),
        TokenKind::Str => |p| p.parse_string_literal(),
        TokenKind::True | TokenKind::False => |p| p.parse_boolean_literal(),
        TokenKind::Bang | TokenKind::Minus => |p| p.parse_prefix_expression(),
        TokenKind::LParen => |p| p.parse_grouped_expression(),
        TokenKind::If => |p| p.parse_if_expression(),
        TokenKind::Function => |p| p.parse_function_literal(),
        TokenKind::Async => |p| p.parse_async_function_literal(),
        TokenKind::Yield => |p| p.parse_yield_expression(),
        TokenKind::Await => |p| p.parse_await_expression(),
        TokenKind::LBracket => |p| p.parse_array_literal(),
        TokenKind::LBrace => |p| p.parse_hash_literal(),
        _ => return None,
    };
    Some(parselet)
}

fn infix_fn(kind: TokenKind) -> Option<InfixFn> {
    let parselet: InfixFn = match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::Eq
        | TokenKind::NotEq => |p, left| p.parse_infix_expression(left),
        TokenKind::LParen => |p, left| p.parse_call_expression(left),
        TokenKind::LBracket => |p, left| p.parse_index_expression(left),
        _ => return None,
    };
    Some(parselet)
}

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = prefix_fn(self.current.kind) else {
            self.errors
                .push(ParseError::NoPrefixParseFn(self.current.kind));
            return None;
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = infix_fn(self.peek.kind) else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }
        Some(left)
    }

    fn parse_ident(&mut self) -> Option<Expression> {
        Some(Expression::Ident(Ident {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        }))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral { token, value })),
            Err(_) => {
                self.errors.push(ParseError::InvalidInteger {
                    literal: token.literal,
                });
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let value = token.literal.clone();
        Some(Expression::Str(StringLiteral { token, value }))
    }

    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(BooleanLiteral {
            token: self.current.clone(),
            value: self.current_is(TokenKind::True),
        }))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right,
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            token,
            condition,
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.parse_function_tail(token, false)
    }

    /// `async fn ...` parses like a plain function literal with the
    /// async flag set. The `gen` marker stays available, so a function
    /// may carry both flags.
    fn parse_async_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Function) {
            return None;
        }
        self.parse_function_tail(token, true)
    }

    /// Everything after the `fn` keyword: optional `gen`, parameter
    /// list, body.
    fn parse_function_tail(&mut self, token: Token, is_async: bool) -> Option<Expression> {
        let is_gen = if self.peek_is(TokenKind::Gen) {
            self.next_token();
            true
        } else {
            false
        };
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body,
            is_async,
            is_gen,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Ident>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }
        self.next_token();
        parameters.push(Ident {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        });
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            parameters.push(Ident {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            });
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(parameters)
    }

    fn parse_yield_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.next_token();
        let argument = Box::new(self.parse_expression(Precedence::Lowest)?);
        Some(Expression::Yield(YieldExpression { token, argument }))
    }

    /// `await` insists on a parenthesized argument.
    fn parse_await_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let argument = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(Expression::Await(AwaitExpression { token, argument }))
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::Array(ArrayLiteral { token, elements }))
    }

    /// `{` (key `:` value (`,`)?)* `}`. Every comma must introduce
    /// another pair, so a trailing comma fails like any other missing
    /// key would.
    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();
        if !self.peek_is(TokenKind::RBrace) {
            loop {
                self.next_token();
                let key = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenKind::Colon) {
                    return None;
                }
                self.next_token();
                let value = self.parse_expression(Precedence::Lowest)?;
                pairs.push((key, value));
                if !self.peek_is(TokenKind::Comma) {
                    break;
                }
                self.next_token();
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        Some(Expression::Hash(HashLiteral { token, pairs }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = self.current_precedence();
        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);
        Some(Expression::Infix(InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right,
        }))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index,
        }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }
}
