use crate::ast::{
    BinaryExpression, BinaryOperator, Block, CallExpression, Expr, Identifier, LambdaExpression,
    LetStatement, Statement,
};
use crate::lexer::{LexError, Lexer};
use crate::token::{Token, TokenKind};
use conduit_core::{Span, Spanned};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("parse error at {span}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            span: err.span,
        }
    }
}

/// A parsed function definition before Salsa tracking is applied.
///
/// The optimizing driver re-parses single-function source slices, so the
/// parser's output has to be usable without a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFunction {
    pub name: Identifier,
    pub decorators: Vec<Identifier>,
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

impl RawFunction {
    /// Shift every span in this function forward by `delta` bytes.
    pub fn shift_spans(&mut self, delta: usize) {
        self.span = self.span.shift(delta);
        crate::ast::shift_block_spans(&mut self.body, delta);
    }
}

/// Parse a complete source text into function definitions.
pub fn parse_source(source: &str) -> Result<Vec<RawFunction>, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_program(mut self) -> Result<Vec<RawFunction>, ParseError> {
        let mut functions = Vec::new();
        while !self.current().kind.is_eof() {
            functions.push(self.parse_function()?);
        }
        Ok(functions)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current().kind == kind {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                format!("expected {kind}, found {}", self.current().kind),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<(Identifier, Span), ParseError> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.current().span;
                self.advance();
                Ok((name, span))
            }
            other => Err(ParseError::new(
                format!("expected identifier, found {other}"),
                self.current().span,
            )),
        }
    }

    fn parse_function(&mut self) -> Result<RawFunction, ParseError> {
        let start = self.current().span.start;

        let mut decorators = Vec::new();
        while self.eat(&TokenKind::At) {
            let (name, _) = self.expect_ident()?;
            decorators.push(name);
        }

        self.expect(TokenKind::Fn)?;
        let (name, _) = self.expect_ident()?;
        let parameters = self.parse_parameter_list()?;

        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while self.current().kind != TokenKind::RBrace {
            if self.current().kind.is_eof() {
                return Err(ParseError::new(
                    "unterminated function body",
                    self.current().span,
                ));
            }
            statements.push(self.parse_statement()?);
        }
        let close = self.expect(TokenKind::RBrace)?;

        Ok(RawFunction {
            name,
            decorators,
            parameters,
            body: Block { statements },
            span: Span::new(start, close.span.end),
        })
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<Identifier>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut parameters = Vec::new();
        if self.current().kind != TokenKind::RParen {
            loop {
                let (name, _) = self.expect_ident()?;
                parameters.push(name);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(parameters)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if self.eat(&TokenKind::Let) {
            let (name, _) = self.expect_ident()?;
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semicolon)?;
            return Ok(Statement::Let(LetStatement { name, value }));
        }
        let expr = self.parse_expr()?;
        self.eat(&TokenKind::Semicolon);
        Ok(Statement::Expression(expr))
    }

    fn parse_expr(&mut self) -> Result<Spanned<Expr>, ParseError> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.current().kind {
                TokenKind::EqEq => BinaryOperator::Equal,
                TokenKind::NotEq => BinaryOperator::NotEqual,
                TokenKind::Lt => BinaryOperator::LessThan,
                TokenKind::Gt => BinaryOperator::GreaterThan,
                TokenKind::Le => BinaryOperator::LessEqual,
                TokenKind::Ge => BinaryOperator::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let operator = match self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.parse_postfix()?;
        loop {
            let operator = match self.current().kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_postfix()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.current().kind == TokenKind::LParen {
            self.advance();
            let arguments = self.parse_argument_list()?;
            let close = self.expect(TokenKind::RParen)?;
            let span = Span::new(expr.1.start, close.span.end);
            expr = (
                Expr::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                }),
                span,
            );
        }
        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Spanned<Expr>>, ParseError> {
        let mut arguments = Vec::new();
        if self.current().kind == TokenKind::RParen {
            return Ok(arguments);
        }
        loop {
            if self.current().kind == TokenKind::Ellipsis {
                let start = self.advance().span.start;
                let inner = self.parse_expr()?;
                let span = Span::new(start, inner.1.end);
                arguments.push((Expr::Spread(Box::new(inner)), span));
            } else {
                arguments.push(self.parse_expr()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok((Expr::Number(n), token.span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok((Expr::String(s), token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok((Expr::Bool(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok((Expr::Bool(false), token.span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok((Expr::Name(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if self.current().kind != TokenKind::RBracket {
                    loop {
                        items.push(self.parse_expr()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let close = self.expect(TokenKind::RBracket)?;
                Ok((Expr::List(items), Span::new(token.span.start, close.span.end)))
            }
            TokenKind::Fn => self.parse_lambda(),
            other => Err(ParseError::new(
                format!("expected expression, found {other}"),
                token.span,
            )),
        }
    }

    /// `fn(x) expr`: an anonymous stage with a single expression body.
    fn parse_lambda(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.expect(TokenKind::Fn)?.span.start;
        let parameters = self.parse_parameter_list()?;
        let body = self.parse_expr()?;
        let span = Span::new(start, body.1.end);
        Ok((
            Expr::Lambda(LambdaExpression {
                parameters,
                body: Box::new(body),
            }),
            span,
        ))
    }
}

fn binary(
    left: Spanned<Expr>,
    operator: BinaryOperator,
    right: Spanned<Expr>,
) -> Spanned<Expr> {
    let span = Span::new(left.1.start, right.1.end);
    (
        Expr::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
        span,
    )
}
