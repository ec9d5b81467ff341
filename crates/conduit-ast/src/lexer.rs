use crate::token::{Token, TokenKind};
use conduit_core::Span;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("lex error at {span}: {message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Hand-written lexer over byte offsets, so token spans can slice the
/// original source text directly.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Tokenize the entire source into a Vec<Token>, ending with Eof.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let Some(c) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '@' => TokenKind::At,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    return Err(LexError::new(
                        "expected `=` after `!`",
                        Span::new(start, self.pos),
                    ));
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '.' => {
                if self.eat('.') && self.eat('.') {
                    TokenKind::Ellipsis
                } else {
                    return Err(LexError::new(
                        "stray `.`; only `...` is valid",
                        Span::new(start, self.pos),
                    ));
                }
            }
            '"' => self.string(start)?,
            c if c.is_ascii_digit() => self.number(start)?,
            c if c.is_alphabetic() || c == '_' => self.ident(start),
            other => {
                return Err(LexError::new(
                    format!("unexpected character `{other}`"),
                    Span::new(start, self.pos),
                ));
            }
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let rest = &self.source[self.pos..];
            if let Some(c) = rest.chars().next() {
                if c.is_whitespace() {
                    self.pos += c.len_utf8();
                    continue;
                }
            }
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.source.len(),
                }
                continue;
            }
            break;
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.source[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.source[start..self.pos];
        let value = text
            .parse::<i64>()
            .map_err(|_| LexError::new("number literal out of range", Span::new(start, self.pos)))?;
        Ok(TokenKind::Number(value))
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        match &self.source[start..self.pos] {
            "fn" => TokenKind::Fn,
            "let" => TokenKind::Let,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            text => TokenKind::Ident(text.to_owned()),
        }
    }

    fn string(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(other) => {
                        return Err(LexError::new(
                            format!("unknown escape sequence `\\{other}`"),
                            Span::new(start, self.pos),
                        ));
                    }
                    None => {
                        return Err(LexError::new(
                            "unterminated string literal",
                            Span::new(start, self.pos),
                        ));
                    }
                },
                Some(c) => value.push(c),
                None => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        Span::new(start, self.pos),
                    ));
                }
            }
        }
        Ok(TokenKind::Str(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_pipe_call() {
        assert_eq!(
            kinds("pipe(12, add_one)"),
            vec![
                TokenKind::Ident("pipe".into()),
                TokenKind::LParen,
                TokenKind::Number(12),
                TokenKind::Comma,
                TokenKind::Ident("add_one".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_decorator_and_ellipsis() {
        assert_eq!(
            kinds("@fast_pipes ...fns"),
            vec![
                TokenKind::At,
                TokenKind::Ident("fast_pipes".into()),
                TokenKind::Ellipsis,
                TokenKind::Ident("fns".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = Lexer::new("let x = 1;").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 5));
        assert_eq!(tokens[3].span, Span::new(8, 9));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("// header\n1 // trailing"),
            vec![TokenKind::Number(1), TokenKind::Eof]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\n""#),
            vec![TokenKind::Str("a\"b\n".into()), TokenKind::Eof]
        );
        assert!(Lexer::new(r#""\z""#).tokenize().is_err());
        assert!(Lexer::new(r#""open"#).tokenize().is_err());
    }
}
