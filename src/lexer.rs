// ABOUTME: Lexer module for turning Lox source text into a flat token stream

use crate::token::{keyword_kind, Literal, Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: malformed number '{text}'")]
    MalformedNumber { line: usize, text: String },

    #[error("line {line}: unexpected character '{character}'")]
    UnexpectedCharacter { line: usize, character: char },
}

/// Consumes source text and produces an ordered token stream terminated by
/// an `Eof` token. Collects every lexical error rather than stopping at the
/// first one, so a caller can surface all of them before aborting the run.
pub struct Lexer {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenizes the whole source. On success returns the token list; if any
    /// lexical error was encountered, returns the first one (after having
    /// attempted to tokenize the rest of the input).
    pub fn scan(mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", None, self.line));

        match self.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(self.tokens),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_token_literal(kind, None);
    }

    fn add_token_literal(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            ';' => self.add_token(TokenKind::Semicolon),
            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c => self.errors.push(LexError::UnexpectedCharacter {
                line: self.line,
                character: c,
            }),
        }
    }

    fn scan_string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.errors.push(LexError::UnterminatedString { line: self.line });
            return;
        }

        // Consume the closing quote.
        self.advance();

        let body: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        self.add_token_literal(TokenKind::String, Some(Literal::String(body)));
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == '.' {
            self.advance();
        }

        let text = self.lexeme();
        match text.parse::<f64>() {
            Ok(n) => self.add_token_literal(TokenKind::Number, Some(Literal::Number(n))),
            Err(_) => self.errors.push(LexError::MalformedNumber {
                line: self.line,
                text,
            }),
        }
    }

    fn scan_identifier(&mut self) {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience entry point used by the parser and the driver.
pub fn scan_tokens(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan_tokens(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_char_punctuation() {
        assert_eq!(
            kinds("(){},.;+-*/"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_one_or_two_char_operators() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_literal() {
        let tokens = scan_tokens("123 45.67").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(45.67)));
    }

    #[test]
    fn test_string_literal() {
        let tokens = scan_tokens(r#""hello world""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, Some(Literal::String("hello world".to_string())));
    }

    #[test]
    fn test_unterminated_string_errors() {
        let result = scan_tokens("\"unterminated");
        assert!(matches!(result, Err(LexError::UnterminatedString { .. })));
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        let tokens = scan_tokens("and class else false func for if nil or print return super this true var foo").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Else,
                TokenKind::False,
                TokenKind::Func,
                TokenKind::For,
                TokenKind::If,
                TokenKind::Nil,
                TokenKind::Or,
                TokenKind::Print,
                TokenKind::Return,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::True,
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_counting_across_newlines_and_comments() {
        let tokens = scan_tokens("1\n// comment\n2").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_unrecognized_character_errors() {
        let result = scan_tokens("@");
        assert!(matches!(result, Err(LexError::UnexpectedCharacter { character: '@', .. })));
    }

    #[test]
    fn test_malformed_number_is_unreachable_via_digit_scan() {
        // The scanner only ever builds digit-and-dot lexemes, so parse()
        // failure would require an internal bug; this test documents the
        // invariant rather than exercising a reachable malformed case.
        let tokens = scan_tokens("3.14").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(3.14)));
    }
}
