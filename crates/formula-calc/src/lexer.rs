//! Splits an expression into tokens.
//!
//! Besides plain scanning, the lexer owns the two context-sensitive rules of the grammar:
//! whether a `-` is the subtraction operator or the sign of the literal that follows, and where
//! an implicit `*` must be inserted (`2(3)`, `(1)(2)`, `3sqrt(16)`).

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{CalcError, CalcResult};

/// Byte range of a token in the source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span, used for tokens the lexer synthesizes.
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Operator {
    fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '+' => Operator::Add,
            '-' => Operator::Sub,
            '*' => Operator::Mul,
            '/' => Operator::Div,
            '%' => Operator::Rem,
            '^' => Operator::Pow,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Pow => '^',
        }
    }

    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Pow => 6,
            Operator::Mul | Operator::Div => 4,
            Operator::Rem => 2,
            Operator::Add | Operator::Sub => 1,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == Operator::Pow
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text, including a folded leading `-`.
    Number(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    ArgSeparator,
    /// A registered function name, lowercased.
    Function(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(text) => f.write_str(text),
            TokenKind::Operator(op) => write!(f, "{op}"),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
            TokenKind::ArgSeparator => f.write_str(","),
            TokenKind::Function(name) => f.write_str(name),
        }
    }
}

/// Tokenize `expression`, recognizing the given function names case-insensitively.
pub fn tokenize<'n>(
    expression: &str,
    function_names: impl IntoIterator<Item = &'n str>,
) -> CalcResult<Vec<Token>> {
    let mut names: Vec<String> = function_names
        .into_iter()
        .map(str::to_ascii_lowercase)
        .collect();
    // Longest first, so `log10` wins over `log` when both are registered.
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();

    let tokens = Lexer::new(expression, &names).run()?;
    log::trace!(
        "tokenized {expression:?} into [{}]",
        tokens
            .iter()
            .map(|t| t.kind.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    names: &'a [String],
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, names: &'a [String]) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            names,
            tokens: Vec::new(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.peek().map_or(self.input.len(), |(at, _)| at)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|(_, ch)| ch.is_whitespace()) {
            self.bump();
        }
    }

    fn last_kind(&self) -> Option<&TokenKind> {
        self.tokens.last().map(|t| &t.kind)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let end = self.offset();
        self.tokens.push(Token::new(kind, Span::new(start, end)));
    }

    fn push_implicit_mul(&mut self, at: usize) {
        self.tokens.push(Token::new(
            TokenKind::Operator(Operator::Mul),
            Span::empty(at),
        ));
    }

    /// Whether a `-` here would be a sign rather than subtraction.
    fn in_unary_position(&self) -> bool {
        matches!(
            self.last_kind(),
            None | Some(TokenKind::LeftParen | TokenKind::ArgSeparator | TokenKind::Operator(_))
        )
    }

    fn run(mut self) -> CalcResult<Vec<Token>> {
        loop {
            self.skip_whitespace();
            let Some((start, ch)) = self.peek() else {
                break;
            };

            match ch {
                '0'..='9' | '.' => self.number(start, false)?,
                '-' if self.in_unary_position() => {
                    self.bump();
                    match self.peek() {
                        Some((_, next)) if next.is_ascii_digit() || next == '.' => {
                            self.number(start, true)?;
                        }
                        Some((at, next)) if Operator::from_char(next).is_some() => {
                            return Err(CalcError::lexical("invalid operator sequence", at));
                        }
                        _ => return Err(CalcError::lexical("invalid numeric literal", start)),
                    }
                }
                '(' => {
                    if matches!(
                        self.last_kind(),
                        Some(TokenKind::Number(_) | TokenKind::RightParen)
                    ) {
                        self.push_implicit_mul(start);
                    }
                    self.bump();
                    self.push(TokenKind::LeftParen, start);
                }
                ')' => {
                    self.bump();
                    self.push(TokenKind::RightParen, start);
                }
                ',' => {
                    self.bump();
                    self.push(TokenKind::ArgSeparator, start);
                }
                ch if ch.is_alphabetic() || ch == '_' => self.function_name(start)?,
                ch => match Operator::from_char(ch) {
                    Some(_) if matches!(self.last_kind(), Some(TokenKind::Operator(_))) => {
                        return Err(CalcError::lexical("invalid operator sequence", start));
                    }
                    Some(op) => {
                        self.bump();
                        self.push(TokenKind::Operator(op), start);
                    }
                    None => return Err(CalcError::lexical("invalid token", start)),
                },
            }
        }
        Ok(self.tokens)
    }

    /// Consume a literal starting at `start`; a folded `-` has already been consumed.
    fn number(&mut self, start: usize, negative: bool) -> CalcResult<()> {
        if matches!(self.last_kind(), Some(TokenKind::Number(_))) {
            return Err(CalcError::lexical("invalid token", start));
        }

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        let mut points = 0;
        let mut digits = 0;
        while let Some((_, ch)) = self.peek() {
            match ch {
                '0'..='9' => digits += 1,
                '.' => points += 1,
                _ => break,
            }
            text.push(ch);
            self.bump();
        }

        if points > 1 || digits == 0 {
            return Err(CalcError::lexical("invalid numeric literal", start));
        }
        self.push(TokenKind::Number(text), start);
        Ok(())
    }

    fn function_name(&mut self, start: usize) -> CalcResult<()> {
        let rest = &self.input[start..];
        let Some(name) = self.names.iter().find(|name| {
            rest.get(..name.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
        }) else {
            return Err(CalcError::lexical("invalid token", start));
        };

        if matches!(self.last_kind(), Some(TokenKind::Number(_))) {
            self.push_implicit_mul(start);
        }
        let end = start + name.len();
        while self.offset() < end {
            self.bump();
        }
        self.push(TokenKind::Function(name.clone()), start);
        Ok(())
    }
}
