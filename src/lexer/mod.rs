// Author: Dustin Pilgrim
// License: MIT

use std::str::Chars;

use crate::syntax::Span;
use crate::ThemeError;

mod scanner;
mod template;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Ident(String),
    String(String),
    Number(f64),
    Regex(String),
    Bool(bool),
    Null,

    // --- template literals (cooked text) ---
    /// `` `text` `` with no substitutions.
    Template(String),
    /// `` `text${ ``
    TemplateHead(String),
    /// `}text${`
    TemplateMiddle(String),
    /// `` }text` ``
    TemplateTail(String),

    // --- structure ---
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Colon,

    // --- symbols ---
    Dot,
    QuestionDot,
    Ellipsis,
    Arrow,
    Question,
    Equals,
    At,
    Operator(String),

    Eof,
}

impl Token {
    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self, Token::Ident(name) if name == text)
    }

    pub fn is_operator(&self, text: &str) -> bool {
        matches!(self, Token::Operator(op) if op == text)
    }

    /// Whether a `/` after this token starts a regex literal rather than a
    /// division.
    fn allows_regex_after(&self) -> bool {
        match self {
            Token::Ident(name) => matches!(
                name.as_str(),
                "return" | "typeof" | "case" | "do" | "else" | "in" | "instanceof" | "new"
                    | "delete" | "void" | "throw" | "yield" | "await"
            ),
            Token::String(_)
            | Token::Number(_)
            | Token::Regex(_)
            | Token::Bool(_)
            | Token::Null
            | Token::Template(_)
            | Token::TemplateTail(_)
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => false,
            _ => true,
        }
    }
}

/// A token with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
    pub line: usize,
    pub column: usize,
    /// A line break separated this token from the previous one.
    pub newline_before: bool,
}

pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// One entry per open `{`; `true` marks a `${` template substitution.
    brace_stack: Vec<bool>,
    regex_allowed: bool,
    saw_newline: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            pos: 0,
            line: 1,
            column: 0,
            brace_stack: Vec::new(),
            regex_allowed: true,
            saw_newline: false,
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Result<Spanned, ThemeError> {
        self.saw_newline = false;
        scanner::skip_trivia(self);

        let (start, line, column) = (self.pos, self.line, self.column);
        let token = tokenizer::next_token(self)?;
        self.regex_allowed = token.allows_regex_after();

        Ok(Spanned {
            token,
            span: Span::new(start, self.pos),
            line,
            column,
            newline_before: self.saw_newline,
        })
    }
}

/// Tokenizes a whole source text, ending with a single `Eof` token.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ThemeError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let spanned = lexer.next_token()?;
        let done = spanned.token == Token::Eof;
        tokens.push(spanned);
        if done {
            return Ok(tokens);
        }
    }
}
