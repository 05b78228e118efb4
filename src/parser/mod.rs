// Author: Dustin Pilgrim
// License: MIT

//! Recursive-descent parser for the JavaScript/TypeScript subset found in
//! theme files and styled-component code.
//!
//! Lexer errors abort the parse. Statement-level errors are recovered: the
//! statement is skipped, an [`NodeKind::Opaque`] node takes its place and the
//! error is kept on the tree (see [`SyntaxTree::errors`]).

use std::path::PathBuf;

use tracing::trace;

use crate::ThemeError;
use crate::lexer::{Spanned, Token, tokenize};
use crate::syntax::{NodeId, NodeKind, Span, SyntaxTree, TreeBuilder};

mod expression;
mod pattern;
mod statement;
mod types;

/// Statement and expression nesting the parser accepts before giving up on
/// a statement.
const MAX_DEPTH: usize = 128;

/// Parses a whole source file.
pub fn parse(source: &str, path: Option<PathBuf>) -> Result<SyntaxTree, ThemeError> {
    Ok(Parser::new(source, path)?.parse_program())
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    builder: TreeBuilder,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str, path: Option<PathBuf>) -> Result<Self, ThemeError> {
        let tokens = tokenize(source)?;
        Ok(Parser {
            tokens,
            pos: 0,
            builder: TreeBuilder::new(source, path),
            depth: 0,
        })
    }

    pub fn parse_program(mut self) -> SyntaxTree {
        let body = self.parse_statement_list(true);
        let end = self.builder.source().len();
        let root = self.builder.push(NodeKind::Program { body }, Span::new(0, end));
        let tree = self.builder.finish(root);
        trace!(nodes = tree.len(), errors = tree.errors().len(), "parsed syntax tree");
        tree
    }

    /// Statements up to the closing `}` (not consumed) or end of input.
    pub(crate) fn parse_statement_list(&mut self, top_level: bool) -> Vec<NodeId> {
        let mut body = Vec::new();
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::RBrace if !top_level => break,
                Token::RBrace => {
                    let error = self.error("Unmatched '}'", 204);
                    self.builder.recover(error);
                    self.bump();
                }
                Token::Semicolon => {
                    self.bump();
                }
                _ => body.push(self.parse_statement_recovering()),
            }
        }
        body
    }

    fn parse_statement_recovering(&mut self) -> NodeId {
        let (start_pos, mark) = (self.pos, self.builder.mark());
        let saved_depth = self.depth;

        match statement::parse_statement(self) {
            Ok(id) => id,
            Err(error) => {
                trace!(%error, "skipping statement");
                self.builder.truncate(mark);
                self.builder.recover(error);
                self.pos = start_pos;
                self.depth = saved_depth;

                let start = self.start();
                self.skip_statement();
                if self.pos == start_pos && !matches!(self.peek(), Token::Eof | Token::RBrace) {
                    self.bump();
                }
                self.finish_node(NodeKind::Opaque, start)
            }
        }
    }

    /// Skips one statement with balanced brackets. Stops after a `;`, before
    /// a `}` closing the enclosing block, or at a line break that cannot
    /// continue the statement.
    pub(crate) fn skip_statement(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            let token = self.peek().clone();
            // module-level keywords end a statement left with unclosed brackets
            if self.pos > start && self.newline_before() && self.at_module_keyword() {
                break;
            }
            if depth == 0 && self.pos > start && self.newline_before() {
                let continues = continues_statement(&token)
                    || self.tokens.get(self.pos - 1).is_some_and(|prev| open_ended(&prev.token));
                if !continues {
                    break;
                }
            }

            match token {
                Token::Eof => break,
                Token::Semicolon if depth == 0 => {
                    self.bump();
                    break;
                }
                Token::RBrace if depth == 0 => break,
                Token::LBrace | Token::LParen | Token::LBracket | Token::TemplateHead(_) => {
                    depth += 1;
                }
                Token::RBrace | Token::RParen | Token::RBracket | Token::TemplateTail(_) => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.bump();
        }
    }

    fn at_module_keyword(&self) -> bool {
        match self.peek() {
            Token::Ident(word) if word == "export" => true,
            Token::Ident(word) if word == "import" => {
                !matches!(self.peek_at(1), Token::LParen | Token::Dot)
            }
            _ => false,
        }
    }

    // --- token access ---

    pub(crate) fn current(&self) -> &Spanned {
        // the token list always ends with `Eof` and `pos` never passes it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.current().token
    }

    pub(crate) fn peek_at(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    pub(crate) fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_ident(&mut self, keyword: &str) -> bool {
        if self.peek().is_ident(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, expected: Token) -> Result<Token, ThemeError> {
        if *self.peek() == expected {
            return Ok(self.bump());
        }
        Err(self.error(&format!("Expected {:?}, got {:?}", expected, self.peek()), 202))
    }

    pub(crate) fn expect_ident(&mut self) -> Result<String, ThemeError> {
        match self.peek() {
            Token::Ident(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            other => {
                let message = format!("Expected identifier, got {:?}", other);
                Err(self.error(&message, 202))
            }
        }
    }

    /// `;`, or an automatically inserted one before `}`, a line break or EOF.
    pub(crate) fn consume_semicolon(&mut self) -> Result<(), ThemeError> {
        if self.eat(&Token::Semicolon)
            || matches!(self.peek(), Token::RBrace | Token::Eof)
            || self.newline_before()
        {
            return Ok(());
        }
        let message = format!("Expected ';', got {:?}", self.peek());
        Err(self.error(&message, 203))
    }

    pub(crate) fn newline_before(&self) -> bool {
        self.current().newline_before
    }

    /// Byte offset where the current token starts.
    pub(crate) fn start(&self) -> usize {
        self.current().span.start
    }

    /// Byte offset where the previously consumed token ends.
    pub(crate) fn last_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(prev) => prev.span.end,
            None => 0,
        }
    }

    pub(crate) fn finish_node(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let end = self.last_end().max(start);
        self.builder.push(kind, Span::new(start, end))
    }

    pub(crate) fn error(&self, message: &str, code: u32) -> ThemeError {
        let spanned = self.current();
        if spanned.token == Token::Eof {
            // a statement cut short by the end of the file
            return ThemeError::UnexpectedEof {
                message: message.into(),
                line: spanned.line,
                column: spanned.column,
                hint: None,
                code: Some(201),
            };
        }
        ThemeError::Syntax {
            message: message.into(),
            line: spanned.line,
            column: spanned.column,
            hint: None,
            code: Some(code),
        }
    }

    /// Saves the position for a speculative parse.
    pub(crate) fn checkpoint(&self) -> (usize, usize) {
        (self.pos, self.builder.mark())
    }

    pub(crate) fn rewind(&mut self, checkpoint: (usize, usize)) {
        self.pos = checkpoint.0;
        self.builder.truncate(checkpoint.1);
    }

    /// Index of the token closing the bracket at `open`, if balanced.
    pub(crate) fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, spanned) in self.tokens.iter().enumerate().skip(open) {
            match spanned.token {
                Token::LBrace | Token::LParen | Token::LBracket | Token::TemplateHead(_) => {
                    depth += 1;
                }
                Token::RBrace | Token::RParen | Token::RBracket | Token::TemplateTail(_) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                Token::Eof => return None,
                _ => {}
            }
        }
        None
    }

    pub(crate) fn enter(&mut self) -> Result<(), ThemeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("Nested too deeply", 211));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Tokens that, at the start of a line, still belong to the previous statement.
fn continues_statement(token: &Token) -> bool {
    match token {
        Token::Dot
        | Token::QuestionDot
        | Token::Operator(_)
        | Token::Question
        | Token::Colon
        | Token::Comma
        | Token::Arrow
        | Token::Equals
        | Token::LBrace
        | Token::TemplateMiddle(_)
        | Token::TemplateTail(_) => true,
        Token::Ident(name) => matches!(
            name.as_str(),
            "catch" | "finally" | "else" | "as" | "satisfies" | "extends" | "implements"
        ),
        _ => false,
    }
}

/// Tokens after which a statement cannot end.
fn open_ended(token: &Token) -> bool {
    matches!(
        token,
        Token::Operator(_)
            | Token::Equals
            | Token::Comma
            | Token::Arrow
            | Token::Dot
            | Token::QuestionDot
            | Token::Colon
            | Token::Question
            | Token::TemplateHead(_)
            | Token::TemplateMiddle(_)
    )
}
