// Author: Dustin Pilgrim
// License: MIT

use super::*;
use super::expression::{parse_assignment, parse_expression};
use super::pattern::{parse_binding, parse_block, parse_function_rest};
use super::types::{skip_annotation, skip_balanced, skip_type, skip_type_parameters};
use crate::syntax::{DeclKind, ExportSpecifier, ImportBinding, Imported};

/// Statements nest through blocks, `if` bodies and functions, so they share
/// the expression depth limit.
pub(super) fn parse_statement(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    parser.enter()?;
    let result = parse_statement_inner(parser);
    parser.leave();
    result
}

fn parse_statement_inner(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let keyword = match parser.peek() {
        Token::Ident(word) => Some(word.clone()),
        Token::LBrace => return parse_block(parser),
        Token::Semicolon => {
            parser.bump();
            return Ok(parser.finish_node(NodeKind::Opaque, start));
        }
        _ => None,
    };

    match keyword.as_deref() {
        Some("import") if !matches!(parser.peek_at(1), Token::LParen | Token::Dot) => {
            parse_import(parser)
        }
        Some("export") => parse_export(parser),
        Some("const") if parser.peek_at(1).is_ident("enum") => skip_declaration(parser, start),
        Some("const" | "let" | "var") if starts_binding(parser.peek_at(1)) => {
            parse_var_decl(parser, false, start)
        }
        Some("function") => parse_function_decl(parser, false, start),
        Some("async") if parser.peek_at(1).is_ident("function") => {
            parser.bump();
            parse_function_decl(parser, false, start)
        }
        Some("return") => parse_return(parser),
        Some("if") => parse_if(parser),
        Some("type") if matches!(parser.peek_at(1), Token::Ident(_)) => {
            skip_type_alias(parser, start)
        }
        Some(word) if is_skipped_statement(word, parser.peek_at(1)) => {
            skip_declaration(parser, start)
        }
        _ => parse_expression_statement(parser),
    }
}

/// Type declarations, classes and control flow that the tree keeps opaque.
/// The declaration keywords are contextual and may also name variables.
fn is_skipped_statement(word: &str, next: &Token) -> bool {
    match word {
        "for" | "while" | "switch" | "with" | "do" | "try" | "throw" | "break" | "continue"
        | "debugger" => true,
        "interface" | "enum" | "class" | "abstract" | "declare" | "namespace" | "module" => {
            !matches!(next, Token::Dot | Token::Equals | Token::LParen | Token::Operator(_))
        }
        _ => false,
    }
}

fn starts_binding(token: &Token) -> bool {
    matches!(token, Token::Ident(_) | Token::LBrace | Token::LBracket)
}

/// Declarations and control flow the tree does not model.
fn skip_declaration(parser: &mut Parser, start: usize) -> Result<NodeId, ThemeError> {
    parser.skip_statement();
    Ok(parser.finish_node(NodeKind::Opaque, start))
}

fn skip_type_alias(parser: &mut Parser, start: usize) -> Result<NodeId, ThemeError> {
    parser.bump(); // 'type'
    parser.expect_ident()?;
    skip_type_parameters(parser)?;
    parser.expect(Token::Equals)?;
    skip_type(parser)?;
    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::Opaque, start))
}

fn parse_expression_statement(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let expr = parse_expression(parser)?;
    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::ExprStmt { expr }, start))
}

fn parse_var_decl(parser: &mut Parser, exported: bool, start: usize) -> Result<NodeId, ThemeError> {
    let kind = match parser.bump() {
        Token::Ident(word) if word == "let" => DeclKind::Let,
        Token::Ident(word) if word == "var" => DeclKind::Var,
        _ => DeclKind::Const,
    };

    let mut declarators = Vec::new();
    loop {
        let decl_start = parser.start();
        let (name, pattern) = match parser.peek() {
            Token::Ident(_) => (Some(parser.expect_ident()?), None),
            _ => (None, Some(parse_binding(parser)?)),
        };
        // definite assignment: `let x!: T`
        if parser.peek().is_operator("!") {
            parser.bump();
        }
        skip_annotation(parser)?;
        let init = if parser.eat(&Token::Equals) {
            Some(parse_assignment(parser)?)
        } else {
            None
        };
        declarators.push(parser.finish_node(NodeKind::Declarator { name, pattern, init }, decl_start));

        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::VarDecl { kind, declarators, exported }, start))
}

fn parse_function_decl(parser: &mut Parser, exported: bool, start: usize) -> Result<NodeId, ThemeError> {
    parser.bump(); // 'function'
    parser.eat(&Token::Operator("*".into()));
    let (name, params, body) = parse_function_rest(parser)?;
    Ok(parser.finish_node(NodeKind::FunctionDecl { name, params, body, exported }, start))
}

fn parse_return(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.bump(); // 'return'
    let arg = if matches!(parser.peek(), Token::Semicolon | Token::RBrace | Token::Eof)
        || parser.newline_before()
    {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::Return { arg }, start))
}

fn parse_if(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.bump(); // 'if'
    parser.expect(Token::LParen)?;
    let test = parse_expression(parser)?;
    parser.expect(Token::RParen)?;
    let cons = parse_statement(parser)?;
    let alt = if parser.eat_ident("else") {
        Some(parse_statement(parser)?)
    } else {
        None
    };
    Ok(parser.finish_node(NodeKind::If { test, cons, alt }, start))
}

fn parse_module_source(parser: &mut Parser) -> Result<String, ThemeError> {
    match parser.bump() {
        Token::String(source) => Ok(source),
        other => {
            let message = format!("Expected module specifier string, got {:?}", other);
            Err(parser.error(&message, 202))
        }
    }
}

/// Import attributes: `with { type: 'json' }` or `assert { ... }`.
fn skip_import_attributes(parser: &mut Parser) -> Result<(), ThemeError> {
    if (parser.peek().is_ident("with") || parser.peek().is_ident("assert"))
        && *parser.peek_at(1) == Token::LBrace
        && !parser.newline_before()
    {
        parser.bump();
        skip_balanced(parser)?;
    }
    Ok(())
}

fn parse_import(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.bump(); // 'import'

    // `import type { X } from ...` only brings in types
    if parser.peek().is_ident("type") && !matches!(parser.peek_at(1), Token::Comma)
        && !parser.peek_at(1).is_ident("from")
    {
        parser.skip_statement();
        return Ok(parser.finish_node(NodeKind::Opaque, start));
    }

    // side-effect import
    if let Token::String(_) = parser.peek() {
        let source = parse_module_source(parser)?;
        skip_import_attributes(parser)?;
        parser.consume_semicolon()?;
        return Ok(parser.finish_node(NodeKind::Import { source, bindings: Vec::new() }, start));
    }

    let mut bindings = Vec::new();
    if let Token::Ident(_) = parser.peek() {
        let local = parser.expect_ident()?;
        bindings.push(ImportBinding { local, imported: Imported::Default });
        parser.eat(&Token::Comma);
    }

    match parser.peek() {
        Token::Operator(op) if op == "*" => {
            parser.bump();
            if !parser.eat_ident("as") {
                return Err(parser.error("Expected 'as' after '*'", 202));
            }
            let local = parser.expect_ident()?;
            bindings.push(ImportBinding { local, imported: Imported::Namespace });
        }
        Token::LBrace => {
            parser.bump();
            while *parser.peek() != Token::RBrace {
                // inline type-only specifier: `{ type Theme, palette }`
                let type_only = parser.peek().is_ident("type")
                    && matches!(parser.peek_at(1), Token::Ident(_) | Token::String(_))
                    && !parser.peek_at(1).is_ident("as");
                if type_only {
                    parser.bump();
                }

                let imported = match parser.bump() {
                    Token::Ident(name) | Token::String(name) => name,
                    other => {
                        let message = format!("Unexpected {:?} in import list", other);
                        return Err(parser.error(&message, 202));
                    }
                };
                let local = if parser.eat_ident("as") {
                    parser.expect_ident()?
                } else {
                    imported.clone()
                };

                if !type_only {
                    let imported = if imported == "default" {
                        Imported::Default
                    } else {
                        Imported::Named(imported)
                    };
                    bindings.push(ImportBinding { local, imported });
                }

                if !parser.eat(&Token::Comma) {
                    break;
                }
            }
            parser.expect(Token::RBrace)?;
        }
        _ => {}
    }

    if !parser.eat_ident("from") {
        return Err(parser.error("Expected 'from' in import declaration", 202));
    }
    let source = parse_module_source(parser)?;
    skip_import_attributes(parser)?;
    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::Import { source, bindings }, start))
}

fn parse_export(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.bump(); // 'export'

    let keyword = match parser.peek() {
        Token::Ident(word) => Some(word.clone()),
        _ => None,
    };

    match keyword.as_deref() {
        Some("default") => {
            parser.bump();
            let expr = match parser.peek() {
                Token::Ident(word) if word == "function" => {
                    let fn_start = parser.start();
                    parser.bump();
                    parser.eat(&Token::Operator("*".into()));
                    let (name, params, body) = parse_function_rest(parser)?;
                    parser.finish_node(NodeKind::Function { name, params, body }, fn_start)
                }
                Token::Ident(word)
                    if word == "async" && parser.peek_at(1).is_ident("function") =>
                {
                    let fn_start = parser.start();
                    parser.bump();
                    parser.bump();
                    let (name, params, body) = parse_function_rest(parser)?;
                    parser.finish_node(NodeKind::Function { name, params, body }, fn_start)
                }
                Token::Ident(word) if word == "interface" || word == "abstract" => {
                    return skip_declaration(parser, start);
                }
                _ => {
                    let expr = parse_assignment(parser)?;
                    parser.consume_semicolon()?;
                    expr
                }
            };
            Ok(parser.finish_node(NodeKind::ExportDefault { expr }, start))
        }
        Some("const" | "let" | "var") if !parser.peek_at(1).is_ident("enum") => {
            parse_var_decl(parser, true, start)
        }
        Some("function") => parse_function_decl(parser, true, start),
        Some("async") if parser.peek_at(1).is_ident("function") => {
            parser.bump();
            parse_function_decl(parser, true, start)
        }
        // `export type { X }` and `export type X = ...` are type-only
        Some(
            "type" | "interface" | "enum" | "const" | "class" | "abstract" | "declare"
            | "namespace" | "module",
        ) => skip_declaration(parser, start),
        Some("import") => {
            // `export import A = B.C`
            skip_declaration(parser, start)
        }
        _ => parse_export_list(parser, start),
    }
}

/// `export { a, b as c } [from '...']`, `export * [as ns] from '...'`.
fn parse_export_list(parser: &mut Parser, start: usize) -> Result<NodeId, ThemeError> {
    let mut specifiers = Vec::new();

    match parser.bump() {
        Token::Operator(op) if op == "*" => {
            let exported = if parser.eat_ident("as") {
                match parser.bump() {
                    Token::Ident(name) | Token::String(name) => name,
                    other => {
                        let message = format!("Unexpected {:?} after 'as'", other);
                        return Err(parser.error(&message, 202));
                    }
                }
            } else {
                "*".to_string()
            };
            specifiers.push(ExportSpecifier { local: "*".into(), exported });
        }
        Token::LBrace => {
            while *parser.peek() != Token::RBrace {
                let type_only = parser.peek().is_ident("type")
                    && matches!(parser.peek_at(1), Token::Ident(_) | Token::String(_))
                    && !parser.peek_at(1).is_ident("as");
                if type_only {
                    parser.bump();
                }

                let local = match parser.bump() {
                    Token::Ident(name) | Token::String(name) => name,
                    other => {
                        let message = format!("Unexpected {:?} in export list", other);
                        return Err(parser.error(&message, 202));
                    }
                };
                let exported = if parser.eat_ident("as") {
                    match parser.bump() {
                        Token::Ident(name) | Token::String(name) => name,
                        other => {
                            let message = format!("Unexpected {:?} after 'as'", other);
                            return Err(parser.error(&message, 202));
                        }
                    }
                } else {
                    local.clone()
                };
                if !type_only {
                    specifiers.push(ExportSpecifier { local, exported });
                }

                if !parser.eat(&Token::Comma) {
                    break;
                }
            }
            parser.expect(Token::RBrace)?;
        }
        Token::Equals => {
            // `export = value`
            parse_assignment(parser)?;
            parser.consume_semicolon()?;
            return Ok(parser.finish_node(NodeKind::Opaque, start));
        }
        other => {
            let message = format!("Unexpected {:?} after 'export'", other);
            return Err(parser.error(&message, 202));
        }
    }

    let source = if parser.eat_ident("from") {
        let source = parse_module_source(parser)?;
        skip_import_attributes(parser)?;
        Some(source)
    } else {
        None
    };
    parser.consume_semicolon()?;
    Ok(parser.finish_node(NodeKind::ExportNamed { specifiers, source }, start))
}
