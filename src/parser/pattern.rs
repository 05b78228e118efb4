// Author: Dustin Pilgrim
// License: MIT

use super::*;
use super::types::{skip_annotation, skip_type_parameters};

/// A binding target: identifier, object pattern or array pattern, with an
/// optional type annotation and default value.
pub(super) fn parse_binding(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    let mut names = Vec::new();
    let mut defaults = Vec::new();

    parser.eat(&Token::Ellipsis);
    collect_binding(parser, &mut names, &mut defaults)?;
    parser.eat(&Token::Question);
    skip_annotation(parser)?;
    if parser.eat(&Token::Equals) {
        defaults.push(expression::parse_assignment(parser)?);
    }

    Ok(parser.finish_node(NodeKind::Pattern { names, defaults }, start))
}

fn collect_binding(
    parser: &mut Parser,
    names: &mut Vec<String>,
    defaults: &mut Vec<NodeId>,
) -> Result<(), ThemeError> {
    match parser.peek().clone() {
        Token::Ident(name) => {
            parser.bump();
            // TypeScript parameter properties: `constructor(private x: T)`
            if matches!(name.as_str(), "public" | "private" | "protected" | "readonly")
                && matches!(parser.peek(), Token::Ident(_))
            {
                return collect_binding(parser, names, defaults);
            }
            names.push(name);
            Ok(())
        }
        Token::LBrace => collect_object_pattern(parser, names, defaults),
        Token::LBracket => collect_array_pattern(parser, names, defaults),
        other => {
            let message = format!("Expected a binding, got {:?}", other);
            Err(parser.error(&message, 213))
        }
    }
}

fn collect_object_pattern(
    parser: &mut Parser,
    names: &mut Vec<String>,
    defaults: &mut Vec<NodeId>,
) -> Result<(), ThemeError> {
    parser.expect(Token::LBrace)?;
    while *parser.peek() != Token::RBrace {
        if parser.eat(&Token::Ellipsis) {
            collect_binding(parser, names, defaults)?;
        } else {
            let key = match parser.bump() {
                Token::Ident(name) | Token::String(name) => Some(name),
                Token::Number(_) => None,
                Token::LBracket => {
                    expression::parse_assignment(parser)?;
                    parser.expect(Token::RBracket)?;
                    None
                }
                other => {
                    let message = format!("Unexpected {:?} in object pattern", other);
                    return Err(parser.error(&message, 213));
                }
            };

            if parser.eat(&Token::Colon) {
                collect_binding(parser, names, defaults)?;
            } else if let Some(key) = key {
                names.push(key);
            }
            if parser.eat(&Token::Equals) {
                defaults.push(expression::parse_assignment(parser)?);
            }
        }

        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RBrace)?;
    Ok(())
}

fn collect_array_pattern(
    parser: &mut Parser,
    names: &mut Vec<String>,
    defaults: &mut Vec<NodeId>,
) -> Result<(), ThemeError> {
    parser.expect(Token::LBracket)?;
    while *parser.peek() != Token::RBracket {
        if parser.eat(&Token::Comma) {
            continue; // hole
        }
        parser.eat(&Token::Ellipsis);
        collect_binding(parser, names, defaults)?;
        if parser.eat(&Token::Equals) {
            defaults.push(expression::parse_assignment(parser)?);
        }
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RBracket)?;
    Ok(())
}

/// `(a, { b }, ...rest)`
pub(super) fn parse_params(parser: &mut Parser) -> Result<Vec<NodeId>, ThemeError> {
    parser.expect(Token::LParen)?;
    let mut params = Vec::new();
    while *parser.peek() != Token::RParen {
        params.push(parse_binding(parser)?);
        if !parser.eat(&Token::Comma) {
            break;
        }
    }
    parser.expect(Token::RParen)?;
    Ok(params)
}

/// `{ statements }`
pub(super) fn parse_block(parser: &mut Parser) -> Result<NodeId, ThemeError> {
    let start = parser.start();
    parser.expect(Token::LBrace)?;
    let body = parser.parse_statement_list(false);
    parser.expect(Token::RBrace)?;
    Ok(parser.finish_node(NodeKind::Block { body }, start))
}

/// Everything after the `function` keyword (and the optional `*`): name,
/// type parameters, parameters, return type and body.
pub(super) fn parse_function_rest(
    parser: &mut Parser,
) -> Result<(Option<String>, Vec<NodeId>, NodeId), ThemeError> {
    let name = match parser.peek() {
        Token::Ident(_) => Some(parser.expect_ident()?),
        _ => None,
    };
    skip_type_parameters(parser)?;
    let params = parse_params(parser)?;
    skip_annotation(parser)?;

    // overload signature without a body
    if *parser.peek() != Token::LBrace {
        let start = parser.start();
        parser.consume_semicolon()?;
        let body = parser.finish_node(NodeKind::Block { body: Vec::new() }, start);
        return Ok((name, params, body));
    }

    let body = parse_block(parser)?;
    Ok((name, params, body))
}
