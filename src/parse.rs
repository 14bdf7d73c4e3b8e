use crate::ast::Expression;
use crate::lex::LexItem;
use crate::parse_error::ParseError;
use crate::token::Token;

pub fn parse(input: &str, items: &[LexItem]) -> Result<Expression, ParseError> {
    let mut curr_pos = 0;
    let expr = parse_expr(input, items, &mut curr_pos)?;
    match items.get(curr_pos) {
        None => Ok(expr),
        Some(li) => Err(ParseError::Unfinished(li.token, li.span)),
    }
}

fn parse_expr(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        input,
        items,
        curr_pos,
        &[Token::Plus, Token::Minus],
        parse_term,
    )
}

fn parse_term(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        input,
        items,
        curr_pos,
        &[Token::Star, Token::Slash, Token::Percent],
        parse_unary,
    )
}

fn parse_recursive_binary<F>(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
    match_tokens: &'static [Token],
    lower_fn: F,
) -> Result<Expression, ParseError>
where
    F: Fn(&str, &[LexItem], &mut usize) -> Result<Expression, ParseError>,
{
    let mut lhs = lower_fn(input, items, curr_pos)?;

    while let Some(op) = items.get(*curr_pos) {
        if !match_tokens.contains(&op.token) {
            break;
        }
        *curr_pos += 1;
        let rhs = lower_fn(input, items, curr_pos)?;
        lhs = Expression::BinaryOp(Box::new(lhs), op.token, Box::new(rhs));
    }

    Ok(lhs)
}

// exponent binds tighter than unary minus: -2^2 parses as -(2^2)
fn parse_unary(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    let Some(li) = items.get(*curr_pos) else {
        return Err(ParseError::Eof);
    };

    if li.token == Token::Minus {
        *curr_pos += 1;
        Ok(Expression::UnaryOp(
            Box::new(parse_unary(input, items, curr_pos)?),
            Token::Minus,
        ))
    } else {
        parse_power(input, items, curr_pos)
    }
}

// the exponent tower is right-associative: 2^3^2 parses as 2^(3^2); the
// right operand goes through `unary` so 2^-1 stays legal
fn parse_power(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    let lhs = parse_atom(input, items, curr_pos)?;

    if let Some(op) = items.get(*curr_pos) {
        if op.token == Token::Caret {
            *curr_pos += 1;
            let rhs = parse_unary(input, items, curr_pos)?;
            return Ok(Expression::BinaryOp(
                Box::new(lhs),
                Token::Caret,
                Box::new(rhs),
            ));
        }
    }

    Ok(lhs)
}

fn parse_atom(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    let Some(li) = items.get(*curr_pos) else {
        return Err(ParseError::Eof);
    };

    match li.token {
        Token::Number => parse_number(input, items, curr_pos),
        Token::Identifier => parse_identifier_or_call(input, items, curr_pos),
        Token::LeftParen => parse_group(input, items, curr_pos),
        _ => Err(ParseError::UnexpectedToken(li.token, li.span)),
    }
}

fn parse_group(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    consume_token(items, Token::LeftParen, curr_pos)?;
    let expr = parse_expr(input, items, curr_pos)?;
    consume_token(items, Token::RightParen, curr_pos)?;
    Ok(expr)
}

// A bare identifier followed by `(` is a function call. Arity is
// validated at evaluation time against the function table.
fn parse_identifier_or_call(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    let id_item = consume_token(items, Token::Identifier, curr_pos)?;
    let name = id_item.span.str_from_source(input).to_string();

    if !peek(items, &[Token::LeftParen], *curr_pos) {
        return Ok(Expression::Identifier(name));
    }

    consume_token(items, Token::LeftParen, curr_pos)?;
    let mut args = vec![parse_expr(input, items, curr_pos)?];
    while peek(items, &[Token::Comma], *curr_pos) {
        consume_token(items, Token::Comma, curr_pos)?;
        args.push(parse_expr(input, items, curr_pos)?);
    }
    consume_token(items, Token::RightParen, curr_pos)?;

    Ok(Expression::FnCall(name, args))
}

fn parse_number(
    input: &str,
    items: &[LexItem],
    curr_pos: &mut usize,
) -> Result<Expression, ParseError> {
    let li = consume_token(items, Token::Number, curr_pos)?;
    let source = li.span.str_from_source(input);
    match source.parse::<f64>() {
        Err(_) => Err(ParseError::ParseToNumber(li.span)),
        Ok(num) => Ok(Expression::Number(num)),
    }
}

fn consume_token<'a>(
    items: &'a [LexItem],
    token: Token,
    curr_pos: &mut usize,
) -> Result<&'a LexItem, ParseError> {
    let Some(li) = items.get(*curr_pos) else {
        return Err(ParseError::Eof);
    };
    if li.token != token {
        return Err(ParseError::ExpectedToken {
            expected: token,
            found: li.token,
            span: li.span,
        });
    }
    *curr_pos += 1;
    Ok(li)
}

fn peek(items: &[LexItem], match_tokens: &'static [Token], curr_pos: usize) -> bool {
    items
        .get(curr_pos)
        .map(|li| match_tokens.contains(&li.token))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::lex;

    fn parse_str(input: &str) -> Result<Expression, ParseError> {
        let items = lex(input)?;
        parse(input, &items)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_str("2+3*4").unwrap();
        assert_eq!(expr.to_string(), "(2 + (3 * 4))");
    }

    #[test]
    fn exponent_is_right_associative() {
        let expr = parse_str("2^3^2").unwrap();
        assert_eq!(expr.to_string(), "(2 ^ (3 ^ 2))");
    }

    #[test]
    fn exponent_binds_tighter_than_unary_minus() {
        let expr = parse_str("-2^2").unwrap();
        assert_eq!(expr.to_string(), "(-(2 ^ 2))");

        let expr = parse_str("(-2)^2").unwrap();
        assert_eq!(expr.to_string(), "((-2) ^ 2)");
    }

    #[test]
    fn negative_exponent_is_legal() {
        let expr = parse_str("2^-1").unwrap();
        assert_eq!(expr.to_string(), "(2 ^ (-1))");
    }

    #[test]
    fn parens_override_precedence() {
        let expr = parse_str("(2+3)*4").unwrap();
        assert_eq!(expr.to_string(), "((2 + 3) * 4)");
    }

    #[test]
    fn unary_minus_nests() {
        let expr = parse_str("--3").unwrap();
        assert_eq!(expr.to_string(), "(-(-3))");
    }

    #[test]
    fn function_call_with_two_args() {
        let expr = parse_str("pow(2, x+1)").unwrap();
        assert_eq!(expr.to_string(), "pow(2, (x + 1))");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_str(""), Err(ParseError::Eof)));
    }

    #[test]
    fn unmatched_paren_is_an_error() {
        assert!(matches!(
            parse_str("(1+2"),
            Err(ParseError::Eof | ParseError::ExpectedToken { .. })
        ));
    }

    #[test]
    fn missing_operand_is_an_error() {
        assert!(parse_str("1+").is_err());
    }

    #[test]
    fn leftover_tokens_are_an_error() {
        assert!(matches!(
            parse_str("1 2"),
            Err(ParseError::Unfinished(Token::Number, _))
        ));
    }
}
