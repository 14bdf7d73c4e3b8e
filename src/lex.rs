use std::iter::Peekable;
use std::str::CharIndices;

use crate::parse_error::ParseError;
use crate::span::Span;
use crate::token::Token;

#[derive(Debug)]
pub struct LexItem {
    pub span: Span,
    pub token: Token,
}

impl LexItem {
    pub fn new(token: Token, span: Span) -> Self {
        LexItem { token, span }
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_identifier_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

pub fn lex(input: &str) -> Result<Vec<LexItem>, ParseError> {
    let mut result = vec![];
    let mut iter = input.char_indices().peekable();

    while let Some((offset, c)) = iter.next() {
        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '%' => Token::Percent,
            ',' => Token::Comma,
            c if c.is_whitespace() => continue,
            c if c.is_ascii_digit() => {
                result.push(lex_number(offset, &mut iter));
                continue;
            }
            c if is_identifier_start(c) => {
                result.push(lex_identifier(offset, &mut iter));
                continue;
            }
            c => return Err(ParseError::UnexpectedCharacter(c, Span::one(offset))),
        };
        result.push(LexItem::new(token, Span::one(offset)));
    }

    Ok(result)
}

fn lex_number(start: usize, iter: &mut Peekable<CharIndices>) -> LexItem {
    let mut end = start;
    let mut seen_dot = false;

    while let Some(&(offset, c)) = iter.peek() {
        if c.is_ascii_digit() || (c == '.' && !seen_dot) {
            seen_dot |= c == '.';
            end = offset;
            iter.next();
        } else {
            break;
        }
    }

    LexItem::new(Token::Number, Span::new(start, end))
}

fn lex_identifier(start: usize, iter: &mut Peekable<CharIndices>) -> LexItem {
    let mut end = start;

    while let Some(&(offset, c)) = iter.peek() {
        if !is_identifier_char(c) {
            break;
        }
        end = offset;
        iter.next();
    }

    LexItem::new(Token::Identifier, Span::new(start, end))
}
