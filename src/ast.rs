use crate::token::Token;

/// Expression tree built by the parser. Nodes never reference the
/// environment; the same tree can be re-evaluated at different `x`
/// bindings (the plot sampler relies on this).
#[derive(Debug)]
pub enum Expression {
    Number(f64),
    Identifier(String),
    UnaryOp(Box<Expression>, Token),
    BinaryOp(Box<Expression>, Token, Box<Expression>),
    FnCall(String, Vec<Expression>),
}

impl std::fmt::Display for Expression {
    /// Canonical, fully parenthesized rendering. Re-parsing the output
    /// yields a tree that evaluates to the same value.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Number(v) => write!(f, "{}", v),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::UnaryOp(operand, op) => write!(f, "({}{})", op, operand),
            Expression::BinaryOp(lhs, op, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expression::FnCall(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_canonical_text() {
        let expr = Expression::BinaryOp(
            Box::new(Expression::Number(2.0)),
            Token::Plus,
            Box::new(Expression::FnCall(
                "pow".to_string(),
                vec![Expression::Number(3.0), Expression::Identifier("x".to_string())],
            )),
        );
        assert_eq!(expr.to_string(), "(2 + pow(3, x))");
    }

    #[test]
    fn renders_unary_minus() {
        let expr = Expression::UnaryOp(Box::new(Expression::Number(5.0)), Token::Minus);
        assert_eq!(expr.to_string(), "(-5)");
    }
}
