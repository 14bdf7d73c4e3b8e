use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Token {
    #[display(fmt = "(")]
    LeftParen,
    #[display(fmt = ")")]
    RightParen,

    #[display(fmt = "number")]
    Number,
    #[display(fmt = "identifier")]
    Identifier,

    #[display(fmt = "+")]
    Plus,
    #[display(fmt = "-")]
    Minus,
    #[display(fmt = "*")]
    Star,
    #[display(fmt = "/")]
    Slash,
    #[display(fmt = "^")]
    Caret,
    #[display(fmt = "%")]
    Percent,
    #[display(fmt = ",")]
    Comma,
}
