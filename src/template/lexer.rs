//! Lexer for naming templates using logos

use logos::Logos;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // A complete `{...}` placeholder; the payload excludes the braces
    #[regex(r"\{[^{}]*\}", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Placeholder(String),

    // Any run of text without braces
    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Literal(String),

    // An opening brace that is never closed, with the text up to the next brace
    #[regex(r"\{[^{}]*", |lex| lex.slice().to_string())]
    Unterminated(String),

    // A closing brace without a matching opening brace
    #[token("}")]
    CloseBrace,
}

/// Lex a template into tokens with spans
///
/// Text the lexer cannot match is kept as an unterminated placeholder so that
/// nothing in the template is dropped silently.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(tok) => (tok, span),
        Err(()) => (Token::Unterminated(input[span.clone()].to_string()), span),
    })
}
