pub mod token;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::GenError;
use token::Token;

/// Lex one source file. `file_id` is threaded into every span so diagnostics
/// and interception keys can be resolved back to the right file.
pub fn lex(source: &str, file_id: u32) -> Result<Vec<Spanned<Token>>, GenError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => {
                if matches!(tok, Token::Comment) {
                    continue;
                }
                tokens.push(Spanned::new(tok, Span::with_file(span.start, span.end, file_id)));
            }
            Err(()) => {
                return Err(GenError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    Span::with_file(span.start, span.end, file_id),
                ));
            }
        }
    }

    Ok(tokens)
}
