//! quoting and splitting of value literals
use crate::error::SyntaxError;

/// Splits a value into tokens
///
/// - whitespace separates tokens, runs of whitespace collapse
/// - `\` takes the next character literally
/// - a `"` or `'` at the start of a token quotes until the same quote, whitespace included
/// - `[a, b, c]` is a list: the brackets are dropped and `,` separates as well
pub fn split(text: &str) -> Result<Vec<String>, SyntaxError> {
    let trimmed = text.trim();
    let (body, list) = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => (inner, true),
        None => (trimmed, false),
    };

    let mut tokens = vec![];
    let mut token = String::new();
    let mut in_token = false;
    let mut escaped = false;
    let mut quote: Option<char> = None;

    for c in body.chars() {
        if escaped {
            token.push(c);
            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            in_token = true;
            continue;
        }

        if let Some(open) = quote {
            if c == open {
                quote = None;
            } else {
                token.push(c);
            }
            continue;
        }

        match c {
            '"' | '\'' if !in_token => {
                quote = Some(c);
                in_token = true;
            }
            c if c.is_whitespace() || (list && c == ',') => {
                if in_token {
                    tokens.push(std::mem::take(&mut token));
                    in_token = false;
                }
            }
            c => {
                token.push(c);
                in_token = true;
            }
        }
    }

    if escaped {
        return Err(SyntaxError::UnterminatedEscape(trimmed.to_string()));
    }
    if quote.is_some() {
        return Err(SyntaxError::UnterminatedQuote(trimmed.to_string()));
    }
    if in_token {
        tokens.push(token);
    }

    Ok(tokens)
}

/// Strips one pair of matching quotes around a single text value
///
/// Text that opens a quote without closing it is rejected.
pub fn unquote(text: &str) -> Result<&str, SyntaxError> {
    let Some(open) = text.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        return Ok(text);
    };

    match text[1..].strip_suffix(open) {
        Some(inner) => Ok(inner),
        None => Err(SyntaxError::UnterminatedQuote(text.to_string())),
    }
}
