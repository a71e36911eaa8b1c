//! Turns a command line into argument tokens.
//!
//! Arguments are whitespace separated with shell-style quoting. A trailing
//! structured literal (`{...}` mapping or `[...]` list) is kept as one raw
//! token so its commas and colons survive tokenization.

use std::ops::Range;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no closing quotation")]
    UnclosedQuote,

    #[error("no escaped character")]
    TrailingEscape,
}

/// Split `line` into argument tokens.
///
/// The first mapping literal in the line, or failing that the first list
/// literal, ends the token list: whatever precedes it is tokenized normally
/// and the literal text is appended verbatim. Text after the literal is
/// ignored.
pub fn parse(line: &str) -> Result<Vec<String>, ParseError> {
    let region = find_region(line, '{', '}').or_else(|| find_region(line, '[', ']'));
    match region {
        Some(range) => {
            let mut tokens = split(&line[..range.start])?;
            tokens.push(line[range].to_string());
            Ok(tokens)
        }
        None => split(line),
    }
}

/// Tokenize with POSIX shell quoting, then drop one trailing comma per token.
///
/// Single quotes are literal, double quotes honour `\"` and `\\`, and a
/// backslash outside quotes escapes the next character. Adjacent quoted and
/// unquoted pieces join into one token.
pub fn split(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(ParseError::UnclosedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(ParseError::UnclosedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(ParseError::UnclosedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(ParseError::TrailingEscape),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens
        .into_iter()
        .map(|mut token| {
            if token.ends_with(',') {
                token.pop();
            }
            token
        })
        .collect())
}

/// Locate the first balanced region opened by `open`.
///
/// Quoted text is skipped both when looking for the opener and inside the
/// region. Nested `{}`/`[]` pairs must match; a stray or missing closer means
/// there is no region.
pub fn find_region(line: &str, open: char, close: char) -> Option<Range<usize>> {
    let mut chars = line.char_indices();
    let mut quote = None;
    let start = loop {
        let (i, c) = chars.next()?;
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if c == open => break i,
            _ => {}
        }
    };

    let mut expected = vec![close];
    let mut escaped = false;
    for (i, c) in chars {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => expected.push('}'),
            '[' => expected.push(']'),
            '}' | ']' => {
                if expected.pop() != Some(c) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(start..i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        parse(line).unwrap()
    }

    #[test]
    fn test_plain_tokens() {
        assert_eq!(tokens("User 1234 name Betty"), ["User", "1234", "name", "Betty"]);
    }

    #[test]
    fn test_empty_line() {
        assert!(tokens("").is_empty());
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_quoted_token_keeps_spaces() {
        assert_eq!(
            tokens(r#"User 1234 first_name "Betty Holberton""#),
            ["User", "1234", "first_name", "Betty Holberton"]
        );
        assert_eq!(tokens("City 1 name 'San Francisco'"), ["City", "1", "name", "San Francisco"]);
    }

    #[test]
    fn test_strips_one_trailing_comma() {
        assert_eq!(tokens(r#"User "1234", "name", "Betty""#), ["User", "1234", "name", "Betty"]);
        assert_eq!(tokens("a,, b"), ["a,", "b"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(tokens(r#"say "a \"b\" c""#), ["say", r#"a "b" c"#]);
        assert_eq!(tokens(r"two\ words"), ["two words"]);
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(parse(r#"User 1234 name "Betty"#), Err(ParseError::UnclosedQuote));
        assert_eq!(parse("User 1234 \\"), Err(ParseError::TrailingEscape));
    }

    #[test]
    fn test_mapping_literal_is_one_token() {
        assert_eq!(
            tokens(r#"User 123-abc {"a": "b", "c": "d"}"#),
            ["User", "123-abc", r#"{"a": "b", "c": "d"}"#]
        );
    }

    #[test]
    fn test_nested_mapping_literal() {
        assert_eq!(
            tokens(r#"User 1 {"a": {"b": [1, 2]}, "c": "}"}"#),
            ["User", "1", r#"{"a": {"b": [1, 2]}, "c": "}"}"#]
        );
    }

    #[test]
    fn test_list_literal_when_no_mapping() {
        assert_eq!(tokens("Place 1 amenity_ids [\"x\", \"y\"]"), ["Place", "1", "amenity_ids", "[\"x\", \"y\"]"]);
    }

    #[test]
    fn test_unbalanced_literal_falls_back_to_plain_tokens() {
        assert_eq!(tokens("User 1 {a b"), ["User", "1", "{a", "b"]);
        assert_eq!(tokens("User 1 {a]"), ["User", "1", "{a]"]);
    }

    #[test]
    fn test_brace_inside_quotes_is_not_a_literal() {
        assert_eq!(tokens(r#"User 1 name "{x}""#), ["User", "1", "name", "{x}"]);
    }

    #[test]
    fn test_call_style_arguments() {
        assert_eq!(
            tokens(r#"User "38f22813", {'first_name': "John", "age": 89}"#),
            ["User", "38f22813", r#"{'first_name': "John", "age": 89}"#]
        );
    }
}
