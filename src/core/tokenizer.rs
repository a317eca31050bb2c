// EN: src/core/tokenizer.rs

//! Splits `cmd.exe` command lines into argument vectors.
//!
//! A word is a run of adjacent pieces, ended by whitespace:
//! - unquoted text (anything but whitespace, `^`, `'` and `"`),
//! - `'single quoted'` text, taken literally,
//! - `"double quoted"` text, where `^` is literal and `""` is a literal quote,
//! - `^x` outside quotes, which stands for `x`.
//!
//! The `""` rule is what lets `Platform::Windows.escape` output be split back into the
//! original word. The rest is a best-effort approximation of `cmd.exe`, not a
//! bit-exact port.

use crate::core::platform::SplitError;
use std::{iter::Peekable, mem, str::Chars};

pub(crate) fn split_windows(text: &str) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut field = String::new();
    let mut in_word = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(mem::take(&mut field));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                read_single_quoted(&mut chars, &mut field)
                    .ok_or_else(|| SplitError::UnmatchedQuote(text.to_string()))?;
            }
            '"' => {
                in_word = true;
                read_double_quoted(&mut chars, &mut field)
                    .ok_or_else(|| SplitError::UnmatchedQuote(text.to_string()))?;
            }
            '^' => {
                in_word = true;
                // A trailing caret escapes nothing.
                if let Some(escaped) = chars.next() {
                    field.push(escaped);
                }
            }
            c => {
                in_word = true;
                field.push(c);
            }
        }
    }

    if in_word {
        words.push(field);
    }
    Ok(words)
}

/// Consumes up to the closing quote. `None` if there is none.
fn read_single_quoted(chars: &mut Peekable<Chars<'_>>, field: &mut String) -> Option<()> {
    loop {
        match chars.next()? {
            '\'' => return Some(()),
            c => field.push(c),
        }
    }
}

fn read_double_quoted(chars: &mut Peekable<Chars<'_>>, field: &mut String) -> Option<()> {
    loop {
        match chars.next()? {
            '"' if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => return Some(()),
            c => field.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        split_windows(text).unwrap()
    }

    #[test]
    fn test_split_plain_words() {
        assert_eq!(words("ps2pdf  in.ps\tout.pdf "), vec!["ps2pdf", "in.ps", "out.pdf"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_split_quoted_runs_join_adjacent_text() {
        assert_eq!(words(r#"/o"output file".pdf"#), vec!["/ooutput file.pdf"]);
        assert_eq!(words("'a b'c"), vec!["a bc"]);
        assert_eq!(words(r#""" x"#), vec!["", "x"]);
    }

    #[test]
    fn test_split_caret_escapes() {
        assert_eq!(words("a^ b"), vec!["a b"]);
        assert_eq!(words("end^"), vec!["end"]);
        assert_eq!(words("^\"a b^\""), vec!["\"a", "b\""]);
    }

    #[test]
    fn test_split_caret_is_literal_inside_double_quotes() {
        assert_eq!(words(r#""a^b""#), vec!["a^b"]);
        assert_eq!(words(r#""a^""b""#), vec![r#"a^"b"#]);
        assert_eq!(words(r#""trailing^""#), vec!["trailing^"]);
    }

    #[test]
    fn test_split_doubled_quote_inside_double_quotes() {
        assert_eq!(words(r#""say ""hi""""#), vec![r#"say "hi""#]);
    }

    #[test]
    fn test_split_unterminated_quotes_fail() {
        assert!(matches!(
            split_windows(r#"echo "open"#),
            Err(SplitError::UnmatchedQuote(_))
        ));
        assert!(matches!(
            split_windows("echo 'open"),
            Err(SplitError::UnmatchedQuote(_))
        ));
        assert!(matches!(
            split_windows(r#""dangling^"#),
            Err(SplitError::UnmatchedQuote(_))
        ));
        assert!(matches!(
            split_windows(r#"echo "a^"b""#),
            Err(SplitError::UnmatchedQuote(_))
        ));
    }
}
