// src/field_path.rs
//! Field path grammar: `a.b`, `"a.b".c`, `'it\'s'.x`.
//!
//! Segments are separated by `.`. A segment may be wrapped in single or double
//! quotes, in which case it may contain dots, and `'`, `"` and `\` can be
//! escaped with a backslash.
use itertools::Itertools;

use crate::errors::FieldPathError;

const ESC: char = '\\';
const DELIMITER: char = '.';

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn needs_escape(c: char) -> bool {
    is_quote(c) || c == ESC
}

/// Split a path string into its segments.
pub fn split(path: &str) -> Result<Vec<String>, FieldPathError> {
    if path.is_empty() {
        return Err(FieldPathError::new("empty path", path, -1));
    }
    Scanner::new(path).run()
}

/// Join segments into a path string, quoting the segments that need it.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| {
            let segment = segment.as_ref();
            if !segment.chars().any(needs_escape) {
                return segment.to_string();
            }
            let mut out = String::with_capacity(segment.len() + 2);
            out.push('"');
            for c in segment.chars() {
                if needs_escape(c) {
                    out.push(ESC);
                }
                out.push(c);
            }
            out.push('"');
            out
        })
        .join(".")
}

struct Scanner<'a> {
    path: &'a str,
    chars: Vec<char>,
    i: usize,
    segments: Vec<String>,
    current: String,
    // index of the most recent delimiter
    last_delimiter: isize,
    in_quotes: Option<char>,
    open_quote: Option<usize>,
}

impl<'a> Scanner<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            chars: path.chars().collect(),
            i: 0,
            segments: Vec::new(),
            current: String::new(),
            last_delimiter: -1,
            in_quotes: None,
            open_quote: None,
        }
    }

    fn error(&self, detail: impl Into<String>, position: usize) -> FieldPathError {
        FieldPathError::new(detail, self.path, position as isize)
    }

    fn run(mut self) -> Result<Vec<String>, FieldPathError> {
        while let Some(&c) = self.chars.get(self.i) {
            match c {
                c if is_quote(c) && self.in_quotes == Some(c) => {
                    self.in_quotes = None;
                    if matches!(self.chars.get(self.i + 1), Some(&next) if next != DELIMITER) {
                        return Err(self.error("character(s) after closing quote", self.i + 1));
                    }
                    self.i += 1;
                    continue;
                }
                c if is_quote(c) && self.in_quotes.is_none() => {
                    if self.last_delimiter != self.i as isize - 1 {
                        return Err(self.error(
                            format!("unquoted/unescaped {c} char (or char before opening quote)"),
                            self.i,
                        ));
                    }
                    self.in_quotes = Some(c);
                    self.open_quote = Some(self.i);
                    self.i += 1;
                    continue;
                }
                ESC => {
                    if self.in_quotes.is_none() {
                        return Err(self.error("escape character found outside quotes", self.i));
                    }
                    match self.chars.get(self.i + 1) {
                        Some(&escaped) if needs_escape(escaped) => {
                            self.current.push(escaped);
                            self.i += 2;
                            continue;
                        }
                        other => {
                            let found = other.map(|c| c.to_string()).unwrap_or_default();
                            return Err(self.error(
                                format!("only ', \" and \\ chars can be escaped, found: \\{found}"),
                                self.i,
                            ));
                        }
                    }
                }
                DELIMITER if self.in_quotes.is_none() => {
                    self.capture()?;
                    self.last_delimiter = self.i as isize;
                    self.open_quote = None;
                    self.i += 1;
                    continue;
                }
                _ => {}
            }
            self.current.push(c);
            self.i += 1;
        }

        if self.in_quotes.is_some() {
            let open = self.open_quote.unwrap_or_default();
            return Err(self.error("unclosed quote", open));
        }
        if self.last_delimiter == self.chars.len() as isize - 1 {
            return Err(self.error("cannot end with a dot", self.chars.len() - 1));
        }

        self.capture()?;
        Ok(self.segments)
    }

    fn capture(&mut self) -> Result<(), FieldPathError> {
        if self.current.is_empty() {
            let start = match self.open_quote {
                Some(quote) => quote as isize,
                None => self.last_delimiter,
            } + 1;
            return Err(FieldPathError::new("zero length name", self.path, start));
        }
        self.segments.push(std::mem::take(&mut self.current));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn split_err(path: &str) -> (String, isize) {
        let err = split(path).unwrap_err();
        assert_eq!(err.path, path);
        (err.detail, err.position)
    }

    #[test]
    fn splits_plain_and_quoted_segments() {
        assert_eq!(split("a.b").unwrap(), vec!["a", "b"]);
        assert_eq!(split("abc").unwrap(), vec!["abc"]);
        assert_eq!(split("\"a.b\".c").unwrap(), vec!["a.b", "c"]);
        assert_eq!(split("x.'y.z'").unwrap(), vec!["x", "y.z"]);
        assert_eq!(split("'say \"hi\"'").unwrap(), vec!["say \"hi\""]);
        assert_eq!(split("\"it\\'s\".\"a\\\\b\"").unwrap(), vec!["it's", "a\\b"]);
        assert_eq!(split("list.0.name").unwrap(), vec!["list", "0", "name"]);
    }

    #[test]
    fn rejects_empty_path() {
        assert_eq!(split_err(""), ("empty path".to_string(), -1));
    }

    #[test]
    fn rejects_trailing_dot() {
        assert_eq!(split_err("abc.d."), ("cannot end with a dot".to_string(), 5));
    }

    #[test]
    fn rejects_zero_length_names() {
        assert_eq!(split_err(".a").1, 0);
        assert_eq!(split_err("a..b"), ("zero length name".to_string(), 2));
        assert_eq!(split_err("a.\"\".b"), ("zero length name".to_string(), 3));
    }

    #[test]
    fn rejects_misplaced_quotes() {
        let (detail, position) = split_err("a.b\"c\".d");
        assert!(detail.starts_with("unquoted/unescaped"), "{detail}");
        assert_eq!(position, 3);

        assert_eq!(
            split_err("a.\"b\"c.d"),
            ("character(s) after closing quote".to_string(), 5)
        );
        assert_eq!(split_err("a.'bc"), ("unclosed quote".to_string(), 2));
    }

    #[test]
    fn rejects_bad_escapes() {
        assert_eq!(split_err("a\\b").1, 1);
        let (detail, position) = split_err("'a\\nb'");
        assert!(detail.contains("found: \\n"), "{detail}");
        assert_eq!(position, 2);
        assert_eq!(split_err("'ab\\").1, 3);
    }

    #[test]
    fn joins_with_quoting() {
        assert_eq!(join(&["abc", "def\"ghi"]), "abc.\"def\\\"ghi\"");
        assert_eq!(join(&["a", "b", "c"]), "a.b.c");
        assert_eq!(join::<&str>(&[]), "");
        assert_eq!(join(&["back\\slash", "it's"]), "\"back\\\\slash\".\"it\\'s\"");
    }

    #[test]
    fn error_message_names_position_and_path() {
        let err = split("abc.d.").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid path: cannot end with a dot\n\tat position 5 of: abc.d."
        );
    }
}
