//! The reader is responsible for parsing the input string into a list of expressions. The reader
//! main function is [read].

use std::{fmt::Display, iter::Peekable, str::Chars};

use crate::error::{Location, Result, RuntimeError};
use crate::value::Value;

/// A prefix is a symbol that can be at the beggining of an expression. It wraps the next
/// expression in a quote-like form.
enum Prefix {
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplicing,
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prefix::Quote => write!(f, "quote"),
            Prefix::Quasiquote => write!(f, "quasiquote"),
            Prefix::Unquote => write!(f, "unquote"),
            Prefix::UnquoteSplicing => write!(f, "unquote-splicing"),
        }
    }
}

/// A state is a mutable object that is used to keep track of the current state of the reader.
pub struct State<'a> {
    peekable: Peekable<Chars<'a>>,
    stack: Vec<Value>,
    indices: Vec<(usize, Location)>,
    prefix: Vec<(Prefix, Location, usize)>,
    position: Location,
}

impl<'a> State<'a> {
    fn new(input: &'a str, file: Option<String>) -> Self {
        Self {
            peekable: input.chars().peekable(),
            stack: Vec::new(),
            prefix: Vec::new(),
            indices: Vec::new(),
            position: Location::new(file),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.peekable.next()?;

        match char {
            '\n' => {
                self.position.line += 1;
                self.position.column = 0;
            }
            _ => self.position.column += 1,
        }

        Some(char)
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn open(&mut self, start: Location) {
        self.indices.push((self.stack.len(), start));
    }

    fn close(&mut self, start: Location) -> Result<()> {
        let Some((index, _)) = self.indices.pop() else {
            return Err(RuntimeError::UnmatchedParenthesis(start));
        };

        if self.prefix.last().is_some_and(|(_, _, place)| *place > self.indices.len()) {
            return Err(RuntimeError::UnmatchedQuote(start));
        }

        let values = self.stack.split_off(index);
        self.stack.push(values.into_iter().collect());

        Ok(())
    }

    fn prefix(&mut self, start: Location, prefix: Prefix) {
        self.prefix.push((prefix, start, self.indices.len()));
    }

    /// Wraps the last read expression in the pending prefixes that belong to the current depth.
    fn prefix_close(&mut self) -> Result<()> {
        while let Some((_, _, place)) = self.prefix.last() {
            if self.indices.len() != *place {
                break;
            }

            let Some((prefix, loc, _)) = self.prefix.pop() else {
                break;
            };

            let Some(expr) = self.stack.pop() else {
                return Err(RuntimeError::UnmatchedQuote(loc));
            };

            self.stack
                .push(vec![Value::Id(prefix.to_string()), expr].into_iter().collect());
        }

        Ok(())
    }

    fn accumulate_while<F>(&mut self, chr: char, mut f: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut string: String = chr.into();

        while let Some(&char) = self.peekable.peek() {
            if !f(char) {
                break;
            }
            if let Some(char) = self.advance() {
                string.push(char);
            }
        }

        string
    }

    fn read(&mut self) -> Result<Vec<Value>> {
        while let Some(chr) = self.advance() {
            let start = self.position.clone();
            match chr {
                ' ' | '\n' | '\r' | '\t' => continue,
                '\'' => {
                    self.prefix(start, Prefix::Quote);
                    continue;
                }
                '`' => {
                    self.prefix(start, Prefix::Quasiquote);
                    continue;
                }
                ',' => {
                    if self.peekable.peek() == Some(&'@') {
                        self.advance();
                        self.prefix(start, Prefix::UnquoteSplicing);
                    } else {
                        self.prefix(start, Prefix::Unquote);
                    }
                    continue;
                }
                ';' => {
                    self.parse_comment();
                    continue;
                }
                '(' => {
                    self.open(start);
                    continue;
                }
                ')' => self.close(start)?,
                '"' => self.parse_string(start)?,
                _ => self.parse_rest(chr),
            }
            self.prefix_close()?;
        }

        if let Some((_, loc, _)) = self.prefix.pop() {
            return Err(RuntimeError::UnmatchedQuote(loc));
        }

        if let Some((_, loc)) = self.indices.pop() {
            return Err(RuntimeError::UnclosedParenthesis(loc));
        }

        Ok(std::mem::take(&mut self.stack))
    }

    fn parse_rest(&mut self, chr: char) {
        let string = self.accumulate_while(chr, |c| {
            !matches!(c, '\n' | '\r' | '\t' | ' ' | ')' | '(' | '"' | ';')
        });

        if let Ok(int) = string.parse::<i64>() {
            self.push(Value::Int(int));
        } else {
            self.push(Value::Id(string));
        }
    }

    fn parse_comment(&mut self) {
        while let Some(&char) = self.peekable.peek() {
            if char == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn parse_string(&mut self, start: Location) -> Result<()> {
        let mut raw = String::new();
        let mut escaped = false;

        loop {
            let Some(char) = self.advance() else {
                return Err(RuntimeError::UnclosedString(start));
            };

            match char {
                '"' if !escaped => break,
                '\\' if !escaped => escaped = true,
                _ => escaped = false,
            }

            raw.push(char);
        }

        let Some(string) = unescape::unescape(&raw) else {
            return Err(RuntimeError::InvalidEscape(start));
        };

        self.push(Value::Str(string));

        Ok(())
    }
}

/// Read a string and return a list of expressions.
pub fn read(input: &str, file: Option<String>) -> Result<Vec<Value>> {
    let mut state = State::new(input, file);
    state.read()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one(input: &str) -> String {
        let values = read(input, None).unwrap();
        assert_eq!(values.len(), 1, "expected a single expression in {input:?}");
        values[0].to_string()
    }

    #[test]
    fn atoms() {
        assert_eq!(read("42", None).unwrap(), vec![Value::Int(42)]);
        assert_eq!(read("-7", None).unwrap(), vec![Value::Int(-7)]);
        assert_eq!(read("-", None).unwrap(), vec![Value::id("-")]);
        assert_eq!(read("set!", None).unwrap(), vec![Value::id("set!")]);
        assert_eq!(read("\"foo bar\"", None).unwrap(), vec![Value::from("foo bar")]);
    }

    #[test]
    fn nested_lists() {
        assert_eq!(read_one("(+ 1 (* 2 3))"), "(+ 1 (* 2 3))");
        assert_eq!(read_one("()"), "()");
        assert_eq!(read_one("(a\n  (b c)\t d)"), "(a (b c) d)");
    }

    #[test]
    fn several_expressions() {
        let values = read("(define a 3) (list 1 2 a)", None).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values[1].to_string(), "(list 1 2 a)");
    }

    #[test]
    fn prefixes() {
        assert_eq!(read_one("'a"), "(quote a)");
        assert_eq!(read_one("'(1 2 3)"), "(quote (1 2 3))");
        assert_eq!(
            read_one("`(,(+ 1 2) ,@xs)"),
            "(quasiquote ((unquote (+ 1 2)) (unquote-splicing xs)))"
        );
        assert_eq!(read_one("`,x"), "(quasiquote (unquote x))");
        assert_eq!(read_one("''a"), "(quote (quote a))");
    }

    #[test]
    fn comments_are_skipped() {
        let values = read("; a comment\n(+ 1 2) ; trailing\n", None).unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(values[0].to_string(), "(+ 1 2)");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            read(r#""a \"quoted\" word\n""#, None).unwrap(),
            vec![Value::from("a \"quoted\" word\n")]
        );
    }

    #[test]
    fn unbalanced_input() {
        assert!(matches!(
            read("(+ 1 2", None),
            Err(RuntimeError::UnclosedParenthesis(_))
        ));
        assert!(matches!(
            read("(+ 1 2))", None),
            Err(RuntimeError::UnmatchedParenthesis(_))
        ));
        assert!(matches!(
            read("\"open", None),
            Err(RuntimeError::UnclosedString(_))
        ));
        assert!(matches!(read("'", None), Err(RuntimeError::UnmatchedQuote(_))));
        assert!(matches!(read("('", None), Err(RuntimeError::UnmatchedQuote(_))));
    }

    #[test]
    fn errors_carry_locations() {
        let Err(RuntimeError::UnmatchedParenthesis(location)) =
            read("(a)\n  )", Some("test.blu".into()))
        else {
            panic!("expected an unmatched parenthesis");
        };

        assert_eq!(location.to_string(), "test.blu:2:3");
    }
}
