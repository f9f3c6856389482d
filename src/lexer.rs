//! Word splitting for a single command line.
//!
//! The splitter honors shell quoting rules: whitespace separates words, text
//! inside matching single or double quotes is taken literally, and a backslash
//! escapes the next character. Redirection operators are not special here; they
//! come out as ordinary words and are picked off later by [`crate::redirect`].

use std::fmt;

/// Errors that can occur while splitting a line into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A closing quote (single or double) was not found before end of line.
    UnterminatedQuote,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Word,
    SingleQuote,
    DoubleQuote,
}

struct Splitter {
    input: Vec<char>,
    pos: usize,
    state: State,
    buffer: String,
    // Set once the current word has any content, including the empty content
    // of a closed pair of quotes, so that `''` still yields a word.
    pending: bool,
}

impl Splitter {
    fn new(line: &str) -> Self {
        Splitter {
            input: line.chars().collect(),
            pos: 0,
            state: State::Start,
            buffer: String::new(),
            pending: false,
        }
    }

    fn split(mut self) -> Result<Vec<String>, LexError> {
        let mut words = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                State::Start => self.handle_start(ch),
                State::Word => self.handle_word(ch, &mut words),
                State::SingleQuote => self.handle_single_quote(ch),
                State::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        match self.state {
            State::SingleQuote | State::DoubleQuote => Err(LexError::UnterminatedQuote),
            _ => {
                if self.pending {
                    words.push(std::mem::take(&mut self.buffer));
                }
                Ok(words)
            }
        }
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            ' ' | '\t' => {}
            '\'' => {
                self.pending = true;
                self.state = State::SingleQuote;
            }
            '"' => {
                self.pending = true;
                self.state = State::DoubleQuote;
            }
            '\\' => {
                self.push_escaped();
                self.pending = true;
                self.state = State::Word;
            }
            c => {
                self.buffer.push(c);
                self.pending = true;
                self.state = State::Word;
            }
        }
    }

    fn handle_word(&mut self, ch: char, words: &mut Vec<String>) {
        match ch {
            ' ' | '\t' => {
                words.push(std::mem::take(&mut self.buffer));
                self.pending = false;
                self.state = State::Start;
            }
            '\'' => self.state = State::SingleQuote,
            '"' => self.state = State::DoubleQuote,
            '\\' => self.push_escaped(),
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = State::Word,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = State::Word,
            '\\' => {
                // Inside double quotes only `"` and `\` can be escaped; any
                // other sequence keeps the backslash verbatim.
                match self.input.get(self.pos).copied() {
                    Some(next @ ('"' | '\\')) => {
                        self.pos += 1;
                        self.buffer.push(next);
                    }
                    _ => self.buffer.push('\\'),
                }
            }
            c => self.buffer.push(c),
        }
    }

    /// Consume the character after a backslash and push it literally. A lone
    /// trailing backslash is kept as-is.
    fn push_escaped(&mut self) {
        match self.read_char() {
            Some(next) => self.buffer.push(next),
            None => self.buffer.push('\\'),
        }
    }
}

/// Split one input line into words.
///
/// Returns the words in order with all quoting stripped, or a [`LexError`]
/// when the line contains an unbalanced quote.
pub fn split_words(line: &str) -> Result<Vec<String>, LexError> {
    Splitter::new(line).split()
}
