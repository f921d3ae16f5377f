//! single pass scanner
//!
//! The scanner reads one source unit character by character and drives the session directly: keys descend the
//! cursor, `;` assigns the collected value, braces open and close blocks. There is no token stream and no syntax
//! tree.
//!
//! ```text
//!            whitespace/:                 `;`
//! SearchingKey ---------> SearchingValue -----> SearchingKey
//!   |  ^  `{` `}`           |  ^    `$`
//!   |  |                    |  +--------- InVariable        ($name ends at the first non-name char)
//!   |  | end of line        +-----------> InVariableBlock   (${name} ends at `}`)
//!   v  |
//! SkippingComment   (`#` or `//` between entries)
//! ```
use crate::error::{ErrorKind, Location, ParseError, Position, SyntaxError};
use crate::include;
use crate::session::Session;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SearchingKey,
    SearchingValue,
    InVariable,
    InVariableBlock,
    SkippingComment,
}

/// What the `;` ending the current value completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Statement {
    #[default]
    Assign,
    Define,
    Include,
}

pub(crate) struct Scanner<'s, 't> {
    session: &'s mut Session<'t>,
    file: Option<PathBuf>,
    mode: Mode,
    statement: Statement,
    /// pending key or value
    text: String,
    /// pending variable name
    variable: String,
    /// blocks opened before this unit started, they are not ours to close
    block_base: usize,
    position: Position,
}

impl<'s, 't> Scanner<'s, 't> {
    pub(crate) fn new(session: &'s mut Session<'t>, file: Option<&Path>) -> Self {
        let block_base = session.blocks.len();
        Self {
            session,
            file: file.map(Path::to_path_buf),
            mode: Mode::SearchingKey,
            statement: Statement::Assign,
            text: String::new(),
            variable: String::new(),
            block_base,
            position: Position::default(),
        }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub(crate) fn scan(mut self, source: &str) -> Result<(), ParseError> {
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            self.step(c, chars.peek().copied())?;

            if c == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }

        self.finish()
    }

    fn error(&self, kind: impl Into<ErrorKind>) -> ParseError {
        ParseError::new(
            Location {
                file: self.file.clone(),
                position: Some(self.position),
            },
            kind,
        )
    }

    fn step(&mut self, c: char, next: Option<char>) -> Result<(), ParseError> {
        match self.mode {
            Mode::SkippingComment => {
                if c == '\n' {
                    self.mode = Mode::SearchingKey;
                }
                Ok(())
            }
            Mode::SearchingKey => self.search_key(c, next),
            Mode::SearchingValue => self.search_value(c),
            Mode::InVariable => self.in_variable(c),
            Mode::InVariableBlock => self.in_variable_block(c),
        }
    }

    fn search_key(&mut self, c: char, next: Option<char>) -> Result<(), ParseError> {
        match c {
            '#' if self.text.is_empty() => self.mode = Mode::SkippingComment,
            '/' if self.text.is_empty() && next == Some('/') => self.mode = Mode::SkippingComment,
            '{' => self.open_block()?,
            '}' => self.close_block()?,
            ';' if self.text.is_empty() => {}
            ';' => {
                let key = std::mem::take(&mut self.text);
                return Err(self.error(SyntaxError::MissingValue(key)));
            }
            c if c.is_whitespace() || c == ':' => {
                if !self.text.is_empty() {
                    self.finish_key()?;
                }
            }
            c => self.text.push(c),
        }
        Ok(())
    }

    fn finish_key(&mut self) -> Result<(), ParseError> {
        let key = std::mem::take(&mut self.text);
        self.statement = match key.as_str() {
            "include" => Statement::Include,
            "set" => Statement::Define,
            _ => {
                let descended = self.session.cursor.descend(&key);
                descended.map_err(|kind| self.error(kind))?;
                Statement::Assign
            }
        };
        self.mode = Mode::SearchingValue;
        Ok(())
    }

    fn search_value(&mut self, c: char) -> Result<(), ParseError> {
        match c {
            '$' => {
                self.variable.clear();
                self.mode = Mode::InVariable;
            }
            '{' => self.open_block()?,
            ';' => self.finish_value()?,
            ':' if self.text.trim().is_empty() => {}
            c => self.text.push(c),
        }
        Ok(())
    }

    fn in_variable(&mut self, c: char) -> Result<(), ParseError> {
        if c == '{' && self.variable.is_empty() {
            self.mode = Mode::InVariableBlock;
            return Ok(());
        }
        if c.is_alphanumeric() || c == '_' {
            self.variable.push(c);
            return Ok(());
        }

        self.splice_variable(false);
        self.mode = Mode::SearchingValue;
        self.search_value(c)
    }

    fn in_variable_block(&mut self, c: char) -> Result<(), ParseError> {
        match c {
            '}' => {
                self.splice_variable(true);
                self.mode = Mode::SearchingValue;
            }
            ';' => {
                let reference = format!("${{{}", self.variable);
                return Err(self.error(SyntaxError::UnterminatedVariable(reference)));
            }
            c => self.variable.push(c),
        }
        Ok(())
    }

    /// Replaces the pending reference with the variable text, or with the reference itself when unresolved
    fn splice_variable(&mut self, braced: bool) {
        let name = std::mem::take(&mut self.variable);
        match self.session.scopes.resolve(&name) {
            Some(value) => self.text.push_str(value),
            None => {
                tracing::debug!(%name, "unresolved variable kept literally");
                self.text.push('$');
                if braced {
                    self.text.push('{');
                    self.text.push_str(&name);
                    self.text.push('}');
                } else {
                    self.text.push_str(&name);
                }
            }
        }
    }

    fn finish_value(&mut self) -> Result<(), ParseError> {
        let value = std::mem::take(&mut self.text);
        let statement = std::mem::take(&mut self.statement);
        self.mode = Mode::SearchingKey;

        match statement {
            Statement::Define => {
                let tokens: Vec<&str> = value.split_whitespace().collect();
                let [name, text] = tokens.as_slice() else {
                    return Err(self.error(SyntaxError::MalformedSet(tokens.len())));
                };
                self.session.scopes.define(name, text);
            }
            Statement::Include => self.include(value.trim())?,
            Statement::Assign => {
                let assigned = self
                    .session
                    .cursor
                    .assign(&value)
                    .and_then(|()| self.session.cursor.ascend());
                assigned.map_err(|kind| self.error(kind))?;
            }
        }
        Ok(())
    }

    fn include(&mut self, pattern: &str) -> Result<(), ParseError> {
        let paths = include::expand(pattern).map_err(|kind| self.error(kind))?;
        if paths.is_empty() {
            tracing::debug!(pattern, "include matched no files");
        }

        for path in paths {
            let entered = self.session.enter_include();
            entered.map_err(|kind| self.error(kind))?;
            let included = self.session.bind_file(&path);
            self.session.leave_include();
            included?;
        }
        Ok(())
    }

    fn open_block(&mut self) -> Result<(), ParseError> {
        // key glued to the brace: `server{`
        if self.mode == Mode::SearchingKey {
            if self.text.is_empty() {
                return Err(self.error(SyntaxError::UnexpectedOpen));
            }
            self.finish_key()?;
        }
        if self.statement != Statement::Assign {
            return Err(self.error(SyntaxError::UnexpectedOpen));
        }

        let label = std::mem::take(&mut self.text);
        let opened = self.session.open_block(label.trim());
        opened.map_err(|kind| self.error(kind))?;
        self.mode = Mode::SearchingKey;
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        if !self.text.is_empty() {
            let key = std::mem::take(&mut self.text);
            return Err(self.error(SyntaxError::MissingValue(key)));
        }
        if self.session.blocks.len() <= self.block_base {
            return Err(self.error(SyntaxError::UnexpectedClose));
        }

        let closed = self.session.close_block();
        closed.map_err(|kind| self.error(kind))
    }

    fn finish(self) -> Result<(), ParseError> {
        let pending = match self.mode {
            Mode::SearchingKey if !self.text.is_empty() => {
                Some(SyntaxError::MissingValue(self.text.clone()))
            }
            Mode::SearchingKey | Mode::SkippingComment => None,
            Mode::InVariableBlock => Some(SyntaxError::UnterminatedVariable(format!(
                "${{{}",
                self.variable
            ))),
            Mode::SearchingValue | Mode::InVariable => Some(SyntaxError::UnterminatedEntry),
        };
        if let Some(error) = pending {
            return Err(self.error(error));
        }

        let open = self.session.blocks.len() - self.block_base;
        if open > 0 {
            return Err(self.error(SyntaxError::UnclosedBlocks(open)));
        }

        Ok(())
    }
}
