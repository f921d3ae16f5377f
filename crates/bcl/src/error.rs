//! errors reported while binding
//!
//! Every failure aborts the whole session and surfaces as one [ParseError]: the [Location] where scanning stopped
//! and an [ErrorKind] describing what went wrong.
//!
//! | kind                   | raised when                                                        |
//! |------------------------|--------------------------------------------------------------------|
//! | [ErrorKind::Io]        | the source file or an included file cannot be read                 |
//! | [ErrorKind::Syntax]    | the text does not follow the grammar (quotes, blocks, `set`, ...)  |
//! | [ErrorKind::Schema]    | the text does not fit the shape of the target                      |
//! | [ErrorKind::Type]      | a literal cannot be coerced to the scalar kind of its field        |
//! | [ErrorKind::Glob]      | an `include` pattern is malformed                                  |
use crate::target::Kind;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
#[error("{location}: {kind}")]
pub struct ParseError {
    location: Location,
    kind: ErrorKind,
}

impl ParseError {
    pub fn new(location: Location, kind: impl Into<ErrorKind>) -> Self {
        Self {
            location,
            kind: kind.into(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

/// Where an error was raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// `None` when binding from a string
    pub file: Option<PathBuf>,
    /// `None` when the error concerns the file as a whole
    pub position: Option<Position>,
}

impl Location {
    pub fn file(path: &Path) -> Self {
        Self {
            file: Some(path.to_owned()),
            position: None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(path) => write!(f, "{}", path.display())?,
            None => f.write_str("<input>")?,
        }
        if let Some(position) = &self.position {
            write!(f, ":{}:{}", position.line, position.column)?;
        }
        Ok(())
    }
}

/// 1-based line and column of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    #[error("unable to read {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("type error: {0}")]
    Type(#[from] TypeError),
    #[error("invalid include pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unterminated quote in `{0}`")]
    UnterminatedQuote(String),
    #[error("unterminated escape in `{0}`")]
    UnterminatedEscape(String),
    #[error("`{0}` is not terminated by `}}`")]
    UnterminatedVariable(String),
    #[error("`set` takes a name and a value, found {0} token(s)")]
    MalformedSet(usize),
    #[error("{0} block(s) still open at end of input")]
    UnclosedBlocks(usize),
    #[error("`}}` without an open block")]
    UnexpectedClose,
    #[error("`{{` without a key")]
    UnexpectedOpen,
    #[error("`{0}` has no value")]
    MissingValue(String),
    #[error("entry not terminated by `;` at end of input")]
    UnterminatedEntry,
    #[error("include nesting exceeds {0} levels")]
    IncludeDepth(usize),
    #[error("input is not valid utf-8")]
    Encoding,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no field named `{0}`")]
    UnknownField(String),
    #[error("cannot look up `{name}` in a {kind} value")]
    NotComposite { name: String, kind: Kind },
    #[error("mapping entries take a key and a value, found {0} token(s)")]
    MappingArity(usize),
    #[error("a block under a mapping needs a key before `{{`")]
    MissingEntryKey,
    #[error("{0} values cannot be bound from text")]
    Unsupported(Kind),
    #[error("expected a {expected} value, got {found}")]
    ScalarMismatch { expected: Kind, found: &'static str },
    #[error("`{0}` disappeared from the target")]
    LostFocus(String),
    #[error("cursor stack is empty")]
    CursorUnderflow,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, derive_new::new)]
#[error("`{text}` is not a valid {expected}")]
pub struct TypeError {
    pub text: String,
    pub expected: Kind,
}
