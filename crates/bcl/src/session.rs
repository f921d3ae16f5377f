//! binding session
//!
//! A [Session] is the state shared by one top-level bind and every file it includes: the cursor into the target,
//! the variable scopes, the open blocks and the include depth. Each source unit gets its own
//! [crate::scanner::Scanner] borrowing the session.
use crate::binder::{BlockFrame, Cursor};
use crate::error::{ErrorKind, Location, ParseError, SyntaxError};
use crate::include::MAX_INCLUDE_DEPTH;
use crate::scanner::Scanner;
use crate::scope::Scopes;
use crate::target::Target;
use std::path::Path;

pub struct Session<'t> {
    pub(crate) cursor: Cursor<'t>,
    pub(crate) scopes: Scopes,
    pub(crate) blocks: Vec<BlockFrame>,
    include_depth: usize,
}

impl<'t> Session<'t> {
    pub fn new(target: &'t mut dyn Target) -> Self {
        Self {
            cursor: Cursor::new(target),
            scopes: Scopes::default(),
            blocks: vec![],
            include_depth: 0,
        }
    }

    /// Binds one source unit, `file` is only used for error locations
    pub fn bind_str(&mut self, source: &str, file: Option<&Path>) -> Result<(), ParseError> {
        Scanner::new(self, file).scan(source)
    }

    pub fn bind_file(&mut self, path: &Path) -> Result<(), ParseError> {
        tracing::info!(path=%path.display(), "loading file");

        let source = std::fs::read_to_string(path).map_err(|error| {
            ParseError::new(
                Location::file(path),
                ErrorKind::Io {
                    path: path.to_owned(),
                    error,
                },
            )
        })?;

        self.bind_str(&source, Some(path))
    }

    pub fn include_depth(&self) -> usize {
        self.include_depth
    }

    pub(crate) fn open_block(&mut self, label: &str) -> Result<(), ErrorKind> {
        let frame = self.cursor.open_block(label)?;
        self.scopes.open();
        self.blocks.push(frame);
        Ok(())
    }

    pub(crate) fn close_block(&mut self) -> Result<(), ErrorKind> {
        let frame = self.blocks.pop().ok_or(SyntaxError::UnexpectedClose)?;
        self.scopes.close();
        self.cursor.close_block(frame)?;
        tracing::trace!(depth = self.cursor.depth(), "close block");
        Ok(())
    }

    pub(crate) fn enter_include(&mut self) -> Result<(), ErrorKind> {
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(SyntaxError::IncludeDepth(MAX_INCLUDE_DEPTH).into());
        }
        self.include_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_include(&mut self) {
        self.include_depth = self.include_depth.saturating_sub(1);
    }
}
