//! # bcl - block configuration language
//!
//! Binds configuration text straight into Rust values. There is no intermediate document: a single pass scanner moves
//! a cursor through the target while it reads.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `bcl` works internally.
//!
//! ### The language
//!
//! A file is a list of entries. An entry is a key followed by a value terminated by `;`, or a key followed by a block
//! enclosed in `{` and `}`.
//!
//! ```text
//! # single line comments work like this
//! // ...or like this
//!
//! workers 4;
//! name: "quoted text";
//! tags [web, "edge node"];
//!
//! set root /srv;
//! site {
//!     set root /srv/site;
//!     path ${root}/www;
//! }
//!
//! include conf.d/*.bcl;
//! ```
//!
//! - `key value;` and `key: value;` are the same
//! - `set name value;` defines a variable for the current block and its children, `$name` and `${name}` expand it.
//!   Unknown references stay in the text as written.
//! - `include pattern;` binds every file matching the glob, in sorted order, as if its text appeared in place
//!
//! ### Targets
//!
//! Anything implementing [Target] can be bound. Implementations exist for strings, paths, booleans, integers,
//! floats, [Vec], the std maps, [indexmap::IndexMap], [Option] and [Box]. Structs use [composite!].
//!
//! How a value is bound depends on the [Kind] of the slot the key leads to:
//!
//! | kind       | value                                                  | block `key label { ... }`          |
//! |------------|--------------------------------------------------------|------------------------------------|
//! | text       | surrounding quotes stripped                            | -                                  |
//! | integer    | parsed and range checked                               | -                                  |
//! | float      | parsed                                                 | -                                  |
//! | boolean    | `true`/`yes`/`on`, `false`/`no`/`off`                  | -                                  |
//! | sequence   | split at whitespace (or `[a, b]`), each token appended | appends one element                |
//! | mapping    | exactly `key value`, inserts one entry                 | inserts entry `label`              |
//! | composite  | -                                                      | entered, the label is ignored      |
//!
//! ### Binding
//!
//! A [Session] owns the state shared by a source unit and all files it includes: the cursor, the variable scopes and
//! the open blocks. Every source unit is read by its own scanner which reports the first failure as a [ParseError]
//! naming file, line and column.
pub mod bravefile;
pub mod error;
pub mod target;

mod binder;
mod include;
mod scalar;
mod scanner;
mod scope;
mod session;
mod split;

pub use error::{ErrorKind, Location, ParseError, Position, SchemaError, SyntaxError, TypeError};
pub use include::MAX_INCLUDE_DEPTH;
pub use scalar::Scalar;
pub use session::Session;
pub use target::{Kind, Target};

use std::path::Path;

/// Binds `source` into `target`
pub fn bind_str(source: &str, target: &mut dyn Target) -> Result<(), ParseError> {
    Session::new(target).bind_str(source, None)
}

/// Binds UTF-8 encoded `source` into `target`
pub fn bind_bytes(source: &[u8], target: &mut dyn Target) -> Result<(), ParseError> {
    let source = std::str::from_utf8(source)
        .map_err(|_| ParseError::new(Location::default(), SyntaxError::Encoding))?;
    bind_str(source, target)
}

/// Binds the file at `path` into `target`
pub fn bind_file(path: impl AsRef<Path>, target: &mut dyn Target) -> Result<(), ParseError> {
    Session::new(target).bind_file(path.as_ref())
}

pub fn from_str<T: Target + Default>(source: &str) -> Result<T, ParseError> {
    let mut value = T::default();
    bind_str(source, &mut value)?;
    Ok(value)
}

pub fn from_file<T: Target + Default>(path: impl AsRef<Path>) -> Result<T, ParseError> {
    let mut value = T::default();
    bind_file(path, &mut value)?;
    Ok(value)
}
