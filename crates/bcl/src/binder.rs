//! generic binder
//!
//! The [Cursor] tracks where in the target the scanner currently writes. It is stored as a path of [Step]s from
//! the root and walked again for every operation, so no borrow of the target outlives a single call.
//!
//! Literal text is coerced by [assign] according to the [Kind] of the focused slot.
use crate::error::{ErrorKind, SchemaError, TypeError};
use crate::scalar::Scalar;
use crate::split::{split, unquote};
use crate::target::{Kind, Target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Member(String),
    Element(usize),
    Entry(String),
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Member(name) => write!(f, ".{name}"),
            Step::Element(index) => write!(f, "[{index}]"),
            Step::Entry(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Cursor steps owned by an open block
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct BlockFrame {
    /// the entry key plus any element or entry the block created
    pub steps: usize,
    /// the block appended to a sequence or inserted into a mapping
    pub multi: bool,
}

pub struct Cursor<'t> {
    root: &'t mut dyn Target,
    path: Vec<Step>,
}

impl<'t> Cursor<'t> {
    pub fn new(root: &'t mut dyn Target) -> Self {
        Self { root, path: vec![] }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn focus(&mut self) -> Result<&mut dyn Target, ErrorKind> {
        let mut node = self.root.focus();
        for step in &self.path {
            node = match step {
                Step::Member(name) => node.member(name),
                Step::Element(index) => node.element(*index),
                Step::Entry(key) => node.entry_mut(key)?,
            }
            .ok_or_else(|| SchemaError::LostFocus(step.to_string()))?
            .focus();
        }
        Ok(node)
    }

    pub fn kind(&mut self) -> Result<Kind, ErrorKind> {
        Ok(self.focus()?.kind())
    }

    /// Moves the cursor onto member `name` of the focused composite
    pub fn descend(&mut self, name: &str) -> Result<(), ErrorKind> {
        let node = self.focus()?;
        let kind = node.kind();
        if kind != Kind::Composite {
            return Err(SchemaError::NotComposite {
                name: name.to_string(),
                kind,
            }
            .into());
        }
        if node.member(name).is_none() {
            return Err(SchemaError::UnknownField(name.to_string()).into());
        }

        self.path.push(Step::Member(name.to_string()));
        tracing::trace!(path = ?self.path, "descend");
        Ok(())
    }

    pub fn ascend(&mut self) -> Result<(), ErrorKind> {
        self.path
            .pop()
            .map(|_| ())
            .ok_or_else(|| SchemaError::CursorUnderflow.into())
    }

    pub fn assign(&mut self, text: &str) -> Result<(), ErrorKind> {
        assign(self.focus()?, text)
    }

    /// Appends a default element to the focused sequence and moves onto it
    fn open_element(&mut self) -> Result<(), ErrorKind> {
        let node = self.focus()?;
        let index = node
            .append()
            .ok_or_else(|| SchemaError::Unsupported(node.kind()))?;
        self.path.push(Step::Element(index));
        Ok(())
    }

    /// Inserts a fresh entry into the focused mapping and moves onto its value
    fn open_entry(&mut self, key: &str) -> Result<(), ErrorKind> {
        self.focus()?.insert_entry(key)?;
        self.path.push(Step::Entry(key.to_string()));
        Ok(())
    }

    /// Enters the body of a block following the key the cursor sits on
    ///
    /// - a mapping takes `label` as the key of a new entry
    /// - a sequence (possibly that new entry) gets a new element
    /// - anything else is entered as is, the label is ignored
    pub fn open_block(&mut self, label: &str) -> Result<BlockFrame, ErrorKind> {
        let mut steps = 1;
        let mut kind = self.kind()?;

        if kind == Kind::Mapping {
            if label.is_empty() {
                return Err(SchemaError::MissingEntryKey.into());
            }
            self.open_entry(unquote(label)?)?;
            steps += 1;
            kind = self.kind()?;
        } else if !label.is_empty() {
            tracing::debug!(label, %kind, "ignoring block label");
        }

        if kind == Kind::Sequence {
            self.open_element()?;
            steps += 1;
        }

        tracing::trace!(path = ?self.path, steps, "open block");
        Ok(BlockFrame::new(steps, steps > 1))
    }

    pub fn close_block(&mut self, frame: BlockFrame) -> Result<(), ErrorKind> {
        if frame.multi {
            tracing::trace!(path = ?self.path, "element complete");
        }
        for _ in 0..frame.steps {
            self.ascend()?;
        }
        Ok(())
    }
}

/// Coerces a value literal into `node`
///
/// Surrounding quotes of text values are stripped. Sequences and mappings split the text into tokens.
pub fn assign(node: &mut dyn Target, text: &str) -> Result<(), ErrorKind> {
    coerce(node.focus(), text.trim(), Literal::Quoted)
}

/// Coerces a token that was already split and unquoted into `node`
pub fn assign_token(node: &mut dyn Target, token: &str) -> Result<(), ErrorKind> {
    coerce(node.focus(), token, Literal::Token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Quoted,
    Token,
}

fn coerce(node: &mut dyn Target, text: &str, literal: Literal) -> Result<(), ErrorKind> {
    let kind = node.kind();
    let invalid = || TypeError::new(text.to_string(), kind);

    match kind {
        Kind::Text => {
            let text = match literal {
                Literal::Quoted => unquote(text)?,
                Literal::Token => text,
            };
            node.set(Scalar::Text(text.to_string()))
        }
        Kind::Integer { signed: true, bits } => {
            let value = parse_signed(text, bits).ok_or_else(invalid)?;
            node.set(Scalar::Signed(value))
        }
        Kind::Integer { signed: false, bits } => {
            let value = parse_unsigned(text, bits).ok_or_else(invalid)?;
            node.set(Scalar::Unsigned(value))
        }
        Kind::Float { bits } => {
            let value = parse_float(text, bits).ok_or_else(invalid)?;
            node.set(Scalar::Float(value))
        }
        Kind::Boolean => {
            let value = parse_bool(text).ok_or_else(invalid)?;
            node.set(Scalar::Boolean(value))
        }
        Kind::Sequence => {
            for token in split(text)? {
                let index = node
                    .append()
                    .ok_or(SchemaError::Unsupported(Kind::Sequence))?;
                let element = node
                    .element(index)
                    .ok_or_else(|| SchemaError::LostFocus(format!("[{index}]")))?;
                assign_token(element, &token)?;
            }
            Ok(())
        }
        Kind::Mapping => {
            let tokens = split(text)?;
            let [key, value] = tokens.as_slice() else {
                return Err(SchemaError::MappingArity(tokens.len()).into());
            };
            assign_token(node.insert_entry(key)?, value)
        }
        Kind::Composite => Err(SchemaError::Unsupported(kind).into()),
    }
}

fn parse_signed(text: &str, bits: u32) -> Option<i64> {
    let value: i64 = text.parse().ok()?;
    if bits < 64 {
        let limit = 1i64 << (bits - 1);
        if value < -limit || value >= limit {
            return None;
        }
    }
    Some(value)
}

fn parse_unsigned(text: &str, bits: u32) -> Option<u64> {
    let value: u64 = text.parse().ok()?;
    if bits < 64 && value >> bits != 0 {
        return None;
    }
    Some(value)
}

fn parse_float(text: &str, bits: u32) -> Option<f64> {
    if bits == 32 {
        text.parse::<f32>().ok().map(f64::from)
    } else {
        text.parse().ok()
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "yes" | "on" => Some(true),
        "no" | "off" => Some(false),
        other => other.parse().ok(),
    }
}
