//! scalar representation
//!
//! The binder coerces literal text into one of these kinds before handing it to a [crate::Target]
//! - text (utf-8)
//! - signed integer (range checked against the declared width of the field)
//! - unsigned integer (same)
//! - float (parsed at the declared width)
//! - boolean (`true`/`yes`/`on` and `false`/`no`/`off`)
//!
//! There is no `null`. Sequences and mappings are not scalars: they are built element by element through the
//! [crate::Target] trait.

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Signed(_) => "signed integer",
            Scalar::Unsigned(_) => "unsigned integer",
            Scalar::Float(_) => "float",
            Scalar::Boolean(_) => "boolean",
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Signed(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Unsigned(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(value) => f.write_str(value),
            Scalar::Signed(value) => write!(f, "{value}"),
            Scalar::Unsigned(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Boolean(value) => write!(f, "{value}"),
        }
    }
}
