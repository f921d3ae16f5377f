//! binding targets
//!
//! A [Target] is anything the binder can write into. It exposes a small capability surface instead of runtime
//! reflection:
//!
//! - [Target::kind] tells the binder how to interpret literal text
//! - [Target::focus] resolves indirections (`Option`, `Box`) to the slot that is actually written
//! - scalars accept a [Scalar] via [Target::set]
//! - composites hand out named members via [Target::member]
//! - sequences grow via [Target::append] and hand out elements via [Target::element]
//! - mappings create entries from key text via [Target::insert_entry] and find them again via [Target::entry_mut]
//!
//! Implementations for std scalars, `Vec`, `HashMap`, `BTreeMap`, [indexmap::IndexMap], `Option` and `Box` are
//! provided. Structs opt in with [crate::composite].
use crate::binder;
use crate::error::{ErrorKind, SchemaError, TypeError};
use crate::scalar::Scalar;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::PathBuf;

/// Declared kind of a target slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Integer { signed: bool, bits: u32 },
    Float { bits: u32 },
    Boolean,
    Sequence,
    Mapping,
    Composite,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Text => f.write_str("text"),
            Kind::Integer { signed: true, bits } => write!(f, "i{bits}"),
            Kind::Integer { signed: false, bits } => write!(f, "u{bits}"),
            Kind::Float { bits } => write!(f, "f{bits}"),
            Kind::Boolean => f.write_str("boolean"),
            Kind::Sequence => f.write_str("sequence"),
            Kind::Mapping => f.write_str("mapping"),
            Kind::Composite => f.write_str("composite"),
        }
    }
}

pub trait Target {
    fn kind(&self) -> Kind;

    /// The slot bind operations act on
    ///
    /// Plain types return `self`, indirections allocate and forward.
    fn focus(&mut self) -> &mut dyn Target;

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        Err(mismatch(self.kind(), &scalar))
    }

    /// Named member of a composite
    fn member(&mut self, _name: &str) -> Option<&mut dyn Target> {
        None
    }

    /// Push a default element, returns its index
    fn append(&mut self) -> Option<usize> {
        None
    }

    fn element(&mut self, _index: usize) -> Option<&mut dyn Target> {
        None
    }

    /// Parse `key` into the key type and insert a fresh default value under it
    ///
    /// An existing entry with the same key is replaced.
    fn insert_entry(&mut self, _key: &str) -> Result<&mut dyn Target, ErrorKind> {
        Err(SchemaError::Unsupported(self.kind()).into())
    }

    fn entry_mut(&mut self, _key: &str) -> Result<Option<&mut dyn Target>, ErrorKind> {
        Ok(None)
    }
}

fn mismatch(expected: Kind, found: &Scalar) -> ErrorKind {
    SchemaError::ScalarMismatch {
        expected,
        found: found.kind_name(),
    }
    .into()
}

/// Compares a declared member name with a key from the source
///
/// Keys match ASCII case-insensitively and `_`/`-` are ignored, so `system_packages`, `SystemPackages` and
/// `system-packages` all name the same member.
#[doc(hidden)]
pub fn member_matches(declared: &str, key: &str) -> bool {
    fn normalized(name: &str) -> impl Iterator<Item = char> + '_ {
        name.trim_start_matches("r#")
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
    }

    normalized(declared).eq(normalized(key))
}

/// Implements [Target] for structs by listing their bindable fields
///
/// Each field may carry aliases (`field | alias`) that are accepted as keys as well.
///
/// ```
/// #[derive(Default)]
/// struct Server {
///     name: String,
///     port: u16,
///     aliases: Vec<String>,
/// }
///
/// bcl::composite! {
///     Server { name | hostname, port, aliases }
/// }
///
/// let server: Server = bcl::from_str("hostname example.org; port 8080; aliases www api;").unwrap();
/// assert_eq!(server.name, "example.org");
/// assert_eq!(server.port, 8080);
/// assert_eq!(server.aliases, ["www", "api"]);
/// ```
#[macro_export]
macro_rules! composite {
    ($($ty:ty { $($field:ident $(| $alias:ident)*),* $(,)? })+) => {$(
        impl $crate::Target for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Composite
            }

            fn focus(&mut self) -> &mut dyn $crate::Target {
                self
            }

            fn member(&mut self, name: &str) -> ::core::option::Option<&mut dyn $crate::Target> {
                $(
                    if $crate::target::member_matches(stringify!($field), name)
                        $(|| $crate::target::member_matches(stringify!($alias), name))*
                    {
                        let member: &mut dyn $crate::Target = &mut self.$field;
                        return ::core::option::Option::Some(member);
                    }
                )*
                let _ = name;
                ::core::option::Option::None
            }
        }
    )+};
}

impl Target for String {
    fn kind(&self) -> Kind {
        Kind::Text
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        match scalar {
            Scalar::Text(text) => {
                *self = text;
                Ok(())
            }
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

impl Target for PathBuf {
    fn kind(&self) -> Kind {
        Kind::Text
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        match scalar {
            Scalar::Text(text) => {
                *self = PathBuf::from(text);
                Ok(())
            }
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

impl Target for bool {
    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        match scalar {
            Scalar::Boolean(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

macro_rules! integer_targets {
    ($variant:ident, $signed:literal: $($ty:ty),+) => {$(
        impl Target for $ty {
            fn kind(&self) -> Kind {
                Kind::Integer {
                    signed: $signed,
                    bits: <$ty>::BITS,
                }
            }

            fn focus(&mut self) -> &mut dyn Target {
                self
            }

            fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
                match scalar {
                    Scalar::$variant(value) => {
                        *self = <$ty>::try_from(value)
                            .map_err(|_| TypeError::new(value.to_string(), self.kind()))?;
                        Ok(())
                    }
                    other => Err(mismatch(self.kind(), &other)),
                }
            }
        }
    )+};
}

integer_targets!(Signed, true: i8, i16, i32, i64, isize);
integer_targets!(Unsigned, false: u8, u16, u32, u64, usize);

impl Target for f64 {
    fn kind(&self) -> Kind {
        Kind::Float { bits: 64 }
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        match scalar {
            Scalar::Float(value) => {
                *self = value;
                Ok(())
            }
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

impl Target for f32 {
    fn kind(&self) -> Kind {
        Kind::Float { bits: 32 }
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn set(&mut self, scalar: Scalar) -> Result<(), ErrorKind> {
        match scalar {
            // parsed as f32 by the binder, the cast is exact
            Scalar::Float(value) => {
                *self = value as f32;
                Ok(())
            }
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

impl<T: Target + Default> Target for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn focus(&mut self) -> &mut dyn Target {
        self
    }

    fn append(&mut self) -> Option<usize> {
        self.push(T::default());
        Some(self.len() - 1)
    }

    fn element(&mut self, index: usize) -> Option<&mut dyn Target> {
        self.get_mut(index).map(|element| element as &mut dyn Target)
    }
}

fn parse_key<K: Target + Default>(text: &str) -> Result<K, ErrorKind> {
    let mut key = K::default();
    binder::assign_token(&mut key, text)?;
    Ok(key)
}

macro_rules! mapping_target {
    ($map:ident, $($bound:path),+) => {
        impl<K, V> Target for $map<K, V>
        where
            K: Target + Default $(+ $bound)+,
            V: Target + Default,
        {
            fn kind(&self) -> Kind {
                Kind::Mapping
            }

            fn focus(&mut self) -> &mut dyn Target {
                self
            }

            fn insert_entry(&mut self, key: &str) -> Result<&mut dyn Target, ErrorKind> {
                let key = parse_key::<K>(key)?;
                let value: &mut dyn Target = self
                    .entry(key)
                    .and_modify(|value| *value = V::default())
                    .or_default();
                Ok(value)
            }

            fn entry_mut(&mut self, key: &str) -> Result<Option<&mut dyn Target>, ErrorKind> {
                let key = parse_key::<K>(key)?;
                Ok(self.get_mut(&key).map(|value| value as &mut dyn Target))
            }
        }
    };
}

mapping_target!(HashMap, Eq, Hash);
mapping_target!(IndexMap, Eq, Hash);
mapping_target!(BTreeMap, Ord);

impl<T: Target + Default> Target for Option<T> {
    fn kind(&self) -> Kind {
        match self {
            Some(value) => value.kind(),
            None => T::default().kind(),
        }
    }

    fn focus(&mut self) -> &mut dyn Target {
        self.get_or_insert_with(T::default).focus()
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn focus(&mut self) -> &mut dyn Target {
        (**self).focus()
    }
}
