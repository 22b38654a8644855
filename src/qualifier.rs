use derive_more::Display;
use std::{any::Any, borrow::Cow};

/// The kind of key a [`Qualifier`] represents.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Display)]
pub enum QualifierKind {
    /// A literal name chosen by the binding author.
    #[display(fmt = "name")]
    Name,

    /// The canonical name of a type.
    #[display(fmt = "type")]
    Type,
}

/// Identity key for a binding. Two qualifiers are equal if and only if they
/// have the same kind and the same underlying string, so independently
/// constructed qualifiers for the same type always select the same binding.
///
/// ```
/// use scoped_injector::{named, Qualifier};
///
/// assert_eq!(named("msg"), named(String::from("msg")));
/// assert_eq!(Qualifier::of::<String>(), Qualifier::of::<String>());
///
/// // A name never collides with a type, even if the strings match
/// let type_name = std::any::type_name::<String>();
/// assert_ne!(named(type_name), Qualifier::of::<String>());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Hash, Display)]
#[display(fmt = "{}:{}", kind, value)]
pub struct Qualifier {
    kind: QualifierKind,
    value: Cow<'static, str>,
}

impl Qualifier {
    /// Creates a qualifier from a literal name.
    #[must_use]
    pub fn name(value: impl Into<Cow<'static, str>>) -> Self {
        Qualifier {
            kind: QualifierKind::Name,
            value: value.into(),
        }
    }

    /// Creates a type qualifier from an explicitly supplied canonical type
    /// name. Prefer [`Qualifier::of`] unless the name must stay stable across
    /// builds or crates.
    #[must_use]
    pub fn type_name(value: impl Into<Cow<'static, str>>) -> Self {
        Qualifier {
            kind: QualifierKind::Type,
            value: value.into(),
        }
    }

    /// Creates the type qualifier for `T`.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        Qualifier::type_name(std::any::type_name::<T>())
    }

    /// Gets the kind of this qualifier.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> QualifierKind {
        self.kind
    }

    /// Gets the name or type name this qualifier was created from.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Creates a qualifier from a literal name.
#[must_use]
pub fn named(value: impl Into<Cow<'static, str>>) -> Qualifier {
    Qualifier::name(value)
}
