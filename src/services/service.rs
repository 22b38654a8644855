#![allow(clippy::used_underscore_binding)]

use crate::Qualifier;
use derive_more::Display;
use std::{
    any::Any,
    error::Error,
    sync::Arc,
};

/// A reference-counted pointer holding a service. Services are always shared
/// through thread-safe pointers so that a container can be used from many
/// threads at once.
pub type Svc<T> = Arc<T>;

/// A reference-counted service pointer holding an instance of `dyn Any`.
pub type DynSvc = Arc<dyn Any + Send + Sync>;

/// A result from attempting to resolve a service or a scope.
pub type InjectResult<T> = Result<T, InjectError>;

/// Implemented automatically on types that are capable of being a service.
pub trait Service: Any + Send + Sync {}
impl<T: ?Sized + Any + Send + Sync> Service for T {}

/// An error that has occurred while defining scopes or resolving services.
#[derive(Debug, Display)]
#[non_exhaustive]
pub enum InjectError {
    /// A scope definition was registered twice for the same qualifier.
    #[display(fmt = "scope {} has already been defined", qualifier)]
    DuplicateScopeDefinition {
        /// The qualifier of the scope kind.
        qualifier: Qualifier,
    },

    /// A scope was requested for a kind that has no definition.
    #[display(fmt = "scope {} has not been defined", qualifier)]
    UndefinedScope {
        /// The qualifier of the scope kind.
        qualifier: Qualifier,
    },

    /// No live scope exists with the requested id.
    #[display(fmt = "no scope with id {:?} has been created", scope_id)]
    ScopeNotFound {
        /// The id that was requested.
        scope_id: String,
    },

    /// No provider is bound to the requested qualifier.
    #[display(fmt = "{} has no provider", qualifier)]
    UnboundQualifier {
        /// The qualifier that was requested.
        qualifier: Qualifier,
    },

    /// The bound provider returned a value of a different type than the one
    /// that was requested.
    #[display(
        fmt = "the provider bound to {} does not provide {}",
        qualifier,
        expected
    )]
    TypeMismatch {
        /// The qualifier that was requested.
        qualifier: Qualifier,

        /// The name of the type that was requested.
        expected: &'static str,
    },

    /// A scope property was read but never set.
    #[display(fmt = "scope property {:?} is not set", key)]
    MissingProperty {
        /// The key of the property.
        key: String,
    },

    /// A scope property was read as the wrong type.
    #[display(fmt = "scope property {:?} is not a {}", key, expected)]
    InvalidProperty {
        /// The key of the property.
        key: String,

        /// The name of the type that was requested.
        expected: &'static str,
    },

    /// A fallible producer returned an error.
    #[display(fmt = "an error occurred during activation of {}", service)]
    ActivationFailed {
        /// The name of the type being produced.
        service: &'static str,

        /// The error returned by the producer.
        inner: Box<dyn Error + Send + Sync + 'static>,
    },
}

impl Error for InjectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InjectError::ActivationFailed { inner, .. } => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Downcasts a service returned by a provider to the requested type.
pub(crate) fn downcast_svc<T: Service>(
    qualifier: &Qualifier,
    service: DynSvc,
) -> InjectResult<Svc<T>> {
    service.downcast().map_err(|_| InjectError::TypeMismatch {
        qualifier: qualifier.clone(),
        expected: std::any::type_name::<T>(),
    })
}
