use crate::{
    downcast_svc, InjectError, InjectResult, Provider, Qualifier, Scope,
    Service, Svc,
};
use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
};

/// A lazy, read-only handle to a binding, created by [`Scope::inject`] or
/// [`Scope::inject_qualified`].
///
/// The provider is fixed when the handle is created. Rebinding the qualifier
/// afterwards does not affect existing handles, and each call to
/// [`Inject::get`] asks that provider for a value, so a handle to a factory
/// binding returns a new instance every time.
///
/// ```
/// use scoped_injector::{named, Scope, Svc};
///
/// let scope = Scope::new();
/// scope.single_qualified(named("msg"), || String::from("hello"));
///
/// let msg = scope.inject_qualified::<String>(named("msg"));
/// scope.single_qualified(named("msg"), || String::from("goodbye"));
///
/// assert_eq!("hello", msg.get().unwrap().as_str());
/// ```
pub struct Inject<T: Service> {
    scope: Scope,
    qualifier: Qualifier,
    provider: Option<Svc<dyn Provider>>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Service> Inject<T> {
    pub(crate) fn new(
        scope: Scope,
        qualifier: Qualifier,
        provider: Option<Svc<dyn Provider>>,
    ) -> Self {
        Inject {
            scope,
            qualifier,
            provider,
            marker: PhantomData,
        }
    }

    /// Gets the qualifier this handle was created for.
    #[must_use]
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// Returns `true` if a provider was bound when this handle was created.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolves the value through the provider captured by this handle.
    pub fn get(&self) -> InjectResult<Svc<T>> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            InjectError::UnboundQualifier {
                qualifier: self.qualifier.clone(),
            }
        })?;

        downcast_svc(&self.qualifier, provider.provide(&self.scope)?)
    }
}

impl<T: Service> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject {
            scope: self.scope.clone(),
            qualifier: self.qualifier.clone(),
            provider: self.provider.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Service> Debug for Inject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inject")
            .field("qualifier", &self.qualifier)
            .field("target", &std::any::type_name::<T>())
            .field("bound", &self.is_bound())
            .finish()
    }
}
