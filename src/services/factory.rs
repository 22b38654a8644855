use crate::{InjectResult, Scope, ServiceFactory, Svc, TypedProvider};
use std::marker::PhantomData;

/// A service provider that creates an instance of the service each time it is
/// requested. This will never return two service pointers to the same instance
/// of a service.
pub struct FactoryProvider<D, F>
where
    F: ServiceFactory<D>,
{
    factory: F,
    marker: PhantomData<fn(D) -> F::Result>,
}

impl<D, F> FactoryProvider<D, F>
where
    F: ServiceFactory<D>,
{
    /// Creates a new [`FactoryProvider`] using a service factory.
    #[must_use]
    pub fn new(factory: F) -> Self {
        FactoryProvider {
            factory,
            marker: PhantomData,
        }
    }
}

impl<D, F> TypedProvider for FactoryProvider<D, F>
where
    D: 'static,
    F: ServiceFactory<D>,
{
    type Result = F::Result;

    fn provide_typed(&self, scope: &Scope) -> InjectResult<Svc<Self::Result>> {
        let result = self.factory.invoke(scope)?;
        Ok(Svc::new(result))
    }
}

/// Defines a conversion into a factory provider. This trait is automatically
/// implemented for all service factories.
pub trait IntoFactory<D, F>
where
    F: ServiceFactory<D>,
{
    /// Creates a factory provider. Factory providers create their values
    /// each time the service is requested and will never return service
    /// pointers to the same instance more than once.
    ///
    /// # Example
    ///
    /// ```
    /// use scoped_injector::{IntoFactory, Scope, Svc};
    ///
    /// #[derive(Default)]
    /// struct Foo;
    ///
    /// let scope = Scope::new();
    /// scope.provide(Foo::default.factory());
    ///
    /// let foo1: Svc<Foo> = scope.resolve().unwrap();
    /// let foo2: Svc<Foo> = scope.resolve().unwrap();
    ///
    /// assert!(!Svc::ptr_eq(&foo1, &foo2));
    /// ```
    #[must_use]
    fn factory(self) -> FactoryProvider<D, F>;
}

impl<D, F> IntoFactory<D, F> for F
where
    F: ServiceFactory<D>,
{
    fn factory(self) -> FactoryProvider<D, F> {
        FactoryProvider::new(self)
    }
}

impl<D, F> From<F> for FactoryProvider<D, F>
where
    F: ServiceFactory<D>,
{
    fn from(factory: F) -> Self {
        factory.factory()
    }
}
