use crate::{DynSvc, InjectResult, Qualifier, Scope, Service, Svc};

/// Weakly typed service provider. Given the scope it is being resolved from,
/// this will provide an instance of a service. This is automatically
/// implemented for all types that implement [`TypedProvider`], and
/// [`TypedProvider`] should be preferred if possible to allow for stronger
/// type checking.
///
/// Providers are stored untyped in a scope's registry, so a provider that
/// returns a different type than the one requested only fails at resolution
/// time with [`InjectError::TypeMismatch`](crate::InjectError::TypeMismatch).
pub trait Provider: Send + Sync + 'static {
    /// The type qualifier of the value returned by this provider. Bindings
    /// registered without an explicit qualifier are keyed by this.
    fn result(&self) -> Qualifier;

    /// Provides an instance of the service.
    fn provide(&self, scope: &Scope) -> InjectResult<DynSvc>;
}

impl<T> Provider for T
where
    T: TypedProvider,
{
    fn result(&self) -> Qualifier {
        Qualifier::of::<T::Result>()
    }

    fn provide(&self, scope: &Scope) -> InjectResult<DynSvc> {
        let result = self.provide_typed(scope)?;
        Ok(result as DynSvc)
    }
}

/// A strongly-typed service provider. Types which implement this provide
/// instances of a service type when requested. [`Provider`] is automatically
/// implemented for all types which implement [`TypedProvider`].
///
/// # Example
///
/// ```
/// use scoped_injector::{InjectResult, Scope, Svc, TypedProvider};
///
/// struct Foo;
///
/// struct FooProvider;
/// impl TypedProvider for FooProvider {
///     type Result = Foo;
///
///     fn provide_typed(&self, _scope: &Scope) -> InjectResult<Svc<Foo>> {
///         Ok(Svc::new(Foo))
///     }
/// }
///
/// let scope = Scope::new();
/// scope.provide(FooProvider);
///
/// let _foo: Svc<Foo> = scope.resolve().unwrap();
/// ```
pub trait TypedProvider: Provider {
    /// The type of service this provider can activate.
    type Result: Service;

    /// Provides an instance of the service. The [`Scope`] passed in can be
    /// used to resolve any other bindings this service depends on.
    fn provide_typed(&self, scope: &Scope) -> InjectResult<Svc<Self::Result>>;
}
