use crate::{InjectResult, Scope, Service};

/// A producer function for a service. Closures and functions taking no
/// arguments, or taking only the [`Scope`] the service is being resolved
/// from, are automatically service factories as long as they return a valid
/// service type.
///
/// ```
/// use scoped_injector::{Scope, ServiceFactory, Svc};
///
/// struct Foo;
/// struct Bar(Svc<Foo>);
///
/// fn make_bar(scope: &Scope) -> Bar {
///     Bar(scope.resolve().unwrap())
/// }
///
/// let scope = Scope::new();
/// scope.single(|| Foo);
/// let _bar = make_bar.invoke(&scope).unwrap();
/// ```
///
/// # Type parameters
/// * `D` - `()` for producers without arguments, `(Scope,)` for producers
///   that receive their scope.
pub trait ServiceFactory<D>: Send + Sync + 'static {
    /// The resulting service from invoking this service factory.
    type Result: Service;

    /// Invokes this service factory, creating an instance of the service.
    fn invoke(&self, scope: &Scope) -> InjectResult<Self::Result>;
}

impl<F, R> ServiceFactory<()> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: Service,
{
    type Result = R;

    fn invoke(&self, _scope: &Scope) -> InjectResult<Self::Result> {
        Ok(self())
    }
}

impl<F, R> ServiceFactory<(Scope,)> for F
where
    F: Fn(&Scope) -> R + Send + Sync + 'static,
    R: Service,
{
    type Result = R;

    fn invoke(&self, scope: &Scope) -> InjectResult<Self::Result> {
        Ok(self(scope))
    }
}
