use crate::{InjectError, InjectResult, Scope, Service, ServiceFactory};
use std::{error::Error, marker::PhantomData};

/// A service factory that may fail during service creation with a custom error
/// type. During activation failure, an instance of
/// [`InjectError::ActivationFailed`] is returned as an error.
pub struct FallibleServiceFactory<D, R, E, F>
where
    R: Service,
    E: Error + Send + Sync + 'static,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    inner: F,
    marker: PhantomData<fn(D) -> Result<R, E>>,
}

impl<D, R, E, F> ServiceFactory<D> for FallibleServiceFactory<D, R, E, F>
where
    D: 'static,
    R: Service,
    E: Error + Send + Sync + 'static,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    type Result = R;

    fn invoke(&self, scope: &Scope) -> InjectResult<Self::Result> {
        match self.inner.invoke(scope)? {
            Ok(result) => Ok(result),
            Err(error) => Err(InjectError::ActivationFailed {
                service: std::any::type_name::<R>(),
                inner: Box::new(error),
            }),
        }
    }
}

/// Defines a conversion into a fallible service factory. This trait is
/// automatically implemented for all service factories that return a
/// [`Result<T, E>`] with an error type that implements [`Error`].
pub trait IntoFallible<D, R, E, F>
where
    R: Service,
    E: Error + Send + Sync + 'static,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    /// Marks a service factory as being able to fail. On failure, an
    /// injection error is returned during activation. On success, the service
    /// is provided unwrapped from the result.
    ///
    /// # Example
    ///
    /// ```
    /// use scoped_injector::{
    ///     InjectError, InjectResult, IntoFallible, IntoFactory, Scope, Svc,
    /// };
    /// use std::{
    ///     error::Error,
    ///     fmt::{Display, Formatter},
    /// };
    ///
    /// #[derive(Debug)]
    /// struct FooError;
    ///
    /// impl Error for FooError {}
    /// impl Display for FooError {
    ///     fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    ///         write!(f, "An error occurred while creating a Foo")
    ///     }
    /// }
    ///
    /// struct Foo;
    /// fn make_foo() -> Result<Foo, FooError> {
    ///     Err(FooError)
    /// }
    ///
    /// let scope = Scope::new();
    /// scope.provide(make_foo.fallible().factory());
    ///
    /// let foo_result: InjectResult<Svc<Foo>> = scope.resolve();
    /// match foo_result {
    ///     Err(InjectError::ActivationFailed { .. }) => {}
    ///     Err(error) => Err(error).unwrap(),
    ///     _ => unreachable!("activation should have failed"),
    /// }
    /// ```
    #[must_use]
    fn fallible(self) -> FallibleServiceFactory<D, R, E, F>;
}

impl<D, R, E, F> IntoFallible<D, R, E, F> for F
where
    R: Service,
    E: Error + Send + Sync + 'static,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    fn fallible(self) -> FallibleServiceFactory<D, R, E, F> {
        FallibleServiceFactory {
            inner: self,
            marker: PhantomData,
        }
    }
}
