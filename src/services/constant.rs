use crate::{InjectResult, Scope, Service, Svc, TypedProvider};

/// A provider which returns a constant, predetermined value. Note that this is
/// technically a single service in that it does not recreate the value each
/// time it is requested.
pub struct ConstantProvider<R>
where
    R: Service,
{
    result: Svc<R>,
}

impl<R> ConstantProvider<R>
where
    R: Service,
{
    /// Creates a new `ConstantProvider` using a predetermined value.
    #[must_use]
    pub fn new(value: R) -> Self {
        ConstantProvider {
            result: Svc::new(value),
        }
    }
}

impl<R> TypedProvider for ConstantProvider<R>
where
    R: Service,
{
    type Result = R;

    fn provide_typed(&self, _scope: &Scope) -> InjectResult<Svc<Self::Result>> {
        Ok(self.result.clone())
    }
}

impl<T: Service> From<T> for ConstantProvider<T> {
    fn from(value: T) -> Self {
        constant(value)
    }
}

/// Create a service from a constant value. While the service itself will never
/// be exposed through a mutable reference, if it supports interior mutability,
/// its fields still can be mutated.
///
/// # Example
///
/// ```
/// use scoped_injector::{constant, Scope, Svc};
/// use std::sync::Mutex;
///
/// let scope = Scope::new();
/// scope.provide(constant(Mutex::new(0_i32)));
///
/// let counter: Svc<Mutex<i32>> = scope.resolve().unwrap();
/// *counter.lock().unwrap() += 1;
///
/// let counter: Svc<Mutex<i32>> = scope.resolve().unwrap();
/// assert_eq!(1, *counter.lock().unwrap());
/// ```
pub fn constant<T: Service>(value: T) -> ConstantProvider<T> {
    ConstantProvider::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_provider_from_value() {
        let scope = Scope::new();
        scope.provide(ConstantProvider::from(5_i32));

        let first: Svc<i32> = scope.resolve().unwrap();
        let second: Svc<i32> = scope.resolve().unwrap();
        assert_eq!(5, *first);
        assert!(Svc::ptr_eq(&first, &second));
    }
}
