use crate::{InjectResult, Scope, ServiceFactory, Svc, TypedProvider};
use log::trace;
use once_cell::sync::OnceCell;
use std::marker::PhantomData;

/// A service provider that only creates a single instance of the service.
/// The service is created only during its first request. Any subsequent
/// requests return service pointers to the same service.
///
/// Concurrent first requests run the producer exactly once; the other callers
/// block until it finishes and then share its result. If the producer fails,
/// nothing is cached and the next request runs it again.
pub struct SingleProvider<D, F>
where
    F: ServiceFactory<D>,
{
    factory: F,
    result: OnceCell<Svc<F::Result>>,
    marker: PhantomData<fn(D) -> F::Result>,
}

impl<D, F> SingleProvider<D, F>
where
    F: ServiceFactory<D>,
{
    /// Creates a new [`SingleProvider`] using a service factory.
    #[must_use]
    pub fn new(factory: F) -> Self {
        SingleProvider {
            factory,
            result: OnceCell::new(),
            marker: PhantomData,
        }
    }
}

impl<D, F> TypedProvider for SingleProvider<D, F>
where
    D: 'static,
    F: ServiceFactory<D>,
{
    type Result = F::Result;

    fn provide_typed(&self, scope: &Scope) -> InjectResult<Svc<Self::Result>> {
        let result = self.result.get_or_try_init(|| -> InjectResult<_> {
            let result = self.factory.invoke(scope)?;
            trace!(
                "initialized single instance of {}",
                std::any::type_name::<F::Result>()
            );
            Ok(Svc::new(result))
        })?;

        Ok(result.clone())
    }
}

/// Defines a conversion into a single provider. This trait is automatically
/// implemented for all service factories.
pub trait IntoSingle<D, F>
where
    F: ServiceFactory<D>,
{
    /// Creates a single provider. Single providers create their values only
    /// once (when first requested) and reuse that value for each future
    /// request.
    ///
    /// # Example
    ///
    /// ```
    /// use scoped_injector::{IntoSingle, Scope, Svc};
    ///
    /// #[derive(Default)]
    /// struct Foo;
    ///
    /// let scope = Scope::new();
    /// scope.provide(Foo::default.single());
    ///
    /// let foo1: Svc<Foo> = scope.resolve().unwrap();
    /// let foo2: Svc<Foo> = scope.resolve().unwrap();
    ///
    /// assert!(Svc::ptr_eq(&foo1, &foo2));
    /// ```
    #[must_use]
    fn single(self) -> SingleProvider<D, F>;
}

impl<D, F> IntoSingle<D, F> for F
where
    F: ServiceFactory<D>,
{
    fn single(self) -> SingleProvider<D, F> {
        SingleProvider::new(self)
    }
}

impl<D, F> From<F> for SingleProvider<D, F>
where
    F: ServiceFactory<D>,
{
    fn from(factory: F) -> Self {
        factory.single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InjectError, IntoFallible};
    use std::{
        fmt::{Display, Formatter},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Barrier, Mutex,
        },
        thread,
    };

    #[derive(PartialEq, Eq, Debug)]
    struct Foo(i32);

    #[derive(Debug)]
    struct Flaky;

    impl std::error::Error for Flaky {}
    impl Display for Flaky {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "not yet")
        }
    }

    /// Single provider provides the correct value.
    #[test]
    fn single_provider_provides_correct_value() {
        let provider = (|| Foo(42)).single();
        let foo = provider.provide_typed(&Scope::new()).unwrap();
        assert_eq!(&*foo, &Foo(42));
    }

    /// When value is mutated, the provider returns the mutated value.
    #[test]
    fn single_provider_returns_mutated_value() {
        let scope = Scope::new();
        let provider = (|| Mutex::new(Foo(0))).single();

        let foo = provider.provide_typed(&scope).unwrap();
        foo.lock().unwrap().0 = 42;

        let foo = provider.provide_typed(&scope).unwrap();
        assert_eq!(&*foo.lock().unwrap(), &Foo(42));
    }

    #[test]
    fn single_provider_runs_producer_once_under_contention() {
        const THREADS: usize = 16;

        let calls = Arc::new(AtomicUsize::new(0));
        let provider = {
            let calls = calls.clone();
            (move || {
                calls.fetch_add(1, Ordering::SeqCst);
                thread::yield_now();
                Foo(7)
            })
            .single()
        };

        let scope = Scope::new();
        let barrier = Barrier::new(THREADS);
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        provider.provide_typed(&scope).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert!(results.iter().all(|foo| Svc::ptr_eq(foo, &results[0])));
    }

    #[test]
    fn single_provider_retries_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = {
            let calls = calls.clone();
            (move || {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Flaky)
                } else {
                    Ok(Foo(1))
                }
            })
            .fallible()
            .single()
        };

        let scope = Scope::new();
        match provider.provide_typed(&scope) {
            Err(InjectError::ActivationFailed { .. }) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => panic!("first activation should have failed"),
        }

        let first = provider.provide_typed(&scope).unwrap();
        let second = provider.provide_typed(&scope).unwrap();
        assert!(Svc::ptr_eq(&first, &second));
        assert_eq!(2, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn single_provider_from_factory() {
        let scope = Scope::new();
        scope.provide(SingleProvider::from(|| Foo(3)));

        let first: Svc<Foo> = scope.resolve().unwrap();
        let second: Svc<Foo> = scope.resolve().unwrap();
        assert!(Svc::ptr_eq(&first, &second));
    }
}
