use crate::{
    downcast_svc, ConstantProvider, FactoryProvider, Inject, InjectError,
    InjectResult, Properties, Provider, Qualifier, ScopeProperty, Service,
    ServiceFactory, SingleProvider, Svc,
};
use log::{debug, trace};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

type Registry = HashMap<Qualifier, Svc<dyn Provider>>;

#[derive(Default)]
struct ScopeState {
    registry: RwLock<Registry>,
    properties: RwLock<Properties>,
}

/// An isolated registry of bindings plus the properties it was created with.
///
/// Cloning a scope does not clone the bindings inside of it. Instead, both
/// handles refer to the same registry, which is how a scope can be handed to
/// producers and to [`Inject`] handles.
///
/// ```
/// use scoped_injector::{named, Scope, Svc};
///
/// let scope = Scope::new();
/// scope.single_qualified(named("msg"), || String::from("hello"));
/// scope.factory(|scope: &Scope| {
///     let msg: Svc<String> = scope.resolve_qualified(&named("msg")).unwrap();
///     msg.len()
/// });
///
/// let msg: Svc<String> = scope.resolve_qualified(&named("msg")).unwrap();
/// let len: Svc<usize> = scope.resolve().unwrap();
/// assert_eq!("hello", msg.as_str());
/// assert_eq!(5, *len);
/// ```
#[derive(Clone, Default)]
pub struct Scope {
    state: Svc<ScopeState>,
}

impl Scope {
    /// Creates a new, empty scope with no properties.
    #[must_use]
    pub fn new() -> Self {
        Scope::default()
    }

    /// Creates a new, empty scope whose definition will read `properties`.
    #[must_use]
    pub fn with_properties(properties: Properties) -> Self {
        let scope = Scope::new();
        *scope.state.properties.write() = properties;
        scope
    }

    /// Returns `true` if both handles refer to the same scope.
    #[must_use]
    pub fn ptr_eq(a: &Scope, b: &Scope) -> bool {
        Svc::ptr_eq(&a.state, &b.state)
    }

    /// Binds `provider` to `qualifier`. If a provider was already bound to
    /// that qualifier, it is replaced and returned. Handles already issued by
    /// [`Scope::inject_qualified`] keep using the provider they were created
    /// with.
    pub fn register<P: Provider>(
        &self,
        qualifier: Qualifier,
        provider: P,
    ) -> Option<Svc<dyn Provider>> {
        trace!("binding {}", qualifier);
        let provider: Svc<dyn Provider> = Svc::new(provider);
        let previous =
            self.state.registry.write().insert(qualifier.clone(), provider);
        if previous.is_some() {
            debug!("replaced the existing binding for {}", qualifier);
        }

        previous
    }

    /// Binds `provider` to the type qualifier of the value it provides.
    pub fn provide<P: Provider>(
        &self,
        provider: P,
    ) -> Option<Svc<dyn Provider>> {
        let qualifier = provider.result();
        self.register(qualifier, provider)
    }

    /// Binds a lazily created single instance to the type it produces.
    pub fn single<D, F>(&self, factory: F)
    where
        D: 'static,
        F: ServiceFactory<D>,
    {
        drop(self.provide(SingleProvider::new(factory)));
    }

    /// Binds a lazily created single instance to `qualifier`.
    pub fn single_qualified<D, F>(&self, qualifier: Qualifier, factory: F)
    where
        D: 'static,
        F: ServiceFactory<D>,
    {
        drop(self.register(qualifier, SingleProvider::new(factory)));
    }

    /// Binds a producer that runs on every resolution to the type it
    /// produces.
    pub fn factory<D, F>(&self, factory: F)
    where
        D: 'static,
        F: ServiceFactory<D>,
    {
        drop(self.provide(FactoryProvider::new(factory)));
    }

    /// Binds a producer that runs on every resolution to `qualifier`.
    pub fn factory_qualified<D, F>(&self, qualifier: Qualifier, factory: F)
    where
        D: 'static,
        F: ServiceFactory<D>,
    {
        drop(self.register(qualifier, FactoryProvider::new(factory)));
    }

    /// Binds an already created value to its type.
    pub fn constant<T: Service>(&self, value: T) {
        drop(self.provide(ConstantProvider::new(value)));
    }

    /// Binds an already created value to `qualifier`.
    pub fn constant_qualified<T: Service>(
        &self,
        qualifier: Qualifier,
        value: T,
    ) {
        drop(self.register(qualifier, ConstantProvider::new(value)));
    }

    /// Resolves the binding for the type qualifier of `T`.
    pub fn resolve<T: Service>(&self) -> InjectResult<Svc<T>> {
        self.resolve_qualified(&Qualifier::of::<T>())
    }

    /// Resolves the binding for `qualifier` as a `T`. Fails if nothing is
    /// bound to `qualifier` or if the bound provider does not provide a `T`.
    pub fn resolve_qualified<T: Service>(
        &self,
        qualifier: &Qualifier,
    ) -> InjectResult<Svc<T>> {
        let provider = self.provider(qualifier).ok_or_else(|| {
            InjectError::UnboundQualifier {
                qualifier: qualifier.clone(),
            }
        })?;

        downcast_svc(qualifier, provider.provide(self)?)
    }

    /// Creates a lazy handle for the type qualifier of `T`.
    #[must_use]
    pub fn inject<T: Service>(&self) -> Inject<T> {
        self.inject_qualified(Qualifier::of::<T>())
    }

    /// Creates a lazy handle for `qualifier`. The provider is looked up now,
    /// but it is only invoked when [`Inject::get`] is called. Any error,
    /// including a missing binding, is reported by [`Inject::get`].
    #[must_use]
    pub fn inject_qualified<T: Service>(
        &self,
        qualifier: Qualifier,
    ) -> Inject<T> {
        let provider = self.provider(&qualifier);
        Inject::new(self.clone(), qualifier, provider)
    }

    /// Gets a clone of the property set for `key` when the scope was created.
    pub fn property<T: ScopeProperty + Clone>(
        &self,
        key: &str,
    ) -> InjectResult<T> {
        let properties = self.state.properties.read();
        let property = properties
            .get(key)
            .ok_or_else(|| InjectError::MissingProperty {
                key: key.to_owned(),
            })?;

        property.downcast_ref::<T>().cloned().ok_or_else(|| {
            InjectError::InvalidProperty {
                key: key.to_owned(),
                expected: std::any::type_name::<T>(),
            }
        })
    }

    /// Returns `true` if a provider is bound to `qualifier`.
    #[must_use]
    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.state.registry.read().contains_key(qualifier)
    }

    /// Gets the number of bindings in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.registry.read().len()
    }

    /// Returns `true` if this scope has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.registry.read().is_empty()
    }

    /// Removes every binding and property from this scope. Closing a closed
    /// scope does nothing.
    pub fn close(&self) {
        // Providers are dropped after the lock is released; a cached service
        // may own a handle to this scope
        let registry = std::mem::take(&mut *self.state.registry.write());
        self.state.properties.write().clear();
        trace!("closed scope with {} bindings", registry.len());
    }

    fn provider(&self, qualifier: &Qualifier) -> Option<Svc<dyn Provider>> {
        self.state.registry.read().get(qualifier).cloned()
    }
}

impl Debug for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let registry = self.state.registry.read();
        let properties = self.state.properties.read();
        f.debug_struct("Scope")
            .field("bindings", &registry.keys().collect::<Vec<_>>())
            .field("properties", &*properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;

    #[test]
    fn resolves_by_type_and_by_name() {
        let scope = Scope::new();
        scope.constant(1_i32);
        scope.constant_qualified(named("two"), 2_i32);

        assert_eq!(1, *scope.resolve::<i32>().unwrap());
        assert_eq!(
            2,
            *scope.resolve_qualified::<i32>(&named("two")).unwrap()
        );
    }

    #[test]
    fn unbound_qualifier_is_an_error() {
        let scope = Scope::new();
        match scope.resolve_qualified::<i32>(&named("missing")) {
            Err(InjectError::UnboundQualifier { qualifier })
                if qualifier == named("missing") => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("nothing is bound"),
        }
    }

    #[test]
    fn wrong_requested_type_is_an_error() {
        let scope = Scope::new();
        scope.constant_qualified(named("value"), 1_i32);

        match scope.resolve_qualified::<String>(&named("value")) {
            Err(InjectError::TypeMismatch { qualifier, .. })
                if qualifier == named("value") => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("an i32 was resolved as a String"),
        }
    }

    #[test]
    fn register_overwrites_silently() {
        let scope = Scope::new();
        let first = scope.register(named("n"), ConstantProvider::new(1_i32));
        let second = scope.register(named("n"), ConstantProvider::new(2_i32));
        assert!(first.is_none());
        assert!(second.is_some());

        assert_eq!(1, scope.len());
        assert_eq!(2, *scope.resolve_qualified::<i32>(&named("n")).unwrap());
    }

    #[test]
    fn properties_are_typed() {
        let scope =
            Scope::with_properties(Properties::new().with("id", 42_i32));

        assert_eq!(42, scope.property::<i32>("id").unwrap());
        match scope.property::<String>("id") {
            Err(InjectError::InvalidProperty { key, .. }) if key == "id" => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("an i32 was read as a String"),
        }
        match scope.property::<i32>("name") {
            Err(InjectError::MissingProperty { key }) if key == "name" => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("the property was never set"),
        }
    }

    #[test]
    fn close_is_idempotent() {
        let scope =
            Scope::with_properties(Properties::new().with("id", 1_i32));
        scope.constant(1_i32);

        scope.close();
        scope.close();

        assert!(scope.is_empty());
        assert!(scope.property::<i32>("id").is_err());
        assert!(scope.resolve::<i32>().is_err());
    }

    #[test]
    fn clones_share_bindings() {
        let scope = Scope::new();
        let other = scope.clone();
        other.constant(5_u8);

        assert!(Scope::ptr_eq(&scope, &other));
        assert!(!Scope::ptr_eq(&scope, &Scope::new()));
        assert_eq!(5, *scope.resolve::<u8>().unwrap());
    }
}
