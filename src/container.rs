use crate::{
    definition::{insert_definition, DefinitionMap},
    ContainerBuilder, Inject, InjectError, InjectResult, Properties, Qualifier,
    Scope, ScopeDefinition, Service, Svc,
};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

/// Caller-chosen key distinguishing live instances of the same scope kind,
/// for example one scope per session.
pub type ScopeId = String;

/// A scope instance which may still be under construction. Creation of a
/// scope is serialized per id by initializing its slot.
type ScopeSlot = OnceCell<Scope>;

struct ContainerState {
    default_scope: Scope,
    scopes: Mutex<HashMap<ScopeId, Svc<ScopeSlot>>>,
    definitions: RwLock<DefinitionMap>,
}

/// A runtime dependency injection container. This owns a default scope, which
/// is always available, plus any number of keyed scopes created on demand
/// from registered scope definitions.
///
/// # Sharing the container
///
/// Cloning the container does not clone the scopes inside of it. Instead,
/// both containers will use the same scopes and definitions, meaning the
/// container can be handed to any part of the application that needs to
/// resolve services.
///
/// # Example
///
/// ```
/// use scoped_injector::{
///     named, Container, InjectResult, Properties, Scope, Svc,
/// };
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// static MEOWS: AtomicUsize = AtomicUsize::new(0);
///
/// let container = Container::new();
/// container
///     .define_default(|scope: &Scope| -> InjectResult<()> {
///         scope.single_qualified(named("msg"), || String::from("hello"));
///         Ok(())
///     })
///     .unwrap();
///
/// container
///     .define_scope(named("cat"), |scope: &Scope| -> InjectResult<()> {
///         let id: i32 = scope.property("id")?;
///         scope.single(move || id);
///         scope.factory(|| {
///             let count = MEOWS.fetch_add(1, Ordering::SeqCst) + 1;
///             "meow".repeat(count)
///         });
///         Ok(())
///     })
///     .unwrap();
///
/// let msg: Svc<String> = container.resolve_qualified(&named("msg")).unwrap();
/// assert_eq!("hello", msg.as_str());
///
/// let properties = Properties::new().with("id", 42_i32);
/// let cat = container
///     .get_or_create_scope("s1", &named("cat"), properties)
///     .unwrap();
/// assert_eq!(42, *cat.resolve::<i32>().unwrap());
///
/// let first: Svc<String> = cat.resolve().unwrap();
/// let second: Svc<String> = cat.resolve().unwrap();
/// assert_ne!(first, second);
///
/// container.close_all();
/// assert!(container.get_scope("s1").is_err());
/// assert!(container.resolve_qualified::<String>(&named("msg")).is_ok());
/// ```
#[derive(Clone)]
pub struct Container {
    state: Svc<ContainerState>,
}

impl Container {
    /// Creates a builder for a container.
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    /// Creates a new container with an empty default scope and no scope
    /// definitions.
    #[must_use]
    pub fn new() -> Self {
        Container::from_definitions(DefinitionMap::new())
    }

    pub(crate) fn from_definitions(definitions: DefinitionMap) -> Self {
        Container {
            state: Svc::new(ContainerState {
                default_scope: Scope::new(),
                scopes: Mutex::default(),
                definitions: RwLock::new(definitions),
            }),
        }
    }

    /// Gets the default scope. The default scope lives as long as the
    /// container and is never closed by [`Container::close_all`].
    #[must_use]
    pub fn default_scope(&self) -> &Scope {
        &self.state.default_scope
    }

    /// Runs `definition` against the default scope immediately. This can be
    /// called any number of times to add more bindings.
    pub fn define_default<D: ScopeDefinition>(
        &self,
        definition: D,
    ) -> InjectResult<()> {
        definition.define(&self.state.default_scope)
    }

    /// Registers the definition for a scope kind. Fails if the kind has
    /// already been defined.
    pub fn define_scope<D: ScopeDefinition>(
        &self,
        qualifier: Qualifier,
        definition: D,
    ) -> InjectResult<()> {
        let mut definitions = self.state.definitions.write();
        insert_definition(&mut definitions, qualifier, Svc::new(definition))
    }

    /// Returns `true` if a definition exists for the scope kind `qualifier`.
    #[must_use]
    pub fn is_scope_defined(&self, qualifier: &Qualifier) -> bool {
        self.state.definitions.read().contains_key(qualifier)
    }

    /// Gets the scope with the given id, creating it from the definition of
    /// `qualifier` if it doesn't exist yet. When the scope already exists,
    /// `qualifier` and `properties` are ignored.
    ///
    /// Concurrent calls for the same unseen id run the definition once; every
    /// caller gets the same scope. Calls for different ids do not wait on each
    /// other. If the definition fails, the error is returned and the next call
    /// for that id tries again.
    pub fn get_or_create_scope(
        &self,
        scope_id: impl Into<ScopeId>,
        qualifier: &Qualifier,
        properties: Properties,
    ) -> InjectResult<Scope> {
        let scope_id = scope_id.into();
        let slot = self
            .state
            .scopes
            .lock()
            .entry(scope_id.clone())
            .or_default()
            .clone();

        let result = slot.get_or_try_init(|| {
            self.create_scope(&scope_id, qualifier, properties)
        });
        match result {
            Ok(scope) => Ok(scope.clone()),
            Err(error) => {
                self.forget_empty_slot(&scope_id, &slot);
                Err(error)
            }
        }
    }

    /// Removes the slot for `scope_id` after a failed creation, unless another
    /// caller still holds it and may retry.
    fn forget_empty_slot(&self, scope_id: &str, slot: &Svc<ScopeSlot>) {
        let mut scopes = self.state.scopes.lock();
        let unused = scopes.get(scope_id).map_or(false, |current| {
            // Slots are only cloned under the table lock, so the table and
            // this caller are the only owners
            Svc::ptr_eq(current, slot)
                && Svc::strong_count(slot) == 2
                && slot.get().is_none()
        });
        if unused {
            scopes.remove(scope_id);
        }
    }

    fn create_scope(
        &self,
        scope_id: &str,
        qualifier: &Qualifier,
        properties: Properties,
    ) -> InjectResult<Scope> {
        let definition = self
            .state
            .definitions
            .read()
            .get(qualifier)
            .cloned()
            .ok_or_else(|| InjectError::UndefinedScope {
                qualifier: qualifier.clone(),
            })?;

        let scope = Scope::with_properties(properties);
        if let Err(error) = definition.define(&scope) {
            warn!(
                "failed to populate scope {:?} ({}): {}",
                scope_id, qualifier, error
            );
            scope.close();
            return Err(error);
        }

        debug!(
            "created scope {:?} ({}) with {} bindings",
            scope_id,
            qualifier,
            scope.len()
        );
        Ok(scope)
    }

    /// Gets a scope that has already been created.
    pub fn get_scope(&self, scope_id: &str) -> InjectResult<Scope> {
        self.state
            .scopes
            .lock()
            .get(scope_id)
            .and_then(|slot| slot.get().cloned())
            .ok_or_else(|| InjectError::ScopeNotFound {
                scope_id: scope_id.to_owned(),
            })
    }

    /// Returns `true` if a scope with the given id has been created.
    #[must_use]
    pub fn contains_scope(&self, scope_id: &str) -> bool {
        self.state
            .scopes
            .lock()
            .get(scope_id)
            .map_or(false, |slot| slot.get().is_some())
    }

    /// Closes every keyed scope and forgets about them. The default scope is
    /// left untouched. A scope still being created while this runs is
    /// returned to its creator but is no longer tracked by the container.
    pub fn close_all(&self) {
        let scopes = std::mem::take(&mut *self.state.scopes.lock());

        let mut closed = 0_usize;
        for slot in scopes.into_values() {
            if let Some(scope) = slot.get() {
                scope.close();
                closed += 1;
            }
        }

        debug!("closed {} scopes", closed);
    }

    /// Resolves the binding for the type qualifier of `T` from the default
    /// scope.
    pub fn resolve<T: Service>(&self) -> InjectResult<Svc<T>> {
        self.state.default_scope.resolve()
    }

    /// Resolves the binding for `qualifier` from the default scope.
    pub fn resolve_qualified<T: Service>(
        &self,
        qualifier: &Qualifier,
    ) -> InjectResult<Svc<T>> {
        self.state.default_scope.resolve_qualified(qualifier)
    }

    /// Creates a lazy handle for the type qualifier of `T` in the default
    /// scope.
    #[must_use]
    pub fn inject<T: Service>(&self) -> Inject<T> {
        self.state.default_scope.inject()
    }

    /// Creates a lazy handle for `qualifier` in the default scope.
    #[must_use]
    pub fn inject_qualified<T: Service>(
        &self,
        qualifier: Qualifier,
    ) -> Inject<T> {
        self.state.default_scope.inject_qualified(qualifier)
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let scopes = self.state.scopes.lock();
        let definitions = self.state.definitions.read();
        f.debug_struct("Container")
            .field("default_scope", &self.state.default_scope)
            .field(
                "scopes",
                &scopes
                    .iter()
                    .filter(|(_, slot)| slot.get().is_some())
                    .map(|(scope_id, _)| scope_id)
                    .collect::<Vec<_>>(),
            )
            .field("definitions", &definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;

    #[test]
    fn undefined_scope_kind_is_an_error() {
        let container = Container::new();
        let result = container.get_or_create_scope(
            "s1",
            &named("missing"),
            Properties::new(),
        );

        match result {
            Err(InjectError::UndefinedScope { qualifier })
                if qualifier == named("missing") => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("the scope kind was never defined"),
        }
        assert!(!container.contains_scope("s1"));
    }

    #[test]
    fn unknown_scope_id_is_an_error() {
        let container = Container::new();
        match container.get_scope("nope") {
            Err(InjectError::ScopeNotFound { scope_id })
                if scope_id == "nope" => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("no scope was created"),
        }
    }

    #[test]
    fn failed_definition_can_be_retried() {
        let container = Container::new();
        container
            .define_scope(named("cat"), |scope: &Scope| -> InjectResult<()> {
                let id: i32 = scope.property("id")?;
                scope.constant(id);
                Ok(())
            })
            .unwrap();

        let result = container.get_or_create_scope(
            "s1",
            &named("cat"),
            Properties::new(),
        );
        assert!(matches!(result, Err(InjectError::MissingProperty { .. })));
        assert!(container.get_scope("s1").is_err());

        let scope = container
            .get_or_create_scope(
                "s1",
                &named("cat"),
                Properties::new().with("id", 3_i32),
            )
            .unwrap();
        assert_eq!(3, *scope.resolve::<i32>().unwrap());
        assert!(Scope::ptr_eq(&scope, &container.get_scope("s1").unwrap()));
    }

    #[test]
    fn failed_creations_leave_no_slots_behind() {
        let container = Container::new();
        container
            .define_scope(named("cat"), |scope: &Scope| -> InjectResult<()> {
                let _: i32 = scope.property("id")?;
                Ok(())
            })
            .unwrap();

        for i in 0..100 {
            let result = container.get_or_create_scope(
                format!("undefined{}", i),
                &named("missing"),
                Properties::new(),
            );
            assert!(matches!(result, Err(InjectError::UndefinedScope { .. })));

            let result = container.get_or_create_scope(
                format!("failing{}", i),
                &named("cat"),
                Properties::new(),
            );
            assert!(matches!(result, Err(InjectError::MissingProperty { .. })));
        }

        assert!(container.state.scopes.lock().is_empty());
        assert!(!format!("{:?}", container).contains("undefined0"));
    }

    #[test]
    fn clones_share_scopes() {
        let container = Container::new();
        let other = container.clone();
        other
            .define_scope(named("empty"), |_: &Scope| -> InjectResult<()> {
                Ok(())
            })
            .unwrap();

        assert!(container.is_scope_defined(&named("empty")));
        assert!(!container.is_scope_defined(&named("other")));
        container
            .get_or_create_scope("s1", &named("empty"), Properties::new())
            .unwrap();
        assert!(other.contains_scope("s1"));
    }
}
