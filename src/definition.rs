use crate::{InjectError, InjectResult, Qualifier, Scope, Svc};
use log::debug;
use std::collections::{hash_map::Entry, HashMap};

pub(crate) type DefinitionMap = HashMap<Qualifier, Svc<dyn ScopeDefinition>>;

/// A reusable template which populates a fresh scope's bindings, usually
/// based on the properties that scope was created with. This is automatically
/// implemented for all closures and functions taking a [`&Scope`](Scope) and
/// returning an [`InjectResult<()>`].
///
/// ```
/// use scoped_injector::{InjectResult, Properties, Scope, ScopeDefinition, Svc};
///
/// fn cat(scope: &Scope) -> InjectResult<()> {
///     let id: i32 = scope.property("id")?;
///     scope.single(move || id);
///     Ok(())
/// }
///
/// let scope = Scope::with_properties(Properties::new().with("id", 42_i32));
/// cat.define(&scope).unwrap();
///
/// let id: Svc<i32> = scope.resolve().unwrap();
/// assert_eq!(42, *id);
/// ```
pub trait ScopeDefinition: Send + Sync + 'static {
    /// Registers this definition's bindings in `scope`.
    fn define(&self, scope: &Scope) -> InjectResult<()>;
}

impl<F> ScopeDefinition for F
where
    F: Fn(&Scope) -> InjectResult<()> + Send + Sync + 'static,
{
    fn define(&self, scope: &Scope) -> InjectResult<()> {
        self(scope)
    }
}

/// Adds a definition for a scope kind. Each kind may only be defined once.
pub(crate) fn insert_definition(
    definitions: &mut DefinitionMap,
    qualifier: Qualifier,
    definition: Svc<dyn ScopeDefinition>,
) -> InjectResult<()> {
    match definitions.entry(qualifier) {
        Entry::Occupied(entry) => Err(InjectError::DuplicateScopeDefinition {
            qualifier: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            debug!("defined scope {}", entry.key());
            entry.insert(definition);
            Ok(())
        }
    }
}
