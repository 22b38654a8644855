use crate::Service;
use std::{any::Any, collections::HashMap, fmt::Debug};

/// A value stored in a scope's property bag.
pub trait ScopeProperty: Service + Debug {
    /// Clones this property into a boxed trait object.
    fn clone_dyn(&self) -> Box<dyn ScopeProperty>;

    /// Casts this property into a [`&dyn Any`](Any), making it easier to
    /// downcast into other types.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Service + Debug + Clone> ScopeProperty for T {
    fn clone_dyn(&self) -> Box<dyn ScopeProperty> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn ScopeProperty {
    /// Tries to downcast this property to a concrete type.
    pub fn downcast_ref<T: ScopeProperty>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

impl Clone for Box<dyn ScopeProperty> {
    fn clone(&self) -> Self {
        self.as_ref().clone_dyn()
    }
}

/// Free-form properties used to parameterize the bindings of a scope when it
/// is created. Properties are read by the scope's definition through
/// [`Scope::property`](crate::Scope::property).
///
/// ```
/// use scoped_injector::Properties;
///
/// let properties = Properties::new().with("id", 42_i32).with("name", "tom");
/// assert_eq!(Some(&42), properties.get("id").and_then(|id| id.downcast_ref::<i32>()));
/// assert_eq!(2, properties.len());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Properties {
    values: HashMap<String, Box<dyn ScopeProperty>>,
}

impl Properties {
    /// Creates a new, empty set of properties.
    #[must_use]
    pub fn new() -> Self {
        Properties::default()
    }

    /// Sets a property, returning the previous value if one was set.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl ScopeProperty,
    ) -> Option<Box<dyn ScopeProperty>> {
        self.values.insert(key.into(), Box::new(value))
    }

    /// Sets a property and returns the updated properties.
    #[must_use]
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl ScopeProperty,
    ) -> Self {
        drop(self.insert(key, value));
        self
    }

    /// Gets the value of a property if it has been set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn ScopeProperty> {
        self.values.get(key).map(|value| value.as_ref())
    }

    /// Returns `true` if a property has been set for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Gets the number of properties that have been set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no properties have been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every property.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: ScopeProperty,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            drop(properties.insert(key, value));
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_returns_previous_value() {
        let mut properties = Properties::new();
        assert!(properties.insert("id", 1_i32).is_none());

        let previous = properties.insert("id", 2_i32).unwrap();
        assert_eq!(Some(&1), previous.downcast_ref::<i32>());
        assert_eq!(
            Some(&2),
            properties.get("id").and_then(|id| id.downcast_ref::<i32>())
        );
    }

    #[test]
    fn downcast_to_wrong_type_fails() {
        let properties = Properties::new().with("id", 1_i32);
        let id = properties.get("id").unwrap();
        assert!(id.downcast_ref::<u64>().is_none());
    }

    #[test]
    fn cloned_properties_are_independent() {
        let original = Properties::new().with("id", String::from("a"));
        let mut copy = original.clone();
        copy.clear();

        assert!(copy.is_empty());
        assert!(original.contains_key("id"));
    }

    #[test]
    fn collects_from_pairs() {
        let properties: Properties =
            vec![("a", 1_i32), ("b", 2_i32)].into_iter().collect();
        assert_eq!(2, properties.len());
    }
}
