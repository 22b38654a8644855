use crate::{
    definition::{insert_definition, DefinitionMap},
    Container, InjectResult, Qualifier, ScopeDefinition, Svc,
};

/// A builder for a [`Container`]. This collects the default bindings and the
/// scope definitions of an application before the container exists.
///
/// ```
/// use scoped_injector::{named, Container, InjectResult, Properties, Scope};
///
/// let mut builder = Container::builder();
/// builder.define_default(|scope: &Scope| -> InjectResult<()> {
///     scope.constant(String::from("global"));
///     Ok(())
/// });
/// builder
///     .define_scope(named("session"), |scope: &Scope| -> InjectResult<()> {
///         let user: String = scope.property("user")?;
///         scope.constant(user);
///         Ok(())
///     })
///     .unwrap();
///
/// let container = builder.build().unwrap();
/// let properties = Properties::new().with("user", String::from("alice"));
/// let session = container
///     .get_or_create_scope("a", &named("session"), properties)
///     .unwrap();
///
/// assert_eq!("global", container.resolve::<String>().unwrap().as_str());
/// assert_eq!("alice", session.resolve::<String>().unwrap().as_str());
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    defaults: Vec<Box<dyn ScopeDefinition>>,
    definitions: DefinitionMap,
}

impl ContainerBuilder {
    /// Adds bindings to the default scope. These run in order when the
    /// container is built.
    pub fn define_default<D: ScopeDefinition>(&mut self, definition: D) {
        self.defaults.push(Box::new(definition));
    }

    /// Registers the definition for a scope kind. Fails if the kind has
    /// already been defined.
    pub fn define_scope<D: ScopeDefinition>(
        &mut self,
        qualifier: Qualifier,
        definition: D,
    ) -> InjectResult<()> {
        let definition = Svc::new(definition);
        insert_definition(&mut self.definitions, qualifier, definition)
    }

    /// Builds the container, populating its default scope. Fails with the
    /// first error returned by a default definition.
    pub fn build(self) -> InjectResult<Container> {
        let container = Container::from_definitions(self.definitions);
        for definition in self.defaults {
            definition.define(container.default_scope())?;
        }

        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use crate::{named, Container, InjectError, InjectResult, Scope};

    #[test]
    fn defaults_run_in_order() {
        let mut builder = Container::builder();
        builder.define_default(|scope: &Scope| -> InjectResult<()> {
            scope.constant(1_i32);
            Ok(())
        });
        builder.define_default(|scope: &Scope| -> InjectResult<()> {
            scope.constant(2_i32);
            Ok(())
        });

        let container = builder.build().unwrap();
        assert_eq!(2, *container.resolve::<i32>().unwrap());
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        let mut builder = Container::builder();
        let empty = |_: &Scope| -> InjectResult<()> { Ok(()) };
        builder.define_scope(named("cat"), empty).unwrap();

        assert!(matches!(
            builder.define_scope(named("cat"), empty),
            Err(InjectError::DuplicateScopeDefinition { .. })
        ));

        let container = builder.build().unwrap();
        assert!(matches!(
            container.define_scope(named("cat"), empty),
            Err(InjectError::DuplicateScopeDefinition { .. })
        ));
    }

    #[test]
    fn failing_default_definition_fails_build() {
        let mut builder = Container::builder();
        builder.define_default(|scope: &Scope| -> InjectResult<()> {
            let _: i32 = scope.property("missing")?;
            Ok(())
        });

        assert!(matches!(
            builder.build(),
            Err(InjectError::MissingProperty { .. })
        ));
    }
}
