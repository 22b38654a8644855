//! Runtime dependency injection with scopes.
//!
//! A [`Container`] maps *qualifiers* to providers. A qualifier is either a
//! literal name ([`named`]) or the identity of a type ([`Qualifier::of`]).
//! Bindings live in a [`Scope`], an isolated registry with its own lifecycle.
//! Every container has a default scope which is always available, plus any
//! number of keyed scopes which are created on demand from scope definitions
//! and torn down together by [`Container::close_all`].
//!
//! All services are held in thread-safe [`Svc<T>`] pointers, and every part
//! of the container can be shared between threads.
//!
//! # Service lifetimes
//!
//! Lifetimes of services are controlled by the provider used to produce them.
//! There are three built-in provider types:
//!
//! - **[Single](crate::SingleProvider):** A service is created only the first
//!   time it is requested, then that single instance is reused for each
//!   future request. Concurrent first requests create it only once.
//! - **[Factory](crate::FactoryProvider):** A service is created each time it
//!   is requested.
//! - **[Constant](crate::ConstantProvider):** An instance that already exists
//!   is provided directly. This behaves like a single instance whose producer
//!   has already run.
//!
//! Custom providers can also be created by implementing either the
//! [`TypedProvider`] or [`Provider`] trait.
//!
//! # Scopes
//!
//! A scope kind is declared once with [`Container::define_scope`]. Each
//! instance of that kind is keyed by a caller-chosen [`ScopeId`], for example
//! one scope per session, and receives its own [`Properties`] when it is
//! created. The definition reads those properties to decide what to bind.
//!
//! # Resolution is explicit
//!
//! There is no constructor injection and no dependency graph validation.
//! Services are obtained by an explicit lookup ([`Scope::resolve`]) or by a
//! lazy handle ([`Scope::inject`]). Producers that need other services
//! receive the scope they are resolved from and look them up themselves.
//! Dependency cycles between single instances are not detected and will
//! deadlock.
//!
//! # Trait objects
//!
//! A service behind a trait is bound by producing a `Svc<dyn Trait>`. The
//! binding is keyed by the type qualifier of `Svc<dyn Trait>`, and resolving
//! it yields `Svc<Svc<dyn Trait>>`, which dereferences straight to the trait
//! object. Consumers ask for the trait, so the implementation behind it can
//! be swapped by rebinding a single qualifier. The example below binds
//! `Svc<dyn Speaker>` this way.
//!
//! # Example
//!
//! ```
//! use scoped_injector::{
//!     named, Container, InjectResult, Properties, Scope, Svc,
//! };
//!
//! // Some type that produces messages
//! trait Speaker: Send + Sync {
//!     fn speak(&self) -> String;
//! }
//!
//! struct DefaultSpeaker(Svc<String>);
//! impl Speaker for DefaultSpeaker {
//!     fn speak(&self) -> String {
//!         self.0.to_string()
//!     }
//! }
//!
//! struct CatSpeaker(i32);
//! impl Speaker for CatSpeaker {
//!     fn speak(&self) -> String {
//!         format!("cat {} says meow", self.0)
//!     }
//! }
//!
//! fn main() -> InjectResult<()> {
//!     let container = Container::new();
//!
//!     // Bindings in the default scope are available right away
//!     container.define_default(|scope: &Scope| -> InjectResult<()> {
//!         scope.single(|| String::from("hello"));
//!         scope.single(|scope: &Scope| -> Svc<dyn Speaker> {
//!             let message: Svc<String> = scope.resolve().unwrap();
//!             Svc::new(DefaultSpeaker(message))
//!         });
//!         Ok(())
//!     })?;
//!
//!     // Scope kinds are defined once and instantiated on demand
//!     container.define_scope(named("cat"), |scope: &Scope| -> InjectResult<()> {
//!         let id: i32 = scope.property("id")?;
//!         scope.single(move || -> Svc<dyn Speaker> { Svc::new(CatSpeaker(id)) });
//!         Ok(())
//!     })?;
//!
//!     let speaker: Svc<Svc<dyn Speaker>> = container.resolve()?;
//!     assert_eq!("hello", speaker.speak());
//!
//!     let properties = Properties::new().with("id", 7_i32);
//!     let cat = container.get_or_create_scope("7", &named("cat"), properties)?;
//!     let speaker = cat.inject::<Svc<dyn Speaker>>();
//!     assert_eq!("cat 7 says meow", speaker.get()?.speak());
//!
//!     container.close_all();
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value,
    clippy::needless_doctest_main
)]

mod builder;
mod container;
mod definition;
mod inject;
mod properties;
mod qualifier;
mod scope;
mod services;

pub use builder::*;
pub use container::*;
pub use definition::*;
pub use inject::*;
pub use properties::*;
pub use qualifier::*;
pub use scope::*;
pub use services::*;
