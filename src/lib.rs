//! # Braid IoC
//!
//! A small, explicit dependency-injection container for Rust.
//!
//! Braid IoC decouples the declaration of abstract service contracts from
//! the selection of concrete implementations. A [`Container`] records a
//! binding descriptor per contract key — a constructor with named,
//! declaration-ordered parameters, or a zero-argument factory — and manages
//! instance lifetime under three sharing policies.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of bindings plus the caches backing them.
//!   Containers are plain owned values; independently configured containers
//!   coexist, and there is no global instance.
//! - **Lifestyle**: [`Lifestyle::PerRequest`] builds fresh every time,
//!   [`Lifestyle::Scoped`] shares one instance per active scope, and
//!   [`Lifestyle::Singleton`] shares one instance per container.
//! - **Scopes**: [`Container::enter_scope`] swaps in a fresh scoped cache
//!   and restores the enclosing one when the guard drops, on every exit
//!   path. Scopes nest.
//! - **Resolution**: [`Container::resolve`] walks the dependency graph
//!   depth-first, building each declared dependency before the instance
//!   that needs it and consulting the cache its lifestyle dictates.
//!
//! ## Quick Start
//!
//! ```
//! use braid_ioc::{Container, DiError, Lifestyle, Params, ServiceKey};
//! use std::rc::Rc;
//!
//! trait Greeter {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.clone()
//!   }
//! }
//!
//! fn main() -> Result<(), DiError> {
//!   let container = Container::new();
//!
//!   // Register a simple value.
//!   container.register::<String>(Lifestyle::Singleton, Params::new(), |_| {
//!     Ok(String::from("Hello, World!"))
//!   });
//!
//!   // Register a service against a trait, declaring its dependency by key.
//!   container.register_trait::<dyn Greeter>(
//!     Lifestyle::Singleton,
//!     Params::new().dependency("message", ServiceKey::of::<String>()),
//!     |args| {
//!       let message = args.get::<String>("message")?;
//!       Ok(Rc::new(EnglishGreeter {
//!         message: (*message).clone(),
//!       }))
//!     },
//!   );
//!
//!   // Elsewhere, resolve the service by its contract.
//!   let greeter = container.resolve::<dyn Greeter>()?;
//!   assert_eq!(greeter.greet(), "Hello, World!");
//!   Ok(())
//! }
//! ```

mod args;
mod binding;
mod container;
mod error;
mod key;
mod scope;

pub use args::ResolvedArgs;
pub use binding::{Lifestyle, Params};
pub use container::Container;
pub use error::{BoxError, DiError};
pub use key::ServiceKey;
pub use scope::ScopeGuard;
