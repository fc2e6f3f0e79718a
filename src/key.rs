//! Contract keys identifying registered services.

use std::any::{Any, TypeId};
use std::fmt;

/// Identifies a service contract within a [`Container`](crate::Container).
///
/// A key is the `TypeId` of the contract type — a concrete type or a trait
/// object such as `dyn Greeter` — plus an optional name, so several bindings
/// of the same type can coexist. Registering a key that is already present
/// overwrites the previous binding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
  type_id: TypeId,
  type_name: &'static str,
  name: Option<String>,
}

impl ServiceKey {
  /// Key for the unnamed binding of `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: None,
    }
  }

  /// Key for the binding of `T` registered under `name`.
  pub fn named<T: ?Sized + Any>(name: &str) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: Some(name.to_owned()),
    }
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}

impl fmt::Display for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "`{}` (named \"{}\")", self.type_name, name),
      None => write!(f, "`{}`", self.type_name),
    }
  }
}
