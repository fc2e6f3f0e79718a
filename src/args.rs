//! The resolved named-argument set handed to constructor capabilities.

use crate::binding::Shared;
use crate::error::DiError;
use std::any::Any;
use std::rc::Rc;

/// Arguments for one constructor invocation, fully resolved by the
/// container: dependency entries hold live instances, literal entries hold
/// the values declared at registration.
pub struct ResolvedArgs {
  values: Vec<(String, Shared)>,
}

impl ResolvedArgs {
  pub(crate) fn new() -> Self {
    Self { values: Vec::new() }
  }

  pub(crate) fn push(&mut self, name: &str, value: Shared) {
    self.values.push((name.to_owned(), value));
  }

  /// Returns the argument `name` as a shared handle to `T`.
  ///
  /// Works for trait-object arguments as well:
  /// `args.get::<dyn Greeter>("greeter")`.
  pub fn get<T: ?Sized + Any>(&self, name: &str) -> Result<Rc<T>, DiError> {
    let shared = self
      .values
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| Rc::clone(v))
      .ok_or_else(|| DiError::MissingArgument {
        name: name.to_owned(),
      })?;

    shared
      .downcast::<Rc<T>>()
      .map(|rc| (*rc).clone())
      .map_err(|_| DiError::ArgumentType {
        name: name.to_owned(),
        expected: std::any::type_name::<T>(),
      })
  }

  /// Returns a clone of the argument `name`, convenient for literals.
  pub fn get_value<T: Any + Clone>(&self, name: &str) -> Result<T, DiError> {
    Ok((*self.get::<T>(name)?).clone())
  }
}
