//! Binding descriptors: how the container builds each registered contract.

use crate::args::ResolvedArgs;
use crate::error::BoxError;
use crate::key::ServiceKey;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased service instance as stored in caches and argument sets.
///
/// The inner `dyn Any` always wraps an `Rc<T>` (which is sized even when `T`
/// is a trait object), so a single downcast path serves both concrete and
/// trait-object contracts.
pub(crate) type Shared = Rc<dyn Any>;

pub(crate) type BuildFn = Box<dyn Fn(&ResolvedArgs) -> Result<Shared, BoxError>>;
pub(crate) type FactoryFn = Box<dyn Fn() -> Result<Shared, BoxError>>;

/// Sharing policy for instances produced under a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifestyle {
  /// A new instance on every resolution; never cached.
  #[default]
  PerRequest,
  /// One instance per active scope, dropped when the scope exits.
  Scoped,
  /// One instance for the container's whole lifetime, created lazily.
  Singleton,
}

impl fmt::Display for Lifestyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Lifestyle::PerRequest => write!(f, "PerRequest"),
      Lifestyle::Scoped => write!(f, "Scoped"),
      Lifestyle::Singleton => write!(f, "Singleton"),
    }
  }
}

// One declared constructor argument: either a reference to another
// registered contract, resolved recursively, or a literal passed through
// unchanged. Tagged explicitly so a literal can never be mistaken for a key.
pub(crate) enum ParamValue {
  Dependency(ServiceKey),
  Literal(Shared),
}

/// Ordered named-argument declarations for a constructor binding.
///
/// Declaration order is preserved and dependencies are resolved in that
/// order, which is observable when building one triggers first-time
/// construction of a shared instance.
#[derive(Default)]
pub struct Params {
  entries: Vec<(String, ParamValue)>,
}

impl Params {
  /// Creates an empty declaration list.
  pub fn new() -> Self {
    Self::default()
  }

  /// Declares `name` as a dependency on `key`, resolved recursively at
  /// construction time.
  pub fn dependency(mut self, name: &str, key: ServiceKey) -> Self {
    self.insert(name, ParamValue::Dependency(key));
    self
  }

  /// Declares `name` as a literal handed to the constructor as-is.
  pub fn literal<V: Any>(mut self, name: &str, value: V) -> Self {
    let shared: Shared = Rc::new(Rc::new(value));
    self.insert(name, ParamValue::Literal(shared));
    self
  }

  // Redeclaring a name replaces its value but keeps its position.
  fn insert(&mut self, name: &str, value: ParamValue) {
    match self.entries.iter_mut().find(|(n, _)| n == name) {
      Some(slot) => slot.1 = value,
      None => self.entries.push((name.to_owned(), value)),
    }
  }

  pub(crate) fn entries(&self) -> &[(String, ParamValue)] {
    &self.entries
  }
}

// Exactly one way to produce an instance per binding: a constructor fed the
// resolved params, or a zero-argument factory that bypasses caching.
pub(crate) enum Provider {
  Constructor { build: BuildFn, params: Params },
  Factory { produce: FactoryFn },
}

pub(crate) struct Binding {
  pub(crate) provider: Provider,
  pub(crate) lifestyle: Lifestyle,
}
