//! The `Container`: registry, caches, scope stack, and the resolver.

use crate::args::ResolvedArgs;
use crate::binding::{Binding, BuildFn, FactoryFn, Lifestyle, ParamValue, Params, Provider, Shared};
use crate::error::{BoxError, DiError};
use crate::key::ServiceKey;
use crate::scope::ScopeGuard;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// A single-threaded dependency-injection container.
///
/// The container maps contract keys to binding descriptors and manages the
/// lifetime of the instances it builds under three sharing policies
/// ([`Lifestyle`]). All state — registrations, the singleton cache, and the
/// scope stack — lives in the container instance, so independently
/// configured containers coexist freely (one per test case, for example).
///
/// Registration happens during a composition phase; resolutions then run
/// synchronously on the thread that owns the container. Services do not
/// need to be `Send` or `Sync`, and neither is the container.
///
/// Registering a constructor capability inside another binding's constructor
/// is not supported and will panic on the registry's interior borrow.
pub struct Container {
  bindings: RefCell<HashMap<ServiceKey, Binding>>,
  singletons: RefCell<HashMap<ServiceKey, Shared>>,
  // Stack of scoped caches; the last entry backs the active scope.
  scopes: RefCell<Vec<HashMap<ServiceKey, Shared>>>,
  resolving: RefCell<Vec<ServiceKey>>,
}

impl Default for Container {
  fn default() -> Self {
    Self {
      bindings: RefCell::new(HashMap::new()),
      singletons: RefCell::new(HashMap::new()),
      // The implicit outermost scope exists for the container's lifetime.
      scopes: RefCell::new(vec![HashMap::new()]),
      resolving: RefCell::new(Vec::new()),
    }
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn key_for<T: ?Sized + Any>(name: Option<&str>) -> ServiceKey {
    match name {
      Some(n) => ServiceKey::named::<T>(n),
      None => ServiceKey::of::<T>(),
    }
  }

  fn register_internal<T: Any>(
    &self,
    name: Option<&str>,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<T, BoxError> + 'static,
  ) {
    let build: BuildFn = Box::new(move |args| {
      let value = ctor(args)?;
      let shared: Shared = Rc::new(Rc::new(value));
      Ok(shared)
    });
    self.install(
      Self::key_for::<T>(name),
      Binding {
        provider: Provider::Constructor { build, params },
        lifestyle,
      },
    );
  }

  fn register_trait_internal<I: ?Sized + Any>(
    &self,
    name: Option<&str>,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<Rc<I>, BoxError> + 'static,
  ) {
    let build: BuildFn = Box::new(move |args| {
      let value = ctor(args)?;
      let shared: Shared = Rc::new(value);
      Ok(shared)
    });
    self.install(
      Self::key_for::<I>(name),
      Binding {
        provider: Provider::Constructor { build, params },
        lifestyle,
      },
    );
  }

  fn register_instance_internal<T: Any>(&self, name: Option<&str>, instance: T) {
    let stored: Rc<T> = Rc::new(instance);
    let build: BuildFn = Box::new(move |_args| {
      let shared: Shared = Rc::new(Rc::clone(&stored));
      Ok(shared)
    });
    self.install(
      Self::key_for::<T>(name),
      Binding {
        provider: Provider::Constructor {
          build,
          params: Params::new(),
        },
        lifestyle: Lifestyle::Singleton,
      },
    );
  }

  fn register_factory_internal<T: Any>(
    &self,
    name: Option<&str>,
    factory: impl Fn() -> Result<T, BoxError> + 'static,
  ) {
    let produce: FactoryFn = Box::new(move || {
      let value = factory()?;
      let shared: Shared = Rc::new(Rc::new(value));
      Ok(shared)
    });
    // Factories bypass lifecycle caching entirely; the lifestyle is forced.
    self.install(
      Self::key_for::<T>(name),
      Binding {
        provider: Provider::Factory { produce },
        lifestyle: Lifestyle::PerRequest,
      },
    );
  }

  fn install(&self, key: ServiceKey, binding: Binding) {
    debug!(key = %key, lifestyle = %binding.lifestyle, "registered binding");
    // Re-registration replaces the descriptor wholesale and evicts the key
    // from the singleton cache and the active scoped cache, so the next
    // resolution uses the new binding. Caches saved by suspended outer
    // scopes are left alone and surface their old instances again when
    // those scopes resume.
    self.singletons.borrow_mut().remove(&key);
    if let Some(active) = self.scopes.borrow_mut().last_mut() {
      active.remove(&key);
    }
    self.bindings.borrow_mut().insert(key, binding);
  }

  fn resolve_shared(&self, key: &ServiceKey) -> Result<Shared, DiError> {
    let _frame = ResolutionFrame::enter(&self.resolving, key)?;

    let bindings = self.bindings.borrow();
    let binding = bindings.get(key).ok_or_else(|| DiError::NotRegistered {
      key: key.clone(),
    })?;

    match &binding.provider {
      Provider::Factory { produce } => {
        trace!(key = %key, "invoking factory");
        produce().map_err(|source| DiError::Construction {
          key: key.clone(),
          source,
        })
      }
      Provider::Constructor { build, params } => match binding.lifestyle {
        Lifestyle::Singleton => {
          if let Some(hit) = self.singletons.borrow().get(key) {
            trace!(key = %key, "singleton cache hit");
            return Ok(Rc::clone(hit));
          }
          let instance = self.construct(key, build, params)?;
          self
            .singletons
            .borrow_mut()
            .insert(key.clone(), Rc::clone(&instance));
          Ok(instance)
        }
        Lifestyle::Scoped => {
          if let Some(hit) = self.scopes.borrow().last().and_then(|cache| cache.get(key)) {
            trace!(key = %key, "scoped cache hit");
            return Ok(Rc::clone(hit));
          }
          let instance = self.construct(key, build, params)?;
          if let Some(active) = self.scopes.borrow_mut().last_mut() {
            active.insert(key.clone(), Rc::clone(&instance));
          }
          Ok(instance)
        }
        Lifestyle::PerRequest => self.construct(key, build, params),
      },
    }
  }

  // Builds a fresh instance: resolves declared params in declaration order,
  // then invokes the constructor capability. A failure here leaves no cache
  // entry for `key`; dependencies that already succeeded stay cached.
  fn construct(&self, key: &ServiceKey, build: &BuildFn, params: &Params) -> Result<Shared, DiError> {
    trace!(key = %key, "constructing instance");
    let mut args = ResolvedArgs::new();
    for (name, value) in params.entries() {
      match value {
        ParamValue::Dependency(dep) => args.push(name, self.resolve_shared(dep)?),
        ParamValue::Literal(literal) => args.push(name, Rc::clone(literal)),
      }
    }
    build(&args).map_err(|source| DiError::Construction {
      key: key.clone(),
      source,
    })
  }

  // --- PUBLIC API ---

  // --- Constructor Registration ---

  /// Registers a constructor binding for `T` under the unnamed key.
  ///
  /// `params` declares the constructor's named arguments in order; each is
  /// either a dependency on another key, resolved recursively, or a literal
  /// passed through unchanged. The `lifestyle` decides how instances are
  /// shared ([`Lifestyle::default`] is `PerRequest`).
  pub fn register<T: Any>(
    &self,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<T, BoxError> + 'static,
  ) {
    self.register_internal(None, lifestyle, params, ctor);
  }

  /// Registers a constructor binding for `T` under `name`.
  pub fn register_with_name<T: Any>(
    &self,
    name: &str,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<T, BoxError> + 'static,
  ) {
    self.register_internal(Some(name), lifestyle, params, ctor);
  }

  // --- Trait Registration ---

  /// Registers a binding resolved as the trait object `I`.
  ///
  /// The constructor returns the implementation already erased to `Rc<I>`,
  /// so consumers depend only on the contract.
  pub fn register_trait<I: ?Sized + Any>(
    &self,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<Rc<I>, BoxError> + 'static,
  ) {
    self.register_trait_internal(None, lifestyle, params, ctor);
  }

  /// Registers a trait-object binding under `name`.
  pub fn register_trait_with_name<I: ?Sized + Any>(
    &self,
    name: &str,
    lifestyle: Lifestyle,
    params: Params,
    ctor: impl Fn(&ResolvedArgs) -> Result<Rc<I>, BoxError> + 'static,
  ) {
    self.register_trait_internal(Some(name), lifestyle, params, ctor);
  }

  // --- Instance Registration ---

  /// Registers a pre-built instance of `T` as a singleton.
  pub fn register_instance<T: Any>(&self, instance: T) {
    self.register_instance_internal(None, instance);
  }

  /// Registers a pre-built instance of `T` as a singleton under `name`.
  pub fn register_instance_with_name<T: Any>(&self, name: &str, instance: T) {
    self.register_instance_internal(Some(name), instance);
  }

  // --- Factory Registration ---

  /// Registers a zero-argument factory for `T`.
  ///
  /// Factory bindings bypass lifecycle caching: every resolution invokes
  /// the factory and returns a fresh instance. Any previously registered
  /// descriptor for the key is discarded.
  pub fn register_factory<T: Any>(&self, factory: impl Fn() -> Result<T, BoxError> + 'static) {
    self.register_factory_internal(None, factory);
  }

  /// Registers a zero-argument factory for `T` under `name`.
  pub fn register_factory_with_name<T: Any>(
    &self,
    name: &str,
    factory: impl Fn() -> Result<T, BoxError> + 'static,
  ) {
    self.register_factory_internal(Some(name), factory);
  }

  // --- Resolution ---

  /// Resolves the unnamed binding for `T`, building it and any declared
  /// dependencies as needed.
  ///
  /// Fails with [`DiError::NotRegistered`] if no binding exists for the
  /// key; failures from nested dependencies propagate unchanged.
  pub fn resolve<T: ?Sized + Any>(&self) -> Result<Rc<T>, DiError> {
    self.resolve_key(ServiceKey::of::<T>())
  }

  /// Resolves the binding for `T` registered under `name`.
  pub fn resolve_named<T: ?Sized + Any>(&self, name: &str) -> Result<Rc<T>, DiError> {
    self.resolve_key(ServiceKey::named::<T>(name))
  }

  fn resolve_key<T: ?Sized + Any>(&self, key: ServiceKey) -> Result<Rc<T>, DiError> {
    let shared = self.resolve_shared(&key)?;
    shared
      .downcast::<Rc<T>>()
      .map(|rc| (*rc).clone())
      .map_err(|_| DiError::InstanceType {
        key,
        expected: std::any::type_name::<T>(),
      })
  }

  // --- Scopes ---

  /// Enters a new scope, replacing the active scoped cache with a fresh
  /// empty one.
  ///
  /// The enclosing cache is saved and restored when the returned guard
  /// drops — on normal completion and on unwind alike. Scopes nest:
  /// entering while another scope is active saves that scope's cache, and
  /// exiting restores the immediately enclosing one.
  pub fn enter_scope(&self) -> ScopeGuard<'_> {
    let mut scopes = self.scopes.borrow_mut();
    let depth = scopes.len();
    scopes.push(HashMap::new());
    debug!(depth, "scope entered");
    ScopeGuard::new(self, depth)
  }

  pub(crate) fn restore_scope_depth(&self, depth: usize) {
    self.scopes.borrow_mut().truncate(depth);
  }
}

// RAII frame for the resolution-in-progress stack. Entering with a key that
// is already on the stack reports the cycle instead of recursing without
// bound; dropping the frame pops the key on every exit path.
struct ResolutionFrame<'a> {
  stack: &'a RefCell<Vec<ServiceKey>>,
}

impl<'a> ResolutionFrame<'a> {
  fn enter(stack: &'a RefCell<Vec<ServiceKey>>, key: &ServiceKey) -> Result<Self, DiError> {
    let mut in_progress = stack.borrow_mut();
    if in_progress.contains(key) {
      let chain = in_progress
        .iter()
        .map(ToString::to_string)
        .chain(std::iter::once(key.to_string()))
        .collect::<Vec<_>>()
        .join(" -> ");
      return Err(DiError::CircularDependency { chain });
    }
    in_progress.push(key.clone());
    Ok(Self { stack })
  }
}

impl Drop for ResolutionFrame<'_> {
  fn drop(&mut self) {
    self.stack.borrow_mut().pop();
  }
}
