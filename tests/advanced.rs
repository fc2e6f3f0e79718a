use braid_ioc::{Container, DiError, Lifestyle, Params, ServiceKey};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

// --- Advanced Test Fixtures: the classic three-service graph ---

struct ServiceA;

struct ServiceB {
  a: Rc<ServiceA>,
}

struct ServiceC {
  a: Rc<ServiceA>,
  b: Rc<ServiceB>,
}

fn configure(container: &Container) {
  container.register::<ServiceA>(Lifestyle::Singleton, Params::new(), |_| Ok(ServiceA));
  container.register::<ServiceB>(
    Lifestyle::Scoped,
    Params::new().dependency("a", ServiceKey::of::<ServiceA>()),
    |args| {
      Ok(ServiceB {
        a: args.get("a")?,
      })
    },
  );
  container.register::<ServiceC>(
    Lifestyle::PerRequest,
    Params::new()
      .dependency("a", ServiceKey::of::<ServiceA>())
      .dependency("b", ServiceKey::of::<ServiceB>()),
    |args| {
      Ok(ServiceC {
        a: args.get("a")?,
        b: args.get("b")?,
      })
    },
  );
}

// --- Advanced Tests ---

#[test]
fn graph_shares_singleton_and_scoped_but_not_per_request() {
  // Arrange: A singleton, B scoped depending on A, C per-request on both.
  let container = Container::new();
  configure(&container);

  // Act: resolve C twice inside one scope.
  let scope = container.enter_scope();
  let c1 = container.resolve::<ServiceC>().unwrap();
  let c2 = container.resolve::<ServiceC>().unwrap();

  // Assert: two distinct Cs referencing the same A and the same B.
  assert!(!Rc::ptr_eq(&c1, &c2));
  assert!(Rc::ptr_eq(&c1.a, &c2.a));
  assert!(Rc::ptr_eq(&c1.b, &c2.b));
  assert!(Rc::ptr_eq(&c1.b.a, &c1.a));

  // Act: a new scope yields a new B over the same underlying A.
  drop(scope);
  let _scope = container.enter_scope();
  let b = container.resolve::<ServiceB>().unwrap();

  assert!(!Rc::ptr_eq(&b, &c1.b));
  assert!(Rc::ptr_eq(&b.a, &c1.a));
}

#[test]
fn params_resolve_in_declaration_order() {
  struct First;
  struct Second;
  struct Holder {
    _first: Rc<First>,
    _second: Rc<Second>,
  }

  // Arrange: record the order in which the dependency constructors run.
  let container = Container::new();
  let order = Rc::new(RefCell::new(Vec::new()));

  let probe = Rc::clone(&order);
  container.register::<First>(Lifestyle::PerRequest, Params::new(), move |_| {
    probe.borrow_mut().push("first");
    Ok(First)
  });
  let probe = Rc::clone(&order);
  container.register::<Second>(Lifestyle::PerRequest, Params::new(), move |_| {
    probe.borrow_mut().push("second");
    Ok(Second)
  });
  container.register::<Holder>(
    Lifestyle::PerRequest,
    Params::new()
      .dependency("first", ServiceKey::of::<First>())
      .dependency("second", ServiceKey::of::<Second>()),
    |args| {
      Ok(Holder {
        _first: args.get("first")?,
        _second: args.get("second")?,
      })
    },
  );

  // Act
  container.resolve::<Holder>().unwrap();

  // Assert
  assert_eq!(*order.borrow(), ["first", "second"]);
}

#[test]
fn literal_params_pass_through_unchanged() {
  struct Configured {
    retries: u32,
    label: String,
  }

  let container = Container::new();
  container.register::<Configured>(
    Lifestyle::PerRequest,
    Params::new()
      .literal("retries", 3u32)
      .literal("label", String::from("primary")),
    |args| {
      Ok(Configured {
        retries: args.get_value::<u32>("retries")?,
        label: args.get_value::<String>("label")?,
      })
    },
  );

  let configured = container.resolve::<Configured>().unwrap();
  assert_eq!(configured.retries, 3);
  assert_eq!(configured.label, "primary");
}

#[test]
fn circular_dependencies_are_reported_not_recursed() {
  #[derive(Debug)]
  struct Chicken;
  struct Egg;

  // Arrange: Chicken -> Egg -> Chicken.
  let container = Container::new();
  container.register::<Chicken>(
    Lifestyle::PerRequest,
    Params::new().dependency("egg", ServiceKey::of::<Egg>()),
    |_| Ok(Chicken),
  );
  container.register::<Egg>(
    Lifestyle::PerRequest,
    Params::new().dependency("chicken", ServiceKey::of::<Chicken>()),
    |_| Ok(Egg),
  );

  // Act
  let err = container.resolve::<Chicken>().unwrap_err();

  // Assert: a clean error carrying the chain, not a stack overflow.
  assert!(matches!(err, DiError::CircularDependency { .. }));
  assert!(err.to_string().contains("Chicken"));
  assert!(err.to_string().contains("Egg"));

  // The in-progress stack unwound: an acyclic sibling still resolves.
  struct Standalone;
  container.register::<Standalone>(Lifestyle::PerRequest, Params::new(), |_| Ok(Standalone));
  assert!(container.resolve::<Standalone>().is_ok());
}

#[test]
fn construction_failures_propagate_and_leave_dependency_caches_intact() {
  #[derive(Debug)]
  struct Root;
  #[derive(Debug)]
  struct Faulty {
    _root: Rc<Root>,
  }

  // Arrange: Root succeeds and is cached; Faulty always fails to build.
  let container = Container::new();
  let built = Rc::new(Cell::new(0u32));
  let probe = Rc::clone(&built);
  container.register::<Root>(Lifestyle::Singleton, Params::new(), move |_| {
    probe.set(probe.get() + 1);
    Ok(Root)
  });
  container.register::<Faulty>(
    Lifestyle::Singleton,
    Params::new().dependency("root", ServiceKey::of::<Root>()),
    |_| Err("refusing to start".into()),
  );

  // Act
  let err = container.resolve::<Faulty>().unwrap_err();

  // Assert: the failure surfaces with the original error as its source.
  assert!(matches!(err, DiError::Construction { .. }));
  assert!(err.to_string().contains("Faulty"));
  assert_eq!(err.source().unwrap().to_string(), "refusing to start");

  // The dependency built before the failure stays cached; the failed key
  // was never cached, so a retry re-runs only the failing constructor.
  let root = container.resolve::<Root>().unwrap();
  assert_eq!(built.get(), 1);
  assert!(container.resolve::<Faulty>().is_err());
  assert_eq!(built.get(), 1);
  let root_again = container.resolve::<Root>().unwrap();
  assert!(Rc::ptr_eq(&root, &root_again));
}

#[test]
fn mismatched_argument_types_fail_construction() {
  #[derive(Debug)]
  struct Holder;

  let container = Container::new();
  container.register::<String>(Lifestyle::PerRequest, Params::new(), |_| {
    Ok(String::from("dep"))
  });
  container.register::<Holder>(
    Lifestyle::PerRequest,
    Params::new().dependency("dep", ServiceKey::of::<String>()),
    |args| {
      // The binding declared a String; asking for a u32 is a bug.
      let _wrong = args.get::<u32>("dep")?;
      Ok(Holder)
    },
  );

  let err = container.resolve::<Holder>().unwrap_err();

  assert!(matches!(err, DiError::Construction { .. }));
  assert!(err.source().unwrap().to_string().contains("dep"));
}

#[test]
fn re_registration_replaces_the_binding_and_evicts_caches() {
  struct Versioned {
    version: u32,
  }

  // Arrange: resolve once under the first binding so the cache is warm.
  let container = Container::new();
  container.register::<Versioned>(Lifestyle::Singleton, Params::new(), |_| {
    Ok(Versioned { version: 1 })
  });
  let first = container.resolve::<Versioned>().unwrap();
  assert_eq!(first.version, 1);

  // Act: overwrite the binding for the same key.
  container.register::<Versioned>(Lifestyle::Singleton, Params::new(), |_| {
    Ok(Versioned { version: 2 })
  });
  let second = container.resolve::<Versioned>().unwrap();

  // Assert: the new descriptor is used and the old cached instance is not
  // reused for it.
  assert_eq!(second.version, 2);
  assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn factory_registration_discards_prior_lifestyle() {
  struct Widget;

  // Arrange: a cached singleton binding for the key.
  let container = Container::new();
  container.register::<Widget>(Lifestyle::Singleton, Params::new(), |_| Ok(Widget));
  let cached = container.resolve::<Widget>().unwrap();

  // Act: re-register the key as a factory.
  container.register_factory::<Widget>(|| Ok(Widget));
  let r1 = container.resolve::<Widget>().unwrap();
  let r2 = container.resolve::<Widget>().unwrap();

  // Assert: the singleton cache no longer answers for the key, and the
  // factory produces a fresh instance per call.
  assert!(!Rc::ptr_eq(&cached, &r1));
  assert!(!Rc::ptr_eq(&r1, &r2));
}

#[test]
fn containers_are_isolated_from_each_other() {
  let first = Container::new();
  let second = Container::new();

  first.register_instance(String::from("only in the first container"));

  assert_eq!(
    *first.resolve::<String>().unwrap(),
    "only in the first container"
  );
  assert!(second.resolve::<String>().is_err());
}

#[test]
fn singleton_depending_on_per_request_keeps_its_original_dependency() {
  // A singleton resolves its per-request dependencies once, at the moment
  // of its own creation.
  struct Stamp {
    id: u32,
  }
  struct HolderOfStamp {
    stamp: Rc<Stamp>,
  }

  let container = Container::new();
  let counter = Rc::new(Cell::new(0u32));
  let probe = Rc::clone(&counter);
  container.register::<Stamp>(Lifestyle::PerRequest, Params::new(), move |_| {
    let id = probe.get();
    probe.set(id + 1);
    Ok(Stamp { id })
  });
  container.register::<HolderOfStamp>(
    Lifestyle::Singleton,
    Params::new().dependency("stamp", ServiceKey::of::<Stamp>()),
    |args| {
      Ok(HolderOfStamp {
        stamp: args.get("stamp")?,
      })
    },
  );

  let h1 = container.resolve::<HolderOfStamp>().unwrap();
  let h2 = container.resolve::<HolderOfStamp>().unwrap();
  let standalone = container.resolve::<Stamp>().unwrap();

  assert!(Rc::ptr_eq(&h1, &h2));
  assert!(Rc::ptr_eq(&h1.stamp, &h2.stamp));
  assert_eq!(h1.stamp.id, 0);
  assert_eq!(standalone.id, 1);
}
