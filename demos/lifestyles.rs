// Binds the same three contracts to debug or release implementations,
// swapped by configuration alone, and shows the three lifestyles at work.

use braid_ioc::{Container, Lifestyle, Params, ServiceKey};
use std::rc::Rc;

trait Logger {
  fn describe(&self) -> String;
}

trait Repository {
  fn fetch(&self) -> String;
}

trait Reporter {
  fn report(&self) -> String;
}

struct DebugLogger;
impl Logger for DebugLogger {
  fn describe(&self) -> String {
    "debug logger".to_string()
  }
}

struct ReleaseLogger;
impl Logger for ReleaseLogger {
  fn describe(&self) -> String {
    "release logger".to_string()
  }
}

struct InMemoryRepository;
impl Repository for InMemoryRepository {
  fn fetch(&self) -> String {
    "in-memory rows".to_string()
  }
}

struct SqlRepository;
impl Repository for SqlRepository {
  fn fetch(&self) -> String {
    "sql rows".to_string()
  }
}

struct CompositeReporter {
  logger: Rc<dyn Logger>,
  repository: Rc<dyn Repository>,
}

impl Reporter for CompositeReporter {
  fn report(&self) -> String {
    format!("{} / {}", self.logger.describe(), self.repository.fetch())
  }
}

fn register_reporter(container: &Container) {
  container.register_trait::<dyn Reporter>(
    Lifestyle::PerRequest,
    Params::new()
      .dependency("logger", ServiceKey::of::<dyn Logger>())
      .dependency("repository", ServiceKey::of::<dyn Repository>()),
    |args| {
      Ok(Rc::new(CompositeReporter {
        logger: args.get("logger")?,
        repository: args.get("repository")?,
      }))
    },
  );
}

fn configure_debug(container: &Container) {
  container.register_trait::<dyn Logger>(Lifestyle::Singleton, Params::new(), |_| {
    Ok(Rc::new(DebugLogger))
  });
  container.register_trait::<dyn Repository>(Lifestyle::Scoped, Params::new(), |_| {
    Ok(Rc::new(InMemoryRepository))
  });
  register_reporter(container);
}

fn configure_release(container: &Container) {
  container.register_trait::<dyn Logger>(Lifestyle::Singleton, Params::new(), |_| {
    Ok(Rc::new(ReleaseLogger))
  });
  container.register_trait::<dyn Repository>(Lifestyle::Scoped, Params::new(), |_| {
    Ok(Rc::new(SqlRepository))
  });
  register_reporter(container);
}

fn main() {
  println!("=== DEBUG CONFIGURATION ===");
  let container = Container::new();
  configure_debug(&container);

  {
    let _scope = container.enter_scope();
    let r1 = container.resolve::<dyn Reporter>().expect("reporter");
    let r2 = container.resolve::<dyn Reporter>().expect("reporter");
    println!("{}", r1.report());
    println!("{}", r2.report());

    // Per-request reporters are distinct; their shared dependencies are not.
    assert!(!Rc::ptr_eq(&r1, &r2));
    let l1 = container.resolve::<dyn Logger>().expect("logger");
    let l2 = container.resolve::<dyn Logger>().expect("logger");
    assert!(Rc::ptr_eq(&l1, &l2));
  }

  println!("\n=== RELEASE CONFIGURATION ===");
  let container = Container::new();
  configure_release(&container);

  {
    let _scope = container.enter_scope();
    let reporter = container.resolve::<dyn Reporter>().expect("reporter");
    println!("{}", reporter.report());
  }

  println!("\n=== FACTORY REGISTRATION ===");
  let container = Container::new();
  container.register_factory::<String>(|| Ok("built by a factory".to_string()));
  println!(
    "{}",
    container.resolve::<String>().expect("factory-built value")
  );
}
