// Demonstrates that independently configured containers coexist: nothing
// registered in one is visible from another.

use braid_ioc::Container;

// By accepting a `&Container`, this function can be exercised with a
// controlled environment, test or production alike.
fn process_data(container: &Container) -> String {
  container.register_instance("test data".to_string());

  let data = container
    .resolve::<String>()
    .expect("data not found in container");
  format!("Processed: {}", data.to_uppercase())
}

fn main() {
  let first = Container::new();
  let second = Container::new();

  let result = process_data(&first);
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // The registration did not leak into the other container.
  assert!(second.resolve::<String>().is_err());

  println!("Verified that each container is isolated.");
}
