//! Scoped-lifestyle brackets with guaranteed cache restore.

use crate::container::Container;
use tracing::debug;

/// Handle for an active scope, returned by [`Container::enter_scope`].
///
/// While the guard is alive, `Scoped` resolutions populate a fresh cache.
/// Dropping the guard restores the enclosing scope's cache; this happens on
/// every exit path, including unwinding out of the scope's body.
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard<'c> {
  container: &'c Container,
  depth: usize,
}

impl<'c> ScopeGuard<'c> {
  pub(crate) fn new(container: &'c Container, depth: usize) -> Self {
    Self { container, depth }
  }
}

impl Drop for ScopeGuard<'_> {
  fn drop(&mut self) {
    // Truncate rather than pop: a guard dropped after an inner guard was
    // leaked still discards every cache the inner scopes left behind.
    self.container.restore_scope_depth(self.depth);
    debug!(depth = self.depth, "scope exited");
  }
}
