//! Errors surfaced while registering or resolving services.

use crate::key::ServiceKey;
use thiserror::Error;

/// A boxed error produced by a constructor or factory capability.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Failures surfaced to the original `resolve` caller.
///
/// The container never swallows errors from collaborators and never retries:
/// resolution is a deterministic lookup-and-build, so repeating a failed
/// resolution fails identically absent external state changes.
#[derive(Debug, Error)]
pub enum DiError {
  /// `resolve` was called for a key with no registered binding.
  #[error("no binding registered for {key}")]
  NotRegistered { key: ServiceKey },

  /// A constructor or factory capability failed while building an instance.
  /// The original error is preserved as the source.
  #[error("failed to construct {key}")]
  Construction {
    key: ServiceKey,
    #[source]
    source: BoxError,
  },

  /// A key was revisited while its own construction was still in progress.
  #[error("circular dependency detected: {chain}")]
  CircularDependency { chain: String },

  /// A constructor asked for an argument name that was never declared in
  /// its binding's params.
  #[error("constructor argument `{name}` was not declared")]
  MissingArgument { name: String },

  /// A declared argument does not hold the type the constructor asked for.
  #[error("constructor argument `{name}` is not a `{expected}`")]
  ArgumentType { name: String, expected: &'static str },

  /// The instance held for a key does not downcast to the requested type.
  #[error("instance for {key} is not a `{expected}`")]
  InstanceType { key: ServiceKey, expected: &'static str },
}
