//! Container scope interface
//!
//! The dependency container itself lives outside this crate; resolution only
//! needs the narrow view modeled here. A [`Scope`] is one node in a tree of
//! containers: it can enumerate its bindings (own, or visible including
//! ancestors) and resolve a binding key to a live instance.
//!
//! Enumeration order is the container's own and is passed through unmodified
//! by the resolvers: a scope's own bindings come in declaration order, and the
//! visible set walks child-first toward the root with each key appearing once,
//! shadowing resolved by whatever rule the container defines.

use crate::class::{ClassInfo, ServiceObj};
use std::sync::Arc;
use thiserror::Error;

/// Live instance handed back by a container.
pub type ServiceInstance = Arc<ServiceObj>;

/// Errors surfaced by an external container while resolving a binding.
#[derive(Debug, Error)]
pub enum ScopeError {
	/// The key is not bound in the scope or any of its ancestors.
	#[error("no binding registered for key `{0}`")]
	MissingBinding(String),

	/// The container failed to produce an instance for a bound key.
	#[error("binding `{key}` failed to resolve: {reason}")]
	Resolution { key: String, reason: String },
}

/// Kind of a binding held by a scope.
#[derive(Clone, Copy, Debug)]
pub enum BindingKind {
	/// Backed by a class and resolvable to a live service instance.
	Service {
		/// The concrete class the container instantiates for this binding.
		class: &'static ClassInfo,
	},
	/// Any other binding kind; skipped by resolution.
	Constant,
}

/// What a scope reports about one of its bindings.
#[derive(Clone, Debug)]
pub struct BindingEntry {
	/// The binding key, unique within its owning scope.
	pub key: String,
	/// The binding kind.
	pub kind: BindingKind,
}

impl BindingEntry {
	/// Entry for a service binding of `class`.
	pub fn service(key: impl Into<String>, class: &'static ClassInfo) -> Self {
		Self {
			key: key.into(),
			kind: BindingKind::Service { class },
		}
	}

	/// Entry for a non-service binding.
	pub fn constant(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			kind: BindingKind::Constant,
		}
	}
}

/// A node in a hierarchical dependency container, as seen by the resolvers.
///
/// Implemented by the external container. Resolution is read-only from the
/// scope's point of view, though [`Scope::resolve`] may trigger lazy
/// instantiation inside the container.
pub trait Scope {
	/// Resolve `key` to its live instance.
	///
	/// The resolvers only pass keys the scope itself enumerated; a failure
	/// here means the container is inconsistent and is propagated verbatim.
	///
	/// # Errors
	///
	/// Returns [`ScopeError`] when the key is unbound or the container cannot
	/// produce the instance.
	fn resolve(&self, key: &str) -> Result<ServiceInstance, ScopeError>;

	/// Bindings declared directly in this scope, in declaration order.
	fn own_bindings(&self) -> Vec<BindingEntry>;

	/// Bindings visible from this scope, walking up to the root.
	///
	/// Child entries precede ancestor entries; a key shadowed by a descendant
	/// appears once, for the binding the container would actually resolve.
	fn all_bindings(&self) -> Vec<BindingEntry>;
}
