//! Class and member resolution
//!
//! The resolvers connect the two halves of the crate: declarations recorded
//! in a [`TagRegistry`] and live bindings held by a container [`Scope`]. A
//! binding matches a declaration when the binding's concrete class is the
//! declared class or one of its subclasses, so a declaration made on a base
//! class is satisfied by any bound subclass.
//!
//! Results follow the container's binding order on the outside and the
//! registry's declaration order on the inside: all matches for one binding
//! appear consecutively, in the order their declarations were registered.
//! Metadata never participates in matching.

use crate::class::ClassInfo;
use crate::registry::{StoredInvoker, TagMetadata, TagRegistry};
use crate::scope::{BindingKind, Scope, ScopeError, ServiceInstance};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved class match: a live instance paired with declaration metadata.
#[derive(Clone)]
pub struct ClassRef {
	/// The live instance resolved from the matching binding.
	pub instance: ServiceInstance,
	/// The concrete class of the binding (a subclass of the declared class).
	pub class: &'static ClassInfo,
	/// Metadata from the matching declaration.
	pub metadata: TagMetadata,
}

impl ClassRef {
	/// The instance, downcast to `T`.
	///
	/// Returns `None` when the bound concrete class is not `T`.
	pub fn instance_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.instance.clone().downcast::<T>().ok()
	}

	/// The declaration metadata, downcast to `M`.
	///
	/// A wrong `M` reads as absent; metadata shapes are never validated.
	pub fn metadata_as<M: 'static>(&self) -> Option<&M> {
		self.metadata.downcast_ref::<M>()
	}
}

impl fmt::Debug for ClassRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassRef")
			.field("class", &self.class.name)
			.finish()
	}
}

/// A resolved member match: a live instance, the member's name and metadata,
/// and the stored callable registered for the member.
#[derive(Clone)]
pub struct MemberRef {
	/// The live instance resolved from the matching binding.
	pub instance: ServiceInstance,
	/// The name the member was declared under.
	pub member_name: &'static str,
	/// Metadata from the matching declaration.
	pub metadata: TagMetadata,
	/// The concrete class of the binding.
	pub class: &'static ClassInfo,
	/// The class the member was declared on (an ancestor of `class` for
	/// inherited members).
	pub declared: &'static ClassInfo,
	pub(crate) invoker: StoredInvoker,
}

impl MemberRef {
	/// The instance, downcast to `T`.
	///
	/// Returns `None` when the bound concrete class is not `T`.
	pub fn instance_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.instance.clone().downcast::<T>().ok()
	}

	/// The declaration metadata, downcast to `M`.
	pub fn metadata_as<M: 'static>(&self) -> Option<&M> {
		self.metadata.downcast_ref::<M>()
	}
}

impl fmt::Debug for MemberRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemberRef")
			.field("class", &self.class.name)
			.field("member_name", &self.member_name)
			.field("declared", &self.declared.name)
			.finish()
	}
}

impl TagRegistry {
	/// Find every live service instance whose class is, or derives from, a
	/// class declared under `tag`.
	///
	/// With `recursive` set, candidates are all bindings visible from `scope`
	/// including ancestor scopes; otherwise only the scope's own bindings.
	/// Non-service bindings are skipped. A tag or scope with no matches
	/// yields an empty vector.
	///
	/// # Errors
	///
	/// Propagates [`ScopeError`] when the container fails to resolve a
	/// matching binding.
	pub fn find_classes(
		&self,
		tag: &str,
		scope: &dyn Scope,
		recursive: bool,
	) -> Result<Vec<ClassRef>, ScopeError> {
		let records = self.class_records(tag);
		let bindings = if recursive {
			scope.all_bindings()
		} else {
			scope.own_bindings()
		};

		let mut result = Vec::new();
		for entry in &bindings {
			let BindingKind::Service { class } = entry.kind else {
				continue;
			};
			for record in &records {
				if class.is_subclass_of(record.class) {
					result.push(ClassRef {
						instance: scope.resolve(&entry.key)?,
						class,
						metadata: record.metadata.clone(),
					});
				}
			}
		}
		tracing::trace!(tag, recursive, matches = result.len(), "resolved tagged classes");
		Ok(result)
	}

	/// Find every member declared under `tag` on a class that is, or is an
	/// ancestor of, the class of a live service binding.
	///
	/// The traversal and matching rule are those of
	/// [`find_classes`](TagRegistry::find_classes); a class with several
	/// matching members yields one result per member, each carrying the same
	/// resolved instance.
	///
	/// # Errors
	///
	/// Propagates [`ScopeError`] when the container fails to resolve a
	/// matching binding.
	pub fn find_members(
		&self,
		tag: &str,
		scope: &dyn Scope,
		recursive: bool,
	) -> Result<Vec<MemberRef>, ScopeError> {
		let records = self.member_records(tag);
		let bindings = if recursive {
			scope.all_bindings()
		} else {
			scope.own_bindings()
		};

		let mut result = Vec::new();
		for entry in &bindings {
			let BindingKind::Service { class } = entry.kind else {
				continue;
			};
			for record in &records {
				if class.is_subclass_of(record.class) {
					result.push(MemberRef {
						instance: scope.resolve(&entry.key)?,
						member_name: record.name,
						metadata: record.metadata.clone(),
						class,
						declared: record.class,
						invoker: record.invoker.clone(),
					});
				}
			}
		}
		tracing::trace!(tag, recursive, matches = result.len(), "resolved tagged members");
		Ok(result)
	}
}

/// [`TagRegistry::find_classes`] against the process-wide registry.
///
/// # Errors
///
/// Propagates [`ScopeError`] from the container.
pub fn find_classes(
	tag: &str,
	scope: &dyn Scope,
	recursive: bool,
) -> Result<Vec<ClassRef>, ScopeError> {
	TagRegistry::global().find_classes(tag, scope, recursive)
}

/// [`TagRegistry::find_members`] against the process-wide registry.
///
/// # Errors
///
/// Propagates [`ScopeError`] from the container.
pub fn find_members(
	tag: &str,
	scope: &dyn Scope,
	recursive: bool,
) -> Result<Vec<MemberRef>, ScopeError> {
	TagRegistry::global().find_members(tag, scope, recursive)
}
