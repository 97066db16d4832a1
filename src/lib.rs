//! # Tagbind
//!
//! Tag-based class and member declaration registry with hierarchical
//! container resolution.
//!
//! Independent modules mark service classes or individual members with a
//! named tag plus arbitrary metadata; later, callers retrieve (or invoke)
//! exactly those marked elements that are actually bound inside a tree of
//! container scopes.
//!
//! ## Overview
//!
//! - **Declarations** are appended to a [`TagRegistry`] at load time, either
//!   explicitly or through the link-time [`REGISTRARS`] slice. The store is
//!   append-only and never validated or deduplicated.
//! - **Resolution** walks a container [`Scope`] (optionally including its
//!   ancestors), matches each live service binding against the declarations
//!   under a tag, and returns instances in the container's binding order. A
//!   binding matches when its concrete class is the declared class or one of
//!   its subclasses, so base-class declarations find bound subclasses.
//! - **Invocation** calls every resolved member with caller-supplied
//!   arguments through the closure captured at registration, collecting the
//!   return values in resolution order, fail-fast.
//!
//! The container itself is an external collaborator, consumed through the
//! narrow [`Scope`] trait; this crate performs no dependency injection of its
//! own.
//!
//! ## Modules
//!
//! - [`class`]: [`ClassInfo`] identity, parent links, the [`ServiceClass`]
//!   trait and the [`service_class!`] declaration macro
//! - [`registry`]: the [`TagRegistry`] store and load-time registration
//! - [`scope`]: the consumed container interface
//! - [`resolve`]: [`find_classes`] / [`find_members`]
//! - [`invoke`]: [`invoke_methods`] and typed member invocation
//!
//! ## Quick Start
//!
//! ```rust
//! use tagbind::{TagRegistry, service_class};
//!
//! struct Exporter;
//!
//! impl Exporter {
//! 	fn flush(&self) -> usize {
//! 		0
//! 	}
//! }
//!
//! service_class!(Exporter);
//!
//! // Performed once where the class is defined, before any resolution.
//! let registry = TagRegistry::new();
//! registry.register_class::<Exporter>("shutdown", ());
//! registry.register_member::<Exporter, (), usize, _>(
//! 	"shutdown-flush",
//! 	"flush",
//! 	(),
//! 	|exporter, _| exporter.flush(),
//! );
//!
//! assert_eq!(registry.class_records("shutdown").len(), 1);
//! ```
//!
//! Resolution runs against any container implementing [`Scope`]:
//!
//! ```rust,ignore
//! let refs = registry.find_classes("shutdown", &scope, true)?;
//! let flushed: Vec<usize> =
//! 	registry.invoke_methods("shutdown-flush", &scope, true, &())?;
//! ```

pub mod class;
pub mod invoke;
pub mod registry;
pub mod resolve;
pub mod scope;

pub use class::{ClassInfo, ParentLink, ParentProjection, ServiceClass, ServiceObj};
pub use invoke::{InvokeError, invoke_methods};
pub use registry::{
	ClassRecord, MemberRecord, REGISTRARS, Registrar, TagMetadata, TagRegistry, register_class,
	register_member,
};
pub use resolve::{ClassRef, MemberRef, find_classes, find_members};
pub use scope::{BindingEntry, BindingKind, Scope, ScopeError, ServiceInstance};

// Re-export once_cell for macro usage
pub use once_cell;
