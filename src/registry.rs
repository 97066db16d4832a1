//! Tag declaration store
//!
//! The registry is the process-wide table behind the annotation surface:
//! every class or member declared under a tag is appended here at load time,
//! and the resolvers read it back when they walk a container scope.
//!
//! The store is append-only for its whole lifetime. Duplicate declarations
//! are kept verbatim, lookups of unknown tags read as empty, and nothing is
//! ever removed. Isolated [`TagRegistry`] instances can be constructed for
//! tests; production code normally goes through [`TagRegistry::global`],
//! which is populated exactly once from the [`REGISTRARS`] slice.
//!
//! # Examples
//!
//! ```rust
//! use tagbind::{TagRegistry, service_class};
//!
//! struct Mailer;
//! service_class!(Mailer);
//!
//! let registry = TagRegistry::new();
//! registry.register_class::<Mailer>("startup", ());
//!
//! assert_eq!(registry.class_records("startup").len(), 1);
//! assert!(registry.class_records("shutdown").is_empty());
//! ```

use crate::class::{ClassInfo, ServiceClass, ServiceObj};
use linkme::distributed_slice;
use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Opaque metadata attached to a declaration.
///
/// Metadata is stored as given and never inspected or validated; typed access
/// goes through `metadata_as` on the resolution results.
pub type TagMetadata = Arc<dyn Any + Send + Sync>;

/// Stored member closure, type-erased until invocation.
pub(crate) type StoredInvoker = Arc<dyn Any + Send + Sync>;

/// Typed member closure behind [`StoredInvoker`].
///
/// The inner closure downcasts the (already ancestor-projected) instance view
/// to the declaring class and calls the registered method.
pub(crate) struct MemberInvoker<A, R>(
	pub(crate) Box<dyn Fn(&ServiceObj, &A) -> Option<R> + Send + Sync>,
);

/// A class declared under a tag.
#[derive(Clone)]
pub struct ClassRecord {
	/// The declared class.
	pub class: &'static ClassInfo,
	/// Metadata passed at registration.
	pub metadata: TagMetadata,
}

impl fmt::Debug for ClassRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassRecord")
			.field("class", &self.class.name)
			.finish()
	}
}

/// A class member declared under a tag.
#[derive(Clone)]
pub struct MemberRecord {
	/// The class the member was declared on.
	///
	/// For an inherited, non-overridden member this is an ancestor class, not
	/// the most-derived class a container may have bound.
	pub class: &'static ClassInfo,
	/// The member's name.
	pub name: &'static str,
	/// Metadata passed at registration.
	pub metadata: TagMetadata,
	pub(crate) invoker: StoredInvoker,
}

impl fmt::Debug for MemberRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemberRecord")
			.field("class", &self.class.name)
			.field("name", &self.name)
			.finish()
	}
}

/// Load-time registration hook for the process-wide registry.
pub type Registrar = fn(&TagRegistry);

/// Declarations collected at link time.
///
/// Service definers attach a registrar next to each declaration; every entry
/// runs exactly once, before [`TagRegistry::global`] returns for the first
/// time, so the store is fully populated before any resolution can observe it.
///
/// # Examples
///
/// ```rust
/// use linkme::distributed_slice;
/// use tagbind::{REGISTRARS, Registrar, TagRegistry, service_class};
///
/// struct CacheWarmer;
/// service_class!(CacheWarmer);
///
/// #[distributed_slice(REGISTRARS)]
/// static REGISTER_CACHE_WARMER: Registrar = |registry| {
///     registry.register_class::<CacheWarmer>("warmup", ());
/// };
/// ```
#[distributed_slice]
pub static REGISTRARS: [Registrar];

static GLOBAL: Lazy<TagRegistry> = Lazy::new(|| {
	let registry = TagRegistry::new();
	for registrar in REGISTRARS {
		registrar(&registry);
	}
	tracing::debug!(
		registrars = REGISTRARS.len(),
		"process-wide tag registry populated"
	);
	registry
});

/// Append-only store of tagged class and member declarations.
///
/// Tags are an open namespace: any string is a valid tag, and records under
/// one tag are kept in registration order.
#[derive(Default)]
pub struct TagRegistry {
	classes: RwLock<HashMap<String, Vec<ClassRecord>>>,
	members: RwLock<HashMap<String, Vec<MemberRecord>>>,
}

impl TagRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry, populated from [`REGISTRARS`] on first use.
	pub fn global() -> &'static TagRegistry {
		&GLOBAL
	}

	/// Record class `T` under `tag`.
	///
	/// Repeated registration of the same class under the same tag appends a
	/// duplicate record; downstream resolution reports the duplicate too.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbind::{TagRegistry, service_class};
	///
	/// struct Worker;
	/// service_class!(Worker);
	///
	/// let registry = TagRegistry::new();
	/// registry.register_class::<Worker>("jobs", "high-priority");
	/// registry.register_class::<Worker>("jobs", "low-priority");
	///
	/// assert_eq!(registry.class_records("jobs").len(), 2);
	/// ```
	pub fn register_class<T>(&self, tag: impl Into<String>, metadata: impl Any + Send + Sync)
	where
		T: ServiceClass,
	{
		let mut classes = self.classes.write().unwrap_or_else(PoisonError::into_inner);
		classes.entry(tag.into()).or_default().push(ClassRecord {
			class: T::class(),
			metadata: Arc::new(metadata),
		});
	}

	/// Record member `name` of class `T` under `tag`.
	///
	/// `method` is captured at registration and invoked later through
	/// [`MemberRef::invoke`](crate::MemberRef::invoke) with the argument and
	/// return types fixed here; there is no name-based dispatch at call time.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagbind::{TagRegistry, service_class};
	///
	/// struct Reporter;
	///
	/// impl Reporter {
	/// 	fn summary(&self) -> String {
	/// 		"ok".to_string()
	/// 	}
	/// }
	///
	/// service_class!(Reporter);
	///
	/// let registry = TagRegistry::new();
	/// registry.register_member::<Reporter, (), String, _>(
	/// 	"health",
	/// 	"summary",
	/// 	(),
	/// 	|reporter, _| reporter.summary(),
	/// );
	///
	/// assert_eq!(registry.member_records("health").len(), 1);
	/// ```
	pub fn register_member<T, A, R, F>(
		&self,
		tag: impl Into<String>,
		name: &'static str,
		metadata: impl Any + Send + Sync,
		method: F,
	) where
		T: ServiceClass,
		A: 'static,
		R: 'static,
		F: Fn(&T, &A) -> R + Send + Sync + 'static,
	{
		let invoker = MemberInvoker::<A, R>(Box::new(move |instance, args| {
			instance.downcast_ref::<T>().map(|this| method(this, args))
		}));
		let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
		members.entry(tag.into()).or_default().push(MemberRecord {
			class: T::class(),
			name,
			metadata: Arc::new(metadata),
			invoker: Arc::new(invoker),
		});
	}

	/// All class declarations under `tag`, in registration order.
	///
	/// A tag that was never registered reads as empty, never as an error.
	pub fn class_records(&self, tag: &str) -> Vec<ClassRecord> {
		let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
		classes.get(tag).cloned().unwrap_or_default()
	}

	/// All member declarations under `tag`, in registration order.
	///
	/// A tag that was never registered reads as empty, never as an error.
	pub fn member_records(&self, tag: &str) -> Vec<MemberRecord> {
		let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
		members.get(tag).cloned().unwrap_or_default()
	}
}

/// Record a class under `tag` in the process-wide registry.
pub fn register_class<T>(tag: impl Into<String>, metadata: impl Any + Send + Sync)
where
	T: ServiceClass,
{
	TagRegistry::global().register_class::<T>(tag, metadata);
}

/// Record a class member under `tag` in the process-wide registry.
pub fn register_member<T, A, R, F>(
	tag: impl Into<String>,
	name: &'static str,
	metadata: impl Any + Send + Sync,
	method: F,
) where
	T: ServiceClass,
	A: 'static,
	R: 'static,
	F: Fn(&T, &A) -> R + Send + Sync + 'static,
{
	TagRegistry::global().register_member::<T, A, R, F>(tag, name, metadata, method);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::service_class;
	use rstest::rstest;

	struct AlphaService;
	struct BetaService;

	impl BetaService {
		fn ping(&self) -> &'static str {
			"beta"
		}
	}

	service_class!(AlphaService);
	service_class!(BetaService);

	struct ProbeService;
	service_class!(ProbeService);

	#[distributed_slice(REGISTRARS)]
	static REGISTER_PROBE: Registrar = |registry| {
		registry.register_class::<ProbeService>("registrar-probe", ());
		registry.register_member::<ProbeService, (), &'static str, _>(
			"registrar-probe",
			"identify",
			(),
			|_, _| "probe",
		);
	};

	#[rstest]
	fn unknown_tag_reads_empty() {
		let registry = TagRegistry::new();

		assert!(registry.class_records("missing").is_empty());
		assert!(registry.member_records("missing").is_empty());
	}

	#[rstest]
	fn class_records_preserve_registration_order() {
		let registry = TagRegistry::new();
		registry.register_class::<AlphaService>("ordered", ());
		registry.register_class::<BetaService>("ordered", ());

		let records = registry.class_records("ordered");
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].class.name, "AlphaService");
		assert_eq!(records[1].class.name, "BetaService");
	}

	#[rstest]
	fn duplicate_registrations_are_kept() {
		let registry = TagRegistry::new();
		registry.register_class::<AlphaService>("dup", ());
		registry.register_class::<AlphaService>("dup", ());

		assert_eq!(registry.class_records("dup").len(), 2);
	}

	#[rstest]
	fn tags_are_independent() {
		let registry = TagRegistry::new();
		registry.register_class::<AlphaService>("first", ());
		registry.register_class::<BetaService>("second", ());

		assert_eq!(registry.class_records("first").len(), 1);
		assert_eq!(registry.class_records("second").len(), 1);
		assert_eq!(registry.class_records("first")[0].class.name, "AlphaService");
	}

	#[rstest]
	fn member_records_carry_name_and_declaring_class() {
		let registry = TagRegistry::new();
		registry.register_member::<BetaService, (), &'static str, _>(
			"pings",
			"ping",
			(),
			|service, _| service.ping(),
		);

		let records = registry.member_records("pings");
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].name, "ping");
		assert_eq!(records[0].class.name, "BetaService");
	}

	#[rstest]
	fn isolated_registries_do_not_share_state() {
		let first = TagRegistry::new();
		let second = TagRegistry::new();
		first.register_class::<AlphaService>("solo", ());

		assert_eq!(first.class_records("solo").len(), 1);
		assert!(second.class_records("solo").is_empty());
	}

	#[rstest]
	fn global_registry_runs_linked_registrars() {
		let records = TagRegistry::global().class_records("registrar-probe");
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].class.name, "ProbeService");

		let members = TagRegistry::global().member_records("registrar-probe");
		assert_eq!(members.len(), 1);
		assert_eq!(members[0].name, "identify");
	}
}
