//! Class identity and hierarchy
//!
//! Service classes are identified nominally: every service type exposes a
//! single `&'static ClassInfo` describing its name and (optionally) its direct
//! parent class. Subtype checks walk the explicit parent chain instead of
//! relying on any runtime type machinery, so a class bound in a container can
//! satisfy a declaration made on one of its ancestors.
//!
//! The [`service_class!`] macro generates the [`ServiceClass`] impl for a
//! type, with or without a parent link.

use std::any::Any;
use std::fmt;

/// Type-erased view of a service instance.
pub type ServiceObj = dyn Any + Send + Sync;

/// Views an instance of a class as its direct parent class.
///
/// Returns `None` when the instance is not actually of the child class; the
/// resolvers only ever call a projection with the class it was declared for.
pub type ParentProjection = for<'a> fn(&'a ServiceObj) -> Option<&'a ServiceObj>;

/// Link from a class to its direct parent class.
#[derive(Clone, Copy)]
pub struct ParentLink {
	/// The parent class identity.
	pub class: &'static ClassInfo,
	/// Projection exposing the parent-class view of a child instance.
	pub project: ParentProjection,
}

/// Nominal identity of a service class.
///
/// Two classes are the same class exactly when they are the same `&'static
/// ClassInfo`; equality is pointer identity, never structural. Each service
/// type owns one `ClassInfo`, reachable through [`ServiceClass::class`].
///
/// # Examples
///
/// ```rust
/// use tagbind::{ServiceClass, service_class};
///
/// struct Engine;
/// struct TurboEngine {
/// 	base: Engine,
/// }
///
/// service_class!(Engine);
/// service_class!(TurboEngine: Engine, |this: &TurboEngine| &this.base);
///
/// assert!(TurboEngine::class().is_subclass_of(Engine::class()));
/// assert!(!Engine::class().is_subclass_of(TurboEngine::class()));
/// ```
pub struct ClassInfo {
	/// The class name, for diagnostics and container binding keys.
	pub name: &'static str,
	/// The direct parent class, if any.
	pub parent: Option<ParentLink>,
}

impl ClassInfo {
	/// Create a new class identity.
	pub const fn new(name: &'static str, parent: Option<ParentLink>) -> Self {
		Self { name, parent }
	}

	/// Whether `self` and `other` are the same class.
	pub fn is(&self, other: &ClassInfo) -> bool {
		std::ptr::eq(self, other)
	}

	/// Whether `self` is `ancestor` itself or a transitive subclass of it.
	pub fn is_subclass_of(&self, ancestor: &ClassInfo) -> bool {
		let mut current = self;
		loop {
			if current.is(ancestor) {
				return true;
			}
			match current.parent {
				Some(link) => current = link.class,
				None => return false,
			}
		}
	}

	/// Projects `instance` (of class `self`) onto the view of `ancestor`.
	///
	/// Walks the parent chain applying each [`ParentLink::project`] in turn.
	/// Returns `None` when `ancestor` is not on the chain or a projection
	/// rejects the instance.
	pub fn ancestor_view<'a>(
		&'static self,
		instance: &'a ServiceObj,
		ancestor: &'static ClassInfo,
	) -> Option<&'a ServiceObj> {
		let mut current: &'static ClassInfo = self;
		let mut view = instance;
		loop {
			if current.is(ancestor) {
				return Some(view);
			}
			let link = current.parent?;
			view = (link.project)(view)?;
			current = link.class;
		}
	}
}

impl PartialEq for ClassInfo {
	fn eq(&self, other: &Self) -> bool {
		self.is(other)
	}
}

impl Eq for ClassInfo {}

impl fmt::Debug for ClassInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassInfo")
			.field("name", &self.name)
			.field("parent", &self.parent.map(|link| link.class.name))
			.finish()
	}
}

/// Ties a service type to its class identity.
///
/// Implementations are normally generated by [`service_class!`] rather than
/// written by hand.
pub trait ServiceClass: Any + Send + Sync {
	/// The class identity under which instances of this type are bound.
	fn class() -> &'static ClassInfo
	where
		Self: Sized;
}

/// Declares the [`ServiceClass`] impl for a service type.
///
/// The one-argument form declares a root class. The extended form names the
/// direct parent class and a projection exposing the embedded parent value,
/// which is how an instance answers for members declared on its ancestors.
///
/// # Examples
///
/// ```rust
/// use tagbind::service_class;
///
/// struct Repository;
/// struct AuditedRepository {
/// 	inner: Repository,
/// }
///
/// service_class!(Repository);
/// service_class!(AuditedRepository: Repository, |this: &AuditedRepository| &this.inner);
/// ```
#[macro_export]
macro_rules! service_class {
	($ty:ty) => {
		impl $crate::ServiceClass for $ty {
			fn class() -> &'static $crate::ClassInfo {
				static INFO: $crate::once_cell::sync::Lazy<$crate::ClassInfo> =
					$crate::once_cell::sync::Lazy::new(|| {
						$crate::ClassInfo::new(stringify!($ty), None)
					});
				&INFO
			}
		}
	};
	($ty:ty : $parent:ty, $project:expr) => {
		impl $crate::ServiceClass for $ty {
			fn class() -> &'static $crate::ClassInfo {
				static INFO: $crate::once_cell::sync::Lazy<$crate::ClassInfo> =
					$crate::once_cell::sync::Lazy::new(|| {
						let project: $crate::ParentProjection = |instance| {
							instance
								.downcast_ref::<$ty>()
								.map(|this| (($project) as fn(&$ty) -> &$parent)(this) as &$crate::ServiceObj)
						};
						$crate::ClassInfo::new(
							stringify!($ty),
							Some($crate::ParentLink {
								class: <$parent as $crate::ServiceClass>::class(),
								project,
							}),
						)
					});
				&INFO
			}
		}
	};
}
