//! Shared test fixtures: a minimal hierarchical container and tagged
//! service classes mirroring a small service hierarchy.

#![allow(dead_code)]

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use tagbind::{
	BindingEntry, ClassInfo, Scope, ScopeError, ServiceClass, ServiceInstance, TagRegistry,
	service_class,
};

enum Slot {
	Service {
		class: &'static ClassInfo,
		instance: ServiceInstance,
	},
	Constant(ServiceInstance),
}

impl Slot {
	fn instance(&self) -> ServiceInstance {
		match self {
			Slot::Service { instance, .. } => instance.clone(),
			Slot::Constant(value) => value.clone(),
		}
	}

	fn entry(&self, key: &str) -> BindingEntry {
		match self {
			Slot::Service { class, .. } => BindingEntry::service(key, class),
			Slot::Constant(_) => BindingEntry::constant(key),
		}
	}
}

/// Minimal hierarchical container implementing [`Scope`].
///
/// Bindings are kept in declaration order; a child scope shadows same-key
/// bindings of its ancestors.
pub struct Container {
	parent: Option<Arc<Container>>,
	bindings: Vec<(String, Slot)>,
}

impl Container {
	pub fn new() -> Self {
		Self {
			parent: None,
			bindings: Vec::new(),
		}
	}

	pub fn with_parent(parent: Arc<Container>) -> Self {
		Self {
			parent: Some(parent),
			bindings: Vec::new(),
		}
	}

	/// Bind `instance` as a service under its own class name.
	pub fn service<T: ServiceClass>(&mut self, instance: T) {
		self.bind_service(T::class(), T::class(), instance);
	}

	/// Bind an instance of class `T` under the key of class `K`.
	pub fn service_as<K: ServiceClass, T: ServiceClass>(&mut self, instance: T) {
		self.bind_service(K::class(), T::class(), instance);
	}

	/// Bind an opaque non-service value.
	pub fn constant(&mut self, key: &str, value: impl Any + Send + Sync) {
		self.bindings
			.push((key.to_string(), Slot::Constant(Arc::new(value))));
	}

	fn bind_service<T: ServiceClass>(
		&mut self,
		key_class: &'static ClassInfo,
		class: &'static ClassInfo,
		instance: T,
	) {
		self.bindings.push((
			key_class.name.to_string(),
			Slot::Service {
				class,
				instance: Arc::new(instance),
			},
		));
	}
}

impl Scope for Container {
	fn resolve(&self, key: &str) -> Result<ServiceInstance, ScopeError> {
		if let Some((_, slot)) = self.bindings.iter().find(|(bound, _)| bound == key) {
			Ok(slot.instance())
		} else if let Some(parent) = &self.parent {
			parent.resolve(key)
		} else {
			Err(ScopeError::MissingBinding(key.to_string()))
		}
	}

	fn own_bindings(&self) -> Vec<BindingEntry> {
		self.bindings
			.iter()
			.map(|(key, slot)| slot.entry(key))
			.collect()
	}

	fn all_bindings(&self) -> Vec<BindingEntry> {
		let mut entries = Vec::new();
		let mut seen = HashSet::new();
		let mut scope = Some(self);
		while let Some(current) = scope {
			for (key, slot) in &current.bindings {
				if seen.insert(key.as_str()) {
					entries.push(slot.entry(key));
				}
			}
			scope = current.parent.as_deref();
		}
		entries
	}
}

pub struct ServiceA;

impl ServiceA {
	pub fn say_hello(&self) -> String {
		"Hello A".to_string()
	}
}

pub struct ServiceB;

impl ServiceB {
	pub fn hi(&self) -> String {
		"Hello B".to_string()
	}
}

pub struct SubServiceB {
	pub base: ServiceB,
}

impl SubServiceB {
	pub fn new() -> Self {
		Self { base: ServiceB }
	}

	pub fn bye(&self) -> String {
		"Bye B".to_string()
	}
}

service_class!(ServiceA);
service_class!(ServiceB);
service_class!(SubServiceB: ServiceB, |this: &SubServiceB| &this.base);

/// Class declarations under the `bar` tag, as the defining modules would
/// perform them at load time.
pub fn register_bar_classes(registry: &TagRegistry) {
	registry.register_class::<ServiceA>("bar", ());
	registry.register_class::<ServiceB>("bar", ());
}

/// Member declarations under the `foo` tag; base-class members are declared
/// before subclass members, matching source load order.
pub fn register_foo_members(registry: &TagRegistry) {
	registry.register_member::<ServiceA, (), String, _>("foo", "say_hello", (), |service, _| {
		service.say_hello()
	});
	registry.register_member::<ServiceB, (), String, _>("foo", "hi", (), |service, _| service.hi());
	registry.register_member::<SubServiceB, (), String, _>("foo", "bye", (), |service, _| {
		service.bye()
	});
}

/// Parent scope binding `ServiceA`, child scope binding `ServiceB`.
pub fn nested_scopes() -> (Arc<Container>, Container) {
	let mut parent = Container::new();
	parent.service(ServiceA);
	let parent = Arc::new(parent);
	let mut child = Container::with_parent(parent.clone());
	child.service(ServiceB);
	(parent, child)
}
