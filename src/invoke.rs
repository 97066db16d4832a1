//! Member invocation
//!
//! Thin composition over member resolution: resolve every member declared
//! under a tag, call each one with caller-supplied arguments, and collect the
//! return values in resolution order.
//!
//! Invocation is type-checked against the closure captured at registration:
//! the caller names the argument and return types, and a mismatch is an error
//! rather than a dynamic dispatch failure. Errors are fail-fast: when the
//! third of five invocations fails, the first two have already run and their
//! effects are not rolled back.

use crate::registry::{MemberInvoker, TagRegistry};
use crate::resolve::MemberRef;
use crate::scope::{Scope, ScopeError};
use thiserror::Error;

/// Errors raised while invoking resolved members.
#[derive(Debug, Error)]
pub enum InvokeError {
	/// Failure reported by the external container during resolution.
	#[error(transparent)]
	Scope(#[from] ScopeError),

	/// The caller's argument/return types differ from the registered closure's.
	#[error("member `{member}` declared on `{declared}` was registered with a different argument or return type")]
	Signature {
		/// Name of the declaring class.
		declared: &'static str,
		/// Name of the member.
		member: &'static str,
	},

	/// The bound class exposes no view of the declaring ancestor class.
	#[error("class `{class}` exposes no view of ancestor `{declared}`")]
	AncestorView {
		/// Name of the bound concrete class.
		class: &'static str,
		/// Name of the declaring class.
		declared: &'static str,
	},
}

impl MemberRef {
	/// Invoke the resolved member with `args`.
	///
	/// The instance is first projected onto the view of the declaring class
	/// (walking the parent chain for inherited members), then the closure
	/// captured at registration runs against that view. An asynchronous or
	/// otherwise deferred return value is handed back unchanged; nothing is
	/// awaited here.
	///
	/// # Errors
	///
	/// [`InvokeError::Signature`] when `(A, R)` does not match the types the
	/// member was registered with; [`InvokeError::AncestorView`] when the
	/// instance cannot be viewed as the declaring class, which indicates a
	/// malformed parent link on the bound class.
	pub fn invoke<A, R>(&self, args: &A) -> Result<R, InvokeError>
	where
		A: 'static,
		R: 'static,
	{
		let invoker = self
			.invoker
			.downcast_ref::<MemberInvoker<A, R>>()
			.ok_or(InvokeError::Signature {
				declared: self.declared.name,
				member: self.member_name,
			})?;
		let view = self
			.class
			.ancestor_view(&*self.instance, self.declared)
			.ok_or(InvokeError::AncestorView {
				class: self.class.name,
				declared: self.declared.name,
			})?;
		(invoker.0)(view, args).ok_or(InvokeError::AncestorView {
			class: self.class.name,
			declared: self.declared.name,
		})
	}
}

impl TagRegistry {
	/// Invoke every member declared under `tag` and collect the results.
	///
	/// Members run in exactly the order
	/// [`find_members`](TagRegistry::find_members) produces, and the result
	/// vector has the same length and order. The first failure aborts the
	/// remaining invocations; completed ones are not undone.
	///
	/// # Errors
	///
	/// Propagates [`ScopeError`] from resolution and [`InvokeError`] from the
	/// first failing invocation.
	pub fn invoke_methods<A, R>(
		&self,
		tag: &str,
		scope: &dyn Scope,
		recursive: bool,
		args: &A,
	) -> Result<Vec<R>, InvokeError>
	where
		A: 'static,
		R: 'static,
	{
		let members = self.find_members(tag, scope, recursive)?;
		let mut results = Vec::with_capacity(members.len());
		for member in &members {
			results.push(member.invoke(args)?);
		}
		Ok(results)
	}
}

/// [`TagRegistry::invoke_methods`] against the process-wide registry.
///
/// # Errors
///
/// Propagates [`ScopeError`] from resolution and [`InvokeError`] from the
/// first failing invocation.
pub fn invoke_methods<A, R>(
	tag: &str,
	scope: &dyn Scope,
	recursive: bool,
	args: &A,
) -> Result<Vec<R>, InvokeError>
where
	A: 'static,
	R: 'static,
{
	TagRegistry::global().invoke_methods::<A, R>(tag, scope, recursive, args)
}
