//! Capabilities the session needs from its host environment.
//!
//! A browser page exposes the LMS API as a global property on some ancestor
//! window or on the window that opened it. These traits keep the window walk
//! platform-neutral: `scorm-web` implements them over the DOM and
//! [`testing`](crate::testing) over in-memory frames.

use std::rc::Rc;

use scorm_protocol::HostValue;

/// A host-injected LMS API object.
pub trait HostApi {
	/// Invokes the host method `method` with string arguments and returns its
	/// raw result. Unknown methods and host exceptions yield
	/// [`HostValue::Undefined`].
	fn call(&self, method: &str, args: &[&str]) -> HostValue;
}

/// A browsing context that may expose an LMS API.
pub trait HostFrame {
	/// Returns the object bound to the global property `name`, if any.
	fn global(&self, name: &str) -> Option<Rc<dyn HostApi>>;

	/// Returns the object bound to `name` on this frame's document, if any.
	fn document_global(&self, name: &str) -> Option<Rc<dyn HostApi>>;

	/// Returns the parent frame, or `None` at the top of the hierarchy
	/// (where a DOM window is its own parent).
	fn parent(&self) -> Option<Rc<dyn HostFrame>>;

	/// Returns the window that opened this one, if any.
	fn opener(&self) -> Option<Rc<dyn HostFrame>>;
}
