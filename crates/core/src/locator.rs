//! Discovery of the host API in the window hierarchy.
//!
//! The API object is injected by the LMS into the launching window, which is
//! usually an ancestor frame of the content, sometimes the window that opened
//! the content, and for AICC adapters the parent document. [`ApiLocator`]
//! searches those places in order, infers the protocol variant, and caches
//! the outcome for the rest of the session.

use std::rc::Rc;

use scorm_protocol::{AICC_DOCUMENT_GLOBAL, ProtocolVersion};

use crate::host::{HostApi, HostFrame};
use crate::protocol::{self, SessionProtocol};

/// Maximum number of parent hops taken by a single [`ApiLocator::find`].
pub const FIND_ATTEMPT_LIMIT: usize = 500;

/// Versions probed on each frame when none is configured, newest first.
const DISCOVERY_ORDER: [ProtocolVersion; 2] = [ProtocolVersion::Scorm2004, ProtocolVersion::Scorm12];

enum Lookup {
	Pending,
	Found(Rc<dyn SessionProtocol>),
	Missing,
}

/// Finds and caches the host API for one session.
pub struct ApiLocator {
	root: Rc<dyn HostFrame>,
	version: Option<ProtocolVersion>,
	lookup: Lookup,
	searches: usize,
	attempts: usize,
	trace: bool,
}

impl ApiLocator {
	/// Creates a locator rooted at the content's own frame.
	///
	/// A `version` pins discovery to that variant's global.
	pub fn new(root: Rc<dyn HostFrame>, version: Option<ProtocolVersion>) -> Self {
		Self {
			root,
			version,
			lookup: Lookup::Pending,
			searches: 0,
			attempts: 0,
			trace: true,
		}
	}

	pub(crate) fn with_trace(mut self, enabled: bool) -> Self {
		self.trace = enabled;
		self
	}

	/// Returns the configured or discovered protocol version.
	pub fn version(&self) -> Option<ProtocolVersion> {
		self.version
	}

	/// Returns true once a handle has been found.
	pub fn is_found(&self) -> bool {
		matches!(self.lookup, Lookup::Found(_))
	}

	/// Returns how many full searches ([`get`](Self::get) via
	/// [`handle`](Self::handle)) have run.
	pub fn searches(&self) -> usize {
		self.searches
	}

	/// Returns the number of parent hops taken by the most recent
	/// [`find`](Self::find).
	pub fn attempts(&self) -> usize {
		self.attempts
	}

	/// Walks parent frames from `frame` looking for an API global.
	///
	/// Stops at the first frame exposing a candidate global, at the top of
	/// the hierarchy, or after [`FIND_ATTEMPT_LIMIT`] hops. With a pinned
	/// version only that version's global is a candidate; otherwise SCORM 2004
	/// wins over SCORM 1.2 on the same frame and the version is recorded.
	pub fn find(&mut self, frame: Rc<dyn HostFrame>) -> Option<Rc<dyn HostApi>> {
		let candidates: Vec<ProtocolVersion> = match self.version {
			Some(version) => version.window_global().map(|_| version).into_iter().collect(),
			None => DISCOVERY_ORDER.to_vec(),
		};

		let mut frame = frame;
		let mut attempts = 0;
		let found = loop {
			if let Some(hit) = probe(frame.as_ref(), &candidates) {
				break Some(hit);
			}
			if attempts > FIND_ATTEMPT_LIMIT {
				break None;
			}
			match frame.parent() {
				Some(parent) => {
					attempts += 1;
					frame = parent;
				}
				None => break None,
			}
		};
		self.attempts = attempts;

		match found {
			Some((version, api)) => {
				self.version.get_or_insert(version);
				crate::lms_trace!(self.trace, version = %version, attempts, "API.find: API found");
				Some(api)
			}
			None => {
				if let Some(version) = self.version {
					crate::lms_trace!(self.trace, version = %version, "API.find: pinned API version not found in this window");
				}
				crate::lms_warn!(
					self.trace,
					attempts,
					limit = FIND_ATTEMPT_LIMIT,
					"API.find: error finding API"
				);
				None
			}
		}
	}

	/// Searches the root frame's ancestors, then the opener's, then the parent
	/// document for an AICC adapter.
	///
	/// The AICC document is not consulted when the version is pinned to a
	/// window-global variant.
	pub fn get(&mut self) -> Option<Rc<dyn HostApi>> {
		let root = Rc::clone(&self.root);

		if let Some(api) = self.find(Rc::clone(&root)) {
			return Some(api);
		}

		if let Some(opener) = root.opener() {
			crate::lms_trace!(self.trace, "API.get: searching opener window");
			if let Some(api) = self.find(opener) {
				return Some(api);
			}
		}

		if matches!(self.version, None | Some(ProtocolVersion::Aicc)) {
			let parent = root.parent().unwrap_or_else(|| Rc::clone(&root));
			if let Some(api) = parent.document_global(AICC_DOCUMENT_GLOBAL) {
				self.version = Some(ProtocolVersion::Aicc);
				crate::lms_trace!(self.trace, "API.get: AICC API found on parent document");
				return Some(api);
			}
		}

		crate::lms_warn!(
			self.trace,
			"API.get: could not find an API instance in the parent frames, the opener window or the parent document"
		);
		None
	}

	/// Returns the bound API, searching only on the first call.
	///
	/// A failed search is cached like a successful one and never retried for
	/// the lifetime of the locator.
	pub fn handle(&mut self) -> Option<Rc<dyn SessionProtocol>> {
		match &self.lookup {
			Lookup::Found(api) => return Some(Rc::clone(api)),
			Lookup::Missing => return None,
			Lookup::Pending => {}
		}

		self.searches += 1;
		let bound = self
			.get()
			.and_then(|api| self.version.map(|version| protocol::bind(version, api)));

		self.lookup = match &bound {
			Some(api) => Lookup::Found(Rc::clone(api)),
			None => Lookup::Missing,
		};
		bound
	}
}

fn probe(frame: &dyn HostFrame, candidates: &[ProtocolVersion]) -> Option<(ProtocolVersion, Rc<dyn HostApi>)> {
	candidates.iter().find_map(|version| {
		let global = version.window_global()?;
		frame.global(global).map(|api| (*version, api))
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MockFrame, MockLms};

	#[test]
	fn finds_api_on_ancestor_frame() {
		let (content, top) = MockFrame::chain(3);
		top.expose("API", MockLms::new(ProtocolVersion::Scorm12));

		let mut locator = ApiLocator::new(content, None);
		assert!(locator.handle().is_some());
		assert_eq!(locator.version(), Some(ProtocolVersion::Scorm12));
		assert_eq!(locator.attempts(), 3);
	}

	#[test]
	fn prefers_newer_protocol_on_same_frame() {
		let frame = MockFrame::new("lms");
		frame.expose("API", MockLms::new(ProtocolVersion::Scorm12));
		frame.expose("API_1484_11", MockLms::new(ProtocolVersion::Scorm2004));

		let mut locator = ApiLocator::new(frame, None);
		let api = locator.handle().expect("api");
		assert_eq!(api.version(), ProtocolVersion::Scorm2004);
	}

	#[test]
	fn pinned_version_does_not_negotiate() {
		let frame = MockFrame::new("lms");
		frame.expose("API", MockLms::new(ProtocolVersion::Scorm12));

		let mut locator = ApiLocator::new(frame, Some(ProtocolVersion::Scorm2004));
		assert!(locator.handle().is_none());
		assert_eq!(locator.version(), Some(ProtocolVersion::Scorm2004));
	}

	#[test]
	fn pinned_version_skips_nearer_frame_with_other_api() {
		let (content, top) = MockFrame::chain(2);
		let middle = content.parent_frame().expect("middle frame");
		middle.expose("API_1484_11", MockLms::new(ProtocolVersion::Scorm2004));
		top.expose("API", MockLms::new(ProtocolVersion::Scorm12));

		let mut locator = ApiLocator::new(content, Some(ProtocolVersion::Scorm12));
		let api = locator.handle().expect("api");
		assert_eq!(api.version(), ProtocolVersion::Scorm12);
	}

	#[test]
	fn falls_back_to_opener() {
		let content = MockFrame::new("popup");
		let launcher = MockFrame::new("launcher");
		launcher.expose("API_1484_11", MockLms::new(ProtocolVersion::Scorm2004));
		content.set_opener(&launcher);

		let mut locator = ApiLocator::new(content, None);
		assert!(locator.handle().is_some());
		assert_eq!(locator.version(), Some(ProtocolVersion::Scorm2004));
	}

	#[test]
	fn falls_back_to_aicc_on_parent_document() {
		let parent = MockFrame::new("parent");
		let content = MockFrame::with_parent("content", &parent);
		parent.expose_document("AICC_API", MockLms::new(ProtocolVersion::Aicc));

		let mut locator = ApiLocator::new(content, None);
		let api = locator.handle().expect("api");
		assert_eq!(api.version(), ProtocolVersion::Aicc);
		assert_eq!(locator.version(), Some(ProtocolVersion::Aicc));
	}

	#[test]
	fn pinned_window_version_ignores_aicc_document() {
		let parent = MockFrame::new("parent");
		let content = MockFrame::with_parent("content", &parent);
		parent.expose_document("AICC_API", MockLms::new(ProtocolVersion::Aicc));

		let mut locator = ApiLocator::new(content, Some(ProtocolVersion::Scorm2004));
		assert!(locator.handle().is_none());
		assert_eq!(locator.version(), Some(ProtocolVersion::Scorm2004));
	}

	#[test]
	fn pinned_aicc_uses_parent_document() {
		let parent = MockFrame::new("parent");
		let content = MockFrame::with_parent("content", &parent);
		parent.expose("API", MockLms::new(ProtocolVersion::Scorm12));
		parent.expose_document("AICC_API", MockLms::new(ProtocolVersion::Aicc));

		let mut locator = ApiLocator::new(content, Some(ProtocolVersion::Aicc));
		let api = locator.handle().expect("api");
		assert_eq!(api.version(), ProtocolVersion::Aicc);
	}

	#[test]
	fn missing_api_is_cached() {
		let content = MockFrame::new("orphan");
		let mut locator = ApiLocator::new(content.clone(), None);

		assert!(locator.handle().is_none());
		let probes = content.probes();
		assert!(probes > 0);

		assert!(locator.handle().is_none());
		assert_eq!(content.probes(), probes);
		assert_eq!(locator.searches(), 1);
		assert!(!locator.is_found());
	}

	#[test]
	fn found_api_is_cached() {
		let frame = MockFrame::new("lms");
		frame.expose("API", MockLms::new(ProtocolVersion::Scorm12));
		let mut locator = ApiLocator::new(frame.clone(), None);

		let first = locator.handle().expect("api");
		let second = locator.handle().expect("api");
		assert!(Rc::ptr_eq(&first, &second));
		assert_eq!(frame.probes(), 2);
		assert_eq!(locator.searches(), 1);
	}

	#[test]
	fn walk_is_capped() {
		let (content, top) = MockFrame::chain(1000);
		top.expose("API", MockLms::new(ProtocolVersion::Scorm12));

		let mut locator = ApiLocator::new(content, None);
		assert!(locator.find(locator.root.clone()).is_none());
		assert_eq!(locator.attempts(), FIND_ATTEMPT_LIMIT + 1);
	}

	#[test]
	fn deep_chain_without_api_terminates() {
		let (content, _top) = MockFrame::chain(501);
		let mut locator = ApiLocator::new(content, None);
		assert!(locator.handle().is_none());
		assert!(locator.attempts() <= FIND_ATTEMPT_LIMIT + 1);
	}
}
