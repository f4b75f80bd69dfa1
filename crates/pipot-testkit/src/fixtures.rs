//! rstest fixtures.

use pipot_core::{ConfigError, Renderer, RendererConfig};
use rstest::fixture;

use crate::host::{NodeId, RecordingHost};

/// A renderer over a fresh [`RecordingHost`] and the container to render into.
pub struct Mounted {
	/// The renderer under test
	pub renderer: Renderer<RecordingHost>,
	/// Container node created on the host
	pub container: NodeId,
}

impl Mounted {
	/// Creates a renderer with the default configuration over an empty
	/// recording host.
	pub fn new() -> Self {
		let (host, container) = Self::empty_host();
		Self {
			renderer: Renderer::with_default_config(host),
			container,
		}
	}

	/// Creates a renderer with `config` over an empty recording host.
	pub fn with_config(config: RendererConfig) -> Result<Self, ConfigError> {
		let (host, container) = Self::empty_host();
		Ok(Self {
			renderer: Renderer::new(host, config)?,
			container,
		})
	}

	fn empty_host() -> (RecordingHost, NodeId) {
		let mut host = RecordingHost::new();
		let container = host.create_container();
		(host, container)
	}

	/// Returns the recording host.
	pub fn host(&self) -> &RecordingHost {
		self.renderer.host()
	}

	/// Returns the recording host mutably.
	pub fn host_mut(&mut self) -> &mut RecordingHost {
		self.renderer.host_mut()
	}

	/// Serialized children of the container.
	pub fn markup(&self) -> String {
		self.host().inner_markup(self.container)
	}
}

/// Fixture providing an empty recording host
#[fixture]
pub fn recording_host() -> RecordingHost {
	RecordingHost::new()
}

/// Fixture providing a renderer with the default configuration over a
/// recording host, plus its container node
///
/// Note: Doctests cannot use rstest fixtures directly; see the integration
/// tests for usage.
#[fixture]
pub fn mounted() -> Mounted {
	Mounted::new()
}
