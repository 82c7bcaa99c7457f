//! Boundary traits for the platform collaborators the directory consumes.
//!
//! The engine never talks to the operating system directly. Enumeration,
//! icon decoding, and activity launch all arrive through these traits, and
//! adapters are expected to absorb platform API variants (older vs. newer
//! enumeration call shapes) below this boundary.
use crate::icons::Bitmap;
use crate::state::LaunchHandle;

/// Undecoded icon payload as handed over by the provider.
///
/// Opaque to the engine; only the decoder interprets it.
#[derive(Clone, Debug)]
pub struct IconSource(pub Vec<u8>);

/// One raw entry from the enumeration provider, before filtering.
#[derive(Clone, Debug)]
pub struct ProviderEntry {
    /// Stable package identifier.
    pub package_id: String,
    /// User-visible label.
    pub display_name: String,
    /// Icon payload, when the platform supplies one.
    pub icon: Option<IconSource>,
    /// Launch token; absent for non-launchable metadata entries, which are
    /// discarded during load.
    pub launch_handle: Option<LaunchHandle>,
}

/// Source of the current launchable-entry list.
pub trait AppProvider {
    /// Enumerate everything the platform currently considers launchable.
    fn enumerate_launchable(&self) -> Vec<ProviderEntry>;
}

/// Why an icon payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not decodable image data.
    #[error("icon source is not decodable")]
    InvalidSource,
    /// The decode subsystem ran out of memory. Distinguished from
    /// [`DecodeError::InvalidSource`] so the cache can be dropped wholesale
    /// and decoding retried later.
    #[error("icon decode ran out of memory")]
    ResourceExhausted,
}

/// Decoder turning icon payloads into bitmaps.
pub trait IconDecoder {
    /// Decode one payload. Failures are per-entry and recoverable.
    fn decode(&self, source: &IconSource) -> Result<Bitmap, DecodeError>;
}

/// Failure to start an application. Reported to the user as a transient
/// notice, never a crash.
#[derive(Debug, Clone, thiserror::Error)]
#[error("application failed to start: {reason}")]
pub struct LaunchError {
    /// Human-readable cause, e.g. a stale handle after an uninstall.
    pub reason: String,
}

/// Hand-off to the platform's start-application operation.
pub trait AppLauncher {
    /// Start the application behind `handle`.
    fn start(&self, handle: &LaunchHandle) -> Result<(), LaunchError>;
}
