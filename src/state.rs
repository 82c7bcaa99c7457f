//! Core data types for the application directory.
//!
//! This module defines the records and messages shared across the crate:
//! catalog records and snapshots, the preference view captured at refresh
//! time, the request/outcome pair exchanged with the background load worker,
//! and the row shape handed to the rendering layer.
use std::collections::HashSet;

/// Opaque platform token used to start an application.
///
/// The engine never interprets the token; it only carries it from the
/// provider to the launcher. Entries without a handle never enter a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchHandle(pub String);

/// One launchable entry in a catalog snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppRecord {
    /// Unique, stable package identifier within a snapshot.
    pub package_id: String,
    /// User-visible label. May repeat across packages.
    pub display_name: String,
    /// Token handed to the launcher on activation.
    pub launch_handle: LaunchHandle,
    /// Whether the package is in the pinned set at the time the snapshot
    /// was built. Derived, never persisted on the record.
    pub pinned: bool,
    /// Phonetic keypad signature of `display_name`, precomputed at load time
    /// so query filtering is a plain substring test.
    pub signature: String,
}

/// An immutable, fully-sorted list of application records produced by one
/// load cycle. Replaced wholesale on every refresh; never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Records sorted pinned-group-first, then case-insensitive name order.
    pub records: Vec<AppRecord>,
}

/// Preference state captured when a refresh is requested.
///
/// The load worker only ever sees this copy, so a snapshot always reflects
/// the preference state at the time its load started.
#[derive(Clone, Debug, Default)]
pub struct PrefView {
    /// Package ids sorted into the pinned group.
    pub pinned: HashSet<String>,
    /// Package ids excluded from snapshots entirely.
    pub hidden: HashSet<String>,
}

/// Refresh request sent to the background load worker.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    /// Monotonic identifier used to discard stale deliveries.
    pub generation: u64,
    /// Preference state to build the snapshot against.
    pub prefs: PrefView,
}

/// Completed load delivered back to the control thread.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    /// Echoed identifier from the originating [`LoadRequest`].
    pub generation: u64,
    /// The freshly built snapshot.
    pub snapshot: Snapshot,
}

/// Session mode of the directory: browsing the full snapshot or filtering it
/// through an active digit query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No active query; the visible view is the full snapshot.
    Browsing,
    /// Non-empty digit query filtering the visible view.
    Searching,
}

/// Renderable row for one visible entry.
///
/// The icon is `None` on a cache miss; the rendering layer supplies its own
/// placeholder and must not treat the miss as an error.
#[derive(Clone, Debug)]
pub struct Row {
    /// User-visible label.
    pub display_name: String,
    /// Whether the entry belongs to the pinned group.
    pub pinned: bool,
    /// Decoded icon, if currently resident in the cache.
    pub icon: Option<crate::icons::Bitmap>,
}
