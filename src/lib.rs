//! Launchdex: an application directory engine for keypad-driven launchers.
//!
//! The crate maintains a searchable, cached directory of launchable entries:
//! it builds immutable catalog snapshots off the interactive path, caches
//! icon bitmaps under a byte budget, keeps pin/hide preferences durable,
//! derives phonetic keypad signatures for digit search, and serves an
//! alphabetic section index for fast scroll. A background refresh can run
//! concurrently with an active search session without torn results: the
//! worker only ever delivers completed snapshots over a channel, and the
//! control thread installs them atomically, re-applying any active query.
//!
//! Rendering, key-event sources, platform app enumeration, preference
//! storage, and activity launch are external collaborators reached through
//! the traits in [`provider`] and [`prefs`].

pub mod catalog;
pub mod config;
pub mod directory;
pub mod icons;
pub mod keypad;
pub mod prefs;
pub mod provider;
pub mod sections;
pub mod state;
pub mod worker;
