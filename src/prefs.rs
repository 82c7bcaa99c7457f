//! Durable pinned/hidden preference sets.
//!
//! The engine consumes the [`PreferenceStore`] trait; [`JsonPreferenceStore`]
//! is the bundled file-backed implementation persisting both sets as a single
//! JSON document. Reads are best-effort (a missing or corrupt file yields
//! empty sets with a logged warning); writes surface their errors so callers
//! can refuse to apply an in-memory toggle that failed to persist.
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Logical key naming one of the two persisted sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefKey {
    /// Packages sorted into the pinned group ahead of everything else.
    Pinned,
    /// Packages excluded from snapshots.
    Hidden,
}

/// Durable set membership for package identifiers.
///
/// Both operations are synchronous; durability across restarts is the
/// implementation's responsibility.
pub trait PreferenceStore {
    /// Current membership of the set behind `key`.
    fn get_set(&self, key: PrefKey) -> HashSet<String>;
    /// Replace the set behind `key`, durably. On error the previous
    /// persisted state must remain intact.
    fn put_set(&mut self, key: PrefKey, values: &HashSet<String>) -> io::Result<()>;
}

/// On-disk shape: both sets in one document, ordered for stable diffs.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct PrefsDisk {
    #[serde(default)]
    pinned: BTreeSet<String>,
    #[serde(default)]
    hidden: BTreeSet<String>,
}

/// File-backed [`PreferenceStore`] persisting JSON via serde.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    disk: PrefsDisk,
}

impl JsonPreferenceStore {
    /// Open the store at `path`, reading any existing document.
    ///
    /// A missing file starts empty; an unreadable or unparsable file starts
    /// empty with a warning, and is overwritten on the next successful write.
    pub fn open(path: PathBuf) -> Self {
        let disk = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PrefsDisk>(&raw) {
                Ok(disk) => disk,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse preference file; starting empty"
                    );
                    PrefsDisk::default()
                }
            },
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to read preference file; starting empty"
                    );
                }
                PrefsDisk::default()
            }
        };
        Self { path, disk }
    }

    /// Open the store at its default location under the XDG state directory.
    pub fn at_default_location() -> Self {
        Self::open(crate::config::state_dir().join("preferences.json"))
    }

    fn write_disk(&self, disk: &PrefsDisk) -> io::Result<()> {
        let serialized = serde_json::to_string(disk).map_err(io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serialized)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get_set(&self, key: PrefKey) -> HashSet<String> {
        let set = match key {
            PrefKey::Pinned => &self.disk.pinned,
            PrefKey::Hidden => &self.disk.hidden,
        };
        set.iter().cloned().collect()
    }

    fn put_set(&mut self, key: PrefKey, values: &HashSet<String>) -> io::Result<()> {
        let replacement: BTreeSet<String> = values.iter().cloned().collect();
        let candidate = match key {
            PrefKey::Pinned => PrefsDisk {
                pinned: replacement,
                hidden: self.disk.hidden.clone(),
            },
            PrefKey::Hidden => PrefsDisk {
                pinned: self.disk.pinned.clone(),
                hidden: replacement,
            },
        };
        self.write_disk(&candidate)?;
        self.disk = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonPreferenceStore::open(dir.path().join("prefs.json"));
        assert!(store.get_set(PrefKey::Pinned).is_empty());
        assert!(store.get_set(PrefKey::Hidden).is_empty());
    }

    #[test]
    fn put_then_reopen_roundtrips_both_sets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        let mut store = JsonPreferenceStore::open(path.clone());
        store
            .put_set(PrefKey::Pinned, &set(&["com.maps", "com.mail"]))
            .expect("persist pinned");
        store
            .put_set(PrefKey::Hidden, &set(&["com.bloat"]))
            .expect("persist hidden");

        let reopened = JsonPreferenceStore::open(path);
        assert_eq!(reopened.get_set(PrefKey::Pinned), set(&["com.maps", "com.mail"]));
        assert_eq!(reopened.get_set(PrefKey::Hidden), set(&["com.bloat"]));
    }

    #[test]
    fn corrupt_file_starts_empty_and_recovers_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").expect("seed corrupt file");
        let mut store = JsonPreferenceStore::open(path.clone());
        assert!(store.get_set(PrefKey::Pinned).is_empty());
        store
            .put_set(PrefKey::Pinned, &set(&["com.ok"]))
            .expect("persist");
        let reopened = JsonPreferenceStore::open(path);
        assert_eq!(reopened.get_set(PrefKey::Pinned), set(&["com.ok"]));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        // The store's parent "directory" is a plain file, so writes fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").expect("seed blocker file");
        let mut store = JsonPreferenceStore::open(blocker.join("prefs.json"));
        let err = store.put_set(PrefKey::Pinned, &set(&["com.maps"]));
        assert!(err.is_err());
        assert!(store.get_set(PrefKey::Pinned).is_empty());
    }

    #[test]
    fn writing_one_key_preserves_the_other() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        let mut store = JsonPreferenceStore::open(path);
        store
            .put_set(PrefKey::Pinned, &set(&["com.maps"]))
            .expect("persist pinned");
        store
            .put_set(PrefKey::Hidden, &set(&["com.bloat"]))
            .expect("persist hidden");
        assert_eq!(store.get_set(PrefKey::Pinned), set(&["com.maps"]));
    }
}
