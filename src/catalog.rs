//! Catalog loading: enumerate, filter, decorate, and sort one snapshot.
//!
//! A load is synchronous and potentially slow (provider I/O plus icon
//! decoding) and is meant to run off the interactive path, sequenced by the
//! background worker so at most one load executes at a time. Per-entry
//! failures are absorbed here and never surface past the loader: a bad icon
//! leaves its entry icon-less, a handle-less entry is dropped, and the rest
//! of the load continues.
use std::collections::HashSet;
use std::sync::Arc;

use crate::icons::IconCache;
use crate::keypad::KeypadIndex;
use crate::provider::{AppProvider, DecodeError, IconDecoder, IconSource};
use crate::state::{AppRecord, PrefView, Snapshot};

/// Builds catalog snapshots from the enumeration provider.
pub struct CatalogLoader<P, D> {
    provider: P,
    decoder: D,
    icons: Arc<IconCache>,
    keypad: Arc<KeypadIndex>,
}

impl<P: AppProvider, D: IconDecoder> CatalogLoader<P, D> {
    /// Wire a loader over its collaborators.
    pub fn new(provider: P, decoder: D, icons: Arc<IconCache>, keypad: Arc<KeypadIndex>) -> Self {
        Self {
            provider,
            decoder,
            icons,
            keypad,
        }
    }

    /// Build one snapshot against the captured preference state.
    ///
    /// Entries without a launch handle are dropped, hidden packages are
    /// skipped, duplicate package ids keep their first occurrence, icons are
    /// decoded into the cache best-effort, and the result is sorted with the
    /// pinned group first and case-insensitive name order within each group.
    pub fn load(&self, prefs: &PrefView) -> Snapshot {
        let entries = self.provider.enumerate_launchable();
        let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
        let mut records: Vec<AppRecord> = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(handle) = entry.launch_handle else {
                tracing::debug!(package = %entry.package_id, "no launch handle; dropped");
                continue;
            };
            if prefs.hidden.contains(&entry.package_id) {
                continue;
            }
            if !seen.insert(entry.package_id.clone()) {
                tracing::warn!(
                    package = %entry.package_id,
                    "duplicate package id from provider; keeping first"
                );
                continue;
            }
            if let Some(source) = &entry.icon {
                self.ensure_icon(&entry.package_id, source);
            }
            let signature = self.keypad.signature(&entry.display_name);
            records.push(AppRecord {
                pinned: prefs.pinned.contains(&entry.package_id),
                package_id: entry.package_id,
                display_name: entry.display_name,
                launch_handle: handle,
                signature,
            });
        }
        records.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| {
                    a.display_name
                        .to_lowercase()
                        .cmp(&b.display_name.to_lowercase())
                })
                .then_with(|| a.package_id.cmp(&b.package_id))
        });
        tracing::info!(count = records.len(), "catalog snapshot built");
        Snapshot { records }
    }

    /// Decode `source` into the cache unless already resident.
    ///
    /// Resource exhaustion clears the whole cache so decoding can be retried
    /// on a later load; either failure leaves the entry icon-less.
    fn ensure_icon(&self, package_id: &str, source: &IconSource) {
        if self.icons.contains(package_id) {
            return;
        }
        match self.decoder.decode(source) {
            Ok(bitmap) => self.icons.put(package_id, bitmap),
            Err(DecodeError::ResourceExhausted) => {
                tracing::warn!(
                    package = %package_id,
                    "icon decode exhausted memory; clearing icon cache"
                );
                self.icons.evict_all();
            }
            Err(e) => {
                tracing::debug!(package = %package_id, error = %e, "icon decode failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::Bitmap;
    use crate::provider::ProviderEntry;
    use crate::state::LaunchHandle;

    struct FixedProvider(Vec<ProviderEntry>);

    impl AppProvider for FixedProvider {
        fn enumerate_launchable(&self) -> Vec<ProviderEntry> {
            self.0.clone()
        }
    }

    /// Decoder treating a payload of `[0xFF]` as invalid and `[0xEE]` as an
    /// out-of-memory report; anything else decodes to a bitmap of the
    /// payload's length.
    struct ByteDecoder;

    impl IconDecoder for ByteDecoder {
        fn decode(&self, source: &IconSource) -> Result<Bitmap, DecodeError> {
            match source.0.as_slice() {
                [0xFF] => Err(DecodeError::InvalidSource),
                [0xEE] => Err(DecodeError::ResourceExhausted),
                bytes => Ok(Bitmap {
                    width: bytes.len() as u32,
                    height: 1,
                    data: bytes.to_vec().into(),
                }),
            }
        }
    }

    fn entry(id: &str, name: &str) -> ProviderEntry {
        ProviderEntry {
            package_id: id.to_string(),
            display_name: name.to_string(),
            icon: Some(IconSource(vec![1, 2, 3])),
            launch_handle: Some(LaunchHandle(format!("launch:{id}"))),
        }
    }

    fn loader(entries: Vec<ProviderEntry>) -> (CatalogLoader<FixedProvider, ByteDecoder>, Arc<IconCache>) {
        let icons = Arc::new(IconCache::new(1024));
        let loader = CatalogLoader::new(
            FixedProvider(entries),
            ByteDecoder,
            Arc::clone(&icons),
            Arc::new(KeypadIndex::default()),
        );
        (loader, icons)
    }

    #[test]
    fn drops_entries_without_a_launch_handle() {
        let mut meta = entry("com.meta", "Metadata Only");
        meta.launch_handle = None;
        let (loader, _) = loader(vec![meta, entry("com.mail", "Mail")]);
        let snap = loader.load(&PrefView::default());
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.records[0].package_id, "com.mail");
    }

    #[test]
    fn skips_hidden_packages() {
        let (loader, _) = loader(vec![entry("com.a", "Alpha"), entry("com.b", "Beta")]);
        let prefs = PrefView {
            hidden: ["com.a".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let snap = loader.load(&prefs);
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.records[0].package_id, "com.b");
    }

    #[test]
    fn duplicate_package_ids_keep_first() {
        let (loader, _) = loader(vec![entry("com.a", "First"), entry("com.a", "Second")]);
        let snap = loader.load(&PrefView::default());
        assert_eq!(snap.records.len(), 1);
        assert_eq!(snap.records[0].display_name, "First");
    }

    #[test]
    fn sorts_pinned_group_first_then_name_case_insensitive() {
        let (loader, _) = loader(vec![
            entry("com.zulu", "zulu"),
            entry("com.alpha", "Alpha"),
            entry("com.mike", "mike"),
        ]);
        let prefs = PrefView {
            pinned: ["com.zulu".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let snap = loader.load(&prefs);
        let names: Vec<&str> = snap.records.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["zulu", "Alpha", "mike"]);
        assert!(snap.records[0].pinned);
        assert!(!snap.records[1].pinned);
    }

    #[test]
    fn decode_failure_keeps_the_entry_without_icon() {
        let mut bad = entry("com.bad", "Bad Icon");
        bad.icon = Some(IconSource(vec![0xFF]));
        let (loader, icons) = loader(vec![bad, entry("com.ok", "Okay")]);
        let snap = loader.load(&PrefView::default());
        assert_eq!(snap.records.len(), 2);
        assert!(icons.get("com.bad").is_none());
        assert!(icons.get("com.ok").is_some());
    }

    #[test]
    fn resource_exhaustion_clears_the_cache_and_load_continues() {
        let mut oom = entry("com.oom", "Big Icon");
        oom.icon = Some(IconSource(vec![0xEE]));
        // "com.ok" decodes first and is then dropped by the exhaustion clear.
        let (loader, icons) = loader(vec![entry("com.ok", "Aaa"), oom]);
        let snap = loader.load(&PrefView::default());
        assert_eq!(snap.records.len(), 2);
        assert!(icons.is_empty());
    }

    #[test]
    fn signatures_are_precomputed() {
        let (loader, _) = loader(vec![entry("com.dog", "Bad Dog")]);
        let snap = loader.load(&PrefView::default());
        assert_eq!(snap.records[0].signature, "223364");
    }

    #[test]
    fn cached_icons_are_not_redecoded() {
        let icons = Arc::new(IconCache::new(1024));
        icons.put(
            "com.a",
            Bitmap {
                width: 9,
                height: 9,
                data: vec![9].into(),
            },
        );
        let loader = CatalogLoader::new(
            FixedProvider(vec![entry("com.a", "Alpha")]),
            ByteDecoder,
            Arc::clone(&icons),
            Arc::new(KeypadIndex::default()),
        );
        let _ = loader.load(&PrefView::default());
        // The preseeded bitmap survives; a redecode would have replaced it.
        assert_eq!(icons.get("com.a").map(|b| b.width), Some(9));
    }
}
