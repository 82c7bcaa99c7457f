//! The directory engine: authoritative snapshot, visible view, and the
//! search session, coordinated with background refreshes.
//!
//! All methods here are control-thread calls. The engine owns the current
//! snapshot and the (possibly filtered) visible view, mutates preference
//! sets persist-first, and exchanges messages with the load worker: refresh
//! requests go out with a fresh generation, completed snapshots come back
//! through [`Directory::install`], which drops anything stale. A background
//! refresh therefore never tears the UI-facing state and never silently
//! drops an active search.
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::Settings;
use crate::icons::IconCache;
use crate::prefs::{PrefKey, PreferenceStore};
use crate::provider::{AppLauncher, LaunchError};
use crate::sections::SectionIndex;
use crate::state::{AppRecord, LoadOutcome, LoadRequest, Mode, PrefView, Row, Snapshot};

/// Application directory engine. See the module docs for the threading
/// contract.
pub struct Directory<S: PreferenceStore, L: AppLauncher> {
    prefs: S,
    launcher: L,
    icons: Arc<IconCache>,
    settings: Settings,

    snapshot: Snapshot,
    visible: Vec<AppRecord>,
    selected: Option<usize>,
    sections: SectionIndex,

    query: String,
    last_digit_at: Option<Instant>,

    pinned: HashSet<String>,
    hidden: HashSet<String>,

    next_generation: u64,
    latest_generation: u64,
    refresh_tx: UnboundedSender<LoadRequest>,
}

impl<S: PreferenceStore, L: AppLauncher> Directory<S, L> {
    /// Build an engine over its collaborators. The in-memory preference sets
    /// are read from the store once here; afterwards the store is only
    /// written through the mutation methods.
    ///
    /// The engine starts with an empty snapshot; call [`Directory::refresh`]
    /// to request the first load.
    pub fn new(
        prefs: S,
        launcher: L,
        icons: Arc<IconCache>,
        settings: Settings,
        refresh_tx: UnboundedSender<LoadRequest>,
    ) -> Self {
        let pinned = prefs.get_set(PrefKey::Pinned);
        let hidden = prefs.get_set(PrefKey::Hidden);
        Self {
            prefs,
            launcher,
            icons,
            settings,
            snapshot: Snapshot::default(),
            visible: Vec::new(),
            selected: None,
            sections: SectionIndex::default(),
            query: String::new(),
            last_digit_at: None,
            pinned,
            hidden,
            next_generation: 1,
            latest_generation: 0,
            refresh_tx,
        }
    }

    /// Current session mode, derived from the query.
    pub fn mode(&self) -> Mode {
        if self.query.is_empty() {
            Mode::Browsing
        } else {
            Mode::Searching
        }
    }

    /// The active query digits (empty when browsing).
    pub fn current_query_text(&self) -> &str {
        &self.query
    }

    /// Number of rows in the visible view.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Renderable row at `index`, with the icon looked up from the cache.
    /// A missing icon means "draw the placeholder", not an error.
    pub fn visible_at(&self, index: usize) -> Option<Row> {
        let rec = self.visible.get(index)?;
        Some(Row {
            display_name: rec.display_name.clone(),
            pinned: rec.pinned,
            icon: self.icons.get(&rec.package_id),
        })
    }

    /// Currently selected row index; `None` when the view is empty.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select `index`, clamped into the visible range.
    pub fn select(&mut self, index: usize) {
        self.selected = if self.visible.is_empty() {
            None
        } else {
            Some(index.min(self.visible.len() - 1))
        };
    }

    /// Move the selection by `delta`, clamped at both ends.
    pub fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let len = self.visible.len() as isize;
        let cur = self.selected.unwrap_or(0) as isize;
        let next = (cur + delta).clamp(0, len - 1);
        self.selected = Some(next as usize);
    }

    /// Labels of the section jump table for the visible view.
    pub fn section_labels(&self) -> Vec<char> {
        self.sections.labels()
    }

    /// Jump the selection to the first row of the section at `ordinal`,
    /// clamping past-the-end ordinals to the last section.
    pub fn jump_to_section(&mut self, ordinal: usize) {
        if let Some(index) = self.sections.jump(ordinal) {
            self.select(index);
        }
    }

    /// Append a query digit, entering Searching mode if browsing.
    ///
    /// Matching is pure digit-substring containment, so digits without any
    /// letter mapping (0/1) still append literally. When the filtered view
    /// is non-empty the selection resets to the top; when it comes out empty
    /// the configured empty-filter policy decides between keeping the dead
    /// query and clearing the whole session.
    pub fn append_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            tracing::debug!(%digit, "ignoring non-digit query input");
            return;
        }
        self.query.push(digit);
        self.last_digit_at = Some(Instant::now());
        self.recompute_visible();
        if self.visible.is_empty() {
            if self.settings.clear_query_on_empty {
                tracing::debug!(query = %self.query, "no matches; clearing query");
                self.cancel_search();
            }
        } else {
            self.selected = Some(0);
        }
    }

    /// Pop the last query digit; an emptied query returns to Browsing.
    pub fn remove_digit(&mut self) {
        if self.query.pop().is_none() {
            return;
        }
        if self.query.is_empty() {
            self.last_digit_at = None;
        } else {
            self.last_digit_at = Some(Instant::now());
        }
        self.recompute_visible();
    }

    /// Force Browsing mode, discarding any query digits.
    pub fn cancel_search(&mut self) {
        if self.query.is_empty() {
            return;
        }
        self.query.clear();
        self.last_digit_at = None;
        self.recompute_visible();
    }

    /// Expire an abandoned search session once the configured idle timeout
    /// has elapsed since the last digit. A disabled timeout never fires.
    pub fn tick(&mut self, now: Instant) {
        let Some(timeout) = self.settings.search_idle_timeout else {
            return;
        };
        if let Some(last) = self.last_digit_at
            && now.duration_since(last) >= timeout
        {
            tracing::debug!("search session idle; clearing query");
            self.cancel_search();
        }
    }

    /// Request a background reload of the catalog. Called at startup, after
    /// every preference mutation, and whenever the platform signals an
    /// install or uninstall.
    ///
    /// Captures the current preference sets so the resulting snapshot
    /// reflects the preference state at request time, and bumps the
    /// generation so any load still in flight is delivered stale and
    /// ignored.
    pub fn refresh(&mut self) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.latest_generation = generation;
        let request = LoadRequest {
            generation,
            prefs: PrefView {
                pinned: self.pinned.clone(),
                hidden: self.hidden.clone(),
            },
        };
        if self.refresh_tx.send(request).is_err() {
            tracing::warn!(generation, "load worker gone; refresh dropped");
        }
    }

    /// Install a completed load, unless a newer request has superseded it.
    ///
    /// When a search is active the current digits are re-applied to the new
    /// snapshot; the session itself is never dropped by a refresh.
    pub fn install(&mut self, outcome: LoadOutcome) {
        if outcome.generation != self.latest_generation {
            tracing::debug!(
                generation = outcome.generation,
                latest = self.latest_generation,
                "ignoring stale snapshot delivery"
            );
            return;
        }
        self.snapshot = outcome.snapshot;
        self.recompute_visible();
    }

    /// Toggle `package_id` in the pinned set. Persists first; the in-memory
    /// set and the follow-up refresh only happen after the write succeeds.
    pub fn toggle_pin(&mut self, package_id: &str) -> io::Result<()> {
        let mut next = self.pinned.clone();
        if !next.remove(package_id) {
            next.insert(package_id.to_string());
        }
        self.prefs.put_set(PrefKey::Pinned, &next)?;
        self.pinned = next;
        self.refresh();
        Ok(())
    }

    /// Add `package_id` to the hidden set. Persist-first, then refresh.
    pub fn hide(&mut self, package_id: &str) -> io::Result<()> {
        let mut next = self.hidden.clone();
        if !next.insert(package_id.to_string()) {
            return Ok(());
        }
        self.prefs.put_set(PrefKey::Hidden, &next)?;
        self.hidden = next;
        self.refresh();
        Ok(())
    }

    /// Clear the hidden set entirely. Persist-first, then refresh.
    pub fn reset_hidden(&mut self) -> io::Result<()> {
        if self.hidden.is_empty() {
            return Ok(());
        }
        self.prefs.put_set(PrefKey::Hidden, &HashSet::new())?;
        self.hidden.clear();
        self.refresh();
        Ok(())
    }

    /// Start the selected application. A no-op without a selection; on
    /// launch failure the error is returned for a transient notice and a
    /// refresh is scheduled so a stale entry disappears from the next view.
    pub fn activate_selected(&mut self) -> Result<(), LaunchError> {
        let Some(index) = self.selected else {
            return Ok(());
        };
        let Some(rec) = self.visible.get(index) else {
            return Ok(());
        };
        let package_id = rec.package_id.clone();
        let handle = rec.launch_handle.clone();
        match self.launcher.start(&handle) {
            Ok(()) => {
                tracing::info!(package = %package_id, "application started");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(package = %package_id, error = %e, "launch failed; refreshing");
                self.refresh();
                Err(e)
            }
        }
    }

    /// Rebuild the visible view from the snapshot and the active query,
    /// preserving the selection by package id where possible and clamping
    /// otherwise. The section index is rebuilt alongside.
    fn recompute_visible(&mut self) {
        let prev_id = self
            .selected
            .and_then(|i| self.visible.get(i))
            .map(|r| r.package_id.clone());
        self.visible = if self.query.is_empty() {
            self.snapshot.records.clone()
        } else {
            self.snapshot
                .records
                .iter()
                .filter(|r| r.signature.contains(&self.query))
                .cloned()
                .collect()
        };
        self.sections = SectionIndex::build(&self.visible);
        self.selected = if self.visible.is_empty() {
            None
        } else if let Some(pos) = prev_id
            .as_deref()
            .and_then(|id| self.visible.iter().position(|r| r.package_id == id))
        {
            Some(pos)
        } else {
            Some(
                self.selected
                    .unwrap_or(0)
                    .min(self.visible.len() - 1),
            )
        };
    }

    #[cfg(test)]
    pub(crate) fn visible_names(&self) -> Vec<&str> {
        self.visible.iter().map(|r| r.display_name.as_str()).collect()
    }
}
