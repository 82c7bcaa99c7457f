//! User settings and XDG path helpers.
//!
//! Settings live in a plain `key = value` file with `#`/`//` comments,
//! loaded best-effort with a fallback to defaults when the file is missing
//! or invalid. Policy points the historical launcher variants disagreed on
//! (search idle timeout, empty-filter handling) are plain settings here.
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Tunable engine behavior loaded at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Byte budget for the icon cache. Must be explicit; a reasonable value
    /// is roughly an eighth of the heap the embedder will spend on icons.
    pub icon_budget_bytes: usize,
    /// Auto-clear an abandoned search session after this much digit
    /// inactivity. `None` disables the timeout.
    pub search_idle_timeout: Option<Duration>,
    /// When a digit query filters the view down to nothing: `true` clears
    /// the whole query, `false` leaves it active with zero results.
    pub clear_query_on_empty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            icon_budget_bytes: 4 * 1024 * 1024,
            search_idle_timeout: None,
            clear_query_on_empty: false,
        }
    }
}

/// Load settings from the config file, falling back to
/// [`Settings::default`] when it is missing or unreadable.
pub fn settings() -> Settings {
    let path = config_dir().join("launchdex.conf");
    match fs::read_to_string(&path) {
        Ok(content) => parse_settings(&content),
        Err(_) => Settings::default(),
    }
}

/// Parse `key = value` lines into [`Settings`].
///
/// Unknown keys are ignored; unparsable values keep their defaults. A zero
/// icon budget is invalid and reverts the whole set to defaults.
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, raw_val)) = trimmed.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(raw_val.trim());
        match key.as_str() {
            "icon_budget_bytes" | "icon_cache_budget" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.icon_budget_bytes = v;
                }
            }
            "search_idle_timeout_ms" | "search_timeout_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.search_idle_timeout = if v == 0 {
                        None
                    } else {
                        Some(Duration::from_millis(v))
                    };
                }
            }
            "clear_query_on_empty" | "clear_search_on_empty" => {
                let lv = val.to_ascii_lowercase();
                out.clear_query_on_empty = lv == "true" || lv == "1" || lv == "yes" || lv == "on";
            }
            _ => {}
        }
    }
    if out.icon_budget_bytes == 0 {
        out = Settings::default();
    }
    out
}

/// Drop everything after an unquoted `#` or `//`.
fn strip_inline_comment(val: &str) -> &str {
    let cut = val
        .find('#')
        .into_iter()
        .chain(val.find("//"))
        .min()
        .unwrap_or(val.len());
    val[..cut].trim()
}

/// Resolve an XDG base directory from the environment or a `$HOME` default.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Config directory (`$XDG_CONFIG_HOME/launchdex`, ensured to exist).
pub fn config_dir() -> PathBuf {
    let dir = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join("launchdex");
    let _ = fs::create_dir_all(&dir);
    dir
}

/// State directory for persisted preferences
/// (`$XDG_STATE_HOME/launchdex`, ensured to exist).
pub fn state_dir() -> PathBuf {
    let dir = xdg_base_dir("XDG_STATE_HOME", &[".local", "state"]).join("launchdex");
    let _ = fs::create_dir_all(&dir);
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_defaults() {
        assert_eq!(parse_settings(""), Settings::default());
        assert_eq!(parse_settings("# only comments\n// here\n"), Settings::default());
    }

    #[test]
    fn parses_known_keys() {
        let s = parse_settings(
            "icon_budget_bytes = 1048576\nsearch_idle_timeout_ms = 2000\nclear_query_on_empty = true\n",
        );
        assert_eq!(s.icon_budget_bytes, 1_048_576);
        assert_eq!(s.search_idle_timeout, Some(Duration::from_secs(2)));
        assert!(s.clear_query_on_empty);
    }

    #[test]
    fn inline_comments_are_stripped() {
        let s = parse_settings("search_idle_timeout_ms = 1500 # two-ish seconds\n");
        assert_eq!(s.search_idle_timeout, Some(Duration::from_millis(1500)));
        let s = parse_settings("clear_query_on_empty = yes // variant B\n");
        assert!(s.clear_query_on_empty);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let s = parse_settings("search_idle_timeout_ms = 0\n");
        assert_eq!(s.search_idle_timeout, None);
    }

    #[test]
    fn zero_budget_reverts_to_defaults() {
        let s = parse_settings("icon_budget_bytes = 0\nclear_query_on_empty = true\n");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn unknown_keys_and_garbage_are_ignored() {
        let s = parse_settings("wallpaper = blue\nicon_budget_bytes = lots\nnot a pair\n");
        assert_eq!(s, Settings::default());
    }
}
