//! Env loading helpers.
//!
//! Keeps the fallback logic in one place instead of scattering `or_else`
//! chains through business code.

use std::env;
use std::path::Path;

/// Load `.env` from the current directory into the environment (existing
/// variables are not overridden). Runs once per process.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Ok(dir) = env::current_dir() {
            load_dotenv_from_dir(&dir);
        }
    });
}

/// Load `<dir>/.env` into the environment. Variables already set in the
/// process win over file values.
pub fn load_dotenv_from_dir(dir: &Path) {
    let path = dir.join(".env");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    tracing::debug!(path = %path.display(), "loading .env");
    let mut applied = 0usize;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();
            if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
            {
                value = &value[1..value.len() - 1];
            }
            if !key.is_empty() && env::var(key).is_err() {
                env::set_var(key, value);
                applied += 1;
            }
        }
    }
    tracing::debug!(applied, "applied .env variables");
}

/// Read an environment variable, treating empty values as unset.
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Read an environment variable, falling back to a default.
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(key).unwrap_or_else(default)
}

/// Read a boolean flag: `1`, `true`, `yes` (case-insensitive) are truthy.
pub fn env_bool(key: &str) -> bool {
    matches!(
        env_optional(key).map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
