//! Identifier and display helpers shared by commands.

/// Number of hex characters appended by [`generate_suffixed_id`].
const SUFFIX_LEN: usize = 8;

/// Descriptions at or above this length are trimmed for listings.
pub const DESCRIPTION_LIMIT: usize = 20;

/// Append `_` and a short unique hex suffix to `base`.
///
/// The suffix hashes the base id together with the current time and the
/// process id, so two calls in quick succession still differ.
pub fn generate_suffixed_id(base: &str) -> String {
    let now = chrono::Utc::now();
    let mut hasher = blake3::Hasher::new();
    hasher.update(base.as_bytes());
    hasher.update(&now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(&next_counter().to_le_bytes());
    let hex = hasher.finalize().to_hex();
    format!("{base}_{}", &hex.as_str()[..SUFFIX_LEN])
}

fn next_counter() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Shorten a description for table output.
///
/// `None` renders as an empty string.
pub fn trim_description(description: Option<&str>) -> String {
    let Some(description) = description else {
        return String::new();
    };
    if description.chars().count() < DESCRIPTION_LIMIT {
        return description.to_string();
    }
    let head: String = description.chars().take(DESCRIPTION_LIMIT - 2).collect();
    format!("{head}..")
}
