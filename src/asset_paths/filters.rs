use std::sync::OnceLock;

use regex::Regex;

/// Determine whether an asset reference points somewhere other than the asset root.
///
/// Anything carrying a scheme (`https:`, `data:`, `mailto:`) or starting with `//` cannot be
/// read from disk, so the pipeline leaves it as written.
pub fn is_external_reference(value: &str) -> bool {
    static EXTERNAL: OnceLock<Regex> = OnceLock::new();
    EXTERNAL
        .get_or_init(|| {
            Regex::new(r"(?i)^(?://|[a-z][a-z0-9+.-]*://|data:|mailto:)")
                .expect("external reference pattern must compile")
        })
        .is_match(value.trim())
}
