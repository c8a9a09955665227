use std::env;

/// Pipeline options, passed in explicitly by collaborators. The `nhlify`
/// flag is part of downstream cache keys, so its default matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalizeOptions {
    /// Merge paired shot+goal rows into single goal rows (NHL-style).
    pub nhlify: bool,
}

impl Default for CanonicalizeOptions {
    fn default() -> Self {
        CanonicalizeOptions { nhlify: true }
    }
}

impl CanonicalizeOptions {
    pub fn from_env() -> Self {
        let nhlify = env::var("HOCKEY_PBP_NHLIFY")
            .ok()
            .and_then(|val| parse_bool(&val))
            .unwrap_or(true);
        CanonicalizeOptions { nhlify }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
