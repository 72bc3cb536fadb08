//! API credential pool with round-robin rotation

use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Placeholder token used when no credentials are configured.
///
/// Keeps dry runs working; the misconfiguration surfaces as authentication
/// failures from the remote endpoint.
const PLACEHOLDER_KEY: &str = "MISSING_API_KEY";

/// Opaque API token for the remote translation endpoint
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(****)")
    }
}

/// Hands out credentials in strict cyclic order, wrapping indefinitely.
///
/// Thread-safe and non-blocking; every caller gets the next credential in
/// the fixed pool. Pool size is fixed at construction.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    cursor: AtomicUsize,
}

impl CredentialRotator {
    /// Create a rotator over a fixed pool.
    ///
    /// An empty pool falls back to a single placeholder credential so the
    /// job can still be exercised without configuration.
    pub fn new(credentials: Vec<Credential>) -> Self {
        let credentials = if credentials.is_empty() {
            warn!("no API credentials configured, using placeholder key");
            vec![Credential::new(PLACEHOLDER_KEY)]
        } else {
            credentials
        };

        Self {
            credentials,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create from environment configuration (env var, then key file)
    pub fn from_env() -> Self {
        Self::new(load_credentials())
    }

    /// Next credential in rotation
    pub fn next(&self) -> Credential {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.credentials.len();
        self.credentials[index].clone()
    }

    /// Number of credentials in the pool
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// The pool is never empty; placeholder fallback guarantees one entry
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

/// Shape of the fallback `api_keys.json` file
#[derive(Debug, Deserialize)]
struct KeyFile {
    #[serde(default)]
    api_keys: Vec<String>,
}

/// Load credentials from the `API_KEYS` env var, falling back to a JSON
/// key file (`api_keys.json`, or the path in `API_KEYS_FILE`).
pub fn load_credentials() -> Vec<Credential> {
    if let Ok(raw) = std::env::var("API_KEYS") {
        let keys = parse_key_list(&raw);
        if !keys.is_empty() {
            info!("loaded {} API keys from environment", keys.len());
            return keys;
        }
    }

    let path = std::env::var("API_KEYS_FILE").unwrap_or_else(|_| "api_keys.json".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<KeyFile>(&content) {
            Ok(file) if !file.api_keys.is_empty() => {
                info!("loaded {} API keys from {}", file.api_keys.len(), path);
                return file.api_keys.into_iter().map(Credential::new).collect();
            }
            Ok(_) => warn!("key file {} contains no API keys", path),
            Err(e) => warn!("could not parse key file {}: {}", path, e),
        },
        Err(_) => info!("no key file found at {}", path),
    }

    Vec::new()
}

/// Parse a comma-separated key list, tolerating surrounding brackets
/// (`[key1, key2]`) as written in `.env` files.
fn parse_key_list(raw: &str) -> Vec<Credential> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(Credential::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pool(keys: &[&str]) -> Vec<Credential> {
        keys.iter().map(|k| Credential::new(*k)).collect()
    }

    #[test]
    fn test_strict_cyclic_order() {
        let rotator = CredentialRotator::new(pool(&["a", "b", "c"]));

        let tokens: Vec<String> = (0..9)
            .map(|_| rotator.next().expose().to_string())
            .collect();

        assert_eq!(
            tokens,
            vec!["a", "b", "c", "a", "b", "c", "a", "b", "c"]
        );
    }

    #[test]
    fn test_even_distribution_across_pool() {
        let rotator = CredentialRotator::new(pool(&["a", "b", "c"]));

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..30 {
            *counts.entry(rotator.next().expose().to_string()).or_default() += 1;
        }

        assert_eq!(counts["a"], 10);
        assert_eq!(counts["b"], 10);
        assert_eq!(counts["c"], 10);
    }

    #[test]
    fn test_empty_pool_falls_back_to_placeholder() {
        let rotator = CredentialRotator::new(Vec::new());
        assert_eq!(rotator.len(), 1);
        assert_eq!(rotator.next().expose(), PLACEHOLDER_KEY);
        assert_eq!(rotator.next().expose(), PLACEHOLDER_KEY);
    }

    #[test]
    fn test_parse_key_list_with_brackets() {
        let keys = parse_key_list("[key1, key2, key3]");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].expose(), "key1");
        assert_eq!(keys[2].expose(), "key3");
    }

    #[test]
    fn test_parse_key_list_plain() {
        let keys = parse_key_list("key1,key2");
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_parse_key_list_ignores_empty_segments() {
        let keys = parse_key_list("[key1,, ]");
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("secret-token");
        assert_eq!(format!("{:?}", credential), "Credential(****)");
    }

    #[test]
    fn test_rotation_is_thread_safe() {
        use std::sync::Arc;

        let rotator = Arc::new(CredentialRotator::new(pool(&["a", "b", "c"])));
        let mut handles = Vec::new();

        for _ in 0..6 {
            let rotator = rotator.clone();
            handles.push(std::thread::spawn(move || {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for _ in 0..50 {
                    *counts.entry(rotator.next().expose().to_string()).or_default() += 1;
                }
                counts
            }));
        }

        let mut totals: HashMap<String, usize> = HashMap::new();
        for handle in handles {
            for (key, count) in handle.join().unwrap() {
                *totals.entry(key).or_default() += count;
            }
        }

        // 300 calls over 3 keys: exactly even regardless of interleaving
        assert_eq!(totals["a"], 100);
        assert_eq!(totals["b"], 100);
        assert_eq!(totals["c"], 100);
    }
}
