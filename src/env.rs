/// Environment variable names used by this crate for convenient
/// configuration from services.
///
/// These are purely helpers; the core sink types remain decoupled from
/// environment access.

/// Minimum severity for the JSON sink, e.g. `info` or `warn`.
pub const LOG_ENRICH_LEVEL_ENV: &str = "LOG_ENRICH_LEVEL";

/// Listen address for the demo server, e.g. `127.0.0.1:8080`.
pub const LOG_ENRICH_LISTEN_ADDR_ENV: &str = "LOG_ENRICH_LISTEN_ADDR";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("LOG_ENRICH_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
