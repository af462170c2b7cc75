use crate::context::RequestContext;
use crate::logger::default_logger;
use crate::value::Attr;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

/// Length of ids produced by the degraded fallback path.
pub const FALLBACK_ID_LENGTH: usize = 32;

const FALLBACK_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Primary source of correlation ids, injectable so generation failure
/// stays testable.
pub trait IdSource: Send + Sync {
    fn try_generate(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// Default [`IdSource`]: random version-4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn try_generate(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Produces one unique identifier per request.
///
/// Generation failure is non-fatal: it is logged at error severity and
/// the provider falls back to a fixed-length pseudo-random alphanumeric
/// string, so a request always proceeds with *some* id.
#[derive(Clone)]
pub struct CorrelationIdProvider {
    source: Arc<dyn IdSource>,
}

impl Default for CorrelationIdProvider {
    fn default() -> Self {
        CorrelationIdProvider {
            source: Arc::new(UuidSource),
        }
    }
}

impl CorrelationIdProvider {
    pub fn new(source: Arc<dyn IdSource>) -> CorrelationIdProvider {
        CorrelationIdProvider { source }
    }

    /// Generate a correlation id, never failing and never blocking the
    /// request beyond the error log on the degraded path.
    pub async fn generate(&self) -> String {
        match self.source.try_generate() {
            Ok(id) => id,
            Err(err) => {
                // No correlation id exists yet, so this event goes out
                // with blank request metadata.
                let _ = default_logger()
                    .error(
                        &RequestContext::new(),
                        "failed to generate unique correlation id",
                        vec![Attr::new("error", err.to_string())],
                    )
                    .await;
                fallback_id(FALLBACK_ID_LENGTH)
            }
        }
    }
}

fn fallback_id(length: usize) -> String {
    let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..FALLBACK_CHARSET.len());
            FALLBACK_CHARSET[idx] as char
        })
        .collect()
}
