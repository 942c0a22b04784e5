use crate::error::{Result, ShortenerError};
use crate::model::{CreatedUrl, HitCount, Resolution};
use crate::shortener::Shortener;
use async_trait::async_trait;
use linkstat_core::keys::{mapping_key, SEQUENCE_KEY};
use linkstat_core::{Clock, CounterStore, ShortCode, SystemClock};
use linkstat_stats::{StatsEngine, StatsError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Initial value of the identifier sequence.
///
/// Allocation increments before returning, so the first identifier handed
/// out is one above this and every code starts at four characters.
pub const DEFAULT_SEQUENCE_SEED: u64 = 1_001_001;

#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ServiceSettings {
    /// Value the identifier sequence is seeded with if it does not exist yet.
    #[builder(default = DEFAULT_SEQUENCE_SEED)]
    pub sequence_seed: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// All state lives in the [`CounterStore`]; the service itself holds nothing
/// that needs locking and can be shared freely between requests.
#[derive(Debug)]
pub struct ShortenerService<S, C = SystemClock> {
    store: Arc<S>,
    stats: StatsEngine<S, C>,
    settings: ServiceSettings,
}

impl<S: CounterStore> ShortenerService<S, SystemClock> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, ServiceSettings::default())
    }
}

impl<S: CounterStore, C: Clock> ShortenerService<S, C> {
    pub fn with_clock(store: S, clock: C, settings: ServiceSettings) -> Self {
        let store = Arc::new(store);
        Self {
            stats: StatsEngine::with_clock(Arc::clone(&store), clock),
            store,
            settings,
        }
    }

    /// Seeds the identifier sequence. Call once at startup.
    ///
    /// Returns `true` if the seed was written, `false` if the sequence
    /// already existed and was left alone.
    pub async fn initialize(&self) -> Result<bool> {
        let seeded = self
            .store
            .set_if_absent(SEQUENCE_KEY, self.settings.sequence_seed)
            .await?;
        if seeded {
            info!(seed = self.settings.sequence_seed, "seeded identifier sequence");
        } else {
            debug!("identifier sequence already present");
        }
        Ok(seeded)
    }

    /// Returns the stats engine sharing this service's store.
    pub fn stats(&self) -> &StatsEngine<S, C> {
        &self.stats
    }
}

#[async_trait]
impl<S: CounterStore, C: Clock> Shortener for ShortenerService<S, C> {
    async fn create_short_url(&self, long_url: &str) -> Result<CreatedUrl> {
        let identifier = self.store.allocate_next_id(SEQUENCE_KEY).await?;
        self.store.put(&mapping_key(identifier), long_url).await?;
        let short_code = ShortCode::from_identifier(identifier);

        info!(identifier, code = %short_code, url = %long_url, "created short url");

        Ok(CreatedUrl {
            identifier,
            short_code,
            long_url: long_url.to_string(),
        })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Resolution> {
        let identifier = code.identifier().map_err(|e| {
            debug!(code = %code, error = %e, "short code does not decode");
            ShortenerError::NotFound(code.to_string())
        })?;

        let Some(long_url) = self.store.get(&mapping_key(identifier)).await? else {
            debug!(code = %code, identifier, "short code not issued");
            return Err(ShortenerError::NotFound(code.to_string()));
        };

        let hit = self.stats.record_hit(identifier).await;
        if let Err(ref e) = hit {
            warn!(code = %code, identifier, error = %e, "failed to record hit");
        }

        info!(code = %code, url = %long_url, "resolved short code");
        Ok(Resolution { long_url, hit })
    }

    async fn get_hit_count(&self, code: &ShortCode, window: &str) -> Result<HitCount> {
        let identifier = match code.identifier() {
            Ok(identifier) => identifier,
            Err(e) => {
                debug!(code = %code, error = %e, "short code does not decode");
                return Ok(HitCount::Unavailable);
            }
        };

        match self.stats.read_hits_by_name(identifier, window).await {
            Ok(hits) => Ok(HitCount::Count(hits)),
            Err(StatsError::UnknownWindow(e)) => {
                debug!(code = %code, error = %e, "hit count requested for unknown window");
                Ok(HitCount::Unavailable)
            }
            Err(StatsError::Store(e)) => Err(e.into()),
        }
    }
}
