//! Client for the public currency API (INR base).
//!
//! - Maintains a process-wide 24-hour snapshot cache behind an async mutex.
//! - Falls back through a secondary mirror, the last-known-good snapshot
//!   (in memory, then on disk), and finally the compiled-in table, so a
//!   rate request never fails outright.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use tokio::sync::Mutex;

use crate::domain::{LookupError, RateSnapshot, RateSource};
use crate::infra::cache::{load_snapshot_cache, save_snapshot_cache, SnapshotCache};

const PRIMARY_RATES_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/inr.json";
const FALLBACK_RATES_URL: &str = "https://latest.currency-api.pages.dev/v1/currencies/inr.json";
const CURRENCIES_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies.json";
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const USER_AGENT: &str = "landed-cost-estimator/0.1.0";

/// Currencies offered when the remote list cannot be fetched.
const DEFAULT_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "INR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "SGD",
];

#[derive(Debug, Error)]
pub enum ExchangeApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

/// The daily rate document: `inr` maps currency code to units of that
/// currency per 1 INR.
#[derive(Debug, Deserialize)]
struct RateDocumentDto {
    date: String,
    inr: HashMap<String, f64>,
}

fn snapshot_from_document(dto: RateDocumentDto) -> Result<RateSnapshot, ExchangeApiError> {
    let snapshot = RateSnapshot::from_inr_quotes(Some(dto.date), dto.inr);
    // The tariff table is USD-denominated; a table without a usable USD rate
    // is as good as no table.
    if snapshot.rate("USD").is_none() {
        return Err(ExchangeApiError::Api(
            "rate table is missing a USD rate".to_string(),
        ));
    }
    Ok(snapshot)
}

struct CachedSnapshot {
    snapshot: RateSnapshot,
    fetched_at: SystemTime,
}

impl CachedSnapshot {
    fn if_fresh(&self, ttl: Duration) -> Option<RateSnapshot> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(self.snapshot.clone())
        } else {
            None
        }
    }
}

#[derive(Clone)]
pub struct ExchangeRates {
    http: Client,
    primary_url: Url,
    fallback_url: Url,
    cache: Arc<Mutex<Option<CachedSnapshot>>>,
    ttl: Duration,
}

impl ExchangeRates {
    pub fn new() -> Result<Self, ExchangeApiError> {
        Self::with_urls(PRIMARY_RATES_URL, FALLBACK_RATES_URL)
    }

    pub fn with_urls(primary: &str, fallback: &str) -> Result<Self, ExchangeApiError> {
        let primary_url = Url::parse(primary)?;
        let fallback_url = Url::parse(fallback)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            primary_url,
            fallback_url,
            cache: Arc::new(Mutex::new(None)),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current rate snapshot. Serves the in-memory cache while fresh,
    /// otherwise refetches; on failure falls back to the last-known-good
    /// snapshot and finally the compiled-in table, so this never fails.
    pub async fn snapshot(&self) -> RateSnapshot {
        if let Some(fresh) = self.cached_fresh().await {
            return fresh;
        }

        // Cold start: a disk snapshot may save the network round trip, and
        // even an expired one is a better fallback than the built-in table.
        if !self.primed().await {
            if let Some(disk) = load_snapshot_cache() {
                let entry = CachedSnapshot {
                    snapshot: disk.snapshot.clone(),
                    fetched_at: UNIX_EPOCH + Duration::from_secs(disk.cached_at),
                };
                let fresh = entry.if_fresh(self.ttl);
                *self.cache.lock().await = Some(entry);
                if let Some(snapshot) = fresh {
                    println!(
                        "[rates] disk snapshot still fresh (age: {})",
                        disk.age_string()
                    );
                    return snapshot;
                }
            }
        }

        match self.fetch_remote().await {
            Ok(snapshot) => {
                println!(
                    "[rates] refreshed {} rates (date: {:?})",
                    snapshot.len(),
                    snapshot.published_on()
                );
                self.store(snapshot.clone()).await;
                snapshot
            }
            Err(error) => {
                println!("[rates] fetch failed: {error}");
                if let Some(stale) = self.cached_any().await {
                    println!("[rates] serving last-known-good snapshot");
                    return stale;
                }
                println!("[rates] no cached snapshot; using compiled-in fallback table");
                RateSnapshot::fallback()
            }
        }
    }

    /// Publication date of the cached snapshot, if any.
    pub async fn last_update(&self) -> Option<Date> {
        let cache = self.cache.lock().await;
        cache
            .as_ref()
            .and_then(|entry| entry.snapshot.published_on())
    }

    /// Currency codes the upstream can quote, uppercased and sorted. Falls
    /// back to a built-in list when the remote list is unreachable.
    pub async fn supported_currencies(&self) -> Vec<String> {
        match self.fetch_currency_codes().await {
            Ok(codes) => codes,
            Err(error) => {
                println!("[rates] currency list fetch failed: {error}; using built-in list");
                DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
            }
        }
    }

    async fn fetch_remote(&self) -> Result<RateSnapshot, ExchangeApiError> {
        match self.fetch_from(self.primary_url.clone()).await {
            Ok(snapshot) => Ok(snapshot),
            Err(error) => {
                println!("[rates] primary source failed: {error}; trying fallback source");
                self.fetch_from(self.fallback_url.clone()).await
            }
        }
    }

    async fn fetch_from(&self, url: Url) -> Result<RateSnapshot, ExchangeApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let dto: RateDocumentDto = response.json().await?;
        snapshot_from_document(dto)
    }

    async fn fetch_currency_codes(&self) -> Result<Vec<String>, ExchangeApiError> {
        let url = Url::parse(CURRENCIES_URL)?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        let table: HashMap<String, String> = response.json().await?;
        let mut codes: Vec<String> = table.keys().map(|c| c.to_ascii_uppercase()).collect();
        codes.sort();
        Ok(codes)
    }

    async fn primed(&self) -> bool {
        self.cache.lock().await.is_some()
    }

    async fn cached_fresh(&self) -> Option<RateSnapshot> {
        let cache = self.cache.lock().await;
        cache.as_ref().and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_any(&self) -> Option<RateSnapshot> {
        let cache = self.cache.lock().await;
        cache.as_ref().map(|entry| entry.snapshot.clone())
    }

    async fn store(&self, snapshot: RateSnapshot) {
        let fetched_at = SystemTime::now();
        {
            let mut cache = self.cache.lock().await;
            *cache = Some(CachedSnapshot {
                snapshot: snapshot.clone(),
                fetched_at,
            });
        }
        if let Err(error) = save_snapshot_cache(&SnapshotCache::new(snapshot)) {
            println!("[rates] warning: failed to persist snapshot: {error}");
        }
    }
}

impl RateSource for ExchangeRates {
    async fn rates(&self) -> Result<RateSnapshot, LookupError> {
        Ok(self.snapshot().await)
    }
}
