//! Synchronous client for the property backend's **market-trend** endpoint.
//!
//! Only `GET /api/properties/{id}/market-trend` is covered. The response is decoded into
//! [`MarketTrendDoc`]; turning it into a chartable series is left to the caller so that
//! contract violations surface as [`crate::ChartError::MalformedSeries`].
//!
//! ### Notes
//! - Authentication is an opaque bearer token handed in by the caller.
//! - Transient failures (5xx, network) are retried a few times with a short backoff.
//!
//! Typical usage:
//! ```no_run
//! # use trendchart::{Client, TrendSeries};
//! let client = Client::new("https://api.example.com")?.with_token("secret");
//! let doc = client.fetch_market_trend("42")?;
//! let series = TrendSeries::try_from(doc)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::MarketTrendDoc;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    token: Option<String>,
    http: HttpClient,
}

// Allow -, _, . unescaped in path segments (UUIDs and numeric ids pass through)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    /// Build a client for `base_url`. Fails only if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("trendchart/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        })
    }

    /// Attach a bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    /// URL of the market-trend resource for `property_id`.
    pub fn market_trend_url(&self, property_id: &str) -> String {
        format!(
            "{}/api/properties/{}/market-trend",
            self.base_url,
            enc_segment(property_id)
        )
    }

    /// Fetch the market-trend document of one property.
    ///
    /// ### Errors
    /// - empty property id
    /// - network/HTTP error (after retries for 5xx and transport failures)
    /// - JSON decoding error
    pub fn fetch_market_trend(&self, property_id: &str) -> Result<MarketTrendDoc> {
        if property_id.trim().is_empty() {
            bail!("property id required");
        }
        let url = self.market_trend_url(property_id);

        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            let mut req = self.http.get(&url);
            if let Some(token) = &self.token {
                req = req.bearer_auth(token);
            }
            debug!("GET {url}");
            match req.send() {
                Ok(r) if r.status().is_success() => {
                    return r
                        .json::<MarketTrendDoc>()
                        .with_context(|| format!("decode market trend from {url}"));
                }
                Ok(r) if r.status().is_server_error() => {
                    warn!("GET {url} returned HTTP {}, retrying", r.status());
                    last_err = Some(anyhow::anyhow!("HTTP {}", r.status()));
                }
                Ok(r) => bail!("GET {} failed with HTTP {}", url, r.status()),
                Err(e) => {
                    warn!("GET {url} failed: {e}, retrying");
                    last_err = Some(e.into());
                }
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        bail!("network error for GET {}: {:?}", url, last_err);
    }
}
