//! Rate-limited, retrying transaction lookup client.
//!
//! # Responsibilities
//! - Build `GET {endpoint}/{chain}/{txid}?apikey={key}` requests
//! - Wait for a rate limit slot before every attempt
//! - Decode the `{code, msg, data}` envelope and normalize the amount
//! - Retry transient network failures on a fixed schedule

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::api::normalize::normalize;
use crate::api::types::{
    is_transient, ApiEnvelope, ClientConfigError, QueryError, QueryOutcome, QueryResult,
};
use crate::config::ApiConfig;
use crate::observability::metrics;
use crate::resilience::{retry_with, RateLimiter, RetryPolicy};

/// Envelope code signalling success.
const API_SUCCESS_CODE: i64 = 1;

/// Lookup client owning the HTTP transport and the rate limiter.
pub struct QueryClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    chain_symbol: String,
    limiter: RateLimiter,
    retry_policy: RetryPolicy,
    classify: fn(&QueryError) -> bool,
}

impl QueryClient {
    /// Create a client from the `[api]` section and a limiter.
    pub fn new(config: &ApiConfig, limiter: RateLimiter) -> Result<Self, ClientConfigError> {
        let endpoint = Url::parse(config.endpoint.trim()).map_err(|e| ClientConfigError::Endpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ClientConfigError::Endpoint {
                endpoint: config.endpoint.clone(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::info!(
            endpoint = %endpoint,
            chain = %config.chain_symbol,
            quota = limiter.max_requests(),
            window_secs = limiter.window().as_secs(),
            "Query client initialized"
        );

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
            chain_symbol: config.chain_symbol.clone(),
            limiter,
            retry_policy: RetryPolicy::fixed(),
            classify: is_transient,
        })
    }

    /// Replace the retry schedule.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replace the transient/permanent classifier.
    pub fn with_classifier(mut self, classify: fn(&QueryError) -> bool) -> Self {
        self.classify = classify;
        self
    }

    /// Look up one transaction, retrying transient failures.
    pub async fn query(&self, tx_id: &str) -> QueryOutcome<QueryResult> {
        if tx_id.trim().is_empty() {
            return Err(QueryError::RequestConstruction("transaction id is empty".to_string()));
        }

        let result = retry_with(&self.retry_policy, self.classify, |attempt| {
            tracing::debug!(tx_id, attempt, "Querying transaction");
            self.query_once(tx_id)
        })
        .await;

        metrics::record_query(result.is_ok());
        result
    }

    async fn query_once(&self, tx_id: &str) -> QueryOutcome<QueryResult> {
        self.limiter.admit().await;

        let url = self.request_url(tx_id)?;
        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(QueryError::from_transport)?;

        if !status.is_success() {
            return Err(QueryError::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: ApiEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(QueryError::Decode {
                    message: e.to_string(),
                    body,
                })
            }
        };

        if envelope.code != API_SUCCESS_CODE {
            return Err(QueryError::Api {
                code: envelope.code,
                message: envelope.msg,
            });
        }

        let record = envelope.data.unwrap_or_default();
        let amount = normalize(&record)?;

        Ok(QueryResult::success(tx_id, amount))
    }

    fn request_url(&self, tx_id: &str) -> QueryOutcome<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| QueryError::RequestConstruction(format!("endpoint {} cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .push(&self.chain_symbol)
            .push(tx_id);
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }

    pub fn chain_symbol(&self) -> &str {
        &self.chain_symbol
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("chain_symbol", &self.chain_symbol)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}
