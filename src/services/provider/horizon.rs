//! Horizon REST and event-stream client.

use std::{pin::Pin, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use super::{categorize_status, ProviderError};
use crate::{
    config::ClientConfig,
    constants::{
        DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS, DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST,
        DEFAULT_HTTP_CLIENT_TCP_KEEPALIVE_SECONDS,
    },
    models::{
        AccountId, AccountResponse, Asset, HorizonErrorResponse, HorizonPage, OfferResponse,
        OrderBookResponse, PageRequest, SubmitTransactionResponse, TradeAggregationQuery,
        TradeAggregationResponse, TradeResponse,
    },
    utils::{join_url, mask_url},
};

/// Raw body chunks of a `text/event-stream` response.
pub type EventByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

#[async_trait]
#[cfg_attr(test, automock)]
pub trait HorizonProviderTrait: Send + Sync {
    /// Account record, or `None` when the account does not exist.
    async fn get_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountResponse>, ProviderError>;
    /// Posts a base64 envelope. Rejections carrying a result XDR come back as
    /// [`ProviderError::TransactionRejected`].
    async fn submit_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SubmitTransactionResponse, ProviderError>;
    async fn get_account_trades(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<TradeResponse>, ProviderError>;
    async fn get_account_offers(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<OfferResponse>, ProviderError>;
    async fn get_offer_trades(
        &self,
        offer_id: i64,
        page: &PageRequest,
    ) -> Result<Vec<TradeResponse>, ProviderError>;
    async fn get_order_book(
        &self,
        selling: &Asset,
        buying: &Asset,
        limit: Option<u32>,
    ) -> Result<OrderBookResponse, ProviderError>;
    async fn get_trade_aggregations(
        &self,
        query: &TradeAggregationQuery,
    ) -> Result<Vec<TradeAggregationResponse>, ProviderError>;
    /// Asks the test-network faucet to create and fund `account_id`.
    async fn fund_account(&self, account_id: &AccountId) -> Result<(), ProviderError>;
    /// Opens an event stream on `path` (e.g. `accounts/G…/trades`) resuming
    /// after `cursor`.
    async fn open_stream(&self, path: &str, cursor: &str)
        -> Result<EventByteStream, ProviderError>;
}

#[derive(Clone, Debug)]
pub struct HorizonProvider {
    base_url: String,
    friendbot_url: Option<String>,
    client: Client,
    /// Same pool settings, but no overall timeout so streams stay open.
    stream_client: Client,
}

impl HorizonProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ProviderError::NetworkConfiguration(format!(
                "Invalid Horizon URL: '{}'",
                base_url
            )));
        }

        let client = Self::client_builder().timeout(timeout).build().map_err(|e| {
            ProviderError::NetworkConfiguration(format!("Failed to create HTTP client: {}", e))
        })?;
        let stream_client = Self::client_builder().build().map_err(|e| {
            ProviderError::NetworkConfiguration(format!("Failed to create stream client: {}", e))
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            friendbot_url: None,
            client,
            stream_client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ProviderError> {
        let provider = Self::new(&config.network.horizon_url, config.http_timeout)?;
        Ok(match &config.network.friendbot_url {
            Some(url) => provider.with_friendbot(url),
            None => provider,
        })
    }

    pub fn with_friendbot(mut self, url: &str) -> Self {
        self.friendbot_url = Some(url.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client_builder() -> reqwest::ClientBuilder {
        Client::builder()
            .connect_timeout(Duration::from_secs(
                DEFAULT_HTTP_CLIENT_CONNECT_TIMEOUT_SECONDS,
            ))
            .pool_max_idle_per_host(DEFAULT_HTTP_CLIENT_POOL_MAX_IDLE_PER_HOST)
            .tcp_keepalive(Duration::from_secs(DEFAULT_HTTP_CLIENT_TCP_KEEPALIVE_SECONDS))
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Turns a non-success response into the matching error, keeping the
    /// problem document of rejected transactions.
    async fn error_from_response(response: Response) -> ProviderError {
        let status_code = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<HorizonErrorResponse>(&text) {
            Ok(body) if (400..500).contains(&status_code) && body.result_xdr().is_some() => {
                ProviderError::TransactionRejected {
                    status_code,
                    body: Box::new(body),
                }
            }
            Ok(body) => {
                let message = body.detail.or(body.title).unwrap_or(text);
                categorize_status(status_code, message)
            }
            Err(_) => categorize_status(status_code, text),
        }
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<T>, ProviderError> {
        let url = self.url(path);
        debug!(url = %mask_url(&url), "horizon GET");

        let response = self.client.get(&url).query(query).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ProviderError> {
        self.get_optional(path, query)
            .await?
            .ok_or_else(|| ProviderError::RequestError {
                error: format!("resource '{}' not found", path),
                status_code: 404,
            })
    }

    async fn get_records<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let page: HorizonPage<T> = self.get_json(path, query).await?;
        Ok(page.into_records())
    }
}

#[async_trait]
impl HorizonProviderTrait for HorizonProvider {
    async fn get_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountResponse>, ProviderError> {
        self.get_optional(&format!("accounts/{}", account_id.address()), &[])
            .await
    }

    async fn submit_transaction(
        &self,
        envelope_xdr: &str,
    ) -> Result<SubmitTransactionResponse, ProviderError> {
        let url = self.url("transactions");
        debug!(url = %mask_url(&url), "submitting transaction");

        let response = self
            .client
            .post(&url)
            .form(&[("tx", envelope_xdr)])
            .send()
            .await?;
        if !response.status().is_success() {
            let error = Self::error_from_response(response).await;
            warn!(error = %error, "transaction submission failed");
            return Err(error);
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_account_trades(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<TradeResponse>, ProviderError> {
        self.get_records(&format!("accounts/{}/trades", account_id.address()), &page.query())
            .await
    }

    async fn get_account_offers(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<OfferResponse>, ProviderError> {
        self.get_records(&format!("accounts/{}/offers", account_id.address()), &page.query())
            .await
    }

    async fn get_offer_trades(
        &self,
        offer_id: i64,
        page: &PageRequest,
    ) -> Result<Vec<TradeResponse>, ProviderError> {
        self.get_records(&format!("offers/{}/trades", offer_id), &page.query())
            .await
    }

    async fn get_order_book(
        &self,
        selling: &Asset,
        buying: &Asset,
        limit: Option<u32>,
    ) -> Result<OrderBookResponse, ProviderError> {
        let mut query = selling.horizon_params("selling");
        query.extend(buying.horizon_params("buying"));
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        self.get_json("order_book", &query).await
    }

    async fn get_trade_aggregations(
        &self,
        query: &TradeAggregationQuery,
    ) -> Result<Vec<TradeAggregationResponse>, ProviderError> {
        self.get_records("trade_aggregations", &query.query()).await
    }

    async fn fund_account(&self, account_id: &AccountId) -> Result<(), ProviderError> {
        let Some(friendbot_url) = &self.friendbot_url else {
            return Err(ProviderError::NetworkConfiguration(
                "friendbot is only available on test networks".to_string(),
            ));
        };
        debug!(account = %account_id, "requesting friendbot funding");

        let response = self
            .client
            .get(friendbot_url)
            .query(&[("addr", account_id.address())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn open_stream(
        &self,
        path: &str,
        cursor: &str,
    ) -> Result<EventByteStream, ProviderError> {
        let url = self.url(path);
        debug!(url = %mask_url(&url), cursor, "opening event stream");

        let response = self
            .stream_client
            .get(&url)
            .query(&[("cursor", cursor)])
            .header(header::ACCEPT, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(ProviderError::from)),
        ))
    }
}
