//! Exchange-facing client surface.
//!
//! [`ExchangeService`] is what a trading engine talks to: account state,
//! offer placement with trust-line remediation, order books, trade history
//! and aggregations, and live trade/offer streams.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    config::ClientConfig,
    constants::{DEFAULT_ORDER_BOOK_LIMIT, HORIZON_MAX_PAGE_LIMIT},
    models::{
        AccountDetails, AccountId, Amount, Asset, Keypair, ManageSellOfferOp, Offer, OfferStatus,
        OfferTrade, Operation, OrderBook, PageRequest, Price, SubmissionError, Trade,
        TradeAggregation, TradeAggregationQuery, Transaction, TransactionError, ValueError,
    },
    services::{
        provider::{HorizonProvider, HorizonProviderTrait, ProviderError},
        stream::EventStream,
        submission::TransactionSubmitter,
    },
};

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ValueError),
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Parameters of a sell offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRequest {
    pub selling: Asset,
    pub amount: Amount,
    pub buying: Asset,
    /// Units of `buying` per unit of `selling`.
    pub price: Price,
    /// Offer to update or cancel; a new offer when `None`.
    pub existing_offer_id: Option<u64>,
    pub cancel: bool,
}

impl OfferRequest {
    pub fn new(selling: Asset, amount: Amount, buying: Asset, price: Price) -> Self {
        Self {
            selling,
            amount,
            buying,
            price,
            existing_offer_id: None,
            cancel: false,
        }
    }

    pub fn update(mut self, offer_id: u64) -> Self {
        self.existing_offer_id = Some(offer_id);
        self
    }

    pub fn cancel(mut self, offer_id: u64) -> Self {
        self.existing_offer_id = Some(offer_id);
        self.cancel = true;
        self
    }

    fn operation(&self) -> Result<ManageSellOfferOp, ExchangeError> {
        if self.selling == self.buying {
            return Err(ExchangeError::InvalidRequest(
                "selling and buying assets must differ".to_string(),
            ));
        }
        if self.amount.is_negative() {
            return Err(ExchangeError::InvalidRequest(format!(
                "negative amount {}",
                self.amount
            )));
        }

        match (self.cancel, self.existing_offer_id) {
            (true, None) => Err(ExchangeError::InvalidRequest(
                "cancelling requires an offer id".to_string(),
            )),
            (true, Some(offer_id)) => Ok(ManageSellOfferOp::cancel(
                self.selling.clone(),
                self.buying.clone(),
                self.price,
                offer_id,
            )),
            (false, offer_id) => Ok(ManageSellOfferOp {
                selling: self.selling.clone(),
                buying: self.buying.clone(),
                amount: self.amount,
                price: self.price,
                offer_id: offer_id.unwrap_or(0),
            }),
        }
    }
}

pub struct ExchangeService<P>
where
    P: HorizonProviderTrait,
{
    provider: Arc<P>,
    submitter: TransactionSubmitter<P>,
    config: ClientConfig,
}

impl ExchangeService<HorizonProvider> {
    pub fn from_config(config: ClientConfig) -> Result<Self, ProviderError> {
        let provider = HorizonProvider::from_config(&config)?;
        Ok(Self::new(Arc::new(provider), config))
    }
}

impl<P> ExchangeService<P>
where
    P: HorizonProviderTrait,
{
    pub fn new(provider: Arc<P>, config: ClientConfig) -> Self {
        Self {
            submitter: TransactionSubmitter::new(provider.clone(), config.clone()),
            provider,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn submitter(&self) -> &TransactionSubmitter<P> {
        &self.submitter
    }

    /// Account balances, signers and data, or `None` if it does not exist.
    pub async fn get_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<AccountDetails>, ExchangeError> {
        match self.provider.get_account(account_id).await? {
            Some(raw) => Ok(Some(AccountDetails::try_from(raw)?)),
            None => Ok(None),
        }
    }

    /// Native balance the account must keep under the configured reserve policy.
    pub fn minimum_balance(&self, account: &AccountDetails) -> Amount {
        account.minimum_balance(&self.config.reserve)
    }

    /// Places, updates or cancels a sell offer signed by `signer`.
    ///
    /// # Returns
    ///
    /// The offer outcome, or `None` when the accepted transaction carried no
    /// manage-offer result.
    pub async fn submit_offer(
        &self,
        signer: &Keypair,
        request: &OfferRequest,
    ) -> Result<Option<OfferTrade>, ExchangeError> {
        let operation = request.operation()?;
        let mut transaction = Transaction::new(*signer.account_id())
            .with_base_fee(self.config.network.base_fee)
            .with_operation(Operation::new(operation.clone()))?;

        info!(
            account = %signer.account_id(),
            offer = %operation,
            "submitting offer"
        );
        let submitted = self
            .submitter
            .submit_with_trust_remediation(&mut transaction, &[signer])
            .await?;

        let trade = OfferTrade::from_submission(&operation, &submitted);
        match &trade {
            Some(trade) => info!(trade = %trade, "offer submitted"),
            None => warn!(hash = %submitted.hash, "accepted transaction has no offer result"),
        }
        Ok(trade)
    }

    /// Bids and asks for `selling` priced in `buying`.
    pub async fn get_order_book(
        &self,
        selling: &Asset,
        buying: &Asset,
        depth: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let depth = depth
            .unwrap_or(DEFAULT_ORDER_BOOK_LIMIT)
            .min(HORIZON_MAX_PAGE_LIMIT);
        let raw = self
            .provider
            .get_order_book(selling, buying, Some(depth))
            .await?;
        Ok(OrderBook::try_from(raw)?)
    }

    /// OHLC buckets between `start_ms` and `end_ms`, oldest first.
    pub async fn get_trade_aggregations(
        &self,
        base: &Asset,
        counter: &Asset,
        start_ms: i64,
        end_ms: i64,
        resolution_ms: i64,
    ) -> Result<Vec<TradeAggregation>, ExchangeError> {
        if resolution_ms <= 0 || end_ms < start_ms {
            return Err(ExchangeError::InvalidRequest(format!(
                "invalid aggregation window {}..{} / {}",
                start_ms, end_ms, resolution_ms
            )));
        }
        let query = TradeAggregationQuery::new(
            base.clone(),
            counter.clone(),
            start_ms,
            end_ms,
            resolution_ms,
        );
        self.provider
            .get_trade_aggregations(&query)
            .await?
            .into_iter()
            .map(|raw| TradeAggregation::try_from(raw).map_err(ExchangeError::from))
            .collect()
    }

    pub async fn account_trades(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.provider
            .get_account_trades(account_id, page)
            .await?
            .into_iter()
            .map(|raw| Trade::try_from(raw).map_err(ExchangeError::from))
            .collect()
    }

    pub async fn account_offers(
        &self,
        account_id: &AccountId,
        page: &PageRequest,
    ) -> Result<Vec<Offer>, ExchangeError> {
        self.provider
            .get_account_offers(account_id, page)
            .await?
            .into_iter()
            .map(|raw| Offer::try_from(raw).map_err(ExchangeError::from))
            .collect()
    }

    pub async fn offer_trades(
        &self,
        offer_id: i64,
        page: &PageRequest,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.provider
            .get_offer_trades(offer_id, page)
            .await?
            .into_iter()
            .map(|raw| Trade::try_from(raw).map_err(ExchangeError::from))
            .collect()
    }

    /// Fills of `offer_id` and whether `account_id` still has it open.
    pub async fn offer_status(
        &self,
        account_id: &AccountId,
        offer_id: i64,
    ) -> Result<OfferStatus, ExchangeError> {
        let page = PageRequest {
            limit: Some(HORIZON_MAX_PAGE_LIMIT),
            ..Default::default()
        };
        let trades = self.offer_trades(offer_id, &page).await?;
        let is_open = self
            .account_offers(account_id, &page)
            .await?
            .iter()
            .any(|offer| offer.id == offer_id);

        Ok(OfferStatus {
            offer_id,
            trades,
            is_open,
        })
    }

    /// Creates and funds `account_id` through the test network faucet.
    pub async fn fund_test_account(&self, account_id: &AccountId) -> Result<(), ExchangeError> {
        if !self.config.network.is_testnet() {
            return Err(ExchangeError::InvalidRequest(format!(
                "funding is not available on {}",
                self.config.network.name
            )));
        }
        self.provider.fund_account(account_id).await?;
        info!(account = %account_id, "test account funded");
        Ok(())
    }

    /// Delivers every trade of `account_id` after `cursor` until `shutdown`
    /// turns true. The handler gets each trade with its event id.
    pub async fn stream_trades<F>(
        &self,
        account_id: &AccountId,
        cursor: &str,
        shutdown: watch::Receiver<bool>,
        mut handler: F,
    ) -> String
    where
        F: FnMut(&str, Trade) + Send,
    {
        let path = format!("accounts/{}/trades", account_id.address());
        let mut stream =
            EventStream::new(self.provider.clone(), &path, cursor, self.config.stream_retry);
        stream
            .run(shutdown, |cursor: &str, raw: crate::models::TradeResponse| {
                match Trade::try_from(raw) {
                    Ok(trade) => handler(cursor, trade),
                    Err(e) => warn!(cursor, error = %e, "skipping malformed trade"),
                }
            })
            .await;
        stream.cursor().to_string()
    }

    /// Same as [`ExchangeService::stream_trades`] for the account's offers.
    pub async fn stream_offers<F>(
        &self,
        account_id: &AccountId,
        cursor: &str,
        shutdown: watch::Receiver<bool>,
        mut handler: F,
    ) -> String
    where
        F: FnMut(&str, Offer) + Send,
    {
        let path = format!("accounts/{}/offers", account_id.address());
        let mut stream =
            EventStream::new(self.provider.clone(), &path, cursor, self.config.stream_retry);
        stream
            .run(shutdown, |cursor: &str, raw: crate::models::OfferResponse| {
                match Offer::try_from(raw) {
                    Ok(offer) => handler(cursor, offer),
                    Err(e) => warn!(cursor, error = %e, "skipping malformed offer"),
                }
            })
            .await;
        stream.cursor().to_string()
    }
}
