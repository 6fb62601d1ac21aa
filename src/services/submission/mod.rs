//! Transaction submission.
//!
//! [`TransactionSubmitter`] owns the only network round trips of a
//! transaction's life: fetching the sequence number right before signing and
//! posting the signed envelope. Offers rejected for a missing trust line are
//! remediated once by opening the trust line and resubmitting.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    models::{
        AccountId, Asset, ChangeTrustOp, Keypair, MissingTrust, Operation, OperationBody,
        SubmissionError, SubmittedTransaction, Transaction, TransactionResult,
    },
    services::provider::{HorizonProviderTrait, ProviderError},
    xdr::XdrDecode,
};

pub struct TransactionSubmitter<P>
where
    P: HorizonProviderTrait,
{
    provider: Arc<P>,
    config: ClientConfig,
}

impl<P> TransactionSubmitter<P>
where
    P: HorizonProviderTrait,
{
    pub fn new(provider: Arc<P>, config: ClientConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn network_passphrase(&self) -> &str {
        &self.config.network.passphrase
    }

    /// Fetches the source account's current sequence, sets `sequence + 1` on
    /// the transaction and signs it with every signer.
    ///
    /// The transaction must still be building; clear earlier signatures first
    /// to re-sign.
    pub async fn refresh_sequence_and_sign(
        &self,
        transaction: &mut Transaction,
        signers: &[&Keypair],
    ) -> Result<(), SubmissionError> {
        let source = *transaction.source_account();
        let account = self
            .provider
            .get_account(&source)
            .await?
            .ok_or_else(|| SubmissionError::AccountNotFound(source.address()))?;

        let next = account.sequence.checked_add(1).ok_or_else(|| {
            SubmissionError::UnexpectedResponse(format!(
                "sequence {} of {} cannot be incremented",
                account.sequence, source
            ))
        })?;
        transaction.set_sequence(next)?;
        transaction.sign(signers, self.network_passphrase())?;

        debug!(account = %source, sequence = next, "sequence refreshed and signed");
        Ok(())
    }

    /// Posts a signed transaction once.
    ///
    /// A rejection with a decodable result becomes
    /// [`SubmissionError::Rejected`]; on success the transaction is marked
    /// submitted.
    pub async fn submit(
        &self,
        transaction: &mut Transaction,
    ) -> Result<SubmittedTransaction, SubmissionError> {
        let envelope_xdr = transaction.to_envelope_xdr_base64()?;

        match self.provider.submit_transaction(&envelope_xdr).await {
            Ok(response) => {
                let submitted = SubmittedTransaction::try_from(response)?;
                transaction.mark_submitted()?;
                info!(
                    hash = %submitted.hash,
                    ledger = submitted.ledger,
                    fee = %submitted.result.fee_charged,
                    "transaction accepted"
                );
                Ok(submitted)
            }
            Err(ProviderError::TransactionRejected { body, .. }) => {
                let result_xdr = body.result_xdr().ok_or_else(|| {
                    SubmissionError::UnexpectedResponse(
                        "rejection without result_xdr".to_string(),
                    )
                })?;
                let result = TransactionResult::from_xdr_base64(result_xdr)?;
                warn!(
                    code = %result.code,
                    operations = ?result.operation_codes(),
                    "transaction rejected"
                );
                Err(SubmissionError::Rejected {
                    code: result.code,
                    result: Box::new(result),
                    envelope_xdr,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Refreshes the sequence, signs and submits.
    ///
    /// When an offer fails because the account does not trust the bought or
    /// sold asset, a change-trust transaction is submitted with the same
    /// signers and the original transaction is re-signed and submitted one
    /// more time. Any failure of that second attempt is returned as is.
    pub async fn submit_with_trust_remediation(
        &self,
        transaction: &mut Transaction,
        signers: &[&Keypair],
    ) -> Result<SubmittedTransaction, SubmissionError> {
        self.refresh_sequence_and_sign(transaction, signers).await?;

        let error = match self.submit(transaction).await {
            Ok(submitted) => return Ok(submitted),
            Err(error) => error,
        };

        let Some((owner, asset)) = error
            .result()
            .and_then(|result| result.missing_trust())
            .and_then(|(index, side)| untrusted_asset(transaction, index, side))
        else {
            return Err(error);
        };

        info!(account = %owner, asset = %asset, "opening missing trust line");
        self.open_trust_line(owner, asset, signers).await?;

        transaction.clear_signatures()?;
        self.refresh_sequence_and_sign(transaction, signers).await?;
        self.submit(transaction).await
    }

    /// Submits a single change-trust operation for `asset` on `account`.
    pub async fn open_trust_line(
        &self,
        account: AccountId,
        asset: Asset,
        signers: &[&Keypair],
    ) -> Result<SubmittedTransaction, SubmissionError> {
        let operation = Operation::new(ChangeTrustOp {
            line: asset,
            limit: self.config.trust_line_limit,
        });
        let mut transaction = Transaction::new(account)
            .with_base_fee(self.config.network.base_fee)
            .with_operation(operation)?;

        self.refresh_sequence_and_sign(&mut transaction, signers)
            .await?;
        self.submit(&mut transaction).await
    }
}

/// Account and asset of the offer at `index` that lacks a trust line.
fn untrusted_asset(
    transaction: &Transaction,
    index: usize,
    side: MissingTrust,
) -> Option<(AccountId, Asset)> {
    let operation = transaction.operations().get(index)?;
    let (selling, buying) = match &operation.body {
        OperationBody::ManageSellOffer(op) => (&op.selling, &op.buying),
        OperationBody::ManageBuyOffer(op) => (&op.selling, &op.buying),
        _ => return None,
    };
    let asset = match side {
        MissingTrust::Selling => selling,
        MissingTrust::Buying => buying,
    };
    if asset.is_native() {
        return None;
    }
    let owner = operation
        .source_account
        .unwrap_or(*transaction.source_account());
    Some((owner, asset.clone()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::NetworkConfig,
        models::{
            AccountResponse, Amount, HorizonErrorExtras, HorizonErrorResponse, ManageOfferResult,
            ManageOfferResultCode, ManageSellOfferOp, OperationInnerResult, OperationResult,
            Price, SubmitTransactionResponse, TransactionResultCode, TransactionStatus,
        },
        services::provider::MockHorizonProviderTrait,
        xdr::XdrEncode,
    };
    use futures::future::ready;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    pub(crate) fn account_response(address: &str, sequence: i64) -> AccountResponse {
        AccountResponse {
            account_id: address.to_string(),
            sequence,
            subentry_count: 0,
            thresholds: None,
            balances: Vec::new(),
            signers: Vec::new(),
            data: Default::default(),
        }
    }

    pub(crate) fn success_response(hash: &str) -> SubmitTransactionResponse {
        let result = TransactionResult {
            fee_charged: Amount::from_stroops(100),
            code: TransactionResultCode::Success,
            results: Vec::new(),
        };
        SubmitTransactionResponse {
            hash: hash.to_string(),
            ledger: 7,
            envelope_xdr: "AAAA".to_string(),
            result_xdr: result.to_xdr_base64().unwrap(),
        }
    }

    pub(crate) fn rejection(result: TransactionResult) -> ProviderError {
        ProviderError::TransactionRejected {
            status_code: 400,
            body: Box::new(HorizonErrorResponse {
                error_type: None,
                title: Some("Transaction Failed".to_string()),
                status: Some(400),
                detail: None,
                extras: Some(HorizonErrorExtras {
                    envelope_xdr: None,
                    result_xdr: Some(result.to_xdr_base64().unwrap()),
                    result_codes: None,
                }),
            }),
        }
    }

    pub(crate) fn missing_trust_result() -> TransactionResult {
        TransactionResult {
            fee_charged: Amount::from_stroops(100),
            code: TransactionResultCode::Failed,
            results: vec![OperationResult::Inner(OperationInnerResult::ManageSellOffer(
                ManageOfferResult::Failed(ManageOfferResultCode::BuyNoTrust),
            ))],
        }
    }

    fn usd(issuer: &Keypair) -> Asset {
        Asset::credit("USD", *issuer.account_id()).unwrap()
    }

    fn offer_transaction(signer: &Keypair, buying: Asset) -> Transaction {
        Transaction::new(*signer.account_id())
            .with_operation(Operation::new(ManageSellOfferOp {
                selling: Asset::Native,
                buying,
                amount: Amount::from_stroops(1_005_000_000),
                price: Price::new(1, 5).unwrap(),
                offer_id: 0,
            }))
            .unwrap()
    }

    fn submitter(mock: MockHorizonProviderTrait) -> TransactionSubmitter<MockHorizonProviderTrait> {
        TransactionSubmitter::new(Arc::new(mock), ClientConfig::new(NetworkConfig::testnet()))
    }

    #[tokio::test]
    async fn test_refresh_sequence_and_sign_uses_next_sequence() {
        let signer = Keypair::random();
        let address = signer.address();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .times(1)
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 41))))));

        let submitter = submitter(mock);
        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        submitter
            .refresh_sequence_and_sign(&mut tx, &[&signer])
            .await
            .unwrap();

        assert_eq!(tx.sequence(), 42);
        assert_eq!(tx.status(), TransactionStatus::Signed);
        assert!(tx
            .is_signed_by(&signer, submitter.network_passphrase())
            .unwrap());
    }

    #[tokio::test]
    async fn test_refresh_sequence_missing_account() {
        let signer = Keypair::random();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .returning(|_| Box::pin(ready(Ok(None))));

        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        let err = submitter(mock)
            .refresh_sequence_and_sign(&mut tx, &[&signer])
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::AccountNotFound(a) if a == signer.address()));
        assert_eq!(tx.status(), TransactionStatus::Building);
    }

    #[tokio::test]
    async fn test_submit_success_marks_submitted() {
        let signer = Keypair::random();
        let address = signer.address();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 1))))));
        mock.expect_submit_transaction()
            .times(1)
            .returning(|_| Box::pin(ready(Ok(success_response("feedface")))));

        let submitter = submitter(mock);
        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        let submitted = submitter
            .submit_with_trust_remediation(&mut tx, &[&signer])
            .await
            .unwrap();

        assert_eq!(submitted.hash, "feedface");
        assert!(submitted.result.is_success());
        assert_eq!(tx.status(), TransactionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_other_rejection_is_not_remediated() {
        let signer = Keypair::random();
        let address = signer.address();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .times(1)
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 1))))));
        mock.expect_submit_transaction().times(1).returning(|_| {
            Box::pin(ready(Err(rejection(TransactionResult {
                fee_charged: Amount::from_stroops(100),
                code: TransactionResultCode::BadSeq,
                results: Vec::new(),
            }))))
        });

        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        let err = submitter(mock)
            .submit_with_trust_remediation(&mut tx, &[&signer])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Rejected {
                code: TransactionResultCode::BadSeq,
                ..
            }
        ));
        assert_eq!(tx.status(), TransactionStatus::Signed);
    }

    #[tokio::test]
    async fn test_missing_trust_opens_line_and_resubmits() {
        let signer = Keypair::random();
        let address = signer.address();
        let issuer = Keypair::random();
        let asset = usd(&issuer);

        let submitted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .times(3)
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 10))))));
        let calls = AtomicUsize::new(0);
        let seen = submitted.clone();
        mock.expect_submit_transaction()
            .times(3)
            .returning(move |envelope| {
                seen.lock().unwrap().push(envelope.to_string());
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Box::pin(ready(Err(rejection(missing_trust_result())))),
                    1 => Box::pin(ready(Ok(success_response("trust")))),
                    _ => Box::pin(ready(Ok(success_response("offer")))),
                }
            });

        let submitter = submitter(mock);
        let mut tx = offer_transaction(&signer, asset.clone());
        let result = submitter
            .submit_with_trust_remediation(&mut tx, &[&signer])
            .await
            .unwrap();
        assert_eq!(result.hash, "offer");
        assert_eq!(tx.status(), TransactionStatus::Submitted);

        let envelopes = submitted.lock().unwrap();
        let trust_tx = Transaction::from_envelope_xdr_base64(&envelopes[1]).unwrap();
        match &trust_tx.operations()[0].body {
            OperationBody::ChangeTrust(op) => {
                assert_eq!(op.line, asset);
                assert_eq!(op.limit, submitter.config().trust_line_limit);
            }
            other => panic!("expected change trust, got {}", other),
        }
        assert!(trust_tx
            .is_signed_by(&signer, submitter.network_passphrase())
            .unwrap());

        let resubmitted = Transaction::from_envelope_xdr_base64(&envelopes[2]).unwrap();
        assert_eq!(resubmitted.signatures().len(), 1);
        assert_eq!(resubmitted.sequence(), 11);
    }

    #[tokio::test]
    async fn test_repeated_missing_trust_is_bounded() {
        let signer = Keypair::random();
        let address = signer.address();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 10))))));
        let calls = AtomicUsize::new(0);
        mock.expect_submit_transaction()
            .times(3)
            .returning(move |_| match calls.fetch_add(1, Ordering::SeqCst) {
                1 => Box::pin(ready(Ok(success_response("trust")))),
                _ => Box::pin(ready(Err(rejection(missing_trust_result())))),
            });

        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        let err = submitter(mock)
            .submit_with_trust_remediation(&mut tx, &[&signer])
            .await
            .unwrap_err();

        let (index, side) = err.result().and_then(|r| r.missing_trust()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(side, MissingTrust::Buying);
    }

    #[tokio::test]
    async fn test_failed_trust_line_is_surfaced() {
        let signer = Keypair::random();
        let address = signer.address();
        let mut mock = MockHorizonProviderTrait::new();
        mock.expect_get_account()
            .times(2)
            .returning(move |_| Box::pin(ready(Ok(Some(account_response(&address, 10))))));
        let calls = AtomicUsize::new(0);
        mock.expect_submit_transaction()
            .times(2)
            .returning(move |_| match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Box::pin(ready(Err(rejection(missing_trust_result())))),
                _ => Box::pin(ready(Err(ProviderError::ServerError {
                    status_code: 503,
                    message: "unavailable".to_string(),
                }))),
            });

        let mut tx = offer_transaction(&signer, usd(&Keypair::random()));
        let err = submitter(mock)
            .submit_with_trust_remediation(&mut tx, &[&signer])
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Provider(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_untrusted_asset_picks_side() {
        let signer = Keypair::random();
        let asset = usd(&Keypair::random());
        let tx = offer_transaction(&signer, asset.clone());

        let (owner, found) = untrusted_asset(&tx, 0, MissingTrust::Buying).unwrap();
        assert_eq!(&owner, signer.account_id());
        assert_eq!(found, asset);
        // the native side never needs a trust line
        assert!(untrusted_asset(&tx, 0, MissingTrust::Selling).is_none());
        assert!(untrusted_asset(&tx, 1, MissingTrust::Buying).is_none());
    }
}
