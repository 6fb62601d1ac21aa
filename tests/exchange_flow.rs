//! End-to-end exchange flows against a local Horizon stand-in.

use std::{sync::Arc, time::Duration};

use galactic_horizon::{
    config::{ClientConfig, NetworkConfig},
    models::{
        AccountId, Amount, Asset, ClaimOfferAtom, Keypair, ManageOfferEffect, ManageOfferResult,
        ManageOfferSuccess, OfferEntry, OperationBody, OperationInnerResult, OperationResult,
        PageRequest, Price, SubmissionError, Transaction, TransactionResult, TransactionResultCode,
    },
    services::{ExchangeError, ExchangeService, HorizonProvider, OfferRequest},
    xdr::XdrEncode,
};
use mockito::{Matcher, Server};

const ISSUER: &str = "GCKA6K5PCQ6PNF5RQBF7PQDJWRHO6UOGFMRLK3DYHDOI244V47XKQ4GP";

fn usd() -> Asset {
    Asset::credit("USD", AccountId::from_address(ISSUER).unwrap()).unwrap()
}

fn service(server: &Server) -> ExchangeService<HorizonProvider> {
    let mut network = NetworkConfig::testnet();
    network.horizon_url = server.url();
    let config = ClientConfig::new(network);
    let provider = HorizonProvider::new(&server.url(), Duration::from_secs(5)).unwrap();
    ExchangeService::new(Arc::new(provider), config)
}

fn account_body(address: &str, sequence: i64) -> String {
    format!(
        r#"{{"account_id": "{address}", "sequence": "{sequence}", "subentry_count": 1,
            "balances": [
                {{"balance": "25.0000000", "limit": "922337203685.4775807",
                  "buying_liabilities": "0.0000000", "selling_liabilities": "0.0000000",
                  "asset_type": "credit_alphanum4", "asset_code": "USD", "asset_issuer": "{ISSUER}"}},
                {{"balance": "500.0000000", "buying_liabilities": "0.0000000",
                  "selling_liabilities": "0.0000000", "asset_type": "native"}}
            ],
            "signers": [{{"key": "{address}", "weight": 1, "type": "ed25519_public_key"}}],
            "data": {{}}}}"#
    )
}

#[tokio::test]
async fn place_offer_against_horizon() {
    let mut server = Server::new_async().await;
    let signer = Keypair::random();
    let address = signer.address();

    let account_mock = server
        .mock("GET", format!("/accounts/{}", address).as_str())
        .with_status(200)
        .with_body(account_body(&address, 100))
        .expect(2)
        .create_async()
        .await;

    let result = TransactionResult {
        fee_charged: Amount::from_stroops(100),
        code: TransactionResultCode::Success,
        results: vec![OperationResult::Inner(OperationInnerResult::ManageSellOffer(
            ManageOfferResult::Success(ManageOfferSuccess {
                offers_claimed: vec![ClaimOfferAtom {
                    seller_id: AccountId::from_address(ISSUER).unwrap(),
                    offer_id: 3,
                    asset_sold: usd(),
                    amount_sold: Amount::from_stroops(4_000_000),
                    asset_bought: Asset::Native,
                    amount_bought: Amount::from_stroops(20_000_000),
                }],
                effect: ManageOfferEffect::Created(OfferEntry {
                    seller_id: *signer.account_id(),
                    offer_id: 4242,
                    selling: Asset::Native,
                    buying: usd(),
                    amount: Amount::from_stroops(985_000_000),
                    price: Price::from_f64(0.2129193).unwrap(),
                    flags: 0,
                }),
            }),
        ))],
    };
    let submit = server
        .mock("POST", "/transactions")
        .match_body(Matcher::Regex("^tx=".to_string()))
        .with_status(200)
        .with_body(format!(
            r#"{{"hash": "5d1f", "ledger": 900, "envelope_xdr": "AAAA", "result_xdr": "{}"}}"#,
            result.to_xdr_base64().unwrap()
        ))
        .expect(1)
        .create_async()
        .await;

    let service = service(&server);
    let account = service
        .get_account(signer.account_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.native_balance(), Amount::from_stroops(5_000_000_000));
    assert!(account.has_trust_line(&usd()));

    let request = OfferRequest::new(
        Asset::Native,
        "100.5".parse().unwrap(),
        usd(),
        Price::from_f64(0.2129193).unwrap(),
    );
    let trade = service
        .submit_offer(&signer, &request)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trade.offer_id, Some(4242));
    assert_eq!(trade.sell_amount, Amount::from_stroops(1_005_000_000));
    assert_eq!(trade.claimed_amount(), Amount::from_stroops(20_000_000));
    assert_eq!(trade.hash, "5d1f");
    submit.assert_async().await;
    account_mock.assert_async().await;
}

#[tokio::test]
async fn rejected_offer_surfaces_result_codes() {
    let mut server = Server::new_async().await;
    let signer = Keypair::random();
    let address = signer.address();

    let _account = server
        .mock("GET", format!("/accounts/{}", address).as_str())
        .with_status(200)
        .with_body(account_body(&address, 7))
        .create_async()
        .await;

    let result = TransactionResult {
        fee_charged: Amount::from_stroops(100),
        code: TransactionResultCode::InsufficientBalance,
        results: Vec::new(),
    };
    let _submit = server
        .mock("POST", "/transactions")
        .with_status(400)
        .with_body(format!(
            r#"{{"type": "https://stellar.org/horizon-errors/transaction_failed",
                "title": "Transaction Failed", "status": 400,
                "extras": {{"envelope_xdr": "AAAA", "result_xdr": "{}",
                           "result_codes": {{"transaction": "tx_insufficient_balance"}}}}}}"#,
            result.to_xdr_base64().unwrap()
        ))
        .create_async()
        .await;

    let request = OfferRequest::new(
        Asset::Native,
        Amount::from_stroops(1),
        usd(),
        Price::new(1, 1).unwrap(),
    );
    let err = service(&server)
        .submit_offer(&signer, &request)
        .await
        .unwrap_err();

    match err {
        ExchangeError::Submission(SubmissionError::Rejected {
            code, envelope_xdr, ..
        }) => {
            assert_eq!(code, TransactionResultCode::InsufficientBalance);
            let tx = Transaction::from_envelope_xdr_base64(&envelope_xdr).unwrap();
            assert_eq!(tx.sequence(), 8);
            assert!(matches!(
                tx.operations()[0].body,
                OperationBody::ManageSellOffer(_)
            ));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn offer_status_reads_trades_and_open_offers() {
    let mut server = Server::new_async().await;
    let seller = "GCILEORWFS6PKGCXUVC73TKTPPHXADNQFLVGKVWLAW4FJJTCXNE6DGB7";

    let _trades = server
        .mock("GET", "/offers/77/trades")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(
            r#"{{"_embedded": {{"records": [{{
                "id": "1-0", "paging_token": "1-0",
                "ledger_close_time": "2019-07-26T09:17:02Z",
                "base_offer_id": "77", "base_account": "{seller}",
                "base_amount": "2.5000000", "base_asset_type": "native",
                "counter_offer_id": "12", "counter_account": "{ISSUER}",
                "counter_amount": "0.5000000", "counter_asset_type": "credit_alphanum4",
                "counter_asset_code": "USD", "counter_asset_issuer": "{ISSUER}",
                "base_is_seller": true, "price": {{"n": 1, "d": 5}}
            }}]}}}}"#
        ))
        .create_async()
        .await;
    let _offers = server
        .mock("GET", format!("/accounts/{}/offers", seller).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"_embedded": {"records": []}}"#)
        .create_async()
        .await;

    let status = service(&server)
        .offer_status(&AccountId::from_address(seller).unwrap(), 77)
        .await
        .unwrap();
    assert!(!status.is_open);
    assert_eq!(status.filled_amount(), Amount::from_stroops(25_000_000));

    let trades = service(&server)
        .offer_trades(77, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(trades[0].counter_offer_id, Some(12));
}
