mod common;

use common::MockExchange;

use gateway::routes::{submit, validate, TradeRequest};

fn request(side: &str, order_type: &str, price: Option<&str>) -> TradeRequest {
    TradeRequest {
        symbol: "BTCUSD".to_string(),
        side: side.to_string(),
        order_type: order_type.to_string(),
        quantity: "0.5".to_string(),
        price: price.map(str::to_string),
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn rejects_unknown_side() {
    let err = validate(&request("HOLD", "MARKET", None)).unwrap_err();
    assert_eq!(err, "Invalid side. Must be BUY or SELL");
}

#[test]
fn rejects_unknown_order_type() {
    let err = validate(&request("BUY", "STOP_LOSS", None)).unwrap_err();
    assert_eq!(err, "Invalid type. Must be MARKET or LIMIT");
}

#[test]
fn limit_order_without_price_fails_before_any_adapter_call() {
    let api = MockExchange::new();

    let err = validate(&request("BUY", "LIMIT", None)).unwrap_err();
    assert_eq!(err, "Price is required for LIMIT orders");

    let err = validate(&request("SELL", "LIMIT", Some(""))).unwrap_err();
    assert_eq!(err, "Price is required for LIMIT orders");

    // Validation never touched the exchange
    assert!(api.calls().is_empty());
}

// =============================================================================
// DISPATCH TABLE
// =============================================================================

#[tokio::test]
async fn market_buy_dispatches_to_the_market_buy_operation() {
    let api = MockExchange::new();
    let order = validate(&request("BUY", "MARKET", None)).unwrap();

    submit(&api, &order).await.unwrap();

    assert_eq!(api.calls(), vec!["market_buy BTCUSD"]);
}

#[tokio::test]
async fn limit_buy_dispatches_to_the_limit_buy_operation() {
    let api = MockExchange::new();
    let order = validate(&request("BUY", "LIMIT", Some("40000"))).unwrap();

    submit(&api, &order).await.unwrap();

    assert_eq!(api.calls(), vec!["limit_buy BTCUSD"]);
}

#[tokio::test]
async fn market_sell_dispatches_to_the_market_sell_operation() {
    let api = MockExchange::new();
    let order = validate(&request("SELL", "MARKET", None)).unwrap();

    submit(&api, &order).await.unwrap();

    assert_eq!(api.calls(), vec!["market_sell BTCUSD"]);
}

#[tokio::test]
async fn limit_sell_dispatches_to_the_limit_sell_operation() {
    let api = MockExchange::new();
    let order = validate(&request("SELL", "LIMIT", Some("45000"))).unwrap();

    submit(&api, &order).await.unwrap();

    assert_eq!(api.calls(), vec!["limit_sell BTCUSD"]);
}

// =============================================================================
// NORMALIZATION
// =============================================================================

#[tokio::test]
async fn market_order_price_defaults_to_not_available() {
    let api = MockExchange::new();
    let order = validate(&request("BUY", "MARKET", None)).unwrap();

    let result = submit(&api, &order).await.unwrap();

    assert_eq!(result.order_id, "4242");
    assert_eq!(result.symbol, "BTCUSD");
    assert_eq!(result.executed_qty, "0.5");
    assert_eq!(result.price, "N/A");
}

#[tokio::test]
async fn limit_order_price_passes_through() {
    let api = MockExchange::new();
    let order = validate(&request("SELL", "LIMIT", Some("45000.50"))).unwrap();

    let result = submit(&api, &order).await.unwrap();

    assert_eq!(result.price, "45000.50");
    assert_eq!(result.status, "FILLED");
}

#[tokio::test]
async fn exchange_rejection_surfaces_as_upstream_error() {
    let api = MockExchange::new().failing("BTCUSD");
    let order = validate(&request("BUY", "MARKET", None)).unwrap();

    let err = submit(&api, &order).await.unwrap_err();

    assert!(matches!(
        err,
        binance_client::ClientError::Upstream { code: -1121, .. }
    ));
    // Exactly one placement attempt: dispatch is never retried
    assert_eq!(api.calls(), vec!["market_buy BTCUSD"]);
}
