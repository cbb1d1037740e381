use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
use forecast_feeds::*;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

const RATE_WEI: u128 = 800_000_000_000_000;
const PERIOD_GAS: u128 = 250_000_000;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn rpc_handler(Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();
    let result = match method {
        "eth_gasPrice" => json!("0x2e90edd00"),
        "eth_call" => {
            let data = request["params"][0]["data"].as_str().unwrap_or_default();
            if data == encode_call(MINT_RATE_SIG) {
                json!(format!("0x{RATE_WEI:064x}"))
            } else if data == encode_call(PERIOD_L1_DATA_GAS_SIG) {
                json!(format!("0x{PERIOD_GAS:064x}"))
            } else {
                return Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32000, "message": "execution reverted" }
                }));
            }
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "method not found" }
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn upstream() -> Router {
    Router::new()
        .route(
            "/api/v2/main-page/blocks",
            get(|| async { Json(json!([{ "height": 124_999 }, { "height": 124_998 }])) }),
        )
        .route(
            "/api/v3/simple/price",
            get(|| async { Json(json!({ "ethereum": { "usd": 2500.5 } })) }),
        )
        .route(
            "/periods.json",
            get(|| async {
                Json(json!([
                    { "block-ending": 19_999, "fctMinted": 380_000.0, "fctMintRate": 900_000_000_000_000u64 },
                    { "block-ending": 9_999, "fctMinted": 420_000.0, "fctMintRate": 800_000_000_000_000u64 }
                ]))
            }),
        )
        .route("/", post(rpc_handler))
}

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn explorer_reports_latest_height() {
    let addr = serve(upstream()).await;
    let explorer = ExplorerClient::new(format!("http://{addr}"), http()).unwrap();

    assert_eq!(explorer.latest_height().await.unwrap(), 124_999);
}

#[tokio::test]
async fn explorer_accepts_string_heights_and_rejects_garbage() {
    let app = Router::new()
        .route(
            "/good/api/v2/main-page/blocks",
            get(|| async { Json(json!([{ "height": "42" }])) }),
        )
        .route(
            "/bad/api/v2/main-page/blocks",
            get(|| async { Json(json!([{ "height": "abc" }])) }),
        )
        .route(
            "/negative/api/v2/main-page/blocks",
            get(|| async { Json(json!([{ "height": -3 }])) }),
        )
        .route(
            "/empty/api/v2/main-page/blocks",
            get(|| async { Json(json!([])) }),
        );
    let addr = serve(app).await;

    let good = ExplorerClient::new(format!("http://{addr}/good"), http()).unwrap();
    assert_eq!(good.latest_height().await.unwrap(), 42);

    for prefix in ["bad", "negative", "empty"] {
        let client = ExplorerClient::new(format!("http://{addr}/{prefix}"), http()).unwrap();
        let err = client.latest_height().await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)), "{prefix}: {err}");
        assert!(!err.is_unavailable());
    }
}

#[tokio::test]
async fn contract_reads_convert_to_calculator_units() {
    let addr = serve(upstream()).await;
    let rpc = RpcClient::new(format!("http://{addr}"), http()).unwrap();
    let contract = MintContract::new(rpc, DEFAULT_MINT_CONTRACT);

    let issuance = contract.read_issuance().await.unwrap();
    assert_eq!(issuance.mint_rate_wei, RATE_WEI);
    assert_eq!(issuance.period_l1_data_gas, PERIOD_GAS);
    assert_eq!(issuance.current_mint_rate, 800_000);
    assert_eq!(issuance.minted_so_far, 200_000.0);
}

#[tokio::test]
async fn rpc_errors_are_surfaced() {
    let addr = serve(upstream()).await;
    let rpc = RpcClient::new(format!("http://{addr}"), http()).unwrap();

    let err = rpc
        .call_u128(DEFAULT_MINT_CONTRACT, "unknown()")
        .await
        .unwrap_err();
    match err {
        FeedError::Rpc { code, ref message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "execution reverted");
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_unavailable());

    assert!((rpc.gas_price_gwei().await.unwrap() - 12.5).abs() < 1e-9);
}

#[tokio::test]
async fn server_errors_are_unavailable() {
    let app = Router::new().route(
        "/api/v2/main-page/blocks",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let addr = serve(app).await;
    let explorer = ExplorerClient::new(format!("http://{addr}"), http()).unwrap();

    let err = explorer.latest_height().await.unwrap_err();
    match &err {
        FeedError::ServerError { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn price_and_history_sources() {
    let addr = serve(upstream()).await;

    let price = PriceFeedClient::new(format!("http://{addr}"), http()).unwrap();
    assert_eq!(price.eth_usd().await.unwrap(), 2500.5);

    let history = HistoryClient::new(format!("http://{addr}/periods.json"), http()).unwrap();
    let periods = history.fetch().await.unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods.records()[0].block_ending, 9_999);
    assert_eq!(periods.latest().unwrap().mint_rate_gwei(), 900_000);
    assert_eq!(periods.total_minted(), 800_000.0);
}

#[tokio::test]
async fn feed_set_collects_consistent_inputs() {
    let addr = serve(upstream()).await;
    let base = format!("http://{addr}/");
    let config = FeedConfig {
        explorer_url: base.clone(),
        rpc_url: base.clone(),
        l1_rpc_url: Some(base.clone()),
        price_url: Some(base.clone()),
        history_url: format!("{base}periods.json"),
        mint_contract: DEFAULT_MINT_CONTRACT.to_string(),
        request_timeout_secs: 5,
    };
    let feeds = FeedSet::new(&config).unwrap();

    let inputs = feeds.collect_inputs().await.unwrap();
    assert_eq!(inputs.height, 124_999);
    assert_eq!(inputs.current_mint_rate, 800_000);
    assert_eq!(inputs.minted_so_far, 200_000.0);

    let market = feeds.collect_market().await;
    assert_eq!(market.eth_usd, Some(2500.5));
    assert!((market.l1_gas_price_gwei.unwrap() - 12.5).abs() < 1e-9);
}

#[tokio::test]
async fn missing_market_sources_degrade_to_none() {
    let addr = serve(Router::new()).await;
    let base = format!("http://{addr}/");
    let config = FeedConfig {
        explorer_url: base.clone(),
        rpc_url: base.clone(),
        l1_rpc_url: Some(base.clone()),
        price_url: None,
        history_url: format!("{base}periods.json"),
        ..FeedConfig::default()
    };
    let feeds = FeedSet::new(&config).unwrap();

    assert_eq!(feeds.collect_market().await, MarketData::default());
    assert!(feeds.collect_inputs().await.is_err());
    assert!(feeds.fetch_history().await.is_err());
}
