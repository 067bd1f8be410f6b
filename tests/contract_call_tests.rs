//! Tests for the read-only contract call tool against a mocked JSON-RPC node

use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, U256};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use std::str::FromStr;

use web3_tool_server::blockchain::{
    call_contract_function, call_web3_function, client::Web3Provider, models::CallRequest, CallError,
};

const TOKEN: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
const OWNER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

fn token_abi() -> Value {
    json!([
        {
            "type": "function",
            "name": "balanceOf",
            "stateMutability": "view",
            "inputs": [{ "name": "owner", "type": "address" }],
            "outputs": [{ "name": "", "type": "uint256" }]
        },
        {
            "type": "function",
            "name": "totalSupply",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "uint256" }]
        },
        {
            "type": "function",
            "name": "name",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "string" }]
        },
        {
            "type": "function",
            "name": "getReserves",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [
                { "name": "reserve0", "type": "uint112" },
                { "name": "reserve1", "type": "uint112" },
                { "name": "blockTimestampLast", "type": "uint32" }
            ]
        },
        {
            "type": "function",
            "name": "owner",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "address" }]
        },
        {
            "type": "function",
            "name": "paused",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "bool" }]
        }
    ])
}

fn hex_result(tokens: &[Token]) -> String {
    format!("0x{}", hex::encode(encode(tokens)))
}

async fn rpc_result(server: &mut ServerGuard, method: &str, result: Value) -> Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": method })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
        .create_async()
        .await
}

async fn connected_node() -> (ServerGuard, Mock, Web3Provider) {
    let mut server = mockito::Server::new_async().await;
    let version = rpc_result(&mut server, "web3_clientVersion", json!("Geth/v1.13.14")).await;
    let provider = Web3Provider::new(&server.url());
    (server, version, provider)
}

#[tokio::test]
async fn balance_of_returns_decimal_text() {
    let (mut server, _version, provider) = connected_node().await;
    let call = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "method": "eth_call" })),
            // balanceOf(address) selector followed by the padded owner
            Matcher::Regex("0x70a08231[0]{24}5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": hex_result(&[Token::Uint(U256::from(123_456_789u64))])
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = CallRequest::new(TOKEN, token_abi(), "balanceOf").with_args(vec![json!(OWNER)]);
    assert_eq!(call_web3_function(&provider, &request).await, "123456789");
    call.assert_async().await;
}

#[tokio::test]
async fn address_case_does_not_change_the_call() {
    let (mut server, _version, provider) = connected_node().await;
    let call = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "method": "eth_call" })),
            Matcher::Regex(TOKEN.trim_start_matches("0x").into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": hex_result(&[Token::Uint(U256::from(42u64))])
            })
            .to_string(),
        )
        .expect(3)
        .create_async()
        .await;

    let upper = format!("0x{}", TOKEN[2..].to_uppercase());
    let checksummed = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
    for address in [TOKEN, upper.as_str(), checksummed] {
        let request = CallRequest::new(address, token_abi(), "totalSupply");
        assert_eq!(call_web3_function(&provider, &request).await, "42");
    }
    call.assert_async().await;
}

#[tokio::test]
async fn zero_argument_function_succeeds_without_args() {
    let (mut server, _version, provider) = connected_node().await;
    let _call = rpc_result(
        &mut server,
        "eth_call",
        json!(hex_result(&[Token::Uint(U256::exp10(24))])),
    )
    .await;

    let request = CallRequest::new(TOKEN, token_abi(), "totalSupply");
    assert_eq!(
        call_contract_function(&provider, &request).await.unwrap(),
        "1000000000000000000000000"
    );

    let empty_args = request.clone().with_args(vec![]);
    assert_eq!(
        call_web3_function(&provider, &empty_args).await,
        "1000000000000000000000000"
    );
}

#[tokio::test]
async fn missing_args_for_parameterized_function_is_error_text() {
    let (mut server, _version, provider) = connected_node().await;
    let call = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_call" })))
        .expect(0)
        .create_async()
        .await;

    let request = CallRequest::new(TOKEN, token_abi(), "balanceOf");
    let err = call_contract_function(&provider, &request).await.unwrap_err();
    assert_eq!(
        err,
        CallError::ArgumentCount {
            name: "balanceOf".into(),
            expected: vec![1],
            got: 0
        }
    );
    assert_eq!(
        call_web3_function(&provider, &request).await,
        "Error: function 'balanceOf' expects 1 argument(s), got 0"
    );
    call.assert_async().await;
}

#[tokio::test]
async fn unknown_function_reports_not_found() {
    let (_server, _version, provider) = connected_node().await;
    let request = CallRequest::new(TOKEN, token_abi(), "transferFrom");
    let out = call_web3_function(&provider, &request).await;
    assert_eq!(out, "Error: function 'transferFrom' not found in ABI");
}

#[tokio::test]
async fn wrongly_typed_argument_is_error_text() {
    let (_server, _version, provider) = connected_node().await;
    let request = CallRequest::new(TOKEN, token_abi(), "balanceOf").with_args(vec![json!(true)]);
    let out = call_web3_function(&provider, &request).await;
    assert!(out.starts_with("Error: invalid argument 0 for 'balanceOf'"), "{out}");
}

#[tokio::test]
async fn malformed_contract_address_is_error_text() {
    let (_server, _version, provider) = connected_node().await;
    let request = CallRequest::new("0x1234", token_abi(), "totalSupply");
    let out = call_web3_function(&provider, &request).await;
    assert!(out.starts_with("Error: invalid contract address '0x1234'"), "{out}");
}

#[tokio::test]
async fn revert_is_error_text() {
    let (mut server, _version, provider) = connected_node().await;
    let _call = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_call" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 3, "message": "execution reverted: paused", "data": "0x" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = CallRequest::new(TOKEN, token_abi(), "totalSupply");
    let err = call_contract_function(&provider, &request).await.unwrap_err();
    assert!(matches!(err, CallError::Rpc(_)));

    let out = call_web3_function(&provider, &request).await;
    assert!(out.starts_with("Error: "), "{out}");
    assert!(out.contains("execution reverted: paused"), "{out}");
}

#[tokio::test]
async fn empty_return_data_is_decode_error() {
    let (mut server, _version, provider) = connected_node().await;
    let _call = rpc_result(&mut server, "eth_call", json!("0x")).await;

    let request = CallRequest::new(TOKEN, token_abi(), "totalSupply");
    let out = call_web3_function(&provider, &request).await;
    assert!(out.starts_with("Error: could not decode output of 'totalSupply'"), "{out}");
}

#[tokio::test]
async fn renders_strings_tuples_addresses_and_bools() {
    let cases = [
        ("name", vec![Token::String("Wrapped Ether".into())], "Wrapped Ether"),
        (
            "getReserves",
            vec![
                Token::Uint(U256::from(1000u64)),
                Token::Uint(U256::from(2500u64)),
                Token::Uint(U256::from(1_700_000_000u64)),
            ],
            "(1000, 2500, 1700000000)",
        ),
        (
            "owner",
            vec![Token::Address(Address::from_str(OWNER).unwrap())],
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        ),
        ("paused", vec![Token::Bool(false)], "false"),
    ];

    for (function, tokens, expected) in cases {
        let (mut server, _version, provider) = connected_node().await;
        let _call = rpc_result(&mut server, "eth_call", json!(hex_result(&tokens))).await;

        let request = CallRequest::new(TOKEN, token_abi(), function);
        assert_eq!(call_web3_function(&provider, &request).await, expected, "{function}");
    }
}

#[tokio::test]
async fn disconnected_provider_returns_fixed_message() {
    // Nothing listens on port 1
    let provider = Web3Provider::new("http://127.0.0.1:1");
    let request = CallRequest::new(TOKEN, token_abi(), "balanceOf").with_args(vec![json!(OWNER)]);
    assert_eq!(
        call_web3_function(&provider, &request).await,
        "Error: Web3 provider not connected"
    );
    assert_eq!(
        call_contract_function(&provider, &request).await.unwrap_err(),
        CallError::NotConnected
    );
}

#[tokio::test]
async fn node_rejecting_client_version_counts_as_disconnected() {
    let mut server = mockito::Server::new_async().await;
    let _version = server
        .mock("POST", "/")
        .with_status(401)
        .with_body("Must be authenticated!")
        .create_async()
        .await;
    let provider = Web3Provider::new(&server.url());
    assert!(!provider.is_connected().await);

    let request = CallRequest::new(TOKEN, token_abi(), "totalSupply");
    assert_eq!(
        call_web3_function(&provider, &request).await,
        "Error: Web3 provider not connected"
    );
}

#[tokio::test]
async fn every_failure_mode_returns_error_text() {
    let (_server, _version, provider) = connected_node().await;
    let requests = [
        CallRequest::new("", token_abi(), "totalSupply"),
        CallRequest::new(TOKEN, json!("[not json"), "totalSupply"),
        CallRequest::new(TOKEN, json!({ "not": "an abi" }), "totalSupply"),
        CallRequest::new(TOKEN, json!([]), "totalSupply"),
        CallRequest::new(TOKEN, token_abi(), "totalSupply").with_args(vec![json!(1)]),
        CallRequest::new(TOKEN, token_abi(), "balanceOf").with_args(vec![json!(OWNER), json!(OWNER)]),
    ];

    for request in &requests {
        let out = call_web3_function(&provider, request).await;
        assert!(out.starts_with("Error: "), "{:?} -> {}", request, out);
    }
}
