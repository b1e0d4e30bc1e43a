mod common;

use std::sync::Arc;

use rusty_relay_core::{
    ChainId, ErrorKind, PendingGuard, RelayError, RequestScope, RpcResult, SharedState,
};
use serde_json::json;

use common::{connected_context, mainnet, new_context, MemorySettings, RecordingClient, ADDRESS};

async fn echo_personal_sign(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let echoed = scope
        .request("personal_sign", json!(["0x00", ADDRESS]))
        .await?;
    Ok(RpcResult::new(
        "personal_sign",
        scope.address.clone(),
        true,
        echoed.to_string(),
    ))
}

async fn needs_chain_data(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_chain_data()?;
    Ok(RpcResult::new("eth_sendTransaction", scope.address, true, "unreachable"))
}

#[tokio::test]
async fn dispatch_without_client_fails_before_pending() {
    let ctx = new_context(Arc::new(MemorySettings::default()));

    let err = ctx
        .dispatch(mainnet(), ADDRESS, |_scope| async {
            Ok(RpcResult::new("personal_sign", ADDRESS, true, "unreachable"))
        })
        .await
        .expect_err("client missing");
    assert!(matches!(err, RelayError::NotInitialized));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert!(!ctx.is_pending().expect("pending"));
    assert!(ctx.result().expect("result").is_none());
}

#[tokio::test]
async fn dispatch_without_session_fails_before_pending() {
    let ctx = new_context(Arc::new(MemorySettings::default()));
    ctx.attach_client(Arc::new(RecordingClient::default()))
        .expect("attach");

    let err = ctx
        .dispatch(mainnet(), ADDRESS, |_scope| async {
            Ok(RpcResult::new("personal_sign", ADDRESS, true, "unreachable"))
        })
        .await
        .expect_err("session missing");
    assert!(matches!(err, RelayError::NotConnected));
    assert_eq!(err.to_string(), "Session is not connected");
    assert!(ctx.result().expect("result").is_none());
}

#[tokio::test]
async fn successful_operation_is_stored_and_pending_cleared() {
    let (ctx, client) = connected_context();

    let record = ctx
        .dispatch(mainnet(), ADDRESS, echo_personal_sign)
        .await
        .expect("dispatch");

    assert!(record.valid);
    assert_eq!(record.method.as_deref(), Some("personal_sign"));
    assert_eq!(ctx.result().expect("result"), Some(record));
    assert!(!ctx.is_pending().expect("pending"));

    let sent = client.requests.lock().expect("requests");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "personal_sign");
}

#[tokio::test]
async fn pending_is_set_while_operation_runs() {
    let (ctx, _client) = connected_context();
    let ctx_ref = &ctx;

    ctx.dispatch(mainnet(), ADDRESS, |scope| async move {
        assert!(ctx_ref.is_pending().expect("pending"));
        Ok(RpcResult::new("eth_sign", scope.address, true, "0x"))
    })
    .await
    .expect("dispatch");

    assert!(!ctx.is_pending().expect("pending"));
}

#[tokio::test]
async fn raised_errors_become_invalid_records_without_method() {
    let (ctx, client) = connected_context();
    let other = ChainId::new("eip155", "137");

    let record = ctx
        .dispatch(other, ADDRESS, echo_personal_sign)
        .await
        .expect("preconditions inside the operation are captured");

    assert!(!record.valid);
    assert!(record.method.is_none());
    assert_eq!(record.address, ADDRESS);
    assert_eq!(
        record.result,
        format!("Account for eip155:137:{ADDRESS} not found")
    );
    assert!(client.requests.lock().expect("requests").is_empty());
    assert!(!ctx.is_pending().expect("pending"));
}

#[tokio::test]
async fn missing_chain_data_is_reported() {
    let (ctx, _client) = connected_context();

    let record = ctx
        .dispatch(ChainId::new("eip155", "999"), ADDRESS, needs_chain_data)
        .await
        .expect("dispatch");
    assert_eq!(record.result, "Missing chain data for chainId: eip155:999");
}

#[test]
fn later_operation_keeps_pending_when_earlier_one_finishes() {
    let state = SharedState::new(false);
    let first = PendingGuard::enter(&state).expect("first");
    let second = PendingGuard::enter(&state).expect("second");

    drop(first);
    assert!(state.snapshot().expect("state").pending);
    drop(second);
    assert!(!state.snapshot().expect("state").pending);
}

#[test]
fn testnet_toggle_is_persisted_and_filters_chains() {
    let settings = Arc::new(MemorySettings::default());
    let ctx = new_context(settings.clone());
    assert!(!ctx.is_testnet().expect("testnet"));
    assert_eq!(ctx.chains().expect("chains")[0].chain_id, mainnet());

    ctx.set_testnet(true).expect("toggle");
    assert!(*settings.testnet.lock().expect("settings"));
    assert_eq!(
        ctx.chains().expect("chains")[0].chain_id,
        ChainId::new("eip155", "5")
    );

    let reloaded = new_context(settings);
    assert!(reloaded.is_testnet().expect("testnet"));
}
