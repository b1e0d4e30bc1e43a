//! EVM chains (`eip155`).
//!
//! Transactions are built from live nonce and gas price. Sent transactions are trusted once
//! the wallet returns a hash; signed transactions and the message methods are checked by
//! recovering the signer.

pub mod format;
pub mod verify;

use alloy::dyn_abi::TypedData;
use serde_json::json;
use tracing::debug;

use rusty_relay_core::{
    AssetBalance, BalanceMap, ChainFamily, RelayContext, RelayError, RequestScope, RpcMethod,
    RpcResult,
};

use self::format::{
    encode_message_hex, format_test_transaction, intrinsic_cost, test_message,
    typed_data_example,
};
use self::verify::{verify_personal_message, verify_signed_transaction, verify_typed_data};

pub const NAMESPACE: &str = "eip155";

pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const ETH_SIGN_TRANSACTION: &str = "eth_signTransaction";
pub const ETH_SIGN: &str = "eth_sign";
pub const PERSONAL_SIGN: &str = "personal_sign";
pub const ETH_SIGN_TYPED_DATA: &str = "eth_signTypedData";
pub const ETH_SIGN_TYPED_DATA_V4: &str = "eth_signTypedData_v4";

pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds for intrinsic transaction cost";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(ETH_SEND_TRANSACTION, |s| Box::pin(send_transaction(s))),
            RpcMethod::fixed(ETH_SIGN_TRANSACTION, |s| Box::pin(sign_transaction(s))),
            RpcMethod::fixed(ETH_SIGN, |s| Box::pin(eth_sign(s))),
            RpcMethod::fixed(PERSONAL_SIGN, |s| Box::pin(personal_sign(s))),
            RpcMethod::fixed(ETH_SIGN_TYPED_DATA, |s| {
                Box::pin(sign_typed_data(s, ETH_SIGN_TYPED_DATA))
            }),
            RpcMethod::fixed(ETH_SIGN_TYPED_DATA_V4, |s| {
                Box::pin(sign_typed_data(s, ETH_SIGN_TYPED_DATA_V4))
            }),
        ],
    )
}

pub async fn send_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    let account = scope.require_account()?;
    let chain = scope.require_chain_data()?;
    let (tx, gas_price) =
        format_test_transaction(scope.network(), &chain.rpc_url, &scope.address).await?;

    let balance = scope.balance_of(&account);
    if balance < intrinsic_cost(gas_price) {
        debug!(%account, %balance, "balance below intrinsic cost, not sending");
        return Ok(RpcResult::new(
            ETH_SEND_TRANSACTION,
            scope.address,
            false,
            INSUFFICIENT_FUNDS,
        ));
    }

    let hash: String = scope.request_as(ETH_SEND_TRANSACTION, json!([tx])).await?;
    Ok(RpcResult::new(ETH_SEND_TRANSACTION, scope.address, true, hash))
}

pub async fn sign_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let chain = scope.require_chain_data()?;
    let (tx, _) = format_test_transaction(scope.network(), &chain.rpc_url, &scope.address).await?;

    let signed: String = scope.request_as(ETH_SIGN_TRANSACTION, json!([tx])).await?;
    let valid = verify_signed_transaction(&signed, &tx, &scope.address)?;
    Ok(RpcResult::new(ETH_SIGN_TRANSACTION, scope.address, valid, signed))
}

pub async fn eth_sign(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let message = test_message(scope.now_ms()?);
    let params = json!([scope.address, encode_message_hex(&message)]);

    let signature: String = scope.request_as(ETH_SIGN, params).await?;
    let valid = verify_personal_message(message.as_bytes(), &signature, &scope.address)?;
    Ok(RpcResult::new(ETH_SIGN, scope.address, valid, signature))
}

pub async fn personal_sign(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let message = test_message(scope.now_ms()?);
    let params = json!([encode_message_hex(&message), scope.address]);

    let signature: String = scope.request_as(PERSONAL_SIGN, params).await?;
    let valid = verify_personal_message(message.as_bytes(), &signature, &scope.address)?;
    Ok(RpcResult::new(PERSONAL_SIGN, scope.address, valid, signature))
}

pub async fn sign_typed_data(
    scope: RequestScope,
    method: &'static str,
) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let document = typed_data_example();
    let typed_data: TypedData = serde_json::from_value(document.clone())
        .map_err(|e| RelayError::InvalidInput(format!("typed data: {e}")))?;
    let params = json!([scope.address, document.to_string()]);

    let signature: String = scope.request_as(method, params).await?;
    let valid = verify_typed_data(&typed_data, &signature, &scope.address)?;
    Ok(RpcResult::new(method, scope.address, valid, signature))
}

/// Reads the native balance of every EVM account in the session into its balance map.
pub async fn refresh_balances(ctx: &RelayContext) -> Result<BalanceMap, RelayError> {
    let session = ctx.session()?.ok_or(RelayError::NotConnected)?;
    let network = ctx.network();
    let chain_data = ctx.chain_data();

    let mut balances = session.balances.clone();
    for account in session.accounts_for(NAMESPACE) {
        let chain = chain_data
            .chain_data(&account.chain_id)
            .ok_or_else(|| RelayError::MissingChainData(account.chain_id.to_string()))?;
        let wei = network.balance(&chain.rpc_url, &account.address).await?;
        balances.insert(
            account.clone(),
            vec![AssetBalance {
                symbol: "ETH".to_owned(),
                name: chain.name.clone(),
                balance: wei.to_string(),
            }],
        );
    }
    ctx.set_balances(balances.clone())?;
    Ok(balances)
}
