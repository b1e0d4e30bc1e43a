//! NEAR, guest-book function calls signed and broadcast by the wallet.

use serde_json::{json, Value};

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use crate::encoding::response_text;

pub const NAMESPACE: &str = "near";

pub const NEAR_SIGN_AND_SEND_TRANSACTION: &str = "near_signAndSendTransaction";
pub const NEAR_SIGN_AND_SEND_TRANSACTIONS: &str = "near_signAndSendTransactions";

pub const GUEST_BOOK_CONTRACT: &str = "guest-book.testnet";
const ADD_MESSAGE_GAS: &str = "30000000000000";
const GREETING: &str = "Hello from Wallet Connect!";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(NEAR_SIGN_AND_SEND_TRANSACTION, |s| {
                Box::pin(sign_and_send_transaction(s))
            }),
            RpcMethod::fixed(NEAR_SIGN_AND_SEND_TRANSACTIONS, |s| {
                Box::pin(sign_and_send_transactions(s))
            }),
        ],
    )
}

/// `addMessage` call on the guest-book contract with no deposit.
pub fn guest_book_transaction(signer_id: &str, text: &str) -> Value {
    json!({
        "signerId": signer_id,
        "receiverId": GUEST_BOOK_CONTRACT,
        "actions": [{
            "type": "FunctionCall",
            "params": {
                "methodName": "addMessage",
                "args": { "text": text },
                "gas": ADD_MESSAGE_GAS,
                "deposit": "0",
            }
        }]
    })
}

pub async fn sign_and_send_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let params = json!({ "transaction": guest_book_transaction(&scope.address, GREETING) });

    let outcome = scope.request(NEAR_SIGN_AND_SEND_TRANSACTION, params).await?;
    Ok(RpcResult::new(
        NEAR_SIGN_AND_SEND_TRANSACTION,
        scope.address,
        true,
        response_text(&outcome),
    ))
}

pub async fn sign_and_send_transactions(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let transactions: Vec<Value> = (1..=2)
        .map(|i| guest_book_transaction(&scope.address, &format!("{GREETING} ({i}/2)")))
        .collect();
    let params = json!({ "transactions": transactions });

    let outcomes = scope.request(NEAR_SIGN_AND_SEND_TRANSACTIONS, params).await?;
    Ok(RpcResult::new(
        NEAR_SIGN_AND_SEND_TRANSACTIONS,
        scope.address,
        true,
        response_text(&outcomes),
    ))
}
