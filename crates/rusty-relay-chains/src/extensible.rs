//! Namespace-prefixed command families.
//!
//! Chia exposes its wallet API as `chia_<command>`. Any namespace sharing that surface can
//! reuse the same command set; the wire method is always built from the chain id's
//! namespace. Responses are reported as valid whenever the wallet answers.

use serde_json::{json, Value};

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use crate::encoding::response_text;

pub const CHIA_NAMESPACE: &str = "chia";

pub const GET_WALLETS: &str = "getWallets";
pub const GET_CAT_WALLET_INFO: &str = "getCATWalletInfo";
pub const SEND_TRANSACTION: &str = "sendTransaction";
pub const SPEND_CAT: &str = "spendCAT";
pub const GET_NEXT_ADDRESS: &str = "getNextAddress";
pub const LOG_IN: &str = "logIn";
pub const SIGN_MESSAGE_BY_ADDRESS: &str = "signMessageByAddress";
pub const SIGN_MESSAGE_BY_ID: &str = "signMessageById";
pub const GET_SYNC_STATUS: &str = "getSyncStatus";
pub const GET_NFT_INFO: &str = "getNFTInfo";
pub const GET_NFTS: &str = "getNFTs";
pub const TAKE_OFFER: &str = "takeOffer";
pub const CREATE_OFFER_FOR_IDS: &str = "createOfferForIds";
pub const UNKNOWN_COMMAND: &str = "unknownCommand";

pub const COMMANDS: [&str; 14] = [
    GET_WALLETS,
    GET_CAT_WALLET_INFO,
    SEND_TRANSACTION,
    SPEND_CAT,
    GET_NEXT_ADDRESS,
    LOG_IN,
    SIGN_MESSAGE_BY_ADDRESS,
    SIGN_MESSAGE_BY_ID,
    GET_SYNC_STATUS,
    GET_NFT_INFO,
    GET_NFTS,
    TAKE_OFFER,
    CREATE_OFFER_FOR_IDS,
    UNKNOWN_COMMAND,
];

const CAT_ASSET_ID: &str = "a628c1c2c6fcb74d53746157e438e108eab5c0bb3e5c80ff9b1910b3e4832913";
const XCH_ADDRESS: &str = "xch1jp6wfpn7x3mfyvh0cnqcn8adglx2gjvd5e7kvy4ln9kdu6l8nxzsquz5y6";
const DID_ID: &str = "did:chia:1sq9thg8spn8pw6dx3nmacrl94fqqdffwqp2x5cg9wvg2gjkp0kfqtxxdz4";
const NFT_COIN_ID: &str = "0xa4ad40e0bd3ec5e4b6c5c4ab5b5d3d4b1e2b5c6d7e8f9a0b1c2d3e4f5a6b7c8d";
const OFFER: &str = "offer1qqr83wcuu2rykcmqvpsxzgqqemhmlaekcenaz02ma6hs5w600dhjlvfjn477nkwz369h88kll73h37fefnwk3qqnz8s0lle0vnf7qcxzhx8rwh";

pub fn chia_family() -> ChainFamily {
    family(CHIA_NAMESPACE)
}

/// The command set registered under `namespace`.
pub fn family(namespace: &str) -> ChainFamily {
    ChainFamily::new(
        namespace,
        vec![
            RpcMethod::namespaced(GET_WALLETS, |s| Box::pin(run(s, GET_WALLETS))),
            RpcMethod::namespaced(GET_CAT_WALLET_INFO, |s| Box::pin(run(s, GET_CAT_WALLET_INFO))),
            RpcMethod::namespaced(SEND_TRANSACTION, |s| Box::pin(run(s, SEND_TRANSACTION))),
            RpcMethod::namespaced(SPEND_CAT, |s| Box::pin(run(s, SPEND_CAT))),
            RpcMethod::namespaced(GET_NEXT_ADDRESS, |s| Box::pin(run(s, GET_NEXT_ADDRESS))),
            RpcMethod::namespaced(LOG_IN, |s| Box::pin(run(s, LOG_IN))),
            RpcMethod::namespaced(SIGN_MESSAGE_BY_ADDRESS, |s| {
                Box::pin(run(s, SIGN_MESSAGE_BY_ADDRESS))
            }),
            RpcMethod::namespaced(SIGN_MESSAGE_BY_ID, |s| Box::pin(run(s, SIGN_MESSAGE_BY_ID))),
            RpcMethod::namespaced(GET_SYNC_STATUS, |s| Box::pin(run(s, GET_SYNC_STATUS))),
            RpcMethod::namespaced(GET_NFT_INFO, |s| Box::pin(run(s, GET_NFT_INFO))),
            RpcMethod::namespaced(GET_NFTS, |s| Box::pin(run(s, GET_NFTS))),
            RpcMethod::namespaced(TAKE_OFFER, |s| Box::pin(run(s, TAKE_OFFER))),
            RpcMethod::namespaced(CREATE_OFFER_FOR_IDS, |s| {
                Box::pin(run(s, CREATE_OFFER_FOR_IDS))
            }),
            RpcMethod::namespaced(UNKNOWN_COMMAND, |s| Box::pin(run(s, UNKNOWN_COMMAND))),
        ],
    )
}

/// Fixed request body of `command`. The account address is the wallet fingerprint.
pub fn command_params(command: &str, fingerprint: &str) -> Value {
    match command {
        GET_WALLETS => json!({ "includeData": true }),
        GET_CAT_WALLET_INFO => json!({ "assetId": CAT_ASSET_ID }),
        SEND_TRANSACTION => json!({
            "walletId": 1,
            "address": XCH_ADDRESS,
            "amount": 1,
            "fee": 1,
            "memos": [],
        }),
        SPEND_CAT => json!({
            "walletId": 2,
            "address": XCH_ADDRESS,
            "amount": 1,
            "fee": 1,
            "memos": [],
        }),
        GET_NEXT_ADDRESS => json!({ "walletId": 1, "newAddress": true }),
        LOG_IN => json!({ "fingerprint": fingerprint.parse::<u64>().ok() }),
        SIGN_MESSAGE_BY_ADDRESS => json!({ "message": "Hello Chia!", "address": XCH_ADDRESS }),
        SIGN_MESSAGE_BY_ID => json!({ "message": "Hello Chia!", "id": DID_ID }),
        GET_SYNC_STATUS => json!({}),
        GET_NFT_INFO => json!({ "coinId": NFT_COIN_ID }),
        GET_NFTS => json!({ "walletIds": [3], "num": 10, "startIndex": 0 }),
        TAKE_OFFER => json!({ "offer": OFFER, "fee": 1 }),
        CREATE_OFFER_FOR_IDS => json!({
            "offer": { "1": -1, CAT_ASSET_ID: 1 },
            "driverDict": {},
            "fee": 1,
            "disableJSONFormatting": true,
            "validateOnly": true,
        }),
        _ => json!({}),
    }
}

async fn run(scope: RequestScope, command: &'static str) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let method = format!("{}_{command}", scope.chain_id.namespace());
    let params = command_params(command, &scope.address);

    let response = scope.request(&method, params).await?;
    Ok(RpcResult::new(method, scope.address, true, response_text(&response)))
}
