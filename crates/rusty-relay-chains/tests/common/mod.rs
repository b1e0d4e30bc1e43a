#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::dyn_abi::TypedData;
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::Signer as _;
use schnorrkel::{ExpansionMode, MiniSecretKey};
use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer as _;
use solana_sdk::transaction::Transaction;

use rusty_relay_chains::cosmos::format::{AminoSignDoc, DirectSignDoc};
use rusty_relay_chains::elrond::format::{signable_message_hash, ElrondTransaction};
use rusty_relay_chains::{cosmos, elrond, polkadot, ChainRegistry, Relay};
use rusty_relay_core::{
    AccountId, AssetBalance, ChainData, ChainDataPort, ChainId, ClockPort, NetworkPort,
    PortError, RelayContext, RequestArguments, Session, SessionPort, SettingsPort,
};

pub const NOW_MS: u64 = 1_700_000_000_000;
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";
pub const TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";
pub const GARBAGE_SIGNED_TX: &str = "0xf86c0a8502540be400825208";

pub fn eip155_mainnet() -> ChainId {
    ChainId::new("eip155", "1")
}
pub fn cosmos_hub() -> ChainId {
    ChainId::new("cosmos", "cosmoshub-4")
}
pub fn solana_mainnet() -> ChainId {
    ChainId::new("solana", "4sGjMW1sUnHzSxGspuhpqLDx6wiyjNtZ")
}
pub fn westend() -> ChainId {
    ChainId::new("polkadot", "e143f23803ac50e8f6f8e62695d1ce9e")
}
pub fn near_testnet() -> ChainId {
    ChainId::new("near", "testnet")
}
pub fn elrond_devnet() -> ChainId {
    ChainId::new("elrond", "D")
}
pub fn chia_mainnet() -> ChainId {
    ChainId::new("chia", "mainnet")
}

pub const NEAR_ACCOUNT: &str = "relay.testnet";
pub const CHIA_FINGERPRINT: &str = "1234567890";

/// Stands in for the paired wallet: answers every request by signing it with local keys.
pub struct LoopbackWallet {
    pub evm: PrivateKeySigner,
    pub cosmos: k256::ecdsa::SigningKey,
    pub solana: Keypair,
    pub polkadot: schnorrkel::Keypair,
    pub elrond: ed25519_dalek::SigningKey,
    pub requests: Mutex<Vec<(ChainId, RequestArguments)>>,
    pub tamper: AtomicBool,
    pub garbage_signed_tx: AtomicBool,
    pub omit_cosmos_pubkey: AtomicBool,
    pub tamper_elrond_batch_index: Mutex<Option<usize>>,
}

impl Default for LoopbackWallet {
    fn default() -> Self {
        Self {
            evm: PrivateKeySigner::from_bytes(&B256::repeat_byte(0x11)).expect("evm key"),
            cosmos: k256::ecdsa::SigningKey::from_slice(&[0x22; 32]).expect("cosmos key"),
            solana: Keypair::new_from_array([0x33; 32]),
            polkadot: MiniSecretKey::from_bytes(&[0x55; 32])
                .expect("sr25519 seed")
                .expand_to_keypair(ExpansionMode::Ed25519),
            elrond: ed25519_dalek::SigningKey::from_bytes(&[0x44; 32]),
            requests: Mutex::new(Vec::new()),
            tamper: AtomicBool::new(false),
            garbage_signed_tx: AtomicBool::new(false),
            omit_cosmos_pubkey: AtomicBool::new(false),
            tamper_elrond_batch_index: Mutex::new(None),
        }
    }
}

impl LoopbackWallet {
    pub fn evm_address(&self) -> String {
        self.evm.address().to_string()
    }

    pub fn cosmos_pubkey(&self) -> Vec<u8> {
        self.cosmos
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    pub fn cosmos_address(&self) -> String {
        cosmos::verify::address_from_pubkey("cosmos", &self.cosmos_pubkey()).expect("address")
    }

    pub fn solana_address(&self) -> String {
        self.solana.pubkey().to_string()
    }

    pub fn polkadot_address(&self) -> String {
        polkadot::verify::encode_ss58(42, &self.polkadot.public.to_bytes())
    }

    pub fn elrond_address(&self) -> String {
        elrond::verify::encode_address(&self.elrond.verifying_key().to_bytes()).expect("address")
    }

    pub fn accounts(&self) -> Vec<AccountId> {
        vec![
            eip155_mainnet().account(self.evm_address()),
            cosmos_hub().account(self.cosmos_address()),
            solana_mainnet().account(self.solana_address()),
            westend().account(self.polkadot_address()),
            near_testnet().account(NEAR_ACCOUNT),
            elrond_devnet().account(self.elrond_address()),
            chia_mainnet().account(CHIA_FINGERPRINT),
        ]
    }

    pub fn sent_methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests")
            .iter()
            .map(|(_, r)| r.method.clone())
            .collect()
    }

    pub fn last_params(&self) -> Value {
        self.requests
            .lock()
            .expect("requests")
            .last()
            .map(|(_, r)| r.params.clone())
            .expect("at least one request")
    }

    fn tampered(&self) -> bool {
        self.tamper.load(Ordering::SeqCst)
    }

    fn flip(&self, mut bytes: Vec<u8>) -> Vec<u8> {
        if self.tampered() {
            bytes[1] ^= 0x01;
        }
        bytes
    }

    fn respond(&self, req: &RequestArguments) -> Result<Value, PortError> {
        let p = &req.params;
        match req.method.as_str() {
            "eth_sendTransaction" => Ok(json!(TX_HASH)),
            "eth_signTransaction" => {
                if self.garbage_signed_tx.load(Ordering::SeqCst) {
                    return Ok(json!(GARBAGE_SIGNED_TX));
                }
                Ok(json!(self.evm_sign_transaction(&p[0])))
            }
            "personal_sign" => self.evm_sign_message(&p[0]),
            "eth_sign" => self.evm_sign_message(&p[1]),
            "eth_signTypedData" | "eth_signTypedData_v4" => {
                let doc = p[1].as_str().expect("typed data string");
                let typed: TypedData = serde_json::from_str(doc).expect("typed data");
                let hash = typed.eip712_signing_hash().expect("typed hash");
                let sig = self.evm.sign_hash_sync(&hash).expect("sign hash");
                Ok(json!(format!("0x{}", hex::encode(self.flip(sig.as_bytes().to_vec())))))
            }
            "cosmos_signDirect" => {
                let doc = &p["signDoc"];
                let sign_doc = DirectSignDoc {
                    body_bytes: hex::decode(doc["bodyBytes"].as_str().expect("body")).expect("hex"),
                    auth_info_bytes: hex::decode(doc["authInfoBytes"].as_str().expect("auth"))
                        .expect("hex"),
                    chain_id: doc["chainId"].as_str().expect("chain").to_owned(),
                    account_number: doc["accountNumber"]
                        .as_str()
                        .expect("account number")
                        .parse()
                        .expect("u64"),
                };
                Ok(self.cosmos_response(&sign_doc.sign_bytes()))
            }
            "cosmos_signAmino" => {
                let doc: AminoSignDoc =
                    serde_json::from_value(p["signDoc"].clone()).expect("amino doc");
                Ok(self.cosmos_response(&doc.sign_bytes().expect("amino bytes")))
            }
            "solana_signTransaction" => {
                let message = solana_message_from_params(p);
                let sig = self.solana.sign_message(&message);
                Ok(json!({ "signature": self.solana_sig_text(sig.as_ref()) }))
            }
            "solana_signMessage" => {
                let message = bs58::decode(p["message"].as_str().expect("message"))
                    .into_vec()
                    .expect("base58");
                let sig = self.solana.sign_message(&message);
                Ok(json!({ "signature": self.solana_sig_text(sig.as_ref()) }))
            }
            "polkadot_signTransaction" => {
                let sig = self.polkadot.sign_simple(b"substrate", b"payload");
                Ok(json!({ "signature": format!("0x01{}", hex::encode(sig.to_bytes())) }))
            }
            "polkadot_signMessage" => {
                let message = p["message"].as_str().expect("message");
                let wrapped = format!("<Bytes>{message}</Bytes>");
                let sig = self.polkadot.sign_simple(b"substrate", wrapped.as_bytes());
                let bytes = self.flip(sig.to_bytes().to_vec());
                Ok(json!({ "signature": format!("0x{}", hex::encode(bytes)) }))
            }
            "near_signAndSendTransaction" => Ok(json!({ "transaction": p["transaction"] })),
            "near_signAndSendTransactions" => Ok(p["transactions"].clone()),
            "erd_signTransaction" => {
                let tx: ElrondTransaction =
                    serde_json::from_value(p["transaction"].clone()).expect("elrond tx");
                Ok(json!({ "signature": self.elrond_sign(&tx.signing_bytes().expect("bytes"), false) }))
            }
            "erd_signTransactions" => {
                let txs: Vec<ElrondTransaction> =
                    serde_json::from_value(p["transactions"].clone()).expect("elrond txs");
                let bad = *self.tamper_elrond_batch_index.lock().expect("bad index");
                let signatures: Vec<Value> = txs
                    .iter()
                    .enumerate()
                    .map(|(i, tx)| {
                        let bytes = tx.signing_bytes().expect("bytes");
                        json!({ "signature": self.elrond_sign(&bytes, bad == Some(i)) })
                    })
                    .collect();
                Ok(json!({ "signatures": signatures }))
            }
            "erd_signMessage" => {
                let digest = signable_message_hash(p["message"].as_str().expect("message"));
                Ok(json!({ "signature": self.elrond_sign(digest.as_slice(), false) }))
            }
            m if m.ends_with("_unknownCommand") => {
                Err(PortError::Transport(format!("wallet rejected {m}: unknown command")))
            }
            m if m.contains('_') => Ok(json!({ "success": true, "method": m })),
            other => Err(PortError::NotFound(format!("unsupported method {other}"))),
        }
    }

    fn evm_sign_message(&self, hex_message: &Value) -> Result<Value, PortError> {
        let message = hex::decode(
            hex_message
                .as_str()
                .expect("hex message")
                .trim_start_matches("0x"),
        )
        .expect("hex");
        let sig = self.evm.sign_message_sync(&message).expect("sign");
        Ok(json!(format!("0x{}", hex::encode(self.flip(sig.as_bytes().to_vec())))))
    }

    /// Signs the requested transfer as an EIP-155 legacy transaction on chain 1.
    pub fn evm_sign_transaction(&self, tx: &Value) -> String {
        let quantity = |field: &str| {
            let raw = tx[field].as_str().expect("quantity");
            U256::from_str_radix(raw.trim_start_matches("0x"), 16).expect("hex quantity")
        };
        let to = Address::from_str(tx["to"].as_str().expect("to")).expect("address");
        let legacy = TxLegacy {
            chain_id: Some(1),
            nonce: quantity("nonce").to::<u64>(),
            gas_price: quantity("gasPrice").to::<u128>(),
            gas_limit: quantity("gasLimit").to::<u64>(),
            to: TxKind::Call(to),
            value: quantity("value"),
            input: Bytes::new(),
        };
        let sig = self
            .evm
            .sign_hash_sync(&legacy.signature_hash())
            .expect("sign transaction");
        let envelope = TxEnvelope::from(legacy.into_signed(sig));
        format!("0x{}", hex::encode(envelope.encoded_2718()))
    }

    fn cosmos_response(&self, sign_bytes: &[u8]) -> Value {
        let sig: k256::ecdsa::Signature = self.cosmos.sign(sign_bytes);
        let signature = BASE64.encode(self.flip(sig.to_bytes().to_vec()));
        if self.omit_cosmos_pubkey.load(Ordering::SeqCst) {
            return json!({ "signature": { "signature": signature } });
        }
        json!({
            "signature": {
                "pub_key": {
                    "type": "tendermint/PubKeySecp256k1",
                    "value": BASE64.encode(self.cosmos_pubkey()),
                },
                "signature": signature,
            }
        })
    }

    fn solana_sig_text(&self, sig: &[u8]) -> String {
        bs58::encode(self.flip(sig.to_vec())).into_string()
    }

    fn elrond_sign(&self, bytes: &[u8], tamper: bool) -> String {
        let mut sig = self.elrond.sign(bytes).to_bytes().to_vec();
        if tamper || self.tampered() {
            sig[1] ^= 0x01;
        }
        hex::encode(sig)
    }
}

fn solana_message_from_params(p: &Value) -> Vec<u8> {
    let fee_payer = Pubkey::from_str(p["feePayer"].as_str().expect("fee payer")).expect("pubkey");
    let blockhash =
        Hash::from_str(p["recentBlockhash"].as_str().expect("blockhash")).expect("hash");
    let instructions: Vec<Instruction> = p["instructions"]
        .as_array()
        .expect("instructions")
        .iter()
        .map(|ix| Instruction {
            program_id: Pubkey::from_str(ix["programId"].as_str().expect("program")).expect("pk"),
            accounts: ix["keys"]
                .as_array()
                .expect("keys")
                .iter()
                .map(|k| AccountMeta {
                    pubkey: Pubkey::from_str(k["pubkey"].as_str().expect("key")).expect("pk"),
                    is_signer: k["isSigner"].as_bool().expect("signer"),
                    is_writable: k["isWritable"].as_bool().expect("writable"),
                })
                .collect(),
            data: bs58::decode(ix["data"].as_str().expect("data"))
                .into_vec()
                .expect("base58"),
        })
        .collect();
    let mut tx = Transaction::new_with_payer(&instructions, Some(&fee_payer));
    tx.message.recent_blockhash = blockhash;
    tx.message_data()
}

#[async_trait]
impl SessionPort for LoopbackWallet {
    async fn request(
        &self,
        _topic: &str,
        chain_id: &ChainId,
        request: RequestArguments,
    ) -> Result<Value, PortError> {
        self.requests
            .lock()
            .map_err(|e| PortError::Transport(e.to_string()))?
            .push((chain_id.clone(), request.clone()));
        self.respond(&request)
    }

    async fn ping(&self, _topic: &str) -> Result<(), PortError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct StubNetwork {
    pub gas_price: U256,
    pub nonce: u64,
    pub balance: U256,
    pub calls: Mutex<Vec<String>>,
}

impl Default for StubNetwork {
    fn default() -> Self {
        Self {
            gas_price: U256::from(20_000_000_000u64),
            nonce: 7,
            balance: U256::from(10u64).pow(U256::from(18u64)),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubNetwork {
    fn record(&self, call: &str) {
        self.calls.lock().expect("calls").push(call.to_owned());
    }
}

#[async_trait]
impl NetworkPort for StubNetwork {
    async fn gas_price(&self, _rpc_url: &str) -> Result<U256, PortError> {
        self.record("gas_price");
        Ok(self.gas_price)
    }
    async fn transaction_count(&self, _rpc_url: &str, _address: &str) -> Result<u64, PortError> {
        self.record("transaction_count");
        Ok(self.nonce)
    }
    async fn balance(&self, _rpc_url: &str, _address: &str) -> Result<U256, PortError> {
        self.record("balance");
        Ok(self.balance)
    }
    async fn latest_blockhash(&self, _rpc_url: &str) -> Result<String, PortError> {
        self.record("latest_blockhash");
        Ok(BLOCKHASH.to_owned())
    }
}

#[derive(Debug, Default)]
pub struct FixtureChains;

impl ChainDataPort for FixtureChains {
    fn chain_data(&self, chain_id: &ChainId) -> Option<ChainData> {
        [eip155_mainnet(), cosmos_hub(), solana_mainnet()]
            .into_iter()
            .find(|c| c == chain_id)
            .map(|c| ChainData {
                name: c.to_string(),
                rpc_url: format!("http://rpc.invalid/{c}"),
                chain_id: c,
                testnet: false,
            })
    }

    fn chains(&self, _testnet: bool) -> Vec<ChainData> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct NoSettings;

impl SettingsPort for NoSettings {
    fn load_testnet(&self) -> Result<bool, PortError> {
        Ok(false)
    }
    fn save_testnet(&self, _testnet: bool) -> Result<(), PortError> {
        Ok(())
    }
}

pub struct FixedClock(pub u64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.0)
    }
}

pub struct Harness {
    pub relay: Relay,
    pub wallet: Arc<LoopbackWallet>,
    pub network: Arc<StubNetwork>,
}

pub fn harness_with(network: StubNetwork, funded: bool) -> Harness {
    harness_at(network, funded, NOW_MS)
}

pub fn harness_at(network: StubNetwork, funded: bool, now_ms: u64) -> Harness {
    let wallet = Arc::new(LoopbackWallet::default());
    let network = Arc::new(network);
    let ctx = RelayContext::new(network.clone(), Arc::new(FixtureChains), Arc::new(NoSettings))
        .expect("context")
        .with_clock(Arc::new(FixedClock(now_ms)));
    ctx.attach_client(wallet.clone()).expect("attach");

    let mut session = Session::new("topic-fixture", wallet.accounts());
    if funded {
        session.balances.insert(
            eip155_mainnet().account(wallet.evm_address()),
            vec![AssetBalance {
                symbol: "ETH".to_owned(),
                name: "Ether".to_owned(),
                balance: "1000000000000000000".to_owned(),
            }],
        );
    }
    ctx.connect(session).expect("connect");

    Harness {
        relay: Relay::new(ctx, ChainRegistry::default()),
        wallet,
        network,
    }
}

pub fn harness() -> Harness {
    harness_with(StubNetwork::default(), true)
}
