use serde_json::{json, Value};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

pub const TRANSFER_LAMPORTS: u64 = 1;

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);
/// Index of `Transfer` in the system program's instruction enum.
const SYSTEM_TRANSFER: u32 = 2;

/// System program transfer, `u32` variant index then `u64` lamports, both little endian.
pub fn transfer_instruction(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

pub fn test_message(now_ms: u64) -> String {
    format!("This is an example message to be signed - {now_ms}")
}

/// A one-lamport transfer, both as the unsigned transaction the signature is checked
/// against and as the instruction list the wallet receives.
#[derive(Debug, Clone)]
pub struct TestTransfer {
    pub transaction: Transaction,
    pub params: Value,
}

pub fn format_test_transfer(fee_payer: &Pubkey, recipient: &Pubkey, blockhash: Hash) -> TestTransfer {
    let instructions = vec![transfer_instruction(fee_payer, recipient, TRANSFER_LAMPORTS)];
    let mut transaction = Transaction::new_with_payer(&instructions, Some(fee_payer));
    transaction.message.recent_blockhash = blockhash;

    TestTransfer {
        params: json!({
            "feePayer": fee_payer.to_string(),
            "recentBlockhash": blockhash.to_string(),
            "instructions": instructions.iter().map(instruction_json).collect::<Vec<_>>(),
        }),
        transaction,
    }
}

fn instruction_json(ix: &Instruction) -> Value {
    json!({
        "programId": ix.program_id.to_string(),
        "data": bs58::encode(&ix.data).into_string(),
        "keys": ix.accounts.iter().map(|meta| json!({
            "isSigner": meta.is_signer,
            "isWritable": meta.is_writable,
            "pubkey": meta.pubkey.to_string(),
        })).collect::<Vec<_>>(),
    })
}

pub fn format_message(pubkey: &Pubkey, message: &str) -> Value {
    json!({
        "pubkey": pubkey.to_string(),
        "message": bs58::encode(message.as_bytes()).into_string(),
    })
}
