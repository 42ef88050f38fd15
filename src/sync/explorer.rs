//! Ledger explorer pipeline
//!
//! Public read of the whole chain. Besides the block list the explorer
//! keeps running totals; those survive a failed refresh.

use super::{format_timestamp, ListMessages, ListView, Pipeline, DATE_TIME_FORMAT};
use crate::api::{ChainSnapshot, LedgerApi};
use crate::error::AppError;
use crate::model::{Block, TransactionType};

pub const MESSAGES: ListMessages = ListMessages {
    empty: "No blocks yet.",
    error: "Error loading blockchain data. Please try again.",
};

/// Characters of a hash shown before the ellipsis
pub const HASH_PREFIX_LEN: usize = 20;

/// Miner shown for the genesis block
const GENESIS_MINER: &str = "Genesis";

/// Shorten a hash for display; short values are returned unchanged
pub fn truncate_hash(hash: &str) -> String {
    match hash.char_indices().nth(HASH_PREFIX_LEN) {
        Some((cut, _)) => format!("{}...", &hash[..cut]),
        None => hash.to_string(),
    }
}

/// Display-ready block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub miner: String,
    pub timestamp: String,
    pub nonce: u64,
    pub transactions: usize,
}

impl BlockRow {
    pub fn project(block: &Block) -> Self {
        Self {
            index: block.index,
            hash: truncate_hash(&block.hash),
            previous_hash: truncate_hash(&block.previous_hash),
            miner: block
                .miner_address
                .clone()
                .unwrap_or_else(|| GENESIS_MINER.to_string()),
            timestamp: format_timestamp(block.timestamp, DATE_TIME_FORMAT),
            nonce: block.nonce,
            transactions: block.transactions.len(),
        }
    }
}

/// Ledger totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorerStats {
    pub blocks: usize,
    pub transactions: usize,
    /// `MEMORY_REWARD` transactions across all blocks
    pub memories: usize,
    pub pending: usize,
}

pub fn summarize(snapshot: &ChainSnapshot) -> ExplorerStats {
    let transactions = snapshot.chain.iter().flat_map(|block| &block.transactions);

    ExplorerStats {
        blocks: snapshot.chain.len(),
        transactions: transactions.clone().count(),
        memories: transactions
            .filter(|tx| tx.tx_type == TransactionType::MemoryReward)
            .count(),
        pending: snapshot.pending_transactions.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerView {
    pub blocks: ListView<BlockRow>,
    pub stats: ExplorerStats,
}

impl Default for ExplorerView {
    fn default() -> Self {
        Self {
            blocks: ListView::empty(MESSAGES),
            stats: ExplorerStats::default(),
        }
    }
}

pub async fn fetch(api: &dyn LedgerApi) -> Result<ChainSnapshot, AppError> {
    Ok(api.chain().await?)
}

pub fn apply(view: &mut ExplorerView, result: Result<ChainSnapshot, AppError>) {
    match result {
        Ok(snapshot) => {
            view.stats = summarize(&snapshot);
            view.blocks = ListView::project(Pipeline::Ledger, Ok(snapshot.chain), BlockRow::project);
        }
        Err(e) => {
            view.blocks = ListView::project(Pipeline::Ledger, Err::<Vec<Block>, _>(e), BlockRow::project);
        }
    }
}
