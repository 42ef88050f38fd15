//! Ledger data model
//!
//! Types shared by every layer of the client:
//! - `Session`: the authenticated identity held for the current browsing period
//! - `MemoryRecord`, `TransactionRecord`, `Block`: read-only projections of
//!   server-owned ledger entities
//! - `Amount`: fixed-point token amounts

mod amount;
mod de;

pub use amount::{Amount, AmountParseError, UNITS_PER_COIN};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Authenticated identity: account address plus the opaque server token
///
/// Only ever created by the session manager; the token never appears in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    address: String,
    token: String,
}

impl Session {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Kind of uploaded memory
///
/// Kinds the server reports beyond the four the client offers (`TEXT`,
/// `UNKNOWN`) are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MemoryType {
    #[default]
    Document,
    Image,
    Video,
    Meme,
    Other(String),
}

impl MemoryType {
    /// The four kinds offered for upload
    pub fn all() -> [MemoryType; 4] {
        [
            MemoryType::Document,
            MemoryType::Image,
            MemoryType::Video,
            MemoryType::Meme,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            MemoryType::Document => "DOCUMENT",
            MemoryType::Image => "IMAGE",
            MemoryType::Video => "VIDEO",
            MemoryType::Meme => "MEME",
            MemoryType::Other(name) => name,
        }
    }

    /// Display icon; anything unrecognised gets the document icon
    pub fn icon(&self) -> &'static str {
        match self {
            MemoryType::Image => "🖼️",
            MemoryType::Video => "🎬",
            MemoryType::Meme => "😂",
            MemoryType::Document | MemoryType::Other(_) => "📄",
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MemoryType {
    /// Case-insensitive lookup; never fails
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "DOCUMENT" => MemoryType::Document,
            "IMAGE" => MemoryType::Image,
            "VIDEO" => MemoryType::Video,
            "MEME" => MemoryType::Meme,
            _ => MemoryType::Other(upper),
        }
    }
}

impl FromStr for MemoryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MemoryType::from_name(s))
    }
}

impl Serialize for MemoryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MemoryType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(MemoryType::from_name(&name))
    }
}

/// A memory uploaded by the current account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryRecord {
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    #[serde(default)]
    pub description: String,
    /// Unix seconds
    #[serde(deserialize_with = "de::timestamp")]
    pub timestamp: i64,
}

/// Kind of ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Transfer,
    MemoryReward,
}

impl<'de> Deserialize<'de> for TransactionType {
    /// Accepts the server's numeric codes (`0`, `1`) as well as names
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(0) => Ok(TransactionType::Transfer),
            Raw::Code(1) => Ok(TransactionType::MemoryReward),
            Raw::Code(code) => Err(serde::de::Error::custom(format!(
                "unknown transaction type code {}",
                code
            ))),
            Raw::Name(name) => match name.trim().to_ascii_uppercase().as_str() {
                "TRANSFER" | "COIN_TRANSFER" => Ok(TransactionType::Transfer),
                "MEMORY_REWARD" => Ok(TransactionType::MemoryReward),
                _ => Err(serde::de::Error::custom(format!(
                    "unknown transaction type {:?}",
                    name
                ))),
            },
        }
    }
}

/// Which side of a transaction the current account is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Display label of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionLabel {
    MiningReward,
    MemoryReward,
    Transfer,
}

impl fmt::Display for TransactionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionLabel::MiningReward => write!(f, "Mining Reward"),
            TransactionLabel::MemoryReward => write!(f, "Memory Reward"),
            TransactionLabel::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// `None` for system-issued rewards
    #[serde(default, deserialize_with = "de::optional_address")]
    pub from_address: Option<String>,
    pub to_address: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Unix seconds
    #[serde(default, deserialize_with = "de::timestamp")]
    pub timestamp: i64,
}

impl TransactionRecord {
    /// Incoming exactly when the account is the recipient
    pub fn direction(&self, account: &str) -> Direction {
        if self.to_address == account {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    /// Mining reward beats memory reward beats transfer
    pub fn label(&self) -> TransactionLabel {
        if self.from_address.is_none() {
            TransactionLabel::MiningReward
        } else if self.tx_type == TransactionType::MemoryReward {
            TransactionLabel::MemoryReward
        } else {
            TransactionLabel::Transfer
        }
    }
}

/// A block of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    /// Unix seconds
    #[serde(default, deserialize_with = "de::timestamp")]
    pub timestamp: i64,
    pub hash: String,
    pub previous_hash: String,
    /// `None` for the genesis block
    #[serde(default, deserialize_with = "de::optional_address")]
    pub miner_address: Option<String>,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl Block {
    pub fn is_genesis(&self) -> bool {
        self.miner_address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(from: Option<&str>, to: &str, tx_type: TransactionType) -> TransactionRecord {
        TransactionRecord {
            from_address: from.map(str::to_string),
            to_address: to.to_string(),
            amount: Amount::from_coins(1),
            tx_type,
            timestamp: 0,
        }
    }

    #[test]
    fn test_label_precedence() {
        // Absent sender wins even over a memory-reward type
        assert_eq!(
            transfer(None, "A1", TransactionType::MemoryReward).label(),
            TransactionLabel::MiningReward
        );
        assert_eq!(
            transfer(None, "A1", TransactionType::Transfer).label(),
            TransactionLabel::MiningReward
        );
        assert_eq!(
            transfer(Some("B2"), "A1", TransactionType::MemoryReward).label(),
            TransactionLabel::MemoryReward
        );
        assert_eq!(
            transfer(Some("B2"), "A1", TransactionType::Transfer).label(),
            TransactionLabel::Transfer
        );
    }

    #[test]
    fn test_direction_depends_only_on_recipient() {
        let tx = transfer(Some("A1"), "B2", TransactionType::Transfer);
        assert_eq!(tx.direction("B2"), Direction::Incoming);
        assert_eq!(tx.direction("A1"), Direction::Outgoing);
        assert_eq!(tx.direction("C3"), Direction::Outgoing);
    }

    #[test]
    fn test_transaction_from_account_endpoint() {
        let json = r#"{
            "fromAddress": "",
            "toAddress": "A1",
            "amount": 10.0,
            "timestamp": "1700000000",
            "type": 1
        }"#;
        let tx: TransactionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(tx.from_address, None);
        assert_eq!(tx.tx_type, TransactionType::MemoryReward);
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert_eq!(tx.amount, Amount::from_coins(10));
    }

    #[test]
    fn test_transaction_type_names() {
        let tx: TransactionRecord = serde_json::from_str(
            r#"{"fromAddress":"B2","toAddress":"A1","amount":2.5,"timestamp":5,"type":"COIN_TRANSFER"}"#,
        )
        .unwrap();
        assert_eq!(tx.tx_type, TransactionType::Transfer);

        let bad = serde_json::from_str::<TransactionRecord>(
            r#"{"toAddress":"A1","amount":1,"timestamp":5,"type":7}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_memory_type_round_trip_and_unknowns() {
        let record: MemoryRecord = serde_json::from_str(
            r#"{"type":"TEXT","description":"notes","timestamp":"42","proofHash":"x"}"#,
        )
        .unwrap();
        assert_eq!(record.memory_type, MemoryType::Other("TEXT".to_string()));
        assert_eq!(record.memory_type.icon(), "📄");
        assert_eq!(record.timestamp, 42);

        assert_eq!("meme".parse::<MemoryType>().unwrap(), MemoryType::Meme);
        assert_eq!(
            serde_json::to_string(&MemoryType::Image).unwrap(),
            "\"IMAGE\""
        );
    }

    #[test]
    fn test_genesis_block() {
        let block: Block = serde_json::from_str(
            r#"{"index":0,"timestamp":1,"previousHash":"0","hash":"abc","nonce":0,"minerAddress":"","transactions":[]}"#,
        )
        .unwrap();
        assert!(block.is_genesis());
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session::new("A1", "secret-token");
        let debug = format!("{:?}", session);
        assert!(debug.contains("A1"));
        assert!(!debug.contains("secret-token"));
    }
}
