use thiserror::Error;

use crate::types::StableId;

/// Failure of a Huffman encode or decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// The symbol has no entry in the code table (also returned when the
    /// tree has not been built).
    #[error("symbol {0:?} is not in the code table")]
    UnknownSymbol(char),
    #[error("malformed code: {0}")]
    MalformedCode(#[from] MalformedCode),
    /// The frequencies sum past `u64::MAX`.
    #[error("frequency total overflows u64")]
    FrequencyOverflow,
}

/// Why a bit string could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedCode {
    #[error("unexpected character {found:?} at bit {position}")]
    InvalidBit { position: usize, found: char },
    #[error("no branch to follow at bit {position}")]
    DeadEnd { position: usize },
    #[error("input ends inside a code word")]
    Truncated,
}

/// Rejected snapshot while rebuilding a tree from its serialized shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("ordering violated at node {0}")]
    Unordered(StableId),
    #[error("balance violated at node {id}: balance factor {balance}")]
    Unbalanced { id: StableId, balance: i32 },
    #[error("node id {0} appears more than once")]
    DuplicateId(StableId),
    #[error("malformed huffman node: {0}")]
    MalformedHuffmanNode(String),
    #[error("symbol {0:?} appears on more than one leaf")]
    DuplicateSymbol(char),
    #[error("stored code for {symbol:?} is {stored:?}, tree yields {derived:?}")]
    CodeMismatch {
        symbol: char,
        stored: String,
        derived: String,
    },
}
