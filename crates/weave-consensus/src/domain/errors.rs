//! Validation error types.
//!
//! Every variant is an *expected outcome* of validating untrusted input: a
//! tagged reject reason, not an exception. Panics are reserved for caller
//! bugs (see `tx_validation::signature_data`).

use shared_types::{Address, H256};

/// Reasons a single transaction fails validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxValidationError {
    /// Transaction format is not 1 or 2.
    InvalidFormat(u32),

    /// Transfer target equals the sender's own address.
    TargetIsOwner,

    /// Transfer target is set but is not a well-formed address.
    MalformedTarget { len: usize },

    /// Transaction id is not the digest of the signature.
    IdMismatch,

    /// Signature does not verify over the signing payload.
    InvalidSignature,

    /// Fee is below the required minimum.
    FeeTooLow { required: u128, offered: u128 },

    /// Combined tag bytes exceed the budget.
    TagsTooLarge { size: usize, limit: usize },

    /// A variable-size field exceeds its limit.
    FieldTooLarge {
        field: &'static str,
        size: usize,
        limit: usize,
    },

    /// Format-1 inline data length disagrees with `data_size`.
    DataSizeMismatch { declared: u64, actual: u64 },

    /// Format-2 `data_size` and `data_root` emptiness disagree.
    DataRootMismatch,

    /// Spending wallet is missing, empty-and-unused, or short of funds.
    Overspend(Address),
}

impl std::fmt::Display for TxValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(format) => write!(f, "Invalid transaction format {}", format),
            Self::TargetIsOwner => write!(f, "Transaction target is the owner address"),
            Self::MalformedTarget { len } => {
                write!(f, "Transaction target is {} bytes, not an address", len)
            }
            Self::IdMismatch => write!(f, "Transaction id is not the signature digest"),
            Self::InvalidSignature => write!(f, "Invalid transaction signature"),
            Self::FeeTooLow { required, offered } => {
                write!(f, "Transaction fee {} below required {}", offered, required)
            }
            Self::TagsTooLarge { size, limit } => {
                write!(f, "Transaction tags are {} bytes (limit {})", size, limit)
            }
            Self::FieldTooLarge { field, size, limit } => {
                write!(f, "Transaction {} is {} bytes (limit {})", field, size, limit)
            }
            Self::DataSizeMismatch { declared, actual } => {
                write!(
                    f,
                    "Transaction declares {} data bytes but carries {}",
                    declared, actual
                )
            }
            Self::DataRootMismatch => {
                write!(f, "Transaction data size and data root disagree")
            }
            Self::Overspend(address) => {
                write!(f, "Overspend in tx by wallet {:02x}{:02x}..", address[0], address[1])
            }
        }
    }
}

impl std::error::Error for TxValidationError {}

/// Reasons the in-block replay pass rejects a transaction list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayPoolError {
    /// More transactions than a block may carry.
    TxCountExceeded { count: usize, limit: usize },

    /// Cumulative format-1 data bytes exceed the block budget.
    BlockDataSizeExceeded { size: u64, limit: u64 },

    /// A transaction failed individual validation.
    Tx { id: H256, source: TxValidationError },

    /// Two transactions in the block chain off the same anchor.
    AnchorUsedInBlock(H256),

    /// Anchor is neither the sender's recorded anchor nor a recent block.
    InvalidAnchor(H256),

    /// Transaction id already appears in a recent block.
    TxAlreadyMined(H256),

    /// Transaction id appears twice in this block.
    TxAlreadyInBlock(H256),
}

impl std::fmt::Display for ReplayPoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = |id: &H256| format!("{:02x}{:02x}..", id[0], id[1]);
        match self {
            Self::TxCountExceeded { count, limit } => {
                write!(f, "Block carries {} txs (limit {})", count, limit)
            }
            Self::BlockDataSizeExceeded { size, limit } => {
                write!(f, "Block tx data is {} bytes (limit {})", size, limit)
            }
            Self::Tx { id, source } => write!(f, "Tx {}: {}", short(id), source),
            Self::AnchorUsedInBlock(id) => {
                write!(f, "Tx {} reuses an anchor consumed in this block", short(id))
            }
            Self::InvalidAnchor(id) => write!(f, "Tx {} has an invalid anchor", short(id)),
            Self::TxAlreadyMined(id) => {
                write!(f, "Tx {} already in replay pool of a recent block", short(id))
            }
            Self::TxAlreadyInBlock(id) => {
                write!(f, "Tx {} appears twice in the block", short(id))
            }
        }
    }
}

impl std::error::Error for ReplayPoolError {}

/// Reasons a candidate block is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockValidationError {
    /// Height is outside the validation window around the previous height.
    HeightOutOfWindow {
        height: u64,
        previous_height: u64,
        window: u64,
    },

    /// Difficulty is below the protocol minimum.
    DifficultyBelowMinimum,

    /// The decimal difficulty string does not render the numeric difficulty.
    InvalidDifficultyString,

    /// Height does not directly follow the previous block.
    InvalidPreviousHeight { expected: u64, got: u64 },

    /// Previous-block id does not match the previous block.
    InvalidPreviousBlock,

    /// Proof of access failed.
    InvalidPoa,

    /// Difficulty does not match the retarget schedule.
    InvalidDifficulty,

    /// Last-retarget timestamp does not match the retarget schedule.
    InvalidLastRetarget,

    /// Claimed cumulative difficulty is inconsistent.
    InvalidCumulativeDiff,

    /// Recomputed independent hash differs.
    InvalidIndepHash,

    /// Claimed reward pool differs from the recomputed transition.
    RewardPoolMismatch { expected: u128, got: u128 },

    /// A sender wallet is invalid after the ledger transition.
    InvalidWallet(Address),

    /// A block field exceeds its size limit.
    FieldTooLarge {
        field: &'static str,
        size: usize,
        limit: usize,
    },

    /// The transaction list failed the replay pass.
    Replay(ReplayPoolError),

    /// Recomputed transaction root differs.
    InvalidTxRoot,

    /// Claimed weave size is inconsistent with the transactions.
    InvalidWeaveSize { expected: u64, got: u64 },

    /// Claimed block size is inconsistent with the transactions.
    InvalidBlockSize { expected: u64, got: u64 },

    /// Recomputed block-index root differs.
    InvalidBlockIndexRoot,

    /// PoW digest does not match the block hash.
    InvalidPowHash,

    /// PoW digest does not exceed the option-scaled difficulty.
    PowBelowDifficulty,
}

impl std::fmt::Display for BlockValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeightOutOfWindow {
                height,
                previous_height,
                window,
            } => write!(
                f,
                "Height {} outside window {} around previous height {}",
                height, window, previous_height
            ),
            Self::DifficultyBelowMinimum => write!(f, "Difficulty below minimum"),
            Self::InvalidDifficultyString => write!(f, "Invalid difficulty string"),
            Self::InvalidPreviousHeight { expected, got } => {
                write!(f, "Invalid previous height: expected {}, got {}", expected, got)
            }
            Self::InvalidPreviousBlock => write!(f, "Invalid previous block id"),
            Self::InvalidPoa => write!(f, "Invalid PoA"),
            Self::InvalidDifficulty => write!(f, "Invalid difficulty"),
            Self::InvalidLastRetarget => write!(f, "Invalid last retarget"),
            Self::InvalidCumulativeDiff => write!(f, "Invalid cumulative difficulty"),
            Self::InvalidIndepHash => write!(f, "Invalid independent hash"),
            Self::RewardPoolMismatch { expected, got } => {
                write!(f, "Reward pool mismatch: expected {}, got {}", expected, got)
            }
            Self::InvalidWallet(address) => {
                write!(f, "Invalid wallet {:02x}{:02x}..", address[0], address[1])
            }
            Self::FieldTooLarge { field, size, limit } => {
                write!(f, "Block {} is {} bytes (limit {})", field, size, limit)
            }
            Self::Replay(source) => write!(f, "Invalid txs: {}", source),
            Self::InvalidTxRoot => write!(f, "Invalid tx root"),
            Self::InvalidWeaveSize { expected, got } => {
                write!(f, "Invalid weave size: expected {}, got {}", expected, got)
            }
            Self::InvalidBlockSize { expected, got } => {
                write!(f, "Invalid block size: expected {}, got {}", expected, got)
            }
            Self::InvalidBlockIndexRoot => write!(f, "Invalid block index root"),
            Self::InvalidPowHash => write!(f, "Invalid PoW hash"),
            Self::PowBelowDifficulty => write!(f, "PoW hash below difficulty"),
        }
    }
}

impl std::error::Error for BlockValidationError {}

impl From<ReplayPoolError> for BlockValidationError {
    fn from(source: ReplayPoolError) -> Self {
        Self::Replay(source)
    }
}
