//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Account ID - globally unique identifier for a monetary account.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Monotonic**: Assigned from an atomic counter starting at 1
///
/// The total order on account ids is also the canonical lock-acquisition
/// order for multi-account operations.
pub type AccountId = u32;

/// Transaction ID - unique, monotonically assigned ledger entry id
pub type TransactionId = u64;
