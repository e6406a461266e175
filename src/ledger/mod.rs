//! Storage for signatures.
//!
//! The ledger is append-only: the only mutation is `insert`. Email uniqueness
//! is enforced by the store itself, so two concurrent inserts of the same
//! address resolve to exactly one row and one [`LedgerError::DuplicateEmail`].

mod memory;
mod postgres;

use std::sync::Arc;

pub use memory::MemoryLedger;
pub use postgres::{PetitionDb, PgLedger};

use crate::error::LedgerError;
use crate::models::{NewSignature, RecentSignature, Signature};

#[rocket::async_trait]
pub trait Ledger: Send + Sync {
    async fn count(&self) -> Result<u64, LedgerError>;

    /// Newest name-visible signatures first, at most `limit` of them.
    async fn recent(&self, limit: usize) -> Result<Vec<RecentSignature>, LedgerError>;

    async fn contains_email(&self, email: &str) -> Result<bool, LedgerError>;

    async fn insert(&self, signature: NewSignature) -> Result<Signature, LedgerError>;
}

/// The ledger backing the running app, placed in Rocket's managed state.
#[derive(Clone)]
pub struct SharedLedger(pub Arc<dyn Ledger>);

impl SharedLedger {
    pub fn new(ledger: impl Ledger + 'static) -> Self {
        Self(Arc::new(ledger))
    }
}
