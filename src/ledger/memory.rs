use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::Ledger;
use crate::error::LedgerError;
use crate::models::{NewSignature, RecentSignature, Signature};

/// In-process ledger with the same contract as the Postgres one.
///
/// Uniqueness is checked under the same lock as the append, standing in for
/// the unique index on `email`.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<Signature>>,
    offline: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows as-is, keeping their timestamps.
    pub fn with_rows(rows: Vec<Signature>) -> Self {
        Self {
            rows: Mutex::new(rows),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline every call fails with [`LedgerError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Signature> {
        self.rows().clone()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Signature>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn online(&self) -> Result<MutexGuard<'_, Vec<Signature>>, LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("memory ledger offline".to_string()));
        }
        Ok(self.rows())
    }
}

#[rocket::async_trait]
impl Ledger for MemoryLedger {
    async fn count(&self) -> Result<u64, LedgerError> {
        Ok(self.online()?.len() as u64)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RecentSignature>, LedgerError> {
        let rows = self.online()?;
        let mut visible: Vec<&Signature> = rows.iter().filter(|s| s.display_name).collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible
            .into_iter()
            .take(limit)
            .map(RecentSignature::from)
            .collect())
    }

    async fn contains_email(&self, email: &str) -> Result<bool, LedgerError> {
        Ok(self.online()?.iter().any(|s| s.email == email))
    }

    async fn insert(&self, signature: NewSignature) -> Result<Signature, LedgerError> {
        let mut rows = self.online()?;
        if rows.iter().any(|s| s.email == signature.email) {
            return Err(LedgerError::DuplicateEmail);
        }
        let stored = signature.into_signature(Utc::now());
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(email: &str, display_name: bool, minutes_ago: i64) -> Signature {
        NewSignature {
            id: uuid::Uuid::new_v4(),
            first_name: email.split('@').next().unwrap_or_default().to_string(),
            last_name: "L".into(),
            email: email.into(),
            postcode: "2000".into(),
            location: "NSW".into(),
            comment: None,
            display_name,
            subscribe: true,
            ip_address: None,
        }
        .into_signature(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[rocket::async_test]
    async fn insert_rejects_existing_email() {
        let ledger = MemoryLedger::new();
        let new = |email: &str| NewSignature {
            id: uuid::Uuid::new_v4(),
            first_name: "A".into(),
            last_name: "B".into(),
            email: email.into(),
            postcode: "3000".into(),
            location: "VIC".into(),
            comment: None,
            display_name: true,
            subscribe: false,
            ip_address: None,
        };

        ledger.insert(new("a@x.org")).await.unwrap();
        assert!(matches!(
            ledger.insert(new("a@x.org")).await,
            Err(LedgerError::DuplicateEmail)
        ));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.snapshot()[0].verified);
    }

    #[rocket::async_test]
    async fn recent_is_newest_first_and_hides_anonymous() {
        let ledger = MemoryLedger::with_rows(vec![
            row("old@x.org", true, 30),
            row("hidden@x.org", false, 1),
            row("new@x.org", true, 2),
        ]);

        let recent = ledger.recent(10).await.unwrap();
        let names: Vec<_> = recent.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, ["new", "old"]);
        assert_eq!(ledger.recent(1).await.unwrap().len(), 1);
    }

    #[rocket::async_test]
    async fn offline_ledger_reports_unavailable() {
        let ledger = MemoryLedger::new();
        ledger.set_offline(true);
        assert!(matches!(ledger.count().await, Err(LedgerError::Unavailable(_))));
        ledger.set_offline(false);
        assert_eq!(ledger.count().await.unwrap(), 0);
    }
}
