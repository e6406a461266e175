//! The petition ledger service: public count, recent signers, and signing.
//!
//! Reads never fail from the caller's point of view; if the ledger cannot be
//! reached a fixed fallback is served so the public counter always renders.
//! Writes report failure, but only generically.
//!
//! The signature number handed back after signing is advisory. It is the
//! count observed just before the insert, plus one, plus the baseline, and
//! concurrent signers may be given the same number. Only the unique email
//! constraint in the ledger decides who signed.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::config::PetitionConfig;
use crate::error::{LedgerError, SignError};
use crate::ledger::Ledger;
use crate::models::{NewSignature, PetitionCount, RecentSignature, SignReceipt, SignatureForm};
use crate::validation;

pub const RECENT_LIMIT: usize = 10;
pub const THANK_YOU: &str = "Thank you for signing the petition!";

pub struct Petition {
    ledger: Arc<dyn Ledger>,
    config: PetitionConfig,
}

impl Petition {
    pub fn new(ledger: Arc<dyn Ledger>, config: PetitionConfig) -> Self {
        Self { ledger, config }
    }

    pub async fn current_count(&self) -> PetitionCount {
        match self.ledger.count().await {
            Ok(raw) => self.tally(raw),
            Err(e) => {
                warn!(error = %e, "serving fallback petition count");
                self.fallback_count()
            }
        }
    }

    pub async fn recent(&self) -> Vec<RecentSignature> {
        match self.ledger.recent(RECENT_LIMIT).await {
            Ok(recent) => recent,
            Err(e) => {
                warn!(error = %e, "serving fallback recent signatures");
                fallback_recent(Utc::now())
            }
        }
    }

    pub async fn sign(
        &self,
        form: &SignatureForm,
        client_ip: Option<IpAddr>,
    ) -> Result<SignReceipt, SignError> {
        let valid = validation::validate(form).map_err(SignError::Invalid)?;

        let already_signed = self.ledger.contains_email(&valid.email).await.map_err(|e| {
            error!(error = %e, "duplicate check failed");
            SignError::from(e)
        })?;
        if already_signed {
            return Err(SignError::AlreadySigned);
        }

        let observed = self.ledger.count().await.map_err(|e| {
            error!(error = %e, "count before insert failed");
            SignError::from(e)
        })?;

        let new = NewSignature {
            id: uuid::Uuid::new_v4(),
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email,
            postcode: valid.postcode,
            location: valid.location.to_string(),
            comment: valid.comment,
            display_name: valid.display_name,
            subscribe: valid.subscribe,
            ip_address: client_ip.map(|ip| ip.to_string()),
        };

        let stored = self.ledger.insert(new).await.map_err(|e| {
            match &e {
                LedgerError::DuplicateEmail => {
                    info!("lost same-email race, rejecting as duplicate")
                }
                _ => error!(error = %e, "failed to store signature"),
            }
            SignError::from(e)
        })?;

        info!(id = %stored.id, location = %stored.location, "signature recorded");

        Ok(SignReceipt {
            success: true,
            message: THANK_YOU,
            signature_number: observed + 1 + self.config.baseline_offset,
        })
    }

    fn tally(&self, raw: u64) -> PetitionCount {
        let count = raw + self.config.baseline_offset;
        PetitionCount {
            count,
            goal: self.config.goal,
            percentage: percentage(count, self.config.goal),
        }
    }

    fn fallback_count(&self) -> PetitionCount {
        self.tally(0)
    }
}

/// `count / goal * 100` to one decimal place, halves rounded up.
pub fn percentage(count: u64, goal: u64) -> String {
    if goal == 0 {
        return "0.0".to_string();
    }
    let goal = u128::from(goal);
    let tenths = (u128::from(count) * 1000 + goal / 2) / goal;
    format!("{}.{}", tenths / 10, tenths % 10)
}

fn fallback_recent(now: DateTime<Utc>) -> Vec<RecentSignature> {
    [("Sarah", "NSW", 5), ("James", "VIC", 15), ("Emma", "QLD", 30)]
        .into_iter()
        .map(|(first_name, location, minutes_ago)| RecentSignature {
            first_name: first_name.to_string(),
            location: location.to_string(),
            created_at: now - Duration::minutes(minutes_ago),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(percentage(12_847, 100_000), "12.8");
        assert_eq!(percentage(100_000, 100_000), "100.0");
        assert_eq!(percentage(0, 100_000), "0.0");
        assert_eq!(percentage(150, 100), "150.0");
        assert_eq!(percentage(5, 0), "0.0");
        assert_eq!(percentage(13_250, 100_000), "13.3");
        assert_eq!(percentage(21_250, 100_000), "21.3");
        assert_eq!(percentage(13_249, 100_000), "13.2");
        assert_eq!(percentage(1, 3), "33.3");
        assert_eq!(percentage(2, 3), "66.7");
    }

    #[test]
    fn fallback_recent_is_newest_first() {
        let recent = fallback_recent(Utc::now());
        assert_eq!(recent.len(), 3);
        assert!(recent.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }
}
