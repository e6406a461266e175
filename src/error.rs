use rocket::http::Status;
use rocket::response::{self, status, Responder};
use rocket::serde::json::{json, Json};
use rocket::Request;
use thiserror::Error;

use crate::validation::FieldError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("email already present in the ledger")]
    DuplicateEmail,

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for LedgerError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match e {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                LedgerError::DuplicateEmail
            }
            e => LedgerError::Database(e),
        }
    }
}

pub const ALREADY_SIGNED: &str = "This email has already signed the petition";
pub const TRY_AGAIN: &str = "Failed to submit signature. Please try again.";

#[derive(Error, Debug)]
pub enum SignError {
    #[error("submission failed validation")]
    Invalid(Vec<FieldError>),

    #[error("{}", ALREADY_SIGNED)]
    AlreadySigned,

    #[error("{}", TRY_AGAIN)]
    Unavailable,
}

impl From<LedgerError> for SignError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateEmail => SignError::AlreadySigned,
            _ => SignError::Unavailable,
        }
    }
}

impl<'r> Responder<'r, 'static> for SignError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (code, body) = match self {
            SignError::Invalid(errors) => (
                Status::BadRequest,
                json!({ "success": false, "errors": errors }),
            ),
            SignError::AlreadySigned => (
                Status::BadRequest,
                json!({ "success": false, "message": ALREADY_SIGNED }),
            ),
            SignError::Unavailable => (
                Status::InternalServerError,
                json!({ "success": false, "message": TRY_AGAIN }),
            ),
        };

        status::Custom(code, Json(body)).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error};

    #[test]
    fn unique_violation_is_a_duplicate() {
        let e = Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        assert!(matches!(LedgerError::from(e), LedgerError::DuplicateEmail));
        assert!(matches!(
            LedgerError::from(Error::NotFound),
            LedgerError::Database(_)
        ));
    }

    #[test]
    fn ledger_failures_collapse_to_generic_sign_errors() {
        assert!(matches!(
            SignError::from(LedgerError::DuplicateEmail),
            SignError::AlreadySigned
        ));
        assert!(matches!(
            SignError::from(LedgerError::Unavailable("pool timed out".into())),
            SignError::Unavailable
        ));
        assert_eq!(SignError::Unavailable.to_string(), TRY_AGAIN);
    }
}
