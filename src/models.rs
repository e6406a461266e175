use chrono::prelude::*;
use diesel::prelude::*;
use rocket::serde::json::Value;
use rocket::serde::{Deserialize, Serialize};

/// A stored petition signature.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::signatures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Signature {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub postcode: String,
    pub location: String,
    pub comment: Option<String>,
    pub display_name: bool,
    pub subscribe: bool,
    pub ip_address: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Row handed to the ledger by a successful sign; `created_at` is assigned by the store.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::signatures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSignature {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub postcode: String,
    pub location: String,
    pub comment: Option<String>,
    pub display_name: bool,
    pub subscribe: bool,
    pub ip_address: Option<String>,
}

impl NewSignature {
    /// Materializes the stored row, as the store would on insert.
    pub fn into_signature(self, created_at: DateTime<Utc>) -> Signature {
        Signature {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            postcode: self.postcode,
            location: self.location,
            comment: self.comment,
            display_name: self.display_name,
            subscribe: self.subscribe,
            ip_address: self.ip_address,
            verified: false,
            created_at,
        }
    }
}

/// Public projection of a signature. Never carries email, postcode or comment.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
#[diesel(table_name = crate::schema::signatures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecentSignature {
    pub first_name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Signature> for RecentSignature {
    fn from(signature: &Signature) -> Self {
        Self {
            first_name: signature.first_name.clone(),
            location: signature.location.clone(),
            created_at: signature.created_at,
        }
    }
}

/// Body of `POST /sign`. Fields are kept as raw JSON so that missing or
/// wrongly typed values surface as per-field validation errors rather than a
/// parse failure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SignatureForm {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub postcode: Option<Value>,
    pub comment: Option<Value>,
    pub display_name: Option<Value>,
    pub subscribe: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PetitionCount {
    pub count: u64,
    pub goal: u64,
    pub percentage: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SignReceipt {
    pub success: bool,
    pub message: &'static str,
    pub signature_number: u64,
}
