use diesel::prelude::*;
use rocket_sync_db_pools::{database, ConnectionPool};

use super::Ledger;
use crate::error::LedgerError;
use crate::models::{NewSignature, RecentSignature, Signature};
use crate::schema::signatures;

#[database("petition")]
pub struct PetitionDb(diesel::PgConnection);

pub struct PgLedger {
    pool: ConnectionPool<PetitionDb, PgConnection>,
}

impl PgLedger {
    pub fn new(pool: ConnectionPool<PetitionDb, PgConnection>) -> Self {
        Self { pool }
    }

    async fn run<F, R>(&self, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let connection = self
            .pool
            .get()
            .await
            .ok_or_else(|| LedgerError::Unavailable("no database connection".to_string()))?;

        connection.run(f).await.map_err(LedgerError::from)
    }
}

#[rocket::async_trait]
impl Ledger for PgLedger {
    async fn count(&self) -> Result<u64, LedgerError> {
        let total = self
            .run(|conn| signatures::table.count().get_result::<i64>(conn))
            .await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RecentSignature>, LedgerError> {
        use crate::schema::signatures::dsl::*;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run(move |conn| {
            signatures
                .filter(display_name.eq(true))
                .order(created_at.desc())
                .limit(limit)
                .select(RecentSignature::as_select())
                .load(conn)
        })
        .await
    }

    async fn contains_email(&self, address: &str) -> Result<bool, LedgerError> {
        use crate::schema::signatures::dsl::*;

        let address = address.to_string();
        let found = self
            .run(move |conn| {
                signatures
                    .filter(email.eq(address))
                    .select(id)
                    .first::<uuid::Uuid>(conn)
                    .optional()
            })
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, signature: NewSignature) -> Result<Signature, LedgerError> {
        self.run(move |conn| {
            diesel::insert_into(signatures::table)
                .values(&signature)
                .returning(Signature::as_returning())
                .get_result(conn)
        })
        .await
    }
}
