//! Petition signature ledger served over HTTP.
//!
//! `rocket()` wires the app against Postgres; `stage()` carries everything
//! else and only needs a [`SharedLedger`] in managed state, which is how the
//! tests run it over a [`MemoryLedger`](ledger::MemoryLedger).

#[macro_use]
extern crate rocket;

pub mod config;
pub mod error;
pub mod ledger;
pub mod location;
pub mod models;
pub mod petition;
pub mod rate_limit;
pub mod routes;
pub mod schema;
pub mod validation;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};

use config::PetitionConfig;
use ledger::{PetitionDb, PgLedger, SharedLedger};
use petition::Petition;
use rate_limit::RateLimiter;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Full application backed by the `petition` Postgres database.
pub fn rocket() -> Rocket<Build> {
    rocket::build()
        .attach(PetitionDb::fairing())
        .attach(AdHoc::try_on_ignite("Postgres Migrations", run_migrations))
        .attach(AdHoc::try_on_ignite("Postgres Ledger", |rocket| async move {
            match PetitionDb::pool(&rocket).cloned() {
                Some(pool) => Ok(rocket.manage(SharedLedger::new(PgLedger::new(pool)))),
                None => {
                    tracing::error!("petition database pool missing");
                    Err(rocket)
                }
            }
        }))
        .attach(stage())
}

async fn run_migrations(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let Some(db) = PetitionDb::get_one(&rocket).await else {
        tracing::error!("no connection available for migrations");
        return Err(rocket);
    };

    let applied = db
        .run(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await;

    match applied {
        Ok(count) => {
            tracing::info!(count, "migrations applied");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "migrations failed");
            Err(rocket)
        }
    }
}

/// Routes, catchers, config and rate limiting. Expects a [`SharedLedger`]
/// to be managed before ignition completes.
pub fn stage() -> AdHoc {
    AdHoc::try_on_ignite("Petition", |rocket| async move {
        let config: PetitionConfig = match rocket.figment().extract() {
            Ok(config) => config,
            Err(e) => {
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let Some(SharedLedger(ledger)) = rocket.state::<SharedLedger>().cloned() else {
            tracing::error!("no ledger configured");
            return Err(rocket);
        };

        tracing::info!(
            baseline_offset = config.baseline_offset,
            goal = config.goal,
            "petition ledger ready"
        );

        Ok(rocket
            .manage(RateLimiter::new(config.rate_limit.clone()))
            .manage(Petition::new(ledger, config))
            .mount(
                "/api/petition",
                routes![routes::count, routes::recent, routes::sign],
            )
            .mount("/api", routes![routes::health])
            .register(
                "/",
                catchers![
                    routes::bad_request,
                    routes::not_found,
                    routes::unprocessable,
                    routes::too_many_requests,
                    routes::internal_error,
                ],
            ))
    })
}
