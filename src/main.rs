use tracing_subscriber::{fmt, EnvFilter};

#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> _ {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();

    petition_ledger::rocket()
}
