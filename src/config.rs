use std::time::Duration;

use rocket::serde::Deserialize;

pub const DEFAULT_BASELINE_OFFSET: u64 = 12_847;
pub const DEFAULT_GOAL: u64 = 100_000;

/// Petition settings read from Rocket's figment (`Rocket.toml` or `ROCKET_*`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct PetitionConfig {
    /// Signatures collected before the ledger existed. Added to every public total.
    pub baseline_offset: u64,
    pub goal: u64,
    pub rate_limit: RateLimitConfig,
}

impl Default for PetitionConfig {
    fn default() -> Self {
        Self {
            baseline_offset: DEFAULT_BASELINE_OFFSET,
            goal: DEFAULT_GOAL,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::Figment;

    #[test]
    fn missing_keys_take_defaults() {
        let config: PetitionConfig = Figment::from(rocket::Config::default()).extract().unwrap();
        assert_eq!(config, PetitionConfig::default());
    }

    #[test]
    fn nested_rate_limit_overrides() {
        let figment = Figment::from(rocket::Config::default())
            .merge(("baseline_offset", 10))
            .merge(("rate_limit.max_requests", 3));
        let config: PetitionConfig = figment.extract().unwrap();
        assert_eq!(config.baseline_offset, 10);
        assert_eq!(config.goal, DEFAULT_GOAL);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window_secs, 900);
    }
}
