use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic_api_url: String,
    pub clinic_api_key: String,
    /// Backstop for the booking horizon when the clinic policy row is
    /// missing upstream.
    pub booking_horizon_days: i64,
    /// Upper bound on any single clinic API read.
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            clinic_api_url: env::var("CLINIC_API_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using empty value");
                    String::new()
                }),
            clinic_api_key: env::var("CLINIC_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_KEY not set, using empty value");
                    String::new()
                }),
            booking_horizon_days: env::var("BOOKING_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
            request_timeout_secs: env::var("CLINIC_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.clinic_api_url.is_empty() && !self.clinic_api_key.is_empty()
    }
}
