use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    pub email_user: String,
    pub email_pass: String,
    pub email_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookings.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "Nele Barber Shop".to_string()),
            email_user: env::var("EMAIL_USER").unwrap_or_default(),
            email_pass: env::var("EMAIL_PASS").unwrap_or_default(),
            email_api_url: env::var("EMAIL_API_URL").unwrap_or_default(),
        }
    }

    /// Both credentials are needed before a notification can be sent.
    pub fn email_configured(&self) -> bool {
        !self.email_user.is_empty() && !self.email_pass.is_empty()
    }
}
