use tracing::info;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub client_url: String,
    pub identity_config: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: var_or("PORT", "5000").parse().expect("PORT must be a number"),
            database_url: var_or("DATABASE_URL", "sqlite:teammate.db?mode=rwc"),
            client_url: var_or("CLIENT_URL", "http://localhost:3000"),
            identity_config: var_or("IDENTITY_CONFIG", "identity.json"),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}
