// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{bail, Context};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::{
    db::{
        AgentRepository, CustomerRepository, DashboardRepository, LocationRepository,
        ProductRepository, ReportRepository, SaleRepository, UserRepository,
    },
    services::{
        agent_service::AgentService,
        auth::AuthService,
        customer_service::CustomerService,
        dashboard_service::DashboardService,
        product_service::ProductService,
        report_service::ReportService,
        sale_service::SaleService,
        session::{InMemorySessionStore, SessionStore},
    },
};

const MIN_SECRET_LEN: usize = 32;
// One year.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// Where the database lives: a full URL or the classic host/port/user parts.
#[derive(Clone)]
pub enum DatabaseSettings {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

/// Process-wide settings, read once at start-up.
#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub max_connections: u32,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
    pub port: u16,
    pub public_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = match lookup("DATABASE_URL") {
            Some(url) => DatabaseSettings::Url(url),
            None => DatabaseSettings::Parts {
                host: get("DB_HOST", "localhost"),
                port: get("DB_PORT", "5432").parse().context("DB_PORT must be a port number")?,
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", ""),
                name: get("DB_NAME", "flour_crm"),
            },
        };

        let session_secret = lookup("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {} bytes long", MIN_SECRET_LEN);
        }

        let ttl_hours: i64 = get("SESSION_TTL_HOURS", "24")
            .parse()
            .context("SESSION_TTL_HOURS must be an integer")?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            bail!("SESSION_TTL_HOURS must be between 1 and {}", MAX_SESSION_TTL_HOURS);
        }
        let session_ttl = chrono::Duration::try_hours(ttl_hours).context("SESSION_TTL_HOURS is out of range")?;

        let admin_bootstrap = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Ok(Self {
            database,
            max_connections: get("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            session_secret,
            session_ttl,
            port: get("PORT", "3000").parse().context("PORT must be a port number")?,
            public_dir: PathBuf::from(get("PUBLIC_DIR", "public")),
            fonts_dir: PathBuf::from(get("FONTS_DIR", "fonts")),
            admin_bootstrap,
        })
    }

    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match &self.database {
            DatabaseSettings::Url(url) => {
                PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid Postgres URL")
            }
            DatabaseSettings::Parts { host, port, user, password, name } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(name)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
    pub sessions: Arc<dyn SessionStore>,
    pub auth_service: AuthService,
    pub agent_service: AgentService,
    pub customer_service: CustomerService,
    pub product_service: ProductService,
    pub sale_service: SaleService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
    pub location_repo: LocationRepository,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options()?)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("Database connection established");

        Ok(Self::with_pool(config, db_pool))
    }

    // --- Dependency graph ---
    pub fn with_pool(config: AppConfig, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let agent_repo = AgentRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new();
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let cookie_key = Key::derive_from(config.session_secret.as_bytes());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(config.session_ttl));

        Self {
            auth_service: AuthService::new(user_repo.clone(), db_pool.clone()),
            agent_service: AgentService::new(db_pool.clone(), user_repo, agent_repo),
            customer_service: CustomerService::new(customer_repo),
            product_service: ProductService::new(product_repo),
            sale_service: SaleService::new(sale_repo),
            report_service: ReportService::new(db_pool.clone(), report_repo, config.fonts_dir.clone()),
            dashboard_service: DashboardService::new(dashboard_repo),
            location_repo: LocationRepository::new(db_pool.clone()),
            cookie_key,
            sessions,
            config: Arc::new(config),
            db_pool,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("SESSION_SECRET", SECRET)])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.session_ttl, chrono::Duration::hours(24));
        assert!(config.admin_bootstrap.is_none());
        match config.database {
            DatabaseSettings::Parts { host, port, name, .. } => {
                assert_eq!(host, "localhost");
                assert_eq!(port, 5432);
                assert_eq!(name, "flour_crm");
            }
            DatabaseSettings::Url(_) => panic!("expected parts"),
        }
    }

    #[test]
    fn test_database_url_wins() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SESSION_SECRET", SECRET),
            ("DATABASE_URL", "postgres://u:p@db:5433/ledger"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();

        assert!(matches!(config.database, DatabaseSettings::Url(_)));
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_secret_required_and_long_enough() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SESSION_SECRET", "short")])).is_err());
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("SESSION_SECRET", SECRET), ("PORT", "http")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        for ttl in ["0", "-3", "9000", "9223372036854775807"] {
            let result = AppConfig::from_lookup(lookup(&[("SESSION_SECRET", SECRET), ("SESSION_TTL_HOURS", ttl)]));
            assert!(result.is_err(), "ttl {ttl} accepted");
        }

        let config =
            AppConfig::from_lookup(lookup(&[("SESSION_SECRET", SECRET), ("SESSION_TTL_HOURS", "8")])).unwrap();
        assert_eq!(config.session_ttl, chrono::Duration::hours(8));
    }

    #[test]
    fn test_admin_bootstrap_needs_both_keys() {
        let only_email = AppConfig::from_lookup(lookup(&[
            ("SESSION_SECRET", SECRET),
            ("ADMIN_EMAIL", "admin@flourcrm.com"),
        ]))
        .unwrap();
        assert!(only_email.admin_bootstrap.is_none());

        let both = AppConfig::from_lookup(lookup(&[
            ("SESSION_SECRET", SECRET),
            ("ADMIN_EMAIL", "admin@flourcrm.com"),
            ("ADMIN_PASSWORD", "admin123"),
        ]))
        .unwrap();
        assert_eq!(both.admin_bootstrap.unwrap().email, "admin@flourcrm.com");
    }
}
