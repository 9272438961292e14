use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::middleware::auth::{
    Authenticator, CredentialsAuthenticator, ProviderAuthenticator, SessionService,
};
use crate::services::notification_service::MailConfig;
use crate::services::oauth_service::OAuthConfig;
use crate::store::{DocumentStore, StorageConfig};
use crate::utils::file_storage::UploadStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    Credentials,
    OAuth,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub strategy: AuthStrategy,
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Lowercased admin email allow-list for the OAuth strategy.
    pub admin_emails: Vec<String>,
    pub oauth: Option<OAuthConfig>,
}

impl AuthConfig {
    fn from_env() -> Result<Self> {
        let strategy = match env::var("AUTH_STRATEGY").as_deref() {
            Ok("oauth") => AuthStrategy::OAuth,
            Ok("credentials") | Err(_) => AuthStrategy::Credentials,
            Ok(other) => bail!("Unknown AUTH_STRATEGY: {other}"),
        };

        let session_secret =
            env::var("SESSION_SECRET").context("SESSION_SECRET must be configured")?;

        let (admin_username, admin_password) = if strategy == AuthStrategy::Credentials {
            (
                env::var("ADMIN_USERNAME")
                    .context("ADMIN_USERNAME must be configured for credential login")?,
                env::var("ADMIN_PASSWORD")
                    .context("ADMIN_PASSWORD must be configured for credential login")?,
            )
        } else {
            (String::new(), String::new())
        };

        let admin_emails: Vec<String> = env::var("ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();

        let oauth = if strategy == AuthStrategy::OAuth {
            Some(OAuthConfig {
                client_id: env::var("OAUTH_CLIENT_ID")
                    .context("OAUTH_CLIENT_ID must be configured for OAuth sign-in")?,
                client_secret: env::var("OAUTH_CLIENT_SECRET")
                    .context("OAUTH_CLIENT_SECRET must be configured for OAuth sign-in")?,
            })
        } else {
            None
        };

        Ok(Self {
            strategy,
            session_secret,
            admin_username,
            admin_password,
            admin_emails,
            oauth,
        })
    }

    /// Build the deployment's active authenticator.
    pub fn authenticator(&self) -> Authenticator {
        let sessions = SessionService::new(&self.session_secret);
        match self.strategy {
            AuthStrategy::Credentials => Authenticator::Credentials(CredentialsAuthenticator::new(
                self.admin_username.clone(),
                self.admin_password.clone(),
                sessions,
            )),
            AuthStrategy::OAuth => Authenticator::Provider(ProviderAuthenticator::new(
                self.admin_emails.clone(),
                sessions,
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub base_url: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    pub store: DocumentStore,
    pub uploads: UploadStorage,
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub async fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();

        // Backend selection happens here, once: production with a bucket uses
        // S3 (with bundled seed fallback), everything else uses local files.
        let bucket = env::var("S3_BUCKET").ok().filter(|b| !b.is_empty());
        let storage = match (environment, bucket) {
            (Environment::Production, Some(bucket)) => StorageConfig::S3 {
                bucket,
                prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "site".to_string()),
                region: env::var("AWS_REGION").ok(),
                seed_dir: PathBuf::from(
                    env::var("SEED_DIR").unwrap_or_else(|_| "data".to_string()),
                ),
            },
            (Environment::Production, None) => {
                tracing::warn!("S3_BUCKET not configured; production is using local files");
                StorageConfig::Local {
                    data_dir: data_dir_from_env(),
                }
            }
            (Environment::Development, _) => StorageConfig::Local {
                data_dir: data_dir_from_env(),
            },
        };
        let store = DocumentStore::from_config(&storage).await?;

        let uploads = UploadStorage::new(
            env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
        );

        let mail = env::var("RESEND_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|api_key| MailConfig {
                api_key,
                recipient: env::var("NOTIFICATION_EMAIL")
                    .unwrap_or_else(|_| "hello@sheetsmith.dev".to_string()),
                sender: env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "noreply@sheetsmith.dev".to_string()),
            });

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            environment,
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            cors_origins,
            auth: AuthConfig::from_env()?,
            store,
            uploads,
            mail,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

fn data_dir_from_env() -> PathBuf {
    PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}
