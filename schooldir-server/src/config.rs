//! Configuration - database and media settings loaded from the environment
//!
//! Database (`MYSQL_*`):
//! - `MYSQL_HOST` (default: localhost), `MYSQL_PORT` (default: 3306)
//! - `MYSQL_USER` (default: root), `MYSQL_PASSWORD` (default: empty)
//! - `MYSQL_DATABASE` (default: school_manager)
//! - `MYSQL_CONNECTION_LIMIT` (default: 10)
//! - `MYSQL_SSL_CA`: CA certificate path or PEM; enables TLS
//! - `APP_ENV`: `production` verifies the CA, anything else only requires TLS
//!
//! Media:
//! - `MEDIA_BACKEND`: `cloudinary` or `local` (default: cloudinary when
//!   `CLOUDINARY_CLOUD_NAME` is set, otherwise local)
//! - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`
//! - `CLOUDINARY_FOLDER` (default: schoolImages)
//! - `PUBLIC_DIR` (default: public)

use std::path::PathBuf;

/// Default pool size
pub const DEFAULT_CONNECTION_LIMIT: u32 = 10;

/// Logical folder images are stored under, remotely and locally
pub const DEFAULT_MEDIA_FOLDER: &str = "schoolImages";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("{var} must be set when MEDIA_BACKEND=cloudinary")]
    Missing { var: &'static str },
}

/// TLS settings for the database connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTls {
    /// CA certificate, either a filesystem path or inline PEM
    pub ca: String,
    /// Verify the server certificate against `ca`
    pub verify: bool,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub tls: Option<DbTls>,
}

impl DbConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let port = parse_var(&lookup, "MYSQL_PORT", 3306)?;
        let max_connections =
            parse_var(&lookup, "MYSQL_CONNECTION_LIMIT", DEFAULT_CONNECTION_LIMIT)?;

        let production = lookup("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));
        let tls = lookup("MYSQL_SSL_CA")
            .filter(|ca| !ca.trim().is_empty())
            .map(|ca| DbTls {
                ca,
                verify: production,
            });

        Ok(Self {
            host: var("MYSQL_HOST", "localhost"),
            port,
            user: var("MYSQL_USER", "root"),
            password: var("MYSQL_PASSWORD", ""),
            database: var("MYSQL_DATABASE", "school_manager"),
            max_connections,
            tls,
        })
    }
}

/// Cloudinary credentials
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

/// Which media strategy this deployment uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaConfig {
    Cloudinary(CloudinaryConfig),
    Local { public_dir: PathBuf, folder: String },
}

impl MediaConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let folder = lookup("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_owned());
        let cloud_name = lookup("CLOUDINARY_CLOUD_NAME").filter(|name| !name.is_empty());

        let backend = match lookup("MEDIA_BACKEND") {
            Some(backend) => backend.to_ascii_lowercase(),
            None if cloud_name.is_some() => "cloudinary".to_owned(),
            None => "local".to_owned(),
        };

        match backend.as_str() {
            "cloudinary" => {
                let required = |var: &'static str| {
                    lookup(var)
                        .filter(|value| !value.is_empty())
                        .ok_or(ConfigError::Missing { var })
                };
                Ok(Self::Cloudinary(CloudinaryConfig {
                    cloud_name: cloud_name.ok_or(ConfigError::Missing {
                        var: "CLOUDINARY_CLOUD_NAME",
                    })?,
                    api_key: required("CLOUDINARY_API_KEY")?,
                    api_secret: required("CLOUDINARY_API_SECRET")?,
                    folder,
                }))
            }
            "local" => Ok(Self::Local {
                public_dir: lookup("PUBLIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("public")),
                folder,
            }),
            _ => Err(ConfigError::Invalid {
                var: "MEDIA_BACKEND",
                value: backend,
            }),
        }
    }

    /// Write local images below `dir`; Cloudinary is unaffected
    pub fn with_public_dir(self, dir: impl Into<PathBuf>) -> Self {
        match self {
            Self::Local { folder, .. } => Self::Local {
                public_dir: dir.into(),
                folder,
            },
            other => other,
        }
    }

    /// Directory local images are served from, if images are stored locally
    pub fn public_dir(&self) -> Option<&std::path::Path> {
        match self {
            Self::Local { public_dir, .. } => Some(public_dir.as_path()),
            Self::Cloudinary(_) => None,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
