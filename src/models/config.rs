use std::path::PathBuf;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// URL path the static directory is mounted under.
pub const STATIC_URL: &str = "/static";

/// How image file writes are ordered relative to the database write.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetWriteMode {
    /// Files are written and removed without regard to the outcome of the
    /// row write. A failed row write leaves the new file orphaned and, on
    /// update, the previous file already deleted.
    #[default]
    Unordered,
    /// The new file is written first and removed again if the row write
    /// fails; the replaced file is removed only after the row was written.
    Compensating,
}

/// Configuration options for the catalog service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Origin prepended to relative image references in responses.
    pub public_base_url: String,
    /// Directory served under [`STATIC_URL`].
    pub static_dir: PathBuf,
    /// Upper bound in bytes of a multipart request body.
    pub upload_limit: usize,
    #[serde(default)]
    pub asset_write_mode: AssetWriteMode,
    #[serde(default)]
    pub remove_image_on_delete: bool,
    #[serde(default)]
    pub sweep_orphaned_images: bool,
}

/// Settings consumed by the product services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub public_base_url: String,
    pub asset_write_mode: AssetWriteMode,
    pub remove_image_on_delete: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:8000".to_string(),
            asset_write_mode: AssetWriteMode::default(),
            remove_image_on_delete: false,
        }
    }
}

impl ServerConfig {
    /// Load settings from `config/default.yaml`, `config/{app_env}.yaml` and
    /// `APP_*` environment variables, later sources taking precedence.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Builder pre-populated with the built-in defaults.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8000_i64)?
            .set_default("database_url", "app.db")?
            .set_default("public_base_url", "http://localhost:8000")?
            .set_default("static_dir", "static")?
            .set_default("upload_limit", 52_428_800_i64)
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> (String, u16) {
        (self.address.clone(), self.port)
    }

    pub fn catalog(&self) -> CatalogConfig {
        CatalogConfig {
            public_base_url: self.public_base_url.clone(),
            asset_write_mode: self.asset_write_mode,
            remove_image_on_delete: self.remove_image_on_delete,
        }
    }
}
