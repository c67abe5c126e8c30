use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bloom_instruments::scoring::ScoringOptions;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const BUCKET_ENV: &str = "BLOOM_BUCKET";
pub const DATA_DIR_ENV: &str = "BLOOM_DATA_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub scoring: ScoringOptions,
    /// Questionnaire definition file replacing the built-in SDQ wording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    Local {
        /// Defaults to the platform data directory.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        root: Option<PathBuf>,
    },
    S3 {
        bucket: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        region: Option<String>,
    },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Local { root: None }
    }
}

pub fn config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("bloom").join("config.json"))
}

/// Where the local backend keeps documents when no root is configured.
pub fn default_data_dir() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("bloom"))
}

/// Load the config at `path` (or the default location), migrate it, apply
/// environment overrides and validate it. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> eyre::Result<BloomConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };

    let config = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
        let config = parse_config(&contents)?;
        tracing::debug!(path = %path.display(), "config loaded");
        config
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        BloomConfig::default()
    };

    let config = apply_overrides(config, |key| std::env::var(key).ok());
    config.scoring.thresholds.validate()?;
    Ok(config)
}

/// Parse and migrate a config document.
pub fn parse_config(contents: &str) -> eyre::Result<BloomConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: BloomConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// `BLOOM_DATA_DIR` selects the local backend at that root; `BLOOM_BUCKET`
/// selects S3 and wins if both are set.
pub fn apply_overrides(
    mut config: BloomConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BloomConfig {
    if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        config.storage = StorageBackend::Local {
            root: Some(PathBuf::from(dir)),
        };
    }
    if let Some(bucket) = lookup(BUCKET_ENV).filter(|v| !v.is_empty()) {
        let region = match &config.storage {
            StorageBackend::S3 { region, .. } => region.clone(),
            StorageBackend::Local { .. } => None,
        };
        config.storage = StorageBackend::S3 { bucket, region };
    }
    config
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update bloom."
        ));
    }

    // v0 → v1: top-level `data_dir` moves under a tagged `storage` section
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(data_dir) = obj.remove("data_dir") {
            obj.insert(
                "storage".to_string(),
                serde_json::json!({ "type": "local", "root": data_dir }),
            );
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (storage section)");
    }

    Ok(json)
}

pub fn save_config(config: &BloomConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
