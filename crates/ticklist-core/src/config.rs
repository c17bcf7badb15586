use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  info
};

use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::storage::validate_key;

pub const CONFIG_ENV: &str =
  "TICKLIST_CONFIG";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
  pub key:      String,
  pub data_dir: Option<PathBuf>
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      key:      DEFAULT_STORAGE_KEY
        .to_string(),
      data_dir: None
    }
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
  pub filter: Option<String>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub storage:     StorageConfig,
  pub log:         LogConfig,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

impl Config {
  /// Resolves and reads the config file; missing files fall back to
  /// defaults, unreadable or invalid ones are errors.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) = resolve_config_path(
      override_path
    )?
    else {
      debug!(
        "no config file; using defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let mut cfg = Self::load_file(&path)?;
    cfg.loaded_from = Some(path);
    Ok(cfg)
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    Self::parse(&text).with_context(
      || {
        format!(
          "invalid config in {}",
          path.display()
        )
      }
    )
  }

  pub fn parse(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg: Config =
      toml::from_str(text)?;
    validate_key(&cfg.storage.key)
      .context("bad [storage] key")?;
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .trim()
        .to_string();
      let value = v.trim().to_string();
      debug!(key = %key, value = %value, "applying override");

      match key.as_str() {
        | "storage.key" => {
          validate_key(&value).context(
            "bad storage.key override"
          )?;
          self.storage.key = value;
        }
        | "storage.data_dir" => {
          self.storage.data_dir =
            (!value.is_empty())
              .then(|| {
                PathBuf::from(value)
              });
        }
        | "log.filter" => {
          self.log.filter =
            (!value.is_empty())
              .then_some(value);
        }
        | other => {
          return Err(anyhow!(
            "unknown config key: {other}"
          ));
        }
      }
    }
    Ok(())
  }
}

#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(cfg_value) =
    cfg.storage.data_dir.as_deref()
  {
    expand_tilde(cfg_value)
  } else {
    default_data_dir()?
  };

  debug!(dir = %dir.display(), "resolved data directory");
  Ok(dir)
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(expand_tilde(
      path
    )));
  }

  if let Ok(env_path) =
    std::env::var(CONFIG_ENV)
  {
    if env_path == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(expand_tilde(
      Path::new(&env_path)
    )));
  }

  let Some(config_dir) =
    dirs::config_dir()
  else {
    return Ok(None);
  };
  let candidate = config_dir
    .join("ticklist")
    .join("config.toml");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let base = dirs::data_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine data \
         directory"
      )
    })?;
  Ok(base.join("ticklist"))
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
