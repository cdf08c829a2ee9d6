use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::access::Credentials;
use crate::constants::constants;

/// Deployment preferences from `prefs.toml`. Every field is optional; the
/// constants fill in whatever is missing.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
  pub data_dir: Option<PathBuf>,
  pub guardian_passcode: Option<String>,
  pub admin_username: Option<String>,
  pub admin_password: Option<String>,
  /// Program and arguments that record speech and print the transcript on stdout.
  pub voice_command: Option<Vec<String>>,
  #[serde(default)]
  pub search: SearchConfig,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct SearchConfig {
  pub enabled: Option<bool>,
  pub api_key_env: Option<String>,
  pub model: Option<String>,
  pub endpoint: Option<String>,
  pub timeout_secs: Option<u64>,
}

impl SearchConfig {
  pub fn enabled(&self) -> bool {
    self.enabled.unwrap_or(true)
  }

  pub fn api_key_env(&self) -> &str {
    self.api_key_env.as_deref().unwrap_or(&constants().gemini_api_key_env)
  }

  pub fn model(&self) -> String {
    self.model.clone().unwrap_or_else(|| constants().gemini_model.clone())
  }

  pub fn endpoint(&self) -> String {
    self.endpoint.clone().unwrap_or_else(|| constants().gemini_endpoint.clone())
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs.unwrap_or(constants().search_timeout_secs).max(1))
  }
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "ahbab")
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Ok(config) = Self::parse(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  pub fn parse(content: &str) -> Result<Self> {
    toml::from_str(content).context("prefs.toml is malformed")
  }

  /// Where the catalog blobs and logs live.
  pub fn data_dir(&self) -> Option<PathBuf> {
    self.data_dir.clone().or_else(|| project_dirs().map(|d| d.data_dir().to_path_buf()))
  }

  pub fn guardian_passcode(&self) -> String {
    self.guardian_passcode.clone().unwrap_or_else(|| constants().guardian_passcode.clone())
  }

  pub fn admin_credentials(&self) -> Credentials {
    let c = constants();
    Credentials {
      username: self.admin_username.clone().unwrap_or_else(|| c.admin_username.clone()),
      password: self.admin_password.clone().unwrap_or_else(|| c.admin_password.clone()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_uses_constants() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.guardian_passcode(), constants().guardian_passcode);
    assert_eq!(config.admin_credentials().username, "admin");
    assert!(config.search.enabled());
    assert_eq!(config.search.api_key_env(), "GEMINI_API_KEY");
    assert_eq!(config.search.timeout(), Duration::from_secs(constants().search_timeout_secs));
  }

  #[test]
  fn overrides_are_read() {
    let config = Config::parse(
      r#"
        data_dir = "/tmp/ahbab"
        guardian_passcode = "9876"
        admin_password = "s3cret"
        voice_command = ["whisper-listen", "--lang", "ar"]

        [search]
        enabled = false
        model = "gemini-pro"
        timeout_secs = 3
      "#,
    )
    .unwrap();
    assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/ahbab")));
    assert_eq!(config.guardian_passcode(), "9876");
    assert_eq!(config.admin_credentials().password, "s3cret");
    assert_eq!(config.voice_command.as_deref().map(<[String]>::len), Some(3));
    assert!(!config.search.enabled());
    assert_eq!(config.search.model(), "gemini-pro");
    assert_eq!(config.search.timeout(), Duration::from_secs(3));
  }

  #[test]
  fn malformed_file_is_an_error() {
    assert!(Config::parse("data_dir = [").is_err());
  }
}
