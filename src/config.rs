//! User configuration.
//!
//! ## Note for adding new keys
//!
//! New keys added to the config _must_ use `#[serde(default)]` to maintain compatibility with
//! older configs. These keys will be added to the user's configuration automatically.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::access::AllowList;
use crate::surface::SurfaceOptions;
use crate::theme::{Theme, ThemeSource};

/// Size of the signature surface.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
   pub width: u32,
   pub height: u32,
   /// The display's physical-to-logical pixel ratio.
   pub pixel_ratio: f32,
}

impl Default for SurfaceConfig {
   fn default() -> Self {
      let options = SurfaceOptions::default();
      Self {
         width: options.width,
         height: options.height,
         pixel_ratio: options.pixel_ratio,
      }
   }
}

impl From<&SurfaceConfig> for SurfaceOptions {
   fn from(config: &SurfaceConfig) -> Self {
      Self {
         width: config.width,
         height: config.height,
         pixel_ratio: config.pixel_ratio,
      }
   }
}

/// Color tokens. Values are either bare HSL components (`222.2 84% 4.9%`) or CSS colors.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemeConfig {
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub foreground: Option<String>,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub card: Option<String>,
}

impl ThemeSource for ThemeConfig {
   fn token(&self, name: &str) -> Option<String> {
      match name {
         Theme::INK_TOKEN => self.foreground.clone(),
         Theme::PAPER_TOKEN => self.card.clone(),
         _ => None,
      }
   }
}

/// Who may sign or list records.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AccessConfig {
   #[serde(default)]
   pub allowed_emails: Vec<String>,
}

impl AccessConfig {
   pub fn allow_list(&self) -> AllowList {
      AllowList::new(self.allowed_emails.iter().cloned())
   }
}

/// Where records are kept.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
   /// Defaults to the platform's data directory.
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub directory: Option<PathBuf>,
}

/// A user `config.toml` file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
   #[serde(default)]
   pub surface: SurfaceConfig,
   #[serde(default)]
   pub theme: ThemeConfig,
   #[serde(default)]
   pub access: AccessConfig,
   #[serde(default)]
   pub store: StoreConfig,
}

impl UserConfig {
   fn project_dirs() -> Option<ProjectDirs> {
      ProjectDirs::from("", "", "SignPad")
   }

   /// Returns the platform-specific configuration directory.
   pub fn config_dir() -> Option<PathBuf> {
      Self::project_dirs().map(|dirs| dirs.config_dir().to_owned())
   }

   /// Returns the path to the `config.toml` file.
   pub fn path() -> Option<PathBuf> {
      Self::config_dir().map(|dir| dir.join("config.toml"))
   }

   /// Returns the directory records are stored in.
   pub fn store_dir(&self) -> Option<PathBuf> {
      self.store.directory.clone().or_else(|| {
         Self::project_dirs().map(|dirs| dirs.data_dir().to_owned())
      })
   }

   /// Loads the `config.toml` file at `config_file`.
   ///
   /// If the file doesn't exist, it's created with values inherited from `UserConfig::default`.
   pub fn load_or_create(config_file: &Path) -> crate::Result<Self> {
      if let Some(config_dir) = config_file.parent() {
         std::fs::create_dir_all(config_dir)?;
      }
      if !config_file.is_file() {
         let config = Self::default();
         config.save(config_file)?;
         Ok(config)
      } else {
         let file = std::fs::read_to_string(config_file)?;
         let config: Self = match toml::from_str(&file) {
            Ok(config) => config,
            Err(error) => {
               log::error!("error while deserializing config file: {}", error);
               log::error!("falling back to default config");
               return Ok(Self::default());
            }
         };
         // Preemptively save the config to the disk if any new keys have been added.
         config.save(config_file)?;
         Ok(config)
      }
   }

   /// Saves the user configuration to `config_file`.
   pub fn save(&self, config_file: &Path) -> crate::Result<()> {
      std::fs::write(config_file, toml::to_string(self)?)?;
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use crate::access::AccessGate;

   use super::*;

   #[test]
   fn missing_file_is_created_with_defaults() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("nested").join("config.toml");
      let config = UserConfig::load_or_create(&path).unwrap();
      assert_eq!(config, UserConfig::default());
      assert_eq!(config.surface.width, 400);
      assert_eq!(config.surface.height, 200);
      assert!(path.is_file());
   }

   #[test]
   fn missing_keys_take_defaults() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("config.toml");
      std::fs::write(
         &path,
         "[surface]\nwidth = 350\n\n[access]\nallowed_emails = [\"ana@example.com\"]\n",
      )
      .unwrap();

      let config = UserConfig::load_or_create(&path).unwrap();
      assert_eq!(config.surface.width, 350);
      assert_eq!(config.surface.height, 200);
      assert_eq!(config.surface.pixel_ratio, 1.0);
      assert!(config.access.allow_list().is_authorized("ana@example.com"));
      assert_eq!(config.theme, ThemeConfig::default());

      // The file is rewritten with the full set of keys.
      let saved = std::fs::read_to_string(&path).unwrap();
      assert!(saved.contains("height = 200"));
   }

   #[test]
   fn malformed_file_falls_back_to_defaults() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("config.toml");
      std::fs::write(&path, "[surface\nwidth = ").unwrap();
      assert_eq!(UserConfig::load_or_create(&path).unwrap(), UserConfig::default());
   }

   #[test]
   fn theme_tokens_resolve_through_the_config() {
      let config = UserConfig {
         theme: ThemeConfig {
            foreground: Some("0 0% 100%".into()),
            card: None,
         },
         ..Default::default()
      };
      let theme = Theme::resolve(&config.theme);
      assert_eq!(theme.ink, tiny_skia::Color::WHITE);
      assert_eq!(theme.paper, tiny_skia::Color::WHITE);
   }

   #[test]
   fn explicit_store_directory_wins() {
      let config = UserConfig {
         store: StoreConfig {
            directory: Some("/tmp/records".into()),
         },
         ..Default::default()
      };
      assert_eq!(config.store_dir(), Some(PathBuf::from("/tmp/records")));
   }
}
