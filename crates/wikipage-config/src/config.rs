use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};
use wikipage_toc::{TocMarkers, TocMode, TocOptions};

use crate::error::ConfigError;

/// Configuration for rendering wiki pages.
///
/// Loaded from one or more TOML or JSON files, later files overriding
/// earlier ones key by key, then adjusted with `--config KEY=VALUE`
/// overrides from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Heading discovery mode.
  pub mode: TocMode,

  /// Prepend the default TOC stylesheet to rendered pages.
  pub inline_styles: bool,

  /// Table of contents settings.
  pub toc: TocConfig,
}

/// The `[toc]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
  /// When false, pages pass through untouched.
  pub enabled:          bool,
  pub min_headings:     usize,
  pub title:            String,
  pub show_label:       String,
  pub hide_label:       String,
  pub collapsible:      bool,
  pub collapsed:        bool,
  pub section_links:    bool,
  pub normalize_levels: bool,
  pub markers:          MarkerConfig,
}

impl Default for TocConfig {
  fn default() -> Self {
    let options = TocOptions::default();
    Self {
      enabled:          true,
      min_headings:     options.min_headings,
      title:            options.title_text,
      show_label:       options.show_label,
      hide_label:       options.hide_label,
      collapsible:      options.collapsible,
      collapsed:        options.collapsed,
      section_links:    options.section_links,
      normalize_levels: options.normalize_levels,
      markers:          MarkerConfig::default(),
    }
  }
}

/// The `[toc.markers]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
  pub before_class:  String,
  pub after_class:   String,
  pub token:         String,
  pub directive_tag: String,
}

impl Default for MarkerConfig {
  fn default() -> Self {
    let markers = TocMarkers::default();
    Self {
      before_class:  markers.before_class,
      after_class:   markers.after_class,
      token:         markers.token,
      directive_tag: markers.directive_tag,
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::InvalidOverride {
        key:      key.to_string(),
        value:    value.to_string(),
        expected: "true/false, yes/no, or 1/0",
      })
    },
  }
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::InvalidOverride {
      key:      key.to_string(),
      value:    value.to_string(),
      expected: "a positive integer",
    }
  })
}

/// Deep-merge `other` into `base`; tables merge recursively, anything else
/// in `other` replaces the value in `base`.
fn merge_tables(base: &mut toml::Table, other: toml::Table) {
  for (key, value) in other {
    match (base.get_mut(&key), value) {
      (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
        merge_tables(existing, incoming);
      },
      (_, value) => {
        base.insert(key, value);
      },
    }
  }
}

impl Config {
  /// Read a TOML or JSON config file into an untyped table.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str::<toml::Table>(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            content.parse::<toml::Table>().map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
    Ok(toml::Value::Table(table).try_into::<Self>()?)
  }

  /// Load configuration from a single file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    Self::from_table(Self::read_table(path)?).map_err(|e| {
      ConfigError::Config(format!(
        "Invalid configuration in {}: {}",
        path.display(),
        e
      ))
    })
  }

  /// Load configuration from the given files (or a discovered one), apply
  /// overrides and validate.
  ///
  /// With no files given, [`Self::find_config_file`] is consulted; with no
  /// file found, defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be read or parsed, an override is
  /// malformed, or the resulting configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut merged = toml::Table::new();

    if config_files.is_empty() {
      if let Some(discovered) = Self::find_config_file() {
        log::info!("Using discovered config file: {}", discovered.display());
        merged = Self::read_table(&discovered)?;
      }
    } else {
      for path in config_files {
        merge_tables(&mut merged, Self::read_table(path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    let mut config = Self::from_table(merged)?;
    config.apply_overrides(config_overrides)?;
    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Keys use the dotted file layout, e.g. `toc.min_headings=3` or
  /// `toc.markers.token=[[TOC]]`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Set a single dotted key.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let toc = &mut self.toc;
    match key {
      "mode" => {
        self.mode = value.parse().map_err(|_| {
          ConfigError::InvalidOverride {
            key:      key.to_string(),
            value:    value.to_string(),
            expected: "'dom' or 'text'",
          }
        })?;
      },
      "inline_styles" => self.inline_styles = parse_bool(key, value)?,
      "toc.enabled" => toc.enabled = parse_bool(key, value)?,
      "toc.min_headings" => toc.min_headings = parse_count(key, value)?,
      "toc.title" => toc.title = value.to_string(),
      "toc.show_label" => toc.show_label = value.to_string(),
      "toc.hide_label" => toc.hide_label = value.to_string(),
      "toc.collapsible" => toc.collapsible = parse_bool(key, value)?,
      "toc.collapsed" => toc.collapsed = parse_bool(key, value)?,
      "toc.section_links" => toc.section_links = parse_bool(key, value)?,
      "toc.normalize_levels" => toc.normalize_levels = parse_bool(key, value)?,
      "toc.markers.before_class" => {
        toc.markers.before_class = value.to_string();
      },
      "toc.markers.after_class" => toc.markers.after_class = value.to_string(),
      "toc.markers.token" => toc.markers.token = value.to_string(),
      "toc.markers.directive_tag" => {
        toc.markers.directive_tag = value.to_string();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See `wikipage init` for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Options for the TOC builder.
  #[must_use]
  pub fn to_toc_options(&self) -> TocOptions {
    let toc = &self.toc;
    TocOptions {
      min_headings:     toc.min_headings,
      title_text:       toc.title.clone(),
      show_label:       toc.show_label.clone(),
      hide_label:       toc.hide_label.clone(),
      collapsible:      toc.collapsible,
      collapsed:        toc.collapsed,
      section_links:    toc.section_links,
      normalize_levels: toc.normalize_levels,
      markers:          TocMarkers {
        before_class:  toc.markers.before_class.clone(),
        after_class:   toc.markers.after_class.clone(),
        token:         toc.markers.token.clone(),
        directive_tag: toc.markers.directive_tag.clone(),
      },
    }
  }

  /// Check values the TOC builder cannot work with.
  ///
  /// # Errors
  ///
  /// Returns an error if `toc.min_headings` is zero or a marker is empty.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self
      .to_toc_options()
      .validate()
      .map_err(|e| ConfigError::Config(e.to_string()))
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "wikipage.toml",
          "wikipage.json",
          ".wikipage.toml",
          ".config/wikipage.toml",
          ".config/wikipage.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home).join("wikipage");
          for filename in &["config.toml", "config.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is not supported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
