//! Options for the TOC builder.
//!
//! # Examples
//!
//! ```
//! use wikipage_toc::{TocBuilder, TocOptions};
//!
//! let options = TocOptions {
//!   min_headings: 3,
//!   title_text: "Contents".to_string(),
//!   ..Default::default()
//! };
//!
//! let builder = TocBuilder::new(options);
//! ```
use serde::{Deserialize, Serialize};

use crate::error::TocError;

/// Structural conventions that tell the builder where to put the TOC.
///
/// The defaults match content already written against the wiki and should
/// only be changed for pages authored with a different vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocMarkers {
  /// Class of the element the TOC is inserted before.
  pub before_class:  String,
  /// Class of the element the TOC is inserted after.
  pub after_class:   String,
  /// Literal token that, alone inside a paragraph, is replaced by the TOC.
  pub token:         String,
  /// Tag name of the explicit TOC directive, replaced by the TOC.
  pub directive_tag: String,
}

impl Default for TocMarkers {
  fn default() -> Self {
    Self {
      before_class:  "toc-before".to_string(),
      after_class:   "toc-after".to_string(),
      token:         "__TOC__".to_string(),
      directive_tag: "wiki:toc".to_string(),
    }
  }
}

/// Options for configuring the TOC builder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct TocOptions {
  /// Minimum number of headings before a TOC is built at all.
  pub min_headings: usize,

  /// Title shown at the top of the TOC container.
  pub title_text: String,

  /// Toggle label shown while the TOC is collapsed.
  pub show_label: String,

  /// Toggle label shown while the TOC is expanded.
  pub hide_label: String,

  /// Render the show/hide toggle.
  pub collapsible: bool,

  /// Start with the TOC content hidden.
  pub collapsed: bool,

  /// Append a hover-revealed permalink (`section-anchor`) to each heading.
  pub section_links: bool,

  /// Shift all levels up so the shallowest heading on the page becomes
  /// level 1.
  pub normalize_levels: bool,

  /// Marker vocabulary used to pick the injection point.
  pub markers: TocMarkers,
}

impl Default for TocOptions {
  fn default() -> Self {
    Self {
      min_headings:     2,
      title_text:       "Table of Contents".to_string(),
      show_label:       "show".to_string(),
      hide_label:       "hide".to_string(),
      collapsible:      true,
      collapsed:        false,
      section_links:    true,
      normalize_levels: false,
      markers:          TocMarkers::default(),
    }
  }
}

impl TocOptions {
  /// Check the options for values the builder cannot work with.
  ///
  /// # Errors
  ///
  /// Returns [`TocError::InvalidOptions`] when `min_headings` is zero or any
  /// marker is empty.
  pub fn validate(&self) -> Result<(), TocError> {
    if self.min_headings == 0 {
      return Err(TocError::InvalidOptions(
        "min_headings must be at least 1".to_string(),
      ));
    }

    let markers = [
      ("before_class", &self.markers.before_class),
      ("after_class", &self.markers.after_class),
      ("token", &self.markers.token),
      ("directive_tag", &self.markers.directive_tag),
    ];
    for (name, value) in markers {
      if value.trim().is_empty() {
        return Err(TocError::InvalidOptions(format!(
          "marker '{name}' must not be empty"
        )));
      }
      if name.ends_with("_class") && value.contains(char::is_whitespace) {
        return Err(TocError::InvalidOptions(format!(
          "marker '{name}' must be a single class name, got '{value}'"
        )));
      }
    }

    Ok(())
  }
}

/// Builder for constructing `TocOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct TocOptionsBuilder {
  options: TocOptions,
}

impl TocOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the minimum heading count.
  #[must_use]
  pub const fn min_headings(mut self, count: usize) -> Self {
    self.options.min_headings = count;
    self
  }

  /// Set the TOC title.
  #[must_use]
  pub fn title_text<S: Into<String>>(mut self, title: S) -> Self {
    self.options.title_text = title.into();
    self
  }

  /// Set the show/hide toggle labels.
  #[must_use]
  pub fn toggle_labels<S: Into<String>>(mut self, show: S, hide: S) -> Self {
    self.options.show_label = show.into();
    self.options.hide_label = hide.into();
    self
  }

  /// Enable or disable the show/hide toggle.
  #[must_use]
  pub const fn collapsible(mut self, enabled: bool) -> Self {
    self.options.collapsible = enabled;
    self
  }

  /// Start collapsed.
  #[must_use]
  pub const fn collapsed(mut self, collapsed: bool) -> Self {
    self.options.collapsed = collapsed;
    self
  }

  /// Enable or disable per-heading permalinks.
  #[must_use]
  pub const fn section_links(mut self, enabled: bool) -> Self {
    self.options.section_links = enabled;
    self
  }

  /// Enable or disable heading level normalisation.
  #[must_use]
  pub const fn normalize_levels(mut self, enabled: bool) -> Self {
    self.options.normalize_levels = enabled;
    self
  }

  /// Replace the marker vocabulary.
  #[must_use]
  pub fn markers(mut self, markers: TocMarkers) -> Self {
    self.options.markers = markers;
    self
  }

  /// Build the final `TocOptions`.
  #[must_use]
  pub fn build(self) -> TocOptions {
    self.options
  }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  #[test]
  fn test_default_markers_match_wiki_vocabulary() {
    let markers = TocMarkers::default();
    assert_eq!(markers.before_class, "toc-before");
    assert_eq!(markers.after_class, "toc-after");
    assert_eq!(markers.token, "__TOC__");
    assert_eq!(markers.directive_tag, "wiki:toc");
  }

  #[test]
  fn test_builder_chains() {
    let options = TocOptionsBuilder::new()
      .min_headings(4)
      .title_text("Inhalt")
      .toggle_labels("anzeigen", "verbergen")
      .collapsed(true)
      .section_links(false)
      .build();

    assert_eq!(options.min_headings, 4);
    assert_eq!(options.title_text, "Inhalt");
    assert_eq!(options.show_label, "anzeigen");
    assert_eq!(options.hide_label, "verbergen");
    assert!(options.collapsed);
    assert!(!options.section_links);
    assert!(options.collapsible);
  }

  #[test]
  fn test_validate_rejects_zero_threshold() {
    let options = TocOptionsBuilder::new().min_headings(0).build();
    let err = options.validate().unwrap_err();
    assert!(err.to_string().contains("min_headings"));
  }

  #[test]
  fn test_validate_rejects_bad_markers() {
    let mut options = TocOptions::default();
    options.markers.token = "  ".to_string();
    assert!(options.validate().is_err());

    let mut options = TocOptions::default();
    options.markers.before_class = "toc before".to_string();
    assert!(options.validate().is_err());

    assert!(TocOptions::default().validate().is_ok());
  }
}
