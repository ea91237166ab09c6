//! Commented default configuration files written by `wikipage init`.
use crate::error::ConfigError;

/// Default configuration in TOML, with every key at its default value.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# wikipage configuration file

# How headings are found: "dom" parses the page, "text" scans the raw markup
mode = "dom"

# Prepend the default TOC stylesheet to rendered pages
inline_styles = false

[toc]
# Set to false to leave pages untouched
enabled = true

# Pages with fewer headings than this get no table of contents
min_headings = 2

# Title shown above the list
title = "Table of Contents"

# Toggle labels, shown as [show] / [hide]
show_label = "show"
hide_label = "hide"

# Whether the TOC can be collapsed, and whether it starts collapsed
collapsible = true
collapsed = false

# Append a hover permalink to every heading
section_links = true

# Treat the shallowest heading on the page as level 1
normalize_levels = false

[toc.markers]
# Class of an element the TOC is inserted before
before_class = "toc-before"

# Class of an element the TOC is inserted after
after_class = "toc-after"

# A paragraph holding only this text is replaced by the TOC
token = "__TOC__"

# This tag is replaced by the TOC
directive_tag = "wiki:toc"
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "mode": "dom",
  "inline_styles": false,
  "toc": {
    "enabled": true,
    "min_headings": 2,
    "title": "Table of Contents",
    "show_label": "show",
    "hide_label": "hide",
    "collapsible": true,
    "collapsed": false,
    "section_links": true,
    "normalize_levels": false,
    "markers": {
      "before_class": "toc-before",
      "after_class": "toc-after",
      "token": "__TOC__",
      "directive_tag": "wiki:toc"
    }
  }
}
"#;

/// Get the configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
