//! Types for the wikipage-toc public API and internal use.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A heading discovered in page content, before numbering.
///
/// `S` is the handle back to where the heading came from: a byte range in
/// raw-text mode, a DOM node in DOM mode.
#[derive(Debug, Clone)]
pub struct HeadingDescriptor<S> {
  /// Heading rank, 1 for `h1` through 6 for `h6`.
  pub level:    u8,
  /// Tag-stripped, whitespace-trimmed heading text.
  pub raw_text: String,
  /// Origin of the heading in the scanned content.
  pub source:   S,
}

/// One rendered entry of a table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocItem {
  /// Heading level (1-6), after optional normalisation.
  pub level:  u8,
  /// Hierarchical section number such as `2.1.3`.
  pub number: String,
  /// Anchor name, unique within one build.
  pub anchor: String,
  /// Heading text used as the entry label.
  pub text:   String,
}

/// Where the table of contents ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
  /// Immediately before the first `toc-before` marker.
  BeforeMarker,
  /// Immediately after the first `toc-after` marker.
  AfterMarker,
  /// In place of a block whose only text is the `__TOC__` token.
  TokenBlock,
  /// In place of the TOC directive tag.
  Directive,
  /// Before the first discovered heading.
  BeforeFirstHeading,
  /// A TOC container already sits at the chosen location; nothing was
  /// inserted.
  AlreadyPresent,
}

impl Placement {
  /// Whether this placement actually spliced a new container into the page.
  #[must_use]
  pub const fn inserted(self) -> bool {
    !matches!(self, Self::AlreadyPresent)
  }
}

impl fmt::Display for Placement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::BeforeMarker => "before marker",
      Self::AfterMarker => "after marker",
      Self::TokenBlock => "token block",
      Self::Directive => "directive",
      Self::BeforeFirstHeading => "before first heading",
      Self::AlreadyPresent => "already present",
    };
    f.write_str(name)
  }
}

/// Result of one TOC build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocResult {
  /// Entries in document order.
  pub items:     Vec<TocItem>,
  /// The injection branch that fired.
  pub placement: Placement,
  /// Rendered `wiki-toc-container` markup.
  pub markup:    String,
}

/// A page after running it through the TOC builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
  /// Rewritten page markup, or the input unchanged when no TOC was built.
  pub html: String,
  /// The build result, `None` when the page had too few headings.
  pub toc:  Option<TocResult>,
}

/// How headings are discovered and where the splice happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocMode {
  /// Parse the page into a DOM, query headings structurally and splice
  /// nodes.
  #[default]
  Dom,
  /// Scan the raw markup string with patterns and splice text.
  Text,
}

impl fmt::Display for TocMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Dom => f.write_str("dom"),
      Self::Text => f.write_str("text"),
    }
  }
}

impl std::str::FromStr for TocMode {
  type Err = crate::error::TocError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "dom" => Ok(Self::Dom),
      "text" | "raw" => Ok(Self::Text),
      other => {
        Err(crate::error::TocError::InvalidOptions(format!(
          "unknown TOC mode '{other}', expected 'dom' or 'text'"
        )))
      },
    }
  }
}
