//! Anchor name generation for headings.
use std::collections::HashSet;

/// Turn heading text into an anchor name.
///
/// ASCII letters and digits pass through, every other character (whitespace,
/// punctuation, anything non-ASCII) becomes one `_`.
#[must_use]
pub fn sanitize_anchor(text: &str) -> String {
  text
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
    .collect()
}

/// Anchor names handed out during one TOC build.
#[derive(Debug, Default, Clone)]
pub struct AnchorNames {
  used: HashSet<String>,
}

impl AnchorNames {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Claim a unique anchor name for `text`.
  ///
  /// A taken name gets the first free `_1`, `_2`, ... suffix.
  pub fn claim(&mut self, text: &str) -> String {
    let base = sanitize_anchor(text);
    let mut name = base.clone();
    let mut suffix = 1_usize;
    while self.contains(&name) {
      name = format!("{base}_{suffix}");
      suffix += 1;
    }
    self.used.insert(name.clone());
    name
  }

  /// Whether `name` has been handed out already.
  #[must_use]
  pub(crate) fn contains(&self, name: &str) -> bool {
    self.used.contains(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sanitize_keeps_ascii_alphanumerics() {
    assert_eq!(sanitize_anchor("Getting Started!"), "Getting_Started_");
    assert_eq!(sanitize_anchor("Step2"), "Step2");
    assert_eq!(sanitize_anchor("a-b.c"), "a_b_c");
  }

  #[test]
  fn test_sanitize_non_ascii_is_one_underscore_per_char() {
    assert_eq!(sanitize_anchor("Über"), "_ber");
    assert_eq!(sanitize_anchor("日本"), "__");
  }

  #[test]
  fn test_sanitize_empty() {
    assert_eq!(sanitize_anchor(""), "");
  }

  #[test]
  fn test_claim_suffixes_in_order() {
    let mut names = AnchorNames::new();
    assert_eq!(names.claim("Notes"), "Notes");
    assert_eq!(names.claim("Notes"), "Notes_1");
    assert_eq!(names.claim("Notes"), "Notes_2");
    assert!(names.contains("Notes_1"));
  }

  #[test]
  fn test_claim_skips_suffix_taken_by_literal_heading() {
    let mut names = AnchorNames::new();
    assert_eq!(names.claim("A 1"), "A_1");
    assert_eq!(names.claim("A"), "A");
    // "A_1" is already taken by the first heading
    assert_eq!(names.claim("A"), "A_2");
  }

  #[test]
  fn test_claim_empty_text() {
    let mut names = AnchorNames::new();
    assert_eq!(names.claim(""), "");
    assert_eq!(names.claim("  "), "__");
    assert_eq!(names.claim(""), "_1");
  }
}
