//! Hierarchical section numbering.

/// Deepest heading level.
pub const MAX_LEVEL: u8 = 6;

/// Per-level heading counters for one TOC build.
///
/// Index 0 counts every heading seen, indices 1-6 count headings at that
/// level since the last shallower heading.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TocNumberState {
  counts: [u32; MAX_LEVEL as usize + 1],
}

impl TocNumberState {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a heading at `level` and return its number.
  ///
  /// Deeper counters are zeroed first. Shallower counters that are still
  /// zero (a level was skipped on the way down) start at 1, so descending
  /// from `1` straight to level 3 yields `1.1.1`. Levels outside 1-6 are
  /// clamped.
  pub fn advance(&mut self, level: u8) -> String {
    let level = usize::from(level.clamp(1, MAX_LEVEL));

    for count in &mut self.counts[level + 1..] {
      *count = 0;
    }
    for count in &mut self.counts[1..level] {
      if *count == 0 {
        *count = 1;
      }
    }
    self.counts[level] += 1;
    self.counts[0] += 1;

    self.counts[1..=level]
      .iter()
      .map(u32::to_string)
      .collect::<Vec<_>>()
      .join(".")
  }

  /// Total number of headings recorded.
  #[must_use]
  pub(crate) const fn total(&self) -> u32 {
    self.counts[0]
  }
}
