//! The table of contents builder.
use kuchikikiki::NodeRef;
use log::trace;

use crate::{
  anchor::AnchorNames,
  dom,
  numbering::TocNumberState,
  options::TocOptions,
  render,
  text::{self, TextPatterns},
  types::{HeadingDescriptor, PageOutcome, TocItem, TocMode, TocResult},
};

/// Builds a numbered, anchored table of contents for one page at a time.
///
/// A builder holds no state between calls: numbering counters and the set of
/// used anchor names are created fresh for every build, so one builder can
/// be reused across pages.
#[derive(Debug, Clone)]
pub struct TocBuilder {
  options:  TocOptions,
  patterns: TextPatterns,
}

impl Default for TocBuilder {
  fn default() -> Self {
    Self::new(TocOptions::default())
  }
}

impl TocBuilder {
  /// Create a builder. Marker patterns for raw-text mode are compiled here.
  #[must_use]
  pub fn new(options: TocOptions) -> Self {
    let patterns = TextPatterns::new(&options.markers);
    Self { options, patterns }
  }

  #[must_use]
  pub const fn options(&self) -> &TocOptions {
    &self.options
  }

  /// Fewest headings for which a TOC is produced. Never below one.
  const fn threshold(&self) -> usize {
    if self.options.min_headings == 0 {
      1
    } else {
      self.options.min_headings
    }
  }

  /// Number and anchor a heading sequence.
  ///
  /// Returns one item per heading, in the same order. No threshold is
  /// applied here.
  #[must_use]
  pub fn items_for<S>(&self, headings: &[HeadingDescriptor<S>]) -> Vec<TocItem> {
    let shift = if self.options.normalize_levels {
      headings
        .iter()
        .map(|h| h.level)
        .min()
        .map_or(0, |min| min.saturating_sub(1))
    } else {
      0
    };

    let mut numbers = TocNumberState::new();
    let mut anchors = AnchorNames::new();

    headings
      .iter()
      .map(|heading| {
        let level = heading.level.saturating_sub(shift).max(1);
        let number = numbers.advance(level);
        let anchor = anchors.claim(&heading.raw_text);
        trace!(
          "TOC entry {}: {number} (h{level}) -> #{anchor}",
          numbers.total()
        );
        TocItem {
          level,
          number,
          anchor,
          text: heading.raw_text.clone(),
        }
      })
      .collect()
  }

  /// Render items as the complete TOC container markup.
  #[must_use]
  pub fn render(&self, items: &[TocItem]) -> String {
    render::render_container(&render::render_list(items), &self.options)
  }

  /// Build a TOC for a parsed page and splice it in place.
  ///
  /// Headings gain anchor markers and the container is inserted at the
  /// first matching injection point. Returns `None`, leaving the tree
  /// untouched, when the page has fewer headings than the threshold.
  pub fn build_toc(&self, root: &NodeRef) -> Option<TocResult> {
    let headings = dom::scan_headings(root);
    if headings.len() < self.threshold() {
      return None;
    }

    let items = self.items_for(&headings);
    for (heading, item) in headings.iter().zip(&items) {
      dom::decorate_heading(&heading.source, item, self.options.section_links);
    }

    let markup = self.render(&items);
    let placement = dom::place(
      root,
      &markup,
      &self.options.markers,
      headings.first().map(|h| &h.source),
    );

    Some(TocResult {
      items,
      placement,
      markup,
    })
  }

  /// Build a TOC over raw markup.
  ///
  /// Returns the rewritten markup (headings anchored, TOC spliced) with the
  /// build result, or `None` when the page has fewer headings than the
  /// threshold. The same threshold applies as in DOM mode.
  #[must_use]
  pub fn build_toc_text(&self, page: &str) -> Option<(String, TocResult)> {
    let headings = text::scan_headings(page);
    if headings.len() < self.threshold() {
      return None;
    }

    let items = self.items_for(&headings);
    let (rewritten, first_heading_at) = text::rewrite_headings(
      page,
      &headings,
      &items,
      self.options.section_links,
    );

    let markup = self.render(&items);
    let (html, placement) = text::place(
      &rewritten,
      &markup,
      &self.options.markers,
      &self.patterns,
      first_heading_at,
    );

    Some((html, TocResult {
      items,
      placement,
      markup,
    }))
  }

  /// Run the builder over page markup in the given mode.
  ///
  /// Whole documents are re-serialized as documents, anything else as a
  /// fragment. The input comes back unchanged when no TOC is built.
  #[must_use]
  pub fn process(&self, html: &str, mode: TocMode) -> PageOutcome {
    let unchanged = || {
      PageOutcome {
        html: html.to_string(),
        toc:  None,
      }
    };

    match mode {
      TocMode::Text => {
        self
          .build_toc_text(html)
          .map_or_else(unchanged, |(html, toc)| {
            PageOutcome {
              html,
              toc: Some(toc),
            }
          })
      },
      TocMode::Dom => {
        let page = dom::parse_page(html);
        let Some(toc) = self.build_toc(&page.root()) else {
          return unchanged();
        };
        match dom::serialize_page(&page) {
          Ok(html) => {
            PageOutcome {
              html,
              toc: Some(toc),
            }
          },
          Err(e) => {
            log::error!("Failed to serialize page after TOC insertion: {e}");
            unchanged()
          },
        }
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{options::TocOptionsBuilder, types::Placement};

  fn heading(level: u8, text: &str) -> HeadingDescriptor<()> {
    HeadingDescriptor {
      level,
      raw_text: text.to_string(),
      source: (),
    }
  }

  #[test]
  fn test_items_number_and_anchor() {
    let builder = TocBuilder::default();
    let items = builder.items_for(&[
      heading(1, "Intro"),
      heading(2, "Background"),
      heading(2, "Background"),
    ]);

    let summary: Vec<_> = items
      .iter()
      .map(|i| (i.level, i.number.as_str(), i.anchor.as_str()))
      .collect();
    assert_eq!(summary, [
      (1, "1", "Intro"),
      (2, "1.1", "Background"),
      (2, "1.2", "Background_1"),
    ]);
  }

  #[test]
  fn test_items_normalize_levels() {
    let builder =
      TocBuilder::new(TocOptionsBuilder::new().normalize_levels(true).build());
    let items = builder.items_for(&[heading(3, "A"), heading(4, "B")]);
    assert_eq!(items[0].level, 1);
    assert_eq!(items[0].number, "1");
    assert_eq!(items[1].number, "1.1");

    let plain = TocBuilder::default().items_for(&[heading(3, "A")]);
    assert_eq!(plain[0].number, "1.1.1");
  }

  #[test]
  fn test_zero_threshold_acts_as_one() {
    let builder = TocBuilder::new(TocOptionsBuilder::new().min_headings(0).build());
    assert!(builder.build_toc_text("<p>no headings</p>").is_none());
    assert!(builder.build_toc_text("<h1>One</h1>").is_some());
  }

  #[test]
  fn test_process_text_and_dom_agree_on_items() {
    let page = "<h1>Intro</h1><p>a</p><h2>Setup</h2>";
    let builder = TocBuilder::default();

    let dom = builder.process(page, TocMode::Dom).toc;
    let text = builder.process(page, TocMode::Text).toc;

    assert!(dom.is_some());
    assert_eq!(dom.as_ref().map(|t| &t.items), text.as_ref().map(|t| &t.items));
    assert_eq!(
      dom.map(|t| t.placement),
      Some(Placement::BeforeFirstHeading)
    );
  }
}
