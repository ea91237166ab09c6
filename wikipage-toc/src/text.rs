//! Raw-text mode: headings are found with patterns over the page markup and
//! the TOC is spliced into the string.
//!
//! This mode exists for callers that only hold the markup before it is
//! rendered. It understands the same marker vocabulary as the DOM mode but
//! works on tags, not elements, so it cannot see through unbalanced markup.
use std::{ops::Range, sync::LazyLock};

use regex::{Regex, RegexBuilder};

use crate::{
  options::TocMarkers,
  render::{self, CONTAINER_CLASS},
  types::{HeadingDescriptor, Placement, TocItem},
  utils::{compile_or_never, strip_tags, tag_has_class},
};

/// Byte offsets of one heading element inside the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
  /// Start of `<hN`.
  pub start:       usize,
  /// End of the opening tag.
  pub open_end:    usize,
  /// Start of `</hN>`.
  pub close_start: usize,
  /// End of the closing tag.
  pub end:         usize,
}

static HEADING_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("HEADING_OPEN_RE", r"(?i)<h([1-6])(?:\s[^>]*)?>")
});

static HEADING_CLOSE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  (1..=6)
    .map(|level| {
      compile_or_never("HEADING_CLOSE_RE", &format!(r"(?i)</h{level}\s*>"))
    })
    .collect()
});

static DIV_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("DIV_TAG_RE", r"(?i)<(/)?div\b[^>]*>"));

static COMMENT_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("COMMENT_RE", r"(?s)<!--.*?(?:-->|\z)"));

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("START_TAG_RE", r"<([a-zA-Z][^\s/>]*)(?:\s[^>]*)?>")
});

static SECTION_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "SECTION_LINK_RE",
    &format!(
      r#"(?is)<span class="{}">.*?</span>"#,
      render::SECTION_LINK_CLASS
    ),
  )
});

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
  "source", "track", "wbr",
];

/// Patterns built from a marker vocabulary.
#[derive(Debug, Clone)]
pub(crate) struct TextPatterns {
  token:           Regex,
  directive:       Regex,
  directive_block: Regex,
}

impl TextPatterns {
  pub(crate) fn new(markers: &TocMarkers) -> Self {
    let token = regex::escape(&markers.token);
    let tag = regex::escape(&markers.directive_tag);
    let directive = format!(r"<{tag}(?:\s[^>]*)?/?>(?:\s*</{tag}\s*>)?");

    Self {
      token:           compile_or_never(
        "TOKEN_BLOCK_RE",
        &format!(
          r"(?is)<p(?:\s[^>]*)?>\s*(?:<br\s*/?>\s*)?{token}\s*(?:<br\s*/?>\s*)?</p\s*>"
        ),
      ),
      directive:       compile_or_never(
        "DIRECTIVE_RE",
        &format!("(?is){directive}"),
      ),
      directive_block: compile_or_never(
        "DIRECTIVE_BLOCK_RE",
        &format!(r"(?is)<p(?:\s[^>]*)?>\s*{directive}\s*</p\s*>"),
      ),
    }
  }
}

/// Byte ranges of TOC containers already present in `text`.
#[must_use]
pub fn container_spans(text: &str) -> Vec<Range<usize>> {
  let mut spans = Vec::new();
  let mut open: Option<(usize, usize)> = None;

  for caps in DIV_TAG_RE.captures_iter(text) {
    let Some(tag) = caps.get(0) else { continue };
    let closing = caps.get(1).is_some();

    match open {
      Some((start, depth)) => {
        let depth = if closing { depth - 1 } else { depth + 1 };
        if depth == 0 {
          spans.push(start..tag.end());
          open = None;
        } else {
          open = Some((start, depth));
        }
      },
      None => {
        if !closing && tag_has_class(tag.as_str(), CONTAINER_CLASS) {
          open = Some((tag.start(), 1));
        }
      },
    }
  }

  if let Some((start, _)) = open {
    spans.push(start..text.len());
  }

  spans
}

/// Byte ranges of `<!-- ... -->` comments in `text`. An unterminated
/// comment runs to the end.
#[must_use]
pub fn comment_spans(text: &str) -> Vec<Range<usize>> {
  COMMENT_RE.find_iter(text).map(|m| m.range()).collect()
}

fn in_spans(spans: &[Range<usize>], offset: usize) -> bool {
  spans.iter().any(|span| span.contains(&offset))
}

/// Heading text as shown in the TOC: permalink removed, tags stripped,
/// entities decoded, whitespace trimmed.
#[must_use]
pub fn heading_text(body: &str) -> String {
  let without_link = SECTION_LINK_RE.replace_all(body, "");
  strip_tags(&without_link).trim().to_string()
}

/// Find `<hN ...>...</hN>` elements left to right.
///
/// The closing tag must have the same level as the opening one; an opening
/// tag that is never closed is skipped. Headings inside comments or an
/// existing TOC container are ignored.
#[must_use]
pub fn scan_headings(text: &str) -> Vec<HeadingDescriptor<TextSpan>> {
  let containers = container_spans(text);
  let comments = comment_spans(text);
  let mut headings = Vec::new();
  let mut pos = 0;

  while let Some(caps) = HEADING_OPEN_RE.captures_at(text, pos) {
    let (Some(open), Some(level)) = (caps.get(0), caps.get(1)) else {
      break;
    };

    if let Some(comment) =
      comments.iter().find(|span| span.contains(&open.start()))
    {
      pos = comment.end;
      continue;
    }
    let level = level.as_str().parse::<u8>().unwrap_or(1);

    let close = HEADING_CLOSE_RES
      .get(usize::from(level) - 1)
      .and_then(|re| re.find_at(text, open.end()));

    let Some(close) = close else {
      pos = open.end();
      continue;
    };

    pos = close.end();
    if in_spans(&containers, open.start()) {
      continue;
    }

    headings.push(HeadingDescriptor {
      level,
      raw_text: heading_text(&text[open.end()..close.start()]),
      source: TextSpan {
        start:       open.start(),
        open_end:    open.end(),
        close_start: close.start(),
        end:         close.end(),
      },
    });
  }

  headings
}

/// Rewrite every heading with its anchor marker (and permalink when asked).
///
/// Returns the rewritten text and the offset of the first heading in it.
pub(crate) fn rewrite_headings(
  text: &str,
  headings: &[HeadingDescriptor<TextSpan>],
  items: &[TocItem],
  section_links: bool,
) -> (String, usize) {
  let mut out = String::with_capacity(text.len() + headings.len() * 64);
  let mut cursor = 0;
  let mut first_heading_at = None;

  for (heading, item) in headings.iter().zip(items) {
    let span = heading.source;
    out.push_str(&text[cursor..span.start]);
    first_heading_at.get_or_insert(out.len());
    out.push_str(&text[span.start..span.open_end]);

    let body = &text[span.open_end..span.close_start];
    let marker = render::anchor_marker(&item.anchor);
    if !body.starts_with(&marker) {
      out.push_str(&marker);
    }
    out.push_str(body);

    if section_links {
      let link = render::section_link(&item.anchor);
      if !body.contains(&link) {
        out.push_str(&link);
      }
    }

    out.push_str(&text[span.close_start..span.end]);
    cursor = span.end;
  }
  out.push_str(&text[cursor..]);

  (out, first_heading_at.unwrap_or(0))
}

/// First start tag carrying `class`, as `(range, tag name)`.
fn find_marker_tag(
  text: &str,
  class: &str,
  comments: &[Range<usize>],
) -> Option<(Range<usize>, String)> {
  START_TAG_RE.captures_iter(text).find_map(|caps| {
    let tag = caps.get(0)?;
    let name = caps.get(1)?;
    (!in_spans(comments, tag.start()) && tag_has_class(tag.as_str(), class))
      .then(|| (tag.range(), name.as_str().to_ascii_lowercase()))
  })
}

/// End offset of the element whose start tag is `tag`.
///
/// Nested elements of the same name are balanced. An element that is never
/// closed ends with its start tag.
fn element_end(
  text: &str,
  tag: &Range<usize>,
  name: &str,
  comments: &[Range<usize>],
) -> usize {
  if VOID_ELEMENTS.contains(&name) || text[tag.clone()].ends_with("/>") {
    return tag.end;
  }

  let Ok(same_name) =
    RegexBuilder::new(&format!(r"<(/)?{}(?:\s[^>]*)?>", regex::escape(name)))
      .case_insensitive(true)
      .build()
  else {
    return tag.end;
  };

  let mut depth = 1_usize;
  for caps in same_name.captures_iter(&text[tag.end..]) {
    let Some(m) = caps.get(0) else { continue };
    if in_spans(comments, tag.end + m.start()) {
      continue;
    }
    if caps.get(1).is_some() {
      depth -= 1;
      if depth == 0 {
        return tag.end + m.end();
      }
    } else if !m.as_str().ends_with("/>") {
      depth += 1;
    }
  }

  tag.end
}

/// Splice `toc` into `page` at the first matching injection point.
pub(crate) fn place(
  page: &str,
  toc: &str,
  markers: &TocMarkers,
  patterns: &TextPatterns,
  first_heading_at: usize,
) -> (String, Placement) {
  let containers = container_spans(page);
  let comments = comment_spans(page);
  let splice = |range: Range<usize>| {
    let mut out = String::with_capacity(page.len() + toc.len());
    out.push_str(&page[..range.start]);
    out.push_str(toc);
    out.push_str(&page[range.end..]);
    out
  };

  if let Some((tag, _)) =
    find_marker_tag(page, &markers.before_class, &comments)
  {
    let guarded = containers.iter().any(|span| {
      span.end <= tag.start && page[span.end..tag.start].trim().is_empty()
    });
    if guarded {
      return (page.to_string(), Placement::AlreadyPresent);
    }
    log::debug!("Inserting TOC before '{}' marker", markers.before_class);
    return (splice(tag.start..tag.start), Placement::BeforeMarker);
  }

  if let Some((tag, name)) =
    find_marker_tag(page, &markers.after_class, &comments)
  {
    let end = element_end(page, &tag, &name, &comments);
    let guarded = containers.iter().any(|span| {
      span.start >= end && page[end..span.start].trim().is_empty()
    });
    if guarded {
      return (page.to_string(), Placement::AlreadyPresent);
    }
    log::debug!("Inserting TOC after '{}' marker", markers.after_class);
    return (splice(end..end), Placement::AfterMarker);
  }

  if let Some(block) = patterns.token.find(page) {
    log::debug!("Replacing '{}' block with TOC", markers.token);
    return (splice(block.range()), Placement::TokenBlock);
  }

  if let Some(directive) = patterns.directive.find(page) {
    log::debug!("Replacing <{}> directive with TOC", markers.directive_tag);
    let range = patterns
      .directive_block
      .find(page)
      .map(|block| block.range())
      .filter(|block| {
        block.start <= directive.start() && directive.end() <= block.end
      })
      .unwrap_or_else(|| directive.range());
    return (splice(range), Placement::Directive);
  }

  if !containers.is_empty() {
    return (page.to_string(), Placement::AlreadyPresent);
  }

  log::debug!("Inserting TOC before first heading");
  (
    splice(first_heading_at..first_heading_at),
    Placement::BeforeFirstHeading,
  )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Fine in tests")]
mod tests {
  use super::*;

  #[test]
  fn test_scan_finds_headings_in_order() {
    let text = "<h1>Intro</h1><p>x</p><H2 id=\"b\">Back<b>ground</b></H2>";
    let headings = scan_headings(text);

    assert_eq!(headings.len(), 2);
    assert_eq!(headings[0].level, 1);
    assert_eq!(headings[0].raw_text, "Intro");
    assert_eq!(headings[1].level, 2);
    assert_eq!(headings[1].raw_text, "Background");
    assert_eq!(headings[1].source.start, 22);
    assert_eq!(headings[1].source.end, text.len());
  }

  #[test]
  fn test_scan_requires_matching_close_level() {
    let text = "<h2>Broken</h3> text <h3>Fine</h3>";
    let headings = scan_headings(text);

    // The h2 has no </h2>, so it is skipped and the h3 is still found
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].raw_text, "Fine");
  }

  #[test]
  fn test_scan_spans_lines() {
    let headings = scan_headings("<h1>\n  Multi\n  Line\n</h1>");
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].raw_text, "Multi\n  Line");
  }

  #[test]
  fn test_scan_ignores_headings_in_existing_container() {
    let text = "<div class=\"wiki-toc-container\"><div><h2>Table of \
                Contents</h2></div></div><h1>A</h1>";
    let headings = scan_headings(text);
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].raw_text, "A");
  }

  #[test]
  fn test_heading_text_drops_permalink() {
    let body = "<a name=\"A\"></a>A &amp; B<span class=\"section-link\"> <a \
                href=\"#A\" class=\"section-anchor\">¶</a></span>";
    assert_eq!(heading_text(body), "A & B");
  }

  #[test]
  fn test_container_spans_balance_nested_divs() {
    let text = "<p>a</p><div class=\"wiki-toc-container\"><div \
                class=\"wiki-toc\"><div></div></div><div \
                class=\"break\"></div></div><div>after</div>";
    let spans = container_spans(text);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].start, 8);
    assert!(text[spans[0].end..].starts_with("<div>after"));
  }

  fn marker_element<'a>(text: &'a str, class: &str) -> &'a str {
    let comments = comment_spans(text);
    let (tag, name) = find_marker_tag(text, class, &comments).unwrap();
    &text[tag.start..element_end(text, &tag, &name, &comments)]
  }

  #[test]
  fn test_element_end_handles_void_and_closed_elements() {
    let text = "<hr class=\"toc-after\"><p>x</p>";
    assert_eq!(marker_element(text, "toc-after"), "<hr class=\"toc-after\">");

    let text = "<p class=\"toc-after\">Intro text</P><h1>A</h1>";
    assert_eq!(
      marker_element(text, "toc-after"),
      "<p class=\"toc-after\">Intro text</P>"
    );
  }

  #[test]
  fn test_element_end_balances_nested_same_name_elements() {
    let text = "<div class=\"toc-after\"><div>inner<div/></div><!-- </div> \
                -->tail</DIV><h1>A</h1>";
    assert_eq!(
      marker_element(text, "toc-after"),
      "<div class=\"toc-after\"><div>inner<div/></div><!-- </div> \
       -->tail</DIV>"
    );

    let unclosed = "<div class=\"toc-after\"><div>inner</div>";
    assert_eq!(
      marker_element(unclosed, "toc-after"),
      "<div class=\"toc-after\">"
    );
  }

  #[test]
  fn test_markers_and_headings_in_comments_are_ignored() {
    let text = "<!-- <p class=\"toc-after\"></p> <h1>Old</h1> -->\
                <h1>A</h1><!-- unterminated <h2>B</h2>";
    let comments = comment_spans(text);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].end, text.len());
    assert!(find_marker_tag(text, "toc-after", &comments).is_none());

    let headings = scan_headings(text);
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].raw_text, "A");
  }

  #[test]
  fn test_comment_start_does_not_swallow_following_heading() {
    let headings = scan_headings("<!-- <h1>x --><h1>A</h1><h1>B</h1>");
    let texts: Vec<_> = headings.iter().map(|h| h.raw_text.as_str()).collect();
    assert_eq!(texts, ["A", "B"]);
  }

  #[test]
  fn test_token_pattern_tolerates_break_and_whitespace() {
    let patterns = TextPatterns::new(&TocMarkers::default());
    assert!(patterns.token.is_match("<p> __TOC__ <br/></p>"));
    assert!(patterns.token.is_match("<P class=\"x\">__TOC__</P>"));
    assert!(!patterns.token.is_match("<p>see __TOC__ here</p>"));
  }

  #[test]
  fn test_directive_pattern_variants() {
    let patterns = TextPatterns::new(&TocMarkers::default());
    assert!(patterns.directive.is_match("<wiki:toc/>"));
    assert!(patterns.directive.is_match("<wiki:toc />"));
    assert!(patterns.directive.is_match("<WIKI:TOC></wiki:toc>"));
    assert!(!patterns.directive.is_match("<wiki:tocs/>"));
  }

  #[test]
  fn test_directive_paragraph_is_replaced_whole() {
    let markers = TocMarkers::default();
    let patterns = TextPatterns::new(&markers);
    let toc = "<div class=\"wiki-toc-container\"></div>";

    let (page, placement) =
      place("<p> <wiki:toc /> </p><h1>A</h1>", toc, &markers, &patterns, 0);
    assert_eq!(placement, Placement::Directive);
    assert_eq!(page, format!("{toc}<h1>A</h1>"));

    let (page, _) =
      place("<p>See <wiki:toc/></p><h1>A</h1>", toc, &markers, &patterns, 0);
    assert_eq!(page, format!("<p>See {toc}</p><h1>A</h1>"));
  }
}
