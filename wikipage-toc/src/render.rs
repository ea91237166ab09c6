//! Markup for the TOC list, its container and the per-heading decorators.
use std::fmt::Write as _;

use crate::{options::TocOptions, types::TocItem};

/// Class of the outermost TOC element; also what idempotence guards look for.
pub const CONTAINER_CLASS: &str = "wiki-toc-container";
/// Class of the per-heading permalink.
pub const SECTION_ANCHOR_CLASS: &str = "section-anchor";
/// Class of the span wrapping the permalink, hidden until hover.
pub const SECTION_LINK_CLASS: &str = "section-link";

/// Stylesheet for the generated markup.
///
/// Hides section permalinks until their heading is hovered and lays out the
/// TOC box. Pages that ship their own theme can ignore it.
pub const DEFAULT_CSS: &str = "\
.wiki-toc-container { margin: 1em 0; }
.wiki-toc { display: inline-block; border: 1px solid #aaa; padding: 0.5em 1em; }
.wiki-toc .toc-title h2 { font-size: 1em; margin: 0; }
.wiki-toc .toc-toggle { font-size: 0.85em; font-weight: normal; margin-left: 0.5em; }
.wiki-toc ul { list-style: none; margin: 0; padding-left: 1.5em; }
.wiki-toc-container .break { clear: both; }
.section-link { visibility: hidden; }
h1:hover > .section-link, h2:hover > .section-link, h3:hover > .section-link,
h4:hover > .section-link, h5:hover > .section-link, h6:hover > .section-link { visibility: visible; }
";

/// Render TOC items as nested `<ul>` lists.
///
/// One list level is opened or closed per level of difference between
/// neighbouring items, so skipped heading levels produce list items without
/// a link of their own. Every open list is closed at the end.
#[must_use]
pub fn render_list(items: &[TocItem]) -> String {
  let mut out = String::new();
  let mut depth = 0_u8;

  for item in items {
    let level = item.level.max(1);

    if level > depth {
      for open in depth + 1..=level {
        let _ = write!(out, "<ul><li class=\"toc-{open}\">");
      }
    } else {
      for _ in level..depth {
        out.push_str("</li></ul>");
      }
      let _ = write!(out, "</li><li class=\"toc-{level}\">");
    }
    depth = level;

    let _ = write!(
      out,
      "<a href=\"#{}\">{} {}</a>",
      html_escape::encode_double_quoted_attribute(&item.anchor),
      item.number,
      html_escape::encode_text(&item.text)
    );
  }

  for _ in 0..depth {
    out.push_str("</li></ul>");
  }

  out
}

/// Wrap a rendered list in the titled, optionally collapsible container.
#[must_use]
pub fn render_container(list: &str, options: &TocOptions) -> String {
  let title = html_escape::encode_text(&options.title_text);

  let toggle = if options.collapsible {
    let label = if options.collapsed {
      &options.show_label
    } else {
      &options.hide_label
    };
    format!(
      "<span class=\"toc-toggle\"><a href=\"#\" class=\"theme-color-1\">[{}]</a></span>",
      html_escape::encode_text(label)
    )
  } else {
    String::new()
  };

  let content_style = if options.collapsible && options.collapsed {
    " style=\"display: none\""
  } else {
    ""
  };

  format!(
    "<div class=\"{CONTAINER_CLASS}\"><div class=\"wiki-toc\"><div \
     class=\"toc-title\"><h2>{title}{toggle}</h2></div><div \
     class=\"toc-content\"{content_style}>{list}</div></div><div \
     class=\"break\"></div></div>"
  )
}

/// Zero-width anchor placed at the start of a heading.
#[must_use]
pub fn anchor_marker(anchor: &str) -> String {
  format!(
    "<a name=\"{}\"></a>",
    html_escape::encode_double_quoted_attribute(anchor)
  )
}

/// Permalink appended to the end of a heading.
#[must_use]
pub fn section_link(anchor: &str) -> String {
  format!(
    "<span class=\"{SECTION_LINK_CLASS}\"> <a href=\"#{}\" \
     class=\"{SECTION_ANCHOR_CLASS}\">¶</a></span>",
    html_escape::encode_double_quoted_attribute(anchor)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(level: u8, number: &str, text: &str) -> TocItem {
    TocItem {
      level,
      number: number.to_string(),
      anchor: text.replace(' ', "_"),
      text: text.to_string(),
    }
  }

  #[test]
  fn test_list_nests_under_parent() {
    let html = render_list(&[
      item(1, "1", "Intro"),
      item(2, "1.1", "Background"),
      item(2, "1.2", "Setup"),
    ]);

    assert_eq!(
      html,
      "<ul><li class=\"toc-1\"><a href=\"#Intro\">1 Intro</a>\
       <ul><li class=\"toc-2\"><a href=\"#Background\">1.1 Background</a>\
       </li><li class=\"toc-2\"><a href=\"#Setup\">1.2 Setup</a>\
       </li></ul></li></ul>"
    );
  }

  #[test]
  fn test_list_skipped_levels_open_empty_items() {
    let html = render_list(&[item(1, "1", "A"), item(3, "1.1.1", "C")]);

    assert_eq!(
      html,
      "<ul><li class=\"toc-1\"><a href=\"#A\">1 A</a>\
       <ul><li class=\"toc-2\"><ul><li class=\"toc-3\"><a href=\"#C\">1.1.1 C</a>\
       </li></ul></li></ul></li></ul>"
    );
  }

  #[test]
  fn test_list_ascends_multiple_levels() {
    let html = render_list(&[
      item(1, "1", "A"),
      item(3, "1.1.1", "C"),
      item(1, "2", "B"),
    ]);

    assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
    assert!(html.contains("</li></ul></li></ul></li><li class=\"toc-1\"><a href=\"#B\">2 B</a>"));
  }

  #[test]
  fn test_list_escapes_text() {
    let html = render_list(&[item(1, "1", "a < b & c")]);
    assert!(html.contains("1 a &lt; b &amp; c"));
  }

  #[test]
  fn test_list_empty() {
    assert_eq!(render_list(&[]), "");
  }

  #[test]
  fn test_container_expanded_by_default() {
    let html = render_container("<ul></ul>", &TocOptions::default());
    assert!(html.starts_with("<div class=\"wiki-toc-container\"><div class=\"wiki-toc\">"));
    assert!(html.contains("<div class=\"toc-title\"><h2>Table of Contents<span class=\"toc-toggle\">"));
    assert!(html.contains("[hide]"));
    assert!(html.contains("<div class=\"toc-content\"><ul></ul></div>"));
    assert!(html.ends_with("<div class=\"break\"></div></div>"));
  }

  #[test]
  fn test_container_collapsed() {
    let options = TocOptions {
      collapsed: true,
      ..Default::default()
    };
    let html = render_container("", &options);
    assert!(html.contains("[show]"));
    assert!(html.contains("class=\"toc-content\" style=\"display: none\""));
  }

  #[test]
  fn test_container_without_toggle() {
    let options = TocOptions {
      collapsible: false,
      collapsed: true,
      ..Default::default()
    };
    let html = render_container("", &options);
    assert!(!html.contains("toc-toggle"));
    assert!(!html.contains("display: none"));
  }

  #[test]
  fn test_decorators() {
    assert_eq!(anchor_marker("Intro"), "<a name=\"Intro\"></a>");
    assert_eq!(
      section_link("Intro"),
      "<span class=\"section-link\"> <a href=\"#Intro\" \
       class=\"section-anchor\">¶</a></span>"
    );
  }
}
