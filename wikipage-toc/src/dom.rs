//! DOM mode: headings are found by a structural query over a parsed page and
//! the TOC is spliced into the tree.
use kuchikikiki::{Attribute, ExpandedName, NodeRef, parse_fragment, parse_html};
use markup5ever::{LocalName, QualName, local_name, ns};
use tendril::TendrilSink;

use crate::{
  error::TocError,
  options::TocMarkers,
  render::{self, CONTAINER_CLASS, SECTION_LINK_CLASS},
  types::{HeadingDescriptor, Placement, TocItem},
  utils::is_full_document,
};

/// A page parsed for DOM mode.
#[derive(Debug, Clone)]
pub struct ParsedPage {
  /// Document node. For fragments its only child is the synthetic `html`
  /// element holding the content.
  pub document: NodeRef,
  /// Whether the input was a fragment rather than a whole document.
  pub fragment: bool,
}

impl ParsedPage {
  /// Node whose descendants are the page content.
  #[must_use]
  pub fn root(&self) -> NodeRef {
    if self.fragment {
      self
        .document
        .first_child()
        .unwrap_or_else(|| self.document.clone())
    } else {
      self.document.clone()
    }
  }
}

/// Parse `html` as a whole document or as a body fragment, whichever it
/// looks like.
#[must_use]
pub fn parse_page(html: &str) -> ParsedPage {
  if is_full_document(html) {
    ParsedPage {
      document: parse_html().one(html),
      fragment: false,
    }
  } else {
    ParsedPage {
      document: parse_body_fragment(html),
      fragment: true,
    }
  }
}

/// Serialize a page back to markup in the shape it was parsed from.
///
/// # Errors
///
/// Returns an error if serialization fails or produces invalid UTF-8.
pub fn serialize_page(page: &ParsedPage) -> Result<String, TocError> {
  let mut buf = Vec::new();
  if page.fragment {
    for child in page.root().children() {
      child.serialize(&mut buf)?;
    }
  } else {
    page.document.serialize(&mut buf)?;
  }
  Ok(String::from_utf8(buf)?)
}

fn parse_body_fragment(markup: &str) -> NodeRef {
  parse_fragment(
    QualName::new(None, ns!(html), local_name!("body")),
    Vec::new(),
  )
  .one(markup)
}

/// Top-level nodes of a markup snippet, detached and ready to insert.
fn fragment_nodes(markup: &str) -> Vec<NodeRef> {
  let document = parse_body_fragment(markup);
  let root = document.first_child().unwrap_or(document);
  let nodes: Vec<NodeRef> = root.children().collect();
  for node in &nodes {
    node.detach();
  }
  nodes
}

fn html_element(tag: &str, attrs: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(tag)),
    attrs.iter().map(|(name, value)| {
      (ExpandedName::new("", *name), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

fn is_tag(node: &NodeRef, tag: &str) -> bool {
  node
    .as_element()
    .is_some_and(|el| el.name.local.as_ref().eq_ignore_ascii_case(tag))
}

fn attr(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()
    .and_then(|el| el.attributes.borrow().get(name).map(ToString::to_string))
}

fn has_class(node: &NodeRef, class: &str) -> bool {
  attr(node, "class")
    .is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

fn is_container(node: &NodeRef) -> bool {
  has_class(node, CONTAINER_CLASS)
}

fn inside_container(node: &NodeRef) -> bool {
  node.ancestors().any(|ancestor| is_container(&ancestor))
}

/// Skip whitespace-only text and comments.
fn is_significant(node: &NodeRef) -> bool {
  if node.as_comment().is_some() {
    return false;
  }
  node
    .as_text()
    .is_none_or(|text| !text.borrow().trim().is_empty())
}

fn next_significant(node: &NodeRef) -> Option<NodeRef> {
  let mut sibling = node.next_sibling();
  while let Some(current) = sibling {
    if is_significant(&current) {
      return Some(current);
    }
    sibling = current.next_sibling();
  }
  None
}

fn previous_significant(node: &NodeRef) -> Option<NodeRef> {
  let mut sibling = node.previous_sibling();
  while let Some(current) = sibling {
    if is_significant(&current) {
      return Some(current);
    }
    sibling = current.previous_sibling();
  }
  None
}

fn collect_text(node: &NodeRef, out: &mut String) {
  for child in node.children() {
    if let Some(text) = child.as_text() {
      out.push_str(&text.borrow());
    } else if child.as_element().is_some()
      && !(is_tag(&child, "span") && has_class(&child, SECTION_LINK_CLASS))
    {
      collect_text(&child, out);
    }
  }
}

/// Heading text as shown in the TOC, without any section permalink.
#[must_use]
pub fn heading_text(heading: &NodeRef) -> String {
  let mut text = String::new();
  collect_text(heading, &mut text);
  text.trim().to_string()
}

/// Find `h1`..`h6` elements in document order, skipping any inside an
/// existing TOC container.
#[must_use]
pub fn scan_headings(root: &NodeRef) -> Vec<HeadingDescriptor<NodeRef>> {
  let Ok(selection) = root.select("h1, h2, h3, h4, h5, h6") else {
    return Vec::new();
  };

  selection
    .filter_map(|heading| {
      let node = heading.as_node().clone();
      if inside_container(&node) {
        return None;
      }
      let level = heading.name.local.as_ref().get(1..)?.parse::<u8>().ok()?;
      Some(HeadingDescriptor {
        level,
        raw_text: heading_text(&node),
        source: node,
      })
    })
    .collect()
}

/// Add the anchor marker (and optionally a permalink) to a heading.
pub(crate) fn decorate_heading(
  heading: &NodeRef,
  item: &TocItem,
  section_links: bool,
) {
  let anchored = heading.first_child().is_some_and(|first| {
    is_tag(&first, "a") && attr(&first, "name").as_deref() == Some(&item.anchor)
  });

  if !anchored {
    if let Some(br) = heading.children().find(|child| is_tag(child, "br")) {
      br.detach();
    }
    heading.prepend(html_element("a", &[("name", &item.anchor)]));
  }

  let linked = heading
    .children()
    .any(|child| is_tag(&child, "span") && has_class(&child, SECTION_LINK_CLASS));

  if section_links && !linked {
    for node in fragment_nodes(&render::section_link(&item.anchor)) {
      heading.append(node);
    }
  }
}

fn find_by_class(root: &NodeRef, class: &str) -> Option<NodeRef> {
  root.descendants().find(|node| has_class(node, class))
}

fn find_token_block(root: &NodeRef, token: &str) -> Option<NodeRef> {
  root.descendants().find(|node| {
    is_tag(node, "p")
      && node
        .children()
        .all(|child| child.as_element().is_none() || is_tag(&child, "br"))
      && node.text_contents().trim() == token
  })
}

fn find_directive(root: &NodeRef, tag: &str) -> Option<NodeRef> {
  root.descendants().find(|node| is_tag(node, tag))
}

/// Whether `child` is the only significant node under `parent`.
fn sole_child(parent: &NodeRef, child: &NodeRef) -> bool {
  let mut significant = parent.children().filter(is_significant);
  significant.next().as_ref() == Some(child) && significant.next().is_none()
}

fn insert_all_before(anchor: &NodeRef, nodes: Vec<NodeRef>) {
  for node in nodes {
    anchor.insert_before(node);
  }
}

/// Splice the container markup into the tree at the first matching
/// injection point.
pub(crate) fn place(
  root: &NodeRef,
  container: &str,
  markers: &TocMarkers,
  first_heading: Option<&NodeRef>,
) -> Placement {
  if let Some(marker) = find_by_class(root, &markers.before_class) {
    if previous_significant(&marker).is_some_and(|node| is_container(&node)) {
      return Placement::AlreadyPresent;
    }
    log::debug!("Inserting TOC before '{}' marker", markers.before_class);
    insert_all_before(&marker, fragment_nodes(container));
    return Placement::BeforeMarker;
  }

  if let Some(marker) = find_by_class(root, &markers.after_class) {
    if next_significant(&marker).is_some_and(|node| is_container(&node)) {
      return Placement::AlreadyPresent;
    }
    log::debug!("Inserting TOC after '{}' marker", markers.after_class);
    for node in fragment_nodes(container).into_iter().rev() {
      marker.insert_after(node);
    }
    return Placement::AfterMarker;
  }

  if let Some(block) = find_token_block(root, &markers.token) {
    log::debug!("Replacing '{}' block with TOC", markers.token);
    insert_all_before(&block, fragment_nodes(container));
    block.detach();
    return Placement::TokenBlock;
  }

  if let Some(directive) = find_directive(root, &markers.directive_tag) {
    log::debug!("Replacing <{}> directive with TOC", markers.directive_tag);
    let target = directive
      .parent()
      .filter(|parent| is_tag(parent, "p") && sole_child(parent, &directive))
      .unwrap_or_else(|| directive.clone());
    insert_all_before(&target, fragment_nodes(container));
    let children: Vec<NodeRef> = directive.children().collect();
    insert_all_before(&target, children);
    target.detach();
    return Placement::Directive;
  }

  if root.descendants().any(|node| is_container(&node)) {
    return Placement::AlreadyPresent;
  }

  match first_heading {
    Some(heading) => {
      log::debug!("Inserting TOC before first heading");
      insert_all_before(heading, fragment_nodes(container));
      Placement::BeforeFirstHeading
    },
    None => Placement::AlreadyPresent,
  }
}
