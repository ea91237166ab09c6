use std::sync::LazyLock;

use regex::Regex;

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  // [^\s\S] asserts something impossible and is always valid
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// Compile `pattern`, logging and falling back to a never-matching regex on
/// failure.
pub(crate) fn compile_or_never(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

static TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("TAG_RE", r"<[^>]*>"));

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "CLASS_ATTR_RE",
    r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#,
  )
});

/// Strip tags from a markup snippet and decode entities.
#[must_use]
pub fn strip_tags(markup: &str) -> String {
  let stripped = TAG_RE.replace_all(markup, "");
  html_escape::decode_html_entities(&stripped).into_owned()
}

/// Whether a raw start tag such as `<p class="a toc-before">` carries
/// `class` in its class attribute.
#[must_use]
pub fn tag_has_class(tag: &str, class: &str) -> bool {
  CLASS_ATTR_RE.captures(tag).is_some_and(|caps| {
    caps
      .get(1)
      .or_else(|| caps.get(2))
      .or_else(|| caps.get(3))
      .is_some_and(|value| value.as_str().split_whitespace().any(|c| c == class))
  })
}

/// Whether `html` is a whole document rather than a page fragment.
#[must_use]
pub fn is_full_document(html: &str) -> bool {
  let head = html.trim_start();
  let head = head.get(..9).unwrap_or(head).to_ascii_lowercase();
  head.starts_with("<!doctype") || head.starts_with("<html")
}
