use std::{fmt::Write as _, hint::black_box};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wikipage_toc::{TocBuilder, TocMode, TocOptions};

const PAGE_SMALL: &str = r#"<p class="toc-before">Overview of the project.</p>
<h1>Intro</h1>
<p>Some text.</p>
<h2>Background</h2>
<p>More text.</p>
<h2>Setup</h2>
<p>Even more text.</p>"#;

/// A long page with a few hundred headings across every level.
fn page_large() -> String {
  let mut page = String::from("<p>__TOC__</p>\n");
  for chapter in 1..=40 {
    let _ = writeln!(page, "<h1>Chapter {chapter}</h1><p>Lead paragraph.</p>");
    for section in 1..=4 {
      let _ = writeln!(
        page,
        "<h2>Section {chapter}.{section}</h2><p>Body <b>text</b> &amp; more.</p>"
      );
      let _ = writeln!(page, "<h3>Details</h3><p>Repeated heading text.</p>");
    }
  }
  page
}

fn bench_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("toc_build");
  let builder = TocBuilder::new(TocOptions::default());
  let large = page_large();

  for mode in [TocMode::Dom, TocMode::Text] {
    group.bench_with_input(
      BenchmarkId::new(mode.to_string(), "small"),
      &PAGE_SMALL,
      |b, page| {
        b.iter(|| builder.process(black_box(page), black_box(mode)));
      },
    );

    group.bench_with_input(
      BenchmarkId::new(mode.to_string(), "large"),
      &large.as_str(),
      |b, page| {
        b.iter(|| builder.process(black_box(page), black_box(mode)));
      },
    );
  }

  group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
