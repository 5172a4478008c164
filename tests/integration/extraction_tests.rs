//! HTML to markdown extraction on complete pages
//!
//! These tests run the whole engine (metadata, content, assembly) without any
//! network access.

mod common;

use common::{ArticlePage, read_fixture};
use pmc_markdown::pmc::FragmentKind;
use pmc_markdown::{PmcHtmlParser, html_to_markdown};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_recorded_page_matches_expected_markdown() {
    let html = read_fixture("PMC7906746.html");
    let expected = read_fixture("PMC7906746.md");

    assert_eq!(html_to_markdown(&html), expected);
}

#[test]
fn test_conversion_is_deterministic() {
    let html = read_fixture("PMC7906746.html");

    let first = html_to_markdown(&html);
    let second = html_to_markdown(&html);
    assert_eq!(first, second);

    assert_eq!(PmcHtmlParser::parse(&html), PmcHtmlParser::parse(&html));
}

#[test]
fn test_recorded_page_fragment_order() {
    let parsed = PmcHtmlParser::parse(&read_fixture("PMC7906746.html"));

    let kinds: Vec<FragmentKind> = parsed.fragments.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FragmentKind::Abstract,
            FragmentKind::Section,
            FragmentKind::Section,
            FragmentKind::Section,
            FragmentKind::References,
        ]
    );
    assert_eq!(parsed.metadata.authors, vec!["Ana Ruiz", "Kenji Sato"]);
}

#[test]
fn test_end_to_end_article() {
    let html = ArticlePage::new()
        .citation_title("Foo")
        .canonical("PMC123")
        .author("Jane Doe")
        .pubmed_link("456")
        .abstract_section("<p>One abstract.</p>")
        .section("sec1", "<p>Hello <em>world</em> emphasis</p>")
        .build();

    let markdown = html_to_markdown(&html);

    assert!(markdown.starts_with(
        "# Foo\n\n## Metadata\n\n**PMCID:** PMC123\n\n\
         **URL:** https://www.ncbi.nlm.nih.gov/pmc/articles/PMC123/\n\n\
         **PMID:** 456\n\n**Authors:** Jane Doe\n\n"
    ));
    assert!(markdown.contains("## Abstract\n\nOne abstract.\n"));
    assert!(markdown.contains("Hello *world* emphasis"));
    assert_eq!(
        markdown,
        "# Foo\n\n## Metadata\n\n**PMCID:** PMC123\n\n\
         **URL:** https://www.ncbi.nlm.nih.gov/pmc/articles/PMC123/\n\n\
         **PMID:** 456\n\n**Authors:** Jane Doe\n\n\
         ## Abstract\n\nOne abstract.\n\nHello *world* emphasis\n"
    );
}

#[test]
fn test_no_authors_means_no_authors_line() {
    let html = ArticlePage::new()
        .citation_title("Untitled work")
        .section("sec1", "<p>Text.</p>")
        .build();

    let markdown = html_to_markdown(&html);
    assert!(!markdown.contains("**Authors:**"));
    assert_eq!(markdown, "# Untitled work\n\n## Metadata\n\nText.\n");
}

#[test]
fn test_headed_abstract_is_not_headed_twice() {
    let html = ArticlePage::new()
        .abstract_section("<h2>Abstract</h2><p>Already headed.</p>")
        .build();

    let markdown = html_to_markdown(&html);
    assert_eq!(markdown.matches("## Abstract").count(), 1);
    assert_eq!(markdown, "## Metadata\n\n## Abstract\n\nAlready headed.\n");
}

#[test]
fn test_unheaded_abstract_gets_heading() {
    let html = ArticlePage::new()
        .abstract_section("<p>Short abstract.</p>")
        .build();

    assert_eq!(
        html_to_markdown(&html),
        "## Metadata\n\n## Abstract\n\nShort abstract.\n"
    );
}

#[test]
fn test_site_relative_figure_goes_to_cdn() {
    let html = ArticlePage::new()
        .section(
            "sec1",
            r#"<figure><img src="/pmc/foo.png" alt="Figure 2"><figcaption>Growth <b>curves</b></figcaption></figure>"#,
        )
        .build();

    assert!(html_to_markdown(&html).ends_with(
        "![Figure 2](https://cdn.ncbi.nlm.nih.gov/pmc/foo.png)\n\n*Growth **curves***\n"
    ));
}

#[test]
fn test_foreign_figure_keeps_only_caption() {
    let html = ArticlePage::new()
        .section(
            "sec1",
            r#"<figure><img src="https://example.org/x.png" alt="x"><figcaption>Only caption</figcaption></figure>
               <figure><img src="https://example.org/y.png"></figure>"#,
        )
        .build();

    assert_eq!(html_to_markdown(&html), "## Metadata\n\n*Only caption*\n");
}

#[test]
fn test_ordered_list_is_renumbered() {
    let html = ArticlePage::new()
        .section(
            "sec1",
            r#"<ol start="5"><li value="9">first</li><li>second</li><li>third</li></ol>"#,
        )
        .build();

    assert_eq!(
        html_to_markdown(&html),
        "## Metadata\n\n1. first\n2. second\n3. third\n"
    );
}

#[test]
fn test_reference_whitespace_is_collapsed() {
    let html = ArticlePage::new()
        .references(&["Smith J.   2020.\n Title.", "   ", "Roe R. 2021."])
        .build();

    assert_eq!(
        html_to_markdown(&html),
        "## Metadata\n\n## References\n\n- Smith J. 2020. Title.\n- Roe R. 2021.\n"
    );
}

#[rstest]
#[case("E = mc<sup>2</sup>", "E = mc^2^")]
#[case("H<sub>2</sub>O", "H_2_O")]
#[case("<strong>Bold</strong> and <i>italic</i>", "**Bold** and *italic*")]
#[case(r#"see <a href="https://doi.org/10.1/x">doi</a>"#, "see [doi](https://doi.org/10.1/x)")]
#[case(r##"see <a href="#fig1">Fig. 1</a>"##, "see Fig. 1")]
#[case("<span>plain <em>nested</em></span> text", "plain nested text")]
#[case("  padded  ", "padded")]
fn test_paragraph_inline_rendering(#[case] inner: &str, #[case] expected: &str) {
    let html = ArticlePage::new()
        .section("sec1", &format!("<p>{inner}</p>"))
        .build();

    assert_eq!(
        html_to_markdown(&html),
        format!("## Metadata\n\n{expected}\n")
    );
}

#[test]
fn test_blank_and_unnumbered_sections_are_skipped() {
    let html = ArticlePage::new()
        .section("sec1", "<div><p>hidden</p></div>")
        .section("secA", "<p>not numbered</p>")
        .section("sec2", "<h3>Kept</h3><p>   </p>")
        .build();

    assert_eq!(html_to_markdown(&html), "## Metadata\n\n### Kept\n");
}

#[test]
fn test_main_is_used_without_article() {
    let html = ArticlePage::new()
        .in_main()
        .section("sec1", "<h2>Intro</h2><p>From main.</p>")
        .build();

    assert_eq!(
        html_to_markdown(&html),
        "## Metadata\n\n## Intro\n\nFrom main.\n"
    );
}

#[test]
fn test_missing_container_yields_metadata_only() {
    let html = ArticlePage::without_container()
        .citation_title("Stub page")
        .section("sec1", "<p>Never reached.</p>")
        .build();

    assert_eq!(html_to_markdown(&html), "# Stub page\n\n## Metadata\n\n");
}

#[test]
fn test_metadata_falls_back_to_page_text() {
    let html = ArticlePage::new()
        .title_element("Fallback Title - PMC")
        .text("PMCID: PMC42 and PMID: 77")
        .build();

    assert_eq!(
        html_to_markdown(&html),
        "# Fallback Title\n\n## Metadata\n\n**PMCID:** PMC42\n\n\
         **URL:** https://www.ncbi.nlm.nih.gov/pmc/articles/PMC42/\n\n**PMID:** 77\n\n"
    );
}

#[rstest]
#[case("")]
#[case("<html")]
#[case("<p>unclosed <em>tags")]
fn test_degenerate_input_never_fails(#[case] html: &str) {
    assert_eq!(html_to_markdown(html), "## Metadata\n\n");
}
