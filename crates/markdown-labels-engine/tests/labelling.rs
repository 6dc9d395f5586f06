//! End-to-end labelling tests: markdown or hand-built trees in, labelled trees out.

use markdown_labels_engine::labels::render::LABEL_CLASS;
use markdown_labels_engine::{
    Document, LabelMode, LabelSettings, LabelWarning, Labels, NodeId, parse_markdown,
};

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn label_texts(doc: &Document) -> Vec<String> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&node| doc.has_class(node, LABEL_CLASS))
        .map(|node| doc.text_content(node))
        .collect()
}

fn settings() -> LabelSettings {
    LabelSettings::default()
}

/// An `ol` holding one `li` per entry, each with at most one directive attribute.
fn list(doc: &mut Document, items: &[(&str, Option<(&str, &str)>)]) -> (NodeId, Vec<NodeId>) {
    let root = doc.root();
    let ol = doc.append_element(root, "ol");
    let items = items
        .iter()
        .map(|&(text, directive)| {
            let li = doc.append_element(ol, "li");
            if let Some((name, value)) = directive {
                doc.set_attr(li, name, value);
            }
            doc.append_text(li, text);
            li
        })
        .collect();
    (ol, items)
}

#[test]
fn headings_are_numbered_hierarchically() {
    let mut doc = parse_markdown("# A\n\n## A.1\n\n## A.2\n\n# B\n\n## B.1\n");
    let settings = LabelSettings {
        h_labels: Some("H.1,*".to_string()),
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    assert_eq!(label_texts(&doc), vec!["1", "1.1", "1.2", "2", "2.1"]);
}

#[rstest]
#[case::top_level(
    "# A\n\n## x\n\n## y\n\n# B\n\n## z\n",
    1,
    "1.,(a)",
    vec!["1.", "(a)", "(b)", "2.", "(a)"]
)]
#[case::second_level(
    "# Doc\n\n## A\n\n### x\n\n### y\n\n## B\n\n### z\n",
    2,
    "1.,(a)",
    vec!["1.", "(a)", "(b)", "2.", "(a)"]
)]
#[case::single_segment("# Doc\n\n## A\n\n### x\n\n## B\n", 2, "(i)", vec!["(i)", "(ii)"])]
fn heading_labels_start_at_configured_level(
    #[case] markdown: &str,
    #[case] h_level: u8,
    #[case] h_labels: &str,
    #[case] expected: Vec<&str>,
) {
    let mut doc = parse_markdown(markdown);
    let settings = LabelSettings {
        h_labels: Some(h_labels.to_string()),
        h_level,
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    assert_eq!(label_texts(&doc), expected);
}

#[test]
fn item_override_restarts_numbering_for_later_items() {
    let mut doc = Document::new();
    let (ol, _) = list(
        &mut doc,
        &[("A", None), ("B", Some(("-label", "-1-"))), ("C", None)],
    );
    doc.set_attr(ol, "-label", "-a-");
    Labels::new(settings()).apply(&mut doc).expect("labels");
    assert_eq!(label_texts(&doc), vec!["-a-", "-1-", "-2-"]);
}

#[test]
fn no_label_items_do_not_advance_the_counter() {
    let mut doc = Document::new();
    list(
        &mut doc,
        &[("A", None), ("B", Some(("-no-label", ""))), ("C", None)],
    );
    let settings = LabelSettings {
        ol_labels: Some("1".to_string()),
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    assert_snapshot!(
        doc.to_html(),
        @r#"<ol class="la-labelled"><li><span class="la-label">1</span>A</li><li class="la-no-label">B</li><li><span class="la-label">2</span>C</li></ol>"#
    );
}

#[test]
fn nested_lists_follow_child_templates_and_parents() {
    let mut doc = parse_markdown("- one\n  1. a\n  2. b\n- two\n  1. c\n");
    let settings = LabelSettings {
        ul_labels: Some("•".to_string()),
        ol_labels: Some("X.1".to_string()),
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    // The bullet has no number, so neither it nor the separator appears.
    assert_eq!(label_texts(&doc), vec!["•", "1", "2", "•", "1"]);
}

#[test]
fn references_resolve_to_core_labels() {
    let mut doc = parse_markdown(
        "# Intro {#intro}\n\nSee [section ##h](#intro) and [list ##l](#intro).\n",
    );
    let settings = LabelSettings {
        h_labels: Some("§1 ".to_string()),
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    assert_snapshot!(
        doc.to_html(),
        @r##"<h1 id="intro"><span class="la-label">§1 </span>Intro</h1><p>See <a href="#intro">section <span class="la-ref">1</span></a> and <a href="#intro">list <span class="la-ref">##l</span></a>.</p>"##
    );
}

#[test]
fn forward_references_to_list_items_resolve() {
    let mut doc = Document::new();
    let root = doc.root();
    let p = doc.append_element(root, "p");
    let a = doc.append_element(p, "a");
    doc.set_attr(a, "href", "#step");
    doc.append_text(a, "step ##");
    let (_, items) = list(&mut doc, &[("first", None), ("second", None)]);
    doc.set_attr(items[1], "id", "step");

    let settings = LabelSettings {
        ol_labels: Some("(1)".to_string()),
        ..settings()
    };
    Labels::new(settings).apply(&mut doc).expect("labels");
    assert_eq!(doc.text_content(a), "step 2");
}

#[test]
fn css_mode_emits_counter_rules_for_lists() {
    let mut doc = parse_markdown("1. one\n   1. sub\n2. two\n   1. sub2\n");
    let settings = LabelSettings {
        ol_labels: Some("1.,(L.a)".to_string()),
        mode: LabelMode::Css,
        ..settings()
    };
    let output = Labels::new(settings).apply(&mut doc).expect("labels");

    assert_snapshot!(
        doc.to_html(),
        @r#"<ol class="la-labelled la-label0"><li>one<ol class="la-labelled la-label1"><li>sub</li></ol></li><li>two<ol class="la-labelled la-label1"><li>sub2</li></ol></li></ol>"#
    );
    assert_snapshot!(output.stylesheet, @r#"
    .la-labelled>li{list-style-type:none;}
    .la-label0{counter-reset:la-label0;}
    .la-label0>li:not(.la-no-label){counter-increment:la-label0;}
    .la-label0>li:not(.la-no-label)::before{content:counter(la-label0,decimal) ".";}
    .la-label1{counter-reset:la-label1;}
    .la-label1>li:not(.la-no-label){counter-increment:la-label1;}
    .la-label1>li:not(.la-no-label)::before{content:"(" counter(la-label0,decimal) "." counter(la-label1,lower-alpha) ")";}
    "#);
}

#[test]
fn css_mode_item_override_outranks_container_rules() {
    let mut doc = Document::new();
    let (ol, _) = list(
        &mut doc,
        &[("A", None), ("B", Some(("-label", "-1-"))), ("C", None)],
    );
    doc.set_attr(ol, "-label", "-a-");
    let settings = LabelSettings {
        mode: LabelMode::Css,
        ..settings()
    };
    let output = Labels::new(settings).apply(&mut doc).expect("labels");

    assert_snapshot!(
        doc.to_html(),
        @r#"<ol class="la-labelled la-label0"><li>A</li><li class="la-label1" style="counter-reset:la-label1">B</li><li class="la-label1">C</li></ol>"#
    );
    // Switched items match the more specific rules that come last.
    assert_snapshot!(output.stylesheet, @r#"
    .la-labelled>li{list-style-type:none;}
    .la-label0{counter-reset:la-label0;}
    .la-label0>li:not(.la-no-label){counter-increment:la-label0;}
    .la-label0>li:not(.la-no-label)::before{content:"-" counter(la-label0,lower-alpha) "-";}
    .la-label0>li.la-label1:not(.la-no-label){counter-increment:la-label1;}
    .la-label0>li.la-label1:not(.la-no-label)::before{content:"-" counter(la-label1,decimal) "-";}
    "#);
}

#[test]
fn css_mode_still_labels_headings_as_text() {
    let mut doc = parse_markdown("# One\n");
    let settings = LabelSettings {
        h_labels: Some("1".to_string()),
        mode: LabelMode::Css,
        ..settings()
    };
    let output = Labels::new(settings).apply(&mut doc).expect("labels");
    assert_eq!(label_texts(&doc), vec!["1"]);
    assert_eq!(output.stylesheet, "");
}

#[test]
fn duplicate_directives_warn_and_keep_dash_form() {
    let mut doc = parse_markdown("# Title {-label=1 md-label=a}\n");
    let output = Labels::new(settings()).apply(&mut doc).expect("labels");
    assert_eq!(label_texts(&doc), vec!["1"]);
    assert_eq!(
        output.warnings,
        vec![LabelWarning::DuplicateDirective {
            tag: "h1".to_string(),
            kept: "-label",
            ignored: "md-label",
        }]
    );
}

#[test]
fn invalid_settings_template_is_an_error() {
    let mut doc = parse_markdown("# Title\n");
    let settings = LabelSettings {
        h_labels: Some("1.bogus-style".to_string()),
        ..settings()
    };
    let err = Labels::new(settings).apply(&mut doc).expect_err("invalid");
    assert_eq!(err.to_string(), "invalid h_labels setting label template");
    assert!(label_texts(&doc).is_empty());
}

#[test]
fn guide_is_labelled_end_to_end() {
    let markdown = include_str!("../test_data/guide.md");
    let mut doc = parse_markdown(markdown);
    let settings = LabelSettings {
        h_labels: Some("1. ,H.1 ,*".to_string()),
        ol_labels: Some("1.,(L.a)".to_string()),
        ..settings()
    };
    let output = Labels::new(settings).apply(&mut doc).expect("labels");

    assert_eq!(
        label_texts(&doc),
        vec!["1. ", "1.1 ", "1.", "2.", "(2.a)", "(2.b)", "1.i", "1.1 ", "A"]
    );
    let intro = doc
        .descendants(doc.root())
        .into_iter()
        .find(|&node| doc.tag(node) == Some("p"))
        .map(|p| doc.text_content(p));
    assert_eq!(intro.as_deref(), Some("Read part 1 first, then step 1.i."));
    assert!(output.warnings.is_empty());
}
