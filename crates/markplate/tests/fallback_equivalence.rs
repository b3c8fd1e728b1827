//! Rendering with templates that never match must equal plain rendering.

use markplate::template::{MiniJinjaEngine, TemplateEngine};
use markplate::{parse, render, Extensions, HtmlOptions, HtmlRenderer, TemplateRenderer};
use proptest::prelude::*;

fn block() -> impl Strategy<Value = String> {
    let word = "[a-z]{1,8}";
    let inline = prop_oneof![
        word.prop_map(|w| w.to_string()),
        word.prop_map(|w| format!("*{}*", w)),
        word.prop_map(|w| format!("**{}**", w)),
        word.prop_map(|w| format!("~~{}~~", w)),
        word.prop_map(|w| format!("`{}`", w)),
        word.prop_map(|w| format!("[{}](/{})", w, w)),
        Just("\"q\"".to_string()),
        Just("a -- b".to_string()),
    ];
    let line = prop::collection::vec(inline, 1..6).prop_map(|parts| parts.join(" "));
    prop_oneof![
        line.clone(),
        line.clone().prop_map(|l| format!("## {}", l)),
        line.clone().prop_map(|l| format!("> {}", l)),
        line.clone().prop_map(|l| format!("- {}", l)),
        Just("---".to_string()),
        Just("| a | b |\n|---|:-:|\n| 1 | 2 |".to_string()),
    ]
}

fn markdown() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..6).prop_map(|blocks| blocks.join("\n\n"))
}

/// Templates for names no markdown construct produces.
fn unused_templates() -> Box<dyn TemplateEngine> {
    let mut engine = MiniJinjaEngine::new();
    engine.add_template("aside", "<ASIDE>{{ Content }}</ASIDE>").unwrap();
    engine.add_template("sub", "<SUB>{{ Content }}</SUB>").unwrap();
    engine.add_template("nbsp", "~").unwrap();
    Box::new(engine)
}

proptest! {
    #[test]
    fn prop_unused_templates_equal_plain(source in markdown()) {
        let doc = parse(&source, &Extensions::default());
        let plain = render(&doc, &HtmlRenderer::new(HtmlOptions::default())).unwrap();

        let templated = TemplateRenderer::with_html(Some(unused_templates()), HtmlOptions::default())
            .render(&doc)
            .unwrap();
        prop_assert_eq!(&templated, &plain);

        let no_engine = TemplateRenderer::with_html(None, HtmlOptions::default())
            .render(&doc)
            .unwrap();
        prop_assert_eq!(&no_engine, &plain);
    }

    #[test]
    fn prop_rendering_is_deterministic(source in markdown()) {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("p", "<P{{ Attrs }}>{{ Content }}</P>\n").unwrap();
        engine.add_template("em", "<I>{{ Content }}</I>").unwrap();
        let renderer = TemplateRenderer::with_html(Some(Box::new(engine)), HtmlOptions::default());

        let doc = parse(&source, &Extensions::default());
        let first = renderer.render(&doc).unwrap();
        let second = renderer.render(&doc).unwrap();
        prop_assert_eq!(first, second);
    }
}
