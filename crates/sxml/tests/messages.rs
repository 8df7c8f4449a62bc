//! End-to-end runs of the parse + report pipeline.

use sxml::{
    CollectingSink, Element, MessageFormat, ParseOptions, Position, ReportConfig, Reporter,
    Severity, WriterSink, XmlNode, kind, parse, parse_with,
};

fn outline(element: &Element) -> String {
    let mut out = element.qualified_name();
    if !element.attributes.is_empty() {
        let names: Vec<String> = element
            .attributes
            .iter()
            .map(|attr| attr.qualified_name())
            .collect();
        out.push_str(&format!("[{}]", names.join(",")));
    }
    if !element.children.is_empty() {
        let children: Vec<String> = element
            .children
            .iter()
            .map(|child| match child {
                XmlNode::Element(child) => outline(child),
                XmlNode::Text(run) if run.cdata => format!("cdata({:?})", run.content),
                XmlNode::Text(run) => format!("text({:?})", run.content),
            })
            .collect();
        out.push_str(&format!("({})", children.join(" ")));
    }
    out
}

#[test]
fn test_tree_outline() {
    let doc = parse(
        "<cfg:root cfg:version=\"2\">\n  <name>demo</name>\n  <flag on=\"true\"/>\n  \
         <blob><![CDATA[1 < 2]]></blob>\n</cfg:root>",
    )
    .unwrap();
    insta::assert_snapshot!(
        outline(&doc.document.root),
        @r#"cfg:root[cfg:version](name(text("demo")) flag[on] blob(cdata("1 < 2")))"#
    );
}

#[test]
fn test_every_element_round_trips_through_the_source() {
    let source = "<a>\n  <b x=\"1\">text</b>\n  <c/>\n</a>";
    let doc = parse(source).unwrap();

    fn check(element: &Element, doc: &sxml::PositionedDocument, source: &str) {
        let start = doc.positioner.start_position_of(element);
        let offset = doc
            .positioner
            .source()
            .position_to_offset(start)
            .expect("element start must be addressable");
        assert_eq!(&source[offset..offset + 1], "<");
        for child in element.child_elements() {
            check(child, doc, source);
        }
    }
    check(&doc.document.root, &doc, source);
}

#[test]
fn test_pipeline_with_collecting_sink() {
    let source = "<order>\n  <item sku=\"A1\"/>\n  <item sku=\"\"/>\n</order>";
    let options = ParseOptions {
        uri: Some("order.xml".to_string()),
        ..ParseOptions::default()
    };
    let config = ReportConfig::new(MessageFormat::HeaderOnly);
    let mut sink = CollectingSink::new();
    let doc = parse_with(source, &options, &config, &mut sink).unwrap();
    assert!(sink.is_empty(), "clean parse reports nothing");

    let mut reporter = Reporter::new(&doc.positioner, &config, &mut sink);
    for item in doc.document.root.get_children("item") {
        let sku = item.attribute("sku").expect("sku attribute");
        if sku.value.is_empty() {
            reporter
                .at(sku)
                .kind(kind::SCHEMA_VALIDATION)
                .error("sku must not be empty");
        } else {
            reporter.at(item).debug("item accepted");
        }
    }

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].severity, Severity::Debug);
    assert_eq!(
        entries[1].rendered,
        "Error (Schema validation) at order.xml:3:9 - sku must not be empty"
    );
    assert!(sink.has_errors());
    assert_eq!(sink.max_severity(), Some(Severity::Error));
}

#[test]
fn test_pipeline_with_writer_sink() {
    let doc = parse("<a>\n<b/>\n</a>").unwrap();
    let config = ReportConfig::new(MessageFormat::Short);
    let mut sink = WriterSink::new(Vec::new());
    let mut reporter = Reporter::new(&doc.positioner, &config, &mut sink);
    let b = doc.document.root.child_elements().next().unwrap();
    reporter.at(b).warn("first");
    reporter.at(&doc.document.root).info("second");
    let written = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(written, "2:1 - first\n1:1 - second\n");
}

#[test]
fn test_detailed_messages_for_unparseable_document() {
    let source = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<list>";
    let mut sink = CollectingSink::new();
    let err = parse_with(
        source,
        &ParseOptions::default(),
        &ReportConfig::default(),
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Fatal error (XML parsing)\n \
         1| <?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n \
         2| <list>\n          \
         ^ Premature end of file, expected closing tag </list>.\n\n"
    );
    assert_eq!(sink.entries().len(), 1);
    assert_eq!(sink.entries()[0].rendered, err.to_string());
}

#[test]
fn test_positioner_usable_from_another_thread() {
    let doc = parse("<a><b/></a>").unwrap();
    let positioner = doc.positioner.clone();
    let root = doc.document.root.clone();
    let handle = std::thread::spawn(move || positioner.span_of(&root).start);
    assert_eq!(handle.join().unwrap(), Position::new(1, 1));
}
