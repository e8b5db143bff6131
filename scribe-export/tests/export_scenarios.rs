//! End-to-end export scenarios: raw analysis in, rendered documents out.

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use serde_json::{Map, Value, json};

use scribe_core::{RawAnalysis, StructuredContent, structure_content};
use scribe_export::{ExportError, ExportFormat, Exporter, FixedClock, ProjectMeta, SequentialIds};

fn exporter() -> Exporter {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    Exporter::with_sources(Box::new(clock), Box::new(SequentialIds::new()))
}

fn structured(raw: Value) -> StructuredContent {
    let raw = RawAnalysis::from_json(&raw.to_string()).unwrap();
    structure_content(&raw)
}

fn text(format: &str, contents: &[StructuredContent], options: Value) -> String {
    let options = options.as_object().cloned().unwrap_or_default();
    let artifact = exporter()
        .export(format, contents, &ProjectMeta::default(), &options)
        .unwrap();
    String::from_utf8(artifact.bytes).unwrap()
}

#[test]
fn markdown_scenario() {
    let content = structured(json!({
        "sections": [{"heading": "Intro", "content": "Hello"}],
        "action_items": [{"task": "Send report", "priority": "high", "assignee": "Ana"}]
    }));
    let md = text("markdown", &[content], json!({}));
    let lines: Vec<&str> = md.lines().collect();
    assert!(lines.contains(&"### Intro"));
    assert!(lines.contains(&"Hello"));
    assert!(lines.contains(&"- [ ] 🔴 Send report (@Ana)"));
}

#[test]
fn mindmap_key_points_scenario() {
    let content = structured(json!({"key_points": ["Ship v2"]}));
    let out = text("mindmap", &[content], json!({}));
    let map: Value = serde_json::from_str(&out).unwrap();

    let branch = &map["root"]["children"][0];
    assert_eq!(branch["topic"], "Content");
    let points: Vec<&Value> = branch["children"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["topic"] == "Key Points")
        .collect();
    assert_eq!(points.len(), 1);
    let leaves = points[0]["children"].as_array().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0]["topic"], "Ship v2");
}

#[test]
fn ragged_table_scenario() {
    let content = structured(json!({
        "tables": [{"title": "Owners", "headers": ["A", "B"], "rows": [["x"]]}]
    }));

    let md = text("markdown", std::slice::from_ref(&content), json!({}));
    assert!(md.lines().any(|l| l == "| x |"));

    let grid = text("markdown", std::slice::from_ref(&content), json!({"table_format": "grid"}));
    assert!(grid.lines().any(|l| l.starts_with("| x ") && l.matches('|').count() == 2));

    let wiki = text("confluence", &[content], json!({}));
    assert!(wiki.lines().any(|l| l == "|| A || B ||"));
    assert!(wiki.lines().any(|l| l == "| x |"));
}

#[test]
fn empty_contents_fail_for_every_format() {
    let ex = exporter();
    for format in ExportFormat::ALL {
        let result = ex.export(format.as_str(), &[], &ProjectMeta::default(), &Map::new());
        assert!(matches!(result, Err(ExportError::NoContent)), "{format}");
    }
}

#[test]
fn unsupported_format() {
    let content = structured(json!({"title": "x"}));
    let err = exporter()
        .export("docx", &[content], &ProjectMeta::default(), &Map::new())
        .unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "docx"));
}

#[test]
fn pptx_is_a_readable_presentation() {
    let content = structured(json!({
        "title": "Sprint planning",
        "sections": [{"heading": "Goals", "content": "Ship the & release"}],
        "action_items": [{"task": "Fix the login bug", "priority": "high"}],
        "tables": [{"headers": ["Owner", "Item"], "rows": [["Ana", "Docs"]]}]
    }));
    let artifact = exporter()
        .export("pptx", &[content], &ProjectMeta::default(), &Map::new())
        .unwrap();
    assert!(artifact.filename.ends_with(".pptx"));

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    // Title, Goals, Action Items, Table
    for n in 1..=4 {
        assert!(archive.by_name(&format!("ppt/slides/slide{n}.xml")).is_ok());
    }
    assert!(archive.by_name("ppt/slides/slide5.xml").is_err());

    let mut goals = String::new();
    archive
        .by_name("ppt/slides/slide2.xml")
        .unwrap()
        .read_to_string(&mut goals)
        .unwrap();
    assert!(goals.contains("<a:t>Goals</a:t>"));
    assert!(goals.contains("Ship the &amp; release"));
}

#[test]
fn multiple_whiteboards_are_numbered() {
    let a = structured(json!({"sections": [{"heading": "Alpha", "content": "a"}]}));
    let b = structured(json!({"sections": [{"heading": "Beta", "content": "b"}]}));
    let md = text("markdown", &[a.clone(), b.clone()], json!({}));
    let first = md.find("## Whiteboard 1").unwrap();
    let second = md.find("## Whiteboard 2").unwrap();
    assert!(first < md.find("### Alpha").unwrap());
    assert!(second < md.find("### Beta").unwrap());

    let map: Value = serde_json::from_str(&text("mindmap", &[a, b], json!({}))).unwrap();
    assert_eq!(map["root"]["children"][1]["topic"], "Whiteboard 2");
}

#[test]
fn notion_and_confluence_list_action_items() {
    let content = structured(json!({
        "action_items": [{"task": "Email the vendor", "assignee": "Bo"}, {"task": "Review contract terms"}]
    }));
    let notion = text("notion", std::slice::from_ref(&content), json!({"include_properties": false}));
    assert!(notion.contains("| Review contract terms | Medium | Unassigned | To Do |"));
    assert!(!notion.contains("**Properties:**"));

    let wiki = text("confluence", &[content], json!({}));
    assert!(wiki.contains("* Email the vendor - [~Bo]"));
    assert!(wiki.contains("* Review contract terms\n"));
}
