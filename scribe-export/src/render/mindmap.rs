//! Mind map export: one tree, three serializations (JSON, XMind-style JSON,
//! FreeMind XML).

use serde::Serialize;

use scribe_core::text::{or_default, truncate_with_ellipsis};
use scribe_core::{Priority, Section, StructuredContent};

use super::{priority_color, xml_escape};
use crate::context::RenderContext;
use crate::options::{MindMapFormat, MindMapOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMapMeta {
    pub name: String,
    pub created: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindNode {
    pub topic: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub children: Vec<MindNode>,
}

impl MindNode {
    fn new(topic: impl Into<String>, ctx: &RenderContext) -> Self {
        Self {
            topic: topic.into(),
            id: ctx.ids.next_id(),
            priority: None,
            color: None,
            children: Vec::new(),
        }
    }

    pub fn child(&self, topic: &str) -> Option<&MindNode> {
        self.children.iter().find(|c| c.topic == topic)
    }

    /// Drop every node deeper than `max_depth`, counting this node as `depth`.
    fn prune(&mut self, depth: usize, max_depth: usize) {
        if depth >= max_depth {
            self.children.clear();
            return;
        }
        for child in &mut self.children {
            child.prune(depth + 1, max_depth);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMap {
    pub meta: MindMapMeta,
    pub root: MindNode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct XmindDocument<'a> {
    title: &'a str,
    structure: &'static str,
    theme: &'static str,
    root_topic: &'a MindNode,
}

/// Build the mind map tree for all contents.
pub fn build_mindmap(contents: &[StructuredContent], opts: &MindMapOptions, ctx: &RenderContext) -> MindMap {
    let title = ctx.meta.title();
    let mut root = MindNode::new(title.unwrap_or("Meeting Notes"), ctx);

    for (i, content) in contents.iter().enumerate() {
        let topic = if contents.len() > 1 {
            format!("Whiteboard {}", i + 1)
        } else {
            "Content".to_string()
        };
        let mut branch = MindNode::new(topic, ctx);

        for section in &content.sections {
            branch.children.push(section_node(section, "Section", ctx));
        }

        if !content.action_items.is_empty() {
            let mut actions = MindNode::new("Action Items", ctx);
            for item in &content.action_items {
                let mut node = MindNode::new(truncate_with_ellipsis(&item.task, 40), ctx);
                node.priority = Some(item.priority);
                if opts.include_colors {
                    node.color = Some(format!("#{}", priority_color(item.priority)));
                }
                actions.children.push(node);
            }
            branch.children.push(actions);
        }

        if !content.key_points.is_empty() {
            let mut points = MindNode::new("Key Points", ctx);
            for point in &content.key_points {
                points
                    .children
                    .push(MindNode::new(truncate_with_ellipsis(point, 50), ctx));
            }
            branch.children.push(points);
        }

        root.children.push(branch);
    }

    root.prune(1, opts.max_depth);

    MindMap {
        meta: MindMapMeta {
            name: title.unwrap_or("Meeting Whiteboard").to_string(),
            created: ctx.now.to_rfc3339(),
            version: "1.0".to_string(),
        },
        root,
    }
}

fn section_node(section: &Section, fallback: &str, ctx: &RenderContext) -> MindNode {
    let mut node = MindNode::new(or_default(&section.heading, fallback), ctx);
    for sub in &section.subsections {
        node.children.push(section_node(sub, "Subsection", ctx));
    }
    node
}

/// Serialize the map in the requested format.
pub fn serialize(map: &MindMap, format: MindMapFormat) -> Result<String, serde_json::Error> {
    match format {
        MindMapFormat::Json => serde_json::to_string_pretty(map),
        MindMapFormat::Xmind => serde_json::to_string_pretty(&XmindDocument {
            title: &map.meta.name,
            structure: "org.xmind.ui.map.unbalanced",
            theme: "xmind.ui.theme.default",
            root_topic: &map.root,
        }),
        MindMapFormat::Freemind => Ok(to_freemind(map)),
    }
}

fn to_freemind(map: &MindMap) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<map version=\"1.0.1\">\n");
    push_freemind_node(&mut xml, &map.root, 0);
    xml.push_str("</map>\n");
    xml
}

fn push_freemind_node(xml: &mut String, node: &MindNode, level: usize) {
    let indent = "  ".repeat(level);
    let color = node
        .color
        .as_deref()
        .map(|c| format!(" COLOR=\"{}\"", xml_escape(c)))
        .unwrap_or_default();
    let text = xml_escape(&node.topic);

    if node.children.is_empty() {
        xml.push_str(&format!("{indent}<node TEXT=\"{text}\"{color}/>\n"));
        return;
    }
    xml.push_str(&format!("{indent}<node TEXT=\"{text}\"{color}>\n"));
    for child in &node.children {
        push_freemind_node(xml, child, level + 1);
    }
    xml.push_str(&format!("{indent}</node>\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ProjectMeta, SequentialIds};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use scribe_core::{ActionItem, Category, Effort};

    fn build(contents: &[StructuredContent], opts: &MindMapOptions, meta: &ProjectMeta) -> MindMap {
        let ids = SequentialIds::new();
        let ctx = RenderContext {
            meta,
            now: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
            ids: &ids,
        };
        build_mindmap(contents, opts, &ctx)
    }

    fn item(task: &str, priority: Priority) -> ActionItem {
        ActionItem {
            task: task.into(),
            priority,
            assignee: None,
            deadline: None,
            category: Category::General,
            effort: Effort::Medium,
        }
    }

    fn sample() -> StructuredContent {
        let mut plan = Section::new("Plan", "");
        plan.subsections.push(Section::new("Phase 1", "Design"));
        StructuredContent {
            sections: vec![plan],
            action_items: vec![item(
                "Write the migration guide for the v2 storage layer",
                Priority::High,
            )],
            key_points: vec!["Ship v2".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_key_points_branch() {
        let map = build(
            &[StructuredContent {
                key_points: vec!["Ship v2".into()],
                ..Default::default()
            }],
            &MindMapOptions::default(),
            &ProjectMeta::default(),
        );
        assert_eq!(map.root.topic, "Meeting Notes");
        let points = map.root.child("Content").unwrap().child("Key Points").unwrap();
        assert_eq!(points.children.len(), 1);
        assert_eq!(points.children[0].topic, "Ship v2");
        assert!(points.children[0].children.is_empty());
    }

    #[test]
    fn test_tree_shape_and_ids() {
        let map = build(&[sample()], &MindMapOptions::default(), &ProjectMeta::default());
        assert_eq!(map.meta.name, "Meeting Whiteboard");
        assert_eq!(map.meta.created, "2024-05-06T09:00:00+00:00");
        assert_eq!(map.root.id, "node-1");

        let content = map.root.child("Content").unwrap();
        assert_eq!(content.child("Plan").unwrap().children[0].topic, "Phase 1");

        let task = &content.child("Action Items").unwrap().children[0];
        assert_eq!(task.topic, "Write the migration guide for the v2 sto...");
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.color.as_deref(), Some("#DC143C"));
    }

    #[test]
    fn test_multiple_contents_and_no_colors() {
        let opts = MindMapOptions {
            include_colors: false,
            ..Default::default()
        };
        let map = build(&[sample(), sample()], &opts, &ProjectMeta::default());
        let topics: Vec<&str> = map.root.children.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, vec!["Whiteboard 1", "Whiteboard 2"]);
        let task = &map.root.children[1].child("Action Items").unwrap().children[0];
        assert_eq!(task.color, None);
    }

    #[test]
    fn test_max_depth_prunes() {
        let opts = MindMapOptions {
            max_depth: 3,
            ..Default::default()
        };
        let map = build(&[sample()], &opts, &ProjectMeta::default());
        let content = map.root.child("Content").unwrap();
        assert!(content.child("Plan").unwrap().children.is_empty());
        assert!(content.child("Key Points").unwrap().children.is_empty());

        let opts = MindMapOptions {
            max_depth: 1,
            ..Default::default()
        };
        let map = build(&[sample()], &opts, &ProjectMeta::default());
        assert!(map.root.children.is_empty());
    }

    #[test]
    fn test_json_serialization() {
        let map = build(&[sample()], &MindMapOptions::default(), &ProjectMeta::default());
        let json: serde_json::Value =
            serde_json::from_str(&serialize(&map, MindMapFormat::Json).unwrap()).unwrap();
        assert_eq!(json["meta"]["version"], "1.0");
        assert_eq!(json["root"]["children"][0]["topic"], "Content");
        let task = &json["root"]["children"][0]["children"][1]["children"][0];
        assert_eq!(task["priority"], "high");
        assert!(json["root"].get("priority").is_none());
    }

    #[test]
    fn test_xmind_wrapper() {
        let meta = ProjectMeta::new(Some("Retro".into()), None);
        let map = build(&[sample()], &MindMapOptions::default(), &meta);
        let json: serde_json::Value =
            serde_json::from_str(&serialize(&map, MindMapFormat::Xmind).unwrap()).unwrap();
        assert_eq!(json["title"], "Retro");
        assert_eq!(json["structure"], "org.xmind.ui.map.unbalanced");
        assert_eq!(json["theme"], "xmind.ui.theme.default");
        assert_eq!(json["rootTopic"]["topic"], "Retro");
    }

    #[test]
    fn test_freemind_xml() {
        let meta = ProjectMeta::new(Some("R&D".into()), None);
        let content = StructuredContent {
            action_items: vec![item("Fix login bug", Priority::Low)],
            ..Default::default()
        };
        let map = build(&[content], &MindMapOptions::default(), &meta);
        let xml = serialize(&map, MindMapFormat::Freemind).unwrap();
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<map version=\"1.0.1\">
<node TEXT=\"R&amp;D\">
  <node TEXT=\"Content\">
    <node TEXT=\"Action Items\">
      <node TEXT=\"Fix login bug\" COLOR=\"#228B22\"/>
    </node>
  </node>
</node>
</map>
";
        assert_eq!(xml, expected);
    }
}
