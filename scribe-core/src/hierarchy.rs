//! Tree view of a structured whiteboard, rooted at its title.

use serde::{Deserialize, Serialize};

use crate::model::{ActionItem, Section};
use crate::text::{or_default, truncate_with_ellipsis};

const SUBSECTION_CONTENT_CHARS: usize = 100;
const TASK_NAME_CHARS: usize = 50;
const POINT_NAME_CHARS: usize = 60;

/// Kind of a hierarchy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Section,
    Subsection,
    Actions,
    Task,
    Keypoints,
    Point,
}

/// One node of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl HierarchyNode {
    fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type: Some(node_type),
            ..Default::default()
        }
    }

    /// Direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Build the document tree.
pub fn build_hierarchy(
    title: &str,
    sections: &[Section],
    action_items: &[ActionItem],
    key_points: &[String],
) -> HierarchyNode {
    let mut root = HierarchyNode {
        name: or_default(title, "Meeting Notes").to_string(),
        ..Default::default()
    };

    for section in sections {
        let mut node = HierarchyNode::new(or_default(&section.heading, "Section"), NodeType::Section);
        node.children = section
            .subsections
            .iter()
            .map(|sub| HierarchyNode {
                content: Some(truncate_with_ellipsis(&sub.content, SUBSECTION_CONTENT_CHARS)),
                ..HierarchyNode::new(or_default(&sub.heading, "Subsection"), NodeType::Subsection)
            })
            .collect();
        root.children.push(node);
    }

    if !action_items.is_empty() {
        let mut actions = HierarchyNode::new("Action Items", NodeType::Actions);
        actions.children = action_items
            .iter()
            .map(|item| HierarchyNode {
                priority: Some(item.priority.to_string()),
                assignee: item.assignee.clone(),
                ..HierarchyNode::new(truncate_with_ellipsis(&item.task, TASK_NAME_CHARS), NodeType::Task)
            })
            .collect();
        root.children.push(actions);
    }

    if !key_points.is_empty() {
        let mut points = HierarchyNode::new("Key Points", NodeType::Keypoints);
        points.children = key_points
            .iter()
            .map(|p| HierarchyNode::new(truncate_with_ellipsis(p, POINT_NAME_CHARS), NodeType::Point))
            .collect();
        root.children.push(points);
    }

    root
}
