//! Greedy topic clustering of whiteboard sections by keyword overlap.

use serde::{Deserialize, Serialize};

use crate::concepts::extract_keywords;
use crate::model::{Section, non_empty};

/// Share of the smaller keyword set two sections must have in common.
const OVERLAP_RATIO: f64 = 0.3;

/// A group of sections judged topically related.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub title: String,
    pub sections: Vec<Section>,
    pub keywords: Vec<String>,
}

/// Whether two keyword fingerprints overlap enough to share a cluster.
pub fn keywords_related(a: &[String], b: &[String]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let common = a.iter().filter(|k| b.contains(k)).count();
    let needed = (OVERLAP_RATIO * a.len().min(b.len()) as f64).max(1.0);
    common as f64 >= needed
}

/// Cluster sections in a single greedy pass.
///
/// Each unclustered section seeds a cluster; every later unclustered section
/// whose content keywords overlap the seed's joins it. O(n²) in sections.
pub fn cluster_sections(sections: &[Section]) -> Vec<Cluster> {
    let fingerprints: Vec<Vec<String>> = sections
        .iter()
        .map(|s| extract_keywords(&s.content))
        .collect();
    let mut used = vec![false; sections.len()];
    let mut clusters = Vec::new();

    for (i, section) in sections.iter().enumerate() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let title = non_empty(&section.heading)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Topic {}", clusters.len() + 1));
        let seed = &fingerprints[i];
        let mut members = vec![section.clone()];

        for j in (i + 1)..sections.len() {
            if !used[j] && keywords_related(seed, &fingerprints[j]) {
                used[j] = true;
                members.push(sections[j].clone());
            }
        }

        clusters.push(Cluster {
            title,
            sections: members,
            keywords: seed.clone(),
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_related_sections_share_cluster() {
        let sections = vec![
            Section::new("Budget", "budget forecast spending quarterly"),
            Section::new("Hiring", "recruiting interviews candidates onboarding"),
            Section::new("Costs", "spending budget cuts vendors"),
        ];
        let clusters = cluster_sections(&sections);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].title, "Budget");
        assert_eq!(clusters[0].sections.len(), 2);
        assert_eq!(clusters[0].sections[1].heading, "Costs");
        assert_eq!(clusters[1].title, "Hiring");
    }

    #[test]
    fn test_disjoint_sections_stay_apart() {
        let sections = vec![
            Section::new("A", "apples oranges bananas"),
            Section::new("B", "servers networks routers"),
        ];
        let clusters = cluster_sections(&sections);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.sections.len() == 1));
    }

    #[test]
    fn test_generated_topic_titles() {
        let sections = vec![
            Section::new("", "apples oranges bananas"),
            Section::new("  ", "servers networks routers"),
        ];
        let clusters = cluster_sections(&sections);
        assert_eq!(clusters[0].title, "Topic 1");
        assert_eq!(clusters[1].title, "Topic 2");
    }

    #[test]
    fn test_empty_content_never_joins() {
        let sections = vec![Section::new("One", ""), Section::new("Two", "")];
        assert_eq!(cluster_sections(&sections).len(), 2);
    }

    #[test]
    fn test_overlap_threshold() {
        let ten = kw(&[
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliet",
        ]);
        let two_shared = kw(&["alpha", "bravo", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo"]);
        let three_shared = kw(&["alpha", "bravo", "charlie", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo"]);
        assert!(!keywords_related(&ten, &two_shared));
        assert!(keywords_related(&ten, &three_shared));
        // A single shared keyword suffices for small sets.
        assert!(keywords_related(&kw(&["alpha"]), &kw(&["alpha", "zulu"])));
        assert!(!keywords_related(&[], &ten));
    }

    #[test]
    fn test_no_sections() {
        assert!(cluster_sections(&[]).is_empty());
    }
}
