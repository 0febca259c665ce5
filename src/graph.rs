use tracing::debug;

use crate::error::{GraphError, Result};
use crate::layout::PosterLayout;
use crate::models::{Categorized, GraphData, GraphEdge, GraphNode};
use crate::similarity;

pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// Box size for a statement, stepped by character count.
pub fn size_class(text: &str) -> (u32, u32) {
    match text.chars().count() {
        0..=24 => (80, 45),
        25..=39 => (90, 50),
        40..=54 => (100, 60),
        _ => (110, 65),
    }
}

/// One node per statement, categories in map order, statements in input order.
///
/// Ids are positional (`0..n`), so a blank statement fails the whole call
/// instead of being skipped.
pub fn build_nodes(categorized: &Categorized) -> Result<Vec<GraphNode>> {
    let mut nodes = Vec::with_capacity(categorized.values().map(Vec::len).sum());

    for (category, statements) in categorized {
        for (index, statement) in statements.iter().enumerate() {
            if statement.text.trim().is_empty() {
                return Err(GraphError::InvalidInput {
                    category: category.clone(),
                    index,
                    reason: "statement text is empty".to_string(),
                });
            }

            let (width, height) = size_class(&statement.text);
            nodes.push(GraphNode {
                id: nodes.len(),
                category: category.clone(),
                text: statement.text.clone(),
                weight: statement.weight,
                comment: statement.comment.clone(),
                width,
                height,
                x: None,
                y: None,
            });
        }
    }

    Ok(nodes)
}

/// Pairwise similarity edges with `source < target`.
///
/// Scores are rounded to three decimals before the `>= threshold` check, so
/// every stored similarity meets the threshold that admitted it.
pub fn calculate_similarities(nodes: &[GraphNode], threshold: f64) -> Result<Vec<GraphEdge>> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(GraphError::InvalidThreshold(threshold));
    }

    let mut edges = Vec::new();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let score = similarity::similarity(&nodes[i].text, &nodes[j].text);
            if !score.is_finite() {
                return Err(GraphError::NonFiniteSimilarity {
                    first: nodes[i].id,
                    second: nodes[j].id,
                });
            }

            let score = round3(score);
            if score >= threshold {
                debug!(source = nodes[i].id, target = nodes[j].id, score, "similarity edge");
                edges.push(GraphEdge {
                    source: nodes[i].id,
                    target: nodes[j].id,
                    similarity: score,
                });
            }
        }
    }

    Ok(edges)
}

/// Builds nodes, edges and poster coordinates in one pass.
pub fn build_graph(
    categorized: &Categorized,
    threshold: f64,
    layout: &PosterLayout,
) -> Result<GraphData> {
    let nodes = build_nodes(categorized)?;
    let edges = calculate_similarities(&nodes, threshold)?;
    let nodes = layout.position(&nodes)?;

    Ok(GraphData { nodes, edges })
}

/// Category of the first statement that equals, contains, or is contained in `text`.
pub fn find_statement_category<'a>(text: &str, categorized: &'a Categorized) -> Option<&'a str> {
    categorized
        .iter()
        .find(|(_, statements)| {
            statements.iter().any(|statement| {
                statement.text == text
                    || statement.text.contains(text)
                    || text.contains(statement.text.as_str())
            })
        })
        .map(|(category, _)| category.as_str())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Statement;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn categorized(groups: Vec<(&str, Vec<&str>)>) -> Categorized {
        groups
            .into_iter()
            .map(|(category, texts)| {
                (
                    category.to_string(),
                    texts
                        .into_iter()
                        .map(|text| Statement::new(text, category))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn size_classes_follow_breakpoints() {
        assert_eq!(size_class(&"a".repeat(24)), (80, 45));
        assert_eq!(size_class(&"a".repeat(25)), (90, 50));
        assert_eq!(size_class(&"a".repeat(39)), (90, 50));
        assert_eq!(size_class(&"a".repeat(40)), (100, 60));
        assert_eq!(size_class(&"a".repeat(54)), (100, 60));
        assert_eq!(size_class(&"a".repeat(55)), (110, 65));
    }

    #[test]
    fn size_class_counts_characters_not_bytes() {
        // 24 characters, 48 bytes
        assert_eq!(size_class(&"æ".repeat(24)), (80, 45));
    }

    #[test]
    fn nodes_keep_category_and_statement_order() {
        let input = categorized(vec![
            ("Stop Doing", vec!["sene afleveringer"]),
            ("Keep Doing", vec!["gruppearbejde", "cases"]),
        ]);

        let nodes = build_nodes(&input).unwrap();
        let summary: Vec<(usize, &str, &str)> = nodes
            .iter()
            .map(|node| (node.id, node.category.as_str(), node.text.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (0, "Stop Doing", "sene afleveringer"),
                (1, "Keep Doing", "gruppearbejde"),
                (2, "Keep Doing", "cases"),
            ]
        );
        assert!(nodes.iter().all(|node| !node.is_positioned()));
    }

    #[test]
    fn nodes_carry_weight_and_comment() {
        let mut input = Categorized::new();
        input.insert(
            "Keep Doing".to_string(),
            vec![Statement::new("cases", "Keep Doing")
                .with_weight(4)
                .with_comment("Weight: 4")],
        );

        let nodes = build_nodes(&input).unwrap();
        assert_eq!(nodes[0].weight, 4);
        assert_eq!(nodes[0].comment, "Weight: 4");
    }

    #[test]
    fn blank_statement_fails_whole_build() {
        let input = categorized(vec![("Keep Doing", vec!["cases", "  "])]);

        match build_nodes(&input) {
            Err(GraphError::InvalidInput { category, index, .. }) => {
                assert_eq!(category, "Keep Doing");
                assert_eq!(index, 1);
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn identical_statements_produce_one_full_edge() {
        let input = categorized(vec![(
            "Keep Doing",
            vec!["Jeg vil gerne have mere feedback", "Jeg vil gerne have mere feedback"],
        )]);
        let nodes = build_nodes(&input).unwrap();
        let edges = calculate_similarities(&nodes, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(
            edges,
            vec![GraphEdge {
                source: 0,
                target: 1,
                similarity: 1.0
            }]
        );
    }

    #[test]
    fn disjoint_statements_have_no_edge() {
        let input = categorized(vec![("Keep Doing", vec!["abc", "xyz"])]);
        let nodes = build_nodes(&input).unwrap();

        assert!(calculate_similarities(&nodes, 0.01).unwrap().is_empty());
        // zero similarity still meets a zero threshold
        assert_eq!(calculate_similarities(&nodes, 0.0).unwrap().len(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let input = categorized(vec![("Keep Doing", vec!["test", "tent"])]);
        let nodes = build_nodes(&input).unwrap();

        assert_eq!(calculate_similarities(&nodes, 0.75).unwrap().len(), 1);
        assert!(calculate_similarities(&nodes, 0.76).unwrap().is_empty());
    }

    #[test]
    fn similarity_is_rounded_to_three_decimals() {
        // distance 1 over length 3
        let input = categorized(vec![("Keep Doing", vec!["abc", "abd"])]);
        let nodes = build_nodes(&input).unwrap();
        let edges = calculate_similarities(&nodes, 0.5).unwrap();

        assert_eq!(edges[0].similarity, 0.667);
    }

    #[test]
    fn stored_similarity_never_falls_below_threshold() {
        // 1/3 rounds down to 0.333
        let input = categorized(vec![("Keep Doing", vec!["abc", "axy"])]);
        let nodes = build_nodes(&input).unwrap();

        assert!(calculate_similarities(&nodes, 0.3333).unwrap().is_empty());
        let edges = calculate_similarities(&nodes, 0.333).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].similarity, 0.333);
    }

    #[test]
    fn empty_nodes_give_empty_edges() {
        assert!(calculate_similarities(&[], DEFAULT_THRESHOLD).unwrap().is_empty());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(matches!(
            calculate_similarities(&[], 1.5),
            Err(GraphError::InvalidThreshold(_))
        ));
        assert!(matches!(
            calculate_similarities(&[], f64::NAN),
            Err(GraphError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn build_graph_positions_known_buckets() {
        let input = categorized(vec![
            ("Keep Doing", vec!["gruppearbejde", "cases"]),
            ("Other", vec!["kaffe"]),
        ]);
        let graph = build_graph(&input, DEFAULT_THRESHOLD, &PosterLayout::keep_stop_start()).unwrap();

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (Some(40), Some(80)));
        assert_eq!((graph.nodes[1].x, graph.nodes[1].y), (Some(150), Some(80)));
        assert!(!graph.nodes[2].is_positioned());
    }

    #[test]
    fn finds_category_by_containment() {
        let input = categorized(vec![
            ("Keep Doing", vec!["mere gruppearbejde"]),
            ("Stop Doing", vec!["lange forelæsninger om teori"]),
        ]);

        assert_eq!(find_statement_category("lange forelæsninger", &input), Some("Stop Doing"));
        assert_eq!(
            find_statement_category("vi vil have mere gruppearbejde!", &input),
            Some("Keep Doing")
        );
        assert_eq!(find_statement_category("kaffe", &input), None);
    }

    fn arb_categorized() -> impl Strategy<Value = Categorized> {
        prop::collection::vec(
            (
                prop_oneof![
                    Just("Keep Doing".to_string()),
                    Just("Stop Doing".to_string()),
                    Just("Start Doing".to_string()),
                ],
                "[a-e]{1,8}",
            ),
            0..16,
        )
        .prop_map(|rows| {
            let mut categorized = Categorized::new();
            for (category, text) in rows {
                categorized
                    .entry(category.clone())
                    .or_default()
                    .push(Statement::new(text, category));
            }
            categorized
        })
    }

    proptest! {
        #[test]
        fn prop_node_ids_are_positional(input in arb_categorized()) {
            let total: usize = input.values().map(Vec::len).sum();
            let nodes = build_nodes(&input).unwrap();
            prop_assert_eq!(nodes.len(), total);
            for (position, node) in nodes.iter().enumerate() {
                prop_assert_eq!(node.id, position);
            }
        }

        #[test]
        fn prop_edges_are_unique_pairs(input in arb_categorized(), threshold in 0.0f64..=1.0) {
            let nodes = build_nodes(&input).unwrap();
            let edges = calculate_similarities(&nodes, threshold).unwrap();
            let mut seen = HashSet::new();
            for edge in &edges {
                prop_assert!(edge.source < edge.target);
                prop_assert!(edge.similarity >= threshold);
                prop_assert!(seen.insert((edge.source, edge.target)));
            }
        }

        #[test]
        fn prop_higher_threshold_gives_subset(
            input in arb_categorized(),
            low in 0.0f64..=1.0,
            high in 0.0f64..=1.0,
        ) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            let nodes = build_nodes(&input).unwrap();
            let loose: HashSet<(usize, usize)> = calculate_similarities(&nodes, low)
                .unwrap()
                .iter()
                .map(|edge| (edge.source, edge.target))
                .collect();
            for edge in calculate_similarities(&nodes, high).unwrap() {
                prop_assert!(loose.contains(&(edge.source, edge.target)));
            }
        }
    }
}
