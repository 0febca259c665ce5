use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::EvaluationConfig;
use crate::models::{Categorized, CategorySummary, GraphData, GraphEdge};

pub fn summarize_by_category(categorized: &Categorized) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = categorized
        .iter()
        .map(|(category, statements)| {
            let count = statements.len();
            let total_weight: i64 = statements.iter().map(|s| i64::from(s.weight)).sum();
            CategorySummary {
                category: category.clone(),
                count,
                avg_weight: if count == 0 {
                    0.0
                } else {
                    total_weight as f64 / count as f64
                },
            }
        })
        .collect();

    // stable sort keeps first-seen order among equal counts
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Edges ordered strongest first, ties broken by node ids.
pub fn strongest_edges(edges: &[GraphEdge]) -> Vec<&GraphEdge> {
    let mut sorted: Vec<&GraphEdge> = edges.iter().collect();
    sorted.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then(a.source.cmp(&b.source))
            .then(a.target.cmp(&b.target))
    });
    sorted
}

/// Console listing of parsed statements per category.
pub fn statement_summary(categorized: &Categorized) -> String {
    let mut output = String::new();
    let mut total = 0usize;

    let _ = writeln!(output, "=== Parsed Statements ===");
    for (category, statements) in categorized {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}: {} statements", category, statements.len());
        for statement in statements {
            let _ = writeln!(output, "  - {}", statement.text);
        }
        total += statements.len();
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Total: {total} statements");

    output
}

pub fn build_report(
    config: &EvaluationConfig,
    generated_on: NaiveDate,
    threshold: f64,
    categorized: &Categorized,
    graph: &GraphData,
) -> String {
    let summaries = summarize_by_category(categorized);
    let mut output = String::new();

    let _ = writeln!(output, "# {}", config.title);
    let _ = writeln!(
        output,
        "Generated {} from {} statements ({} connections at threshold {:.2})",
        generated_on,
        graph.nodes.len(),
        graph.edges.len(),
        threshold
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Statement Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No statements recorded.");
    } else {
        for summary in summaries.iter() {
            let label = config
                .categories
                .iter()
                .find(|category| category.name == summary.category)
                .map(|category| category.display_name())
                .unwrap_or_else(|| summary.category.clone());
            let _ = writeln!(
                output,
                "- {}: {} statements (avg weight {:.1})",
                label, summary.count, summary.avg_weight
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Strongest Connections");

    if graph.edges.is_empty() {
        let _ = writeln!(output, "No statements are similar enough to connect.");
    } else {
        for edge in strongest_edges(&graph.edges).into_iter().take(10) {
            let (Some(source), Some(target)) =
                (graph.nodes.get(edge.source), graph.nodes.get(edge.target))
            else {
                continue;
            };
            let marker = if edge.is_strong() { " (strong)" } else { "" };
            let _ = writeln!(
                output,
                "- {:.3}{}: \"{}\" ({}) ↔ \"{}\" ({})",
                edge.similarity, marker, source.text, source.category, target.text, target.category
            );
        }
    }

    let unpositioned: Vec<_> = graph
        .nodes
        .iter()
        .filter(|node| !node.is_positioned())
        .collect();
    if !unpositioned.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Outside Poster Regions");
        for node in unpositioned {
            let _ = writeln!(output, "- {} ({})", node.text, node.category);
        }
    }

    output
}
