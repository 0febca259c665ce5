use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Statements grouped by category, in first-seen category order.
pub type Categorized = IndexMap<String, Vec<Statement>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub comment: String,
}

impl Statement {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            weight: 0,
            comment: String::new(),
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Text with the comment appended in parentheses when one is present.
    pub fn full_statement(&self) -> String {
        if self.comment.trim().is_empty() {
            self.text.clone()
        } else {
            format!("{} ({})", self.text, self.comment)
        }
    }
}

/// Flattens every category into one list of full statements, ignoring categories.
pub fn flatten_statements(categorized: &Categorized) -> Vec<String> {
    categorized
        .values()
        .flat_map(|statements| statements.iter().map(Statement::full_statement))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub category: String,
    pub text: String,
    pub weight: i32,
    pub comment: String,
    pub width: u32,
    pub height: u32,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl GraphNode {
    pub fn is_positioned(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub similarity: f64,
}

impl GraphEdge {
    /// Edges above this similarity are drawn emphasized on the poster.
    pub const STRONG_SIMILARITY: f64 = 0.55;

    pub fn is_strong(&self) -> bool {
        self.similarity > Self::STRONG_SIMILARITY
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub avg_weight: f64,
}
