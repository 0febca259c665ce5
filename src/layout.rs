//! Deterministic grid layout of graph nodes into poster regions.
//!
//! Each bucket owns one category and lays its nodes out row by row in a fixed
//! number of columns. Nodes whose category has no bucket are left without
//! coordinates; callers with a different taxonomy supply their own table.
//! Overlap is not detected: the node size classes are tuned to fit the default
//! spacing.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::models::GraphNode;

const COLUMNS: u32 = 3;
const X_SPACING: i32 = 110;
const Y_SPACING: i32 = 75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketLayout {
    pub category: String,
    pub columns: u32,
    pub x_start: i32,
    pub x_spacing: i32,
    pub y_start: i32,
    pub y_spacing: i32,
}

impl BucketLayout {
    fn at(category: &str, x_start: i32, y_start: i32) -> Self {
        Self {
            category: category.to_string(),
            columns: COLUMNS,
            x_start,
            x_spacing: X_SPACING,
            y_start,
            y_spacing: Y_SPACING,
        }
    }

    /// Grid cell for the `index`-th node of this bucket, `None` if it leaves the `i32` plane.
    pub fn cell(&self, index: usize) -> Option<(i32, i32)> {
        let columns = self.columns.max(1) as usize;
        let column = i32::try_from(index % columns).ok()?;
        let row = i32::try_from(index / columns).ok()?;
        let x = self.x_start.checked_add(column.checked_mul(self.x_spacing)?)?;
        let y = self.y_start.checked_add(row.checked_mul(self.y_spacing)?)?;
        Some((x, y))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosterLayout {
    pub buckets: Vec<BucketLayout>,
}

impl PosterLayout {
    pub fn new(buckets: Vec<BucketLayout>) -> Result<Self> {
        let layout = Self { buckets };
        layout.validate()?;
        Ok(layout)
    }

    /// Three regions: top left, bottom center, top right.
    pub fn three_region(categories: [&str; 3]) -> Self {
        let [top_left, bottom_center, top_right] = categories;
        Self {
            buckets: vec![
                BucketLayout::at(top_left, 40, 80),
                BucketLayout::at(top_right, 580, 80),
                BucketLayout::at(bottom_center, 330, 530),
            ],
        }
    }

    pub fn keep_stop_start() -> Self {
        Self::three_region(["Keep Doing", "Stop Doing", "Start Doing"])
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            if bucket.columns == 0 {
                return Err(GraphError::InvalidLayout {
                    category: bucket.category.clone(),
                    reason: "columns must be at least 1".to_string(),
                });
            }
            if !seen.insert(bucket.category.as_str()) {
                return Err(GraphError::InvalidLayout {
                    category: bucket.category.clone(),
                    reason: "category appears in more than one bucket".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn bucket(&self, category: &str) -> Option<&BucketLayout> {
        self.buckets.iter().find(|bucket| bucket.category == category)
    }

    /// Returns a copy of `nodes` with coordinates for every node in a known bucket.
    ///
    /// Order and ids are unchanged. Nodes are numbered within their bucket in
    /// graph order. Unmatched nodes come back without coordinates. Fails when a
    /// bucket's grid runs past the `i32` coordinate range.
    pub fn position(&self, nodes: &[GraphNode]) -> Result<Vec<GraphNode>> {
        let mut filled: HashMap<&str, usize> = HashMap::new();

        nodes
            .iter()
            .map(|node| -> Result<GraphNode> {
                let mut node = node.clone();
                node.x = None;
                node.y = None;
                if let Some(bucket) = self.bucket(&node.category) {
                    let index = filled.entry(bucket.category.as_str()).or_insert(0);
                    let (x, y) = bucket.cell(*index).ok_or_else(|| GraphError::InvalidLayout {
                        category: bucket.category.clone(),
                        reason: format!("coordinates of node {} overflow", node.id),
                    })?;
                    *index += 1;
                    node.x = Some(x);
                    node.y = Some(y);
                    debug!(id = node.id, category = %node.category, x, y, "positioned node");
                }
                Ok(node)
            })
            .collect()
    }
}

/// Lays nodes out on the Keep / Stop / Start poster.
///
/// Nodes outside those three categories are returned without coordinates.
pub fn position_nodes_for_poster(nodes: &[GraphNode]) -> Result<Vec<GraphNode>> {
    PosterLayout::keep_stop_start().position(nodes)
}
