use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{Categorized, Statement};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone)]
pub enum Source {
    Csv(PathBuf),
    PadletExport(PathBuf),
}

impl Source {
    pub fn load(&self) -> anyhow::Result<Categorized> {
        let categorized = match self {
            Source::Csv(path) => parse_categorized_csv(path)?,
            Source::PadletExport(path) => parse_padlet_export(path)?,
        };

        for (category, statements) in &categorized {
            info!(category = %category, count = statements.len(), "parsed statements");
        }
        Ok(categorized)
    }
}

/// Reads a `Category,Statement,Comment` CSV with a header row.
pub fn parse_categorized_csv(path: &Path) -> anyhow::Result<Categorized> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open CSV file {}", path.display()))?;
    read_categorized_csv(file)
}

pub fn read_categorized_csv<R: Read>(input: R) -> anyhow::Result<Categorized> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut categorized = Categorized::new();

    for (row_index, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("malformed CSV row {}", row_index + 2))?;
        let category = record.get(0).map(str::trim).unwrap_or_default();
        let text = record.get(1).map(str::trim).unwrap_or_default();

        if category.is_empty() || text.is_empty() {
            warn!(row = row_index + 2, "skipping CSV row without category or statement");
            continue;
        }

        let comment = record.get(2).map(str::trim).unwrap_or_default();
        categorized
            .entry(category.to_string())
            .or_default()
            .push(Statement::new(text, category).with_comment(comment));
    }

    Ok(categorized)
}

#[derive(Debug, Deserialize)]
struct PadletBoard {
    #[serde(default)]
    included: Vec<PadletRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PadletRecord {
    Section {
        id: String,
        attributes: SectionAttributes,
    },
    Post {
        attributes: PostAttributes,
        #[serde(default)]
        relationships: Option<PostRelationships>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct SectionAttributes {
    headline: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostAttributes {
    content: PostContent,
    #[serde(default)]
    score: Option<i32>,
    #[serde(default)]
    upvotes: Option<i32>,
    #[serde(default)]
    downvotes: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostContent {
    #[serde(default)]
    body_html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostRelationships {
    #[serde(default)]
    section: Option<SectionRelationship>,
}

#[derive(Debug, Deserialize)]
struct SectionRelationship {
    #[serde(default)]
    data: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    id: String,
}

/// Reads a Padlet board document saved with posts and sections included.
pub fn parse_padlet_export(path: &Path) -> anyhow::Result<Categorized> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read Padlet export {}", path.display()))?;
    read_padlet_board(&raw)
}

pub fn read_padlet_board(raw: &str) -> anyhow::Result<Categorized> {
    let board: PadletBoard =
        serde_json::from_str(raw).context("Padlet export is not a valid board document")?;
    let tags = Regex::new(r"<[^>]*>")?;

    let sections: std::collections::HashMap<&str, &str> = board
        .included
        .iter()
        .filter_map(|record| match record {
            PadletRecord::Section { id, attributes } => {
                Some((id.as_str(), attributes.headline.as_str()))
            }
            _ => None,
        })
        .collect();

    let mut categorized = Categorized::new();

    for record in &board.included {
        let PadletRecord::Post {
            attributes,
            relationships,
        } = record
        else {
            continue;
        };

        let body = attributes.content.body_html.as_deref().unwrap_or_default();
        let text = tags.replace_all(body, " ").trim().to_string();
        if text.is_empty() {
            warn!("skipping Padlet post without text");
            continue;
        }

        let category = relationships
            .as_ref()
            .and_then(|relationships| relationships.section.as_ref())
            .and_then(|section| section.data.as_ref())
            .and_then(|data| sections.get(data.id.as_str()).copied())
            .unwrap_or(UNCATEGORIZED);

        let score = attributes.score.unwrap_or(0);
        let upvotes = attributes.upvotes.unwrap_or(0);
        let downvotes = attributes.downvotes.unwrap_or(0);
        let weight = score.saturating_add(upvotes).saturating_sub(downvotes);
        let comment = format!("Weight: {weight} (Score: {score}, ↑{upvotes}, ↓{downvotes})");

        categorized
            .entry(category.to_string())
            .or_default()
            .push(
                Statement::new(text, category)
                    .with_weight(weight)
                    .with_comment(comment),
            );
    }

    Ok(categorized)
}
