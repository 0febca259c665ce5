use serde::Serialize;

use crate::error::{GraphError, Result};
use crate::layout::PosterLayout;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

impl Category {
    const fn new(name: &'static str, emoji: &'static str, color: &'static str) -> Self {
        Self { name, emoji, color }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationConfig {
    pub kind: &'static str,
    pub title: &'static str,
    pub categories: Vec<Category>,
    pub header_color: &'static str,
    pub summary_color: &'static str,
}

impl EvaluationConfig {
    pub fn dare_share_care() -> Self {
        Self {
            kind: "dare-share-care",
            title: "Klassens værdier og fælles mål",
            categories: vec![
                Category::new("DARE", "🔥", "#f56565"),
                Category::new("SHARE", "🤝", "#48bb78"),
                Category::new("CARE", "💙", "#4299e1"),
            ],
            header_color: "#667eea",
            summary_color: "#764ba2",
        }
    }

    pub fn delphi() -> Self {
        Self {
            kind: "delphi",
            title: "Student Evaluering - Keep, Stop, Start",
            categories: vec![
                Category::new("Keep Doing", "✅", "#48bb78"),
                Category::new("Stop Doing", "🛑", "#f56565"),
                Category::new("Start Doing", "⭐", "#4299e1"),
            ],
            header_color: "#805ad5",
            summary_color: "#6b46c1",
        }
    }

    pub fn delphi_four_category() -> Self {
        Self {
            kind: "delphi-4cat",
            title: "Evaluering og forbedringspunkter",
            categories: vec![
                Category::new("Continue Doing", "✅", "#48bb78"),
                Category::new("Do More", "🔼", "#4299e1"),
                Category::new("Stop Doing", "🛑", "#f56565"),
                Category::new("Begin Doing", "⭐", "#ecc94b"),
            ],
            header_color: "#805ad5",
            summary_color: "#6b46c1",
        }
    }

    pub fn retrospective() -> Self {
        Self {
            kind: "retrospective",
            title: "Sprint Retrospective",
            categories: vec![
                Category::new("Start", "▶️", "#48bb78"),
                Category::new("Stop", "⏹️", "#f56565"),
                Category::new("Continue", "➡️", "#4299e1"),
            ],
            header_color: "#2d3748",
            summary_color: "#4a5568",
        }
    }

    /// Looks up a preset by name or alias, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "dare-share-care" | "dsc" => Ok(Self::dare_share_care()),
            "delphi" | "keep-stop-start" => Ok(Self::delphi()),
            "delphi-4" | "delphi-four" | "delphi-4cat" => Ok(Self::delphi_four_category()),
            "retrospective" | "retro" => Ok(Self::retrospective()),
            _ => Err(GraphError::UnknownEvaluationType(name.to_string())),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::dare_share_care(),
            Self::delphi(),
            Self::delphi_four_category(),
            Self::retrospective(),
        ]
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Poster layout for three-category evaluations; other sizes have none.
    ///
    /// Categories fill top left, bottom center and top right in preset order.
    pub fn poster_layout(&self) -> Option<PosterLayout> {
        match self.categories.as_slice() {
            [first, second, third] => Some(PosterLayout::three_region([
                first.name,
                second.name,
                third.name,
            ])),
            _ => None,
        }
    }
}
