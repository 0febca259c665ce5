//! Similarity graphs over categorized evaluation statements.
//!
//! Statements are turned into nodes with positional ids, connected by
//! edit-distance similarity, and laid out into fixed poster regions.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod models;
pub mod parser;
pub mod report;
pub mod similarity;
