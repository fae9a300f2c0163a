//! Domain logic for the bioinformatics knowledge base.
//!
//! This crate has no database or HTTP dependencies so the repository layer,
//! the API server, and any future tooling share one set of rules.

pub mod comment;
pub mod error;
pub mod forms;
pub mod posts;
pub mod revision;
pub mod search;
pub mod tag_tree;
pub mod types;
pub mod validation;
pub mod views;
pub mod votes;
