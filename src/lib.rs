// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod persistence;
pub mod report;

pub use crate::core::engine::CorpusEngine;
pub use crate::error::{CorpusError, Result};
