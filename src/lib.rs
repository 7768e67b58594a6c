//! prompt-forge: deterministic prompt scoring and optimization.
//!
//! Two pure entry points over an immutable [`KnowledgeBase`]:
//! [`analyze`] for live ten-metric scoring and [`optimize`] for the
//! seven-stage rewrite pipeline with validation.

pub mod adapters;
pub mod config;
pub mod error;
pub mod frameworks;
pub mod knowledge;
pub mod library;
pub mod pipeline;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod utils;

pub use error::{PromptForgeError, Result};
pub use knowledge::{FrameworkDef, KnowledgeBase, TechniqueDef, ToolDef};
pub use library::{LibraryEntry, LibraryLog, LibraryStats};
pub use pipeline::validate::ValidationCheck;
pub use pipeline::{OptimizationResult, StageRecord, optimize};
pub use scoring::{AnalysisResult, ScoreSet, analyze};
pub use session::OptimizerSession;
