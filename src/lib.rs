/// Poker Recap Report Generator - Rust Implementation
///
/// Ingests per-video JSON summaries produced by the transcript/LLM toolchain,
/// enriches them with YouTube metadata, normalizes timestamps into clickable
/// links, merges sections across batch runs and publishes a static HTML
/// report. Designed to replace the Python report scripts.

pub mod cleaner;
pub mod config;
pub mod merge;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod summary;
pub mod timestamp;
pub mod transcript;
pub mod youtube;

// Re-export main types for easy access
pub use crate::cleaner::TextCleaner;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::merge::{MergedVideoRecord, SectionKind, SectionMerger};
pub use crate::pipeline::{PipelineResult, RecapPipeline};
pub use crate::publish::{GitPublisher, PublishError};
pub use crate::report::{ReportRenderer, VideoReportEntry};
pub use crate::summary::{SummaryChunk, SummaryDocument, TranscriptEntry};
pub use crate::timestamp::{NormalizeError, TimestampToken};
pub use crate::transcript::TranscriptIndex;
pub use crate::youtube::{MetadataError, VideoMetadata, YouTubeClient};
