/// Summary document model and loading
///
/// One JSON file per batch run and video, produced by the upstream
/// summarization toolchain. Files hold transcript excerpts plus the
/// LLM-generated summary chunks for a single video; several files may share a
/// `video_id` across batch runs and are merged downstream.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// One ingested summary file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub video_id: String,

    /// Transcript excerpts keyed by their true video timestamps
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,

    /// LLM-generated summary chunks, in chunk order
    #[serde(default)]
    pub summaries: Vec<SummaryChunk>,

    /// Transcript-fetcher layout: entries nested per chunk
    #[serde(default)]
    pub chunks: Vec<TranscriptChunk>,
}

/// A single transcript line with its true timestamp (when known)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,

    #[serde(default)]
    pub true_video_timestamp: Option<String>,
}

/// One chunk of AI-generated summary text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryChunk {
    pub summary: String,
}

/// Chunked transcript layout used by the transcript fetcher output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunk {
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
}

impl SummaryDocument {
    /// All transcript entries in document order, flattening the chunked
    /// layout behind the flat one
    pub fn transcript_entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.transcript
            .iter()
            .chain(self.chunks.iter().flat_map(|chunk| chunk.transcript.iter()))
    }

    /// True when the document carries no usable video id
    pub fn missing_video_id(&self) -> bool {
        self.video_id.trim().is_empty()
    }
}

/// Load all summary documents beneath a directory.
///
/// Files are visited in path order so repeated runs see the same document
/// sequence. A file that fails to read or parse is logged and skipped; one
/// bad file never aborts the batch.
pub async fn load_documents(dir: &Path) -> Result<Vec<SummaryDocument>> {
    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };

        match serde_json::from_str::<SummaryDocument>(&content) {
            Ok(doc) if doc.missing_video_id() => {
                warn!("Skipping {} (missing video_id)", path.display());
            }
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!("Skipping {} (parse error: {})", path.display(), e);
            }
        }
    }

    info!("📄 Loaded {} summary documents from {}", documents.len(), dir.display());
    Ok(documents)
}
