/// Batch pipeline orchestration
///
/// Single-pass, sequential flow: load summary documents, fetch metadata per
/// unique video, build transcript indexes, merge sections, assemble and
/// render the report, then publish. No error in one video's processing
/// aborts the others; only a publish failure is fatal to the run.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::Config;
use crate::merge::{MergedVideoRecord, SectionMerger};
use crate::publish::GitPublisher;
use crate::report::{self, ReportRenderer};
use crate::summary::{self, SummaryDocument};
use crate::transcript::TranscriptIndex;
use crate::youtube::{VideoMetadata, YouTubeClient};

/// Outcome of one pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub total_documents: usize,
    pub merged_videos: usize,
    pub excluded: Vec<String>,
    pub report_path: PathBuf,
    pub total_time: Duration,
}

/// Processed-state sidecar written after each run
#[derive(Debug, Serialize, Deserialize)]
struct RunState {
    generated_at: String,
    published_videos: Vec<String>,
    excluded_videos: Vec<String>,
}

/// The recap report pipeline
pub struct RecapPipeline {
    config: Config,
    youtube: YouTubeClient,
    merger: SectionMerger,
}

impl RecapPipeline {
    pub fn new(config: Config) -> Self {
        let youtube = YouTubeClient::new(&config.youtube);
        Self {
            config,
            youtube,
            merger: SectionMerger::new(),
        }
    }

    /// Run the full pipeline once
    pub async fn run(&self) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let generated_at = Utc::now();

        let documents = summary::load_documents(&self.config.input.summaries_dir).await?;
        let total_documents = documents.len();

        let (video_order, by_video) = group_by_video(&documents);
        info!(
            "🎬 {} documents covering {} unique videos",
            total_documents,
            video_order.len()
        );

        // Metadata is fetched once per unique video id, sequentially; a video
        // whose fetch fails after retries is excluded from the report
        let mut metadata: HashMap<String, VideoMetadata> = HashMap::new();
        let mut excluded: Vec<String> = Vec::new();
        for video_id in &video_order {
            match self.youtube.fetch_with_retry(video_id).await {
                Ok(meta) => {
                    metadata.insert(video_id.clone(), meta);
                }
                Err(e) => {
                    warn!("Excluding {} from report: {}", video_id, e);
                    excluded.push(video_id.clone());
                }
            }
        }

        let records = self.merge_all(&video_order, &by_video, &metadata);
        let merged_videos = records.len();

        let entries = report::assemble(records, &metadata);
        let renderer = ReportRenderer::new(self.config.report.title.as_str());
        let html = renderer.render(&entries, &excluded, generated_at);
        report::write_report(&self.config.report.output_path, &html).await?;

        let published_videos: Vec<String> =
            entries.iter().map(|entry| entry.video_id.clone()).collect();
        if let Err(e) = write_run_state(
            &self.config.input.state_path,
            &published_videos,
            &excluded,
            generated_at,
        ) {
            warn!("Failed to write run state: {}", e);
        }

        if self.config.publish.enabled {
            let publisher = GitPublisher::new(&self.config.publish);
            publisher
                .publish(&self.config.report.output_path, generated_at)
                .await
                .context("Publishing the report failed")?;
        } else {
            info!("Publishing disabled, report kept local");
        }

        Ok(PipelineResult {
            total_documents,
            merged_videos,
            excluded,
            report_path: self.config.report.output_path.clone(),
            total_time: start_time.elapsed(),
        })
    }

    /// Merge every document of every video with available metadata
    fn merge_all(
        &self,
        video_order: &[String],
        by_video: &HashMap<String, Vec<&SummaryDocument>>,
        metadata: &HashMap<String, VideoMetadata>,
    ) -> Vec<(String, MergedVideoRecord)> {
        let mut records = Vec::new();

        for video_id in video_order {
            let Some(meta) = metadata.get(video_id) else {
                // Already excluded; its documents are dropped with it
                continue;
            };
            let docs = &by_video[video_id];

            // One index per video, fed by every document's transcript so a
            // later batch can fill gaps left by an earlier one
            let index =
                TranscriptIndex::build(docs.iter().flat_map(|doc| doc.transcript_entries()));

            let mut record = MergedVideoRecord::default();
            for doc in docs {
                self.merger
                    .merge_document(doc, &meta.duration, &index, &mut record);
            }

            if record.is_empty() {
                warn!("No entries merged for {}, leaving it out of the report", video_id);
                continue;
            }

            info!("🃏 Merged {} entries for {}", record.entry_count(), video_id);
            records.push((video_id.clone(), record));
        }

        records
    }
}

/// Group documents by video id, preserving first-appearance order
fn group_by_video(
    documents: &[SummaryDocument],
) -> (Vec<String>, HashMap<String, Vec<&SummaryDocument>>) {
    let mut order = Vec::new();
    let mut by_video: HashMap<String, Vec<&SummaryDocument>> = HashMap::new();

    for doc in documents {
        let entry = by_video.entry(doc.video_id.clone()).or_default();
        if entry.is_empty() {
            order.push(doc.video_id.clone());
        }
        entry.push(doc);
    }

    (order, by_video)
}

/// Atomically write the processed-state sidecar (temp file + rename)
fn write_run_state(
    path: &Path,
    published: &[String],
    excluded: &[String],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    let state = RunState {
        generated_at: generated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        published_videos: published.to_vec(),
        excluded_videos: excluded.to_vec(),
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp, &state)?;
    temp.flush()?;
    temp.persist(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryChunk;

    fn doc(video_id: &str) -> SummaryDocument {
        SummaryDocument {
            video_id: video_id.to_string(),
            transcript: Vec::new(),
            summaries: vec![SummaryChunk {
                summary: "line".to_string(),
            }],
            chunks: Vec::new(),
        }
    }

    #[test]
    fn test_group_by_video_preserves_first_appearance_order() {
        let documents = vec![doc("b"), doc("a"), doc("b"), doc("c")];
        let (order, by_video) = group_by_video(&documents);

        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(by_video["b"].len(), 2);
        assert_eq!(by_video["a"].len(), 1);
    }

    #[test]
    fn test_write_run_state_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        write_run_state(
            &path,
            &["a".to_string()],
            &["b".to_string()],
            Utc::now(),
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let state: RunState = serde_json::from_str(&content).unwrap();
        assert_eq!(state.published_videos, vec!["a"]);
        assert_eq!(state.excluded_videos, vec!["b"]);
    }
}
