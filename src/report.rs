/// Report assembly and HTML rendering
///
/// Joins merged per-video records with fetched metadata, orders videos by
/// recency and renders the single static HTML page that gets published.
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::merge::{MergedVideoRecord, SectionKind};
use crate::youtube::VideoMetadata;

/// One video block in the final report
#[derive(Debug, Clone)]
pub struct VideoReportEntry {
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub record: MergedVideoRecord,
}

/// Join merged records with metadata and sort by upload recency.
///
/// Records are taken in their accumulation order (first appearance in the
/// input); a video without metadata is skipped with a warning. The sort is
/// stable, so videos sharing an upload timestamp keep input order.
pub fn assemble(
    records: Vec<(String, MergedVideoRecord)>,
    metadata: &HashMap<String, VideoMetadata>,
) -> Vec<VideoReportEntry> {
    let mut entries: Vec<VideoReportEntry> = records
        .into_iter()
        .filter_map(|(video_id, record)| match metadata.get(&video_id) {
            Some(meta) => Some(VideoReportEntry {
                video_id,
                metadata: meta.clone(),
                record,
            }),
            None => {
                warn!("No metadata for {}, skipping in report", video_id);
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| b.metadata.upload_timestamp.cmp(&a.metadata.upload_timestamp));
    entries
}

/// Renders the static HTML report
pub struct ReportRenderer {
    title: String,
}

impl ReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// Render the full report page
    pub fn render(
        &self,
        entries: &[VideoReportEntry],
        excluded: &[String],
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        html.push_str("<style>\n");
        html.push_str(
            "body { font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 1em; }\n\
             .video { border-bottom: 1px solid #ccc; margin-bottom: 2em; padding-bottom: 1em; }\n\
             .upload-date { color: #666; font-size: 0.9em; }\n\
             details { margin: 0.5em 0; }\n\
             summary { cursor: pointer; font-weight: bold; }\n\
             ul { margin: 0.5em 0; }\n\
             iframe { max-width: 100%; }\n",
        );
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        html.push_str(&format!(
            "<p class=\"generated\">Generated {}</p>\n",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        for entry in entries {
            self.render_video(&mut html, entry);
        }

        if entries.is_empty() {
            html.push_str("<p>No videos with insights in this run.</p>\n");
        }

        if !excluded.is_empty() {
            html.push_str("<section class=\"excluded\">\n<h2>Unavailable videos</h2>\n<ul>\n");
            for video_id in excluded {
                html.push_str(&format!("<li>{}</li>\n", escape_html(video_id)));
            }
            html.push_str("</ul>\n</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn render_video(&self, html: &mut String, entry: &VideoReportEntry) {
        html.push_str("<div class=\"video\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&entry.metadata.title)));
        html.push_str(&format!(
            "<p class=\"upload-date\">Uploaded {} &middot; Duration {}</p>\n",
            escape_html(&entry.metadata.upload_date_display),
            entry.metadata.duration.canonical()
        ));
        html.push_str(&format!(
            "<iframe width=\"560\" height=\"315\" src=\"https://www.youtube.com/embed/{}\" \
             frameborder=\"0\" allowfullscreen></iframe>\n",
            urlencoding::encode(&entry.video_id)
        ));

        for kind in [
            SectionKind::KeyMoments,
            SectionKind::StandoutPlayers,
            SectionKind::StrategicInsights,
        ] {
            self.render_section(html, kind, entry.record.section(kind));
        }

        html.push_str("</div>\n");
    }

    fn render_section(&self, html: &mut String, kind: SectionKind, entries: &[String]) {
        if entries.is_empty() {
            return;
        }
        html.push_str(&format!(
            "<details open>\n<summary>{} ({})</summary>\n<ul>\n",
            kind.title(),
            entries.len()
        ));
        for entry in entries {
            // Entries are pre-rendered at merge time and already escaped
            html.push_str(&format!("<li>{}</li>\n", entry));
        }
        html.push_str("</ul>\n</details>\n");
    }
}

/// Write the rendered report, creating parent directories as needed
pub async fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, html).await?;
    info!("📝 Report written to {}", path.display());
    Ok(())
}

/// Minimal HTML entity escaping for text interpolated into markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
