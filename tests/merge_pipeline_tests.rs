/// End-to-end tests over the load -> index -> merge -> assemble -> render
/// flow, with metadata supplied directly instead of fetched.
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

use poker_recap_rust::{
    report::{self, ReportRenderer},
    summary, timestamp,
    transcript::TranscriptIndex,
    MergedVideoRecord, SectionMerger, VideoMetadata,
};

fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn metadata(title: &str, duration: &str, upload_timestamp: i64) -> VideoMetadata {
    VideoMetadata {
        title: title.to_string(),
        duration: timestamp::normalize(duration).unwrap(),
        upload_timestamp,
        upload_date_display: "March 1, 2025".to_string(),
    }
}

#[tokio::test]
async fn two_documents_merge_into_one_record() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "batch1_abc.json",
        r#"{
            "video_id": "abc",
            "transcript": [{"text": "big bluff", "true_video_timestamp": "95"}],
            "summaries": [{"summary": "[00:02:00] hero takes down a monster pot"}]
        }"#,
    );
    write_file(
        dir.path(),
        "batch2_abc.json",
        r#"{
            "video_id": "abc",
            "summaries": [{"summary": "Standout Players:\nJohn Doe owns the table"}]
        }"#,
    );

    let documents = summary::load_documents(dir.path()).await.unwrap();
    assert_eq!(documents.len(), 2);

    let duration = timestamp::normalize("01:00:00").unwrap();
    let index = TranscriptIndex::build(
        documents.iter().flat_map(|doc| doc.transcript_entries()),
    );

    let merger = SectionMerger::new();
    let mut record = MergedVideoRecord::default();
    for doc in &documents {
        merger.merge_document(doc, &duration, &index, &mut record);
    }

    assert_eq!(record.key_moments.len(), 1);
    assert_eq!(record.standout_players.len(), 1);
    assert!(record.strategic_insights.is_empty());
    assert!(record.key_moments[0].contains("t=120s"));
}

#[tokio::test]
async fn transcript_fallback_resolves_missing_timestamps() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "abc.json",
        r#"{
            "video_id": "abc",
            "transcript": [{"text": "big bluff", "true_video_timestamp": "95"}],
            "summaries": [{"summary": "big bluff"}]
        }"#,
    );

    let documents = summary::load_documents(dir.path()).await.unwrap();
    let duration = timestamp::normalize("01:00:00").unwrap();
    let index = TranscriptIndex::build(
        documents.iter().flat_map(|doc| doc.transcript_entries()),
    );

    let merger = SectionMerger::new();
    let mut record = MergedVideoRecord::default();
    merger.merge_document(&documents[0], &duration, &index, &mut record);

    assert_eq!(record.key_moments.len(), 1);
    assert!(record.key_moments[0].contains("[00:01:35]"));
    assert!(record.key_moments[0].contains("t=95s"));
}

#[test]
fn report_orders_videos_by_recency_and_lists_exclusions() {
    let mut meta = HashMap::new();
    meta.insert("old".to_string(), metadata("Oldest", "00:30:00", 100));
    meta.insert("new".to_string(), metadata("Newest", "00:30:00", 300));
    meta.insert("mid".to_string(), metadata("Middle", "00:30:00", 200));

    let record = |text: &str| MergedVideoRecord {
        key_moments: vec![text.to_string()],
        standout_players: Vec::new(),
        strategic_insights: Vec::new(),
    };
    let records = vec![
        ("old".to_string(), record("a")),
        ("new".to_string(), record("b")),
        ("mid".to_string(), record("c")),
    ];

    let entries = report::assemble(records, &meta);
    let titles: Vec<_> = entries.iter().map(|e| e.metadata.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);

    let renderer = ReportRenderer::new("Poker Recap");
    let html = renderer.render(&entries, &["broken".to_string()], chrono::Utc::now());

    let newest = html.find("Newest").unwrap();
    let middle = html.find("Middle").unwrap();
    let oldest = html.find("Oldest").unwrap();
    assert!(newest < middle && middle < oldest);
    assert!(html.contains("<li>broken</li>"));
}
