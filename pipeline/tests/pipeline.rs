use async_trait::async_trait;
use consensus::{ConsensusPolicy, Vote, VoteCaster};
use pipeline::{NoProgress, RunConfig, SearchApi, SubredditFinder};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use subscout_core::{CoreError, LlmError};

struct FakeSearch {
    subreddits: HashMap<String, Vec<Value>>,
    posts: HashMap<String, Vec<Value>>,
}

impl FakeSearch {
    fn seeded() -> Self {
        let mut subreddits = HashMap::new();
        subreddits.insert(
            "testing".to_string(),
            vec![
                json!({
                    "display_name": "softwaretesting",
                    "title": "Software Testing",
                    "public_description": "All about testing software",
                    "subscribers": 12_000,
                }),
                json!({
                    "display_name": "QualityAssurance",
                    "title": "QA",
                    "description": "Quality assurance talk",
                    "subscribers": 4_000,
                }),
            ],
        );

        let mut posts = HashMap::new();
        posts.insert(
            "softwaretesting".to_string(),
            vec![
                json!({ "id": "a1", "title": "Property testing", "selftext": "quickcheck", "score": 40 }),
                json!({ "id": "a2", "title": "Second post", "selftext": "", "score": 10 }),
            ],
        );
        posts.insert(
            "QualityAssurance".to_string(),
            vec![json!({ "id": "b1", "title": "Release gates", "selftext": "checklists", "score": 7 })],
        );

        Self { subreddits, posts }
    }
}

#[async_trait]
impl SearchApi for FakeSearch {
    async fn search_subreddits(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        let mut items = self.subreddits.get(prefix).cloned().unwrap_or_default();
        items.truncate(limit);
        Ok(items)
    }

    async fn search_top_posts(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        let mut items = self.posts.get(subreddit).cloned().unwrap_or_default();
        items.truncate(limit);
        Ok(items)
    }
}

/// Replays a fixed verdict sequence, cycling when exhausted.
struct ScriptedCaster {
    verdicts: Vec<bool>,
    calls: AtomicUsize,
}

impl ScriptedCaster {
    fn new(verdicts: &[bool]) -> Self {
        Self {
            verdicts: verdicts.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VoteCaster for ScriptedCaster {
    async fn cast_vote(&self, _question: &str, _text: &str) -> Result<Vote, CoreError> {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vote::new(self.verdicts[i % self.verdicts.len()]))
    }
}

struct BrokenCaster;

#[async_trait]
impl VoteCaster for BrokenCaster {
    async fn cast_vote(&self, _question: &str, _text: &str) -> Result<Vote, CoreError> {
        Err(CoreError::Llm(LlmError::ServiceUnavailable {
            status_code: 503,
        }))
    }
}

fn test_config(output_path: PathBuf) -> RunConfig {
    RunConfig {
        keywords: vec!["testing".to_string()],
        question: "Is this subreddit about software testing?".to_string(),
        top_n: 2,
        top_k: 1,
        model: "test-model".to_string(),
        output_path,
        consensus: ConsensusPolicy::fixed(3),
    }
}

async fn run_pipeline(output_path: &Path, caster: &dyn VoteCaster) -> Result<(), CoreError> {
    let finder = SubredditFinder::new(test_config(output_path.to_path_buf()))?;
    finder.run(&FakeSearch::seeded(), caster, &NoProgress).await
}

#[tokio::test]
async fn test_end_to_end_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    // Each record gets three votes: yes, yes, no.
    let caster = ScriptedCaster::new(&[true, true, false]);
    run_pipeline(&path, &caster).await.unwrap();

    let report: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let records = report.as_array().unwrap();
    assert_eq!(records.len(), 2);

    for record in records {
        assert_eq!(record["relevant"], json!(true));
        assert!(record["top_posts"].as_array().unwrap().len() <= 1);
    }

    // Raw passthrough fields survive flattening.
    assert_eq!(records[0]["display_name"], json!("softwaretesting"));
    assert_eq!(records[0]["subscribers"], json!(12_000));
    assert_eq!(records[0]["top_posts"][0]["id"], json!("a1"));
}

#[tokio::test]
async fn test_unanimous_no_labels_not_relevant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let caster = ScriptedCaster::new(&[false]);
    run_pipeline(&path, &caster).await.unwrap();

    let report: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    for record in report.as_array().unwrap() {
        assert_eq!(record["relevant"], json!(false));
    }
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    run_pipeline(&first, &ScriptedCaster::new(&[true, true, false]))
        .await
        .unwrap();
    run_pipeline(&second, &ScriptedCaster::new(&[true, true, false]))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_caster_failure_aborts_without_partial_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let result = run_pipeline(&path, &BrokenCaster).await;
    assert!(result.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_invalid_policy_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path().join("report.json"));
    config.consensus = ConsensusPolicy::confidence(0.8, 9, 3);

    assert!(matches!(
        SubredditFinder::new(config),
        Err(CoreError::Config(_))
    ));
}
