use std::path::PathBuf;

use storage::{LoadError, QuestionStore, source_for_location};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quiz-storage-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path
}

const BANK: &str = r#"[
    {
        "id": "Q1",
        "topic": "Continuous Integration",
        "question": "What is the main goal of continuous integration?",
        "options": ["Merge often and verify each change", "Deploy once a year", "Skip tests"],
        "answerIndex": 0,
        "explanation": "CI integrates small changes frequently and verifies them automatically."
    },
    {
        "id": "Q2",
        "topic": "Version Control Systems",
        "question": "Which command records staged changes in git?",
        "options": ["git push", "git commit"],
        "answerIndex": 1,
        "explanation": "git commit records a snapshot of the staged changes."
    },
    {
        "id": "Q3",
        "topic": "Continuous Integration",
        "question": "When should the CI pipeline run?",
        "options": ["On every push", "Only before releases"],
        "answerIndex": 0,
        "explanation": "Running on every push catches regressions early."
    }
]"#;

#[tokio::test]
async fn loads_bank_from_json_file() {
    let path = temp_file("bank.json", BANK);
    let source = source_for_location(path.to_str().expect("utf-8 path"));

    let store = QuestionStore::load(source.as_ref()).await.expect("load");

    assert_eq!(store.len(), 3);
    let index = store.topic_index();
    assert_eq!(
        index.topics(),
        &["Continuous Integration", "Version Control Systems"]
    );
    assert_eq!(index.count_for("Continuous Integration"), 2);
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("quiz-storage-definitely-missing.json");
    let source = source_for_location(path.to_str().expect("utf-8 path"));

    let err = QuestionStore::load(source.as_ref()).await.unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn truncated_json_is_malformed() {
    let path = temp_file("truncated.json", &BANK[..BANK.len() / 2]);
    let source = source_for_location(path.to_str().expect("utf-8 path"));

    let err = QuestionStore::load(source.as_ref()).await.unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
}

#[tokio::test]
async fn out_of_range_answer_is_rejected() {
    let bank = r#"[{"id":"Q7","topic":"T","question":"?","options":["a","b"],"answerIndex":4,"explanation":""}]"#;
    let path = temp_file("invalid.json", bank);
    let source = source_for_location(path.to_str().expect("utf-8 path"));

    let err = QuestionStore::load(source.as_ref()).await.unwrap_err();
    assert!(matches!(err, LoadError::InvalidQuestion { ref id, .. } if id == "Q7"));
}

#[tokio::test]
async fn bundled_bank_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/questions.json");
    let source = source_for_location(path.to_str().expect("utf-8 path"));

    let store = QuestionStore::load(source.as_ref()).await.unwrap();

    assert_eq!(store.len(), 25);
    let index = store.topic_index();
    assert_eq!(
        index.topics(),
        [
            "Continuous Integration",
            "Continuous Delivery",
            "Infrastructure as Code",
            "Version Control Systems",
            "DevOps Culture",
        ]
    );
    for topic in index.topics() {
        assert_eq!(index.count_for(topic), 5);
    }
}
