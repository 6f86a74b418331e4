//! Question bank loading

use llm_wars::questions::{Difficulty, QuestionBank};
use llm_wars::AppError;
use std::io::Write;
use tempfile::NamedTempFile;

const BANK: &str = r#"{
    "categories": {
        "reasoning": {
            "name": "Reasoning",
            "questions": [
                {"text": "If all bloops are razzies, are all razzies bloops?", "difficulty": "medium"},
                {"text": "What is 17 * 23?", "difficulty": "easy"}
            ]
        },
        "coding": {
            "name": "Coding",
            "questions": [
                {"text": "Write a lock-free stack in Rust.", "difficulty": "hard"},
                {"text": "Explain monads.", "difficulty": "legendary"}
            ]
        }
    }
}"#;

fn write_bank(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_load_valid_bank() {
    let file = write_bank(BANK);

    let bank = QuestionBank::load(file.path()).await.unwrap();

    let names: Vec<_> = bank.categories().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Reasoning", "Coding"]);

    let reasoning = &bank.categories["reasoning"];
    assert_eq!(reasoning.questions.len(), 2);
    assert_eq!(reasoning.questions[0].difficulty, Difficulty::Medium);
    assert_eq!(reasoning.questions[1].text, "What is 17 * 23?");

    let coding = &bank.categories["coding"];
    assert_eq!(coding.questions[0].difficulty, Difficulty::Hard);
    assert_eq!(coding.questions[1].difficulty, Difficulty::Unknown);
}

#[tokio::test]
async fn test_missing_file_is_empty_bank() {
    let dir = tempfile::tempdir().unwrap();

    let bank = QuestionBank::load(&dir.path().join("questions.json"))
        .await
        .unwrap();

    assert!(bank.is_empty());
}

#[tokio::test]
async fn test_malformed_file_is_config_error() {
    let file = write_bank("{ \"categories\": [ not json");

    match QuestionBank::load(file.path()).await {
        Err(AppError::ConfigError(message)) => {
            assert!(message.contains("is not a valid question bank"))
        }
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_or_empty_degrades_and_reports() {
    let file = write_bank("42");

    let (bank, error) = QuestionBank::load_or_empty(file.path()).await;

    assert!(bank.is_empty());
    assert!(matches!(error, Some(AppError::ConfigError(_))));
}

#[test]
fn test_bank_without_categories_key_is_empty() {
    let bank = QuestionBank::parse("{}").unwrap();
    assert!(bank.is_empty());
}
