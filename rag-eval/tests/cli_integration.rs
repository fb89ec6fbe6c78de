//! CLI integration tests for the rag-eval binary.
//!
//! Every command runs against a configuration file inside a temporary
//! directory so results do not depend on the working directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// =============================================================================
// Helper Functions
// =============================================================================

fn rag_eval_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rag-eval"))
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(rag_eval_bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute rag-eval binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Expected exit code 0, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Temp dir holding a default configuration file
fn workspace() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rag-eval.toml");
    std::fs::write(&config, "[evaluation]\nlanguage = \"spanish\"\n").unwrap();
    (dir, config)
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_list_scorers() {
    let (_dir, config) = workspace();
    let output = run(&config, &["list-scorers"]);
    assert_success(&output);

    let stdout = stdout_str(&output);
    for name in ["cosine_similarity", "rouge_l_score", "exact_match", "token_f1", "meteor_score", "bleu_score"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
}

#[test]
fn test_compare_identical_texts() {
    let (_dir, config) = workspace();
    let output = run(
        &config,
        &[
            "compare",
            "--reference",
            "Hola mundo",
            "--candidate",
            "hola   MUNDO",
            "--scorers",
            "exact_match,token_f1",
        ],
    );
    assert_success(&output);

    let stdout = stdout_str(&output);
    assert!(stdout.contains("exact_match"));
    assert!(stdout.contains("1.0000"));
    assert!(!stdout.contains("meteor_score"));
}

#[test]
fn test_score_recorded_responses() {
    let (dir, config) = workspace();
    let input = dir.path().join("dataset.csv");
    let responses = dir.path().join("responses.json");
    let output = dir.path().join("out").join("results.csv");

    std::fs::write(
        &input,
        "query,ground_truth\n¿Qué come el gato?,El gato come pescado\n¿Y el perro?,Carne\n",
    )
    .unwrap();
    std::fs::write(&responses, r#"{"¿Qué come el gato?": "El gato come pescado"}"#).unwrap();

    let result = run(
        &config,
        &[
            "score",
            "--input",
            input.to_str().unwrap(),
            "--responses",
            responses.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    );
    assert_success(&result);

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("meteor_score,average_score"));
    assert!(lines[2].ends_with(",,,,,,"));

    assert!(dir.path().join("out").join("results.summary.json").exists());
}

#[test]
fn test_unknown_scorer_fails_before_reading_input() {
    let (dir, config) = workspace();
    let output = run(
        &config,
        &[
            "score",
            "--input",
            dir.path().join("missing.csv").to_str().unwrap(),
            "--responses",
            dir.path().join("missing.json").to_str().unwrap(),
            "--output",
            dir.path().join("out.csv").to_str().unwrap(),
            "--scorers",
            "token_f1,bertscore",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bertscore"), "stderr: {stderr}");
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_init_config_roundtrip() {
    let (dir, config) = workspace();
    let target = dir.path().join("generated").join("rag-eval.toml");

    let output = run(&config, &["init-config", "--output", target.to_str().unwrap()]);
    assert_success(&output);

    let content = std::fs::read_to_string(&target).unwrap();
    assert!(content.contains("[target]"));
    assert!(content.contains("[evaluation]"));

    let reparsed = run(&target, &["list-scorers"]);
    assert_success(&reparsed);
}

#[test]
fn test_broken_default_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("config").join("rag-eval.toml"),
        "[evaluation]\nscorers = [\"token_f1\", \"bertscore\"]\n",
    )
    .unwrap();

    let output = Command::new(rag_eval_bin())
        .current_dir(dir.path())
        .args(["compare", "--reference", "Hola", "--candidate", "Hola"])
        .output()
        .expect("Failed to execute rag-eval binary");

    assert!(!output.status.success());
    assert!(!stdout_str(&output).contains("exact_match"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bertscore"), "stderr: {stderr}");
}

#[test]
fn test_default_config_location_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("config")).unwrap();
    std::fs::write(
        dir.path().join("config").join("rag-eval.toml"),
        "[evaluation]\nlanguage = \"es\"\nscorers = [\"f1\"]\n",
    )
    .unwrap();

    let output = Command::new(rag_eval_bin())
        .current_dir(dir.path())
        .args(["compare", "--reference", "Hola mundo", "--candidate", "hola mundo"])
        .output()
        .expect("Failed to execute rag-eval binary");

    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("token_f1"));
    assert!(!stdout.contains("exact_match"));
}

#[test]
fn test_score_with_limit() {
    let (dir, config) = workspace();
    let input = dir.path().join("dataset.csv");
    let responses = dir.path().join("responses.json");
    let output = dir.path().join("limited.csv");

    std::fs::write(&input, "query,ground_truth\na,uno\nb,dos\nc,tres\n").unwrap();
    std::fs::write(&responses, r#"{"a": "uno", "b": "dos", "c": "tres"}"#).unwrap();

    let result = run(
        &config,
        &[
            "score",
            "--input",
            input.to_str().unwrap(),
            "--responses",
            responses.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--limit",
            "2",
        ],
    );
    assert_success(&result);

    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("tres"));
}
