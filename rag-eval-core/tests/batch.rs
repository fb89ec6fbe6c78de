//! End-to-end batch evaluation tests

use std::collections::HashMap;

use rageval::{
    EvaluationManager, EvaluationRow, Language, Lexicon, ScorerKind, TextPair,
};

fn manager() -> EvaluationManager {
    EvaluationManager::with_defaults(Language::Spanish).expect("default scorers")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn identical_answer_scores_top_marks() {
    let scores = manager().score_pair("El gato come pescado", "El gato come pescado");

    assert_eq!(scores["exact_match"], 1.0);
    assert_eq!(scores["token_f1"], 1.0);
    assert!(approx(scores["rouge_l_score"], 1.0));
    assert!(approx(scores["cosine_similarity"], 1.0));
    assert!(scores["meteor_score"] > 0.99);
}

#[test]
fn empty_answer_scores_zero_everywhere() {
    let rows = vec![EvaluationRow::new("¿Qué come el gato?", "El gato come pescado")];
    let mut responses = HashMap::new();
    responses.insert("¿Qué come el gato?".to_string(), String::new());

    let scored = manager().process_batch(&rows, &responses);
    let scores = scored[0].scores.as_ref().expect("empty response is still scored");

    for (name, score) in scores {
        assert_eq!(*score, 0.0, "{} should be 0.0", name);
    }
    assert_eq!(scored[0].average_score, Some(0.0));
    assert_eq!(scored[0].actual_response.as_deref(), Some(""));
}

#[test]
fn case_and_spacing_variants_match_exactly() {
    let scores = manager().score_text_pair(&TextPair::new("Hola mundo", "hola   MUNDO"));

    assert_eq!(scores["exact_match"], 1.0);
    assert_eq!(scores["token_f1"], 1.0);
}

#[test]
fn missing_response_row_is_emitted_without_scores() {
    let rows = vec![
        EvaluationRow::new("q1", "Madrid es la capital de España").with_column("id", "1"),
        EvaluationRow::new("q2", "El agua hierve a cien grados").with_column("id", "2"),
        EvaluationRow::new("q3", "Tres").with_column("id", "3"),
    ];
    let mut responses = HashMap::new();
    responses.insert("q1".to_string(), "La capital de España es Madrid".to_string());
    responses.insert("q3".to_string(), "tres".to_string());

    let scored = manager().process_batch(&rows, &responses);

    assert_eq!(scored.len(), 3);
    let ids: Vec<&str> = scored.iter().map(|r| r.row.columns["id"].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    assert!(scored[0].is_scored());
    assert!(!scored[1].is_scored());
    assert_eq!(scored[1].average_score, None);
    assert_eq!(scored[1].score("token_f1"), None);
    assert!(scored[2].is_scored());
}

#[test]
fn average_uses_exactly_the_registered_metrics() {
    let manager = manager();
    let rows = vec![EvaluationRow::new("q", "El gato negro come pescado fresco")];
    let mut responses = HashMap::new();
    responses.insert("q".to_string(), "Un gato come pescado".to_string());

    let scored = &manager.process_batch(&rows, &responses)[0];
    let scores = scored.scores.as_ref().unwrap();

    let names: Vec<&str> = scores.keys().map(String::as_str).collect();
    assert_eq!(names, manager.score_names());

    let expected = scores.values().sum::<f64>() / scores.len() as f64;
    assert!(approx(scored.average_score.unwrap(), expected));
}

#[test]
fn optional_bleu_adds_a_column() {
    let mut kinds = ScorerKind::defaults();
    kinds.push(ScorerKind::Bleu);
    let manager = EvaluationManager::from_kinds(&kinds, Language::Spanish).unwrap();

    let scores = manager.score_pair("el gato come pescado", "el gato come pescado");
    assert_eq!(scores.len(), 6);
    assert!(approx(scores["bleu_score"], 1.0));
}

#[test]
fn lexicon_flows_into_meteor_only() {
    let lexicon = Lexicon::new(vec![vec!["coche".into(), "auto".into()]]);
    let with = EvaluationManager::from_kinds_with_lexicon(
        &ScorerKind::defaults(),
        Language::Spanish,
        Some(&lexicon),
    )
    .unwrap();
    let without = manager();

    let a = with.score_pair("un coche rojo", "un auto rojo");
    let b = without.score_pair("un coche rojo", "un auto rojo");

    assert!(a["meteor_score"] > b["meteor_score"]);
    assert_eq!(a["token_f1"], b["token_f1"]);
    assert_eq!(a["cosine_similarity"], b["cosine_similarity"]);
}

#[test]
fn manager_is_shareable_across_threads() {
    let manager = std::sync::Arc::new(manager());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            std::thread::spawn(move || manager.score_pair("Hola mundo", "hola mundo"))
        })
        .collect();

    for handle in handles {
        let scores = handle.join().unwrap();
        assert_eq!(scores["exact_match"], 1.0);
    }
}
