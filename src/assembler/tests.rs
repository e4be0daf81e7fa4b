use super::*;
use crate::evaluation::HostedModelSettings;
use crate::oracle::{MockOracle, OracleError, ScoringPurpose};
use crate::registry::MockModelHub;
use serde_json::json;

fn page(url: &str, relevance_score: f64) -> CandidatePage {
    CandidatePage {
        url: url.to_string(),
        title: format!("Title of {url}"),
        text: format!("Body text of {url}"),
        relevance_score,
    }
}

fn pages(n: usize) -> Vec<CandidatePage> {
    (0..n).map(|i| page(&format!("https://site/{i}"), 0.85)).collect()
}

fn input<'a>(pages: &'a [CandidatePage], summaries: &[&str]) -> AttributeInput<'a> {
    AttributeInput {
        query: "Should LLMs be open sourced",
        attribute: "Benefits",
        pages,
        summaries: summaries.iter().map(|s| s.to_string()).collect(),
        relevance_cutoff: 0.6,
    }
}

fn assembler(oracle: MockOracle) -> ResultAssembler {
    ResultAssembler::new(
        Arc::new(oracle),
        Arc::new(MockModelHub::new()),
        Arc::new(ModelRegistry::new()),
    )
}

fn enabled(backend: EvaluationBackend) -> EvaluationSettings {
    EvaluationSettings {
        enabled: true,
        prompt: String::new(),
        backend,
    }
}

fn hosted(value: serde_json::Value) -> EvaluationBackend {
    EvaluationBackend::HostedModel(HostedModelSettings::from_value(&value))
}

mod articles {
    use super::*;

    #[test]
    fn test_ids_keep_page_position_after_cutoff() {
        let pages = vec![
            page("https://a", 0.85),
            page("https://b", 0.6),
            page("https://c", 0.9),
        ];

        let articles = build_articles(&pages, 0.6);

        let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["article_0", "article_2"]);
        assert_eq!(articles[1].url, "https://c");
        assert_eq!(articles[1].title, "Title of https://c");
    }

    #[test]
    fn test_snippet_is_char_based() {
        let long = "é".repeat(250);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }
}

mod defaults {
    use super::*;

    #[test]
    fn test_descending_defaults_uncapped() {
        let articles = build_articles(&pages(5), 0.6);
        let scores = default_article_scores(&articles, false);

        let values: Vec<f64> = scores.values().copied().collect();
        assert_eq!(values, vec![5.5, 5.0, 4.5, 4.0, 3.5]);
        let keys: Vec<&str> = scores.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["article_0", "article_1", "article_2", "article_3", "article_4"]);
    }

    #[test]
    fn test_descending_defaults_capped() {
        let articles = build_articles(&pages(5), 0.6);
        let scores = default_article_scores(&articles, true);

        let values: Vec<f64> = scores.values().copied().collect();
        assert_eq!(values, vec![5.0, 5.0, 4.5, 4.0, 3.5]);
    }

    #[tokio::test]
    async fn test_disabled_evaluation_makes_no_oracle_calls() {
        let oracle = MockOracle::with_text("{}");
        let pages = pages(2);

        let results = assembler(oracle.clone())
            .assemble_attribute(input(&pages, &["s0", "s1"]), &EvaluationSettings::default())
            .await;

        assert_eq!(oracle.call_count(), 0);
        assert_eq!(results.summary.len(), 2);
        for point in &results.summary {
            assert_eq!(point.article_scores.get("article_0"), Some(&4.0));
            assert_eq!(point.article_scores.get("article_1"), Some(&3.5));
        }
    }
}

mod assembly {
    use super::*;

    #[tokio::test]
    async fn test_summary_points_shape() {
        let pages = pages(3);
        let results = assembler(MockOracle::with_text("{}"))
            .assemble_attribute(input(&pages, &["first", "second"]), &EvaluationSettings::default())
            .await;

        assert_eq!(results.articles.len(), 3);
        let point = &results.summary[1];
        assert_eq!(point.id, "summary_1");
        assert_eq!(point.text, "second");
        assert_eq!(point.confidence, 0.9);
        assert_eq!(point.source_count, 3);
        assert!(point.cross_attribute_scores.is_empty());
        assert_eq!(point.groundedness, None);
    }

    #[tokio::test]
    async fn test_groundedness_maps_urls_to_article_ids() {
        let oracle = MockOracle::with_text(r#"{"https://site/0": 4.5, "https://site/1": 9}"#);
        let pages = pages(3);

        let results = assembler(oracle.clone())
            .assemble_attribute(
                input(&pages, &["claim"]),
                &enabled(EvaluationBackend::Default),
            )
            .await;

        let scores = &results.summary[0].article_scores;
        assert_eq!(scores.get("article_0"), Some(&4.5));
        // Out of range from the evaluator.
        assert_eq!(scores.get("article_1"), Some(&0.0));
        // Not mentioned: the scorer fills 0 for every input URL.
        assert_eq!(scores.get("article_2"), Some(&0.0));

        let requests = oracle.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].purpose, ScoringPurpose::Groundedness);
        assert!(requests[0].user.contains("https://site/2"));
    }

    #[tokio::test]
    async fn test_one_evaluator_call_per_summary_point() {
        let oracle = MockOracle::with_text("{}");
        let pages = pages(2);

        assembler(oracle.clone())
            .assemble_attribute(
                input(&pages, &["a", "b", "c"]),
                &enabled(EvaluationBackend::Default),
            )
            .await;

        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn test_evaluator_failure_scores_zero() {
        let pages = pages(2);
        let results = assembler(MockOracle::failing(OracleError::unavailable("down")))
            .assemble_attribute(input(&pages, &["a"]), &enabled(EvaluationBackend::Default))
            .await;

        let scores = &results.summary[0].article_scores;
        assert_eq!(scores.len(), 2);
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[tokio::test]
    async fn test_no_summaries_still_returns_articles() {
        let pages = pages(2);
        let results = assembler(MockOracle::with_text("{}"))
            .assemble_attribute(input(&pages, &[]), &enabled(EvaluationBackend::Default))
            .await;

        assert!(results.summary.is_empty());
        assert_eq!(results.articles.len(), 2);
    }
}

mod evaluator_resolution {
    use super::*;

    #[test]
    fn test_default_backend_is_strict() {
        let evaluator = assembler(MockOracle::with_text("{}"))
            .resolve_evaluator(&EvaluationBackend::Default)
            .unwrap();
        assert_eq!(evaluator.format(), ScoreMapFormat::Strict);
    }

    #[test]
    fn test_hosted_backend_requires_model() {
        let err = assembler(MockOracle::with_text("{}"))
            .resolve_evaluator(&hosted(json!({"deployment": "api", "apiKey": "k"})))
            .unwrap_err();
        assert_eq!(err, EvaluatorError::MissingModel);
    }

    #[test]
    fn test_api_deployment_requires_key() {
        let err = assembler(MockOracle::with_text("{}"))
            .resolve_evaluator(&hosted(json!({"deployment": "api", "selectedModel": "org/j"})))
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::MissingApiKey { .. }));
    }

    #[test]
    fn test_registry_deployment_requires_loaded_model() {
        let err = assembler(MockOracle::with_text("{}"))
            .resolve_evaluator(&hosted(json!({"selectedModel": "org/j"})))
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::NotLoaded { .. }));
    }

    #[tokio::test]
    async fn test_unresolvable_evaluator_scores_zero_without_calls() {
        let oracle = MockOracle::with_text(r#"{"https://site/0": 5}"#);
        let pages = pages(2);

        let results = assembler(oracle.clone())
            .assemble_attribute(
                input(&pages, &["a"]),
                &enabled(hosted(json!({"evaluatorEnabled": true}))),
            )
            .await;

        assert_eq!(oracle.call_count(), 0);
        assert!(results.summary[0].article_scores.values().all(|s| *s == 0.0));
    }

    #[tokio::test]
    async fn test_registered_hosted_evaluator_reads_embedded_json() {
        let hub = Arc::new(
            MockModelHub::new()
                .with_model("org/judge")
                .with_fallback("Scores follow: {\"https://site/0\": 2, \"https://site/1\": 3}"),
        );
        let registry = Arc::new(ModelRegistry::new());
        registry
            .load(hub.as_ref(), "org/judge", ModelKind::Evaluator)
            .await
            .unwrap();
        let default_oracle = MockOracle::with_text("{}");
        let assembler = ResultAssembler::new(Arc::new(default_oracle.clone()), hub.clone(), registry);
        let pages = pages(2);

        let results = assembler
            .assemble_attribute(
                input(&pages, &["a"]),
                &enabled(hosted(json!({"selectedModel": "org/judge", "evaluatorEnabled": true}))),
            )
            .await;

        assert_eq!(default_oracle.call_count(), 0);
        assert_eq!(hub.calls().len(), 1);
        assert_eq!(hub.calls()[0].token, None);
        let scores = &results.summary[0].article_scores;
        assert_eq!(scores.get("article_0"), Some(&2.0));
        assert_eq!(scores.get("article_1"), Some(&3.0));
    }
}

mod finalize {
    use super::*;

    #[tokio::test]
    async fn test_single_attribute_skips_cross_scoring() {
        let oracle = MockOracle::with_text("3");
        let assembler = assembler(oracle.clone());
        let pages = pages(1);
        let mut results = ResultSet::new();
        results.insert(
            "Benefits".into(),
            assembler
                .assemble_attribute(input(&pages, &["a"]), &EvaluationSettings::default())
                .await,
        );

        assembler.finalize(&mut results).await;

        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_two_attributes_get_cross_scores() {
        let oracle = MockOracle::with_text("3.7");
        let assembler = assembler(oracle.clone());
        let pages = pages(1);
        let mut results = ResultSet::new();
        for attribute in ["Benefits", "Drawbacks"] {
            let mut attr_input = input(&pages, &["a"]);
            attr_input.attribute = attribute;
            results.insert(
                attribute.into(),
                assembler
                    .assemble_attribute(attr_input, &EvaluationSettings::default())
                    .await,
            );
        }

        assembler.finalize(&mut results).await;

        assert_eq!(oracle.call_count(), 2);
        let drawbacks = results.get("Drawbacks").unwrap();
        assert_eq!(
            drawbacks.summary[0]
                .cross_attribute_scores
                .get("Benefits")
                .and_then(|m| m.get("summary_0")),
            Some(&3.7)
        );
    }
}
