use std::sync::Arc;

use super::types::{clamp_and_round, zero_out_of_range};
use super::*;
use crate::model::{AttributeResults, ResultSet, SummaryPoint};
use crate::oracle::{MockOracle, OracleError, ScoringPurpose};

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

fn input<'a>(article_urls: &'a [String]) -> GroundednessInput<'a> {
    GroundednessInput {
        summary: "Open models reduce vendor lock-in.",
        article_urls,
        attribute: "Benefits",
        query: "Should LLMs be open sourced",
        guidance: None,
    }
}

fn strict(oracle: MockOracle) -> Evaluator {
    Evaluator::new(Arc::new(oracle), ScoreMapFormat::Strict)
}

fn attribute(texts: &[&str]) -> AttributeResults {
    AttributeResults {
        summary: texts
            .iter()
            .enumerate()
            .map(|(i, text)| SummaryPoint::new(format!("summary_{i}"), text.to_string(), 0.9, 0))
            .collect(),
        articles: vec![],
    }
}

mod policies {
    use super::*;

    #[test]
    fn test_zero_out_of_range() {
        assert_eq!(zero_out_of_range(Some(0.0)), 0.0);
        assert_eq!(zero_out_of_range(Some(5.0)), 5.0);
        assert_eq!(zero_out_of_range(Some(3.3)), 3.3);
        assert_eq!(zero_out_of_range(Some(7.0)), 0.0);
        assert_eq!(zero_out_of_range(Some(-0.1)), 0.0);
        assert_eq!(zero_out_of_range(None), 0.0);
    }

    #[test]
    fn test_clamp_and_round() {
        assert_eq!(clamp_and_round(7.0), 5.0);
        assert_eq!(clamp_and_round(-2.0), 0.0);
        assert_eq!(clamp_and_round(3.14), 3.1);
        assert_eq!(clamp_and_round(3.76), 3.8);
    }

    #[test]
    fn test_one_decimal_ties_round_to_even() {
        assert_eq!(clamp_and_round(2.25), 2.2);
        assert_eq!(clamp_and_round(0.25), 0.2);
        assert_eq!(clamp_and_round(2.75), 2.8);
        // Not exact in binary: 1.15 sits just below the tie, 4.45 just above.
        assert_eq!(clamp_and_round(1.15), 1.1);
        assert_eq!(clamp_and_round(4.45), 4.5);
        assert_eq!(clamp_and_round(3.666), 3.7);
    }
}

mod groundedness {
    use super::*;

    #[tokio::test]
    async fn test_valid_scores_pass_through() {
        let articles = urls(&["https://a", "https://b"]);
        let evaluator = strict(MockOracle::with_text(r#"{"https://a": 4, "https://b": 2.5}"#));

        let scores = compute_groundedness(&evaluator, &input(&articles)).await;

        assert_eq!(scores.len(), 2);
        assert_eq!(scores["https://a"], 4.0);
        assert_eq!(scores["https://b"], 2.5);
    }

    #[tokio::test]
    async fn test_out_of_range_and_non_numeric_are_zeroed() {
        let articles = urls(&["https://a", "https://b", "https://c"]);
        let evaluator = strict(MockOracle::with_text(
            r#"{"https://a": 7, "https://b": "high", "https://c": "3"}"#,
        ));

        let scores = compute_groundedness(&evaluator, &input(&articles)).await;

        assert_eq!(scores["https://a"], 0.0);
        assert_eq!(scores["https://b"], 0.0);
        assert_eq!(scores["https://c"], 3.0);
    }

    #[tokio::test]
    async fn test_missing_urls_default_to_zero_and_extra_keys_kept() {
        let articles = urls(&["https://a", "https://b"]);
        let evaluator = strict(MockOracle::with_text(
            r#"{"https://a": 5, "https://invented": 2}"#,
        ));

        let scores = compute_groundedness(&evaluator, &input(&articles)).await;

        assert_eq!(scores.len(), 3);
        assert_eq!(scores["https://a"], 5.0);
        assert_eq!(scores["https://b"], 0.0);
        assert_eq!(scores["https://invented"], 2.0);
    }

    #[tokio::test]
    async fn test_unparseable_output_zeroes_every_url() {
        let articles = urls(&["https://a", "https://b"]);

        for text in ["Sure! a=4", "[4, 2]", r#"Scores: {"https://a": 4}"#] {
            let evaluator = strict(MockOracle::with_text(text));
            let scores = compute_groundedness(&evaluator, &input(&articles)).await;
            assert_eq!(scores.len(), 2, "output: {text}");
            assert!(scores.values().all(|s| *s == 0.0), "output: {text}");
        }
    }

    #[tokio::test]
    async fn test_embedded_format_reads_json_inside_prose() {
        let articles = urls(&["https://a"]);
        let evaluator = Evaluator::new(
            Arc::new(MockOracle::with_text(
                "Here is my evaluation:\n{\"https://a\": 4}\nThanks.",
            )),
            ScoreMapFormat::Embedded,
        );

        let scores = compute_groundedness(&evaluator, &input(&articles)).await;
        assert_eq!(scores["https://a"], 4.0);
    }

    #[tokio::test]
    async fn test_oracle_failure_zeroes_every_url() {
        let articles = urls(&["https://a", "https://b"]);
        let evaluator = strict(MockOracle::failing(OracleError::unavailable("HTTP 503")));

        let scores = compute_groundedness(&evaluator, &input(&articles)).await;

        assert_eq!(scores.len(), 2);
        assert!(scores.values().all(|s| *s == 0.0));
    }

    #[tokio::test]
    async fn test_request_embeds_context_and_guidance() {
        let articles = urls(&["https://a", "https://b"]);
        let oracle = MockOracle::with_text("{}");
        let evaluator = Evaluator::new(Arc::new(oracle.clone()), ScoreMapFormat::Strict);
        let mut with_guidance = input(&articles);
        with_guidance.guidance = Some("Be strict about numbers.");

        compute_groundedness(&evaluator, &with_guidance).await;

        let requests = oracle.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.purpose, ScoringPurpose::Groundedness);
        assert_eq!(request.max_tokens, 800);
        assert!(request.user.contains("Should LLMs be open sourced"));
        assert!(request.user.contains("Benefits"));
        assert!(request.user.contains(r#"["https://a","https://b"]"#));
        assert!(request.system.contains("Be strict about numbers."));
    }

    #[tokio::test]
    async fn test_blank_guidance_is_ignored() {
        let articles = urls(&["https://a"]);
        let oracle = MockOracle::with_text("{}");
        let evaluator = Evaluator::new(Arc::new(oracle.clone()), ScoreMapFormat::Strict);
        let mut blank = input(&articles);
        blank.guidance = Some("   ");

        compute_groundedness(&evaluator, &blank).await;

        assert!(!oracle.requests()[0].system.contains("guidance"));
    }
}

mod relevance {
    use super::*;

    #[tokio::test]
    async fn test_pair_score_clamped_and_rounded() {
        assert_eq!(
            score_summary_pair(&MockOracle::with_text("7"), "a", "b").await,
            5.0
        );
        assert_eq!(
            score_summary_pair(&MockOracle::with_text(" 3.14 "), "a", "b").await,
            3.1
        );
        assert_eq!(
            score_summary_pair(&MockOracle::with_text("-1"), "a", "b").await,
            0.0
        );
    }

    #[tokio::test]
    async fn test_pair_score_tie_rounds_to_even() {
        assert_eq!(
            score_summary_pair(&MockOracle::with_text("2.25"), "a", "b").await,
            2.2
        );
        assert_eq!(
            score_summary_pair(&MockOracle::with_text("0.25"), "a", "b").await,
            0.2
        );
    }

    #[tokio::test]
    async fn test_pair_score_falls_back_to_zero() {
        assert_eq!(
            score_summary_pair(&MockOracle::with_text("about 4"), "a", "b").await,
            0.0
        );
        assert_eq!(
            score_summary_pair(
                &MockOracle::failing(OracleError::malformed("no content")),
                "a",
                "b"
            )
            .await,
            0.0
        );
    }

    #[tokio::test]
    async fn test_single_attribute_is_noop() {
        let oracle = MockOracle::with_text("4");
        let mut results = ResultSet::new();
        results.insert("Benefits".into(), attribute(&["x", "y"]));

        compute_cross_attribute_scores(&oracle, &mut results).await;

        assert_eq!(oracle.call_count(), 0);
        let benefits = results.get("Benefits").unwrap();
        assert!(benefits.summary.iter().all(|p| p.cross_attribute_scores.is_empty()));
    }

    #[tokio::test]
    async fn test_two_attributes_cover_every_pair() {
        let oracle = MockOracle::with_responder(|req| {
            if req.user.contains("Summary 1: b0") {
                Ok("1.26".into())
            } else {
                Ok("3.7".into())
            }
        });
        let mut results = ResultSet::new();
        results.insert("Benefits".into(), attribute(&["b0", "b1"]));
        results.insert("Drawbacks".into(), attribute(&["d0"]));

        compute_cross_attribute_scores(&oracle, &mut results).await;

        // 2 x 1 + 1 x 2 calls.
        assert_eq!(oracle.call_count(), 4);

        let benefits = results.get("Benefits").unwrap();
        let b0 = &benefits.summary[0].cross_attribute_scores;
        assert_eq!(b0.len(), 1);
        assert!(b0.get("Benefits").is_none());
        assert_eq!(b0.get("Drawbacks").unwrap().get("summary_0"), Some(&1.3));
        assert_eq!(
            benefits.summary[1]
                .cross_attribute_scores
                .get("Drawbacks")
                .unwrap()
                .get("summary_0"),
            Some(&3.7)
        );

        let drawbacks = results.get("Drawbacks").unwrap();
        let d0 = drawbacks.summary[0].cross_attribute_scores.get("Benefits").unwrap();
        let keys: Vec<&str> = d0.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["summary_0", "summary_1"]);
    }

    #[tokio::test]
    async fn test_target_without_summaries_gets_empty_map() {
        let oracle = MockOracle::with_text("2");
        let mut results = ResultSet::new();
        results.insert("Benefits".into(), attribute(&["b0"]));
        results.insert("Cost".into(), attribute(&[]));

        compute_cross_attribute_scores(&oracle, &mut results).await;

        assert_eq!(oracle.call_count(), 0);
        let scores = &results.get("Benefits").unwrap().summary[0].cross_attribute_scores;
        assert_eq!(scores.get("Cost").map(|m| m.len()), Some(0));
    }

    #[tokio::test]
    async fn test_rerun_overwrites_in_place() {
        let mut results = ResultSet::new();
        results.insert("A".into(), attribute(&["a0"]));
        results.insert("B".into(), attribute(&["b0"]));

        compute_cross_attribute_scores(&MockOracle::with_text("1"), &mut results).await;
        compute_cross_attribute_scores(&MockOracle::with_text("4.5"), &mut results).await;

        let a0 = &results.get("A").unwrap().summary[0].cross_attribute_scores;
        assert_eq!(a0.len(), 1);
        assert_eq!(a0.get("B").unwrap().len(), 1);
        assert_eq!(a0.get("B").unwrap().get("summary_0"), Some(&4.5));
    }

    #[tokio::test]
    async fn test_rerun_with_same_oracle_is_idempotent() {
        let mut results = ResultSet::new();
        results.insert("A".into(), attribute(&["a0", "a1"]));
        results.insert("B".into(), attribute(&["b0"]));
        results.insert("C".into(), attribute(&[]));
        let oracle = MockOracle::with_text("3.25");

        compute_cross_attribute_scores(&oracle, &mut results).await;
        let first = results.clone();
        compute_cross_attribute_scores(&oracle, &mut results).await;

        assert_eq!(results, first);
        let a1 = &results.get("A").unwrap().summary[1].cross_attribute_scores;
        let keys: Vec<&str> = a1.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "C"]);
        assert_eq!(a1.get("B").unwrap().get("summary_0"), Some(&3.2));
    }

    #[tokio::test]
    async fn test_oracle_failure_scores_zero() {
        let mut results = ResultSet::new();
        results.insert("A".into(), attribute(&["a0"]));
        results.insert("B".into(), attribute(&["b0"]));

        compute_cross_attribute_scores(
            &MockOracle::failing(OracleError::unavailable("timeout")),
            &mut results,
        )
        .await;

        let b0 = &results.get("B").unwrap().summary[0].cross_attribute_scores;
        assert_eq!(b0.get("A").unwrap().get("summary_0"), Some(&0.0));
    }
}
