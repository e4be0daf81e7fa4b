use tracing::{info, warn};

use super::types::clamp_and_round;
use crate::constants::FALLBACK_SCORE;
use crate::model::ResultSet;
use crate::oracle::{OracleRequest, ScoringOracle, ScoringPurpose, parse_scalar_score};

const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.95;
const MAX_TOKENS: u32 = 20;

const SYSTEM_PROMPT: &str =
    "You evaluate how closely related two short text summaries are to each other.";

/// Builds the oracle request comparing two summaries.
pub fn relevance_request(first: &str, second: &str) -> OracleRequest {
    OracleRequest {
        purpose: ScoringPurpose::Relevance,
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Rate how related these two summaries are on a scale from 0 (unrelated) to 5 \
             (highly related), considering shared topics, concepts and logical connections.\n\n\
             Summary 1: {first}\n\nSummary 2: {second}\n\n\
             Reply with only the number, using one decimal place."
        ),
        temperature: TEMPERATURE,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
    }
}

/// Scores one pair of summaries. Clamped to `[0, 5]` and rounded to one decimal; `0` on any
/// failure.
pub async fn score_summary_pair(oracle: &dyn ScoringOracle, first: &str, second: &str) -> f64 {
    let text = match oracle.complete(&relevance_request(first, second)).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Relevance oracle call failed");
            return FALLBACK_SCORE;
        }
    };

    match parse_scalar_score(&text) {
        Ok(score) => clamp_and_round(score),
        Err(e) => {
            warn!(error = %e, "Could not parse relevance score");
            FALLBACK_SCORE
        }
    }
}

/// Fills `crossAttributeScores` on every summary point of `results`.
///
/// For each ordered pair of distinct attributes, every source summary is scored against every
/// target summary with one sequential oracle call. The per-target map is created even when the
/// target has no summaries. Re-running overwrites existing entries. No-op for fewer than two
/// attributes.
pub async fn compute_cross_attribute_scores(oracle: &dyn ScoringOracle, results: &mut ResultSet) {
    if results.len() < 2 {
        info!(attributes = results.len(), "Skipping cross-attribute scoring");
        return;
    }

    let snapshot: Vec<(String, Vec<(String, String)>)> = results
        .iter()
        .map(|(attr, data)| {
            let summaries = data
                .summary
                .iter()
                .map(|point| (point.id.clone(), point.text.clone()))
                .collect();
            (attr.clone(), summaries)
        })
        .collect();

    info!(attributes = snapshot.len(), "Computing cross-attribute scores");

    for (source_attr, source_summaries) in &snapshot {
        for (source_index, (_, source_text)) in source_summaries.iter().enumerate() {
            for (target_attr, target_summaries) in &snapshot {
                if source_attr == target_attr {
                    continue;
                }

                let mut scores = Vec::with_capacity(target_summaries.len());
                for (target_id, target_text) in target_summaries {
                    let score = score_summary_pair(oracle, source_text, target_text).await;
                    scores.push((target_id.clone(), score));
                }

                let Some(point) = results
                    .get_mut(source_attr)
                    .and_then(|data| data.summary.get_mut(source_index))
                else {
                    continue;
                };
                let target_map = point
                    .cross_attribute_scores
                    .entry(target_attr.clone())
                    .or_default();
                for (target_id, score) in scores {
                    target_map.insert(target_id, score);
                }
            }
        }
    }
}
