use tracing::{debug, error, warn};

use super::types::{
    Evaluator, GroundednessInput, GroundednessScores, ScoreMapFormat, fallback_scores,
    zero_out_of_range,
};
use crate::constants::FALLBACK_SCORE;
use crate::oracle::{
    OracleRequest, ScoreParseError, ScoringPurpose, extract_json_object, parse_score_map,
};

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const MAX_TOKENS: u32 = 800;

const SYSTEM_PROMPT: &str = "You are given a query, an aspect of that query, one summary \
statement and a list of article links. Judge how well the summary is grounded in the content \
of each linked article. Consider evidence accuracy (does the summary reflect the article), \
evidence citation (does it rely on specific parts of the article) and consistency (does it \
agree with the article's facts). Rate each article on a scale from 0 to 5. Respond only with a \
JSON object whose keys are the article URLs and whose values are the scores, for example \
{\"https://example.com/a\": 4, \"https://example.com/b\": 1}.";

/// Builds the oracle request for one summary point.
pub fn groundedness_request(input: &GroundednessInput<'_>) -> OracleRequest {
    let links = serde_json::to_string(input.article_urls).unwrap_or_else(|_| "[]".to_string());

    let mut system = SYSTEM_PROMPT.to_string();
    if let Some(guidance) = input.guidance.map(str::trim).filter(|g| !g.is_empty()) {
        system.push_str("\n\nAdditional evaluation guidance: ");
        system.push_str(guidance);
    }

    OracleRequest {
        purpose: ScoringPurpose::Groundedness,
        system,
        user: format!(
            "query: {}\naspect: {}\nsummary: {}\narticle_links: {}",
            input.query, input.attribute, input.summary, links
        ),
        temperature: TEMPERATURE,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
    }
}

/// Scores how well `input.summary` is supported by each article URL.
///
/// Never fails: transport errors and unparseable output score every URL `0`. Values outside
/// `[0, 5]` or non-numeric values become `0`. Keys the evaluator adds beyond the input URLs are
/// kept; input URLs it omits are added with `0`.
pub async fn compute_groundedness(
    evaluator: &Evaluator,
    input: &GroundednessInput<'_>,
) -> GroundednessScores {
    let request = groundedness_request(input);

    let text = match evaluator.oracle().complete(&request).await {
        Ok(text) => text,
        Err(e) => {
            error!(attribute = input.attribute, error = %e, "Groundedness oracle call failed");
            return fallback_scores(input.article_urls);
        }
    };

    match parse_evaluator_output(&text, evaluator.format()) {
        Ok(parsed) => {
            let mut scores: GroundednessScores = parsed
                .into_iter()
                .map(|(url, value)| (url, zero_out_of_range(value)))
                .collect();
            for url in input.article_urls {
                scores.entry(url.clone()).or_insert(FALLBACK_SCORE);
            }
            debug!(
                attribute = input.attribute,
                scored = scores.len(),
                "Groundedness computed"
            );
            scores
        }
        Err(e) => {
            warn!(
                attribute = input.attribute,
                format = %evaluator.format(),
                error = %e,
                "Could not parse groundedness output"
            );
            fallback_scores(input.article_urls)
        }
    }
}

fn parse_evaluator_output(
    text: &str,
    format: ScoreMapFormat,
) -> Result<Vec<(String, Option<f64>)>, ScoreParseError> {
    match format {
        ScoreMapFormat::Strict => parse_score_map(text),
        ScoreMapFormat::Embedded => parse_score_map(extract_json_object(text)?),
    }
}
