//! The comment-to-sentiment pipeline.
//!
//! Strictly linear per request: fetch → normalize → rewrite → score →
//! aggregate → interpret. Every stage's full output feeds the next stage, so
//! there is nothing to parallelize; any failure short-circuits with no
//! partial result.

use std::fmt;

use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::instagram::CommentSource;
use crate::llm::{split_statements, LanguageModel};
use crate::normalize::normalize_comments;
use crate::sentiment::SentimentAnalyzer;

/// Matches the legacy service's scrape depth.
pub const DEFAULT_COMMENT_LIMIT: usize = 100;

pub const NO_CAPTION: &str = "No caption available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Normalizing,
    Rewriting,
    Scoring,
    Aggregating,
    Interpreting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Rewriting => "rewriting",
            Stage::Scoring => "scoring",
            Stage::Aggregating => "aggregating",
            Stage::Interpreting => "interpreting",
        };
        f.write_str(name)
    }
}

/// Terminal output of a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub caption: String,
    pub avg_compound_score: f64,
    pub interpretation: String,
    /// Per-statement compounds, kept for the distribution chart.
    pub statement_scores: Vec<f64>,
}

/// Arithmetic mean of compound scores. An empty batch is a data error, never
/// a silent zero.
pub fn mean_compound(scores: &[f64]) -> Result<f64, AnalysisError> {
    if scores.is_empty() {
        return Err(AnalysisError::data(
            "No sentiment scores to aggregate.".to_string(),
        ));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

fn rewrite_prompt(cleaned: &[String]) -> String {
    let listing = serde_json::to_string(cleaned).unwrap_or_default();
    format!(
        "Given a list of Instagram comments {listing}, generate a set of interpreted \
statements that reflect the literal meaning or intent behind each original comment. Do not \
summarize the comments and do not modify their core meaning. Instead, rewrite each comment \
into a clear, explicit sentence expressing what the commenter intended.
Examples:
- \"GOAT\" should be rewritten as \"The commenter is saying this person is the greatest of all time.\"
- \"Fire content\" becomes \"The commenter thinks the content is extremely good.\"

Produce exactly {count} sentences, one for each comment, and end every sentence with a period.

The output should be a direct collection of interpreted meanings suitable for sentiment \
analysis. Keep the interpretations simple, literal, and aligned with the intent behind each \
comment.",
        count = cleaned.len()
    )
}

fn mood_prompt(caption: &str, avg_compound: f64) -> String {
    format!(
        "Analyze the emotional response of an Instagram audience using two inputs:
The post description: {caption}
The average sentiment compound score: {avg_compound} ranging from -1 to 1

Classify the audience into one or more of the following categories and interpret what each \
means in relation to the content:
- Curious, Understanding, Accepting, Excited, Neutral or indifferent, Confused or doubtful, \
Frustrated, Frightened or worried, Sad

Based on the post description and the sentiment score, provide:
1. The most fitting emotional category (or categories)
2. A brief explanation linking both the content context and the sentiment score to the \
emotional interpretation

Keep the response concise, direct, and context-driven."
    )
}

/// Run the full pipeline for one post.
pub async fn analyze_post(
    source: &dyn CommentSource,
    rewriter: &dyn LanguageModel,
    interpreter: &dyn LanguageModel,
    analyzer: &SentimentAnalyzer,
    post_url: &str,
    comment_limit: usize,
) -> Result<AnalysisReport, AnalysisError> {
    info!(stage = %Stage::Fetching, url = post_url, "analysis started");
    let media_pk = source.resolve_media(post_url).await?;
    let raw_comments = source.fetch_comments(media_pk, comment_limit).await?;
    let caption = source
        .fetch_caption(media_pk)
        .await?
        .unwrap_or_else(|| NO_CAPTION.to_string());

    info!(stage = %Stage::Normalizing, scraped = raw_comments.len(), "cleaning comments");
    let normalized = normalize_comments(&raw_comments);
    info!(
        stage = %Stage::Normalizing,
        kept = normalized.raw().len(),
        dropped = raw_comments.len() - normalized.raw().len(),
        "comments cleaned"
    );
    if normalized.is_empty() {
        return Err(AnalysisError::data(
            "No comments found to analyze.".to_string(),
        ));
    }

    info!(stage = %Stage::Rewriting, batch = normalized.len(), "requesting intent rewrite");
    let raw_rewrite = rewriter.generate(&rewrite_prompt(normalized.cleaned())).await?;
    let statements = split_statements(&raw_rewrite);
    if statements.len() != normalized.len() {
        // the model is only a best-effort producer of N sentences; the
        // returned bag is scored as-is, never padded or re-paired
        warn!(
            stage = %Stage::Rewriting,
            expected = normalized.len(),
            got = statements.len(),
            "rewriter count mismatch, scoring returned statements only"
        );
    }
    if statements.is_empty() {
        return Err(AnalysisError::data(
            "The rewriter returned no usable statements.".to_string(),
        ));
    }

    info!(stage = %Stage::Scoring, statements = statements.len(), "scoring rewritten statements");
    let statement_scores: Vec<f64> = statements
        .iter()
        .map(|s| analyzer.polarity_scores(s).compound)
        .collect();

    info!(stage = %Stage::Aggregating, "averaging compounds");
    let avg_compound_score = mean_compound(&statement_scores)?;

    info!(stage = %Stage::Interpreting, avg = avg_compound_score, "requesting mood interpretation");
    let interpretation = interpreter
        .generate(&mood_prompt(&caption, avg_compound_score))
        .await?;

    info!(avg = avg_compound_score, "analysis done");
    Ok(AnalysisReport {
        caption,
        avg_compound_score,
        interpretation,
        statement_scores,
    })
}
