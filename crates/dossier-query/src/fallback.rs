//! In-process scoring used when no search engine answers.
//!
//! Scoring per token (lower-cased, whitespace split):
//! - +3 if the record name contains it
//! - +2 if any keyword contains it
//! - +1 if the extracted content contains it (sentinels never match)
//!
//! then +5 when every token matched somewhere, or +2 when at least half did.
//! Records scoring zero are dropped. An empty term scores every record 1.

use tracing::debug;

use dossier_core::{DocumentRecord, ExactFilters, SearchHit};

const NAME_POINTS: u32 = 3;
const KEYWORD_POINTS: u32 = 2;
const CONTENT_POINTS: u32 = 1;
const ALL_MATCHED_BONUS: u32 = 5;
const HALF_MATCHED_BONUS: u32 = 2;

/// Score one record; `None` excludes it.
pub fn score_record(record: &DocumentRecord, tokens: &[String]) -> Option<u32> {
    if tokens.is_empty() {
        return Some(1);
    }

    let name = record.name.to_lowercase();
    let keywords: Vec<String> = record.keywords.iter().map(|k| k.to_lowercase()).collect();
    let content = if record.has_text_content() {
        record.content.to_lowercase()
    } else {
        String::new()
    };

    let mut score = 0;
    let mut matched = 0;
    for token in tokens {
        let in_name = name.contains(token.as_str());
        let in_keywords = keywords.iter().any(|k| k.contains(token.as_str()));
        let in_content = !content.is_empty() && content.contains(token.as_str());

        if in_name {
            score += NAME_POINTS;
        }
        if in_keywords {
            score += KEYWORD_POINTS;
        }
        if in_content {
            score += CONTENT_POINTS;
        }
        if in_name || in_keywords || in_content {
            matched += 1;
        }
    }

    if score == 0 {
        return None;
    }
    if matched == tokens.len() {
        score += ALL_MATCHED_BONUS;
    } else if matched * 2 >= tokens.len() {
        score += HALF_MATCHED_BONUS;
    }
    Some(score)
}

/// Filter, score and rank records. Ties keep catalog order.
pub fn evaluate(records: &[DocumentRecord], term: &str, filters: &ExactFilters) -> Vec<SearchHit> {
    let tokens: Vec<String> = term
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut hits: Vec<SearchHit> = records
        .iter()
        .filter(|r| filters.matches(r))
        .filter_map(|r| {
            score_record(r, &tokens).map(|score| SearchHit {
                record: r.clone(),
                score: f64::from(score),
                highlight: None,
            })
        })
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        query = term,
        candidates = records.len(),
        result_count = hits.len(),
        "Fallback evaluation complete"
    );
    hits
}
