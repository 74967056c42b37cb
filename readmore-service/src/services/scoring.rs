use crate::models::book::Book;
use crate::models::profile::{Era, SeenSet, TasteProfile};

/// Score given to works the user has already seen. Never ranked.
pub const EXCLUDED_SCORE: f64 = -1.0;

pub const SUBJECT_MULTIPLIER: f64 = 2.0;
pub const AUTHOR_MULTIPLIER: f64 = 3.0;
pub const ERA_MULTIPLIER: f64 = 0.5;
pub const MAX_SUBJECT_REASONS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub score: f64,
    /// Subject reasons (at most two) followed by every author reason.
    pub reasons: Vec<String>,
}

impl CandidateScore {
    pub fn excluded() -> Self {
        Self {
            score: EXCLUDED_SCORE,
            reasons: Vec::new(),
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.score < 0.0
    }
}

/// Heuristic affinity of one book to a taste profile.
///
/// Author matches weigh `3w`, subject matches `2w` and a matching era `0.5w`.
/// Only positive weights contribute.
pub fn score_candidate(book: &Book, profile: &TasteProfile, seen: &SeenSet) -> CandidateScore {
    if seen.contains(book.work_id.trim()) {
        return CandidateScore::excluded();
    }

    let mut score = 0.0;
    let mut subject_reasons: Vec<(&str, String)> = Vec::new();

    for subject in &book.subjects {
        let Some(weight) = profile.subject_weight(subject).filter(|w| *w > 0.0) else {
            continue;
        };
        score += SUBJECT_MULTIPLIER * weight;
        if subject_reasons.len() < MAX_SUBJECT_REASONS
            && !subject_reasons.iter().any(|(s, _)| *s == subject.as_str())
        {
            subject_reasons.push((
                subject.as_str(),
                format!("matches your interest: {} (+{})", subject, weight),
            ));
        }
    }

    let mut reasons: Vec<String> = subject_reasons.into_iter().map(|(_, r)| r).collect();

    for author in &book.authors {
        let key = author.key.trim();
        if key.is_empty() {
            continue;
        }
        if let Some(weight) = profile.author_weight(key).filter(|w| *w > 0.0) {
            score += AUTHOR_MULTIPLIER * weight;
            reasons.push(format!("author you like: {} (+{})", author.name, weight));
        }
    }

    if let Some(year) = book.first_publish_year {
        if let Some(weight) = profile.era_weight(Era::from_year(year)).filter(|w| *w > 0.0) {
            score += ERA_MULTIPLIER * weight;
        }
    }

    CandidateScore { score, reasons }
}
