use crate::models::book::RecommendedBook;
use crate::services::aggregate::Candidate;
use crate::services::scoring::CandidateScore;
use crate::utils::text::round_to_tenth;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

pub const MAX_PER_SUBJECT: usize = 12;
pub const MAX_RECOMMENDATIONS: usize = 60;
pub const MAX_REASONS: usize = 3;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: CandidateScore,
}

/// Final ordering of scored candidates with a per-subject quota and a global cap,
/// so one dominant subject cannot crowd out the rest of the profile.
#[derive(Debug, Clone, Copy)]
pub struct Diversifier {
    max_per_subject: usize,
    max_total: usize,
}

impl Default for Diversifier {
    fn default() -> Self {
        Self::new(MAX_PER_SUBJECT, MAX_RECOMMENDATIONS)
    }
}

impl Diversifier {
    pub fn new(max_per_subject: usize, max_total: usize) -> Self {
        Self {
            max_per_subject,
            max_total,
        }
    }

    pub fn rank(&self, mut scored: Vec<ScoredCandidate>) -> Vec<RecommendedBook> {
        scored.retain(|s| !s.score.is_excluded());
        // Stable: equal scores keep aggregation order.
        scored.sort_by(|a, b| {
            b.score
                .score
                .partial_cmp(&a.score.score)
                .unwrap_or(Ordering::Equal)
        });

        let mut per_subject: HashMap<String, usize> = HashMap::new();
        let mut ranked = Vec::new();

        for ScoredCandidate { candidate, score } in scored {
            if ranked.len() >= self.max_total {
                break;
            }

            let group = diversity_group(&candidate);
            let emitted = per_subject.entry(group).or_insert(0);
            if *emitted >= self.max_per_subject {
                continue;
            }
            *emitted += 1;

            let mut reasons = score.reasons;
            reasons.truncate(MAX_REASONS);
            ranked.push(RecommendedBook {
                book: candidate.book,
                score: round_to_tenth(score.score),
                reasons,
            });
        }

        ranked
    }
}

fn diversity_group(candidate: &Candidate) -> String {
    if let Some(subject) = &candidate.origin_subject {
        return subject.clone();
    }
    warn!(
        "Candidate {} reached ranking without an origin subject",
        candidate.book.work_id
    );
    candidate.book.subjects.first().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{Book, BookSource};

    fn scored(id: &str, subject: Option<&str>, score: f64, reasons: &[&str]) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate {
                book: Book {
                    work_id: id.to_string(),
                    title: id.to_string(),
                    authors: Vec::new(),
                    first_publish_year: None,
                    subjects: vec!["listed".to_string()],
                    cover_url: None,
                    source: BookSource::Subject,
                    isbn: Vec::new(),
                },
                origin_subject: subject.map(str::to_string),
            },
            score: CandidateScore {
                score,
                reasons: reasons.iter().map(|r| r.to_string()).collect(),
            },
        }
    }

    fn ids(ranked: &[RecommendedBook]) -> Vec<&str> {
        ranked.iter().map(|r| r.book.work_id.as_str()).collect()
    }

    #[test]
    fn test_sorted_desc_and_excluded_dropped() {
        let ranked = Diversifier::default().rank(vec![
            scored("low", Some("a"), 1.0, &[]),
            scored("seen", Some("a"), -1.0, &[]),
            scored("high", Some("b"), 9.0, &[]),
            scored("zero", Some("c"), 0.0, &[]),
        ]);

        assert_eq!(ids(&ranked), vec!["high", "low", "zero"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = Diversifier::default().rank(vec![
            scored("first", Some("a"), 2.0, &[]),
            scored("second", Some("b"), 2.0, &[]),
            scored("third", Some("a"), 2.0, &[]),
        ]);

        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_per_subject_cap() {
        let mut input: Vec<ScoredCandidate> = (0..20)
            .map(|i| scored(&format!("fantasy{}", i), Some("fantasy"), 100.0 - i as f64, &[]))
            .collect();
        input.push(scored("poetry0", Some("poetry"), 1.0, &[]));

        let ranked = Diversifier::default().rank(input);

        assert_eq!(ranked.len(), MAX_PER_SUBJECT + 1);
        assert_eq!(ranked.last().unwrap().book.work_id, "poetry0");
        assert_eq!(ranked[11].book.work_id, "fantasy11");
    }

    #[test]
    fn test_global_cap() {
        let input: Vec<ScoredCandidate> = (0..160)
            .map(|i| {
                let subject = format!("s{}", i % 8);
                scored(&format!("{}-{}", subject, i), Some(subject.as_str()), 5.0, &[])
            })
            .collect();

        let ranked = Diversifier::default().rank(input);

        assert_eq!(ranked.len(), MAX_RECOMMENDATIONS);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in &ranked {
            let subject = r.book.work_id.split('-').next().unwrap();
            *counts.entry(subject).or_default() += 1;
        }
        assert!(counts.values().all(|c| *c <= MAX_PER_SUBJECT));
    }

    #[test]
    fn test_score_rounded_and_reasons_truncated() {
        let ranked = Diversifier::default().rank(vec![scored(
            "w",
            Some("a"),
            7.25 + 0.01,
            &["s1", "s2", "a1", "a2"],
        )]);

        assert_eq!(ranked[0].score, 7.3);
        assert_eq!(ranked[0].reasons, vec!["s1", "s2", "a1"]);
    }

    #[test]
    fn test_score_ties_round_half_to_even() {
        let ranked = Diversifier::default().rank(vec![
            scored("classic", Some("a"), 0.25, &[]),
            scored("mixed", Some("b"), 1.25, &[]),
        ]);

        assert_eq!(ranked[0].score, 1.2);
        assert_eq!(ranked[1].score, 0.2);
    }

    #[test]
    fn test_untagged_candidate_groups_by_first_subject() {
        let input: Vec<ScoredCandidate> = (0..15)
            .map(|i| scored(&format!("w{}", i), None, 1.0, &[]))
            .collect();

        let ranked = Diversifier::new(12, 60).rank(input);

        assert_eq!(ranked.len(), 12);
    }
}
