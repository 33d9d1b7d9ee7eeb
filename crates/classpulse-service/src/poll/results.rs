//! Vote tally computation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use classpulse_entity::poll::{Poll, Vote};

/// Tally of a poll's votes, keyed by option text for display.
///
/// Options are addressed by index internally; options sharing the same
/// text collapse into one displayed count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResults {
    /// The poll being tallied.
    pub poll: Poll,
    /// Vote count per option text, zero-filled for unvoted options.
    pub votes: BTreeMap<String, i64>,
    /// Total number of votes (one per voter).
    pub total: i64,
    /// Integer-rounded percentage per option text; all zero when no
    /// votes have been cast.
    pub percentages: BTreeMap<String, i64>,
}

/// Compute the tally for a poll from its recorded votes.
pub fn compute_results(poll: &Poll, votes: &[Vote]) -> PollResults {
    let mut counts: BTreeMap<String, i64> = poll
        .options
        .iter()
        .map(|option| (option.text.clone(), 0))
        .collect();

    let mut total = 0i64;
    for vote in votes {
        if let Some(option) = poll.options.get(vote.option_index as usize) {
            *counts.entry(option.text.clone()).or_insert(0) += 1;
            total += 1;
        }
    }

    let percentages = counts
        .iter()
        .map(|(text, &count)| {
            let pct = if total > 0 {
                ((count as f64 / total as f64) * 100.0).round() as i64
            } else {
                0
            };
            (text.clone(), pct)
        })
        .collect();

    PollResults {
        poll: poll.clone(),
        votes: counts,
        total,
        percentages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classpulse_entity::poll::PollOption;

    fn poll_with_options(texts: &[&str]) -> Poll {
        Poll {
            id: 1,
            title: "t".into(),
            question: "q".into(),
            options: texts
                .iter()
                .enumerate()
                .map(|(i, text)| PollOption {
                    index: i as i32,
                    text: text.to_string(),
                })
                .collect(),
            created_by: 1,
            subject: "Math".into(),
            department_id: None,
            content_id: None,
            tags: Vec::new(),
            timer_duration_seconds: 30,
            expires_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn vote(user_id: i64, option_index: i32) -> Vote {
        Vote {
            id: user_id,
            poll_id: 1,
            user_id,
            option_index,
            voted_at: Utc::now(),
        }
    }

    #[test]
    fn test_zero_votes_all_zero() {
        let results = compute_results(&poll_with_options(&["A", "B"]), &[]);
        assert_eq!(results.total, 0);
        assert_eq!(results.votes["A"], 0);
        assert_eq!(results.percentages["A"], 0);
        assert_eq!(results.percentages["B"], 0);
    }

    #[test]
    fn test_counts_and_rounded_percentages() {
        let votes = [vote(1, 0), vote(2, 0), vote(3, 1)];
        let results = compute_results(&poll_with_options(&["A", "B"]), &votes);
        assert_eq!(results.total, 3);
        assert_eq!(results.votes["A"], 2);
        assert_eq!(results.votes["B"], 1);
        assert_eq!(results.percentages["A"], 67);
        assert_eq!(results.percentages["B"], 33);
    }

    #[test]
    fn test_duplicate_option_text_collapses() {
        let votes = [vote(1, 0), vote(2, 2)];
        let results = compute_results(&poll_with_options(&["Yes", "No", "Yes"]), &votes);
        assert_eq!(results.votes.len(), 2);
        assert_eq!(results.votes["Yes"], 2);
        assert_eq!(results.votes["No"], 0);
    }

    #[test]
    fn test_out_of_range_vote_rows_are_ignored() {
        let votes = [vote(1, 0), vote(2, 9)];
        let results = compute_results(&poll_with_options(&["A", "B"]), &votes);
        assert_eq!(results.total, 1);
        assert_eq!(results.votes["A"], 1);
    }
}
