use std::cmp::Ordering;
use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Recommendation, ReviewRecord, ReviewTable};

/// How many of the expert's best reviews are considered
pub const DEFAULT_TOP_N: usize = 5;

/// Length of the review excerpt kept for display
pub const SHORT_REVIEW_CHARS: usize = 50;

/// Picks a restaurant for `mood` from the reviews of that mood's expert.
///
/// The mood expert is the reviewer with the most reviews tagged `mood`; ties go
/// to the smallest `user_id`. The expert's reviews are ranked by stars, the
/// first `top_n` kept, and one of the top-rated among those is drawn from
/// `rng`. Returns `None` when no review carries the mood.
///
/// `mood` is compared exactly; callers lower-case user input first.
pub fn recommend<R>(
    table: &ReviewTable,
    mood: &str,
    top_n: usize,
    rng: &mut R,
) -> Option<Recommendation>
where
    R: Rng + ?Sized,
{
    let matches: Vec<&ReviewRecord> = table.rows().iter().filter(|r| r.mood == mood).collect();

    let expert = mood_expert(&matches)?;

    let mut expert_reviews: Vec<&ReviewRecord> = matches
        .into_iter()
        .filter(|r| r.user_id == expert)
        .collect();

    expert_reviews.sort_by(|a, b| by_stars_desc(a, b));
    expert_reviews.truncate(top_n.max(1));

    let best = expert_reviews
        .iter()
        .map(|r| r.review_stars)
        .filter(|stars| !stars.is_nan())
        .max_by(f64::total_cmp);

    // With no usable rating among the kept reviews, any of them may be picked.
    let top_rated: Vec<&ReviewRecord> = match best {
        Some(best) => expert_reviews
            .into_iter()
            .filter(|r| r.review_stars == best)
            .collect(),
        None => expert_reviews,
    };

    let chosen = top_rated.choose(rng)?;

    tracing::debug!(
        mood = %mood,
        expert = %expert,
        candidates = top_rated.len(),
        business = %chosen.business_name,
        "Mood recommendation selected"
    );

    Some(Recommendation {
        short_review: short_review(&chosen.review),
        record: (*chosen).clone(),
    })
}

/// Highest rating first; NaN ratings sort last
fn by_stars_desc(a: &ReviewRecord, b: &ReviewRecord) -> Ordering {
    match (a.review_stars.is_nan(), b.review_stars.is_nan()) {
        (false, false) => b.review_stars.total_cmp(&a.review_stars),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Most frequent reviewer; the smallest id wins a tie
fn mood_expert<'a>(matches: &[&'a ReviewRecord]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in matches {
        *counts.entry(record.user_id.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(id_a, count_a), (id_b, count_b)| {
            count_a.cmp(count_b).then_with(|| id_b.cmp(id_a))
        })
        .map(|(id, _)| id)
}

fn short_review(review: &str) -> String {
    if review.chars().count() > SHORT_REVIEW_CHARS {
        let excerpt: String = review.chars().take(SHORT_REVIEW_CHARS).collect();
        format!("{}...", excerpt)
    } else {
        review.to_string()
    }
}
