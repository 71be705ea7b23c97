//! Best-result selection across engines

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::models::EngineTranslationResult;

struct Candidate<'a, K> {
    engine: K,
    rank: usize,
    len: usize,
    text: &'a str,
}

/// Pick the median-length usable result.
///
/// Lengths are counted in code points. Among results matching the median
/// length, the engine earliest in `order` wins. Returns `None` when no
/// engine produced usable text.
pub fn pick_best_by_median_length<K>(
    order: &[K],
    results: &HashMap<K, EngineTranslationResult>,
) -> Option<(K, String)>
where
    K: Copy + Eq + Hash,
{
    let mut candidates: Vec<Candidate<'_, K>> = order
        .iter()
        .enumerate()
        .filter_map(|(rank, engine)| {
            let result = results.get(engine)?;
            result.is_usable().then(|| Candidate {
                engine: *engine,
                rank,
                len: result.text.chars().count(),
                text: &result.text,
            })
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }

    candidates.sort_by_key(|c| c.len);
    let median = candidates[candidates.len() / 2].len;

    candidates
        .iter()
        .filter(|c| c.len == median)
        .min_by_key(|c| c.rank)
        .or_else(|| candidates.first())
        .map(|c| (c.engine, c.text.to_string()))
}
