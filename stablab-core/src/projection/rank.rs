//! Ranking and fixed-band classification.
//!
//! Descending by composite score; ties share rank via the minimum-rank
//! method (subsequent ranks skip accordingly). Bands are computed
//! independently per horizon and clamped so Winner and Loser can never
//! overlap on a small universe.

use super::Classification;

/// Minimum-rank assignment: `rank_i = 1 + |{j : total_j > total_i}|`.
///
/// Non-finite totals sort to the bottom as a shared last place.
pub fn assign_ranks(totals: &[f64]) -> Vec<usize> {
    let keyed: Vec<f64> = totals
        .iter()
        .map(|&t| if t.is_finite() { t } else { f64::NEG_INFINITY })
        .collect();
    keyed
        .iter()
        .map(|&t| 1 + keyed.iter().filter(|&&other| other > t).count())
        .collect()
}

/// Fixed-size classification bands over ranks.
///
/// Rank at or inside the winner band classifies Winner. A tie group
/// classifies Loser when its worst occupied position falls inside the loser
/// band (counted from the bottom), so ties stretch both bands symmetrically.
/// Winner takes precedence if ties stretch a band across both.
pub fn classify_bands(
    ranks: &[usize],
    universe_len: usize,
    winner_band: usize,
    loser_band: usize,
) -> Vec<Classification> {
    let winner_band = winner_band.min(universe_len / 2 + universe_len % 2);
    let loser_band = loser_band.min(universe_len.saturating_sub(winner_band));
    ranks
        .iter()
        .map(|&r| {
            // With minimum-rank ties, a group at rank r with `tied` members
            // occupies positions r ..= r + tied - 1.
            let tied = ranks.iter().filter(|&&other| other == r).count();
            if r <= winner_band {
                Classification::Winner
            } else if r + tied - 1 > universe_len.saturating_sub(loser_band) {
                Classification::Loser
            } else {
                Classification::Neutral
            }
        })
        .collect()
}
