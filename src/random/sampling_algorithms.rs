//! Sampling used by the spread step: how many members a source tries to infect, and which ones.

use crate::rand::seq::index::sample as choose_range;
use crate::rand::Rng;

/// Draws the number of new infections a single source attempts this tick: uniform in
/// `[1, spread_factor]`, capped by the number of healthy neighbors available.
///
/// Returns 0 without touching the generator when nothing is available.
pub fn sample_spread_count<R: Rng + ?Sized>(
    rng: &mut R,
    spread_factor: usize,
    available: usize,
) -> usize {
    if available == 0 || spread_factor == 0 {
        return 0;
    }
    rng.random_range(1..=spread_factor).min(available)
}

/// Sample `requested` distinct elements uniformly without replacement from a slice. If more
/// samples are requested than there are items, every item is returned.
///
/// The selected items are returned in the order they appear in `items`.
pub fn sample_distinct<R, T>(rng: &mut R, items: &[T], requested: usize) -> Vec<T>
where
    R: Rng + ?Sized,
    T: Copy,
{
    let requested = requested.min(items.len());
    if requested == 0 {
        return Vec::new();
    }
    if requested == items.len() {
        return items.to_vec();
    }
    let mut indexes = choose_range(rng, items.len(), requested).into_vec();
    indexes.sort_unstable();
    indexes.into_iter().map(|index| items[index]).collect()
}
