//! Shared round-content pickers. All of them return `None` instead of
//! panicking when the request cannot be satisfied.

use rand::Rng;
use rand::RngCore;

pub fn pick_index(rng: &mut dyn RngCore, len: usize) -> Option<usize>
{
    if len == 0 {
        return None;
    }
    Some(rng.gen_range(0..len))
}

/// Uniform index in `0..len` that is never `except`.
pub fn pick_index_except(rng: &mut dyn RngCore, len: usize, except: Option<usize>) -> Option<usize>
{
    match except {
        Some(skip) if skip < len => {
            if len < 2 {
                return None;
            }
            let idx = rng.gen_range(0..len - 1);
            Some(if idx >= skip { idx + 1 } else { idx })
        }
        _ => pick_index(rng, len),
    }
}

/// `count` distinct indices from `0..len`, in draw order.
pub fn sample_distinct(rng: &mut dyn RngCore, len: usize, count: usize) -> Option<Vec<usize>>
{
    if count > len {
        return None;
    }
    let mut pool: Vec<usize> = (0..len).collect();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        picked.push(pool.swap_remove(idx));
    }
    Some(picked)
}

/// Maps one `[0,1)` draw onto threshold bands. `bands` must be sorted by
/// threshold; the first band whose threshold exceeds `draw` wins, otherwise
/// `otherwise`.
pub fn pick_tier<T: Copy>(draw: f64, bands: &[(f64, T)], otherwise: T) -> T
{
    bands
        .iter()
        .find(|(threshold, _)| draw < *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(otherwise)
}

pub fn draw_unit(rng: &mut dyn RngCore) -> f64
{
    rng.gen_range(0.0..1.0)
}

/// `start + step * (round - 1)`, clamped into `floor..=ceiling`.
pub fn clamped_step(start: i64, step: i64, round: u32, floor: i64, ceiling: i64) -> i64
{
    let steps = i64::from(round.saturating_sub(1));
    start
        .saturating_add(step.saturating_mul(steps))
        .clamp(floor, ceiling)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_ranges_yield_none()
    {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_index(&mut rng, 0), None);
        assert_eq!(pick_index_except(&mut rng, 1, Some(0)), None);
        assert_eq!(sample_distinct(&mut rng, 3, 4), None);
    }

    #[test]
    fn excluded_index_is_never_picked()
    {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let idx = pick_index_except(&mut rng, 5, Some(2)).unwrap();
            assert!(idx < 5);
            assert_ne!(idx, 2);
        }
    }

    #[test]
    fn distinct_sample_has_no_repeats()
    {
        let mut rng = StdRng::seed_from_u64(3);
        let mut picked = sample_distinct(&mut rng, 9, 9).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn tiers_follow_threshold_bands()
    {
        let bands = [(0.1, 'b'), (0.3, 'x')];
        assert_eq!(pick_tier(0.05, &bands, 'a'), 'b');
        assert_eq!(pick_tier(0.1, &bands, 'a'), 'x');
        assert_eq!(pick_tier(0.29, &bands, 'a'), 'x');
        assert_eq!(pick_tier(0.3, &bands, 'a'), 'a');
    }

    #[test]
    fn difficulty_curve_is_clamped()
    {
        assert_eq!(clamped_step(50, -3, 1, 5, 50), 50);
        assert_eq!(clamped_step(50, -3, 5, 5, 50), 38);
        assert_eq!(clamped_step(50, -3, 40, 5, 50), 5);
        assert_eq!(clamped_step(50, -3, 0, 5, 50), 50);
    }
}
