//! Shuffle selection
//!
//! Shuffle does not reorder the playlist. Each advance picks a uniformly
//! random index instead, whichever direction was requested.

use rand::{thread_rng, Rng};

/// Pick a random index in `[0, len)`, `None` for an empty playlist
pub fn pick_index(len: usize) -> Option<usize> {
    pick_index_with(&mut thread_rng(), len)
}

/// Same as [`pick_index`] with a caller-provided generator
pub fn pick_index_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_has_no_index() {
        assert_eq!(pick_index(0), None);
    }

    #[test]
    fn single_track_always_zero() {
        for _ in 0..20 {
            assert_eq!(pick_index(1), Some(0));
        }
    }

    #[test]
    fn picks_stay_in_range_and_cover_all() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let i = pick_index_with(&mut rng, 5).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
