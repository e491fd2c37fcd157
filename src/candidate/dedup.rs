//! Greedy first-seen-wins deduplication of match candidates.

use crate::candidate::MatchCandidate;
use crate::util::math::within_radius;

/// Keeps candidates in input order, discarding any whose center lies strictly
/// closer than `radius` pixels (Euclidean) to an already accepted center.
///
/// This is order dependent on purpose: fed with a row-major scan it reproduces
/// the counts of the established 70% / 20 px marker policy. A `radius` of 0
/// keeps everything.
pub fn dedup_by_radius<I>(candidates: I, radius: u32) -> Vec<MatchCandidate>
where
    I: IntoIterator<Item = MatchCandidate>,
{
    let mut kept: Vec<MatchCandidate> = Vec::new();

    'outer: for candidate in candidates {
        let c = candidate.center();
        for accepted in kept.iter() {
            let a = accepted.center();
            if within_radius(c.x as i64, c.y as i64, a.x as i64, a.y as i64, radius) {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::dedup_by_radius;
    use crate::candidate::MatchCandidate;

    fn at(x: u32, y: u32) -> MatchCandidate {
        MatchCandidate::new(x, y, 10, 10, 0.9)
    }

    #[test]
    fn boundary_distance_is_distinct() {
        let kept = dedup_by_radius([at(0, 0), at(20, 0)], 20);
        assert_eq!(kept.len(), 2);

        let kept = dedup_by_radius([at(0, 0), at(19, 0)], 20);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], at(0, 0));
    }

    #[test]
    fn diagonal_boundary_uses_euclidean_distance() {
        // 12-16-20 triangle: exactly on the radius.
        assert_eq!(dedup_by_radius([at(0, 0), at(12, 16)], 20).len(), 2);
        // Chebyshev distance 15 but Euclidean ~21.2: distinct.
        assert_eq!(dedup_by_radius([at(0, 0), at(15, 15)], 20).len(), 2);
        assert_eq!(dedup_by_radius([at(0, 0), at(13, 14)], 20).len(), 1);
    }

    #[test]
    fn first_seen_wins_regardless_of_score() {
        let weak = MatchCandidate::new(0, 0, 10, 10, 0.71);
        let strong = MatchCandidate::new(5, 0, 10, 10, 0.99);
        assert_eq!(dedup_by_radius([weak, strong], 20), vec![weak]);
        assert_eq!(dedup_by_radius([strong, weak], 20), vec![strong]);
    }

    #[test]
    fn chained_neighbours_are_not_transitive() {
        // 0 suppresses 15, but 30 is 30 px from 0 and survives.
        let kept = dedup_by_radius([at(0, 0), at(15, 0), at(30, 0)], 20);
        assert_eq!(kept, vec![at(0, 0), at(30, 0)]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let raw: Vec<_> = (0..40u32)
            .map(|i| at((i * 7) % 53, (i * 11) % 37))
            .collect();
        let once = dedup_by_radius(raw.iter().copied(), 20);
        let twice = dedup_by_radius(once.iter().copied(), 20);
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_radius_keeps_everything() {
        assert_eq!(dedup_by_radius([at(3, 3), at(3, 3)], 0).len(), 2);
    }
}
