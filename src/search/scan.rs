//! Thresholding a score surface into raw candidates.

use crate::candidate::MatchCandidate;
use crate::kernel::ScoreMap;

/// Every placement with `score >= threshold`, in row-major scan order.
///
/// Candidate rectangles take the template size; no deduplication happens here.
pub fn candidates_above(
    map: &ScoreMap,
    threshold: f32,
    tpl_width: usize,
    tpl_height: usize,
) -> Vec<MatchCandidate> {
    map.above(threshold)
        .map(|(x, y, score)| {
            MatchCandidate::new(x as u32, y as u32, tpl_width as u32, tpl_height as u32, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::candidates_above;
    use crate::kernel::ScoreMap;

    #[test]
    fn scan_order_is_row_major() {
        let map = ScoreMap::from_scores(3, 2, vec![0.9, 0.1, 0.8, 0.75, f32::NEG_INFINITY, 0.7]);
        let found = candidates_above(&map, 0.7, 4, 4);
        let coords: Vec<_> = found.iter().map(|c| (c.rect.x, c.rect.y)).collect();
        assert_eq!(coords, vec![(0, 0), (2, 0), (0, 1), (2, 1)]);
        assert!(found.iter().all(|c| c.rect.width == 4 && c.rect.height == 4));
    }

    #[test]
    fn threshold_is_inclusive() {
        let map = ScoreMap::from_scores(1, 1, vec![0.7]);
        assert_eq!(candidates_above(&map, 0.7, 1, 1).len(), 1);
        assert!(candidates_above(&map, 0.7001, 1, 1).is_empty());
    }
}
