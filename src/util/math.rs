//! Integer distance helpers for candidate deduplication.

/// Squared Euclidean distance between two integer points.
pub(crate) fn dist_sq(ax: i64, ay: i64, bx: i64, by: i64) -> u64 {
    let dx = ax.abs_diff(bx);
    let dy = ay.abs_diff(by);
    dx * dx + dy * dy
}

/// Returns true when the two points are strictly closer than `radius`.
pub(crate) fn within_radius(ax: i64, ay: i64, bx: i64, by: i64, radius: u32) -> bool {
    let r = radius as u64;
    dist_sq(ax, ay, bx, by) < r * r
}

#[cfg(test)]
mod tests {
    use super::{dist_sq, within_radius};

    #[test]
    fn dist_sq_is_symmetric() {
        assert_eq!(dist_sq(0, 0, 3, 4), 25);
        assert_eq!(dist_sq(3, 4, 0, 0), 25);
        assert_eq!(dist_sq(-2, 5, -2, 5), 0);
    }

    #[test]
    fn within_radius_excludes_boundary() {
        assert!(!within_radius(0, 0, 20, 0, 20));
        assert!(within_radius(0, 0, 19, 0, 20));
        assert!(!within_radius(0, 0, 12, 16, 20));
        assert!(!within_radius(0, 0, 0, 0, 0));
    }
}
