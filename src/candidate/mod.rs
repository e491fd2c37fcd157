//! Match candidates and their deduplication.

pub(crate) mod dedup;

/// Screen or image coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Center point, rounding down like integer pixel division.
    pub fn center(&self) -> Point {
        Point {
            x: (self.x + self.width / 2) as i32,
            y: (self.y + self.height / 2) as i32,
        }
    }
}

/// One placement of a template that cleared the similarity threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    /// Matched region in haystack coordinates.
    pub rect: Rect,
    /// Normalized correlation score; at least the threshold that produced it.
    pub score: f32,
}

impl MatchCandidate {
    pub fn new(x: u32, y: u32, width: u32, height: u32, score: f32) -> Self {
        Self {
            rect: Rect {
                x,
                y,
                width,
                height,
            },
            score,
        }
    }

    /// Center of the matched region.
    pub fn center(&self) -> Point {
        self.rect.center()
    }
}
