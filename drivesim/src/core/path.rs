use crate::core::geometry::Point;

/// Path is the user-drawn polyline in drawing order. Points are never deduplicated, smoothed or
/// resampled, so the point density reflects the pointer sampling rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Path {
        Path { points: Vec::new() }
    }

    /// Creates a path containing only the given start point.
    pub fn starting_at(point: Point) -> Path {
        Path {
            points: vec![point],
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A path needs at least one segment to be driven along.
    pub fn is_drivable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn get(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Index of the last segment target, i.e. the index at which driving stops.
    pub fn last_idx(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// length returns the summed length of all segments.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|seg| seg[0].dist(&seg[1]))
            .sum()
    }
}

impl From<Vec<Point>> for Path {
    fn from(points: Vec<Point>) -> Path {
        Path { points }
    }
}
