use crate::types::Point;

/// Euclidean distance between two points
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// True when the points are strictly closer than `radius`.
/// Tangent circles (distance == radius) are not in contact.
pub fn within_radius(p1: Point, p2: Point, radius: f64) -> bool {
    distance(p1, p2) < radius
}

/// Constrain a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
