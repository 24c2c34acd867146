//! Small integer geometry helpers shared by collision, carving, and damage.

/// Vertical extent of a circle at one column.
///
/// `y_lower` is the larger Y value (closer to the bottom of the field),
/// `y_upper` the smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub y_lower: i32,
    pub y_upper: i32,
}

/// Chord of the circle centered at `(x0, y0)` with radius `radius`, taken at
/// column `x`. Returns `None` when the column misses the circle.
///
/// Bounds are truncated toward zero.
pub fn circle_chord(x0: i32, y0: i32, radius: i32, x: i32) -> Option<Chord> {
    let dx = (x - x0) as f32;
    let r = radius as f32;
    let tmp = r * r - dx * dx;
    if tmp < 0.0 {
        return None;
    }
    let half = tmp.sqrt();
    Some(Chord {
        y_lower: (y0 as f32 + half) as i32,
        y_upper: (y0 as f32 - half) as i32,
    })
}

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]` with integer
/// arithmetic. Inputs outside the range clamp to the matching endpoint.
pub fn linear_interpolation(out_min: i32, out_max: i32, in_min: i32, in_max: i32, x: i32) -> i32 {
    if x < in_min {
        return out_min;
    }
    if x > in_max {
        return out_max;
    }
    if in_max == in_min {
        return out_min;
    }
    out_min + ((x - in_min) * (out_max - out_min)) / (in_max - in_min)
}

/// Euclidean distance between two points.
pub fn distance(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    (dx * dx + dy * dy).sqrt()
}
