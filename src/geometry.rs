//! 2D points and vectors.

/// Position or velocity in the plane.
pub type Vector2 = nalgebra::Vector2<f64>;

pub fn add(a: Vector2, b: Vector2) -> Vector2 {
    a + b
}

/// Componentwise multiply; dividing by `n` is `scale(v, 1.0 / n)`.
pub fn scale(a: Vector2, s: f64) -> Vector2 {
    a * s
}

pub fn subtract(a: Vector2, b: Vector2) -> Vector2 {
    a - b
}

/// Euclidean length. Zero for the zero vector.
pub fn magnitude(v: Vector2) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

pub fn distance(p: Vector2, q: Vector2) -> f64 {
    magnitude(subtract(p, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_zero_is_zero() {
        assert_eq!(magnitude(Vector2::zeros()), 0.0);
    }

    #[test]
    fn magnitude_three_four_five() {
        assert_eq!(magnitude(Vector2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            Vector2::new(100.0, 100.0),
            Vector2::new(-3.5, 12.25),
            Vector2::new(0.0, 0.0),
            Vector2::new(1e6, -2e-3),
        ];
        for a in points {
            for b in points {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 5.0);
        assert_eq!(add(a, b), Vector2::new(4.0, 7.0));
        assert_eq!(subtract(b, a), Vector2::new(2.0, 3.0));
        assert_eq!(scale(b, 0.5), Vector2::new(1.5, 2.5));
    }
}
