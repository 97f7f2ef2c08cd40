//! Distance estimates used to guide A*

use glam::Vec3;
use nav_common::{distance, distance_squared, manhattan_distance};

/// Estimate of the remaining cost between two node positions
///
/// `Euclidean` and `Zero` never overestimate on graphs whose edge costs are at
/// least the straight-line distance, so A* stays optimal with them.
/// `EuclideanSquared` and `Manhattan` trade that guarantee for fewer expansions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Heuristic {
    #[default]
    Euclidean,
    EuclideanSquared,
    Manhattan,
    /// Turns A* into Dijkstra
    Zero,
}

impl Heuristic {
    pub fn estimate(&self, from: &Vec3, to: &Vec3) -> f32 {
        match self {
            Heuristic::Euclidean => distance(from, to),
            Heuristic::EuclideanSquared => distance_squared(from, to),
            Heuristic::Manhattan => manhattan_distance(from, to),
            Heuristic::Zero => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 0.0, 4.0);

        assert_eq!(Heuristic::Euclidean.estimate(&a, &b), 5.0);
        assert_eq!(Heuristic::EuclideanSquared.estimate(&a, &b), 25.0);
        assert_eq!(Heuristic::Manhattan.estimate(&a, &b), 7.0);
        assert_eq!(Heuristic::Zero.estimate(&a, &b), 0.0);
        assert_eq!(Heuristic::default(), Heuristic::Euclidean);
    }
}
