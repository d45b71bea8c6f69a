//! The six axis-aligned directions of the voxel grid.
//!
//! A [`Direction`] names a voxel face. Traversal code reports the face a ray
//! entered through, so a ray moving towards +X enters through [`Direction::West`].

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis (`X = 0`, `Y = 1`, `Z = 2`).
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-aligned unit direction.
///
/// Negative directions are `West` (-X), `Down` (-Y) and `North` (-Z).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    Down,
    Up,
    North,
    South,
}

impl Direction {
    /// All directions in ordinal order.
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
    ];

    /// Directions lying in the horizontal (XZ) plane.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// Directions along the Y axis.
    pub const VERTICAL: [Direction; 2] = [Direction::Down, Direction::Up];

    /// Returns the direction pointing the other way along the same axis.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    /// Ordinal of this direction within [`Direction::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a direction by ordinal. Returns `None` for `index >= 6`.
    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// The axis this direction runs along.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::West | Direction::East => Axis::X,
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
        }
    }

    /// Whether this direction points towards the positive end of its axis.
    pub const fn is_positive(self) -> bool {
        matches!(self, Direction::East | Direction::Up | Direction::South)
    }

    /// Unit integer vector pointing in this direction.
    pub const fn normal(self) -> IVec3 {
        match self {
            Direction::West => IVec3::new(-1, 0, 0),
            Direction::East => IVec3::new(1, 0, 0),
            Direction::Down => IVec3::new(0, -1, 0),
            Direction::Up => IVec3::new(0, 1, 0),
            Direction::North => IVec3::new(0, 0, -1),
            Direction::South => IVec3::new(0, 0, 1),
        }
    }

    /// Returns the direction whose axis has the largest absolute component of `v`.
    ///
    /// `|x|` is compared against `|y|` first and then `|z|`, so X wins any tie
    /// it takes part in. A tie between Y and Z goes to Y. The zero vector
    /// classifies as [`Direction::East`].
    pub fn classify(v: DVec3) -> Direction {
        let a = v.abs();
        if a.x >= a.y {
            if a.x >= a.z {
                Self::along(v.x, Direction::West, Direction::East)
            } else {
                Self::along(v.z, Direction::North, Direction::South)
            }
        } else if a.y >= a.z {
            Self::along(v.y, Direction::Down, Direction::Up)
        } else {
            Self::along(v.z, Direction::North, Direction::South)
        }
    }

    /// The face a ray enters through when it steps along `axis` with the
    /// given sign: stepping +X enters a voxel through its west face.
    pub const fn entered_through(axis: Axis, positive: bool) -> Direction {
        match (axis, positive) {
            (Axis::X, true) => Direction::West,
            (Axis::X, false) => Direction::East,
            (Axis::Y, true) => Direction::Down,
            (Axis::Y, false) => Direction::Up,
            (Axis::Z, true) => Direction::North,
            (Axis::Z, false) => Direction::South,
        }
    }

    fn along(component: f64, negative: Direction, positive: Direction) -> Direction {
        if component < 0.0 { negative } else { positive }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().axis(), dir.axis());
        }
    }

    #[test]
    fn test_opposite_pairs() {
        assert_eq!(Direction::West.opposite(), Direction::East);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::North.opposite(), Direction::South);
    }

    #[test]
    fn test_from_index_matches_ordinal() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(Direction::from_index(i), Some(*dir));
            assert_eq!(dir.index(), i);
        }
        assert_eq!(Direction::from_index(6), None);
    }

    #[test]
    fn test_horizontal_and_vertical_partition_all() {
        for dir in Direction::ALL {
            let horizontal = Direction::HORIZONTAL.contains(&dir);
            let vertical = Direction::VERTICAL.contains(&dir);
            assert!(horizontal ^ vertical, "{dir:?} must be in exactly one group");
            assert_eq!(vertical, dir.axis() == Axis::Y);
        }
    }

    #[test]
    fn test_normal_sum_of_opposites_is_zero() {
        for dir in Direction::ALL {
            assert_eq!(dir.normal() + dir.opposite().normal(), IVec3::ZERO);
            assert_eq!(dir.is_positive(), dir.normal().element_sum() > 0);
        }
    }

    #[test]
    fn test_classify_dominant_axis() {
        assert_eq!(Direction::classify(DVec3::new(3.0, 1.0, -2.0)), Direction::East);
        assert_eq!(Direction::classify(DVec3::new(-3.0, 1.0, 2.0)), Direction::West);
        assert_eq!(Direction::classify(DVec3::new(0.1, -5.0, 2.0)), Direction::Down);
        assert_eq!(Direction::classify(DVec3::new(0.1, 5.0, 2.0)), Direction::Up);
        assert_eq!(Direction::classify(DVec3::new(0.1, 1.0, -2.0)), Direction::North);
        assert_eq!(Direction::classify(DVec3::new(0.1, 1.0, 2.0)), Direction::South);
    }

    #[test]
    fn test_classify_tie_breaks() {
        // X wins every tie it takes part in.
        assert_eq!(Direction::classify(DVec3::new(1.0, 1.0, 0.0)), Direction::East);
        assert_eq!(Direction::classify(DVec3::new(-1.0, 0.0, 1.0)), Direction::West);
        assert_eq!(Direction::classify(DVec3::new(1.0, -1.0, 1.0)), Direction::East);
        // Y beats Z on a tie once X is out of the running.
        assert_eq!(Direction::classify(DVec3::new(0.0, 2.0, -2.0)), Direction::Up);
        // Z wins only when strictly larger than both.
        assert_eq!(Direction::classify(DVec3::new(1.0, 0.5, 1.5)), Direction::South);
    }

    #[test]
    fn test_classify_zero_vector_is_deterministic() {
        assert_eq!(Direction::classify(DVec3::ZERO), Direction::East);
    }

    #[test]
    fn test_entered_through_faces_back_along_step() {
        for dir in Direction::ALL {
            let face = Direction::entered_through(dir.axis(), dir.is_positive());
            assert_eq!(face, dir.opposite());
        }
    }
}
