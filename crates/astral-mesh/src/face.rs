//! The six axis-aligned cube faces and their geometry.

use glam::IVec3;

/// One face of a voxel cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    /// -Z
    Back,
    /// +Z
    Front,
    /// -X
    Left,
    /// +X
    Right,
    /// -Y
    Bottom,
    /// +Y
    Top,
}

impl FaceDirection {
    pub const ALL: [Self; 6] = [
        Self::Back,
        Self::Front,
        Self::Left,
        Self::Right,
        Self::Bottom,
        Self::Top,
    ];

    /// Unit step towards the neighbor this face looks at.
    pub fn offset(self) -> IVec3 {
        match self {
            Self::Back => IVec3::new(0, 0, -1),
            Self::Front => IVec3::new(0, 0, 1),
            Self::Left => IVec3::new(-1, 0, 0),
            Self::Right => IVec3::new(1, 0, 0),
            Self::Bottom => IVec3::new(0, -1, 0),
            Self::Top => IVec3::new(0, 1, 0),
        }
    }

    /// The four corners of this face relative to the voxel's min corner,
    /// wound counter-clockwise when viewed from outside.
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Self::Back => [
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            Self::Front => [
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
            ],
            Self::Left => [
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
            ],
            Self::Right => [
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
            ],
            Self::Bottom => [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ],
            Self::Top => [
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
        }
    }

    /// Texture coordinates for the four corners, in the same order as
    /// [`corners`](Self::corners).
    pub fn corner_uvs() -> [[f32; 2]; 4] {
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_cover_all_axes() {
        let sum: IVec3 = FaceDirection::ALL.iter().map(|f| f.offset()).sum();
        assert_eq!(sum, IVec3::ZERO);
        for face in FaceDirection::ALL {
            assert_eq!(face.offset().abs().element_sum(), 1);
        }
    }

    #[test]
    fn test_corners_lie_on_face_plane() {
        for face in FaceDirection::ALL {
            let offset = face.offset();
            for corner in face.corners() {
                // The coordinate along the face axis is 0 or 1 matching the
                // offset direction.
                let (axis, sign) = if offset.x != 0 {
                    (corner[0], offset.x)
                } else if offset.y != 0 {
                    (corner[1], offset.y)
                } else {
                    (corner[2], offset.z)
                };
                let expected = if sign > 0 { 1.0 } else { 0.0 };
                assert_eq!(axis, expected, "{face:?} corner off its plane");
            }
        }
    }
}
