//! Texture atlas addressing.

/// Grid layout of a square texture atlas; slot `i` sits at column
/// `i % columns`, row `i / columns`, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
}

impl AtlasLayout {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// UV origin and tile size for an atlas slot. Slots past the grid wrap,
    /// which keeps bad indices visible instead of sampling out of range.
    pub fn uv_rect(&self, slot: u16) -> ([f32; 2], [f32; 2]) {
        let slot = slot as u32 % (self.columns * self.rows);
        let tile = [1.0 / self.columns as f32, 1.0 / self.rows as f32];
        let origin = [
            (slot % self.columns) as f32 * tile[0],
            (slot / self.columns) as f32 * tile[1],
        ];
        (origin, tile)
    }
}

impl Default for AtlasLayout {
    /// The stock 10×10 block atlas.
    fn default() -> Self {
        Self::new(10, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_rect_first_slot() {
        let atlas = AtlasLayout::default();
        let (origin, tile) = atlas.uv_rect(0);
        assert_eq!(origin, [0.0, 0.0]);
        assert_eq!(tile, [0.1, 0.1]);
    }

    #[test]
    fn test_uv_rect_wraps_rows() {
        let atlas = AtlasLayout::new(4, 4);
        let (origin, _) = atlas.uv_rect(5);
        assert_eq!(origin, [0.25, 0.25]);
    }

    #[test]
    fn test_out_of_grid_slot_wraps() {
        let atlas = AtlasLayout::new(2, 2);
        let (origin, _) = atlas.uv_rect(4);
        assert_eq!(origin, [0.0, 0.0]);
    }
}
