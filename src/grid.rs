/// Logical grid dimensions in cells (`COLS × ROWS`).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Builds a grid size, clamping both axes to at least one cell.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Computes `floor(viewport / tile)` on both axes, never below one cell.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, tile: TileSize) -> Self {
        Self::new(
            axis_cells(viewport.width, tile.width),
            axis_cells(viewport.height, tile.height),
        )
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Viewport dimensions in the caller's units (canvas pixels or terminal cells).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Size of one grid tile in viewport units.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TileSize {
    pub width: u16,
    pub height: u16,
}

fn axis_cells(extent: u16, tile: u16) -> u16 {
    if tile == 0 {
        return extent;
    }
    extent / tile
}
