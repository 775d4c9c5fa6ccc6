/// Terrain kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so terrain semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Terrain {
    #[default]
    Grass,
    Mountain, // Impassable
    Forest,
    Water,    // Impassable
}

/// Display metadata for one terrain kind. Static, never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileMeta {
    pub symbol: &'static str,
    /// Background colour as RGB.
    pub background: (u8, u8, u8),
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Grass, Terrain::Mountain, Terrain::Forest, Terrain::Water];

    /// Can an entity occupy a cell of this terrain?
    pub fn is_passable(self) -> bool {
        matches!(self, Terrain::Grass | Terrain::Forest)
    }

    pub fn meta(self) -> TileMeta {
        match self {
            Terrain::Grass    => TileMeta { symbol: "🌿", background: (0x3B, 0x7A, 0x23) },
            Terrain::Mountain => TileMeta { symbol: "⛰️", background: (0xA0, 0x52, 0x2D) },
            Terrain::Forest   => TileMeta { symbol: "🌲", background: (0x1B, 0x4D, 0x1B) },
            Terrain::Water    => TileMeta { symbol: "🌊", background: (0x41, 0x69, 0xE1) },
        }
    }
}

/// Fixed-size terrain grid addressed `[row][col]`.
/// Immutable after generation; everything else only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainGrid {
    cells: Vec<Vec<Terrain>>,
    width: usize,
    height: usize,
}

impl TerrainGrid {
    /// A grid of the default terrain.
    pub fn filled(width: usize, height: usize, terrain: Terrain) -> Self {
        TerrainGrid { cells: vec![vec![terrain; width]; height], width, height }
    }

    /// Build from explicit rows. All rows must have the same length.
    pub fn from_rows(cells: Vec<Vec<Terrain>>) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, |r| r.len());
        debug_assert!(cells.iter().all(|r| r.len() == width), "ragged terrain rows");
        TerrainGrid { cells, width, height }
    }

    #[inline]
    pub fn width(&self) -> usize { self.width }

    #[inline]
    pub fn height(&self) -> usize { self.height }

    pub fn rows(&self) -> &[Vec<Terrain>] {
        &self.cells
    }

    /// Terrain at a grid cell, `None` when out of bounds.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<Terrain> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Painting is only used by the generator.
    #[inline]
    pub(crate) fn set(&mut self, col: usize, row: usize, terrain: Terrain) {
        if row < self.height && col < self.width {
            self.cells[row][col] = terrain;
        }
    }

    /// Is the grid cell in bounds and passable? Out of bounds = wall.
    #[inline]
    pub fn is_passable_cell(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 { return false; }
        self.get(col as usize, row as usize).map_or(false, Terrain::is_passable)
    }

    /// Is the continuous position inside a passable cell?
    /// The containing cell is found by flooring both coordinates.
    #[inline]
    pub fn is_passable_at(&self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() { return false; }
        self.is_passable_cell(x.floor() as i64, y.floor() as i64)
    }

    /// Count of cells of each kind, in `Terrain::ALL` order.
    pub fn census(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for t in self.cells.iter().flatten() {
            let i = Terrain::ALL.iter().position(|k| k == t).unwrap_or(0);
            counts[i] += 1;
        }
        counts
    }
}
