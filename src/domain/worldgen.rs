/// World generation: blob-based region painting.
///
/// The grid starts as grass. Noisy-edged circular blobs are then stamped in
/// a fixed order: water, mountain, forest. Later kinds overwrite earlier ones
/// where blobs overlap, so the order decides the final terrain mix.

use std::ops::RangeInclusive;

use rand::Rng;

use super::terrain::{Terrain, TerrainGrid};
use crate::error::SimError;

/// One painting pass: how many blobs of which kind, and how big.
struct BlobPass {
    terrain: Terrain,
    count: RangeInclusive<u32>,
    radius: RangeInclusive<u32>,
}

const PASSES: [BlobPass; 3] = [
    BlobPass { terrain: Terrain::Water,    count: 3..=5, radius: 5..=12 },
    BlobPass { terrain: Terrain::Mountain, count: 2..=3, radius: 6..=13 },
    BlobPass { terrain: Terrain::Forest,   count: 4..=6, radius: 8..=14 },
];

/// Fraction of the radius that edge noise may eat into.
const EDGE_NOISE: f32 = 0.3;

pub fn generate_world<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<TerrainGrid, SimError> {
    if width == 0 || height == 0 {
        return Err(SimError::EmptyWorld { width, height });
    }

    let mut grid = TerrainGrid::filled(width, height, Terrain::Grass);

    for pass in &PASSES {
        let blobs = rng.gen_range(pass.count.clone());
        for _ in 0..blobs {
            let cx = rng.gen_range(0..width) as f32;
            let cy = rng.gen_range(0..height) as f32;
            let radius = rng.gen_range(pass.radius.clone()) as f32;
            paint_blob(&mut grid, cx, cy, radius, pass.terrain, rng);
        }
    }

    let [grass, mountain, forest, water] = grid.census();
    log::debug!(
        "generated {width}x{height} world: grass={grass} forest={forest} water={water} mountain={mountain}"
    );
    Ok(grid)
}

/// Stamp one blob. A cell in the bounding box joins the blob when its
/// distance to the centre is below `radius - U(0, radius * EDGE_NOISE)`,
/// drawn fresh per cell, which roughens the edge.
fn paint_blob<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    cx: f32,
    cy: f32,
    radius: f32,
    terrain: Terrain,
    rng: &mut R,
) {
    let row_lo = (cy - radius).floor().max(0.0) as usize;
    let row_hi = ((cy + radius).floor().max(0.0) as usize).min(grid.height());
    let col_lo = (cx - radius).floor().max(0.0) as usize;
    let col_hi = ((cx + radius).floor().max(0.0) as usize).min(grid.width());

    for row in row_lo..row_hi {
        for col in col_lo..col_hi {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            let noise = rng.gen::<f32>() * radius * EDGE_NOISE;
            if distance < radius - noise {
                grid.set(col, row, terrain);
            }
        }
    }
}
