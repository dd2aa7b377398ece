/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for faster neighbour lookups.
 * It divides the world into cells at least as wide as the perception radius,
 * so every boid a query can see lies in the 3x3 block of cells around it.
 * Candidates from that block are filtered with the exact distance test and
 * visited in index order, which keeps the results identical to the
 * brute-force query in the perception module.
 *
 * Positions outside the world are clamped into the border cells (walls) or
 * wrapped around (torus).
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::perception::{self, Metric, NeighborPolicy, PerceivedNeighbor};

// Upper bound on cells per axis; tiny radii get coarser cells instead
const MAX_CELLS_PER_AXIS: usize = 256;

// Cells are made slightly wider than requested so boundary rounding never
// pushes a visible neighbour outside the 3x3 block
const CELL_SLACK: f32 = 1.001;

pub struct SpatialGrid {
    pub cell_width: f32,
    pub cell_height: f32,
    pub columns: usize,
    pub rows: usize,
    wrap: bool,
    cells: Vec<Vec<usize>>,
}

fn cells_along(extent: f32, min_cell_size: f32) -> usize {
    let count = (extent / (min_cell_size * CELL_SLACK)).floor();
    // inf (zero radius) and tiny radii saturate at the cap
    count.clamp(1.0, MAX_CELLS_PER_AXIS as f32) as usize
}

impl SpatialGrid {
    pub fn new(min_cell_size: f32, width: f32, height: f32, wrap: bool) -> Self {
        let columns = cells_along(width, min_cell_size);
        let rows = cells_along(height, min_cell_size);

        Self {
            cell_width: width / columns as f32,
            cell_height: height / rows as f32,
            columns,
            rows,
            wrap,
            cells: vec![Vec::new(); columns * rows],
        }
    }

    // Build a grid holding every boid of the snapshot
    pub fn build(boids: &[Boid], min_cell_size: f32, width: f32, height: f32, wrap: bool) -> Self {
        let mut grid = Self::new(min_cell_size, width, height, wrap);
        for (i, boid) in boids.iter().enumerate() {
            grid.insert(i, boid.position);
        }
        grid
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    // Cell coordinates of a position, kept within one cell of the grid so the
    // 3x3 offsets never overflow
    #[inline]
    fn raw_cell(&self, position: Vec2) -> (i64, i64) {
        (
            self.bound_axis((position.x / self.cell_width).floor(), self.columns),
            self.bound_axis((position.y / self.cell_height).floor(), self.rows),
        )
    }

    #[inline]
    fn bound_axis(&self, coordinate: f32, count: usize) -> i64 {
        // saturating cast; NaN lands on 0
        let coordinate = coordinate as i64;
        let count = count as i64;
        if self.wrap {
            coordinate.rem_euclid(count)
        } else {
            coordinate.clamp(-1, count)
        }
    }

    #[inline]
    fn fold_axis(&self, coordinate: i64, count: usize) -> usize {
        let count = count as i64;
        if self.wrap {
            coordinate.rem_euclid(count) as usize
        } else {
            coordinate.clamp(0, count - 1) as usize
        }
    }

    #[inline]
    fn cell_index(&self, column: i64, row: i64) -> usize {
        self.fold_axis(row, self.rows) * self.columns + self.fold_axis(column, self.columns)
    }

    // Insert a boid into the grid
    #[inline]
    pub fn insert(&mut self, boid_index: usize, position: Vec2) {
        let (column, row) = self.raw_cell(position);
        let cell = self.cell_index(column, row);
        self.cells[cell].push(boid_index);
    }

    // Boid indices in and around the cell holding `position`, ascending
    pub fn nearby_indices(&self, position: Vec2) -> Vec<usize> {
        let (column, row) = self.raw_cell(position);

        let mut block: Vec<usize> = Vec::with_capacity(9);
        for row_offset in -1..=1 {
            for column_offset in -1..=1 {
                let cell = self.cell_index(column + column_offset, row + row_offset);
                block.push(cell);
            }
        }
        // Clamping and small wrapped grids fold several offsets onto one cell
        block.sort_unstable();
        block.dedup();

        let mut result: Vec<usize> = block
            .iter()
            .flat_map(|&cell| self.cells[cell].iter().copied())
            .collect();
        result.sort_unstable();
        result
    }

    pub fn seen_boids(
        &self,
        index: usize,
        boids: &[Boid],
        radius: f32,
        policy: NeighborPolicy,
        metric: Metric,
    ) -> Vec<PerceivedNeighbor> {
        let candidates = self.nearby_indices(boids[index].position);
        perception::seen_among(index, boids, candidates, radius, policy, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scattered_boids(n: usize, width: f32, height: f32, seed: u64) -> Vec<Boid> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                Boid::new(
                    rng.gen_range(-50.0..width + 50.0),
                    rng.gen_range(-50.0..height + 50.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_cells_cover_radius() {
        let grid = SpatialGrid::new(75.0, 1200.0, 800.0, false);
        assert!(grid.cell_width >= 75.0);
        assert!(grid.cell_height >= 75.0);
        assert_eq!(grid.columns, 15);
        assert_eq!(grid.rows, 10);
    }

    #[test]
    fn test_zero_radius_caps_cell_count() {
        let grid = SpatialGrid::new(0.0, 1200.0, 800.0, false);
        assert_eq!(grid.columns, MAX_CELLS_PER_AXIS);
        assert_eq!(grid.rows, MAX_CELLS_PER_AXIS);
    }

    #[test]
    fn test_insert_and_clear() {
        let mut grid = SpatialGrid::new(10.0, 100.0, 100.0, false);
        grid.insert(0, vec2(5.0, 5.0));
        grid.insert(1, vec2(-500.0, 5.0));
        assert_eq!(grid.nearby_indices(vec2(1.0, 1.0)), vec![0, 1]);

        grid.clear();
        assert!(grid.nearby_indices(vec2(1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_small_wrapped_grid_has_no_duplicates() {
        let boids = vec![Boid::new(10.0, 10.0, 0.0, 0.0), Boid::new(90.0, 90.0, 0.0, 0.0)];
        let grid = SpatialGrid::build(&boids, 60.0, 100.0, 100.0, true);
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.nearby_indices(vec2(50.0, 50.0)), vec![0, 1]);
    }

    #[test]
    fn test_grid_matches_brute_force_with_walls() {
        let boids = scattered_boids(400, 600.0, 400.0, 5);
        let radius = 40.0;
        let grid = SpatialGrid::build(&boids, radius, 600.0, 400.0, false);

        for i in 0..boids.len() {
            let expected =
                perception::seen_boids(i, &boids, radius, NeighborPolicy::ExcludeSelf, Metric::Euclidean);
            let actual = grid.seen_boids(i, &boids, radius, NeighborPolicy::ExcludeSelf, Metric::Euclidean);
            assert_eq!(actual, expected, "boid {}", i);
        }
    }

    #[test]
    fn test_grid_matches_brute_force_on_torus() {
        let mut boids = scattered_boids(300, 500.0, 300.0, 9);
        for boid in &mut boids {
            boid.wrap_edges(500.0, 300.0);
        }
        let radius = 35.0;
        let metric = Metric::Toroidal { width: 500.0, height: 300.0 };
        let grid = SpatialGrid::build(&boids, radius, 500.0, 300.0, true);

        for i in 0..boids.len() {
            let expected = perception::seen_boids(i, &boids, radius, NeighborPolicy::IncludeSelf, metric);
            let actual = grid.seen_boids(i, &boids, radius, NeighborPolicy::IncludeSelf, metric);
            assert_eq!(actual, expected, "boid {}", i);
        }
    }

    #[test]
    fn test_far_away_boids_match_brute_force() {
        let boids = vec![
            Boid::new(1.0e30, 400.0, 0.0, 0.0),
            Boid::new(-1.0e30, 400.0, 0.0, 0.0),
            Boid::new(600.0, f32::INFINITY, 0.0, 0.0),
            Boid::new(600.0, 400.0, 0.0, 0.0),
            Boid::new(610.0, 400.0, 0.0, 0.0),
        ];
        let grid = SpatialGrid::build(&boids, 75.0, 1200.0, 800.0, false);

        for i in 0..boids.len() {
            let expected = perception::seen_boids(i, &boids, 75.0, NeighborPolicy::ExcludeSelf, Metric::Euclidean);
            let actual = grid.seen_boids(i, &boids, 75.0, NeighborPolicy::ExcludeSelf, Metric::Euclidean);
            assert_eq!(actual, expected, "boid {}", i);
        }
    }

    #[test]
    fn test_far_away_boids_on_torus_land_in_a_cell() {
        let mut grid = SpatialGrid::new(75.0, 1200.0, 800.0, true);
        grid.insert(0, vec2(1.0e30, -1.0e30));
        grid.insert(1, vec2(f32::NEG_INFINITY, 400.0));

        let total: usize = (0..grid.rows)
            .flat_map(|row| (0..grid.columns).map(move |column| (column, row)))
            .map(|(column, row)| {
                let centre = vec2(
                    (column as f32 + 0.5) * grid.cell_width,
                    (row as f32 + 0.5) * grid.cell_height,
                );
                grid.nearby_indices(centre).len()
            })
            .sum();
        // each boid shows up in the 3x3 blocks of nine cells
        assert_eq!(total, 18);
    }
}
