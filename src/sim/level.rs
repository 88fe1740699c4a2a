//! Procedural level layouts
//!
//! Layouts are a pure function of (level, seed): the same pair always yields
//! the same bricks, including bonus hit points.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::state::Brick;
use crate::consts::*;
use crate::{Color, scale_color};

/// Row palette, cycled (and brightened) past the tenth row
const BRICK_PALETTE: [Color; 10] = [
    [255, 99, 71],
    [255, 165, 0],
    [255, 215, 0],
    [144, 238, 144],
    [65, 105, 225],
    [186, 85, 211],
    [255, 182, 193],
    [135, 206, 235],
    [173, 216, 230],
    [152, 251, 152],
];

/// Base color of permanent bricks
pub const PERMANENT_COLOR: Color = [120, 120, 140];

/// Explosive bricks are drawn brighter than their row
const EXPLOSIVE_BRIGHTEN: f32 = 1.2;

/// Layout family, chosen by `(level - 1) % 5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every cell filled
    Full,
    /// Diagonal stripes of gaps
    Diagonal,
    /// Alternating rows with mirrored gaps, reinforced edges
    Fortress,
    /// Gapped rows and scattered permanent bricks
    Walls,
    /// Checkerboard with scattered explosive bricks
    Minefield,
}

impl Pattern {
    pub fn for_level(level: u32) -> Self {
        match level.saturating_sub(1) % 5 {
            0 => Pattern::Full,
            1 => Pattern::Diagonal,
            2 => Pattern::Fortress,
            3 => Pattern::Walls,
            _ => Pattern::Minefield,
        }
    }

    /// Whether a brick goes at (row, col)
    pub fn places(self, row: u32, col: u32) -> bool {
        match self {
            Pattern::Full => true,
            Pattern::Diagonal => (row + col) % 3 != 0,
            Pattern::Fortress => {
                if row % 2 == 0 {
                    return true;
                }
                let gap = row % BRICK_COLUMNS;
                col != gap && col != BRICK_COLUMNS - 1 - gap
            }
            Pattern::Walls => !(row % 4 == 1 && col % 2 == 0),
            Pattern::Minefield => (row + col) % 2 == 0 || row % 3 == 0,
        }
    }
}

/// Number of brick rows that fit above the bottom clearance
pub fn max_rows() -> u32 {
    ((FIELD_HEIGHT - BRICK_TOP_OFFSET - BRICK_BOTTOM_CLEARANCE) / (BRICK_HEIGHT + BRICK_PADDING))
        .floor() as u32
}

/// Rows for a level: one more per level, within [BRICK_MIN_ROWS, max_rows()]
pub fn rows_for_level(level: u32) -> u32 {
    let wanted = BRICK_ROWS + level.saturating_sub(1);
    wanted.clamp(BRICK_MIN_ROWS, max_rows().max(BRICK_MIN_ROWS))
}

/// Base hit points: one extra every four levels
pub fn base_hit_points(level: u32) -> u32 {
    1 + level.saturating_sub(1) / 4
}

/// Color of a brick row
pub fn row_color(row: u32) -> Color {
    let len = BRICK_PALETTE.len() as u32;
    let base = BRICK_PALETTE[(row % len) as usize];
    let cycle = row / len;
    if cycle == 0 {
        return base;
    }
    scale_color(base, 0.9 + 0.08 * (cycle % 4) as f32)
}

/// Top-left corner of the brick cell at (row, col)
pub fn cell_origin(row: u32, col: u32) -> Vec2 {
    Vec2::new(
        BRICK_LEFT_OFFSET + col as f32 * (BRICK_WIDTH + BRICK_PADDING),
        BRICK_TOP_OFFSET + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
    )
}

/// Per-level RNG, keyed by level number and run seed
fn level_rng(level: u32, seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64((level as u64).wrapping_mul(2654435761).wrapping_add(seed))
}

/// Generate the brick layout for a level
pub fn generate_level(level: u32, seed: u64) -> Vec<Brick> {
    let level = level.max(1);
    let mut rng = level_rng(level, seed);
    let rows = rows_for_level(level);
    let pattern = Pattern::for_level(level);
    let base_hp = base_hit_points(level);

    log::debug!("Generating level {} ({:?}, {} rows)", level, pattern, rows);

    let mut bricks = Vec::with_capacity((rows * BRICK_COLUMNS) as usize);
    for row in 0..rows {
        let row_base = row_color(row);
        for col in 0..BRICK_COLUMNS {
            if !pattern.places(row, col) {
                continue;
            }

            let origin = cell_origin(row, col);
            let mut hit_points = base_hp;
            let mut destructible = true;
            let mut explosive = false;
            let mut color = row_base;

            match pattern {
                Pattern::Fortress if col == 0 || col == BRICK_COLUMNS - 1 || row % 3 == 0 => {
                    hit_points += 1;
                }
                Pattern::Walls if (row + col) % 6 == 0 => {
                    destructible = false;
                    color = PERMANENT_COLOR;
                }
                Pattern::Minefield if (row + col) % 5 == 0 => {
                    explosive = true;
                    color = scale_color(color, EXPLOSIVE_BRIGHTEN);
                }
                _ => {}
            }

            // Drawn for every placed brick so layouts stay stable across patterns
            if rng.random::<f32>() < BONUS_HP_CHANCE {
                hit_points += 1;
            }

            bricks.push(Brick {
                id: bricks.len() as u32,
                rect: Rect::new(origin.x, origin.y, BRICK_WIDTH, BRICK_HEIGHT),
                color,
                hit_points,
                destructible,
                explosive,
            });
        }
    }

    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_scaling() {
        assert_eq!(max_rows(), 10);
        assert_eq!(rows_for_level(1), 6);
        assert_eq!(rows_for_level(3), 8);
        assert_eq!(rows_for_level(5), 10);
        assert_eq!(rows_for_level(40), 10);
    }

    #[test]
    fn test_level_one_is_full_grid() {
        let bricks = generate_level(1, 0);
        assert_eq!(bricks.len(), (6 * BRICK_COLUMNS) as usize);
        assert!(bricks.iter().all(|b| b.destructible && !b.explosive));
        assert!(bricks.iter().all(|b| b.hit_points == 1 || b.hit_points == 2));
    }

    #[test]
    fn test_generation_is_deterministic() {
        for level in 1..=12 {
            assert_eq!(generate_level(level, 42), generate_level(level, 42));
        }
    }

    #[test]
    fn test_patterns_differ() {
        let layouts: Vec<Vec<(u32, u32)>> = (1..=5)
            .map(|level| {
                (0..6)
                    .flat_map(|row| (0..BRICK_COLUMNS).map(move |col| (row, col)))
                    .filter(|&(row, col)| Pattern::for_level(level).places(row, col))
                    .collect()
            })
            .collect();
        for i in 0..layouts.len() {
            for j in (i + 1)..layouts.len() {
                assert_ne!(layouts[i], layouts[j], "patterns {} and {} match", i, j);
            }
        }
    }

    #[test]
    fn test_pattern_overrides() {
        // Level 3: fortress, edges reinforced
        let bricks = generate_level(3, 0);
        let edge = bricks.iter().find(|b| b.rect.x == BRICK_LEFT_OFFSET && b.rect.y > BRICK_TOP_OFFSET).unwrap();
        assert!(edge.hit_points >= base_hit_points(3) + 1);

        // Level 4: permanent bricks present
        let bricks = generate_level(4, 0);
        assert!(bricks.iter().any(|b| !b.destructible));
        assert!(bricks.iter().filter(|b| !b.destructible).all(|b| b.color == PERMANENT_COLOR));

        // Level 5: explosive bricks present
        let bricks = generate_level(5, 0);
        assert!(bricks.iter().any(|b| b.explosive));
    }

    #[test]
    fn test_base_hit_points() {
        assert_eq!(base_hit_points(1), 1);
        assert_eq!(base_hit_points(4), 1);
        assert_eq!(base_hit_points(5), 2);
        assert_eq!(base_hit_points(9), 3);
    }

    #[test]
    fn test_bricks_stay_inside_field() {
        for level in 1..=10 {
            for brick in generate_level(level, 9) {
                assert!(brick.rect.right() <= FIELD_WIDTH);
                assert!(brick.rect.bottom() <= FIELD_HEIGHT - BRICK_BOTTOM_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_row_color_cycles_brighter() {
        assert_eq!(row_color(0), BRICK_PALETTE[0]);
        assert_eq!(row_color(10), scale_color(BRICK_PALETTE[0], 0.98));
    }
}
