//! Two-layer grid scoring.
//!
//! The *placement heuristic* ranks candidate placements inside the search —
//! it favors square-ish grids, penalizes bounding-box growth, and rewards
//! crossings. The *overall score* ranks finished grids for the caller as a
//! weighted sum of four `[0,1]` components. The weights are parameters and
//! deliberately not normalized to sum to 1: candidates are compared against
//! each other, never against an absolute scale.

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Grid, PlacedWord};

/// Weights for the four overall-score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub compactness: f64,
    pub density: f64,
    pub intersection: f64,
    pub symmetry: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { compactness: 0.4, density: 0.2, intersection: 0.3, symmetry: 0.1 }
    }
}

/// The four component scores of a finished grid, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub compactness: f64,
    pub density: f64,
    pub intersections: f64,
    pub symmetry: f64,
}

impl ComponentScores {
    pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
        weights.compactness * self.compactness
            + weights.density * self.density
            + weights.intersection * self.intersections
            + weights.symmetry * self.symmetry
    }
}

/// Compute all four components. The empty grid scores 0 everywhere —
/// never NaN.
pub fn component_scores(grid: &Grid) -> ComponentScores {
    let Some(bounds) = grid.bounds() else {
        return ComponentScores::default();
    };

    let width = f64::from(bounds.width());
    let height = f64::from(bounds.height());
    let area = width * height;
    let filled = grid.filled() as f64;

    let aspect = width.min(height) / width.max(height);
    let fill = filled / area;

    let compactness = 0.5 * aspect + 0.5 * fill;
    let density = fill;

    // A *crossing* is any cell covered by two or more placed words. With
    // n words a connected grid needs n-1 crossings, so that is the scale;
    // below two words there is nothing to cross and the component is 0.
    let placed = grid.placed().len();
    let intersections = if placed < 2 {
        0.0
    } else {
        (grid.crossing_count() as f64 / (placed as f64 - 1.0)).min(1.0)
    };

    ComponentScores {
        compactness,
        density,
        intersections,
        symmetry: symmetry_score(grid),
    }
}

/// Fraction of filled cells whose point-reflection across the grid's
/// geometric center is also filled. The center may sit on a half-integer,
/// so mirror coordinates are rounded before lookup — this keeps the score
/// stable across translation-equivalent grids.
fn symmetry_score(grid: &Grid) -> f64 {
    let Some(bounds) = grid.bounds() else {
        return 0.0;
    };
    let center_row = f64::from(bounds.min_row + bounds.max_row) / 2.0;
    let center_col = f64::from(bounds.min_col + bounds.max_col) / 2.0;

    let mut hits = 0usize;
    let mut total = 0usize;
    for ((row, col), _) in grid.cells() {
        let mirror_row = (2.0 * center_row - f64::from(row)).round() as i32;
        let mirror_col = (2.0 * center_col - f64::from(col)).round() as i32;
        if grid.get(mirror_row, mirror_col).is_some() {
            hits += 1;
        }
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64
}

/// Weighted overall score for a finished grid.
pub fn overall_score(grid: &Grid, weights: &ScoreWeights) -> f64 {
    component_scores(grid).weighted(weights)
}

/// Mix an external per-word fun percentile into the grid score. This is the
/// generator's only dependency on the curation layer.
pub fn blend_with_fun(grid_score: f64, fun_score: Option<f64>) -> f64 {
    match fun_score {
        Some(fun) => 0.85 * grid_score + 0.15 * fun,
        None => grid_score,
    }
}

/// Rank a validated candidate placement inside the search:
/// `aspect × 100 − expansion_penalty + intersections × 10`, where the aspect
/// ratio and expansion penalty are taken from the *hypothetical* bounding box
/// after the placement. On an empty grid every candidate is worth 100.
pub fn placement_score(
    grid: &Grid,
    word: &str,
    row: i32,
    col: i32,
    direction: Direction,
    intersections: usize,
) -> f64 {
    let Some(old_bounds) = grid.bounds() else {
        return 100.0;
    };

    let mut new_bounds = old_bounds;
    for ((cell_row, cell_col), _) in PlacedWord::new(word, row, col, direction).cells() {
        new_bounds.include(cell_row, cell_col);
    }

    let width = f64::from(new_bounds.width());
    let height = f64::from(new_bounds.height());
    let aspect = width.min(height) / width.max(height);
    let expansion = new_bounds.area() as f64 - old_bounds.area() as f64;

    aspect * 100.0 - expansion + intersections as f64 * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PlacedWord;

    fn crossed_grid() -> Grid {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("CAT", 0, 0, Direction::Horizontal)).unwrap();
        grid.place_word(PlacedWord::new("ACT", 0, 1, Direction::Vertical)).unwrap();
        grid
    }

    #[test]
    fn empty_grid_scores_zero_not_nan() {
        let scores = component_scores(&Grid::new());
        assert_eq!(ComponentScores::default(), scores);
        let overall = overall_score(&Grid::new(), &ScoreWeights::default());
        assert_eq!(0.0, overall);
        assert!(!overall.is_nan());
    }

    #[test]
    fn components_bounded() {
        let scores = component_scores(&crossed_grid());
        for value in [scores.compactness, scores.density, scores.intersections, scores.symmetry] {
            assert!((0.0..=1.0).contains(&value), "component out of range: {value}");
        }
    }

    #[test]
    fn single_word_has_zero_intersections_component() {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("CAT", 0, 0, Direction::Horizontal)).unwrap();
        let scores = component_scores(&grid);
        assert_eq!(0.0, scores.intersections);
        assert!(!scores.intersections.is_nan());
    }

    #[test]
    fn crossing_pair_saturates_intersections() {
        // Two words, one crossing: 1 / (2-1) = 1.0.
        let scores = component_scores(&crossed_grid());
        assert_eq!(1.0, scores.intersections);
    }

    #[test]
    fn single_row_density_is_full() {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("CAT", 0, 0, Direction::Horizontal)).unwrap();
        let scores = component_scores(&grid);
        assert_eq!(1.0, scores.density);
        // 3x1 box: aspect 1/3.
        assert!((scores.compactness - (0.5 / 3.0 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn symmetry_of_single_cell_is_perfect() {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("A", 0, 0, Direction::Horizontal)).unwrap();
        assert_eq!(1.0, component_scores(&grid).symmetry);
    }

    #[test]
    fn weights_are_linear() {
        let grid = crossed_grid();
        let scores = component_scores(&grid);
        let weights = ScoreWeights { compactness: 1.0, density: 0.0, intersection: 0.0, symmetry: 0.0 };
        assert!((overall_score(&grid, &weights) - scores.compactness).abs() < 1e-12);
    }

    #[test]
    fn fun_blending() {
        assert_eq!(0.5, blend_with_fun(0.5, None));
        let blended = blend_with_fun(0.5, Some(1.0));
        assert!((blended - (0.85 * 0.5 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn empty_grid_placement_scores_flat_100() {
        let grid = Grid::new();
        assert_eq!(100.0, placement_score(&grid, "CAT", 0, 0, Direction::Horizontal, 0));
        assert_eq!(100.0, placement_score(&grid, "CAT", 0, 0, Direction::Vertical, 0));
    }

    #[test]
    fn heuristic_prefers_crossings_and_compactness() {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("CAT", 0, 0, Direction::Horizontal)).unwrap();
        // Crossing vertically through the middle beats dangling off the end.
        let crossing = placement_score(&grid, "ACT", 0, 1, Direction::Vertical, 1);
        let dangling = placement_score(&grid, "ACT", 0, 1, Direction::Vertical, 0);
        assert!(crossing > dangling);
    }
}
