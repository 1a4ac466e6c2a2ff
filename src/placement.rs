//! The five-rule legality check for placing a word on a grid.
//!
//! The validator is pure: it never mutates the grid, and it reports the
//! *first* failing rule as a typed `Violation` so debugging tools can see
//! why a placement was rejected. The search itself only cares that a
//! candidate failed, not why — a rejected candidate is search progress,
//! not an error.

use std::fmt;

use crate::grid::{Direction, Grid};

/// Why a proposed placement is illegal. One variant per rule, checked in
/// this order; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// An occupied cell disagrees with the word's letter at that offset.
    LetterMismatch { at: (i32, i32), expected: char, found: char },
    /// A non-intersection cell has an occupied perpendicular neighbor,
    /// which would create adjacent parallel letters spelling unintended words.
    ParallelNeighbor { at: (i32, i32), neighbor: (i32, i32) },
    /// The cell immediately before the word's first letter is occupied.
    HeadNotClear { at: (i32, i32) },
    /// The cell immediately after the word's last letter is occupied.
    TailNotClear { at: (i32, i32) },
    /// The grid already has words but this placement crosses none of them.
    NotAnchored,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::LetterMismatch { at, expected, found } => write!(
                f,
                "letter mismatch at ({},{}): need {expected}, cell holds {found}",
                at.0, at.1
            ),
            Violation::ParallelNeighbor { at, neighbor } => write!(
                f,
                "cell ({},{}) would sit beside occupied cell ({},{})",
                at.0, at.1, neighbor.0, neighbor.1
            ),
            Violation::HeadNotClear { at } => {
                write!(f, "cell before the word at ({},{}) is occupied", at.0, at.1)
            }
            Violation::TailNotClear { at } => {
                write!(f, "cell after the word at ({},{}) is occupied", at.0, at.1)
            }
            Violation::NotAnchored => write!(f, "placement does not cross any existing word"),
        }
    }
}

/// What a successful validation learned about the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementFit {
    /// Number of cells where the word coincides with an existing letter.
    pub intersections: usize,
}

/// Check a proposed `(word, row, col, direction)` against a grid.
///
/// Rules, in fixed order: letter agreement on every occupied cell, empty
/// perpendicular neighbors for every non-intersection cell, empty cells
/// immediately before and after the word, and at least one intersection
/// once the grid is non-empty (the very first word is exempt).
pub fn validate(
    grid: &Grid,
    word: &str,
    row: i32,
    col: i32,
    direction: Direction,
) -> Result<PlacementFit, Violation> {
    let (dr, dc) = direction.delta();
    let len = word.len() as i32;

    // Letter agreement; collect which offsets are intersection cells.
    let mut is_intersection = vec![false; word.len()];
    for (i, expected) in word.chars().enumerate() {
        let at = (row + dr * i as i32, col + dc * i as i32);
        if let Some(found) = grid.get(at.0, at.1) {
            if found != expected {
                return Err(Violation::LetterMismatch { at, expected, found });
            }
            is_intersection[i] = true;
        }
    }

    // No parallel adjacency on fresh cells. Perpendicular neighbors of
    // an intersection cell belong to the crossing word and are fine.
    let (pr, pc) = direction.perpendicular().delta();
    for (i, crossing) in is_intersection.iter().enumerate() {
        if *crossing {
            continue;
        }
        let at = (row + dr * i as i32, col + dc * i as i32);
        for side in [-1, 1] {
            let neighbor = (at.0 + pr * side, at.1 + pc * side);
            if grid.get(neighbor.0, neighbor.1).is_some() {
                return Err(Violation::ParallelNeighbor { at, neighbor });
            }
        }
    }

    // The cell before the first letter must be empty.
    let head = (row - dr, col - dc);
    if grid.get(head.0, head.1).is_some() {
        return Err(Violation::HeadNotClear { at: head });
    }

    // The cell after the last letter must be empty.
    let tail = (row + dr * len, col + dc * len);
    if grid.get(tail.0, tail.1).is_some() {
        return Err(Violation::TailNotClear { at: tail });
    }

    // Anchored placement once anything is on the board.
    let intersections = is_intersection.iter().filter(|&&x| x).count();
    if !grid.is_empty() && intersections == 0 {
        return Err(Violation::NotAnchored);
    }

    Ok(PlacementFit { intersections })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PlacedWord;

    fn grid_with_cat() -> Grid {
        let mut grid = Grid::new();
        grid.place_word(PlacedWord::new("CAT", 0, 0, Direction::Horizontal)).unwrap();
        grid
    }

    #[test]
    fn first_word_on_empty_grid_is_exempt_from_anchoring() {
        let grid = Grid::new();
        let fit = validate(&grid, "CAT", 0, 0, Direction::Horizontal).unwrap();
        assert_eq!(0, fit.intersections);
    }

    #[test]
    fn crossing_placement_passes_with_intersection() {
        let grid = grid_with_cat();
        // ACT vertical through the 'A' of CAT.
        let fit = validate(&grid, "ACT", 0, 1, Direction::Vertical).unwrap();
        assert_eq!(1, fit.intersections);
    }

    #[test]
    fn mismatched_letter_rejected() {
        let grid = grid_with_cat();
        let err = validate(&grid, "DOG", 0, 0, Direction::Vertical).unwrap_err();
        assert_eq!(
            Violation::LetterMismatch { at: (0, 0), expected: 'D', found: 'C' },
            err
        );
    }

    #[test]
    fn parallel_adjacency_rejected() {
        let grid = grid_with_cat();
        // TAB horizontal directly below CAT: no shared cell, three parallel
        // neighbor pairs.
        let err = validate(&grid, "TAB", 1, 0, Direction::Horizontal).unwrap_err();
        assert!(matches!(err, Violation::ParallelNeighbor { .. }));
    }

    #[test]
    fn head_cell_must_be_clear() {
        let grid = grid_with_cat();
        // "TS" at (0,3) would extend CAT: its head cell (0,2) holds the 'T'.
        let err = validate(&grid, "TS", 0, 3, Direction::Horizontal).unwrap_err();
        assert_eq!(Violation::HeadNotClear { at: (0, 2) }, err);
    }

    #[test]
    fn tail_cell_must_be_clear() {
        let grid = grid_with_cat();
        // "SC" ending right before CAT's 'C' leaves its tail on the 'C'.
        let err = validate(&grid, "SC", 0, -2, Direction::Horizontal).unwrap_err();
        assert_eq!(Violation::TailNotClear { at: (0, 0) }, err);
    }

    #[test]
    fn unanchored_placement_rejected() {
        let grid = grid_with_cat();
        let err = validate(&grid, "DOG", 5, 5, Direction::Horizontal).unwrap_err();
        assert_eq!(Violation::NotAnchored, err);
    }

    #[test]
    fn rules_checked_in_order() {
        let grid = grid_with_cat();
        // A placement that both mismatches a letter and fails to anchor
        // must report the mismatch (the earlier rule).
        let err = validate(&grid, "DOG", 0, 0, Direction::Horizontal).unwrap_err();
        assert!(matches!(err, Violation::LetterMismatch { .. }));
    }

    #[test]
    fn validator_is_pure() {
        let grid = grid_with_cat();
        let before = grid.clone();
        let _ = validate(&grid, "ACT", 0, 1, Direction::Vertical);
        let _ = validate(&grid, "DOG", 5, 5, Direction::Horizontal);
        assert_eq!(before, grid);
    }
}
