use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GenerateError;
use crate::placement::Violation;

/// Orientation of a placed word.
///
/// A horizontal word extends from its anchor cell in the +col direction,
/// a vertical word in the +row direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }

    /// Per-letter step as `(row_delta, col_delta)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }
}

/// A word fixed on the grid: text plus anchor cell plus orientation.
/// Coordinates are signed — the grid is unbounded during placement and only
/// translated into the non-negative quadrant at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
}

impl PlacedWord {
    pub fn new(word: impl Into<String>, row: i32, col: i32, direction: Direction) -> Self {
        Self { word: word.into(), row, col, direction }
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// The cells this word occupies, in word order, with the expected letter.
    pub fn cells(&self) -> impl Iterator<Item = ((i32, i32), char)> + '_ {
        let (dr, dc) = self.direction.delta();
        self.word.chars().enumerate().map(move |(i, ch)| {
            ((self.row + dr * i as i32, self.col + dc * i as i32), ch)
        })
    }
}

/// Tight bounding box over all written cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl Bounds {
    fn of(row: i32, col: i32) -> Self {
        Self { min_row: row, max_row: row, min_col: col, max_col: col }
    }

    pub(crate) fn include(&mut self, row: i32, col: i32) {
        self.min_row = self.min_row.min(row);
        self.max_row = self.max_row.max(row);
        self.min_col = self.min_col.min(col);
        self.max_col = self.max_col.max(col);
    }

    pub fn width(&self) -> u32 {
        (self.max_col - self.min_col + 1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_row - self.min_row + 1) as u32
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// Sparse crossword grid: cell map, placement history, and bounding box.
///
/// Invariants:
/// - every letter of every placed word corresponds to exactly one cell with
///   that letter;
/// - `bounds` tightly encloses `cells` (and is `None` only when empty);
/// - any grid returned from the search is 4-connected.
///
/// Backtracking relies on clone-before-place: `place_word` is the only
/// mutator, and a failed branch simply drops its clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(with = "cells_serde")]
    cells: BTreeMap<(i32, i32), char>,
    placed: Vec<PlacedWord>,
    bounds: Option<Bounds>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Letter at `(row, col)`, if any.
    pub fn get(&self, row: i32, col: i32) -> Option<char> {
        self.cells.get(&(row, col)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of filled cells.
    pub fn filled(&self) -> usize {
        self.cells.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Placed words in placement order.
    pub fn placed(&self) -> &[PlacedWord] {
        &self.placed
    }

    /// Iterate filled cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((i32, i32), char)> + '_ {
        self.cells.iter().map(|(&pos, &ch)| (pos, ch))
    }

    fn set(&mut self, row: i32, col: i32, ch: char) {
        self.cells.insert((row, col), ch);
        match &mut self.bounds {
            Some(b) => b.include(row, col),
            None => self.bounds = Some(Bounds::of(row, col)),
        }
    }

    /// Write a word onto the grid.
    ///
    /// The caller is expected to have run the placement validator first; this
    /// method re-checks only letter agreement, because writing a conflicting
    /// letter would silently corrupt the grid. A conflict here is a
    /// programmer error and is surfaced immediately as `InvalidPlacement`.
    pub fn place_word(&mut self, placement: PlacedWord) -> Result<(), GenerateError> {
        for ((row, col), expected) in placement.cells() {
            if let Some(found) = self.get(row, col) {
                if found != expected {
                    return Err(GenerateError::InvalidPlacement {
                        rule: Violation::LetterMismatch { at: (row, col), expected, found },
                        at: (row, col),
                    });
                }
            }
        }
        for ((row, col), ch) in placement.cells() {
            self.set(row, col, ch);
        }
        self.placed.push(placement);
        Ok(())
    }

    /// True iff the filled cells form a single 4-connected component.
    /// The empty grid is vacuously connected.
    pub fn is_connected(&self) -> bool {
        let Some((&start, _)) = self.cells.iter().next() else {
            return true;
        };
        let mut seen = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some((row, col)) = queue.pop_front() {
            for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let next = (row + dr, col + dc);
                if self.cells.contains_key(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == self.cells.len()
    }

    /// Translate the grid so that `min_row == 0` and `min_col == 0`.
    pub fn normalize(&mut self) {
        let Some(bounds) = self.bounds else { return };
        let (dr, dc) = (-bounds.min_row, -bounds.min_col);
        if dr == 0 && dc == 0 {
            return;
        }
        let old = std::mem::take(&mut self.cells);
        self.cells = old
            .into_iter()
            .map(|((row, col), ch)| ((row + dr, col + dc), ch))
            .collect();
        for word in &mut self.placed {
            word.row += dr;
            word.col += dc;
        }
        self.bounds = Some(Bounds {
            min_row: 0,
            max_row: bounds.max_row + dr,
            min_col: 0,
            max_col: bounds.max_col + dc,
        });
    }

    /// Canonical fingerprint of the normalized cell layout, used to
    /// deduplicate grids that differ only in placement order:
    /// `"r,c:L"` fragments in row-major order joined by `|`.
    pub fn canonical_key(&self) -> String {
        self.cells
            .iter()
            .map(|(&(row, col), &ch)| format!("{row},{col}:{ch}"))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Number of cells covered by two or more placed words.
    pub fn crossing_count(&self) -> usize {
        let mut coverage: HashMap<(i32, i32), usize> = HashMap::new();
        for word in &self.placed {
            for (pos, _) in word.cells() {
                *coverage.entry(pos).or_insert(0) += 1;
            }
        }
        coverage.values().filter(|&&n| n >= 2).count()
    }
}

/// Render with `.` for empty cells — a debugging aid, not a wire format.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bounds) = self.bounds else {
            return write!(f, "(empty grid)");
        };
        for row in bounds.min_row..=bounds.max_row {
            for col in bounds.min_col..=bounds.max_col {
                write!(f, "{}", self.get(row, col).unwrap_or('.'))?;
            }
            if row < bounds.max_row {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// JSON-friendly cell encoding: a flat `[row, col, letter]` list instead of a
/// tuple-keyed map (JSON object keys must be strings).
mod cells_serde {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        cells: &BTreeMap<(i32, i32), char>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let flat: Vec<(i32, i32, char)> =
            cells.iter().map(|(&(row, col), &ch)| (row, col, ch)).collect();
        flat.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(i32, i32), char>, D::Error> {
        let flat = Vec::<(i32, i32, char)>::deserialize(deserializer)?;
        Ok(flat.into_iter().map(|(row, col, ch)| ((row, col), ch)).collect())
    }
}
