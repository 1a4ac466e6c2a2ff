//! The placement search: ordered backtracking over a word sequence and the
//! intersections that can anchor each word to the grid built so far.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::errors::GenerateError;
use crate::grid::{Direction, Grid, PlacedWord};
use crate::intersections::IntersectionGraph;
use crate::placement::validate;
use crate::rng::SeededRng;
use crate::scoring::placement_score;

/// How the search orders the words it will try to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Length descending, alphabetical tie-break.
    LongestFirst,
    /// Intersection-pair count descending, length descending tie-break.
    MostConnectedFirst,
    /// Deterministic shuffle from the attempt's seed.
    Random,
}

/// Cooperative cancellation for a running search.
///
/// The token is cloneable and thread-safe; the search consults it at every
/// backtracking step, so a caller that needs to bound work can flip it from
/// another thread and the search unwinds promptly with `Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A validator-approved placement awaiting selection, ranked by the
/// placement heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementCandidate {
    pub word: String,
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
    pub intersections: usize,
    pub score: f64,
}

/// Order the valid words for one attempt and cap the count.
///
/// `must_include_longest` pins the longest valid word (alphabetically first
/// among equals) to index 0 regardless of strategy, so the marquee word of
/// the puzzle is always placed first and never pruned by the cap.
pub(crate) fn order_words(
    valid_words: &[String],
    graph: &IntersectionGraph,
    strategy: PlacementStrategy,
    must_include_longest: bool,
    max_word_count: usize,
    rng: &mut SeededRng,
) -> Vec<String> {
    let mut words: Vec<String> = valid_words.to_vec();

    match strategy {
        PlacementStrategy::LongestFirst => {
            words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        PlacementStrategy::MostConnectedFirst => {
            words.sort_by(|a, b| {
                graph
                    .connections(b)
                    .cmp(&graph.connections(a))
                    .then_with(|| b.len().cmp(&a.len()))
                    .then_with(|| a.cmp(b))
            });
        }
        PlacementStrategy::Random => {
            rng.shuffle(&mut words);
        }
    }

    if must_include_longest {
        if let Some(longest_ix) = words
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
            .map(|(ix, _)| ix)
        {
            let longest = words.remove(longest_ix);
            words.insert(0, longest);
        }
    }

    words.truncate(max_word_count);
    words
}

/// Light per-attempt perturbation: walk the ordering and swap adjacent pairs
/// whenever the roll exceeds 0.7. A pinned longest word stays at index 0.
pub(crate) fn perturb_order(words: &mut [String], rng: &mut SeededRng, pin_first: bool) {
    let start = if pin_first { 2 } else { 1 };
    for i in start..words.len() {
        if rng.next_f64() > 0.7 {
            words.swap(i - 1, i);
        }
    }
}

/// Try to place every word in `words`, in order, backtracking through the
/// top-ranked anchor candidates at each step.
///
/// Returns `Ok(Some(grid))` on the first complete placement, `Ok(None)` when
/// the ordering admits no legal layout, and `Err(Cancelled)` if the token
/// fires mid-search.
pub(crate) fn place_all(
    words: &[String],
    graph: &IntersectionGraph,
    max_placement_candidates: usize,
    cancel: &CancelToken,
) -> Result<Option<Grid>, GenerateError> {
    let grid = Grid::new();
    place_from(words, 0, &grid, graph, max_placement_candidates, cancel)
}

fn place_from(
    words: &[String],
    index: usize,
    grid: &Grid,
    graph: &IntersectionGraph,
    max_placement_candidates: usize,
    cancel: &CancelToken,
) -> Result<Option<Grid>, GenerateError> {
    if cancel.is_cancelled() {
        return Err(GenerateError::Cancelled);
    }
    if index == words.len() {
        return Ok(Some(grid.clone()));
    }

    let word = &words[index];
    let mut candidates = enumerate_candidates(word, grid, graph);

    // Highest heuristic first; the sort is stable, so equal scores keep
    // their enumeration order and the search stays deterministic.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(max_placement_candidates);
    trace!("word {word}: {} anchor candidates survive", candidates.len());

    for candidate in candidates {
        let mut next = grid.clone();
        next.place_word(PlacedWord::new(
            candidate.word,
            candidate.row,
            candidate.col,
            candidate.direction,
        ))?;
        if let Some(done) = place_from(words, index + 1, &next, graph, max_placement_candidates, cancel)? {
            return Ok(Some(done));
        }
    }

    Ok(None)
}

/// Enumerate legal placements for `word` on `grid`.
///
/// An empty grid yields the two origin placements. Otherwise every
/// intersection between `word` and a placed word derives one anchor in the
/// perpendicular direction; duplicates by `(row, col, direction)` are
/// dropped before validation.
fn enumerate_candidates(
    word: &str,
    grid: &Grid,
    graph: &IntersectionGraph,
) -> Vec<PlacementCandidate> {
    let mut seen: HashSet<(i32, i32, Direction)> = HashSet::new();
    let mut candidates = Vec::new();

    let mut consider = |row: i32, col: i32, direction: Direction| {
        if !seen.insert((row, col, direction)) {
            return;
        }
        if let Ok(fit) = validate(grid, word, row, col, direction) {
            let score = placement_score(grid, word, row, col, direction, fit.intersections);
            candidates.push(PlacementCandidate {
                word: word.to_string(),
                row,
                col,
                direction,
                intersections: fit.intersections,
                score,
            });
        }
    };

    if grid.is_empty() {
        consider(0, 0, Direction::Horizontal);
        consider(0, 0, Direction::Vertical);
        return candidates;
    }

    for host in grid.placed() {
        for crossing in graph.between(word, &host.word) {
            let (i_w, i_p) = (crossing.idx_a as i32, crossing.idx_b as i32);
            match host.direction {
                Direction::Horizontal => {
                    consider(host.row - i_w, host.col + i_p, Direction::Vertical);
                }
                Direction::Vertical => {
                    consider(host.row + i_p, host.col - i_w, Direction::Horizontal);
                }
            }
        }
    }

    candidates
}

/// One full attempt: order (and optionally perturb) the words, search, then
/// normalize and connectivity-check the result.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_attempt(
    valid_words: &[String],
    graph: &IntersectionGraph,
    strategy: PlacementStrategy,
    must_include_longest: bool,
    max_word_count: usize,
    max_placement_candidates: usize,
    attempt: u64,
    base_seed: u64,
    cancel: &CancelToken,
) -> Result<Option<Grid>, GenerateError> {
    let mut rng = SeededRng::new(base_seed.wrapping_add(attempt));
    let mut words = order_words(
        valid_words,
        graph,
        strategy,
        must_include_longest,
        max_word_count,
        &mut rng,
    );
    if attempt > 0 {
        perturb_order(&mut words, &mut rng, must_include_longest);
    }
    debug!("attempt {attempt}: placing {} words", words.len());

    match place_all(&words, graph, max_placement_candidates, cancel)? {
        Some(mut grid) => {
            grid.normalize();
            // Anchoring makes disconnection impossible by construction, but a
            // cheap BFS keeps the invariant checked rather than assumed.
            if grid.is_connected() {
                Ok(Some(grid))
            } else {
                debug!("attempt {attempt}: discarding disconnected grid");
                Ok(None)
            }
        }
        None => Ok(None),
    }
}
