//! Single entry point for puzzle generation: applies parameter defaults,
//! chains word finding → intersection graph → placement search → scoring,
//! and packages ranked candidates.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::GenerateError;
use crate::grid::{Grid, PlacedWord};
use crate::intersections::IntersectionGraph;
use crate::letters::LetterBag;
use crate::rng::random_seed;
use crate::scoring::{blend_with_fun, overall_score, ScoreWeights};
use crate::solver::{run_attempt, CancelToken, PlacementStrategy};
use crate::wordlist::{find_valid_words, WordList};

/// Smallest and largest letter bags the generator accepts.
pub const MIN_LETTERS: usize = 3;
pub const MAX_LETTERS: usize = 8;

/// Knobs for one generation request. Every field has a default, so callers
/// typically write `GeneratorParams { seed: Some(42), ..Default::default() }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// Lower bound on word length considered.
    pub min_word_length: usize,
    /// Upper bound on word length considered.
    pub max_word_length: usize,
    /// Fail with `InsufficientWords` below this many valid words.
    pub min_word_count: usize,
    /// Cap on words handed to the placement search.
    pub max_word_count: usize,
    /// Pin the longest valid word to the front of the ordering.
    pub must_include_longest_word: bool,
    pub placement_strategy: PlacementStrategy,
    /// Per-step branching factor of the backtracking search.
    pub max_placement_candidates: usize,
    /// Advisory bound; accepted and surfaced but not enforced.
    pub max_backtrack_depth: usize,
    pub compactness_weight: f64,
    pub density_weight: f64,
    pub intersection_weight: f64,
    pub symmetry_weight: f64,
    /// Max distinct grids returned.
    pub candidates_to_generate: usize,
    /// Reproducibility anchor; `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    /// Curated fun percentile for this letter bag, mixed into the final
    /// score as `0.85·grid + 0.15·fun` when present.
    pub fun_score: Option<f64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            min_word_length: 3,
            max_word_length: 10,
            min_word_count: 4,
            max_word_count: 8,
            must_include_longest_word: true,
            placement_strategy: PlacementStrategy::LongestFirst,
            max_placement_candidates: 10,
            max_backtrack_depth: 5,
            compactness_weight: 0.4,
            density_weight: 0.2,
            intersection_weight: 0.3,
            symmetry_weight: 0.1,
            candidates_to_generate: 10,
            seed: None,
            fun_score: None,
        }
    }
}

impl GeneratorParams {
    /// Reject out-of-range combinations before any work happens.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.min_word_length < 2 {
            return Err(GenerateError::BadParam { field: "min_word_length" });
        }
        if self.max_word_length < self.min_word_length {
            return Err(GenerateError::BadParam { field: "max_word_length" });
        }
        if self.min_word_count == 0 {
            return Err(GenerateError::BadParam { field: "min_word_count" });
        }
        if self.max_word_count < self.min_word_count {
            return Err(GenerateError::BadParam { field: "max_word_count" });
        }
        if self.max_placement_candidates == 0 {
            return Err(GenerateError::BadParam { field: "max_placement_candidates" });
        }
        if self.candidates_to_generate == 0 {
            return Err(GenerateError::BadParam { field: "candidates_to_generate" });
        }
        if let Some(fun) = self.fun_score {
            if !(0.0..=1.0).contains(&fun) {
                return Err(GenerateError::BadParam { field: "fun_score" });
            }
        }
        Ok(())
    }

    fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            compactness: self.compactness_weight,
            density: self.density_weight,
            intersection: self.intersection_weight,
            symmetry: self.symmetry_weight,
        }
    }
}

/// A finished puzzle: the placed crossword plus the valid words that did not
/// make it onto the grid. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    /// 1-based, monotonic within a generation.
    pub id: u32,
    pub letters: Vec<char>,
    pub words: Vec<PlacedWord>,
    pub bonus_words: Vec<String>,
    pub grid: Grid,
}

/// Shape and quality measurements for one puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuzzleMetrics {
    pub grid_width: u32,
    pub grid_height: u32,
    pub total_cells: u32,
    pub filled_cells: u32,
    pub density: f64,
    pub intersection_count: u32,
    pub overall_score: f64,
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleCandidate {
    pub puzzle: Puzzle,
    pub metrics: PuzzleMetrics,
}

/// Everything a generation call returns: the best puzzle, its metrics, every
/// surviving candidate (score-descending, best included), and the valid-word
/// list the bonus words were carved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub puzzle: Puzzle,
    pub metrics: PuzzleMetrics,
    pub all_candidates: Vec<PuzzleCandidate>,
    pub valid_words: Vec<String>,
}

/// Generate ranked crossword candidates from a letter bag.
pub fn generate(
    letters: &[char],
    dictionary: &WordList,
    params: &GeneratorParams,
) -> Result<GenerationResult, GenerateError> {
    generate_with_cancel(letters, dictionary, params, &CancelToken::new())
}

/// `generate`, with a cooperative cancellation token threaded through the
/// search loop.
pub fn generate_with_cancel(
    letters: &[char],
    dictionary: &WordList,
    params: &GeneratorParams,
    cancel: &CancelToken,
) -> Result<GenerationResult, GenerateError> {
    params.validate()?;
    if letters.len() < MIN_LETTERS || letters.len() > MAX_LETTERS {
        return Err(GenerateError::BadParam { field: "letters" });
    }
    let bag = LetterBag::from_letters(letters)?;
    let normalized_letters: Vec<char> =
        letters.iter().map(|c| c.to_ascii_uppercase()).collect();

    if !dictionary
        .iter()
        .any(|w| w.len() >= params.min_word_length && w.len() <= params.max_word_length)
    {
        return Err(GenerateError::EmptyDictionary);
    }

    let valid_words =
        find_valid_words(&bag, dictionary, params.min_word_length, params.max_word_length);
    if valid_words.len() < params.min_word_count {
        return Err(GenerateError::InsufficientWords {
            found: valid_words.len(),
            required: params.min_word_count,
        });
    }
    debug!("{} valid words for {:?}", valid_words.len(), normalized_letters);

    let graph = IntersectionGraph::build(&valid_words);
    let seed = params.seed.unwrap_or_else(random_seed);

    // Attempt up to 2N layouts and keep the first N that come back
    // connected; later stages may still merge duplicates.
    let max_attempts = params.candidates_to_generate * 2;
    let mut grids: Vec<Grid> = Vec::new();
    for attempt in 0..max_attempts as u64 {
        if grids.len() >= params.candidates_to_generate {
            break;
        }
        if let Some(grid) = run_attempt(
            &valid_words,
            &graph,
            params.placement_strategy,
            params.must_include_longest_word,
            params.max_word_count,
            params.max_placement_candidates,
            attempt,
            seed,
            cancel,
        )? {
            grids.push(grid);
        }
    }

    if grids.is_empty() {
        return Err(GenerateError::NoValidLayout);
    }

    // Score, dedup by canonical cell layout, rank, truncate.
    let weights = params.weights();
    let mut seen_layouts: HashSet<String> = HashSet::new();
    let mut scored: Vec<(Grid, f64)> = Vec::new();
    for grid in grids {
        if !seen_layouts.insert(grid.canonical_key()) {
            continue;
        }
        let score = blend_with_fun(overall_score(&grid, &weights), params.fun_score);
        scored.push((grid, score));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(params.candidates_to_generate);

    let all_candidates: Vec<PuzzleCandidate> = scored
        .into_iter()
        .enumerate()
        .map(|(ix, (grid, score))| {
            assemble_candidate(ix as u32 + 1, &normalized_letters, &valid_words, grid, score)
        })
        .collect();

    let best = all_candidates[0].clone();
    Ok(GenerationResult {
        puzzle: best.puzzle,
        metrics: best.metrics,
        all_candidates,
        valid_words,
    })
}

fn assemble_candidate(
    id: u32,
    letters: &[char],
    valid_words: &[String],
    grid: Grid,
    score: f64,
) -> PuzzleCandidate {
    let placed_set: HashSet<&str> =
        grid.placed().iter().map(|p| p.word.as_str()).collect();
    let bonus_words: Vec<String> = valid_words
        .iter()
        .filter(|w| !placed_set.contains(w.as_str()))
        .cloned()
        .collect();

    let bounds = grid.bounds().expect("a kept grid is never empty");
    let total_cells = bounds.width() * bounds.height();
    let filled_cells = grid.filled() as u32;
    let metrics = PuzzleMetrics {
        grid_width: bounds.width(),
        grid_height: bounds.height(),
        total_cells,
        filled_cells,
        density: f64::from(filled_cells) / f64::from(total_cells),
        intersection_count: grid.crossing_count() as u32,
        overall_score: score,
    };

    let words = grid.placed().to_vec();
    PuzzleCandidate {
        puzzle: Puzzle {
            id,
            letters: letters.to_vec(),
            words,
            bonus_words,
            grid,
        },
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::LetterBag;

    fn dict(words: &[&str]) -> WordList {
        WordList::from_words(words.iter().copied())
    }

    fn seeded(seed: u64) -> GeneratorParams {
        GeneratorParams { seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn tiny_bag_places_cats() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT", "CAST", "TAX"]);
        let result = generate(&['C', 'A', 'T', 'S'], &dictionary, &seeded(1)).unwrap();

        let placed: Vec<&str> =
            result.puzzle.words.iter().map(|p| p.word.as_str()).collect();
        assert!(placed.contains(&"CATS"), "longest word must be placed: {placed:?}");

        let mut everything: Vec<&str> = placed.clone();
        everything.extend(result.puzzle.bonus_words.iter().map(String::as_str));
        for word in ["CAT", "SAT", "ACT", "CAST"] {
            assert!(everything.contains(&word), "{word} missing");
        }
        assert!(!everything.contains(&"TAX"));
    }

    #[test]
    fn unspellable_bag_fails_with_counts() {
        let dictionary = dict(&["CAT", "DOG", "BIRD"]);
        let err = generate(&['Q', 'Z', 'X'], &dictionary, &seeded(1)).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InsufficientWords { found: 0, required: 4 }
        ));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let dictionary = dict(&["READS", "DEAR", "EARS", "RED", "TAX"]);
        let letters = ['R', 'E', 'A', 'D', 'S'];
        let a = generate(&letters, &dictionary, &seeded(42)).unwrap();
        let b = generate(&letters, &dictionary, &seeded(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn crossword_laws_hold() {
        let dictionary = dict(&[
            "HOMEWORK", "WORK", "HOME", "HERO", "MORE", "WORE", "WORM", "ROOM",
            "HOOK", "HOW", "ROW", "HER", "OAR", "ORE", "HOE", "ROE", "WOK", "MOW",
        ]);
        let params = GeneratorParams {
            seed: Some(3),
            max_word_count: 6,
            ..Default::default()
        };
        let result =
            generate(&['H', 'O', 'M', 'E', 'W', 'O', 'R', 'K'], &dictionary, &params).unwrap();

        for candidate in &result.all_candidates {
            let grid = &candidate.puzzle.grid;
            // Grid-word consistency.
            for placed in grid.placed() {
                for ((row, col), expected) in placed.cells() {
                    assert_eq!(Some(expected), grid.get(row, col));
                }
            }
            // Every non-initial word crosses at least one earlier word.
            let mut coverage: std::collections::HashMap<(i32, i32), usize> =
                std::collections::HashMap::new();
            for placed in grid.placed() {
                for (pos, _) in placed.cells() {
                    *coverage.entry(pos).or_insert(0) += 1;
                }
            }
            for placed in grid.placed().iter().skip(1) {
                let crossings =
                    placed.cells().filter(|(pos, _)| coverage[pos] >= 2).count();
                assert!(crossings >= 1, "{} is unanchored", placed.word);
            }
            // Pairwise overlap is at most one agreeing cell.
            let words = grid.placed();
            for (i, a) in words.iter().enumerate() {
                for b in words.iter().skip(i + 1) {
                    let cells_a: std::collections::HashMap<(i32, i32), char> =
                        a.cells().collect();
                    let shared: Vec<_> = b
                        .cells()
                        .filter(|(pos, _)| cells_a.contains_key(pos))
                        .collect();
                    assert!(shared.len() <= 1, "{} and {} overlap twice", a.word, b.word);
                    for (pos, ch) in shared {
                        assert_eq!(cells_a[&pos], ch);
                    }
                }
            }
            assert!(grid.is_connected());
        }
    }

    // Normalization + ranking + id assignment over all candidates.
    #[test]
    fn candidates_are_normalized_ranked_and_numbered() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT", "CAST", "TAX"]);
        let result = generate(&['C', 'A', 'T', 'S'], &dictionary, &seeded(9)).unwrap();

        let mut previous = f64::INFINITY;
        for (ix, candidate) in result.all_candidates.iter().enumerate() {
            let bounds = candidate.puzzle.grid.bounds().unwrap();
            assert_eq!(0, bounds.min_row);
            assert_eq!(0, bounds.min_col);
            assert_eq!(ix as u32 + 1, candidate.puzzle.id);
            assert!(candidate.metrics.overall_score <= previous);
            previous = candidate.metrics.overall_score;
        }
        // No duplicate layouts survive dedup.
        let keys: HashSet<String> = result
            .all_candidates
            .iter()
            .map(|c| c.puzzle.grid.canonical_key())
            .collect();
        assert_eq!(result.all_candidates.len(), keys.len());
    }

    // Letter-bag containment over everything returned.
    #[test]
    fn all_returned_words_fit_the_bag() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT", "CAST", "TACT"]);
        let letters = ['C', 'A', 'T', 'S'];
        let params = GeneratorParams {
            seed: Some(4),
            max_word_count: 4,
            ..Default::default()
        };
        let result = generate(&letters, &dictionary, &params).unwrap();
        let bag = LetterBag::from_letters(&letters).unwrap();
        for word in result
            .puzzle
            .words
            .iter()
            .map(|p| p.word.clone())
            .chain(result.puzzle.bonus_words.iter().cloned())
        {
            assert!(bag.contains(&LetterBag::from_word(&word).unwrap()), "{word}");
        }
        // Grid words and bonus words partition the valid words.
        let placed: HashSet<String> =
            result.puzzle.words.iter().map(|p| p.word.clone()).collect();
        let bonus: HashSet<String> = result.puzzle.bonus_words.iter().cloned().collect();
        assert!(placed.is_disjoint(&bonus));
        let union: HashSet<String> = placed.union(&bonus).cloned().collect();
        let valid: HashSet<String> = result.valid_words.iter().cloned().collect();
        assert_eq!(valid, union);
    }

    #[test]
    fn bad_params_rejected_up_front() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT"]);
        let params = GeneratorParams {
            min_word_length: 6,
            max_word_length: 3,
            ..Default::default()
        };
        assert!(matches!(
            generate(&['C', 'A', 'T', 'S'], &dictionary, &params).unwrap_err(),
            GenerateError::BadParam { field: "max_word_length" }
        ));

        let params = GeneratorParams { fun_score: Some(1.5), ..Default::default() };
        assert!(matches!(
            generate(&['C', 'A', 'T', 'S'], &dictionary, &params).unwrap_err(),
            GenerateError::BadParam { field: "fun_score" }
        ));
    }

    #[test]
    fn letter_count_bounds_enforced() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT"]);
        assert!(matches!(
            generate(&['A', 'B'], &dictionary, &seeded(1)).unwrap_err(),
            GenerateError::BadParam { field: "letters" }
        ));
        let nine = ['A'; 9];
        assert!(matches!(
            generate(&nine, &dictionary, &seeded(1)).unwrap_err(),
            GenerateError::BadParam { field: "letters" }
        ));
    }

    #[test]
    fn out_of_bounds_dictionary_is_empty() {
        let dictionary = dict(&["AT", "TO", "IT"]);
        assert!(matches!(
            generate(&['C', 'A', 'T'], &dictionary, &seeded(1)).unwrap_err(),
            GenerateError::EmptyDictionary
        ));
    }

    #[test]
    fn fun_score_lifts_final_score() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT", "CAST"]);
        let letters = ['C', 'A', 'T', 'S'];
        let plain = generate(&letters, &dictionary, &seeded(5)).unwrap();
        let funned = generate(
            &letters,
            &dictionary,
            &GeneratorParams { fun_score: Some(1.0), seed: Some(5), ..Default::default() },
        )
        .unwrap();
        // Same layouts, different blend.
        assert_eq!(plain.puzzle.grid, funned.puzzle.grid);
        let expected = 0.85 * plain.metrics.overall_score + 0.15;
        assert!((funned.metrics.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn cancelled_generation_surfaces() {
        let dictionary = dict(&["CAT", "CATS", "SAT", "ACT", "CAST"]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err =
            generate_with_cancel(&['C', 'A', 'T', 'S'], &dictionary, &seeded(1), &cancel)
                .unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
    }
}
