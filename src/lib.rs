// Reusable library API — visible to both native and WASM builds
pub mod curation;
pub mod errors;
pub mod generator;
pub mod grid;
pub mod intersections;
pub mod letters;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod solver;
pub mod wordlist;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm; // this points to src/wasm.rs

pub use curation::{curate_wordlist, CuratedWordlist, CurationStats, Curator};
pub use errors::{CurationError, GenerateError};
pub use grid::{Direction, Grid, PlacedWord};
pub use generator::{
    generate, generate_with_cancel, GenerationResult, GeneratorParams, Puzzle, PuzzleMetrics,
};
pub use solver::{CancelToken, PlacementStrategy};
pub use wordlist::{find_valid_words, WordList};
