//! Offline wordlist curation.
//!
//! For every candidate source word this pipeline precomputes its sub-words,
//! scores how "fun" the word is to play (as a percentile within its length
//! bucket), collapses anagram groups to their best representative, and emits
//! a self-describing record that the generator consumes at request time.
//! The excluded list is consulted here and never shipped downstream.
//!
//! This is a batch job over the raw dictionary — the per-word sub-word scan
//! is quadratic in the pool size, which is fine offline and keeps the code
//! free of index structures nothing else needs.

mod fun_score;

use std::collections::{BTreeMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::CurationError;
use crate::letters::LetterBag;
use crate::wordlist::WordList;

use fun_score::{percentile_ranks, raw_fun_score};

/// Format version of the curated dump.
pub const CURATION_FORMAT_VERSION: &str = "2.0";

/// Words shorter or longer than this range are never curated — they cannot
/// appear in a 3–8 letter bag puzzle.
pub const MIN_CURATED_LEN: usize = 3;
pub const MAX_CURATED_LEN: usize = 8;

/// Default minimum number of sub-words a source word must offer.
pub const DEFAULT_MIN_SUB_WORDS: usize = 3;

/// Self-description carried at the top of every curated dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationMetadata {
    pub version: String,
    /// ISO-8601 UTC timestamp of the curation run.
    pub generated_at: String,
    pub min_sub_words: usize,
    pub description: String,
}

/// Per-word curated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedWord {
    /// Dictionary words spellable from this word's letters, length
    /// descending then alphabetical.
    pub sub_words: Vec<String>,
    pub sub_word_count: usize,
    /// Percentile rank in `[0,1]`, three decimal places.
    pub fun_score: f64,
}

/// The full curated wordlist: metadata, a per-length index sorted by fun
/// score descending, and the per-word records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedWordlist {
    pub metadata: CurationMetadata,
    /// Keys `"3"` through `"8"`.
    pub words_by_length: BTreeMap<String, Vec<String>>,
    pub words: BTreeMap<String, CuratedWord>,
}

impl CuratedWordlist {
    pub fn to_json_string(&self) -> Result<String, CurationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, CurationError> {
        Ok(serde_json::from_str(contents)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), CurationError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CurationError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Fun percentile for a word, if it survived curation.
    pub fn fun_score(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_ascii_uppercase()).map(|w| w.fun_score)
    }
}

/// Anagram-dedup bookkeeping: how many words entered the dedup step, how
/// many were dropped as lesser anagrams, and how many survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationStats {
    pub original: usize,
    pub filtered_out: usize,
    pub kept: usize,
}

/// Configurable curation run. `Curator::default()` matches the shipped
/// pipeline; the setters exist mainly so tests and reruns can pin the
/// timestamp and tweak thresholds.
#[derive(Debug, Clone)]
pub struct Curator {
    min_sub_words: usize,
    description: String,
    generated_at: Option<String>,
}

impl Default for Curator {
    fn default() -> Self {
        Self {
            min_sub_words: DEFAULT_MIN_SUB_WORDS,
            description: "Curated word game dictionary with sub-word counts and fun scores"
                .to_string(),
            generated_at: None,
        }
    }
}

impl Curator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_sub_words(mut self, min_sub_words: usize) -> Self {
        self.min_sub_words = min_sub_words;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pin the `generated_at` stamp; without this the wall clock is used.
    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = Some(generated_at.into());
        self
    }

    /// Run the pipeline over a raw word list.
    pub fn curate(
        &self,
        raw_words: &[String],
        excluded_words: &[String],
    ) -> (CuratedWordlist, CurationStats) {
        let dictionary = WordList::from_words(raw_words.iter());
        let excluded: HashSet<String> = excluded_words
            .iter()
            .map(|w| w.trim().to_ascii_uppercase())
            .collect();

        // The sub-word pool doubles as the candidate list: everything in
        // range and not excluded, with its letter bag precomputed.
        let pool: Vec<(String, LetterBag)> = dictionary
            .iter()
            .filter(|w| {
                (MIN_CURATED_LEN..=MAX_CURATED_LEN).contains(&w.len())
                    && !excluded.contains(w.as_str())
            })
            .filter_map(|w| LetterBag::from_word(w).ok().map(|bag| (w.clone(), bag)))
            .collect();
        info!("curation pool: {} of {} raw words", pool.len(), raw_words.len());

        // Sub-words and raw fun scores, bucketed by source-word length.
        let mut sub_words_by_word: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut buckets: BTreeMap<usize, Vec<(String, f64)>> = BTreeMap::new();
        for (word, bag) in &pool {
            let mut sub_words: Vec<String> = pool
                .iter()
                .filter(|(s, s_bag)| s != word && s.len() <= word.len() && bag.contains(s_bag))
                .map(|(s, _)| s.clone())
                .collect();
            if sub_words.len() < self.min_sub_words {
                continue;
            }
            sub_words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

            let raw = raw_fun_score(word, &sub_words);
            buckets.entry(word.len()).or_default().push((word.clone(), raw));
            sub_words_by_word.insert(word.clone(), sub_words);
        }

        // Raw scores -> per-bucket percentile ranks.
        let mut scored: Vec<(String, f64)> = Vec::new();
        for bucket in buckets.values_mut() {
            percentile_ranks(bucket);
            scored.extend(bucket.iter().cloned());
        }

        let (kept, stats) = dedup_anagrams(scored);
        info!(
            "curation kept {} of {} words after anagram dedup",
            stats.kept, stats.original
        );

        // Assemble the dump.
        let mut words: BTreeMap<String, CuratedWord> = BTreeMap::new();
        for (word, fun) in &kept {
            let sub_words = sub_words_by_word.remove(word).unwrap_or_default();
            words.insert(
                word.clone(),
                CuratedWord {
                    sub_word_count: sub_words.len(),
                    sub_words,
                    fun_score: *fun,
                },
            );
        }

        // Per-length index, fun score descending with an alphabetical
        // tie-break.
        let mut words_by_length: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for len in MIN_CURATED_LEN..=MAX_CURATED_LEN {
            let mut index: Vec<&String> =
                words.keys().filter(|w| w.len() == len).collect();
            index.sort_by(|a, b| {
                words[*b]
                    .fun_score
                    .partial_cmp(&words[*a].fun_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.cmp(b))
            });
            words_by_length
                .insert(len.to_string(), index.into_iter().cloned().collect());
        }

        let curated = CuratedWordlist {
            metadata: CurationMetadata {
                version: CURATION_FORMAT_VERSION.to_string(),
                generated_at: self
                    .generated_at
                    .clone()
                    .unwrap_or_else(current_timestamp),
                min_sub_words: self.min_sub_words,
                description: self.description.clone(),
            },
            words_by_length,
            words,
        };
        (curated, stats)
    }

    /// File-to-file convenience: read a raw list and an excluded list, write
    /// the curated dump, return the dedup stats.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn curate_files<P: AsRef<std::path::Path>>(
        &self,
        raw_path: P,
        excluded_path: P,
        output_path: P,
    ) -> Result<CurationStats, CurationError> {
        let raw = WordList::load_from_path(raw_path)?;
        let excluded = WordList::load_from_path(excluded_path)?;
        let (curated, stats) = self.curate(&raw.entries, &excluded.entries);
        curated.save_to_path(output_path)?;
        Ok(stats)
    }
}

/// Run curation with the default settings.
pub fn curate_wordlist(
    raw_words: &[String],
    excluded_words: &[String],
) -> (CuratedWordlist, CurationStats) {
    Curator::default().curate(raw_words, excluded_words)
}

/// Collapse anagram groups (same sorted-letter signature) to the word with
/// the highest fun score; ties go to the alphabetically first word.
pub(crate) fn dedup_anagrams(scored: Vec<(String, f64)>) -> (Vec<(String, f64)>, CurationStats) {
    let original = scored.len();
    let mut groups: BTreeMap<String, (String, f64)> = BTreeMap::new();
    for (word, fun) in scored {
        let signature = LetterBag::from_word(&word)
            .map(|bag| bag.signature())
            .unwrap_or_else(|_| word.clone());
        match groups.entry(signature) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert((word, fun));
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                let best = slot.get_mut();
                if fun > best.1 || (fun == best.1 && word < best.0) {
                    *best = (word, fun);
                }
            }
        }
    }

    let kept: Vec<(String, f64)> = groups.into_values().collect();
    let stats = CurationStats {
        original,
        filtered_out: original - kept.len(),
        kept: kept.len(),
    };
    (kept, stats)
}

/// ISO-8601 UTC timestamp for the dump metadata, derived from the system
/// clock without pulling in a date-time crate.
fn current_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    iso8601_utc(secs)
}

/// Civil-date conversion of seconds since the Unix epoch.
fn iso8601_utc(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hour, minute, second) = (rem / 3600, rem % 3600 / 60, rem % 60);

    // Days-to-civil (Gregorian) with era arithmetic.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}
