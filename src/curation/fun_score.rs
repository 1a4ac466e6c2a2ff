//! Raw "fun" scoring for curation candidates, and the per-length percentile
//! conversion that turns raw feature sums into comparable `[0,1]` ranks.

/// Expected sub-word counts per source-word length; the count bonus
/// saturates at these caps.
fn sub_word_cap(len: usize) -> f64 {
    match len {
        3 => 3.0,
        4 => 12.0,
        5 => 30.0,
        6 => 50.0,
        7 => 80.0,
        _ => 100.0,
    }
}

/// Weighted sum of five features of a word and its sub-words.
///
/// The absolute value is meaningless on its own — `percentile_ranks` turns
/// it into a rank within the word's length bucket.
pub(crate) fn raw_fun_score(word: &str, sub_words: &[String]) -> f64 {
    let len = word.len();

    // Letter diversity: unique letters over total letters.
    let mut seen = [false; 26];
    for c in word.bytes() {
        seen[(c - b'A') as usize] = true;
    }
    let diversity = seen.iter().filter(|&&s| s).count() as f64 / len as f64;

    // Spread of sub-word lengths, normalized against 2.5 and clamped.
    let spread = (std_dev(sub_words) / 2.5).min(1.0);

    let count_bonus = (sub_words.len() as f64 / sub_word_cap(len)).min(1.0);

    // "Meaty" sub-words are length 4 and up.
    let meaty = if sub_words.is_empty() {
        0.0
    } else {
        sub_words.iter().filter(|s| s.len() >= 4).count() as f64 / sub_words.len() as f64
    };

    let long_count = sub_words.iter().filter(|s| s.len() >= 5).count();
    let long_bonus = (long_count as f64 / 5.0).min(1.0);

    0.20 * diversity + 0.20 * spread + 0.30 * count_bonus + 0.15 * meaty + 0.15 * long_bonus
}

/// Population standard deviation of the sub-word lengths.
fn std_dev(sub_words: &[String]) -> f64 {
    if sub_words.len() < 2 {
        return 0.0;
    }
    let n = sub_words.len() as f64;
    let mean = sub_words.iter().map(|s| s.len() as f64).sum::<f64>() / n;
    let variance = sub_words
        .iter()
        .map(|s| {
            let d = s.len() as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Round to three decimal places — the precision the curated dump carries.
pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Convert one length bucket of `(word, raw_score)` pairs into percentile
/// ranks: ascending by raw score (ties broken by word so reruns agree),
/// rank `i/(n-1)`, with a singleton bucket pinned to 0.5.
pub(crate) fn percentile_ranks(bucket: &mut Vec<(String, f64)>) {
    bucket.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let n = bucket.len();
    for (i, entry) in bucket.iter_mut().enumerate() {
        entry.1 = if n == 1 {
            0.5
        } else {
            round3(i as f64 / (n - 1) as f64)
        };
    }
}
