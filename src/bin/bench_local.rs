//! `bench_local.rs` — quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing for a handful of letter bags on *your* machine.
//! - Loads the dictionary once, then runs each bag several times and reports
//!   the median.
//! - Optionally prints the best grid per bag.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:        `cargo run --bin bench_local --release`
//! - Multiple repeats:       `cargo run --bin bench_local --release -- -r 5`
//! - Print the best grids:   `cargo run --bin bench_local --release -- -p 1`
//! - See all flags:          `cargo run --bin bench_local -- --help`
//!
//! NOTES
//! -----
//! - This is *not* Criterion. It's quick and convenient, not statistically
//!   rigorous. Use the same machine and `--release` for comparable numbers.
//! - I/O (printing) is kept outside the timed section.
//! - One warm-up run per bag is done (not included in timing).
//! - We report the *median* over repeats (more robust than mean for small N).

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;

use gridloom::generator::{generate, GeneratorParams};
use gridloom::wordlist::WordList;

/// Simple local benchmark runner: load the dictionary once, time several
/// letter bags. Each case is a bag of 3–8 letters; the seed is fixed so
/// repeats measure the same search.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the dictionary file (one word per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/wordlist.txt")
    )]
    wordlist: String,

    /// Seed passed to every generation (keeps runs comparable)
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of repeats per bag (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Print up to this many grids per bag (0 = print none)
    #[arg(short = 'p', long = "print", default_value_t = 0)]
    print_limit: usize,
}

/// Edit/add new letter bags here. The summary displays the bag as the "name".
fn get_cases() -> Vec<&'static str> {
    vec![
        "CATS",
        "READS",
        "PLANET",
        "GARDENS",
        "HOMEWORK",
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

fn main() -> std::io::Result<()> {
    /// One row in the benchmark summary: (bag, elapsed seconds, number of
    /// candidates, best overall score).
    type SummaryRow = (String, f64, usize, f64);

    let cli = Cli::parse();

    // Load the dictionary once. This I/O is *not* included in per-bag timing.
    eprintln!("Loading dictionary from: {}", cli.wordlist);
    let t_load = Instant::now();
    let dictionary = WordList::load_from_path(&cli.wordlist)?;
    let load_secs = t_load.elapsed().as_secs_f64();
    eprintln!("Loaded {} words in {:.3}s", dictionary.len(), load_secs);

    let params = GeneratorParams { seed: Some(cli.seed), ..Default::default() };

    let cases = get_cases();
    let mut summary: Vec<SummaryRow> = Vec::with_capacity(cases.len());

    for (idx, bag) in cases.iter().enumerate() {
        let letters: Vec<char> = bag.chars().collect();
        eprintln!("\n[{:02}] {}", idx + 1, bag);

        // One *warm-up* execution per bag to touch code paths / caches.
        // We intentionally ignore its timing (and its outcome — a bag the
        // dictionary can't serve shouldn't abort the whole run).
        let _warmup = generate(&letters, &dictionary, &params);

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last_result = None;

        for rep in 0..cli.num_repeats {
            // Keep only the *core* operation inside the timed region.
            let t_gen = Instant::now();
            let result = generate(black_box(&letters), &dictionary, &params);
            let gen_secs = t_gen.elapsed().as_secs_f64();

            times.push(gen_secs);
            match result {
                Ok(ok) => {
                    let _keep = black_box(ok.all_candidates.len());
                    last_result = Some(ok);
                }
                Err(e) => {
                    eprintln!("  run {:>2}/{:>2}: failed ({e})", rep + 1, cli.num_repeats);
                    continue;
                }
            }

            eprintln!(
                "  run {:>2}/{:>2}: {:.3}s ({} candidates)",
                rep + 1,
                cli.num_repeats,
                gen_secs,
                last_result.as_ref().map_or(0, |r| r.all_candidates.len()),
            );
        }

        let med = median(times);

        // Optionally print grids from the *last* run (outside timing).
        if cli.print_limit > 0 {
            if let Some(result) = &last_result {
                for candidate in result.all_candidates.iter().take(cli.print_limit) {
                    println!(
                        "#{} score {:.3}\n{}\n",
                        candidate.puzzle.id, candidate.metrics.overall_score, candidate.puzzle.grid
                    );
                }
            }
        }

        let (num_candidates, best_score) = last_result
            .as_ref()
            .map_or((0, 0.0), |r| (r.all_candidates.len(), r.metrics.overall_score));
        eprintln!(
            "  → median {:.3}s over {} run(s); {} candidate(s), best score {:.3}",
            med, cli.num_repeats, num_candidates, best_score
        );

        summary.push((bag.to_string(), med, num_candidates, best_score));
    }

    // Compact summary at the end for a quick scan across all bags.
    eprintln!("\n==== Summary ====");
    eprintln!(
        "{:<10} | {:>10} | {:>12} | {:>10}",
        "letters", "median (s)", "# candidates", "best score"
    );
    eprintln!("{:-<10}-+-{:-<10}-+-{:-<12}-+-{:-<10}", "", "", "", "");
    for (bag, med, num_candidates, best_score) in &summary {
        eprintln!("{bag:<10} | {med:>10.3} | {num_candidates:>12} | {best_score:>10.3}");
    }

    Ok(())
}
