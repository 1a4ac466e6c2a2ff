use std::collections::BTreeMap;

/// A single letter-position crossing between two words:
/// `word_a[idx_a] == word_b[idx_b] == letter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    pub idx_a: usize,
    pub idx_b: usize,
    pub letter: char,
}

/// All pairwise crossings for a word set, indexed both ways.
///
/// For every ordered distinct pair `(a, b)` and every `(i, j)` with
/// `a[i] == b[j]`, an `Intersection` is recorded under `graph[a][b]`. Both
/// orientations are stored so "all intersections between `w` and any placed
/// word" is a direct lookup. Only non-empty adjacency lists are kept, and
/// `BTreeMap` keys give a stable iteration order for deterministic output.
///
/// Built once per generation in O(|W|² · L²); typical |W| ≤ 200, L ≤ 8.
#[derive(Debug, Clone, Default)]
pub struct IntersectionGraph {
    adj: BTreeMap<String, BTreeMap<String, Vec<Intersection>>>,
}

impl IntersectionGraph {
    pub fn build(words: &[String]) -> Self {
        let mut adj: BTreeMap<String, BTreeMap<String, Vec<Intersection>>> = BTreeMap::new();

        for (a_ix, a) in words.iter().enumerate() {
            for (b_ix, b) in words.iter().enumerate() {
                if a_ix == b_ix {
                    continue;
                }
                let mut crossings = Vec::new();
                for (i, ca) in a.chars().enumerate() {
                    for (j, cb) in b.chars().enumerate() {
                        if ca == cb {
                            crossings.push(Intersection { idx_a: i, idx_b: j, letter: ca });
                        }
                    }
                }
                if !crossings.is_empty() {
                    adj.entry(a.clone()).or_default().insert(b.clone(), crossings);
                }
            }
        }

        Self { adj }
    }

    /// All crossings between `a` and `b` (with `idx_a` indexing into `a`).
    /// Empty when the pair never shares a letter.
    pub fn between(&self, a: &str, b: &str) -> &[Intersection] {
        self.adj
            .get(a)
            .and_then(|peers| peers.get(b))
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of intersection pairs `w` participates in — the
    /// "most-connected first" ordering heuristic.
    pub fn connections(&self, word: &str) -> usize {
        self.adj
            .get(word)
            .map_or(0, |peers| peers.values().map(Vec::len).sum())
    }

    /// Words that share at least one letter with `word`, in stable order.
    pub fn neighbors(&self, word: &str) -> impl Iterator<Item = &str> {
        self.adj
            .get(word)
            .into_iter()
            .flat_map(|peers| peers.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_every_matching_position() {
        let graph = IntersectionGraph::build(&words(&["CAT", "ACT"]));
        // C@0/C@1, A@1/A@0, T@2/T@2.
        let crossings = graph.between("CAT", "ACT");
        assert_eq!(
            vec![
                Intersection { idx_a: 0, idx_b: 1, letter: 'C' },
                Intersection { idx_a: 1, idx_b: 0, letter: 'A' },
                Intersection { idx_a: 2, idx_b: 2, letter: 'T' },
            ],
            crossings.to_vec()
        );
    }

    #[test]
    fn both_orientations_stored() {
        let graph = IntersectionGraph::build(&words(&["CAT", "TAX"]));
        let forward = graph.between("CAT", "TAX");
        let reverse = graph.between("TAX", "CAT");
        assert_eq!(forward.len(), reverse.len());
        for ix in forward {
            assert!(reverse.contains(&Intersection {
                idx_a: ix.idx_b,
                idx_b: ix.idx_a,
                letter: ix.letter,
            }));
        }
    }

    #[test]
    fn disjoint_pairs_not_stored() {
        let graph = IntersectionGraph::build(&words(&["CAB", "DOG"]));
        assert!(graph.between("CAB", "DOG").is_empty());
        assert_eq!(0, graph.connections("CAB"));
    }

    #[test]
    fn duplicate_letters_multiply() {
        let graph = IntersectionGraph::build(&words(&["SEES", "ESS"]));
        // S appears at 0,3 in SEES and 1,2 in ESS (4 pairs);
        // E appears at 1,2 in SEES and 0 in ESS (2 pairs).
        assert_eq!(6, graph.between("SEES", "ESS").len());
    }

    #[test]
    fn connections_counts_all_pairs() {
        let graph = IntersectionGraph::build(&words(&["CAT", "ACT", "DOG"]));
        // CAT-ACT share 3 positions; CAT-DOG none.
        assert_eq!(3, graph.connections("CAT"));
        assert_eq!(vec!["ACT"], graph.neighbors("CAT").collect::<Vec<_>>());
    }
}
