//! Near-duplicate detection over author, journal and venue strings.

use std::collections::HashMap;

use crate::index::ValueIndex;

pub const DEFAULT_THRESHOLD: f64 = 0.8;
pub const BOOKTITLE_THRESHOLD: f64 = 0.9;

/// Strings judged to be spellings of the same thing, each with the records
/// it appears in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroup {
    pub members: Vec<(String, Vec<String>)>,
}

impl CollisionGroup {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(value, _)| value.as_str())
    }

    /// `"<label> might be the same: 'v1' (id, id), 'v2' (id)"`
    pub fn describe(&self, label: &str) -> String {
        let members: Vec<String> = self
            .members
            .iter()
            .map(|(value, ids)| format!("'{}' ({})", value, ids.join(", ")))
            .collect();
        format!("{} might be the same: {}", label, members.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct FuzzyClusterer {
    threshold: f64,
}

impl Default for FuzzyClusterer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FuzzyClusterer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Two strings are linked when their similarity is strictly above the
    /// threshold in either comparison direction.
    pub fn linked(&self, a: &[char], b: &[char]) -> bool {
        sequence_ratio(a, b).max(sequence_ratio(b, a)) > self.threshold
    }

    /// Connected components of the similarity relation with at least two
    /// members, ordered by their earliest member in index order.
    pub fn cluster(&self, index: &ValueIndex) -> Vec<CollisionGroup> {
        let keys: Vec<&str> = index.keys().collect();
        let chars: Vec<Vec<char>> = keys.iter().map(|k| k.chars().collect()).collect();

        let mut dsu = DisjointSet::new(keys.len());
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                if self.linked(&chars[i], &chars[j]) {
                    dsu.union(i, j);
                }
            }
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for idx in 0..keys.len() {
            let root = dsu.find(idx);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(idx);
        }

        components
            .into_iter()
            .filter(|members| members.len() > 1)
            .map(|members| CollisionGroup {
                members: members
                    .into_iter()
                    .map(|idx| {
                        let ids = index.get(keys[idx]).unwrap_or_default().to_vec();
                        (keys[idx].to_string(), ids)
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Ratcliff/Obershelp similarity `2M / T`.
///
/// `M` counts characters in matching blocks, found by taking the longest
/// common block and recursing on both sides of it. Ties go to the block that
/// starts earliest in `a`, then in `b`, so the measure is not symmetric.
pub fn sequence_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(a, b) as f64 / total as f64
}

pub fn str_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    sequence_ratio(&a, &b)
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given ranges.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j + 1] is the length of the match ending at a[i - 1], b[j]
    let mut run = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run[j - blo] + 1;
            next[j - blo + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run = next;
    }
    (best_i, best_j, best_size)
}

#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, left: usize, right: usize) {
        let left_root = self.find(left);
        let right_root = self.find(right);

        if left_root == right_root {
            return;
        }

        match self.rank[left_root].cmp(&self.rank[right_root]) {
            std::cmp::Ordering::Less => self.parent[left_root] = right_root,
            std::cmp::Ordering::Greater => self.parent[right_root] = left_root,
            std::cmp::Ordering::Equal => {
                self.parent[right_root] = left_root;
                self.rank[left_root] += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(values: &[(&'static str, &'static str)]) -> ValueIndex {
        values.iter().copied().collect()
    }

    #[test]
    fn ratio_basics() {
        assert_eq!(str_ratio("", ""), 1.0);
        assert_eq!(str_ratio("abc", ""), 0.0);
        assert_eq!(str_ratio("abcd", "abcd"), 1.0);
        assert_eq!(str_ratio("abcde", "abcdf"), 0.8);
        // blocks "ab" and "d"
        assert!((str_ratio("abxcd", "abd") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn ratio_depends_on_argument_order() {
        let forward = str_ratio("tide", "diet");
        let backward = str_ratio("diet", "tide");
        assert!((forward - 0.25).abs() < 1e-9);
        assert!((backward - 0.5).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_strict() {
        let clusterer = FuzzyClusterer::new(0.8);
        let groups = clusterer.cluster(&index(&[("abcde", "a"), ("abcdf", "b")]));
        assert!(groups.is_empty());

        let groups = clusterer.cluster(&index(&[("abcdefghij", "a"), ("abcdefghik", "b")]));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn chains_collapse_into_one_group() {
        let idx = index(&[
            ("Smith, John", "a"),
            ("Knuth, Donald", "b"),
            ("Smith, Jon", "c"),
            ("Smith, Johnny", "d"),
            ("Smith, John", "e"),
        ]);
        let groups = FuzzyClusterer::default().cluster(&idx);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].values().collect::<Vec<_>>(),
            vec!["Smith, John", "Smith, Jon", "Smith, Johnny"]
        );
        assert_eq!(
            groups[0].describe("Authors"),
            "Authors might be the same: 'Smith, John' (a, e), 'Smith, Jon' (c), 'Smith, Johnny' (d)"
        );
    }

    #[test]
    fn groups_ordered_by_earliest_member() {
        let idx = index(&[
            ("Journal of Machine Learning Research", "a"),
            ("Nature Communications", "b"),
            ("Nature Comunications", "c"),
            ("Journal of Machine Learning Reseach", "d"),
        ]);
        let groups = FuzzyClusterer::default().cluster(&idx);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members[0].0, "Journal of Machine Learning Research");
        assert_eq!(groups[1].members[0].0, "Nature Communications");
    }

    #[test]
    fn booktitle_threshold_is_stricter() {
        let idx = index(&[
            ("Proceedings of ACL", "a"),
            ("Proceedings of EMNLP", "b"),
        ]);
        assert!(FuzzyClusterer::new(BOOKTITLE_THRESHOLD).cluster(&idx).is_empty());
    }
}
