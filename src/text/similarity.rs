//! Ratcliff/Obershelp similarity.
//!
//! `ratio = 2·M / T` where `M` is the number of characters in matching blocks
//! (found by taking the longest common substring and recursing on the
//! unmatched text to its left and right) and `T` is the combined length of
//! both inputs. Comparison is case-insensitive and counts characters, not
//! bytes.

use std::collections::HashMap;

/// Similarity of two strings in `[0.0, 1.0]`.
///
/// Two empty strings are identical (`1.0`); an empty and a non-empty string
/// share nothing (`0.0`). The pair is scored in lexicographic order so the
/// result does not depend on argument order.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = fold(a);
    let b = fold(b);
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let (first, second) = if a <= b { (&a, &b) } else { (&b, &a) };
    let matched = matching_chars(first, second);
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

/// Cheap upper bound on [`similarity`] from the lengths alone.
///
/// Lengths are taken after case folding, as in [`similarity`].
pub fn upper_bound(a: &str, b: &str) -> f64 {
    let la = folded_len(a);
    let lb = folded_len(b);
    if la + lb == 0 {
        return 1.0;
    }
    2.0 * la.min(lb) as f64 / (la + lb) as f64
}

fn folded_len(text: &str) -> usize {
    text.chars().flat_map(char::to_lowercase).count()
}

fn fold(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Total size of the matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut finder = LongestMatch::new(b.len());
    let mut matched = 0usize;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = finder.find(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Reusable buffers for longest-common-substring search.
///
/// `prev[j + 1]` holds the length of the match ending at `a[i - 1]`, `b[j]`.
/// Only touched slots are reset between rows.
struct LongestMatch {
    prev: Vec<usize>,
    cur: Vec<usize>,
    touched_prev: Vec<usize>,
    touched_cur: Vec<usize>,
}

impl LongestMatch {
    fn new(b_len: usize) -> Self {
        Self {
            prev: vec![0; b_len + 1],
            cur: vec![0; b_len + 1],
            touched_prev: Vec::new(),
            touched_cur: Vec::new(),
        }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given ranges.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn find(
        &mut self,
        a: &[char],
        b2j: &HashMap<char, Vec<usize>>,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0usize);

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            if let Some(positions) = b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = self.prev[j] + 1;
                    self.cur[j + 1] = k;
                    self.touched_cur.push(j + 1);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            self.advance_row();
        }
        self.clear_row();

        (best_i, best_j, best_k)
    }

    fn advance_row(&mut self) {
        for slot in self.touched_prev.drain(..) {
            self.prev[slot] = 0;
        }
        std::mem::swap(&mut self.prev, &mut self.cur);
        std::mem::swap(&mut self.touched_prev, &mut self.touched_cur);
    }

    fn clear_row(&mut self) {
        for slot in self.touched_prev.drain(..) {
            self.prev[slot] = 0;
        }
    }
}
