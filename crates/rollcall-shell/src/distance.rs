//! Levenshtein edit distance.

/// Minimum number of single-character insertions, deletions, and
/// substitutions turning `a` into `b`. Operates on `char`s, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    // Rolling rows over the (|a|+1) x (|b|+1) table.
    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0usize; n + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "a",
        "ab",
        "list",
        "lst",
        "lists",
        "listexam",
        "login",
        "logout",
        "S1234567A",
        "S1234567B",
        "S7654321A",
        "kitten",
        "sitting",
        "naïve",
    ];

    #[test]
    fn test_edit_distance_known_values() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "ab"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("lst", "list"), 1);
        assert_eq!(edit_distance("S1234567A", "S1234567B"), 1);
        assert_eq!(edit_distance("login", "logout"), 3);
    }

    #[test]
    fn test_edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("naïve", "naive"), 1);
    }

    #[test]
    fn test_edit_distance_identity() {
        for s in SAMPLES {
            assert_eq!(edit_distance(s, s), 0, "d({s:?}, {s:?})");
        }
    }

    #[test]
    fn test_edit_distance_symmetry() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_edit_distance_triangle_inequality() {
        for a in SAMPLES {
            for b in SAMPLES {
                for c in SAMPLES {
                    assert!(
                        edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c),
                        "{a:?} {b:?} {c:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_edit_distance_bounded_by_longer_length() {
        for a in SAMPLES {
            for b in SAMPLES {
                let longer = a.chars().count().max(b.chars().count());
                let diff = a.chars().count().abs_diff(b.chars().count());
                let d = edit_distance(a, b);
                assert!(d <= longer && d >= diff, "{a:?} {b:?} -> {d}");
            }
        }
    }

    #[test]
    fn test_edit_distance_grows_by_at_most_one_per_edit() {
        let base = "listexam";
        let mut edited = base.to_string();
        let mut last = 0;
        for ch in ['x', 'y', 'z', 'w'] {
            edited.push(ch);
            let d = edit_distance(base, &edited);
            assert!(d >= last && d <= last + 1);
            last = d;
        }
        assert_eq!(last, 4);
    }
}
