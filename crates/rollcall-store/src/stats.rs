//! Summary statistics over assessment marks.

/// Mean, median, and range of a set of marks. All `None` when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

/// Summarize a set of marks in any order.
pub fn summarize(marks: &[u32]) -> MarkSummary {
    if marks.is_empty() {
        return MarkSummary::default();
    }

    let mut sorted = marks.to_vec();
    sorted.sort_unstable();

    let total: u64 = sorted.iter().map(|m| u64::from(*m)).sum();
    let mean = total as f64 / sorted.len() as f64;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    };

    MarkSummary {
        mean: Some(mean),
        median: Some(median),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}
