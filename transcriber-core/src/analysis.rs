//! Pitch-name frequency statistics over a note summary.

use std::fmt;

/// How many distinct names are reported.
pub const TOP_NOTES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub total_notes: usize,
    /// Most frequent names with their counts, most frequent first.
    /// Ties keep first-seen order.
    pub most_common: Vec<(String, usize)>,
}

/// Counts note names in a summary produced by [`crate::sequence::summarize`].
pub fn analyze(summary: &str) -> Analysis {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total_notes = 0;

    for token in summary.split_whitespace() {
        total_notes += 1;
        let name = token.split('(').next().unwrap_or(token);
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }

    // Stable sort, so equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_NOTES);

    Analysis {
        total_notes,
        most_common: counts,
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Total notes: {}", self.total_notes)?;
        let common = self
            .most_common
            .iter()
            .map(|(name, count)| format!("{}({})", name, count))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Most common notes: {}", common)
    }
}
