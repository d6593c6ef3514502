use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

/// One row of an all-vs-all similarity list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarHit {
    pub accession: String,
    pub evalue: f64,
}

impl SimilarHit {
    /// Parses `accession<SP>evalue` lines. Blank lines (including the one after
    /// the final newline) are ignored; malformed lines are skipped with a
    /// warning so one bad row never hides the rest of the list.
    pub fn parse_list(text: &str) -> Vec<SimilarHit> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(idx, line)| match Self::parse_line(line) {
                Some(hit) => Some(hit),
                None => {
                    warn!(line = idx + 1, content = line, "Skipping malformed similarity row.");
                    None
                }
            })
            .collect()
    }

    fn parse_line(line: &str) -> Option<SimilarHit> {
        let mut fields = line.split_whitespace();
        let accession = fields.next()?;
        let evalue = fields.next()?.parse::<f64>().ok()?;
        if fields.next().is_some() || evalue.is_nan() {
            return None;
        }
        Some(SimilarHit {
            accession: accession.to_string(),
            evalue,
        })
    }

    /// Ascending e-value, ties broken by accession.
    pub fn by_evalue(a: &SimilarHit, b: &SimilarHit) -> Ordering {
        a.evalue
            .total_cmp(&b.evalue)
            .then_with(|| a.accession.cmp(&b.accession))
    }
}
