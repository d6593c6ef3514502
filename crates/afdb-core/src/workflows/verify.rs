use crate::core::codec::CoordinateTrace;
use crate::core::models::trim_record;
use crate::engine::context::AppContext;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Consecutive C-alpha atoms in a real chain sit about 3.8 Å apart; anything
/// beyond this points at a corrupt record or a mismatched sequence.
pub const MAX_PLAUSIBLE_STEP: f32 = 4.5;

#[derive(Debug, Clone, PartialEq)]
pub enum TraceIssue {
    MissingSequence,
    DecodeFailed(String),
    ImplausibleStep { max_step: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub checked: usize,
    pub missing_sequence: usize,
    pub decode_failures: usize,
    pub implausible: usize,
    /// Every flagged accession, sorted by accession.
    pub issues: Vec<(String, TraceIssue)>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn record(&mut self, accession: &str, issue: Option<TraceIssue>) {
        self.checked += 1;
        let Some(issue) = issue else {
            return;
        };
        match issue {
            TraceIssue::MissingSequence => self.missing_sequence += 1,
            TraceIssue::DecodeFailed(_) => self.decode_failures += 1,
            TraceIssue::ImplausibleStep { .. } => self.implausible += 1,
        }
        self.issues.push((accession.to_string(), issue));
    }
}

/// Decodes every C-alpha record against its sequence length and checks the
/// resulting geometry.
#[instrument(skip_all, name = "verify_workflow")]
pub fn run(ctx: &AppContext, reporter: &ProgressReporter) -> VerifyReport {
    let traces: Vec<(&str, &[u8])> = ctx.ca_traces().records().collect();
    reporter.report(Progress::TaskStart {
        total_steps: traces.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = traces.iter();

    #[cfg(feature = "parallel")]
    let iterator = traces.par_iter();

    let outcomes: Vec<Option<TraceIssue>> = iterator
        .map(|&(accession, block)| {
            let outcome = check_trace(ctx, accession, block);
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let mut report = VerifyReport::default();
    for (&(accession, _), outcome) in traces.iter().zip(outcomes) {
        report.record(accession, outcome);
    }

    if report.is_clean() {
        info!(checked = report.checked, "All C-alpha traces verified.");
    } else {
        warn!(
            checked = report.checked,
            missing_sequence = report.missing_sequence,
            decode_failures = report.decode_failures,
            implausible = report.implausible,
            "C-alpha verification found problems."
        );
    }
    report
}

fn check_trace(ctx: &AppContext, accession: &str, block: &[u8]) -> Option<TraceIssue> {
    let Some(sequence) = ctx.sequences().get(accession) else {
        return Some(TraceIssue::MissingSequence);
    };
    let residue_count = trim_record(sequence).len();

    match CoordinateTrace::decode(block, residue_count, block.len()) {
        Err(e) => Some(TraceIssue::DecodeFailed(e.to_string())),
        Ok(trace) => match trace.max_step() {
            Some(max_step) if max_step > MAX_PLAUSIBLE_STEP => {
                Some(TraceIssue::ImplausibleStep { max_step })
            }
            _ => None,
        },
    }
}
