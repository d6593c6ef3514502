use super::{load_context, resolve_config};
use crate::cli::{SourceArgs, VerifyArgs};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use afdb_clusters::engine::progress::ProgressReporter;
use afdb_clusters::workflows::verify::{self, TraceIssue};
use tracing::info;

pub fn run(args: VerifyArgs, source: &SourceArgs) -> Result<()> {
    let app = resolve_config(source, false)?;
    let ctx = load_context(&app)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    info!(
        threads = rayon::current_num_threads(),
        "Verifying C-alpha traces..."
    );
    let report = verify::run(&ctx, &reporter);

    println!("Checked {} C-alpha traces:", report.checked);
    println!("  missing sequence   {:>10}", report.missing_sequence);
    println!("  decode failures    {:>10}", report.decode_failures);
    println!("  implausible steps  {:>10}", report.implausible);

    for (accession, issue) in report.issues.iter().take(args.show) {
        let detail = match issue {
            TraceIssue::MissingSequence => "no sequence record".to_string(),
            TraceIssue::DecodeFailed(message) => message.clone(),
            TraceIssue::ImplausibleStep { max_step } => {
                format!("C-alpha step of {:.2} Å", max_step)
            }
        };
        println!("  {:<14} {}", accession, detail);
    }
    if report.issues.len() > args.show {
        println!("  ... {} more", report.issues.len() - args.show);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::VerificationFailed(report.issues.len()))
    }
}
