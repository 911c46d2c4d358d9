use cjsx_to_jsx::cli::{build_command, execute, Invocation};
use cjsx_to_jsx::observability::init_tracing;
use cjsx_to_jsx::options::OptionCatalog;
use cjsx_to_jsx::report::Reporter;
use std::io;
use std::process::ExitCode;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    let catalog = OptionCatalog::default();
    let matches = build_command(&catalog).get_matches();
    let invocation = Invocation::from_matches(&matches, &catalog);

    init_tracing(invocation.verbosity, invocation.log_format);

    let reporter = Reporter::default();
    match execute(&invocation, catalog).await {
        Ok(summary) => {
            if let Err(e) = reporter.success(&mut io::stdout().lock(), &invocation.input, &summary.output) {
                warn!(error = %e, output = %summary.output.display(), "Converted, but could not print the report");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Err(e) = reporter.failure(&mut io::stderr().lock(), &err) {
                warn!(error = %e, label = %err.label(), "Could not print the failure report");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
