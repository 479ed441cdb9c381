//! Binary entrypoint that launches the concierge server.

use std::process::ExitCode;

use hbrothers_concierge::start_concierge;

/// Start the concierge server with the environment-driven configuration.
fn main() -> ExitCode {
    start_concierge::run()
}
