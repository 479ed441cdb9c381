//! Concierge server binary for deployments that want an explicit bin name.
//! Run with: cargo run --bin concierge-server

use std::process::ExitCode;

use hbrothers_concierge::start_concierge;

fn main() -> ExitCode {
    start_concierge::run()
}
