use std::io::{self, Write};

use agent_filter_core::{FilterReport, RejectReason};
use agent_filter_engine::{load_proxy_file, AgentFilter};
use anyhow::Context;
use engine_logging::{engine_info, engine_warn};

use crate::config::RunConfig;

pub fn execute(config: RunConfig, pick: bool) -> anyhow::Result<()> {
    let RunConfig {
        input,
        output,
        proxy_file,
        mut filter,
        transport,
    } = config;

    if let Some(path) = &proxy_file {
        filter.proxy = load_proxy_file(path)?;
    }
    if transport.accept_invalid_certs {
        engine_warn!("TLS certificate verification is disabled for {}", filter.target);
    }
    match &filter.proxy {
        Some(proxy) => engine_info!("Probing {} through proxy {}", filter.target, proxy),
        None => engine_info!("Probing {} without a proxy", filter.target),
    }

    // Probing is strictly sequential, so a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let agent_filter = AgentFilter::with_reqwest(filter, transport);

    match runtime.block_on(agent_filter.run(&input, output.as_deref())) {
        Ok(report) => {
            summarize(&report);
            if output.is_none() {
                print_accepted(&report)?;
            }
            if pick {
                print_pick(&report)?;
            }
            Ok(())
        }
        Err(err) => {
            // Keep whatever was accepted even though it could not be saved.
            if let Some(report) = err.report() {
                summarize(report);
                print_accepted(report)?;
            }
            Err(err.into())
        }
    }
}

fn summarize(report: &FilterReport) {
    let blocked = report.count_rejected(|reason| *reason == RejectReason::Forbidden);
    let timeouts = report.count_rejected(|reason| *reason == RejectReason::Timeout);
    engine_info!(
        "Probed {} user agents: {} accepted, {} rejected ({} forbidden, {} timed out), {} blank lines skipped",
        report.probed(),
        report.accepted.len(),
        report.rejected.len(),
        blocked,
        timeouts,
        report.skipped_blank
    );
}

fn print_accepted(report: &FilterReport) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for identity in report.accepted() {
        writeln!(stdout, "{identity}")?;
    }
    Ok(())
}

fn print_pick(report: &FilterReport) -> anyhow::Result<()> {
    match report.accepted.choose(&mut rand::thread_rng()) {
        Some(identity) => writeln!(io::stdout(), "{identity}")?,
        None => engine_warn!("No accepted user agent to pick from"),
    }
    Ok(())
}
