//! Handlers for `sweep` (one run) and `watch` (interval loop)

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::common::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::duration::{format_compact, parse_duration};
use crate::error::{HelpdeskError, Result};
use crate::integration::IntegrationEvent;
use crate::sweep::{ClosureSweeper, SweepReport};

pub async fn handle_sweep_command(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let sweeper = ClosureSweeper::new(ctx.manager.clone());

    let spinner = (!output.is_json()).then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Closing aged resolutions...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });
    let result = sweeper.sweep_once().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    if output.is_json() {
        output.print_json(&report)?;
    } else {
        print_report(&report, output);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(HelpdeskError::TransientStore(format!(
            "{} ticket(s) could not be closed; they will be retried on the next sweep",
            report.failed.len()
        )))
    }
}

/// Sweep on an interval until Ctrl-C, printing closures as they happen
pub async fn handle_watch_command(
    interval: Option<&str>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let interval = match interval {
        Some(text) => parse_duration(text)?,
        None => ctx.config.lifecycle.sweep_interval,
    };
    let period = interval
        .to_std()
        .map_err(|_| HelpdeskError::Config("sweep interval must be positive".to_string()))?;

    output.info(&format!(
        "Watching {} (sweep every {}, closure after {}). Press Ctrl-C to stop",
        ctx.config.project.name,
        format_compact(interval),
        format_compact(ctx.manager.policy().closure_threshold),
    ));

    let shutdown = CancellationToken::new();
    let mut events = ctx.manager.subscribe();
    let sweeper = ClosureSweeper::new(ctx.manager.clone());
    let sweep_shutdown = shutdown.clone();
    let json = output.is_json();
    let sweep_task = tokio::spawn(async move {
        sweeper
            .run(period, sweep_shutdown, |report| {
                if json && !report.is_empty() {
                    if let Ok(line) = serde_json::to_string(report) {
                        println!("{line}");
                    }
                }
            })
            .await;
    });

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, output),
                Err(RecvError::Lagged(skipped)) => {
                    output.warning(&format!("{skipped} event(s) dropped"));
                },
                Err(RecvError::Closed) => break,
            },
        }
    }

    shutdown.cancel();
    sweep_task
        .await
        .map_err(|e| HelpdeskError::custom(format!("Sweep task failed: {e}")))?;
    output.info("Stopped");
    Ok(())
}

fn print_report(report: &SweepReport, output: &OutputFormatter) {
    if report.is_empty() {
        output.info("No tickets due for closure");
        return;
    }
    for entry in &report.closed {
        output.success(&format!("Closed {}", entry.reference));
    }
    for entry in &report.skipped {
        output.info(&format!("Skipped {} (changed since the query)", entry.reference));
    }
    for failure in &report.failed {
        output.error(&format!("Failed {}: {}", failure.reference, failure.error));
    }
    output.info(&format!(
        "{} closed, {} skipped, {} failed",
        report.closed.len(),
        report.skipped.len(),
        report.failed.len()
    ));
}

fn print_event(event: &IntegrationEvent, output: &OutputFormatter) {
    match event {
        IntegrationEvent::TicketClosed { reference, message, .. } => {
            output.success(&format!("{reference}: {message}"));
        },
        IntegrationEvent::StatusChanged {
            reference,
            old_status,
            new_status,
            ..
        } => output.info(&format!("{reference}: {old_status} -> {new_status}")),
        IntegrationEvent::TicketCreated { ticket } => {
            output.info(&format!("{}: submitted", ticket.display_ref()));
        },
    }
}
