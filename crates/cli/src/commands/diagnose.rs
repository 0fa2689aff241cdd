//! Connectivity diagnostics and push self-test.
//!
//! # Usage
//!
//! ```bash
//! cartaozinho diagnose
//! cartaozinho push test
//! ```

use std::io::{BufRead, Write};

use cartaozinho_client::ApiError;

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Ask the backend to push a test notification to this device.
pub async fn push_test<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<(), CliError> {
    let outcome = app
        .scope()
        .run(app.session().test_push_notification())
        .await?;

    if !outcome.success {
        return Err(ApiError::Api {
            status: outcome.status,
            message: outcome
                .message
                .unwrap_or_else(|| "Push notification failed".to_string()),
        }
        .into());
    }

    writeln!(
        console.out,
        "Test notification sent. Check your device."
    )?;
    Ok(())
}

/// Run every connectivity check and report each result.
///
/// Individual failures are reported inline; the command itself only fails
/// on terminal errors.
pub async fn run<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<(), CliError> {
    let api = app.api();
    writeln!(console.out, "API URL:  {}", api.base_url())?;

    match app.run(api.health()).await {
        Ok(report) => {
            let database = if report.database.is_connected() {
                "connected"
            } else {
                "disconnected"
            };
            writeln!(
                console.out,
                "Health:   {} (database {database}, uptime {})",
                report.status,
                uptime(report.uptime)
            )?;
        }
        Err(e) => failure(console, "Health", &e)?,
    }

    match app.run(api.ping()).await {
        Ok(ping) => writeln!(
            console.out,
            "Latency:  {} ms (HEAD /health answered {})",
            ping.latency.as_millis(),
            ping.status
        )?,
        Err(e) => failure(console, "Latency", &e)?,
    }

    match app.session().push_token() {
        Some(token) => writeln!(console.out, "Push:     {}", render::token_preview(&token))?,
        None => writeln!(console.out, "Push:     no token (notifications disabled)")?,
    }

    match app.run(api.probe_auth()).await {
        Ok(probe) if probe.endpoint_works() => writeln!(
            console.out,
            "Auth:     endpoint working (status {})",
            probe.status
        )?,
        Ok(probe) => writeln!(
            console.out,
            "Auth:     endpoint failing (status {}): {}",
            probe.status,
            probe.body.trim()
        )?,
        Err(e) => failure(console, "Auth", &e)?,
    }

    match app.session().current_user() {
        Some(user) => writeln!(
            console.out,
            "Session:  {} ({}, id {})",
            user.name, user.user_type, user.id
        )?,
        None => writeln!(console.out, "Session:  logged out")?,
    }
    Ok(())
}

fn failure<R, W: Write>(
    console: &mut Console<R, W>,
    check: &str,
    err: &CliError,
) -> Result<(), CliError> {
    if matches!(err, CliError::Api(ApiError::Cancelled)) {
        return Err(ApiError::Cancelled.into());
    }

    let alert = err.alert();
    writeln!(console.out, "{check:<9} FAILED: {}", alert.title)?;
    for line in alert.body.lines().filter(|line| !line.trim().is_empty()) {
        writeln!(console.out, "          {line}")?;
    }
    Ok(())
}

/// `1h 02m 03s`
fn uptime(seconds: f64) -> String {
    // negative or NaN uptimes render as zero
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0) as u64;
    let (hours, minutes, secs) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}
