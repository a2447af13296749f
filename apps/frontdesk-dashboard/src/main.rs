mod command;
mod console;
mod render;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use frontdesk_core::config::{
    HttpSettings, DEFAULT_BACKEND_URL, DEFAULT_CALLER_ID, DEFAULT_POLL_INTERVAL_SECS,
};
use frontdesk_core::{Dashboard, HttpBackend, Outcome, Tab};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::console::{ConsoleAnnouncer, ConsoleNotifier};
use crate::render::{frame, Redraw};
use crate::session::{Session, Step};

#[derive(Debug, Parser)]
#[command(
    name = "frontdesk-dashboard",
    version,
    about = "Terminal view of supervisor help requests"
)]
struct Args {
    /// Backend or proxy base address
    #[arg(long, env = "FRONTDESK_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    base: String,
    /// Seconds between poll cycles
    #[arg(long, env = "FRONTDESK_POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: u64,
    /// Caller id sent with simulated calls
    #[arg(long, env = "FRONTDESK_CALLER_ID", default_value = DEFAULT_CALLER_ID)]
    caller_id: String,
    /// Initial tab: pending, resolved, learned or statistics
    #[arg(long, default_value = "pending", value_parser = parse_tab)]
    tab: Tab,
    /// Print the view as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Poll once, print, and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Do not echo spoken feedback or audio links
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn parse_tab(value: &str) -> Result<Tab, String> {
    Tab::from_slug(value).ok_or_else(|| format!("unknown tab '{value}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    frontdesk_otel::init_with_default("warn");
    let args = Args::parse();

    let backend = HttpBackend::with_settings(&args.base, &HttpSettings::from_env())
        .with_context(|| format!("backend address {}", args.base))?;
    let dashboard = Arc::new(
        Dashboard::new(Arc::new(backend))
            .with_notifier(Arc::new(ConsoleNotifier))
            .with_announcer(Arc::new(ConsoleAnnouncer { quiet: args.quiet }))
            .with_caller_id(args.caller_id.clone()),
    );
    dashboard.select_tab(args.tab).await;

    if args.once {
        let outcome = dashboard.refresh().await;
        println!("{}", frame(&dashboard.view().await, args.json));
        if outcome != Outcome::Completed {
            anyhow::bail!("could not load dashboard data from {}", args.base);
        }
        return Ok(());
    }

    watch(dashboard, Duration::from_secs(args.interval.max(1)), args.json).await
}

/// Interactive loop. Backend workflows started from the prompt run on their
/// own tasks, so input, redraws and Ctrl-C stay live while one is waiting.
async fn watch(dashboard: Arc<Dashboard>, period: Duration, json: bool) -> Result<()> {
    let poller = dashboard.start_polling(period);
    let (session, mut finished) = Session::new(dashboard.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(500));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut redraw = Redraw::default();

    if !json {
        println!("type 'help' for commands");
    }
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tick.tick() => {
                if let Some(next) = redraw.changed(&dashboard.view().await, json) {
                    println!("{next}");
                }
            }
            Some(_) = finished.recv() => {
                println!("{}", redraw.force(&dashboard.view().await, json));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let command = match command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                };
                match session.execute(command).await {
                    Step::Quit => break,
                    Step::Print(text) => println!("{text}"),
                    Step::Started => {}
                    Step::Render => {
                        println!("{}", redraw.force(&dashboard.view().await, json));
                    }
                }
            }
        }
    }

    dashboard.teardown();
    poller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_pending_tab() {
        let args = Args::try_parse_from(["frontdesk-dashboard"]).unwrap();
        assert_eq!(args.tab, Tab::Pending);
        assert!(!args.once);
        assert_eq!(args.caller_id, "dashboard_user");
    }

    #[test]
    fn tab_flag_accepts_short_slugs() {
        let args = Args::try_parse_from(["frontdesk-dashboard", "--tab", "stats", "--once"]).unwrap();
        assert_eq!(args.tab, Tab::Statistics);
        assert!(args.once);
        assert!(Args::try_parse_from(["frontdesk-dashboard", "--tab", "archive"]).is_err());
    }
}
