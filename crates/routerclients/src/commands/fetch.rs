//! `fetch` and `watch` handlers.

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use routerclients_core::{FirstSeenStore, RouterMonitor};

use crate::cli::{FetchArgs, GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Take one snapshot and print it.
pub async fn handle_fetch(args: FetchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global, &args.store)?;
    debug!(store = %resolved.store_path.display(), "opening first-seen store");
    let monitor = RouterMonitor::new(FirstSeenStore::open(&resolved.store_path));

    let mut interfaces = monitor.fetch(&resolved.router).await?;
    if args.new_only {
        interfaces = output::only_new(interfaces);
    }

    let color = output::should_color(&global.color);
    output::print_output(
        &output::render_snapshot(&resolved.output, &interfaces, color),
        global.quiet,
    );
    Ok(())
}

/// Snapshot on a fixed interval until Ctrl-C.
///
/// A failed fetch is reported and polling continues, except for
/// configuration errors, which no retry can fix.
pub async fn handle_watch(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global, &args.store)?;
    let period = args.interval.unwrap_or(resolved.poll_interval);
    if period.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let monitor = RouterMonitor::new(FirstSeenStore::open(&resolved.store_path));
    let color = output::should_color(&global.color);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval = %humantime::format_duration(period), "watching router");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping");
                return Ok(());
            }
        }

        match monitor.fetch(&resolved.router).await {
            Ok(interfaces) => output::print_output(
                &output::render_snapshot(&resolved.output, &interfaces, color),
                global.quiet,
            ),
            Err(e) if e.is_configuration() => return Err(e.into()),
            Err(e) => eprintln!("{:?}", miette::Report::new(CliError::from(e))),
        }
    }
}
