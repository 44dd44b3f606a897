//! The daemon's main loop.

use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mailbox_core::{LineOutcome, MailboxMonitor, NotificationDispatcher, Notifier};
use tracing::{debug, info};

use crate::config::{Args, InputSource};
use crate::error::RunnerResult;
use crate::line_api::{LineMessagingNotifier, LogNotifier};
use crate::source::{find_port, open_serial, LineSource, ReaderLineSource, SourceError, SourceEvent};

/// Counters for one run over a line source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read from the source.
    pub lines: u64,
    /// Lines the decoder rejected.
    pub rejected: u64,
    /// Frames whose magnetic status was applied.
    pub observed: u64,
    /// Frames without a magnetic entry.
    pub without_magnet: u64,
    /// Notifications queued.
    pub notifications: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Rejected(_) => self.rejected += 1,
            LineOutcome::NoMagneticEntry(_) => self.without_magnet += 1,
            LineOutcome::Observed { update, .. } => {
                self.observed += 1;
                if update.should_notify() {
                    self.notifications += 1;
                }
            }
        }
    }
}

/// Feed every line from `source` to `monitor` until the source closes or
/// `stop` is set.
///
/// Lines are applied strictly in arrival order.
pub fn process_source(
    monitor: &MailboxMonitor,
    source: &mut dyn LineSource,
    stop: &AtomicBool,
) -> Result<RunSummary, SourceError> {
    let mut summary = RunSummary::default();

    while !stop.load(Ordering::SeqCst) {
        match source.poll_line()? {
            SourceEvent::Line(line) => {
                let outcome = monitor.process_line(&line);
                summary.record(&outcome);
            }
            SourceEvent::Idle => continue,
            SourceEvent::Closed => {
                debug!("line source closed");
                break;
            }
        }
    }

    Ok(summary)
}

fn build_notifier(args: &Args) -> RunnerResult<Box<dyn Notifier>> {
    if args.dry_run {
        return Ok(Box::new(LogNotifier));
    }
    let token = args.token.clone().unwrap_or_default();
    let notifier = LineMessagingNotifier::new(
        token,
        &args.endpoint,
        Duration::from_secs(args.notify_timeout),
    )?;
    Ok(Box::new(notifier))
}

fn open_source(args: &Args) -> RunnerResult<Box<dyn LineSource>> {
    let source: Box<dyn LineSource> = match args.input_source() {
        InputSource::Stdin => {
            info!("reading lines from stdin");
            Box::new(ReaderLineSource::new(std::io::stdin()))
        }
        InputSource::File(path) => {
            info!(path = %path.display(), "replaying capture file");
            Box::new(ReaderLineSource::new(File::open(&path)?))
        }
        InputSource::Serial(port) => {
            let port = match port {
                Some(port) => port,
                None => {
                    let port = find_port(&args.manufacturer)?;
                    info!(port = %port, manufacturer = %args.manufacturer, "gateway found");
                    port
                }
            };
            Box::new(ReaderLineSource::new(open_serial(&port, args.baud)?))
        }
    };
    Ok(source)
}

/// Run the daemon until the source closes or `stop` is set.
pub fn run(args: &Args, stop: Arc<AtomicBool>) -> RunnerResult<RunSummary> {
    args.validate()?;

    let dispatcher = NotificationDispatcher::spawn(build_notifier(args)?)?;
    let monitor = MailboxMonitor::new(args.monitor_config(), dispatcher);
    let mut source = open_source(args)?;

    let result = process_source(&monitor, source.as_mut(), &stop);

    let pending = monitor.pending_notifications();
    if pending > 0 {
        info!(pending, "waiting for queued notifications");
    }
    monitor.shutdown();

    let summary = result?;
    info!(
        lines = summary.lines,
        rejected = summary.rejected,
        observed = summary.observed,
        notifications = summary.notifications,
        "stopped"
    );
    Ok(summary)
}
