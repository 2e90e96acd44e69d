use clap::Args;
use focusbeam_core::{format_clock, Config, Event, Intent, SessionType, Snapshot, TimerDriver};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

#[derive(Args)]
pub struct TimerArgs {
    /// Session type to run (defaults to timer.start_type)
    #[arg(long = "type")]
    session: Option<SessionType>,
    /// Override the configured minutes for this run (clamped to the type's range)
    #[arg(long)]
    minutes: Option<u32>,
    /// Print events (including state snapshots) as JSON lines
    #[arg(long)]
    json: bool,
}

pub async fn run(args: TimerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut timer = config.session_timer();
    let session = args.session.unwrap_or(config.timer.start_type);
    timer.select_type(session);
    if let Some(minutes) = args.minutes {
        let current = i64::from(timer.durations().minutes(session));
        timer.adjust_duration(session, i64::from(minutes) - current);
        let applied = timer.durations().minutes(session);
        if applied != minutes {
            let (min, max) = session.bounds();
            tracing::warn!(requested = minutes, applied, "minutes outside {min}..={max}, clamped");
        }
    }

    let handle = TimerDriver::spawn(timer);
    let mut snapshots = handle.snapshots();
    let mut events = handle.subscribe();
    handle.send(Intent::Start).await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            // Polled first so the handler is installed before any output.
            biased;

            _ = &mut ctrl_c => {
                handle.send(Intent::Pause).await?;
                tracing::info!("interrupted");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                if !args.json {
                    print_clock(&snap);
                }
                if snap.just_finished {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, args.json)?,
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "event stream lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    let timer = handle.shutdown().await?;
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&event, args.json)?,
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    if !args.json {
        let stats = timer.stats();
        println!(
            "Completed focus blocks: {}  Total focus: {} min",
            stats.completed_focus_blocks, stats.total_focus_minutes
        );
    }
    Ok(())
}

fn print_clock(snap: &Snapshot) {
    println!("{} {}", snap.current_type.label(), format_clock(snap.seconds_left));
}

fn print_event(event: &Event, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else if let Event::TimerCompleted { session_type, duration_min, .. } = event {
        println!("{session_type} finished ({duration_min} min)");
    }
    Ok(())
}
