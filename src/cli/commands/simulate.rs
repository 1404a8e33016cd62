//! Simulate command - run a virtual session with a random player

use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use indicatif::ProgressBar;

use crate::{
    adapters::{EventLog, InMemoryLedger, MatchEvent},
    app::AppBuilder,
    cli::{
        config::CommonArgs,
        output::{create_session_progress, format_number, print_section, print_stats_table},
    },
    engine::{EndReason, MatchEngine, MatchPhase, RandomOpponent, ScoreTally},
    ports::Opponent,
    tictactoe::Mark,
    types::Generation,
};

/// Virtual time advanced per simulation step
const STEP: Duration = Duration::from_millis(100);

/// A player turn: the match, and the number of marks on its board
type Turn = (Generation, usize);

#[derive(Parser, Debug)]
#[command(about = "Simulate a session against the pop-up scheduler")]
pub struct SimulateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Length of the virtual session in minutes
    #[arg(long, short = 'm', default_value_t = 10)]
    pub minutes: u64,

    /// Time the simulated player takes per move, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub think_ms: u64,

    /// Credit earned points to the ledger file instead of a throwaway ledger
    #[arg(long)]
    pub persist: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// What happened during a simulated session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub matches_opened: usize,
    pub restarts: usize,
    pub popups_skipped: usize,
    pub timeouts: usize,
    pub draws: usize,
    pub points_credited: u64,
    pub tally: ScoreTally,
}

impl SessionSummary {
    fn from_events(events: &[MatchEvent], tally: ScoreTally) -> Self {
        let mut summary = Self {
            tally,
            ..Self::default()
        };
        for event in events {
            match event {
                MatchEvent::Opened { restart: false, .. } => summary.matches_opened += 1,
                MatchEvent::Opened { restart: true, .. } => summary.restarts += 1,
                MatchEvent::PopupSkipped => summary.popups_skipped += 1,
                MatchEvent::Ended {
                    reason: EndReason::TimedOut { .. },
                    ..
                } => summary.timeouts += 1,
                MatchEvent::Ended {
                    reason: EndReason::Draw,
                    ..
                } => summary.draws += 1,
                MatchEvent::Points { award, .. } => {
                    summary.points_credited += u64::from(award.cumulative_points());
                }
                _ => {}
            }
        }
        summary
    }
}

/// Drive `engine` for `duration` of virtual time.
///
/// Whenever it is the player's turn, `player` picks a cell after `think` has
/// passed. `log` must be attached to `engine` as an observer.
pub fn run_session(
    engine: &mut MatchEngine,
    log: &EventLog,
    player: &mut dyn Opponent,
    duration: Duration,
    think: Duration,
    progress: Option<&ProgressBar>,
) -> crate::Result<SessionSummary> {
    let end = engine.now().saturating_add(duration);
    let mut planned: Option<(Turn, Duration)> = None;

    while engine.now() < end {
        let snapshot = engine.snapshot();
        let players_turn =
            snapshot.phase == MatchPhase::Active && snapshot.active_mark == Mark::Player;

        let turn = snapshot
            .generation
            .filter(|_| players_turn)
            .map(|generation| (generation, snapshot.board.filled_count()));
        planned = match (turn, planned) {
            (Some(turn), Some((planned_for, at))) if planned_for == turn => Some((turn, at)),
            (Some(turn), _) => Some((turn, engine.now() + think)),
            (None, _) => None,
        };

        if let Some((_, at)) = planned
            && at <= engine.now()
        {
            let cell = player.select_cell(&snapshot.board)?;
            engine.apply_player_move(cell)?;
            continue;
        }

        let step = STEP.min(end - engine.now());
        engine.advance(step)?;
        if let Some(pb) = progress {
            pb.set_position(engine.now().as_secs());
        }
    }

    Ok(SessionSummary::from_events(&log.events(), engine.tally()))
}

/// Virtual length of a session of `minutes`
fn session_length(minutes: u64) -> Result<Duration> {
    if minutes == 0 {
        return Err(anyhow!("--minutes must be at least 1"));
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("--minutes {minutes} is too long"))
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let duration = session_length(args.minutes)?;

    let settings = args.common.load_settings()?;
    let user = settings.user_id();
    let app = if args.persist {
        args.common.app()
    } else {
        AppBuilder::new().with_ledger(InMemoryLedger::new()).build()
    };

    let mut config = settings.engine_config();
    if let Some(seed) = args.common.seed {
        config = config.with_seed(seed);
    }

    let log = EventLog::new();
    let mut engine = app
        .create_engine(config, &user)?
        .with_observer(Box::new(log.clone()));
    let mut player = match args.common.seed {
        Some(seed) => RandomOpponent::with_seed("player".to_string(), seed.wrapping_add(1)),
        None => RandomOpponent::new("player".to_string()),
    };

    let progress = if args.quiet {
        None
    } else {
        Some(create_session_progress(duration.as_secs())?)
    };
    if let Some(pb) = &progress {
        pb.set_message(format!("{} vs {}", user, engine.opponent_name()));
    }

    let summary = run_session(
        &mut engine,
        &log,
        &mut player,
        duration,
        Duration::from_millis(args.think_ms),
        progress.as_ref(),
    )?;
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    print_section(&format!("Simulated {} minutes", args.minutes));
    print_stats_table(&[
        ("Matches opened", summary.matches_opened.to_string()),
        ("Restarts", summary.restarts.to_string()),
        ("Pop-ups skipped", summary.popups_skipped.to_string()),
        ("Player wins", summary.tally.player_wins.to_string()),
        ("AI wins", summary.tally.opponent_wins.to_string()),
        ("Draws", summary.draws.to_string()),
        ("Timeouts", summary.timeouts.to_string()),
        ("Points credited", format_number(summary.points_credited)),
        ("Stored balance", format_number(app.balance(&user)?)),
    ]);
    Ok(())
}
