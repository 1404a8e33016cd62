//! The match engine: one owner for the board, the countdown, the pop-up
//! scheduler and every deferred callback.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{
    config::{COUNTDOWN_PERIOD, EngineConfig, validate_match_duration},
    events::{EndReason, MoveReport},
    opponent::RandomOpponent,
    scheduler::{PopupScheduler, TickDecision},
    state::{MatchPhase, MatchSnapshot, MatchState, ScoreTally},
};
use crate::{
    Error, Result,
    ports::{MatchObserver, Opponent},
    rewards::{Award, RewardPolicy},
    tictactoe::{Board, GameOutcome, Mark},
    timeline::{Fired, TaskId, Timeline},
    types::{CellIndex, Generation},
};

/// Deferred work on the engine's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    CountdownTick(Generation),
    OpponentMove(Generation),
    AutoReset(Generation),
    CloseAfterTimeout(Generation),
    PopupTick,
}

impl EngineTask {
    fn generation(&self) -> Option<Generation> {
        match *self {
            EngineTask::CountdownTick(g)
            | EngineTask::OpponentMove(g)
            | EngineTask::AutoReset(g)
            | EngineTask::CloseAfterTimeout(g) => Some(g),
            EngineTask::PopupTick => None,
        }
    }
}

/// An observer callback waiting for the current transition to finish
#[derive(Debug, Clone, Copy)]
enum Notice {
    Opened {
        generation: Generation,
        seconds: u32,
        restart: bool,
    },
    MarkPlaced {
        generation: Generation,
        mark: Mark,
        cell: usize,
        board: Board,
    },
    Tick {
        generation: Generation,
        remaining: u32,
    },
    Points {
        generation: Generation,
        award: Award,
    },
    Ended {
        generation: Generation,
        reason: EndReason,
    },
    Closed {
        generation: Generation,
    },
    PopupSkipped,
}

impl Notice {
    fn send_to(&self, observer: &mut dyn MatchObserver) -> Result<()> {
        match *self {
            Notice::Opened {
                generation,
                seconds,
                restart,
            } => observer.on_match_open(generation, seconds, restart),
            Notice::MarkPlaced {
                generation,
                mark,
                cell,
                board,
            } => observer.on_mark_placed(generation, mark, cell, &board),
            Notice::Tick {
                generation,
                remaining,
            } => observer.on_tick(generation, remaining),
            Notice::Points { generation, award } => observer.on_points(generation, award),
            Notice::Ended { generation, reason } => observer.on_match_end(generation, reason),
            Notice::Closed { generation } => observer.on_match_close(generation),
            Notice::PopupSkipped => observer.on_popup_skipped(),
        }
    }
}

/// Pop-up tic-tac-toe engine.
///
/// All state changes go through this type. The player side moves through
/// [`MatchEngine::apply_player_move`]; the opponent moves through
/// [`MatchEngine::apply_opponent_move`], which the engine schedules itself after
/// the configured delay. Time only passes when the driver calls
/// [`MatchEngine::advance`].
///
/// Observers hear about a transition only once it is complete, including the
/// follow-up callbacks it schedules. Every observer receives every event even
/// when one of them fails; the first failure is returned to the caller.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use xo_break::engine::{EngineConfig, MatchEngine, MatchPhase, ScriptedOpponent};
///
/// let config = EngineConfig::new().with_scheduler(false);
/// let mut engine = MatchEngine::new(config, Box::new(ScriptedOpponent::new([3, 4])))?;
///
/// engine.open(30)?;
/// engine.apply_player_move(0)?;
/// engine.advance(Duration::from_millis(500))?; // opponent answers on 3
/// engine.apply_player_move(1)?;
/// engine.advance(Duration::from_millis(500))?; // opponent answers on 4
/// let report = engine.apply_player_move(2)?;
///
/// assert!(report.is_terminal());
/// assert_eq!(engine.snapshot().phase, MatchPhase::Ended);
/// assert_eq!(engine.tally().player_wins, 1);
/// # Ok::<(), xo_break::Error>(())
/// ```
pub struct MatchEngine {
    config: EngineConfig,
    scheduler: PopupScheduler,
    timeline: Timeline<EngineTask>,
    current: Option<MatchState>,
    last_generation: Generation,
    tally: ScoreTally,
    countdown: Option<TaskId>,
    pending_reply: Option<TaskId>,
    popup_task: Option<TaskId>,
    opponent: Box<dyn Opponent>,
    observers: Vec<Box<dyn MatchObserver>>,
    outbox: Vec<Notice>,
}

impl MatchEngine {
    /// Create an engine with the given opponent.
    ///
    /// The opponent is reseeded when the configuration carries a seed. The
    /// pop-up scheduler is armed unless disabled in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: EngineConfig, mut opponent: Box<dyn Opponent>) -> Result<Self> {
        config.validate()?;
        if let Some(seed) = config.seed {
            opponent.set_rng_seed(seed)?;
        }

        let scheduler = PopupScheduler::new(config.interval_minutes)?;
        let mut engine = Self {
            config,
            scheduler,
            timeline: Timeline::new(),
            current: None,
            last_generation: Generation::default(),
            tally: ScoreTally::default(),
            countdown: None,
            pending_reply: None,
            popup_task: None,
            opponent,
            observers: Vec::new(),
            outbox: Vec::new(),
        };
        if engine.config.scheduler_enabled {
            engine.arm_scheduler();
        }
        Ok(engine)
    }

    /// Create an engine with a [`RandomOpponent`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration is invalid.
    pub fn with_random_opponent(config: EngineConfig) -> Result<Self> {
        let opponent = match config.seed {
            Some(seed) => RandomOpponent::with_seed("AI".to_string(), seed),
            None => RandomOpponent::new("AI".to_string()),
        };
        Self::new(config, Box::new(opponent))
    }

    /// Attach an observer
    pub fn with_observer(mut self, observer: Box<dyn MatchObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Attach an observer to an existing engine
    pub fn add_observer(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &PopupScheduler {
        &self.scheduler
    }

    pub fn tally(&self) -> ScoreTally {
        self.tally
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// Current phase of the match slot
    pub fn phase(&self) -> MatchPhase {
        self.current
            .as_ref()
            .map_or(MatchPhase::Closed, MatchState::phase)
    }

    /// The open match, if any
    pub fn current(&self) -> Option<&MatchState> {
        self.current.as_ref()
    }

    /// Polling view of the engine
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::of(self.current.as_ref(), self.tally, self.timeline.now())
    }

    /// Time of the next deferred callback, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_due()
    }

    /// Open a match with a countdown of `duration_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchAlreadyOpen`] if a match is open and
    /// [`Error::InvalidConfiguration`] for a zero duration. Neither changes state.
    /// An observer error is returned after the match has opened.
    pub fn open(&mut self, duration_seconds: u32) -> Result<Generation> {
        if self.current.is_some() {
            return Err(Error::MatchAlreadyOpen);
        }
        validate_match_duration(duration_seconds)?;
        let generation = self.begin_match(duration_seconds, false);
        self.deliver(Ok(generation))
    }

    /// Close the open match, cancelling its countdown and every pending
    /// callback, and release the scheduler's open flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotOpen`] if no match is open.
    pub fn close(&mut self) -> Result<()> {
        let closed = self.close_match();
        self.deliver(closed)
    }

    /// Pop-up scheduler tick: opens a match with the configured duration
    /// unless one is already open.
    ///
    /// Returns the new match's generation, or `None` if the tick was dropped.
    ///
    /// # Errors
    ///
    /// Propagates observer errors.
    pub fn tick(&mut self) -> Result<Option<Generation>> {
        let opened = self.popup_tick();
        self.deliver(Ok(opened))
    }

    /// Change the pop-up period. The pending pop-up tick is rescheduled from
    /// now with the new period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a non-positive or non-finite
    /// period; the previous period stays in force.
    pub fn configure(&mut self, interval_minutes: f64) -> Result<()> {
        let interval = match self.scheduler.configure(interval_minutes) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(interval_minutes, "rejected pop-up interval: {e}");
                return Err(e);
            }
        };
        self.config.interval_minutes = interval_minutes;
        info!(?interval, "pop-up interval configured");

        if self.popup_task.is_some() {
            self.arm_scheduler();
        }
        Ok(())
    }

    /// Change the countdown length used by future matches and restarts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for zero; the previous value
    /// stays in force.
    pub fn set_match_duration(&mut self, seconds: u32) -> Result<()> {
        if let Err(e) = validate_match_duration(seconds) {
            warn!(seconds, "rejected match duration: {e}");
            return Err(e);
        }
        self.config.match_duration = seconds;
        Ok(())
    }

    /// Arm the pop-up scheduler, replacing any pending pop-up tick.
    pub fn arm_scheduler(&mut self) {
        if let Some(id) = self.popup_task.take() {
            self.timeline.cancel(id);
        }
        let interval = self.scheduler.interval();
        self.popup_task = Some(self.timeline.schedule(interval, EngineTask::PopupTick));
    }

    /// Stop unattended pop-ups. Open matches are unaffected.
    pub fn disarm_scheduler(&mut self) {
        if let Some(id) = self.popup_task.take() {
            self.timeline.cancel(id);
        }
    }

    pub fn is_scheduler_armed(&self) -> bool {
        self.popup_task.is_some()
    }

    /// Place the player's mark on `cell`.
    ///
    /// Awards the per-move points, then checks for a win before a draw. If the
    /// board is still open the turn passes to the opponent, whose reply is
    /// scheduled after the configured delay.
    ///
    /// # Errors
    ///
    /// Rejections leave the board untouched:
    /// [`Error::InvalidPosition`], [`Error::MatchNotActive`],
    /// [`Error::OutOfTurn`] and [`Error::CellOccupied`]. An observer error is
    /// returned only after the move and its follow-up work are committed.
    pub fn apply_player_move(&mut self, cell: usize) -> Result<MoveReport> {
        let report = self.player_move(cell);
        self.deliver(report)
    }

    /// Let the opponent place its mark now.
    ///
    /// Normally called by the engine when the reply delay elapses; calling it
    /// directly cancels the scheduled reply.
    ///
    /// # Errors
    ///
    /// Rejections leave the board untouched: [`Error::MatchNotActive`],
    /// [`Error::OutOfTurn`] and [`Error::NoEmptyCells`]. Errors from the
    /// opponent port propagate.
    pub fn apply_opponent_move(&mut self) -> Result<MoveReport> {
        let report = self.opponent_move();
        self.deliver(report)
    }

    /// Move virtual time forward by `elapsed`, running every callback that
    /// falls due on the way, in order.
    ///
    /// # Errors
    ///
    /// Returns the first observer or opponent error. Later callbacks still run
    /// and the clock still reaches its target. Callbacks left behind by a
    /// closed or restarted match are ignored rather than reported.
    pub fn advance(&mut self, elapsed: Duration) -> Result<()> {
        let until = self.timeline.now().saturating_add(elapsed);
        self.advance_to(until)
    }

    /// Move virtual time forward to the absolute instant `until`.
    ///
    /// # Errors
    ///
    /// See [`MatchEngine::advance`].
    pub fn advance_to(&mut self, until: Duration) -> Result<()> {
        let mut first_error = None;
        while let Some(fired) = self.timeline.pop_due(until) {
            let ran = self.run_task(fired);
            if let Err(e) = self.deliver(ran) {
                first_error.get_or_insert(e);
            }
        }
        self.timeline.settle(until);
        first_error.map_or(Ok(()), Err)
    }

    fn run_task(&mut self, fired: Fired<EngineTask>) -> Result<()> {
        let task = fired.task;
        if let Some(generation) = task.generation()
            && !self.is_live(generation)
        {
            debug!(?task, "ignoring stale callback");
            return Ok(());
        }

        match task {
            EngineTask::CountdownTick(generation) => {
                self.countdown = None;
                self.countdown_tick(generation);
                Ok(())
            }
            EngineTask::OpponentMove(_) => {
                self.pending_reply = None;
                match self.opponent_move() {
                    Ok(report) => {
                        debug!(cell = report.cell, "opponent replied");
                        Ok(())
                    }
                    Err(e) if e.is_rejection() => {
                        debug!("opponent reply skipped: {e}");
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            EngineTask::AutoReset(_) => {
                let seconds = self.config.match_duration;
                self.begin_match(seconds, true);
                Ok(())
            }
            EngineTask::CloseAfterTimeout(_) => self.close_match(),
            EngineTask::PopupTick => {
                self.popup_task = None;
                self.arm_scheduler();
                self.popup_tick();
                Ok(())
            }
        }
    }

    fn is_live(&self, generation: Generation) -> bool {
        self.current
            .as_ref()
            .is_some_and(|state| state.generation == generation)
    }

    fn active_state(&self) -> Result<&MatchState> {
        match &self.current {
            Some(state) if state.is_active => Ok(state),
            _ => Err(Error::MatchNotActive),
        }
    }

    fn close_match(&mut self) -> Result<()> {
        let state = self.current.take().ok_or(Error::MatchNotOpen)?;
        let generation = state.generation;

        let cancelled = self.cancel_match_tasks(generation);
        self.scheduler.set_match_open(false);
        info!(%generation, cancelled, "match closed");

        self.announce(Notice::Closed { generation });
        Ok(())
    }

    fn popup_tick(&mut self) -> Option<Generation> {
        match self.scheduler.tick() {
            TickDecision::Open => Some(self.begin_match(self.config.match_duration, false)),
            TickDecision::Skip => {
                debug!("pop-up tick dropped, match already open");
                self.announce(Notice::PopupSkipped);
                None
            }
        }
    }

    fn player_move(&mut self, cell: usize) -> Result<MoveReport> {
        let cell = CellIndex::new(cell)?.value();
        let generation = self.place_mark(Mark::Player, cell)?;

        let award = RewardPolicy::for_move();
        self.grant(generation, award);

        let outcome = self.board_outcome();
        match outcome {
            Some(outcome) => self.finish(generation, outcome),
            None => {
                self.hand_turn_to(Mark::Opponent);
                self.pending_reply = Some(
                    self.timeline
                        .schedule(self.config.opponent_delay, EngineTask::OpponentMove(generation)),
                );
            }
        }

        Ok(MoveReport {
            generation,
            mark: Mark::Player,
            cell,
            award: Some(award),
            outcome,
        })
    }

    fn opponent_move(&mut self) -> Result<MoveReport> {
        let state = self.active_state()?;
        if state.active_mark != Mark::Opponent {
            return Err(Error::OutOfTurn {
                current: state.active_mark.to_string(),
            });
        }
        if state.board.is_full() {
            return Err(Error::NoEmptyCells);
        }
        let board = state.board;

        if let Some(id) = self.pending_reply.take() {
            self.timeline.cancel(id);
        }

        let cell = self.opponent.select_cell(&board)?;
        let generation = self.place_mark(Mark::Opponent, cell)?;

        let outcome = self.board_outcome();
        match outcome {
            Some(outcome) => self.finish(generation, outcome),
            None => self.hand_turn_to(Mark::Player),
        }

        Ok(MoveReport {
            generation,
            mark: Mark::Opponent,
            cell,
            award: None,
            outcome,
        })
    }

    /// The single writer for board cells.
    fn place_mark(&mut self, mark: Mark, cell: usize) -> Result<Generation> {
        let state = match &mut self.current {
            Some(state) if state.is_active => state,
            _ => return Err(Error::MatchNotActive),
        };
        if state.active_mark != mark {
            return Err(Error::OutOfTurn {
                current: state.active_mark.to_string(),
            });
        }

        state.board = state.board.with_mark(cell, mark)?;
        let generation = state.generation;
        let board = state.board;
        debug!(%generation, %mark, cell, "mark placed");

        self.announce(Notice::MarkPlaced {
            generation,
            mark,
            cell,
            board,
        });
        Ok(generation)
    }

    fn board_outcome(&self) -> Option<GameOutcome> {
        self.current.as_ref().and_then(|state| state.board.outcome())
    }

    fn hand_turn_to(&mut self, mark: Mark) {
        if let Some(state) = self.current.as_mut() {
            state.active_mark = mark;
        }
    }

    fn begin_match(&mut self, duration_seconds: u32, restart: bool) -> Generation {
        if let Some(previous) = self.current.as_ref().map(|state| state.generation) {
            self.cancel_match_tasks(previous);
        }

        let generation = self.last_generation.next();
        self.last_generation = generation;
        self.current = Some(MatchState::new(generation, duration_seconds));
        self.scheduler.set_match_open(true);
        self.start_countdown(generation);
        info!(%generation, duration_seconds, restart, "match opened");

        self.announce(Notice::Opened {
            generation,
            seconds: duration_seconds,
            restart,
        });
        generation
    }

    fn start_countdown(&mut self, generation: Generation) {
        if let Some(id) = self.countdown.take() {
            self.timeline.cancel(id);
        }
        self.countdown = Some(
            self.timeline
                .schedule(COUNTDOWN_PERIOD, EngineTask::CountdownTick(generation)),
        );
    }

    fn countdown_tick(&mut self, generation: Generation) {
        let Some(state) = self.current.as_mut().filter(|s| s.is_active) else {
            return;
        };
        state.seconds_remaining = state.seconds_remaining.saturating_sub(1);
        let remaining = state.seconds_remaining;

        self.announce(Notice::Tick {
            generation,
            remaining,
        });

        if remaining == 0 {
            self.end_by_timeout(generation);
        } else {
            self.start_countdown(generation);
        }
    }

    fn end_by_timeout(&mut self, generation: Generation) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        let filled_cells = state.board.filled_count();
        let reason = EndReason::TimedOut { filled_cells };
        state.is_active = false;
        state.end_reason = Some(reason);
        self.cancel_match_tasks(generation);
        self.timeline
            .schedule(self.config.close_delay, EngineTask::CloseAfterTimeout(generation));

        let award = RewardPolicy::for_timeout(filled_cells);
        info!(%generation, filled_cells, points = award.points, "match timed out");
        self.grant(generation, award);
        self.announce(Notice::Ended { generation, reason });
    }

    fn finish(&mut self, generation: Generation, outcome: GameOutcome) {
        let reason = EndReason::from(outcome);
        if let Some(state) = self.current.as_mut() {
            state.is_active = false;
            state.end_reason = Some(reason);
        }
        self.cancel_match_tasks(generation);
        self.timeline
            .schedule(self.config.reset_delay, EngineTask::AutoReset(generation));

        if let GameOutcome::Win(mark) = outcome {
            self.tally.record_win(mark);
        }
        info!(%generation, ?outcome, "match finished");

        if let Some(award) = RewardPolicy::for_outcome(outcome) {
            self.grant(generation, award);
        }
        self.announce(Notice::Ended { generation, reason });
    }

    fn grant(&mut self, generation: Generation, award: Award) {
        if let Some(state) = self.current.as_mut() {
            state.session_points += award.session_points();
        }
        if award.points > 0 {
            self.announce(Notice::Points { generation, award });
        }
    }

    /// Drop the countdown, the pending reply and every other callback keyed to
    /// `generation`.
    fn cancel_match_tasks(&mut self, generation: Generation) -> usize {
        self.countdown = None;
        self.pending_reply = None;
        self.timeline
            .cancel_where(|task| task.generation() == Some(generation))
    }

    fn announce(&mut self, notice: Notice) {
        self.outbox.push(notice);
    }

    /// Hand every queued notice to every observer, then return `result`, or
    /// the first observer error if `result` is fine.
    fn deliver<T>(&mut self, result: Result<T>) -> Result<T> {
        let mut first_error = None;
        for notice in std::mem::take(&mut self.outbox) {
            for observer in &mut self.observers {
                if let Err(e) = notice.send_to(observer.as_mut()) {
                    warn!(?notice, "observer failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }
        let value = result?;
        first_error.map_or(Ok(value), Err)
    }
}
