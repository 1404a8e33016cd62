//! Match lifecycle tests: countdown, wins, timeouts, scheduler and stale
//! callbacks, driven through the public engine API.

mod common;

use std::{sync::Arc, time::Duration};

use common::{REPLY, advance_secs, engine_with_config, fresh_opens, ledger_engine, scripted_engine};
use xo_break::{
    Error,
    adapters::{InMemoryLedger, LedgerObserver, MatchEvent},
    engine::{EndReason, EngineConfig, MatchPhase},
    ports::PointsLedger,
    tictactoe::{Board, GameOutcome, Mark},
    types::UserId,
};

mod countdown {
    use super::*;

    #[test]
    fn test_counts_down_one_per_second_and_ends_at_zero() {
        let (mut engine, log) = scripted_engine(&[]);
        engine.open(30).unwrap();

        for expected in (1..30).rev() {
            engine.advance(Duration::from_secs(1)).unwrap();
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.seconds_remaining, expected);
            assert_eq!(snapshot.phase, MatchPhase::Active, "still active at {expected}s");
        }

        engine.advance(Duration::from_secs(1)).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.seconds_remaining, 0);
        assert_eq!(snapshot.phase, MatchPhase::Ended);
        assert_eq!(
            snapshot.end_reason,
            Some(EndReason::TimedOut { filled_cells: 0 })
        );

        let ticks: Vec<u32> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                MatchEvent::Tick {
                    seconds_remaining, ..
                } => Some(*seconds_remaining),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, (0..30).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_moves_rejected_after_timeout() {
        let (mut engine, _) = scripted_engine(&[]);
        engine.open(1).unwrap();
        engine.advance(Duration::from_secs(1)).unwrap();

        let before = engine.snapshot().board;
        assert!(matches!(
            engine.apply_player_move(4),
            Err(Error::MatchNotActive)
        ));
        assert_eq!(engine.snapshot().board, before);
    }
}

mod outcomes {
    use super::*;

    #[test]
    fn test_top_row_wins_before_opponent_replies() {
        let (mut engine, log) = scripted_engine(&[3, 4, 5]);
        engine.open(30).unwrap();

        engine.apply_player_move(0).unwrap();
        engine.advance(REPLY).unwrap();
        engine.apply_player_move(1).unwrap();
        engine.advance(REPLY).unwrap();
        let report = engine.apply_player_move(2).unwrap();

        assert_eq!(report.outcome, Some(GameOutcome::Win(Mark::Player)));
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.board, Board::from_string("XXX OO. ...").unwrap());
        assert_eq!(snapshot.session_points, 3 * 2 + 10);
        assert_eq!(snapshot.tally.player_wins, 1);

        // The opponent never gets a third move on the finished board.
        engine.advance(REPLY).unwrap();
        assert_eq!(engine.snapshot().board.count_of(Mark::Opponent), 2);
        assert!(log.events().contains(&MatchEvent::Ended {
            generation: report.generation,
            reason: EndReason::Won(Mark::Player),
        }));
    }

    #[test]
    fn test_opponent_win_awards_nothing_extra() {
        let ledger = InMemoryLedger::new();
        let user = UserId::new("ada");
        let mut engine = ledger_engine(&[3, 4, 5], &ledger, &user);
        engine.open(30).unwrap();

        for cell in [0, 1, 8] {
            engine.apply_player_move(cell).unwrap();
            engine.advance(REPLY).unwrap();
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.end_reason, Some(EndReason::Won(Mark::Opponent)));
        assert_eq!(snapshot.session_points, 3 * 2);
        assert_eq!(snapshot.tally.opponent_wins, 1);
        assert_eq!(ledger.balance(&user).unwrap(), 0);
    }

    #[test]
    fn test_draw_awards_draw_points_and_restarts() {
        let ledger = InMemoryLedger::new();
        let user = UserId::new("ada");
        // X O X
        // X O O
        // O X X
        let mut engine = ledger_engine(&[1, 4, 5, 6], &ledger, &user);
        engine.open(30).unwrap();

        for cell in [0, 2, 3, 7] {
            engine.apply_player_move(cell).unwrap();
            engine.advance(REPLY).unwrap();
        }
        let report = engine.apply_player_move(8).unwrap();

        assert_eq!(report.outcome, Some(GameOutcome::Draw));
        assert_eq!(engine.snapshot().session_points, 5 * 2 + 5);
        // The draw bonus only counts towards the match counter.
        assert_eq!(ledger.balance(&user).unwrap(), 0);

        engine.advance(Duration::from_millis(1500)).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, MatchPhase::Active);
        assert_eq!(snapshot.board, Board::new());
        assert_eq!(snapshot.session_points, 0);
        assert_eq!(snapshot.seconds_remaining, 30);
        assert_ne!(snapshot.generation, Some(report.generation));
    }
}

mod rewards {
    use super::*;

    #[test]
    fn test_timeout_with_four_filled_cells_credits_eight() {
        let ledger = InMemoryLedger::new();
        let user = UserId::new("ada");
        let mut engine = ledger_engine(&[3, 4], &ledger, &user);
        engine.open(30).unwrap();

        engine.apply_player_move(0).unwrap();
        engine.advance(REPLY).unwrap();
        engine.apply_player_move(1).unwrap();
        engine.advance(REPLY).unwrap();
        assert_eq!(engine.snapshot().board.filled_count(), 4);
        assert_eq!(ledger.balance(&user).unwrap(), 0);

        advance_secs(&mut engine, 30);

        let snapshot = engine.snapshot();
        assert_eq!(
            snapshot.end_reason,
            Some(EndReason::TimedOut { filled_cells: 4 })
        );
        assert_eq!(ledger.balance(&user).unwrap(), 8);
    }

    #[test]
    fn test_timeout_closes_after_two_seconds() {
        let (mut engine, log) = scripted_engine(&[]);
        let generation = engine.open(3).unwrap();
        advance_secs(&mut engine, 3);
        assert_eq!(engine.phase(), MatchPhase::Ended);

        engine.advance(Duration::from_millis(1999)).unwrap();
        assert_eq!(engine.phase(), MatchPhase::Ended);
        engine.advance(Duration::from_millis(1)).unwrap();
        assert_eq!(engine.phase(), MatchPhase::Closed);
        assert_eq!(
            log.events().last(),
            Some(&MatchEvent::Closed { generation })
        );
    }
}

mod scheduler {
    use super::*;

    /// Every fresh open must follow a close of the previous match.
    fn assert_single_match(events: &[MatchEvent]) {
        let mut open = false;
        for event in events {
            match event {
                MatchEvent::Opened { restart: false, .. } => {
                    assert!(!open, "second match opened while one was open");
                    open = true;
                }
                MatchEvent::Closed { .. } => open = false,
                _ => {}
            }
        }
    }

    #[test]
    fn test_never_opens_second_match() {
        let config = EngineConfig::new()
            .with_interval_minutes(1.0)
            .with_match_duration(150);
        let (mut engine, log) = engine_with_config(config, &[]);

        advance_secs(&mut engine, 240);

        let events = log.events();
        assert_single_match(&events);
        // Opens at 60 s, skips 120 s and 180 s, closes at 212 s, opens at 240 s.
        assert_eq!(fresh_opens(&events), 2);
        assert_eq!(engine.scheduler().skipped_ticks(), 2);
        assert_eq!(engine.phase(), MatchPhase::Active);
    }

    #[test]
    fn test_manual_open_blocks_scheduled_open() {
        let config = EngineConfig::new().with_interval_minutes(0.5);
        let (mut engine, log) = engine_with_config(config, &[]);

        engine.open(60).unwrap();
        advance_secs(&mut engine, 45);

        let events = log.events();
        assert_single_match(&events);
        assert_eq!(fresh_opens(&events), 1);
        assert!(events.contains(&MatchEvent::PopupSkipped));
    }

    #[test]
    fn test_reconfigured_interval_takes_effect() {
        let config = EngineConfig::new().with_interval_minutes(10.0);
        let (mut engine, _) = engine_with_config(config, &[]);

        advance_secs(&mut engine, 30);
        engine.configure(0.5).unwrap();
        advance_secs(&mut engine, 29);
        assert_eq!(engine.phase(), MatchPhase::Closed);
        advance_secs(&mut engine, 1);
        assert_eq!(engine.phase(), MatchPhase::Active);

        assert!(engine.configure(-1.0).is_err());
        assert_eq!(engine.scheduler().interval(), Duration::from_secs(30));
    }
}

mod stale_callbacks {
    use super::*;

    #[test]
    fn test_reopen_after_close_ignores_pending_reply() {
        let (mut engine, _) = scripted_engine(&[4]);
        engine.open(30).unwrap();
        engine.apply_player_move(0).unwrap();

        engine.close().unwrap();
        let generation = engine.open(30).unwrap();
        engine.advance(REPLY).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, Some(generation));
        assert_eq!(snapshot.board, Board::new());
        assert_eq!(snapshot.active_mark, Mark::Player);
    }

    #[test]
    fn test_reopen_after_close_ignores_pending_restart() {
        let (mut engine, log) = scripted_engine(&[3, 4]);
        engine.open(30).unwrap();
        for cell in [0, 1] {
            engine.apply_player_move(cell).unwrap();
            engine.advance(REPLY).unwrap();
        }
        engine.apply_player_move(2).unwrap();

        engine.close().unwrap();
        let generation = engine.open(30).unwrap();
        engine.apply_player_move(8).unwrap();
        engine.advance(Duration::from_millis(1500)).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, Some(generation));
        assert_eq!(snapshot.board.get(8), xo_break::Cell::Player);
        assert!(
            !log.events()
                .iter()
                .any(|e| matches!(e, MatchEvent::Opened { restart: true, .. }))
        );
    }

    #[test]
    fn test_reopen_keeps_a_fresh_countdown() {
        let (mut engine, _) = scripted_engine(&[]);
        engine.open(30).unwrap();
        engine.advance(Duration::from_millis(900)).unwrap();
        engine.close().unwrap();

        engine.open(30).unwrap();
        engine.advance(Duration::from_millis(900)).unwrap();
        assert_eq!(engine.snapshot().seconds_remaining, 30);
        engine.advance(Duration::from_millis(100)).unwrap();
        assert_eq!(engine.snapshot().seconds_remaining, 29);
    }
}

mod ledger_failures {
    use super::*;

    /// Ledger whose backing store rejects every write
    struct BrokenLedger;

    impl PointsLedger for BrokenLedger {
        fn credit(&self, _user: &UserId, _points: u32) -> xo_break::Result<u64> {
            Err(Error::Io {
                operation: "write points".to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn balance(&self, _user: &UserId) -> xo_break::Result<u64> {
            Ok(0)
        }
    }

    fn broken_ledger_engine(config: EngineConfig, script: &[usize]) -> xo_break::MatchEngine {
        let (engine, _) = engine_with_config(config, script);
        engine.with_observer(Box::new(LedgerObserver::new(
            Arc::new(BrokenLedger),
            UserId::new("ada"),
        )))
    }

    #[test]
    fn test_failed_win_credit_still_restarts() {
        let config = EngineConfig::new().with_scheduler(false);
        let mut engine = broken_ledger_engine(config, &[3, 4]);
        engine.open(30).unwrap();
        for cell in [0, 1] {
            engine.apply_player_move(cell).unwrap();
            engine.advance(REPLY).unwrap();
        }

        let result = engine.apply_player_move(2);
        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(
            engine.snapshot().end_reason,
            Some(EndReason::Won(Mark::Player))
        );

        engine.advance(Duration::from_millis(1500)).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, MatchPhase::Active);
        assert_eq!(snapshot.board, Board::new());
    }

    #[test]
    fn test_failed_timeout_credit_still_frees_scheduler() {
        let config = EngineConfig::new()
            .with_interval_minutes(1.0)
            .with_match_duration(30);
        let mut engine = broken_ledger_engine(config, &[]);

        engine.advance(Duration::from_secs(60)).unwrap();
        assert_eq!(engine.phase(), MatchPhase::Active);
        engine.apply_player_move(4).unwrap();

        // Time runs out at 90 s with two filled cells.
        assert!(engine.advance(Duration::from_secs(30)).is_err());
        assert_eq!(engine.phase(), MatchPhase::Ended);

        engine.advance(Duration::from_secs(2)).unwrap();
        assert_eq!(engine.phase(), MatchPhase::Closed);
        assert!(!engine.scheduler().is_match_open());

        // The next pop-up opens a fresh match.
        advance_secs(&mut engine, 28);
        assert_eq!(engine.phase(), MatchPhase::Active);
        assert_eq!(engine.scheduler().skipped_ticks(), 0);
    }
}
