//! Integration tests for the application container, settings and ledgers.

use std::{sync::Arc, time::Duration};

use tempfile::TempDir;
use xo_break::{
    adapters::{InMemoryLedger, JsonFileLedger, LedgerObserver},
    app::{App, AppBuilder, Settings},
    engine::{EngineConfig, MatchEngine, MatchPhase, ScriptedOpponent},
    ports::PointsLedger,
    types::UserId,
};

#[test]
fn test_for_testing_uses_injected_ledger() {
    let ledger = InMemoryLedger::new();
    let app = App::for_testing()
        .with_ledger(ledger.clone())
        .with_default_seed(42)
        .build();
    let user = UserId::new("ada");

    ledger.credit(&user, 12).unwrap();
    assert_eq!(app.balance(&user).unwrap(), 12);
    assert_eq!(app.ledger().balance(&user).unwrap(), 12);
}

#[test]
fn test_engine_from_settings_uses_stored_timings() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.json");
    Settings {
        game_duration: 5,
        game_interval: 0.25,
        user_name: "ada".to_string(),
    }
    .save(&path)
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    let app = AppBuilder::new()
        .with_ledger(InMemoryLedger::new())
        .with_default_seed(1)
        .build();
    let mut engine = app.create_engine_from_settings(&settings).unwrap();

    engine.advance(Duration::from_secs(15)).unwrap();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, MatchPhase::Active);
    assert_eq!(snapshot.seconds_remaining, 5);

    engine.advance(Duration::from_secs(5)).unwrap();
    assert_eq!(engine.phase(), MatchPhase::Ended);
}

#[test]
fn test_points_survive_in_json_ledger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("points.json");
    let user = UserId::new("ada");

    for _ in 0..2 {
        let ledger: Arc<dyn PointsLedger + Send + Sync> = Arc::new(JsonFileLedger::new(&path));
        let config = EngineConfig::new().with_scheduler(false);
        let mut engine = MatchEngine::new(config, Box::new(ScriptedOpponent::new([3, 4])))
            .unwrap()
            .with_observer(Box::new(LedgerObserver::new(ledger, user.clone())));

        engine.open(30).unwrap();
        engine.apply_player_move(0).unwrap();
        engine.advance(Duration::from_millis(500)).unwrap();
        engine.apply_player_move(1).unwrap();
        engine.advance(Duration::from_millis(500)).unwrap();
        engine.apply_player_move(2).unwrap();
    }

    let app = App::with_ledger_path(&path);
    assert_eq!(app.balance(&user).unwrap(), 20);
}

#[test]
fn test_users_do_not_share_points() {
    let ledger = InMemoryLedger::new();
    let app = App::for_testing().with_ledger(ledger.clone()).build();
    let config = EngineConfig::new().with_scheduler(false).with_seed(3);

    let mut engine = app.create_engine(config, &UserId::new("ada")).unwrap();
    engine.open(1).unwrap();
    engine.apply_player_move(4).unwrap();
    engine.advance(Duration::from_secs(1)).unwrap();

    assert_eq!(app.balance(&UserId::new("ada")).unwrap(), 4);
    assert_eq!(app.balance(&UserId::new("bob")).unwrap(), 0);
}
