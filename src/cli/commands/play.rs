//! Play command - interactive terminal session
//!
//! The engine clock follows the wall clock: before every input is handled the
//! engine is advanced by the real time that passed since the last one.

use std::{
    io::{self, BufRead, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        config::CommonArgs,
        output::{ToastPrinter, print_kv, print_section, render_board, status_line},
    },
    engine::{MatchEngine, MatchPhase},
};

#[derive(Parser, Debug)]
#[command(about = "Play pop-up matches in the terminal")]
pub struct PlayArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Wait for the scheduler instead of opening a match right away
    #[arg(long)]
    pub wait: bool,
}

const HELP: &str = "Enter a cell 0-8, 'o' to open a match, 'c' to close it or 'q' to quit.";

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    Open,
    Close,
    Move(usize),
    Nothing,
    Unknown,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "q" | "quit" => Command::Quit,
            "o" | "open" => Command::Open,
            "c" | "close" => Command::Close,
            "" => Command::Nothing,
            input => input.parse().map_or(Command::Unknown, Command::Move),
        }
    }
}

/// Engine driven by real elapsed time
struct RealTimeDriver {
    engine: MatchEngine,
    last: Instant,
}

impl RealTimeDriver {
    fn new(engine: MatchEngine) -> Self {
        Self {
            engine,
            last: Instant::now(),
        }
    }

    fn catch_up(&mut self) -> crate::Result<()> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.engine.advance(elapsed)
    }

    /// Sleep through the opponent's reply so it shows up before the prompt
    fn wait_for_reply(&mut self) -> crate::Result<()> {
        let delay = self.engine.config().opponent_delay;
        thread::sleep(delay + Duration::from_millis(10));
        self.catch_up()
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let settings = args.common.load_settings()?;
    let user = settings.user_id();
    let mut config = settings.engine_config();
    if let Some(seed) = args.common.seed {
        config = config.with_seed(seed);
    }

    let app = args.common.app();
    let engine = app
        .create_engine(config, &user)?
        .with_observer(Box::new(ToastPrinter::stdout()));
    let mut driver = RealTimeDriver::new(engine);

    print_section("xo-break");
    print_kv("Player", user.as_str());
    print_kv("Match length", &format!("{}s", settings.game_duration));
    print_kv("Pop-up every", &format!("{} min", settings.game_interval));
    println!("\n{HELP}");

    if !args.wait {
        driver.engine.open(settings.game_duration)?;
    }
    let mut out = io::stdout();
    show(&mut out, &driver.engine)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        driver.catch_up()?;

        let handled = match Command::parse(&line) {
            Command::Quit => break,
            Command::Nothing => Ok(()),
            Command::Unknown => {
                println!("{HELP}");
                Ok(())
            }
            Command::Open => driver.engine.open(settings.game_duration).map(|_| ()),
            Command::Close => driver.engine.close(),
            Command::Move(cell) => match driver.engine.apply_player_move(cell) {
                Ok(report) if !report.is_terminal() => driver.wait_for_reply(),
                other => other.map(|_| ()),
            },
        };
        match handled {
            Err(e) if e.is_rejection() => println!("{e}"),
            other => other?,
        }
        show(&mut out, &driver.engine)?;
    }

    let tally = driver.engine.tally();
    print_section("Session over");
    print_kv("You", &tally.player_wins.to_string());
    print_kv("AI", &tally.opponent_wins.to_string());
    print_kv("Stored points", &app.balance(&user)?.to_string());
    Ok(())
}

fn show(out: &mut impl Write, engine: &MatchEngine) -> io::Result<()> {
    let snapshot = engine.snapshot();
    if snapshot.phase != MatchPhase::Closed {
        write!(out, "\n{}", render_board(&snapshot.board))?;
    }
    writeln!(out, "{}", status_line(&snapshot))?;
    write!(out, "> ")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, ScriptedOpponent};

    fn engine() -> MatchEngine {
        let config = EngineConfig::new().with_scheduler(false);
        MatchEngine::new(config, Box::new(ScriptedOpponent::new([4]))).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse(" open\n"), Command::Open);
        assert_eq!(Command::parse("c"), Command::Close);
        assert_eq!(Command::parse("close"), Command::Close);
        assert_eq!(Command::parse("7"), Command::Move(7));
        assert_eq!(Command::parse("   "), Command::Nothing);
        assert_eq!(Command::parse("x"), Command::Unknown);
        assert_eq!(Command::parse("-1"), Command::Unknown);
    }

    #[test]
    fn test_show_writes_board_status_and_prompt() {
        let mut engine = engine();
        let mut out = Vec::new();
        show(&mut out, &engine).unwrap();
        let closed = String::from_utf8(out).unwrap();
        assert!(closed.starts_with("No match open."));
        assert!(closed.ends_with("> "));

        engine.open(30).unwrap();
        let mut out = Vec::new();
        show(&mut out, &engine).unwrap();
        let open = String::from_utf8(out).unwrap();
        assert!(open.contains(" 0 | 1 | 2 "));
        assert!(open.contains("Time: 30s"));
        assert!(open.ends_with("> "));
    }
}
