//! Output formatting, progress bars and toasts for the CLI

use std::io::{self, Stdout, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, Result,
    engine::{EndReason, MatchPhase, MatchSnapshot},
    ports::MatchObserver,
    rewards::Award,
    tictactoe::{Board, Cell},
    types::Generation,
};

/// Create a progress bar over a simulated session, one step per virtual second
pub fn create_session_progress(total_seconds: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_seconds);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} virtual s ({msg})")
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })?
        .progress_chars("=>-");
    pb.set_style(style);
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Render a board as a grid; empty cells show their index so the player knows
/// what to type.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match board.get(index) {
                    Cell::Empty => index.to_string(),
                    cell => cell.to_char().to_string(),
                }
            })
            .collect();
        out.push_str(&format!(" {} \n", cells.join(" | ")));
        if row < 2 {
            out.push_str("---+---+---\n");
        }
    }
    out
}

/// One-line status for the current match
pub fn status_line(snapshot: &MatchSnapshot) -> String {
    match snapshot.phase {
        MatchPhase::Closed => "No match open. Type 'o' to open one, 'q' to quit.".to_string(),
        MatchPhase::Active => format!(
            "Time: {}s | Points: {} | {} to move",
            snapshot.seconds_remaining, snapshot.session_points, snapshot.active_mark
        ),
        MatchPhase::Ended => format!(
            "Match over | Points: {} | You {} - {} AI",
            snapshot.session_points, snapshot.tally.player_wins, snapshot.tally.opponent_wins
        ),
    }
}

/// Prints the toast messages a player sees when a match opens or ends
pub struct ToastPrinter<W: Write + Send> {
    out: W,
    last_cumulative: u32,
}

impl ToastPrinter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ToastPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_cumulative: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn toast(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, ">> {message}").map_err(|source| Error::Io {
            operation: "print toast".to_string(),
            source,
        })
    }
}

impl<W: Write + Send> MatchObserver for ToastPrinter<W> {
    fn on_match_open(
        &mut self,
        _generation: Generation,
        seconds: u32,
        restart: bool,
    ) -> Result<()> {
        self.last_cumulative = 0;
        if restart {
            self.toast(&format!("New board! {seconds}s on the clock."))
        } else {
            self.toast(&format!("Break time! Beat the AI in {seconds}s."))
        }
    }

    fn on_points(&mut self, _generation: Generation, award: Award) -> Result<()> {
        self.last_cumulative = award.cumulative_points();
        Ok(())
    }

    fn on_match_end(&mut self, _generation: Generation, reason: EndReason) -> Result<()> {
        let message = reason.message(self.last_cumulative);
        self.toast(&message)
    }

    fn on_match_close(&mut self, _generation: Generation) -> Result<()> {
        self.toast("Match closed.")
    }
}
