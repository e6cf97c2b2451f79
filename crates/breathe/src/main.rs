//! breathe - Guided breathing in the terminal
//!
//! Usage:
//!   breathe                     Open the interactive breathing guide
//!   breathe run [--cycles N]    Guided session on stdout, no UI
//!   breathe phases              Show the breathing pattern
//!   breathe config [--init]     Show or create the configuration file

mod app;
mod ui;

use std::future::{self, Future};
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use breathe::{phase, Breather, Phase, TickEvent, TickOutcome, TICK_PERIOD};
use haven_core::{format, Config, Paths};

use app::App;

/// Breathe - guided 4-4-4-2 breathing exercise
#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing exercise: inhale, hold, exhale, rest")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Take a moment to center yourself. One cycle is 14 seconds:
    breathe in for 4, hold for 4, breathe out for 4, rest for 2.

EXAMPLES:
    breathe                     # Open the interactive guide
    breathe run                 # Guided session on stdout (default cycles)
    breathe run --cycles 0      # Keep going until Ctrl-C
    breathe run --json          # One JSON object per phase change
    breathe phases              # Show the phase table
    breathe config --init       # Write the default config file

KEY BINDINGS (guide):
    Space, Enter    Start / pause
    r               Reset
    ?               Toggle help overlay
    q, Esc          Quit

LOGGING:
    Set RUST_LOG=breathe=debug to trace phase changes on stderr.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive breathing guide
    #[command(alias = "g")]
    Guide,

    /// Run a guided session on stdout
    #[command(alias = "r")]
    Run {
        /// Number of full cycles (0 = until interrupted; default from config)
        #[arg(short, long, value_name = "N")]
        cycles: Option<u32>,

        /// Emit one JSON object per phase change
        #[arg(long)]
        json: bool,
    },

    /// Show the breathing pattern
    Phases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Applies ANSI colors when enabled in config and stdout is a TTY
struct Printer {
    colors: bool,
}

impl Printer {
    fn new(config: &Config) -> Self {
        Self {
            colors: config.colors && std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.colors {
            format!("{}{}{}", code, text, NC)
        } else {
            text.to_string()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = Paths::new().config_file("breathe");
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Some(Commands::Guide) | None => cmd_guide(&config),
        Some(Commands::Run { cycles, json }) => {
            let cycles = cycles.unwrap_or(config.default_cycles);
            let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            rt.block_on(cmd_run(&config, cycles, json))
        }
        Some(Commands::Phases { json }) => cmd_phases(&config, json),
        Some(Commands::Config { init }) => cmd_config(&config, &config_path, init),
    }
}

/// Interactive terminal guide
fn cmd_guide(config: &Config) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = run_guide(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Redraw rate while the circle is animating
const FRAME: Duration = Duration::from_millis(50);
/// Input poll timeout while paused
const IDLE_POLL: Duration = Duration::from_millis(250);

fn run_guide<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = app
            .session
            .until_next_tick()
            .map(|left| left.min(FRAME))
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char(' ') | KeyCode::Enter => app.toggle(),
                        KeyCode::Char('r') => app.reset(),
                        KeyCode::Char('?') => app.toggle_help(),
                        _ => {}
                    }
                }
            }
        }

        app.update();
    }
}

/// Headless guided session on the async ticker
async fn cmd_run(config: &Config, cycles: u32, json: bool) -> Result<()> {
    let out = Printer::new(config);
    let started = Local::now();

    let (mut breather, mut events) = Breather::new(TICK_PERIOD);
    breather.start();
    info!(cycles, "headless session started");

    if !json {
        println!("{} Breathing session started at {}", out.paint(GREEN, "[ok]"), started.format("%H:%M"));
        if cycles == 0 {
            println!("Press Ctrl-C to finish");
        } else {
            println!("{} cycles of {}s", cycles, phase::cycle_seconds());
        }
        println!();
        print_phase(&out, Phase::Inhale, 0);
    }

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            future::pending::<()>().await;
        }
    };

    let end = follow_phases(&mut events, cycles, ctrl_c, |to, event| {
        if json {
            let line = serde_json::json!({
                "phase": to,
                "label": to.label(),
                "remaining": event.view.remaining,
                "elapsed_total": event.view.elapsed_total,
                "cycles_completed": event.cycles_completed,
            });
            println!("{}", line);
        } else {
            print_phase(&out, to, event.view.elapsed_total);
        }
    })
    .await;

    breather.pause();
    let view = breather.view();
    let completed = breather.cycles_completed();
    info!(completed, elapsed = view.elapsed_total, interrupted = end.interrupted, "headless session finished");

    if !json {
        println!();
        println!("{}", out.paint(&format!("{}{}", BOLD, MAGENTA), "SESSION COMPLETE"));
        println!();
        println!("  {} {}", out.paint(CYAN, "Breathed for:"), format::duration(view.elapsed_total));
        println!("  {}       {}", out.paint(CYAN, "Cycles:"), completed);
        println!("  {}      {}", out.paint(CYAN, "Started:"), started.format("%H:%M"));
    }

    Ok(())
}

/// How a headless session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunEnd {
    cycles_completed: u64,
    interrupted: bool,
}

/// Report phase changes until `cycles` full cycles are done or `shutdown` fires
///
/// A target of 0 cycles only ends on shutdown or when the ticker goes away.
async fn follow_phases(
    events: &mut mpsc::UnboundedReceiver<TickEvent>,
    cycles: u32,
    shutdown: impl Future<Output = ()>,
    mut on_phase: impl FnMut(Phase, &TickEvent),
) -> RunEnd {
    tokio::pin!(shutdown);

    let mut end = RunEnd {
        cycles_completed: 0,
        interrupted: false,
    };

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                end.cycles_completed = event.cycles_completed;
                let TickOutcome::Advanced { to, .. } = event.outcome else { continue };

                on_phase(to, &event);
                if cycles > 0 && event.cycles_completed >= cycles as u64 {
                    break;
                }
            }
            _ = &mut shutdown => {
                end.interrupted = true;
                break;
            }
        }
    }

    end
}

fn print_phase(out: &Printer, phase: Phase, elapsed: u64) {
    println!(
        "  {} {:<12} {}s",
        out.paint(CYAN, &format!("[{}]", format::clock(elapsed))),
        phase.label(),
        phase.duration()
    );
}

/// Show the phase table
fn cmd_phases(config: &Config, json: bool) -> Result<()> {
    if json {
        let rows: Vec<_> = Phase::ALL
            .iter()
            .map(|p| {
                serde_json::json!({
                    "phase": p,
                    "label": p.label(),
                    "duration": p.duration(),
                    "next": p.next(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let out = Printer::new(config);
    println!("{}Breathing Pattern{}", BOLD, NC);
    println!();
    for p in Phase::ALL {
        println!(
            "  {} {}s  then {}",
            out.paint(CYAN, &format!("{:<12}", p.label())),
            p.duration(),
            p.next().label()
        );
    }
    println!();
    println!("  One cycle: {}s", phase::cycle_seconds());

    Ok(())
}

/// Show or initialise the configuration file
fn cmd_config(config: &Config, path: &std::path::Path, init: bool) -> Result<()> {
    let out = Printer::new(config);

    if init {
        if path.exists() {
            println!("{} Config already exists: {}", out.paint(CYAN, "[info]"), path.display());
        } else {
            Config::default()
                .save(path)
                .with_context(|| format!("Failed to initialise config at {}", path.display()))?;
            println!("{} Wrote default config: {}", out.paint(GREEN, "[ok]"), path.display());
            return Ok(());
        }
    }

    println!("{} {}", out.paint(CYAN, "Config file:"), path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}
