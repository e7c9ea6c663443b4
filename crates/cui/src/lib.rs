mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use app::{format_event, kind_label, line_label, status_text, UiLocale, DEFAULT_SEED};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub locale: Option<String>,
    pub seed: Option<u64>,
    pub assets: Option<PathBuf>,
    pub preset: Option<String>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let locale = UiLocale::from_opt(options.locale.as_deref());
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let assets = options.assets.unwrap_or_else(|| PathBuf::from("assets"));
    let mut app = App::bootstrap(locale, seed, &assets, options.preset.as_deref())?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut locale = std::env::var("MINISLOT_LANG").ok();
    let mut seed = None;
    let mut assets = None;
    let mut preset = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--machine" => {
                if let Some(value) = args.get(idx + 1) {
                    preset = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions {
        locale,
        seed,
        assets,
        preset,
    }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_frame = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = input::map_key(key);
                    actions::dispatch(app, action);
                }
            }
        }
        if last_frame.elapsed() >= FRAME {
            app.on_tick();
            last_frame = Instant::now();
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "minislot-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn parses_launch_flags() {
        let options = parse_options(&args(&[
            "--seed", "42", "--lang", "zh", "--assets", "custom", "--machine", "classic",
        ]));
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.locale.as_deref(), Some("zh"));
        assert_eq!(options.assets, Some(PathBuf::from("custom")));
        assert_eq!(options.preset.as_deref(), Some("classic"));
    }

    #[test]
    fn ignores_bad_seed_and_dangling_flag() {
        let options = parse_options(&args(&["--seed", "nope", "--assets"]));
        assert_eq!(options.seed, None);
        assert_eq!(options.assets, None);
    }
}
