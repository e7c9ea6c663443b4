use anyhow::{Context, Result};
use minislot_core::{
    EventBus, PaylineId, Row, SessionError, SlotSession, SpinOutcome, REEL_COUNT,
};
use minislot_cui::{format_event, kind_label, line_label, status_text, UiLocale, DEFAULT_SEED};
use minislot_data::{load_machine_or_preset, parse_preset};
use minislot_sim::{simulate, SimConfig, StopOrder};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const MAX_STOP_FRAMES: u32 = 10_000;

#[derive(Debug, Clone)]
struct CliOptions {
    cui: bool,
    json: bool,
    sim: Option<u32>,
    order: StopOrder,
    seed: Option<u64>,
    locale: UiLocale,
    locale_arg: Option<String>,
    assets: PathBuf,
    machine: String,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut cui = false;
    let mut json = false;
    let mut sim = None;
    let mut order = StopOrder::LeftToRight;
    let mut seed = None;
    let mut locale_arg: Option<String> = std::env::var("MINISLOT_LANG").ok();
    let mut assets = PathBuf::from("assets");
    let mut machine = "deluxe".to_string();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--cui" => cui = true,
            "--json" => json = true,
            "--sim" => {
                let value = args.get(idx + 1).context("--sim needs a spin count")?;
                sim = Some(
                    value
                        .parse::<u32>()
                        .with_context(|| format!("parse spin count '{value}'"))?,
                );
                idx += 1;
            }
            "--order" => {
                if let Some(value) = args.get(idx + 1) {
                    order = StopOrder::parse(value)?;
                    idx += 1;
                }
            }
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale_arg = Some(value.clone());
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
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--machine" => {
                if let Some(value) = args.get(idx + 1) {
                    machine = value.clone();
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    Ok(CliOptions {
        cui,
        json,
        sim,
        order,
        seed,
        locale: UiLocale::from_opt(locale_arg.as_deref()),
        locale_arg,
        assets,
        machine,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args)?;
    if options.cui {
        let launch = minislot_cui::LaunchOptions {
            locale: options.locale_arg.clone(),
            seed: options.seed,
            assets: Some(options.assets.clone()),
            preset: Some(options.machine.clone()),
        };
        return minislot_cui::run(launch).context("cui launch");
    }
    if let Some(spins) = options.sim {
        return run_sim(&options, spins);
    }
    run_repl(&options)
}

fn build_session(options: &CliOptions) -> Result<SlotSession> {
    let preset = parse_preset(&options.machine)?;
    let config = load_machine_or_preset(&options.assets, preset, Some(options.locale.code()))
        .context("load machine")?;
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    log::info!("session on {} machine, seed {seed}", options.machine);
    SlotSession::new(config, seed).context("create session")
}

fn run_sim(options: &CliOptions, spins: u32) -> Result<()> {
    let preset = parse_preset(&options.machine)?;
    let machine = load_machine_or_preset(&options.assets, preset, Some(options.locale.code()))
        .context("load machine")?;
    let config = SimConfig {
        seed: options.seed.unwrap_or(DEFAULT_SEED),
        spins,
        stop_order: options.order,
        ..SimConfig::default()
    };
    log::info!(
        "simulating {spins} spins on {} ({:?}, seed {})",
        options.machine,
        config.stop_order,
        config.seed
    );
    let report = simulate(&config, machine)?;
    if let Some(reason) = report.ended_early.as_deref() {
        log::warn!("simulation stopped after {} of {spins} spins: {reason}", report.spins);
    }
    if options.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text_report());
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusSnapshot<'a> {
    score: i64,
    spins: u32,
    status: minislot_core::Status,
    status_text: String,
    bonus_active: bool,
    bonus_remaining: u32,
    controls: minislot_core::Controls,
    grid: Vec<[&'a str; REEL_COUNT]>,
}

fn run_repl(options: &CliOptions) -> Result<()> {
    let locale = options.locale;
    let mut session = build_session(options)?;
    let mut events = EventBus::default();
    println!("{}: {}", locale.text("locale", "语言"), locale.code());
    print_help(locale);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt_text(locale, &session));
        io::stdout().flush().context("flush prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let result = match cmd {
            "help" | "h" | "?" => {
                print_help(locale);
                Ok(())
            }
            "quit" | "exit" | "q" => break,
            "spin" | "s" => session.start_spin(&mut events).map(|kind| {
                println!("{}: {}", locale.text("spin", "转动"), kind_label(locale, kind));
            }),
            "stop" | "x" => stop_command(locale, &mut session, &mut events, &args),
            "auto" | "a" => auto_command(locale, &mut session, &mut events),
            "status" => {
                print_status(locale, &session, options.json);
                Ok(())
            }
            "grid" | "g" => {
                print_grid(&session);
                Ok(())
            }
            "lines" => {
                print_lines(locale, &session);
                Ok(())
            }
            "reset" | "r" => {
                session.reset(&mut events);
                Ok(())
            }
            "sim" => {
                match args.first().and_then(|value| value.parse::<u32>().ok()) {
                    Some(spins) => {
                        if let Err(err) = run_sim(options, spins) {
                            println!("{}: {err:#}", locale.text("error", "错误"));
                        }
                    }
                    None => println!("{}", locale.text("usage: sim <spins>", "用法：sim <次数>")),
                }
                Ok(())
            }
            _ => {
                log::debug!("unknown command {input:?}");
                println!(
                    "{}: {cmd}",
                    locale.text("unknown command", "未知命令")
                );
                Ok(())
            }
        };
        if let Err(err) = result {
            log::debug!("{cmd} rejected: {err}");
            print_session_error(locale, &session, &err);
        }
        for event in events.drain() {
            println!("  {}", format_event(locale, &event, &session.table));
        }
    }
    Ok(())
}

fn stop_command(
    locale: UiLocale,
    session: &mut SlotSession,
    events: &mut EventBus,
    args: &[&str],
) -> Result<(), SessionError> {
    let index = match args.first() {
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value >= 1 => value - 1,
            _ => return Err(SessionError::InvalidReel(usize::MAX)),
        },
        None => match session.stop_next(events)? {
            Some(index) => {
                return finish_stop(locale, session, events, index);
            }
            None => return Ok(()),
        },
    };
    if !session.stop_reel(index, events)? {
        println!(
            "{}",
            locale.text("that reel is already stopping", "该转轮已在停止")
        );
        return Ok(());
    }
    finish_stop(locale, session, events, index)
}

/// Runs frames until the requested reel rests, printing the outcome if the
/// spin resolves.
fn finish_stop(
    locale: UiLocale,
    session: &mut SlotSession,
    events: &mut EventBus,
    index: usize,
) -> Result<(), SessionError> {
    for _ in 0..MAX_STOP_FRAMES {
        if let Some(outcome) = session.tick(events) {
            print_outcome(locale, session, &outcome);
            return Ok(());
        }
        if session.reels()[index].is_idle() {
            return Ok(());
        }
    }
    Err(SessionError::Stalled(MAX_STOP_FRAMES))
}

fn auto_command(
    locale: UiLocale,
    session: &mut SlotSession,
    events: &mut EventBus,
) -> Result<(), SessionError> {
    if !session.is_spinning() {
        session.start_spin(events)?;
    }
    let outcome = session.settle(events)?;
    print_outcome(locale, session, &outcome);
    Ok(())
}

fn print_outcome(locale: UiLocale, session: &SlotSession, outcome: &SpinOutcome) {
    print_grid(session);
    println!(
        "{} | {} {}",
        status_text(locale, session.status(), &session.table),
        locale.text("score", "分数"),
        outcome.score
    );
}

fn print_session_error(locale: UiLocale, session: &SlotSession, err: &SessionError) {
    match err {
        SessionError::InsufficientScore { .. } => println!(
            "{}",
            status_text(locale, minislot_core::Status::OutOfScore, &session.table)
        ),
        SessionError::InvalidReel(_) => println!(
            "{}",
            locale.text("reel must be 1, 2 or 3", "转轮编号须为 1、2 或 3")
        ),
        other => println!("{}: {other}", locale.text("error", "错误")),
    }
}

fn grid_names(session: &SlotSession) -> Vec<[&str; REEL_COUNT]> {
    let faces = session.visible_faces();
    Row::ALL
        .iter()
        .map(|row| std::array::from_fn(|reel| session.table.name(faces[reel].get(*row))))
        .collect()
}

fn print_grid(session: &SlotSession) {
    let winning: Vec<PaylineId> = if session.is_spinning() {
        Vec::new()
    } else {
        session
            .last_outcome()
            .map(|outcome| outcome.evaluation.wins.iter().map(|win| win.line).collect())
            .unwrap_or_default()
    };
    let names = grid_names(session);
    for (row_idx, row) in Row::ALL.iter().enumerate() {
        let cells: Vec<String> = (0..REEL_COUNT)
            .map(|reel| {
                let hit = winning.iter().any(|line| line.contains(reel, *row));
                let marker = if hit { '*' } else { ' ' };
                format!("{marker}{:<12}", names[row_idx][reel])
            })
            .collect();
        println!("  |{}|", cells.join("|"));
    }
}

fn print_lines(locale: UiLocale, session: &SlotSession) {
    for line in session.config.paylines.lines() {
        let cells: Vec<String> = line
            .path()
            .iter()
            .map(|(reel, row)| format!("{}{}", reel + 1, row_letter(*row)))
            .collect();
        println!("  {:<16} {}", line_label(locale, *line), cells.join("-"));
    }
}

fn row_letter(row: Row) -> char {
    match row {
        Row::Top => 'T',
        Row::Center => 'C',
        Row::Bottom => 'B',
    }
}

fn print_status(locale: UiLocale, session: &SlotSession, json: bool) {
    let text = status_text(locale, session.status(), &session.table);
    if json {
        let snapshot = StatusSnapshot {
            score: session.score(),
            spins: session.spin_count(),
            status: session.status(),
            status_text: text,
            bonus_active: session.bonus_active(),
            bonus_remaining: session.bonus_remaining(),
            controls: session.controls(),
            grid: grid_names(session),
        };
        match serde_json::to_string_pretty(&snapshot) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("{}: {err}", locale.text("error", "错误")),
        }
        return;
    }
    println!(
        "{} {} | {} {} | {}",
        locale.text("score", "分数"),
        session.score(),
        locale.text("spins", "次数"),
        session.spin_count(),
        text
    );
    if session.bonus_active() {
        println!(
            "{}: {}",
            locale.text("bonus spins left", "奖励剩余次数"),
            session.bonus_remaining()
        );
    }
}

fn prompt_text(locale: UiLocale, session: &SlotSession) -> String {
    if session.is_spinning() {
        let spinning: Vec<String> = session
            .reels()
            .iter()
            .enumerate()
            .filter(|(_, reel)| reel.is_spinning())
            .map(|(idx, _)| (idx + 1).to_string())
            .collect();
        format!("[{} {}]> ", locale.text("spinning", "转动中"), spinning.join(","))
    } else {
        format!("[{} {}]> ", locale.text("score", "分数"), session.score())
    }
}

fn print_help(locale: UiLocale) {
    let lines = [
        locale.text(
            "spin | stop [1-3] | auto | status | grid | lines | reset | sim <n> | help | quit",
            "spin 转动 | stop [1-3] 停轮 | auto 自动 | status 状态 | grid 盘面 | lines 连线 | reset 重置 | sim <n> 模拟 | help 帮助 | quit 退出",
        ),
        locale.text(
            "stop without a number stops the leftmost spinning reel",
            "stop 不带编号时停止最左侧仍在转动的转轮",
        ),
    ];
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minislot_core::MachineConfig;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let options = parse_cli_options(&args(&[
            "--sim", "500", "--json", "--seed", "7", "--order", "rtl", "--machine", "classic",
        ]))
        .expect("options");
        assert_eq!(options.sim, Some(500));
        assert!(options.json);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.order, StopOrder::RightToLeft);
        assert_eq!(options.machine, "classic");
        assert!(!options.cui);
    }

    #[test]
    fn rejects_bad_sim_count() {
        assert!(parse_cli_options(&args(&["--sim", "lots"])).is_err());
        assert!(parse_cli_options(&args(&["--sim"])).is_err());
    }

    #[test]
    fn sim_and_session_fall_back_to_presets() {
        let dir = std::env::temp_dir().join("minislot-cli-no-assets");
        let assets = dir.to_string_lossy().to_string();
        let options =
            parse_cli_options(&args(&["--assets", &assets, "--seed", "3"])).expect("options");
        let session = build_session(&options).expect("session");
        assert_eq!(session.spin_count(), 0);
        run_sim(&options, 25).expect("sim");
        let bad = parse_cli_options(&args(&["--machine", "pachinko"])).expect("options");
        assert!(run_sim(&bad, 5).is_err());
    }

    #[test]
    fn stop_commands_resolve_spin() {
        let mut session = SlotSession::new(MachineConfig::classic(), 5).expect("session");
        let mut events = EventBus::default();
        session.start_spin(&mut events).expect("spin");
        stop_command(UiLocale::EnUs, &mut session, &mut events, &["2"]).expect("stop 2");
        assert!(session.reels()[1].is_idle());
        assert!(session.is_spinning());
        stop_command(UiLocale::EnUs, &mut session, &mut events, &[]).expect("stop next");
        stop_command(UiLocale::EnUs, &mut session, &mut events, &[]).expect("stop next");
        assert!(!session.is_spinning());
        assert!(session.last_outcome().is_some());
    }

    #[test]
    fn stop_rejects_bad_reel() {
        let mut session = SlotSession::new(MachineConfig::classic(), 5).expect("session");
        let mut events = EventBus::default();
        session.start_spin(&mut events).expect("spin");
        assert!(matches!(
            stop_command(UiLocale::EnUs, &mut session, &mut events, &["0"]),
            Err(SessionError::InvalidReel(_))
        ));
        assert!(matches!(
            stop_command(UiLocale::EnUs, &mut session, &mut events, &["4"]),
            Err(SessionError::InvalidReel(3))
        ));
    }

    #[test]
    fn auto_settles_a_fresh_spin() {
        let mut session = SlotSession::new(MachineConfig::deluxe(), 9).expect("session");
        let mut events = EventBus::default();
        auto_command(UiLocale::EnUs, &mut session, &mut events).expect("auto");
        assert_eq!(session.spin_count(), 1);
        assert!(!session.is_spinning());
    }
}
