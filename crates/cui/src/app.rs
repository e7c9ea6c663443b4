use anyhow::{Context, Result};
use minislot_core::{
    Event, EventBus, PaylineId, ReelFaces, SessionError, SlotSession, SpinKind, Status,
    SymbolTable, REEL_COUNT,
};
use minislot_data::{load_machine_or_preset, normalize_locale, parse_preset};
use std::collections::VecDeque;
use std::path::Path;

pub const DEFAULT_SEED: u64 = 0xC0FFEE;
const MAX_EVENT_LOG: usize = 200;

const NO_WIN_EN: [&str; 5] = [
    "Keep going",
    "So close",
    "Next one hits",
    "Almost there",
    "Try again",
];
const NO_WIN_ZH: [&str; 5] = ["再接再厉", "可惜没中哦", "下次一定中", "差一点点", "继续加油"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    EnUs,
    ZhCn,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        let normalized = normalize_locale(value);
        if normalized == "zh_CN" {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::ZhCn => "zh_CN",
        }
    }

    pub fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

pub fn status_text(locale: UiLocale, status: Status, table: &SymbolTable) -> String {
    match status {
        Status::Ready => locale.text("READY", "准备就绪").to_string(),
        Status::Spinning => locale.text("Reels spinning...", "机器转动中...").to_string(),
        Status::Win {
            lines,
            symbol,
            payout,
        } => {
            let name = table.name(symbol);
            let mut text = if lines > 1 {
                match locale {
                    UiLocale::EnUs => format!("{lines} lines! ({name})"),
                    UiLocale::ZhCn => format!("连 {lines} 条线！（{name}）"),
                }
            } else {
                match locale {
                    UiLocale::EnUs => format!("Line! ({name})"),
                    UiLocale::ZhCn => format!("有连线！（{name}）"),
                }
            };
            if payout > 0 {
                text.push_str(&format!(" +{payout}"));
            }
            text
        }
        Status::NoWin { hint } => {
            let table = match locale {
                UiLocale::EnUs => NO_WIN_EN,
                UiLocale::ZhCn => NO_WIN_ZH,
            };
            table[hint % table.len()].to_string()
        }
        Status::OutOfScore => locale
            .text(
                "Out of score, press r to reset",
                "分数不足，按 r 重置",
            )
            .to_string(),
    }
}

pub fn kind_label(locale: UiLocale, kind: SpinKind) -> String {
    match kind {
        SpinKind::Random => locale.text("random", "随机").to_string(),
        SpinKind::SmallWin => locale.text("small win", "保底").to_string(),
        SpinKind::Jackpot => locale.text("jackpot", "大奖").to_string(),
        SpinKind::BonusTrigger => locale.text("bonus trigger", "奖励触发").to_string(),
        SpinKind::Bonus { remaining } => {
            format!("{} ({remaining})", locale.text("bonus", "奖励"))
        }
    }
}

pub fn line_label(locale: UiLocale, line: PaylineId) -> &'static str {
    match line {
        PaylineId::CenterRow => locale.text("center row", "中间横线"),
        PaylineId::TopRow => locale.text("top row", "上方横线"),
        PaylineId::BottomRow => locale.text("bottom row", "下方横线"),
        PaylineId::DiagonalDown => locale.text("diagonal down", "左上斜线"),
        PaylineId::DiagonalUp => locale.text("diagonal up", "左下斜线"),
        PaylineId::LeftColumn => locale.text("left column", "左直线"),
        PaylineId::MiddleColumn => locale.text("middle column", "中直线"),
        PaylineId::RightColumn => locale.text("right column", "右直线"),
    }
}

pub struct App {
    pub locale: UiLocale,
    pub seed: u64,
    pub session: SlotSession,
    pub events: EventBus,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(
        locale: UiLocale,
        seed: u64,
        assets: &Path,
        preset: Option<&str>,
    ) -> Result<Self> {
        let preset = parse_preset(preset.unwrap_or("deluxe"))?;
        let config = load_machine_or_preset(assets, preset, Some(locale.code()))
            .context("load machine")?;
        let session = SlotSession::new(config, seed).context("create session")?;
        Ok(Self::with_session(locale, seed, session))
    }

    pub fn with_session(locale: UiLocale, seed: u64, session: SlotSession) -> Self {
        let status_line = status_text(locale, session.status(), &session.table);
        let mut app = Self {
            locale,
            seed,
            session,
            events: EventBus::default(),
            event_log: VecDeque::new(),
            status_line,
            show_help: false,
            should_quit: false,
        };
        app.push_event_line(format!(
            "{} {} | {} {}",
            locale.text("seed", "种子"),
            seed,
            locale.text("lines", "连线"),
            app.session.config.paylines.lines().len()
        ));
        app
    }

    pub fn on_tick(&mut self) {
        if self.session.tick(&mut self.events).is_some() {
            self.refresh_status();
        }
        self.flush_events();
    }

    /// Space/Enter.
    pub fn activate(&mut self) {
        let result = self.session.activate(&mut self.events);
        self.finish(result);
    }

    pub fn press(&mut self, index: usize) {
        let result = self.session.press(index, &mut self.events);
        self.finish(result);
    }

    pub fn reset(&mut self) {
        self.session.reset(&mut self.events);
        self.refresh_status();
        self.flush_events();
    }

    pub fn visible_faces(&self) -> [ReelFaces; REEL_COUNT] {
        self.session.visible_faces()
    }

    /// Cells on winning lines of the last resolved spin, while the reels rest.
    pub fn winning_cells(&self) -> Vec<(usize, usize)> {
        if self.session.is_spinning() {
            return Vec::new();
        }
        let Some(outcome) = self.session.last_outcome() else {
            return Vec::new();
        };
        let mut cells = Vec::new();
        for win in &outcome.evaluation.wins {
            for (reel, row) in win.line.path() {
                let cell = (reel, row.index());
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    pub fn symbol_name(&self, symbol: usize) -> &str {
        self.session.table.name(symbol)
    }

    fn finish(&mut self, result: Result<(), SessionError>) {
        match result {
            Ok(()) => self.refresh_status(),
            Err(err) => {
                log::debug!("request rejected: {err}");
                self.push_error(err);
            }
        }
        self.flush_events();
    }

    fn refresh_status(&mut self) {
        self.status_line = status_text(self.locale, self.session.status(), &self.session.table);
    }

    pub fn push_error(&mut self, err: SessionError) {
        self.status_line = match err {
            SessionError::InsufficientScore { .. } => {
                status_text(self.locale, Status::OutOfScore, &self.session.table)
            }
            other => format!("{}: {other}", self.locale.text("error", "错误")),
        };
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            let line = format_event(self.locale, &event, &self.session.table);
            self.push_event_line(line);
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

pub fn format_event(locale: UiLocale, event: &Event, table: &SymbolTable) -> String {
    match event {
        Event::SpinStarted {
            spin,
            kind,
            cost,
            score,
        } => format!(
            "#{spin} {} {} | {} -{cost} = {score}",
            locale.text("spin", "转动"),
            kind_label(locale, *kind),
            locale.text("cost", "花费"),
        ),
        Event::ReelStopping { reel } => {
            format!("{} {}", locale.text("stop reel", "停止转轮"), reel + 1)
        }
        Event::ReelStopped { reel, faces } => format!(
            "{} {}: {} / {} / {}",
            locale.text("reel", "转轮"),
            reel + 1,
            table.name(faces.top),
            table.name(faces.center),
            table.name(faces.bottom)
        ),
        Event::SpinResolved {
            spin,
            wins,
            payout,
            score,
        } => {
            if wins.is_empty() {
                format!(
                    "#{spin} {} | {} {score}",
                    locale.text("no win", "未中奖"),
                    locale.text("score", "分数")
                )
            } else {
                let lines: Vec<String> = wins
                    .iter()
                    .map(|win| {
                        format!("{} {}", line_label(locale, win.line), table.name(win.symbol))
                    })
                    .collect();
                format!(
                    "#{spin} {} +{payout} [{}] | {} {score}",
                    locale.text("win", "中奖"),
                    lines.join(", "),
                    locale.text("score", "分数")
                )
            }
        }
        Event::BonusTriggered { spin } => format!(
            "#{spin} {}",
            locale.text("bonus triggered!", "触发奖励回合！")
        ),
        Event::BonusEntered { spins } => format!(
            "{} {spins}",
            locale.text("bonus round, spins:", "奖励回合，次数：")
        ),
        Event::BonusEnded => locale.text("bonus round over", "奖励回合结束").to_string(),
        Event::SessionReset { score } => format!(
            "{} {score}",
            locale.text("machine reset, score", "机器重置，分数")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minislot_core::MachineConfig;

    fn app(locale: UiLocale) -> App {
        let session = SlotSession::new(MachineConfig::deluxe(), 3).expect("session");
        App::with_session(locale, 3, session)
    }

    #[test]
    fn no_win_hints_follow_locale() {
        let table = MachineConfig::classic().symbol_table();
        assert_eq!(
            status_text(UiLocale::EnUs, Status::NoWin { hint: 1 }, &table),
            "So close"
        );
        assert_eq!(
            status_text(UiLocale::ZhCn, Status::NoWin { hint: 4 }, &table),
            "继续加油"
        );
    }

    #[test]
    fn win_status_names_symbol_and_lines() {
        let table = MachineConfig::classic().symbol_table();
        let single = Status::Win {
            lines: 1,
            symbol: 2,
            payout: 0,
        };
        assert_eq!(status_text(UiLocale::EnUs, single, &table), "Line! (Cherry)");
        let double = Status::Win {
            lines: 2,
            symbol: 2,
            payout: 60,
        };
        assert_eq!(
            status_text(UiLocale::EnUs, double, &table),
            "2 lines! (Cherry) +60"
        );
    }

    #[test]
    fn spin_then_stop_all_resolves_on_ticks() {
        let mut app = app(UiLocale::EnUs);
        app.activate();
        assert!(app.session.is_spinning());
        assert_eq!(app.status_line, "Reels spinning...");
        for index in 0..REEL_COUNT {
            app.press(index);
        }
        for _ in 0..5_000 {
            app.on_tick();
            if !app.session.is_spinning() {
                break;
            }
        }
        assert!(!app.session.is_spinning());
        assert_ne!(app.status_line, "Reels spinning...");
        assert!(app
            .event_log
            .iter()
            .any(|line| line.contains("win") || line.contains("no win")));
    }

    #[test]
    fn errors_land_in_status_line() {
        let mut config = MachineConfig::deluxe();
        config.starting_score = 0;
        let session = SlotSession::new(config, 1).expect("session");
        let mut app = App::with_session(UiLocale::EnUs, 1, session);
        app.activate();
        assert_eq!(app.status_line, "Out of score, press r to reset");
        assert!(!app.session.is_spinning());
    }

    #[test]
    fn reset_logs_event() {
        let mut app = app(UiLocale::ZhCn);
        app.activate();
        app.reset();
        assert_eq!(app.status_line, "准备就绪");
        assert!(app
            .event_log
            .back()
            .is_some_and(|line| line.starts_with("机器重置")));
    }
}
