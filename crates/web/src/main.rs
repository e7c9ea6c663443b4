use anyhow::Context;
use minislot_core::{
    Controls, Event, EventBus, LineWin, PaylineId, ReelFaces, ReelPhase, SessionError,
    SlotSession, SpinKind, Status,
};
use minislot_data::{load_machine_or_preset, parse_preset};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server, StatusCode};

const DEFAULT_ADDR: &str = "0.0.0.0:7878";
const DEFAULT_SEED: u64 = 0xC0FFEE;
const MAX_STOP_FRAMES: u32 = 10_000;

struct WebOptions {
    addr: String,
    seed: u64,
    assets: PathBuf,
    machine: String,
    locale: Option<String>,
}

fn parse_options(args: &[String]) -> WebOptions {
    let mut options = WebOptions {
        addr: std::env::var("MINISLOT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
        seed: DEFAULT_SEED,
        assets: PathBuf::from("assets"),
        machine: "deluxe".to_string(),
        locale: std::env::var("MINISLOT_LANG").ok(),
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1).cloned();
        match (args[idx].as_str(), value) {
            ("--addr", Some(value)) => options.addr = value,
            ("--seed", Some(value)) => options.seed = value.parse().unwrap_or(DEFAULT_SEED),
            ("--assets", Some(value)) => options.assets = PathBuf::from(value),
            ("--machine", Some(value)) => options.machine = value,
            ("--lang", Some(value)) => options.locale = Some(value),
            _ => {
                idx += 1;
                continue;
            }
        }
        idx += 2;
    }
    options
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args);
    let preset = parse_preset(&options.machine)?;
    let config = load_machine_or_preset(&options.assets, preset, options.locale.as_deref())
        .context("load machine")?;
    let session = SlotSession::new(config, options.seed).context("create session")?;
    let server = Server::http(options.addr.as_str())
        .map_err(|err| anyhow::anyhow!("start server on {}: {err}", options.addr))?;
    log::info!("minislot web server on http://{}", options.addr);
    let state = Arc::new(Mutex::new(AppState::new(session)));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            log::warn!("request error: {err}");
        }
    }
    Ok(())
}

struct AppState {
    session: SlotSession,
    events: EventBus,
}

impl AppState {
    fn new(session: SlotSession) -> Self {
        Self {
            session,
            events: EventBus::default(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: UiState,
    events: Vec<Event>,
}

#[derive(Serialize)]
struct UiState {
    score: i64,
    spin_count: u32,
    spin_cost: i64,
    status: Status,
    spinning: bool,
    bonus_active: bool,
    bonus_remaining: u32,
    controls: Controls,
    paylines: Vec<&'static str>,
    reels: Vec<UiReel>,
    last_outcome: Option<UiOutcome>,
}

#[derive(Serialize)]
struct UiReel {
    phase: ReelPhase,
    rotation: f64,
    faces: ReelFaces,
    names: [String; 3],
}

#[derive(Serialize)]
struct UiOutcome {
    spin: u32,
    kind: SpinKind,
    wins: Vec<LineWin>,
    payout: i64,
}

fn handle_request(
    request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    let method = request.method().clone();
    let route = Route::parse(&method, &url);
    let Some(route) = route else {
        request.respond(Response::empty(StatusCode(404)))?;
        return Ok(());
    };
    let mut guard = state.lock().map_err(|_| "session lock poisoned")?;
    let err = apply_route(&mut guard, route).err().map(|err| err.to_string());
    if let Some(message) = err.as_ref() {
        log::debug!("{method} {url} rejected: {message}");
    }
    let response = build_response(&mut guard, err);
    respond_json(request, response)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    State,
    Spin,
    Stop(usize),
    Press(usize),
    Auto,
    Reset,
}

impl Route {
    fn parse(method: &Method, url: &str) -> Option<Self> {
        let path = url.split('?').next().unwrap_or(url);
        match (method, path) {
            (&Method::Get, "/api/state") => return Some(Self::State),
            (&Method::Post, "/api/spin") => return Some(Self::Spin),
            (&Method::Post, "/api/auto") => return Some(Self::Auto),
            (&Method::Post, "/api/reset") => return Some(Self::Reset),
            _ => {}
        }
        if method != &Method::Post {
            return None;
        }
        if let Some(raw) = path.strip_prefix("/api/stop/") {
            return raw.parse().ok().map(Self::Stop);
        }
        if let Some(raw) = path.strip_prefix("/api/press/") {
            return raw.parse().ok().map(Self::Press);
        }
        None
    }
}

fn apply_route(state: &mut AppState, route: Route) -> Result<(), SessionError> {
    let AppState { session, events } = state;
    match route {
        Route::State => Ok(()),
        Route::Spin => session.start_spin(events).map(|_| ()),
        Route::Stop(index) => {
            session.stop_reel(index, events)?;
            run_until_rest(session, events, index)
        }
        Route::Press(index) => {
            let was_spinning = session.is_spinning();
            session.press(index, events)?;
            if was_spinning {
                run_until_rest(session, events, index)?;
            }
            Ok(())
        }
        Route::Auto => {
            if !session.is_spinning() {
                session.start_spin(events)?;
            }
            session.settle(events).map(|_| ())
        }
        Route::Reset => {
            session.reset(events);
            Ok(())
        }
    }
}

/// Stateless clients never see a half-eased reel: tick until `index` rests.
fn run_until_rest(
    session: &mut SlotSession,
    events: &mut EventBus,
    index: usize,
) -> Result<(), SessionError> {
    for _ in 0..MAX_STOP_FRAMES {
        if session.reels()[index].is_idle() || session.tick(events).is_some() {
            return Ok(());
        }
    }
    Err(SessionError::Stalled(MAX_STOP_FRAMES))
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = if response.ok { 200 } else { 409 };
    let body = serde_json::to_vec_pretty(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "bad content type header")?;
    request.respond(
        Response::from_data(body)
            .with_header(header)
            .with_status_code(StatusCode(status)),
    )?;
    Ok(())
}

fn build_response(state: &mut AppState, err: Option<String>) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_state(&state.session),
        events,
    }
}

fn snapshot_state(session: &SlotSession) -> UiState {
    let faces = session.visible_faces();
    let reels = session
        .reels()
        .iter()
        .enumerate()
        .map(|(index, reel)| {
            let face = faces[index];
            UiReel {
                phase: reel.phase(),
                rotation: reel.rotation(),
                faces: face,
                names: face
                    .as_array()
                    .map(|symbol| session.table.name(symbol).to_string()),
            }
        })
        .collect();
    let last_outcome = session.last_outcome().map(|outcome| UiOutcome {
        spin: outcome.spin,
        kind: outcome.kind,
        wins: outcome.evaluation.wins.clone(),
        payout: outcome.evaluation.total,
    });
    UiState {
        score: session.score(),
        spin_count: session.spin_count(),
        spin_cost: session.config.spin_cost,
        status: session.status(),
        spinning: session.is_spinning(),
        bonus_active: session.bonus_active(),
        bonus_remaining: session.bonus_remaining(),
        controls: session.controls(),
        paylines: session
            .config
            .paylines
            .lines()
            .iter()
            .map(|line: &PaylineId| line.id())
            .collect(),
        reels,
        last_outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minislot_core::{MachineConfig, REEL_COUNT};

    fn state() -> AppState {
        AppState::new(SlotSession::new(MachineConfig::deluxe(), 4).expect("session"))
    }

    #[test]
    fn parses_routes() {
        assert_eq!(Route::parse(&Method::Get, "/api/state"), Some(Route::State));
        assert_eq!(Route::parse(&Method::Post, "/api/spin"), Some(Route::Spin));
        assert_eq!(
            Route::parse(&Method::Post, "/api/stop/2"),
            Some(Route::Stop(2))
        );
        assert_eq!(
            Route::parse(&Method::Post, "/api/press/0?x=1"),
            Some(Route::Press(0))
        );
        assert_eq!(Route::parse(&Method::Get, "/api/stop/1"), None);
        assert_eq!(Route::parse(&Method::Post, "/api/stop/abc"), None);
        assert_eq!(Route::parse(&Method::Post, "/nope"), None);
    }

    #[test]
    fn stops_settle_before_answering() {
        let mut state = state();
        apply_route(&mut state, Route::Spin).expect("spin");
        for index in 0..REEL_COUNT {
            apply_route(&mut state, Route::Stop(index)).expect("stop");
            assert!(state.session.reels()[index].is_idle());
        }
        assert!(!state.session.is_spinning());
        let response = build_response(&mut state, None);
        assert!(response.ok);
        assert!(response.state.last_outcome.is_some());
        assert!(response
            .events
            .iter()
            .any(|event| matches!(event, Event::SpinResolved { .. })));
    }

    #[test]
    fn rejected_requests_report_errors() {
        let mut state = state();
        let err = apply_route(&mut state, Route::Stop(0)).expect_err("not spinning");
        assert!(matches!(err, SessionError::NotSpinning));
        apply_route(&mut state, Route::Spin).expect("spin");
        assert!(matches!(
            apply_route(&mut state, Route::Stop(5)),
            Err(SessionError::InvalidReel(5))
        ));
        let response = build_response(&mut state, Some("bad".to_string()));
        assert!(!response.ok);
        assert!(response.state.spinning);
    }

    #[test]
    fn stopping_a_resting_reel_leaves_others_alone() {
        let mut state = state();
        apply_route(&mut state, Route::Spin).expect("spin");
        apply_route(&mut state, Route::Stop(0)).expect("stop");
        let before: Vec<f64> = state.session.reels().iter().map(|reel| reel.rotation()).collect();
        apply_route(&mut state, Route::Stop(0)).expect("repeat stop");
        let after: Vec<f64> = state.session.reels().iter().map(|reel| reel.rotation()).collect();
        assert_eq!(before, after);
        assert!(state.session.reels()[1].is_spinning());
    }

    #[test]
    fn press_starts_then_stops() {
        let mut state = state();
        apply_route(&mut state, Route::Press(1)).expect("start");
        assert!(state.session.is_spinning());
        apply_route(&mut state, Route::Press(1)).expect("stop");
        assert!(state.session.reels()[1].is_idle());
        apply_route(&mut state, Route::Auto).expect("settle");
        assert!(!state.session.is_spinning());
        assert_eq!(state.session.spin_count(), 1);
    }

    #[test]
    fn parses_server_flags() {
        let args: Vec<String> = ["--addr", "127.0.0.1:9000", "--seed", "5", "--machine", "classic"]
            .iter()
            .map(|item| item.to_string())
            .collect();
        let options = parse_options(&args);
        assert_eq!(options.addr, "127.0.0.1:9000");
        assert_eq!(options.seed, 5);
        assert_eq!(options.machine, "classic");
    }
}
