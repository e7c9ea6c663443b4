use minislot_core::{GapRange, MachineConfig};
use minislot_sim::{simulate, SimConfig, SimError, SimReport, StopOrder};

fn run(machine: MachineConfig, seed: u64, spins: u32, stop_order: StopOrder) -> SimReport {
    let config = SimConfig {
        seed,
        spins,
        stop_order,
        ..SimConfig::default()
    };
    simulate(&config, machine).expect("simulate")
}

fn assert_consistent(report: &SimReport) {
    assert_eq!(report.kinds.total(), report.spins);
    assert!(report.winning_spins <= report.spins);
    assert!(report.line_wins >= report.winning_spins);
    let symbol_lines: u32 = report.symbols.iter().map(|s| s.line_wins).sum();
    assert_eq!(symbol_lines, report.line_wins);
    let symbol_payout: i64 = report.symbols.iter().map(|s| s.payout).sum();
    assert_eq!(symbol_payout, report.total_payout);
    assert_eq!(
        report.final_score,
        report.starting_score - report.total_cost + report.total_payout
    );
    assert!(report.max_drought <= report.spins);
}

macro_rules! sim_case {
    ($name:ident, $machine:expr, $seed:expr, $spins:expr, $order:expr) => {
        #[test]
        fn $name() {
            let report = run($machine, $seed, $spins, $order);
            assert_eq!(report.spins, $spins);
            assert!(report.ended_early.is_none());
            assert_consistent(&report);
        }
    };
}

sim_case!(classic_ltr, MachineConfig::classic(), 1, 200, StopOrder::LeftToRight);
sim_case!(classic_rtl, MachineConfig::classic(), 2, 200, StopOrder::RightToLeft);
sim_case!(classic_shuffled, MachineConfig::classic(), 3, 200, StopOrder::Shuffled);
sim_case!(deluxe_ltr, MachineConfig::deluxe(), 4, 300, StopOrder::LeftToRight);
sim_case!(deluxe_rtl, MachineConfig::deluxe(), 5, 300, StopOrder::RightToLeft);
sim_case!(deluxe_shuffled, MachineConfig::deluxe(), 6, 300, StopOrder::Shuffled);

#[test]
fn pity_timer_caps_the_drought() {
    let report = run(MachineConfig::classic(), 21, 500, StopOrder::LeftToRight);
    // The longest allowed gap is five random spins before a forced win.
    assert!(report.max_drought <= 5, "drought {}", report.max_drought);
    assert!(report.kinds.small_win > 0);
}

#[test]
fn jackpots_follow_global_counter() {
    let mut machine = MachineConfig::classic();
    machine.small_win.gap = GapRange::fixed(1_000);
    let report = run(machine, 8, 90, StopOrder::LeftToRight);
    assert_eq!(report.kinds.jackpot, 3);
    let sevens: u32 = report.symbols[6..].iter().map(|s| s.line_wins).sum();
    assert!(sevens >= 3);
}

#[test]
fn bonus_rounds_are_counted() {
    let mut machine = MachineConfig::deluxe();
    if let Some(bonus) = machine.bonus.as_mut() {
        bonus.gap = GapRange::fixed(10);
        bonus.spins = 5;
    }
    let report = run(machine, 12, 100, StopOrder::Shuffled);
    assert!(report.bonus_rounds >= 1);
    // The last round may still be running when the batch ends.
    assert!(report.kinds.bonus <= report.bonus_rounds * 5);
    assert!(report.kinds.bonus + 5 > report.bonus_rounds * 5);
    assert!(report.kinds.bonus_trigger >= report.bonus_rounds);
}

#[test]
fn unfunded_run_stops_when_broke() {
    let mut machine = MachineConfig::deluxe();
    machine.starting_score = 30;
    for symbol in &mut machine.symbols {
        symbol.value = 0;
    }
    let config = SimConfig {
        seed: 3,
        spins: 100,
        fund_spins: false,
        ..SimConfig::default()
    };
    let report = simulate(&config, machine).expect("simulate");
    assert_eq!(report.spins, 3);
    assert_eq!(report.final_score, 0);
    assert!(report.ended_early.is_some());
    assert!(report.to_text_report().contains("ended early"));
}

#[test]
fn same_seed_same_report() {
    let a = run(MachineConfig::deluxe(), 77, 150, StopOrder::Shuffled);
    let b = run(MachineConfig::deluxe(), 77, 150, StopOrder::Shuffled);
    assert_eq!(a, b);
}

#[test]
fn report_renders_as_text_and_json() {
    let report = run(MachineConfig::deluxe(), 10, 60, StopOrder::LeftToRight);
    let text = report.to_text_report();
    assert!(text.contains("hit_rate"));
    assert!(text.contains("kinds/类型:"));
    let json = report.to_json().expect("json");
    let parsed: SimReport = serde_json::from_str(&json).expect("parse back");
    assert_eq!(parsed.spins, report.spins);
    assert_eq!(parsed.symbols.len(), 8);
}

#[test]
fn invalid_machine_is_a_session_error() {
    let mut machine = MachineConfig::classic();
    machine.symbols.clear();
    let err = simulate(&SimConfig::default(), machine).expect_err("no symbols");
    assert!(matches!(err, SimError::Session(_)));
}

#[test]
fn stop_order_parsing() {
    assert_eq!(StopOrder::parse("LTR").expect("ltr"), StopOrder::LeftToRight);
    assert_eq!(StopOrder::parse("rtl").expect("rtl"), StopOrder::RightToLeft);
    assert_eq!(StopOrder::parse("random").expect("shuffled"), StopOrder::Shuffled);
    assert!(matches!(
        StopOrder::parse("sideways"),
        Err(SimError::StopOrder(_))
    ));
}
