//! Roulette Table entry point
//!
//! Headless demo round: restores the session, places a few wagers, spins on
//! the virtual clock, prints the outcome and saves the session again.
//!
//! Usage: `roulette-table [SESSION_FILE] [SETTINGS_FILE]`

use std::path::PathBuf;

use roulette_table::persistence::{SessionRecord, default_session_path};
use roulette_table::settings::TableSettings;
use roulette_table::sim::{CallBet, RouletteTable, SpinPhase, TableEvent};
use roulette_table::{TableResult, format_money};

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let session_path = args
        .next()
        .map(PathBuf::from)
        .or_else(default_session_path)
        .unwrap_or_else(|| PathBuf::from(roulette_table::persistence::session::SESSION_FILE_NAME));
    let settings = args
        .next()
        .map(|p| TableSettings::load(&PathBuf::from(p)))
        .unwrap_or_default();

    let record = SessionRecord::load_or_default(&session_path, &settings);
    let mut table = RouletteTable::new(settings, record);
    println!(
        "Balance {} | {}",
        format_money(table.balance(), table.currency()),
        table.statistics().summary(table.currency())
    );

    report("Straight 17", table.place_number(17).map(|_| ()));
    report("Red", table.place_quick("Red").map(|_| ()));
    report("Voisins", table.place_call_bet(CallBet::Voisins).map(|_| ()));
    println!(
        "Staked {} on {} wager(s)",
        format_money(table.total_stake(), table.currency()),
        table.wagers().len()
    );

    if let Err(e) = table.spin() {
        eprintln!("Spin refused: {e}");
        return;
    }
    while table.phase() != SpinPhase::Idle {
        let Some(deadline) = table.next_deadline() else {
            break;
        };
        table.advance(deadline.saturating_sub(table.now_ms()));
    }

    for event in table.drain_events() {
        if let TableEvent::Settled { report, balance } = event {
            println!("{}", report.headline(table.currency()));
            for line in report.breakdown(table.currency()) {
                println!("  {line}");
            }
            println!("Balance {}", format_money(balance, table.currency()));
        }
    }
    println!("{}", table.statistics().summary(table.currency()));

    let record = table.close();
    if let Err(e) = record.save(&session_path) {
        log::warn!("Could not save session: {e}");
    }
}

fn report(what: &str, result: TableResult<()>) {
    match result {
        Ok(()) => log::debug!("Placed {what}"),
        Err(e) => println!("{what}: {e}"),
    }
}
