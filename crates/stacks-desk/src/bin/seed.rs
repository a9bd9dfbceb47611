//! # Seed Walkthrough
//!
//! Fills a desk with sample copies and members, then runs a few weeks of
//! circulation on a manual clock and prints the resulting outbox.
//!
//! ## Usage
//! ```bash
//! # Defaults (or ~/.config/stacks/desk.toml if present)
//! cargo run -p stacks-desk --bin seed
//!
//! # Explicit config file, print outbox as JSON
//! cargo run -p stacks-desk --bin seed -- --config ./desk.toml --json
//!
//! # More logging
//! RUST_LOG=debug cargo run -p stacks-desk --bin seed
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use stacks_core::{BookCopy, CatalogKey, ManualClock, MemberAccount, MemberId, Money};
use stacks_desk::{open_desk_with_clock, prune_expired_notifications, DeskConfig, SharedDesk};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sample copies: (catalog key, title, author)
const COPIES: &[(&str, &str, &str)] = &[
    ("PR-4034-01", "Pride and Prejudice", "Jane Austen"),
    ("PS-3545-01", "Their Eyes Were Watching God", "Zora Neale Hurston"),
    ("PG-3326-01", "Crime and Punishment", "Fyodor Dostoevsky"),
    ("PQ-6613-01", "One Hundred Years of Solitude", "Gabriel Garcia Marquez"),
    ("PL-856-01", "Kafka on the Shore", "Haruki Murakami"),
];

/// Sample members: (id, name)
const MEMBERS: &[(&str, &str)] = &[
    ("M-1001", "Ada Lovelace"),
    ("M-1002", "Alan Turing"),
    ("M-1003", "Grace Hopper"),
    ("M-1004", "Edsger Dijkstra"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut as_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--json" => as_json = true,
            "--help" | "-h" => {
                println!("Stacks Seed Walkthrough");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Desk config file (default: platform config dir)");
                println!("      --json           Print the outbox as JSON");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = DeskConfig::load_or_default(config_path);
    let opening = Utc
        .with_ymd_and_hms(2024, 9, 2, 9, 0, 0)
        .single()
        .ok_or("invalid opening date")?;
    let clock = ManualClock::new(opening);
    let desk = open_desk_with_clock(&config, Arc::new(clock.clone()))?;
    let desk = SharedDesk::new(desk);

    println!("📚 {}", config.library.name);
    println!("================================");

    desk.with_desk(|d| -> Result<(), stacks_desk::DeskError> {
        for (key, title, author) in COPIES {
            d.catalog_mut()
                .add_copy(BookCopy::new(CatalogKey::from(*key), *title, *author))?;
        }
        for (id, name) in MEMBERS {
            d.catalog_mut()
                .add_member(MemberAccount::new(MemberId::from(*id), *name))?;
        }
        Ok(())
    })?;
    println!("✓ {} copies, {} members", COPIES.len(), MEMBERS.len());

    let ada = MemberId::from("M-1001");
    let alan = MemberId::from("M-1002");
    let grace = MemberId::from("M-1003");
    let austen = CatalogKey::from("PR-4034-01");
    let hurston = CatalogKey::from("PS-3545-01");

    // Week 1: loans and a queue
    desk.with_desk(|d| -> Result<(), stacks_desk::DeskError> {
        d.borrow(&ada, &austen, None)?;
        d.borrow(&alan, &hurston, Some(7))?;
        let position = d.reserve(&grace, &austen)?;
        println!("✓ Grace is #{} in line for Pride and Prejudice", position);
        Ok(())
    })?;

    // Day 12: reminders go out
    clock.advance_days(12);
    let reminders = desk.with_desk(|d| d.send_due_reminders());
    println!("✓ Day 12: {} reminder(s) sent", reminders);

    // Day 17: a late return hands the copy to Grace
    clock.advance_days(5);
    desk.with_desk(|d| -> Result<(), stacks_desk::DeskError> {
        let outcome = d.return_copy(&ada, &austen)?;
        println!(
            "✓ Day 17: Ada returned {} day(s) late, fine {}",
            outcome.returned.days_overdue, outcome.returned.fine
        );
        if let Some(hand_off) = outcome.hand_off {
            println!(
                "  Handed to {} (respond by {})",
                hand_off.member,
                hand_off.respond_by.format("%Y-%m-%d %H:%M")
            );
            d.borrow(&hand_off.member, &austen, None)?;
        }

        match d.borrow(&ada, &hurston, None) {
            Ok(_) => println!("  Ada borrowed Their Eyes Were Watching God"),
            Err(e) => println!("  Ada refused: {}", e),
        }

        let remaining = d.pay_fine(&ada, Money::from_cents(1_000))?;
        println!("✓ Ada paid up, balance now {}", remaining);
        Ok(())
    })?;

    let overdue = desk.with_desk(|d| d.overdue_loans());
    println!();
    println!("Overdue loans:");
    for row in &overdue {
        println!(
            "  {} holds {} ({} day(s) late, {})",
            row.member, row.copy, row.days_overdue, row.fine
        );
    }

    println!();
    desk.with_desk(|d| -> Result<(), stacks_desk::DeskError> {
        let outbox = d.notifier();
        if as_json {
            println!("{}", outbox.to_json()?);
        } else {
            println!("Outbox ({} pending, {} evicted):", outbox.len(), outbox.evicted());
            for n in outbox.iter() {
                println!("  [{:?}] {} → {}", n.priority, n.member, n.message);
            }
        }
        Ok(())
    })?;

    // Day 60: retention sweep
    clock.advance_days(43);
    let pruned = desk.with_desk(|d| prune_expired_notifications(d, &config.notifications));
    info!(pruned, "Retention sweep finished");
    println!("✓ Day 60: {} notification(s) past retention pruned", pruned);

    println!();
    println!("✓ Walkthrough complete!");

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show refusals and queue details
/// - Default: `info,stacks=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stacks=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
