//! demur-cli — Local inspection and simulation for the Demur ledger.
//!
//! Everything runs in-process against the in-memory backing asset and a
//! manual clock; nothing here talks to a network. Useful for eyeballing the
//! decay schedule, checking exchange quotes at a given price, and replaying
//! a full mint/decay/transfer/redeem session.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use demur_core::clock::ManualClock;
use demur_core::constants::{FLAT_FEE, PERIOD_SECS};
use demur_core::traits::DecaySchedule;
use demur_core::types::Address;
use demur_core::{BackingAsset, MemoryAsset};
use demur_decay::DecayEngine;
use demur_ledger::Ledger;

/// Demur ledger inspection and simulation.
#[derive(Parser)]
#[command(name = "demur-cli")]
#[command(version, about = "Value that flows loses nothing; value that sits, decays.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decay factor over a range of periods.
    DecayTable(DecayTableArgs),
    /// Quote the tokens minted by a backing-asset deposit.
    PreviewMint(PreviewArgs),
    /// Quote the backing asset paid out by a redemption.
    PreviewRedeem(PreviewArgs),
    /// Run a scripted mint/decay/transfer/redeem session and dump the
    /// event log as JSON.
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct DecayTableArgs {
    /// Last period to print.
    #[arg(long, default_value_t = 1_000)]
    periods: u64,

    /// Step between printed rows.
    #[arg(long, default_value_t = 100)]
    step: u64,
}

#[derive(Args)]
struct PreviewArgs {
    /// Mint price in backing-asset units per whole token.
    #[arg(long)]
    price: u64,

    /// Amount to quote (asset units for mint, token units for redeem).
    #[arg(long)]
    amount: u64,
}

#[derive(Args)]
struct SimulateArgs {
    /// Mint price in backing-asset units per whole token.
    #[arg(long, default_value_t = 37_070_000)]
    price: u64,

    /// Backing-asset deposit per participant.
    #[arg(long, default_value_t = 100_000_000)]
    deposit: u64,

    /// Decay periods to let pass between mint and redeem.
    #[arg(long, default_value_t = 10)]
    periods: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DecayTable(args) => decay_table(args),
        Commands::PreviewMint(args) => preview_mint(args),
        Commands::PreviewRedeem(args) => preview_redeem(args),
        Commands::Simulate(args) => simulate(args),
    }
}

fn decay_table(args: DecayTableArgs) -> Result<()> {
    let engine = DecayEngine::new();
    let step = args.step.max(1);

    println!("{:>8}  {:>8}  {:>10}", "period", "factor", "retained");
    let mut period = 0;
    while period <= args.periods {
        let factor = engine.factor_for_periods(period)?;
        // The factor is in basis points, so retained% is factor / 100.
        println!(
            "{:>8}  {:>8}  {:>7}.{:02}%",
            period,
            factor,
            factor / 100,
            factor % 100
        );
        period += step;
    }
    Ok(())
}

fn preview_mint(args: PreviewArgs) -> Result<()> {
    let ledger = quote_ledger(args.price)?;
    let tokens = ledger.preview_mint(args.amount)?;
    println!(
        "deposit {} asset units -> {} token units (fee {})",
        args.amount, tokens, FLAT_FEE
    );
    Ok(())
}

fn preview_redeem(args: PreviewArgs) -> Result<()> {
    let ledger = quote_ledger(args.price)?;
    let payout = ledger.preview_redeem(args.amount)?;
    println!(
        "redeem {} token units -> {} asset units (fee {})",
        args.amount, payout, FLAT_FEE
    );
    Ok(())
}

/// Throwaway ledger for stateless quoting.
fn quote_ledger(price: u64) -> Result<Ledger> {
    let clock = Arc::new(ManualClock::new(0));
    Ledger::new(
        Address([0xCC; 20]),
        Address([0x0F; 20]),
        price,
        Address([0xFE; 20]),
        clock,
    )
    .context("invalid quote parameters")
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let custody = Address([0xCC; 20]);
    let operator = Address([0x0F; 20]);
    let fees = Address([0xFE; 20]);
    let alice = Address([1; 20]);
    let bob = Address([2; 20]);

    let clock = Arc::new(ManualClock::new(1_767_225_600));
    let mut ledger = Ledger::new(custody, operator, args.price, fees, clock.clone())?;
    let mut asset = MemoryAsset::new(custody);
    asset.credit(alice, args.deposit);
    asset.credit(bob, args.deposit);

    let alice_tokens = ledger.mint(&mut asset, alice, args.deposit)?;
    let bob_tokens = ledger.mint(&mut asset, bob, args.deposit)?;
    tracing::info!(alice_tokens, bob_tokens, "minted");

    ledger.transfer(alice, bob, alice_tokens / 10)?;

    clock.advance(args.periods * PERIOD_SECS);
    tracing::info!(
        factor = ledger.current_decay_factor()?,
        supply = ledger.total_supply()?,
        "after {} periods",
        args.periods
    );

    let bob_balance = ledger.balance_of(bob)?;
    if bob_balance > FLAT_FEE {
        let payout = ledger.redeem(&mut asset, bob, bob_balance)?;
        tracing::info!(payout, sink = asset.balance_of(Address::SINK), "bob redeemed");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(ledger.events()).context("event log serializes")?
    );
    println!(
        "alice: {} units ({} shares), custody reserve: {} asset units",
        ledger.balance_of(alice)?,
        ledger.shares_of(alice),
        asset.balance_of(custody)
    );
    Ok(())
}
