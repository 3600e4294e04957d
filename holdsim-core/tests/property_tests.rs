//! Property tests for the sparse series and the valuation engine.
//!
//! Uses proptest to verify:
//! 1. Forward-fill lookups agree with a linear-scan reference
//! 2. Cash-only, non-reinvesting shares equal the closed-form sum
//! 3. The dividend/transaction merge walk matches a sort-merge reference
//!    on random interleavings (same-day dividends before the transaction)
//! 4. A dividend strictly between two transactions compounds after the
//!    earlier and before the later one
//! 5. Gain/gain% output invariants hold for random ledgers

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeSet;

use holdsim_core::domain::{
    Bar, DividendLedger, DividendUnit, PriceHistory, TransactionLedger, TransactionUnit,
};
use holdsim_core::engine::{compute_shares, recompute};
use holdsim_core::series::SparseSeries;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base_date() + Duration::days(offset)
}

/// Deterministic synthetic closing price for a date offset.
fn price_at(offset: i64) -> f64 {
    100.0 + (offset % 7) as f64 * 5.0
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_offsets(max_len: usize) -> impl Strategy<Value = BTreeSet<i64>> {
    prop::collection::btree_set(0..365i64, 1..=max_len)
}

fn arb_amount() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|a| (a * 100.0).round() / 100.0)
}

fn arb_ratio() -> impl Strategy<Value = f64> {
    (0.01..0.5_f64).prop_map(|r| (r * 1000.0).round() / 1000.0)
}

// ── 1. Forward-fill reference ────────────────────────────────────────

proptest! {
    /// `latest_at_or_before` agrees with a linear scan over the entries.
    #[test]
    fn forward_fill_matches_linear_scan(
        offsets in arb_offsets(12),
        query in -30..400i64,
    ) {
        let series: SparseSeries<i64> =
            offsets.iter().map(|&o| (day(o), o)).collect();
        let query_date = day(query);

        let expected = offsets.iter().filter(|&&o| o <= query).max().copied();
        prop_assert_eq!(
            series.latest_at_or_before(query_date).copied(),
            expected
        );

        let mirror = offsets.iter().filter(|&&o| o >= query).min().copied();
        prop_assert_eq!(
            series.earliest_at_or_after(query_date).copied(),
            mirror
        );
    }

    /// A query after the maximum key resolves to the maximum key.
    #[test]
    fn forward_fill_boundary_after_max(offsets in arb_offsets(12)) {
        let series: SparseSeries<i64> =
            offsets.iter().map(|&o| (day(o), o)).collect();
        let max = *offsets.iter().max().unwrap();
        prop_assert_eq!(
            series.latest_at_or_before(day(max + 500)).copied(),
            Some(max)
        );
        prop_assert_eq!(series.latest_at_or_before(day(-500)), None);
    }
}

// ── 2. Cash-only closed form ─────────────────────────────────────────

proptest! {
    /// For a Cash-only, non-reinvesting ledger:
    /// `shares(end) = Σ amount_i / price_at_or_before(d_i)`.
    #[test]
    fn cash_only_shares_match_closed_form(
        offsets in arb_offsets(8),
        amounts in prop::collection::vec(arb_amount(), 8),
    ) {
        let mut transactions = TransactionLedger::new(TransactionUnit::Cash);
        let mut history = PriceHistory::new();
        let mut expected = 0.0;
        for (&offset, amount) in offsets.iter().zip(&amounts) {
            transactions.record(day(offset), *amount);
            history.insert(day(offset), Bar::closing(price_at(offset)));
            expected += amount / price_at(offset);
        }

        let shares = compute_shares(&transactions, &history, false).unwrap();
        let last = shares.latest_at_or_before(day(400)).copied().unwrap();
        prop_assert!((last - expected).abs() < 1e-9);

        // baseline: zero one day before the first transaction
        let first = *offsets.iter().min().unwrap();
        prop_assert_eq!(shares.get(day(first - 1)).copied(), Some(0.0));
    }
}

// ── 3. Merge-walk vs sort-merge reference ────────────────────────────

/// Reference: flatten both ledgers into one event list sorted by
/// (date, dividend-before-transaction), drop dividends before the first
/// transaction date, and fold. A different formulation of the same rule
/// the engine implements with a two-cursor walk.
fn reference_shares(
    tx: &[(i64, f64)],
    divs: &[(i64, f64)],
) -> SparseSeries<f64> {
    let first_tx = tx.iter().map(|(o, _)| *o).min().unwrap();

    #[derive(Clone, Copy)]
    enum Event {
        Dividend(f64),
        Transaction(f64),
    }
    let mut events: Vec<(i64, u8, Event)> = Vec::new();
    for &(offset, ratio) in divs {
        if offset >= first_tx {
            events.push((offset, 0, Event::Dividend(ratio)));
        }
    }
    for &(offset, amount) in tx {
        events.push((offset, 1, Event::Transaction(amount)));
    }
    events.sort_by_key(|&(offset, rank, _)| (offset, rank));

    let mut series = SparseSeries::new();
    series.set(day(first_tx - 1), 0.0);
    let mut s = 0.0;
    for (offset, _, event) in events {
        s = match event {
            Event::Dividend(ratio) => s + s * ratio,
            Event::Transaction(amount) => s + amount,
        };
        series.set(day(offset), s);
    }
    series
}

proptest! {
    /// The engine's two-cursor merge walk produces the same series as the
    /// sort-merge reference for arbitrary interleavings, including shared
    /// dates (dividend applies before the same-day transaction).
    #[test]
    fn merge_walk_matches_sort_merge_reference(
        tx_offsets in arb_offsets(6),
        tx_amounts in prop::collection::vec(arb_amount(), 6),
        div_offsets in arb_offsets(6),
        div_ratios in prop::collection::vec(arb_ratio(), 6),
    ) {
        let tx: Vec<(i64, f64)> = tx_offsets
            .iter()
            .zip(&tx_amounts)
            .map(|(&o, &a)| (o, a))
            .collect();
        let divs: Vec<(i64, f64)> = div_offsets
            .iter()
            .zip(&div_ratios)
            .map(|(&o, &r)| (o, r))
            .collect();

        let mut transactions = TransactionLedger::new(TransactionUnit::Shares);
        for &(offset, amount) in &tx {
            transactions.record(day(offset), amount);
        }
        let mut dividends = DividendLedger::new(DividendUnit::ShareRatio);
        for &(offset, ratio) in &divs {
            dividends.record(day(offset), ratio);
        }
        let mut history = PriceHistory::new();
        history.attach_dividends(dividends);

        let shares = compute_shares(&transactions, &history, true).unwrap();
        let expected = reference_shares(&tx, &divs);

        prop_assert_eq!(shares.len(), expected.len());
        for ((date, got), (ref_date, want)) in shares.iter().zip(expected.iter()) {
            prop_assert_eq!(date, ref_date);
            prop_assert!((got - want).abs() < 1e-9, "mismatch at {}", date);
        }
    }

    /// A dividend strictly between two transactions is applied after the
    /// earlier and before the later transaction.
    #[test]
    fn interior_dividend_compounds_between_transactions(
        first_amount in arb_amount(),
        second_amount in arb_amount(),
        ratio in arb_ratio(),
        gap in 1..50i64,
    ) {
        let tx1 = day(0);
        let div = day(gap);
        let tx2 = day(2 * gap + 1);

        let mut transactions = TransactionLedger::new(TransactionUnit::Shares);
        transactions.record(tx1, first_amount);
        transactions.record(tx2, second_amount);
        let mut dividends = DividendLedger::new(DividendUnit::ShareRatio);
        dividends.record(div, ratio);
        let mut history = PriceHistory::new();
        history.attach_dividends(dividends);

        let shares = compute_shares(&transactions, &history, true).unwrap();

        let compounded = first_amount * (1.0 + ratio);
        prop_assert!((shares.get(div).copied().unwrap() - compounded).abs() < 1e-9);
        prop_assert!(
            (shares.get(tx2).copied().unwrap() - (compounded + second_amount)).abs() < 1e-9
        );
    }
}

// ── 5. Derived-series invariants on random ledgers ───────────────────

proptest! {
    /// gain% has no entry where the forward-filled cost is zero, and every
    /// gain entry equals value minus forward-filled cost.
    #[test]
    fn gain_invariants_hold(
        offsets in arb_offsets(6),
        amounts in prop::collection::vec(arb_amount(), 6),
    ) {
        let mut transactions = TransactionLedger::new(TransactionUnit::Cash);
        let mut history = PriceHistory::new();
        for (&offset, amount) in offsets.iter().zip(&amounts) {
            transactions.record(day(offset), *amount);
            history.insert(day(offset), Bar::closing(price_at(offset)));
        }

        let derived = recompute(&transactions, &history, false).unwrap();
        for (date, gp) in derived.gainp.iter() {
            let c = derived.cost.latest_at_or_before(date).copied().unwrap_or(0.0);
            prop_assert!(c != 0.0);
            let g = derived.gain.get(date).copied().unwrap();
            prop_assert!((gp - g / c).abs() < 1e-9);
        }
        for (date, g) in derived.gain.iter() {
            let v = derived.value.get(date).copied().unwrap();
            let c = derived.cost.latest_at_or_before(date).copied().unwrap_or(0.0);
            prop_assert!((g - (v - c)).abs() < 1e-9);
        }
    }
}
