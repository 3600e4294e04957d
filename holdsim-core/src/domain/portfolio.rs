//! Portfolio — a collection of independent instruments with a combined view.
//!
//! Aggregation is deliberately minimal: per-date forward-filled sums across
//! instruments. Instruments share no mutable state, so recomputation runs in
//! parallel.

use rayon::prelude::*;

use crate::domain::instrument::Instrument;
use crate::engine::{DerivedSeries, ValuationError};
use crate::series::SparseSeries;
use std::collections::BTreeSet;

/// Owns a set of [`Instrument`]s and sums their derived series.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    instruments: Vec<Instrument>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn instruments_mut(&mut self) -> &mut [Instrument] {
        &mut self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Recompute every instrument. Instruments are independent, so they run
    /// in parallel; the first error aborts the batch (already-computed
    /// instruments keep their valid series, failed ones stay stale).
    pub fn recompute_all(&mut self) -> Result<(), ValuationError> {
        self.instruments
            .par_iter_mut()
            .try_for_each(|instrument| instrument.recompute())
    }

    /// Combined market value: forward-filled sum over the union of the
    /// instruments' value dates. Fails if any instrument is stale.
    pub fn combined_value(&self) -> Result<SparseSeries<f64>, ValuationError> {
        self.summed(|derived| &derived.value)
    }

    /// Combined cost basis, same construction as [`combined_value`](Self::combined_value).
    pub fn combined_cost(&self) -> Result<SparseSeries<f64>, ValuationError> {
        self.summed(|derived| &derived.cost)
    }

    /// Combined gain: combined value minus forward-filled combined cost.
    pub fn combined_gain(&self) -> Result<SparseSeries<f64>, ValuationError> {
        let value = self.combined_value()?;
        let cost = self.combined_cost()?;
        Ok(crate::engine::compute_gain(&value, &cost))
    }

    /// Combined gain percentage. Ratios do not add, so this is recomputed
    /// from the combined gain and cost rather than summed per instrument.
    pub fn combined_gainp(&self) -> Result<SparseSeries<f64>, ValuationError> {
        let gain = self.combined_gain()?;
        let cost = self.combined_cost()?;
        Ok(crate::engine::compute_gainp(&gain, &cost))
    }

    fn summed(
        &self,
        pick: impl Fn(&DerivedSeries) -> &SparseSeries<f64>,
    ) -> Result<SparseSeries<f64>, ValuationError> {
        let mut picked = Vec::with_capacity(self.instruments.len());
        for instrument in &self.instruments {
            picked.push(pick(instrument.derived()?));
        }

        let dates: BTreeSet<_> = picked.iter().flat_map(|series| series.dates()).collect();
        let mut combined = SparseSeries::new();
        for date in dates {
            let total: f64 = picked
                .iter()
                .filter_map(|series| series.latest_at_or_before(date))
                .sum();
            combined.set(date, total);
        }
        Ok(combined)
    }
}
