use std::collections::BTreeMap;

use crate::domain::{Asset, DebtSnapshot, Decimal};

use super::cumulative::CumulativeSeries;

/// Backward as-of join of a cumulative series onto the debt-snapshot timeline.
pub struct AsOfJoiner;

impl AsOfJoiner {
    /// For each snapshot, the latest running total of the same asset whose
    /// timestamp is `<=` the snapshot's, or zero when there is none.
    ///
    /// The returned vector is parallel to `base`. Each asset is handled by one
    /// merge pass over its snapshots (sorted) and its series points, so the
    /// join is linear in the series length after the snapshot sort.
    pub fn join(base: &[DebtSnapshot], series: &CumulativeSeries) -> Vec<Decimal> {
        let mut joined = vec![Decimal::zero(); base.len()];

        let mut rows_by_asset: BTreeMap<&Asset, Vec<usize>> = BTreeMap::new();
        for (idx, snapshot) in base.iter().enumerate() {
            rows_by_asset.entry(&snapshot.asset).or_default().push(idx);
        }

        for (asset, mut rows) in rows_by_asset {
            let points = series.for_asset(asset);
            if points.is_empty() {
                continue;
            }
            rows.sort_by_key(|&idx| base[idx].timestamp);

            let mut cursor = 0;
            let mut carried = Decimal::zero();
            for idx in rows {
                let at = base[idx].timestamp;
                while cursor < points.len() && points[cursor].timestamp <= at {
                    carried = points[cursor].total;
                    cursor += 1;
                }
                joined[idx] = carried;
            }
        }

        joined
    }
}
