use std::collections::BTreeMap;

use crate::domain::{Asset, Decimal, SeriesEvent, Timestamp};

use super::AggregateError;

/// Running total of a measure at one event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningTotal {
    pub timestamp: Timestamp,
    pub total: Decimal,
}

/// Per-asset running totals, each asset's points ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeSeries {
    by_asset: BTreeMap<Asset, Vec<RunningTotal>>,
}

impl CumulativeSeries {
    /// Points for one asset; empty when the asset never had an event.
    pub fn for_asset(&self, asset: &Asset) -> &[RunningTotal] {
        self.by_asset.get(asset).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Turns a raw per-asset event stream into running totals.
pub struct CumulativeSeriesBuilder;

impl CumulativeSeriesBuilder {
    /// Accumulate `measure()` per asset in timestamp order.
    ///
    /// Events are grouped by asset and stably sorted by timestamp, so events
    /// sharing a timestamp are summed in input order. Each point's total is
    /// inclusive of its own event. `column` names the measure in overflow errors.
    pub fn build<'a, E, I>(column: &'static str, events: I) -> Result<CumulativeSeries, AggregateError>
    where
        E: SeriesEvent + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut grouped: BTreeMap<Asset, Vec<(Timestamp, Decimal)>> = BTreeMap::new();
        for event in events {
            grouped
                .entry(event.asset().clone())
                .or_default()
                .push((event.timestamp(), event.measure()));
        }

        let mut by_asset = BTreeMap::new();
        for (asset, mut raw) in grouped {
            raw.sort_by_key(|(ts, _)| *ts);
            let mut total = Decimal::zero();
            let mut points = Vec::with_capacity(raw.len());
            for (timestamp, value) in raw {
                total = total
                    .checked_add(value)
                    .ok_or_else(|| AggregateError::Overflow {
                        asset: asset.clone(),
                        timestamp,
                        column,
                    })?;
                points.push(RunningTotal { timestamp, total });
            }
            by_asset.insert(asset, points);
        }

        Ok(CumulativeSeries { by_asset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Trade, Transfer};
    use std::str::FromStr;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn transfer(asset: &str, secs: i64, size: &str) -> Transfer {
        Transfer::new(Asset::new(asset), ts(secs), dec(size))
    }

    #[test]
    fn single_event_yields_own_value() {
        let series = CumulativeSeriesBuilder::build("net_transfers", &[transfer("sETH", 50, "10")]).unwrap();
        let points = series.for_asset(&Asset::new("sETH"));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total, dec("10"));
    }

    #[test]
    fn running_total_can_decrease_with_withdrawals() {
        let events = vec![
            transfer("sETH", 10, "5"),
            transfer("sETH", 20, "-8"),
            transfer("sETH", 30, "1.5"),
        ];
        let series = CumulativeSeriesBuilder::build("net_transfers", &events).unwrap();
        let totals: Vec<String> = series
            .for_asset(&Asset::new("sETH"))
            .iter()
            .map(|p| p.total.to_canonical_string())
            .collect();
        assert_eq!(totals, vec!["5", "-3", "-1.5"]);
    }

    #[test]
    fn unsorted_input_is_accumulated_in_time_order() {
        let events = vec![transfer("sETH", 30, "3"), transfer("sETH", 10, "1")];
        let series = CumulativeSeriesBuilder::build("net_transfers", &events).unwrap();
        let points = series.for_asset(&Asset::new("sETH"));
        assert_eq!(points[0].timestamp, ts(10));
        assert_eq!(points[0].total, dec("1"));
        assert_eq!(points[1].total, dec("4"));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let events = vec![
            transfer("sETH", 10, "1"),
            transfer("sETH", 10, "2"),
            transfer("sETH", 10, "4"),
        ];
        let series = CumulativeSeriesBuilder::build("net_transfers", &events).unwrap();
        let totals: Vec<Decimal> = series
            .for_asset(&Asset::new("sETH"))
            .iter()
            .map(|p| p.total)
            .collect();
        assert_eq!(totals, vec![dec("1"), dec("3"), dec("7")]);
    }

    #[test]
    fn assets_accumulate_independently() {
        let trades = vec![
            Trade::new(Asset::new("sETH"), ts(1), dec("1")),
            Trade::new(Asset::new("sBTC"), ts(2), dec("100")),
            Trade::new(Asset::new("sETH"), ts(3), dec("2")),
        ];
        let series = CumulativeSeriesBuilder::build("fees_paid", &trades).unwrap();
        assert_eq!(series.for_asset(&Asset::new("sETH"))[1].total, dec("3"));
        assert_eq!(series.for_asset(&Asset::new("sBTC"))[0].total, dec("100"));
        assert!(series.for_asset(&Asset::new("sLINK")).is_empty());
    }

    #[test]
    fn empty_input_builds_empty_series() {
        let series = CumulativeSeriesBuilder::build::<Trade, _>("fees_paid", &[]).unwrap();
        assert_eq!(series, CumulativeSeries::default());
    }

    #[test]
    fn overflowing_running_total_is_an_error() {
        let trades = vec![
            Trade::new(Asset::new("sETH"), ts(1), dec("6e28")),
            Trade::new(Asset::new("sETH"), ts(2), dec("6e28")),
        ];
        let err = CumulativeSeriesBuilder::build("fees_paid", &trades).unwrap_err();
        assert_eq!(
            err,
            AggregateError::Overflow {
                asset: Asset::new("sETH"),
                timestamp: ts(2),
                column: "fees_paid",
            }
        );
    }
}
