use perps_pnl::engine::{Aggregator, CumulativeSeriesBuilder};
use perps_pnl::{Asset, DebtSnapshot, Decimal, Timestamp, Trade, Transfer};
use std::str::FromStr;

fn ts(secs: i64) -> Timestamp {
    Timestamp::from_secs(secs).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn trade(asset: &str, secs: i64, fee: &str) -> Trade {
    Trade::new(Asset::new(asset), ts(secs), dec(fee))
}

fn transfer(asset: &str, secs: i64, size: &str) -> Transfer {
    Transfer::new(Asset::new(asset), ts(secs), dec(size))
}

fn debt(asset: &str, secs: i64, market_debt: &str) -> DebtSnapshot {
    DebtSnapshot::new(Asset::new(asset), ts(secs), dec(market_debt))
}

/// Multi-asset fixture with interleaved timestamps, withdrawals and repeated times.
fn fixture() -> (Vec<Trade>, Vec<Transfer>, Vec<DebtSnapshot>) {
    let trades = vec![
        trade("sETH", 100, "1"),
        trade("sBTC", 105, "0.25"),
        trade("sETH", 200, "2"),
        trade("sBTC", 200, "0.75"),
        trade("sETH", 200, "0.5"),
        trade("sLINK", 310, "3"),
    ];
    let transfers = vec![
        transfer("sBTC", 90, "1000"),
        transfer("sETH", 50, "10"),
        transfer("sBTC", 150, "-400"),
        transfer("sETH", 175, "-2.5"),
    ];
    let debt = vec![
        debt("sETH", 250, "25"),
        debt("sBTC", 80, "0"),
        debt("sETH", 150, "20"),
        debt("sBTC", 160, "612"),
        debt("sLINK", 300, "4"),
        debt("sBTC", 400, "650.5"),
    ];
    (trades, transfers, debt)
}

#[test]
fn end_to_end_example() {
    let trades = vec![trade("sETH", 100, "1"), trade("sETH", 200, "2")];
    let transfers = vec![transfer("sETH", 50, "10")];
    let debt = vec![debt("sETH", 150, "20"), debt("sETH", 250, "25")];

    let table = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();
    let rows = table.records();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].asset, Asset::new("sETH"));
    assert_eq!(rows[0].timestamp, ts(150));
    assert_eq!(rows[0].market_debt, dec("20"));
    assert_eq!(rows[0].net_transfers, dec("10"));
    assert_eq!(rows[0].fees_paid, dec("1"));
    assert_eq!(rows[0].net_pnl, dec("9"));
    assert_eq!(rows[0].staker_pnl, dec("-9"));

    assert_eq!(rows[1].timestamp, ts(250));
    assert_eq!(rows[1].market_debt, dec("25"));
    assert_eq!(rows[1].net_transfers, dec("10"));
    assert_eq!(rows[1].fees_paid, dec("3"));
    assert_eq!(rows[1].net_pnl, dec("12"));
    assert_eq!(rows[1].staker_pnl, dec("-12"));
}

#[test]
fn as_of_uses_value_before_not_after() {
    let transfers = vec![transfer("A", 10, "5"), transfer("A", 20, "3")];
    let debt = vec![debt("A", 15, "100")];

    let table = Aggregator::aggregate(&[], &transfers, &debt).unwrap();
    assert_eq!(table.records()[0].net_transfers, dec("5"));
}

#[test]
fn snapshot_before_first_event_defaults_to_zero() {
    let trades = vec![trade("sETH", 100, "1")];
    let transfers = vec![transfer("sETH", 100, "10")];
    let debt = vec![debt("sETH", 99, "7")];

    let table = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();
    let row = &table.records()[0];
    assert_eq!(row.net_transfers, Decimal::zero());
    assert_eq!(row.fees_paid, Decimal::zero());
    assert_eq!(row.net_pnl, dec("7"));
}

#[test]
fn equation_invariant_holds_for_every_record() {
    let (trades, transfers, debt) = fixture();
    let table = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    assert_eq!(table.len(), debt.len());
    for record in table.records() {
        let rebuilt = record
            .net_pnl
            .checked_add(record.net_transfers)
            .and_then(|d| d.checked_add(record.fees_paid));
        assert_eq!(
            rebuilt,
            Some(record.market_debt),
            "equation broken for {:?}",
            record
        );
        assert_eq!(record.staker_pnl, -record.net_pnl);
        assert_eq!(record.date, record.timestamp.to_datetime());
    }
}

#[test]
fn cumulative_fees_are_non_decreasing() {
    let (trades, _, _) = fixture();
    let series = CumulativeSeriesBuilder::build("fees_paid", &trades).unwrap();

    for asset in ["sETH", "sBTC", "sLINK"] {
        let points = series.for_asset(&Asset::new(asset));
        assert!(!points.is_empty());
        for pair in points.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
            assert!(pair[0].total <= pair[1].total, "fees decreased for {}", asset);
        }
    }
}

#[test]
fn joined_fees_are_non_decreasing_per_asset() {
    let (trades, transfers, debt) = fixture();
    let table = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    for asset in table.assets() {
        let rows = table.for_asset(asset).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[0].fees_paid <= pair[1].fees_paid);
        }
    }
}

#[test]
fn fixture_values_are_attributed_per_asset() {
    let (trades, transfers, debt) = fixture();
    let table = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    let summary: Vec<(String, i64, String, String, String)> = table
        .records()
        .iter()
        .map(|r| {
            (
                r.asset.to_string(),
                r.timestamp.as_secs(),
                r.net_transfers.to_canonical_string(),
                r.fees_paid.to_canonical_string(),
                r.net_pnl.to_canonical_string(),
            )
        })
        .collect();

    let expected = vec![
        ("sBTC", 80, "0", "0", "0"),
        ("sBTC", 160, "600", "0.25", "11.75"),
        ("sBTC", 400, "600", "1", "49.5"),
        ("sETH", 150, "10", "1", "9"),
        ("sETH", 250, "7.5", "3.5", "14"),
        ("sLINK", 300, "0", "0", "4"),
    ];
    let expected: Vec<(String, i64, String, String, String)> = expected
        .into_iter()
        .map(|(a, t, n, f, p)| (a.to_string(), t, n.to_string(), f.to_string(), p.to_string()))
        .collect();
    assert_eq!(summary, expected);
}

#[test]
fn assets_are_isolated_under_interleaving() {
    let (trades, transfers, debt) = fixture();
    let full = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    let only_eth = |asset: &Asset| asset.as_str() == "sETH";
    let eth_trades: Vec<Trade> = trades.iter().filter(|t| only_eth(&t.asset)).cloned().collect();
    let eth_transfers: Vec<Transfer> = transfers
        .iter()
        .filter(|t| only_eth(&t.asset))
        .cloned()
        .collect();
    let eth_debt: Vec<DebtSnapshot> = debt.iter().filter(|d| only_eth(&d.asset)).cloned().collect();
    let isolated = Aggregator::aggregate(&eth_trades, &eth_transfers, &eth_debt).unwrap();

    let eth = Asset::new("sETH");
    assert_eq!(full.for_asset(&eth).unwrap(), isolated.records());
}

#[test]
fn recomputation_is_idempotent() {
    let (trades, transfers, debt) = fixture();
    let first = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();
    let second = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_change_output() {
    let (mut trades, mut transfers, mut debt) = fixture();
    let expected = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    trades.sort_by_key(|t| std::cmp::Reverse(t.timestamp));
    transfers.reverse();
    debt.reverse();
    let shuffled = Aggregator::aggregate(&trades, &transfers, &debt).unwrap();

    assert_eq!(expected, shuffled);
}

#[test]
fn output_sorted_and_duplicates_preserved() {
    let debt = vec![
        debt("sETH", 200, "2"),
        debt("sETH", 100, "1"),
        debt("sETH", 200, "3"),
    ];
    let table = Aggregator::aggregate(&[], &[], &debt).unwrap();
    let keys: Vec<(i64, String)> = table
        .records()
        .iter()
        .map(|r| (r.timestamp.as_secs(), r.market_debt.to_canonical_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (100, "1".to_string()),
            (200, "2".to_string()),
            (200, "3".to_string())
        ]
    );
}

#[test]
fn large_timeline_joins_correctly() {
    let trades: Vec<Trade> = (0..5_000).map(|i| trade("sETH", i * 2, "1")).collect();
    let debt: Vec<DebtSnapshot> = (0..5_000).map(|i| debt("sETH", i * 2 + 1, "0")).collect();

    let table = Aggregator::aggregate(&trades, &[], &debt).unwrap();
    for (i, record) in table.records().iter().enumerate() {
        assert_eq!(record.fees_paid, Decimal::from(i as i64 + 1));
    }
}
