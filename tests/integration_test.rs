//! Integration tests across the domain pipeline.
//!
//! Tests cover:
//! - Allocation decisions on explicit momentum inputs (growth and defensive)
//! - The decide pipeline from a DataPort through the snapshot
//! - Returns and indicators pipelines
//! - Error propagation for missing and failing tickers

mod common;

use approx::assert_relative_eq;
use common::*;
use dualmomentum::cli::{decide_pipeline, indicators_pipeline, returns_pipeline};
use dualmomentum::domain::allocation::{decide_allocation, AllocationMode, AllocationRequest};
use dualmomentum::domain::error::DualMomentumError;
use dualmomentum::domain::indicator::{calculate_macd, IndicatorValue};
use dualmomentum::domain::returns::{build_unified_timeline, Coverage, Granularity};
use dualmomentum::domain::snapshot::Lookbacks;

mod allocation_decisions {
    use super::*;

    #[test]
    fn growth_picks_strongest_equity() {
        let request = AllocationRequest {
            anchor: momentum("A", 0.10, 50.0),
            equities: vec![
                momentum("A", 0.10, 50.0),
                momentum("B", 0.25, 40.0),
                momentum("C", 0.05, 20.0),
            ],
            bonds: vec![],
            investment: Some(1000.0),
        };

        let decision = decide_allocation(&request).unwrap();

        assert_eq!(decision.mode, AllocationMode::Growth);
        assert_eq!(decision.tickers(), vec!["B"]);
        assert_eq!(decision.selections[0].shares, 25);
        assert_relative_eq!(decision.selections[0].invested, 1000.0);
        assert_relative_eq!(decision.cash_remainder.unwrap(), 0.0);
    }

    #[test]
    fn defensive_splits_across_top_three_bonds() {
        let request = AllocationRequest {
            anchor: momentum("A", -0.02, 50.0),
            equities: vec![momentum("B", 0.30, 40.0)],
            bonds: vec![
                momentum("X", 0.03, 70.0),
                momentum("Y", 0.07, 45.0),
                momentum("Z", -0.01, 90.0),
                momentum("W", 0.05, 110.0),
            ],
            investment: Some(900.0),
        };

        let decision = decide_allocation(&request).unwrap();

        assert_eq!(decision.mode, AllocationMode::Defensive);
        assert_eq!(decision.tickers(), vec!["Y", "W", "X"]);
        for s in &decision.selections {
            assert_relative_eq!(s.allocated, 300.0);
        }
        let leftovers: f64 = decision.selections.iter().map(|s| s.leftover()).sum();
        assert_relative_eq!(decision.cash_remainder.unwrap(), leftovers);
        assert_relative_eq!(
            decision.total_invested() + decision.cash_remainder.unwrap(),
            900.0
        );
    }

    #[test]
    fn flat_anchor_is_defensive() {
        let request = AllocationRequest {
            anchor: momentum("A", 0.0, 50.0),
            equities: vec![],
            bonds: vec![
                momentum("X", 0.01, 10.0),
                momentum("Y", 0.02, 10.0),
                momentum("Z", 0.03, 10.0),
            ],
            investment: None,
        };

        let decision = decide_allocation(&request).unwrap();
        assert_eq!(decision.mode, AllocationMode::Defensive);
        assert_eq!(decision.tickers(), vec!["Z", "Y", "X"]);
        assert!(decision.cash_remainder.is_none());
    }
}

mod decide_pipeline_tests {
    use super::*;

    #[test]
    fn growth_from_price_series() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        );
        let settings = test_settings(test_basket());

        let decision = decide_pipeline(&port, &settings, Some(1000.0)).unwrap();

        assert_eq!(decision.mode, AllocationMode::Growth);
        assert_relative_eq!(decision.anchor_return, 0.1, epsilon = 1e-12);
        assert_eq!(decision.tickers(), vec!["B"]);
        assert_eq!(decision.selections[0].shares, 25);
        assert_relative_eq!(decision.cash_remainder.unwrap(), 0.0);
    }

    #[test]
    fn defensive_from_price_series() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[50.0, 49.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        );
        let settings = test_settings(test_basket());

        let decision = decide_pipeline(&port, &settings, Some(900.0)).unwrap();

        assert_eq!(decision.mode, AllocationMode::Defensive);
        assert_eq!(decision.tickers(), vec!["Y", "W", "X"]);
        let shares: Vec<u64> = decision.selections.iter().map(|s| s.shares).collect();
        assert_eq!(shares, vec![2, 2, 2]);
        assert_relative_eq!(decision.total_invested(), 630.0);
        assert_relative_eq!(decision.cash_remainder.unwrap(), 270.0);
    }

    #[test]
    fn configured_investment_is_used_without_override() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        );
        let mut settings = test_settings(test_basket());
        settings.investment = Some(400.0);

        let decision = decide_pipeline(&port, &settings, None).unwrap();
        assert_eq!(decision.investment, Some(400.0));
        assert_eq!(decision.selections[0].shares, 10);

        let overridden = decide_pipeline(&port, &settings, Some(80.0)).unwrap();
        assert_eq!(overridden.selections[0].shares, 2);
    }

    #[test]
    fn trailing_window_limits_history() {
        // Down over the full history, up over the last two observations.
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[100.0, 50.0, 55.0])
                .with_prices("B", &[10.0, 10.0, 10.0])
                .with_prices("C", &[10.0, 10.0, 10.0]),
        );
        let mut settings = test_settings(test_basket());

        let full = decide_pipeline(&port, &settings, None).unwrap();
        assert_eq!(full.mode, AllocationMode::Defensive);

        settings.lookbacks = Lookbacks { equity: 2, bond: 2 };
        let recent = decide_pipeline(&port, &settings, None).unwrap();
        assert_eq!(recent.mode, AllocationMode::Growth);
        assert_eq!(recent.tickers(), vec!["A"]);
    }

    #[test]
    fn date_range_filters_series() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[100.0, 50.0, 55.0])
                .with_prices("B", &[10.0, 10.0, 10.0])
                .with_prices("C", &[10.0, 10.0, 10.0]),
        );
        let mut settings = test_settings(test_basket());
        settings.start_date = date("2024-01-02");

        // Bonds only have 2024-01-01..02, so they keep a single point.
        let decision = decide_pipeline(&port, &settings, None).unwrap();
        assert_eq!(decision.mode, AllocationMode::Growth);
        assert_relative_eq!(decision.anchor_return, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn missing_ticker_fails_fast() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[32.0, 40.0]),
        );
        let settings = test_settings(test_basket());

        let result = decide_pipeline(&port, &settings, None);
        assert!(matches!(result, Err(DualMomentumError::MissingData { ticker }) if ticker == "C"));
    }

    #[test]
    fn empty_series_is_missing_data() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[])
                .with_prices("C", &[20.0, 21.0]),
        );
        let settings = test_settings(test_basket());

        let result = decide_pipeline(&port, &settings, None);
        assert!(matches!(result, Err(DualMomentumError::MissingData { ticker }) if ticker == "B"));
    }

    #[test]
    fn data_errors_propagate() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        )
        .with_error("Z", "disk on fire");
        let settings = test_settings(test_basket());

        let result = decide_pipeline(&port, &settings, None);
        assert!(
            matches!(result, Err(DualMomentumError::Data { reason }) if reason == "disk on fire")
        );
    }

    #[test]
    fn negative_investment_is_rejected() {
        let port = with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        );
        let settings = test_settings(test_basket());

        let result = decide_pipeline(&port, &settings, Some(-1.0));
        assert!(matches!(result, Err(DualMomentumError::InvalidInput { .. })));
    }
}

mod returns_pipeline_tests {
    use super::*;

    fn port() -> MockDataPort {
        with_test_bonds(
            MockDataPort::new()
                .with_prices("A", &[40.0, 44.0, 48.0])
                .with_prices("B", &[32.0, 40.0])
                .with_prices("C", &[20.0, 21.0]),
        )
    }

    #[test]
    fn one_series_per_basket_ticker() {
        let settings = test_settings(test_basket());
        let series = returns_pipeline(&port(), &settings, Granularity::Daily, None).unwrap();

        let tickers: Vec<&str> = series.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["A", "B", "C", "X", "Y", "Z", "W"]);
        for s in &series {
            assert_eq!(s.points[0].value, 0.0);
        }
        assert_relative_eq!(series[0].latest().unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn trailing_window_marks_degraded_coverage() {
        let settings = test_settings(test_basket());
        let series = returns_pipeline(&port(), &settings, Granularity::Daily, Some(3)).unwrap();

        assert_eq!(series[0].coverage, Coverage::Full);
        assert_eq!(
            series[1].coverage,
            Coverage::Degraded {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn weekly_series_share_a_timeline() {
        let settings = test_settings(test_basket());
        let series = returns_pipeline(&port(), &settings, Granularity::Weekly, None).unwrap();

        // 2024-01-01..03 all fall in the week ending Sunday 2024-01-07.
        assert_eq!(build_unified_timeline(&series), vec![date("2024-01-07")]);
    }
}

mod indicators_pipeline_tests {
    use super::*;

    #[test]
    fn any_ticker_in_the_source_is_accepted() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 4) as f64).collect();
        let port = MockDataPort::new().with_prices("GLD", &prices);
        let settings = test_settings(test_basket());

        let set = indicators_pipeline(&port, &settings, " gld ").unwrap();

        assert_eq!(set.ticker, "GLD");
        assert_eq!(set.len(), 30);
        assert!(set.macd_oscillator.iter().all(Option::is_some));
        assert_eq!(set.rsi.iter().filter(|r| r.is_none()).count(), 13);
    }

    #[test]
    fn oscillator_matches_macd_series() {
        let prices = [100.0, 102.0, 101.0, 105.0, 107.0, 103.0, 110.0];
        let port = MockDataPort::new().with_prices("A", &prices);
        let mut settings = test_settings(test_basket());
        settings.indicator_params.macd_fast = 3;
        settings.indicator_params.macd_slow = 5;
        settings.indicator_params.macd_signal = 2;

        let set = indicators_pipeline(&port, &settings, "A").unwrap();
        let macd = calculate_macd(&series("A", &prices), 3, 5, 2);

        for (osc, point) in set.macd_oscillator.iter().zip(&macd.values) {
            match point.value {
                Some(IndicatorValue::Macd { oscillator, .. }) => {
                    assert_eq!(*osc, Some(oscillator))
                }
                ref other => panic!("expected MACD value, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_ticker_is_missing_data() {
        let port = MockDataPort::new();
        let settings = test_settings(test_basket());

        let result = indicators_pipeline(&port, &settings, "NOPE");
        assert!(matches!(result, Err(DualMomentumError::MissingData { .. })));
    }
}
