use bigdecimal::{BigDecimal, Zero};

use crate::models::{PerformanceSummary, Position};

/// Roll positions up into portfolio-level totals.
///
/// Money math stays in BigDecimal end to end; sums are exact regardless of
/// position count or fractional quantities. Absent optional fields count as
/// zero contribution, not as errors, so the roll-up is total over any
/// position set. An empty set yields an all-zero summary.
pub fn compute_performance(positions: &[Position]) -> PerformanceSummary {
    let mut total_value = BigDecimal::zero();
    let mut total_cost = BigDecimal::zero();
    let mut total_pnl = BigDecimal::zero();

    for position in positions {
        if let Some(market_value) = &position.market_value {
            total_value += market_value;
        }
        if let Some(average_cost) = &position.average_cost {
            total_cost += average_cost * &position.quantity;
        }
        if let Some(unrealized_pnl) = &position.unrealized_pnl {
            total_pnl += unrealized_pnl;
        }
    }

    let total_return_percent = if total_cost > BigDecimal::zero() {
        &total_pnl / &total_cost * BigDecimal::from(100)
    } else {
        BigDecimal::zero()
    };

    PerformanceSummary {
        total_value,
        total_cost,
        total_pnl,
        total_return_percent,
        num_positions: positions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn position(
        market_value: Option<&str>,
        average_cost: Option<&str>,
        quantity: &str,
        unrealized_pnl: Option<&str>,
    ) -> Position {
        let now = chrono::Utc::now();
        Position {
            id: uuid::Uuid::new_v4(),
            portfolio_id: uuid::Uuid::new_v4(),
            symbol: "TEST".to_string(),
            quantity: BigDecimal::from_str(quantity).unwrap(),
            average_cost: average_cost.map(|v| BigDecimal::from_str(v).unwrap()),
            current_price: None,
            market_value: market_value.map(|v| BigDecimal::from_str(v).unwrap()),
            unrealized_pnl: unrealized_pnl.map(|v| BigDecimal::from_str(v).unwrap()),
            unrealized_pnl_percent: None,
            last_updated: now,
            created_at: now,
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_position_set_yields_all_zero_summary() {
        let summary = compute_performance(&[]);

        assert_eq!(summary.total_value, BigDecimal::zero());
        assert_eq!(summary.total_cost, BigDecimal::zero());
        assert_eq!(summary.total_pnl, BigDecimal::zero());
        assert_eq!(summary.total_return_percent, BigDecimal::zero());
        assert_eq!(summary.num_positions, 0);
    }

    #[test]
    fn two_position_worked_example() {
        let positions = vec![
            position(Some("1000"), Some("10"), "50", Some("500")),
            position(Some("2000"), Some("20"), "40", Some("1200")),
        ];

        let summary = compute_performance(&positions);

        assert_eq!(summary.total_value, dec("3000"));
        assert_eq!(summary.total_cost, dec("1300"));
        assert_eq!(summary.total_pnl, dec("1700"));
        // (1700 / 1300) * 100 = 130.7692...
        assert!(summary.total_return_percent > dec("130.76"));
        assert!(summary.total_return_percent < dec("130.78"));
        assert_eq!(summary.num_positions, 2);
    }

    #[test]
    fn missing_fields_contribute_zero_but_still_count() {
        let positions = vec![
            position(Some("1000"), Some("10"), "50", Some("500")),
            position(None, None, "3", None),
            position(Some("250"), None, "1", None),
        ];

        let summary = compute_performance(&positions);

        assert_eq!(summary.total_value, dec("1250"));
        assert_eq!(summary.total_cost, dec("500"));
        assert_eq!(summary.total_pnl, dec("500"));
        assert_eq!(summary.num_positions, 3);
    }

    #[test]
    fn zero_cost_basis_yields_zero_return_percent() {
        // P&L present but no cost basis anywhere: the division is skipped,
        // not attempted.
        let positions = vec![position(Some("1000"), None, "10", Some("1000"))];

        let summary = compute_performance(&positions);

        assert_eq!(summary.total_pnl, dec("1000"));
        assert_eq!(summary.total_return_percent, BigDecimal::zero());
    }

    #[test]
    fn decimal_sums_are_exact_over_many_fractional_positions() {
        // 50 positions with fractional quantities; f64 accumulation would
        // drift here, decimal must not.
        let positions: Vec<Position> = (0..50)
            .map(|_| position(Some("10.0001"), Some("2.5"), "0.0001", Some("0.0003")))
            .collect();

        let summary = compute_performance(&positions);

        assert_eq!(summary.total_value, dec("500.005"));
        assert_eq!(summary.total_cost, dec("0.0125"));
        assert_eq!(summary.total_pnl, dec("0.015"));
        assert_eq!(summary.num_positions, 50);
    }

    #[test]
    fn negative_pnl_yields_negative_return_percent() {
        let positions = vec![position(Some("900"), Some("10"), "100", Some("-100"))];

        let summary = compute_performance(&positions);

        assert_eq!(summary.total_cost, dec("1000"));
        assert_eq!(summary.total_return_percent, dec("-10"));
    }
}
