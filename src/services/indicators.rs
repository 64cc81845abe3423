/// Simple Moving Average. Aligned with `values`: None until `window`
/// values exist, Some(avg) after.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 >= window {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            } else {
                None
            }
        })
        .collect()
}

/// Exponential Moving Average, seeded with the first value. Early values are
/// hidden until `window` is reached.
pub fn ema(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if values.is_empty() || window == 0 {
        return vec![None; values.len()];
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = values[0];

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            prev = alpha * v + (1.0 - alpha) * prev;
            if i + 1 >= window {
                Some(prev)
            } else {
                None
            }
        })
        .collect()
}

/// Relative Strength Index with Wilder smoothing. None for the first
/// `period` values. Output range is [0, 100].
pub fn rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; prices.len()];
    if prices.len() < 2 || period == 0 || prices.len() <= period {
        return result;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = changes.iter().map(|&c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| (-c).max(0.0)).collect();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let rsi_of = |avg_gain: f64, avg_loss: f64| {
        let rs = if avg_loss == 0.0 { 100.0 } else { avg_gain / avg_loss };
        100.0 - (100.0 / (1.0 + rs))
    };

    result[period] = Some(rsi_of(avg_gain, avg_loss));

    let alpha = 1.0 / period as f64;
    for i in period..changes.len() {
        avg_gain = alpha * gains[i] + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * losses[i] + (1.0 - alpha) * avg_loss;
        result[i + 1] = Some(rsi_of(avg_gain, avg_loss));
    }

    result
}

/// MACD: (macd line, signal line, histogram), each aligned with `prices`.
/// Line = fast EMA - slow EMA; signal = EMA of the line; histogram = line -
/// signal.
pub fn macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let len = prices.len();
    if len == 0 {
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let fast_ema = ema(prices, fast_period);
    let slow_ema = ema(prices, slow_period);

    let macd_line: Vec<Option<f64>> = (0..len)
        .map(|i| match (fast_ema[i], slow_ema[i]) {
            (Some(fast), Some(slow)) => Some(fast - slow),
            _ => None,
        })
        .collect();

    let macd_values: Vec<f64> = macd_line.iter().filter_map(|&v| v).collect();
    let signal_values = ema(&macd_values, signal_period);

    let mut signal_line: Vec<Option<f64>> = vec![None; len];
    let mut next_signal = 0;
    for i in 0..len {
        if macd_line[i].is_some() && next_signal < signal_values.len() {
            signal_line[i] = signal_values[next_signal];
            next_signal += 1;
        }
    }

    let histogram: Vec<Option<f64>> = (0..len)
        .map(|i| match (macd_line[i], signal_line[i]) {
            (Some(line), Some(signal)) => Some(line - signal),
            _ => None,
        })
        .collect();

    (macd_line, signal_line, histogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_respects_warmup_window() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(2.0));
        assert_eq!(result[4], Some(4.0));
    }

    #[test]
    fn sma_zero_window_is_all_none() {
        assert!(sma(&[1.0, 2.0], 0).iter().all(|v| v.is_none()));
    }

    #[test]
    fn ema_aligns_with_input() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = ema(&values, 10);

        assert_eq!(result.len(), values.len());
        assert!(result[..9].iter().all(|v| v.is_none()));
        assert!(result[9..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn rsi_stays_in_range() {
        let prices = vec![
            44.0, 44.5, 44.0, 45.0, 44.5, 45.5, 45.0, 46.0, 46.5, 46.0, 47.0, 46.5, 47.5, 47.0,
            48.0, 48.5,
        ];
        let values = rsi(&prices, 14);

        assert!(values[..14].iter().all(|v| v.is_none()));
        for v in values[14..].iter().flatten() {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn rsi_reads_trends() {
        let uptrend: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        let last = rsi(&uptrend, 14).last().copied().flatten().unwrap();
        assert!(last > 70.0, "steady uptrend should be overbought");

        let downtrend: Vec<f64> = (0..30).map(|i| 80.0 - i as f64).collect();
        let last = rsi(&downtrend, 14).last().copied().flatten().unwrap();
        assert!(last < 30.0, "steady downtrend should be oversold");
    }

    #[test]
    fn rsi_short_series_is_all_none() {
        assert!(rsi(&[100.0, 101.0], 14).iter().all(|v| v.is_none()));
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 0.5).collect();
        let (line, signal, histogram) = macd(&prices, 12, 26, 9);

        assert_eq!(line.len(), prices.len());
        assert_eq!(signal.len(), prices.len());
        assert_eq!(histogram.len(), prices.len());

        let last = line.last().copied().flatten().unwrap();
        assert!(last > 0.0, "uptrend should have positive MACD");
    }
}
