use serde::{Serialize, Serializer};

/// Simple moving average aligned to the input.
///
/// Entry `i` is `None` until `window` closes have been seen, then the mean of
/// closes `i + 1 - window ..= i`. A window of 0 yields all `None`.
///
/// The rolling sum is compensated, and a window made of one repeated close
/// yields exactly that close, so flat stretches never drift apart between
/// window sizes.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(closes.len());
    if window == 0 {
        values.resize(closes.len(), None);
        return values;
    }

    let mut sum = CompensatedSum::default();
    let mut equal_run = 0usize;
    for (d, &close) in closes.iter().enumerate() {
        sum.add(close);
        if d >= window {
            sum.add(-closes[d - window]);
        }

        equal_run = if d > 0 && closes[d - 1] == close {
            equal_run + 1
        } else {
            1
        };

        if d + 1 < window {
            values.push(None);
        } else if equal_run >= window {
            values.push(Some(close));
        } else {
            values.push(Some(sum.value() / window as f64));
        }
    }

    values
}

/// Neumaier summation: tracks the low-order bits lost by each addition.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Moving average series over the closes of a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    window: usize,
    values: Vec<Option<f64>>,
}

impl MovingAverage {
    pub fn from_closes(closes: &[f64], window: usize) -> Self {
        Self {
            window,
            values: simple_moving_average(closes, window),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the last bar, absent while the window is not yet filled.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Column header used in exports, e.g. `MA50`.
    pub fn column_name(&self) -> String {
        format!("MA{}", self.window)
    }
}

impl Serialize for MovingAverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_entries_are_absent() {
        let values = simple_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_length_matches_input() {
        let closes: Vec<f64> = (0..10).map(f64::from).collect();
        for window in [1, 5, 10, 20] {
            let values = simple_moving_average(&closes, window);
            assert_eq!(values.len(), closes.len());
            let absent = values.iter().filter(|v| v.is_none()).count();
            assert_eq!(absent, (window - 1).min(closes.len()));
        }
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let closes = [3.5, 1.25, 8.0];
        let values = simple_moving_average(&closes, 1);
        assert_eq!(values, vec![Some(3.5), Some(1.25), Some(8.0)]);
    }

    #[test]
    fn test_zero_window_is_all_absent() {
        assert_eq!(simple_moving_average(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_constant_series_average_is_constant() {
        let ma = MovingAverage::from_closes(&[42.0; 60], 50);
        assert_eq!(ma.latest(), Some(42.0));
        assert_eq!(ma.get(48), None);
        assert_eq!(ma.get(49), Some(42.0));
        assert_eq!(ma.column_name(), "MA50");
    }

    #[test]
    fn test_inexact_constants_average_to_themselves() {
        for c in [0.1, 0.3, 1.1, 19.99] {
            let closes = vec![c; 250];
            for window in [50, 200] {
                let ma = MovingAverage::from_closes(&closes, window);
                assert_eq!(ma.latest(), Some(c), "c={} window={}", c, window);
                assert_eq!(ma.get(window - 1), Some(c));
            }
        }
    }

    #[test]
    fn test_plateau_after_history_is_exact() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 7.3)
            .chain(std::iter::repeat(100.1).take(250))
            .collect();
        assert_eq!(simple_moving_average(&closes, 50).last(), Some(&Some(100.1)));
        assert_eq!(simple_moving_average(&closes, 200).last(), Some(&Some(100.1)));
    }

    #[test]
    fn test_varying_window_mean_stays_accurate() {
        let closes: Vec<f64> = (0..5000).map(|i| 0.1 * (i % 7) as f64 + 1e6).collect();
        let values = simple_moving_average(&closes, 3);
        let last = values.last().copied().flatten().unwrap();
        let expected = closes[4997..].iter().sum::<f64>() / 3.0;
        assert!((last - expected).abs() < 1e-7);
    }

    #[test]
    fn test_latest_absent_when_short() {
        let ma = MovingAverage::from_closes(&[1.0, 2.0], 3);
        assert_eq!(ma.latest(), None);
        assert!(MovingAverage::from_closes(&[], 3).is_empty());
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let ma = MovingAverage::from_closes(&[1.0, 3.0], 2);
        assert_eq!(serde_json::to_string(&ma).unwrap(), "[null,2.0]");
    }
}
