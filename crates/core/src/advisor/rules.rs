//! Threshold rules. Pure functions of their inputs.

use super::advisor_model::{AdvisorInput, AdvisorReport, AdvisorThresholds, Signal, SignalBucket};

fn signal(input: &AdvisorInput, bucket: SignalBucket, message: String) -> Signal {
    Signal {
        symbol: input.symbol.clone(),
        bucket,
        message,
    }
}

fn pct(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{:+.2}%", v))
}

fn position(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{:.0}%", v * 100.0))
}

/// All signals raised for one ticker.
///
/// A held ticker that raises neither a buy nor a sell signal gets a hold signal.
/// Missing inputs make the rules that need them false.
pub fn evaluate(input: &AdvisorInput, th: &AdvisorThresholds) -> Vec<Signal> {
    let mut signals = Vec::new();
    let dp = input.change_percent;
    let day_pos = input.day_position;
    let week52_pos = input.week52_position;

    if input.is_held() {
        let gain = input.unrealized_pct();
        let above = |v: Option<f64>, t: f64| v.is_some_and(|v| v > t);
        let below = |v: Option<f64>, t: f64| v.is_some_and(|v| v < t);

        let trim = above(gain, th.trim_gain_pct)
            && (below(dp, th.trim_day_change_pct) || above(week52_pos, th.trim_week52_position));
        let add = below(gain, th.add_loss_pct)
            && below(week52_pos, th.add_week52_position)
            && above(dp, th.add_min_day_change_pct);

        if trim {
            signals.push(signal(
                input,
                SignalBucket::Sell,
                format!(
                    "Consider trimming: {} vs cost, day {}, 52w position {}",
                    pct(gain),
                    pct(dp),
                    position(week52_pos)
                ),
            ));
        }
        if add {
            signals.push(signal(
                input,
                SignalBucket::Buy,
                format!(
                    "Consider adding: {} vs cost near the 52w low ({}), day {}",
                    pct(gain),
                    position(week52_pos),
                    pct(dp)
                ),
            ));
        }
        if !trim && !add {
            signals.push(signal(
                input,
                SignalBucket::Hold,
                format!("Hold: {} vs cost, day {}", pct(gain), pct(dp)),
            ));
        }
    }

    if dp.is_some_and(|v| v >= th.momentum_change_pct)
        && day_pos.is_some_and(|v| v >= th.momentum_day_position)
    {
        signals.push(signal(
            input,
            SignalBucket::Momentum,
            format!("Strong day: {} trading near the high ({})", pct(dp), position(day_pos)),
        ));
    }

    if dp.is_some_and(|v| v >= th.breakout_change_pct)
        && week52_pos.is_some_and(|v| v >= th.breakout_week52_position)
    {
        signals.push(signal(
            input,
            SignalBucket::Breakout,
            format!("Pressing the 52w high ({}), day {}", position(week52_pos), pct(dp)),
        ));
    }

    signals
}

/// Runs [`evaluate`] over every input and buckets the results.
pub fn advise<'a, I>(inputs: I, th: &AdvisorThresholds) -> AdvisorReport
where
    I: IntoIterator<Item = &'a AdvisorInput>,
{
    let mut report = AdvisorReport::default();
    for input in inputs {
        for s in evaluate(input, th) {
            report.push(s);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(price: f64, avg: f64, dp: f64, day: f64, w52: f64) -> AdvisorInput {
        AdvisorInput {
            symbol: "TEST".to_string(),
            price: Some(price),
            change_percent: Some(dp),
            day_position: Some(day),
            week52_position: Some(w52),
            quantity: Some(10.0),
            average_cost: Some(avg),
        }
    }

    fn buckets(input: &AdvisorInput) -> Vec<SignalBucket> {
        evaluate(input, &AdvisorThresholds::default())
            .into_iter()
            .map(|s| s.bucket)
            .collect()
    }

    #[test]
    fn test_bucket_table() {
        use SignalBucket::*;
        let cases = [
            // gain +20%, red day -> trim
            (held(120.0, 100.0, -0.5, 0.3, 0.5), vec![Sell]),
            // gain +20%, near 52w high -> trim
            (held(120.0, 100.0, 0.1, 0.5, 0.95), vec![Sell]),
            // gain +20% but flat day mid-range -> hold
            (held(120.0, 100.0, 0.0, 0.5, 0.5), vec![Hold]),
            // gain +11% stays under the bar even on a red day
            (held(111.0, 100.0, -1.0, 0.5, 0.5), vec![Hold]),
            // loss -10%, low in range, calm day -> add
            (held(90.0, 100.0, 0.0, 0.5, 0.1), vec![Buy]),
            // loss -10% but falling hard -> hold
            (held(90.0, 100.0, -0.5, 0.5, 0.1), vec![Hold]),
            // loss -10% but mid-range -> hold
            (held(90.0, 100.0, 0.0, 0.5, 0.5), vec![Hold]),
            // strong day near the highs on both bars -> hold + momentum + breakout
            (held(101.0, 100.0, 2.5, 0.9, 0.99), vec![Hold, Momentum, Breakout]),
            // +30%, near highs, up big -> sell + momentum + breakout
            (held(130.0, 100.0, 2.0, 0.8, 0.98), vec![Sell, Momentum, Breakout]),
        ];
        for (input, expected) in cases {
            assert_eq!(buckets(&input), expected, "{input:?}");
        }
    }

    #[test]
    fn test_unheld_tickers_only_get_market_signals() {
        let mut input = held(130.0, 100.0, 2.2, 0.85, 0.5);
        input.quantity = None;
        assert_eq!(buckets(&input), vec![SignalBucket::Momentum]);

        input.change_percent = Some(0.0);
        assert!(buckets(&input).is_empty());
    }

    #[test]
    fn test_missing_data_disables_rules() {
        let input = AdvisorInput {
            symbol: "NEW".to_string(),
            quantity: Some(5.0),
            average_cost: Some(100.0),
            ..AdvisorInput::default()
        };
        assert_eq!(buckets(&input), vec![SignalBucket::Hold]);
    }

    #[test]
    fn test_thresholds_are_injected() {
        let input = held(105.0, 100.0, -1.0, 0.5, 0.5);
        assert_eq!(buckets(&input), vec![SignalBucket::Hold]);

        let loose = AdvisorThresholds {
            trim_gain_pct: 4.0,
            ..AdvisorThresholds::default()
        };
        let got: Vec<_> = evaluate(&input, &loose).into_iter().map(|s| s.bucket).collect();
        assert_eq!(got, vec![SignalBucket::Sell]);
    }

    #[test]
    fn test_advise_groups_by_bucket() {
        let mut a = held(120.0, 100.0, -0.5, 0.3, 0.5);
        a.symbol = "AAA".to_string();
        let mut b = held(90.0, 100.0, 0.0, 0.5, 0.1);
        b.symbol = "BBB".to_string();
        let report = advise([&a, &b], &AdvisorThresholds::default());

        assert_eq!(report.sell.len(), 1);
        assert_eq!(report.sell[0].symbol, "AAA");
        assert!(report.sell[0].message.contains("+20.00%"));
        assert_eq!(report.buy[0].symbol, "BBB");
        assert!(report.hold.is_empty());
        assert!(!report.is_empty());
    }
}
