//! Sleep-debt accounting.
//!
//! A batch that should sleep a few microseconds per iteration cannot afford
//! a timer call per iteration; the debt accumulator converts per-iteration
//! sleep intents into infrequent coalesced sleeps while preserving the
//! long-run average sleep rate.

use std::time::{Duration, Instant};

/// Accumulated intended-but-deferred sleep time for one batch.
///
/// Debt grows by the descriptor's per-iteration `Sleep` and shrinks by the
/// *measured* elapsed time of every real sleep — not the requested amount.
/// Real sleep primitives overshoot (and occasionally undershoot) what was
/// asked for; subtracting the measurement keeps the accounting exact, so
/// over a batch `accrued == slept + residual` holds to the nanosecond. An
/// overshoot leaves the debt negative and is worked off by later
/// iterations.
#[derive(Debug, Default)]
pub struct SleepDebt {
    debt_nanos: i64,
    sleeps: Vec<Duration>,
}

impl SleepDebt {
    /// An empty accumulator.
    pub fn new() -> Self {
        SleepDebt::default()
    }

    /// Adds one iteration's intended sleep to the debt.
    pub fn accrue(&mut self, nanos: u64) {
        self.debt_nanos = self
            .debt_nanos
            .saturating_add(i64::try_from(nanos).unwrap_or(i64::MAX));
    }

    /// Whether the debt has crossed the coalescing threshold and a real
    /// sleep is warranted.
    pub fn due(&self, interval_nanos: u64) -> bool {
        self.debt_nanos > 0
            && self.debt_nanos >= i64::try_from(interval_nanos).unwrap_or(i64::MAX)
    }

    /// Sleeps off the entire outstanding debt, suspending the current task,
    /// then subtracts the measured elapsed time and records it.
    pub async fn pay(&mut self) {
        if self.debt_nanos <= 0 {
            return;
        }
        let begin = Instant::now();
        tokio::time::sleep(Duration::from_nanos(self.debt_nanos as u64)).await;
        let actual = begin.elapsed();
        self.debt_nanos = self
            .debt_nanos
            .saturating_sub(i64::try_from(actual.as_nanos()).unwrap_or(i64::MAX));
        self.sleeps.push(actual);
    }

    /// Outstanding debt in nanoseconds; negative after an overshoot.
    pub fn residual_nanos(&self) -> i64 {
        self.debt_nanos
    }

    /// Recorded real sleeps so far.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    /// Consumes the accumulator, yielding the recorded real sleeps.
    pub fn into_sleeps(self) -> Vec<Duration> {
        self.sleeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_only_at_threshold() {
        let mut debt = SleepDebt::new();
        debt.accrue(40);
        assert!(!debt.due(100));
        debt.accrue(60);
        assert!(debt.due(100));
        // A zero interval coalesces nothing: any positive debt is due.
        assert!(debt.due(0));
    }

    #[test]
    fn negative_debt_is_never_due() {
        let mut debt = SleepDebt::new();
        debt.debt_nanos = -5_000;
        assert!(!debt.due(0));
        assert!(!debt.due(100));
    }

    #[tokio::test]
    async fn pay_decrements_by_measured_time() {
        let mut debt = SleepDebt::new();
        debt.accrue(2_000_000);
        debt.pay().await;

        let slept = debt.sleeps()[0];
        // Timers overshoot; the measurement, not the request, must be
        // subtracted.
        assert!(slept >= Duration::from_nanos(2_000_000));
        let expected = 2_000_000i64 - i64::try_from(slept.as_nanos()).unwrap();
        assert_eq!(debt.residual_nanos(), expected);
        assert!(debt.residual_nanos() <= 0);
    }

    #[tokio::test]
    async fn accounting_identity_holds_across_rounds() {
        let interval = 1_500_000u64;
        let mut debt = SleepDebt::new();
        let mut accrued = 0i64;

        for _ in 0..10 {
            debt.accrue(400_000);
            accrued += 400_000;
            if debt.due(interval) {
                debt.pay().await;
            }
        }

        let slept: i64 = debt
            .sleeps()
            .iter()
            .map(|s| i64::try_from(s.as_nanos()).unwrap())
            .sum();
        assert_eq!(accrued, slept + debt.residual_nanos());
        // Residual drift stays within one interval of slack.
        assert!(debt.residual_nanos() <= i64::try_from(interval).unwrap());
    }

    #[tokio::test]
    async fn pay_without_debt_is_a_no_op() {
        let mut debt = SleepDebt::new();
        debt.pay().await;
        assert!(debt.sleeps().is_empty());
        assert_eq!(debt.residual_nanos(), 0);
    }
}
