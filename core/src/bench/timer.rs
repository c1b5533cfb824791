//! Scoped throughput timer
//!
//! A [`ScopedTimer`] brackets one measured block. Dropping it computes the
//! elapsed milliseconds minus any excluded setup time and hands the resulting
//! [`Measurement`] to a [`Reporter`].

use std::fmt;

use super::report::Reporter;
use crate::clock::{now_ns, ns_to_ms};

/// Decimal unit prefix chosen from the magnitude of the byte count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPrefix {
    None,
    Kilo,
    Mega,
    Giga,
}

impl UnitPrefix {
    /// Pick the prefix for a count. Tiers are checked from largest down and
    /// the first strict match wins.
    pub fn for_count(count: u64) -> Self {
        if count > 1_000_000_000 {
            UnitPrefix::Giga
        } else if count > 1_000_000 {
            UnitPrefix::Mega
        } else if count > 1_000 {
            UnitPrefix::Kilo
        } else {
            UnitPrefix::None
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            UnitPrefix::None => 1.0,
            UnitPrefix::Kilo => 1_000.0,
            UnitPrefix::Mega => 1_000_000.0,
            UnitPrefix::Giga => 1_000_000_000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPrefix::None => "",
            UnitPrefix::Kilo => "K",
            UnitPrefix::Mega => "M",
            UnitPrefix::Giga => "G",
        }
    }
}

/// Scaled bytes-per-second figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub value: f64,
    pub prefix: UnitPrefix,
}

/// Finished timer record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub label: String,
    pub bytes: u64,
    pub millis: u64,
}

impl Measurement {
    /// `None` when the measured block took less than a millisecond
    pub fn throughput(&self) -> Option<Throughput> {
        if self.millis == 0 {
            return None;
        }

        let prefix = UnitPrefix::for_count(self.bytes);
        let scaled = self.bytes as f64 / prefix.divisor();
        let seconds = self.millis as f64 / 1000.0;

        Some(Throughput {
            value: scaled / seconds,
            prefix,
        })
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.throughput() {
            Some(t) => write!(
                f,
                "Results of {} test: {:.2} {}B/s ({}ms)",
                self.label,
                t.value,
                t.prefix.symbol(),
                self.millis
            ),
            None => write!(
                f,
                "Results of {} test: N/A {}B/s ({}ms)",
                self.label,
                UnitPrefix::for_count(self.bytes).symbol(),
                self.millis
            ),
        }
    }
}

/// Timer whose lifetime is the measured block
pub struct ScopedTimer<'r> {
    label: String,
    count: u64,
    origin_ns: u64,
    mark_ns: u64,
    excluded_ns: u64,
    reporter: &'r dyn Reporter,
}

impl<'r> ScopedTimer<'r> {
    pub fn new(label: impl Into<String>, count: u64, reporter: &'r dyn Reporter) -> Self {
        let now = now_ns();
        Self {
            label: label.into(),
            count,
            origin_ns: now,
            mark_ns: now,
            excluded_ns: 0,
            reporter,
        }
    }

    /// Drop the time since the last mark from the final measurement and
    /// restart the mark. Used to subtract setup done inside the scope.
    pub fn exclude_elapsed(&mut self) {
        let now = now_ns();
        self.excluded_ns += now.saturating_sub(self.mark_ns);
        self.mark_ns = now;
    }

    /// Nanoseconds since the last mark, without finalizing
    pub fn current_ns(&self) -> u64 {
        now_ns().saturating_sub(self.mark_ns)
    }

    pub fn excluded_ms(&self) -> u64 {
        ns_to_ms(self.excluded_ns)
    }

    fn finish(&self) -> Measurement {
        let elapsed_ms = ns_to_ms(now_ns().saturating_sub(self.origin_ns));

        Measurement {
            label: self.label.clone(),
            bytes: self.count,
            millis: elapsed_ms.saturating_sub(ns_to_ms(self.excluded_ns)),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let measurement = self.finish();
        self.reporter.report(&measurement);
    }
}
