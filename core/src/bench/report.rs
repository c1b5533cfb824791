//! Result sinks for finished measurements

use std::io::Write;

use parking_lot::Mutex;

use super::timer::Measurement;

/// Destination for section headers and result lines
pub trait Reporter: Sync {
    fn section(&self, header: &str);
    fn report(&self, measurement: &Measurement);
}

/// Prints every line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn section(&self, header: &str) {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", header).ok();
    }

    fn report(&self, measurement: &Measurement) {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", measurement).ok();
        out.flush().ok();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Section(String),
    Result(Measurement),
}

/// Keeps everything in memory; used by tests
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<ReportLine>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.lock().clone()
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| match line {
                ReportLine::Result(m) => Some(m.clone()),
                ReportLine::Section(_) => None,
            })
            .collect()
    }

    pub fn sections(&self) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter_map(|line| match line {
                ReportLine::Section(s) => Some(s.clone()),
                ReportLine::Result(_) => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn section(&self, header: &str) {
        self.lines.lock().push(ReportLine::Section(header.to_string()));
    }

    fn report(&self, measurement: &Measurement) {
        self.lines.lock().push(ReportLine::Result(measurement.clone()));
    }
}
