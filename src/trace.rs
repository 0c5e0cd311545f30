//! Injectable verbose-trace sink (spec §9 "Verbose trace" redesign item).
//!
//! The original C source prints diagnostics straight to stdout with ANSI
//! color codes. A library has no business writing to a process-global
//! stream on its own, so the interpreter instead reports through this
//! trait; callers that want the original behavior can plug in
//! [`StdoutTrace`], and everyone else gets a silent [`NullTrace`] or a
//! buffered [`StringTrace`] for tests.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    Supported,
    Partial,
    Ignored,
}

impl TraceStatus {
    fn label(self) -> &'static str {
        match self {
            TraceStatus::Supported => "SUPPORTED",
            TraceStatus::Partial => "PARTIAL SUPPORT",
            TraceStatus::Ignored => "IGNORED",
        }
    }

    fn ansi_color(self) -> &'static str {
        match self {
            TraceStatus::Supported => "\x1B[32m",
            TraceStatus::Partial => "\x1B[33m",
            TraceStatus::Ignored => "\x1B[31m",
        }
    }
}

pub trait TraceSink {
    fn record(&mut self, record_num: usize, function_number: u16, detail: fmt::Arguments, status: TraceStatus);
}

/// Discards every trace line; used when `verbose` is false.
#[derive(Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn record(&mut self, _record_num: usize, _function_number: u16, _detail: fmt::Arguments, _status: TraceStatus) {}
}

/// Writes ANSI-colored, line-based diagnostics to stdout, matching the
/// original library's verbose output.
#[derive(Default)]
pub struct StdoutTrace;

impl TraceSink for StdoutTrace {
    fn record(&mut self, record_num: usize, function_number: u16, detail: fmt::Arguments, status: TraceStatus) {
        println!(
            "{record_num:<4} Record: 0x{function_number:04X} {detail}\n   Status: {}{}\x1B[0m",
            status.ansi_color(),
            status.label(),
        );
    }
}

/// Accumulates trace lines into a `String`, for tests and for callers that
/// want the diagnostics without stdout.
#[derive(Default)]
pub struct StringTrace {
    pub lines: String,
}

impl TraceSink for StringTrace {
    fn record(&mut self, record_num: usize, function_number: u16, detail: fmt::Arguments, status: TraceStatus) {
        use std::fmt::Write as _;
        let _ = writeln!(
            self.lines,
            "{record_num:<4} 0x{function_number:04X} {detail} [{}]",
            status.label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_trace_records_status_label() {
        let mut trace = StringTrace::default();
        trace.record(0, 0x0213, format_args!("LINETO"), TraceStatus::Supported);
        assert!(trace.lines.contains("SUPPORTED"));
        assert!(trace.lines.contains("LINETO"));
    }

    #[test]
    fn null_trace_is_a_no_op() {
        let mut trace = NullTrace;
        trace.record(0, 0, format_args!(""), TraceStatus::Ignored);
    }
}
