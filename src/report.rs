//! Console result lines.

use crate::variant;
use crate::{RunResult, RunSet};
use std::io::{self, Write};

/// Sink for benchmark results, fed by the harness as runs complete.
pub trait Reporter {
   fn run(&mut self, label: &str, result: &RunResult) -> io::Result<()>;
   fn average(&mut self, set: &RunSet) -> io::Result<()>;
   fn usage(&mut self) -> io::Result<()>;
}

/// Writes the classic text format:
///
/// ```text
/// SoftMB 61,234,567 ops/sec
/// SoftMB Average: 60,987,654 ops/sec
/// ```
pub struct ConsoleReporter<W: Write> {
   out: W,
}

impl<W: Write> ConsoleReporter<W> {
   pub fn new(out: W) -> Self {
      Self { out }
   }

   pub fn into_inner(self) -> W {
      self.out
   }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
   fn run(&mut self, label: &str, result: &RunResult) -> io::Result<()> {
      let checksum = result.checksum;
      if !checksum.is_match() {
         writeln!(
            self.out,
            "WARNING: {label} checksum mismatch: expected {}, got {}",
            checksum.expected, checksum.actual
         )?;
      }
      writeln!(self.out, "{label} {} ops/sec", group_thousands(result.ops_per_sec))?;
      self.out.flush()
   }

   fn average(&mut self, set: &RunSet) -> io::Result<()> {
      writeln!(self.out, "{} Average: {} ops/sec", set.label, group_thousands(set.average()))?;
      self.out.flush()
   }

   fn usage(&mut self) -> io::Result<()> {
      variant::write_usage(&mut self.out)?;
      self.out.flush()
   }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
   let digits = n.to_string();
   let mut out = String::with_capacity(digits.len() + digits.len() / 3);
   for (i, ch) in digits.chars().enumerate() {
      if i > 0 && (digits.len() - i) % 3 == 0 {
         out.push(',');
      }
      out.push(ch);
   }
   out
}
