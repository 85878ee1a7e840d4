//! Interactive benchmark session: run, print, and the R/C/S/Q menu.
//!
//! Generic over the input and output streams so the menu can be driven from
//! tests as well as from a terminal.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use cipher_bench::{report, Runner, VariantSpec};
use common::{BenchmarkConfig, BenchmarkReport};
use tracing::{debug, info};

use crate::config::ReportFormat;

/// Parameters of the throwaway pass that absorbs one-time setup costs.
const WARMUP: BenchmarkConfig = BenchmarkConfig {
    payload_size: 10,
    aad_size: 0,
    iterations: 1,
};

/// Choice read from the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Rerun,
    Change,
    Sweep,
    Quit,
    Unknown,
}

impl MenuChoice {
    /// First non-blank character decides; an empty line reruns.
    fn parse(line: &str) -> Self {
        match line.chars().find(|c| !c.is_whitespace()) {
            None => MenuChoice::Rerun,
            Some(c) => match c.to_ascii_lowercase() {
                'r' => MenuChoice::Rerun,
                'c' => MenuChoice::Change,
                's' => MenuChoice::Sweep,
                'q' => MenuChoice::Quit,
                _ => MenuChoice::Unknown,
            },
        }
    }
}

pub struct Session<R, W> {
    runner: Runner,
    specs: Vec<VariantSpec>,
    sweep: VariantSpec,
    params: BenchmarkConfig,
    format: ReportFormat,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        runner: Runner,
        specs: Vec<VariantSpec>,
        sweep: VariantSpec,
        params: BenchmarkConfig,
        format: ReportFormat,
        input: R,
        output: W,
    ) -> Self {
        Self {
            runner,
            specs,
            sweep,
            params,
            format,
            input,
            output,
        }
    }

    /// Run the suite once at minimal size and discard the results.
    pub fn warm_up(&mut self) {
        info!("performing warm-up run");
        let report = self.runner.run_suite(&self.specs, &WARMUP);
        debug!(failures = report.has_failures(), "warm-up finished");
    }

    /// Run the configured suite and print its report.
    pub fn print_suite(&mut self) -> Result<BenchmarkReport> {
        let report = self.runner.run_suite(&self.specs, &self.params);
        self.emit(&report)?;
        Ok(report)
    }

    /// Run the size sweep and print its report.
    pub fn print_sweep(&mut self) -> Result<BenchmarkReport> {
        let report = self.runner.run_sweep(&self.sweep, &self.params);
        self.emit(&report)?;
        Ok(report)
    }

    /// Print one suite report, then serve the menu until `Q` or end of input.
    pub fn run_interactive(&mut self) -> Result<()> {
        self.print_suite()?;
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            match MenuChoice::parse(&line) {
                MenuChoice::Rerun => {
                    self.print_suite()?;
                }
                MenuChoice::Change => {
                    if !self.change_params()? {
                        return Ok(());
                    }
                }
                MenuChoice::Sweep => {
                    self.print_sweep()?;
                }
                MenuChoice::Quit => return Ok(()),
                MenuChoice::Unknown => writeln!(self.output, "Unknown input")?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let p = self.params;
        writeln!(self.output, "R - Rerun tests")?;
        writeln!(
            self.output,
            "C - Change size({}), AAD({}) and iterations({})",
            p.payload_size, p.aad_size, p.iterations
        )?;
        writeln!(self.output, "S - Size sweep ({})", self.sweep)?;
        writeln!(self.output, "Q - Quit")?;
        self.output.flush()?;
        Ok(())
    }

    /// Prompt for new parameters. Returns `false` if input ended first.
    fn change_params(&mut self) -> Result<bool> {
        let p = self.params;
        let prompt = format!("Size is {}. Enter new size:", p.payload_size);
        let Some(payload_size) = self.prompt_number(&prompt)? else {
            return Ok(false);
        };
        let prompt = format!("AAD size is {}. Enter new AAD size:", p.aad_size);
        let Some(aad_size) = self.prompt_number(&prompt)? else {
            return Ok(false);
        };
        let prompt = format!("Iterations are {}. Enter new iteration:", p.iterations);
        let Some(iterations) = self.prompt_number(&prompt)? else {
            return Ok(false);
        };

        self.params = BenchmarkConfig {
            payload_size,
            aad_size,
            iterations,
        };
        info!(payload_size, aad_size, iterations, "benchmark parameters changed");
        Ok(true)
    }

    /// Ask until a number is entered; `None` on end of input.
    fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Enter only a number")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        Ok((n > 0).then_some(line))
    }

    fn emit(&mut self, report: &BenchmarkReport) -> Result<()> {
        match self.format {
            ReportFormat::Table => writeln!(self.output, "{}", report::render_report(report))?,
            ReportFormat::Json => {
                let json = report::render_json(report).context("failed to serialise report")?;
                writeln!(self.output, "{json}")?;
            }
        }
        self.output.flush()?;
        Ok(())
    }
}
