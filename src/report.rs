//! Delimited run report.
//!
//! A [`RunReport`] is `;`-separated text with four parts:
//!
//! 1. a header row of parameter names,
//! 2. the matching row of parameter values (elapsed seconds first when the
//!    report is built from a [`GaResult`]),
//! 3. a `last_generation` marker row,
//! 4. an `evaluation;<column names>` header followed by one row per
//!    candidate of the final generation: its fitness, then one `0`/`1` per
//!    column.
//!
//! Floating-point values use `.` or `,` as decimal separator depending on
//! the report's [`DecimalSeparator`].

use crate::error::ReportError;
use crate::features::SubsetBounds;
use crate::ga::{Direction, GaConfig, GaResult, GenerationView};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Field delimiter of the report.
pub const DELIMITER: u8 = b';';

/// Decimal separator used for floating-point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecimalSeparator {
    #[default]
    Dot,
    Comma,
}

impl DecimalSeparator {
    /// Formats `v` with six decimals.
    pub fn format(self, v: f64) -> String {
        let s = format!("{v:.6}");
        match self {
            DecimalSeparator::Dot => s,
            DecimalSeparator::Comma => s.replace('.', ","),
        }
    }
}

/// A parameter value in the report header.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    fn render(&self, sep: DecimalSeparator) -> String {
        match self {
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => sep.format(*v),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Builder and writer for the run report.
///
/// ```
/// use u_featsel::report::{DecimalSeparator, RunReport};
///
/// let report = RunReport::new(vec!["gold".into(), "kills".into()])
///     .with_decimal_separator(DecimalSeparator::Comma)
///     .parameter("k", 10usize)
///     .candidate(0.5, vec![true, false]);
///
/// let mut out = Vec::new();
/// report.write(&mut out).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "k\n10\nlast_generation\nevaluation;gold;kills\n0,500000;1;0\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    columns: Vec<String>,
    parameters: Vec<(String, ParamValue)>,
    rows: Vec<(f64, Vec<bool>)>,
    decimal: DecimalSeparator,
}

impl RunReport {
    /// Empty report over the given feature columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            parameters: Vec::new(),
            rows: Vec::new(),
            decimal: DecimalSeparator::Dot,
        }
    }

    /// Report of a finished run: elapsed seconds, the GA parameters, whether
    /// the budget was exhausted, and the final generation.
    pub fn from_result(columns: Vec<String>, config: &GaConfig, result: &GaResult) -> Self {
        Self::new(columns)
            .parameter("elapstime", result.elapsed.as_secs_f64())
            .with_config(config)
            .parameter("max_gen_reached", result.exhausted_budget())
            .candidates(
                result
                    .last_generation
                    .iter()
                    .map(|c| (c.fitness(), c.genes().to_vec())),
            )
    }

    pub fn with_decimal_separator(mut self, decimal: DecimalSeparator) -> Self {
        self.decimal = decimal;
        self
    }

    /// Appends one named parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Appends the GA parameters of `config`.
    pub fn with_config(self, config: &GaConfig) -> Self {
        let report = self
            .parameter("ngen", config.generations)
            .parameter("pop", config.population_size)
            .parameter("cxpb", config.crossover_probability)
            .parameter("mincxpb", config.min_crossover_probability)
            .parameter("mutpb", config.mutation_probability)
            .parameter("elitism", config.elitism)
            .parameter("max_no_improv", config.max_no_improvement)
            .parameter("divfac", config.diversification_factor)
            .parameter("divstep", config.diversification_step)
            .parameter("tournpct", config.tournament_percent)
            .parameter(
                "direction",
                match config.direction {
                    Direction::Maximize => "max",
                    Direction::Minimize => "min",
                },
            );
        match config.seed {
            Some(seed) => report.parameter("seed", seed),
            None => report,
        }
    }

    /// Appends the subset-size bounds of a feature-selection run.
    pub fn with_bounds(self, bounds: SubsetBounds) -> Self {
        self.parameter("min_size", bounds.min_size())
            .parameter("max_size", bounds.max_size())
    }

    /// Appends one candidate row.
    pub fn candidate(mut self, fitness: f64, genes: Vec<bool>) -> Self {
        self.rows.push((fitness, genes));
        self
    }

    /// Appends candidate rows.
    pub fn candidates<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (f64, Vec<bool>)>,
    {
        self.rows.extend(rows);
        self
    }

    /// Appends every candidate of a generation, in view order.
    pub fn generation(self, view: GenerationView<'_>) -> Self {
        self.candidates(view.into_iter().map(|(f, g)| (f, g.to_vec())))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn parameters(&self) -> &[(String, ParamValue)] {
        &self.parameters
    }

    pub fn rows(&self) -> &[(f64, Vec<bool>)] {
        &self.rows
    }

    /// Writes the report.
    ///
    /// Fails with [`ReportError::RowWidth`] if a candidate's genotype does
    /// not have one gene per column.
    pub fn write<W: io::Write>(&self, writer: W) -> Result<(), ReportError> {
        if let Some((row, (_, genes))) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, (_, g))| g.len() != self.columns.len())
        {
            return Err(ReportError::RowWidth {
                row,
                expected: self.columns.len(),
                actual: genes.len(),
            });
        }

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .flexible(true)
            .from_writer(writer);

        if !self.parameters.is_empty() {
            wtr.write_record(self.parameters.iter().map(|(name, _)| name.as_str()))?;
            wtr.write_record(self.parameters.iter().map(|(_, v)| v.render(self.decimal)))?;
        }

        wtr.write_record(["last_generation"])?;
        wtr.write_record(
            std::iter::once("evaluation").chain(self.columns.iter().map(String::as_str)),
        )?;
        for (fitness, genes) in &self.rows {
            wtr.write_record(
                std::iter::once(self.decimal.format(*fitness)).chain(
                    genes
                        .iter()
                        .map(|&g| if g { "1".to_owned() } else { "0".to_owned() }),
                ),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the report to a file, replacing it if it exists.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let file = File::create(path.as_ref())?;
        self.write(io::BufWriter::new(file))?;
        log::info!("report written to {}", path.as_ref().display());
        Ok(())
    }
}

/// Human-readable elapsed time: `[Nd ]HHhMMmSS.Ts`.
///
/// `T` is the tenths of a second (truncated). Days are only shown when
/// non-zero.
///
/// ```
/// use std::time::Duration;
/// use u_featsel::report::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(3_723_450)), "01h02m03.4s");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    FormattedElapsed(elapsed).to_string()
}

struct FormattedElapsed(Duration);

impl fmt::Display for FormattedElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let tenths = self.0.subsec_millis() / 100;
        let seconds = total % 60;
        let minutes = (total / 60) % 60;
        let hours = (total / 3600) % 24;
        let days = total / 86_400;
        if days > 0 {
            write!(f, "{days}d ")?;
        }
        write!(f, "{hours:02}h{minutes:02}m{seconds:02}.{tenths}s")
    }
}
