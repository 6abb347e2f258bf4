//! Frequency distribution tables.
//!
//! Turns a list of observations into an ungrouped table (one row per distinct
//! value) or a grouped table of `k` contiguous, half-open classes.
//!
//! ```ignore
//! use edustat::frequency::{build_frequency_table, sort_observations, Technique};
//!
//! let sorted = sort_observations(&[3.0, 1.0, 2.0, 3.0, 1.0, 3.0])?;
//! let rows = build_frequency_table(&sorted, Technique::SimpleInspection)?;
//! assert_eq!(rows.len(), 3);
//! ```
//!
//! Relative and cumulative columns are accumulated in decimal arithmetic, and
//! class membership is decided on exact decimal boundaries.

mod classes;

pub use classes::{ClassPlan, STURGES_FACTOR, class_count, plan_classes};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{checked_add, checked_mul, ratio, to_decimal, to_f64};
use crate::error::{EngineError, EngineResult};

/// How observations are grouped into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technique {
    /// One row per distinct value.
    SimpleInspection,
    /// A caller-chosen number of classes.
    Arbitrary { classes: usize },
    /// Sturges' rule.
    Sturges,
    /// `round(10 · log10(n))` classes.
    MaxInteger,
}

/// One row of a frequency table.
///
/// For grouped tables the class is the half-open interval
/// `[lim_inf, lim_sup)`; for simple inspection both limits equal the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub lim_inf: f64,
    pub lim_sup: f64,
    pub class_mark: f64,
    pub absolute_freq: usize,
    pub relative_freq: f64,
    pub percent_freq: f64,
    pub cumulative_absolute: usize,
    pub cumulative_relative: f64,
    pub cumulative_percent: f64,
}

/// Return an ascending copy of `data`.
pub fn sort_observations(data: &[f64]) -> EngineResult<Vec<f64>> {
    if let Some(index) = data.iter().position(|x| !x.is_finite()) {
        return Err(EngineError::NonFinite {
            index,
            context: "sort_observations".to_string(),
        });
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Build the frequency table of ascending `sorted` observations.
///
/// # Errors
/// * `NonFinite` if an observation is NaN or infinite
/// * `Unsorted` if the observations are not ascending
/// * `InvalidParameter` for `Technique::Arbitrary { classes: 0 }`
///
/// Empty input produces an empty table.
pub fn build_frequency_table(sorted: &[f64], technique: Technique) -> EngineResult<Vec<TableRow>> {
    validate_sorted(sorted)?;
    if sorted.is_empty() {
        return Ok(Vec::new());
    }

    let rows = match technique {
        Technique::SimpleInspection => simple_inspection(sorted)?,
        _ => grouped(sorted, &plan_classes(sorted, technique)?)?,
    };

    debug!(
        n = sorted.len(),
        rows = rows.len(),
        ?technique,
        "built frequency table"
    );
    Ok(rows)
}

pub(crate) fn validate_sorted(sorted: &[f64]) -> EngineResult<()> {
    for (index, value) in sorted.iter().enumerate() {
        if !value.is_finite() {
            return Err(EngineError::NonFinite {
                index,
                context: "frequency table".to_string(),
            });
        }
        if index > 0 && sorted[index - 1] > *value {
            return Err(EngineError::Unsorted { index });
        }
    }
    Ok(())
}

fn simple_inspection(sorted: &[f64]) -> EngineResult<Vec<TableRow>> {
    let mut cumulative = Cumulative::new(sorted.len());
    let mut rows = Vec::new();

    for run in sorted.chunk_by(|a, b| a == b) {
        let value = run[0];
        rows.push(cumulative.row(value, value, value, run.len())?);
    }
    Ok(rows)
}

fn grouped(sorted: &[f64], plan: &ClassPlan) -> EngineResult<Vec<TableRow>> {
    let values = sorted
        .iter()
        .map(|&x| to_decimal(x))
        .collect::<EngineResult<Vec<Decimal>>>()?;

    let mut cumulative = Cumulative::new(sorted.len());
    let mut rows = Vec::with_capacity(plan.classes.min(sorted.len()));
    let mut lim_inf = plan.start;
    let mut index = 0;

    for _ in 0..plan.classes {
        let lim_sup = checked_add(lim_inf, plan.width, "class limit")?;
        let begin = index;
        while index < values.len() && values[index] < lim_sup {
            index += 1;
        }
        let mark = checked_add(lim_inf, lim_sup, "class mark")? / Decimal::TWO;

        rows.push(cumulative.row(
            to_f64(lim_inf)?,
            to_f64(lim_sup)?,
            to_f64(mark)?,
            index - begin,
        )?);
        lim_inf = lim_sup;
    }
    Ok(rows)
}

/// Running totals shared by both table layouts.
struct Cumulative {
    n: usize,
    absolute: usize,
    relative: Decimal,
    percent: Decimal,
}

impl Cumulative {
    fn new(n: usize) -> Self {
        Self {
            n,
            absolute: 0,
            relative: Decimal::ZERO,
            percent: Decimal::ZERO,
        }
    }

    fn row(
        &mut self,
        lim_inf: f64,
        lim_sup: f64,
        class_mark: f64,
        count: usize,
    ) -> EngineResult<TableRow> {
        let relative = ratio(count, self.n)?;
        let percent = checked_mul(relative, Decimal::ONE_HUNDRED, "percent frequency")?;

        self.absolute += count;
        self.relative = checked_add(self.relative, relative, "cumulative relative")?;
        self.percent = checked_add(self.percent, percent, "cumulative percent")?;

        Ok(TableRow {
            lim_inf,
            lim_sup,
            class_mark,
            absolute_freq: count,
            relative_freq: to_f64(relative)?,
            percent_freq: to_f64(percent)?,
            cumulative_absolute: self.absolute,
            cumulative_relative: to_f64(self.relative)?,
            cumulative_percent: to_f64(self.percent)?,
        })
    }
}
