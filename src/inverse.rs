use log::debug;
use serde::{Serialize, Deserialize};
use crate::index::SortOrder;
use crate::lookup_table::{Column, CosmoTable, Error};




/**
 * Settings for inverting a tabulated relation by bisection
 */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bisection {

    /// Relative error in the range value at which the search stops
    pub tolerance: f64,

    /// Iterations allowed before giving up
    pub max_iterations: usize,
}




// ============================================================================
impl Default for Bisection {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 100,
        }
    }
}

impl Bisection {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            anyhow::bail!("inversion tolerance must be in (0.0, 1.0)")
        }
        if self.max_iterations == 0 {
            anyhow::bail!("inversion max_iterations must be > 0")
        }
        Ok(())
    }
}




/**
 * Return the value of `domain` at which `range` equals `target`, by bisection
 * on the logarithm of `domain` between its first and last tabulated values.
 * Each trial point is mapped to `range` with [`CosmoTable::interpolate`].
 *
 * Both columns must be strictly monotonic. The target must lie within the
 * tabulated values of `range`, and the search stops once the relative error
 * in `range` falls below the tolerance. A `Convergence` error is returned if
 * that does not happen within the allowed number of iterations.
 */
pub fn invert(table: &CosmoTable, domain: Column, range: Column, target: f64, bisection: &Bisection) -> Result<f64, Error> {
    table.order(domain).ok_or(Error::NonMonotonicColumn(domain))?;
    let range_order = table.order(range).ok_or(Error::NonMonotonicColumn(range))?;

    let (first, last) = table.span(range);
    let (lower, upper) = if first < last { (first, last) } else { (last, first) };

    if target == 0.0 || !(lower <= target && target <= upper) {
        return Err(Error::OutOfDomain { column: range, x: target, first, last })
    }

    // the search runs from the first row toward the last
    let increasing = range_order == SortOrder::Ascending;
    let (domain_first, domain_last) = table.span(domain);
    let (domain_lower, domain_upper) = if domain_first < domain_last { (domain_first, domain_last) } else { (domain_last, domain_first) };
    let mut log_min = domain_first.ln();
    let mut log_max = domain_last.ln();

    for iteration in 0..bisection.max_iterations {
        let log_mid = 0.5 * (log_min + log_max);

        // exp(ln(x)) may round to just outside the tabulated domain
        let trial = log_mid.exp().max(domain_lower).min(domain_upper);
        let sample = if trial == domain_last {
            last
        } else {
            table.interpolate(domain, range, trial)?
        };

        if ((target - sample) / target).abs() < bisection.tolerance {
            debug!("inverted {:?} = {:e} after {} iterations", range, target, iteration + 1);
            return Ok(trial)
        }
        if (sample > target) != increasing {
            log_min = log_mid;
        } else {
            log_max = log_mid;
        }
    }
    Err(Error::Convergence { target, iterations: bisection.max_iterations })
}
