use std::path::Path;
use log::{debug, info};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Serialize, Deserialize};
use crate::ascii_table;
use crate::index::{find_bracket_index, SortOrder};
use crate::physics::unit_factor;




/// Number of columns in a cosmo file
pub const NUM_COLS: usize = 6;




/**
 * An error type for loading and querying cosmological tables
 */
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error(transparent)]
    Load(#[from] ascii_table::Error),

    #[error("the table must have at least two rows")]
    TableTooSmall,

    #[error("no cosmo table has been loaded")]
    NotLoaded,

    #[error("cannot interpolate {column:?} at {x:e}: outside the tabulated range [{first:e}, {last:e})")]
    OutOfDomain {
        column: Column,
        x: f64,
        first: f64,
        last: f64,
    },

    #[error("the {0:?} column is not strictly monotonic")]
    NonMonotonicColumn(Column),

    #[error("bisection for {target:e} did not converge after {iterations} iterations")]
    Convergence {
        target: f64,
        iterations: usize,
    },
}




/**
 * The columns of a cosmo file, in the order they appear
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Time,
    Temperature,
    HubbleRate,
    NeutrinoTemperature,
    TemperatureRate,
    EtaRatio,
}




// ============================================================================
impl Column {
    pub const ALL: [Column; NUM_COLS] = [
        Column::Time,
        Column::Temperature,
        Column::HubbleRate,
        Column::NeutrinoTemperature,
        Column::TemperatureRate,
        Column::EtaRatio,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}




/**
 * Tabulated background cosmology. Columns are stored in internal units (see
 * [`crate::physics::unit_factor`]), and are immutable once loaded.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CosmoTable {
    data: Array2<f64>,
    order: Vec<Option<SortOrder>>,
}




// ============================================================================
impl CosmoTable {

    /**
     * Return a table from a `Vec` of rows, given in the units of the cosmo
     * file. A `TableTooSmall` error is returned if there are fewer than 2
     * rows.
     */
    pub fn from_rows(rows: Vec<[f64; NUM_COLS]>) -> Result<Self, Error> {
        if rows.len() < 2 {
            return Err(Error::TableTooSmall)
        }
        let mut data = Array2::zeros((NUM_COLS, rows.len()));

        for (i, row) in rows.iter().enumerate() {
            for column in &Column::ALL {
                data[[column.index(), i]] = row[column.index()] * unit_factor(*column);
            }
        }
        let order = data.axis_iter(Axis(0)).map(SortOrder::of_strict).collect();

        Ok(Self { data, order })
    }

    /**
     * Create a `CosmoTable` from the contents of a cosmo file. If
     * `expected_rows` is given, the number of rows must match it.
     */
    pub fn from_ascii_table(contents: &str, expected_rows: Option<usize>) -> Result<Self, Error> {
        Self::from_rows(ascii_table::read_rows(contents, expected_rows)?)
    }

    /**
     * Convenience method to load a cosmo file and pass its contents to
     * `CosmoTable::from_ascii_table`.
     */
    pub fn from_ascii_file<P: AsRef<Path>>(path: P, expected_rows: Option<usize>) -> Result<Self, Error> {
        let table = Self::from_rows(ascii_table::read_rows_from_file(path.as_ref(), expected_rows)?)?;
        info!("loaded {} rows from {}", table.num_rows(), path.as_ref().display());
        debug!("column orders: {:?}", table.order);
        Ok(table)
    }

    pub fn num_rows(&self) -> usize {
        self.data.ncols()
    }

    pub fn column(&self, column: Column) -> ArrayView1<f64> {
        self.data.row(column.index())
    }

    /**
     * Return the order of a column if it is strictly monotonic.
     */
    pub fn order(&self, column: Column) -> Option<SortOrder> {
        self.order[column.index()]
    }

    /**
     * Return the first and last tabulated values of a column.
     */
    pub fn span(&self, column: Column) -> (f64, f64) {
        let values = self.column(column);
        (values[0], values[values.len() - 1])
    }

    /**
     * Return the value of `y_column` at the point where `x_column` has the
     * value `x`. Within each bracket the data is modeled as a power law
     * `y = C x^m` passing through both end points, so the result is exact at
     * the tabulated points. If both end points are negative, the power law is
     * fitted to their magnitudes. No power law passes through a zero or
     * through a change of sign, so such brackets are interpolated linearly
     * in `y` instead.
     *
     * `x_column` must be strictly monotonic, and `x` must lie in the
     * half-open range from its first value to its last value; otherwise an
     * error is returned.
     */
    pub fn interpolate(&self, x_column: Column, y_column: Column, x: f64) -> Result<f64, Error> {
        if self.order(x_column).is_none() {
            return Err(Error::NonMonotonicColumn(x_column))
        }
        let xs = self.column(x_column);
        let ys = self.column(y_column);

        let i = match find_bracket_index(xs, x) {
            Some(i) if i + 1 < xs.len() => i,
            _ => {
                let (first, last) = self.span(x_column);
                return Err(Error::OutOfDomain { column: x_column, x, first, last })
            }
        };
        let (x1, y1) = (xs[i], ys[i]);
        let (x2, y2) = (xs[i + 1], ys[i + 1]);

        if y1 == y2 || x == x1 {
            return Ok(y1)
        }
        if y1 == 0.0 || y2 == 0.0 || (y1 < 0.0) != (y2 < 0.0) {
            return Ok(y1 + (x - x1) * (y2 - y1) / (x2 - x1))
        }
        let sign = if y1 < 0.0 { -1.0 } else { 1.0 };
        let (y1, y2) = (y1.abs(), y2.abs());
        let m = (y2 / y1).ln() / (x2 / x1).ln();

        Ok(sign * y2 * (x / x2).powf(m))
    }
}




// ============================================================================
#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_relative_eq;
    use super::*;

    fn rows_from_columns(t: &[f64], temperature: &[f64]) -> Vec<[f64; NUM_COLS]> {
        t.iter()
            .zip(temperature)
            .map(|(&t, &temperature)| [t, temperature, 1.0, temperature, -temperature, 1.0])
            .collect()
    }

    /// Radiation dominated scaling, T ~ t^(-1/2), with T in MeV
    pub(crate) fn radiation_rows(num_rows: usize) -> Vec<[f64; NUM_COLS]> {
        let t: Vec<f64> = (0..num_rows).map(|i| 1e-2 * 1.2f64.powi(i as i32)).collect();
        let temperature: Vec<f64> = t.iter().map(|t| t.powf(-0.5)).collect();
        rows_from_columns(&t, &temperature)
    }

    pub(crate) fn radiation_table(num_rows: usize) -> CosmoTable {
        CosmoTable::from_rows(radiation_rows(num_rows)).unwrap()
    }

    pub(crate) fn radiation_ascii(num_rows: usize) -> String {
        radiation_rows(num_rows)
            .iter()
            .map(|row| row.iter().map(|x| format!("{:.17e}", x)).collect::<Vec<_>>().join(" ") + "\n")
            .collect()
    }

    #[test]
    fn table_needs_two_rows() {
        assert!(matches!(CosmoTable::from_rows(vec![[1.0; NUM_COLS]]), Err(Error::TableTooSmall)));
        assert!(matches!(CosmoTable::from_rows(vec![]), Err(Error::TableTooSmall)));
    }

    #[test]
    fn units_are_converted_on_load() {
        let table = CosmoTable::from_rows(vec![[1.0; NUM_COLS], [2.0; NUM_COLS]]).unwrap();
        for column in &Column::ALL {
            assert_eq!(table.column(*column)[0], unit_factor(*column));
            assert_eq!(table.column(*column)[1], 2.0 * unit_factor(*column));
        }
    }

    #[test]
    fn column_orders_are_recorded() {
        let rows = vec![
            [1.0, 3.0, 1.0, 3.0, 1.0, 1.0],
            [2.0, 2.0, 1.0, 2.0, 2.0, 1.0],
            [3.0, 1.0, 1.0, 1.0, 1.5, 1.0],
        ];
        let table = CosmoTable::from_rows(rows).unwrap();
        assert_eq!(table.order(Column::Time), Some(SortOrder::Ascending));
        assert_eq!(table.order(Column::Temperature), Some(SortOrder::Descending));
        assert_eq!(table.order(Column::HubbleRate), None);
        assert_eq!(table.order(Column::TemperatureRate), None);
    }

    #[test]
    fn power_law_is_exact_for_a_linear_relation() {
        let rows = vec![
            [1.0, 10.0, 1.0, 10.0, 1.0, 1.0],
            [2.0, 20.0, 1.0, 20.0, 1.0, 1.0],
            [4.0, 40.0, 1.0, 40.0, 1.0, 1.0],
        ];
        let table = CosmoTable::from_rows(rows).unwrap();
        assert_eq!(find_bracket_index(table.column(Column::Time), 3.0), Some(1));
        assert_relative_eq!(table.interpolate(Column::Time, Column::EtaRatio, 3.0).unwrap(), 1.0);
        assert_relative_eq!(table.interpolate(Column::Time, Column::Temperature, 3.0).unwrap(), 30.0 * 1e-3, max_relative = 1e-12);
    }

    #[test]
    fn interpolation_is_exact_at_the_tabulated_points() {
        let table = radiation_table(40);
        let t = table.column(Column::Time);
        let temperature = table.column(Column::Temperature);

        for i in 0..table.num_rows() - 1 {
            assert_relative_eq!(table.interpolate(Column::Time, Column::Temperature, t[i]).unwrap(), temperature[i], max_relative = 1e-12);
            assert_relative_eq!(table.interpolate(Column::Temperature, Column::Time, temperature[i]).unwrap(), t[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn interpolation_follows_a_power_law_between_points() {
        let table = radiation_table(10);
        let t = 0.5 * (table.column(Column::Time)[3] + table.column(Column::Time)[4]);
        let expected = 1e-3 * t.powf(-0.5);
        assert_relative_eq!(table.interpolate(Column::Time, Column::Temperature, t).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let table = radiation_table(10);
        let t = 0.5 * (table.column(Column::Time)[3] + table.column(Column::Time)[4]);
        let rate = table.interpolate(Column::Time, Column::TemperatureRate, t).unwrap();
        assert!(rate < 0.0);
        assert_relative_eq!(rate, -unit_factor(Column::TemperatureRate) * t.powf(-0.5), max_relative = 1e-12);
    }

    #[test]
    fn constant_segments_interpolate_to_the_constant() {
        let rows = vec![[1.0, 2.0, 0.0, 2.0, 0.0, 0.0], [2.0, 1.0, 0.0, 1.0, 0.0, 0.0]];
        let table = CosmoTable::from_rows(rows).unwrap();
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 1.5).unwrap(), 0.0);
    }

    #[test]
    fn segments_ending_at_zero_are_interpolated_linearly() {
        let rows = vec![
            [1.0, 3.0, 1.0, 3.0, 1.0, 1.0],
            [2.0, 2.0, 1.0, 2.0, 1.0, 0.0],
            [4.0, 1.0, 1.0, 1.0, 1.0, 0.0],
        ];
        let table = CosmoTable::from_rows(rows).unwrap();
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 1.0).unwrap(), 1.0);
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 1.5).unwrap(), 0.5);
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 2.0).unwrap(), 0.0);
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 3.0).unwrap(), 0.0);
    }

    #[test]
    fn segments_starting_at_zero_or_changing_sign_are_interpolated_linearly() {
        let rows = vec![
            [1.0, 3.0, 1.0, 3.0, -1.0, 0.0],
            [2.0, 2.0, 1.0, 2.0,  1.0, 1.0],
        ];
        let table = CosmoTable::from_rows(rows).unwrap();
        let rate = unit_factor(Column::TemperatureRate);
        assert_eq!(table.interpolate(Column::Time, Column::EtaRatio, 1.25).unwrap(), 0.25);
        assert_relative_eq!(table.interpolate(Column::Time, Column::TemperatureRate, 1.5).unwrap(), 0.0, epsilon = 1e-12 * rate);
        assert_relative_eq!(table.interpolate(Column::Time, Column::TemperatureRate, 1.75).unwrap(), 0.5 * rate, max_relative = 1e-12);
    }

    #[test]
    fn sampling_at_the_last_point_is_out_of_domain() {
        let table = radiation_table(10);
        let (first, last) = table.span(Column::Time);
        assert!(matches!(table.interpolate(Column::Time, Column::Temperature, last), Err(Error::OutOfDomain { .. })));
        assert!(matches!(table.interpolate(Column::Time, Column::Temperature, 2.0 * last), Err(Error::OutOfDomain { .. })));
        assert!(matches!(table.interpolate(Column::Time, Column::Temperature, 0.5 * first), Err(Error::OutOfDomain { .. })));
        assert!(table.interpolate(Column::Time, Column::Temperature, first).is_ok());
    }

    #[test]
    fn non_monotonic_columns_cannot_be_queried() {
        let table = radiation_table(10);
        let result = table.interpolate(Column::HubbleRate, Column::Time, 1.0 / crate::physics::HBAR);
        assert!(matches!(result, Err(Error::NonMonotonicColumn(Column::HubbleRate))));
    }

    #[test]
    fn ascii_tables_load_identically_twice() {
        let contents = "1.0 1.0 2.0 0.7 -3.0 0.9\n2.0 0.7 1.0 0.5 -1.0 0.95\n4.0 0.5 0.5 0.35 -0.4 1.0\n";
        let a = CosmoTable::from_ascii_table(contents, None).unwrap();
        let b = CosmoTable::from_ascii_table(contents, Some(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.num_rows(), 3);
    }

    #[test]
    fn printed_tables_read_back_exactly() {
        let table = CosmoTable::from_ascii_table(&radiation_ascii(25), Some(25)).unwrap();
        assert_eq!(table, radiation_table(25));
    }

    #[test]
    fn load_errors_are_forwarded() {
        let result = CosmoTable::from_ascii_table("1 2 3 4 5 6\n1 2 3\n", None);
        assert!(matches!(result, Err(Error::Load(ascii_table::Error::MalformedRow { line: 2, .. }))));
        let result = CosmoTable::from_ascii_file("/nonexistent/bbn_cosmo/cosmo_file.dat", None);
        assert!(matches!(result, Err(Error::Load(ascii_table::Error::FileOpen { .. }))));
    }
}
