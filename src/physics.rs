use crate::lookup_table::Column;

/// Reduced Planck constant, in MeV s
pub static HBAR: f64 = 6.582119569e-22;

/// Conversion factor from MeV to GeV
pub static MEV_TO_GEV: f64 = 1e-3;




/**
 * Return the factor which converts a column of the cosmo file from the units
 * it is written in (powers of MeV, and seconds for the time) to the units
 * used internally: GeV for temperatures, 1/s for the Hubble rate, and GeV/s
 * for the rate of change of the temperature.
 */
pub fn unit_factor(column: Column) -> f64 {
    match column {
        Column::Time                => 1.0,
        Column::Temperature         => MEV_TO_GEV,
        Column::HubbleRate          => 1.0 / HBAR,
        Column::NeutrinoTemperature => MEV_TO_GEV,
        Column::TemperatureRate     => MEV_TO_GEV / HBAR,
        Column::EtaRatio            => 1.0,
    }
}
