use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use log::info;
use crate::inverse::{invert, Bisection};
use crate::lookup_table::{Column, CosmoTable, Error};




/**
 * Background cosmology for a nucleosynthesis calculation: a loaded cosmo
 * table together with the settings used to invert it. Temperatures are in
 * GeV, times in seconds.
 */
#[derive(Clone, Debug)]
pub struct Cosmology {
    table: CosmoTable,
    bisection: Bisection,
}




// ============================================================================
impl Cosmology {
    pub fn new(table: CosmoTable, bisection: Bisection) -> Self {
        Self { table, bisection }
    }

    /**
     * Load a cosmo file. If `expected_rows` is given, the file must contain
     * exactly that many rows.
     */
    pub fn load<P: AsRef<Path>>(path: P, expected_rows: Option<usize>, bisection: Bisection) -> Result<Self, Error> {
        Ok(Self::new(CosmoTable::from_ascii_file(path, expected_rows)?, bisection))
    }

    pub fn table(&self) -> &CosmoTable {
        &self.table
    }

    pub fn bisection(&self) -> &Bisection {
        &self.bisection
    }

    /// Time at which the photon temperature is `temperature`
    pub fn time(&self, temperature: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Temperature, Column::Time, temperature)
    }

    /// Photon temperature at time `t`
    pub fn temperature(&self, t: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Time, Column::Temperature, t)
    }

    pub fn neutrino_temperature(&self, t: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Time, Column::NeutrinoTemperature, t)
    }

    /// Rate of change of the photon temperature at time `t`, in GeV/s
    pub fn temperature_rate(&self, t: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Time, Column::TemperatureRate, t)
    }

    pub fn hubble_rate(&self, t: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Time, Column::HubbleRate, t)
    }

    /// Baryon number density relative to its asymptotic value, at time `t`
    pub fn eta_ratio(&self, t: f64) -> Result<f64, Error> {
        self.table.interpolate(Column::Time, Column::EtaRatio, t)
    }

    /**
     * Time at which the photon temperature is `temperature`, found by
     * bisection on the temperature as a function of time. This is an
     * alternative to `Cosmology::time` which never interpolates in the
     * temperature column.
     */
    pub fn time_by_bisection(&self, temperature: f64) -> Result<f64, Error> {
        invert(&self.table, Column::Time, Column::Temperature, temperature, &self.bisection)
    }

    /**
     * Release the table, returning it to the caller.
     */
    pub fn release(self) -> CosmoTable {
        info!("released cosmo table with {} rows", self.table.num_rows());
        self.table
    }
}




/**
 * A slot for a cosmology which may be loaded, replaced, and released while
 * the host program runs. Clones share the same slot, and may be sent to other
 * threads. Queries against an empty slot return `Error::NotLoaded`.
 */
#[derive(Clone, Default)]
pub struct SharedCosmology {
    slot: Arc<RwLock<Option<Arc<Cosmology>>>>,
}




// ============================================================================
impl SharedCosmology {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Load a cosmo file into the slot, replacing any cosmology already there.
     * The slot is left unchanged if loading fails.
     */
    pub fn load<P: AsRef<Path>>(&self, path: P, expected_rows: Option<usize>, bisection: Bisection) -> Result<(), Error> {
        self.replace(Cosmology::load(path, expected_rows, bisection)?);
        Ok(())
    }

    pub fn replace(&self, cosmology: Cosmology) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(cosmology));
    }

    /**
     * Empty the slot, returning whether a cosmology was loaded. Readers
     * holding the released cosmology keep it until they drop it.
     */
    pub fn release(&self) -> bool {
        self.slot.write().unwrap_or_else(PoisonError::into_inner).take().is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn get(&self) -> Result<Arc<Cosmology>, Error> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::NotLoaded)
    }

    /**
     * Run a query against the loaded cosmology.
     */
    pub fn with<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: FnOnce(&Cosmology) -> Result<T, Error>
    {
        query(&*self.get()?)
    }
}
