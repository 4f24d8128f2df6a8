use log::warn;
use serde::{Serialize, Deserialize};
use crate::app::{self, Configuration, ProductsConfig};
use crate::cosmology::Cosmology;
use crate::lookup_table::Error;




/**
 * The background cosmology at one photon temperature
 */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackgroundSample {
	pub temperature: f64,
	pub time: f64,
	pub time_by_bisection: f64,
	pub relative_difference: f64,
	pub neutrino_temperature: f64,
	pub temperature_rate: f64,
	pub hubble_rate: f64,
	pub eta_ratio: f64,
}




/**
 * Useful data for post-processing and plotting
 */
#[derive(Serialize, Deserialize)]
pub struct Products {
	pub samples: Vec<BackgroundSample>,
	pub config: Configuration,
	pub version: String,
}




// ============================================================================
impl BackgroundSample {

	/**
	 * Sample the background at a photon temperature. The time is found both
	 * by direct lookup and by bisection, and the remaining quantities are
	 * evaluated at the looked-up time.
	 */
	pub fn at_temperature(cosmology: &Cosmology, temperature: f64) -> Result<Self, Error> {
		let time = cosmology.time(temperature)?;
		let time_by_bisection = cosmology.time_by_bisection(temperature)?;
		let relative_difference = ((time - time_by_bisection) / time).abs();

		// a relative error tol in T allows about 2 tol in t, for T ~ t^(-1/2)
		if relative_difference > 2.0 * cosmology.bisection().tolerance {
			warn!("at T = {:e} GeV, lookup gives t = {:e} s but bisection gives {:e} s", temperature, time, time_by_bisection);
		}

		Ok(Self {
			temperature,
			time,
			time_by_bisection,
			relative_difference,
			neutrino_temperature: cosmology.neutrino_temperature(time)?,
			temperature_rate: cosmology.temperature_rate(time)?,
			hubble_rate: cosmology.hubble_rate(time)?,
			eta_ratio: cosmology.eta_ratio(time)?,
		})
	}
}




// ============================================================================
impl Products {

	/**
	 * Return `num_samples` log-spaced temperatures from `temperature_max`
	 * down to `temperature_min`, inclusive.
	 */
	pub fn temperature_grid(products: &ProductsConfig) -> Vec<f64> {
		let log_max = products.temperature_max.ln();
		let log_min = products.temperature_min.ln();
		let n = products.num_samples;

		(0..n)
			.map(|j| (log_max + (log_min - log_max) * j as f64 / (n - 1) as f64).exp())
			.collect()
	}

	pub fn from_cosmology(cosmology: &Cosmology, config: &Configuration) -> Result<Self, Error> {
		let samples = Self::temperature_grid(&config.products)
			.into_iter()
			.map(|temperature| BackgroundSample::at_temperature(cosmology, temperature))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Products {
			samples,
			config: config.clone(),
			version: app::VERSION_AND_BUILD.to_string(),
		})
	}

	/**
	 * Return the largest relative difference between the looked-up and
	 * bisected times.
	 */
	pub fn max_relative_difference(&self) -> f64 {
		self.samples.iter().map(|s| s.relative_difference).fold(0.0, f64::max)
	}
}
