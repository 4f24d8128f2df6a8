pub static DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub static VERSION_AND_BUILD: &str = git_version::git_version!(
    prefix = concat!("v", env!("CARGO_PKG_VERSION"), " "),
    fallback = "unknown"
);


use std::{
    ffi::OsStr,
    fs::{File, read_to_string},
    path::{Path, PathBuf},
};
use serde::{
    Serialize,
    Deserialize,
};
use crate::cosmology::Cosmology;
use crate::inverse::Bisection;
use crate::io;
use crate::lookup_table::{self, CosmoTable};
use crate::yaml_patch::{self, Patch};


// ============================================================================
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    YamlPatch(#[from] yaml_patch::Error),

    #[error("{0}")]
    AppIO(#[from] io::Error),

    #[error("{0}")]
    Table(#[from] lookup_table::Error),

    #[error("unknown input file type '{0}'")]
    UnknownInputType(String),
}


/**
 * Where to find the cosmo table
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {

    /// Path to a cosmo file (.dat), or a table written earlier (.cbor);
    /// relative paths are taken from the configuration file's directory
    pub path: String,

    /// If given, the cosmo file must have exactly this many rows
    #[serde(default)]
    pub expected_rows: Option<usize>,
}


/**
 * What to sample from the loaded background, and where to write it
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsConfig {

    /// Lowest photon temperature sampled (GeV)
    pub temperature_min: f64,

    /// Highest photon temperature sampled (GeV)
    pub temperature_max: f64,

    /// Number of log-spaced temperatures
    pub num_samples: usize,

    /// Output file for the sampled background
    pub output: String,

    /// Optional output file for the unit-normalized table
    #[serde(default)]
    pub table_output: Option<String>,
}


/**
 * User configuration
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub table: TableConfig,

    #[serde(default)]
    pub inversion: Bisection,

    pub products: ProductsConfig,
}


/**
 * App state
 */
#[derive(Clone, Serialize, Deserialize)]
pub struct App {
    pub config: Configuration,
    pub directory: PathBuf,
    pub version: String,
}




// ============================================================================
impl TableConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.path.is_empty() {
            anyhow::bail!("table path must not be empty")
        }
        if let Some(expected_rows) = self.expected_rows {
            if expected_rows < 2 {
                anyhow::bail!("table expected_rows must be >= 2")
            }
        }
        Ok(())
    }
}

impl ProductsConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.temperature_min <= 0.0 {
            anyhow::bail!("temperature_min must be > 0.0")
        }
        if self.temperature_max <= self.temperature_min {
            anyhow::bail!("temperature_max must be > temperature_min")
        }
        if self.num_samples < 2 {
            anyhow::bail!("num_samples must be >= 2")
        }
        Ok(())
    }
}




// ============================================================================
impl Configuration {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.table.validate()?;
        self.inversion.validate()?;
        self.products.validate()?;
        Ok(())
    }
}




// ============================================================================
impl App {

    /**
     * Return self as a result, which will be in an error state if any of the
     * configuration items did not pass validation.
     */
    pub fn validate(self) -> anyhow::Result<Self> {
        self.config.validate()?;
        Ok(self)
    }

    /**
     * Construct a new App instance from a user configuration. Each patch is
     * either a .yaml file or a `key.path=value` string, and is merged into
     * the configuration in order.
     */
    pub fn from_config<S: AsRef<str>>(mut config: Configuration, directory: PathBuf, patches: &[S]) -> Result<Self, Error> {
        for patch in patches {
            let patch = patch.as_ref();

            if patch.ends_with(".yaml") {
                config.patch_from_reader(File::open(patch)?)?
            } else {
                config.patch_from_key_val(patch)?
            }
        }
        Ok(Self{config, directory, version: VERSION_AND_BUILD.to_string()})
    }

    /**
     * Construct a new App instance from a config.yaml file.
     */
    pub fn from_file<S: AsRef<str>>(filename: &str, patches: &[S]) -> Result<Self, Error> {
        match Path::new(&filename).extension().and_then(OsStr::to_str) {
            Some("yaml") => Self::from_config(serde_yaml::from_str(&read_to_string(filename)?)?, io::parent_directory(filename), patches),
            _ => Err(Error::UnknownInputType(filename.to_string())),
        }
    }

    /**
     * Construct a new App instance from a preset (hard-coded) configuration
     * name, or otherwise an input file if no matching preset is found.
     */
    pub fn from_preset_or_file<S: AsRef<str>>(input: &str, patches: &[S]) -> Result<Self, Error> {
        match input {
            "standard_model" => Self::from_config(serde_yaml::from_str(std::include_str!("../setups/standard_model.yaml"))?, PathBuf::from("."), patches),
            _ => Self::from_file(input, patches),
        }
    }

    pub fn table_path(&self) -> PathBuf {
        io::resolve(&self.config.table.path, &self.directory)
    }

    pub fn output_path(&self) -> PathBuf {
        io::resolve(&self.config.products.output, &self.directory)
    }

    pub fn table_output_path(&self) -> Option<PathBuf> {
        self.config.products.table_output.as_ref().map(|path| io::resolve(path, &self.directory))
    }

    /**
     * Load the cosmology named in the configuration: either a cosmo file,
     * or a unit-normalized table previously written as CBOR.
     */
    pub fn load_cosmology(&self) -> Result<Cosmology, Error> {
        let path = self.table_path();

        let table = match path.extension().and_then(OsStr::to_str) {
            Some("cbor") => io::read_cbor::<CosmoTable, _>(&path)?,
            _ => CosmoTable::from_ascii_file(&path, self.config.table.expected_rows)?,
        };
        Ok(Cosmology::new(table, self.config.inversion))
    }
}
