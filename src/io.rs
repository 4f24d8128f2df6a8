use std::path::{Path, PathBuf};
use log::info;
use serde::{Serialize, Deserialize};




// ============================================================================
#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[cfg(feature = "serde_cbor")]
    #[error("{0}")]
    SerdeCbor(#[from] serde_cbor::Error),

    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("file {0} given, but serde_cbor is not enabled")]
    SerdeCborNotEnabled(String),
}




// ============================================================================
pub fn parent_directory<P: AsRef<Path>>(path: P) -> PathBuf {
    match path.as_ref().parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/**
 * Resolve `path` against `directory`, unless it is already absolute.
 */
pub fn resolve<P: AsRef<Path>, D: AsRef<Path>>(path: P, directory: D) -> PathBuf {
    if path.as_ref().is_absolute() {
        path.as_ref().to_path_buf()
    } else {
        directory.as_ref().join(path)
    }
}

#[cfg(feature = "serde_cbor")]
pub fn write_cbor<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), Error> {
    info!("write {}", path.as_ref().display());
    let file = std::fs::File::create(path.as_ref())?;
    let buffer = std::io::BufWriter::new(file);

    serde_cbor::to_writer(buffer, &value)?;
    Ok(())
}

#[cfg(not(feature = "serde_cbor"))]
pub fn write_cbor<T: Serialize, P: AsRef<Path>>(_: &T, path: P) -> Result<(), Error> {
    info!("skip writing {} (serde_cbor is not enabled)", path.as_ref().display());
    Ok(())
}

#[cfg(feature = "serde_cbor")]
pub fn read_cbor<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, Error> {
    let file = std::fs::File::open(path.as_ref())?;
    let buffer = std::io::BufReader::new(file);
    Ok(serde_cbor::from_reader(buffer)?)
}

#[cfg(not(feature = "serde_cbor"))]
pub fn read_cbor<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, Error> {
    Err(Error::SerdeCborNotEnabled(path.as_ref().display().to_string()))
}
