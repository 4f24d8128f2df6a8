//! Cosmological background tables for Big-Bang nucleosynthesis: loading,
//! power-law interpolation, and inversion of tabulated background quantities.




// ============================================================================
pub mod app;
pub mod ascii_table;
pub mod cosmology;
pub mod index;
pub mod inverse;
pub mod io;
pub mod lookup_table;
pub mod physics;
pub mod products;
pub mod yaml_patch;




// ============================================================================
pub use cosmology::{Cosmology, SharedCosmology};
pub use index::{find_bracket_index, SortOrder};
pub use inverse::{invert, Bisection};
pub use lookup_table::{Column, CosmoTable};
