//! Material libraries

pub mod mtl_parser;
pub mod material_table;

pub use mtl_parser::{MtlData, MtlLibrary, MtlParser};
pub use material_table::{get_material_index, MaterialTable};
