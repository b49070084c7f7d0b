//! Database schema and enum types shared by every model crate

mod enums;
mod schema;

pub use enums::*;
pub use schema::*;
