pub mod assemble;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod lookup;

pub use assemble::{assemble, Blueprint};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use lookup::LookupError;
