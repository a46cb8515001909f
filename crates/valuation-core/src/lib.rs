pub mod error;
pub mod facets;
pub mod traits;
pub mod types;

pub use error::*;
pub use facets::*;
pub use traits::*;
pub use types::*;
