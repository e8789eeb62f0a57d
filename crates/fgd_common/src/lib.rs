pub mod types;
pub mod jsonc;
pub mod sentences;
pub mod store;
pub mod errors;

pub use types::*;
pub use sentences::*;
pub use store::*;
pub use errors::*;
