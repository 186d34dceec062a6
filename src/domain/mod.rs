pub mod models;
pub mod requests;
pub mod errors;

pub use models::*;
pub use requests::*;
pub use errors::*;
