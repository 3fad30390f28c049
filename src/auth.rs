//! Bearer credentials: the redacting token wrapper and the Authorization header built from it.

pub mod bearer;
pub mod secret;

pub use bearer::*;
pub use secret::*;
