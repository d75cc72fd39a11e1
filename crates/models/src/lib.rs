//! Domain types for the onboarding core.
//! - Plain serde structs shared by the service and server crates.
//! - Field validation helpers live next to the types they guard.

pub mod errors;
pub mod recovery;
pub mod signup;
pub mod tenant;
pub mod validate;
