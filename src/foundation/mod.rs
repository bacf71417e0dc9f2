/// Shared pixel types and premultiplied-alpha helpers.
pub mod core;
/// Error taxonomy.
pub mod error;
