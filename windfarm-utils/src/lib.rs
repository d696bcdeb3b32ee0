mod json;
pub use json::*;
mod keys;
pub use keys::*;
