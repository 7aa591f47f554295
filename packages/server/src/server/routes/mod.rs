// HTTP routes
pub mod health;
pub mod schemes;

pub use health::*;
pub use schemes::*;
