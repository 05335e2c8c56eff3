mod configure;
mod local;

pub use configure::*;
pub use local::*;
