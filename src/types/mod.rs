mod properties;
mod source;

pub use properties::*;
pub use source::*;
