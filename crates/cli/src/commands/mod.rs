pub mod check;
pub mod probe;
pub mod rule;
pub mod util;

pub use check::*;
pub use probe::*;
pub use rule::*;
pub use util::*;
