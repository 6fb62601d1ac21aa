mod memo;
pub use memo::*;

mod time_bounds;
pub use time_bounds::*;

mod signature;
pub use signature::*;

mod envelope;
pub use envelope::*;
