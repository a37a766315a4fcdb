pub mod clock;
pub mod links;

pub use clock::{Clock, FixedClock, SystemClock};
pub use links::{Creation, LinkService};
