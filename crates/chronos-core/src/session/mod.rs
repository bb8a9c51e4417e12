mod clock;
mod controller;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{SessionController, SessionState};
pub use ticker::{run_ticks, TickExit, Ticker};
