//! Cross-view sync: change bus, polling, derived counters and view
//! lifecycles.
//!
//! # Responsibility
//! - Deliver same-process change notifications to every interested view.
//! - Refresh periodically to pick up changes from other processes.
//! - Keep badge counters consistent with the latest task collection.
//!
//! # Invariants
//! - Single-threaded; everything here is `Rc`-based and `!Send`.

pub mod bus;
pub mod counter_sync;
pub mod counters;
pub mod poller;
pub mod view;

pub use bus::{ChangeBus, ChangeEvent, ChangeOrigin, Subscription};
pub use counter_sync::CounterSync;
pub use counters::{Clock, DashboardSummary, FixedClock, Progress, SystemClock, TaskCounts};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use view::{EditorState, ViewSession};
