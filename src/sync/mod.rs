// Data-synchronization layer between handlers and the document store:
// an injected error bus, memoized query descriptors, poll-based live
// subscriptions, and fire-and-forget writes with inspectable outcomes.

pub mod error_bus;
pub mod live;
pub mod memo;
pub mod writes;

pub use error_bus::*;
pub use live::*;
pub use memo::*;
pub use writes::*;
