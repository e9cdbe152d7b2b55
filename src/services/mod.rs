//! Service Layer
//!
//! The service layer owns everything that does I/O: the upstream fetch, the
//! CSV store and the collector that ties them to the in-memory history.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Collector                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐    │
//! │  │ HttpSource  │  │  CsvStore   │  │    TickHealth    │    │
//! │  │  (readout)  │  │  (history)  │  │ (failure count)  │    │
//! │  └─────────────┘  └─────────────┘  └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ CollectorEvent
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   In-process subscribers                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod collector;
mod events;
mod health;
mod store;
mod upstream;

pub use collector::*;
pub use events::*;
pub use health::*;
pub use store::*;
pub use upstream::*;
