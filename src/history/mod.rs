//! Move history: records, the storage interface, and the background writer.

mod error;
mod log;
mod memory;
mod models;
mod writer;

pub use error::{HistoryError, HistoryErrorKind};
pub use log::HistoryLog;
pub use memory::MemoryHistory;
pub use models::{HistoryEvent, MoveRecord, SessionId, SessionRecord, group_games};
pub use writer::{HistorySink, HistoryWriter};
