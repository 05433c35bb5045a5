//! The two conversational pipelines and the pieces they share: keyword
//! routing, append-only history and response chunking.

pub mod chunker;
pub mod conversation_state;
pub mod router;
pub mod safety;
pub mod travel;

pub use chunker::{next_chunk, ChunkedResponse};
pub use safety::SafetyAssistant;
pub use travel::TravelBudgetAssistant;
