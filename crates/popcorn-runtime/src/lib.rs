pub mod details;
pub mod resolver;
pub mod session;
pub mod slot;

#[cfg(test)]
mod testing;

pub use details::{DetailLoader, DetailState};
pub use resolver::{SearchResolver, SearchState, DEFAULT_MIN_QUERY_LEN};
pub use session::{Message, Session, APP_TITLE};
pub use slot::{QuerySlot, Ticket};
