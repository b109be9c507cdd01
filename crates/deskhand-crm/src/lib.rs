pub mod contacts;
pub mod mcp;
pub mod memory;
pub mod postgres;

pub use contacts::{ContactFilter, ContactRecord, ContactStore};
pub use mcp::{CrmTools, McpClient};
pub use memory::MemoryContactStore;
pub use postgres::PgContactStore;
