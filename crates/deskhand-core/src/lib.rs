//! Core chat orchestration for the Deskhand CRM assistant.
//!
//! One turn of the assistant flows through here: the orchestrator builds
//! the prompt, asks the model, executes any tool calls it requests (contact
//! resolution first, dependent CRM tools after), and returns the final
//! user-visible answer. Nothing in this crate keeps state across requests.

pub mod executor;
pub mod observer;
pub mod orchestrator;
pub mod prompts;
pub mod resolver;
pub mod service;
pub mod session;
pub mod tool_args;
pub mod tool_definitions;

pub use executor::{Executor, ToolOutcome};
pub use observer::{NullObserver, TracingObserver, TurnObserver};
pub use orchestrator::{IncomingTurn, Orchestrator};
pub use resolver::ContactResolver;
pub use service::ChatService;
pub use session::{Credentials, MissingCredential, Session};
pub use tool_args::{validate_catalog, ToolParseError, ToolRequest};
pub use tool_definitions::assistant_tools;
