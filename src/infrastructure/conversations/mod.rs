//! External conversation service adapters.

mod http_client;

pub use http_client::HttpConversationClient;
