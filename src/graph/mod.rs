/// Resource Graph service layer: session, REST client, errors.
pub mod client;
pub mod errors;
pub mod session;

pub use client::{GraphQuery, Page, ResourceGraphClient, Scope};
pub use errors::GraphError;
pub use session::Session;
