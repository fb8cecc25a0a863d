//! Request and response value objects handed to controllers.
//!
//! These are plain carriers: the dispatch core never inspects a request
//! beyond handing it to actions, and only touches a response to append
//! rendered output or to replace it wholesale.

pub mod request;
pub mod response;

pub use request::ServerRequest;
pub use response::ClientResponse;
