//! Request/response types and errors shared by the `fieldseal` service and its callers.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
