//! Request pipeline: build one request, execute it, classify the response

pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpResponse};
pub use request::RequestSpec;
pub use response::{classify, error_envelope};
