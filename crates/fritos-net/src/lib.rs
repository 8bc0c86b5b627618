//! fritos Networking
//!
//! A fetch-style remote call: one HTTP request, a timeout, and exactly one
//! of two callbacks.

mod config;
mod error;
mod remote;

pub use config::NetConfig;
pub use error::RemoteError;
pub use remote::{
    fetch_remote, remote_call, ErrorCallback, Method, RemoteCallOptions, RemoteClient, RemoteData,
    RemoteRequest, SuccessCallback, DEFAULT_TIMEOUT,
};
pub use url::Url;
