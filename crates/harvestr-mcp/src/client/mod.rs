//! Harvestr API client.
//!
//! - `config`: token, base URL and timeout, loaded from the environment
//! - `harvestr`: the authenticated HTTP client and its error taxonomy
//! - `shared`: the lazily built, resettable client owned by the server
//!
//! The client hands decoded JSON back untouched; shaping arguments and
//! rendering results is left to the tool layer.

pub mod config;
pub mod harvestr;
pub mod shared;

pub use config::ClientConfig;
pub use harvestr::{HarvestrClient, HarvestrError, HarvestrResult, QueryParams};
pub use shared::SharedClient;
