//! Domain Layer
//!
//! - **Types** (`types.rs`) - `Request` and `Response` value objects
//! - **Ports** (`ports.rs`) - the `MetricsSubscriber` notification trait

pub mod ports;
pub mod types;

pub use ports::MetricsSubscriber;
pub use types::{Request, Response};
