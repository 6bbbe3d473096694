#[cfg(feature = "frontend-http")]
pub mod http;
