use crate::error::Result;

pub mod decode;
pub mod http;
pub mod request;

pub use http::HttpTransport;
pub use request::ChartRange;

pub type FetchResult<T> = Result<T>;

/// Blocking GET that returns the full response body.
///
/// The client only ever reads text payloads, so this is the whole I/O surface;
/// tests swap in an in-memory implementation.
pub trait Transport {
    fn get_text(&self, url: &str) -> FetchResult<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_text(&self, url: &str) -> FetchResult<String> {
        (**self).get_text(url)
    }
}
