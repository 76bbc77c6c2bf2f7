//! The seam between the controller and the network

use remote_client::{HttpClient, HttpError, HttpResponse};

/// Blocking GET transport owned exclusively by a controller
///
/// `&mut self` keeps at most one request in flight per transport.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError>;
}

impl Transport for HttpClient {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        HttpClient::get(self, url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        (**self).get(url)
    }
}
