//! Recording transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses and records every request it is given. With an
/// empty queue it answers `200` with a blank body.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, "Reason", body)));
    }

    pub(crate) fn fail(&self, message: &str) {
        self.responses.borrow_mut().push_back(Err(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Ok(HttpResponse::new(200, "OK", "")),
        }
    }
}
