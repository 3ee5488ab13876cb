//! Response sink capability.
//!
//! Lets a serialized return be written onto any response-like value.
//! Each setter fails by default; implementors override the ones their
//! container supports and report them through [`ResponseSink::supports`].

use bytes::Bytes;
use http::{HeaderName, HeaderValue, Response, StatusCode};

use crate::{HttpBindingError, Result};

/// One of the writes a sink may support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setter {
    Status,
    Header,
    Body,
}

impl Setter {
    pub const ALL: [Setter; 3] = [Setter::Status, Setter::Header, Setter::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Setter::Status => "status",
            Setter::Header => "header",
            Setter::Body => "body",
        }
    }
}

pub trait ResponseSink {
    /// Whether `setter` is overridden. Writers check every setter they need
    /// before the first write, so an unsupported one leaves the sink untouched.
    fn supports(&self, setter: Setter) -> bool {
        let _ = setter;
        false
    }

    fn set_status(&mut self, status: StatusCode) -> Result<()> {
        let _ = status;
        Err(HttpBindingError::ResponseWriteFailure(Setter::Status.as_str()))
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> Result<()> {
        let _ = (name, value);
        Err(HttpBindingError::ResponseWriteFailure(Setter::Header.as_str()))
    }

    fn set_body(&mut self, body: Bytes) -> Result<()> {
        let _ = body;
        Err(HttpBindingError::ResponseWriteFailure(Setter::Body.as_str()))
    }

    /// The first of `setters` this sink cannot perform, as a write failure.
    fn require(&self, setters: &[Setter]) -> Result<()> {
        match setters.iter().find(|setter| !self.supports(**setter)) {
            Some(missing) => Err(HttpBindingError::ResponseWriteFailure(missing.as_str())),
            None => Ok(()),
        }
    }
}

impl<B> ResponseSink for Response<B>
where
    B: From<Bytes>,
{
    fn supports(&self, _setter: Setter) -> bool {
        true
    }

    fn set_status(&mut self, status: StatusCode) -> Result<()> {
        *self.status_mut() = status;
        Ok(())
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> Result<()> {
        self.headers_mut().insert(name, value);
        Ok(())
    }

    fn set_body(&mut self, body: Bytes) -> Result<()> {
        *self.body_mut() = B::from(body);
        Ok(())
    }
}
