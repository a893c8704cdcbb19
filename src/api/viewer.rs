use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::api::job::service::ServiceError;

/// Header set by the auth gateway once the session cookie is verified
pub const VIEWER_HEADER: &str = "X-User-Id";

/// Authenticated user making the request.
///
/// Extract as `Option<Viewer>` on endpoints that also serve anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub i64);

impl Viewer {
    pub fn id(self) -> i64 {
        self.0
    }

    fn from_request_headers(req: &HttpRequest) -> Option<Self> {
        req.headers()
            .get(VIEWER_HEADER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Viewer)
    }
}

impl FromRequest for Viewer {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_headers(req).ok_or(ServiceError::Unauthorized))
    }
}
