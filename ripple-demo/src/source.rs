//! Request source: a validating producer over the mock requests

use ripple_core::rx::{Observable, Observer};
use std::sync::Arc;
use tracing::debug;

use crate::error::RequestError;
use crate::request::Request;

/// Stream every request in order, failing on the first invalid one.
///
/// `fail_at` injects a [`RequestError::Injected`] in place of the request at
/// that index.
pub fn request_stream(
    requests: Vec<Request>,
    fail_at: Option<usize>,
) -> Observable<Request, RequestError> {
    let requests: Arc<[Request]> = requests.into();

    Observable::new(move |observer: Observer<Request, RequestError>| {
        for (index, request) in requests.iter().enumerate() {
            if fail_at == Some(index) {
                observer.error(RequestError::Injected { index });
                break;
            }
            if let Err(e) = request.validate() {
                observer.error(e);
                break;
            }
            if observer.try_next(request.clone()).is_err() {
                break;
            }
        }
        observer.complete();

        let id = observer.id();
        Box::new(move || {
            debug!(subscription_id = %id, "request source released");
        })
    })
}
