//! JSON lookups against public HTTP APIs.
//!
//! Used for ENS display names. Each request carries an `AbortSignal` that
//! fires after [`FETCH_TIMEOUT_MS`], so a slow resolver cannot keep a stale
//! lookup alive.

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use web_sys::AbortController;

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::error::FetchError;

/// GET `url` and decode the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let controller =
        AbortController::new().map_err(|_| FetchError::Network("abort unsupported".to_string()))?;
    let signal = controller.signal();
    // Cancelled on drop, i.e. once the body has been read.
    let _deadline = Timeout::new(FETCH_TIMEOUT_MS, move || controller.abort());

    let failed = |message: String| {
        if signal.aborted() {
            FetchError::Timeout
        } else {
            FetchError::Network(message)
        }
    };

    let response = Request::get(url)
        .abort_signal(Some(&signal))
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Http(response.status()));
    }

    response.json::<T>().await.map_err(|e| match e {
        gloo_net::Error::SerdeError(e) => FetchError::Decode(e.to_string()),
        other => failed(other.to_string()),
    })
}
