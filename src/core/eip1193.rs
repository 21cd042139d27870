//! EIP-1193 provider interop using web-sys.
//!
//! Wraps a JavaScript provider object (the injected `window.ethereum`, or a
//! remote-pairing provider exposed on `window`) and calls its
//! `request({ method, params })` through the Reflect API.

use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::JsFuture;

use crate::core::error::{WalletError, codes};
use crate::utils::dom;

/// Error code used when a rejection carries no numeric code.
const UNSPECIFIED_CODE: i64 = 0;

/// A JavaScript EIP-1193 provider object.
#[derive(Clone, Debug)]
pub struct Eip1193 {
    object: Object,
}

impl Eip1193 {
    /// The `window.ethereum` object injected by a browser wallet.
    pub fn injected() -> Result<Self, WalletError> {
        Self::from_global("ethereum")
    }

    /// A provider object the page exposed as `window[name]`.
    pub fn from_global(name: &str) -> Result<Self, WalletError> {
        let window = dom::window().ok_or(WalletError::NoWindow)?;
        Reflect::get(&window, &name.into())
            .ok()
            .and_then(|v| v.dyn_into::<Object>().ok())
            .map(|object| Self { object })
            .ok_or(WalletError::NoWallet)
    }

    /// Read a boolean marker such as `isMetaMask`.
    pub fn flag(&self, name: &str) -> bool {
        Reflect::get(&self.object, &name.into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn method(&self, name: &str) -> Result<Function, WalletError> {
        Reflect::get(&self.object, &name.into())
            .map_err(|_| WalletError::RequestCreationFailed)?
            .dyn_into::<Function>()
            .map_err(|_| WalletError::RequestCreationFailed)
    }

    fn start_request(&self, method: &str, params: Option<&Value>) -> Result<Promise, WalletError> {
        // Create { method: "...", params: [...] } object
        let args = Object::new();
        Reflect::set(&args, &"method".into(), &method.into())
            .map_err(|_| WalletError::RequestCreationFailed)?;
        if let Some(params) = params {
            let params = params
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|_| WalletError::RequestCreationFailed)?;
            Reflect::set(&args, &"params".into(), &params)
                .map_err(|_| WalletError::RequestCreationFailed)?;
        }

        let request = self.method("request")?;
        let promise = request
            .call1(&self.object, &args)
            .map_err(|e| rejection(&e))?;
        Ok(promise.into())
    }

    /// Call `provider.request({ method, params })`.
    pub async fn request(&self, method: &str, params: Option<&Value>) -> Result<JsValue, WalletError> {
        let promise = self.start_request(method, params)?;
        JsFuture::from(promise).await.map_err(|e| rejection(&e))
    }

    /// Like [`request`](Self::request), converting the result to JSON.
    pub async fn request_json(&self, method: &str, params: Option<&Value>) -> Result<Value, WalletError> {
        let result = self.request(method, params).await?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|_| WalletError::RequestCreationFailed)
    }

    /// `request` that gives up with [`WalletError::Timeout`] after
    /// `timeout_ms`, for silent checks that must not block page load.
    pub async fn request_with_timeout(&self, method: &str, timeout_ms: i32) -> Result<JsValue, WalletError> {
        let promise = self.start_request(method, None)?;
        let window = dom::window().ok_or(WalletError::NoWindow)?;

        // The deadline resolves to a private marker, so an `undefined`
        // answer from the wallet is not mistaken for expiry.
        let expired = Object::new();
        let deadline = Promise::new(&mut |resolve, _| {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_1(
                &resolve, timeout_ms, &expired,
            );
        });

        let race = Promise::race(&Array::of2(&promise, &deadline));
        let value = JsFuture::from(race).await.map_err(|e| rejection(&e))?;
        if Object::is(&value, &expired) {
            log::debug!("{} timed out after {}ms", method, timeout_ms);
            return Err(WalletError::Timeout);
        }
        Ok(value)
    }

    /// First account of an `eth_requestAccounts` / `eth_accounts` result.
    pub fn first_account(value: &JsValue) -> Option<String> {
        Array::from(value).get(0).as_string()
    }

    /// Call a zero-argument method (e.g. `disconnect`) if the object has it.
    pub async fn call_if_present(&self, name: &str) -> Result<(), WalletError> {
        let Ok(function) = self.method(name) else {
            return Ok(());
        };
        let result = function.call0(&self.object).map_err(|e| rejection(&e))?;
        if let Ok(promise) = result.dyn_into::<Promise>() {
            JsFuture::from(promise).await.map_err(|e| rejection(&e))?;
        }
        Ok(())
    }

    /// Register `callback` for `event`; the listener is removed when the
    /// returned subscription is dropped.
    pub fn on(
        &self,
        event: &'static str,
        callback: impl Fn(JsValue) + 'static,
    ) -> Result<EventSubscription, WalletError> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn Fn(JsValue)>);
        self.method("on")?
            .call2(&self.object, &event.into(), closure.as_ref())
            .map_err(|_| WalletError::RequestCreationFailed)?;

        Ok(EventSubscription {
            provider: self.clone(),
            event,
            closure,
        })
    }
}

/// A live provider event listener.
pub struct EventSubscription {
    provider: Eip1193,
    event: &'static str,
    closure: Closure<dyn Fn(JsValue)>,
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Ok(remove) = self.provider.method("removeListener") {
            let _ = remove.call2(
                &self.provider.object,
                &self.event.into(),
                self.closure.as_ref(),
            );
        }
    }
}

/// Convert a rejected promise value into a [`WalletError`].
///
/// EIP-1193 rejections are `{ code, message }`; some mobile wallets nest
/// the real code under `data.originalError.code`.
fn rejection(error: &JsValue) -> WalletError {
    let number = |value: &JsValue, key: &str| {
        Reflect::get(value, &key.into())
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as i64)
    };

    let nested = Reflect::get(error, &"data".into())
        .ok()
        .and_then(|data| Reflect::get(&data, &"originalError".into()).ok())
        .and_then(|original| number(&original, "code"));

    let code = match (number(error, "code"), nested) {
        (Some(codes::INTERNAL_ERROR), Some(inner)) => inner,
        (Some(code), _) => code,
        (None, Some(inner)) => inner,
        (None, None) => UNSPECIFIED_CODE,
    };

    let message = Reflect::get(error, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{:?}", error));

    WalletError::rpc(code, message)
}
