use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, PartialEq)]
pub enum DomError {
    #[error("browser global `{0}` is unavailable")]
    NoGlobal(&'static str),
    #[error("no element matches `{0}`")]
    Missing(String),
    #[error("element `{selector}` is not a {expected}")]
    WrongType {
        selector: String,
        expected: &'static str,
    },
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("preference storage is unavailable")]
    Unavailable,
    #[error("preference storage rejected the write: {0}")]
    Rejected(String),
}

/// Reserved for a real delivery; the simulated one never fails.
#[derive(Debug, Error, PartialEq)]
#[cfg_attr(not(test), allow(dead_code))]
pub enum SubmitError {
    #[error("submission failed: {0}")]
    Failed(String),
}
