use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => PageError::Js(message),
            None => PageError::Js(format!("{:?}", value)),
        }
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
