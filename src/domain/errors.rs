use derive_more::Display;

/// Chart error taxonomy - one enum for the whole crate
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ChartError {
    /// Empty window, unsupported channel arity, unusable time axis
    #[display(fmt = "Construction Error: {}", _0)]
    Construction(String),
    /// Invalid scale extent or chart configuration
    #[display(fmt = "Config Error: {}", _0)]
    Config(String),
    /// Inversion requested on a degenerate transform
    #[display(fmt = "Singular Transform Error: {}", _0)]
    SingularTransform(String),
    /// Non-finite value where finite-or-NaN is required, or arity mismatch
    #[display(fmt = "Value Error: {}", _0)]
    Value(String),
}

impl std::error::Error for ChartError {}

impl ChartError {
    pub fn is_singular(&self) -> bool {
        matches!(self, ChartError::SingularTransform(_))
    }
}

impl From<ChartError> for wasm_bindgen::JsValue {
    fn from(err: ChartError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
