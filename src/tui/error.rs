use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key binding error: {0}")]
    KeyBinding(String),

    #[error("Render error: {0}")]
    Render(String),
}
