use thiserror::Error;

/// Errors raised by the dossier library
#[derive(Error, Debug)]
pub enum DossierError {
  #[error("Request to {endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },

  #[error("Could not decode response from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },

  #[error("Invalid configuration: {message}")]
  InvalidConfig { message: String },

  #[error("Failed to render {view}: {message}")]
  Render { view: String, message: String },

  #[error("Analysis session {id} not found")]
  SessionNotFound { id: String },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl DossierError {
  pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
    Self::Transport { endpoint: endpoint.into(), message: message.to_string() }
  }

  pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
    Self::Decode { endpoint: endpoint.into(), message: message.to_string() }
  }

  pub fn invalid_config(message: impl Into<String>) -> Self {
    Self::InvalidConfig { message: message.into() }
  }

  pub fn render(view: impl Into<String>, message: impl ToString) -> Self {
    Self::Render { view: view.into(), message: message.to_string() }
  }

  pub fn session_not_found(id: impl ToString) -> Self {
    Self::SessionNotFound { id: id.to_string() }
  }
}

pub type Result<T> = std::result::Result<T, DossierError>;
