use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("unknown backing storage type: {0}")]
    InvalidBackingStorage(String),

    #[error("unknown deployment kind: {0}")]
    InvalidDeployment(String),

    #[error("invalid network reference (expected namespace/name): {0}")]
    InvalidNetworkRef(String),

    #[error("invalid endpoint (expected host:port): {0}")]
    InvalidEndpoint(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
