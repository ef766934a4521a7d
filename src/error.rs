use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuarryError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Wizard error: {0}")]
    Wizard(#[from] crate::wizard::error::WizardError),
}

pub type Result<T> = std::result::Result<T, QuarryError>;
