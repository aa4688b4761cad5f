use super::ModuleKey;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersonError {
    #[error("person has no {0} module")]
    MissingModule(ModuleKey),

    #[error("person already has a {0} module")]
    DuplicateModule(ModuleKey),
}

impl GameError for PersonError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingModule(_) => "PERSON_MISSING_MODULE",
            Self::DuplicateModule(_) => "PERSON_DUPLICATE_MODULE",
        }
    }
}
