use crate::domain::{FrameId, StepKey};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("frame {0} is no longer on the stack")]
    StaleFrame(FrameId),
    #[error("payload for {found} cannot be attached to a {expected} frame")]
    PayloadMismatch { expected: StepKey, found: StepKey },
    #[error("invalid host config: {0}")]
    InvalidHostConfig(String),
    #[error("nothing on the stack to show")]
    EmptyStack,
}

pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NavError::StaleFrame(FrameId::new(4));
        assert_eq!(err.to_string(), "frame #4 is no longer on the stack");

        let err = NavError::PayloadMismatch {
            expected: StepKey::Chats,
            found: StepKey::Wallet,
        };
        assert_eq!(
            err.to_string(),
            "payload for wallet cannot be attached to a chats frame"
        );
    }
}
