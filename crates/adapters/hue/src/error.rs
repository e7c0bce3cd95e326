//! Hue adapter error types.

use hued_domain::error::LightingError;

/// Errors talking to the bridge.
#[derive(Debug, thiserror::Error)]
pub enum HueError {
    /// The request failed or the body was not JSON.
    #[error("bridge request failed")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with an error object.
    #[error("bridge error {code} at {address}: {description}")]
    Api {
        code: u64,
        address: String,
        description: String,
    },

    /// The body was JSON but not in the expected shape.
    #[error("unexpected bridge response: {0}")]
    UnexpectedResponse(String),
}

impl From<HueError> for LightingError {
    fn from(err: HueError) -> Self {
        match err {
            HueError::Api {
                code, description, ..
            } => Self::Bridge { code, description },
            other => Self::Transport(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_api_error_into_bridge_error() {
        let err: LightingError = HueError::Api {
            code: 1,
            address: "/".to_string(),
            description: "unauthorized user".to_string(),
        }
        .into();
        assert!(matches!(err, LightingError::Bridge { code: 1, .. }));
    }

    #[test]
    fn should_convert_unexpected_response_into_transport_error() {
        let err: LightingError = HueError::UnexpectedResponse("null".to_string()).into();
        assert!(matches!(err, LightingError::Transport(_)));
    }
}
