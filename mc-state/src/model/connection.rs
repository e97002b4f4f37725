use mc_api::ErrorInfo;

/// Result of the last liveness check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    NoResult,
    Success,
    Error(ErrorInfo),
}

impl ConnectionStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, ConnectionStatus::NoResult)
    }

    /// Success repeats and errors with the same code are not changes
    pub fn differs_from(&self, next: &ConnectionStatus) -> bool {
        match (self, next) {
            (ConnectionStatus::Success, ConnectionStatus::Success) => false,
            (ConnectionStatus::Error(a), ConnectionStatus::Error(b)) => !a.same_error(b),
            (ConnectionStatus::NoResult, ConnectionStatus::NoResult) => false,
            _ => true,
        }
    }
}
