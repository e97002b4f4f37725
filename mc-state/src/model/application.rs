/// Cached volume and mute state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplicationState {
    /// `None` until the first fetch or notification
    pub volume: Option<u8>,
    pub muted: bool,
}

impl ApplicationState {
    pub fn new(volume: u8, muted: bool) -> Self {
        Self {
            volume: Some(volume),
            muted,
        }
    }

    pub fn is_known(&self) -> bool {
        self.volume.is_some()
    }
}
