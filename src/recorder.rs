//! Recording trigger
//!
//! Capture itself is done by the browser. This only decides what a press of
//! the record button means. Capture needs the page to be served over HTTP;
//! from `file:` the button refuses.

/// Container the browser is asked for, in order of preference
pub const PREFERRED_MIME: &str = "video/webm; codecs=vp9";
pub const FALLBACK_MIME: &str = "video/webm";

/// Name of the downloaded file
pub const EXPORT_FILE_NAME: &str = "bounce-recording.webm";

/// Canvas capture rate
pub const CAPTURE_FPS: f64 = 30.0;
/// Recorder chunk interval in milliseconds
pub const CHUNK_MS: i32 = 100;

/// Hint shown when capture is not possible
pub const HTTP_HINT: &str = "Recording requires HTTP. Run: python3 -m http.server 8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

/// What the glue should do after a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCommand {
    Start,
    Stop,
    /// Capture is unavailable in this context
    Refuse,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    state: RecordingState,
    /// Whether the page was opened from `file:`
    local_file: bool,
}

impl Recorder {
    pub fn new(protocol: &str) -> Self {
        let local_file = protocol == "file:";
        if local_file {
            log::warn!("{}", HTTP_HINT);
        }
        Self {
            state: RecordingState::Idle,
            local_file,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Handle a press of the record button
    pub fn toggle(&mut self) -> RecordCommand {
        match self.state {
            RecordingState::Idle if self.local_file => RecordCommand::Refuse,
            RecordingState::Idle => {
                self.state = RecordingState::Recording;
                log::info!("Recording started");
                RecordCommand::Start
            }
            RecordingState::Recording => {
                self.state = RecordingState::Idle;
                log::info!("Recording stopped");
                RecordCommand::Stop
            }
        }
    }

    /// Abandon a capture the browser failed to start
    pub fn abort(&mut self) {
        if self.is_recording() {
            log::warn!("Recording aborted");
            self.state = RecordingState::Idle;
        }
    }
}

/// Pick the best supported container
pub fn choose_mime(is_supported: impl Fn(&str) -> bool) -> &'static str {
    if is_supported(PREFERRED_MIME) {
        PREFERRED_MIME
    } else {
        FALLBACK_MIME
    }
}
