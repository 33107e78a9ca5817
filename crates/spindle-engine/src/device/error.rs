use std::fmt;

use super::platform::ConfigAttribs;

/// Failure of a single platform call.
///
/// `code` carries the platform's numeric error code when one exists (for
/// EGL-style APIs the value of `eglGetError()`); backends without codes only
/// fill in `detail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub code: Option<i32>,
    pub detail: String,
}

impl PlatformError {
    pub fn code(code: i32) -> Self {
        Self {
            code: Some(code),
            detail: String::new(),
        }
    }

    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            code: None,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.detail.is_empty()) {
            (Some(code), true) => write!(f, "returned error {code}"),
            (Some(code), false) => write!(f, "returned error {code}: {}", self.detail),
            (None, _) => f.write_str(&self.detail),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Reason a surface could not be bound to a window.
///
/// One variant per acquisition step so the log line names the call that failed.
/// Resources created by earlier steps are already released when this is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AcquireError {
    #[error("get_display() {0}")]
    NoDisplay(PlatformError),
    #[error("initialize() {0}")]
    Initialize(PlatformError),
    #[error("choose_config() {0}")]
    ChooseConfig(PlatformError),
    #[error("no surface configuration matches {0}")]
    NoMatchingConfig(ConfigAttribs),
    #[error("native_format() {0}")]
    FormatQuery(PlatformError),
    #[error("create_surface() {0}")]
    CreateSurface(PlatformError),
    #[error("create_context() {0}")]
    CreateContext(PlatformError),
    #[error("make_current() {0}")]
    MakeCurrent(PlatformError),
    #[error("query_size() {0}")]
    QuerySize(PlatformError),
    #[error("surface has unusable dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Reason a frame could not be presented. Never fatal to the render loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PresentError {
    #[error("begin_frame() {0}")]
    BeginFrame(PlatformError),
    #[error("swap_buffers() {0}")]
    Swap(PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_formats_code_and_detail() {
        assert_eq!(PlatformError::code(12291).to_string(), "returned error 12291");
        assert_eq!(PlatformError::detail("no adapter").to_string(), "no adapter");

        let both = PlatformError {
            code: Some(12297),
            detail: "bad window".into(),
        };
        assert_eq!(both.to_string(), "returned error 12297: bad window");
    }

    #[test]
    fn acquire_error_names_the_failed_call() {
        let err = AcquireError::CreateSurface(PlatformError::code(12299));
        assert_eq!(err.to_string(), "create_surface() returned error 12299");

        let err = AcquireError::InvalidDimensions { width: 0, height: 480 };
        assert_eq!(err.to_string(), "surface has unusable dimensions 0x480");
    }
}
