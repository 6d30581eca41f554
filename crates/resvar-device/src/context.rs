//! Device context snapshot and the probe seam.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Snapshot of the device facts node conditions are evaluated against.
///
/// Captured once per process. The language tag is the one field that can
/// change at runtime; it is re-read through the probe when the embedder
/// delivers a language-change notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceContext {
    /// Screen density in DPI
    pub screen_dpi: u32,

    /// Screen width in pixels
    pub screen_width: u32,

    /// Large-screen flag
    pub screen_large: bool,

    /// Screen bits-per-pixel
    pub screen_bpp: u32,

    /// Platform version (e.g., "2.4.0")
    pub platform_version: String,

    /// Current language tag (e.g., "en", "ko")
    pub language: String,
}

/// Errors from device queries
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device fact unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of device facts.
///
/// Implementations must be `Send + Sync`; the resolver keeps the probe for
/// the process lifetime and re-queries only the language tag.
pub trait DeviceProbe: Send + Sync {
    /// Capture a full device snapshot.
    fn probe(&self) -> Result<DeviceContext, DeviceError>;

    /// Re-read the current language tag.
    ///
    /// Called after a language-change notification; the rest of the
    /// snapshot stays memoized.
    fn probe_language(&self) -> Result<String, DeviceError> {
        self.probe().map(|context| context.language)
    }
}

/// Probe backed by a fixed, mutable-in-place context.
///
/// Clones share state, so a test or embedder can hold one handle to adjust
/// the language while the resolver holds another.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    inner: Arc<Mutex<DeviceContext>>,
}

impl StaticProbe {
    /// Create a probe that always reports `context`.
    pub fn new(context: DeviceContext) -> Self {
        Self {
            inner: Arc::new(Mutex::new(context)),
        }
    }

    /// Replace the reported language tag.
    pub fn set_language(&self, language: impl Into<String>) {
        let mut context = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        context.language = language.into();
    }

    /// Current context as reported by the probe.
    pub fn context(&self) -> DeviceContext {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DeviceProbe for StaticProbe {
    fn probe(&self) -> Result<DeviceContext, DeviceError> {
        Ok(self.context())
    }

    fn probe_language(&self) -> Result<String, DeviceError> {
        Ok(self.context().language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> DeviceContext {
        DeviceContext {
            screen_dpi: 300,
            screen_width: 720,
            screen_large: false,
            screen_bpp: 32,
            platform_version: "2.4.0".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_static_probe_reports_context() {
        let probe = StaticProbe::new(sample_context());
        let context = probe.probe().unwrap();
        assert_eq!(context, sample_context());
    }

    #[test]
    fn test_set_language_visible_through_clones() {
        let probe = StaticProbe::new(sample_context());
        let handle = probe.clone();

        handle.set_language("ko");

        assert_eq!(probe.probe_language().unwrap(), "ko");
        // Remaining facts untouched
        assert_eq!(probe.probe().unwrap().screen_dpi, 300);
    }

    #[test]
    fn test_context_serialization() {
        let context = sample_context();
        let toml = toml::to_string(&context).unwrap();
        let parsed: DeviceContext = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, context);
    }
}
