//! Handing a payment URI to the platform.
//!
//! The actual URL-open capability belongs to the host platform; the codec
//! only decides *what* to open. [`UrlOpener`] is the seam the host plugs
//! into.

use crate::errors::Result;
use tracing::{info, warn};

/// Platform URL-open capability.
///
/// `can_open` is a best-effort probe, not a guarantee - platform handler
/// registries can be stale or report false positives.
pub trait UrlOpener {
    /// Whether some installed handler claims this URI.
    fn can_open(&self, url: &str) -> bool;
    /// Opens the URI in its handler.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens the wallet-app URI if a handler claims it, otherwise the web
/// fallback. All errors are swallowed into the returned flag.
pub(crate) fn open_with_fallback(opener: &dyn UrlOpener, app_url: &str, web_url: &str) -> bool {
    let target = if opener.can_open(app_url) {
        app_url
    } else {
        info!("No handler for the TWINT scheme, falling back to the web URL.");
        web_url
    };
    match opener.open(target) {
        Ok(()) => {
            info!("Opened payment URL: {}", target);
            true
        }
        Err(e) => {
            warn!("Failed to open payment URL '{}': {}", target, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::Mutex;

    /// Records every open attempt; configurable probe answer and failure.
    pub(crate) struct RecordingOpener {
        pub(crate) can_open_answer: bool,
        pub(crate) fail_open: bool,
        pub(crate) opened: Mutex<Vec<String>>,
    }

    impl RecordingOpener {
        pub(crate) fn new(can_open_answer: bool) -> Self {
            Self {
                can_open_answer,
                fail_open: false,
                opened: Mutex::new(Vec::new()),
            }
        }
    }

    impl UrlOpener for RecordingOpener {
        fn can_open(&self, _url: &str) -> bool {
            self.can_open_answer
        }

        fn open(&self, url: &str) -> Result<()> {
            if self.fail_open {
                return Err(Error::UrlOpen("simulated open failure".to_string()));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_opens_app_url_when_handler_present() {
        let opener = RecordingOpener::new(true);
        assert!(open_with_fallback(&opener, "twint://pay?amount=1.00", "https://web"));
        assert_eq!(
            opener.opened.lock().unwrap().as_slice(),
            ["twint://pay?amount=1.00"]
        );
    }

    #[test]
    fn test_falls_back_to_web_url_without_handler() {
        let opener = RecordingOpener::new(false);
        assert!(open_with_fallback(&opener, "twint://pay?amount=1.00", "https://web"));
        assert_eq!(opener.opened.lock().unwrap().as_slice(), ["https://web"]);
    }

    #[test]
    fn test_open_failure_is_swallowed_into_false() {
        let mut opener = RecordingOpener::new(true);
        opener.fail_open = true;
        assert!(!open_with_fallback(&opener, "twint://pay", "https://web"));
        assert!(opener.opened.lock().unwrap().is_empty());
    }
}
