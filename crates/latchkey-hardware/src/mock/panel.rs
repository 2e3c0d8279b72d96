//! Mock status panel for testing and development.

use crate::mock::Journal;
use crate::traits::TextPanel;
use crate::types::TextSize;
use crate::{HardwareError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Mock text panel that records every rendered message.
///
/// Cloneable; clones share the render log, so a test can keep one clone for
/// observation and wire the other into the status display.
#[derive(Debug, Clone)]
pub struct MockPanel {
    journal: Journal,
    rendered: Arc<Mutex<Vec<(String, TextSize)>>>,
    initialized: Arc<AtomicBool>,
    fail_init: bool,
}

impl MockPanel {
    /// Create a mock panel recording into `journal`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            rendered: Arc::new(Mutex::new(Vec::new())),
            initialized: Arc::new(AtomicBool::new(false)),
            fail_init: false,
        }
    }

    /// Create a mock panel whose `init` fails, for the fatal-startup path.
    pub fn failing(journal: &Journal) -> Self {
        Self {
            fail_init: true,
            ..Self::new(journal)
        }
    }

    /// Whether `init` has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// All rendered messages, oldest first.
    pub fn rendered(&self) -> Vec<(String, TextSize)> {
        match self.rendered.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The most recently rendered message text, if any.
    pub fn last_text(&self) -> Option<String> {
        self.rendered().last().map(|(text, _)| text.clone())
    }
}

impl TextPanel for MockPanel {
    async fn init(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(HardwareError::initialization_failed(
                "panel did not acknowledge",
            ));
        }
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn render(&mut self, text: &str, size: TextSize) -> Result<()> {
        match self.rendered.lock() {
            Ok(mut guard) => guard.push((text.to_string(), size)),
            Err(poisoned) => poisoned.into_inner().push((text.to_string(), size)),
        }
        self.journal.record(format!("display '{text}'"));
        Ok(())
    }
}
