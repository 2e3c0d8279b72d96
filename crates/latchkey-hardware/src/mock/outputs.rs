//! Mock output sinks: actuator, indicator lamp, sounder.
//!
//! Each mock is cloneable; clones share state, so a test can keep one clone
//! for observation and wire the other into the peripherals bundle. Every
//! driven operation also records into the shared [`Journal`] so cross-device
//! ordering can be asserted.

use crate::mock::Journal;
use crate::traits::{IndicatorLamp, LockActuator, Sounder};
use crate::{HardwareError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock lock actuator that records engage/retract transitions.
#[derive(Debug, Clone)]
pub struct MockActuator {
    journal: Journal,
    engaged: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
}

impl MockActuator {
    /// Create a retracted mock actuator recording into `journal`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            engaged: Arc::new(AtomicBool::new(false)),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the bolt is currently engaged.
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    /// Make subsequent drives fail, for error-path tests.
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl LockActuator for MockActuator {
    async fn set_engaged(&mut self, engaged: bool) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HardwareError::other("actuator drive failed"));
        }
        self.engaged.store(engaged, Ordering::SeqCst);
        self.journal.record(if engaged {
            "actuator engaged"
        } else {
            "actuator retracted"
        });
        Ok(())
    }
}

/// Mock indicator lamp.
#[derive(Debug, Clone)]
pub struct MockLamp {
    journal: Journal,
    lit: Arc<AtomicBool>,
}

impl MockLamp {
    /// Create an extinguished mock lamp recording into `journal`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            lit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the lamp is currently lit.
    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }
}

impl IndicatorLamp for MockLamp {
    async fn set_lit(&mut self, lit: bool) -> Result<()> {
        self.lit.store(lit, Ordering::SeqCst);
        self.journal
            .record(if lit { "lamp lit" } else { "lamp dark" });
        Ok(())
    }
}

/// Mock sounder that records each pulse instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockSounder {
    journal: Journal,
    pulses: Arc<Mutex<Vec<Duration>>>,
}

impl MockSounder {
    /// Create a silent mock sounder recording into `journal`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            pulses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All pulses played so far, in order.
    pub fn pulses(&self) -> Vec<Duration> {
        match self.pulses.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Sounder for MockSounder {
    async fn pulse(&mut self, duration: Duration) -> Result<()> {
        match self.pulses.lock() {
            Ok(mut guard) => guard.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
        self.journal
            .record(format!("sounder pulse {}ms", duration.as_millis()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_actuator_state_shared_across_clones() {
        let journal = Journal::new();
        let actuator = MockActuator::new(&journal);
        let observer = actuator.clone();

        let mut wired = actuator;
        wired.set_engaged(true).await.unwrap();

        assert!(observer.is_engaged());
        assert_eq!(journal.labels(), vec!["actuator engaged"]);
    }

    #[tokio::test]
    async fn test_mock_actuator_failure() {
        let journal = Journal::new();
        let mut actuator = MockActuator::new(&journal);
        actuator.fail_next(true);

        assert!(actuator.set_engaged(true).await.is_err());
        assert!(journal.is_empty());
    }

    #[tokio::test]
    async fn test_mock_lamp() {
        let journal = Journal::new();
        let mut lamp = MockLamp::new(&journal);

        lamp.set_lit(true).await.unwrap();
        assert!(lamp.is_lit());

        lamp.set_lit(false).await.unwrap();
        assert!(!lamp.is_lit());
        assert_eq!(journal.labels(), vec!["lamp lit", "lamp dark"]);
    }

    #[tokio::test]
    async fn test_mock_sounder_records_pulses() {
        let journal = Journal::new();
        let mut sounder = MockSounder::new(&journal);

        sounder.pulse(Duration::from_millis(500)).await.unwrap();
        sounder.pulse(Duration::from_millis(100)).await.unwrap();

        assert_eq!(
            sounder.pulses(),
            vec![Duration::from_millis(500), Duration::from_millis(100)]
        );
        assert_eq!(
            journal.labels(),
            vec!["sounder pulse 500ms", "sounder pulse 100ms"]
        );
    }
}
