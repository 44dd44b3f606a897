//! Magnetic status state machine.
//!
//! The reed switch reports 0 when the mailbox flap closes the contact.
//! A notification is due on every transition *into* 0; repeated identical
//! readings never re-trigger.
//!
//! The status starts at 0, so a first reading of 0 after startup matches the
//! initial state and does not notify.

/// Mask applied to every observed value.
pub const STATUS_MASK: u8 = 0x0F;

/// Result of feeding one reading into [`MailboxStatus::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The reading matched the stored status; nothing changed.
    Unchanged {
        /// The stored (and observed) status.
        current: u8,
    },
    /// The status changed to a non-zero value.
    Changed {
        /// Status before the update.
        previous: u8,
        /// Status after the update.
        current: u8,
    },
    /// The status changed to 0: mail has arrived.
    MailArrived {
        /// Status before the update.
        previous: u8,
    },
}

impl StatusUpdate {
    /// Whether this update calls for a notification.
    pub fn should_notify(&self) -> bool {
        matches!(self, StatusUpdate::MailArrived { .. })
    }

    /// Whether the stored status changed.
    pub fn is_transition(&self) -> bool {
        !matches!(self, StatusUpdate::Unchanged { .. })
    }

    /// The status after the update.
    pub fn current(&self) -> u8 {
        match *self {
            StatusUpdate::Unchanged { current } | StatusUpdate::Changed { current, .. } => current,
            StatusUpdate::MailArrived { .. } => 0,
        }
    }
}

/// Last-known magnetic status of the mailbox sensor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    current: u8,
}

impl MailboxStatus {
    /// Create a status at the initial value 0.
    pub fn new() -> Self {
        MailboxStatus { current: 0 }
    }

    /// Create a status that starts from a known reading.
    pub fn with_initial(value: u8) -> Self {
        MailboxStatus {
            current: value & STATUS_MASK,
        }
    }

    /// The stored status.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Apply a new reading.
    ///
    /// Only the low 4 bits of `value` are kept.
    pub fn update(&mut self, value: u8) -> StatusUpdate {
        let value = value & STATUS_MASK;
        if value == self.current {
            return StatusUpdate::Unchanged { current: value };
        }

        let previous = self.current;
        self.current = value;
        if value == 0 {
            StatusUpdate::MailArrived { previous }
        } else {
            StatusUpdate::Changed {
                previous,
                current: value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifications(status: &mut MailboxStatus, values: &[u8]) -> usize {
        values
            .iter()
            .filter(|&&v| status.update(v).should_notify())
            .count()
    }

    #[test]
    fn test_initial_state_is_zero() {
        assert_eq!(MailboxStatus::new().current(), 0);
        assert_eq!(MailboxStatus::default().current(), 0);
    }

    #[test]
    fn test_first_zero_does_not_notify() {
        let mut status = MailboxStatus::new();
        assert_eq!(status.update(0), StatusUpdate::Unchanged { current: 0 });
        assert_eq!(status.current(), 0);
    }

    #[test]
    fn test_repeated_value_notifies_once() {
        let mut status = MailboxStatus::new();
        assert_eq!(
            status.update(5),
            StatusUpdate::Changed { previous: 0, current: 5 }
        );
        assert_eq!(status.update(5), StatusUpdate::Unchanged { current: 5 });

        let mut status = MailboxStatus::with_initial(5);
        assert_eq!(notifications(&mut status, &[0, 0]), 1);
    }

    #[test]
    fn test_transition_into_zero_notifies() {
        let mut status = MailboxStatus::new();
        assert!(!status.update(3).should_notify());
        let update = status.update(0);
        assert_eq!(update, StatusUpdate::MailArrived { previous: 3 });
        assert!(update.should_notify());
        assert_eq!(update.current(), 0);
    }

    #[test]
    fn test_alternating_values() {
        let mut status = MailboxStatus::new();
        assert_eq!(notifications(&mut status, &[1, 0, 1, 0]), 2);
    }

    #[test]
    fn test_nonzero_to_nonzero() {
        let mut status = MailboxStatus::with_initial(1);
        let update = status.update(2);
        assert!(update.is_transition());
        assert!(!update.should_notify());
        assert_eq!(update.current(), 2);
    }

    #[test]
    fn test_value_is_masked() {
        let mut status = MailboxStatus::new();
        assert_eq!(
            status.update(0x83),
            StatusUpdate::Changed { previous: 0, current: 3 }
        );
        assert_eq!(status.update(0xF0), StatusUpdate::MailArrived { previous: 3 });
        assert_eq!(MailboxStatus::with_initial(0x1A).current(), 0x0A);
    }
}
