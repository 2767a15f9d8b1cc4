//! Timed alert flag

use serde::{Deserialize, Serialize};

/// Default alert duration in seconds
pub const DEFAULT_ALERT_DURATION: f64 = 30.0;

/// Alert raised by a noise, expiring on the simulation clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertTimer {
    expires_at: Option<f64>,
}

impl AlertTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise (or refresh) the alert until `now + duration`
    pub fn raise(&mut self, now: f64, duration: f64) {
        let until = now + duration;
        self.expires_at = Some(self.expires_at.map_or(until, |t| t.max(until)));
    }

    /// Check if alerted at time `now`
    pub fn is_active(&self, now: f64) -> bool {
        self.expires_at.is_some_and(|t| now < t)
    }

    /// Clear an expired alert; returns true if it just expired
    pub fn expire(&mut self, now: f64) -> bool {
        match self.expires_at {
            Some(t) if now >= t => {
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the alert immediately
    pub fn clear(&mut self) {
        self.expires_at = None;
    }

    pub fn expires_at(&self) -> Option<f64> {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_expires() {
        let mut alert = AlertTimer::new();
        assert!(!alert.is_active(0.0));

        alert.raise(10.0, DEFAULT_ALERT_DURATION);
        assert!(alert.is_active(10.0));
        assert!(alert.is_active(39.9));
        assert!(!alert.is_active(40.0));

        assert!(!alert.expire(39.0));
        assert!(alert.expire(40.0));
        assert_eq!(alert.expires_at(), None);
    }

    #[test]
    fn test_raise_never_shortens() {
        let mut alert = AlertTimer::new();
        alert.raise(0.0, 30.0);
        alert.raise(5.0, 1.0);
        assert_eq!(alert.expires_at(), Some(30.0));
        alert.raise(20.0, 30.0);
        assert_eq!(alert.expires_at(), Some(50.0));
    }
}
