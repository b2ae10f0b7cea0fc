//! Movement descriptors bound to direction keys.
//!
//! Invariants:
//! - A relative direction scales its deltas by a typed count.
//! - An absolute or percentage direction takes a typed count as its target
//!   instead of scaling it.

use std::fmt;

use serde::Serialize;

use crate::key::KeySequence;

/// A movement descriptor.
///
/// An axis that was never declared stays `None`, so a count can fill in the
/// target of `<home>`-style directions without inventing an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Direction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<i64>,
    pub absolute: bool,
    pub percentage: bool,
    pub pages: bool,
}

impl Direction {
    pub fn down(down: i64) -> Self {
        Self {
            down: Some(down),
            ..Self::default()
        }
    }

    pub fn right(right: i64) -> Self {
        Self {
            right: Some(right),
            ..Self::default()
        }
    }

    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self
    }

    pub fn percentage(mut self) -> Self {
        self.percentage = true;
        self
    }

    pub fn pages(mut self) -> Self {
        self.pages = true;
        self
    }

    /// True when `down`/`right` are deltas from the current position.
    pub fn is_relative(&self) -> bool {
        !self.absolute && !self.percentage
    }

    /// The target position of an absolute or percentage direction.
    pub fn target(&self) -> Option<i64> {
        if self.is_relative() {
            return None;
        }
        self.down.or(self.right)
    }

    /// Apply a count typed in front of the direction keys.
    pub fn with_count(mut self, count: Option<u32>) -> Self {
        let Some(count) = count else {
            return self;
        };
        let count = i64::from(count);

        if self.is_relative() {
            self.down = self.down.map(|d| d.saturating_mul(count));
            self.right = self.right.map(|r| r.saturating_mul(count));
        } else if self.down.is_some() || self.right.is_none() {
            self.down = Some(count);
        } else {
            self.right = Some(count);
        }
        self
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(down) = self.down {
            parts.push(format!("down={down}"));
        }
        if let Some(right) = self.right {
            parts.push(format!("right={right}"));
        }
        for (flag, name) in [
            (self.absolute, "absolute"),
            (self.percentage, "percentage"),
            (self.pages, "pages"),
        ] {
            if flag {
                parts.push(name.to_string());
            }
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// What a direction key is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionEntry {
    /// Resolves to the direction bound under another key sequence.
    Alias(KeySequence),
    Direction(Direction),
}

impl fmt::Display for DirectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionEntry::Alias(target) => write!(f, "-> {target}"),
            DirectionEntry::Direction(direction) => write!(f, "{direction}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_count_scales_delta() {
        let dir = Direction::down(1).with_count(Some(5));
        assert_eq!(dir.down, Some(5));
        assert_eq!(dir.target(), None);

        let up = Direction::down(-1).with_count(Some(3));
        assert_eq!(up.down, Some(-3));
    }

    #[test]
    fn test_no_count_is_identity() {
        let dir = Direction::down(-1).pages();
        assert_eq!(dir.with_count(None), dir);
    }

    #[test]
    fn test_absolute_count_replaces_target() {
        let home = Direction::down(0).absolute();
        assert_eq!(home.target(), Some(0));
        assert_eq!(home.with_count(Some(3)).target(), Some(3));
    }

    #[test]
    fn test_percentage_count_replaces_target() {
        let pct = Direction::down(1).percentage().absolute();
        let moved = pct.with_count(Some(50));
        assert_eq!(moved.down, Some(50));
        assert!(moved.percentage);
    }

    #[test]
    fn test_absolute_right_axis() {
        let end = Direction::right(-1).absolute();
        assert_eq!(end.with_count(Some(4)).right, Some(4));
        assert_eq!(end.with_count(Some(4)).down, None);
    }

    #[test]
    fn test_saturating_scale() {
        let dir = Direction::down(i64::MAX).with_count(Some(2));
        assert_eq!(dir.down, Some(i64::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(Direction::down(0).absolute().to_string(), "down=0 absolute");
        assert_eq!(Direction::right(-1).to_string(), "right=-1");
    }
}
