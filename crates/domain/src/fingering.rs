use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::note::is_piano_pitch;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Hand {
    Right,
    Left,
}

/// A finger assignment: hand plus digit, thumb = 1 through little finger = 5.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Finger {
    hand: Hand,
    digit: u8,
}

impl Finger {
    pub fn new(hand: Hand, digit: u8) -> Result<Self, DatasetError> {
        if !(1..=5).contains(&digit) {
            return Err(DatasetError::validation(format!(
                "finger digit {digit} outside 1-5"
            )));
        }
        Ok(Self { hand, digit })
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn digit(&self) -> u8 {
        self.digit
    }

    /// Zero-based index across both hands: 0-4 right thumb..little,
    /// 5-9 left thumb..little.
    pub fn part_index(&self) -> u8 {
        match self.hand {
            Hand::Right => self.digit - 1,
            Hand::Left => self.digit + 4,
        }
    }

    pub fn from_part_index(index: u8) -> Result<Self, DatasetError> {
        match index {
            0..=4 => Finger::new(Hand::Right, index + 1),
            5..=9 => Finger::new(Hand::Left, index - 4),
            other => Err(DatasetError::validation(format!(
                "part index {other} outside 0-9"
            ))),
        }
    }
}

/// One normalized note-to-finger assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FingeredNote {
    /// Seconds from the start of the piece.
    pub onset: f64,
    pub offset: f64,
    /// MIDI pitch number, restricted to the piano range (21-108).
    pub pitch: u8,
    pub velocity: u8,
    pub finger: Finger,
}

impl FingeredNote {
    pub fn new(
        onset: f64,
        offset: f64,
        pitch: u8,
        velocity: u8,
        finger: Finger,
    ) -> Result<Self, DatasetError> {
        if !onset.is_finite() || onset < 0.0 {
            return Err(DatasetError::validation(format!("bad onset time {onset}")));
        }
        if !offset.is_finite() || offset < onset {
            return Err(DatasetError::validation(format!(
                "offset {offset} before onset {onset}"
            )));
        }
        if !is_piano_pitch(pitch) {
            return Err(DatasetError::validation(format!(
                "pitch {pitch} outside the piano range"
            )));
        }
        Ok(Self {
            onset,
            offset,
            pitch,
            velocity,
            finger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_digit_validation() {
        assert!(Finger::new(Hand::Right, 0).is_err());
        assert!(Finger::new(Hand::Left, 6).is_err());
        assert!(Finger::new(Hand::Right, 1).is_ok());
    }

    #[test]
    fn part_index_covers_both_hands() {
        assert_eq!(Finger::new(Hand::Right, 1).unwrap().part_index(), 0);
        assert_eq!(Finger::new(Hand::Right, 5).unwrap().part_index(), 4);
        assert_eq!(Finger::new(Hand::Left, 1).unwrap().part_index(), 5);
        assert_eq!(Finger::new(Hand::Left, 5).unwrap().part_index(), 9);
    }

    #[test]
    fn part_index_round_trips() {
        for index in 0..=9 {
            let finger = Finger::from_part_index(index).unwrap();
            assert_eq!(finger.part_index(), index);
        }
        assert!(Finger::from_part_index(10).is_err());
    }

    #[test]
    fn note_validation() {
        let finger = Finger::new(Hand::Right, 1).unwrap();
        assert!(FingeredNote::new(-0.5, 1.0, 60, 80, finger).is_err());
        assert!(FingeredNote::new(1.0, 0.5, 60, 80, finger).is_err());
        assert!(FingeredNote::new(0.0, 0.5, 20, 80, finger).is_err());
        assert!(FingeredNote::new(0.0, 0.5, 60, 80, finger).is_ok());
    }
}
