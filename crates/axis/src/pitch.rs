//! Pitch classes laid out around the circle of fifths.
//!
//! The enum is deliberately in fifths order rather than chromatic order, and
//! each variant's code is the NDLR key CC value (C=1 through F=12). Moving
//! forward one step is a perfect fifth up; six steps is a tritone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of pitch classes.
pub const PITCH_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pitch {
    C = 1,
    G = 2,
    D = 3,
    A = 4,
    E = 5,
    B = 6,
    #[serde(rename = "F#")]
    Fs = 7,
    Db = 8,
    Ab = 9,
    Eb = 10,
    Bb = 11,
    F = 12,
}

impl Pitch {
    /// All pitches in fifths order, starting from C.
    pub const ALL: [Pitch; PITCH_COUNT] = [
        Pitch::C,
        Pitch::G,
        Pitch::D,
        Pitch::A,
        Pitch::E,
        Pitch::B,
        Pitch::Fs,
        Pitch::Db,
        Pitch::Ab,
        Pitch::Eb,
        Pitch::Bb,
        Pitch::F,
    ];

    /// NDLR key CC value (1-12).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Position on the circle of fifths (0-11, C=0).
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Pitch at a circle position, wrapping any integer into 0..12.
    pub fn from_index(index: i64) -> Pitch {
        Self::ALL[index.rem_euclid(PITCH_COUNT as i64) as usize]
    }

    pub fn from_code(code: u8) -> Option<Pitch> {
        match code {
            1..=12 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    /// Display name; sharps use `#`, flats keep `b`.
    pub fn name(self) -> &'static str {
        match self {
            Pitch::C => "C",
            Pitch::G => "G",
            Pitch::D => "D",
            Pitch::A => "A",
            Pitch::E => "E",
            Pitch::B => "B",
            Pitch::Fs => "F#",
            Pitch::Db => "Db",
            Pitch::Ab => "Ab",
            Pitch::Eb => "Eb",
            Pitch::Bb => "Bb",
            Pitch::F => "F",
        }
    }

    /// Chromatic pitch class (C=0, C#=1, ...), handy when talking to anything
    /// that isn't the NDLR.
    pub fn pitch_class(self) -> u8 {
        // A fifth is 7 semitones, so index * 7 walks the chromatic scale.
        ((self.index() * 7) % PITCH_COUNT) as u8
    }

    pub fn from_pitch_class(pitch_class: u8) -> Pitch {
        // 7 is its own inverse mod 12.
        Self::from_index(pitch_class as i64 * 7)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized pitch name: {0:?}")]
pub struct ParsePitchError(pub String);

impl FromStr for Pitch {
    type Err = ParsePitchError;

    /// Accepts a letter with an optional `#`/`s` (sharp) or `b` (flat), so
    /// enharmonic spellings like `Gb` and `C#` resolve to `F#` and `Db`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| ParsePitchError(s.to_string()))?;

        let natural: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(ParsePitchError(s.to_string())),
        };

        let accidental = match chars.as_str() {
            "" => 0,
            "#" | "s" => 1,
            "b" => -1,
            _ => return Err(ParsePitchError(s.to_string())),
        };

        let pitch_class = (natural + accidental).rem_euclid(PITCH_COUNT as i32) as u8;
        Ok(Pitch::from_pitch_class(pitch_class))
    }
}

/// Arithmetic around the circle, anchored at a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleOfFifths {
    root: Pitch,
}

impl CircleOfFifths {
    pub fn new(root: Pitch) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Pitch {
        self.root
    }

    /// The pitch `steps` fifths clockwise from the root.
    pub fn forward(&self, steps: i32) -> Pitch {
        Pitch::from_index(self.root.index() as i64 + steps as i64)
    }

    /// The pitch `steps` fifths counter-clockwise from the root.
    pub fn backward(&self, steps: i32) -> Pitch {
        Pitch::from_index(self.root.index() as i64 - steps as i64)
    }
}

/// The pitch a tritone (six fifths) away.
pub fn tritone_sub(pitch: Pitch) -> Pitch {
    CircleOfFifths::new(pitch).forward(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_fifths_order() {
        for (i, pitch) in Pitch::ALL.iter().enumerate() {
            assert_eq!(pitch.index(), i);
            assert_eq!(pitch.code() as usize, i + 1);
            assert_eq!(Pitch::from_code(pitch.code()), Some(*pitch));
        }
        assert_eq!(Pitch::from_code(0), None);
        assert_eq!(Pitch::from_code(13), None);
    }

    #[test]
    fn test_forward_and_backward_from_c() {
        let circle = CircleOfFifths::new(Pitch::C);
        assert_eq!(circle.forward(1), Pitch::G);
        assert_eq!(circle.forward(3), Pitch::A);
        assert_eq!(circle.forward(12), Pitch::C);
        assert_eq!(circle.backward(1), Pitch::F);
        assert_eq!(circle.backward(2), Pitch::Bb);
    }

    #[test]
    fn test_negative_steps_wrap() {
        let circle = CircleOfFifths::new(Pitch::G);
        assert_eq!(circle.forward(-1), Pitch::C);
        assert_eq!(circle.backward(-1), Pitch::D);
        assert_eq!(circle.backward(25), Pitch::C);
        // -2^31 ≡ 4 (mod 12), so G (index 1) moves to index 5.
        assert_eq!(circle.forward(i32::MIN), Pitch::B);
        assert_eq!(circle.backward(i32::MIN), Pitch::Eb);
    }

    #[test]
    fn test_backward_undoes_forward() {
        for pitch in Pitch::ALL {
            for n in 0..12 {
                let there = CircleOfFifths::new(pitch).forward(n);
                assert_eq!(CircleOfFifths::new(there).backward(n), pitch);
            }
        }
    }

    #[test]
    fn test_tritone_sub_is_an_involution() {
        for pitch in Pitch::ALL {
            assert_ne!(tritone_sub(pitch), pitch);
            assert_eq!(tritone_sub(tritone_sub(pitch)), pitch);
        }
        assert_eq!(tritone_sub(Pitch::C), Pitch::Fs);
        assert_eq!(tritone_sub(Pitch::G), Pitch::Db);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Pitch::Fs.to_string(), "F#");
        assert_eq!(Pitch::Bb.to_string(), "Bb");
        assert_eq!(Pitch::C.to_string(), "C");
    }

    #[test]
    fn test_pitch_class_round_trip() {
        assert_eq!(Pitch::C.pitch_class(), 0);
        assert_eq!(Pitch::G.pitch_class(), 7);
        assert_eq!(Pitch::F.pitch_class(), 5);
        assert_eq!(Pitch::Db.pitch_class(), 1);
        for pitch in Pitch::ALL {
            assert_eq!(Pitch::from_pitch_class(pitch.pitch_class()), pitch);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("C".parse::<Pitch>(), Ok(Pitch::C));
        assert_eq!("f#".parse::<Pitch>(), Ok(Pitch::Fs));
        assert_eq!("Fs".parse::<Pitch>(), Ok(Pitch::Fs));
        assert_eq!("Gb".parse::<Pitch>(), Ok(Pitch::Fs));
        assert_eq!("C#".parse::<Pitch>(), Ok(Pitch::Db));
        assert_eq!(" Bb ".parse::<Pitch>(), Ok(Pitch::Bb));
        assert!("H".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
        assert!("C##".parse::<Pitch>().is_err());
    }
}
