//! Side (player) representation.

/// The two sides of a chess game. White always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors, White first.
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// Returns the other side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the array index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the score sign of this side: +1 for White, -1 for Black.
    ///
    /// Scores are White-relative throughout the workspace, so multiplying by
    /// the sign converts between White-relative and mover-relative values.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Returns the rank step a pawn of this color advances by.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Returns the FEN active-color character.
    #[inline]
    pub const fn to_fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parses a FEN active-color field.
    pub fn from_fen_field(s: &str) -> Option<Self> {
        match s {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opposite()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_and_not_agree() {
        for color in Color::BOTH {
            assert_eq!(!color, color.opposite());
            assert_eq!(color.opposite().opposite(), color);
        }
    }

    #[test]
    fn sign_is_antisymmetric() {
        assert_eq!(Color::White.sign(), 1);
        assert_eq!(Color::Black.sign(), -1);
        assert_eq!(Color::White.sign() + Color::Black.sign(), 0);
    }

    #[test]
    fn fen_field_roundtrip() {
        for color in Color::BOTH {
            let c = color.to_fen_char().to_string();
            assert_eq!(Color::from_fen_field(&c), Some(color));
        }
        assert_eq!(Color::from_fen_field("x"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Color::White.to_string(), "White");
        assert_eq!(Color::Black.to_string(), "Black");
    }
}
