//! Annotated move representation.
//!
//! A [`Move`] is produced by the rules engine and carries, besides the
//! origin/destination squares and the special-move flag, descriptive
//! annotations used by search heuristics: the moving piece, the captured
//! piece and whether the move gives check. Moves are immutable once built.

use crate::{Piece, Square};
use std::fmt;

/// Special move kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Ordinary move or capture.
    Normal = 0,
    /// Pawn double push from its starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    PromoteKnight = 5,
    PromoteBishop = 6,
    PromoteRook = 7,
    PromoteQueen = 8,
}

impl MoveFlag {
    const fn from_bits(bits: u32) -> MoveFlag {
        match bits {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::CastleKingside,
            3 => MoveFlag::CastleQueenside,
            4 => MoveFlag::EnPassant,
            5 => MoveFlag::PromoteKnight,
            6 => MoveFlag::PromoteBishop,
            7 => MoveFlag::PromoteRook,
            8 => MoveFlag::PromoteQueen,
            _ => MoveFlag::Normal,
        }
    }

    /// Returns the flag promoting to `piece`, if `piece` is a legal promotion target.
    pub const fn promotion(piece: Piece) -> Option<MoveFlag> {
        match piece {
            Piece::Knight => Some(MoveFlag::PromoteKnight),
            Piece::Bishop => Some(MoveFlag::PromoteBishop),
            Piece::Rook => Some(MoveFlag::PromoteRook),
            Piece::Queen => Some(MoveFlag::PromoteQueen),
            Piece::Pawn | Piece::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion flag.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::PromoteKnight => Some(Piece::Knight),
            MoveFlag::PromoteBishop => Some(Piece::Bishop),
            MoveFlag::PromoteRook => Some(Piece::Rook),
            MoveFlag::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const FLAG_SHIFT: u32 = 12;
const PIECE_SHIFT: u32 = 16;
const CAPTURE_SHIFT: u32 = 19;
const CHECK_BIT: u32 = 1 << 22;

const SQUARE_MASK: u32 = 0x3F;
const FLAG_MASK: u32 = 0xF;
const PIECE_MASK: u32 = 0x7;

/// Bits identifying the action itself (squares and flag), without annotations.
const ACTION_MASK: u32 = 0xFFFF;

/// A chess move with optional descriptive annotations.
///
/// Packed into 32 bits: from (6), to (6), flag (4), moving piece (3),
/// captured piece (3), gives-check (1). Piece fields store `index + 1`
/// so that zero means "not annotated".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// A placeholder that is never a legal move.
    pub const NULL: Move = Move(0);

    /// Creates an unannotated move.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move(
            ((from.index() as u32) << FROM_SHIFT)
                | ((to.index() as u32) << TO_SHIFT)
                | ((flag as u32) << FLAG_SHIFT),
        )
    }

    /// Creates an unannotated move without special flags.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Returns a copy annotated with the moving piece.
    #[inline]
    pub const fn with_piece(self, piece: Piece) -> Self {
        let cleared = self.0 & !(PIECE_MASK << PIECE_SHIFT);
        Move(cleared | ((piece.index() as u32 + 1) << PIECE_SHIFT))
    }

    /// Returns a copy annotated with the captured piece.
    #[inline]
    pub const fn with_capture(self, victim: Piece) -> Self {
        let cleared = self.0 & !(PIECE_MASK << CAPTURE_SHIFT);
        Move(cleared | ((victim.index() as u32 + 1) << CAPTURE_SHIFT))
    }

    /// Returns a copy marked as giving check.
    #[inline]
    pub const fn with_check(self) -> Self {
        Move(self.0 | CHECK_BIT)
    }

    /// Returns the origin square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_wrapping(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_wrapping(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    /// Returns the special-move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits((self.0 >> FLAG_SHIFT) & FLAG_MASK)
    }

    /// Returns the moving piece, if annotated.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        let bits = (self.0 >> PIECE_SHIFT) & PIECE_MASK;
        if bits == 0 {
            None
        } else {
            Piece::from_index(bits as usize - 1)
        }
    }

    /// Returns the captured piece, if this move is an annotated capture.
    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        let bits = (self.0 >> CAPTURE_SHIFT) & PIECE_MASK;
        if bits == 0 {
            None
        } else {
            Piece::from_index(bits as usize - 1)
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured().is_some()
    }

    #[inline]
    pub const fn gives_check(self) -> bool {
        self.0 & CHECK_BIT != 0
    }

    /// Returns the promotion piece, if any.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.flag().promotion_piece()
    }

    /// Returns true if both moves describe the same action, ignoring annotations.
    #[inline]
    pub const fn same_action(self, other: Move) -> bool {
        self.0 & ACTION_MASK == other.0 & ACTION_MASK
    }

    /// Returns true if both moves share squares and promotion piece.
    ///
    /// UCI strings cannot express castling or en passant flags, so this is the
    /// comparison used when resolving user input against generated moves.
    pub fn matches_uci(self, other: Move) -> bool {
        self.from() == other.from()
            && self.to() == other.to()
            && self.promotion() == other.promotion()
    }

    /// Returns the UCI notation for this move (e.g. `"e2e4"`, `"e7e8q"`).
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(piece) => format!("{}{}{}", self.from(), self.to(), piece.letter()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Parses UCI notation into an unannotated move.
    ///
    /// Castling and en passant flags cannot be inferred from the string;
    /// resolve the result against generated moves with [`Move::matches_uci`].
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let flag = match s[4..].chars().next() {
            None => MoveFlag::Normal,
            Some(c) => match Piece::from_fen_char(c) {
                Some((piece, _)) => MoveFlag::promotion(piece)?,
                None => return None,
            },
        };
        Some(Move::new(from, to, flag))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}", self.to_uci())?;
        if let Some(victim) = self.captured() {
            write!(f, " x{}", victim.letter())?;
        }
        if self.gives_check() {
            write!(f, "+")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
