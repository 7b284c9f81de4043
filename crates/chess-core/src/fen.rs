//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed and validated FEN fields.
///
/// Field-level validation only; whether the described position is
/// reachable (king count, pawns on back ranks) is left to the rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Occupied squares in a8..h1 reading order.
    pub pieces: Vec<(Square, Piece, Color)>,
    pub side_to_move: Color,
    /// Castling availability as written, e.g. `"KQkq"` or `"-"`.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    ///
    /// The halfmove clock and fullmove number may be omitted and default
    /// to 0 and 1.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let pieces = Self::parse_placement(parts[0])?;

        let side_to_move = Color::from_fen_field(parts[1])
            .ok_or_else(|| FenError::InvalidActiveColor(parts[1].to_string()))?;

        Self::validate_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = match parts.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(field.to_string()))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(field.to_string()))?,
            None => 1,
        };

        Ok(FenParser {
            pieces,
            side_to_move,
            castling: parts[2].to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Vec<(Square, Piece, Color)>, FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut pieces = Vec::with_capacity(32);
        for (row, text) in rows.iter().enumerate() {
            let rank_number = 8 - row;
            let rank = Rank::ALL[7 - row];
            let mut file = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "invalid empty-square count '{}' in rank {}",
                            c, rank_number
                        )));
                    }
                    file += skip as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let square = File::from_index(file).map(|f| Square::new(f, rank));
                    match square {
                        Some(square) => pieces.push((square, piece, color)),
                        None => {
                            return Err(FenError::InvalidPiecePlacement(format!(
                                "rank {} overflows the board",
                                rank_number
                            )))
                        }
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank_number
                    )));
                }
                if file > 8 {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "rank {} overflows the board",
                        rank_number
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank_number, file
                )));
            }
        }
        Ok(pieces)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        if castling.is_empty() {
            return Err(FenError::InvalidCastlingRights(castling.to_string()));
        }
        for (i, c) in castling.chars().enumerate() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if castling[..i].contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate right '{}'",
                    c
                )));
            }
        }
        Ok(())
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(field) {
            Some(square) if matches!(square.rank(), Rank::R3 | Rank::R6) => Ok(Some(square)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Renders the piece placement field.
    pub fn placement_string(&self) -> String {
        let mut grid = [None; 64];
        for &(square, piece, color) in &self.pieces {
            grid[square.index() as usize] = Some(piece.to_fen_char(color));
        }

        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match grid[rank * 8 + file] {
                    Some(c) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(c);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Converts the parsed FEN back to a full six-field FEN string.
    pub fn to_fen(&self) -> String {
        let ep = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.placement_string(),
            self.side_to_move.to_fen_char(),
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.pieces.len(), 32);
        assert!(fen.pieces.contains(&(Square::E1, Piece::King, Color::White)));
        assert!(fen.pieces.contains(&(Square::D8, Piece::Queen, Color::Black)));
    }

    #[test]
    fn clocks_are_optional() {
        let fen = FenParser::parse("8/8/8/4k3/8/8/8/4K3 b - -").unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.to_fen(), "8/8/8/4k3/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = FenParser::parse(original).unwrap();
        assert_eq!(parsed.en_passant, Square::from_algebraic("e3"));
        assert_eq!(parsed.to_fen(), original);
    }

    #[test]
    fn invalid_part_count() {
        assert!(matches!(
            FenParser::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 1 extra"),
            Err(FenError::InvalidPartCount(7))
        ));
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        for bad in [
            "8/8/8/8/8/8/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w - - 0 1",
            "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            "7/8/8/8/8/8/8/8 w - - 0 1",
            "08/8/8/8/8/8/8/8 w - - 0 1",
            "p8/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            assert!(
                matches!(FenParser::parse(bad), Err(FenError::InvalidPiecePlacement(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn invalid_en_passant() {
        for bad in ["abc", "x3", "e4"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {} 0 1", bad);
            assert!(matches!(
                FenParser::parse(&fen),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
    }

    #[test]
    fn invalid_clocks() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn partial_castling_is_kept_verbatim() {
        let fen = FenParser::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap();
        assert_eq!(fen.castling, "Kq");
    }

    #[test]
    fn error_messages_carry_the_offending_text() {
        let err = FenError::InvalidActiveColor("x".to_string());
        assert!(err.to_string().contains("'x'"));
        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(err.to_string().contains("z9"));
    }
}
