//! Piece kinds and single units.

use crate::{Color, Terrain};
use serde::{Deserialize, Serialize};

/// The eleven kinds of pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Commander = 0,
    Infantry = 1,
    Tank = 2,
    Militia = 3,
    Engineer = 4,
    Artillery = 5,
    AntiAir = 6,
    Missile = 7,
    AirForce = 8,
    Navy = 9,
    Headquarter = 10,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 11] = [
        PieceKind::Commander,
        PieceKind::Infantry,
        PieceKind::Tank,
        PieceKind::Militia,
        PieceKind::Engineer,
        PieceKind::Artillery,
        PieceKind::AntiAir,
        PieceKind::Missile,
        PieceKind::AirForce,
        PieceKind::Navy,
        PieceKind::Headquarter,
    ];

    /// Returns the index of this kind (0-10).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the letter for this kind with the given color.
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Commander => 'c',
            PieceKind::Infantry => 'i',
            PieceKind::Tank => 't',
            PieceKind::Militia => 'm',
            PieceKind::Engineer => 'e',
            PieceKind::Artillery => 'a',
            PieceKind::AntiAir => 'g',
            PieceKind::Missile => 's',
            PieceKind::AirForce => 'f',
            PieceKind::Navy => 'n',
            PieceKind::Headquarter => 'h',
        };
        match color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Blue => c,
        }
    }

    /// Parses a letter into a kind and color.
    pub const fn from_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Blue
        };
        let kind = match c.to_ascii_lowercase() {
            'c' => PieceKind::Commander,
            'i' => PieceKind::Infantry,
            't' => PieceKind::Tank,
            'm' => PieceKind::Militia,
            'e' => PieceKind::Engineer,
            'a' => PieceKind::Artillery,
            'g' => PieceKind::AntiAir,
            's' => PieceKind::Missile,
            'f' => PieceKind::AirForce,
            'n' => PieceKind::Navy,
            'h' => PieceKind::Headquarter,
            _ => return None,
        };
        Some((kind, color))
    }

    /// True if units of this kind can stand on the given terrain.
    #[inline]
    pub const fn can_stand_on(self, terrain: Terrain) -> bool {
        match self {
            PieceKind::Navy => terrain.admits_naval(),
            _ => terrain.admits_land(),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Commander => "Commander",
            PieceKind::Infantry => "Infantry",
            PieceKind::Tank => "Tank",
            PieceKind::Militia => "Militia",
            PieceKind::Engineer => "Engineer",
            PieceKind::Artillery => "Artillery",
            PieceKind::AntiAir => "AntiAir",
            PieceKind::Missile => "Missile",
            PieceKind::AirForce => "AirForce",
            PieceKind::Navy => "Navy",
            PieceKind::Headquarter => "Headquarter",
        };
        write!(f, "{}", name)
    }
}

/// A single, unstacked unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub kind: PieceKind,
    pub color: Color,
    /// Heroic units gain range and diagonal movement.
    #[serde(default)]
    pub heroic: bool,
}

impl Unit {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Unit {
            kind,
            color,
            heroic: false,
        }
    }

    #[inline]
    pub const fn heroic(kind: PieceKind, color: Color) -> Self {
        Unit {
            kind,
            color,
            heroic: true,
        }
    }

    /// Returns the same unit with the heroic flag set.
    #[inline]
    pub const fn promoted(self) -> Self {
        Unit {
            heroic: true,
            ..self
        }
    }

    #[inline]
    pub const fn can_stand_on(self, terrain: Terrain) -> bool {
        self.kind.can_stand_on(terrain)
    }

    /// Returns the letter for this unit, prefixed by `+` when heroic.
    pub fn symbol(self) -> String {
        let c = self.kind.to_char(self.color);
        if self.heroic {
            format!("+{}", c)
        } else {
            c.to_string()
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_char() {
        assert_eq!(PieceKind::Navy.to_char(Color::Red), 'N');
        assert_eq!(PieceKind::Navy.to_char(Color::Blue), 'n');
        assert_eq!(PieceKind::AntiAir.to_char(Color::Red), 'G');
        assert_eq!(PieceKind::Missile.to_char(Color::Blue), 's');
    }

    #[test]
    fn kind_from_char() {
        assert_eq!(
            PieceKind::from_char('F'),
            Some((PieceKind::AirForce, Color::Red))
        );
        assert_eq!(
            PieceKind::from_char('h'),
            Some((PieceKind::Headquarter, Color::Blue))
        );
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn chars_round_trip() {
        for kind in PieceKind::ALL {
            for color in Color::ALL {
                assert_eq!(
                    PieceKind::from_char(kind.to_char(color)),
                    Some((kind, color))
                );
            }
        }
    }

    #[test]
    fn terrain_admission() {
        assert!(PieceKind::Navy.can_stand_on(Terrain::Water));
        assert!(PieceKind::Navy.can_stand_on(Terrain::Mixed));
        assert!(!PieceKind::Navy.can_stand_on(Terrain::Land));
        assert!(!PieceKind::AirForce.can_stand_on(Terrain::Water));
        assert!(PieceKind::Tank.can_stand_on(Terrain::Mixed));
    }

    #[test]
    fn unit_symbol() {
        assert_eq!(Unit::new(PieceKind::Tank, Color::Red).symbol(), "T");
        assert_eq!(Unit::heroic(PieceKind::Tank, Color::Blue).symbol(), "+t");
        assert!(Unit::new(PieceKind::Tank, Color::Red).promoted().heroic);
    }
}
