//! Per-kind movement rules.
//!
//! Every special case of the movement rules is a flag in this table, so the
//! ray caster never branches on piece identity.

use cotulenh_core::{Direction, PieceKind, Unit};

/// Range value meaning "until blocked or off the board".
pub const UNLIMITED: u8 = u8::MAX;

/// Movement and capture configuration for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRules {
    /// Maximum distance of a non-capturing move.
    pub move_range: u8,
    /// Maximum distance of a capture.
    pub capture_range: u8,
    /// Whether the unit may travel diagonally at all.
    pub diagonal: bool,
    /// Cap on both ranges along diagonals.
    pub diagonal_cap: Option<u8>,
    /// Moves pass through occupied squares.
    pub move_ignores_blocking: bool,
    /// Captures reach past occupied squares.
    pub capture_ignores_blocking: bool,
    /// Movement is not stopped by terrain the unit cannot stand on.
    pub shoots_over_terrain: bool,
    /// Neither movement nor capture cares about terrain along the way.
    pub ignores_terrain: bool,
    /// May capture in both the replace and the stay shape at once.
    pub both_capture_shapes: bool,
    /// Flight is checked against enemy air-defense zones.
    pub air_defense_gated: bool,
    /// Capture range drops by one against targets that are not navy.
    pub naval_gun: bool,
    /// Crosses the river only over the bridges.
    pub heavy: bool,
    /// May not stand in open line of sight of the enemy commander.
    pub flying_general: bool,
    /// The line-of-sight rule does not see this unit while it is carried.
    pub hidden_when_carried: bool,
    /// Radius of the air-defense zone, zero for non-defenders.
    pub defense_radius: u8,
}

impl PieceRules {
    const PLAIN: PieceRules = PieceRules {
        move_range: 1,
        capture_range: 1,
        diagonal: false,
        diagonal_cap: None,
        move_ignores_blocking: false,
        capture_ignores_blocking: false,
        shoots_over_terrain: false,
        ignores_terrain: false,
        both_capture_shapes: false,
        air_defense_gated: false,
        naval_gun: false,
        heavy: false,
        flying_general: false,
        hidden_when_carried: false,
        defense_radius: 0,
    };

    /// Rules of a non-heroic unit of the given kind.
    pub const fn base(kind: PieceKind) -> PieceRules {
        match kind {
            PieceKind::Commander => PieceRules {
                move_range: UNLIMITED,
                flying_general: true,
                hidden_when_carried: true,
                ..Self::PLAIN
            },
            PieceKind::Infantry | PieceKind::Engineer => Self::PLAIN,
            PieceKind::Militia => PieceRules {
                diagonal: true,
                ..Self::PLAIN
            },
            PieceKind::Tank => PieceRules {
                move_range: 2,
                capture_range: 2,
                shoots_over_terrain: true,
                ..Self::PLAIN
            },
            PieceKind::Artillery => PieceRules {
                move_range: 3,
                capture_range: 3,
                diagonal: true,
                capture_ignores_blocking: true,
                heavy: true,
                ..Self::PLAIN
            },
            PieceKind::AntiAir => PieceRules {
                heavy: true,
                defense_radius: 1,
                ..Self::PLAIN
            },
            PieceKind::Missile => PieceRules {
                move_range: 2,
                capture_range: 2,
                diagonal: true,
                diagonal_cap: Some(1),
                capture_ignores_blocking: true,
                heavy: true,
                defense_radius: 2,
                ..Self::PLAIN
            },
            PieceKind::AirForce => PieceRules {
                move_range: 4,
                capture_range: 4,
                diagonal: true,
                move_ignores_blocking: true,
                capture_ignores_blocking: true,
                ignores_terrain: true,
                both_capture_shapes: true,
                air_defense_gated: true,
                ..Self::PLAIN
            },
            PieceKind::Navy => PieceRules {
                move_range: 4,
                capture_range: 4,
                diagonal: true,
                capture_ignores_blocking: true,
                naval_gun: true,
                defense_radius: 1,
                ..Self::PLAIN
            },
            PieceKind::Headquarter => PieceRules {
                move_range: 0,
                capture_range: 0,
                ..Self::PLAIN
            },
        }
    }

    /// Rules of a unit, heroic bonuses applied.
    pub const fn for_unit(unit: Unit) -> PieceRules {
        let base = Self::base(unit.kind);
        if !unit.heroic {
            return base;
        }
        PieceRules {
            move_range: bump(base.move_range),
            capture_range: bump(base.capture_range),
            diagonal: true,
            diagonal_cap: match base.diagonal_cap {
                Some(cap) => Some(cap + 1),
                None => None,
            },
            defense_radius: if base.defense_radius > 0 {
                base.defense_radius + 1
            } else {
                0
            },
            ..base
        }
    }

    /// Directions this unit may travel in.
    pub fn directions(&self) -> &'static [Direction] {
        if self.diagonal {
            &Direction::ALL
        } else {
            &Direction::ORTHOGONAL
        }
    }

    /// Move range along `direction`.
    #[inline]
    pub const fn move_range_toward(&self, direction: Direction) -> u8 {
        self.capped(self.move_range, direction)
    }

    /// Capture range along `direction` against a target, naval gun applied.
    #[inline]
    pub const fn capture_range_toward(&self, direction: Direction, target_is_navy: bool) -> u8 {
        let range = if self.naval_gun && !target_is_navy {
            self.capture_range.saturating_sub(1)
        } else {
            self.capture_range
        };
        self.capped(range, direction)
    }

    /// Furthest square along `direction` this unit can affect at all.
    #[inline]
    pub const fn reach_toward(&self, direction: Direction) -> u8 {
        let move_range = self.move_range_toward(direction);
        let capture_range = self.capture_range_toward(direction, true);
        if move_range > capture_range {
            move_range
        } else {
            capture_range
        }
    }

    const fn capped(&self, range: u8, direction: Direction) -> u8 {
        match self.diagonal_cap {
            Some(cap) if direction.is_diagonal() && cap < range => cap,
            _ => range,
        }
    }
}

const fn bump(range: u8) -> u8 {
    if range == UNLIMITED {
        range
    } else {
        range + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotulenh_core::Color;

    #[test]
    fn base_ranges() {
        assert_eq!(PieceRules::base(PieceKind::Tank).move_range, 2);
        assert_eq!(PieceRules::base(PieceKind::Artillery).capture_range, 3);
        assert_eq!(PieceRules::base(PieceKind::Commander).move_range, UNLIMITED);
        assert_eq!(PieceRules::base(PieceKind::Commander).capture_range, 1);
        assert_eq!(PieceRules::base(PieceKind::Headquarter).move_range, 0);
    }

    #[test]
    fn defenders() {
        let defenders: Vec<PieceKind> = PieceKind::ALL
            .into_iter()
            .filter(|kind| PieceRules::base(*kind).defense_radius > 0)
            .collect();
        assert_eq!(
            defenders,
            vec![PieceKind::AntiAir, PieceKind::Missile, PieceKind::Navy]
        );
    }

    #[test]
    fn heroic_bonus() {
        let tank = PieceRules::for_unit(Unit::heroic(PieceKind::Tank, Color::Red));
        assert_eq!(tank.move_range, 3);
        assert!(tank.diagonal);

        let commander = PieceRules::for_unit(Unit::heroic(PieceKind::Commander, Color::Red));
        assert_eq!(commander.move_range, UNLIMITED);
        assert_eq!(commander.capture_range, 2);

        let hq = PieceRules::for_unit(Unit::heroic(PieceKind::Headquarter, Color::Red));
        assert_eq!(hq.move_range, 1);

        let missile = PieceRules::for_unit(Unit::heroic(PieceKind::Missile, Color::Red));
        assert_eq!(missile.defense_radius, 3);
        assert_eq!(missile.diagonal_cap, Some(2));

        let infantry = PieceRules::for_unit(Unit::heroic(PieceKind::Infantry, Color::Red));
        assert_eq!(infantry.defense_radius, 0);
    }

    #[test]
    fn missile_diagonal_cap() {
        let missile = PieceRules::base(PieceKind::Missile);
        assert_eq!(missile.move_range_toward(Direction::NORTH), 2);
        assert_eq!(missile.move_range_toward(Direction::NORTH_EAST), 1);
    }

    #[test]
    fn naval_gun_range() {
        let navy = PieceRules::base(PieceKind::Navy);
        assert_eq!(navy.capture_range_toward(Direction::EAST, true), 4);
        assert_eq!(navy.capture_range_toward(Direction::EAST, false), 3);
        assert_eq!(navy.reach_toward(Direction::EAST), 4);
    }
}
