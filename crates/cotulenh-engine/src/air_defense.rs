//! Air-defense zones.
//!
//! Anti-air, missile and navy units protect every square within a circular
//! radius of their own square. Enemy air units flying through protected
//! squares are shot down; the first zone they enter still allows a suicide
//! strike at that square.
//!
//! Zones are rebuilt from the whole board whenever the board reports a
//! change to a defense-capable unit, so lookups are a single map read.

use crate::rules::PieceRules;
use crate::Board;
use cotulenh_core::{Color, Direction, Square};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Squares of the units defending one square.
pub type Defenders = SmallVec<[Square; 4]>;

/// Protected squares of both colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirDefense {
    /// Indexed by the defending color.
    zones: [HashMap<Square, Defenders>; 2],
}

impl AirDefense {
    /// Computes the zones of every defender on the board.
    ///
    /// Passengers defend as well as carriers.
    pub fn build(board: &Board) -> Self {
        let mut defense = AirDefense::default();
        for color in Color::ALL {
            let zones = &mut defense.zones[color.index()];
            for (origin, unit) in board.units_of(color) {
                let radius = PieceRules::for_unit(unit).defense_radius;
                for square in zone(origin, radius) {
                    let defenders = zones.entry(square).or_default();
                    if !defenders.contains(&origin) {
                        defenders.push(origin);
                    }
                }
            }
        }
        defense
    }

    /// Squares of the units protecting `square` against air units of
    /// `against`.
    pub fn defenders(&self, square: Square, against: Color) -> &[Square] {
        self.zones[against.opposite().index()]
            .get(&square)
            .map(|defenders| defenders.as_slice())
            .unwrap_or(&[])
    }

    /// True if air units of `against` are unsafe on `square`.
    #[inline]
    pub fn is_defended(&self, square: Square, against: Color) -> bool {
        !self.defenders(square, against).is_empty()
    }

    /// Outcome of an air unit of color `against` flying `distance` steps from
    /// `from` along `direction`.
    ///
    /// The defender standing on `exclude` is ignored; a unit being struck
    /// does not engage the strike aimed at it. Any engagement before the last
    /// step means the unit never arrives.
    pub fn flight(
        &self,
        from: Square,
        direction: Direction,
        distance: u8,
        against: Color,
        exclude: Option<Square>,
    ) -> AirOutcome {
        let mut walk = AirDefenseWalk::new(self, against, exclude);
        let mut square = from;
        for step in 1..=distance {
            square = match square.offset(direction) {
                Some(next) => next,
                None => return AirOutcome::Destroyed,
            };
            let outcome = walk.step(square);
            if step == distance {
                return outcome;
            }
            if outcome != AirOutcome::SafePass {
                return AirOutcome::Destroyed;
            }
        }
        AirOutcome::SafePass
    }
}

/// Squares within `radius` of `origin`, by exact circular distance.
fn zone(origin: Square, radius: u8) -> impl Iterator<Item = Square> {
    let r = radius as i16;
    let file = origin.file_index() as i16;
    let rank = origin.rank_index() as i16;
    (-r..=r)
        .flat_map(move |df| (-r..=r).map(move |dr| (df, dr)))
        .filter(move |(df, dr)| radius > 0 && df * df + dr * dr <= r * r)
        .filter_map(move |(df, dr)| {
            let f = file + df;
            let k = rank + dr;
            if f < 0 || k < 0 {
                return None;
            }
            Square::from_coords(f as u8, k as u8)
        })
}

/// Result of one step of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirOutcome {
    /// Not engaged.
    SafePass,
    /// Engaged by a single zone: a suicide strike is possible here.
    Kamikaze,
    /// Engaged by a second zone, or by a zone after leaving one.
    Destroyed,
}

/// Tracks the zones an air unit has flown through.
#[derive(Debug, Clone)]
pub struct AirDefenseWalk<'a> {
    defense: &'a AirDefense,
    against: Color,
    exclude: Option<Square>,
    engaged: Defenders,
    entered: bool,
    left: bool,
}

impl<'a> AirDefenseWalk<'a> {
    pub fn new(defense: &'a AirDefense, against: Color, exclude: Option<Square>) -> Self {
        AirDefenseWalk {
            defense,
            against,
            exclude,
            engaged: Defenders::new(),
            entered: false,
            left: false,
        }
    }

    /// Steps onto `square`.
    pub fn step(&mut self, square: Square) -> AirOutcome {
        let mut defended = false;
        for &defender in self.defense.defenders(square, self.against) {
            if Some(defender) == self.exclude {
                continue;
            }
            defended = true;
            if !self.engaged.contains(&defender) {
                self.engaged.push(defender);
            }
        }

        if !defended {
            if self.entered {
                self.left = true;
            }
            return AirOutcome::SafePass;
        }

        self.entered = true;
        if self.left || self.engaged.len() > 1 {
            AirOutcome::Destroyed
        } else {
            AirOutcome::Kamikaze
        }
    }
}
