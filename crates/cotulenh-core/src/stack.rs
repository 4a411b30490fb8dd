//! Pieces on the board: a carrier unit with up to two passengers.
//!
//! Which kinds may ride on which carrier is fixed by a table of typed slots.
//! A [`Piece`] can only be built through the validating constructors, so
//! every value in circulation obeys the table.

use crate::{Color, PieceKind, Terrain, Unit};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// The flattened units of a piece, carrier first.
pub type Units = SmallVec<[Unit; 3]>;

/// Errors raised when units cannot form a stack.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("a stack needs at least one unit")]
    Empty,

    #[error("a stack holds at most 3 units, got {0}")]
    TooManyUnits(usize),

    #[error("units of both colors cannot share a stack")]
    MixedColors,

    #[error("{0} appears twice in one stack")]
    DuplicateKind(PieceKind),

    #[error("no unit among [{0}] can carry the others")]
    NoCarrier(String),
}

/// Carrier kinds, tried in this order when forming a stack.
const CARRIER_PRIORITY: [PieceKind; 5] = [
    PieceKind::Navy,
    PieceKind::AirForce,
    PieceKind::Tank,
    PieceKind::Engineer,
    PieceKind::Headquarter,
];

const NAVY_SLOTS: &[&[PieceKind]] = &[
    &[PieceKind::AirForce],
    &[
        PieceKind::Commander,
        PieceKind::Infantry,
        PieceKind::Militia,
        PieceKind::Tank,
    ],
];
const AIR_FORCE_SLOTS: &[&[PieceKind]] = &[&[
    PieceKind::Tank,
    PieceKind::Infantry,
    PieceKind::Militia,
    PieceKind::Commander,
]];
const TANK_SLOTS: &[&[PieceKind]] = &[&[
    PieceKind::Commander,
    PieceKind::Infantry,
    PieceKind::Militia,
]];
const ENGINEER_SLOTS: &[&[PieceKind]] = &[&[
    PieceKind::Artillery,
    PieceKind::AntiAir,
    PieceKind::Missile,
]];
const HEADQUARTER_SLOTS: &[&[PieceKind]] = &[&[PieceKind::Commander]];

/// Passenger slots of a carrier kind; each slot lists the kinds it admits.
pub const fn carrier_slots(kind: PieceKind) -> &'static [&'static [PieceKind]] {
    match kind {
        PieceKind::Navy => NAVY_SLOTS,
        PieceKind::AirForce => AIR_FORCE_SLOTS,
        PieceKind::Tank => TANK_SLOTS,
        PieceKind::Engineer => ENGINEER_SLOTS,
        PieceKind::Headquarter => HEADQUARTER_SLOTS,
        _ => &[],
    }
}

/// A piece occupying one square: a single unit or a stack.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Unit>", into = "Vec<Unit>")]
pub struct Piece {
    carrier: Unit,
    passengers: [Option<Unit>; 2],
}

impl Piece {
    /// Creates a plain, non-heroic single unit.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self::single(Unit::new(kind, color))
    }

    /// Wraps one unit.
    #[inline]
    pub const fn single(unit: Unit) -> Self {
        Piece {
            carrier: unit,
            passengers: [None, None],
        }
    }

    /// Forms a stack from 1-3 units of one color.
    pub fn from_units(units: &[Unit]) -> Result<Self, StackError> {
        let Some(first) = units.first() else {
            return Err(StackError::Empty);
        };
        if units.len() > 3 {
            return Err(StackError::TooManyUnits(units.len()));
        }
        if units.iter().any(|u| u.color != first.color) {
            return Err(StackError::MixedColors);
        }
        for (i, unit) in units.iter().enumerate() {
            if units[i + 1..].iter().any(|u| u.kind == unit.kind) {
                return Err(StackError::DuplicateKind(unit.kind));
            }
        }
        if units.len() == 1 {
            return Ok(Piece::single(*first));
        }

        for carrier_kind in CARRIER_PRIORITY {
            let Some(pos) = units.iter().position(|u| u.kind == carrier_kind) else {
                continue;
            };
            let others: Units = units
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != pos)
                .map(|(_, u)| *u)
                .collect();
            if let Some(piece) = Self::load(units[pos], &others) {
                return Ok(piece);
            }
        }

        let names: Vec<String> = units.iter().map(|u| u.kind.to_string()).collect();
        Err(StackError::NoCarrier(names.join(", ")))
    }

    /// Seats `others` on `carrier`, one per slot.
    fn load(carrier: Unit, others: &[Unit]) -> Option<Self> {
        let slots = carrier_slots(carrier.kind);
        if others.len() > slots.len() {
            return None;
        }
        let mut passengers = [None, None];
        if Self::seat(slots, others, &mut passengers) {
            Some(Piece {
                carrier,
                passengers,
            })
        } else {
            None
        }
    }

    fn seat(slots: &[&[PieceKind]], others: &[Unit], passengers: &mut [Option<Unit>; 2]) -> bool {
        let Some((unit, rest)) = others.split_first() else {
            return true;
        };
        for (i, admitted) in slots.iter().enumerate() {
            if passengers[i].is_none() && admitted.contains(&unit.kind) {
                passengers[i] = Some(*unit);
                if Self::seat(slots, rest, passengers) {
                    return true;
                }
                passengers[i] = None;
            }
        }
        false
    }

    /// Merges two pieces into one stack.
    pub fn combine(self, other: Piece) -> Result<Piece, StackError> {
        let mut units = self.units();
        units.extend(other.units());
        Self::from_units(&units)
    }

    /// Removes the units of the given kinds and re-forms what is left.
    ///
    /// Returns `Ok(None)` when nothing remains.
    pub fn without(self, kinds: &[PieceKind]) -> Result<Option<Piece>, StackError> {
        let rest: Units = self
            .units()
            .into_iter()
            .filter(|u| !kinds.contains(&u.kind))
            .collect();
        if rest.is_empty() {
            Ok(None)
        } else {
            Self::from_units(&rest).map(Some)
        }
    }

    /// Returns the same piece with the unit of `kind` made heroic.
    pub fn promote(self, kind: PieceKind) -> Piece {
        let mut piece = self;
        if piece.carrier.kind == kind {
            piece.carrier = piece.carrier.promoted();
        }
        for slot in piece.passengers.iter_mut().flatten() {
            if slot.kind == kind {
                *slot = slot.promoted();
            }
        }
        piece
    }

    #[inline]
    pub const fn carrier(&self) -> Unit {
        self.carrier
    }

    /// Kind of the carrier.
    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.carrier.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.carrier.color
    }

    /// True if the carrier is heroic.
    #[inline]
    pub const fn is_heroic(&self) -> bool {
        self.carrier.heroic
    }

    /// Iterates over the passengers in slot order.
    pub fn passengers(&self) -> impl Iterator<Item = Unit> + '_ {
        self.passengers.iter().flatten().copied()
    }

    /// All units, carrier first.
    pub fn units(&self) -> Units {
        let mut units = Units::new();
        units.push(self.carrier);
        units.extend(self.passengers());
        units
    }

    /// Number of units in the piece.
    pub fn len(&self) -> usize {
        1 + self.passengers.iter().flatten().count()
    }

    /// True if the piece carries passengers.
    #[inline]
    pub fn is_stack(&self) -> bool {
        self.passengers.iter().any(Option::is_some)
    }

    /// Returns the unit of the given kind, if present.
    pub fn unit(&self, kind: PieceKind) -> Option<Unit> {
        self.units().into_iter().find(|u| u.kind == kind)
    }

    #[inline]
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.unit(kind).is_some()
    }

    /// True if the unit of `kind` rides as a passenger rather than carrying.
    pub fn carries(&self, kind: PieceKind) -> bool {
        self.passengers().any(|u| u.kind == kind)
    }

    /// True if every unit can stand on the terrain.
    pub fn can_stand_on(&self, terrain: Terrain) -> bool {
        self.carrier.can_stand_on(terrain) && self.passengers().all(|u| u.can_stand_on(terrain))
    }
}

impl From<Unit> for Piece {
    fn from(unit: Unit) -> Self {
        Piece::single(unit)
    }
}

impl TryFrom<Vec<Unit>> for Piece {
    type Error = StackError;

    fn try_from(units: Vec<Unit>) -> Result<Self, Self::Error> {
        Piece::from_units(&units)
    }
}

impl From<Piece> for Vec<Unit> {
    fn from(piece: Piece) -> Self {
        piece.units().into_vec()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_stack() {
            return write!(f, "{}", self.carrier);
        }
        write!(f, "(")?;
        for unit in self.units() {
            write!(f, "{}", unit)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self)
    }
}
