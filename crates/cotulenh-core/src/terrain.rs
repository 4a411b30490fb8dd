//! Terrain classes and the river.

use crate::{File, Square};

/// The terrain class of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Open water: files a and b.
    Water,
    /// Coast (file c) and the four river squares d6, e6, d7, e7.
    Mixed,
    /// Everything else.
    Land,
}

impl Terrain {
    /// Returns the terrain of a square.
    pub const fn of(square: Square) -> Terrain {
        let file = square.file_index();
        let rank = square.rank_index();
        if file <= 1 {
            Terrain::Water
        } else if file == 2 || ((file == 3 || file == 4) && (rank == 5 || rank == 6)) {
            Terrain::Mixed
        } else {
            Terrain::Land
        }
    }

    /// True if naval units can stand here.
    #[inline]
    pub const fn admits_naval(self) -> bool {
        matches!(self, Terrain::Water | Terrain::Mixed)
    }

    /// True if land-based units can stand here.
    #[inline]
    pub const fn admits_land(self) -> bool {
        matches!(self, Terrain::Land | Terrain::Mixed)
    }
}

impl Square {
    /// Returns the terrain of this square.
    #[inline]
    pub const fn terrain(self) -> Terrain {
        Terrain::of(self)
    }

    /// True if a step from `self` to `to` crosses the river between ranks 6
    /// and 7.
    #[inline]
    pub const fn crosses_river(self, to: Square) -> bool {
        (self.rank_index() <= 5) != (to.rank_index() <= 5)
    }

    /// True if a step from `self` to `to` runs straight along one of the
    /// bridge files (f and h).
    #[inline]
    pub const fn is_bridge_step(self, to: Square) -> bool {
        let file = self.file_index();
        file == to.file_index() && (file == File::F as u8 || file == File::H as u8)
    }
}
