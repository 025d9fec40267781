//! Per-kind "last shown" listings and 1-based index resolution.
//!
//! Each entity kind owns exactly one listing. A listing-producing command
//! replaces it wholesale and bumps its generation; indices always resolve
//! against the current listing, so an index that was only valid in a
//! superseded listing fails instead of silently naming another entity.

use std::collections::HashMap;
use std::fmt;

use rollcall_types::{EntityId, EntityKind};

use crate::command::DisplayIndex;

/// Displayed indices start at 1.
const DISPLAY_OFFSET: usize = 1;

/// An immutable snapshot of what was last shown for one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    generation: u64,
    items: Vec<EntityId>,
}

impl Listing {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A displayed index outside the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub kind: EntityKind,
    pub index: usize,
    /// Length of the current listing.
    pub len: usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let IndexOutOfRange { kind, index, len } = self;
        match len {
            0 => write!(
                f,
                "{kind} index {index} is invalid: no {} are listed",
                kind.plural()
            ),
            1 => write!(f, "{kind} index {index} is invalid: only 1 {kind} is listed"),
            n => write!(
                f,
                "{kind} index {index} is invalid: choose 1 to {n} from the {kind} listing"
            ),
        }
    }
}

impl std::error::Error for IndexOutOfRange {}

/// Holds the current listing for every entity kind.
#[derive(Debug, Default)]
pub struct IndexResolver {
    listings: HashMap<EntityKind, Listing>,
    last_generation: u64,
}

impl IndexResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing for `kind`, returning its new generation.
    pub fn replace_listing(&mut self, kind: EntityKind, items: Vec<EntityId>) -> u64 {
        self.last_generation += 1;
        let listing = Listing {
            generation: self.last_generation,
            items,
        };
        tracing::debug!(
            kind = %kind,
            generation = listing.generation,
            len = listing.len(),
            "listing replaced"
        );
        self.listings.insert(kind, listing);
        self.last_generation
    }

    /// Resolve a 1-based displayed index against the current listing of `kind`.
    pub fn resolve(&self, kind: EntityKind, index: usize) -> Result<EntityId, IndexOutOfRange> {
        let listing = self.listings.get(&kind);
        let len = listing.map_or(0, Listing::len);
        index
            .checked_sub(DISPLAY_OFFSET)
            .and_then(|slot| listing.and_then(|l| l.items.get(slot)))
            .copied()
            .ok_or(IndexOutOfRange { kind, index, len })
    }

    pub fn resolve_display(&self, target: DisplayIndex) -> Result<EntityId, IndexOutOfRange> {
        self.resolve(target.kind, target.position)
    }

    pub fn listing(&self, kind: EntityKind) -> Option<&Listing> {
        self.listings.get(&kind)
    }

    /// Generation of the current listing for `kind`; 0 if never shown.
    pub fn generation(&self, kind: EntityKind) -> u64 {
        self.listings.get(&kind).map_or(0, Listing::generation)
    }
}
