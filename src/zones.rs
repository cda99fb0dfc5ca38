//! Zones

use std::{borrow::Borrow, fmt};

use smallvec::SmallVec;

/// A named grouping of destinations, e.g. `ΑΘΗΝΑ`.
///
/// Zones carry no identity beyond their name; two zones with the same name are the same zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Zone(String);

impl Zone {
    /// Creates a zone from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Zone(name.into())
    }

    /// Returns the zone name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the name is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(name: &str) -> Self {
        Zone::new(name)
    }
}

impl From<String> for Zone {
    fn from(name: String) -> Self {
        Zone(name)
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Zone {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Zone {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Zone {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Small ordered set of zones attached to carriers and offers.
pub type ZoneList = SmallVec<[Zone; 4]>;

/// Builds a zone list from names, dropping duplicates while keeping first-seen order.
pub fn zone_list<I, Z>(names: I) -> ZoneList
where
    I: IntoIterator<Item = Z>,
    Z: Into<Zone>,
{
    let mut zones = ZoneList::new();

    for zone in names.into_iter().map(Into::into) {
        if !zones.contains(&zone) {
            zones.push(zone);
        }
    }

    zones
}

/// Replaces `old` with `new` in the list, collapsing any duplicate the rename produces.
///
/// Returns true if the list changed.
pub(crate) fn rename_in(zones: &mut ZoneList, old: &Zone, new: &Zone) -> bool {
    if !zones.contains(old) {
        return false;
    }

    let renamed = zone_list(
        zones
            .drain(..)
            .map(|zone| if zone == *old { new.clone() } else { zone }),
    );

    *zones = renamed;

    true
}

/// Removes `zone` from the list. Returns true if it was present.
pub(crate) fn remove_from(zones: &mut ZoneList, zone: &Zone) -> bool {
    let before = zones.len();

    zones.retain(|z| z != zone);

    zones.len() != before
}
