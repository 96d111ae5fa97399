//! Slot paths
//!
//! A [`SlotPath`] addresses one position in a weapon's attachment tree as a
//! sequence of slot names, written dot-joined (`"Muzzle.Suppressor"`).
//! Segments are validated on construction: non-empty, no surrounding
//! whitespace and no `.` separator inside a name.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEPARATOR: char = '.';

/// Error when building a slot path from a string or slot name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotPathError {
    #[error("Slot path is empty")]
    Empty,

    #[error("Invalid slot name '{0}'")]
    InvalidSegment(String),
}

/// Position of a slot within a weapon's attachment tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SlotPath {
    segments: Vec<String>,
}

impl SlotPath {
    /// Path of a top-level slot on the weapon itself
    pub fn root(slot_name: &str) -> Result<Self, SlotPathError> {
        validate_segment(slot_name)?;
        Ok(Self {
            segments: vec![slot_name.to_string()],
        })
    }

    /// Path of a slot nested inside the modification equipped at `self`
    pub fn child(&self, slot_name: &str) -> Result<Self, SlotPathError> {
        validate_segment(slot_name)?;
        let mut segments = self.segments.clone();
        segments.push(slot_name.to_string());
        Ok(Self { segments })
    }

    /// Parse a dot-joined path such as `"Muzzle.Suppressor"`
    pub fn parse(path: &str) -> Result<Self, SlotPathError> {
        if path.is_empty() {
            return Err(SlotPathError::Empty);
        }
        let segments = path
            .split(SEPARATOR)
            .map(|s| validate_segment(s).map(|_| s.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Slot names from the weapon root down to this slot
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Name of the slot this path points at
    pub fn slot_name(&self) -> &str {
        // Construction guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Nesting depth, 0 for a top-level weapon slot
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// Path of the slot hosting the modification that exposes this slot
    pub fn parent(&self) -> Option<SlotPath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether `self` lies strictly below `ancestor` in the tree
    pub fn is_descendant_of(&self, ancestor: &SlotPath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }
}

fn validate_segment(name: &str) -> Result<(), SlotPathError> {
    if name.is_empty() || name.contains(SEPARATOR) || name.trim() != name {
        return Err(SlotPathError::InvalidSegment(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for SlotPath {
    type Err = SlotPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<SlotPath> for String {
    fn from(path: SlotPath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for SlotPath {
    type Error = SlotPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_and_display() {
        let path = SlotPath::parse("Muzzle.Suppressor").unwrap();
        assert_eq!(path.segments(), ["Muzzle", "Suppressor"]);
        assert_eq!(path.to_string(), "Muzzle.Suppressor");
        assert_eq!(path.slot_name(), "Suppressor");
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_rejects_bad_segments() {
        assert_eq!(SlotPath::parse(""), Err(SlotPathError::Empty));
        assert!(SlotPath::parse("Muzzle..Suppressor").is_err());
        assert!(SlotPath::parse("Muzzle.").is_err());
        assert!(SlotPath::root("Gas.Block").is_err());
        assert!(SlotPath::root(" Stock").is_err());
    }

    #[test]
    fn test_child_and_parent() {
        let muzzle = SlotPath::root("Muzzle").unwrap();
        let suppressor = muzzle.child("Suppressor").unwrap();
        assert_eq!(suppressor.parent(), Some(muzzle.clone()));
        assert_eq!(muzzle.parent(), None);
        assert!(muzzle.is_root());
    }

    #[test]
    fn test_descendant_is_segment_wise() {
        let muzzle = SlotPath::parse("Muzzle").unwrap();
        let nested = SlotPath::parse("Muzzle.Suppressor.Cap").unwrap();
        let lookalike = SlotPath::parse("MuzzleAdapter").unwrap();
        assert!(nested.is_descendant_of(&muzzle));
        assert!(!muzzle.is_descendant_of(&muzzle));
        assert!(!lookalike.is_descendant_of(&muzzle));
    }

    #[test]
    fn test_serializes_as_map_key() {
        let mut map = BTreeMap::new();
        map.insert(SlotPath::parse("Muzzle.Suppressor").unwrap(), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Muzzle.Suppressor":1}"#);

        let back: BTreeMap<SlotPath, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert!(serde_json::from_str::<BTreeMap<SlotPath, i32>>(r#"{"":1}"#).is_err());
    }
}
