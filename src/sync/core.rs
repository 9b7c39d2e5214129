use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LatticeError, Result};

/// Declarative synchronization specification.
///
/// Serializes as the keyword `"all"` or `"none"`, or as a nested list of
/// 0-based panel indices, so hosts can carry it in configuration verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncSpec {
    #[default]
    None,
    All,
    Groups(Vec<Vec<usize>>),
}

impl SyncSpec {
    /// Parse a host-supplied specification fragment: the keyword `"all"` or
    /// `"none"`, or a nested index list. Anything else is a configuration
    /// error.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| LatticeError::InvalidSyncSpec(err.to_string()))
    }

    /// Resolve the specification into a normalized group list.
    ///
    /// Explicit groups are returned as-is after bounds validation; no
    /// deduplication of members or groups happens here. Duplicates inside a
    /// group collapse to excluded self-pairs downstream, and overlap across
    /// groups unions the generated commands.
    pub fn resolve(&self, panel_count: usize) -> Result<Vec<SyncGroup>> {
        match self {
            SyncSpec::None => Ok(Vec::new()),
            SyncSpec::All => Ok(vec![SyncGroup::new((0..panel_count).collect())]),
            SyncSpec::Groups(groups) => {
                for group in groups {
                    for &index in group {
                        if index >= panel_count {
                            return Err(LatticeError::PanelIndexOutOfRange {
                                index,
                                panel_count,
                            });
                        }
                    }
                }
                Ok(groups
                    .iter()
                    .map(|members| SyncGroup::new(members.clone()))
                    .collect())
            }
        }
    }
}

impl Serialize for SyncSpec {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SyncSpec::None => serializer.serialize_str("none"),
            SyncSpec::All => serializer.serialize_str("all"),
            SyncSpec::Groups(groups) => groups.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SyncSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            Groups(Vec<Vec<usize>>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(word) => match word.as_str() {
                "none" => Ok(SyncSpec::None),
                "all" => Ok(SyncSpec::All),
                other => Err(D::Error::custom(format!("unknown sync keyword `{other}`"))),
            },
            Repr::Groups(groups) => Ok(SyncSpec::Groups(groups)),
        }
    }
}

/// A set of panel indices that should be mutually linked. Members may repeat
/// and may overlap with other groups; each group is processed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncGroup {
    members: Vec<usize>,
}

impl SyncGroup {
    pub fn new(members: Vec<usize>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_resolves_to_zero_groups() {
        assert!(SyncSpec::None.resolve(5).unwrap().is_empty());
        assert!(SyncSpec::None.resolve(0).unwrap().is_empty());
    }

    #[test]
    fn all_resolves_to_one_full_group() {
        let groups = SyncSpec::All.resolve(4).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members(), &[0, 1, 2, 3]);
    }

    #[test]
    fn explicit_groups_pass_through_unchanged() {
        let spec = SyncSpec::Groups(vec![vec![0, 1], vec![1, 3, 3]]);
        let groups = spec.resolve(4).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members(), &[0, 1]);
        assert_eq!(groups[1].members(), &[1, 3, 3]);
    }

    #[test]
    fn out_of_range_index_is_a_configuration_error() {
        let spec = SyncSpec::Groups(vec![vec![0, 1], vec![4]]);
        let err = spec.resolve(4).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::PanelIndexOutOfRange {
                index: 4,
                panel_count: 4
            }
        ));
    }

    #[test]
    fn keywords_round_trip_through_serde() {
        assert_eq!(serde_json::to_string(&SyncSpec::All).unwrap(), "\"all\"");
        assert_eq!(serde_json::to_string(&SyncSpec::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::from_str::<SyncSpec>("\"all\"").unwrap(),
            SyncSpec::All
        );
        assert_eq!(
            serde_json::from_str::<SyncSpec>("\"none\"").unwrap(),
            SyncSpec::None
        );
    }

    #[test]
    fn group_lists_round_trip_through_serde() {
        let spec = SyncSpec::Groups(vec![vec![0, 1], vec![2, 3]]);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, "[[0,1],[2,3]]");
        assert_eq!(serde_json::from_str::<SyncSpec>(&json).unwrap(), spec);
    }

    #[test]
    fn unknown_keyword_fails_to_deserialize() {
        assert!(serde_json::from_str::<SyncSpec>("\"some\"").is_err());
    }

    #[test]
    fn from_json_maps_malformed_specs_to_configuration_errors() {
        assert_eq!(SyncSpec::from_json("\"all\"").unwrap(), SyncSpec::All);
        assert_eq!(
            SyncSpec::from_json("[[0,2]]").unwrap(),
            SyncSpec::Groups(vec![vec![0, 2]])
        );
        let err = SyncSpec::from_json("42").unwrap_err();
        assert!(matches!(err, LatticeError::InvalidSyncSpec(_)));
    }
}
