//! Repeated profile types across a result.
//!
//! Only drives an advisory banner; nothing downstream depends on it.

use std::collections::HashMap;

use cl_plan::CutRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTally {
    pub profile_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateProfileReport {
    pub has_duplicates: bool,
    pub duplicates: Vec<ProfileTally>,
}

/// Tally profile types over every segment of every cut and report each
/// type seen more than once, in order of first appearance.
pub fn detect_duplicate_profile_types<'a, I>(cuts: I) -> DuplicateProfileReport
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let mut tallies: Vec<ProfileTally> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    let profiles = cuts
        .into_iter()
        .flat_map(|cut| cut.segments.iter())
        .filter_map(|segment| segment.profile_type.as_deref());

    for profile in profiles {
        match index.get(profile) {
            Some(&slot) => tallies[slot].count += 1,
            None => {
                index.insert(profile, tallies.len());
                tallies.push(ProfileTally {
                    profile_type: profile.to_string(),
                    count: 1,
                });
            }
        }
    }

    let duplicates: Vec<ProfileTally> = tallies.into_iter().filter(|t| t.count > 1).collect();
    DuplicateProfileReport {
        has_duplicates: !duplicates.is_empty(),
        duplicates,
    }
}
