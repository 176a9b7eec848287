//! Resource test groups

pub mod comments;
pub mod posts;

use crate::case::Suite;

/// Every group, in run order
pub fn all() -> Vec<Suite> {
    vec![posts::suite(), comments::suite()]
}

/// Look up a group by name (case-insensitive)
pub fn by_name(name: &str) -> Option<Suite> {
    all()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}
