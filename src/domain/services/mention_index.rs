//! Mention extraction.
//!
//! A mention is an `@handle` token. Handles resolve against the tenant's
//! users by display name (whitespace removed) or email local part, both
//! compared lower-cased.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::DirectoryUser;

static MENTION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)@[\w.\-]+").expect("mention pattern is valid"));

/// Raw `@handle` tokens in `content`, without the `@`, in order of appearance.
pub fn extract_handles(content: &str) -> Vec<&str> {
    MENTION_TOKEN
        .find_iter(content)
        .map(|m| m.as_str().trim_start_matches('@').trim())
        .filter(|handle| !handle.is_empty())
        .collect()
}

/// Lookup from normalized handle to user id for one tenant.
#[derive(Debug, Clone, Default)]
pub struct MentionIndex {
    handles: HashMap<String, i64>,
}

impl MentionIndex {
    /// Build the index from a directory snapshot.
    ///
    /// Users are indexed in id order and the first claim on a handle wins,
    /// so the result does not depend on the order the directory returns.
    pub fn build(users: &[DirectoryUser]) -> Self {
        let mut ordered: Vec<&DirectoryUser> = users.iter().collect();
        ordered.sort_by_key(|u| u.id);

        let mut handles = HashMap::with_capacity(ordered.len() * 2);
        for user in ordered {
            for handle in [user.name_handle(), user.email_handle()] {
                if !handle.is_empty() {
                    handles.entry(handle).or_insert(user.id);
                }
            }
        }

        Self { handles }
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Resolve one handle. Trailing `.` or `-` (sentence punctuation) is
    /// dropped when the exact handle is unknown.
    pub fn resolve(&self, handle: &str) -> Option<i64> {
        let normalized: String = handle
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if let Some(id) = self.handles.get(&normalized) {
            return Some(*id);
        }

        let trimmed = normalized.trim_end_matches(['.', '-']);
        if trimmed.len() != normalized.len() && !trimmed.is_empty() {
            return self.handles.get(trimmed).copied();
        }

        None
    }

    /// Distinct users mentioned in `content`, excluding `sender_id`, in
    /// order of first appearance. Unknown handles are ignored.
    pub fn mentioned_users(&self, content: &str, sender_id: i64) -> Vec<i64> {
        let mut users = Vec::new();
        for handle in extract_handles(content) {
            if let Some(user_id) = self.resolve(handle) {
                if user_id != sender_id && !users.contains(&user_id) {
                    users.push(user_id);
                }
            }
        }
        users
    }
}
