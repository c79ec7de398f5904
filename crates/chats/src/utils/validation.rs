//! Validation utilities.

use std::collections::HashSet;

use crate::entities::ChatType;
use crate::types::{ChatError, UserId};

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Check the member list supplied for a new chat of `chat_type`.
    pub fn chat_members(
        chat_type: ChatType,
        creator_id: &str,
        name: &str,
        other_user_ids: &[UserId],
    ) -> Result<(), ChatError> {
        match chat_type {
            ChatType::Private => {
                if other_user_ids.len() != 1 {
                    return Err(ChatError::InvalidUserCount);
                }
                if other_user_ids[0] == creator_id {
                    return Err(ChatError::SameUser);
                }
            }
            ChatType::Group => {
                if name.trim().is_empty() {
                    return Err(ChatError::EmptyGroupName);
                }
            }
        }
        Ok(())
    }

    /// Final member set: the supplied ids plus the creator, first occurrence wins.
    pub fn member_set(creator_id: &str, other_user_ids: &[UserId]) -> Vec<UserId> {
        let mut seen = HashSet::new();
        other_user_ids
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(creator_id))
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect()
    }

    /// Validate channel name
    pub fn channel_name(name: &str) -> Result<(), ChatError> {
        if name.trim().is_empty() {
            return Err(ChatError::EmptyChannelName);
        }
        Ok(())
    }

    /// Validate message text against the configured limit, in characters.
    pub fn message_text(text: &str, max_length: usize) -> Result<(), ChatError> {
        let length = text.chars().count();
        if length == 0 || length > max_length {
            return Err(ChatError::InvalidMessage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<UserId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_private_chat_members() {
        assert!(Validator::chat_members(ChatType::Private, "a", "", &ids(&["b"])).is_ok());
        assert!(matches!(
            Validator::chat_members(ChatType::Private, "a", "", &ids(&[])),
            Err(ChatError::InvalidUserCount)
        ));
        assert!(matches!(
            Validator::chat_members(ChatType::Private, "a", "", &ids(&["b", "c"])),
            Err(ChatError::InvalidUserCount)
        ));
        assert!(matches!(
            Validator::chat_members(ChatType::Private, "a", "", &ids(&["a"])),
            Err(ChatError::SameUser)
        ));
    }

    #[test]
    fn test_group_chat_requires_name() {
        assert!(Validator::chat_members(ChatType::Group, "a", "Team", &ids(&[])).is_ok());
        assert!(matches!(
            Validator::chat_members(ChatType::Group, "a", "", &ids(&["b"])),
            Err(ChatError::EmptyGroupName)
        ));
    }

    #[test]
    fn test_member_set_dedups_and_adds_creator() {
        assert_eq!(
            Validator::member_set("a", &ids(&["b", "a", "c", "b"])),
            ids(&["b", "a", "c"])
        );
        assert_eq!(Validator::member_set("a", &ids(&["b"])), ids(&["b", "a"]));
    }

    #[test]
    fn test_message_text_length() {
        assert!(Validator::message_text("hi", 2).is_ok());
        assert!(Validator::message_text("hey", 2).is_err());
        assert!(Validator::message_text("", 2).is_err());
        // counted in characters, not bytes
        assert!(Validator::message_text("привет", 6).is_ok());
    }
}
