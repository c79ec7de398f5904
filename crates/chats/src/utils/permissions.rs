//! Permission checking utilities.

use crate::entities::Chat;
use crate::types::ChatError;

/// Permission checking utilities
pub struct PermissionChecker;

impl PermissionChecker {
    /// Check if a user can access a chat
    pub fn can_access_chat(chat: &Chat, user_id: &str) -> Result<(), ChatError> {
        if !chat.is_member(user_id) {
            return Err(ChatError::AccessDenied);
        }
        Ok(())
    }
}
