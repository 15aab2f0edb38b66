//! Mention Resolver
//!
//! Turns `@handle` tokens of a freshly sent message into mention rows.

use std::sync::Arc;

use uuid::Uuid;

use super::error::ChatError;
use crate::domain::services::{extract_handles, MentionIndex};
use crate::domain::{Mention, MentionRepository, Message, NewMention, UserDirectory};

pub struct MentionResolver {
    mentions: Arc<dyn MentionRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl MentionResolver {
    pub fn new(mentions: Arc<dyn MentionRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            mentions,
            directory,
        }
    }

    /// Record one mention per distinct user referenced in `message`.
    ///
    /// The sender is never mentioned and unknown handles are ignored. The
    /// directory is only consulted when the content contains a token.
    pub async fn resolve(&self, message: &Message) -> Result<Vec<Mention>, ChatError> {
        if extract_handles(&message.content).is_empty() {
            return Ok(Vec::new());
        }

        let users = self.directory.list_users(message.tenant_id).await?;
        let index = MentionIndex::build(&users);

        let mut created = Vec::new();
        for user_id in index.mentioned_users(&message.content, message.sender_id) {
            let mention = NewMention {
                id: Uuid::now_v7(),
                tenant_id: message.tenant_id,
                room_id: message.room_id,
                message_id: message.id,
                mentioned_user_id: user_id,
            };
            if let Some(row) = self.mentions.create(&mention).await? {
                created.push(row);
            }
        }

        Ok(created)
    }
}
