// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Community module: posts and comments

use crate::{to_payload, ModuleError};
use agora_core::{
    BusError, EventBus, IdGen, Module, ModuleEmitter, PublishOutcome, SequentialIdGen,
    SubscriptionId,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub const POST_CREATED: &str = "community.post.created";
pub const COMMENT_CREATED: &str = "community.comment.created";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub author_id: String,
    pub title: String,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
}

#[derive(Default)]
struct Board {
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

pub struct Community {
    emitter: ModuleEmitter,
    board: Arc<Mutex<Board>>,
    post_ids: SequentialIdGen,
    comment_ids: SequentialIdGen,
}

impl Community {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            emitter: bus.emitter("community"),
            board: Arc::default(),
            post_ids: SequentialIdGen::new("post"),
            comment_ids: SequentialIdGen::new("comment"),
        }
    }

    pub async fn create_post(
        &self,
        author_id: &str,
        title: &str,
        featured: bool,
    ) -> Result<(Post, PublishOutcome), ModuleError> {
        if title.trim().is_empty() {
            return Err(ModuleError::Invalid("post title must not be empty".to_string()));
        }
        let post = Post {
            post_id: self.post_ids.next(),
            author_id: author_id.to_string(),
            title: title.to_string(),
            featured,
        };
        self.board
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .posts
            .push(post.clone());

        let outcome = self.emitter.emit(POST_CREATED, to_payload(&post)?).await?;
        Ok((post, outcome))
    }

    pub async fn comment(
        &self,
        post_id: &str,
        author_id: &str,
        body: &str,
    ) -> Result<(Comment, PublishOutcome), ModuleError> {
        let comment = {
            let mut board = self.board.lock().unwrap_or_else(|e| e.into_inner());
            if !board.posts.iter().any(|p| p.post_id == post_id) {
                return Err(ModuleError::NotFound(format!("post {}", post_id)));
            }
            let comment = Comment {
                comment_id: self.comment_ids.next(),
                post_id: post_id.to_string(),
                author_id: author_id.to_string(),
                body: body.to_string(),
            };
            board.comments.push(comment.clone());
            comment
        };

        let outcome = self
            .emitter
            .emit(COMMENT_CREATED, to_payload(&comment)?)
            .await?;
        Ok((comment, outcome))
    }

    pub fn posts(&self) -> Vec<Post> {
        self.board
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .posts
            .clone()
    }

    pub fn comments_on(&self, post_id: &str) -> Vec<Comment> {
        let board = self.board.lock().unwrap_or_else(|e| e.into_inner());
        board
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }
}

impl Module for Community {
    fn name(&self) -> &'static str {
        "community"
    }

    /// Community only produces events
    fn register(&self, _bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "community_tests.rs"]
mod tests;
