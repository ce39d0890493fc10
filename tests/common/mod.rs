//! Common test utilities and fixtures
//!
//! JSON bodies shaped like the service's responses.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A user record as `GET /api/users` lists it
pub fn user_json(user_id: &str, username: &str, name: &str, interests: &[&str]) -> Value {
    json!({
        "user_id": user_id,
        "username": username,
        "personality": {
            "name": name,
            "communication_style": "casual and friendly",
            "interests": interests,
            "personality_traits": ["curious"],
            "favorite_topics": [],
            "speaking_quirks": "none",
            "background": "general background"
        },
        "created_at": "2024-05-01T09:00:00.000Z"
    })
}

/// The three-user directory used across tests
pub fn three_users() -> Value {
    json!({
        "users": [
            user_json("user_1", "ada", "Ada", &["math", "engines", "poetry", "music"]),
            user_json("user_2", "grace", "Grace", &["compilers"]),
            user_json("user_3", "linus", "Linus", &[]),
        ]
    })
}

/// A stored conversation as `GET /api/conversations` lists it
pub fn conversation_json(user1: (&str, &str), user2: (&str, &str), topic: &str) -> Value {
    json!({
        "conversation_id": format!("conv-{}-{}", user1.0, user2.0),
        "user1_id": user1.0,
        "user2_id": user2.0,
        "participants": { "user1": user1.1, "user2": user2.1 },
        "topic": topic,
        "created_at": "2024-05-01T10:00:00.123456",
        "messages": [
            { "speaker": "Ada", "message": format!("So, {}?", topic), "timestamp": "2024-05-01T10:00:01.000001" },
            { "speaker": "Grace", "message": "Absolutely.", "timestamp": "2024-05-01T10:00:02.000002" }
        ]
    })
}

/// Answer to `POST /api/conversations`
pub fn generated_json(user1: &str, user2: &str) -> Value {
    json!({
        "conversation_id": "conv-new",
        "participants": { "user1": user1, "user2": user2 },
        "messages": [
            { "speaker": "Ada", "message": "Hi!", "timestamp": "2024-05-01T10:00:01" }
        ]
    })
}
