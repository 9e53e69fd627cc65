#![cfg(feature = "web")]
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::record::SalesRecord;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "session";

/// Server-side session data
#[derive(Debug, Clone)]
pub struct Session {
    /// Latest submission, if the visitor has posted the form
    pub record: Option<SalesRecord>,

    /// Time when the session expires
    pub expires_at: SystemTime,
}

/// In-memory session storage keyed by cookie value
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a new empty session and return its id
    pub fn create(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            record: None,
            expires_at: SystemTime::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let now = SystemTime::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session_id.clone(), session);

        session_id
    }

    /// Check whether a session exists and has not expired
    pub fn is_valid(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(session_id)
            .is_some_and(|s| s.expires_at > SystemTime::now())
    }

    /// Reuse the session named by the cookie, or start a new one
    ///
    /// Returns the jar to send back (with a fresh cookie when a session was
    /// created) and the session id.
    pub fn ensure(&self, jar: CookieJar) -> (CookieJar, String) {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if self.is_valid(cookie.value()) {
                let id = cookie.value().to_string();
                return (jar, id);
            }
        }

        let session_id = self.create();
        let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
            .path("/")
            .http_only(true)
            .build();
        (jar.add(cookie), session_id)
    }

    /// Replace the session's record and extend its lifetime
    pub fn store_record(&self, session_id: &str, record: SalesRecord) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let expires_at = SystemTime::now() + self.ttl;
        sessions
            .entry(session_id.to_string())
            .and_modify(|s| {
                s.record = Some(record.clone());
                s.expires_at = expires_at;
            })
            .or_insert_with(|| Session {
                record: Some(record),
                expires_at,
            });
    }

    /// The record stored for the session named by the cookie, if any
    pub fn record(&self, jar: &CookieJar) -> Option<SalesRecord> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(cookie.value())
            .filter(|s| s.expires_at > SystemTime::now())
            .and_then(|s| s.record.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
