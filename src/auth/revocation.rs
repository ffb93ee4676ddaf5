//! In-memory deny-list of revoked session tokens
//!
//! Entries are keyed by token id (`jti`) and kept until the token would have
//! expired anyway. Tokens issued without an expiry stay listed for the
//! lifetime of the process. The list is not persisted and not shared between
//! replicas.

use dashmap::DashMap;

use super::jwt::Claims;

#[derive(Debug, Clone)]
struct RevokedToken {
    subject: String,
    /// Unix seconds, `None` for unbounded tokens
    expires_at: Option<i64>,
}

#[derive(Debug, Default)]
pub struct RevocationList {
    entries: DashMap<String, RevokedToken>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke the token described by `claims`
    pub fn revoke(&self, claims: &Claims) {
        let now = chrono::Utc::now().timestamp();
        let purged = self.purge_expired(now);
        if purged > 0 {
            tracing::debug!(purged, "Purged expired revocation entries");
        }

        self.entries.insert(
            claims.jti.clone(),
            RevokedToken {
                subject: claims.sub.clone(),
                expires_at: claims.exp,
            },
        );
        tracing::debug!(
            subject = %claims.sub,
            jti = %claims.jti,
            revoked_for_subject = self.revoked_for(&claims.sub),
            "Session token revoked"
        );
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token has already expired; returns how many were removed
    pub fn purge_expired(&self, now: i64) -> usize {
        let mut purged = 0;
        self.entries.retain(|_, entry| {
            let live = entry.expires_at.map_or(true, |exp| exp > now);
            if !live {
                purged += 1;
            }
            live
        });
        purged
    }

    /// Number of revoked tokens still listed for `subject`
    pub fn revoked_for(&self, subject: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().subject == subject)
            .count()
    }
}
