//! Session claims and explicit token issuance.
//!
//! A session is a plain signed token value carrying the authorization
//! attributes the handlers need (role, tier, locale, onboarding state); no
//! identity-provider SDK or ambient global state is involved. Magic-link
//! tokens are a second, short-lived claim set exchanged for a session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::token::{self, TokenError, MAGIC_LINK_PREFIX, SESSION_PREFIX};
use crate::domain::models::User;
use crate::error::AppError;
use shared::{SubscriptionTier, UserRole};

/// Session lifetime: 30 days, matching the hosted-auth default it replaced.
const SESSION_TTL_DAYS: i64 = 30;
/// Magic links are single-purpose and short-lived.
const MAGIC_LINK_TTL_MINUTES: i64 = 15;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: String,
    pub role: UserRole,
    pub subscription_tier: SubscriptionTier,
    pub timezone: String,
    pub language: String,
    pub onboarding_completed: bool,
    /// Unix timestamp (seconds).
    pub exp: i64,
}

/// Claims carried by a magic-link token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicLinkClaims {
    pub email: String,
    pub exp: i64,
}

/// The authenticated caller, as decoded from a session token. Passed
/// explicitly into every handler that needs it.
pub type AuthUser = SessionClaims;

impl SessionClaims {
    /// Coarse role check against the fixed ordering CHILD < PARENT < ADMIN.
    pub fn require_role(&self, required: UserRole) -> Result<(), AppError> {
        if self.role >= required {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Coarse tier check against the fixed ordering
    /// FREE < PREMIUM < PREMIUM_PLUS.
    pub fn require_tier(&self, required: SubscriptionTier) -> Result<(), AppError> {
        if self.subscription_tier >= required {
            Ok(())
        } else {
            let name = match required {
                SubscriptionTier::Free => "FREE",
                SubscriptionTier::Premium => "PREMIUM",
                SubscriptionTier::PremiumPlus => "PREMIUM_PLUS",
            };
            Err(AppError::SubscriptionRequired(name))
        }
    }

    /// Whether this caller may act on a child owned by `parent_id`.
    pub fn can_access_child(&self, parent_id: &str) -> bool {
        self.role == UserRole::Admin || self.id == parent_id
    }
}

/// Issue a session token for a user row.
pub fn issue_session(secret: &[u8], user: &User) -> String {
    let claims = SessionClaims {
        id: user.id.clone(),
        role: user.role,
        subscription_tier: user.subscription_tier,
        timezone: user.timezone.clone(),
        language: user.language.clone(),
        onboarding_completed: user.onboarding_completed,
        exp: (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp(),
    };
    token::sign(secret, SESSION_PREFIX, &claims)
}

/// Verify a session token's signature and expiry.
pub fn verify_session(secret: &[u8], value: &str) -> Result<SessionClaims, TokenError> {
    let claims: SessionClaims = token::verify(secret, SESSION_PREFIX, value)?;
    if claims.exp < Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Issue a magic-link token for an email address. Returns the token and its
/// expiry for the delivery channel to present.
pub fn issue_magic_link(secret: &[u8], email: &str) -> (String, DateTime<Utc>) {
    let expires_at = Utc::now() + Duration::minutes(MAGIC_LINK_TTL_MINUTES);
    let claims = MagicLinkClaims {
        email: email.to_lowercase(),
        exp: expires_at.timestamp(),
    };
    (token::sign(secret, MAGIC_LINK_PREFIX, &claims), expires_at)
}

/// Verify a magic-link token's signature and expiry.
pub fn verify_magic_link(secret: &[u8], value: &str) -> Result<MagicLinkClaims, TokenError> {
    let claims: MagicLinkClaims = token::verify(secret, MAGIC_LINK_PREFIX, value)?;
    if claims.exp < Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}
