//! Account sign-up and the four sign-in paths: password credentials, the
//! demo account, magic links, and externally verified identities.

use chrono::Utc;
use serde_json::json;
use shared::{
    CredentialsRequest, ExternalSignInRequest, MagicLinkExchangeRequest, MagicLinkRequest,
    MagicLinkResponse, SessionResponse, SignUpRequest,
};

use crate::auth::{password, session};
use crate::db::DbConnection;
use crate::domain::models::User;
use crate::domain::{audit_service, RequestMeta};
use crate::error::AppError;
use crate::storage::users;

/// The demo account, provisioned on first sign-in.
const DEMO_EMAIL: &str = "demo@parentwise.app";
const DEMO_PASSWORD: &str = "demo123";

#[derive(Clone)]
pub struct AuthService {
    db: DbConnection,
    secret: Vec<u8>,
}

impl AuthService {
    pub fn new(db: DbConnection, secret: Vec<u8>) -> Self {
        Self { db, secret }
    }

    pub async fn sign_up(
        &self,
        request: SignUpRequest,
        meta: &RequestMeta,
    ) -> Result<SessionResponse, AppError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        if users::find_by_email(self.db.pool(), &request.email).await?.is_some() {
            return Err(AppError::invalid_field(
                "email",
                "An account with this email already exists",
            ));
        }

        let mut user = User::new(&request.email, request.name.clone());
        user.password_hash = Some(password::hash_password(&request.password)?);
        users::insert_user(self.db.pool(), &user).await?;

        self.record_register(&user, "credentials", meta).await?;
        tracing::info!(user_id = %user.id, "account created");

        Ok(self.session_for(&user))
    }

    /// Password sign-in. The demo pair provisions its account on first use;
    /// everything else verifies against the stored argon2 hash.
    pub async fn sign_in_credentials(
        &self,
        request: CredentialsRequest,
        meta: &RequestMeta,
    ) -> Result<SessionResponse, AppError> {
        let email = request.email.trim().to_lowercase();

        if email == DEMO_EMAIL && request.password == DEMO_PASSWORD {
            let user = match users::find_by_email(self.db.pool(), &email).await? {
                Some(user) => user,
                None => {
                    let mut user = User::new(DEMO_EMAIL, Some("Demo Parent".to_string()));
                    user.password_hash = Some(password::hash_password(DEMO_PASSWORD)?);
                    users::insert_user(self.db.pool(), &user).await?;
                    self.record_register(&user, "demo", meta).await?;
                    user
                }
            };
            return self.signed_in(user, "demo", meta).await;
        }

        let user = users::find_by_email(self.db.pool(), &email)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let stored = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;
        if !password::verify_password(&request.password, stored)? {
            return Err(AppError::Unauthorized);
        }

        self.signed_in(user, "credentials", meta).await
    }

    /// Issue a magic-link token. Delivery is the caller's concern; the token
    /// and its expiry are returned directly.
    pub async fn request_magic_link(
        &self,
        request: MagicLinkRequest,
    ) -> Result<MagicLinkResponse, AppError> {
        let email = request.email.trim();
        if !email.contains('@') {
            return Err(AppError::invalid_field(
                "email",
                "A valid email address is required",
            ));
        }

        let (token, expires_at) = session::issue_magic_link(&self.secret, email);
        tracing::info!(email = %email.to_lowercase(), "magic link issued");
        Ok(MagicLinkResponse { token, expires_at })
    }

    /// Exchange a magic-link token for a session, provisioning the account on
    /// first sight of the email.
    pub async fn exchange_magic_link(
        &self,
        request: MagicLinkExchangeRequest,
        meta: &RequestMeta,
    ) -> Result<SessionResponse, AppError> {
        let claims = session::verify_magic_link(&self.secret, &request.token)
            .map_err(|_| AppError::Unauthorized)?;

        let user = match users::find_by_email(self.db.pool(), &claims.email).await? {
            Some(user) => user,
            None => {
                let user = User::new(&claims.email, None);
                users::insert_user(self.db.pool(), &user).await?;
                self.record_register(&user, "magic-link", meta).await?;
                user
            }
        };

        self.signed_in(user, "magic-link", meta).await
    }

    /// Accept an identity already verified by an external OAuth provider.
    pub async fn sign_in_external(
        &self,
        request: ExternalSignInRequest,
        meta: &RequestMeta,
    ) -> Result<SessionResponse, AppError> {
        if request.provider.trim().is_empty() {
            return Err(AppError::invalid_field("provider", "Provider is required"));
        }
        if !request.email.contains('@') {
            return Err(AppError::invalid_field(
                "email",
                "A valid email address is required",
            ));
        }

        let user = match users::find_by_email(self.db.pool(), &request.email).await? {
            Some(user) => user,
            None => {
                let user = User::new(&request.email, request.name.clone());
                users::insert_user(self.db.pool(), &user).await?;
                self.record_register(&user, &request.provider, meta).await?;
                user
            }
        };

        self.signed_in(user, &request.provider, meta).await
    }

    async fn signed_in(
        &self,
        user: User,
        method: &str,
        meta: &RequestMeta,
    ) -> Result<SessionResponse, AppError> {
        users::set_last_login(self.db.pool(), &user.id, Utc::now()).await?;

        let audit = audit_service::entry(
            Some(&user.id),
            "LOGIN",
            "User",
            Some(&user.id),
            Some(json!({ "method": method })),
            meta,
        );
        audit_service::record(&self.db, &audit).await?;
        tracing::info!(user_id = %user.id, method, "signed in");

        Ok(self.session_for(&user))
    }

    async fn record_register(
        &self,
        user: &User,
        method: &str,
        meta: &RequestMeta,
    ) -> Result<(), AppError> {
        let audit = audit_service::entry(
            Some(&user.id),
            "REGISTER",
            "User",
            Some(&user.id),
            Some(json!({ "email": user.email, "method": method })),
            meta,
        );
        audit_service::record(&self.db, &audit).await?;
        Ok(())
    }

    fn session_for(&self, user: &User) -> SessionResponse {
        SessionResponse {
            token: session::issue_session(&self.secret, user),
            user: user.summary(),
        }
    }

    /// Decode and check a bearer token. Used by the request extractor.
    pub fn authenticate(&self, token: &str) -> Result<crate::auth::SessionClaims, AppError> {
        session::verify_session(&self.secret, token).map_err(|_| AppError::Unauthorized)
    }

    /// The caller's current profile, read fresh from the store.
    pub async fn current_user(
        &self,
        caller: &crate::auth::AuthUser,
    ) -> Result<shared::UserSummary, AppError> {
        let user = users::find_by_id(self.db.pool(), &caller.id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(user.summary())
    }
}
