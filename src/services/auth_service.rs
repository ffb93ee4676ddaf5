//! 认证服务：注册、登录、登出、修改密码

use crate::{
    auth::{jwt::JwtService, middleware::Session, password::PasswordHasher},
    error::AppError,
    models::{
        admin::{Admin, ChangePasswordRequest, NewAdmin, RegisterAdminRequest},
        auth::{LoginRequest, SessionUser},
    },
    repository::CredentialStore,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 登录失败时不区分邮箱不存在和密码错误
const INVALID_LOGIN: &str = "Invalid email or password";

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt_service,
        }
    }

    /// 注册管理员
    pub async fn register(&self, req: RegisterAdminRequest) -> Result<Admin, AppError> {
        req.validate().map_err(|e| AppError::validation(&e))?;

        if self.store.find_admin_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let password_hash = self.hasher.hash_blocking(req.password).await?;

        // 并发注册同一邮箱时由存储层的唯一约束兜底
        let admin = self
            .store
            .create_admin(NewAdmin {
                first_name: req.first_name,
                last_name: req.last_name,
                gender: req.gender,
                email: req.email,
                phone_number: req.phone_number,
                password_hash,
            })
            .await?;

        tracing::info!(admin_id = %admin.id, "Admin registered");

        Ok(admin)
    }

    /// 管理员登录，返回会话令牌和令牌中的身份信息
    pub async fn login(&self, req: LoginRequest) -> Result<(String, SessionUser), AppError> {
        let admin = match self.store.find_admin_by_email(&req.email).await? {
            Some(admin) => admin,
            None => {
                tracing::debug!("Login attempt for unknown email");
                return Err(AppError::BadCredentials(INVALID_LOGIN.to_string()));
            }
        };

        if !self
            .hasher
            .verify_blocking(req.password, admin.password_hash.clone())
            .await
        {
            tracing::debug!(admin_id = %admin.id, "Login attempt with wrong password");
            return Err(AppError::BadCredentials(INVALID_LOGIN.to_string()));
        }

        let user = SessionUser::from(&admin);
        let token = self.jwt_service.issue(&user)?;

        tracing::info!(admin_id = %admin.id, "Admin logged in");

        Ok((token, user))
    }

    /// 修改密码，旧密码校验失败时不做任何修改
    pub async fn change_password(
        &self,
        admin_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        req.validate().map_err(|e| AppError::validation(&e))?;

        let admin = self
            .store
            .find_admin_by_id(admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

        if !self
            .hasher
            .verify_blocking(req.old_password, admin.password_hash)
            .await
        {
            return Err(AppError::BadCredentials("Invalid old password".to_string()));
        }

        let password_hash = self.hasher.hash_blocking(req.new_password).await?;

        if !self
            .store
            .update_admin_password(admin_id, &password_hash)
            .await?
        {
            return Err(AppError::NotFound("Admin not found".to_string()));
        }

        tracing::info!(admin_id = %admin_id, "Admin password changed");

        Ok(())
    }

    /// 登出：有效令牌加入撤销列表
    pub fn logout(&self, session: &Session) {
        if let Some(ctx) = session.auth_context() {
            self.jwt_service.revoke(&ctx.claims);
            tracing::info!(admin_id = %ctx.admin_id, "Admin logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    const SECRET: &[u8] = b"test_secret_key_32_characters_long!";

    fn service() -> (AuthService, Arc<JwtService>) {
        let jwt = Arc::new(JwtService::new(SECRET, Some(900)));
        let hasher = PasswordHasher::new(1024, 1, 1).unwrap();
        let service = AuthService::new(Arc::new(MemoryStore::new()), hasher, jwt.clone());
        (service, jwt)
    }

    fn register_request(email: &str, password: &str) -> RegisterAdminRequest {
        RegisterAdminRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: "female".to_string(),
            email: email.to_string(),
            phone_number: "555-0100".to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let (service, _) = service();
        let admin = service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        assert_ne!(admin.password_hash, "s3cret");
        assert!(admin.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, _) = service();
        service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let err = service
            .register(register_request("ada@example.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let unknown = service
            .login(login_request("nobody@example.com", "s3cret"))
            .await
            .unwrap_err();
        let wrong = service
            .login(login_request("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(unknown.user_message(), wrong.user_message());
        assert_eq!(unknown.status_code(), wrong.status_code());
    }

    #[tokio::test]
    async fn test_login_token_carries_identity() {
        let (service, jwt) = service();
        let admin = service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let (token, user) = service
            .login(login_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), admin.id);
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_change_password_with_wrong_old_password() {
        let (service, _) = service();
        let admin = service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let err = service
            .change_password(
                admin.id,
                ChangePasswordRequest {
                    old_password: "wrong".to_string(),
                    new_password: "new".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadCredentials(_)));

        // 原密码依然可用
        assert!(service
            .login(login_request("ada@example.com", "s3cret"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (service, jwt) = service();
        service
            .register(register_request("ada@example.com", "s3cret"))
            .await
            .unwrap();
        let (token, _) = service
            .login(login_request("ada@example.com", "s3cret"))
            .await
            .unwrap();

        let session = Session::resolve(&jwt, Some(&token));
        service.logout(&session);

        assert!(jwt.verify(&token).is_err());
    }
}
