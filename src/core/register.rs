use crate::domain::model::User;
use crate::domain::ports::{Criteria, PasswordEncoder, Repository, UserRepository};
use crate::domain::schemas::RegisterForm;
use crate::utils::error::{Result, SchedulerError};
use crate::utils::validation::Validate;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct RegisterService {
    users: Arc<dyn UserRepository>,
    encoder: Arc<dyn PasswordEncoder>,
    // 檢查唯一性到儲存之間不能有其他註冊插入
    write_lock: Mutex<()>,
}

impl RegisterService {
    pub fn new(users: Arc<dyn UserRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            users,
            encoder,
            write_lock: Mutex::new(()),
        }
    }

    async fn verify_unique(&self, username: &str, email: &str) -> Result<()> {
        let checked = match self.verify_username(username).await {
            Ok(()) => self.verify_email(email).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &checked {
            tracing::warn!("Rejected registration for '{}': {}", username, e);
        }
        checked
    }

    async fn verify_username(&self, username: &str) -> Result<()> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(SchedulerError::IllegalUser {
                message: format!("Username {} already in use.", username),
            });
        }
        Ok(())
    }

    async fn verify_email(&self, email: &str) -> Result<()> {
        let criteria = Criteria::new().with("email", email);
        if self.users.find_by(&criteria).await?.is_some() {
            return Err(SchedulerError::IllegalUser {
                message: format!("Email {} already in use.", email),
            });
        }
        Ok(())
    }

    /// 註冊新使用者。先檢查 username 再檢查 email，最後才雜湊密碼並儲存。
    ///
    /// 雜湊不在鎖內執行，所以取得鎖之後會再檢查一次唯一性。
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.verify_unique(username, email).await?;

        let hashed_password = self.encoder.encode(password).await?;
        let user = User::new(username, email, hashed_password);

        let _guard = self.write_lock.lock().await;
        self.verify_unique(username, email).await?;
        self.users.save(user.clone()).await?;
        tracing::info!("👤 Registered user '{}'", user.username);

        Ok(user)
    }

    pub async fn register_form(&self, form: &RegisterForm) -> Result<User> {
        form.validate()?;
        self.register(&form.username, &form.email, &form.password1)
            .await
    }
}
