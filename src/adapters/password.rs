use crate::domain::ports::PasswordEncoder;
use crate::utils::error::{Result, SchedulerError};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

// bcrypt 很慢，放到 blocking 執行緒上跑
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await?
}

#[async_trait]
impl PasswordEncoder for BcryptPasswordEncoder {
    async fn encode(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        run_blocking(move || Ok(bcrypt::hash(password, cost)?)).await
    }

    async fn verify(&self, password: &str, encoded_password: &str) -> Result<()> {
        let password = password.to_string();
        let encoded_password = encoded_password.to_string();

        let matches = run_blocking(move || {
            // 格式錯誤的雜湊也視為密碼不符
            Ok(bcrypt::verify(password, &encoded_password).unwrap_or(false))
        })
        .await?;

        if matches {
            Ok(())
        } else {
            tracing::debug!("Password verification failed");
            Err(SchedulerError::InvalidPassword)
        }
    }
}
