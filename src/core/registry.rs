use crate::adapters::{BcryptPasswordEncoder, InMemoryMeetingEventRepository, InMemoryUserRepository};
use crate::core::register::RegisterService;
use crate::core::scheduler::MeetingSchedulerService;
use crate::domain::ports::{ConfigProvider, MeetingEventRepository, PasswordEncoder, UserRepository};
use std::sync::Arc;

/// 組裝 repository、密碼編碼器與服務的地方
#[derive(Clone)]
pub struct AppRegistry {
    user_repository: Arc<dyn UserRepository>,
    meeting_repository: Arc<dyn MeetingEventRepository>,
    password_encoder: Arc<dyn PasswordEncoder>,
    register_service: Arc<RegisterService>,
    scheduler_service: Arc<MeetingSchedulerService>,
}

impl AppRegistry {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self::with_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryMeetingEventRepository::new()),
            Arc::new(BcryptPasswordEncoder::new(config.bcrypt_cost())),
        )
    }

    pub fn with_parts(
        user_repository: Arc<dyn UserRepository>,
        meeting_repository: Arc<dyn MeetingEventRepository>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        let register_service = Arc::new(RegisterService::new(
            user_repository.clone(),
            password_encoder.clone(),
        ));
        let scheduler_service = Arc::new(MeetingSchedulerService::new(
            meeting_repository.clone(),
            user_repository.clone(),
        ));
        Self {
            user_repository,
            meeting_repository,
            password_encoder,
            register_service,
            scheduler_service,
        }
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn meeting_repository(&self) -> Arc<dyn MeetingEventRepository> {
        self.meeting_repository.clone()
    }

    pub fn password_encoder(&self) -> Arc<dyn PasswordEncoder> {
        self.password_encoder.clone()
    }

    pub fn register_service(&self) -> Arc<RegisterService> {
        self.register_service.clone()
    }

    pub fn scheduler_service(&self) -> Arc<MeetingSchedulerService> {
        self.scheduler_service.clone()
    }
}
