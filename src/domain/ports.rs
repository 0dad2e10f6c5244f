use crate::domain::model::{MeetingEvent, MeetingId, User};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// 可存放在 repository 中的實體
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: PartialEq + Send + Sync;

    fn id(&self) -> Self::Id;

    /// 以欄位名稱取值，供 [`Criteria`] 比對。未知欄位回傳 `None`。
    fn attribute(&self, name: &str) -> Option<Value>;
}

/// 欄位名稱到值的過濾條件；所有欄位都相等才算符合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    filters: Vec<(String, Value)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.filters.push((attribute.to_string(), value.into()));
        self
    }

    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.filters
            .iter()
            .all(|(name, expected)| entity.attribute(name).as_ref() == Some(expected))
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// 依插入順序回傳全部實體
    async fn find_all(&self) -> Result<Vec<T>>;

    async fn find_by(&self, criteria: &Criteria) -> Result<Option<T>>;

    /// 依 id 新增或取代
    async fn save(&self, entity: T) -> Result<()>;

    /// 回傳是否真的刪除了資料
    async fn delete(&self, entity: &T) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_by(&Criteria::new().with("username", username))
            .await
    }
}

#[async_trait]
pub trait MeetingEventRepository: Repository<MeetingEvent> {
    async fn find_by_id(&self, id: MeetingId) -> Result<Option<MeetingEvent>> {
        self.find_by(&Criteria::new().with("id", id.to_string()))
            .await
    }
}

#[async_trait]
pub trait PasswordEncoder: Send + Sync {
    async fn encode(&self, password: &str) -> Result<String>;

    /// 不符合時回傳 `InvalidPassword`
    async fn verify(&self, password: &str, encoded_password: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn bcrypt_cost(&self) -> u32;
    fn scenario_path(&self) -> &str;
}

impl Entity for User {
    type Id = crate::domain::model::UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "username" => Some(Value::String(self.username.clone())),
            "email" => Some(Value::String(self.email.clone())),
            _ => None,
        }
    }
}

impl Entity for MeetingEvent {
    type Id = MeetingId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "name" => Some(Value::String(self.name.clone())),
            "organizer" => Some(Value::String(self.organizer.to_string())),
            "open_voting" => Some(Value::Bool(self.is_voting_open())),
            _ => None,
        }
    }
}
