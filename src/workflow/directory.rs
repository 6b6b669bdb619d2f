//! 账号目录
//!
//! 两个账号分区的读穿透缓存。员工分区优先，用户名在两个分区中不应重复。

use std::sync::Arc;

use tracing::debug;

use crate::cache::{ObjectCache, get_json, insert_json};
use crate::errors::Result;
use crate::models::accounts::entities::{Account, InternAccount, Role, StaffAccount};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AccountDirectory {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

impl AccountDirectory {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self {
            storage,
            cache,
            ttl,
        }
    }

    fn staff_key(username: &str) -> String {
        format!("account:staff:{username}")
    }

    fn intern_key(username: &str) -> String {
        format!("account:intern:{username}")
    }

    pub async fn find_staff(&self, username: &str) -> Result<Option<StaffAccount>> {
        let key = Self::staff_key(username);
        if let Some(account) = get_json::<StaffAccount>(self.cache.as_ref(), &key).await {
            debug!("Staff account cache hit: {}", username);
            return Ok(Some(account));
        }

        let account = self.storage.get_staff_account(username).await?;
        if let Some(ref found) = account {
            insert_json(self.cache.as_ref(), &key, found, self.ttl).await;
        }
        Ok(account)
    }

    pub async fn find_intern(&self, username: &str) -> Result<Option<InternAccount>> {
        let key = Self::intern_key(username);
        if let Some(account) = get_json::<InternAccount>(self.cache.as_ref(), &key).await {
            debug!("Intern account cache hit: {}", username);
            return Ok(Some(account));
        }

        let account = self.storage.get_intern_account(username).await?;
        if let Some(ref found) = account {
            insert_json(self.cache.as_ref(), &key, found, self.ttl).await;
        }
        Ok(account)
    }

    /// 按用户名解析，先查员工分区
    pub async fn resolve(&self, username: &str) -> Result<Option<Account>> {
        if let Some(staff) = self.find_staff(username).await? {
            return Ok(Some(Account::Staff(staff)));
        }
        Ok(self.find_intern(username).await?.map(Account::Intern))
    }

    /// 按令牌声明的角色解析，角色与分区中的记录不一致时视为不存在
    pub async fn resolve_as(&self, username: &str, role: Role) -> Result<Option<Account>> {
        match role {
            Role::Intern => Ok(self.find_intern(username).await?.map(Account::Intern)),
            Role::Admin | Role::Employee => Ok(self
                .find_staff(username)
                .await?
                .filter(|staff| staff.role == role)
                .map(Account::Staff)),
        }
    }
}
