use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::{AccountId, AccountStatus, AgentId};

/// borrower account, owned by the account-management collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub account_number: String,
    pub holder_name: String,
    pub status: AccountStatus,
    /// sales agent credited with this account's loans, if any
    pub agent_id: Option<AgentId>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(account_number: String, holder_name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number,
            holder_name,
            status: AccountStatus::Active,
            agent_id: None,
            created_at,
        }
    }

    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// lookup seam to the external account store
pub trait AccountDirectory {
    fn find(&self, id: AccountId) -> Option<Account>;
}

/// hashmap-backed directory for tests and demos
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: HashMap<AccountId, Account>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    pub fn insert(&mut self, account: Account) -> AccountId {
        let id = account.id;
        self.accounts.insert(id, account);
        id
    }

    pub fn set_status(&mut self, id: AccountId, status: AccountStatus) {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.status = status;
        }
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn find(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_lookup() {
        let mut directory = InMemoryAccountDirectory::new();
        let agent = Uuid::new_v4();
        let account = Account::new("ACC-1001".to_string(), "R. Alonzo".to_string(), Utc::now())
            .with_agent(agent);
        let id = directory.insert(account);

        let found = directory.find(id).unwrap();
        assert_eq!(found.account_number, "ACC-1001");
        assert_eq!(found.agent_id, Some(agent));
        assert!(found.is_active());

        assert!(directory.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_status_changes_gate_activity() {
        let mut directory = InMemoryAccountDirectory::new();
        let id = directory.insert(Account::new(
            "ACC-1002".to_string(),
            "M. Reyes".to_string(),
            Utc::now(),
        ));

        directory.set_status(id, AccountStatus::Suspended);
        assert!(!directory.find(id).unwrap().is_active());
    }
}
