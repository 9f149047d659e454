//! In-memory driven-port adapters for the HTTP flow suite.
//!
//! Each double keeps its rows behind a `Mutex` so the real domain services
//! can run unchanged against them.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use propertyhub::domain::ports::{
    AccountRepository, AccountRepositoryError, InsertOutcome, OtpDelivery, OtpDeliveryError,
    PasswordResetRepository, PasswordResetRepositoryError, PropertyFileLookup, PropertyRepository,
    PropertyRepositoryError, SuggestionRepository, SuggestionRepositoryError,
};
use propertyhub::domain::{
    Account, AccountId, AccountKind, AccountRef, EmailAddress, NewAccount, NewSuggestion,
    OtpCode, PasswordHash, PasswordReset, PropertyFile, PropertyFileKind, PropertyId,
    PropertySummary, StoredCredential, Suggestion, SuggestionId, SuggestionStatus, VoteLedger,
    VoteTally,
};

#[derive(Default)]
pub(crate) struct InMemoryAccounts {
    rows: Mutex<Vec<StoredCredential>>,
}

impl InMemoryAccounts {
    fn insert_row(rows: &mut Vec<StoredCredential>, account: &NewAccount) -> Account {
        let next = rows
            .iter()
            .filter(|row| row.account.kind == account.kind)
            .count() as i32
            + 1;
        let stored = StoredCredential {
            account: Account {
                kind: account.kind,
                id: AccountId::new(next).expect("positive id"),
                full_name: account.full_name.clone(),
                email: account.email.clone(),
                mobile_number: None,
            },
            password_hash: account.password_hash.clone(),
        };
        let created = stored.account.clone();
        rows.push(stored);
        created
    }

    pub(crate) fn password_hash(&self, account: AccountRef) -> Option<PasswordHash> {
        self.rows
            .lock()
            .expect("accounts lock")
            .iter()
            .find(|row| row.account.reference() == account)
            .map(|row| row.password_hash.clone())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, AccountRepositoryError> {
        let rows = self.rows.lock().expect("accounts lock");
        Ok(rows
            .iter()
            .find(|row| row.account.kind == kind && &row.account.email == email)
            .cloned())
    }

    async fn find_by_id(
        &self,
        account: AccountRef,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let rows = self.rows.lock().expect("accounts lock");
        Ok(rows
            .iter()
            .find(|row| row.account.reference() == account)
            .map(|row| row.account.clone()))
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut rows = self.rows.lock().expect("accounts lock");
        if rows
            .iter()
            .any(|row| row.account.kind == account.kind && row.account.email == account.email)
        {
            return Err(AccountRepositoryError::duplicate_email(
                account.email.as_ref().to_owned(),
            ));
        }
        Ok(Self::insert_row(&mut rows, account))
    }

    async fn insert_if_absent(
        &self,
        account: &NewAccount,
    ) -> Result<InsertOutcome, AccountRepositoryError> {
        let mut rows = self.rows.lock().expect("accounts lock");
        if let Some(existing) = rows
            .iter()
            .find(|row| row.account.kind == account.kind && row.account.email == account.email)
        {
            return Ok(InsertOutcome {
                account: existing.account.clone(),
                inserted: false,
            });
        }
        Ok(InsertOutcome {
            account: Self::insert_row(&mut rows, account),
            inserted: true,
        })
    }

    async fn update_password_hash(
        &self,
        account: AccountRef,
        hash: &PasswordHash,
    ) -> Result<bool, AccountRepositoryError> {
        let mut rows = self.rows.lock().expect("accounts lock");
        match rows.iter_mut().find(|row| row.account.reference() == account) {
            Some(row) => {
                row.password_hash = hash.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub(crate) struct InMemoryProperties {
    properties: Vec<PropertySummary>,
    files: Vec<(PropertyId, PropertyFileKind, PropertyFile)>,
    assignments: Vec<(AccountId, PropertyId)>,
}

impl InMemoryProperties {
    /// One property owned by developer 1 with a brochure, assigned to user 1.
    pub(crate) fn seeded() -> Self {
        let property_id = PropertyId::new(1).expect("positive id");
        Self {
            properties: vec![PropertySummary {
                id: property_id,
                name: "Lakeview Residency".to_owned(),
                apartment_type: "2BHK".to_owned(),
                carpet_area: 950,
                development_stage: "foundation".to_owned(),
                image_url: None,
                developer_id: AccountId::new(1).expect("positive id"),
                has_brochure: true,
                has_floor_plan: false,
            }],
            files: vec![(
                property_id,
                PropertyFileKind::Brochure,
                PropertyFile {
                    filename: "lakeview.pdf".to_owned(),
                    bytes: b"%PDF-1.7".to_vec(),
                },
            )],
            assignments: vec![(AccountId::new(1).expect("positive id"), property_id)],
        }
    }
}

#[async_trait]
impl PropertyRepository for InMemoryProperties {
    async fn list_all(&self) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        Ok(self.properties.clone())
    }

    async fn find_by_id(
        &self,
        id: PropertyId,
    ) -> Result<Option<PropertySummary>, PropertyRepositoryError> {
        Ok(self.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn find_file(
        &self,
        id: PropertyId,
        kind: PropertyFileKind,
    ) -> Result<PropertyFileLookup, PropertyRepositoryError> {
        if !self.properties.iter().any(|p| p.id == id) {
            return Ok(PropertyFileLookup::PropertyMissing);
        }
        Ok(self
            .files
            .iter()
            .find(|(owner, file_kind, _)| *owner == id && *file_kind == kind)
            .map_or(PropertyFileLookup::FileMissing, |(_, _, file)| {
                PropertyFileLookup::Found(file.clone())
            }))
    }

    async fn list_for_user(
        &self,
        user_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        Ok(self
            .assignments
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, property)| self.properties.iter().find(|p| p.id == *property))
            .cloned()
            .collect())
    }

    async fn list_for_developer(
        &self,
        developer_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        Ok(self
            .properties
            .iter()
            .filter(|p| p.developer_id == developer_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemorySuggestions {
    rows: Mutex<Vec<Suggestion>>,
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestions {
    async fn find_by_id(
        &self,
        id: SuggestionId,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError> {
        let rows = self.rows.lock().expect("suggestions lock");
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(
        &self,
        suggestion: &NewSuggestion,
    ) -> Result<Suggestion, SuggestionRepositoryError> {
        let mut rows = self.rows.lock().expect("suggestions lock");
        let created = Suggestion {
            id: SuggestionId::new(rows.len() as i32 + 1).expect("positive id"),
            property_id: suggestion.property_id,
            author_id: suggestion.author_id,
            text: suggestion.text.clone(),
            status: SuggestionStatus::Pending,
            created_at: suggestion.created_at,
            tally: VoteTally::default(),
            ledger: VoteLedger::default(),
            revision: 0,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<Suggestion>, SuggestionRepositoryError> {
        let rows = self.rows.lock().expect("suggestions lock");
        Ok(rows
            .iter()
            .filter(|s| s.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn save_votes(
        &self,
        suggestion: &Suggestion,
        expected_revision: u32,
    ) -> Result<(), SuggestionRepositoryError> {
        let mut rows = self.rows.lock().expect("suggestions lock");
        let Some(row) = rows.iter_mut().find(|s| s.id == suggestion.id) else {
            return Err(SuggestionRepositoryError::query("suggestion vanished"));
        };
        if row.revision != expected_revision {
            return Err(SuggestionRepositoryError::revision_mismatch(
                expected_revision,
            ));
        }
        *row = suggestion.clone();
        Ok(())
    }

    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, SuggestionRepositoryError> {
        let mut rows = self.rows.lock().expect("suggestions lock");
        Ok(rows.iter_mut().find(|s| s.id == id).map(|row| {
            row.status = status;
            row.clone()
        }))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryResets {
    rows: Mutex<Vec<PasswordReset>>,
}

#[async_trait]
impl PasswordResetRepository for InMemoryResets {
    async fn find(
        &self,
        account: AccountRef,
    ) -> Result<Option<PasswordReset>, PasswordResetRepositoryError> {
        let rows = self.rows.lock().expect("resets lock");
        Ok(rows.iter().find(|r| r.account == account).cloned())
    }

    async fn save(&self, reset: &PasswordReset) -> Result<(), PasswordResetRepositoryError> {
        let mut rows = self.rows.lock().expect("resets lock");
        rows.retain(|r| r.account != reset.account);
        rows.push(reset.clone());
        Ok(())
    }
}

/// Captures delivered codes instead of sending them.
#[derive(Clone, Default)]
pub(crate) struct CapturingDelivery {
    sent: Arc<Mutex<Vec<(String, String, DateTime<Utc>)>>>,
}

impl CapturingDelivery {
    /// Most recent code sent to `email`.
    pub(crate) fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("delivery lock")
            .iter()
            .rev()
            .find(|(recipient, _, _)| recipient == email)
            .map(|(_, code, _)| code.clone())
    }
}

#[async_trait]
impl OtpDelivery for CapturingDelivery {
    async fn deliver(
        &self,
        recipient: &EmailAddress,
        code: &OtpCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), OtpDeliveryError> {
        self.sent.lock().expect("delivery lock").push((
            recipient.as_ref().to_owned(),
            code.expose().to_owned(),
            expires_at,
        ));
        Ok(())
    }
}
