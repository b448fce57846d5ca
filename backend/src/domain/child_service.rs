//! Child profile CRUD, scoped to the owning parent.

use chrono::NaiveDate;
use shared::{ChildView, CreateChildRequest, Gender, UpdateChildRequest};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::models::Child;
use crate::error::AppError;
use crate::storage::children;

#[derive(Clone)]
pub struct ChildService {
    db: DbConnection,
}

impl ChildService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateChildRequest,
    ) -> Result<ChildView, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::invalid_field("name", "Child name is required"));
        }
        let date_of_birth = NaiveDate::parse_from_str(&request.date_of_birth, "%Y-%m-%d")
            .map_err(|_| {
                AppError::invalid_field("dateOfBirth", "Date of birth must be YYYY-MM-DD")
            })?;

        let mut child = Child::new(&caller.id, request.name.trim(), date_of_birth);
        child.gender = request.gender.unwrap_or(Gender::PreferNotToSay);
        child.interests = request.interests;
        child.allergies = request.allergies;
        child.notes = request.notes;
        children::insert_child(self.db.pool(), &child).await?;

        tracing::info!(child_id = %child.id, parent_id = %caller.id, "child profile created");
        Ok(child.view())
    }

    pub async fn get(&self, caller: &AuthUser, id: &str) -> Result<ChildView, AppError> {
        Ok(self.owned_child(caller, id).await?.view())
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<ChildView>, AppError> {
        let listed = children::list_for_parent(self.db.pool(), &caller.id).await?;
        Ok(listed.iter().map(Child::view).collect())
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        id: &str,
        request: UpdateChildRequest,
    ) -> Result<ChildView, AppError> {
        let mut child = self.owned_child(caller, id).await?;

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_field("name", "Child name is required"));
            }
            child.name = name.trim().to_string();
        }
        if let Some(interests) = request.interests {
            child.interests = interests;
        }
        if let Some(allergies) = request.allergies {
            child.allergies = allergies;
        }
        if let Some(medications) = request.medications {
            child.medications = medications;
        }
        if request.notes.is_some() {
            child.notes = request.notes;
        }

        children::update_child(self.db.pool(), &child).await?;
        Ok(child.view())
    }

    /// Load a child the caller may act on, or 404 without revealing whether
    /// the row exists.
    pub(crate) async fn owned_child(&self, caller: &AuthUser, id: &str) -> Result<Child, AppError> {
        let child = children::find_by_id(self.db.pool(), id)
            .await?
            .ok_or(AppError::NotFound("Child"))?;
        if !caller.can_access_child(&child.parent_id) {
            return Err(AppError::NotFound("Child"));
        }
        Ok(child)
    }
}
