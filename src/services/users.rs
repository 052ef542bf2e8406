use crate::{
    entities::user::{self, Entity as User},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

/// Login-or-register plumbing. Password storage hardening is out of scope
/// for this service.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Logs a user in, registering them on first sight. Returns the user id.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn login(&self, input: LoginInput) -> Result<Uuid, ServiceError> {
        let existing = User::find()
            .filter(user::Column::Name.eq(input.name.as_str()))
            .one(&*self.db)
            .await?;

        match existing {
            Some(found) => {
                if found.password != input.password {
                    return Err(ServiceError::Unauthorized("invalid credentials".to_string()));
                }
                Ok(found.id)
            }
            None => {
                let created = user::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(input.name),
                    password: Set(input.password),
                    created_at: Set(Utc::now()),
                }
                .insert(&*self.db)
                .await?;

                self.event_sender
                    .send_or_log(Event::UserRegistered(created.id))
                    .await;

                info!("Registered user {}", created.id);
                Ok(created.id)
            }
        }
    }
}
