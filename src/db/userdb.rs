use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::Profile;

#[async_trait]
pub trait UserExt {
    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, sqlx::Error>;

    /// Connected-account id at the payment processor for a driver.
    /// `None` covers both a missing row and an unset column.
    async fn get_stripe_account_id(&self, driver_id: Uuid) -> Result<Option<String>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, email, role, approved, stripe_account_id, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_stripe_account_id(&self, driver_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        let account: Option<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT stripe_account_id
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account.flatten())
    }
}
