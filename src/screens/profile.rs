use std::sync::Arc;

use crate::{
    client::ApiClient,
    dto::profile::UpdateProfileRequest,
    error::{ClientError, ClientResult},
    models::SellerProfile,
    scope::ViewScope,
    validation::{is_valid_ph_mobile, require},
};

use super::{Confirm, LoadState, Navigation, Outcome};

/// Read-modify-write over the seller's profile. Edits only touch the draft;
/// the canonical copy changes only after the API accepts a save.
pub struct ProfileEditor {
    client: ApiClient,
    confirm: Arc<dyn Confirm>,
    scope: ViewScope,
    state: LoadState,
    canonical: Option<SellerProfile>,
    draft: Option<SellerProfile>,
    editing: bool,
}

impl ProfileEditor {
    pub fn new(client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            scope: ViewScope::new(),
            state: LoadState::Idle,
            canonical: None,
            draft: None,
            editing: false,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn profile(&self) -> Option<&SellerProfile> {
        self.canonical.as_ref()
    }

    pub fn draft(&self) -> Option<&SellerProfile> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        if self.scope.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        match self.scope.run(self.client.get_profile()).await {
            Ok(profile) => {
                self.draft = Some(profile.clone());
                self.canonical = Some(profile);
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(ClientError::Cancelled) => {
                self.state = previous;
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                self.state = LoadState::Errored(err.to_string());
                Err(err)
            }
        }
    }

    pub fn begin_edit(&mut self) -> ClientResult<()> {
        if self.canonical.is_none() {
            return Err(ClientError::validation("Profile has not been loaded"));
        }
        self.editing = true;
        Ok(())
    }

    /// Applies `edit` to the draft. The role is read-only and is restored afterwards.
    pub fn edit(&mut self, edit: impl FnOnce(&mut SellerProfile)) -> ClientResult<()> {
        if !self.editing {
            return Err(ClientError::validation("Not in edit mode"));
        }
        let canonical_role = self
            .canonical
            .as_ref()
            .map(|p| p.role.clone())
            .unwrap_or_default();
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| ClientError::validation("Profile has not been loaded"))?;
        edit(draft);
        draft.role = canonical_role;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft = self.canonical.clone();
        self.editing = false;
    }

    /// Sends the whole draft; on success it becomes canonical and edit mode ends.
    pub async fn save(&mut self) -> ClientResult<Outcome> {
        if !self.editing {
            return Ok(Outcome::Unchanged);
        }
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| ClientError::validation("Profile has not been loaded"))?;
        if self.canonical.as_ref() == Some(draft) {
            self.editing = false;
            return Ok(Outcome::Unchanged);
        }
        validate_profile(draft)?;

        let payload = UpdateProfileRequest::from(draft);
        let saved = self
            .scope
            .run(self.client.update_profile(&payload))
            .await?;
        self.draft = Some(saved.clone());
        self.canonical = Some(saved);
        self.editing = false;
        tracing::info!("profile updated");
        Ok(Outcome::Changed)
    }

    pub async fn deactivate(&mut self) -> ClientResult<Navigation> {
        if !self.confirm.confirm(
            "Deactivate your seller account? Your shop will be hidden until you sign in again.",
        ) {
            return Ok(Navigation::Stay);
        }
        self.scope.run(self.client.deactivate_account()).await?;
        self.end_session()
    }

    pub async fn delete_account(&mut self) -> ClientResult<Navigation> {
        if !self.confirm.confirm(
            "Permanently delete your account and all of its products? This cannot be undone.",
        ) {
            return Ok(Navigation::Stay);
        }
        self.scope.run(self.client.delete_account()).await?;
        self.end_session()
    }

    fn end_session(&mut self) -> ClientResult<Navigation> {
        self.client.session().clear()?;
        self.canonical = None;
        self.draft = None;
        self.editing = false;
        self.state = LoadState::Idle;
        tracing::info!("session cleared, redirecting to login");
        Ok(Navigation::Login)
    }
}

fn validate_profile(profile: &SellerProfile) -> ClientResult<()> {
    require(&profile.user_name, "Name")?;
    require(&profile.user_email, "Email")?;
    if !profile.user_email.contains('@') {
        return Err(ClientError::validation("Email address is not valid"));
    }
    if let Some(number) = profile.contact_number.as_deref().filter(|n| !n.is_empty()) {
        if !is_valid_ph_mobile(number) {
            return Err(ClientError::validation(
                "Contact number must be a Philippine mobile number",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_validation() {
        let mut profile = SellerProfile {
            user_name: "Liza".into(),
            user_email: "liza@example.com".into(),
            ..Default::default()
        };
        assert!(validate_profile(&profile).is_ok());

        profile.contact_number = Some("12345".into());
        assert!(validate_profile(&profile).is_err());

        profile.contact_number = Some("+639171234567".into());
        assert!(validate_profile(&profile).is_ok());

        profile.user_email = "liza".into();
        assert!(validate_profile(&profile).is_err());
    }

    #[tokio::test]
    async fn load_on_a_cancelled_scope_keeps_state() {
        let client = ApiClient::with_client(
            "http://127.0.0.1:9/api",
            crate::session::Session::in_memory(),
            reqwest::Client::new(),
        );
        let mut editor = ProfileEditor::new(client, Arc::new(|_: &str| true));
        editor.scope().cancel();

        assert!(matches!(editor.load().await, Err(ClientError::Cancelled)));
        assert_eq!(editor.state(), &LoadState::Idle);
    }

    #[tokio::test]
    async fn load_cancelled_in_flight_restores_state() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = ApiClient::with_client(
            &format!("http://{}/api", listener.local_addr().unwrap()),
            crate::session::Session::in_memory(),
            reqwest::Client::new(),
        );
        let mut editor = ProfileEditor::new(client, Arc::new(|_: &str| true));
        let handle = editor.scope().handle();

        let (result, _) = tokio::join!(editor.load(), async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            handle.cancel();
        });

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(editor.state(), &LoadState::Idle);
        assert!(editor.profile().is_none());
    }
}
