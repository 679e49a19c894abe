use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::{
    client::ApiClient,
    dto::{
        upload::{FileUpload, UploadForm},
        workshops::fields,
    },
    error::{ClientError, ClientResult},
    models::{ResourceId, Workshop, WorkshopStatus},
    scope::ViewScope,
    validation::{
        MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, is_valid_clock_time, max_chars, require,
        validate_http_link, validate_image,
    },
};

use super::{
    Confirm, LoadState, Outcome,
    collection::{Action, SharedCollection},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkshopForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    pub time: String,
    pub max_participants: u32,
    pub status: WorkshopStatus,
    pub registration_link: String,
    image: Option<FileUpload>,
}

impl Default for WorkshopForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            date: None,
            time: String::new(),
            max_participants: 10,
            status: WorkshopStatus::Upcoming,
            registration_link: String::new(),
            image: None,
        }
    }
}

impl WorkshopForm {
    pub fn image(&self) -> Option<&FileUpload> {
        self.image.as_ref()
    }

    /// Rejected files leave the current image in place.
    pub fn attach_image(&mut self, upload: FileUpload) -> ClientResult<()> {
        validate_image(&upload)?;
        self.image = Some(upload);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn to_upload(&self) -> ClientResult<UploadForm> {
        require(&self.title, "Title")?;
        max_chars(&self.title, MAX_TITLE_CHARS, "Title")?;
        max_chars(&self.description, MAX_DESCRIPTION_CHARS, "Description")?;
        require(&self.location, "Location")?;
        let date = self
            .date
            .ok_or_else(|| ClientError::validation("Date is required"))?;
        if !self.time.is_empty() && !is_valid_clock_time(&self.time) {
            return Err(ClientError::validation("Time must be HH:MM"));
        }
        if self.max_participants == 0 {
            return Err(ClientError::validation(
                "Maximum participants must be at least 1",
            ));
        }
        let link = self.registration_link.trim();
        if !link.is_empty() {
            validate_http_link(link)?;
        }

        let mut upload = UploadForm::default()
            .text(fields::TITLE, self.title.trim())
            .text(fields::DESCRIPTION, self.description.trim())
            .text(fields::LOCATION, self.location.trim())
            .text(fields::DATE, date.format("%Y-%m-%d").to_string())
            .text(fields::MAX_PARTICIPANTS, self.max_participants.to_string())
            .text(fields::STATUS, self.status.as_str());
        if !self.time.is_empty() {
            upload = upload.text(fields::TIME, self.time.clone());
        }
        if !link.is_empty() {
            upload = upload.text(fields::REGISTRATION_LINK, link);
        }
        if let Some(image) = &self.image {
            upload = upload.file(fields::IMAGE, image.clone());
        }
        Ok(upload)
    }
}

pub struct WorkshopScreen {
    client: ApiClient,
    confirm: Arc<dyn Confirm>,
    scope: ViewScope,
    workshops: SharedCollection<Workshop>,
    form: Mutex<WorkshopForm>,
}

impl WorkshopScreen {
    pub fn new(client: ApiClient, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            scope: ViewScope::new(),
            workshops: SharedCollection::default(),
            form: Mutex::new(WorkshopForm::default()),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn workshops(&self) -> Vec<Workshop> {
        self.workshops.snapshot()
    }

    pub fn state(&self) -> LoadState {
        self.workshops.state()
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.workshops.is_busy(action)
    }

    pub fn form(&self) -> WorkshopForm {
        self.form_lock().clone()
    }

    pub fn edit_form<R>(&self, edit: impl FnOnce(&mut WorkshopForm) -> R) -> R {
        edit(&mut self.form_lock())
    }

    pub async fn load(&self) -> ClientResult<usize> {
        self.workshops
            .fetch(&self.scope, self.client.list_workshops())
            .await
    }

    pub async fn create(&self) -> ClientResult<Workshop> {
        let upload = self.form_lock().to_upload()?;
        let _busy = self.workshops.begin(Action::Create)?;
        let created = self
            .scope
            .run(self.client.create_workshop(upload))
            .await?;
        self.workshops.lock().prepend(created.clone());
        *self.form_lock() = WorkshopForm::default();
        tracing::debug!(title = %created.title, "workshop created");
        Ok(created)
    }

    pub async fn delete(&self, id: Option<&ResourceId>) -> ClientResult<Outcome> {
        let client = &self.client;
        self.workshops
            .delete_confirmed(
                &self.scope,
                self.confirm.as_ref(),
                id,
                "Delete this workshop? Registered participants will not be notified.",
                |id| async move { client.delete_workshop(&id).await },
            )
            .await
    }

    fn form_lock(&self) -> MutexGuard<'_, WorkshopForm> {
        self.form
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> WorkshopForm {
        WorkshopForm {
            title: "Abaca Weaving 101".into(),
            description: "Hands-on basics".into(),
            location: "Davao City".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 14),
            time: "14:00".into(),
            max_participants: 12,
            ..Default::default()
        }
    }

    #[test]
    fn complete_form_maps_to_api_fields() {
        let upload = filled().to_upload().unwrap();
        assert_eq!(upload.field(fields::TITLE), Some("Abaca Weaving 101"));
        assert_eq!(upload.field(fields::DATE), Some("2026-11-14"));
        assert_eq!(upload.field(fields::MAX_PARTICIPANTS), Some("12"));
        assert_eq!(upload.field(fields::STATUS), Some("upcoming"));
        assert_eq!(upload.field(fields::REGISTRATION_LINK), None);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut form = filled();
        form.date = None;
        assert!(form.to_upload().is_err());

        let mut form = filled();
        form.max_participants = 0;
        assert!(form.to_upload().is_err());

        let mut form = filled();
        form.registration_link = "forms.example.com".into();
        assert!(form.to_upload().is_err());

        let mut form = filled();
        form.time = "2pm".into();
        assert!(form.to_upload().is_err());
    }

    #[test]
    fn oversized_image_is_not_attached() {
        let mut form = filled();
        let big = FileUpload::new("poster.jpg", "image/jpeg", vec![0; 11 * 1024 * 1024]);
        assert!(form.attach_image(big).is_err());
        assert!(form.image().is_none());
    }
}
