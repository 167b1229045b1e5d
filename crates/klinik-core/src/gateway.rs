//! Patient mutation gateway over the external patient-data client.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::config::Messages;
use crate::models::{NotificationKind, Patient, PatientDraft};
use crate::notify::NotificationChannel;
use crate::router::ViewRouter;

/// Patient-data collaborator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Patient service unavailable: {0}")]
    Unavailable(String),

    #[error("Patient service error: {0}")]
    Backend(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// External patient-data collaborator.
pub trait PatientService: Send + Sync {
    /// Store a new patient; the returned record carries the assigned ID.
    fn create_patient(&self, draft: &PatientDraft) -> ServiceResult<Patient>;
}

/// Result of a single create attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created(Patient),
    /// Carries the user-facing message that was shown
    Failed(String),
}

impl MutationOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, MutationOutcome::Created(_))
    }
}

/// Creates patients and keeps the locally known sequence.
pub struct PatientGateway {
    service: Arc<dyn PatientService>,
    patients: Vec<Patient>,
}

impl PatientGateway {
    pub fn new(service: Arc<dyn PatientService>) -> Self {
        Self {
            service,
            patients: Vec::new(),
        }
    }

    /// Patients created in this session, in creation order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn service(&self) -> Arc<dyn PatientService> {
        self.service.clone()
    }

    /// Submit a draft. Failure is terminal for this attempt; there is no retry.
    pub fn create(
        &mut self,
        draft: PatientDraft,
        notifications: &mut NotificationChannel,
        router: &mut ViewRouter,
        messages: &Messages,
    ) -> MutationOutcome {
        let result = self.service.create_patient(&draft);
        self.apply(result, notifications, router, messages)
    }

    /// Record the result of a create call made through [`Self::service`].
    pub fn apply(
        &mut self,
        result: ServiceResult<Patient>,
        notifications: &mut NotificationChannel,
        router: &mut ViewRouter,
        messages: &Messages,
    ) -> MutationOutcome {
        match result {
            Ok(patient) => {
                info!(patient_id = %patient.id, "patient created");
                self.patients.push(patient.clone());
                notifications.show(NotificationKind::Success, messages.patient_saved.as_str());
                router.to_patients();
                MutationOutcome::Created(patient)
            }
            Err(e) => {
                error!(error = %e, "error adding patient");
                notifications.show(NotificationKind::Error, messages.patient_save_failed.as_str());
                MutationOutcome::Failed(messages.patient_save_failed.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Notification, ViewTag};
    use crate::testing::FakePatients;

    fn setup(service: Arc<FakePatients>) -> (PatientGateway, NotificationChannel, ViewRouter) {
        (PatientGateway::new(service), NotificationChannel::new(), ViewRouter::new())
    }

    #[test]
    fn test_create_success() {
        let service = Arc::new(FakePatients::default());
        let (mut gateway, mut notifications, mut router) = setup(service.clone());
        router.to_new_patient();

        let outcome = gateway.create(
            PatientDraft::new("Budi Santoso", Gender::Male),
            &mut notifications,
            &mut router,
            &Messages::default(),
        );

        let MutationOutcome::Created(record) = outcome else {
            panic!("expected created outcome");
        };
        assert_eq!(gateway.patients(), &[record.clone()]);
        assert_eq!(record.name, "Budi Santoso");
        assert!(!record.id.is_empty());
        assert_eq!(
            notifications.current(),
            Some(&Notification::success("Data pasien berhasil disimpan"))
        );
        assert_eq!(router.current_view(), ViewTag::PatientList);
        assert_eq!(router.active_menu(), "patient-list");
    }

    #[test]
    fn test_create_appends_at_end() {
        let service = Arc::new(FakePatients::default());
        let (mut gateway, mut notifications, mut router) = setup(service);
        let messages = Messages::default();

        gateway.create(PatientDraft::new("A", Gender::Male), &mut notifications, &mut router, &messages);
        let outcome =
            gateway.create(PatientDraft::new("B", Gender::Female), &mut notifications, &mut router, &messages);

        assert_eq!(gateway.patients().len(), 2);
        assert_eq!(MutationOutcome::Created(gateway.patients()[1].clone()), outcome);
        assert_eq!(gateway.patients()[1].name, "B");
    }

    #[test]
    fn test_create_failure() {
        let service = Arc::new(FakePatients::default());
        service.fail_with(ServiceError::Unavailable("timeout".into()));
        let (mut gateway, mut notifications, mut router) = setup(service);
        router.to_new_patient();
        let before = router.state().clone();

        let outcome = gateway.create(
            PatientDraft::new("Budi", Gender::Male),
            &mut notifications,
            &mut router,
            &Messages::default(),
        );

        assert_eq!(outcome, MutationOutcome::Failed("Gagal menyimpan data pasien".into()));
        assert!(gateway.patients().is_empty());
        assert_eq!(
            notifications.current(),
            Some(&Notification::error("Gagal menyimpan data pasien"))
        );
        assert_eq!(router.state(), &before);
    }

    #[test]
    fn test_failure_message_comes_from_config() {
        let service = Arc::new(FakePatients::default());
        service.fail_with(ServiceError::Validation("name required".into()));
        let (mut gateway, mut notifications, mut router) = setup(service);
        let messages = Messages {
            patient_save_failed: "Could not save patient".into(),
            ..Messages::default()
        };

        let outcome = gateway.create(PatientDraft::new("", Gender::Male), &mut notifications, &mut router, &messages);
        assert_eq!(outcome, MutationOutcome::Failed("Could not save patient".into()));
        assert_eq!(notifications.current().unwrap().message, "Could not save patient");
    }

    #[test]
    fn test_apply_external_result() {
        let service = Arc::new(FakePatients::default());
        let (mut gateway, mut notifications, mut router) = setup(service.clone());
        let messages = Messages::default();

        let result = gateway.service().create_patient(&PatientDraft::new("Ani", Gender::Female));
        let outcome = gateway.apply(result, &mut notifications, &mut router, &messages);

        assert!(outcome.is_created());
        assert_eq!(gateway.patients().len(), 1);
        assert_eq!(service.created(), 1);
        assert_eq!(router.current_view(), ViewTag::PatientList);
    }
}
