// libs/booking-policy-cell/src/services/decision.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::clinic::ClinicApiClient;
use shared_models::policy::PolicyConfig;

use schedule_cell::models::BlackoutRule;
use schedule_cell::services::blackout::BlackoutIndex;

use crate::models::{
    ActiveAppointment, BookingCandidate, BookingDecision, CancellationRecord,
    EvaluateBookingRequest, PatientBookingHistory, PolicyError, RescheduleCheckRequest,
    RescheduleDecision,
};
use crate::services::policy::{evaluate_booking, evaluate_reschedule};

/// Gathers the read snapshots a booking decision needs and runs the pure
/// evaluator over them. Holds no write authority; a stale snapshot that loses
/// the race to the write API surfaces there as a conflict and the caller
/// recomputes.
pub struct PolicyService {
    clinic: ClinicApiClient,
    horizon_days: i64,
}

impl PolicyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            clinic: ClinicApiClient::new(config),
            horizon_days: config.booking_horizon_days,
        }
    }

    pub async fn evaluate(
        &self,
        request: EvaluateBookingRequest,
        auth_token: &str,
    ) -> Result<BookingDecision, PolicyError> {
        debug!(
            "Evaluating booking for patient {} with practitioner {} on {} {}",
            request.patient_id, request.practitioner_id, request.date, request.time
        );

        // Identity checks are input errors, reported before any policy work.
        self.verify_patient_exists(request.patient_id, auth_token).await?;
        self.verify_practitioner_exists(request.practitioner_id, auth_token).await?;

        let now = Utc::now();

        let (history, config, rules) = futures::try_join!(
            self.get_patient_history(request.patient_id, auth_token),
            self.get_policy(auth_token),
            self.get_blackout_rules(request.practitioner_id, auth_token),
        )?;

        let index = BlackoutIndex::build(request.date, request.date, &rules);

        let candidate = BookingCandidate {
            patient_id: request.patient_id,
            practitioner_id: request.practitioner_id,
            date: request.date,
            time: request.time,
        };

        let decision = evaluate_booking(
            &candidate,
            &history,
            index.is_blocked(request.date),
            &config,
            now,
            request.context,
        );

        info!(
            "Booking decision for patient {}: admitted={} violations={}",
            request.patient_id,
            decision.admitted,
            decision.violations.len()
        );
        Ok(decision)
    }

    pub async fn check_reschedule(
        &self,
        request: RescheduleCheckRequest,
        auth_token: &str,
    ) -> Result<RescheduleDecision, PolicyError> {
        let config = self.get_policy(auth_token).await?;
        Ok(evaluate_reschedule(
            request.date,
            request.time,
            request.reschedule_count,
            &config,
            Utc::now(),
        ))
    }

    // Private helper methods

    async fn verify_patient_exists(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<(), PolicyError> {
        let path = format!("/rest/v1/patients?id=eq.{}&select=id", patient_id);
        let result: Vec<Value> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PolicyError::Upstream(e.to_string()))?;

        if result.is_empty() {
            return Err(PolicyError::PatientNotFound);
        }
        Ok(())
    }

    async fn verify_practitioner_exists(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<(), PolicyError> {
        let path = format!("/rest/v1/practitioners?id=eq.{}&select=id", practitioner_id);
        let result: Vec<Value> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PolicyError::Upstream(e.to_string()))?;

        if result.is_empty() {
            return Err(PolicyError::PractitionerNotFound);
        }
        Ok(())
    }

    async fn get_patient_history(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<PatientBookingHistory, PolicyError> {
        let active_path = format!(
            "/rest/v1/bookings?patient_id=eq.{}&state=in.(pending,confirmed)&order=date.asc",
            patient_id
        );
        let cancellations_path = format!(
            "/rest/v1/patient_cancellations?patient_id=eq.{}&order=cancelled_at.desc&limit=50",
            patient_id
        );

        let (active, cancellations): (Vec<ActiveAppointment>, Vec<CancellationRecord>) =
            futures::try_join!(
                async {
                    self.clinic
                        .request(Method::GET, &active_path, Some(auth_token), None)
                        .await
                        .map_err(|e| PolicyError::Upstream(e.to_string()))
                },
                async {
                    self.clinic
                        .request(Method::GET, &cancellations_path, Some(auth_token), None)
                        .await
                        .map_err(|e| PolicyError::Upstream(e.to_string()))
                },
            )?;

        Ok(PatientBookingHistory { active, cancellations })
    }

    async fn get_policy(&self, auth_token: &str) -> Result<PolicyConfig, PolicyError> {
        let path = "/rest/v1/clinic_policy?limit=1";
        let rows: Vec<PolicyConfig> = self
            .clinic
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| PolicyError::Upstream(e.to_string()))?;

        Ok(rows.into_iter().next().unwrap_or_else(|| {
            warn!("Clinic policy row missing, falling back to defaults");
            PolicyConfig {
                max_advance_days: self.horizon_days,
                ..PolicyConfig::default()
            }
        }))
    }

    async fn get_blackout_rules(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<BlackoutRule>, PolicyError> {
        let path = format!(
            "/rest/v1/blackout_rules?or=(scope.eq.global,practitioner_id.eq.{})",
            practitioner_id
        );
        let rules: Vec<BlackoutRule> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| PolicyError::Upstream(e.to_string()))?;

        Ok(rules)
    }
}
