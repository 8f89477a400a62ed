// libs/schedule-cell/src/services/availability.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::clinic::ClinicApiClient;
use shared_models::policy::PolicyConfig;

use crate::models::{
    AvailabilityError, BlackoutRule, BlockedDay, DayAvailability, ExistingBooking,
    Practitioner, Room, WeeklyScheduleEntry,
};
use crate::services::blackout::BlackoutIndex;
use crate::services::calendar::{base_slots, LunchWindow};
use crate::services::slots::resolve_slots;

/// Composes the pure availability pipeline over read snapshots fetched from
/// the clinic API: weekly schedule -> base slots -> blackout filter -> room
/// assignment.
pub struct AvailabilityService {
    clinic: ClinicApiClient,
    horizon_days: i64,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            clinic: ClinicApiClient::new(config),
            horizon_days: config.booking_horizon_days,
        }
    }

    /// Resolve the bookable slots for one practitioner and date.
    ///
    /// The result is valid only for the instant `now` it was computed for;
    /// when `date` is today callers should re-derive on a coarse timer. A
    /// blocked or unscheduled day yields an empty slot list, which is a
    /// normal outcome rather than an error.
    pub async fn day_availability(
        &self,
        practitioner_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<DayAvailability, AvailabilityError> {
        debug!("Resolving availability for practitioner {} on {}", practitioner_id, date);

        let practitioner = self.get_practitioner(practitioner_id, auth_token).await?;

        // Independent read snapshots, fetched concurrently and joined before
        // any computation.
        let (entries, rules, rooms, bookings, policy) = futures::try_join!(
            self.get_schedule_entries(practitioner_id, auth_token),
            self.get_blackout_rules(practitioner_id, auth_token),
            self.get_rooms(auth_token),
            self.get_day_bookings(practitioner_id, date, auth_token),
            self.get_policy(auth_token),
        )?;

        let index = BlackoutIndex::build(date, date, &rules);
        if let Some(block) = index.is_blocked(date) {
            debug!("Day {} is blocked for practitioner {}", date, practitioner_id);
            return Ok(DayAvailability {
                practitioner_id,
                date,
                blocked: Some(BlockedDay {
                    date,
                    scope: block.scope,
                    reason: block.reason.clone(),
                }),
                slots: Vec::new(),
            });
        }

        let base = base_slots(
            date,
            &entries,
            practitioner.slot_minutes,
            LunchWindow::default(),
            now,
            policy.min_lead_hours,
        );

        let booked_by_room = group_booked_times(&bookings);
        let slots = resolve_slots(&base, &rooms, practitioner.default_room_id, &booked_by_room);

        debug!("Found {} bookable slots", slots.len());
        Ok(DayAvailability {
            practitioner_id,
            date,
            blocked: None,
            slots,
        })
    }

    /// Expanded blocked days for a practitioner within a date window, global
    /// and practitioner-scoped rules merged.
    pub async fn blocked_days(
        &self,
        practitioner_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<BlockedDay>, AvailabilityError> {
        if to < from {
            return Err(AvailabilityError::InvalidRequest(
                "window end before window start".to_string(),
            ));
        }

        let rules = self.get_blackout_rules(practitioner_id, auth_token).await?;
        Ok(BlackoutIndex::build(from, to, &rules).blocked_days())
    }

    // Private helper methods

    async fn get_practitioner(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<Practitioner, AvailabilityError> {
        let path = format!("/rest/v1/practitioners?id=eq.{}", practitioner_id);
        let result: Vec<Practitioner> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        result
            .into_iter()
            .find(|p| p.active)
            .ok_or(AvailabilityError::PractitionerNotFound)
    }

    async fn get_schedule_entries(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<WeeklyScheduleEntry>, AvailabilityError> {
        let path = format!(
            "/rest/v1/schedule_entries?practitioner_id=eq.{}&active=eq.true&order=weekday.asc,start_minute.asc",
            practitioner_id
        );
        let entries: Vec<WeeklyScheduleEntry> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        Ok(entries)
    }

    async fn get_blackout_rules(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<BlackoutRule>, AvailabilityError> {
        // Annual rules cannot be windowed server-side; fetch the rule set and
        // expand locally.
        let path = format!(
            "/rest/v1/blackout_rules?or=(scope.eq.global,practitioner_id.eq.{})",
            practitioner_id
        );
        let rules: Vec<BlackoutRule> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        Ok(rules)
    }

    async fn get_rooms(&self, auth_token: &str) -> Result<Vec<Room>, AvailabilityError> {
        let path = "/rest/v1/rooms?active=eq.true&order=id.asc";
        let rooms: Vec<Room> = self
            .clinic
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        Ok(rooms)
    }

    async fn get_day_bookings(
        &self,
        practitioner_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<ExistingBooking>, AvailabilityError> {
        let path = format!(
            "/rest/v1/bookings?practitioner_id=eq.{}&date=eq.{}&state=in.(pending,confirmed)&order=time.asc",
            practitioner_id, date
        );
        let bookings: Vec<ExistingBooking> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        Ok(bookings)
    }

    async fn get_policy(&self, auth_token: &str) -> Result<PolicyConfig, AvailabilityError> {
        let path = "/rest/v1/clinic_policy?limit=1";
        let rows: Vec<PolicyConfig> = self
            .clinic
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| AvailabilityError::Upstream(e.to_string()))?;

        Ok(rows.into_iter().next().unwrap_or_else(|| {
            warn!("Clinic policy row missing, falling back to defaults");
            PolicyConfig {
                max_advance_days: self.horizon_days,
                ..PolicyConfig::default()
            }
        }))
    }
}

/// Occupied start times per room, considering only bookings that hold their
/// slot.
pub fn group_booked_times(bookings: &[ExistingBooking]) -> HashMap<Uuid, BTreeSet<NaiveTime>> {
    let mut booked: HashMap<Uuid, BTreeSet<NaiveTime>> = HashMap::new();
    for booking in bookings.iter().filter(|b| b.state.is_active()) {
        booked.entry(booking.room_id).or_default().insert(booking.time);
    }
    booked
}
