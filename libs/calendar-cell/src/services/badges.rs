// libs/calendar-cell/src/services/badges.rs
use chrono::NaiveDate;
use reqwest::Method;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::clinic::ClinicApiClient;

use schedule_cell::models::{BlackoutRule, BookingState, ExistingBooking};
use schedule_cell::services::blackout::BlackoutIndex;

use crate::models::{CalendarError, DayBadge, MonthKey};
use crate::services::aggregate::{aggregate_month, month_bounds, neighbor_months};
use crate::services::cache::MonthBadgeCache;

/// Month badge aggregation behind the explicit month cache. One instance
/// lives for the process so the cache survives across requests.
pub struct CalendarService {
    clinic: ClinicApiClient,
    cache: Arc<MonthBadgeCache>,
}

impl CalendarService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            clinic: ClinicApiClient::new(config),
            cache: Arc::new(MonthBadgeCache::new()),
        }
    }

    pub fn with_cache(config: &AppConfig, cache: Arc<MonthBadgeCache>) -> Self {
        Self {
            clinic: ClinicApiClient::new(config),
            cache,
        }
    }

    /// Badges for the visible month. The previous and next months are
    /// aggregated in the same pass so calendar navigation to an adjacent
    /// month is served from cache; a neighbor that fails to load only logs,
    /// it never fails the visible month.
    pub async fn month_badges(
        &self,
        practitioner_id: Uuid,
        year: i32,
        month: u32,
        room_filter: Option<Uuid>,
        state_filter: Option<BookingState>,
        auth_token: &str,
    ) -> Result<BTreeMap<NaiveDate, DayBadge>, CalendarError> {
        debug!("Aggregating calendar badges for {}-{:02}", year, month);

        let ((prev_year, prev_month), (next_year, next_month)) = neighbor_months(year, month);

        let (current, prev, next) = futures::join!(
            self.load_month(practitioner_id, year, month, room_filter, state_filter, auth_token),
            self.load_month(practitioner_id, prev_year, prev_month, room_filter, state_filter, auth_token),
            self.load_month(practitioner_id, next_year, next_month, room_filter, state_filter, auth_token),
        );

        if let Err(e) = prev {
            warn!("Prefetch of {}-{:02} failed: {}", prev_year, prev_month, e);
        }
        if let Err(e) = next {
            warn!("Prefetch of {}-{:02} failed: {}", next_year, next_month, e);
        }

        current
    }

    /// Evict every cached variant of one month, e.g. after a booking
    /// mutation reported by the write API.
    pub fn refresh_month(&self, year: i32, month: u32) {
        debug!("Evicting cached badges for {}-{:02}", year, month);
        self.cache.evict_month(year, month);
    }

    pub fn cache(&self) -> &MonthBadgeCache {
        &self.cache
    }

    async fn load_month(
        &self,
        practitioner_id: Uuid,
        year: i32,
        month: u32,
        room_filter: Option<Uuid>,
        state_filter: Option<BookingState>,
        auth_token: &str,
    ) -> Result<BTreeMap<NaiveDate, DayBadge>, CalendarError> {
        let (first, last) = month_bounds(year, month).ok_or(CalendarError::InvalidMonth(month))?;

        let key = MonthKey {
            year,
            month,
            practitioner_id: Some(practitioner_id),
            room_id: room_filter,
            state: state_filter,
        };

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let (bookings, rules) = futures::try_join!(
            self.get_month_bookings(practitioner_id, first, last, room_filter, state_filter, auth_token),
            self.get_blackout_rules(practitioner_id, auth_token),
        )?;

        let index = BlackoutIndex::build(first, last, &rules);
        let badges = aggregate_month(first, last, &bookings, &index);

        self.cache.insert(key, badges.clone());
        Ok(badges)
    }

    async fn get_month_bookings(
        &self,
        practitioner_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
        room_filter: Option<Uuid>,
        state_filter: Option<BookingState>,
        auth_token: &str,
    ) -> Result<Vec<ExistingBooking>, CalendarError> {
        let mut path = format!(
            "/rest/v1/bookings?practitioner_id=eq.{}&date=gte.{}&date=lte.{}",
            practitioner_id, first, last
        );
        if let Some(room_id) = room_filter {
            path.push_str(&format!("&room_id=eq.{}", room_id));
        }
        match state_filter {
            Some(state) => path.push_str(&format!("&state=eq.{}", state)),
            None => path.push_str("&state=in.(pending,confirmed,realized)"),
        }

        let bookings: Vec<ExistingBooking> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Upstream(e.to_string()))?;

        Ok(bookings)
    }

    async fn get_blackout_rules(
        &self,
        practitioner_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<BlackoutRule>, CalendarError> {
        let path = format!(
            "/rest/v1/blackout_rules?or=(scope.eq.global,practitioner_id.eq.{})",
            practitioner_id
        );
        let rules: Vec<BlackoutRule> = self
            .clinic
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CalendarError::Upstream(e.to_string()))?;

        Ok(rules)
    }
}
