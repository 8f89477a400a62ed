use serde::{Deserialize, Serialize};

/// Which window the per-patient booking cap is counted over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapWindow {
    #[default]
    Day,
    Week,
}

/// Clinic-wide booking policy, externally owned reference data. Fetched as a
/// single row from the clinic policy API; missing fields fall back to the
/// clinic defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "defaults::max_active")]
    pub max_active_appointments_per_patient: u32,
    #[serde(default = "defaults::max_per_window")]
    pub max_appointments_per_patient_per_day: u32,
    #[serde(default)]
    pub cap_window: CapWindow,
    #[serde(default = "defaults::min_lead_hours")]
    pub min_lead_hours: i64,
    #[serde(default = "defaults::auto_confirm_within_hours")]
    pub auto_confirm_within_hours: i64,
    #[serde(default = "defaults::cooldown_days")]
    pub cooldown_days: i64,
    #[serde(default = "defaults::max_reschedules")]
    pub max_reschedules_per_appointment: u32,
    #[serde(default = "defaults::max_advance_days")]
    pub max_advance_days: i64,
    #[serde(default = "defaults::manage_until_hours")]
    pub manage_until_hours: i64,
}

mod defaults {
    pub fn max_active() -> u32 {
        2
    }
    pub fn max_per_window() -> u32 {
        1
    }
    pub fn min_lead_hours() -> i64 {
        2
    }
    pub fn auto_confirm_within_hours() -> i64 {
        24
    }
    pub fn cooldown_days() -> i64 {
        3
    }
    pub fn max_reschedules() -> u32 {
        1
    }
    pub fn max_advance_days() -> i64 {
        90
    }
    pub fn manage_until_hours() -> i64 {
        24
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_active_appointments_per_patient: defaults::max_active(),
            max_appointments_per_patient_per_day: defaults::max_per_window(),
            cap_window: CapWindow::default(),
            min_lead_hours: defaults::min_lead_hours(),
            auto_confirm_within_hours: defaults::auto_confirm_within_hours(),
            cooldown_days: defaults::cooldown_days(),
            max_reschedules_per_appointment: defaults::max_reschedules(),
            max_advance_days: defaults::max_advance_days(),
            manage_until_hours: defaults::manage_until_hours(),
        }
    }
}
