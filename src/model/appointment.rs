use chrono::{DateTime, FixedOffset};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Appointment {
    pub id: String,
    /// Kept in the offset the API sent it in.
    pub date: DateTime<FixedOffset>,
    pub user: AppointmentUser,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentUser {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Appointment {
    /// `hh:mm`, 12 hour clock.
    pub fn hour_formatted(&self) -> String {
        self.date.format("%I:%M").to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthAvailabilityItem {
    pub day: u32,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_payload() {
        let appointment: Appointment = serde_json::from_str(
            r#"{
                "id": "appointment-1",
                "date": "2020-05-20T14:00:00.000Z",
                "provider_id": "provider",
                "user": { "name": "John Doe", "avatar_url": null }
            }"#,
        )
        .unwrap();

        assert_eq!(appointment.hour_formatted(), "02:00");
        assert_eq!(appointment.user.avatar_url, None);
    }
}
