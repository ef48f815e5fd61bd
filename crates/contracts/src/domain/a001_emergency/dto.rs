use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterTypeDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRefDto {
    pub id: i64,
    pub name: String,
    pub iso3: Option<String>,
}

/// Emergency row as returned by `/api/v2/event/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyDto {
    pub id: i64,
    pub name: String,
    pub dtype: Option<DisasterTypeDto>,
    #[serde(default)]
    pub countries: Vec<CountryRefDto>,
    pub disaster_start_date: Option<DateTime<Utc>>,
    pub num_affected: Option<i64>,
    pub glide: Option<String>,
}

impl EmergencyDto {
    pub fn country_names(&self) -> String {
        self.countries
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Filter of the emergency list; unset fields are omitted from the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disaster_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_after: Option<NaiveDate>,
}

/// Days covered by the default "recent emergencies" window
pub const RECENT_WINDOW_DAYS: i64 = 30;

impl EmergencyFilter {
    /// Emergencies that started within the last thirty days of `today`
    pub fn recent(today: NaiveDate) -> Self {
        Self {
            start_date_after: Some(today - Duration::days(RECENT_WINDOW_DAYS)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recent_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let filter = EmergencyFilter::recent(today);
        assert_eq!(
            filter.start_date_after,
            NaiveDate::from_ymd_opt(2024, 2, 14)
        );
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_filter_omits_unset_fields() {
        let filter = EmergencyFilter {
            search: Some("cyclone".to_string()),
            ..EmergencyFilter::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"search": "cyclone"})
        );
    }

    #[test]
    fn test_country_names() {
        let dto: EmergencyDto = serde_json::from_value(json!({
            "id": 1,
            "name": "Cyclone Freddy",
            "dtype": {"id": 4, "name": "Cyclone"},
            "countries": [
                {"id": 1, "name": "Malawi", "iso3": "MWI"},
                {"id": 2, "name": "Mozambique", "iso3": "MOZ"}
            ],
            "disaster_start_date": "2023-02-21T00:00:00Z",
            "num_affected": 1200000,
            "glide": null
        }))
        .unwrap();
        assert_eq!(dto.country_names(), "Malawi, Mozambique");
    }
}
