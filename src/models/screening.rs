use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Формат сеанса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PresentationType {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "IMAX")]
    Imax,
}

impl PresentationType {
    pub fn label(&self) -> &'static str {
        match self {
            PresentationType::TwoD => "2D",
            PresentationType::ThreeD => "3D",
            PresentationType::Imax => "IMAX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screening {
    pub id: i64,
    pub movie_id: i64,
    #[serde(default)]
    pub cinema_id: Option<i64>,
    pub hall_id: i64,
    #[serde(default)]
    pub hall_name: Option<String>,
    #[serde(deserialize_with = "local_date_time")]
    pub start_time: NaiveDateTime,
    pub price: f64,
    #[serde(default, rename = "type")]
    pub presentation: PresentationType,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub seats_per_row: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rows: u32,
    #[serde(default, alias = "cols")]
    pub seats_per_row: u32,
}

/// Тело запроса POST /admin/screenings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreeningRequest {
    pub movie_id: i64,
    pub hall_id: i64,
    #[serde(serialize_with = "naive_iso")]
    pub start_time: NaiveDateTime,
    pub price: f64,
}

/// Время сеанса как местное время: сервер присылает LocalDateTime без зоны,
/// но RFC 3339 со смещением тоже принимаем и переводим в локальную зону.
pub fn local_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_local_date_time(&raw).map_err(serde::de::Error::custom)
}

pub fn optional_local_date_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_local_date_time(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn parse_local_date_time(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("invalid date-time '{}': {}", raw, e))
}

fn naive_iso<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn decodes_java_local_date_time() {
        let s: Screening = serde_json::from_str(
            r#"{"id":3,"movieId":1,"hallId":2,"hallName":"Red","startTime":"2026-10-18T19:30:00","price":12.5,"rows":8,"seatsPerRow":10}"#,
        )
        .unwrap();
        assert_eq!(
            s.start_time,
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(19, 30, 0).unwrap()
        );
        assert_eq!(s.presentation, PresentationType::TwoD);
        assert_eq!(s.cinema_id, None);
    }

    #[test]
    fn accepts_imax_and_minutes_only_time() {
        let s: Screening = serde_json::from_str(
            r#"{"id":3,"movieId":1,"hallId":2,"startTime":"2026-10-18T19:30","price":9,"type":"IMAX"}"#,
        )
        .unwrap();
        assert_eq!(s.presentation, PresentationType::Imax);
        assert_eq!(s.start_time.format("%H:%M").to_string(), "19:30");
    }

    #[test]
    fn create_request_sends_local_time_without_zone() {
        let req = CreateScreeningRequest {
            movie_id: 1,
            hall_id: 2,
            start_time: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap().and_hms_opt(18, 0, 0).unwrap(),
            price: 12.5,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["startTime"], "2026-11-01T18:00:00");
        assert_eq!(json["movieId"], 1);
    }

    #[test]
    fn rejects_garbage_time() {
        assert!(parse_local_date_time("tomorrow").is_err());
    }
}
