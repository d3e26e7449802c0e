use serde::{Deserialize, Serialize};

/// Сводная статистика для админки. Отсутствующие значения считаются нулями.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub tickets_sold: u64,
    // сервер отдаёт activeMovies
    #[serde(default, alias = "activeMovies", deserialize_with = "zero_if_null")]
    pub movies_count: u64,
}

fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_active_movies_and_nulls() {
        let stats: AdminStats = serde_json::from_str(
            r#"{"totalRevenue": null, "ticketsSold": 42, "activeMovies": 5, "occupancyRate": 0.3}"#,
        )
        .unwrap();
        assert_eq!(
            stats,
            AdminStats { total_revenue: 0.0, tickets_sold: 42, movies_count: 5 }
        );
    }
}
