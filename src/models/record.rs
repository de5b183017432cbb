//! Stored submission row (`disaster_data`)

use serde::Serialize;
use sqlx::MySqlConnection;

use super::track::DisasterType;

/// One row of `disaster_data`. Exactly one of the two sensor groups is
/// populated; the other is null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisasterRecord {
    pub rainfall_mm: Option<f64>,
    pub river_level_m: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub temperature_c: Option<f64>,
    pub earthquake_magnitude: Option<f64>,
    pub earthquake_depth: Option<f64>,
    pub phone_number: String,
    pub disaster_type: DisasterType,
}

/// Columns of `disaster_data`, in insert order
#[cfg(test)]
pub const COLUMNS: [&str; 8] = [
    "Rainfall_mm",
    "River_Level_m",
    "Soil_Moisture",
    "Temperature_C",
    "Earthquake_Magnitude",
    "Earthquake_Depth",
    "Phone_Number",
    "Disaster_Type",
];

pub const INSERT_SQL: &str = "INSERT INTO disaster_data \
    (Rainfall_mm, River_Level_m, Soil_Moisture, Temperature_C, Earthquake_Magnitude, Earthquake_Depth, Phone_Number, Disaster_Type) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

impl DisasterRecord {
    /// The six sensor columns, in `COLUMNS` order
    pub fn sensor_values(&self) -> [Option<f64>; 6] {
        [
            self.rainfall_mm,
            self.river_level_m,
            self.soil_moisture,
            self.temperature_c,
            self.earthquake_magnitude,
            self.earthquake_depth,
        ]
    }

    /// Append this record. The caller owns the connection and the transaction.
    pub async fn insert(&self, conn: &mut MySqlConnection) -> Result<u64, sqlx::Error> {
        let mut query = sqlx::query(INSERT_SQL);
        for value in self.sensor_values() {
            query = query.bind(value);
        }

        let result = query
            .bind(&self.phone_number)
            .bind(self.disaster_type.as_str())
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_list(sql: &str) -> Vec<String> {
        let open = sql.find('(').unwrap();
        let close = sql[open..].find(')').unwrap() + open;
        sql[open + 1..close].split(',').map(|c| c.trim().to_string()).collect()
    }

    #[test]
    fn test_insert_columns_in_order() {
        assert_eq!(column_list(INSERT_SQL), COLUMNS);
        assert_eq!(INSERT_SQL.matches('?').count(), COLUMNS.len());
    }

    #[test]
    fn test_sensor_values_follow_columns() {
        let record = DisasterRecord {
            rainfall_mm: Some(250.0),
            river_level_m: Some(8.0),
            soil_moisture: Some(90.0),
            temperature_c: Some(30.0),
            earthquake_magnitude: None,
            earthquake_depth: None,
            phone_number: "+911234567890".to_string(),
            disaster_type: DisasterType::Flood,
        };
        assert_eq!(record.sensor_values(), [Some(250.0), Some(8.0), Some(90.0), Some(30.0), None, None]);

        let record = DisasterRecord {
            rainfall_mm: None,
            river_level_m: None,
            soil_moisture: None,
            temperature_c: None,
            earthquake_magnitude: Some(4.0),
            earthquake_depth: Some(30.0),
            phone_number: String::new(),
            disaster_type: DisasterType::Earthquake,
        };
        assert_eq!(record.sensor_values(), [None, None, None, None, Some(4.0), Some(30.0)]);
    }
}
