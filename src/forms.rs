//! Raw form input turned into validated request bodies
//!
//! Form fields arrive as text. Blank optional fields become `None` so they
//! are left out of the request body; typed fields are parsed here and the
//! declarative rules of the request type run afterwards.

use chrono::{DateTime, NaiveDate, Utc};

use revox_protocol::api::{BikeRequest, MaintenanceTaskRequest, MaintenanceTaskUpdateRequest};
use revox_protocol::common::{timestamp, Bike};

use crate::validation::{self, FieldError};

/// Bike form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeForm {
    pub manufacturer: String,
    pub model_name: String,
    pub model_code: String,
    pub model_year: String,
    pub current_mileage: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    pub image_url: String,
}

impl BikeForm {
    /// Prefill from an existing bike for editing
    pub fn from_bike(bike: &Bike) -> Self {
        Self {
            manufacturer: bike.manufacturer.clone(),
            model_name: bike.model_name.clone(),
            model_code: bike.model_code.clone().unwrap_or_default(),
            model_year: bike.model_year.map(|y| y.to_string()).unwrap_or_default(),
            current_mileage: bike
                .current_mileage
                .map(|m| m.to_string())
                .unwrap_or_default(),
            purchase_date: bike
                .purchase_date
                .as_deref()
                .and_then(timestamp::parse)
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            image_url: bike.image_url.clone().unwrap_or_default(),
        }
    }

    /// Parse and validate; errors are ordered by field name
    pub fn to_request(&self) -> Result<BikeRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let model_year = parse_field(
            &self.model_year,
            "model_year",
            "Model year must be a number",
            &mut errors,
        );
        let current_mileage = parse_field(
            &self.current_mileage,
            "current_mileage",
            "Mileage must be a whole number",
            &mut errors,
        );
        let purchase_date = match optional(&self.purchase_date) {
            Some(raw) => match parse_date(&raw) {
                Some(date) => Some(date),
                None => {
                    errors.push(FieldError::new(
                        "purchase_date",
                        "Purchase date must be a valid date (YYYY-MM-DD)",
                    ));
                    None
                }
            },
            None => None,
        };

        let request = BikeRequest {
            manufacturer: self.manufacturer.trim().to_string(),
            model_name: self.model_name.trim().to_string(),
            model_code: optional(&self.model_code),
            model_year,
            current_mileage,
            purchase_date,
            image_url: optional(&self.image_url),
        };

        for error in validation::check(&request) {
            if !errors.iter().any(|e: &FieldError| e.field == error.field) {
                errors.push(error);
            }
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(errors)
        }
    }
}

/// Maintenance task form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub description: String,
}

impl TaskForm {
    pub fn to_create_request(&self, bike_id: i64, category_id: i64) -> MaintenanceTaskRequest {
        MaintenanceTaskRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category_id,
            bike_id,
        }
    }

    pub fn to_update_request(&self) -> MaintenanceTaskUpdateRequest {
        MaintenanceTaskUpdateRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Trimmed value, or `None` when blank
fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = optional(raw)?;
    match value.replace(',', "").parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Calendar date at midnight UTC
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn honda() -> BikeForm {
        BikeForm {
            manufacturer: "Honda".to_string(),
            model_name: "CBR250RR".to_string(),
            ..BikeForm::default()
        }
    }

    #[test]
    fn test_blank_optionals_are_omitted() {
        let form = BikeForm {
            model_code: "  ".to_string(),
            ..honda()
        };
        let request = form.to_request().unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"manufacturer": "Honda", "modelName": "CBR250RR"})
        );
    }

    #[test]
    fn test_typed_fields_parse() {
        let form = BikeForm {
            model_year: "2021".to_string(),
            current_mileage: "12,500".to_string(),
            purchase_date: "2021-04-10".to_string(),
            image_url: "https://example.com/cbr.jpg".to_string(),
            ..honda()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.model_year, Some(2021));
        assert_eq!(request.current_mileage, Some(12_500));
        assert_eq!(
            serde_json::to_value(&request).unwrap()["purchaseDate"],
            json!("2021-04-10T00:00:00Z")
        );
    }

    #[test]
    fn test_parse_errors_win_over_rules() {
        let form = BikeForm {
            manufacturer: String::new(),
            model_year: "nineteen".to_string(),
            current_mileage: "-5".to_string(),
            purchase_date: "2021-13-40".to_string(),
            image_url: "not a url".to_string(),
            ..honda()
        };
        let errors = form.to_request().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "current_mileage",
                "image_url",
                "manufacturer",
                "model_year",
                "purchase_date"
            ]
        );
        assert_eq!(errors[3].message, "Model year must be a number");
    }

    #[test]
    fn test_from_bike_round_trips_to_same_request() {
        let bike: Bike = serde_json::from_value(json!({
            "id": 4,
            "userId": 1,
            "manufacturer": "Yamaha",
            "modelName": "SR400",
            "modelYear": 2018,
            "purchaseDate": "2018-06-01T00:00:00",
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00",
        }))
        .unwrap();

        let form = BikeForm::from_bike(&bike);
        assert_eq!(form.purchase_date, "2018-06-01");
        let request = form.to_request().unwrap();
        assert_eq!(request.model_year, Some(2018));
        assert_eq!(request.model_code, None);
    }

    #[test]
    fn test_task_form_trims() {
        let form = TaskForm {
            name: " Chain ".to_string(),
            description: "Lubed\n".to_string(),
        };
        let request = form.to_create_request(3, 2);
        assert_eq!(request.name, "Chain");
        assert_eq!(request.description, "Lubed");
        assert_eq!(request.bike_id, 3);
    }
}
