//! Bike API DTOs

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Oldest accepted model year
pub const MIN_MODEL_YEAR: i32 = 1900;

/// Bike create/update body
///
/// Used for `POST /bikes/user/{userId}` and `PATCH /bikes/user/{userId}/bike/{bikeId}`.
/// Unset optional fields are left out of the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BikeRequest {
    #[validate(length(min = 1, max = 50, message = "Manufacturer is required (50 characters max)"))]
    pub manufacturer: String,

    #[validate(length(min = 1, max = 100, message = "Model name is required (100 characters max)"))]
    pub model_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "Model code must be 20 characters or fewer"))]
    pub model_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_model_year"))]
    pub model_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub current_mileage: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        url(message = "Image URL must be a valid URL"),
        length(max = 2048, message = "Image URL must be 2048 characters or fewer")
    )]
    pub image_url: Option<String>,
}

pub type BikeCreateRequest = BikeRequest;
pub type BikeUpdateRequest = BikeRequest;

/// Latest accepted model year: next year's models are already on sale
pub fn max_model_year() -> i32 {
    Utc::now().year() + 1
}

fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    if !(MIN_MODEL_YEAR..=max_model_year()).contains(&year) {
        let mut error = ValidationError::new("model_year");
        error.message = Some(
            format!(
                "Model year must be between {} and {}",
                MIN_MODEL_YEAR,
                max_model_year()
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn honda() -> BikeRequest {
        BikeRequest {
            manufacturer: "Honda".to_string(),
            model_name: "CBR250RR".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_body_has_only_required_keys() {
        let body = serde_json::to_value(honda()).unwrap();
        assert_eq!(body, json!({"manufacturer": "Honda", "modelName": "CBR250RR"}));
    }

    #[test]
    fn test_optional_fields_serialize_camel_case() {
        let request = BikeRequest {
            model_code: Some("MC51".to_string()),
            model_year: Some(2020),
            current_mileage: Some(12000),
            ..honda()
        };
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["modelCode"], "MC51");
        assert_eq!(body["modelYear"], 2020);
        assert_eq!(body["currentMileage"], 12000);
        assert!(body.get("imageUrl").is_none());
    }

    #[test]
    fn test_required_fields() {
        let request = BikeRequest::default();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("manufacturer"));
        assert!(fields.contains_key("model_name"));
    }

    #[test]
    fn test_model_year_bounds() {
        let too_old = BikeRequest {
            model_year: Some(1899),
            ..honda()
        };
        assert!(too_old.validate().is_err());

        let next_year = BikeRequest {
            model_year: Some(max_model_year()),
            ..honda()
        };
        assert!(next_year.validate().is_ok());

        let too_new = BikeRequest {
            model_year: Some(max_model_year() + 1),
            ..honda()
        };
        assert!(too_new.validate().is_err());
    }

    #[test]
    fn test_negative_mileage_rejected() {
        let request = BikeRequest {
            current_mileage: Some(-1),
            ..honda()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_image_url_must_be_url() {
        let request = BikeRequest {
            image_url: Some("not a url".to_string()),
            ..honda()
        };
        assert!(request.validate().is_err());

        let request = BikeRequest {
            image_url: Some("https://example.com/cbr.png".to_string()),
            ..honda()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_long_model_code_rejected() {
        let request = BikeRequest {
            model_code: Some("X".repeat(21)),
            ..honda()
        };
        assert!(request.validate().is_err());
    }
}
