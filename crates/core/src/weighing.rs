//! Procedure input shapes for weigh-in records and companies, plus the rules
//! applied to them before anything reaches storage.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{CoreError, FieldErrors};

/// Default page size for log listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page size a caller may request.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Largest weight representable by `NUMERIC(10, 2)`.
pub const MAX_WEIGHT: f64 = 99_999_999.99;

/// Decimal places stored for `vehicle_logs.weight`.
pub const WEIGHT_SCALE: usize = 2;

// ---------------------------------------------------------------------------
// Input shapes
// ---------------------------------------------------------------------------

/// Input for `weighing.create`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleLogInput {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub location: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub company: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub driver_name: String,
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub phone_number: String,
    #[validate(range(min = 0.0, max = 99_999_999.99, message = "must be between 0 and 99999999.99"))]
    pub weight: f64,
    pub photo_url: Option<String>,
    /// Accepted from the form but not persisted.
    pub notes: Option<String>,
}

/// Input for `weighing.list`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ListVehicleLogsInput {
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub offset: Option<i64>,
}

impl ListVehicleLogsInput {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

/// Input for `weighing.addCompany`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddCompanyInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

/// Input for `weighing.search`, the admin listing with search and date filter.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SearchVehicleLogsInput {
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SearchVehicleLogsInput {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Input for procedures that take none. Deserializes from `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoInput {}

impl Validate for NoInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Run `validator` rules and convert failures into [`CoreError::InvalidInput`]
/// keyed by camelCase field names.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::InvalidInput(collect_field_errors(&errors)))
}

fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let name = snake_to_camel(&field.to_string());
        for err in field_errors {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed `{}` check", err.code));
            fields.add(name.clone(), message);
        }
    }
    fields
}

/// `driver_name` -> `driverName`.
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Render a weight in the storage's fixed-point text form (`1234.5` -> `"1234.50"`).
///
/// The shortest decimal text of the float is rounded half away from zero,
/// the way Postgres coerces text into `NUMERIC(10, 2)`: `1.005` -> `"1.01"`.
pub fn format_weight(weight: f64) -> Result<String, CoreError> {
    if !weight.is_finite() {
        return Err(CoreError::Validation(
            "weight must be a finite number".to_string(),
        ));
    }
    if !(0.0..=MAX_WEIGHT).contains(&weight) {
        return Err(CoreError::Validation(format!(
            "weight must be between 0 and {MAX_WEIGHT}, got {weight}"
        )));
    }
    // Avoid rendering negative zero as "-0.00".
    let weight = if weight == 0.0 { 0.0 } else { weight };

    let scale = WEIGHT_SCALE as u32;
    let mut rounded = Decimal::from_str(&weight.to_string())
        .map_err(|e| CoreError::Validation(format!("weight {weight} is not a decimal: {e}")))?
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    Ok(rounded.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_create() -> CreateVehicleLogInput {
        serde_json::from_value(json!({
            "location": "Gate 1",
            "company": "Acme",
            "driverName": "Kim",
            "phoneNumber": "010-1111-2222",
            "weight": 1234.5
        }))
        .expect("valid input should deserialize")
    }

    // -- format_weight -------------------------------------------------------

    #[test]
    fn format_weight_pads_to_two_decimals() {
        assert_eq!(format_weight(1234.5).unwrap(), "1234.50");
        assert_eq!(format_weight(7.0).unwrap(), "7.00");
        assert_eq!(format_weight(0.01).unwrap(), "0.01");
    }

    #[test]
    fn format_weight_rounds_midpoints_away_from_zero() {
        assert_eq!(format_weight(1.005).unwrap(), "1.01");
        assert_eq!(format_weight(0.125).unwrap(), "0.13");
        assert_eq!(format_weight(2.675).unwrap(), "2.68");
        assert_eq!(format_weight(2.674).unwrap(), "2.67");
    }

    #[test]
    fn format_weight_handles_tiny_and_maximal_values() {
        assert_eq!(format_weight(0.004).unwrap(), "0.00");
        assert_eq!(format_weight(1e-7).unwrap(), "0.00");
        assert_eq!(format_weight(MAX_WEIGHT).unwrap(), "99999999.99");
    }

    #[test]
    fn format_weight_normalizes_negative_zero() {
        assert_eq!(format_weight(-0.0).unwrap(), "0.00");
    }

    #[test]
    fn format_weight_rejects_out_of_range() {
        assert!(format_weight(-1.0).is_err());
        assert!(format_weight(100_000_000.0).is_err());
        assert!(format_weight(f64::NAN).is_err());
        assert!(format_weight(f64::INFINITY).is_err());
    }

    // -- create input --------------------------------------------------------

    #[test]
    fn create_input_accepts_scenario_record() {
        let input = valid_create();
        assert!(validate_input(&input).is_ok());
        assert_eq!(input.driver_name, "Kim");
        assert!(input.photo_url.is_none());
    }

    #[test]
    fn create_input_missing_weight_fails_to_deserialize() {
        let result = serde_json::from_value::<CreateVehicleLogInput>(json!({
            "location": "Gate 1",
            "company": "Acme",
            "driverName": "Kim",
            "phoneNumber": "010-1111-2222"
        }));
        let err = result.expect_err("missing weight must be rejected");
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn create_input_reports_fields_in_camel_case() {
        let mut input = valid_create();
        input.driver_name = String::new();
        input.phone_number = "010".to_string();
        input.weight = -5.0;

        let err = validate_input(&input).expect_err("input should be invalid");
        let fields = match err {
            CoreError::InvalidInput(fields) => fields,
            other => panic!("expected InvalidInput, got {other:?}"),
        };
        assert_eq!(
            fields.fields().collect::<Vec<_>>(),
            vec!["driverName", "phoneNumber", "weight"]
        );
        assert_eq!(
            fields.get("phoneNumber"),
            Some(&["must be at least 10 characters".to_string()][..])
        );
    }

    // -- list input ----------------------------------------------------------

    #[test]
    fn list_input_defaults() {
        let input: ListVehicleLogsInput = serde_json::from_value(json!({})).unwrap();
        assert!(validate_input(&input).is_ok());
        assert_eq!(input.limit(), DEFAULT_LIST_LIMIT);
        assert_eq!(input.offset(), 0);
    }

    #[test]
    fn list_input_rejects_limit_bounds() {
        for limit in [0, 101] {
            let input = ListVehicleLogsInput {
                limit: Some(limit),
                offset: None,
            };
            assert!(
                validate_input(&input).is_err(),
                "limit {limit} must be rejected"
            );
        }
        let edge = ListVehicleLogsInput {
            limit: Some(100),
            offset: Some(0),
        };
        assert!(validate_input(&edge).is_ok());
    }

    #[test]
    fn list_input_rejects_negative_offset() {
        let input = ListVehicleLogsInput {
            limit: None,
            offset: Some(-1),
        };
        assert!(validate_input(&input).is_err());
    }

    // -- company input -------------------------------------------------------

    #[test]
    fn add_company_rejects_blank_name() {
        for name in ["", "   "] {
            let input = AddCompanyInput {
                name: name.to_string(),
            };
            assert!(validate_input(&input).is_err(), "{name:?} must be rejected");
        }
    }

    // -- search input --------------------------------------------------------

    #[test]
    fn search_input_parses_date() {
        let input: SearchVehicleLogsInput =
            serde_json::from_value(json!({ "search": "kim", "date": "2026-10-18" })).unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(input.limit(), DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn snake_to_camel_converts_field_names() {
        assert_eq!(snake_to_camel("driver_name"), "driverName");
        assert_eq!(snake_to_camel("photo_url"), "photoUrl");
        assert_eq!(snake_to_camel("weight"), "weight");
    }
}
