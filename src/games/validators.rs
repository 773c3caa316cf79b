use chrono::{NaiveDate, NaiveTime};

use super::models::{CreateGameForm, NewGame};
use crate::common::helpers::non_blank;
use crate::common::validation::require_present;
use crate::common::{ValidationResult, Validator};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const MAX_TEXT_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

pub struct CreateGameValidator;

impl Validator<CreateGameForm> for CreateGameValidator {
    fn validate(&self, data: &CreateGameForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        let required = [
            ("name", data.name.as_deref(), "Name"),
            ("date", data.date.as_deref(), "Date"),
            ("time", data.time.as_deref(), "Time"),
            ("location", data.location.as_deref(), "Location"),
            ("sport_type", data.sport_type.as_deref(), "Sport type"),
            ("capacity", data.capacity.as_deref(), "Capacity"),
            ("price", data.price.as_deref(), "Price"),
            ("age_bracket", data.age_bracket.as_deref(), "Age bracket"),
        ];
        for (field, value, label) in required {
            require_present(&mut result, field, value, label);
        }

        for (field, value) in [
            ("name", &data.name),
            ("location", &data.location),
            ("sport_type", &data.sport_type),
            ("age_bracket", &data.age_bracket),
        ] {
            if value.as_deref().map_or(0, |v| v.trim().chars().count()) > MAX_TEXT_LEN {
                result.add_error(field, "Must not exceed 200 characters");
            }
        }

        if let Some(date) = non_blank(data.date.as_deref()) {
            if NaiveDate::parse_from_str(&date, DATE_FORMAT).is_err() {
                result.add_error("date", "Date must be in YYYY-MM-DD format");
            }
        }

        if let Some(time) = non_blank(data.time.as_deref()) {
            if NaiveTime::parse_from_str(&time, TIME_FORMAT).is_err() {
                result.add_error("time", "Time must be in HH:MM format");
            }
        }

        if let Some(capacity) = non_blank(data.capacity.as_deref()) {
            match capacity.parse::<i64>() {
                Ok(c) if c > 0 => {}
                Ok(_) => result.add_error("capacity", "Capacity must be greater than 0"),
                Err(_) => result.add_error("capacity", "Capacity must be a whole number"),
            }
        }

        if let Some(price) = non_blank(data.price.as_deref()) {
            match price.parse::<f64>() {
                Ok(p) if !p.is_finite() => result.add_error("price", "Price must be a number"),
                Ok(p) if p < 0.0 => result.add_error("price", "Price must not be negative"),
                Ok(_) => {}
                Err(_) => result.add_error("price", "Price must be a number"),
            }
        }

        if data
            .description
            .as_deref()
            .map_or(0, |d| d.trim().chars().count())
            > MAX_DESCRIPTION_LEN
        {
            result.add_error("description", "Description must not exceed 2000 characters");
        }

        result
    }
}

/// Validate the form and convert it into typed fields, reporting every bad field at once
pub fn parse_game_form(form: &CreateGameForm) -> Result<NewGame, ValidationResult> {
    let result = CreateGameValidator.validate(form);
    if !result.is_valid {
        return Err(result);
    }

    let text = |v: &Option<String>| non_blank(v.as_deref()).unwrap_or_default();

    // All parse: the validator already checked them
    let capacity = text(&form.capacity).parse::<i64>().unwrap_or_default();
    let price = text(&form.price).parse::<f64>().unwrap_or_default();
    let date = NaiveDate::parse_from_str(&text(&form.date), DATE_FORMAT).unwrap_or_default();
    let time = NaiveTime::parse_from_str(&text(&form.time), TIME_FORMAT).unwrap_or_default();

    // Stored zero-padded so text ordering matches chronological ordering
    Ok(NewGame {
        name: text(&form.name),
        date: date.format(DATE_FORMAT).to_string(),
        time: time.format(TIME_FORMAT).to_string(),
        location: text(&form.location),
        sport_type: text(&form.sport_type),
        capacity,
        price,
        age_bracket: text(&form.age_bracket),
        description: non_blank(form.description.as_deref()),
    })
}
