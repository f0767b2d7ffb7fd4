//! Experience and education sequences: most recent first, removable by id.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::profile::{Education, Experience};
use crate::validation::FieldError;

pub trait SubRecord {
    fn id(&self) -> Uuid;
}

impl SubRecord for Experience {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl SubRecord for Education {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn prepend<T>(records: &mut Vec<T>, record: T) {
    records.insert(0, record);
}

/// Removes the record whose id matches `id`. Unknown or malformed ids leave
/// the sequence untouched and return `None`.
pub fn remove_by_id<T: SubRecord>(records: &mut Vec<T>, id: &str) -> Option<T> {
    let id = Uuid::parse_str(id).ok()?;
    let position = records.iter().position(|r| r.id() == id)?;
    Some(records.remove(position))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn required_date(field: &str, raw: Option<String>) -> Result<NaiveDate, FieldError> {
    raw.as_deref()
        .and_then(parse_date)
        .ok_or_else(|| FieldError::body(field, format!("'{field}' is not a valid date")))
}

fn optional_date(field: &str, raw: Option<String>) -> Result<Option<NaiveDate>, FieldError> {
    match raw.filter(|r| !r.trim().is_empty()) {
        None => Ok(None),
        Some(r) => required_date(field, Some(r)).map(Some),
    }
}

fn collect_dates(
    from: Result<NaiveDate, FieldError>,
    to: Result<Option<NaiveDate>, FieldError>,
) -> Result<(NaiveDate, Option<NaiveDate>), Vec<FieldError>> {
    match (from, to) {
        (Ok(from), Ok(to)) => Ok((from, to)),
        (from, to) => Err(from.err().into_iter().chain(to.err()).collect()),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Body of `PUT /api/profile/experience`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ExperienceRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Company is required"),
        length(min = 1, message = "Company is required")
    )]
    pub company: Option<String>,
    pub location: Option<String>,
    #[validate(
        required(message = "From date is required"),
        length(min = 1, message = "From date is required")
    )]
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl TryFrom<ExperienceRequest> for Experience {
    type Error = Vec<FieldError>;

    fn try_from(req: ExperienceRequest) -> Result<Self, Self::Error> {
        let (from, to) = collect_dates(
            required_date("from", req.from),
            optional_date("to", req.to),
        )?;
        Ok(Experience {
            id: Uuid::new_v4(),
            title: req.title.unwrap_or_default(),
            company: req.company.unwrap_or_default(),
            location: present(req.location),
            from,
            to,
            current: req.current.unwrap_or(false),
            description: present(req.description),
        })
    }
}

/// Body of `PUT /api/profile/education`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EducationRequest {
    #[validate(
        required(message = "School is required"),
        length(min = 1, message = "School is required")
    )]
    pub school: Option<String>,
    #[validate(
        required(message = "Degree is required"),
        length(min = 1, message = "Degree is required")
    )]
    pub degree: Option<String>,
    #[validate(
        required(message = "Field of study is required"),
        length(min = 1, message = "Field of study is required")
    )]
    pub fieldofstudy: Option<String>,
    #[validate(
        required(message = "From date is required"),
        length(min = 1, message = "From date is required")
    )]
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl TryFrom<EducationRequest> for Education {
    type Error = Vec<FieldError>;

    fn try_from(req: EducationRequest) -> Result<Self, Self::Error> {
        let (from, to) = collect_dates(
            required_date("from", req.from),
            optional_date("to", req.to),
        )?;
        Ok(Education {
            id: Uuid::new_v4(),
            school: req.school.unwrap_or_default(),
            degree: req.degree.unwrap_or_default(),
            fieldofstudy: req.fieldofstudy.unwrap_or_default(),
            from,
            to,
            current: req.current.unwrap_or(false),
            description: present(req.description),
        })
    }
}
