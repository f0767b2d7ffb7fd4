use serde::Deserialize;
use validator::Validate;

use crate::models::profile::Social;
use crate::validation::FieldError;

/// Body of `POST /api/profile`. Every field arrives as an optional string;
/// only `status` and `skills` are mandatory.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[validate(
        required(message = "Status is required"),
        length(min = 1, message = "Status is required")
    )]
    pub status: Option<String>,
    pub githubusername: Option<String>,
    #[validate(
        required(message = "Skills is required"),
        length(min = 1, message = "Skills is required")
    )]
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

/// Sparse set of profile fields. `None` means "leave as is" on update;
/// `social` is always written as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: Social,
}

/// Fails when `skills` holds only separators and whitespace.
impl TryFrom<ProfileRequest> for ProfileFields {
    type Error = Vec<FieldError>;

    fn try_from(req: ProfileRequest) -> Result<Self, Self::Error> {
        let skills = present(req.skills).map(|raw| parse_skills(&raw));
        if skills.as_ref().is_some_and(Vec::is_empty) {
            return Err(vec![FieldError::body("skills", "Skills is required")]);
        }
        Ok(Self {
            company: present(req.company),
            website: present(req.website),
            location: present(req.location),
            bio: present(req.bio),
            status: present(req.status),
            githubusername: present(req.githubusername),
            skills,
            social: Social {
                youtube: present(req.youtube),
                facebook: present(req.facebook),
                twitter: present(req.twitter),
                instagram: present(req.instagram),
                linkedin: present(req.linkedin),
            },
        })
    }
}

/// Splits a comma separated skills string into trimmed, non-empty entries,
/// keeping their original order.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
