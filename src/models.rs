use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const SIGNUP_ACCEPTED: &str = "Successfully signed up for beta access";

// Signup API response format
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

impl SignupResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: SIGNUP_ACCEPTED.to_string(),
        }
    }
}

// Authenticated user as reported by the auth service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

// family_settings row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FamilySettings {
    pub id: String,
    pub user_id: String,
    pub family_name: String,
    pub share_slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewFamily {
    pub user_id: String,
    pub family_name: String,
    pub share_slug: String,
    pub is_public: bool,
}

// kids row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Kid {
    pub id: String,
    pub parent_user_id: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewKid {
    pub parent_user_id: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

// holidays row, derived from kids and onboarding
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holiday {
    pub parent_user_id: String,
    pub name: String,
    pub date: NaiveDate,
    pub recurring: bool,
    pub icon: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateFamilyRequest {
    pub family_name: String,
    #[serde(default)]
    pub share_slug: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateKidRequest {
    pub name: String,
    // YYYY-MM-DD, optional
    #[serde(default)]
    pub birthday: Option<String>,
    // first kid added during onboarding also gets the Christmas entry
    #[serde(default)]
    pub onboarding: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct KidCreated {
    pub kid: Kid,
    pub holidays: Vec<Holiday>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DashboardResponse {
    pub user: User,
    pub family: Option<FamilySettings>,
}
