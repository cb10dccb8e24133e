use serde::Deserialize;

/// Owner-editable profile fields; email and display name come from the
/// session, never from the body.
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub place: String,
    pub date_of_birth: String,
    pub leetcode_id: String,
}

impl SaveProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.place.trim().len() < 2 {
            return Err("Place is required.");
        }
        if self.date_of_birth.trim().len() < 4 {
            return Err("Date of birth is required.");
        }
        if self.leetcode_id.trim().len() < 2 {
            return Err("LeetCode ID is required.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_profile_passes() {
        let req = SaveProfileRequest {
            place: "Bengaluru".into(),
            date_of_birth: "2003-06-15".into(),
            leetcode_id: "intern_one".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_fields_fail_with_field_message() {
        let req = SaveProfileRequest {
            place: " ".into(),
            date_of_birth: "2003-06-15".into(),
            leetcode_id: "intern_one".into(),
        };
        assert_eq!(req.validate(), Err("Place is required."));

        let req = SaveProfileRequest {
            place: "Pune".into(),
            date_of_birth: "03".into(),
            leetcode_id: "intern_one".into(),
        };
        assert_eq!(req.validate(), Err("Date of birth is required."));

        let req = SaveProfileRequest {
            place: "Pune".into(),
            date_of_birth: "2003-06-15".into(),
            leetcode_id: "x".into(),
        };
        assert_eq!(req.validate(), Err("LeetCode ID is required."));
    }
}
