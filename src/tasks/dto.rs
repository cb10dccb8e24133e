use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub deadline: String,
    pub problem: String,
    pub hints: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().len() < 3 {
            return Err("Title is required.");
        }
        if self.deadline.trim().len() < 3 {
            return Err("Deadline is required.");
        }
        if self.problem.trim().len() < 10 {
            return Err("Problem statement is required.");
        }
        if self.hints.trim().len() < 3 {
            return Err("Hints are required.");
        }
        Ok(())
    }
}
