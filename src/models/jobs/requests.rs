use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub workplace: String,
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub workplace: Option<String>,
    pub region: Option<String>,
}
