use crate::api::types::{ExtractResponse, GenerateRequest, GenerateResponse};
use crate::error::ApiError;
use crate::models::{GenerateParams, UploadFile};
use async_trait::async_trait;
use rand::Rng;
use reqwest::multipart::{Form, Part};

pub const GENERATE_PATH: &str = "/generate-quiz";
pub const EXTRACT_PATH: &str = "/extract-notes";
pub const CACHE_BUSTER_RANGE: u32 = 100_000;

/// The remote side that extracts notes and writes questions.
#[async_trait]
pub trait QuizService: Send + Sync {
    async fn generate_quiz(&self, params: &GenerateParams) -> Result<GenerateResponse, ApiError>;

    async fn extract_notes(&self, files: &[UploadFile]) -> Result<ExtractResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpQuizService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuizService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl QuizService for HttpQuizService {
    async fn generate_quiz(&self, params: &GenerateParams) -> Result<GenerateResponse, ApiError> {
        let cache_buster = rand::thread_rng().gen_range(0..CACHE_BUSTER_RANGE);
        let body = GenerateRequest::from(params);

        log::info!(
            "POST {} model={} questions={} language={}",
            GENERATE_PATH,
            body.model,
            body.num_questions,
            body.language
        );

        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH))
            .query(&[("rand", cache_buster)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        log::debug!("{} responded {} ({} bytes)", GENERATE_PATH, status, text.len());

        Ok(serde_json::from_str(&text)?)
    }

    async fn extract_notes(&self, files: &[UploadFile]) -> Result<ExtractResponse, ApiError> {
        let mut form = Form::new();
        for file in files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| ApiError::FileRead {
                    name: file.name.clone(),
                    source,
                })?;
            form = form.part("files", Part::bytes(bytes).file_name(file.name.clone()));
        }

        log::info!("POST {} with {} file(s)", EXTRACT_PATH, files.len());

        let response = self
            .client
            .post(self.endpoint(EXTRACT_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        log::debug!("{} responded {} ({} bytes)", EXTRACT_PATH, status, text.len());

        Ok(serde_json::from_str(&text)?)
    }
}
