use async_trait::async_trait;
use recipi_core::multipart::{profile_parts, FILE};
use recipi_core::{
    ErrorResponse, ImageFile, LoginRequest, ProfilePatch, ProfileResponse, ProfileUpdateResponse,
    RecipeResponse, SignupRequest, TokenResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, RecipeUpload, RecipiApi};

/// [`RecipiApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best-effort: a proxy may answer with HTML.
        let body = response.json::<ErrorResponse>().await.ok();
        tracing::debug!(status = %status, ?body, "request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        Ok(Self::send(request).await?.json().await?)
    }
}

fn image_part(image: ImageFile) -> ApiResult<Part> {
    Ok(Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)?)
}

fn form(fields: Vec<(String, String)>, image: Option<ImageFile>) -> ApiResult<Form> {
    let mut form = Form::new();
    if let Some(image) = image {
        form = form.part(FILE, image_part(image)?);
    }
    for (key, value) in fields {
        form = form.text(key, value);
    }
    Ok(form)
}

fn path_segment(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[async_trait]
impl RecipiApi for HttpApi {
    async fn list_recipes(&self) -> ApiResult<Vec<RecipeResponse>> {
        Self::json(self.client.get(self.url("/api/recipes"))).await
    }

    async fn get_recipe(&self, slug: &str) -> ApiResult<RecipeResponse> {
        let url = self.url(&format!("/api/recipes/{}", path_segment(slug)));
        Self::json(self.client.get(url)).await
    }

    async fn create_recipe(&self, token: &str, upload: RecipeUpload) -> ApiResult<RecipeResponse> {
        let form = form(upload.fields, upload.image)?;
        let request = self
            .client
            .post(self.url("/api/recipes"))
            .bearer_auth(token)
            .multipart(form);
        Self::json(request).await
    }

    async fn update_recipe(
        &self,
        token: &str,
        slug: &str,
        upload: RecipeUpload,
    ) -> ApiResult<RecipeResponse> {
        let form = form(upload.fields, upload.image)?;
        let request = self
            .client
            .put(self.url(&format!("/api/recipes/{}", path_segment(slug))))
            .bearer_auth(token)
            .multipart(form);
        Self::json(request).await
    }

    async fn delete_recipe(&self, token: &str, slug: &str) -> ApiResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/recipes/{}", path_segment(slug))))
            .bearer_auth(token);
        Self::send(request).await?;
        Ok(())
    }

    async fn get_profile(&self, username: &str) -> ApiResult<ProfileResponse> {
        let url = self.url(&format!("/api/users/{}", path_segment(username)));
        Self::json(self.client.get(url)).await
    }

    async fn update_profile(
        &self,
        token: &str,
        patch: ProfilePatch,
    ) -> ApiResult<ProfileUpdateResponse> {
        let fields = profile_parts(&patch);
        let form = form(fields, patch.image)?;
        let request = self
            .client
            .patch(self.url("/api/users/user"))
            .bearer_auth(token)
            .multipart(form);
        Self::json(request).await
    }

    async fn delete_profile(&self, token: &str) -> ApiResult<()> {
        let request = self
            .client
            .delete(self.url("/api/users/user"))
            .bearer_auth(token);
        Self::send(request).await?;
        Ok(())
    }

    async fn signup(&self, request: SignupRequest) -> ApiResult<TokenResponse> {
        Self::json(self.client.post(self.url("/api/auth/signup")).json(&request)).await
    }

    async fn login(&self, request: LoginRequest) -> ApiResult<TokenResponse> {
        Self::json(self.client.post(self.url("/api/auth/login")).json(&request)).await
    }
}
