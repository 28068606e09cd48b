// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::descriptor_store::{DescriptorStore, StoreError};
use crate::function_descriptor::FunctionDescriptor;

/// Descriptor store reached through the control plane's REST API.
///
/// Descriptors live at `<url>/api/namespaces/<namespace>/functions/<name>`:
/// `GET` returns the JSON descriptor, `PATCH` replaces it as a whole.
pub struct HttpDescriptorStore {
    client: reqwest::Client,
    url: String,
    basic_auth: Option<(String, String)>,
}

impl HttpDescriptorStore {
    pub fn new(url: &str, basic_auth_user: Option<String>, basic_auth_pass: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            basic_auth: basic_auth_user.map(|user| (user, basic_auth_pass.unwrap_or_default())),
        }
    }

    fn endpoint(&self, name: &str, namespace: &str) -> String {
        format!("{}/api/namespaces/{}/functions/{}", self.url, namespace, name)
    }

    fn authenticated(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.basic_auth {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    fn build(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Request, StoreError> {
        self.authenticated(request)
            .build()
            .map_err(|err| StoreError::Transport(format!("{}: {}", self.url, err)))
    }

    fn get_request(&self, name: &str, namespace: &str) -> Result<reqwest::Request, StoreError> {
        self.build(self.client.get(self.endpoint(name, namespace)).header(ACCEPT, "application/json"))
    }

    /// The body is the complete descriptor and replaces the stored one,
    /// so that collections dropped by the update do not survive.
    fn patch_request(&self, descriptor: &FunctionDescriptor) -> Result<reqwest::Request, StoreError> {
        let body = serde_json::to_vec(descriptor).map_err(|err| StoreError::Transport(err.to_string()))?;
        self.build(
            self.client
                .patch(self.endpoint(&descriptor.name, &descriptor.namespace))
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
    }

    async fn execute(&self, request: reqwest::Request, name: &str, namespace: &str) -> Result<reqwest::Response, StoreError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| StoreError::Transport(format!("{}: {}", self.url, err)))?;
        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(error_from_status(status, name, namespace, message))
    }
}

/// Map a non-successful HTTP status to a store error.
fn error_from_status(status: u16, name: &str, namespace: &str, message: String) -> StoreError {
    match status {
        404 => StoreError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        409 => StoreError::Conflict {
            name: name.to_string(),
            namespace: namespace.to_string(),
            detail: message,
        },
        401 | 403 => StoreError::Unauthorized(message),
        _ => StoreError::Api { status, message },
    }
}

#[async_trait::async_trait]
impl DescriptorStore for HttpDescriptorStore {
    async fn get(&mut self, name: &str, namespace: &str) -> Result<FunctionDescriptor, StoreError> {
        let request = self.get_request(name, namespace)?;
        log::debug!("GET {}", request.url());
        let response = self.execute(request, name, namespace).await?;
        response
            .json::<FunctionDescriptor>()
            .await
            .map_err(|err| StoreError::Transport(format!("invalid descriptor for {}/{}: {}", namespace, name, err)))
    }

    async fn patch(&mut self, descriptor: &FunctionDescriptor) -> Result<(), StoreError> {
        let request = self.patch_request(descriptor)?;
        log::debug!("PATCH {}", request.url());
        self.execute(request, &descriptor.name, &descriptor.namespace).await?;
        Ok(())
    }
}
