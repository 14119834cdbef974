//! reqwest-backed manager REST client.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use url::Url;

use crate::archive;
use crate::error::ManagerError;

use super::ManagerApi;
use super::models::{
    Blueprint, Deployment, ListResponse, MaintenanceStatus, NodeInstance,
};

/// REST API version prefix.
const API_PREFIX: [&str; 2] = ["api", "v3"];

/// Talks to the manager's REST API.
///
/// Requests are async internally and driven to completion on the calling
/// thread by an owned current-thread runtime.
#[derive(Debug)]
pub struct RestClient {
    base_url: Url,
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    credentials: Option<(String, Option<String>)>,
}

impl RestClient {
    /// Create a client for a manager at `base_url` (e.g. `http://10.0.0.5:80`).
    pub fn new(base_url: &str) -> Result<Self, ManagerError> {
        let base_url = Url::parse(base_url).map_err(|e| ManagerError::Transport {
            url: base_url.to_string(),
            message: format!("invalid manager URL: {e}"),
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            runtime,
            credentials: None,
        })
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some((username.into(), password));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/api/v3/<segments...>`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ManagerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ManagerError::Transport {
                url: self.base_url.to_string(),
                message: "manager URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_ref()),
            None => builder,
        }
    }

    /// Send a request and return the successful response body.
    fn send_bytes(
        &self,
        builder: reqwest::RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<Vec<u8>, ManagerError> {
        let base = self.base_url.to_string();
        self.runtime.block_on(async move {
            let response = builder.send().await.map_err(|e| ManagerError::Transport {
                url: base.clone(),
                message: e.to_string(),
            })?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ManagerError::NotFound {
                    resource,
                    id: id.to_string(),
                });
            }

            let body = response.bytes().await.map_err(|e| ManagerError::Transport {
                url: base,
                message: format!("failed to read response body: {e}"),
            })?;

            if !status.is_success() {
                return Err(ManagerError::Http {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }

            Ok(body.to_vec())
        })
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, ManagerError> {
        let body = self.send_bytes(builder, resource, id)?;
        serde_json::from_slice(&body).map_err(|e| ManagerError::Decode(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &'static str,
        id: &str,
    ) -> Result<T, ManagerError> {
        tracing::debug!(%url, "GET");
        self.send_json(self.request(reqwest::Method::GET, url), resource, id)
    }
}

/// Extract the manager's `message` field from an error body when present.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

impl ManagerApi for RestClient {
    fn list_blueprints(&self) -> Result<Vec<Blueprint>, ManagerError> {
        let url = self.endpoint(&["blueprints"])?;
        let list: ListResponse<Blueprint> = self.get_json(url, "Blueprints", "")?;
        Ok(list.items)
    }

    fn get_blueprint(&self, id: &str) -> Result<Blueprint, ManagerError> {
        let url = self.endpoint(&["blueprints", id])?;
        self.get_json(url, "Blueprint", id)
    }

    fn upload_blueprint(&self, definition_path: &Path, id: &str) -> Result<Blueprint, ManagerError> {
        let dir = definition_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = definition_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(crate::config::schema::default_blueprint_filename);

        let body = archive::pack_directory(dir)?;

        let mut url = self.endpoint(&["blueprints", id])?;
        url.query_pairs_mut()
            .append_pair("application_file_name", &file_name);

        tracing::debug!(%url, bytes = body.len(), "PUT blueprint archive");
        let builder = self
            .request(reqwest::Method::PUT, url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body);
        self.send_json(builder, "Blueprint", id)
    }

    fn download_blueprint(&self, id: &str, output_path: &Path) -> Result<PathBuf, ManagerError> {
        let url = self.endpoint(&["blueprints", id, "archive"])?;
        tracing::debug!(%url, "GET blueprint archive");
        let bytes = self.send_bytes(self.request(reqwest::Method::GET, url), "Blueprint", id)?;

        let target = if output_path.is_dir() {
            output_path.join(format!("{id}.tar.gz"))
        } else {
            output_path.to_path_buf()
        };
        std::fs::write(&target, bytes)?;
        Ok(target)
    }

    fn delete_blueprint(&self, id: &str) -> Result<(), ManagerError> {
        let url = self.endpoint(&["blueprints", id])?;
        tracing::debug!(%url, "DELETE");
        self.send_bytes(self.request(reqwest::Method::DELETE, url), "Blueprint", id)?;
        Ok(())
    }

    fn list_deployments(&self, blueprint_id: Option<&str>) -> Result<Vec<Deployment>, ManagerError> {
        let mut url = self.endpoint(&["deployments"])?;
        if let Some(blueprint_id) = blueprint_id {
            url.query_pairs_mut().append_pair("blueprint_id", blueprint_id);
        }
        let list: ListResponse<Deployment> = self.get_json(url, "Deployments", "")?;
        Ok(list.items)
    }

    fn get_deployment(&self, id: &str) -> Result<Deployment, ManagerError> {
        let url = self.endpoint(&["deployments", id])?;
        self.get_json(url, "Deployment", id)
    }

    fn get_node_instance(&self, id: &str) -> Result<NodeInstance, ManagerError> {
        let url = self.endpoint(&["node-instances", id])?;
        self.get_json(url, "Node instance", id)
    }

    fn list_node_instances(
        &self,
        deployment_id: Option<&str>,
        node_name: Option<&str>,
    ) -> Result<Vec<NodeInstance>, ManagerError> {
        let mut url = self.endpoint(&["node-instances"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(deployment_id) = deployment_id {
                query.append_pair("deployment_id", deployment_id);
            }
            if let Some(node_name) = node_name {
                query.append_pair("node_id", node_name);
            }
        }
        let list: ListResponse<NodeInstance> =
            self.get_json(url, "Deployment", deployment_id.unwrap_or_default())?;
        Ok(list.items)
    }

    fn maintenance_status(&self) -> Result<MaintenanceStatus, ManagerError> {
        let url = self.endpoint(&["maintenance"])?;
        self.get_json(url, "Maintenance mode", "")
    }

    fn activate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError> {
        let url = self.endpoint(&["maintenance", "activate"])?;
        self.send_json(self.request(reqwest::Method::POST, url), "Maintenance mode", "")
    }

    fn deactivate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError> {
        let url = self.endpoint(&["maintenance", "deactivate"])?;
        self.send_json(self.request(reqwest::Method::POST, url), "Maintenance mode", "")
    }
}
