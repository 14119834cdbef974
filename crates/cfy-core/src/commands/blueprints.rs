//! Blueprint command implementation.
//!
//! Upload and validate accept any reference the [`BlueprintResolver`]
//! understands. Temporary directories created while resolving are removed on
//! every exit path.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::context::AppContext;
use crate::ids::{generate_suffixed_id, trim_description};
use crate::rest::{Blueprint, ManagerApi};
use crate::source::{BlueprintResolver, ResolvedBlueprint};
use crate::validate::BlueprintValidator;

/// Placeholder for missing input fields.
const MISSING: &str = "-";

/// Options for uploading a blueprint
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Path, archive, URL or `org/repo[:ref]` shorthand
    pub reference: String,
    /// Blueprint id (None = derived from the source)
    pub blueprint_id: Option<String>,
    /// Definition file name inside archives (None = configured default)
    pub blueprint_filename: Option<String>,
    /// Validate the definition before uploading
    pub validate: bool,
}

impl UploadOptions {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            blueprint_id: None,
            blueprint_filename: None,
            validate: false,
        }
    }

    pub fn with_blueprint_id(mut self, id: impl Into<String>) -> Self {
        self.blueprint_id = Some(id.into());
        self
    }

    pub fn with_blueprint_filename(mut self, filename: impl Into<String>) -> Self {
        self.blueprint_filename = Some(filename.into());
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Options for validating a blueprint
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub reference: String,
    pub blueprint_filename: Option<String>,
}

impl ValidateOptions {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            blueprint_filename: None,
        }
    }

    pub fn with_blueprint_filename(mut self, filename: impl Into<String>) -> Self {
        self.blueprint_filename = Some(filename.into());
        self
    }
}

/// Result of an upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    /// Id the manager stored the blueprint under
    pub blueprint_id: String,
    /// Definition file that was uploaded
    pub definition: PathBuf,
    pub validated: bool,
}

/// Result of a validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub definition: PathBuf,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadReport {
    pub blueprint_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteReport {
    pub blueprint_id: String,
}

/// One row of `blueprints list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlueprintRow {
    pub id: String,
    pub description: String,
    pub main_file_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BlueprintRow {
    fn from_blueprint(blueprint: &Blueprint) -> Self {
        Self {
            id: blueprint.id.clone(),
            description: trim_description(blueprint.description.as_deref()),
            main_file_name: blueprint.main_file_name.clone().unwrap_or_default(),
            created_at: blueprint.created_at.clone().unwrap_or_default(),
            updated_at: blueprint.updated_at.clone().unwrap_or_default(),
        }
    }
}

/// Output of `blueprints get`
#[derive(Debug, Clone, Serialize)]
pub struct BlueprintDetails {
    #[serde(flatten)]
    pub row: BlueprintRow,
    #[serde(rename = "#deployments")]
    pub deployment_count: usize,
    /// Untrimmed description
    pub full_description: Option<String>,
    pub deployment_ids: Vec<String>,
}

/// One row of `blueprints inputs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRow {
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub default: String,
    pub description: String,
}

/// Blueprint command orchestrator
#[derive(Debug)]
pub struct BlueprintsCommand {
    resolver: BlueprintResolver,
    validator: Box<dyn BlueprintValidator>,
    default_filename: String,
}

impl BlueprintsCommand {
    pub fn new(
        resolver: BlueprintResolver,
        validator: impl BlueprintValidator + 'static,
        default_filename: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            validator: Box::new(validator),
            default_filename: default_filename.into(),
        }
    }

    /// Build from the application context.
    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.resolver(), ctx.validator(), ctx.blueprint_filename())
    }

    fn resolve(
        &self,
        reference: &str,
        filename: Option<&str>,
    ) -> anyhow::Result<ResolvedBlueprint> {
        let filename = filename.unwrap_or(self.default_filename.as_str());
        let resolved = self.resolver.resolve(reference, filename)?;
        tracing::debug!(
            path = %resolved.local_path().display(),
            temporary = resolved.is_temporary(),
            "resolved blueprint"
        );
        Ok(resolved)
    }

    fn check(&self, resolved: &ResolvedBlueprint) -> anyhow::Result<()> {
        tracing::info!("Validating blueprint: {}", resolved.local_path().display());
        self.validator
            .validate(resolved.local_path())
            .map_err(|e| anyhow::anyhow!("Failed to validate blueprint: {e}"))
    }

    /// Validate a blueprint definition.
    pub fn validate(&self, options: &ValidateOptions) -> anyhow::Result<ValidateReport> {
        let resolved = self.resolve(&options.reference, options.blueprint_filename.as_deref())?;
        let _cleanup = resolved.cleanup_guard();

        self.check(&resolved)?;
        tracing::info!("Blueprint validated successfully");

        Ok(ValidateReport {
            definition: resolved.local_path().to_path_buf(),
            valid: true,
        })
    }

    /// Resolve, optionally validate, and upload a blueprint.
    pub fn upload(
        &self,
        api: &dyn ManagerApi,
        options: &UploadOptions,
    ) -> anyhow::Result<UploadReport> {
        let resolved = self.resolve(&options.reference, options.blueprint_filename.as_deref())?;
        let _cleanup = resolved.cleanup_guard();

        if options.validate {
            self.check(&resolved)?;
        }

        let blueprint_id = options
            .blueprint_id
            .clone()
            .unwrap_or_else(|| generate_suffixed_id(resolved.derived_id()));

        tracing::info!("Uploading blueprint {}...", options.reference);
        let blueprint = api
            .upload_blueprint(resolved.local_path(), &blueprint_id)
            .with_context(|| format!("Failed to upload blueprint {blueprint_id}"))?;
        tracing::info!("Blueprint uploaded. The blueprint's id is {}", blueprint.id);

        Ok(UploadReport {
            blueprint_id: blueprint.id,
            definition: resolved.local_path().to_path_buf(),
            validated: options.validate,
        })
    }

    /// Download a blueprint archive; `output` defaults to `<id>.tar.gz`.
    pub fn download(
        &self,
        api: &dyn ManagerApi,
        blueprint_id: &str,
        output: Option<PathBuf>,
    ) -> anyhow::Result<DownloadReport> {
        let output = output.unwrap_or_else(|| PathBuf::from("."));
        tracing::info!("Downloading blueprint {blueprint_id}...");
        let path = api.download_blueprint(blueprint_id, &output)?;
        tracing::info!("Blueprint downloaded as {}", path.display());
        Ok(DownloadReport {
            blueprint_id: blueprint_id.to_string(),
            path,
        })
    }

    pub fn delete(&self, api: &dyn ManagerApi, blueprint_id: &str) -> anyhow::Result<DeleteReport> {
        tracing::info!("Deleting blueprint {blueprint_id}...");
        api.delete_blueprint(blueprint_id)?;
        tracing::info!("Blueprint deleted");
        Ok(DeleteReport {
            blueprint_id: blueprint_id.to_string(),
        })
    }

    pub fn list(&self, api: &dyn ManagerApi) -> anyhow::Result<Vec<BlueprintRow>> {
        let blueprints = api.list_blueprints()?;
        Ok(blueprints.iter().map(BlueprintRow::from_blueprint).collect())
    }

    pub fn get(&self, api: &dyn ManagerApi, blueprint_id: &str) -> anyhow::Result<BlueprintDetails> {
        let blueprint = api.get_blueprint(blueprint_id)?;
        let deployments = api
            .list_deployments(Some(blueprint_id))
            .with_context(|| format!("Failed to list deployments of blueprint {blueprint_id}"))?;

        Ok(BlueprintDetails {
            row: BlueprintRow::from_blueprint(&blueprint),
            deployment_count: deployments.len(),
            full_description: blueprint.description.clone(),
            deployment_ids: deployments.into_iter().map(|d| d.id).collect(),
        })
    }

    /// Inputs declared by a blueprint, sorted by name.
    pub fn inputs(&self, api: &dyn ManagerApi, blueprint_id: &str) -> anyhow::Result<Vec<InputRow>> {
        let blueprint = api.get_blueprint(blueprint_id)?;
        Ok(blueprint
            .inputs()
            .into_iter()
            .map(|(name, input)| InputRow {
                name,
                input_type: render_field(input.input_type.as_ref()),
                default: render_field(input.default.as_ref()),
                description: render_field(input.description.as_ref()),
            })
            .collect())
    }
}

/// Strings render bare, everything else as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_field(value: Option<&Value>) -> String {
    value.map(render_value).unwrap_or_else(|| MISSING.to_string())
}
