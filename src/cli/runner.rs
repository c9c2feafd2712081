//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::database::DatabaseEngine;
use crate::document::{CollectionDocument, ResourceDocument};
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_catalog, ResourceCatalog};
use crate::query::{NoIncludes, QueryAll, QueryOne, QueryParameters};
use serde_json::{json, Value};
use tracing::{info, warn};
use url::{form_urlencoded, Url};

/// Fallback link base when neither the catalog nor the command gives one
const DEFAULT_BASE_URL: &str = "http://localhost";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let output = match &self.cli.command {
            Commands::Page {
                resource,
                query,
                base_url,
            } => self.page(resource, query, base_url.as_deref())?,
            Commands::Show {
                resource,
                id,
                query,
            } => self.show(resource, id, query)?,
            Commands::Resources => self.resources()?,
            Commands::Tables => self.tables()?,
            Commands::Validate => self.validate()?,
        };

        self.output(&output);
        Ok(())
    }

    /// Load the resource catalog
    fn load_catalog(&self) -> Result<ResourceCatalog> {
        let path = self
            .cli
            .catalog
            .as_ref()
            .ok_or_else(|| Error::config("Catalog file not specified (use -c flag)"))?;
        load_catalog(path)
    }

    /// Open the database
    fn open_database(&self) -> Result<DatabaseEngine> {
        match &self.cli.database {
            Some(path) => DatabaseEngine::open(path),
            None => {
                warn!("No database given, using an empty in-memory database");
                DatabaseEngine::open_in_memory()
            }
        }
    }

    /// Render one page of a collection
    pub fn page(&self, resource: &str, query: &str, base_url: Option<&str>) -> Result<Value> {
        let catalog = self.load_catalog()?;
        let resource = catalog.get(resource)?;
        let config = resource.schema.pagination();
        let params = QueryParameters::parse(query, config)?;

        let engine = self.open_database()?;
        let result = QueryAll::new(&resource.schema, engine.query(&resource.table)?)
            .using(&params)
            .first_or_paginate(params.page())?;

        let base = base_url
            .map(str::to_string)
            .or_else(|| catalog.resource_url(resource.schema.resource_type()))
            .unwrap_or_else(|| {
                format!("{DEFAULT_BASE_URL}/{}", resource.schema.resource_type())
            });

        CollectionDocument::from_pagination(result, &request_url(&base, query)?, config)?
            .to_value()
    }

    /// Render a single resource
    pub fn show(&self, resource: &str, id: &str, query: &str) -> Result<Value> {
        let catalog = self.load_catalog()?;
        let resource = catalog.get(resource)?;
        let params = QueryParameters::parse(query, resource.schema.pagination())?;

        let engine = self.open_database()?;
        let record = QueryOne::new(&resource.schema, engine.query(&resource.table)?, None, id)
            .using(&params)
            .first(&NoIncludes)?;

        if record.is_none() {
            info!(resource = resource.schema.resource_type(), id, "Resource not found");
        }

        ResourceDocument::new(record).to_value()
    }

    /// Describe configured resources
    pub fn resources(&self) -> Result<Value> {
        let catalog = self.load_catalog()?;

        let resources: Vec<Value> = catalog
            .iter()
            .map(|r| {
                let config = r.schema.pagination();
                json!({
                    "type": r.schema.resource_type(),
                    "table": r.table,
                    "id_column": r.schema.id_column(),
                    "strategy": config.strategy(),
                    "page_number_param": config.param_name(config.page_key()),
                    "page_size_param": config.param_name(config.per_page_key()),
                    "default_sort": r.schema.default_sort().map(ToString::to_string),
                })
            })
            .collect();

        Ok(json!({ "resources": resources }))
    }

    /// List database tables
    pub fn tables(&self) -> Result<Value> {
        let engine = self.open_database()?;
        engine.check_connection()?;

        let tables = engine
            .list_tables()
            .with_context(|| format!("Listing tables in {}", engine.location()))?;

        Ok(json!({
            "database": engine.location(),
            "tables": tables
        }))
    }

    /// Check that every resource maps to a readable table
    pub fn validate(&self) -> Result<Value> {
        let catalog = self.load_catalog()?;
        let engine = self.open_database()?;

        let mut problems = Vec::new();
        for resource in catalog.iter() {
            match engine.query(&resource.table) {
                Ok(query) => {
                    let id_column = resource.schema.id_column();
                    if !query.columns().iter().any(|c| c == id_column) {
                        problems.push(format!(
                            "Resource '{}': table '{}' has no column '{}'",
                            resource.schema.resource_type(),
                            resource.table,
                            id_column
                        ));
                    }
                }
                Err(e) => problems.push(format!(
                    "Resource '{}': {e}",
                    resource.schema.resource_type()
                )),
            }
        }

        if problems.is_empty() {
            info!("Catalog is valid with {} resources", catalog.len());
            Ok(json!({ "valid": true, "resources": catalog.len() }))
        } else {
            for problem in &problems {
                warn!("{problem}");
            }
            Ok(json!({ "valid": false, "problems": problems }))
        }
    }

    /// Output a document
    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// The request URL links are derived from: base plus the raw query pairs
fn request_url(base: &str, query: &str) -> Result<String> {
    let mut url = Url::parse(base)?;
    let query = query.trim_start_matches('?');
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(form_urlencoded::parse(query.as_bytes()));
    }
    Ok(url.into())
}
