//! cfy - orchestration manager CLI
//!
//! Usage:
//!   cfy use 10.0.0.5                     # Select the active manager
//!   cfy blueprints upload bp.tar.gz      # Upload a blueprint
//!   cfy blueprints validate org/repo     # Validate a hosted blueprint
//!   cfy node-instances ls my-deployment  # List node instances

mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cfy_core::commands::{
    ActivateOptions, BlueprintsCommand, MaintenanceCommand, MaintenanceReport,
    NodeInstancesCommand, ProfileCommand, UploadOptions, UseOptions, ValidateOptions,
    WorkflowsCommand,
};
use cfy_core::context::AppContext;

use crate::output::{OutputFormat, print_json, print_table, table};

#[derive(Parser)]
#[command(name = "cfy")]
#[command(about = "Orchestration manager CLI", long_about = None)]
struct Cli {
    /// Manager host to use instead of the configured one
    #[arg(long, global = true)]
    manager: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage blueprints
    Blueprints(BlueprintsArgs),

    /// Inspect node instances on the manager
    #[command(name = "node-instances")]
    NodeInstances(NodeInstancesArgs),

    /// Inspect the local execution environment
    Local(LocalArgs),

    /// Inspect deployment workflows
    Workflows(WorkflowsArgs),

    /// Handle the manager's maintenance mode
    #[command(name = "maintenance-mode")]
    MaintenanceMode(MaintenanceArgs),

    /// Select the active manager
    Use {
        /// Manager host or IP
        host: String,

        /// REST port
        #[arg(long)]
        port: Option<u16>,

        /// REST protocol
        #[arg(long, value_parser = ["http", "https"])]
        protocol: Option<String>,

        /// Manager username
        #[arg(short, long)]
        username: Option<String>,

        /// Manager password
        #[arg(short, long, requires = "username")]
        password: Option<String>,
    },
}

#[derive(Args)]
struct BlueprintsArgs {
    #[command(subcommand)]
    command: BlueprintsSubcommand,
}

#[derive(Subcommand)]
enum BlueprintsSubcommand {
    /// Upload a blueprint to the manager
    ///
    /// PATH may be a definition file, a zip/tar/tar.gz/tar.bz2 archive, an
    /// archive URL, or an `organization/repository[:ref]` shorthand.
    Upload {
        path: String,

        /// Blueprint id (derived from PATH when omitted)
        #[arg(short, long)]
        blueprint_id: Option<String>,

        /// Definition file name inside archives
        #[arg(short = 'n', long)]
        blueprint_filename: Option<String>,

        /// Validate the blueprint before uploading
        #[arg(long)]
        validate: bool,
    },

    /// Validate a blueprint
    Validate {
        path: String,

        /// Definition file name inside archives
        #[arg(short = 'n', long)]
        blueprint_filename: Option<String>,
    },

    /// Download a blueprint archive
    Download {
        blueprint_id: String,

        /// Output file or directory
        #[arg(short, long)]
        output_path: Option<PathBuf>,
    },

    /// Delete a blueprint
    Delete { blueprint_id: String },

    /// List blueprints
    #[command(alias = "ls")]
    List,

    /// Show a blueprint and its deployments
    Get { blueprint_id: String },

    /// List a blueprint's inputs
    Inputs { blueprint_id: String },
}

#[derive(Args)]
struct NodeInstancesArgs {
    #[command(subcommand)]
    command: NodeInstancesSubcommand,
}

#[derive(Subcommand)]
enum NodeInstancesSubcommand {
    /// Show a node instance
    Get { node_instance_id: String },

    /// List node instances
    Ls {
        /// Restrict to one deployment
        deployment_id: Option<String>,

        /// Restrict to one node
        #[arg(short, long)]
        node_name: Option<String>,
    },
}

#[derive(Args)]
struct LocalArgs {
    #[command(subcommand)]
    command: LocalSubcommand,
}

#[derive(Subcommand)]
enum LocalSubcommand {
    /// Display node instances of the local environment
    #[command(name = "node-instances")]
    NodeInstances { node_id: Option<String> },
}

#[derive(Args)]
struct WorkflowsArgs {
    #[command(subcommand)]
    command: WorkflowsSubcommand,
}

#[derive(Subcommand)]
enum WorkflowsSubcommand {
    /// List a deployment's workflows
    Ls { deployment_id: String },

    /// Show a workflow and its parameters
    Get {
        deployment_id: String,
        workflow_id: String,
    },
}

#[derive(Args)]
struct MaintenanceArgs {
    #[command(subcommand)]
    command: MaintenanceSubcommand,
}

#[derive(Subcommand)]
enum MaintenanceSubcommand {
    /// Show maintenance mode status
    Status,

    /// Enter maintenance mode
    Activate {
        /// Wait until maintenance mode is active
        #[arg(long)]
        wait: bool,

        /// Seconds to wait (0 = no limit); requires --wait
        #[arg(long, default_value_t = 0)]
        timeout: u64,
    },

    /// Leave maintenance mode
    Deactivate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "cfy=debug,cfy_core=debug"
    } else {
        "cfy=info,cfy_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = AppContext::load()?.with_manager_override(cli.manager);
    tracing::debug!(config_dir = %ctx.config_dir().display(), "configuration loaded");
    let format = cli.format;

    match cli.command {
        Commands::Blueprints(args) => run_blueprints(&ctx, args, format),
        Commands::NodeInstances(args) => run_node_instances(&ctx, args, format),
        Commands::Local(args) => run_local(&ctx, args),
        Commands::Workflows(args) => run_workflows(&ctx, args, format),
        Commands::MaintenanceMode(args) => run_maintenance(&ctx, args, format),
        Commands::Use {
            host,
            port,
            protocol,
            username,
            password,
        } => {
            let mut options = UseOptions::new(host);
            if let Some(port) = port {
                options = options.with_port(port);
            }
            if let Some(protocol) = protocol {
                options = options.with_protocol(protocol);
            }
            if let Some(username) = username {
                options = options.with_credentials(username, password);
            }

            let report = ProfileCommand::new(ctx.config_store()).use_manager(&options)?;
            match format {
                OutputFormat::Table => println!("Using manager {} ({})", report.host, report.base_url),
                OutputFormat::Json => print_json(&report)?,
            }
            Ok(())
        }
    }
}

fn run_blueprints(ctx: &AppContext, args: BlueprintsArgs, format: OutputFormat) -> Result<()> {
    let cmd = BlueprintsCommand::from_context(ctx);

    match args.command {
        BlueprintsSubcommand::Upload {
            path,
            blueprint_id,
            blueprint_filename,
            validate,
        } => {
            let mut options = UploadOptions::new(path).with_validate(validate);
            if let Some(id) = blueprint_id {
                options = options.with_blueprint_id(id);
            }
            if let Some(filename) = blueprint_filename {
                options = options.with_blueprint_filename(filename);
            }

            let client = ctx.rest_client()?;
            let report = cmd.upload(&client, &options)?;
            match format {
                OutputFormat::Table => println!(
                    "Blueprint uploaded. The blueprint's id is {}",
                    report.blueprint_id
                ),
                OutputFormat::Json => print_json(&report)?,
            }
        }

        BlueprintsSubcommand::Validate {
            path,
            blueprint_filename,
        } => {
            let mut options = ValidateOptions::new(path);
            if let Some(filename) = blueprint_filename {
                options = options.with_blueprint_filename(filename);
            }
            let report = cmd.validate(&options)?;
            match format {
                OutputFormat::Table => println!("Blueprint validated successfully"),
                OutputFormat::Json => print_json(&report)?,
            }
        }

        BlueprintsSubcommand::Download {
            blueprint_id,
            output_path,
        } => {
            let client = ctx.rest_client()?;
            let report = cmd.download(&client, &blueprint_id, output_path)?;
            match format {
                OutputFormat::Table => {
                    println!("Blueprint downloaded as {}", report.path.display())
                }
                OutputFormat::Json => print_json(&report)?,
            }
        }

        BlueprintsSubcommand::Delete { blueprint_id } => {
            let client = ctx.rest_client()?;
            let report = cmd.delete(&client, &blueprint_id)?;
            match format {
                OutputFormat::Table => println!("Blueprint {} deleted", report.blueprint_id),
                OutputFormat::Json => print_json(&report)?,
            }
        }

        BlueprintsSubcommand::List => {
            let client = ctx.rest_client()?;
            let rows = cmd.list(&client)?;
            match format {
                OutputFormat::Table => print_table(
                    "Blueprints:",
                    &table(
                        &["id", "description", "main_file_name", "created_at", "updated_at"],
                        rows.into_iter().map(|r| {
                            [r.id, r.description, r.main_file_name, r.created_at, r.updated_at]
                        }),
                    ),
                ),
                OutputFormat::Json => print_json(&rows)?,
            }
        }

        BlueprintsSubcommand::Get { blueprint_id } => {
            let client = ctx.rest_client()?;
            let details = cmd.get(&client, &blueprint_id)?;
            match format {
                OutputFormat::Table => {
                    let row = details.row.clone();
                    print_table(
                        "Blueprint:",
                        &table(
                            &["id", "main_file_name", "created_at", "updated_at", "#deployments"],
                            [[
                                row.id,
                                row.main_file_name,
                                row.created_at,
                                row.updated_at,
                                details.deployment_count.to_string(),
                            ]],
                        ),
                    );
                    println!("Description:");
                    println!("{}\n", details.full_description.as_deref().unwrap_or(""));
                    println!("Existing deployments:");
                    println!("{}\n", serde_json::to_string(&details.deployment_ids)?);
                }
                OutputFormat::Json => print_json(&details)?,
            }
        }

        BlueprintsSubcommand::Inputs { blueprint_id } => {
            let client = ctx.rest_client()?;
            let rows = cmd.inputs(&client, &blueprint_id)?;
            match format {
                OutputFormat::Table => print_table(
                    "Inputs:",
                    &table(
                        &["name", "type", "default", "description"],
                        rows.into_iter()
                            .map(|r| [r.name, r.input_type, r.default, r.description]),
                    ),
                ),
                OutputFormat::Json => print_json(&rows)?,
            }
        }
    }

    Ok(())
}

const NODE_INSTANCE_COLUMNS: [&str; 5] = ["id", "deployment_id", "host_id", "node_id", "state"];

fn run_node_instances(
    ctx: &AppContext,
    args: NodeInstancesArgs,
    format: OutputFormat,
) -> Result<()> {
    let client = ctx.rest_client()?;
    let cmd = NodeInstancesCommand::new();

    match args.command {
        NodeInstancesSubcommand::Get { node_instance_id } => {
            let details = cmd.get(&client, &node_instance_id)?;
            match format {
                OutputFormat::Table => {
                    let row = details.row.clone();
                    print_table(
                        "Instance:",
                        &table(
                            &NODE_INSTANCE_COLUMNS,
                            [[row.id, row.deployment_id, row.host_id, row.node_id, row.state]],
                        ),
                    );
                    println!("Instance runtime properties:");
                    for (name, value) in &details.runtime_properties {
                        println!("\t{name}: {value}");
                    }
                    println!();
                }
                OutputFormat::Json => print_json(&details)?,
            }
        }

        NodeInstancesSubcommand::Ls {
            deployment_id,
            node_name,
        } => {
            let rows = cmd.list(&client, deployment_id.as_deref(), node_name.as_deref())?;
            match format {
                OutputFormat::Table => print_table(
                    "Instances:",
                    &table(
                        &NODE_INSTANCE_COLUMNS,
                        rows.into_iter()
                            .map(|r| [r.id, r.deployment_id, r.host_id, r.node_id, r.state]),
                    ),
                ),
                OutputFormat::Json => print_json(&rows)?,
            }
        }
    }

    Ok(())
}

fn run_local(ctx: &AppContext, args: LocalArgs) -> Result<()> {
    match args.command {
        LocalSubcommand::NodeInstances { node_id } => {
            let instances =
                NodeInstancesCommand::new().local(&ctx.local_storage(), node_id.as_deref())?;
            // serde_json maps keep keys sorted
            print_json(&instances)?;
        }
    }
    Ok(())
}

const WORKFLOW_COLUMNS: [&str; 4] = ["blueprint_id", "deployment_id", "name", "created_at"];

fn run_workflows(ctx: &AppContext, args: WorkflowsArgs, format: OutputFormat) -> Result<()> {
    let client = ctx.rest_client()?;
    let cmd = WorkflowsCommand::new();

    match args.command {
        WorkflowsSubcommand::Ls { deployment_id } => {
            let rows = cmd.list(&client, &deployment_id)?;
            match format {
                OutputFormat::Table => print_table(
                    "Workflows:",
                    &table(
                        &WORKFLOW_COLUMNS,
                        rows.into_iter()
                            .map(|r| [r.blueprint_id, r.deployment_id, r.name, r.created_at]),
                    ),
                ),
                OutputFormat::Json => print_json(&rows)?,
            }
        }

        WorkflowsSubcommand::Get {
            deployment_id,
            workflow_id,
        } => {
            let details = cmd.get(&client, &deployment_id, &workflow_id)?;
            match format {
                OutputFormat::Table => {
                    let row = details.row.clone();
                    print_table(
                        "Workflows:",
                        &table(
                            &WORKFLOW_COLUMNS,
                            [[row.blueprint_id, row.deployment_id, row.name, row.created_at]],
                        ),
                    );
                    println!("Workflow Parameters:");
                    println!("\tMandatory Parameters:");
                    for param in &details.mandatory_parameters {
                        match &param.description {
                            Some(description) => println!("\t\t{}\t({description})", param.name),
                            None => println!("\t\t{}", param.name),
                        }
                    }
                    println!("\tOptional Parameters:");
                    for param in &details.optional_parameters {
                        let default = param
                            .default
                            .as_ref()
                            .map(|d| d.to_string())
                            .unwrap_or_default();
                        match &param.description {
                            Some(description) => {
                                println!("\t\t{}: \t{default}\t({description})", param.name)
                            }
                            None => println!("\t\t{}: \t{default}", param.name),
                        }
                    }
                    println!();
                }
                OutputFormat::Json => print_json(&details)?,
            }
        }
    }

    Ok(())
}

fn run_maintenance(ctx: &AppContext, args: MaintenanceArgs, format: OutputFormat) -> Result<()> {
    let client = ctx.rest_client()?;
    let cmd = MaintenanceCommand::new();

    let report = match args.command {
        MaintenanceSubcommand::Status => cmd.status(&client)?,
        MaintenanceSubcommand::Activate { wait, timeout } => {
            let options = ActivateOptions::new().with_wait(wait).with_timeout(timeout);
            cmd.activate(&client, &options)?
        }
        MaintenanceSubcommand::Deactivate => cmd.deactivate(&client)?,
    };

    match format {
        OutputFormat::Table => print_maintenance(&report),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn print_maintenance(report: &MaintenanceReport) {
    println!("\nMaintenance Mode Status:");
    println!("\tStatus:\t{}", report.status);
    let fields = [
        ("Activated At", &report.activated_at),
        ("Activation Requested At", &report.activation_requested_at),
        ("Requested By", &report.requested_by),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("\t{label}:\t{value}");
        }
    }
    println!();

    if !report.remaining_executions.is_empty() {
        print_table(
            "Remaining executions:",
            &table(
                &["id", "deployment_id", "workflow_id", "status"],
                report
                    .remaining_executions
                    .iter()
                    .cloned()
                    .map(|e| [e.id, e.deployment_id, e.workflow_id, e.status]),
            ),
        );
    }

    if report.active {
        println!("INFO - Manager is currently in maintenance mode. Most requests will be blocked.\n");
    }
}
