// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT
use anyhow::Context;
use clap::Parser;
use fnless_cli::config::{fnless_cli_default_conf, CliConfig};
use fnless_cli::override_set::RawOverrides;

#[derive(Debug, clap::Subcommand)]
enum FunctionCommands {
    /// Update a function already deployed.
    Update {
        function_name: String,
        /// Runtime, e.g., python3.6.
        #[arg(long)]
        runtime: Option<String>,
        /// Handler, in the form module.function.
        #[arg(long)]
        handler: Option<String>,
        /// File containing the function's code.
        #[arg(long)]
        from_file: Option<String>,
        /// Amount of memory requested for the function, e.g., 128Mi.
        #[arg(long)]
        memory: Option<String>,
        /// Amount of CPU requested for the function, e.g., 100m.
        #[arg(long)]
        cpu: Option<String>,
        /// Labels of the function, as key=value. Replaces all the previous labels.
        #[arg(long = "label", value_delimiter = ',')]
        labels: Vec<String>,
        /// Secrets mounted into the function's container. Replaces all the previous secrets.
        #[arg(long, value_delimiter = ',')]
        secrets: Vec<String>,
        /// Environment variables, as NAME=value. Replaces all the previous variables.
        #[arg(long)]
        env: Vec<String>,
        /// Namespace of the function.
        #[arg(long)]
        namespace: Option<String>,
        /// File containing the list of dependencies of the function.
        #[arg(long)]
        dependencies: Option<String>,
        /// Custom runtime image.
        #[arg(long)]
        runtime_image: Option<String>,
        /// Maximum time, in seconds, for the function to complete its execution (180 for new functions).
        #[arg(long)]
        timeout: Option<String>,
        /// Expose the function without a single service IP and load balancing.
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        headless: Option<bool>,
        /// Port where the function is exposed (8080 for new functions).
        #[arg(long, allow_negative_numbers = true)]
        port: Option<i64>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    Function {
        #[command(subcommand)]
        function_command: FunctionCommands,
    },
}

#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(short, long, default_value_t = String::from("cli.toml"))]
    config_file: String,
    #[arg(short, long, default_value_t = String::from(""))]
    template: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if !args.template.is_empty() {
        fnless_api::util::create_template(&args.template, fnless_cli_default_conf().as_str())?;
        return Ok(());
    }

    match args.command {
        None => log::debug!("Bye"),
        Some(Commands::Function { function_command }) => match function_command {
            FunctionCommands::Update {
                function_name,
                runtime,
                handler,
                from_file,
                memory,
                cpu,
                labels,
                secrets,
                env,
                namespace,
                dependencies,
                runtime_image,
                timeout,
                headless,
                port,
            } => {
                let conf = CliConfig::from_file(&args.config_file)?;
                let catalog = conf.runtime_catalog();
                let mut store = conf.descriptor_store();
                let raw = RawOverrides {
                    namespace,
                    runtime,
                    handler,
                    from_file,
                    dependencies,
                    runtime_image,
                    memory,
                    cpu,
                    timeout,
                    headless,
                    port,
                    labels,
                    secrets,
                    env,
                };
                let next = fnless_cli::update::update_function(&mut store, &catalog, &conf.default_namespace, &function_name, &raw)
                    .await
                    .with_context(|| format!("unable to update function {}", function_name))?;
                println!("Function {} submitted for deployment", next.name);
                println!("Check the deployment status of function {} in namespace {} on the control plane", next.name, next.namespace);
            }
        },
    }
    Ok(())
}
