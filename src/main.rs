use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use echofetch::{
    cli::{Cli, Commands, ParamArgs},
    config::{ApplyArgs, load_configuration},
    echo::{EchoClient, EchoResponse, SampleRequest},
    http::{Executor, LoggingObserver, RequestError, SessionBuilder},
    log::init_logging,
};
use log::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = load_configuration(&cli.config)?;
    config.apply_connection(&cli.connection);

    let session = SessionBuilder::from_config(&config)
        .context("Invalid base URL in configuration")?
        .observer(LoggingObserver)
        .build()?;
    let client = EchoClient::new(Executor::new(Arc::new(session)));
    info!(address = &*client.get_address(); "Echo client ready");

    match cli.command {
        Commands::Get { params } => {
            print_response(client.get(&sample(params)).await)?;
        },
        Commands::Post { params } => {
            print_response(client.post(&sample(params)).await)?;
        },
        Commands::Both { params } => {
            let request = sample(params);
            print_response(client.get(&request).await)?;
            print_response(client.post(&request).await)?;
        },
    }

    Ok(())
}

fn sample(params: ParamArgs) -> SampleRequest {
    SampleRequest::new(params.param_a, params.param_b)
}

fn print_response(result: Result<EchoResponse, RequestError>) -> Result<(), anyhow::Error> {
    println!("--------");
    let response = result.context("Echo request failed")?;
    println!("{:#?}", response);
    Ok(())
}
