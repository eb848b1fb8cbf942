mod app;
mod cli;
mod config;
mod handler;
mod persistence;
mod repository;
mod service;
#[cfg(test)]
mod test_support;
mod view;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run(cli))
}
