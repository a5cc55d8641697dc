use clap::Parser;

use shortener::cli::{Cli, Commands};
use shortener::config::StaticConfig;
use shortener::errors::ShortenerError;
use shortener::generator::generate_short_code;
use shortener::runtime;
use shortener::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = StaticConfig::load(&cli.config).inspect_err(report)?;
            let _guard = init_logging(&config.logging)?;

            if let Err(e) = runtime::run_server(config).await {
                if let Some(err) = e.downcast_ref::<ShortenerError>() {
                    eprintln!("{}", err.format_colored());
                }
                return Err(e);
            }
            Ok(())
        }
        Commands::Generate { long_url, user_id } => {
            let code = generate_short_code(&long_url, &user_id).inspect_err(report)?;
            println!("{}", code);
            Ok(())
        }
        Commands::ConfigGen { path } => {
            StaticConfig::default()
                .save_to_file(&path)
                .inspect_err(report)?;
            println!("Sample configuration written to {}", path);
            Ok(())
        }
    }
}

fn report(err: &ShortenerError) {
    eprintln!("{}", err.format_colored());
}
