use anyhow::Context;
use clap::Parser;
use quote_desk::app::commands;
use quote_desk::config::cli::Cli;
use quote_desk::utils::error::ErrorSeverity;
use quote_desk::utils::{logger, validation::Validate};
use quote_desk::{report, DeskConfig, QuoteRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DeskConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DeskConfig::default(),
    };

    // 初始化日誌
    logger::init_logger(cli.verbose || config.logging.verbose, config.logging.json);
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let lang = cli.lang.unwrap_or(config.language());
    let gateway = config.build_gateway()?;
    let repo = QuoteRepository::new(gateway).with_policy(config.transition_policy());

    let action = cli.command.action();
    let is_read = cli.command.is_read();
    let result = commands::execute(&repo, cli.command, cli.json).await;
    let notice = report(action, &result, lang);

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            if !is_read {
                eprintln!("{}", notice);
            }
        }
        Err(e) => {
            tracing::error!(
                "{:?} failed: {} (Category: {:?}, Severity: {:?})",
                action,
                e,
                e.category(),
                e.severity()
            );
            eprintln!("{}", notice);
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 2,
                ErrorSeverity::Medium => 3,
                ErrorSeverity::High => 4,
                ErrorSeverity::Critical => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
