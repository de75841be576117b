mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use scorecard_engine::orchestrator::{App, SheetInput};
use scorecard_engine::utils::logging;
use scorecard_engine::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await?;

    match cli.command {
        Commands::Analyze(args) => {
            let input = SheetInput::from_args(args.file, args.url)?;
            app.analyze_to(input, args.exam, args.output.as_deref()).await?;
        }
        Commands::Batch(args) => {
            let stats = app.run_batch(&args.dir, args.exam).await?;
            if !stats.all_scored() {
                std::process::exit(1);
            }
        }
        Commands::Exams(args) => {
            print!("{}", app.render_exams(args.category.as_deref()));
        }
    }

    Ok(())
}
