use crate::cli::RunArgs;
use crate::config::Config;
use crate::input::RunInput;
use crate::output::write_run_artifacts;
use crate::pipeline::Pipeline;
use crate::provider::{InputContext, TranscriptAnalyst};
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(dir) = args.transcript_dir {
        config.transcript_dir = dir;
    }
    if let Some(dir) = args.report_dir {
        config.report_dir = dir;
    }

    config.validate()?;

    info!("Loading run input from {:?}", args.input);
    let input = RunInput::load(&args.input)?;

    let context = Arc::new(InputContext::new(input.comprehensive_context.clone()));
    let analyst = Arc::new(TranscriptAnalyst::new(config.transcript_dir.clone()));
    let pipeline = Pipeline::new(context, analyst);

    let state = pipeline.run(input).await;

    // Operator-level detail stays in the logs; the report only names failed
    // stages
    for message in state.errors.iter().chain(state.warnings.iter()) {
        warn!("{}", message);
    }

    // Dated artifact directory (reviews/YYYY-MM-DD/)
    let date_str = Local::now().format("%Y-%m-%d").to_string();
    let report_dir = config.report_dir.join(&date_str);
    let report_path = write_run_artifacts(&report_dir, &state)?;
    info!("Wrote report to {:?}", report_path);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.to_output())?);
    } else {
        println!("{}", state.final_report);
    }

    if args.fail_on_issues && state.total_issues > 0 {
        error!("Exiting with error: {} issues found", state.total_issues);
        std::process::exit(1);
    }

    Ok(())
}
