use crate::cli::ExtractArgs;
use crate::extract::parse_issues;
use tracing::info;

pub fn execute(args: ExtractArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)?;
    let issues = parse_issues(&text, &args.changed_files)?;

    info!("Extracted {} issues from {:?}", issues.len(), args.file);
    println!("{}", serde_json::to_string_pretty(&issues)?);

    Ok(())
}
