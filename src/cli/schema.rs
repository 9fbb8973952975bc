use crate::input::RunInput;

pub fn execute() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(RunInput);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
