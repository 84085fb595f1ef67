use crate::common;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;
    let achievements = ctx.service().achievements()?;
    println!("{}", serde_json::to_string_pretty(&achievements)?);
    Ok(())
}
