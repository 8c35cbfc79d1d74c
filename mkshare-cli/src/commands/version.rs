use anyhow::Result;

pub fn run() -> Result<()> {
    println!("version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
