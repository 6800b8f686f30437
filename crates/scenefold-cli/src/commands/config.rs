use anyhow::Result;

use scenefold_core::AccordionConfig;

pub fn run(config: &AccordionConfig, write: bool) -> Result<()> {
    let path = AccordionConfig::config_path();
    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    if write {
        config.save()?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
