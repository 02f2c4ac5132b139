// src/main.rs
use color_eyre::eyre::{eyre, Result};

fn main() -> Result<()> {
    color_eyre::install()?;
    cn_scrape::cli::run().map_err(|e| eyre!("{e}"))
}
