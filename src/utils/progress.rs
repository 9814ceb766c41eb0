use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_progress_bar(total: u64, prefix: &str) -> Result<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} {prefix:>8} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .progress_chars("#>-");

    let pb = ProgressBar::new(total);
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());
    Ok(pb)
}
