use anyhow::{Context, Result};
use codec_datasets::dataset::config::DatasetConfig;
use codec_datasets::{Dataset, FailurePolicy, Fetched, ImageFolder, VideoFolder};
use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Scan an image or video folder dataset and report what it serves
struct Args {
    #[structopt(long, default_value = "dataset.json")]
    /// dataset configuration file
    pub config_file: PathBuf,
    #[structopt(long)]
    /// decode every sample and report the ones that fail
    pub verify: bool,
    #[structopt(long)]
    /// write the scanned catalog as JSON
    pub output: Option<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args {
        config_file,
        verify,
        output,
    } = Args::from_args();
    let config = DatasetConfig::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    match config {
        DatasetConfig::ImageFolder(config) => {
            let dataset = ImageFolder::from_config(&config)?;
            println!(
                "image folder {}/{}: {} image(s)",
                dataset.root().display(),
                dataset.split(),
                dataset.len()
            );
            if let Some(output) = &output {
                write_json(output, dataset.samples())?;
            }
            if verify {
                report(verify_samples(&dataset.with_failure_policy(FailurePolicy::Skip)));
            }
        }
        DatasetConfig::VideoFolder(config) => {
            let dataset = VideoFolder::from_config(&config)?;
            println!(
                "video folder {} ({:?}): {} sample(s), {} frame(s)",
                dataset.root().display(),
                dataset.mode(),
                dataset.len(),
                dataset.num_frames()
            );
            if let Some(output) = &output {
                dataset
                    .save_catalog(output)
                    .with_context(|| format!("failed to write '{}'", output.display()))?;
                info!("catalog written to {}", output.display());
            }
            if verify {
                report(verify_samples(&dataset.with_failure_policy(FailurePolicy::Skip)));
            }
        }
    }

    Ok(())
}

/// Fetches every index in parallel and collects the ones that did not load.
fn verify_samples<D>(dataset: &D) -> Vec<(usize, String)>
where
    D: Dataset + Sync,
{
    let mut failures: Vec<_> = (0..dataset.len())
        .into_par_iter()
        .filter_map(|index| match dataset.get(index) {
            Ok(Fetched::Sample(_)) => None,
            Ok(Fetched::Skipped { index, reason }) => {
                Some((index, format!("{:#}", anyhow::Error::new(reason))))
            }
            Err(err) => Some((index, err.to_string())),
        })
        .collect();
    failures.sort_by_key(|(index, _)| *index);
    failures
}

fn report(failures: Vec<(usize, String)>) {
    if failures.is_empty() {
        println!("all samples decoded");
        return;
    }
    for (index, reason) in &failures {
        warn!("sample {} failed: {}", index, reason);
    }
    println!("{} sample(s) failed to load", failures.len());
}

fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let file = File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    info!("sample list written to {}", path.display());
    Ok(())
}
