//! `ogr2ogr` adapter for the extraction loop.

use log::debug;
use natural_earth::{ExtractError, LayerExtractor, LayerJob};
use std::process::{Command, Stdio};

pub struct Ogr2Ogr {
    program: String,
    /// Pass the tool's stdout/stderr through instead of discarding them.
    show_output: bool,
}

impl Ogr2Ogr {
    pub fn new(program: impl Into<String>, show_output: bool) -> Self {
        Self {
            program: program.into(),
            show_output,
        }
    }

    /// Arguments for clipping `job.source` to the job extent into its destination.
    fn arguments(job: &LayerJob<'_>) -> Vec<String> {
        let e = job.extent;

        vec![
            "-spat".to_string(),
            e.xmin.to_string(),
            e.ymin.to_string(),
            e.xmax.to_string(),
            e.ymax.to_string(),
            "-clipsrc".to_string(),
            "spat_extent".to_string(),
            job.destination.display().to_string(),
            job.source.display().to_string(),
        ]
    }
}

impl LayerExtractor for Ogr2Ogr {
    fn extract(&self, job: &LayerJob<'_>) -> Result<(), ExtractError> {
        if !job.source.exists() {
            debug!("source file not found: {}", job.source.display());
            return Err(ExtractError::SourceMissing(job.source.clone()));
        }

        let args = Self::arguments(job);
        debug!("command: {} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(&args);
        if !self.show_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status().map_err(|source| ExtractError::Launch {
            tool: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExtractError::ToolFailed {
                tool: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}
