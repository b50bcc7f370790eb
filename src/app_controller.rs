use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::align;
use crate::app_config::Config;
use crate::cue::CueSequence;
use crate::extract::{self, TrackFormat};
use crate::file_utils::FileManager;
use crate::render;

// @module: Application controller for bilingual subtitle merging

/// Subtitle document extensions considered when scanning folders
const SUBTITLE_EXTENSIONS: &[&str] = &["xml", "ttml", "dfxp"];

/// Main application controller for merging subtitle tracks
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Format override for the primary track, None means sniff
    primary_format: Option<TrackFormat>,

    // @field: Format override for the secondary track, None means sniff
    secondary_format: Option<TrackFormat>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            primary_format: None,
            secondary_format: None,
        })
    }

    /// Pin the markup format of one or both tracks instead of sniffing
    pub fn with_formats(
        mut self,
        primary_format: Option<TrackFormat>,
        secondary_format: Option<TrackFormat>,
    ) -> Self {
        self.primary_format = primary_format;
        self.secondary_format = secondary_format;
        self
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.primary_track.is_empty() && !self.config.secondary_track.is_empty()
    }

    /// Merge one pair of subtitle documents and write the result.
    ///
    /// Returns the output path, or None when the output already exists and
    /// overwriting was not requested.
    pub fn run_pair(
        &self,
        primary_path: &Path,
        secondary_path: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let output_path = FileManager::generate_output_path(
            primary_path,
            output_dir,
            self.config.output_format.extension(),
        );

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, output already exists (use -f to force overwrite)",
                output_path
            );
            return Ok(None);
        }

        let primary = self.load_track(
            primary_path,
            self.primary_format,
            &self.config.primary_track,
        )?;
        let secondary = self.load_track(
            secondary_path,
            self.secondary_format,
            &self.config.secondary_track,
        )?;

        primary.count_inverted_ranges();
        secondary.count_inverted_ranges();

        let alignment = align::align(
            self.config.strategy,
            &primary,
            &secondary,
            &self.config.alignment,
        )?;

        for skip in &alignment.skipped {
            warn!(
                "Excluded cue {} of track '{}': {}",
                skip.cue_index, skip.track, skip.reason
            );
        }

        let content = render::render(&alignment.entries, self.config.output_format);
        FileManager::write_to_file(&output_path, &content)?;

        info!(
            "Merged {} + {} cues into {} entries -> {:?} ({} strategy)",
            primary.len(),
            secondary.len(),
            alignment.entries.len(),
            output_path,
            self.config.strategy
        );

        Ok(Some(output_path))
    }

    /// Merge every stem-matched pair across two folders.
    ///
    /// Files pair up when their stems are equal; unmatched files are logged
    /// and skipped. A failed pair does not abort the batch.
    pub fn run_folder(
        &self,
        primary_dir: &Path,
        secondary_dir: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !primary_dir.exists() {
            return Err(anyhow!("Primary directory does not exist: {:?}", primary_dir));
        }
        if !secondary_dir.exists() {
            return Err(anyhow!("Secondary directory does not exist: {:?}", secondary_dir));
        }

        let primary_files = Self::index_by_stem(primary_dir)?;
        let secondary_files = Self::index_by_stem(secondary_dir)?;

        if primary_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", primary_dir));
        }

        let pairs: Vec<(&PathBuf, &PathBuf)> = primary_files
            .iter()
            .filter_map(|(stem, primary)| {
                match secondary_files.get(stem) {
                    Some(secondary) => Some((primary, secondary)),
                    None => {
                        warn!("No secondary file for stem '{}', skipping", stem);
                        None
                    }
                }
            })
            .collect();

        if pairs.is_empty() {
            return Err(anyhow!(
                "No matching file pairs between {:?} and {:?}",
                primary_dir,
                secondary_dir
            ));
        }

        // Create a progress bar for folder processing
        let folder_pb = ProgressBar::new(pairs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Merging pairs");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for (primary_path, secondary_path) in pairs {
            let file_name = primary_path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Merging: {}", file_name));

            match self.run_pair(primary_path, secondary_path, output_dir, force_overwrite) {
                Ok(Some(_)) => success_count += 1,
                Ok(None) => skip_count += 1,
                Err(e) => {
                    error!("Error processing pair {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let duration = start_time.elapsed();
        info!(
            "Folder processing completed in {:.1}s: {} merged, {} skipped, {} errors",
            duration.as_secs_f64(),
            success_count,
            skip_count,
            error_count
        );

        if success_count == 0 && error_count > 0 {
            return Err(anyhow!("All {} file pairs failed", error_count));
        }

        Ok(())
    }

    /// Read one document and extract its cue sequence
    fn load_track(
        &self,
        path: &Path,
        format: Option<TrackFormat>,
        track: &str,
    ) -> Result<CueSequence> {
        let document = FileManager::read_to_string(path)?;

        let format = match format {
            Some(format) => format,
            None => extract::detect_track_format(&document).ok_or_else(|| {
                anyhow!("Could not detect subtitle format of {:?}", path)
            })?,
        };
        debug!("Loading {:?} as {} (track '{}')", path, format, track);

        let sequence = extract::extract_cues(&document, format, path.to_path_buf(), track)?;
        Ok(sequence)
    }

    /// Map file stem to path for all subtitle documents under a directory.
    /// BTreeMap keeps batch order deterministic.
    fn index_by_stem(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
        let mut index = BTreeMap::new();

        for ext in SUBTITLE_EXTENSIONS {
            for file in FileManager::find_files(dir, ext)? {
                if let Some(stem) = file.file_stem() {
                    let stem = stem.to_string_lossy().to_string();
                    if let Some(previous) = index.insert(stem.clone(), file) {
                        warn!("Duplicate stem '{}', ignoring {:?}", stem, previous);
                    }
                }
            }
        }

        Ok(index)
    }
}
