//! Parsing options and configuration.

use crate::text::{LinkStrategy, NormalizeOptions, SegmentLimits};

/// Options for parsing a paper.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for per-page extraction failures
    pub error_mode: ErrorMode,

    /// Pages cleaned per batch; progress and memory are checked between batches
    pub batch_size: usize,

    /// File size (MB) above which a warning is logged
    pub max_file_size_mb: u64,

    /// Resident memory limit in MB (0 = unlimited)
    pub memory_limit_mb: u64,

    /// Maximum number of sections kept
    pub max_sections: usize,

    /// Section body length (chars) at which a section is emitted early
    pub split_threshold_chars: usize,

    /// How section parents are chosen
    pub link_strategy: LinkStrategy,

    /// Text cleaning options
    pub normalize: NormalizeOptions,

    /// Characters of cleaned text sent to the metadata assistant
    pub assist_sample_chars: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages that fail to extract count as blank).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the page batch size (minimum 1).
    pub fn with_batch_size(mut self, pages: usize) -> Self {
        self.batch_size = pages.max(1);
        self
    }

    /// Set the file size warning threshold in MB.
    pub fn with_max_file_size(mut self, mb: u64) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    /// Set memory limit in MB.
    pub fn with_memory_limit(mut self, mb: u64) -> Self {
        self.memory_limit_mb = mb;
        self
    }

    /// Disable the memory guard.
    pub fn unlimited_memory(mut self) -> Self {
        self.memory_limit_mb = 0;
        self
    }

    /// Set the maximum number of sections kept.
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = max;
        self
    }

    /// Set the early-split threshold for long sections.
    pub fn with_split_threshold(mut self, chars: usize) -> Self {
        self.split_threshold_chars = chars;
        self
    }

    /// Set the parent linking strategy.
    pub fn with_link_strategy(mut self, strategy: LinkStrategy) -> Self {
        self.link_strategy = strategy;
        self
    }

    /// Set text cleaning options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set how much text the metadata assistant sees.
    pub fn with_assist_sample_chars(mut self, chars: usize) -> Self {
        self.assist_sample_chars = chars;
        self
    }

    /// Segmenter limits derived from these options.
    pub fn segment_limits(&self) -> SegmentLimits {
        SegmentLimits {
            split_threshold_chars: self.split_threshold_chars,
            max_sections: self.max_sections,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            batch_size: 10,
            max_file_size_mb: 50,
            memory_limit_mb: 500,
            max_sections: 20,
            split_threshold_chars: 3000,
            link_strategy: LinkStrategy::NearestShallower,
            normalize: NormalizeOptions::default(),
            assist_sample_chars: 4000,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page extraction error
    #[default]
    Strict,
    /// Treat pages that fail to extract as blank and continue
    Lenient,
}
