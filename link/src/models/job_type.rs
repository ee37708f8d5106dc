use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of PDF operation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Merge,
    Split,
    Compress,
    Watermark,
    Protect,
    Unlock,
    Rotate,
    // Backend-only kinds; they appear in job listings but have no submit call here.
    Edit,
    Convert,
    Ocr,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "MERGE",
            Self::Split => "SPLIT",
            Self::Compress => "COMPRESS",
            Self::Watermark => "WATERMARK",
            Self::Protect => "PROTECT",
            Self::Unlock => "UNLOCK",
            Self::Rotate => "ROTATE",
            Self::Edit => "EDIT",
            Self::Convert => "CONVERT",
            Self::Ocr => "OCR",
        }
    }

    /// Path segment under `/api/v1/pdf/` used to submit this kind of job.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            Self::Merge => Some("merge"),
            Self::Split => Some("split"),
            Self::Compress => Some("compress"),
            Self::Watermark => Some("watermark"),
            Self::Protect => Some("protect"),
            Self::Unlock => Some("unlock"),
            Self::Rotate => Some("rotate"),
            Self::Edit | Self::Convert | Self::Ocr => None,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
