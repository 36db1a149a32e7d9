//! Settings for extraction and restoration.

use chrono::{DateTime, Utc};
use derive_builder::Builder;

use crate::base16::MIN_OUTPUT_WIDTH;
use crate::blob::DataType;
use crate::errors::{Error, Result};

/// Characters per base16 line, unless configured otherwise.
pub const DEFAULT_OUTPUT_WIDTH: usize = 78;

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "crate::errors::Error"))]
pub struct ExtractOptions {
    /// [`DataType::Auto`] writes base16.
    #[builder(default = "DataType::Base16")]
    output_type: DataType,
    /// Characters per base16 line.
    #[builder(default = "DEFAULT_OUTPUT_WIDTH")]
    output_width: usize,
    /// Noted in the base16 comment header when set.
    #[builder(default, setter(strip_option))]
    created_at: Option<DateTime<Utc>>,
}

impl ExtractOptionsBuilder {
    fn validate(&self) -> Result<()> {
        if let Some(width) = self.output_width {
            if width < MIN_OUTPUT_WIDTH {
                return Err(Error::InvalidOutputWidth {
                    width,
                    min: MIN_OUTPUT_WIDTH,
                });
            }
        }

        Ok(())
    }
}

impl ExtractOptions {
    pub fn output_type(&self) -> DataType {
        self.output_type
    }

    pub fn output_width(&self) -> usize {
        self.output_width
    }

    pub fn created_at(&self) -> Option<&DateTime<Utc>> {
        self.created_at.as_ref()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            output_type: DataType::Base16,
            output_width: DEFAULT_OUTPUT_WIDTH,
            created_at: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Builder)]
#[builder(build_fn(error = "crate::errors::Error"))]
pub struct RestoreOptions {
    #[builder(default)]
    input_type: DataType,
    /// Report checksum mismatches in the log instead of failing.
    #[builder(default)]
    ignore_checksum_errors: bool,
}

impl RestoreOptions {
    pub fn input_type(&self) -> DataType {
        self.input_type
    }

    pub fn ignore_checksum_errors(&self) -> bool {
        self.ignore_checksum_errors
    }
}
