//! Outcome of a tile pyramid run

use camino::Utf8PathBuf;

use crate::errors::CanvasError;
use crate::log::{debug, warn};
use crate::types::TileIndex;

/// A tile that could not be written
#[derive(Debug)]
pub struct TileFailure {
    pub index: TileIndex,
    pub path: Utf8PathBuf,
    pub error: CanvasError,
}

/// Summary of a tile pyramid run
///
/// Failed tiles do not stop the run; they are collected here.
#[derive(Debug, Default)]
pub struct TileReport {
    /// Tiles written successfully
    pub rendered: usize,
    pub failed: Vec<TileFailure>,
    /// The run stopped early on request
    pub cancelled: bool,
}

impl TileReport {
    /// Every tile was written and the run finished.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Total number of tiles attempted
    pub fn attempted(&self) -> usize {
        self.rendered + self.failed.len()
    }

    pub(crate) fn record(&mut self, index: TileIndex, path: Utf8PathBuf, result: Result<(), CanvasError>) {
        match result {
            Ok(()) => {
                debug!(tile = %index, path = %path, "rendered tile");
                self.rendered += 1;
            }
            Err(error) => {
                warn!(tile = %index, path = %path, error = %error, "failed to render tile");
                self.failed.push(TileFailure { index, path, error });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_collected() {
        let index = TileIndex::try_new(0, 1, 1).unwrap();
        let mut report = TileReport::default();
        report.record(index, "t/1/0/1.png".into(), Ok(()));
        report.record(
            index,
            "t/1/0/1.png".into(),
            Err(CanvasError::Rejected {
                path: "t/1/0/1.png".into(),
                reason: "disk full".into(),
            }),
        );
        assert_eq!(report.rendered, 1);
        assert_eq!(report.attempted(), 2);
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].index, index);
    }
}
