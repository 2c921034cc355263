use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, LocalFsAdapter};
use crate::app::{preview_interactor::PreviewInteractor, split_interactor::SplitInteractor};
use crate::config_initialization::RuntimeSettings;
use crate::ports::{FsPort, ProbePort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn split_interactor(&self) -> Arc<SplitInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
}

pub struct DefaultAppContainer {
    split_interactor: Arc<SplitInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
}

impl DefaultAppContainer {
    pub fn new(settings: &RuntimeSettings) -> Self {
        let transcode_port = Arc::new(
            FfmpegAdapter::new(&settings.ffmpeg_path).with_timeout(settings.segment_timeout),
        );
        let probe_port = Arc::new(FfprobeAdapter::new(&settings.ffprobe_path));
        let fs_port = Arc::new(LocalFsAdapter::new());

        let split_interactor = Arc::new(SplitInteractor::new(
            Arc::clone(&transcode_port) as Arc<dyn TranscodePort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
        ));

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
        ));

        Self {
            split_interactor,
            preview_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn split_interactor(&self) -> Arc<SplitInteractor> {
        Arc::clone(&self.split_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }
}
