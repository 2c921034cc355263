// Application layer - Use case interactors

pub mod container;
pub mod preview_interactor;
pub mod split_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use preview_interactor::{PreviewInteractor, PreviewReport};
pub use split_interactor::SplitInteractor;
