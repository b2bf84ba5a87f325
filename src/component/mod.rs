//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod duplication_checker;
pub mod input_normalizer;
pub mod path_prompt;
pub mod video_organizer;

pub use duplication_checker::DuplicationChecker;
pub use input_normalizer::InputNormalizer;
pub use video_organizer::VideoOrganizer;
